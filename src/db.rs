use anyhow::Result;
use redis::aio::ConnectionManager;
use sqlx::postgres::PgPoolOptions;

use crate::cache::ResponseCache;
use crate::config::Config;
use crate::store::FoodStore;

#[derive(Clone)]
pub struct AppState {
    pub store: FoodStore,
    pub cache: ResponseCache,
    pub config: Config,
}

pub async fn setup_database(config: &Config) -> Result<FoodStore> {
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url).await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    tracing::info!("Connected to Postgres");

    Ok(FoodStore::new(pool))
}

pub async fn setup_redis(config: &Config) -> Result<ConnectionManager> {
    let client = redis::Client::open(config.redis.url.as_str())?;
    let connection = ConnectionManager::new(client).await?;

    tracing::info!("Connected to Redis");

    Ok(connection)
}
