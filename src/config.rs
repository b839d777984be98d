use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub cache: CacheConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub environment: Environment,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    pub enabled: bool,
    pub ttl_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    pub cors_enabled: bool,
    pub allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy
            ::from_filename(".env.local")
            .or_else(|_| dotenvy::dotenv())
            .ok();

        let environment = env
            ::var("NODE_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .to_lowercase();

        let is_production = environment == "production";

        let dev_origins = env::var("DEV_FRONTEND_ORIGIN").unwrap_or_default();
        let prod_origins = env::var("PRODUCTION_FRONTEND_ORIGIN").unwrap_or_default();

        let allowed_origins: Vec<String> = (if is_production { prod_origins } else { dev_origins })
            .split(',')
            .filter(|s| !s.is_empty())
            .map(|s| s.trim().to_string())
            .collect();

        let config = Config {
            server: ServerConfig {
                port: env
                    ::var("SERVER_PORT")
                    .unwrap_or_else(|_| "5555".to_string())
                    .parse()?,
                host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                environment: if is_production {
                    Environment::Production
                } else {
                    Environment::Development
                },
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
                max_connections: env
                    ::var("DATABASE_MAX_CONNECTIONS")
                    .unwrap_or_else(|_| "5".to_string())
                    .parse()?,
            },
            redis: RedisConfig {
                url: env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string()),
            },
            cache: CacheConfig {
                enabled: env
                    ::var("CACHE_ENABLED")
                    .unwrap_or_else(|_| "true".to_string())
                    .parse()?,
                ttl_secs: env
                    ::var("CACHE_TTL_SECS")
                    .unwrap_or_else(|_| "60".to_string())
                    .parse()?,
            },
            security: SecurityConfig {
                cors_enabled: is_production,
                allowed_origins,
            },
        };

        Ok(config)
    }

    #[allow(dead_code)]
    pub fn is_development(&self) -> bool {
        self.server.environment == Environment::Development
    }

    #[allow(dead_code)]
    pub fn is_production(&self) -> bool {
        self.server.environment == Environment::Production
    }
}
