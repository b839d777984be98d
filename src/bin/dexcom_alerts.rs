use carbdex::services::dexcom::{ DexcomClient, DexcomConfig, StdinPrompt };

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber
        ::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter
                ::try_from_default_env()
                .unwrap_or_else(|_| "carbdex=info".into())
        )
        .init();

    let config = DexcomConfig::from_env()?;
    let mut client = DexcomClient::new(&config)?;

    match std::env::var("DEXCOM_REFRESH_TOKEN") {
        Ok(refresh_token) if !refresh_token.is_empty() => {
            // Non-interactive path: a refresh token from a previous
            // consent run mints the access token directly.
            client = client.with_refresh_token(refresh_token);
            client.refresh().await?;
        }
        _ => {
            client.authorize(&StdinPrompt).await?;
        }
    }

    let alerts = client.fetch_alerts().await?;

    println!("{}", serde_json::to_string_pretty(&alerts)?);

    Ok(())
}
