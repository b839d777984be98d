use serde::Deserialize;

use carbdex::config::Config;
use carbdex::db;
use carbdex::models::{ NewFood, SERVING_SIZE_MAX_LEN };

#[derive(Debug, Deserialize)]
struct SeedRecord {
    product_name: String,
    carbohydrates_100g: Option<f64>,
    serving_size: Option<String>,
    serving_quantity: Option<f64>,
    countries: Option<String>,
    image_nutrition_url: Option<String>,
}

impl SeedRecord {
    fn into_new_food(self) -> Option<NewFood> {
        if self.product_name.is_empty() {
            return None;
        }

        // The foods table requires a carbohydrate value; rows without
        // one are counted as errors.
        let carbohydrates_100g = self.carbohydrates_100g?;

        let serving_size = self.serving_size
            .filter(|size| !size.is_empty())
            .map(|size| size.chars().take(SERVING_SIZE_MAX_LEN).collect());

        Some(NewFood {
            product_name: self.product_name,
            carbohydrates_100g,
            serving_size,
            serving_quantity: self.serving_quantity,
            countries: self.countries.filter(|countries| !countries.is_empty()),
            image_nutrition_url: self.image_nutrition_url.filter(|url| !url.is_empty()),
        })
    }
}

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

    let config = Config::from_env()?;
    let store = db::setup_database(&config).await?;

    let csv_path = std::env
        ::args()
        .nth(1)
        .unwrap_or_else(|| "Foods.csv".to_string());

    tracing::info!("Seeding foods from {}", csv_path);

    let mut reader = csv::Reader::from_path(&csv_path)?;

    let mut record_count = 0usize;
    let mut error_count = 0usize;

    for result in reader.deserialize::<SeedRecord>() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                tracing::error!("Error parsing row: {}", e);
                error_count += 1;
                continue;
            }
        };

        match record.into_new_food() {
            Some(food) =>
                match store.insert(&food).await {
                    Ok(_) => {
                        record_count += 1;
                    }
                    Err(e) => {
                        tracing::error!("Error inserting row: {}", e);
                        error_count += 1;
                    }
                }
            None => {
                error_count += 1;
            }
        }
    }

    tracing::info!("Total records processed: {}", record_count);
    tracing::info!("Total records with errors: {}", error_count);

    Ok(())
}
