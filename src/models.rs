use serde::{ Deserialize, Serialize };

use crate::error::AppError;

pub const SERVING_SIZE_MAX_LEN: usize = 100;

/// A persisted food record. Optional columns serialize as explicit
/// `null`, never as omitted keys.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Food {
    pub id: i32,
    pub product_name: String,
    pub carbohydrates_100g: f64,
    pub serving_size: Option<String>,
    pub serving_quantity: Option<f64>,
    pub countries: Option<String>,
    pub image_nutrition_url: Option<String>,
}

/// Create payload. Required fields are deserialized as `Option` so a
/// missing field surfaces as a 400 with the usual error envelope
/// instead of a deserializer rejection.
#[derive(Debug, Default, Deserialize)]
pub struct CreateFoodRequest {
    pub product_name: Option<String>,
    pub carbohydrates_100g: Option<f64>,
    pub serving_size: Option<String>,
    pub serving_quantity: Option<f64>,
    pub countries: Option<String>,
    pub image_nutrition_url: Option<String>,
}

#[derive(Debug)]
pub struct NewFood {
    pub product_name: String,
    pub carbohydrates_100g: f64,
    pub serving_size: Option<String>,
    pub serving_quantity: Option<f64>,
    pub countries: Option<String>,
    pub image_nutrition_url: Option<String>,
}

impl CreateFoodRequest {
    pub fn validate(self) -> Result<NewFood, AppError> {
        let product_name = self.product_name
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| {
                AppError::InvalidParameter("product_name is required and must be non-empty".to_string())
            })?;

        let carbohydrates_100g = self.carbohydrates_100g.ok_or_else(|| {
            AppError::InvalidParameter("carbohydrates_100g is required".to_string())
        })?;

        validate_serving_size(self.serving_size.as_deref())?;

        Ok(NewFood {
            product_name,
            carbohydrates_100g,
            serving_size: self.serving_size,
            serving_quantity: self.serving_quantity,
            countries: self.countries,
            image_nutrition_url: self.image_nutrition_url,
        })
    }
}

/// Partial update: only supplied fields overwrite stored values.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateFoodRequest {
    pub product_name: Option<String>,
    pub carbohydrates_100g: Option<f64>,
    pub serving_size: Option<String>,
    pub serving_quantity: Option<f64>,
    pub countries: Option<String>,
    pub image_nutrition_url: Option<String>,
}

impl UpdateFoodRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(name) = &self.product_name {
            if name.trim().is_empty() {
                return Err(AppError::InvalidParameter("product_name must be non-empty".to_string()));
            }
        }

        validate_serving_size(self.serving_size.as_deref())
    }
}

fn validate_serving_size(serving_size: Option<&str>) -> Result<(), AppError> {
    if let Some(size) = serving_size {
        if size.chars().count() > SERVING_SIZE_MAX_LEN {
            return Err(
                AppError::InvalidParameter(
                    format!("serving_size must be at most {} characters", SERVING_SIZE_MAX_LEN)
                )
            );
        }
    }
    Ok(())
}

/// Pagination envelope shared by the search and paginated listings.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub total: i64,
    pub total_pages: i64,
    pub page: i64,
    pub per_page: i64,
    pub items: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(total: i64, page: i64, per_page: i64, items: Vec<T>) -> Self {
        let total_pages = if total == 0 { 0 } else { (total + per_page - 1) / per_page };

        Self {
            total,
            total_pages,
            page,
            per_page,
            items,
        }
    }

    pub fn empty(page: i64, per_page: i64) -> Self {
        Self::new(0, page, per_page, Vec::new())
    }
}
