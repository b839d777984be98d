use anyhow::Result;
use sqlx::PgPool;

use crate::models::{ Food, NewFood, UpdateFoodRequest };
use crate::query::{ PageParams, Range, SearchParams };

const COLUMNS: &str =
    "id, product_name, carbohydrates_100g, serving_size, serving_quantity, countries, image_nutrition_url";

#[derive(Clone)]
pub struct FoodStore {
    pool: PgPool,
}

impl FoodStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Offset-range listing in insertion order. No limit is applied
    /// when the range is open-ended.
    pub async fn list_range(&self, range: &Range) -> Result<Vec<Food>> {
        let foods = match range.limit {
            Some(limit) => {
                sqlx::query_as::<_, Food>(
                    &format!("SELECT {} FROM foods ORDER BY id LIMIT $1 OFFSET $2", COLUMNS)
                )
                    .bind(limit)
                    .bind(range.offset)
                    .fetch_all(&self.pool).await?
            }
            None => {
                sqlx::query_as::<_, Food>(
                    &format!("SELECT {} FROM foods ORDER BY id OFFSET $1", COLUMNS)
                )
                    .bind(range.offset)
                    .fetch_all(&self.pool).await?
            }
        };

        Ok(foods)
    }

    pub async fn count_matching(&self, q: &str) -> Result<i64> {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM foods WHERE product_name ILIKE $1"
        )
            .bind(like_pattern(q))
            .fetch_one(&self.pool).await?;

        Ok(total)
    }

    /// One page of a case-insensitive substring search. The sort column
    /// and direction come from the closed mapping in `query`, never from
    /// caller input; id breaks ties so pages stay disjoint when the sort
    /// column holds duplicate values.
    pub async fn search(&self, params: &SearchParams) -> Result<Vec<Food>> {
        let sql = format!(
            "SELECT {} FROM foods WHERE product_name ILIKE $1 ORDER BY {} {}, id LIMIT $2 OFFSET $3",
            COLUMNS,
            params.sort.column(),
            params.order.sql()
        );

        let foods = sqlx::query_as::<_, Food>(&sql)
            .bind(like_pattern(&params.q))
            .bind(params.per_page)
            .bind(params.offset())
            .fetch_all(&self.pool).await?;

        Ok(foods)
    }

    pub async fn count_all(&self) -> Result<i64> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM foods")
            .fetch_one(&self.pool).await?;

        Ok(total)
    }

    pub async fn page(&self, params: &PageParams) -> Result<Vec<Food>> {
        let foods = sqlx::query_as::<_, Food>(
            &format!("SELECT {} FROM foods ORDER BY id LIMIT $1 OFFSET $2", COLUMNS)
        )
            .bind(params.per_page)
            .bind(params.offset())
            .fetch_all(&self.pool).await?;

        Ok(foods)
    }

    pub async fn get(&self, id: i32) -> Result<Option<Food>> {
        let food = sqlx::query_as::<_, Food>(
            &format!("SELECT {} FROM foods WHERE id = $1", COLUMNS)
        )
            .bind(id)
            .fetch_optional(&self.pool).await?;

        Ok(food)
    }

    pub async fn insert(&self, food: &NewFood) -> Result<Food> {
        let created = sqlx::query_as::<_, Food>(
            &format!(
                "INSERT INTO foods (product_name, carbohydrates_100g, serving_size, serving_quantity, countries, image_nutrition_url) \
                 VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
                COLUMNS
            )
        )
            .bind(&food.product_name)
            .bind(food.carbohydrates_100g)
            .bind(&food.serving_size)
            .bind(food.serving_quantity)
            .bind(&food.countries)
            .bind(&food.image_nutrition_url)
            .fetch_one(&self.pool).await?;

        Ok(created)
    }

    /// Partial merge: columns keep their stored value wherever the
    /// request left the field unset.
    pub async fn update(&self, id: i32, changes: &UpdateFoodRequest) -> Result<Option<Food>> {
        let updated = sqlx::query_as::<_, Food>(
            &format!(
                "UPDATE foods SET \
                 product_name = COALESCE($2, product_name), \
                 carbohydrates_100g = COALESCE($3, carbohydrates_100g), \
                 serving_size = COALESCE($4, serving_size), \
                 serving_quantity = COALESCE($5, serving_quantity), \
                 countries = COALESCE($6, countries), \
                 image_nutrition_url = COALESCE($7, image_nutrition_url) \
                 WHERE id = $1 RETURNING {}",
                COLUMNS
            )
        )
            .bind(id)
            .bind(&changes.product_name)
            .bind(changes.carbohydrates_100g)
            .bind(&changes.serving_size)
            .bind(changes.serving_quantity)
            .bind(&changes.countries)
            .bind(&changes.image_nutrition_url)
            .fetch_optional(&self.pool).await?;

        Ok(updated)
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = sqlx::query("DELETE FROM foods WHERE id = $1")
            .bind(id)
            .execute(&self.pool).await?;

        Ok(result.rows_affected() > 0)
    }
}

/// `%substring%` pattern with LIKE metacharacters escaped, so caller
/// input always matches literally.
fn like_pattern(q: &str) -> String {
    let mut pattern = String::with_capacity(q.len() + 2);
    pattern.push('%');

    for c in q.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }

    pattern.push('%');
    pattern
}
