use axum::{ extract::{ Path, Query, State }, http::StatusCode, response::IntoResponse, Json };

use crate::{
    db::AppState,
    error::{ AppError, Result },
    models::{ CreateFoodRequest, Food, UpdateFoodRequest },
    query::RangeQuery,
};

pub async fn list_foods(
    State(state): State<AppState>,
    Query(params): Query<RangeQuery>
) -> Result<Json<Vec<Food>>> {
    let range = params.validate()?;

    let foods = state.store.list_range(&range).await?;

    Ok(Json(foods))
}

pub async fn get_food(State(state): State<AppState>, Path(id): Path<i32>) -> Result<Json<Food>> {
    let food = state.store
        .get(id).await?
        .ok_or_else(|| AppError::NotFound(format!("Food {} not found", id)))?;

    Ok(Json(food))
}

pub async fn create_food(
    State(state): State<AppState>,
    Json(payload): Json<CreateFoodRequest>
) -> Result<impl IntoResponse> {
    let new_food = payload.validate()?;

    let food = state.store.insert(&new_food).await?;

    tracing::info!("Created food {} ({})", food.id, food.product_name);

    Ok((StatusCode::CREATED, Json(food)))
}

pub async fn update_food(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateFoodRequest>
) -> Result<Json<Food>> {
    payload.validate()?;

    let food = state.store
        .update(id, &payload).await?
        .ok_or_else(|| AppError::NotFound(format!("Food {} not found", id)))?;

    tracing::info!("Updated food {}", food.id);

    Ok(Json(food))
}

pub async fn delete_food(State(state): State<AppState>, Path(id): Path<i32>) -> Result<StatusCode> {
    let deleted = state.store.delete(id).await?;

    if !deleted {
        return Err(AppError::NotFound(format!("Food {} not found", id)));
    }

    tracing::info!("Deleted food {}", id);

    Ok(StatusCode::NO_CONTENT)
}
