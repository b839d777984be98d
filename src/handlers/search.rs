use axum::{ extract::{ Query, State }, Json };

use crate::{
    db::AppState,
    error::Result,
    models::{ Food, Page },
    query::{ PageQuery, SearchQuery },
};

/// Substring search over product names with sorting and pagination.
/// An empty query matches nothing and never touches the store.
pub async fn search_foods(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>
) -> Result<Json<Page<Food>>> {
    let params = params.validate()?;

    if params.q.is_empty() {
        return Ok(Json(Page::empty(params.page, params.per_page)));
    }

    let total = state.store.count_matching(&params.q).await?;
    let items = state.store.search(&params).await?;

    Ok(Json(Page::new(total, params.page, params.per_page, items)))
}

pub async fn paginated_foods(
    State(state): State<AppState>,
    Query(params): Query<PageQuery>
) -> Result<Json<Page<Food>>> {
    let params = params.validate()?;

    let total = state.store.count_all().await?;
    let items = state.store.page(&params).await?;

    Ok(Json(Page::new(total, params.page, params.per_page, items)))
}
