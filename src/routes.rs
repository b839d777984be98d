use axum::{ middleware, routing::get, Router };

use crate::{ db::AppState, handlers, middleware as mw };

pub fn create_routes(state: AppState) -> Router {
    let food_routes = Router::new()
        .route("/foods", get(handlers::foods::list_foods).post(handlers::foods::create_food))
        .route("/foods/search", get(handlers::search::search_foods))
        .route("/foods/paginated", get(handlers::search::paginated_foods))
        .route(
            "/foods/:id",
            get(handlers::foods::get_food)
                .put(handlers::foods::update_food)
                .delete(handlers::foods::delete_food)
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), mw::cache::cache_middleware));

    Router::new()
        .route("/status", get(handlers::status::status_check))
        .merge(food_routes)
        .with_state(state)
}
