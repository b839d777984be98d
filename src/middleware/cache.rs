use axum::{
    body::{ to_bytes, Body },
    extract::{ Request, State },
    http::{ header, Method, StatusCode },
    middleware::Next,
    response::{ IntoResponse, Response },
};

use crate::db::AppState;

/// Memoizes successful GET responses keyed by path + query string.
/// Mutations do not invalidate entries; a stale read is possible until
/// the TTL elapses.
pub async fn cache_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next
) -> Response {
    if !state.cache.is_enabled() || request.method() != Method::GET {
        return next.run(request).await;
    }

    let key = cache_key(request.uri().path(), request.uri().query());

    if let Some(hit) = state.cache.get(&key).await {
        tracing::debug!("Response cache hit: {}", key);
        return ([(header::CONTENT_TYPE, "application/json")], hit).into_response();
    }

    let response = next.run(request).await;

    if response.status() != StatusCode::OK {
        return response;
    }

    let (parts, body) = response.into_parts();
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!("Failed to buffer response for caching: {}", e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    if let Ok(body) = std::str::from_utf8(&bytes) {
        state.cache.put(&key, body).await;
    }

    Response::from_parts(parts, Body::from(bytes))
}

fn cache_key(path: &str, query: Option<&str>) -> String {
    match query {
        Some(query) => format!("resp:{}?{}", path, query),
        None => format!("resp:{}", path),
    }
}
