use axum::{
    Router,
    routing::{get, post},
};
use tower::ServiceBuilder;

use crate::{AppState, middleware::log_errors, routes};

// 会话相关的路由
pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(routes::session::landing))
        .route("/session", get(routes::session::current))
        .route("/session/login", post(routes::session::login))
        .route("/session/logout", post(routes::session::logout))
}

// 角色区域路由，静态路由优先于区域参数匹配
pub fn area_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/{area}",
            get(routes::area::enter).delete(routes::area::leave),
        )
        .route("/{area}/view", get(routes::area::view))
}

// 创建主路由
pub fn create_router(state: AppState) -> Router {
    let router = Router::new()
        .route("/health", get(routes::health::ping))
        .merge(session_routes())
        .merge(area_routes())
        .layer(ServiceBuilder::new().layer(axum::middleware::from_fn(log_errors)));

    // 开发模式下允许渲染端跨域访问
    #[cfg(debug_assertions)]
    let router = {
        tracing::debug!("Adding CORS layer for development mode");
        router.layer(tower_http::cors::CorsLayer::permissive())
    };

    router.with_state(state)
}
