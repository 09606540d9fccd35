use crate::state::AppState;
use axum::Router;

pub mod dto;
pub mod handlers;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::client_routes())
        .merge(handlers::plan_routes())
        .merge(handlers::me_routes())
}
