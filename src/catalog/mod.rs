use crate::state::AppState;
use axum::Router;

pub mod dto;
pub mod handlers;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::food_routes())
        .merge(handlers::workout_routes())
        .merge(handlers::essential_routes())
}
