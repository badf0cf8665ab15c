mod assembler;
pub mod dto;
pub mod handlers;
mod services;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::routes())
}
