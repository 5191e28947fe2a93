//! Central REST route composition.
//!
//! Combines the per-module routers into the unified API surface.

use axum::Router;
use std::sync::Arc;

use crate::shared::state::AppState;

pub fn configure_api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(crate::tasks::configure_tasks_routes())
        .merge(crate::reviews::configure_reviews_routes())
        .merge(crate::performance::configure_performance_routes())
}
