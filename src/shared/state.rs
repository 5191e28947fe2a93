use crate::config::AppConfig;
use crate::shared::utils::DbPool;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub conn: DbPool,
}
