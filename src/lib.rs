pub mod api_router;
pub mod config;
pub mod performance;
pub mod reviews;
pub mod shared;
pub mod tasks;
