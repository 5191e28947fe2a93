pub mod performance;
pub mod tasks;

pub use self::performance::*;
pub use self::tasks::*;
