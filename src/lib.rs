// 核心模块
pub mod cli;
pub mod core;
pub mod error;
pub mod infrastructure;

// 重新导出常用类型
pub use crate::core::lifecycle::LifecycleManager;
pub use crate::core::selector::{InteractiveSelector, Selection};
pub use crate::core::store::{Direction, VersionStore};
pub use crate::core::version::Version;
pub use crate::error::{AppError, AppResult};
pub use crate::infrastructure::config::Config;
pub use crate::infrastructure::remote::{HttpClient, Platform, RemoteCatalog};
