use std::io;
use std::path::Path;
use thiserror::Error;

/// 应用程序错误类型
///
/// 所有错误对当次调用都是终止性的：核心不做任何自动重试，
/// 唯一的恢复机制是安装锁文件（见 `CorruptInstallation`）。
#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO 错误: {0}")]
    Io(#[from] io::Error),

    #[error("配置错误: {message}")]
    Config { message: String },

    #[error("参数错误: {message}")]
    Argument { message: String },

    #[error("无效或不可用的版本: {version}")]
    InvalidVersion { version: String },

    #[error("安装已损坏（检测到未完成的安装锁）: {version}")]
    CorruptInstallation { version: String },

    #[error("无法删除当前激活的版本: {version}")]
    CannotRemoveActive { version: String },

    #[error("存储错误: {path} - {reason}")]
    Storage { path: String, reason: String },

    #[error("网络错误: {message}")]
    Fetch { message: String },

    #[error("远程没有任何可用版本")]
    NoVersionsAvailable,

    #[error("交互模式不可用: {reason}")]
    InteractiveUnavailable { reason: String },
}

/// 应用程序 Result 类型
pub type AppResult<T> = Result<T, AppError>;

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        Self::Fetch {
            message: e.to_string(),
        }
    }
}

/// 便捷的错误创建函数
impl AppError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn argument(message: impl Into<String>) -> Self {
        Self::Argument {
            message: message.into(),
        }
    }

    pub fn invalid_version(version: impl Into<String>) -> Self {
        Self::InvalidVersion {
            version: version.into(),
        }
    }

    pub fn storage(path: &Path, reason: impl ToString) -> Self {
        Self::Storage {
            path: path.display().to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn fetch(message: impl Into<String>) -> Self {
        Self::Fetch {
            message: message.into(),
        }
    }

    pub fn interactive_unavailable(reason: impl Into<String>) -> Self {
        Self::InteractiveUnavailable {
            reason: reason.into(),
        }
    }
}
