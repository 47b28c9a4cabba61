use crate::core::version::Version;
use crate::error::{AppError, AppResult};
use std::fmt;
use url::Url;

/// 官方下载列表与归档的根地址
pub const DOWNLOAD_BASE: &str = "https://go.dev/dl/";

/// 目标平台信息，统一 OS / Arch 的判定
///
/// 无法识别的宿主会得到空字段：URL 仍然能拼出来，但指向不存在的
/// 归档，由下游的可达性探测兜底。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    pub os: String,
    pub arch: String,
}

impl Platform {
    /// 检测当前运行平台
    pub fn current() -> Self {
        let os = if cfg!(target_os = "linux") {
            "linux"
        } else if cfg!(target_os = "macos") {
            "darwin"
        } else if cfg!(target_os = "windows") {
            "windows"
        } else if cfg!(target_os = "freebsd") {
            "freebsd"
        } else {
            ""
        };

        let arch = if cfg!(target_arch = "x86_64") {
            "amd64"
        } else if cfg!(target_arch = "aarch64") {
            "arm64"
        } else if cfg!(target_arch = "x86") {
            "386"
        } else if cfg!(target_arch = "arm") {
            "armv6l"
        } else {
            ""
        };

        Platform {
            os: os.to_string(),
            arch: arch.to_string(),
        }
    }

    /// 应用显式覆盖，空字段保持检测结果
    pub fn with_overrides(mut self, os: Option<&str>, arch: Option<&str>) -> Self {
        if let Some(os) = os {
            if !os.is_empty() {
                self.os = os.to_string();
            }
        }
        if let Some(arch) = arch {
            if !arch.is_empty() {
                self.arch = arch.to_string();
            }
        }
        self
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os, self.arch)
    }
}

/// 按固定命名方案拼接归档下载地址：`<base>go<version>.<os>-<arch>.tar.gz`
pub fn resolve_url(version: &Version, platform: &Platform) -> AppResult<Url> {
    let raw = format!("{DOWNLOAD_BASE}go{version}.{platform}.tar.gz");
    Url::parse(&raw).map_err(|_| AppError::invalid_version(version.to_string()))
}
