use crate::error::{AppError, AppResult};
use std::env;
use std::path::PathBuf;

/// 全局工具链根目录的环境变量
pub const ENV_GOROOT: &str = "GOROOT";
/// 可执行文件链接目录的环境变量
pub const ENV_GOBIN: &str = "GOBIN";

/// 运行配置
///
/// 启动时一次性构建，之后显式传入各组件，组件内部不再读取环境变量。
#[derive(Debug, Clone)]
pub struct Config {
    /// 已安装版本的存放根目录（每个版本一个子目录）
    pub versions_root: PathBuf,
    /// 全局工具链根目录，激活时整体替换其内容
    pub go_root: PathBuf,
    /// 可执行文件链接目录
    pub bin_dir: PathBuf,
    /// 操作系统覆盖，None 表示自动检测
    pub os_override: Option<String>,
    /// 架构覆盖，None 表示自动检测
    pub arch_override: Option<String>,
    /// 静默模式，抑制过程输出
    pub quiet: bool,
    /// 非交互模式，拒绝进入选择器
    pub non_interactive: bool,
    /// 仅下载，安装后不激活
    pub download_only: bool,
    /// 关闭彩色输出
    pub no_color: bool,
}

impl Config {
    /// 从环境变量构建配置
    ///
    /// GOROOT / GOBIN 缺失是致命错误，在任何命令执行之前就会失败。
    pub fn from_env() -> AppResult<Self> {
        let go_root = required_dir_var(ENV_GOROOT)?;
        let bin_dir = required_dir_var(ENV_GOBIN)?;
        let versions_root = dirs::home_dir()
            .ok_or_else(|| AppError::config("无法获取用户主目录"))?
            .join(".govm")
            .join("versions");

        Ok(Self {
            versions_root,
            go_root,
            bin_dir,
            os_override: None,
            arch_override: None,
            quiet: false,
            non_interactive: false,
            download_only: false,
            no_color: false,
        })
    }
}

/// 读取必需的目录环境变量，未设置或为空视为配置错误
fn required_dir_var(name: &str) -> AppResult<PathBuf> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(PathBuf::from(value)),
        _ => Err(AppError::config(format!(
            "环境变量 {name} 未设置，请配置后重试"
        ))),
    }
}
