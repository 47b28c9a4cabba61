use clap::{ArgAction, Parser, Subcommand};

/// govm CLI 应用程序
#[derive(Parser)]
#[command(name = "govm")]
#[command(about = "Go 工具链版本管理器：发现、安装、切换与交互式选择", long_about = None)]
#[command(version, disable_version_flag = true)]
pub struct Cli {
    /// 显示版本号
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    version: Option<bool>,

    /// 静默模式，抑制过程输出
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// 关闭彩色输出
    #[arg(short = 'c', long = "no-color", global = true)]
    pub no_color: bool,

    /// 非交互模式，拒绝打开选择器
    #[arg(short = 'y', long = "non-interactive", global = true)]
    pub non_interactive: bool,

    /// 省略子命令时打开交互式选择器
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// 顶级命令
#[derive(Subcommand)]
pub enum Commands {
    /// 下载并安装指定版本（支持 latest）
    #[command(alias = "i")]
    Install {
        /// 版本号（如 1.22.1）或 latest
        version: String,
        /// 操作系统覆盖，默认自动检测
        #[arg(short = 'o', long)]
        os: Option<String>,
        /// 架构覆盖，默认自动检测
        #[arg(short = 'a', long)]
        arch: Option<String>,
        /// 仅下载，不激活
        #[arg(short = 'd', long)]
        download: bool,
    },
    /// 用指定已安装版本直接运行 go
    Run {
        /// 版本号
        version: String,
        /// 传给 go 的参数
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// 显示指定版本 go 可执行文件的路径
    Which {
        /// 版本号
        version: String,
    },
    /// 删除一个或多个已安装版本
    #[command(alias = "rm")]
    Remove {
        /// 要删除的版本号
        versions: Vec<String>,
    },
    /// 删除除当前激活版本外的全部已安装版本
    Prune,
    /// 列出已安装版本
    #[command(alias = "ls")]
    List,
    /// 列出远程所有可用版本
    #[command(name = "list-all", alias = "ls-remote")]
    ListAll,
    /// 获取并运行最新的安装脚本完成自升级
    SelfUpgrade,
}
