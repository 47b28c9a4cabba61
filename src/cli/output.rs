use crate::core::version::Version;
use colored::Colorize;

/// 已安装列表的单行渲染
///
/// 激活版本以 `*` 与绿色标出；带安装锁的损坏安装以红色标注，
/// 提示用户手工删除目录后重装。
pub fn installed_line(version: &Version, active: bool, corrupt: bool) -> String {
    if corrupt {
        return format!("  {version}  {}", "[损坏：安装未完成，请删除后重装]".red());
    }
    if active {
        format!("{} {}", "*".green(), version.to_string().green())
    } else {
        format!("  {version}")
    }
}

/// 远程列表的单行渲染，已安装的版本以 `*` 标出
pub fn remote_line(version: &Version, installed: bool) -> String {
    if installed {
        format!("{} {}", "*".green(), version)
    } else {
        format!("  {version}")
    }
}

/// 激活完成后的横幅
pub fn active_banner(version: &Version) -> String {
    format!("✅ 当前激活: Go {version}").green().to_string()
}
