use crate::core::version::Version;
use crate::error::AppResult;
use crate::infrastructure::config::Config;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// 安装目录内的锁文件名：存在即表示安装未完成（损坏）
pub const LOCK_MARKER: &str = ".govm-lock";

/// 工具链主可执行文件名
#[cfg(not(windows))]
pub const GO_BINARY: &str = "go";
#[cfg(windows)]
pub const GO_BINARY: &str = "go.exe";

/// 相邻方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Prev,
    Next,
}

/// 本地已安装版本的枚举与激活状态探测
pub struct VersionStore {
    versions_root: PathBuf,
}

impl VersionStore {
    pub fn new(config: &Config) -> Self {
        Self {
            versions_root: config.versions_root.clone(),
        }
    }

    /// 扫描版本根目录，按数值序升序返回已安装版本
    ///
    /// 根目录不存在视为空；解析不出版本号的目录直接跳过。
    pub fn list_installed(&self) -> AppResult<Vec<Version>> {
        let mut versions = Vec::new();
        let entries = match fs::read_dir(&self.versions_root) {
            Ok(entries) => entries,
            Err(_) => return Ok(versions),
        };

        for entry in entries {
            let entry = entry?;
            if !entry.path().is_dir() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if let Ok(version) = name.parse::<Version>() {
                    versions.push(version);
                }
            }
        }

        versions.sort();
        Ok(versions)
    }

    /// 指定版本的存储目录
    pub fn version_dir(&self, version: &Version) -> PathBuf {
        self.versions_root.join(version.to_string())
    }

    pub fn is_installed(&self, version: &Version) -> bool {
        self.version_dir(version).is_dir()
    }

    /// 指定版本的 go 可执行文件路径
    pub fn binary_path(&self, version: &Version) -> PathBuf {
        self.version_dir(version).join("bin").join(GO_BINARY)
    }

    /// 安装锁探测：锁文件存在即视为损坏安装
    pub fn has_lock_marker(&self, version: &Version) -> bool {
        self.version_dir(version).join(LOCK_MARKER).exists()
    }

    /// 解析当前激活版本
    ///
    /// 全局根目录对任何工具都是可写的，不能信任历史激活记录：
    /// 在 PATH 上找到 go，调用 `go version` 取它自报的版本号，
    /// 再与对应候选逐字节比对确认一致后才算激活。
    pub fn current_active(&self) -> Option<Version> {
        let go_on_path = which::which(GO_BINARY).ok()?;
        let reported = reported_version(&go_on_path)?;

        if self.is_installed(&reported)
            && binaries_identical(&go_on_path, &self.binary_path(&reported))
        {
            Some(reported)
        } else {
            None
        }
    }

    /// 取排序列表中的相邻版本；到达两端时停在端点而不回绕
    pub fn neighbor(&self, selected: &Version, direction: Direction) -> AppResult<Version> {
        let installed = self.list_installed()?;
        Ok(neighbor_of(&installed, selected, direction).unwrap_or_else(|| selected.clone()))
    }
}

/// 相邻版本的纯函数实现；空列表返回 None
pub(crate) fn neighbor_of(
    installed: &[Version],
    selected: &Version,
    direction: Direction,
) -> Option<Version> {
    if installed.is_empty() {
        return None;
    }
    let index = installed.iter().position(|v| v == selected).unwrap_or(0);
    let index = match direction {
        Direction::Prev => index.saturating_sub(1),
        Direction::Next => (index + 1).min(installed.len() - 1),
    };
    installed.get(index).cloned()
}

/// 调用 `go version` 并解析其报告的版本号
fn reported_version(binary: &Path) -> Option<Version> {
    let output = Command::new(binary).arg("version").output().ok()?;
    if !output.status.success() {
        return None;
    }
    parse_go_version_output(&String::from_utf8_lossy(&output.stdout))
}

/// 解析 `go version go1.22.1 linux/amd64` 形式的输出
pub(crate) fn parse_go_version_output(output: &str) -> Option<Version> {
    output
        .split_whitespace()
        .find_map(|token| token.strip_prefix("go").and_then(|rest| rest.parse().ok()))
}

/// 逐字节比较两个可执行文件
///
/// 与全局根目录的并发外部修改之间存在竞态，这里不做加锁，
/// 只保证单次调用内的一致性判断。
pub(crate) fn binaries_identical(a: &Path, b: &Path) -> bool {
    match (fs::read(a), fs::read(b)) {
        (Ok(left), Ok(right)) => left == right,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_config(versions_root: &Path) -> Config {
        Config {
            versions_root: versions_root.to_path_buf(),
            go_root: versions_root.join("goroot"),
            bin_dir: versions_root.join("bin"),
            os_override: None,
            arch_override: None,
            quiet: true,
            non_interactive: true,
            download_only: false,
            no_color: true,
        }
    }

    fn versions(specs: &[&str]) -> Vec<Version> {
        specs.iter().map(|s| s.parse().unwrap()).collect()
    }

    #[test]
    fn test_list_installed_sorted_numerically() {
        let root = TempDir::new().unwrap();
        for name in ["1.9", "1.10.2", "1.2"] {
            fs::create_dir(root.path().join(name)).unwrap();
        }
        // 非版本目录与散落文件都应被跳过
        fs::create_dir(root.path().join("downloads")).unwrap();
        fs::write(root.path().join("1.11"), b"not a dir").unwrap();

        let store = VersionStore::new(&test_config(root.path()));
        let listed = store.list_installed().unwrap();
        let rendered: Vec<String> = listed.iter().map(|v| v.to_string()).collect();
        assert_eq!(rendered, vec!["1.2", "1.9", "1.10.2"]);
    }

    #[test]
    fn test_list_installed_missing_root_is_empty() {
        let root = TempDir::new().unwrap();
        let store = VersionStore::new(&test_config(&root.path().join("nope")));
        assert!(store.list_installed().unwrap().is_empty());
    }

    #[test]
    fn test_neighbor_clamps_at_endpoints() {
        let installed = versions(&["1.2", "1.9", "1.10.2"]);
        let first = &installed[0];
        let last = &installed[2];

        assert_eq!(
            neighbor_of(&installed, first, Direction::Prev).unwrap(),
            *first
        );
        assert_eq!(
            neighbor_of(&installed, last, Direction::Next).unwrap(),
            *last
        );
        assert_eq!(
            neighbor_of(&installed, first, Direction::Next).unwrap(),
            installed[1]
        );
        assert_eq!(
            neighbor_of(&installed, last, Direction::Prev).unwrap(),
            installed[1]
        );
    }

    #[test]
    fn test_neighbor_singleton_returns_itself() {
        let installed = versions(&["1.21"]);
        let only = &installed[0];
        assert_eq!(
            neighbor_of(&installed, only, Direction::Prev).unwrap(),
            *only
        );
        assert_eq!(
            neighbor_of(&installed, only, Direction::Next).unwrap(),
            *only
        );
    }

    #[test]
    fn test_neighbor_empty_list_is_none() {
        let selected: Version = "1.21".parse().unwrap();
        assert!(neighbor_of(&[], &selected, Direction::Next).is_none());
    }

    #[test]
    fn test_parse_go_version_output() {
        let v = parse_go_version_output("go version go1.22.1 linux/amd64").unwrap();
        assert_eq!(v.to_string(), "1.22.1");

        assert!(parse_go_version_output("").is_none());
        assert!(parse_go_version_output("not a go binary").is_none());
    }

    #[test]
    fn test_binaries_identical() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        let c = dir.path().join("c");
        fs::write(&a, b"same bytes").unwrap();
        fs::write(&b, b"same bytes").unwrap();
        fs::write(&c, b"different").unwrap();

        assert!(binaries_identical(&a, &b));
        assert!(!binaries_identical(&a, &c));
        assert!(!binaries_identical(&a, &dir.path().join("missing")));
    }

    /// PATH 上放一个自报版本号的假 go 脚本，逐字节比对决定激活判定
    #[test]
    #[cfg(unix)]
    fn test_current_active_requires_byte_identical_binary() {
        use std::env;
        use std::os::unix::fs::PermissionsExt;

        let root = TempDir::new().unwrap();
        let store = VersionStore::new(&test_config(root.path()));
        let version: Version = "1.21.0".parse().unwrap();

        let script = b"#!/bin/sh\necho \"go version go1.21.0 linux/amd64\"\n";
        let path_dir = TempDir::new().unwrap();
        let on_path = path_dir.path().join("go");
        fs::write(&on_path, script).unwrap();
        fs::set_permissions(&on_path, fs::Permissions::from_mode(0o755)).unwrap();

        let saved_path = env::var_os("PATH");
        env::set_var("PATH", path_dir.path());

        // 自报版本已安装但字节不同：不算激活
        fs::create_dir_all(store.version_dir(&version).join("bin")).unwrap();
        fs::write(store.binary_path(&version), b"different bytes").unwrap();
        let when_differs = store.current_active();

        // 候选与 PATH 上的 go 逐字节一致：算激活
        fs::write(store.binary_path(&version), script).unwrap();
        let when_identical = store.current_active();

        match saved_path {
            Some(value) => env::set_var("PATH", value),
            None => env::remove_var("PATH"),
        }

        assert_eq!(when_differs, None);
        assert_eq!(when_identical, Some(version));
    }

    #[test]
    fn test_has_lock_marker() {
        let root = TempDir::new().unwrap();
        let store = VersionStore::new(&test_config(root.path()));
        let version: Version = "1.21.0".parse().unwrap();

        fs::create_dir_all(store.version_dir(&version)).unwrap();
        assert!(!store.has_lock_marker(&version));

        fs::write(store.version_dir(&version).join(LOCK_MARKER), b"").unwrap();
        assert!(store.has_lock_marker(&version));
    }
}
