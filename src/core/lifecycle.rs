use crate::core::store::{VersionStore, LOCK_MARKER};
use crate::core::version::Version;
use crate::error::{AppError, AppResult};
use crate::infrastructure::config::Config;
use crate::infrastructure::installer;
use crate::infrastructure::remote::{resolve_url, HttpClient, Platform, RemoteCatalog};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use walkdir::WalkDir;

/// 版本生命周期管理器
///
/// 每个版本的状态机：Absent → Installing（持锁）→ Installed → Active；
/// Installed/Active → Absent 由 remove 完成。激活是全局根目录的唯一
/// 写入方，但并发激活之间没有互斥，这是已知且接受的限制。
pub struct LifecycleManager<'a> {
    config: &'a Config,
    store: VersionStore,
    http: HttpClient,
}

impl<'a> LifecycleManager<'a> {
    pub fn new(config: &'a Config, http: HttpClient) -> Self {
        Self {
            store: VersionStore::new(config),
            config,
            http,
        }
    }

    pub fn store(&self) -> &VersionStore {
        &self.store
    }

    /// 安装指定版本；"latest" 通过远程目录解析
    ///
    /// 目录已存在时完全跳过网络与磁盘写入（幂等），只按配置补一次激活。
    /// 安装锁是唯一的崩溃恢复信号：中断的安装会把锁永久留在目录里，
    /// 这里不做任何主动清理。
    pub async fn install(&self, spec: &str) -> AppResult<()> {
        let version = self.resolve_spec(spec).await?;

        if self.store.is_installed(&version) {
            self.say(&format!("⏭️  Go {version} 已安装，跳过下载"));
            if !self.config.download_only {
                self.activate(&version)?;
            }
            return Ok(());
        }

        let platform = Platform::current().with_overrides(
            self.config.os_override.as_deref(),
            self.config.arch_override.as_deref(),
        );
        let url = resolve_url(&version, &platform)?;

        if !self.http.check_url(url.as_str()).await {
            return Err(AppError::invalid_version(format!(
                "{version}（{url} 不可达）"
            )));
        }

        let dir = self.store.version_dir(&version);
        fs::create_dir_all(&dir).map_err(|e| AppError::storage(&dir, e))?;
        let lock = dir.join(LOCK_MARKER);
        fs::write(&lock, b"").map_err(|e| AppError::storage(&lock, e))?;

        self.say(&format!("⬇️  正在下载 {url} ..."));
        let pb = installer::create_progress_bar(self.config.quiet);
        let pb_progress = pb.clone();
        let bytes = self
            .http
            .download(url.as_str(), move |downloaded, total| {
                if total > 0 {
                    if pb_progress.length() != Some(total) {
                        pb_progress.set_length(total);
                    }
                    pb_progress.set_position(downloaded);
                }
            })
            .await?;
        pb.finish_and_clear();

        installer::unpack_tar_gz(&bytes, &dir)?;
        fs::remove_file(&lock).map_err(|e| AppError::storage(&lock, e))?;
        self.say(&format!("✅ Go {version} 安装完成"));

        if !self.config.download_only {
            self.activate(&version)?;
        }
        Ok(())
    }

    /// 激活：全量替换全局根目录内容并重链 bin 下的可执行文件
    ///
    /// 逐条目"先删后拷"而不是合并，避免上个版本的残留文件混进来。
    /// 拷贝而非整树符号链接，让全局根目录在其他工具眼里就是一个
    /// 普通的工具链安装，代价是拷贝耗时和双份磁盘占用。
    pub fn activate(&self, version: &Version) -> AppResult<()> {
        if self.store.current_active().as_ref() == Some(version) {
            return Ok(());
        }
        if self.store.has_lock_marker(version) {
            return Err(AppError::CorruptInstallation {
                version: version.to_string(),
            });
        }
        if !self.store.is_installed(version) {
            return Err(AppError::invalid_version(version.to_string()));
        }

        let source = self.store.version_dir(version);
        for entry in fs::read_dir(&source).map_err(|e| AppError::storage(&source, e))? {
            let entry = entry?;
            let target = self.config.go_root.join(entry.file_name());
            remove_path(&target)?;
            copy_tree(&entry.path(), &target)?;
        }

        self.relink_binaries()?;
        self.say(&format!("🔄 已激活 Go {version}"));
        Ok(())
    }

    /// 将全局根目录 bin 下的每个可执行文件重新链接到 bin 目录
    fn relink_binaries(&self) -> AppResult<()> {
        let bin = self.config.go_root.join("bin");
        let entries = match fs::read_dir(&bin) {
            Ok(entries) => entries,
            Err(_) => return Ok(()),
        };

        for entry in entries {
            let entry = entry?;
            if !entry.path().is_file() {
                continue;
            }
            let link = self.config.bin_dir.join(entry.file_name());
            remove_path(&link)?;
            link_binary(&entry.path(), &link)?;
        }
        Ok(())
    }

    /// 批量删除；激活版本只在批量开始时计算一次
    pub fn remove(&self, versions: &[Version]) -> AppResult<()> {
        if versions.is_empty() {
            return Err(AppError::argument("remove 需要至少一个版本号"));
        }
        let active = self.store.current_active();
        self.remove_batch(versions, active.as_ref())
    }

    /// 顺序删除，任何一个失败都立即中止剩余部分
    fn remove_batch(&self, versions: &[Version], active: Option<&Version>) -> AppResult<()> {
        for version in versions {
            if Some(version) == active {
                return Err(AppError::CannotRemoveActive {
                    version: version.to_string(),
                });
            }
            if !self.store.is_installed(version) {
                return Err(AppError::invalid_version(version.to_string()));
            }
            let dir = self.store.version_dir(version);
            fs::remove_dir_all(&dir).map_err(|e| AppError::storage(&dir, e))?;
            self.say(&format!("🗑️  已删除 Go {version}"));
        }
        Ok(())
    }

    /// 删除除当前激活版本外的全部已安装版本
    pub fn prune(&self) -> AppResult<()> {
        let active = self.store.current_active();
        self.prune_with_active(active.as_ref())
    }

    fn prune_with_active(&self, active: Option<&Version>) -> AppResult<()> {
        let doomed: Vec<Version> = self
            .store
            .list_installed()?
            .into_iter()
            .filter(|v| Some(v) != active)
            .collect();

        for version in &doomed {
            self.remove_batch(std::slice::from_ref(version), active)?;
        }
        Ok(())
    }

    /// 直接用指定已安装版本运行 go，绕过激活机制
    pub fn run(&self, version: &Version, args: &[String]) -> AppResult<i32> {
        if !self.store.is_installed(version) {
            return Err(AppError::invalid_version(version.to_string()));
        }
        let status = Command::new(self.store.binary_path(version))
            .args(args)
            .status()?;
        Ok(status.code().unwrap_or(1))
    }

    /// 指定已安装版本的 go 可执行文件路径
    pub fn which(&self, version: &Version) -> AppResult<PathBuf> {
        if !self.store.is_installed(version) {
            return Err(AppError::invalid_version(version.to_string()));
        }
        Ok(self.store.binary_path(version))
    }

    async fn resolve_spec(&self, spec: &str) -> AppResult<Version> {
        if spec == "latest" {
            RemoteCatalog::new(self.http.clone()).latest().await
        } else {
            spec.parse()
        }
    }

    fn say(&self, message: &str) {
        if !self.config.quiet {
            println!("{message}");
        }
    }
}

/// 删除文件、符号链接或整棵目录；目标不存在时忽略
fn remove_path(path: &Path) -> AppResult<()> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => {
            fs::remove_dir_all(path).map_err(|e| AppError::storage(path, e))?
        }
        Ok(_) => fs::remove_file(path).map_err(|e| AppError::storage(path, e))?,
        Err(_) => {}
    }
    Ok(())
}

/// 递归复制目录树（或单个文件），保留权限位
fn copy_tree(source: &Path, target: &Path) -> AppResult<()> {
    if source.is_file() {
        fs::copy(source, target).map_err(|e| AppError::storage(target, e))?;
        return Ok(());
    }

    for entry in WalkDir::new(source) {
        let entry = entry.map_err(|e| AppError::storage(source, e))?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .expect("walkdir 条目必然以根为前缀");
        let dest = target.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest).map_err(|e| AppError::storage(&dest, e))?;
        } else {
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent).map_err(|e| AppError::storage(parent, e))?;
            }
            fs::copy(entry.path(), &dest).map_err(|e| AppError::storage(&dest, e))?;
        }
    }
    Ok(())
}

/// unix 下用符号链接进搜索路径，windows 退化为复制
#[cfg(unix)]
fn link_binary(source: &Path, link: &Path) -> AppResult<()> {
    std::os::unix::fs::symlink(source, link).map_err(|e| AppError::storage(link, e))?;
    Ok(())
}

#[cfg(not(unix))]
fn link_binary(source: &Path, link: &Path) -> AppResult<()> {
    fs::copy(source, link).map_err(|e| AppError::storage(link, e))?;
    Ok(())
}
