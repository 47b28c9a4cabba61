use crate::cli::commands::{Cli, Commands};
use crate::cli::output;
use crate::core::lifecycle::LifecycleManager;
use crate::core::selector::{InteractiveSelector, Selection};
use crate::core::store::VersionStore;
use crate::core::version::Version;
use crate::error::{AppError, AppResult};
use crate::infrastructure::config::Config;
use crate::infrastructure::remote::{HttpClient, RemoteCatalog};
use std::fs;
use std::process::Command;

/// 自升级安装脚本地址；自升级被视为"取回脚本并执行"的外部动作
const INSTALL_SCRIPT_URL: &str = "https://raw.githubusercontent.com/govm-sh/govm/main/install.sh";

/// 命令处理器
pub struct CommandHandler {
    config: Config,
}

impl CommandHandler {
    /// 构建配置；GOROOT / GOBIN 缺失在此处就失败，任何命令都不会执行
    pub fn new(cli: &Cli) -> AppResult<Self> {
        let mut config = Config::from_env()?;
        config.quiet = cli.quiet;
        config.non_interactive = cli.non_interactive;
        config.no_color = cli.no_color;
        if cli.no_color {
            colored::control::set_override(false);
        }
        Ok(Self { config })
    }

    /// 分发命令；省略子命令时进入交互式选择器
    pub async fn dispatch(mut self, command: Option<Commands>) -> AppResult<()> {
        match command {
            Some(Commands::Install {
                version,
                os,
                arch,
                download,
            }) => {
                self.config.os_override = os;
                self.config.arch_override = arch;
                self.config.download_only = download;
                let manager = LifecycleManager::new(&self.config, HttpClient::new()?);
                manager.install(&version).await
            }
            Some(Commands::Run { version, args }) => self.handle_run(&version, &args),
            Some(Commands::Which { version }) => {
                let manager = LifecycleManager::new(&self.config, HttpClient::new()?);
                let path = manager.which(&version.parse()?)?;
                println!("{}", path.display());
                Ok(())
            }
            Some(Commands::Remove { versions }) => {
                let parsed: Vec<Version> = versions
                    .iter()
                    .map(|s| s.parse())
                    .collect::<AppResult<_>>()?;
                let manager = LifecycleManager::new(&self.config, HttpClient::new()?);
                manager.remove(&parsed)
            }
            Some(Commands::Prune) => {
                let manager = LifecycleManager::new(&self.config, HttpClient::new()?);
                manager.prune()
            }
            Some(Commands::List) => self.handle_list(),
            Some(Commands::ListAll) => self.handle_list_all().await,
            Some(Commands::SelfUpgrade) => self.handle_self_upgrade().await,
            None => self.handle_selector(),
        }
    }

    /// run 命令：子进程退出码原样透传给父 shell
    fn handle_run(&self, version: &str, args: &[String]) -> AppResult<()> {
        let manager = LifecycleManager::new(&self.config, HttpClient::new()?);
        let code = manager.run(&version.parse()?, args)?;
        if code != 0 {
            std::process::exit(code);
        }
        Ok(())
    }

    fn handle_list(&self) -> AppResult<()> {
        let store = VersionStore::new(&self.config);
        let installed = store.list_installed()?;
        if installed.is_empty() {
            println!("尚未安装任何版本，先试试 `govm install latest`");
            return Ok(());
        }

        let active = store.current_active();
        for version in &installed {
            println!(
                "{}",
                output::installed_line(
                    version,
                    active.as_ref() == Some(version),
                    store.has_lock_marker(version),
                )
            );
        }
        Ok(())
    }

    async fn handle_list_all(&self) -> AppResult<()> {
        let store = VersionStore::new(&self.config);
        let installed = store.list_installed()?;
        let catalog = RemoteCatalog::new(HttpClient::new()?);

        for version in catalog.list_all().await? {
            println!(
                "{}",
                output::remote_line(&version, installed.contains(&version))
            );
        }
        Ok(())
    }

    /// 无子命令：打开选择器，选中后执行激活并打印横幅
    fn handle_selector(&self) -> AppResult<()> {
        let store = VersionStore::new(&self.config);
        let mut selector = InteractiveSelector::new(&self.config, &store)?;

        match selector.run()? {
            Selection::Quit => Ok(()),
            Selection::Activate(version) => {
                let manager = LifecycleManager::new(&self.config, HttpClient::new()?);
                manager.activate(&version)?;
                println!("{}", output::active_banner(&version));
                Ok(())
            }
        }
    }

    async fn handle_self_upgrade(&self) -> AppResult<()> {
        let http = HttpClient::new()?;
        let script = http.get_text(INSTALL_SCRIPT_URL).await?;

        let dir = tempfile::tempdir()?;
        let script_path = dir.path().join("govm-install.sh");
        fs::write(&script_path, script)?;

        let status = Command::new("sh").arg(&script_path).status()?;
        if !status.success() {
            return Err(AppError::fetch("安装脚本执行失败"));
        }
        Ok(())
    }
}
