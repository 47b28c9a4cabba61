use crate::core::store::VersionStore;
use crate::core::version::Version;
use crate::error::{AppError, AppResult};
use crate::infrastructure::config::Config;
use colored::Colorize;
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    terminal::{disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
        LeaveAlternateScreen},
};
use std::io::{self, IsTerminal, Write};

/// RAII 终端守卫
///
/// 进入备用屏幕并开启 raw 模式（关闭回显）；Drop 时无条件恢复，
/// 保证正常退出、激活、错误乃至 panic 的每条退出路径都还原终端。
/// raw 模式下 Ctrl-C / Ctrl-Z 以按键事件送达而不是信号，因此
/// 中断的清理路径与普通按键完全相同。
struct TerminalGuard;

impl TerminalGuard {
    fn acquire() -> AppResult<Self> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen, cursor::Hide)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        // 尽力恢复，忽略清理过程中的错误
        let _ = execute!(io::stdout(), cursor::Show, LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}

/// 选择器的退出结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// 用户选中了一个要激活的版本
    Activate(Version),
    /// 无副作用退出
    Quit,
}

/// 交互式版本选择器
///
/// 单线程阻塞式按键循环，状态就是已安装列表加一个选中下标。
pub struct InteractiveSelector {
    installed: Vec<Version>,
    active: Option<Version>,
    selected: usize,
}

impl InteractiveSelector {
    /// 进入前的环境检查
    ///
    /// 非交互模式、标准输出不是终端、或者没有任何已安装版本时，
    /// 都拒绝进入。
    pub fn new(config: &Config, store: &VersionStore) -> AppResult<Self> {
        if config.non_interactive {
            return Err(AppError::interactive_unavailable("当前为非交互模式 (-y)"));
        }
        let installed = store.list_installed()?;
        if installed.is_empty() {
            return Err(AppError::interactive_unavailable(
                "尚未安装任何版本，先试试 `govm install latest`",
            ));
        }
        if !io::stdout().is_terminal() {
            return Err(AppError::interactive_unavailable("标准输出不是终端"));
        }

        let active = store.current_active();
        let selected = active
            .as_ref()
            .and_then(|a| installed.iter().position(|v| v == a))
            .unwrap_or(0);

        Ok(Self {
            installed,
            active,
            selected,
        })
    }

    /// 阻塞式按键循环，返回用户的选择
    pub fn run(&mut self) -> AppResult<Selection> {
        let _guard = TerminalGuard::acquire()?;
        self.render()?;

        loop {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let before = self.selected;
                if let Some(selection) = self.transition(key) {
                    return Ok(selection);
                }
                if self.selected != before {
                    self.render()?;
                }
            }
        }
    }

    /// 单按键状态转移，不做任何 IO；Some 表示离开循环
    ///
    /// 转移表：↑/k 选上一个，↓/j 选下一个（两端停住不回绕），
    /// Enter 激活选中项，q/Esc/Ctrl-C/Ctrl-Z 无副作用退出，
    /// 其余按键一律忽略。重绘由调用方在下标变化后执行。
    fn transition(&mut self, key: KeyEvent) -> Option<Selection> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('z') if ctrl => Some(Selection::Quit),
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected = (self.selected + 1).min(self.installed.len() - 1);
                None
            }
            KeyCode::Char('q') | KeyCode::Esc => Some(Selection::Quit),
            KeyCode::Enter => Some(Selection::Activate(self.installed[self.selected].clone())),
            _ => None,
        }
    }

    /// 重绘整个列表：激活版本标 *，选中行高亮
    fn render(&self) -> AppResult<()> {
        let mut out = io::stdout();
        queue!(out, cursor::MoveTo(0, 0), Clear(ClearType::All))?;
        write!(
            out,
            "govm - 选择要激活的 Go 版本（↑/k ↓/j 移动，Enter 激活，q 退出）\r\n\r\n"
        )?;

        for (index, version) in self.installed.iter().enumerate() {
            let marker = if self.active.as_ref() == Some(version) {
                "*"
            } else {
                " "
            };
            let line = format!("{marker} {version}");
            if index == self.selected {
                write!(out, "> {}\r\n", line.cyan().bold())?;
            } else {
                write!(out, "  {line}\r\n")?;
            }
        }

        out.flush()?;
        Ok(())
    }
}
