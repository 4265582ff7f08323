//! 用户交互端口
//!
//! 核心流程只在运行边界调用这些方法（无事可做、分拣完成、压缩选项、最终汇总），
//! 循环中只推送进度。

use std::cell::RefCell;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process::Command;
use tracing::{debug, info};

/// 三选一的回答
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Yes,
    No,
    Cancel,
}

/// 分拣进度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub current: usize,
    pub total: usize,
    pub processed: usize,
    pub errors: usize,
    pub duplicates: usize,
}

pub trait Notifier {
    /// 提示信息，用户确认即可
    fn inform(&self, title: &str, message: &str);

    /// 是/否
    fn confirm(&self, title: &str, message: &str) -> bool;

    /// 是/否/取消
    fn choose(&self, title: &str, message: &str) -> Choice;

    /// 每处理完一份文档调用一次
    fn progress(&self, update: &ProgressUpdate);

    /// 用系统默认程序打开文件
    fn open_with_default(&self, path: &Path) -> io::Result<()>;
}

/// 控制台实现：消息打印到 stdout，从 stdin 读回答
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self
    }

    fn show(&self, title: &str, message: &str) {
        println!("\n=== {} ===\n{}\n", title, message);
    }

    fn read_answer(&self, prompt: &str) -> Option<String> {
        print!("{} ", prompt);
        io::stdout().flush().ok()?;
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim().to_lowercase()),
        }
    }
}

impl Notifier for ConsoleNotifier {
    fn inform(&self, title: &str, message: &str) {
        self.show(title, message);
    }

    fn confirm(&self, title: &str, message: &str) -> bool {
        self.show(title, message);
        matches!(
            self.read_answer("[s/n]").as_deref(),
            Some("s" | "sim" | "y" | "yes")
        )
    }

    fn choose(&self, title: &str, message: &str) -> Choice {
        self.show(title, message);
        match self.read_answer("[s/n/c]").as_deref() {
            Some("s" | "sim" | "y" | "yes") => Choice::Yes,
            Some("n" | "nao" | "não" | "no") => Choice::No,
            _ => Choice::Cancel,
        }
    }

    fn progress(&self, update: &ProgressUpdate) {
        eprint!(
            "\rSeparando CT-es [{}/{}] OK: {} | Erros: {} | Duplicados: {}",
            update.current, update.total, update.processed, update.errors, update.duplicates
        );
        if update.current == update.total {
            eprintln!();
        }
    }

    fn open_with_default(&self, path: &Path) -> io::Result<()> {
        let mut cmd = if cfg!(target_os = "windows") {
            let mut c = Command::new("cmd");
            c.args(["/C", "start", ""]);
            c
        } else if cfg!(target_os = "macos") {
            Command::new("open")
        } else {
            Command::new("xdg-open")
        };
        cmd.arg(path).spawn().map(|_| ())
    }
}

/// 无界面实现：按预设回答，记录所有展示过的消息和进度
#[derive(Debug)]
pub struct HeadlessNotifier {
    confirm_answer: bool,
    choice_answer: Choice,
    messages: RefCell<Vec<(String, String)>>,
    progress: RefCell<Vec<ProgressUpdate>>,
}

impl HeadlessNotifier {
    pub fn new(confirm_answer: bool, choice_answer: Choice) -> Self {
        Self {
            confirm_answer,
            choice_answer,
            messages: RefCell::new(Vec::new()),
            progress: RefCell::new(Vec::new()),
        }
    }

    /// 所有 confirm 回答"否"、所有三选一回答"取消"
    pub fn declining() -> Self {
        Self::new(false, Choice::Cancel)
    }

    /// 已展示的 (标题, 内容)
    pub fn messages(&self) -> Vec<(String, String)> {
        self.messages.borrow().clone()
    }

    /// 已推送的进度，按推送顺序
    pub fn progress_updates(&self) -> Vec<ProgressUpdate> {
        self.progress.borrow().clone()
    }

    fn record(&self, title: &str, message: &str) {
        info!("[{}] {}", title, message.replace('\n', " | "));
        self.messages
            .borrow_mut()
            .push((title.to_string(), message.to_string()));
    }
}

impl Notifier for HeadlessNotifier {
    fn inform(&self, title: &str, message: &str) {
        self.record(title, message);
    }

    fn confirm(&self, title: &str, message: &str) -> bool {
        self.record(title, message);
        self.confirm_answer
    }

    fn choose(&self, title: &str, message: &str) -> Choice {
        self.record(title, message);
        self.choice_answer
    }

    fn progress(&self, update: &ProgressUpdate) {
        debug!(
            "进度 {}/{} - OK: {} 错误: {} 重复: {}",
            update.current, update.total, update.processed, update.errors, update.duplicates
        );
        self.progress.borrow_mut().push(*update);
    }

    fn open_with_default(&self, path: &Path) -> io::Result<()> {
        info!("无界面模式，不打开文件: {}", path.display());
        Ok(())
    }
}
