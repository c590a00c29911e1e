use crate::config::toml_config::NotificationConfig;
use crate::domain::model::AvailableSlot;
use crate::domain::ports::Notifier;
use std::io::{self, Stdout, Write};
use std::process::{Command, Stdio};
use std::sync::Mutex;
use std::thread;

pub fn format_slot_message(location_name: &str, slot: &AvailableSlot) -> String {
    format!(
        "{} slots are available in {} in center {} on {}",
        slot.session.available_capacity, location_name, slot.center.name, slot.session.date
    )
}

/// 將符合條件的時段輸出到終端機（或任何 writer）
pub struct ConsoleNotifier<W: Write + Send = Stdout> {
    writer: Mutex<W>,
}

impl ConsoleNotifier<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> ConsoleNotifier<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }
}

impl<W: Write + Send> Notifier for ConsoleNotifier<W> {
    fn name(&self) -> &str {
        "console"
    }

    fn notify(&self, location_name: &str, slot: &AvailableSlot) {
        let message = format_slot_message(location_name, slot);
        let Ok(mut writer) = self.writer.lock() else {
            tracing::warn!("console writer lock poisoned, dropping: {}", message);
            return;
        };

        if let Err(e) = writeln!(writer, "{}", message).and_then(|_| writer.flush()) {
            tracing::warn!("Failed to write notification to console: {}", e);
        }
    }
}

/// 桌面通知：Linux 使用 notify-send，macOS 使用 osascript。
/// 只負責啟動外部程式，不等待也不保證送達。
pub struct DesktopNotifier {
    title: String,
}

impl DesktopNotifier {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }

    fn command(&self, body: &str) -> Command {
        if cfg!(target_os = "macos") {
            let script = format!(
                "display notification \"{}\" with title \"{}\"",
                escape_applescript(body),
                escape_applescript(&self.title)
            );
            let mut command = Command::new("osascript");
            command.arg("-e").arg(script);
            command
        } else {
            let mut command = Command::new("notify-send");
            command.arg(&self.title).arg(body);
            command
        }
    }
}

impl Default for DesktopNotifier {
    fn default() -> Self {
        Self::new("Vaccination slots available")
    }
}

fn escape_applescript(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

impl Notifier for DesktopNotifier {
    fn name(&self) -> &str {
        "desktop"
    }

    fn notify(&self, location_name: &str, slot: &AvailableSlot) {
        let body = format_slot_message(location_name, slot);
        if let Err(e) = spawn_detached(self.command(&body)) {
            tracing::debug!("Desktop notification unavailable: {}", e);
        }
    }
}

/// 啟動外部程式但不阻塞輪詢；子程序由背景執行緒回收，避免殭屍程序累積
fn spawn_detached(mut command: Command) -> io::Result<thread::JoinHandle<()>> {
    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    Ok(thread::spawn(move || {
        if let Err(e) = child.wait() {
            tracing::debug!("Failed to reap notification process: {}", e);
        }
    }))
}

/// 依設定建立通知出口
pub fn notifiers_from_config(config: &NotificationConfig) -> Vec<Box<dyn Notifier>> {
    let mut notifiers: Vec<Box<dyn Notifier>> = Vec::new();
    if config.console {
        notifiers.push(Box::new(ConsoleNotifier::stdout()));
    }
    if config.desktop {
        notifiers.push(Box::new(DesktopNotifier::default()));
    }
    notifiers
}
