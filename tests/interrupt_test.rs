#![cfg(unix)]

use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// 在等待手機號碼輸入時按下 Ctrl-C，程序必須立即結束
#[test]
fn test_interrupt_at_prompt_exits_process() {
    let mut child = Command::new(env!("CARGO_BIN_EXE_slot-notifier"))
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();
    // 保持 stdin 開啟，讓提示停在 read_line
    let _stdin = child.stdin.take().unwrap();

    thread::sleep(Duration::from_secs(1));
    let status = Command::new("kill")
        .arg("-INT")
        .arg(child.id().to_string())
        .status()
        .unwrap();
    assert!(status.success());

    let deadline = Instant::now() + Duration::from_secs(5);
    let exited = loop {
        if let Some(status) = child.try_wait().unwrap() {
            break Some(status);
        }
        if Instant::now() > deadline {
            break None;
        }
        thread::sleep(Duration::from_millis(50));
    };

    if exited.is_none() {
        let _ = child.kill();
        let _ = child.wait();
    }
    assert!(exited.is_some(), "process still running after SIGINT");
}
