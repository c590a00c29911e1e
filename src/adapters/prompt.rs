use crate::domain::ports::Prompt;
use crate::utils::error::{Result, WatchError};
use async_trait::async_trait;
use std::io::{self, BufRead, Write};

/// 從標準輸入讀取一行，讀取在 blocking 執行緒上進行
pub struct StdinPrompt;

#[async_trait]
impl Prompt for StdinPrompt {
    async fn ask(&self, message: &str) -> Result<String> {
        let message = message.to_string();
        tokio::task::spawn_blocking(move || -> Result<String> {
            let mut stdout = io::stdout();
            write!(stdout, "{}", message)?;
            stdout.flush()?;

            read_answer(&mut io::stdin().lock())
        })
        .await
        .map_err(|e| WatchError::InputError {
            message: format!("prompt task failed: {}", e),
        })?
    }
}

/// 讀取一行回答；輸入已關閉 (EOF) 視為使用者輸入錯誤而非 I/O 故障
pub(crate) fn read_answer<R: BufRead>(reader: &mut R) -> Result<String> {
    let mut input = String::new();
    if reader.read_line(&mut input)? == 0 {
        return Err(WatchError::InputError {
            message: "stdin closed before an answer was entered".to_string(),
        });
    }
    non_empty_answer(&input)
}

pub(crate) fn non_empty_answer(line: &str) -> Result<String> {
    let answer = line.trim();
    if answer.is_empty() {
        return Err(WatchError::InputError {
            message: "no value entered".to_string(),
        });
    }
    Ok(answer.to_string())
}
