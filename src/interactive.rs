//! 対話モード
//!
//! 1行ずつコマンドを受け付け、セッションアクターへ操作を送る。
//! 問題集が未読込の間は照合操作を受け付けない。

use crate::capture;
use crate::display::{print_history, print_result};
use crate::error::{QuizSnapError, Result};
use crate::progress::processing_spinner;
use crate::session::SessionHandle;
use dialoguer::Input;
use std::path::{Path, PathBuf};

/// 対話アクション
#[derive(Debug, PartialEq, Eq)]
pub enum SessionAction {
    /// 問題集を読み込み（置き換え）
    LoadBank(PathBuf),
    /// 問題集を外す
    ClearBank,
    /// 画像を照合
    Capture(PathBuf),
    /// 履歴を表示
    History,
    /// 表示中の結果を閉じる
    CloseResult,
    /// 状態を表示
    Status,
    Help,
    Quit,
    Empty,
}

const HELP: &str = "\
操作:
  <画像パス>     写真・スクリーンショットを照合
  l <ファイル>   問題集を読み込み（置き換え）
  c              問題集を外す
  h              最近の検索（最大10件）
  x              結果を閉じる
  s              状態表示
  ?              このヘルプ
  q              終了";

/// 入力行をアクションに変換
pub fn parse_action(input: &str) -> SessionAction {
    let trimmed = input.trim();

    match trimmed {
        "" => SessionAction::Empty,
        "q" | "Q" | "quit" | "exit" => SessionAction::Quit,
        "h" | "history" => SessionAction::History,
        "x" | "close" => SessionAction::CloseResult,
        "c" | "clear" => SessionAction::ClearBank,
        "s" | "status" => SessionAction::Status,
        "?" | "help" => SessionAction::Help,
        _ => {
            if let Some(rest) = trimmed.strip_prefix("l ") {
                SessionAction::LoadBank(unquote_path(rest))
            } else {
                SessionAction::Capture(unquote_path(trimmed))
            }
        }
    }
}

/// ドラッグ&ドロップで付くクォートを外す
fn unquote_path(raw: &str) -> PathBuf {
    let raw = raw.trim();
    let unquoted = raw
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .or_else(|| raw.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')))
        .unwrap_or(raw);
    PathBuf::from(unquoted)
}

/// 対話モードを実行
pub async fn run_interactive_session(session: &SessionHandle, initial_bank: Option<&Path>) -> Result<()> {
    println!("📚 quiz-snap - 対話モード");
    println!("---\n{}\n---\n", HELP);

    if let Some(path) = initial_bank {
        load_bank(session, path.to_path_buf()).await?;
    }

    loop {
        let snapshot = session.snapshot().await?;
        let prompt = match &snapshot.bank_name {
            Some(name) => format!("[{}] 画像パス / コマンド", name),
            None => "[問題集未読込] l <ファイル> / コマンド".to_string(),
        };

        let line = read_line(prompt).await?;

        match parse_action(&line) {
            SessionAction::Empty => {}
            SessionAction::Quit => {
                println!("終了します");
                break;
            }
            SessionAction::Help => println!("{}", HELP),
            SessionAction::LoadBank(path) => load_bank(session, path).await?,
            SessionAction::ClearBank => {
                session.clear_bank().await?;
                println!("✔ 問題集を外しました");
            }
            SessionAction::History => print_history(&snapshot.history),
            SessionAction::CloseResult => session.close_result().await?,
            SessionAction::Status => {
                match &snapshot.bank_name {
                    Some(name) => println!("問題集: {} ({}行) - 準備完了", name, snapshot.bank_rows),
                    None => println!("問題集: 未読込"),
                }
                println!("履歴: {}件", snapshot.history.len());
                if let Some(current) = &snapshot.current {
                    print_result(current);
                }
            }
            SessionAction::Capture(path) => {
                if !snapshot.has_bank() {
                    println!("⚠ 先に問題集を読み込んでください (l <ファイル>)");
                    continue;
                }
                capture_and_show(session, &path).await?;
            }
        }
    }

    Ok(())
}

async fn read_line(prompt: String) -> Result<String> {
    let line = tokio::task::spawn_blocking(move || {
        Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
    })
    .await?
    .map_err(|e| QuizSnapError::Prompt(e.to_string()))?;
    Ok(line)
}

/// 問題集の読み込み。失敗しても既存の問題集は残り、対話は続行
async fn load_bank(session: &SessionHandle, path: PathBuf) -> Result<()> {
    match session.load_bank_file(path.clone()).await {
        Ok(bank) => {
            println!("✔ 問題集を読み込みました: {} ({}行)", bank.name(), bank.rows());
            Ok(())
        }
        Err(QuizSnapError::SessionClosed) => Err(QuizSnapError::SessionClosed),
        Err(e) => {
            println!("✖ {}", e);
            Ok(())
        }
    }
}

/// 照合して結果を表示。照合失敗は共通メッセージのみ表示して続行
async fn capture_and_show(session: &SessionHandle, path: &Path) -> Result<()> {
    let image = match capture::read_image(path).await {
        Ok(image) => image,
        Err(e) => {
            log::debug!("画像読み込み失敗: {}", e);
            println!("✖ {}", e.user_notice());
            return Ok(());
        }
    };

    let spinner = processing_spinner("AIが問題集を検索中...");
    let outcome = session.capture(image).await;
    spinner.finish_and_clear();

    match outcome {
        Ok(result) => print_result(&result),
        Err(QuizSnapError::SessionClosed) => return Err(QuizSnapError::SessionClosed),
        Err(e) => {
            log::debug!("照合失敗の詳細: {:?}", e);
            println!("✖ {}", e.user_notice());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_action(""), SessionAction::Empty);
        assert_eq!(parse_action("  "), SessionAction::Empty);
        assert_eq!(parse_action("q"), SessionAction::Quit);
        assert_eq!(parse_action("h"), SessionAction::History);
        assert_eq!(parse_action("x"), SessionAction::CloseResult);
        assert_eq!(parse_action("c"), SessionAction::ClearBank);
        assert_eq!(parse_action("s"), SessionAction::Status);
        assert_eq!(parse_action("?"), SessionAction::Help);
    }

    #[test]
    fn test_parse_load_bank() {
        assert_eq!(
            parse_action("l 問題集.xlsx"),
            SessionAction::LoadBank(PathBuf::from("問題集.xlsx"))
        );
        assert_eq!(
            parse_action("l \"/tmp/my bank.xlsx\""),
            SessionAction::LoadBank(PathBuf::from("/tmp/my bank.xlsx"))
        );
    }

    #[test]
    fn test_parse_capture_path() {
        assert_eq!(
            parse_action("shots/q1.png"),
            SessionAction::Capture(PathBuf::from("shots/q1.png"))
        );
        assert_eq!(
            parse_action("'/tmp/screen shot.png'"),
            SessionAction::Capture(PathBuf::from("/tmp/screen shot.png"))
        );
    }
}
