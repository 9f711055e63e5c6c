//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// 問題集ファイルを読み取れない（破損・非対応形式・空シート）
    #[error("問題集の読み込みに失敗: {0}")]
    BankDecode(String),

    /// AIレスポンスが期待する3フィールド形式ではない
    #[error("レスポンス形式が不正: {0}")]
    MatchFormat(String),

    #[error("画像エラー: {0}")]
    Image(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
