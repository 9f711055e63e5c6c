//! 外部の画像照合サービス
//!
//! 照合パイプラインからは `VisionMatchService` だけが見える。
//! 実装は Gemini API（`gemini`）とテスト用スタブ。

mod gemini;

pub use gemini::GeminiClient;

use crate::error::Result;
use quiz_snap_common::{build_match_instruction, EncodedImage, QuestionBank};
use std::future::Future;

/// サービスへ送る1回分のリクエスト
#[derive(Debug, Clone)]
pub struct MatchRequest {
    /// 出力形式（3フィールド）を指示する文
    pub instruction: String,
    /// 問題集全文
    pub bank_text: String,
    pub image: EncodedImage,
}

impl MatchRequest {
    pub fn new(bank: &QuestionBank, image: EncodedImage) -> Self {
        Self {
            instruction: build_match_instruction(),
            bank_text: bank.text().to_string(),
            image,
        }
    }
}

/// 画像と問題集を受け取り、AIの生レスポンステキストを返す
///
/// 通信失敗・エラーステータスは `QuizSnapError::ServiceUnavailable`。
/// レスポンスの形式チェックは呼び出し側（pipeline）で行う。
pub trait VisionMatchService: Send + Sync + 'static {
    fn find_answer(&self, request: &MatchRequest) -> impl Future<Output = Result<String>> + Send;
}
