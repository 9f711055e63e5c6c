//! 照合結果・問題集の型定義
//!
//! CLIとテストで共有される型:
//! - QuestionBank: Excel/CSVを平坦化した問題集テキスト
//! - MatchResult: AIが返す「問題・解答・理由」の3項目

use serde::{Deserialize, Serialize};

/// 読み込み済みの問題集
///
/// 第1シートをカンマ区切りテキストに平坦化したもの。
/// `bank::load` 以外からは生成されないため、常に1行以上を含む。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBank {
    name: String,
    text: String,
    rows: usize,
}

impl QuestionBank {
    pub(crate) fn new(name: impl Into<String>, text: String, rows: usize) -> Self {
        Self {
            name: name.into(),
            text,
            rows,
        }
    }

    /// 元ファイル名（表示用）
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 平坦化された問題集テキスト
    pub fn text(&self) -> &str {
        &self.text
    }

    /// 出力行数（空行を除く）
    pub fn rows(&self) -> usize {
        self.rows
    }
}

/// 照合結果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    /// 画像から読み取った問題文
    pub question_text: String,
    /// 問題集から選ばれた解答
    pub answer: String,
    /// 照合理由・解説
    pub reason: String,
}

impl MatchResult {
    /// 解答の先頭 `max_chars` 文字（履歴一覧の表示用）
    pub fn answer_preview(&self, max_chars: usize) -> String {
        self.answer.chars().take(max_chars).collect()
    }
}
