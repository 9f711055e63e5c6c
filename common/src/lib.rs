//! quiz-snap Common Library
//!
//! 問題集の読み込み・画像エンコード・プロンプト・レスポンス解析など、
//! フロントエンドに依存しない部分

pub mod types;
pub mod error;
pub mod bank;
pub mod capture;
pub mod prompts;
pub mod parser;
pub mod history;

pub use types::{MatchResult, QuestionBank};
pub use error::{Error, Result};
pub use bank::{BankFormat, load as load_bank, load_file as load_bank_file};
pub use capture::{CapturedImage, EncodedImage};
pub use prompts::{build_bank_section, build_match_instruction, MATCH_FIELDS};
pub use parser::{extract_json, parse_match_response};
pub use history::{HistoryLog, HISTORY_CAPACITY};
