//! 照合結果・履歴の表示

use quiz_snap_common::MatchResult;

/// 履歴一覧で表示する解答の最大文字数
pub const ANSWER_PREVIEW_CHARS: usize = 20;

pub fn format_result(result: &MatchResult) -> String {
    format!(
        "── 認識と照合の結果 ──\n\
         認識した問題:\n  {}\n\
         一致した解答:\n  {}\n\
         照合理由・解説:\n  {}",
        result.question_text, result.answer, result.reason
    )
}

/// 履歴1行分（番号は1始まり）
pub fn format_history_line(index: usize, result: &MatchResult) -> String {
    format!(
        "{:>2}. {}\n    解答: {}",
        index + 1,
        result.question_text,
        result.answer_preview(ANSWER_PREVIEW_CHARS)
    )
}

pub fn print_result(result: &MatchResult) {
    println!("\n{}\n", format_result(result));
}

pub fn print_history(history: &[MatchResult]) {
    if history.is_empty() {
        println!("履歴はまだありません");
        return;
    }

    println!("最近の検索:");
    for (i, result) in history.iter().enumerate() {
        println!("{}", format_history_line(i, result));
    }
}
