//! 照合パイプライン
//!
//! 画像エンコード → リクエスト構築 → サービス呼び出し → 3フィールドに正規化。
//! 再試行・キャッシュは行わない（同じ入力でも結果が一致するとは限らない）。

use crate::error::Result;
use crate::service::{MatchRequest, VisionMatchService};
use quiz_snap_common::{parse_match_response, CapturedImage, MatchResult, QuestionBank};
use std::time::Instant;

/// 画像1枚を問題集と照合
///
/// 問題集が読み込まれていない場合は呼び出し側（セッション）で弾くこと。
pub async fn run_match<S: VisionMatchService>(
    service: &S,
    image: &CapturedImage,
    bank: &QuestionBank,
) -> Result<MatchResult> {
    let request = MatchRequest::new(bank, image.encode());

    log::debug!(
        "照合開始: {} ({}) × 問題集 {} ({}行)",
        image.file_name,
        image.mime_type,
        bank.name(),
        bank.rows()
    );
    let started = Instant::now();

    let response = service.find_answer(&request).await?;

    log::debug!(
        "レスポンス受信: {} chars, {:.1}s",
        response.len(),
        started.elapsed().as_secs_f32()
    );

    let result = parse_match_response(&response)?;
    Ok(result)
}
