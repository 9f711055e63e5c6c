//! APIレスポンスパーサー
//!
//! AIのレスポンステキストからJSONを抽出し、
//! 照合結果（questionText / answer / reason）に変換する

use crate::error::{Error, Result};
use crate::types::MatchResult;
use serde_json::{Map, Value};

/// APIレスポンスからJSON部分を抽出
///
/// 抽出優先順位:
/// 1. ```json ... ``` ブロック
/// 2. 生の {...} オブジェクト または [...] 配列（先に現れた方）
/// 3. エラー
///
/// # Examples
/// ```
/// use quiz_snap_common::extract_json;
///
/// let response = "結果: {\"answer\": \"4\"}";
/// let json = extract_json(response).unwrap();
/// assert_eq!(json, "{\"answer\": \"4\"}");
/// ```
pub fn extract_json(response: &str) -> Result<&str> {
    // ```json ... ``` ブロックを探す
    if let Some(start_marker) = response.find("```json") {
        let start = start_marker + 7; // "```json" の長さ
        if let Some(end_offset) = response[start..].find("```") {
            let end = start + end_offset;
            return Ok(response[start..end].trim());
        }
    }

    let object = response.find('{').map(|i| (i, '}'));
    let array = response.find('[').map(|i| (i, ']'));
    let first = match (object, array) {
        (Some(o), Some(a)) => Some(if o.0 < a.0 { o } else { a }),
        (o, a) => o.or(a),
    };

    if let Some((start, close)) = first {
        if let Some(end) = response.rfind(close) {
            if end > start {
                return Ok(&response[start..=end]);
            }
        }
    }

    Err(Error::MatchFormat("JSONが見つかりません".into()))
}

/// 照合レスポンスをパース
///
/// 1要素の配列で包まれたオブジェクトも受け付ける。
/// 3フィールドのいずれかが欠けている、または文字列でない場合はエラー。
pub fn parse_match_response(response: &str) -> Result<MatchResult> {
    let json_str = extract_json(response)?;
    let value: Value = serde_json::from_str(json_str.trim())
        .map_err(|e| Error::MatchFormat(format!("JSONパースエラー: {}", e)))?;

    let value = match value {
        Value::Array(items) if items.len() == 1 => items.into_iter().next().unwrap_or(Value::Null),
        other => other,
    };

    let Some(map) = value.as_object() else {
        return Err(Error::MatchFormat("JSONオブジェクトではありません".into()));
    };

    Ok(MatchResult {
        question_text: required_string(map, "questionText")?,
        answer: required_string(map, "answer")?,
        reason: required_string(map, "reason")?,
    })
}

fn required_string(map: &Map<String, Value>, key: &str) -> Result<String> {
    match map.get(key) {
        Some(Value::String(s)) => Ok(s.trim().to_string()),
        Some(other) => Err(Error::MatchFormat(format!(
            "{} が文字列ではありません: {}",
            key, other
        ))),
        None => Err(Error::MatchFormat(format!("{} がありません", key))),
    }
}
