//! Gemini API連携
//!
//! generateContent に [指示文, 問題集, 画像] の3パートを送り、
//! responseSchema で3フィールドのJSONを要求する。

use super::{MatchRequest, VisionMatchService};
use crate::config::Config;
use crate::error::{QuizSnapError, Result};
use quiz_snap_common::{build_bank_section, Error as CommonError, MATCH_FIELDS};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;

/// エラー本文をログ・メッセージに含める最大文字数
const ERROR_BODY_PREVIEW: usize = 200;

/// Gemini APIリクエスト
#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
    #[serde(rename = "responseSchema")]
    response_schema: Value,
}

/// Gemini APIレスポンス
#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: String,
    temperature: f32,
}

impl GeminiClient {
    pub fn new(config: &Config) -> Result<Self> {
        let api_key = config.get_api_key()?;

        let mut builder = reqwest::Client::builder();
        if let Some(seconds) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds));
        }
        let http = builder
            .build()
            .map_err(|e| QuizSnapError::Config(format!("HTTPクライアント初期化エラー: {}", e)))?;

        Ok(Self {
            http,
            api_key,
            model: config.model.clone(),
            endpoint: config.endpoint.clone(),
            temperature: config.temperature,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self) -> String {
        format!(
            "{}/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }

    fn build_request(&self, request: &MatchRequest) -> GeminiRequest {
        GeminiRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Text { text: request.instruction.clone() },
                    Part::Text { text: build_bank_section(&request.bank_text) },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: request.image.mime_type.clone(),
                            data: request.image.data.clone(),
                        },
                    },
                ],
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
                response_mime_type: "application/json".to_string(),
                response_schema: match_response_schema(),
            },
        }
    }

    async fn call(&self, body: &GeminiRequest) -> Result<String> {
        let response = self
            .http
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| QuizSnapError::ServiceUnavailable(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| QuizSnapError::ServiceUnavailable(e.to_string()))?;

        if !status.is_success() {
            let preview: String = text.chars().take(ERROR_BODY_PREVIEW).collect();
            return Err(QuizSnapError::ServiceUnavailable(format!(
                "API error {}: {}",
                status, preview
            )));
        }

        Ok(extract_candidate_text(&text)?)
    }
}

impl VisionMatchService for GeminiClient {
    async fn find_answer(&self, request: &MatchRequest) -> Result<String> {
        let body = self.build_request(request);
        log::debug!(
            "Gemini呼び出し: model={}, 問題集 {} chars, 画像 {} ({} bytes base64)",
            self.model,
            request.bank_text.len(),
            request.image.mime_type,
            request.image.data.len()
        );
        self.call(&body).await
    }
}

/// 3フィールドを必須とするレスポンススキーマ
fn match_response_schema() -> Value {
    let properties: serde_json::Map<String, Value> = MATCH_FIELDS
        .iter()
        .map(|field| (field.to_string(), json!({ "type": "STRING" })))
        .collect();

    json!({
        "type": "OBJECT",
        "properties": properties,
        "required": MATCH_FIELDS,
        "propertyOrdering": MATCH_FIELDS,
    })
}

/// レスポンスJSONから最初の候補のテキストを取り出す
fn extract_candidate_text(body: &str) -> std::result::Result<String, CommonError> {
    let response: GeminiResponse = serde_json::from_str(body)
        .map_err(|e| CommonError::MatchFormat(format!("Geminiレスポンスの解析に失敗: {}", e)))?;

    let text: String = response
        .candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .map(|content| {
            content
                .parts
                .iter()
                .filter_map(|p| p.text.as_deref())
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(CommonError::MatchFormat("Empty response".into()));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_snap_common::EncodedImage;

    fn client() -> GeminiClient {
        GeminiClient {
            http: reqwest::Client::new(),
            api_key: "test-key".to_string(),
            model: "gemini-2.0-flash".to_string(),
            endpoint: "https://example.com/v1beta/models/".to_string(),
            temperature: 0.1,
        }
    }

    fn request() -> MatchRequest {
        MatchRequest {
            instruction: "指示".to_string(),
            bank_text: "Q,A\nWhat is 2+2?,4\n".to_string(),
            image: EncodedImage {
                mime_type: "image/png".to_string(),
                data: "iVBORw==".to_string(),
            },
        }
    }

    #[test]
    fn test_url() {
        assert_eq!(
            client().url(),
            "https://example.com/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn test_request_serialize() {
        let body = client().build_request(&request());
        let json = serde_json::to_value(&body).expect("シリアライズ失敗");

        let parts = &json["contents"][0]["parts"];
        assert_eq!(parts[0]["text"], "指示");
        assert!(parts[1]["text"].as_str().unwrap().contains("What is 2+2?,4"));
        assert_eq!(parts[2]["inline_data"]["mime_type"], "image/png");
        assert_eq!(parts[2]["inline_data"]["data"], "iVBORw==");

        let config = &json["generationConfig"];
        assert_eq!(config["responseMimeType"], "application/json");
        assert_eq!(
            config["responseSchema"]["required"],
            json!(["questionText", "answer", "reason"])
        );
        assert_eq!(
            config["responseSchema"]["properties"]["answer"]["type"],
            "STRING"
        );
    }

    #[test]
    fn test_part_text_serialize() {
        let part = Part::Text { text: "Hello".to_string() };
        let json = serde_json::to_string(&part).expect("シリアライズ失敗");
        assert_eq!(json, r#"{"text":"Hello"}"#);
    }

    #[test]
    fn test_extract_candidate_text() {
        let body = r#"{
            "candidates": [{
                "content": {
                    "parts": [
                        {"text": "{\"questionText\": \"Q\","},
                        {"text": " \"answer\": \"A\", \"reason\": \"R\"}"}
                    ]
                }
            }]
        }"#;
        let text = extract_candidate_text(body).unwrap();
        assert!(text.contains("\"answer\": \"A\""));
    }

    #[test]
    fn test_extract_candidate_text_no_candidates() {
        let result = extract_candidate_text(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#);
        assert!(matches!(result, Err(CommonError::MatchFormat(_))));
    }

    #[test]
    fn test_extract_candidate_text_without_content() {
        let result = extract_candidate_text(r#"{"candidates": [{"finishReason": "SAFETY"}]}"#);
        assert!(matches!(result, Err(CommonError::MatchFormat(_))));
    }

    #[test]
    fn test_extract_candidate_text_not_json() {
        let result = extract_candidate_text("<html>bad gateway</html>");
        assert!(matches!(result, Err(CommonError::MatchFormat(_))));
    }
}
