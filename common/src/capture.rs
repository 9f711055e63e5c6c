//! 撮影画像のエンコード
//!
//! 画像バイト列をMIMEタイプ付きのBase64に変換する。
//! AI側が形式とデータを一意に受け取れるよう、常に (mime_type, data) の組で扱う。

use crate::error::{Error, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// 1回の選択で取り込んだ画像（照合リクエストの間だけ保持）
#[derive(Debug, Clone)]
pub struct CapturedImage {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Base64エンコード済み画像
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub mime_type: String,
    pub data: String,
}

impl CapturedImage {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Result<Self> {
        let mime_type = mime_type.into();
        if !mime_type.starts_with("image/") {
            return Err(Error::Image(format!("画像形式ではありません: {}", mime_type)));
        }
        if bytes.is_empty() {
            return Err(Error::Image("画像データが空です".into()));
        }
        Ok(Self {
            file_name: file_name.into(),
            mime_type,
            bytes,
        })
    }

    pub fn encode(&self) -> EncodedImage {
        EncodedImage {
            mime_type: self.mime_type.clone(),
            data: STANDARD.encode(&self.bytes),
        }
    }
}
