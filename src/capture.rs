//! 撮影画像の読み込み
//!
//! ファイルを読み込み、マジックバイト（不明なら拡張子）からMIMEタイプを判定する。

use crate::error::{QuizSnapError, Result};
use image::ImageFormat;
use quiz_snap_common::{CapturedImage, Error as CommonError};
use std::path::Path;

/// 画像ファイルを読み込んで CapturedImage を生成
pub async fn read_image(path: &Path) -> Result<CapturedImage> {
    if !path.exists() {
        return Err(QuizSnapError::FileNotFound(path.display().to_string()));
    }

    let bytes = tokio::fs::read(path).await?;
    let mime_type = detect_mime_type(path, &bytes).ok_or_else(|| {
        CommonError::Image(format!("対応していない画像形式です: {}", path.display()))
    })?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    log::debug!("画像読み込み: {} ({}, {} bytes)", file_name, mime_type, bytes.len());

    Ok(CapturedImage::new(file_name, mime_type, bytes)?)
}

/// MIMEタイプを判定
pub fn detect_mime_type(path: &Path, bytes: &[u8]) -> Option<&'static str> {
    image::guess_format(bytes)
        .ok()
        .or_else(|| ImageFormat::from_path(path).ok())
        .map(|format| format.to_mime_type())
}
