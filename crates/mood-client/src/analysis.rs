//! Emotion analysis of a captured still.

use mood_core::EmotionAnalysis;
use reqwest::multipart::{Form, Part};

use crate::ApiClient;
use crate::error::ApiError;
use crate::http::{check_response, parse_json};

pub const ANALYZE_PATH: &str = "/analyze_face_emotion";

/// Multipart field carrying the image.
pub const IMAGE_FIELD: &str = "image_file";

const FRAME_FILE_NAME: &str = "frame.png";
const ANALYSIS_FALLBACK: &str = "Analysis error.";

impl ApiClient {
    /// Upload a PNG still and return the service's emotion distribution.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Network`] if no response arrives (including timeout).
    /// - [`ApiError::RequestFailed`] on a non-success status, carrying the
    ///   service's `detail` or `"Analysis error."`.
    /// - [`ApiError::MalformedResponse`] if the body is not a valid analysis.
    pub async fn analyze_frame(&self, png: Vec<u8>) -> Result<EmotionAnalysis, ApiError> {
        let bytes = png.len();
        let part = Part::bytes(png)
            .file_name(FRAME_FILE_NAME)
            .mime_str("image/png")?;
        let form = Form::new().part(IMAGE_FIELD, part);

        tracing::debug!(bytes, "uploading frame for analysis");
        let resp = self
            .http
            .post(self.url(ANALYZE_PATH))
            .multipart(form)
            .send()
            .await?;
        let resp = check_response(resp, ANALYSIS_FALLBACK).await?;
        let analysis: EmotionAnalysis = parse_json(resp).await?;

        tracing::info!(
            dominant = %analysis.dominant_emotion(),
            score = analysis.dominant_score(),
            "emotion analysis received"
        );
        Ok(analysis)
    }
}
