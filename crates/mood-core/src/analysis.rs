//! Emotion analysis results.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::emotion::Emotion;
use crate::errors::CoreError;

/// Outcome of one analysis request: per-label confidence scores (percent)
/// plus the label the service designated as dominant.
///
/// The dominant label is always a key of `emotions`; deserialization rejects
/// payloads that break this. Scores are passed through as reported and are
/// not required to sum to 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AnalysisWire")]
pub struct EmotionAnalysis {
    dominant_emotion: Emotion,
    emotions: BTreeMap<Emotion, f64>,
}

#[derive(Deserialize)]
struct AnalysisWire {
    dominant_emotion: Emotion,
    emotions: BTreeMap<Emotion, f64>,
}

impl TryFrom<AnalysisWire> for EmotionAnalysis {
    type Error = CoreError;

    fn try_from(wire: AnalysisWire) -> Result<Self, Self::Error> {
        Self::new(wire.dominant_emotion, wire.emotions)
    }
}

impl EmotionAnalysis {
    /// Build a result, checking that `dominant` is one of the scored labels.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] if `dominant` is not a key of `emotions`.
    pub fn new(dominant: Emotion, emotions: BTreeMap<Emotion, f64>) -> Result<Self, CoreError> {
        if !emotions.contains_key(&dominant) {
            return Err(CoreError::Validation(format!(
                "dominant emotion '{dominant}' is missing from the score map"
            )));
        }
        Ok(Self {
            dominant_emotion: dominant,
            emotions,
        })
    }

    #[must_use]
    pub const fn dominant_emotion(&self) -> Emotion {
        self.dominant_emotion
    }

    #[must_use]
    pub const fn emotions(&self) -> &BTreeMap<Emotion, f64> {
        &self.emotions
    }

    /// Score reported for the dominant label.
    #[must_use]
    pub fn dominant_score(&self) -> f64 {
        self.emotions
            .get(&self.dominant_emotion)
            .copied()
            .unwrap_or_default()
    }

    /// Scores ordered from highest to lowest confidence.
    #[must_use]
    pub fn ranked(&self) -> Vec<(Emotion, f64)> {
        let mut ranked: Vec<(Emotion, f64)> =
            self.emotions.iter().map(|(e, s)| (*e, *s)).collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const HAPPY_FIXTURE: &str = r#"{
        "dominant_emotion": "happy",
        "emotions": {
            "angry": 0.4,
            "disgust": 0.0,
            "fear": 0.9,
            "happy": 92.3,
            "sad": 1.2,
            "surprise": 0.1,
            "neutral": 5.1
        }
    }"#;

    #[test]
    fn parses_service_payload() {
        let analysis: EmotionAnalysis = serde_json::from_str(HAPPY_FIXTURE).unwrap();
        assert_eq!(analysis.dominant_emotion(), Emotion::Happy);
        assert_eq!(analysis.emotions().len(), 7);
        assert!((analysis.dominant_score() - 92.3).abs() < f64::EPSILON);
    }

    #[test]
    fn ranked_orders_by_score_descending() {
        let analysis: EmotionAnalysis = serde_json::from_str(HAPPY_FIXTURE).unwrap();
        let top: Vec<Emotion> = analysis.ranked().into_iter().take(3).map(|(e, _)| e).collect();
        assert_eq!(top, vec![Emotion::Happy, Emotion::Neutral, Emotion::Sad]);
    }

    #[test]
    fn rejects_dominant_missing_from_scores() {
        let json = r#"{"dominant_emotion": "sad", "emotions": {"happy": 80.0}}"#;
        let err = serde_json::from_str::<EmotionAnalysis>(json).unwrap_err();
        assert!(err.to_string().contains("missing from the score map"));
    }

    #[test]
    fn rejects_missing_fields() {
        assert!(serde_json::from_str::<EmotionAnalysis>(r#"{"emotions": {}}"#).is_err());
        assert!(serde_json::from_str::<EmotionAnalysis>(r#"{"dominant_emotion": "sad"}"#).is_err());
    }

    #[test]
    fn rejects_unknown_labels() {
        let json = r#"{"dominant_emotion": "contempt", "emotions": {"contempt": 50.0}}"#;
        assert!(serde_json::from_str::<EmotionAnalysis>(json).is_err());
    }

    #[test]
    fn scores_need_not_sum_to_one_hundred() {
        let mut scores = BTreeMap::new();
        scores.insert(Emotion::Angry, 10.0);
        scores.insert(Emotion::Fear, 12.5);
        let analysis = EmotionAnalysis::new(Emotion::Fear, scores).unwrap();
        assert_eq!(analysis.dominant_emotion(), Emotion::Fear);
    }
}
