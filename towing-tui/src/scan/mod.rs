//! Photo-to-activities extraction.
//!
//! A handwritten work order photographed on site goes to a vision model,
//! which answers with a JSON list of activity candidates. Anything the
//! model leaves out is defaulted rather than rejected.

mod gemini;

pub use gemini::GeminiExtractor;

use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use serde::Deserialize;
use towing_core::domain::Activity;

pub const PLACEHOLDER_DESCRIPTION: &str = "Scanned activity";

/// One activity candidate as the model reports it. Every field is
/// optional; defaulting happens in [`materialize`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScannedActivity {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("scan request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unusable scan response: {0}")]
    Malformed(String),
}

#[async_trait]
pub trait ActivityExtractor: Send + Sync {
    async fn extract(
        &self,
        image: &[u8],
        mime_type: &str,
    ) -> Result<Vec<ScannedActivity>, ExtractError>;
}

/// Turn model output into domain activities, filling the gaps: missing
/// description gets a placeholder, missing start falls back to today,
/// missing end to a week out. Unparseable dates count as missing.
pub fn materialize(scanned: Vec<ScannedActivity>, today: NaiveDate) -> Vec<Activity> {
    let week_out = today.checked_add_days(Days::new(7)).unwrap_or(today);
    scanned
        .into_iter()
        .map(|s| {
            let description = s
                .description
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| PLACEHOLDER_DESCRIPTION.to_string());
            let start = s
                .start_date
                .as_deref()
                .and_then(parse_model_date)
                .unwrap_or(today);
            let end = s
                .end_date
                .as_deref()
                .and_then(parse_model_date)
                .unwrap_or(week_out);
            Activity::new(description, start, end)
        })
        .collect()
}

fn parse_model_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// Guess the mime type from the image path extension.
pub fn mime_for_path(path: &std::path::Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        _ => "image/jpeg",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockExtractor {
        response: Vec<ScannedActivity>,
    }

    #[async_trait]
    impl ActivityExtractor for MockExtractor {
        async fn extract(
            &self,
            _image: &[u8],
            _mime_type: &str,
        ) -> Result<Vec<ScannedActivity>, ExtractError> {
            Ok(self.response.clone())
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn mock_roundtrip_with_defaults() {
        let extractor = MockExtractor {
            response: vec![
                ScannedActivity {
                    description: Some("Replace propeller shaft".into()),
                    start_date: Some("2024-02-01".into()),
                    end_date: Some("2024-02-05".into()),
                },
                ScannedActivity {
                    description: None,
                    start_date: None,
                    end_date: None,
                },
            ],
        };
        let scanned = extractor.extract(b"img", "image/jpeg").await.unwrap();
        let today = day(2024, 1, 15);
        let activities = materialize(scanned, today);

        assert_eq!(activities.len(), 2);
        assert_eq!(activities[0].description, "Replace propeller shaft");
        assert_eq!(activities[0].start_date, day(2024, 2, 1));

        assert_eq!(activities[1].description, PLACEHOLDER_DESCRIPTION);
        assert_eq!(activities[1].start_date, today);
        assert_eq!(activities[1].end_date, day(2024, 1, 22));
    }

    #[test]
    fn garbage_dates_fall_back() {
        let activities = materialize(
            vec![ScannedActivity {
                description: Some("Paint hull".into()),
                start_date: Some("soon".into()),
                end_date: Some("01/02/2024".into()),
            }],
            day(2024, 1, 15),
        );
        assert_eq!(activities[0].start_date, day(2024, 1, 15));
        assert_eq!(activities[0].end_date, day(2024, 1, 22));
    }

    #[test]
    fn blank_description_gets_placeholder() {
        let activities = materialize(
            vec![ScannedActivity {
                description: Some("   ".into()),
                start_date: None,
                end_date: None,
            }],
            day(2024, 1, 15),
        );
        assert_eq!(activities[0].description, PLACEHOLDER_DESCRIPTION);
    }

    #[test]
    fn mime_guess_defaults_to_jpeg() {
        use std::path::Path;
        assert_eq!(mime_for_path(Path::new("order.PNG")), "image/png");
        assert_eq!(mime_for_path(Path::new("order.jpg")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("order")), "image/jpeg");
    }
}
