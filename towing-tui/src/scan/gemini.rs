//! Gemini-backed activity extraction over the REST generateContent API.

use async_trait::async_trait;
use base64::Engine;
use serde::Deserialize;
use serde_json::json;

use super::{ActivityExtractor, ExtractError, ScannedActivity};

pub const GEMINI_MODEL: &str = "gemini-2.0-flash";

const PROMPT: &str = "This photo shows a handwritten or printed naval work \
order. List every distinct work activity you can read. Answer with JSON \
only, shaped {\"activities\": [...]}, each element {\"description\": string, \
\"startDate\": \"YYYY-MM-DD\" or null, \"endDate\": \"YYYY-MM-DD\" or null}. \
Use null for any date you cannot read.";

#[derive(Clone)]
pub struct GeminiExtractor {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiExtractor {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_model(api_key, GEMINI_MODEL)
    }

    pub fn with_model(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

#[async_trait]
impl ActivityExtractor for GeminiExtractor {
    async fn extract(
        &self,
        image: &[u8],
        mime_type: &str,
    ) -> Result<Vec<ScannedActivity>, ExtractError> {
        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent?key={}",
            self.model, self.api_key
        );
        let encoded = base64::engine::general_purpose::STANDARD.encode(image);
        let body = json!({
            "contents": [{
                "parts": [
                    { "text": PROMPT },
                    { "inlineData": { "mimeType": mime_type, "data": encoded } },
                ],
            }],
            "generationConfig": { "responseMimeType": "application/json" },
        });

        let response: GenerateResponse = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let text = response
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.as_str())
            .ok_or_else(|| ExtractError::Malformed("empty candidate list".to_string()))?;

        parse_activity_json(text)
    }
}

#[derive(Debug, Deserialize)]
struct ActivityEnvelope {
    activities: Vec<ScannedActivity>,
}

/// The model occasionally wraps its JSON answer in a markdown fence even
/// when asked for raw JSON, so strip one before parsing. The documented
/// shape is `{"activities": [...]}`; a bare array is tolerated.
fn parse_activity_json(text: &str) -> Result<Vec<ScannedActivity>, ExtractError> {
    let trimmed = text.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|s| s.strip_suffix("```"))
        .unwrap_or(trimmed)
        .trim();
    if let Ok(envelope) = serde_json::from_str::<ActivityEnvelope>(body) {
        return Ok(envelope.activities);
    }
    serde_json::from_str(body).map_err(|e| ExtractError::Malformed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_activities_envelope() {
        let parsed = parse_activity_json(
            r#"{"activities": [{"description": "Caulk seams", "startDate": "2024-03-04"}]}"#,
        )
        .unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].description.as_deref(), Some("Caulk seams"));
        assert_eq!(parsed[0].start_date.as_deref(), Some("2024-03-04"));
    }

    #[test]
    fn parses_plain_json_array() {
        let parsed = parse_activity_json(
            r#"[{"description": "Weld rub rail", "startDate": "2024-03-01", "endDate": null}]"#,
        )
        .unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].description.as_deref(), Some("Weld rub rail"));
        assert!(parsed[0].end_date.is_none());
    }

    #[test]
    fn strips_markdown_fence() {
        let parsed =
            parse_activity_json("```json\n[{\"description\": \"Sand deck\"}]\n```").unwrap();
        assert_eq!(parsed[0].description.as_deref(), Some("Sand deck"));
    }

    #[test]
    fn rejects_non_array_payload() {
        assert!(parse_activity_json("{\"oops\": true}").is_err());
    }
}
