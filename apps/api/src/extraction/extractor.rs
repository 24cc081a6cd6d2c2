//! CV Extractor — turns raw CV text into an ordered list of work experiences.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AppError;
use crate::extraction::prompts::{EXTRACT_PROMPT_TEMPLATE, EXTRACT_SYSTEM};
use crate::llm_client::{strip_json_fences, LlmBackend};

/// A work experience extracted from free text. Staging record only — the
/// sync workflow turns it into a persisted `Position`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkExperience {
    pub title: String,
    pub company: String,
    /// `"YYYY"` or `"YYYY-MM-DD"`.
    pub start_date: String,
    /// Same format as `start_date`; `None` means "current position".
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Extraction service. Owns the prompt; delegates the model call to the
/// injected backend.
pub struct CvExtractor {
    backend: Arc<dyn LlmBackend>,
}

impl CvExtractor {
    pub fn new(backend: Arc<dyn LlmBackend>) -> Self {
        Self { backend }
    }

    /// Extracts work experiences from raw CV text.
    ///
    /// Empty or whitespace-only input fails with `InvalidInput` before any
    /// model call. An empty array from the model is a valid outcome ("no
    /// experience found"); unparseable or missing content is `Extraction`.
    pub async fn extract(&self, cv_text: &str) -> Result<Vec<WorkExperience>, AppError> {
        if cv_text.trim().is_empty() {
            return Err(AppError::InvalidInput("No text provided".to_string()));
        }

        let prompt = EXTRACT_PROMPT_TEMPLATE.replace("{cv_text}", cv_text);
        let raw = self
            .backend
            .complete(&prompt, EXTRACT_SYSTEM)
            .await
            .map_err(|e| AppError::Extraction(e.to_string()))?;

        parse_experiences(&raw)
    }
}

/// Parses the model's raw output into work experiences.
///
/// Tolerates fenced-code wrapping. A single JSON object normalizes to a
/// one-element list.
fn parse_experiences(raw: &str) -> Result<Vec<WorkExperience>, AppError> {
    let text = strip_json_fences(raw);

    let value: Value = serde_json::from_str(text)
        .map_err(|e| AppError::Extraction(format!("model output is not valid JSON: {e}")))?;

    let items = match value {
        Value::Array(items) => items,
        object @ Value::Object(_) => vec![object],
        other => {
            return Err(AppError::Extraction(format!(
                "expected a JSON array of experiences, got {other}"
            )))
        }
    };

    items
        .into_iter()
        .map(|item| {
            serde_json::from_value(item)
                .map_err(|e| AppError::Extraction(format!("malformed experience object: {e}")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::LlmError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Backend that returns a canned response and counts calls.
    struct CannedBackend {
        response: Option<String>,
        calls: AtomicUsize,
    }

    impl CannedBackend {
        fn returning(response: &str) -> Self {
            Self {
                response: Some(response.to_string()),
                calls: AtomicUsize::new(0),
            }
        }

        fn empty() -> Self {
            Self {
                response: None,
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl LlmBackend for CannedBackend {
        async fn complete(&self, _prompt: &str, _system: &str) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.response.clone().ok_or(LlmError::EmptyContent)
        }
    }

    const TWO_EXPERIENCES: &str = r#"[
        {"title": "Engineer", "company": "Acme", "startDate": "2020-01-15", "endDate": "2022-06-01", "description": "Built things"},
        {"title": "Senior Engineer", "company": "Globex", "startDate": "2022", "endDate": null}
    ]"#;

    #[tokio::test]
    async fn test_extract_returns_one_record_per_array_element() {
        let backend = Arc::new(CannedBackend::returning(TWO_EXPERIENCES));
        let extractor = CvExtractor::new(backend.clone());

        let experiences = extractor.extract("some cv text").await.unwrap();
        assert_eq!(experiences.len(), 2);
        assert_eq!(experiences[0].title, "Engineer");
        assert_eq!(experiences[0].company, "Acme");
        assert_eq!(experiences[1].end_date, None);
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_input_fails_before_any_model_call() {
        let backend = Arc::new(CannedBackend::returning(TWO_EXPERIENCES));
        let extractor = CvExtractor::new(backend.clone());

        let err = extractor.extract("   \n\t ").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_fenced_output_parses_same_as_unwrapped() {
        let fenced = format!("```json\n{TWO_EXPERIENCES}\n```");
        let plain_extractor = CvExtractor::new(Arc::new(CannedBackend::returning(TWO_EXPERIENCES)));
        let fenced_extractor = CvExtractor::new(Arc::new(CannedBackend::returning(&fenced)));

        let plain = plain_extractor.extract("cv").await.unwrap();
        let wrapped = fenced_extractor.extract("cv").await.unwrap();
        assert_eq!(plain, wrapped);
    }

    #[tokio::test]
    async fn test_fenced_output_without_language_tag() {
        let fenced = format!("```\n{TWO_EXPERIENCES}\n```");
        let extractor = CvExtractor::new(Arc::new(CannedBackend::returning(&fenced)));

        let experiences = extractor.extract("cv").await.unwrap();
        assert_eq!(experiences.len(), 2);
    }

    #[tokio::test]
    async fn test_single_object_normalizes_to_one_element() {
        let single = r#"{"title": "Engineer", "company": "Acme", "startDate": "2020", "endDate": null}"#;
        let extractor = CvExtractor::new(Arc::new(CannedBackend::returning(single)));

        let experiences = extractor.extract("cv").await.unwrap();
        assert_eq!(experiences.len(), 1);
        assert_eq!(experiences[0].title, "Engineer");
    }

    #[tokio::test]
    async fn test_empty_array_is_valid_no_experience_found() {
        let extractor = CvExtractor::new(Arc::new(CannedBackend::returning("[]")));

        let experiences = extractor.extract("a cv with no jobs").await.unwrap();
        assert!(experiences.is_empty());
    }

    #[tokio::test]
    async fn test_prose_output_is_extraction_failure() {
        let extractor = CvExtractor::new(Arc::new(CannedBackend::returning(
            "I could not find any work experience in this text.",
        )));

        let err = extractor.extract("cv").await.unwrap_err();
        assert!(matches!(err, AppError::Extraction(_)));
    }

    #[tokio::test]
    async fn test_missing_model_content_is_extraction_failure() {
        let extractor = CvExtractor::new(Arc::new(CannedBackend::empty()));

        let err = extractor.extract("cv").await.unwrap_err();
        assert!(matches!(err, AppError::Extraction(_)));
    }

    #[tokio::test]
    async fn test_scalar_json_is_extraction_failure() {
        let extractor = CvExtractor::new(Arc::new(CannedBackend::returning("42")));

        let err = extractor.extract("cv").await.unwrap_err();
        assert!(matches!(err, AppError::Extraction(_)));
    }

    #[tokio::test]
    async fn test_fenced_engineer_scenario() {
        let raw = "```json\n[{\"title\":\"Engineer\",\"company\":\"Acme\",\"startDate\":\"2020\",\"endDate\":null}]\n```";
        let extractor = CvExtractor::new(Arc::new(CannedBackend::returning(raw)));

        let experiences = extractor.extract("cv").await.unwrap();
        assert_eq!(experiences.len(), 1);
        assert_eq!(experiences[0].title, "Engineer");
        assert_eq!(experiences[0].company, "Acme");
        assert_eq!(experiences[0].start_date, "2020");
        assert_eq!(experiences[0].end_date, None);
    }
}
