use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

use crate::SummarizerError;

pub mod gemini;

/// Instruction placed in front of the transcript text
pub const SUMMARY_PROMPT: &str = "You are YouTube video summarizer. You will be taking the transcript text
and summarizing the entire video and providing the important summary in points
within 250 words. Please provide the summary of the text given here:
";

/// A generated summary and the model that produced it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub model: String,
    pub text: String,
}

/// External generative-language service
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Send one content-generation request and return the response text verbatim
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, SummarizerError>;
}

/// One option that failed during a fallback walk
#[derive(Debug, Clone, PartialEq)]
pub struct ModelFailure {
    pub model: String,
    pub error: SummarizerError,
}

/// Result of walking the model list
#[derive(Debug, Clone, PartialEq)]
pub enum FallbackOutcome {
    Succeeded {
        model: String,
        text: String,
        failures: Vec<ModelFailure>,
    },
    Exhausted {
        failures: Vec<ModelFailure>,
    },
}

/// Ordered list of models tried one after another until one answers
#[derive(Debug, Clone)]
pub struct ModelFallback {
    models: Vec<String>,
}

impl ModelFallback {
    pub fn new(models: Vec<String>) -> Result<Self, SummarizerError> {
        if models.is_empty() {
            return Err(SummarizerError::SummarizationFailure(
                "No summarization models configured".to_string(),
            ));
        }
        Ok(Self { models })
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }

    pub async fn run(&self, summarizer: &dyn Summarizer, prompt: &str) -> FallbackOutcome {
        let mut failures = Vec::new();

        for model in &self.models {
            tracing::info!(model = %model, "Requesting summary");

            let error = match summarizer.generate(model, prompt).await {
                Ok(text) if !text.trim().is_empty() => {
                    return FallbackOutcome::Succeeded {
                        model: model.clone(),
                        text,
                        failures,
                    };
                }
                Ok(_) => SummarizerError::SummarizationFailure("Empty response".to_string()),
                Err(e) => e,
            };

            tracing::warn!(model = %model, "Summary request failed: {}", error);
            failures.push(ModelFailure {
                model: model.clone(),
                error,
            });
        }

        FallbackOutcome::Exhausted { failures }
    }
}

/// Summarizes transcript text with the fixed prompt and the configured model list
#[derive(Clone)]
pub struct SummaryService {
    summarizer: Arc<dyn Summarizer>,
    fallback: ModelFallback,
}

impl SummaryService {
    pub fn new(summarizer: Arc<dyn Summarizer>, fallback: ModelFallback) -> Self {
        Self {
            summarizer,
            fallback,
        }
    }

    pub async fn summarize(&self, transcript_text: &str) -> Result<Summary, SummarizerError> {
        let prompt = format!("{}{}", SUMMARY_PROMPT, transcript_text);

        match self.fallback.run(self.summarizer.as_ref(), &prompt).await {
            FallbackOutcome::Succeeded { model, text, .. } => Ok(Summary { model, text }),
            FallbackOutcome::Exhausted { failures } => {
                let detail = failures
                    .iter()
                    .map(|f| format!("{}: {}", f.model, f.error))
                    .collect::<Vec<_>>()
                    .join("; ");
                Err(SummarizerError::SummarizationFailure(detail))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;
    use mockall::Sequence;

    fn fallback(models: &[&str]) -> ModelFallback {
        ModelFallback::new(models.iter().map(|m| m.to_string()).collect()).unwrap()
    }

    fn failure(msg: &str) -> SummarizerError {
        SummarizerError::SummarizationFailure(msg.to_string())
    }

    #[tokio::test]
    async fn test_first_success_stops_the_walk() {
        let mut mock = MockSummarizer::new();
        mock.expect_generate()
            .with(eq("a"), mockall::predicate::always())
            .times(1)
            .returning(|_, _| Ok("- point".to_string()));
        mock.expect_generate().with(eq("b"), mockall::predicate::always()).times(0);

        let outcome = fallback(&["a", "b"]).run(&mock, "prompt").await;
        assert_eq!(
            outcome,
            FallbackOutcome::Succeeded {
                model: "a".to_string(),
                text: "- point".to_string(),
                failures: vec![],
            }
        );
    }

    #[tokio::test]
    async fn test_success_records_earlier_failures() {
        let mut seq = Sequence::new();
        let mut mock = MockSummarizer::new();
        mock.expect_generate()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Err(failure("quota")));
        mock.expect_generate()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok("   ".to_string()));
        mock.expect_generate()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok("summary".to_string()));

        match fallback(&["a", "b", "c"]).run(&mock, "prompt").await {
            FallbackOutcome::Succeeded { model, failures, .. } => {
                assert_eq!(model, "c");
                let failed: Vec<_> = failures.iter().map(|f| f.model.as_str()).collect();
                assert_eq!(failed, ["a", "b"]);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_exhausted_lists_errors_in_order() {
        let mut mock = MockSummarizer::new();
        mock.expect_generate()
            .returning(|model, _| Err(failure(&format!("{} down", model))));

        let service = SummaryService::new(Arc::new(mock), fallback(&["a", "b"]));
        let err = service.summarize("text").await.unwrap_err();
        assert_eq!(
            err,
            failure("a: Summarization failed: a down; b: Summarization failed: b down")
        );
    }

    #[tokio::test]
    async fn test_prompt_precedes_transcript() {
        let mut mock = MockSummarizer::new();
        mock.expect_generate()
            .withf(|_, prompt| prompt.starts_with(SUMMARY_PROMPT) && prompt.ends_with("Hello world"))
            .returning(|_, _| Ok("- greeting".to_string()));

        let service = SummaryService::new(Arc::new(mock), fallback(&["a"]));
        let summary = service.summarize("Hello world").await.unwrap();
        assert_eq!(summary, Summary { model: "a".into(), text: "- greeting".into() });
    }

    #[test]
    fn test_empty_model_list_is_rejected() {
        assert!(ModelFallback::new(vec![]).is_err());
    }
}
