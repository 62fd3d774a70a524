//! Résumé analyzer: the seam in front of the AI service.
//!
//! `AppState` holds an `Arc<dyn ResumeAnalyzer>`; the default backend is
//! `LlmResumeAnalyzer`. The analyzer never fails from the caller's view:
//! service errors come back as text that `score::analyze_response` turns
//! into an advisory notice.

use async_trait::async_trait;
use tracing::{info, warn};

use crate::llm_client::prompts::PLAIN_TEXT_SYSTEM;
use crate::llm_client::{LlmClient, LlmError};
use crate::resume::prompts::{ATS_ANALYSIS_PROMPT, ATS_ANALYSIS_SYSTEM};
use crate::resume::score::ANALYSIS_FAILED_PREFIX;

#[async_trait]
pub trait ResumeAnalyzer: Send + Sync {
    /// Returns the AI service's free-text assessment of `resume_text`.
    async fn analyze(&self, resume_text: &str) -> String;
}

pub struct LlmResumeAnalyzer {
    llm: LlmClient,
}

impl LlmResumeAnalyzer {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl ResumeAnalyzer for LlmResumeAnalyzer {
    async fn analyze(&self, resume_text: &str) -> String {
        let prompt = ATS_ANALYSIS_PROMPT.replace("{resume_text}", resume_text);
        let system = format!("{ATS_ANALYSIS_SYSTEM} {PLAIN_TEXT_SYSTEM}");

        match self.llm.call_text(&prompt, &system).await {
            Ok(text) => {
                info!("ATS analysis completed ({} chars)", text.len());
                text
            }
            Err(e) => {
                warn!("ATS analysis failed: {e}");
                failure_text(&e)
            }
        }
    }
}

/// User-facing stand-in for a failed call. Upstream error bodies stay in
/// the server log.
fn failure_text(err: &LlmError) -> String {
    let reason = if err.is_rate_limited() {
        "quota exceeded"
    } else {
        "service error"
    };
    format!("{ANALYSIS_FAILED_PREFIX}: {reason}")
}
