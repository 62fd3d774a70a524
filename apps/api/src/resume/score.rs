//! ATS score post-processing of the AI service's free-text answer.
//!
//! The answer is expected to contain a line like `ATS Score: 82`. Models
//! often bold it (`ATS Score: **82**`), so bold markers are stripped before
//! matching. When no score can be found a fixed fallback is reported.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Prefix for analysis texts that stand in for a failed AI call.
pub const ANALYSIS_FAILED_PREFIX: &str = "AI analysis failed";

/// Score reported when the analysis text carries no parseable score.
pub const FALLBACK_ATS_SCORE: u32 = 75;

pub const SCORE_FALLBACK_NOTICE: &str =
    "Could not extract ATS score from analysis. Showing general feedback instead.";
pub const SERVICE_UNAVAILABLE_NOTICE: &str = "AI service temporarily unavailable due to quota limits. \
     Please try again later.";
const SERVICE_UNAVAILABLE_FEEDBACK: &str = "The AI analysis service is currently experiencing high demand. \
     Please try again in a few minutes.";

static ATS_SCORE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)ATS Score:\**\s*(\d+)").expect("ATS_SCORE_RE should compile"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AtsRating {
    Excellent,
    Good,
    NeedsImprovement,
}

impl AtsRating {
    pub fn for_score(score: u32) -> Self {
        if score >= 75 {
            AtsRating::Excellent
        } else if score >= 50 {
            AtsRating::Good
        } else {
            AtsRating::NeedsImprovement
        }
    }
}

/// Result of post-processing one analysis, in the shape the SPA renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AtsAnalysis {
    /// Raw text returned by the AI service.
    pub ats_analysis: String,
    pub ats_score: Option<u32>,
    pub score_extracted: bool,
    pub rating: Option<AtsRating>,
    pub feedback: Vec<String>,
    /// Advisory message for the user; never accompanies an error status.
    pub notice: Option<String>,
}

pub fn extract_ats_score(text: &str) -> Option<u32> {
    let unbolded = text.replace("**", "");
    let caps = ATS_SCORE_RE.captures(&unbolded)?;
    // The capture is all digits, so a parse failure can only be overflow.
    let score = caps.get(1)?.as_str().parse::<u64>().unwrap_or(u64::MAX);
    Some(score.min(100) as u32)
}

/// Detects the failure texts the analyzer substitutes when the AI call
/// failed, quota exhaustion included. Only the leading prefix counts, so an
/// analysis that merely mentions quotas keeps its score.
pub fn is_service_unavailable(text: &str) -> bool {
    text.trim_start()
        .get(..ANALYSIS_FAILED_PREFIX.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(ANALYSIS_FAILED_PREFIX))
}

/// Splits the analysis into display paragraphs with bold markers removed.
pub fn format_feedback(text: &str) -> Vec<String> {
    text.replace("**", "")
        .replace("\r\n", "\n")
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
}

pub fn analyze_response(text: &str) -> AtsAnalysis {
    if is_service_unavailable(text) {
        return AtsAnalysis {
            ats_analysis: text.to_string(),
            ats_score: None,
            score_extracted: false,
            rating: None,
            feedback: vec![SERVICE_UNAVAILABLE_FEEDBACK.to_string()],
            notice: Some(SERVICE_UNAVAILABLE_NOTICE.to_string()),
        };
    }

    let (score, extracted, notice) = match extract_ats_score(text) {
        Some(score) => (score, true, None),
        None => (
            FALLBACK_ATS_SCORE,
            false,
            Some(SCORE_FALLBACK_NOTICE.to_string()),
        ),
    };

    AtsAnalysis {
        ats_analysis: text.to_string(),
        ats_score: Some(score),
        score_extracted: extracted,
        rating: Some(AtsRating::for_score(score)),
        feedback: format_feedback(text),
        notice,
    }
}
