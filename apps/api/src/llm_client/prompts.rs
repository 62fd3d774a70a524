// Shared prompt fragments.
// Each feature that needs LLM calls defines its own prompts.rs alongside it.

/// System prompt fragment for free-text answers that are parsed downstream.
pub const PLAIN_TEXT_SYSTEM: &str = "\
    Respond in plain text paragraphs separated by blank lines. \
    Do NOT use tables, code fences, or HTML. \
    Do NOT include apologies or remarks about being an AI.";
