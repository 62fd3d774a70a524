// Résumé ATS analysis: upload → text → AI service → score post-processing.
// Uploaded files are never persisted.

pub mod analyzer;
pub mod extract;
pub mod handlers;
pub mod prompts;
pub mod score;
