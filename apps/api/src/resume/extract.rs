//! Turns an uploaded résumé file into plain text for analysis.

use crate::errors::AppError;

/// Upload size cap for `POST /resume-api/ats-score`.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Characters of résumé text forwarded to the AI service.
pub const MAX_ANALYSIS_CHARS: usize = 20_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeFormat {
    Pdf,
    PlainText,
}

impl ResumeFormat {
    /// A known extension wins over the declared content type; browsers often
    /// send `application/octet-stream` for uploads. Word documents are
    /// rejected outright. Any other extension (`Resume_J.Doe`, `cv.v2`)
    /// defers to the content type.
    pub fn detect(filename: Option<&str>, content_type: Option<&str>) -> Option<Self> {
        let ext = filename
            .and_then(|f| f.rsplit_once('.'))
            .map(|(_, ext)| ext.to_ascii_lowercase());

        match ext.as_deref() {
            Some("pdf") => return Some(ResumeFormat::Pdf),
            Some("txt" | "md" | "text") => return Some(ResumeFormat::PlainText),
            Some("doc" | "docx" | "odt" | "rtf") => return None,
            _ => {}
        }

        match content_type.map(|c| c.to_ascii_lowercase()) {
            Some(ct) if ct == "application/pdf" => Some(ResumeFormat::Pdf),
            Some(ct) if ct.starts_with("text/") => Some(ResumeFormat::PlainText),
            _ => None,
        }
    }
}

pub fn extract_text(
    filename: Option<&str>,
    content_type: Option<&str>,
    bytes: &[u8],
) -> Result<String, AppError> {
    if bytes.is_empty() {
        return Err(AppError::Validation("Uploaded resume file is empty".to_string()));
    }

    let format = ResumeFormat::detect(filename, content_type).ok_or_else(|| {
        AppError::Validation(
            "Unsupported resume format. Upload a PDF or plain-text (.txt) file".to_string(),
        )
    })?;

    let text = match format {
        ResumeFormat::Pdf => pdf_extract::extract_text_from_mem(bytes).map_err(|e| {
            tracing::warn!("PDF extraction failed: {e}");
            AppError::Validation("Could not read text from the uploaded PDF".to_string())
        })?,
        ResumeFormat::PlainText => String::from_utf8_lossy(bytes).into_owned(),
    };

    let text = normalize_whitespace(&text);
    if text.is_empty() {
        return Err(AppError::Validation(
            "No readable text found in the uploaded resume".to_string(),
        ));
    }

    Ok(truncate_chars(&text, MAX_ANALYSIS_CHARS))
}

/// Collapses runs of blank lines and trailing spaces left by PDF extraction.
fn normalize_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut blank_run = 0;
    for line in text.lines().map(str::trim_end) {
        if line.trim().is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        out.push_str(line);
        out.push('\n');
    }
    out.trim().to_string()
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_by_extension() {
        assert_eq!(
            ResumeFormat::detect(Some("cv.PDF"), None),
            Some(ResumeFormat::Pdf)
        );
        assert_eq!(
            ResumeFormat::detect(Some("cv.txt"), Some("application/octet-stream")),
            Some(ResumeFormat::PlainText)
        );
        assert_eq!(ResumeFormat::detect(Some("cv.docx"), None), None);
    }

    #[test]
    fn test_detect_by_content_type_without_extension() {
        assert_eq!(
            ResumeFormat::detect(Some("resume"), Some("application/pdf")),
            Some(ResumeFormat::Pdf)
        );
        assert_eq!(
            ResumeFormat::detect(None, Some("text/plain; charset=utf-8")),
            Some(ResumeFormat::PlainText)
        );
        assert_eq!(ResumeFormat::detect(None, Some("image/png")), None);
    }

    #[test]
    fn test_detect_unknown_extension_defers_to_content_type() {
        assert_eq!(
            ResumeFormat::detect(Some("Resume_J.Doe"), Some("application/pdf")),
            Some(ResumeFormat::Pdf)
        );
        assert_eq!(
            ResumeFormat::detect(Some("cv.v2"), Some("text/plain")),
            Some(ResumeFormat::PlainText)
        );
        assert_eq!(
            ResumeFormat::detect(Some("cv.v2"), Some("application/octet-stream")),
            None
        );
        assert_eq!(
            ResumeFormat::detect(
                Some("cv.docx"),
                Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document")
            ),
            None
        );
    }

    #[test]
    fn test_extract_truncates_to_analysis_limit() {
        let long = "é".repeat(MAX_ANALYSIS_CHARS + 500);
        let text = extract_text(Some("cv.txt"), None, long.as_bytes()).unwrap();
        assert_eq!(text.chars().count(), MAX_ANALYSIS_CHARS);
    }

    #[test]
    fn test_extract_plain_text() {
        let text = extract_text(Some("cv.txt"), None, b"Jane Doe\n\n\n\nRust Engineer   \n").unwrap();
        assert_eq!(text, "Jane Doe\n\nRust Engineer");
    }

    #[test]
    fn test_extract_rejects_empty_and_unsupported() {
        assert!(matches!(
            extract_text(Some("cv.txt"), None, b""),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            extract_text(Some("cv.docx"), None, b"PK\x03\x04"),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            extract_text(Some("cv.txt"), None, b"  \n \n"),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_extract_rejects_corrupt_pdf() {
        let result = extract_text(Some("cv.pdf"), None, b"definitely not a pdf");
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_truncate_chars_respects_char_boundaries() {
        assert_eq!(truncate_chars("résumé", 3), "rés");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }
}
