// ATS analysis prompt templates.

pub const ATS_ANALYSIS_SYSTEM: &str = "\
You are an experienced technical recruiter who knows how Applicant Tracking Systems \
parse and rank resumes. Judge only what is in the resume text you are given. \
Never invent experience, employers, or skills the candidate did not list.";

pub const ATS_ANALYSIS_PROMPT: &str = r#"Evaluate the following resume for ATS (Applicant Tracking System) compatibility.

Start your answer with a single line in exactly this form:
ATS Score: <integer from 0 to 100>

Then give short sections, separated by blank lines, covering:
- Formatting and structure issues that could break ATS parsing
- Keyword coverage and missing industry keywords
- Strengths worth keeping
- The three most impactful improvements

RESUME TEXT:
{resume_text}
"#;
