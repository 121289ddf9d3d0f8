// LLM prompt templates for fit analysis and interview preparation.
// Placeholders: {title}, {company}, {description}, {job_id}, {resume}.

/// Fit analysis prompt. The reply is a single JSON object.
pub const FIT_PROMPT_TEMPLATE: &str = r#"You are an expert career advisor and recruiter. Analyze the fit between this resume and job posting.

RESUME/PROFILE:
{resume}

JOB POSTING:
Title: {title}
Company: {company}
Job ID: {job_id}
Description:
{description}

ANALYSIS REQUIREMENTS:
1. Calculate a realistic fit score (0-100) based on skills, experience and qualifications alignment
2. Explain the score in 2-3 complete sentences, max 300 characters
3. Identify key strengths for THIS specific role
4. Identify skill gaps for THIS specific role
5. Give practical, specific resume recommendations to better match this posting
6. Generate interview questions tied to the skills and requirements in the posting

Respond with this JSON object:
{
  "fit_score": <number 0-100>,
  "reasoning": "<2-3 complete sentences, max 300 characters>",
  "strengths": ["<short skill/technology name>", "<short skill/technology name>"],
  "gaps": ["<short missing skill/technology>", "<short missing skill/technology>"],
  "recommendations": ["<actionable advice in one sentence>", "<actionable advice in one sentence>"],
  "interview_questions": ["<skill-specific question>", "<skill-specific question>"]
}

FORMATTING RULES:
- Strengths and gaps: SHORT skill names (e.g. "Statistical Modeling", "A/B Testing")
- Recommendations: 3-5 items, one sentence each, max 100 characters
- Interview questions: 3-5 items, specific to the posting
- Avoid generic advice; tailor everything to this posting"#;

/// Interview question prompt.
pub const INTERVIEW_PROMPT_TEMPLATE: &str = r#"Generate interview questions for this specific job posting. Focus on the skills and requirements mentioned in the job description.

JOB TITLE: {title}
COMPANY: {company}
JOB DESCRIPTION: {description}

CANDIDATE BACKGROUND: {resume}

Create interview questions that test the specific skills and requirements mentioned in this job posting. Generate:
1. 4-5 behavioral questions relevant to this role
2. 10-15 technical questions covering the technologies and skills mentioned in the job description

Respond with this JSON object:
{
  "behavioral_questions": [
    "Tell me about a time when you...",
    "Describe a situation where you..."
  ],
  "technical_questions": [
    "What is your experience with [technology from job posting]?",
    "How would you approach [specific challenge mentioned in job]?"
  ]
}

Make questions specific to the actual technologies, frameworks and requirements mentioned in the job posting above."#;
