//! Interview preparation: the offline question generator used when the LLM
//! quota is exhausted, and the plain-text guide both paths render into.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::extractor::page::contains_term;
use crate::models::analysis::InterviewQuestions;
use crate::models::job::JobPosting;

const MAX_BEHAVIORAL: usize = 8;
const MAX_TECHNICAL: usize = 12;

const TECH_KEYWORDS: &[&str] = &[
    "python",
    "javascript",
    "java",
    "react",
    "node",
    "sql",
    "aws",
    "docker",
    "kubernetes",
    "git",
    "agile",
    "api",
    "database",
    "cloud",
    "machine learning",
    "data science",
    "analytics",
    "html",
    "css",
    "typescript",
    "angular",
    "vue",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionSource {
    Ai,
    Basic,
}

/// A rendered guide, ready to be offered as a download.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterviewGuide {
    pub filename: String,
    pub content: String,
}

fn or_default<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

/// Builds questions from the posting alone. No LLM involved.
pub fn basic_questions(posting: &JobPosting) -> InterviewQuestions {
    let title = or_default(&posting.title, "this");
    let company = or_default(&posting.company, "this company");
    let haystack = format!("{} {}", posting.title, posting.description);

    let mut behavioral: Vec<String> = vec![
        "Tell me about yourself and why you're interested in this role.".into(),
        "Describe a challenging project you worked on and how you overcame obstacles.".into(),
        "Give me an example of a time when you had to work with a difficult team member.".into(),
        "Tell me about a time when you had to learn something new quickly.".into(),
        "Describe a situation where you had to meet a tight deadline.".into(),
        "How do you handle constructive feedback and criticism?".into(),
        "Tell me about a time when you made a mistake and how you handled it.".into(),
        "Describe your experience working in a team environment.".into(),
        "What motivates you in your work?".into(),
        format!("Why are you interested in working at {company}?"),
    ];

    let mut technical: Vec<String> = vec![
        format!("What experience do you have that makes you suitable for a {title} role?"),
        "Walk me through your technical background and relevant skills.".into(),
        "How do you stay updated with industry trends and new technologies?".into(),
        "Describe your approach to problem-solving in technical projects.".into(),
        "Tell me about your experience with version control systems.".into(),
        "How do you ensure code quality in your projects?".into(),
        "Describe your experience with testing and debugging.".into(),
        "What development methodologies have you worked with?".into(),
        "How do you handle technical documentation?".into(),
        "Describe a technical challenge you faced and how you solved it.".into(),
    ];

    for tech in TECH_KEYWORDS.iter().filter(|t| contains_term(&haystack, t)) {
        let name = tech.to_uppercase();
        technical.push(format!("What is your experience with {name}?"));
        technical.push(format!("How have you used {name} in your previous projects?"));
    }

    let title_has = |terms: &[&str]| terms.iter().any(|t| contains_term(&posting.title, t));

    if title_has(&["senior", "lead"]) {
        behavioral.push("Tell me about your experience mentoring junior developers.".into());
        technical.push("How do you approach technical decision-making for a team?".into());
    }
    if title_has(&["data", "analyst"]) {
        technical.push("How do you ensure data quality and accuracy?".into());
        technical.push("Describe your experience with data visualization tools.".into());
    }
    if title_has(&["frontend", "ui"]) {
        technical.push("How do you ensure cross-browser compatibility?".into());
        technical.push("What's your approach to responsive design?".into());
    }
    if title_has(&["backend", "api"]) {
        technical.push("How do you design scalable APIs?".into());
        technical.push("What's your approach to database optimization?".into());
    }

    behavioral.truncate(MAX_BEHAVIORAL);
    technical.truncate(MAX_TECHNICAL);

    InterviewQuestions {
        behavioral_questions: behavioral,
        technical_questions: technical,
    }
}

fn file_safe(value: &str) -> String {
    value
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

fn numbered(questions: &[String], empty: &str) -> String {
    if questions.is_empty() {
        return empty.to_string();
    }
    questions
        .iter()
        .enumerate()
        .map(|(i, q)| format!("{}. {}", i + 1, q))
        .collect::<Vec<_>>()
        .join("\n\n")
}

const RULE: &str = "=====================================================";

/// Renders the preparation guide and its download filename.
pub fn render_guide(
    questions: &InterviewQuestions,
    posting: &JobPosting,
    source: QuestionSource,
    generated_on: NaiveDate,
) -> InterviewGuide {
    let title = or_default(&posting.title, "Unknown Role");
    let company = or_default(&posting.company, "Unknown Company");
    let behavioral = &questions.behavioral_questions;
    let technical = &questions.technical_questions;

    let kind = match source {
        QuestionSource::Ai => "AI-Generated Questions",
        QuestionSource::Basic => "Basic Questions (Generated from Job Posting)",
    };

    let mut content = format!(
        "INTERVIEW PREPARATION GUIDE\n\
         {title} at {company}\n\
         Generated on: {generated_on}\n\
         Type: {kind}\n\n\
         {RULE}\nBEHAVIORAL QUESTIONS ({} questions)\n{RULE}\n\n{}\n\n\
         {RULE}\nTECHNICAL QUESTIONS ({} questions)\n{RULE}\n\n{}\n\n",
        behavioral.len(),
        numbered(behavioral, "No behavioral questions generated."),
        technical.len(),
        numbered(technical, "No technical questions generated."),
    );

    content.push_str(&format!(
        "{RULE}\nINTERVIEW TIPS\n{RULE}\n\n\
         • Research {company} culture and recent news\n\
         • Prepare specific examples from your experience that match the job requirements\n\
         • Practice explaining technical concepts clearly and simply\n\
         • Prepare thoughtful questions to ask the interviewer about the role and team\n\
         • Review the job description and align your experience with their needs\n\
         • Be ready with specific examples and quantifiable achievements\n\
         • Use the STAR method (Situation, Task, Action, Result) for behavioral questions\n\n\
         {RULE}\nJOB-SPECIFIC PREPARATION\n{RULE}\n\n\
         • This {title} role requires specific skills mentioned in the job posting\n\
         • Review technologies and frameworks mentioned in the job description\n\
         • Prepare examples that demonstrate relevant experience\n\
         • Think about challenges specific to this type of role and how you'd handle them\n\n"
    ));

    if source == QuestionSource::Basic {
        content.push_str(&format!(
            "{RULE}\nNOTE\n{RULE}\n\n\
             These questions were generated from the job posting content due to API quota limits.\n\
             For AI-powered personalized questions, please wait for your API quota to reset.\n\n"
        ));
    }

    content.push_str(&format!(
        "Generated by Job Genie\nGood luck with your interview!\n\nTotal Questions Generated: {}\n",
        questions.total()
    ));

    let prefix = match source {
        QuestionSource::Ai => "Interview_Questions",
        QuestionSource::Basic => "Basic_Interview_Questions",
    };
    let filename = format!(
        "{prefix}_{}_{}_{}.txt",
        file_safe(title),
        file_safe(company),
        generated_on.format("%Y-%m-%d")
    );

    InterviewGuide { filename, content }
}
