//! Plain-text report for a cached analysis, offered as a download.

use std::fmt::Write;

use crate::models::analysis::{AnalysisRecord, REASONING_DISPLAY_LIMIT};

pub fn export_filename(record: &AnalysisRecord) -> String {
    format!("jobgenie_analysis_{}.txt", record.created_at.timestamp_millis())
}

fn section(out: &mut String, heading: &str, items: &[String]) {
    let _ = writeln!(out, "{heading}:");
    for item in items {
        let _ = writeln!(out, "- {item}");
    }
    out.push('\n');
}

pub fn render_report(record: &AnalysisRecord) -> String {
    let analysis = &record.analysis;
    let posting = &record.posting;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Job Genie Analysis – {}\n",
        record.created_at.format("%Y-%m-%d %H:%M:%S")
    );
    if !posting.title.is_empty() || !posting.company.is_empty() {
        let _ = writeln!(out, "{} at {}", posting.title, posting.company);
    }
    if !posting.url.is_empty() {
        let _ = writeln!(out, "{}", posting.url);
    }
    let _ = writeln!(
        out,
        "Fit Score: {}% ({})\n",
        analysis.fit_score,
        analysis.band().label()
    );

    let reasoning = analysis.short_reasoning(REASONING_DISPLAY_LIMIT);
    if !reasoning.is_empty() {
        let _ = writeln!(out, "{reasoning}\n");
    }

    section(&mut out, "💪 Strengths", &analysis.strengths);
    section(&mut out, "⚠️ Gaps", &analysis.gaps);
    section(&mut out, "📝 Resume Improvements", &analysis.recommendations);
    section(&mut out, "🎤 Interview Questions", &analysis.interview_questions);
    out
}
