// Colored terminal output for screening reports and single-resume inspection.
//
// This module handles all terminal-specific formatting: colors and tables.
// The main.rs command handlers delegate here.

use colored::Colorize;

use crate::entities::ContactEntities;
use crate::pipeline::ScreeningReport;

/// Display a ranked shortlist in the terminal.
pub fn display_report(report: &ScreeningReport) {
    let title = if report.job_title.is_empty() {
        "Screening Report".to_string()
    } else {
        format!("Screening Report: {}", report.job_title)
    };
    println!("\n{}", format!("=== {title} ===").bold());
    println!(
        "  {} screened, {} shortlisted, {} rejected by required keywords, {} failed",
        report.screened,
        report.shortlisted.to_string().green(),
        report.rejected_by_prefilter,
        if report.failed > 0 {
            report.failed.to_string().red()
        } else {
            report.failed.to_string().normal()
        },
    );

    if report.results.is_empty() {
        println!("\n  No resumes passed the required-keyword filter.");
        return;
    }

    println!();
    println!(
        "  {:>4}  {:<28} {:<22} {:>6}  {:>5}  {}",
        "Rank".dimmed(),
        "File".dimmed(),
        "Name".dimmed(),
        "Score".dimmed(),
        "OCR%".dimmed(),
        "Matched".dimmed(),
    );
    println!("  {}", "-".repeat(96).dimmed());

    for result in &report.results {
        let confidence = result
            .ocr_avg_confidence
            .map(|c| format!("{c:.1}"))
            .unwrap_or_else(|| "-".to_string());
        let name = if result.name.is_empty() { "?" } else { result.name.as_str() };
        println!(
            "  {:>4}. {:<28} {:<22} {}  {:>5}  {}",
            result.rank,
            super::truncate_chars(&result.filename, 25),
            super::truncate_chars(name, 19),
            colorize_score(result.score),
            confidence,
            super::truncate_chars(&result.matched_keywords.join(", "), 40).dimmed(),
        );
    }
    println!();
}

/// Display OCR and entity results for one resume.
pub fn display_inspection(
    filename: &str,
    text: &str,
    confidence: Option<f64>,
    attempts: u32,
    entities: &ContactEntities,
    score: Option<f64>,
) {
    println!("\n{}", format!("=== {filename} ===").bold());
    match confidence {
        Some(c) => println!("  OCR confidence: {c:.2}% ({attempts} attempt(s))"),
        None => println!("  Text resume (no OCR)"),
    }
    println!("  Name:  {}", field(&entities.name));
    println!("  Email: {}", field(&entities.email));
    println!("  Phone: {}", field(&entities.phone));
    if let Some(score) = score {
        println!("  Score: {}", colorize_score(score));
    }

    println!("\n  Extracted text:");
    for line in text.lines().filter(|l| !l.trim().is_empty()) {
        println!("    {}", super::truncate_chars(line, 100).dimmed());
    }
    println!();
}

/// Display suggested keywords for a job description.
pub fn display_keywords(keywords: &[String]) {
    println!("\n{}", format!("=== Suggested keywords ({}) ===", keywords.len()).bold());
    for (i, keyword) in keywords.iter().enumerate() {
        println!("  {:>3}. {}", i + 1, keyword);
    }
    println!();
}

fn field(value: &str) -> colored::ColoredString {
    if value.is_empty() {
        "(not found)".dimmed()
    } else {
        value.normal()
    }
}

/// Colorize a similarity score by strength.
fn colorize_score(score: f64) -> colored::ColoredString {
    let text = format!("{score:>6.4}");
    if score >= 0.5 {
        text.green().bold()
    } else if score >= 0.25 {
        text.yellow()
    } else {
        text.dimmed()
    }
}
