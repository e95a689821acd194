//! Terminal rendering for the form: results, loading placeholder, toasts and
//! field errors. Every function returns a `String`; callers decide where it goes.

use std::fmt::Write;

use console::{style, Style};

use crate::form::controller::Notification;
use crate::profile::{ValidationErrors, DEGREES};
use crate::recommendation::{Recommendations, Relevance};

fn relevance_style(relevance: Relevance) -> Style {
    match relevance {
        Relevance::High => Style::new().green(),
        Relevance::Medium => Style::new().yellow(),
        Relevance::Low => Style::new().red(),
    }
}

fn heading(title: &str) -> String {
    style(title).bold().cyan().to_string()
}

/// Career cards, skill badges and the advice paragraph.
pub fn render_results(recommendations: &Recommendations) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", heading("Career Suggestions"));
    for (i, career) in recommendations.careers.iter().enumerate() {
        let label = format!("[{} Relevance]", career.relevance);
        let _ = writeln!(
            out,
            "  {}. {}  {}",
            i + 1,
            style(&career.title).bold(),
            relevance_style(career.relevance).apply_to(label)
        );
        let _ = writeln!(out, "     {}", style(&career.description).dim());
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", heading("Skills to Learn"));
    let badges: Vec<String> = recommendations
        .skills
        .iter()
        .map(|skill| style(format!("[{skill}]")).magenta().to_string())
        .collect();
    let _ = writeln!(out, "  {}", badges.join(" "));

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", heading("AI Advice"));
    let _ = writeln!(out, "  {}", recommendations.advice);

    out
}

/// Placeholder shown in the results area while a request is in flight.
pub fn render_loading() -> String {
    let bar = style("░░░░░░░░░░░░░░░░░░░░").dim();
    let mut out = String::new();
    let _ = writeln!(out, "{}", heading("Career Suggestions"));
    for i in 1..=3 {
        let _ = writeln!(out, "  {i}. {bar}");
    }
    let _ = writeln!(out, "{}", heading("Skills to Learn"));
    let _ = writeln!(out, "  {bar}");
    let _ = writeln!(out, "{}", heading("AI Advice"));
    let _ = writeln!(out, "  {bar}");
    out
}

pub fn render_notification(notification: &Notification) -> String {
    format!(
        "{} {}",
        style(format!("✖ {}:", notification.title)).red().bold(),
        notification.description
    )
}

pub fn render_field_errors(errors: &ValidationErrors) -> String {
    let mut out = String::new();
    for err in &errors.errors {
        let _ = writeln!(
            out,
            "  {} {}",
            style(format!("{}:", err.field.label())).red(),
            err.message
        );
    }
    out
}

/// Numbered degree list for selection prompts.
pub fn render_degree_menu() -> String {
    let mut out = String::new();
    for (i, degree) in DEGREES.iter().enumerate() {
        let _ = writeln!(out, "  {:>2}. {degree}", i + 1);
    }
    out
}
