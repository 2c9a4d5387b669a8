//! Console output formatter for analysis results

use crate::output::formatter::OutputFormatter;
use colored::{ColoredString, Colorize};
use sideview_domain::{
    AnalysisRun, Annotations, ConfigIssue, FeedbackResult, InsertionPoint, PersonaFailure,
    PersonaId, PersonaInfo, PersonaOutcome, PersonaRegistry, format_score,
};

/// Formats analysis runs and annotated documents for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Force colors on or off for everything this formatter produces
    pub fn set_color(enabled: bool) {
        colored::control::set_override(enabled);
    }

    /// Format the complete run: every persona's scores, comments and summary
    pub fn format(run: &AnalysisRun) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Document Feedback"));
        output.push('\n');
        output.push_str(&Self::status_line(run));

        for (persona, outcome) in run.results() {
            let info = persona.info();
            match outcome {
                Ok(result) => output.push_str(&Self::format_result(info, result)),
                Err(failure) => output.push_str(&Self::format_failure(info, failure)),
            }
        }

        output.push_str(&Self::footer());
        output
    }

    /// Format as JSON, personas in processing order
    pub fn format_json(run: &AnalysisRun) -> String {
        let results: Vec<_> = run
            .results()
            .map(|(persona, outcome)| Self::outcome_json(persona, outcome))
            .collect();

        let value = serde_json::json!({
            "status": run.status(),
            "processed": run.processed_count(),
            "total": run.total_count(),
            "error": run.run_error(),
            "results": results,
        });
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
    }

    /// One line per persona: average score and summary
    pub fn format_summary(run: &AnalysisRun) -> String {
        let mut output = Self::status_line(run);

        for (persona, outcome) in run.results() {
            let info = persona.info();
            let name = format!("{:<12}", info.display_name);
            let line = match outcome {
                Ok(result) => format!(
                    "{} {:>5}  {}",
                    Self::persona_label(info, &name),
                    format_score(result.scores.average().round()),
                    result.summary.trim()
                ),
                Err(failure) => format!("{}  failed: {}", name, failure.cause)
                    .dimmed()
                    .to_string(),
            };
            output.push_str(&line);
            output.push('\n');
        }

        output
    }

    fn status_line(run: &AnalysisRun) -> String {
        let mut line = format!(
            "{} {} ({}/{} personas succeeded)\n",
            "Status:".cyan().bold(),
            run.status(),
            run.success_count(),
            run.total_count()
        );
        if let Some(error) = run.run_error() {
            line.push_str(&format!("{} {}\n", "Error:".red().bold(), error));
        }
        line
    }

    fn format_result(info: &PersonaInfo, result: &FeedbackResult) -> String {
        let mut output = format!(
            "\n{}\n",
            Self::persona_label(info, &format!("── {} ──", info.display_name)).bold()
        );

        let scores: Vec<_> = result
            .scores
            .iter()
            .map(|(criterion, value)| {
                format!("{}: {}", criterion.display_name(), format_score(value))
            })
            .collect();
        output.push_str(&format!("  {}\n", scores.join("  ")));

        if !result.snippet_comments.is_empty() {
            output.push_str(&format!("\n  {}\n", "Comments:".cyan()));
            for comment in &result.snippet_comments {
                output.push_str(&format!(
                    "    * {} {}\n",
                    format!("[@{}]", comment.anchor.start()).dimmed(),
                    comment.comment_text
                ));
                if !comment.source_text.is_empty() {
                    output.push_str(&format!(
                        "      {}\n",
                        format!("\"{}\"", comment.source_text).italic().dimmed()
                    ));
                }
            }
        }

        if !result.general_comments.is_empty() {
            output.push_str(&format!("\n  {}\n", "General:".cyan()));
            for comment in &result.general_comments {
                output.push_str(&format!("    - {}\n", comment));
            }
        }

        if !result.summary.trim().is_empty() {
            output.push_str(&format!(
                "\n  {} {}\n",
                "Summary:".cyan(),
                result.summary.trim()
            ));
        }

        output
    }

    fn format_failure(info: &PersonaInfo, failure: &PersonaFailure) -> String {
        format!(
            "\n{}\n  {}\n",
            format!("── {} ──", info.display_name).dimmed().bold(),
            format!("Failed: {}", failure.cause).dimmed()
        )
    }

    fn outcome_json(persona: PersonaId, outcome: &PersonaOutcome) -> serde_json::Value {
        match outcome {
            Ok(result) => serde_json::json!({
                "persona": persona,
                "ok": true,
                "feedback": result,
            }),
            Err(failure) => serde_json::json!({
                "persona": persona,
                "ok": false,
                "error": failure.cause,
                "message": failure.cause.to_string(),
            }),
        }
    }

    /// The persona registry, one persona per line
    pub fn format_personas() -> String {
        let mut output = String::new();
        for info in PersonaRegistry::all() {
            output.push_str(&format!(
                "{} {} {}\n",
                Self::persona_label(info, &format!("{:<12}", info.display_name)).bold(),
                format!("{:<8}", info.color).dimmed(),
                info.description
            ));
        }
        output
    }

    /// Document text with comments under their paragraphs and the
    /// trailing sections after the last line.
    pub fn format_annotated(text: &str, annotations: &Annotations) -> String {
        let mut output = String::new();
        let lines: Vec<&str> = text.split('\n').collect();
        let width = lines.len().to_string().len();

        for (index, line) in lines.iter().enumerate() {
            output.push_str(&format!(
                "{} {}\n",
                format!("{:>width$} |", index + 1, width = width).dimmed(),
                line.trim_end_matches('\r')
            ));
            for comment in annotations.comments_in_paragraph(index) {
                let column = match comment.position {
                    InsertionPoint::Paragraph { offset, .. } => offset,
                    InsertionPoint::EndOfDocument => 0,
                };
                output.push_str(&Self::comment_line(
                    width,
                    &format!("{} @{}", comment.author, column),
                    &comment.color,
                    &comment.text,
                ));
            }
        }

        for comment in annotations.comments_at_end() {
            output.push_str(&Self::comment_line(
                width,
                &format!("{} @end", comment.author),
                &comment.color,
                &comment.text,
            ));
        }

        for section in &annotations.sections {
            output.push_str(&format!("\n{}\n", section.heading.bold().underline()));
            output.push_str(&Self::indent(&section.body, "  "));
            output.push('\n');
        }

        output
    }

    fn comment_line(width: usize, label: &str, color: &str, text: &str) -> String {
        format!(
            "{} {} {}\n",
            format!("{:>width$} |", "", width = width).dimmed(),
            Self::colorize(label, color).bold(),
            text
        )
    }

    /// Configuration problems, errors first
    pub fn format_config_issues(issues: &[ConfigIssue]) -> String {
        if issues.is_empty() {
            return format!("{}\n", "No configuration issues".green());
        }
        let mut sorted: Vec<_> = issues.iter().collect();
        sorted.sort_by_key(|issue| !issue.is_error());
        sorted
            .into_iter()
            .map(|issue| {
                let tag = if issue.is_error() {
                    "error:".red().bold()
                } else {
                    "warning:".yellow().bold()
                };
                format!("{} {}\n", tag, issue.message)
            })
            .collect()
    }

    fn persona_label(info: &PersonaInfo, text: &str) -> ColoredString {
        Self::colorize(text, info.color)
    }

    /// Color `text` with a `#RRGGBB` token; unparseable tokens leave it plain
    fn colorize(text: &str, color: &str) -> ColoredString {
        match parse_hex_color(color) {
            Some((r, g, b)) => text.truecolor(r, g, b),
            None => text.normal(),
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn parse_hex_color(token: &str) -> Option<(u8, u8, u8)> {
    let hex = token.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, run: &AnalysisRun) -> String {
        Self::format(run)
    }

    fn format_json(&self, run: &AnalysisRun) -> String {
        Self::format_json(run)
    }

    fn format_summary(&self, run: &AnalysisRun) -> String {
        Self::format_summary(run)
    }
}
