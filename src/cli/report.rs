//! Report formatting and printing utilities.
//!
//! Every printer has a `_to` variant taking a writer, for testing.

use std::io::{self, Write};

use colored::Colorize;
use unicode_width::UnicodeWidthStr;

use crate::{
    config::LanguageCode,
    core::{KeyMatch, SEARCH_RESULT_LIMIT, TextUnit},
    sync::{FetchReport, FetchStatus, PushPlan, PushReport},
};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

const MISSING_MARK: &str = "-";

fn pad(text: &str, width: usize) -> String {
    let padding = width.saturating_sub(text.width());
    format!("{}{}", text, " ".repeat(padding))
}

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{} {}", count, word)
    } else {
        format!("{} {}s", count, word)
    }
}

fn short_revision(revision: &str) -> &str {
    revision.get(..7).unwrap_or(revision)
}

pub fn print_text_units(units: &[TextUnit]) {
    print_text_units_to(units, &mut io::stdout().lock());
}

pub fn print_text_units_to<W: Write>(units: &[TextUnit], writer: &mut W) {
    if units.is_empty() {
        let _ = writeln!(writer, "No translatable text found");
        return;
    }

    let id_width = units.iter().map(|u| u.id.width()).max().unwrap_or(0);
    let key_width = units.iter().map(|u| u.suggested_key.width()).max().unwrap_or(0);

    for unit in units {
        let _ = writeln!(
            writer,
            "{}  {}  {}",
            pad(&unit.id, id_width).dimmed(),
            pad(&unit.suggested_key, key_width).cyan(),
            unit.text
        );
    }
    let _ = writeln!(writer, "\n{}", plural(units.len(), "text unit"));
}

pub fn print_fetch_report(report: &FetchReport) {
    print_fetch_report_to(report, &mut io::stdout().lock());
}

pub fn print_fetch_report_to<W: Write>(report: &FetchReport, writer: &mut W) {
    let language_width = report
        .languages
        .iter()
        .map(|l| l.language.width())
        .max()
        .unwrap_or(0);
    let path_width = report.languages.iter().map(|l| l.path.width()).max().unwrap_or(0);

    for language in &report.languages {
        let (mark, detail) = match &language.status {
            FetchStatus::Loaded { keys } => (SUCCESS_MARK.green(), plural(*keys, "key").normal()),
            FetchStatus::Missing => (MISSING_MARK.yellow(), "not found".yellow()),
            FetchStatus::Malformed { error } | FetchStatus::Failed { error } => {
                (FAILURE_MARK.red(), error.as_str().red())
            }
        };
        let _ = writeln!(
            writer,
            "{} {}  {}  {}",
            mark,
            pad(&language.language, language_width).bold(),
            pad(&language.path, path_width).dimmed(),
            detail
        );
    }

    let summary = format!(
        "Loaded {} from {}",
        plural(report.total_keys, "key"),
        plural(report.languages.len(), "language")
    );
    if report.is_degraded() {
        let _ = writeln!(
            writer,
            "\n{} {} (some languages could not be read)",
            "warning:".bold().yellow(),
            summary
        );
    } else {
        let _ = writeln!(writer, "\n{} {}", SUCCESS_MARK.green(), summary.green());
    }
}

pub fn print_search_results(query: &str, matches: &[KeyMatch], languages: &[LanguageCode]) {
    print_search_results_to(query, matches, languages, &mut io::stdout().lock());
}

pub fn print_search_results_to<W: Write>(
    query: &str,
    matches: &[KeyMatch],
    languages: &[LanguageCode],
    writer: &mut W,
) {
    if matches.is_empty() {
        let _ = writeln!(writer, "No keys match \"{}\"", query);
        return;
    }

    let language_width = languages.iter().map(|l| l.width()).max().unwrap_or(0);

    for found in matches {
        let key = if found.key_matched {
            found.key.bold().cyan()
        } else {
            found.key.bold()
        };
        let _ = writeln!(writer, "{}", key);

        for language in languages {
            let Some(value) = found.translations.get(language) else {
                continue;
            };
            let value = if found.matched_languages.contains(language) {
                value.as_str().cyan()
            } else {
                value.as_str().normal()
            };
            let _ = writeln!(writer, "  {}  {}", pad(language, language_width).dimmed(), value);
        }
    }

    if matches.len() == SEARCH_RESULT_LIMIT {
        let _ = writeln!(
            writer,
            "\n{}",
            format!("Showing the first {} matches", SEARCH_RESULT_LIMIT).dimmed()
        );
    }
}

/// Print what a push writes. With `show_content`, the merged files are printed too.
pub fn print_push_plan(plan: &PushPlan, show_content: bool) {
    print_push_plan_to(plan, show_content, &mut io::stdout().lock());
}

pub fn print_push_plan_to<W: Write>(plan: &PushPlan, show_content: bool, writer: &mut W) {
    let language_width = plan.files.iter().map(|f| f.language.width()).max().unwrap_or(0);

    for file in &plan.files {
        let change = if file.is_changed() {
            format!("+{} ~{}", file.stats.added, file.stats.updated).green()
        } else {
            "unchanged".dimmed()
        };
        let _ = writeln!(
            writer,
            "  {}  {}  {}  ({})",
            pad(&file.language, language_width).bold(),
            file.path,
            change,
            plural(file.total_keys, "key")
        );
    }

    if show_content {
        for file in plan.changed_files() {
            let _ = writeln!(writer, "\n{}", format!("--- {}", file.path).bold());
            let _ = write!(writer, "{}", file.content);
        }
    }
}

pub fn print_push_report(report: &PushReport) {
    print_push_report_to(report, &mut io::stdout().lock());
}

pub fn print_push_report_to<W: Write>(report: &PushReport, writer: &mut W) {
    print_push_plan_to(&report.plan, false, writer);

    match &report.revision {
        Some(revision) => {
            let _ = writeln!(
                writer,
                "\n{} {}",
                SUCCESS_MARK.green(),
                format!(
                    "Committed {} to {}: {}",
                    short_revision(revision),
                    report.plan.branch,
                    report.plan.message
                )
                .green()
            );
        }
        None => {
            let _ = writeln!(
                writer,
                "\n{} {}",
                SUCCESS_MARK.green(),
                "Nothing to commit, translations already up to date".green()
            );
        }
    }

    if report.renamed > 0 {
        let _ = writeln!(writer, "Renamed {}", plural(report.renamed, "layer"));
    }
}

/// Print a dry-run notice after the plan.
pub fn print_dry_run_notice_to<W: Write>(plan: &PushPlan, writer: &mut W) {
    if plan.is_noop() {
        let _ = writeln!(writer, "\nNothing to commit, translations already up to date");
    } else {
        let _ = writeln!(
            writer,
            "\n{} {} (use without {} to commit)",
            "dry run:".bold().yellow(),
            plan.message,
            "--dry-run".cyan()
        );
    }
}
