//! `/api/deck/load` and `/api/deck/bulk` — table uploads.
//!
//! The page reads the chosen files with the File API and posts their text
//! here. Each file is parsed independently: a failure is reported on its own
//! line and leaves that category's current table alone, while every other
//! file still loads. Successful parses are applied one at a time, each as a
//! single `load_category` call.

use crate::deck::Category;
use crate::deck::state::with_engine_mut;
use crate::routes::deck::render_panel;
use crate::routes::history::render_history;
use crate::routes::util::{category_param, error_fragment, escape_html, get_param, parse_form_body};
use crate::table::assign::{assign_files, Placement};
use crate::table::{parse_table, LoadError};
use serde::Deserialize;
use tracing::{info, warn};

/// JSON body of `POST /api/deck/bulk`.
#[derive(Debug, Deserialize)]
pub struct BulkUpload {
    pub files: Vec<UploadedFile>,
}

#[derive(Debug, Deserialize)]
pub struct UploadedFile {
    pub name: String,
    #[serde(default)]
    pub text: String,
}

fn rows_label(n: usize) -> String {
    format!("{} {}", n, if n == 1 { "row" } else { "rows" })
}

fn ok_line(text: &str) -> String {
    format!(r#"<li class="text-emerald-700">{}</li>"#, text)
}

fn muted_line(text: &str) -> String {
    format!(r#"<li class="opacity-70">{}</li>"#, text)
}

fn err_line(text: &str) -> String {
    format!(r#"<li class="text-red-700">{}</li>"#, text)
}

/// Parse `text` and load it into `category`. Returns the row count.
fn load_into(category: Category, name: &str, text: &str) -> Result<usize, LoadError> {
    let records = parse_table(text).inspect_err(|e| {
        warn!(file = name, %category, error = %e, "table failed to parse");
    })?;
    let rows = records.len();
    with_engine_mut(|engine| engine.load_category(category, records));
    Ok(rows)
}

/// Wrap report lines and append out-of-band refreshes of the panel and the
/// (now cleared) history.
fn report(lines: &[String]) -> String {
    let mut h = String::with_capacity(1024);
    h.push_str(r#"<ul id="load-report" class="text-sm p-3">"#);
    for line in lines {
        h.push_str(line);
    }
    h.push_str(r#"</ul>"#);
    h.push_str(&render_panel(true));
    h.push_str(&render_history(true));
    h
}

// ── POST /api/deck/load ────────────────────────────────────────────

/// Handle POST /api/deck/load
/// Body params: category={name}&name={filename}&csv={file text}
pub fn handle_load_post(body: &str) -> String {
    let params = parse_form_body(body);
    let Some(category) = category_param(&params) else {
        warn!("load with unknown category");
        return error_fragment("Unknown or missing category");
    };
    let name = get_param(&params, "name").unwrap_or("upload");
    let text = get_param(&params, "csv").unwrap_or("");

    let line = match load_into(category, name, text) {
        Ok(rows) => ok_line(&format!(
            "{} &rarr; {} ({})",
            escape_html(name),
            category.label(),
            rows_label(rows)
        )),
        Err(e) => err_line(&format!(
            "{} &rarr; {} failed: {}",
            escape_html(name),
            category.label(),
            escape_html(&e.to_string())
        )),
    };
    report(&[line])
}

// ── POST /api/deck/bulk ────────────────────────────────────────────

/// Handle POST /api/deck/bulk
/// Body: `{"files":[{"name":"items.csv","text":"..."}, ...]}`
///
/// Assigns every file to a category by filename, then parses and loads the
/// files that still hold an assignment, in upload order.
pub fn handle_bulk_post(body: &str) -> String {
    let upload: BulkUpload = match serde_json::from_str(body) {
        Ok(u) => u,
        Err(e) => {
            warn!(error = %e, "invalid bulk upload body");
            return error_fragment(&format!("Invalid bulk upload: {}", e));
        }
    };

    let names: Vec<&str> = upload.files.iter().map(|f| f.name.as_str()).collect();
    let assignments = assign_files(&names);
    info!(files = assignments.len(), "bulk upload");

    let mut lines = Vec::with_capacity(assignments.len());
    for (assignment, file) in assignments.iter().zip(&upload.files) {
        let name = escape_html(&assignment.name);
        let (category, note) = match &assignment.placement {
            Placement::Skipped => {
                lines.push(muted_line(&format!(
                    "{} skipped: all categories already assigned",
                    name
                )));
                continue;
            }
            _ if !assignment.active => {
                lines.push(muted_line(&format!("{} replaced by a later file", name)));
                continue;
            }
            Placement::Matched(c) => (*c, String::new()),
            Placement::Default(c) => (*c, " (default)".to_string()),
            Placement::Override { category, replaced } => {
                (*category, format!(" (override of {})", escape_html(replaced)))
            }
        };

        match load_into(category, &file.name, &file.text) {
            Ok(rows) => lines.push(ok_line(&format!(
                "{} &rarr; {}{}: {}",
                name,
                category.label(),
                note,
                rows_label(rows)
            ))),
            Err(e) => lines.push(err_line(&format!(
                "{} &rarr; {}{} failed: {}",
                name,
                category.label(),
                note,
                escape_html(&e.to_string())
            ))),
        }
    }

    report(&lines)
}
