//! # Rendering
//!
//! Turns `CmdResult` values into terminal text. Functions here return strings
//! and never print, so the layout can be tested directly.
//!
//! ## List Layout
//!
//! ```text
//!   hat-2024      Wool Beanie                         accessory     45.00
//!   tee-01      ★ Logo Tee, long names are trunc…     top           25.00  archived 3 days ago
//! ```
//!
//! The name column is truncated by display width (`unicode-width`), so wide
//! characters do not break alignment.

use catalogapp::api::{CmdMessage, MessageLevel};
use catalogapp::commands::{BatchSummary, OpStatus};
use catalogapp::model::CanonicalRecord;
use chrono::{DateTime, Utc};
use console::{style, StyledObject};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const LINE_WIDTH: usize = 100;
const COL_ID: usize = 14;
const COL_CATEGORY: usize = 14;
const COL_PRICE: usize = 10;
const COL_MARKER: usize = 2;
const FEATURED_MARKER: &str = "★";

pub fn render_messages(messages: &[CmdMessage]) -> String {
    let mut out = String::new();
    for message in messages {
        out.push_str(&styled_message(message).to_string());
        out.push('\n');
    }
    out
}

fn styled_message(message: &CmdMessage) -> StyledObject<&str> {
    let content = message.content.as_str();
    match message.level {
        MessageLevel::Info => style(content).dim(),
        MessageLevel::Success => style(content).green(),
        MessageLevel::Warning => style(content).yellow(),
        MessageLevel::Error => style(content).red(),
    }
}

pub fn render_list(records: &[CanonicalRecord], now: DateTime<Utc>) -> String {
    let mut out = String::new();
    let name_width = LINE_WIDTH.saturating_sub(2 + COL_ID + COL_MARKER + COL_CATEGORY + COL_PRICE);

    for record in records {
        let id = pad_to_width(&truncate_to_width(&record.id, COL_ID - 1), COL_ID);
        let marker = if record.is_featured {
            format!("{} ", FEATURED_MARKER)
        } else {
            " ".repeat(COL_MARKER)
        };
        let name = pad_to_width(&truncate_to_width(&record.name, name_width - 1), name_width);
        let category = pad_to_width(
            &truncate_to_width(&record.category, COL_CATEGORY - 1),
            COL_CATEGORY,
        );
        let price = format!("{:>width$.2}", record.price, width = COL_PRICE);

        let mut line = format!(
            "  {}{}{}{}{}",
            style(id).yellow(),
            style(marker).yellow(),
            name,
            style(category).dim(),
            price
        );
        if record.archived {
            let when = record
                .archived_at
                .map(|at| format_time_ago(at, now))
                .unwrap_or_else(|| "no timestamp".to_string());
            line.push_str(&format!("  {}", style(format!("archived {}", when)).red()));
        }
        out.push_str(&line);
        out.push('\n');
    }
    out
}

pub fn render_batch(summary: &BatchSummary) -> String {
    let mut out = String::new();
    for (i, outcome) in summary.outcomes.iter().enumerate() {
        let status = match outcome.status {
            OpStatus::Applied => style("applied").green(),
            OpStatus::Skipped => style("skipped").dim(),
            OpStatus::Failed => style("FAILED ").red().bold(),
        };
        out.push_str(&format!("{:>3}. {}  {}\n", i + 1, status, outcome.op));
        for message in &outcome.messages {
            out.push_str(&format!("       {}\n", styled_message(message)));
        }
    }
    out
}

pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}

fn pad_to_width(s: &str, width: usize) -> String {
    let padding = width.saturating_sub(s.width());
    format!("{}{}", s, " ".repeat(padding))
}

fn format_time_ago(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let duration = now.signed_duration_since(timestamp);
    let formatter = timeago::Formatter::new();
    formatter.convert(duration.to_std().unwrap_or_default())
}
