//! # Dataset Writer
//!
//! The storefront embeds the catalog as a single declaration inside a source
//! file, e.g.
//!
//! ```text
//! import type { Product } from "./types";
//!
//! export const products: Product[] = [
//!   {
//!     "id": "p1",
//!     ...
//!   }
//! ];
//!
//! export default products;
//! ```
//!
//! The block runs from the header token through the first terminator that
//! starts a line after it. Only that span is ever replaced; every other byte
//! of the file is carried over unchanged.
//!
//! ## Determinism
//!
//! The literal is rendered with `serde_json`: keys follow the field order of
//! [`CanonicalRecord`], maps are `BTreeMap`s, numbers use shortest round-trip
//! formatting. Same records in, same bytes out.
//!
//! ## Write Safety
//!
//! The file is read inside a scope that drops its handle before anything else
//! happens. The new content goes to a temp file in the same directory which is
//! then renamed over the original, so readers observe either the old or the
//! new file, never a mix. Nothing is written when the markers cannot be
//! located or the content is unchanged.

use crate::config::ArtifactConfig;
use crate::error::{CatalogError, Result};
use crate::model::CanonicalRecord;
use std::fs::{self, File};
use std::io::Read;
use std::ops::Range;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const INDENT: &str = "  ";

/// Where and how the dataset is embedded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactTarget {
    pub path: PathBuf,
    pub header: String,
    pub terminator: String,
}

impl ArtifactTarget {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let defaults = ArtifactConfig::default();
        Self {
            path: path.into(),
            header: defaults.header,
            terminator: defaults.terminator,
        }
    }

    pub fn from_config(config: &ArtifactConfig, path: PathBuf) -> Self {
        Self {
            path,
            header: config.header.clone(),
            terminator: config.terminator.clone(),
        }
    }

    fn format_error(&self, reason: impl Into<String>) -> CatalogError {
        CatalogError::ArtifactFormat {
            path: self.path.clone(),
            reason: reason.into(),
        }
    }

    fn io_error(&self, source: std::io::Error) -> CatalogError {
        CatalogError::ArtifactIo {
            path: self.path.clone(),
            source,
        }
    }
}

/// Serialize records as the literal that follows the header.
///
/// Always multi-line, so the terminator lands at the start of its own line
/// even for an empty catalog.
pub fn render_literal(records: &[CanonicalRecord], terminator: &str) -> Result<String> {
    let mut out = String::from("[\n");
    for (i, record) in records.iter().enumerate() {
        let json = serde_json::to_string_pretty(record)?;
        for (j, line) in json.lines().enumerate() {
            if j > 0 {
                out.push('\n');
            }
            out.push_str(INDENT);
            out.push_str(line);
        }
        if i + 1 < records.len() {
            out.push(',');
        }
        out.push('\n');
    }
    out.push_str(terminator);
    Ok(out)
}

/// Byte range of the declaration block inside `content`.
///
/// The header only counts where it opens a line (indentation allowed), so the
/// same text inside a rendered string value is never mistaken for a second
/// declaration.
pub fn locate_block(
    content: &str,
    header: &str,
    terminator: &str,
) -> std::result::Result<Range<usize>, String> {
    if header.is_empty() || terminator.is_empty() {
        return Err("header and terminator tokens must not be empty".to_string());
    }

    let mut starts = content
        .match_indices(header)
        .map(|(i, _)| i)
        .filter(|&i| opens_line(content, i));
    let start = starts
        .next()
        .ok_or_else(|| format!("declaration header '{}' not found", header))?;
    let extra = starts.count();
    if extra > 0 {
        return Err(format!(
            "declaration header '{}' appears {} times; expected exactly one",
            header,
            extra + 1
        ));
    }

    let body_start = start + header.len();
    let needle = format!("\n{}", terminator);
    let rel = content[body_start..].find(&needle).ok_or_else(|| {
        format!(
            "terminating token '{}' not found at the start of a line after the header",
            terminator
        )
    })?;
    let end = body_start + rel + needle.len();

    Ok(start..end)
}

/// True when only spaces or tabs precede `index` on its line.
fn opens_line(content: &str, index: usize) -> bool {
    let line_start = content[..index].rfind('\n').map_or(0, |i| i + 1);
    content[line_start..index]
        .chars()
        .all(|c| c == ' ' || c == '\t')
}

/// Replace the declaration block in `content` with a fresh rendering of `records`.
pub fn splice(
    content: &str,
    target: &ArtifactTarget,
    records: &[CanonicalRecord],
) -> Result<String> {
    let range = locate_block(content, &target.header, &target.terminator)
        .map_err(|reason| target.format_error(reason))?;
    let literal = render_literal(records, &target.terminator)?;

    let mut out = String::with_capacity(content.len() + literal.len());
    out.push_str(&content[..range.start]);
    out.push_str(&target.header);
    out.push(' ');
    out.push_str(&literal);
    out.push_str(&content[range.end..]);
    Ok(out)
}

/// A computed but not yet applied artifact update.
#[derive(Debug)]
pub struct PreparedWrite {
    pub path: PathBuf,
    pub content: String,
    pub changed: bool,
    pub records: usize,
}

impl PreparedWrite {
    /// Atomically replace the artifact with the prepared content.
    /// A no-op when nothing changed.
    pub fn commit(&self) -> Result<()> {
        if !self.changed {
            return Ok(());
        }
        atomic_write(&self.path, &self.content).map_err(|source| CatalogError::ArtifactIo {
            path: self.path.clone(),
            source,
        })
    }
}

/// Read the artifact and compute its updated content. Never writes.
pub fn prepare(target: &ArtifactTarget, records: &[CanonicalRecord]) -> Result<PreparedWrite> {
    let original = {
        let mut file = File::open(&target.path).map_err(|e| target.io_error(e))?;
        let mut buf = String::new();
        file.read_to_string(&mut buf).map_err(|e| target.io_error(e))?;
        buf
    };

    let content = splice(&original, target, records)?;
    let changed = content != original;
    Ok(PreparedWrite {
        path: target.path.clone(),
        content,
        changed,
        records: records.len(),
    })
}

/// Prepare and commit in one step.
pub fn write(target: &ArtifactTarget, records: &[CanonicalRecord]) -> Result<PreparedWrite> {
    let prepared = prepare(target, records)?;
    prepared.commit()?;
    Ok(prepared)
}

fn atomic_write(path: &Path, content: &str) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "artifact".to_string());

    let tmp_file = dir.join(format!(".{}-{}.tmp", name, Uuid::new_v4()));
    fs::write(&tmp_file, content)?;
    if let Err(e) = fs::rename(&tmp_file, path) {
        let _ = fs::remove_file(&tmp_file);
        return Err(e);
    }
    Ok(())
}
