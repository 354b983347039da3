//! Structural reader for the legacy tag-delimited order export.
//!
//! Every meaningful line has the shape `:<TAG>:<VALUE>`. Lines between a
//! `:UB<n>:` marker and a `:UE:` marker form one line record; everything else
//! lands in the header.

use crate::domain::model::{LegacyDocument, LineRecord};
use regex::Regex;
use std::sync::OnceLock;

const BLOCK_END_TAG: &str = "UE";

fn tag_line_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^:([^:]+):(.*)$").expect("tag line pattern is valid"))
}

fn block_start_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^UB\d+$").expect("block start pattern is valid"))
}

/// Split a single line into `(tag, value)`, both trimmed.
///
/// Returns `None` for anything that is not a tag line.
pub fn parse_tag_line(line: &str) -> Option<(&str, &str)> {
    let caps = tag_line_regex().captures(line.trim())?;
    let tag = caps.get(1)?.as_str().trim();
    let value = caps.get(2)?.as_str().trim();
    if tag.is_empty() {
        return None;
    }
    Some((tag, value))
}

pub fn is_block_start(tag: &str) -> bool {
    block_start_regex().is_match(tag)
}

/// Parse the export text into header fields and ordered line records.
///
/// Never fails: malformed lines are skipped, a block that is reopened before
/// its `UE` is dropped, and an empty block produces no record.
pub fn parse(text: &str) -> LegacyDocument {
    let mut document = LegacyDocument::default();
    let mut current: Option<LineRecord> = None;
    let mut skipped = 0usize;

    // \r\n、\n 與單獨的 \r 都視為換行；空行本來就會被略過
    for raw in text.split(['\n', '\r']) {
        let Some((tag, value)) = parse_tag_line(raw) else {
            if !raw.trim().is_empty() {
                skipped += 1;
            }
            continue;
        };

        if is_block_start(tag) {
            if let Some(open) = current.replace(LineRecord::new()) {
                tracing::debug!(
                    "{} reopened a block before UE, dropping {} pending field(s)",
                    tag,
                    open.len()
                );
            }
            continue;
        }

        if tag == BLOCK_END_TAG {
            if let Some(record) = current.take() {
                if !record.is_empty() {
                    document.lines.push(record);
                }
            }
            continue;
        }

        match current.as_mut() {
            Some(record) => record.set(tag, value),
            None => {
                document.header.insert(tag.to_string(), value.to_string());
            }
        }
    }

    if let Some(open) = current {
        tracing::debug!(
            "Input ended inside a block, dropping {} pending field(s)",
            open.len()
        );
    }
    if skipped > 0 {
        tracing::debug!("Skipped {} line(s) without a :TAG:VALUE shape", skipped);
    }

    document
}
