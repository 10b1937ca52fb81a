//! Stored-name generation for uploads.
//!
//! Names have the form `<millis>-<sanitized original name>`. The millisecond
//! prefix is taken from the wall clock but forced strictly increasing, so two
//! uploads in the same millisecond still get distinct names.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Longest sanitized name kept, in bytes.
const MAX_NAME_LEN: usize = 200;

/// Fallback when nothing usable survives sanitization.
const FALLBACK_NAME: &str = "upload";

/// Produces unique, time-prefixed stored names.
#[derive(Debug, Default)]
pub struct StoredNameGenerator {
    last: AtomicU64,
}

impl StoredNameGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next stored name for a client-supplied file name.
    pub fn next_name(&self, original_name: &str) -> String {
        format!("{}-{}", self.next_stamp(), sanitize_file_name(original_name))
    }

    /// Next prefix: the current time in milliseconds, or one past the last
    /// prefix handed out if the clock has not moved forward.
    pub fn next_stamp(&self) -> u64 {
        let now = now_millis();
        let previous = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or_else(|last| last);

        now.max(previous + 1)
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Reduce a client-supplied file name to something safe to use on disk.
///
/// Directory components are dropped, characters outside `[A-Za-z0-9._-]` are
/// replaced by `_`, and leading dots are stripped so the result is never a
/// hidden file or a `..` component.
pub fn sanitize_file_name(original: &str) -> String {
    let base = original.rsplit(['/', '\\']).next().unwrap_or_default();

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let trimmed = cleaned.trim_start_matches('.');
    if trimmed.is_empty() {
        return FALLBACK_NAME.to_string();
    }

    // Keep the tail so the extension survives truncation
    if trimmed.len() > MAX_NAME_LEN {
        trimmed[trimmed.len() - MAX_NAME_LEN..].to_string()
    } else {
        trimmed.to_string()
    }
}
