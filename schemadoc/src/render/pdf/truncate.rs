//! Cell truncation limits for PDF tables.
//!
//! A value longer than its limit keeps its first `max` characters and
//! gains a trailing "...".

use std::borrow::Cow;

pub const COLUMN_NAME: usize = 15;
pub const COLUMN_TYPE: usize = 18;
pub const COLUMN_DEFAULT: usize = 20;
pub const COLUMN_DESCRIPTION: usize = 30;
pub const INDEX_NAME: usize = 20;
pub const INDEX_COLUMNS: usize = 25;
pub const CONSTRAINT_NAME: usize = 18;
pub const CONSTRAINT_COLUMNS: usize = 15;
pub const CONSTRAINT_DEFINITION: usize = 30;
pub const VIEW_DEFINITION: usize = 500;

/// Cuts `value` to `max` characters plus "..." when it is longer.
pub fn truncate(value: &str, max: usize) -> Cow<'_, str> {
    match value.char_indices().nth(max) {
        None => Cow::Borrowed(value),
        Some((cut, _)) => Cow::Owned(format!("{}...", &value[..cut])),
    }
}
