//! Stamp-once timestamps shared by every record with a "first time in state X" column.

use chrono::{DateTime, Utc};

/// Decide the timestamp a record should carry after a state change.
///
/// `existing` is the stamp already stored, `entering` tells whether the record is
/// now in the stamping state (paid, resolved, read). A stored stamp always wins;
/// otherwise the record is stamped with `now` on entry and left empty otherwise.
pub fn stamp_on_entry(
    existing: Option<DateTime<Utc>>,
    entering: bool,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    match existing {
        Some(stamp) => Some(stamp),
        None if entering => Some(now),
        None => None,
    }
}
