//! The selection ledger.
//!
//! [`SelectionLedger`] records which sampled timestamps the user has chosen,
//! in the order they were chosen. It is a pure in-memory collection with
//! set semantics over an insertion-ordered backing store: adds are
//! idempotent, removes are total, and the insertion order is what later
//! dictates export order. It also carries the transient highlight slot the
//! host UI uses to mark the most recently chosen thumbnail.
//!
//! The ledger is independent of capture state: entries can be added long
//! before any full-resolution raster exists for them.

use std::time::Duration;

/// Insertion-ordered, duplicate-free record of selected timestamps.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use framesift::SelectionLedger;
///
/// let mut ledger = SelectionLedger::new();
/// ledger.add(Duration::from_secs(2));
/// ledger.add(Duration::from_secs(0));
/// ledger.add(Duration::from_secs(2)); // idempotent
///
/// assert_eq!(
///     ledger.ordered_timestamps(),
///     &[Duration::from_secs(2), Duration::from_secs(0)],
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct SelectionLedger {
    /// Selected timestamps in first-insertion order, no duplicates.
    entries: Vec<Duration>,
    /// The most recently highlighted selection, if any.
    highlighted: Option<Duration>,
}

impl SelectionLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            highlighted: None,
        }
    }

    /// Insert `timestamp` if absent. Returns `true` if it was inserted.
    ///
    /// Re-adding a present timestamp leaves the ledger unchanged, including
    /// its position in the insertion order.
    pub fn add(&mut self, timestamp: Duration) -> bool {
        if self.contains(timestamp) {
            return false;
        }
        self.entries.push(timestamp);
        true
    }

    /// Remove `timestamp` if present. Returns `true` if it was removed.
    ///
    /// Removing an absent timestamp is a no-op. A removed timestamp also
    /// loses its highlight.
    pub fn remove(&mut self, timestamp: Duration) -> bool {
        let before = self.entries.len();
        self.entries.retain(|&entry| entry != timestamp);
        if self.highlighted == Some(timestamp) {
            self.highlighted = None;
        }
        self.entries.len() != before
    }

    /// Whether `timestamp` is currently selected.
    pub fn contains(&self, timestamp: Duration) -> bool {
        self.entries.contains(&timestamp)
    }

    /// The selected timestamps in first-insertion order.
    ///
    /// This is the order the export compiler captures in.
    pub fn ordered_timestamps(&self) -> &[Duration] {
        &self.entries
    }

    /// Number of selected timestamps.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Mark `timestamp` as the highlighted selection.
    pub fn highlight(&mut self, timestamp: Duration) {
        self.highlighted = Some(timestamp);
    }

    /// The currently highlighted selection, if any.
    pub fn highlighted(&self) -> Option<Duration> {
        self.highlighted
    }

    /// Drop all selections and the highlight.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.highlighted = None;
    }
}
