//! Selection ledger behaviour.

use std::time::Duration;

use framesift::SelectionLedger;

fn secs(value: u64) -> Duration {
    Duration::from_secs(value)
}

#[test]
fn add_preserves_insertion_order() {
    let mut ledger = SelectionLedger::new();
    ledger.add(secs(2));
    ledger.add(secs(0));
    ledger.add(secs(5));

    assert_eq!(ledger.ordered_timestamps(), &[secs(2), secs(0), secs(5)]);
}

#[test]
fn add_is_idempotent() {
    let mut ledger = SelectionLedger::new();
    assert!(ledger.add(secs(1)));
    assert!(!ledger.add(secs(1)));

    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger.ordered_timestamps(), &[secs(1)]);
}

#[test]
fn readd_does_not_move_an_entry() {
    let mut ledger = SelectionLedger::new();
    ledger.add(secs(3));
    ledger.add(secs(7));
    ledger.add(secs(3));

    assert_eq!(ledger.ordered_timestamps(), &[secs(3), secs(7)]);
}

#[test]
fn remove_deletes_the_entry() {
    let mut ledger = SelectionLedger::new();
    ledger.add(secs(1));
    ledger.add(secs(2));
    ledger.add(secs(3));

    assert!(ledger.remove(secs(2)));
    assert!(!ledger.contains(secs(2)));
    assert_eq!(ledger.ordered_timestamps(), &[secs(1), secs(3)]);
}

#[test]
fn remove_absent_is_a_noop() {
    let mut ledger = SelectionLedger::new();
    ledger.add(secs(1));

    assert!(!ledger.remove(secs(9)));
    assert_eq!(ledger.ordered_timestamps(), &[secs(1)]);
}

#[test]
fn remove_never_leaves_the_timestamp_behind() {
    // Regardless of prior insertion order.
    for order in [[0_u64, 4, 8], [8, 0, 4], [4, 8, 0]] {
        let mut ledger = SelectionLedger::new();
        for value in order {
            ledger.add(secs(value));
        }
        ledger.remove(secs(4));
        assert!(!ledger.ordered_timestamps().contains(&secs(4)));
        assert_eq!(ledger.len(), 2);
    }
}

#[test]
fn contains_reflects_membership() {
    let mut ledger = SelectionLedger::new();
    assert!(!ledger.contains(secs(0)));

    ledger.add(secs(0));
    assert!(ledger.contains(secs(0)));
}

#[test]
fn highlight_tracks_latest_selection() {
    let mut ledger = SelectionLedger::new();
    assert_eq!(ledger.highlighted(), None);

    ledger.add(secs(1));
    ledger.highlight(secs(1));
    assert_eq!(ledger.highlighted(), Some(secs(1)));

    // Removing the highlighted entry clears the highlight.
    ledger.remove(secs(1));
    assert_eq!(ledger.highlighted(), None);
}

#[test]
fn clear_empties_everything() {
    let mut ledger = SelectionLedger::new();
    ledger.add(secs(1));
    ledger.add(secs(2));
    ledger.highlight(secs(2));

    ledger.clear();
    assert!(ledger.is_empty());
    assert_eq!(ledger.highlighted(), None);
}
