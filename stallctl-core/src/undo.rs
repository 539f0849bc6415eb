//! Undo planning over the sales event log
//!
//! Every sale appends a positive delta to the log and bumps the running
//! `qty_units` counter. Undoing `amount` units walks the log from the most
//! recent event backwards: whole events that fit in the remaining amount are
//! deleted, and the first event larger than what is left is reduced in place.
//!
//! Planning is pure. The caller applies the plan and the counter update in a
//! single transaction.

use crate::error::{CoreError, Result};

/// Primary key of a sales event row
pub type EventId = i64;

/// One logged sale, as read from storage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoggedDelta {
    pub id: EventId,
    pub delta: i32,
}

/// An event that survives the undo with a smaller delta
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reduction {
    pub id: EventId,
    pub new_delta: i32,
}

/// Log mutations and counter value produced by [`plan_undo`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UndoPlan {
    /// Events consumed entirely, most recent first
    pub deletions: Vec<EventId>,
    /// At most one event trimmed in place; never reduced to zero
    pub reduction: Option<Reduction>,
    /// Units not covered by any logged event (log shorter than the counter)
    pub unmatched: i32,
    /// Counter value after the undo
    pub new_qty: i32,
}

impl UndoPlan {
    /// Apply the plan to an in-memory copy of the log.
    pub fn apply(&self, events: &mut Vec<LoggedDelta>) {
        events.retain(|e| !self.deletions.contains(&e.id));
        if let Some(reduction) = self.reduction {
            if let Some(event) = events.iter_mut().find(|e| e.id == reduction.id) {
                event.delta = reduction.new_delta;
            }
        }
    }

    pub fn touches_log(&self) -> bool {
        !self.deletions.is_empty() || self.reduction.is_some()
    }
}

/// Plan undoing `amount` units from a counter at `qty_units`.
///
/// `events` must be ordered most recent first. Non-positive entries are
/// skipped; only sales are unwound.
pub fn plan_undo(qty_units: i32, events: &[LoggedDelta], amount: i32) -> Result<UndoPlan> {
    if amount <= 0 {
        return Err(CoreError::NonPositiveDelta { delta: amount });
    }
    if amount > qty_units {
        return Err(CoreError::InsufficientQuantity {
            requested: amount,
            available: qty_units,
        });
    }

    let mut plan = UndoPlan {
        new_qty: qty_units - amount,
        ..UndoPlan::default()
    };
    let mut remaining = amount;

    for event in events.iter().filter(|e| e.delta > 0) {
        if remaining == 0 {
            break;
        }
        if event.delta <= remaining {
            remaining -= event.delta;
            plan.deletions.push(event.id);
        } else {
            plan.reduction = Some(Reduction {
                id: event.id,
                new_delta: event.delta - remaining,
            });
            remaining = 0;
        }
    }

    if remaining > 0 {
        tracing::warn!(
            unmatched = remaining,
            "event log shorter than counter, undo partially unmatched"
        );
    }
    plan.unmatched = remaining;
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a log from deltas listed oldest first; ids increase with age.
    fn log(deltas_oldest_first: &[i32]) -> Vec<LoggedDelta> {
        let mut events: Vec<LoggedDelta> = deltas_oldest_first
            .iter()
            .enumerate()
            .map(|(i, &delta)| LoggedDelta {
                id: i as EventId + 1,
                delta,
            })
            .collect();
        events.reverse();
        events
    }

    #[test]
    fn rejects_more_than_sold() {
        let err = plan_undo(2, &log(&[1, 1]), 3).unwrap_err();
        assert_eq!(
            err,
            CoreError::InsufficientQuantity {
                requested: 3,
                available: 2
            }
        );
    }

    #[test]
    fn rejects_non_positive_amount() {
        assert!(matches!(
            plan_undo(5, &log(&[5]), 0),
            Err(CoreError::NonPositiveDelta { delta: 0 })
        ));
        assert!(plan_undo(5, &log(&[5]), -1).is_err());
    }

    #[test]
    fn consumes_whole_recent_events() {
        // oldest 3, then 1, then 1 (most recent)
        let plan = plan_undo(5, &log(&[3, 1, 1]), 2).unwrap();
        assert_eq!(plan.deletions, vec![3, 2]);
        assert_eq!(plan.reduction, None);
        assert_eq!(plan.new_qty, 3);
        assert_eq!(plan.unmatched, 0);
    }

    #[test]
    fn trims_first_larger_event_in_place() {
        // Most recent event is a bundle of 3; undoing 1 leaves 2 in place
        let plan = plan_undo(4, &log(&[1, 3]), 1).unwrap();
        assert!(plan.deletions.is_empty());
        assert_eq!(plan.reduction, Some(Reduction { id: 2, new_delta: 2 }));
        assert_eq!(plan.new_qty, 3);
    }

    #[test]
    fn mixes_deletion_and_reduction() {
        let mut events = log(&[3, 3, 1]);
        let plan = plan_undo(7, &events, 5).unwrap();
        assert_eq!(plan.deletions, vec![3, 2]);
        assert_eq!(plan.reduction, Some(Reduction { id: 1, new_delta: 2 }));

        plan.apply(&mut events);
        assert_eq!(events, vec![LoggedDelta { id: 1, delta: 2 }]);
    }

    #[test]
    fn exact_match_deletes_without_reduction() {
        let plan = plan_undo(3, &log(&[3]), 3).unwrap();
        assert_eq!(plan.deletions, vec![1]);
        assert_eq!(plan.reduction, None);
        assert_eq!(plan.new_qty, 0);
    }

    #[test]
    fn skips_non_positive_entries() {
        let events = vec![
            LoggedDelta { id: 9, delta: -2 },
            LoggedDelta { id: 8, delta: 0 },
            LoggedDelta { id: 7, delta: 2 },
        ];
        let plan = plan_undo(2, &events, 2).unwrap();
        assert_eq!(plan.deletions, vec![7]);
    }

    #[test]
    fn short_log_reports_unmatched() {
        let plan = plan_undo(10, &log(&[2]), 5).unwrap();
        assert_eq!(plan.deletions, vec![1]);
        assert_eq!(plan.unmatched, 3);
        assert_eq!(plan.new_qty, 5);
        assert!(plan.touches_log());
    }

    #[test]
    fn empty_log_still_decrements_counter() {
        let plan = plan_undo(4, &[], 4).unwrap();
        assert!(!plan.touches_log());
        assert_eq!(plan.unmatched, 4);
        assert_eq!(plan.new_qty, 0);
    }
}
