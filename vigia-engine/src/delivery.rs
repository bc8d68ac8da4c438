//! Delivery-status classification.
//!
//! Pure functions of (now, schedule, lead time, delivery history). No I/O
//! and no error paths: missing inputs degrade to `Unscheduled`, never to a
//! failure. The human-readable strings match the wording shown in the
//! catalog UI.

use chrono::Duration;
use vigia_core::{DeliveryState, Frequency, Timestamp, DEFAULT_ALERT_LEAD_HOURS};

/// Inputs to one classification. All fields optional except `now`, which
/// the caller supplies separately.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeliveryInputs {
    /// Next scheduled run, if any.
    pub next_run: Option<Timestamp>,
    /// Alert lead hours from policy; `DEFAULT_ALERT_LEAD_HOURS` when unset.
    pub lead_hours: Option<i64>,
    /// Most recent recorded delivery.
    pub last_delivered: Option<Timestamp>,
    /// Scheduling frequency, needed to locate the current cycle start.
    pub frequency: Option<Frequency>,
}

/// Whole hours until `next_run`, truncated toward zero. Negative when
/// `next_run` is in the past. Truncation keeps the state stable at the
/// lead-window boundary instead of flapping on fractional hours.
pub fn hours_until(next_run: Timestamp, now: Timestamp) -> i64 {
    (next_run - now).num_hours()
}

/// Classify a report's delivery state at `now`.
pub fn classify(now: Timestamp, inputs: &DeliveryInputs) -> DeliveryState {
    let Some(next_run) = inputs.next_run else {
        return DeliveryState::Unscheduled;
    };

    // The delivered axis wins over the time axis: a delivery at or after
    // the start of the current cycle means this cycle is already covered.
    if let (Some(last), Some(frequency)) = (inputs.last_delivered, inputs.frequency) {
        if let Some(cycle) = frequency.nominal_cycle() {
            if last >= next_run - cycle {
                return DeliveryState::Delivered;
            }
        }
    }

    if now > next_run {
        return DeliveryState::Overdue;
    }

    let lead = inputs.lead_hours.unwrap_or(DEFAULT_ALERT_LEAD_HOURS);
    if hours_until(next_run, now) <= lead {
        DeliveryState::DueSoon
    } else {
        DeliveryState::OnTime
    }
}

/// Human-readable time-remaining string for the catalog view.
///
/// `"N/A"` when unscheduled; `"{h}h restantes"` under a day out;
/// `"{d}d {h}h"` a day or more out; overdue renders `"{h}h de retraso"`
/// under a day late and `"{d}d {h}h de retraso"` from a day late on.
pub fn time_remaining(now: Timestamp, next_run: Option<Timestamp>) -> String {
    let Some(next_run) = next_run else {
        return "N/A".to_string();
    };

    let delta = next_run - now;
    if delta < Duration::zero() {
        let hours = (-delta).num_hours();
        if hours >= 24 {
            format!("{}d {}h de retraso", hours / 24, hours % 24)
        } else {
            format!("{hours}h de retraso")
        }
    } else {
        let hours = delta.num_hours();
        if hours < 24 {
            format!("{hours}h restantes")
        } else {
            format!("{}d {}h", hours / 24, hours % 24)
        }
    }
}


#[cfg(test)]
mod prop_tests {
    use super::*;
    use chrono::Utc;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Classification is total: any combination of inputs yields a
        /// state and never panics.
        #[test]
        fn prop_classify_is_total(
            offset_hours in -1000i64..1000,
            lead in proptest::option::of(0i64..200),
            delivered_offset in proptest::option::of(-1000i64..1000),
        ) {
            let now = Utc::now();
            let inputs = DeliveryInputs {
                next_run: Some(now + Duration::hours(offset_hours)),
                lead_hours: lead,
                last_delivered: delivered_offset.map(|h| now + Duration::hours(h)),
                frequency: Some(Frequency::Monthly),
            };
            let state = classify(now, &inputs);
            prop_assert!((1..=5).contains(&state.sort_rank()));
        }

        /// Overdue strings always carry the "de retraso" suffix and
        /// non-overdue ones never do.
        #[test]
        fn prop_time_remaining_suffix(offset_hours in -1000i64..1000) {
            let now = Utc::now();
            let s = time_remaining(now, Some(now + Duration::hours(offset_hours)));
            if offset_hours < 0 {
                prop_assert!(s.ends_with("de retraso"));
            } else {
                prop_assert!(!s.contains("retraso"));
            }
        }
    }
}
