//! Reminder status evaluation.
//!
//! A reminder's status is computed fresh on every read from a snapshot of
//! its rule, its service item and the car's current mileage; nothing here
//! mutates or caches state. The two trigger axes are combined with OR at
//! every stage and overdue always wins over due-soon.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::mileage;
use crate::models::{car, mileage_log, reminder, service_item};

/// Where a reminder stands relative to its next-due thresholds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReminderStatus {
    /// No configured axis has reached its warning threshold.
    Satisfied,
    /// Within the warning lead on at least one axis, but not yet overdue.
    DueSoon,
    /// Past the next-due threshold on at least one axis.
    Overdue,
}

/// Evaluate a reminder against an already-derived current mileage.
///
/// Callers must read the rule, the service item and the mileage aggregate
/// from one consistent snapshot. Activity (`is_active`) is a filter concern
/// for callers; the evaluation itself ignores it.
///
/// Rules with neither interval configured are rejected at the write
/// boundary and violate this function's precondition.
#[must_use]
pub fn evaluate_at(
    reminder: &reminder::Model,
    item: &service_item::Model,
    current_mileage: i32,
    now: DateTime<Utc>,
) -> ReminderStatus {
    debug_assert!(
        reminder.interval_mileage.is_some() || reminder.interval_days.is_some(),
        "reminder {} has no trigger axis",
        reminder.id
    );

    let next_mileage = reminder.next_service_mileage(item);
    let next_date = reminder.next_service_date(item);

    let mileage_overdue = next_mileage.is_some_and(|next| current_mileage > next);
    let date_overdue = next_date.is_some_and(|next| now > next);
    if mileage_overdue || date_overdue {
        return ReminderStatus::Overdue;
    }

    let mileage_due_soon = match (next_mileage, reminder.warning_mileage_before) {
        (Some(next), Some(warning)) => current_mileage >= next - warning,
        _ => false,
    };
    let date_due_soon = match (next_date, reminder.warning_days_before) {
        (Some(next), Some(warning)) => now >= next - Duration::days(i64::from(warning)),
        _ => false,
    };
    if mileage_due_soon || date_due_soon {
        return ReminderStatus::DueSoon;
    }

    ReminderStatus::Satisfied
}

/// Convenience form deriving current mileage from the car and its log
/// entries first. The entries must belong to the same snapshot as the rule
/// and service item.
#[must_use]
pub fn evaluate(
    reminder: &reminder::Model,
    item: &service_item::Model,
    car: &car::Model,
    logs: &[mileage_log::Model],
    now: DateTime<Utc>,
) -> ReminderStatus {
    evaluate_at(reminder, item, mileage::current_mileage(car, logs), now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn item(last_service_mileage: i32, last_service_date: DateTime<Utc>) -> service_item::Model {
        service_item::Model {
            id: Uuid::new_v4(),
            car_id: Uuid::new_v4(),
            name: "oil change".to_string(),
            last_service_date,
            last_service_mileage,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn rule(
        item: &service_item::Model,
        interval_mileage: Option<i32>,
        interval_days: Option<i32>,
        warning_mileage_before: Option<i32>,
        warning_days_before: Option<i32>,
    ) -> reminder::Model {
        reminder::Model {
            id: Uuid::new_v4(),
            car_id: item.car_id,
            service_item_id: item.id,
            is_active: true,
            interval_mileage,
            interval_days,
            warning_mileage_before,
            warning_days_before,
            comment: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn jan(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_mileage_only_axis() {
        let item = item(12_000, jan(1));
        let rule = rule(&item, Some(5000), None, Some(1000), None);
        let now = jan(10);

        // next due at 17,000; warning from 16,000
        assert_eq!(evaluate_at(&rule, &item, 15_000, now), ReminderStatus::Satisfied);
        assert_eq!(evaluate_at(&rule, &item, 16_000, now), ReminderStatus::DueSoon);
        assert_eq!(evaluate_at(&rule, &item, 16_500, now), ReminderStatus::DueSoon);
        assert_eq!(evaluate_at(&rule, &item, 17_000, now), ReminderStatus::DueSoon);
        assert_eq!(evaluate_at(&rule, &item, 17_500, now), ReminderStatus::Overdue);
    }

    #[test]
    fn test_days_only_axis() {
        let item = item(12_000, jan(1));
        let rule = rule(&item, None, Some(30), None, Some(7));

        // next due Jan 31; warning from Jan 24
        assert_eq!(
            evaluate_at(&rule, &item, 50_000, jan(20)),
            ReminderStatus::Satisfied
        );
        assert_eq!(
            evaluate_at(&rule, &item, 50_000, jan(24)),
            ReminderStatus::DueSoon
        );
        assert_eq!(
            evaluate_at(&rule, &item, 50_000, jan(31)),
            ReminderStatus::DueSoon
        );
        assert_eq!(
            evaluate_at(
                &rule,
                &item,
                50_000,
                Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()
            ),
            ReminderStatus::Overdue
        );
    }

    #[test]
    fn test_either_axis_can_force_overdue() {
        let item = item(12_000, jan(1));
        let rule = rule(&item, Some(5000), Some(365), Some(1000), Some(30));
        // Date axis is nowhere near due, mileage axis is past due.
        assert_eq!(
            evaluate_at(&rule, &item, 17_001, jan(2)),
            ReminderStatus::Overdue
        );
        // Mileage axis untouched, date axis past due.
        let late = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        assert_eq!(evaluate_at(&rule, &item, 12_000, late), ReminderStatus::Overdue);
    }

    #[test]
    fn test_overdue_by_one_axis_dominates_due_soon_by_other() {
        let item = item(12_000, jan(1));
        let rule = rule(&item, Some(5000), Some(10), Some(1000), Some(5));
        // Mileage in the warning window, date already past due.
        assert_eq!(
            evaluate_at(&rule, &item, 16_500, jan(15)),
            ReminderStatus::Overdue
        );
    }

    #[test]
    fn test_warning_without_interval_is_inert() {
        let item = item(12_000, jan(1));
        // Date warning configured but no date interval: only mileage counts.
        let rule = rule(&item, Some(5000), None, None, Some(9999));
        assert_eq!(
            evaluate_at(&rule, &item, 12_000, jan(30)),
            ReminderStatus::Satisfied
        );
    }

    #[test]
    fn test_no_warning_jumps_straight_to_overdue() {
        let item = item(12_000, jan(1));
        let rule = rule(&item, Some(5000), None, None, None);
        assert_eq!(evaluate_at(&rule, &item, 17_000, jan(2)), ReminderStatus::Satisfied);
        assert_eq!(evaluate_at(&rule, &item, 17_001, jan(2)), ReminderStatus::Overdue);
    }

    #[test]
    fn test_boundaries_are_exclusive_for_overdue() {
        let item = item(12_000, jan(1));
        let rule = rule(&item, Some(5000), Some(30), None, None);
        // Exactly at the threshold is not yet overdue on either axis.
        assert_eq!(
            evaluate_at(&rule, &item, 17_000, jan(31)),
            ReminderStatus::Satisfied
        );
    }

    #[test]
    fn test_evaluate_derives_mileage_from_logs() {
        let now = jan(10);
        let car = car::Model {
            id: Uuid::new_v4(),
            user_tg_id: 1,
            brand: "Toyota".to_string(),
            model: "Corolla".to_string(),
            year: 2020,
            first_mileage: 10_000,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let mut item = item(12_000, jan(1));
        item.car_id = car.id;
        let rule = rule(&item, Some(5000), None, Some(1000), None);
        let logs = vec![mileage_log::Model {
            id: Uuid::new_v4(),
            car_id: car.id,
            mileage: 16_500,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }];

        assert_eq!(evaluate(&rule, &item, &car, &logs, now), ReminderStatus::DueSoon);
        // No logs: baseline mileage applies.
        assert_eq!(evaluate(&rule, &item, &car, &[], now), ReminderStatus::Satisfied);
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let item = item(12_000, jan(1));
        let rule = rule(&item, Some(5000), Some(30), Some(1000), Some(7));
        let now = jan(26);
        let first = evaluate_at(&rule, &item, 16_200, now);
        for _ in 0..10 {
            assert_eq!(evaluate_at(&rule, &item, 16_200, now), first);
        }
    }
}
