use super::state::MemberState;
use super::types::ScheduleOptions;
use crate::model::{DayClassification, Member};
use rust_decimal::Decimal;
use tracing::debug;

/// Indices (dans le roster) des membres escalados ce jour-là.
///
/// Tri stable par solde restant croissant dans l'escala du jour : à
/// égalité, l'ordre du roster décide. Sans découvert autorisé, tout
/// candidat incapable de payer la folga du jour travaille d'office.
pub(super) fn pick_workers(
    members: &[Member],
    snapshot: &[MemberState],
    day: &DayClassification,
    debit: Decimal,
    opts: &ScheduleOptions,
) -> Vec<usize> {
    let rotation = day.rotation();
    let mut candidates: Vec<usize> = members
        .iter()
        .enumerate()
        .filter(|(_, m)| m.can_work(rotation))
        .map(|(idx, _)| idx)
        .collect();
    candidates.sort_by_key(|&idx| snapshot[idx].budget.get(rotation));

    let mut need = opts.staffing.headcount(day);
    if let Some(holiday) = day.holiday.as_ref().filter(|h| h.is_major) {
        let policy = opts.major_holiday;
        if policy.enabled && candidates.len() >= 2 {
            need = need.min(policy.headcount.max(1));
            debug!(date = %day.date, holiday = holiday.name.as_str(), need, "ajuste especial");
        }
    }

    let forced = if opts.allow_budget_overdraft {
        0
    } else {
        candidates
            .iter()
            .take_while(|&&idx| snapshot[idx].budget.get(rotation) < debit)
            .count()
    };

    candidates.truncate(need.max(forced));
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Eligibility, Holiday, HolidayKind, RestBudget};
    use crate::scheduler::types::CarryOver;
    use chrono::NaiveDate;

    fn member(name: &str, eligibility: Eligibility, weekday: i64, weekend: i64) -> Member {
        Member::new(
            name,
            eligibility,
            RestBudget::new(Decimal::from(weekday), Decimal::from(weekend)),
        )
    }

    fn day(y: i32, m: u32, d: u32, weekend: bool, holiday: Option<Holiday>) -> DayClassification {
        DayClassification {
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            holiday,
            is_weekend_rotation: weekend,
            is_special_period: false,
        }
    }

    fn snapshot(members: &[Member]) -> Vec<MemberState> {
        members
            .iter()
            .map(|m| MemberState::seed(m, &CarryOver::default()))
            .collect()
    }

    #[test]
    fn lowest_remaining_budget_works_first() {
        let members = vec![
            member("a", Eligibility::Both, 5, 5),
            member("b", Eligibility::Both, 3, 5),
            member("c", Eligibility::Both, 4, 5),
        ];
        let snap = snapshot(&members);
        let d = day(2024, 3, 4, false, None);
        let picked = pick_workers(&members, &snap, &d, Decimal::ONE, &ScheduleOptions::default());
        assert_eq!(picked, vec![1]);
    }

    #[test]
    fn ties_keep_roster_order() {
        let members = vec![
            member("a", Eligibility::Both, 5, 5),
            member("b", Eligibility::Both, 5, 5),
        ];
        let snap = snapshot(&members);
        let d = day(2024, 3, 4, false, None);
        let mut opts = ScheduleOptions::default();
        opts.staffing.weekday = 1;
        assert_eq!(pick_workers(&members, &snap, &d, Decimal::ONE, &opts), vec![0]);
    }

    #[test]
    fn exhausted_members_are_forced_to_work() {
        let members = vec![
            member("a", Eligibility::Both, 0, 5),
            member("b", Eligibility::Both, 0, 5),
            member("c", Eligibility::Both, 5, 5),
        ];
        let snap = snapshot(&members);
        let d = day(2024, 3, 4, false, None);
        let picked = pick_workers(&members, &snap, &d, Decimal::ONE, &ScheduleOptions::default());
        assert_eq!(picked, vec![0, 1]);

        let opts = ScheduleOptions {
            allow_budget_overdraft: true,
            ..ScheduleOptions::default()
        };
        assert_eq!(pick_workers(&members, &snap, &d, Decimal::ONE, &opts), vec![0]);
    }

    #[test]
    fn major_holiday_reduces_headcount_only_with_two_candidates() {
        let natal = Holiday::new(
            NaiveDate::from_ymd_opt(2024, 12, 25).unwrap(),
            "Natal",
            HolidayKind::National,
        )
        .major();
        let members = vec![
            member("a", Eligibility::Both, 5, 5),
            member("b", Eligibility::Both, 5, 5),
            member("c", Eligibility::WeekdayOnly, 5, 5),
        ];
        let snap = snapshot(&members);
        let d = day(2024, 12, 25, true, Some(natal));
        let mut opts = ScheduleOptions::default();
        opts.staffing.weekend = 2;
        assert_eq!(pick_workers(&members, &snap, &d, Decimal::from(2), &opts).len(), 1);

        opts.major_holiday.enabled = false;
        assert_eq!(pick_workers(&members, &snap, &d, Decimal::from(2), &opts).len(), 2);
    }

    #[test]
    fn ineligible_and_count_only_are_never_picked() {
        let mut on_leave = member("leave", Eligibility::Both, 0, 0);
        on_leave.count_only = true;
        let members = vec![
            on_leave,
            member("weekday", Eligibility::WeekdayOnly, 0, 0),
            member("weekend", Eligibility::WeekendOnly, 5, 5),
        ];
        let snap = snapshot(&members);
        let d = day(2024, 3, 9, true, None);
        let picked = pick_workers(&members, &snap, &d, Decimal::ONE, &ScheduleOptions::default());
        assert_eq!(picked, vec![2]);
    }
}
