mod selection;
mod state;
mod types;
mod util;

pub use types::{
    BudgetUnderflow, CarryOver, MajorHolidayPolicy, MemberLedger, SchedError, Schedule,
    ScheduleOptions, Staffing,
};

use crate::holidays::{HolidayCalendar, HolidayResolver};
use crate::model::{Assignment, Duty, Member, RestReason};
use crate::storage::Storage;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use state::MemberState;
use std::collections::HashSet;
use tracing::{info, warn};

/// Scheduler : encapsule le roster et les options d'une génération
#[derive(Debug, Default)]
pub struct Scheduler {
    members: Vec<Member>,
    opts: ScheduleOptions,
}

impl Scheduler {
    pub fn new(opts: ScheduleOptions) -> Self {
        Self {
            members: Vec::new(),
            opts,
        }
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn options(&self) -> &ScheduleOptions {
        &self.opts
    }

    pub fn options_mut(&mut self) -> &mut ScheduleOptions {
        &mut self.opts
    }

    pub fn add_members(&mut self, members: Vec<Member>) {
        self.members.extend(members);
    }

    pub fn generate(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        calendar: &dyn HolidayCalendar,
    ) -> Result<Schedule, SchedError> {
        generate_schedule(&self.members, start, end, calendar, &self.opts)
    }

    /// Charge les feriados organisationnels de la période avant de générer.
    pub fn generate_with<S: Storage>(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        resolver: &HolidayResolver<S>,
    ) -> Result<Schedule, SchedError> {
        if start > end {
            return Err(SchedError::InvalidRange { start, end });
        }
        resolver.load_range(start, end)?;
        self.generate(start, end, resolver)
    }
}

/// Génère l'escala jour par jour, de `start` à `end` inclus.
///
/// Chaque jour est décidé sur l'état de la veille puis appliqué d'un bloc.
/// Déterministe : mêmes entrées, même sortie.
pub fn generate_schedule(
    members: &[Member],
    start: NaiveDate,
    end: NaiveDate,
    calendar: &dyn HolidayCalendar,
    opts: &ScheduleOptions,
) -> Result<Schedule, SchedError> {
    if start > end {
        return Err(SchedError::InvalidRange { start, end });
    }
    if let Some(dup) = util::find_duplicate_id(members) {
        return Err(SchedError::DuplicateMember(dup.id.as_str().to_string()));
    }
    if members.is_empty() {
        return Ok(Schedule::default());
    }

    let mut states: Vec<MemberState> = members
        .iter()
        .map(|m| MemberState::seed(m, &opts.carry_over))
        .collect();
    let mut schedule = Schedule::default();

    for date in util::days(start, end) {
        let day = calendar.classify(date);
        let rotation = day.rotation();
        if day.is_holiday() {
            schedule.days_with_holidays.push(date);
        }
        let debit = day
            .scheduling_holiday()
            .map_or(Decimal::ONE, |h| h.bonus_rest_days);

        let workers: HashSet<usize> =
            selection::pick_workers(members, &states, &day, debit, opts)
                .into_iter()
                .collect();

        for (idx, member) in members.iter().enumerate() {
            if !member.active {
                continue;
            }
            let state = &mut states[idx];
            let duty = if workers.contains(&idx) {
                state.work(rotation);
                Duty::Work
            } else {
                let eligible = member.eligibility.permits(rotation);
                let reason = if !eligible {
                    RestReason::NotEligible
                } else if member.count_only {
                    RestReason::CountOnly
                } else {
                    RestReason::Rotation
                };
                let streak = state.rest(rotation);
                if eligible {
                    if let Some(w) =
                        state.debit(member, date, rotation, debit, opts.allow_budget_overdraft)
                    {
                        warn!(
                            member = member.id.as_str(),
                            %date,
                            %rotation,
                            shortfall = %w.shortfall,
                            balance = %w.balance,
                            "rest budget underflow"
                        );
                        schedule.warnings.push(w);
                    }
                }
                Duty::Rest { streak, reason }
            };
            schedule.assignments.push(Assignment {
                member: member.id.clone(),
                date,
                rotation,
                duty,
            });
        }
    }

    schedule.ledgers = members
        .iter()
        .zip(states)
        .filter(|(m, _)| m.active)
        .map(|(m, s)| s.into_ledger(m))
        .collect();

    info!(
        %start,
        %end,
        members = members.len(),
        assignments = schedule.assignments.len(),
        holidays = schedule.days_with_holidays.len(),
        warnings = schedule.warnings.len(),
        "schedule generated"
    );
    Ok(schedule)
}
