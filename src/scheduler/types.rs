use crate::holidays::HolidayError;
use crate::model::{Assignment, DayClassification, MemberId, RestBudget, Rotation, Streaks};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Effectif à escalar par jour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Staffing {
    pub weekday: usize,
    pub weekend: usize,
    /// Remplace les deux valeurs pendant le período especial (26–31 déc.).
    pub special_period: Option<usize>,
}

impl Default for Staffing {
    fn default() -> Self {
        Self {
            weekday: 1,
            weekend: 1,
            special_period: None,
        }
    }
}

impl Staffing {
    pub fn headcount(&self, day: &DayClassification) -> usize {
        if day.is_special_period {
            if let Some(n) = self.special_period {
                return n;
            }
        }
        match day.rotation() {
            Rotation::Weekday => self.weekday,
            Rotation::Weekend => self.weekend,
        }
    }
}

/// Ajuste especial : effectif réduit les feriados marqués `is_major`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MajorHolidayPolicy {
    pub enabled: bool,
    pub headcount: usize,
}

impl Default for MajorHolidayPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            headcount: 1,
        }
    }
}

/// État de fin de période réinjecté dans la période suivante.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarryOver {
    pub initial_budgets: BTreeMap<MemberId, RestBudget>,
    pub initial_streaks: BTreeMap<MemberId, Streaks>,
}

impl CarryOver {
    pub fn is_empty(&self) -> bool {
        self.initial_budgets.is_empty() && self.initial_streaks.is_empty()
    }
}

/// Options de génération
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleOptions {
    pub staffing: Staffing,
    pub allow_budget_overdraft: bool,
    pub major_holiday: MajorHolidayPolicy,
    pub carry_over: CarryOver,
}

impl Default for ScheduleOptions {
    fn default() -> Self {
        Self {
            staffing: Staffing::default(),
            allow_budget_overdraft: false,
            major_holiday: MajorHolidayPolicy::default(),
            carry_over: CarryOver::default(),
        }
    }
}

/// Signal non bloquant : le solde d'une escala ne couvre pas la folga du jour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetUnderflow {
    pub member: MemberId,
    pub date: NaiveDate,
    pub rotation: Rotation,
    /// Débit demandé pour cette folga.
    pub requested: Decimal,
    /// Partie du débit non couverte par le solde.
    pub shortfall: Decimal,
    /// Solde après application.
    pub balance: Decimal,
}

/// Bilan par membre en fin de génération.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberLedger {
    pub member: MemberId,
    pub starting_budget: RestBudget,
    pub budget: RestBudget,
    pub consumed: RestBudget,
    pub streaks: Streaks,
    pub work_days: u32,
    pub rest_days: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schedule {
    pub assignments: Vec<Assignment>,
    pub days_with_holidays: Vec<NaiveDate>,
    pub warnings: Vec<BudgetUnderflow>,
    pub ledgers: Vec<MemberLedger>,
}

impl Schedule {
    pub fn for_member<'a, 'b>(&'a self, id: &'b MemberId) -> impl Iterator<Item = &'a Assignment> + 'b
    where
        'a: 'b,
    {
        self.assignments.iter().filter(move |a| &a.member == id)
    }

    pub fn on(&self, date: NaiveDate) -> impl Iterator<Item = &Assignment> + '_ {
        self.assignments.iter().filter(move |a| a.date == date)
    }

    pub fn ledger(&self, id: &MemberId) -> Option<&MemberLedger> {
        self.ledgers.iter().find(|l| &l.member == id)
    }

    /// Soldes et séries à passer à la période suivante.
    pub fn final_state(&self) -> CarryOver {
        CarryOver {
            initial_budgets: self
                .ledgers
                .iter()
                .map(|l| (l.member.clone(), l.budget))
                .collect(),
            initial_streaks: self
                .ledgers
                .iter()
                .map(|l| (l.member.clone(), l.streaks))
                .collect(),
        }
    }
}

#[derive(Error, Debug)]
pub enum SchedError {
    #[error("invalid range: start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
    #[error("duplicate member id: {0}")]
    DuplicateMember(String),
    #[error(transparent)]
    Calendar(#[from] HolidayError),
}
