#![forbid(unsafe_code)]
//! Escala — moteur de rotation de folgas et calendrier de feriados.
//!
//! - Deux escalas parallèles : preta (semaine) et vermelha (week-end/feriados).
//! - Soldes de folga séparés par escala, débités jour par jour.
//! - Feriados nationaux calculés (Pâques grégorienne) + feriados organisationnels persistés.
//! - Aucune persistance des affectations : la sortie est une liste plate.

pub mod holidays;
pub mod io;
pub mod model;
pub mod scheduler;
pub mod storage;

pub use holidays::{
    validate_holiday, HolidayCalendar, HolidayError, HolidayInput, HolidayResolver,
    NationalCalendar,
};
pub use model::{
    Assignment, DayClassification, Duty, Eligibility, Holiday, HolidayKind, Member, MemberId,
    OrgId, RestBudget, RestReason, Rotation, Streaks,
};
pub use scheduler::{
    generate_schedule, BudgetUnderflow, CarryOver, MajorHolidayPolicy, MemberLedger, SchedError,
    Schedule, ScheduleOptions, Scheduler, Staffing,
};
pub use storage::{JsonStorage, MemoryStorage, Storage};
