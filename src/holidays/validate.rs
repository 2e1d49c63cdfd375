use crate::model::{Holiday, HolidayKind};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Feriado tel que saisi, avant validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HolidayInput {
    pub date: String,
    pub name: String,
    pub kind: String,
    #[serde(default)]
    pub bonus_rest_days: Option<Decimal>,
    #[serde(default)]
    pub affects_schedule: Option<bool>,
    #[serde(default)]
    pub is_major: bool,
}

impl HolidayInput {
    pub fn new<D: Into<String>, N: Into<String>>(date: D, name: N, kind: HolidayKind) -> Self {
        Self {
            date: date.into(),
            name: name.into(),
            kind: kind.wire_name().to_string(),
            ..Self::default()
        }
    }

    pub fn with_bonus(mut self, bonus: Decimal) -> Self {
        self.bonus_rest_days = Some(bonus);
        self
    }

    /// Valide puis convertit ; la liste d'erreurs est renvoyée telle quelle.
    pub fn into_holiday(self) -> Result<Holiday, Vec<String>> {
        let errors = validate_holiday(&self);
        if !errors.is_empty() {
            return Err(errors);
        }
        let (Some(date), Some(kind)) = (parse_date(&self.date), HolidayKind::from_wire(&self.kind))
        else {
            return Err(vec![format!("invalid holiday: {}", self.date)]);
        };
        let mut holiday = Holiday::new(date, self.name.trim(), kind);
        if let Some(bonus) = self.bonus_rest_days {
            holiday.bonus_rest_days = bonus;
        }
        if let Some(affects) = self.affects_schedule {
            holiday.affects_schedule = affects;
        }
        holiday.is_major = self.is_major;
        Ok(holiday)
    }
}

/// Liste vide = feriado valide.
pub fn validate_holiday(input: &HolidayInput) -> Vec<String> {
    let mut errors = Vec::new();

    if !has_date_shape(&input.date) {
        errors.push(format!("date must use the YYYY-MM-DD format (got {:?})", input.date));
    } else if parse_date(&input.date).is_none() {
        errors.push(format!("date {} is not a calendar date", input.date));
    }

    if input.name.trim().is_empty() {
        errors.push("name cannot be empty".to_string());
    }

    if HolidayKind::from_wire(&input.kind).is_none() {
        errors.push(format!(
            "kind must be one of nacional, regional, organizacional (got {:?})",
            input.kind
        ));
    }

    if let Some(bonus) = input.bonus_rest_days {
        if bonus < Decimal::ZERO {
            errors.push(format!("bonus rest days must be non-negative (got {bonus})"));
        }
    }

    errors
}

/// `^\d{4}-\d{2}-\d{2}$`
fn has_date_shape(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}
