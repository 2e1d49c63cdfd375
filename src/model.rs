use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifiant fort pour Member
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(String);

impl MemberId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifiant d'organisation (clé du stockage des feriados organisationnels)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrgId(String);

impl OrgId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Les deux escalas parallèles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rotation {
    /// Escala preta : lundi–vendredi hors feriado.
    Weekday,
    /// Escala vermelha : week-end et feriados.
    Weekend,
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rotation::Weekday => f.write_str("preta"),
            Rotation::Weekend => f.write_str("vermelha"),
        }
    }
}

/// Tipo de participação : escala(s) où le membre peut travailler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Eligibility {
    #[default]
    Both,
    WeekdayOnly,
    WeekendOnly,
}

impl Eligibility {
    pub fn permits(self, rotation: Rotation) -> bool {
        matches!(
            (self, rotation),
            (Eligibility::Both, _)
                | (Eligibility::WeekdayOnly, Rotation::Weekday)
                | (Eligibility::WeekendOnly, Rotation::Weekend)
        )
    }
}

impl std::str::FromStr for Eligibility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "both" | "ambas" | "" => Ok(Eligibility::Both),
            "weekday-only" | "preta" => Ok(Eligibility::WeekdayOnly),
            "weekend-only" | "vermelha" => Ok(Eligibility::WeekendOnly),
            other => Err(format!("unknown eligibility: {other}")),
        }
    }
}

/// Solde de folgas, séparé par escala.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RestBudget {
    pub weekday: Decimal,
    pub weekend: Decimal,
}

impl RestBudget {
    pub fn new(weekday: Decimal, weekend: Decimal) -> Self {
        Self { weekday, weekend }
    }

    pub fn total(&self) -> Decimal {
        self.weekday + self.weekend
    }

    pub fn get(&self, rotation: Rotation) -> Decimal {
        match rotation {
            Rotation::Weekday => self.weekday,
            Rotation::Weekend => self.weekend,
        }
    }

    pub fn get_mut(&mut self, rotation: Rotation) -> &mut Decimal {
        match rotation {
            Rotation::Weekday => &mut self.weekday,
            Rotation::Weekend => &mut self.weekend,
        }
    }
}

/// Compteurs de folgas consécutives, un par escala.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Streaks {
    pub weekday: u32,
    pub weekend: u32,
}

impl Streaks {
    pub fn get(&self, rotation: Rotation) -> u32 {
        match rotation {
            Rotation::Weekday => self.weekday,
            Rotation::Weekend => self.weekend,
        }
    }

    pub fn get_mut(&mut self, rotation: Rotation) -> &mut u32 {
        match rotation {
            Rotation::Weekday => &mut self.weekday,
            Rotation::Weekend => &mut self.weekend,
        }
    }
}

/// Membre de l'escala
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    #[serde(default)]
    pub eligibility: Eligibility,
    pub budget: RestBudget,
    #[serde(default = "default_true")]
    pub active: bool,
    /// Comptabilisé (folgas) mais jamais escalé pour travailler.
    #[serde(default)]
    pub count_only: bool,
    #[serde(default)]
    pub streaks: Streaks,
}

fn default_true() -> bool {
    true
}

impl Member {
    pub fn new<N: Into<String>>(name: N, eligibility: Eligibility, budget: RestBudget) -> Self {
        Self {
            id: MemberId::random(),
            name: name.into(),
            eligibility,
            budget,
            active: true,
            count_only: false,
            streaks: Streaks::default(),
        }
    }

    pub fn with_id(mut self, id: MemberId) -> Self {
        self.id = id;
        self
    }

    /// Peut être escalé pour travailler dans cette escala.
    pub fn can_work(&self, rotation: Rotation) -> bool {
        self.active && !self.count_only && self.eligibility.permits(rotation)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HolidayKind {
    National,
    Regional,
    Organizational,
}

impl HolidayKind {
    /// Libellé du format d'échange JSON.
    pub fn wire_name(self) -> &'static str {
        match self {
            HolidayKind::National => "nacional",
            HolidayKind::Regional => "regional",
            HolidayKind::Organizational => "organizacional",
        }
    }

    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "nacional" | "national" => Some(HolidayKind::National),
            "regional" => Some(HolidayKind::Regional),
            "organizacional" | "organizational" => Some(HolidayKind::Organizational),
            _ => None,
        }
    }
}

/// Feriado (national calculé ou organisationnel persisté)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    pub date: NaiveDate,
    pub name: String,
    pub kind: HolidayKind,
    #[serde(default = "default_true")]
    pub affects_schedule: bool,
    #[serde(default = "Holiday::default_bonus")]
    pub bonus_rest_days: Decimal,
    /// Déclenche l'ajuste especial (effectif minimal).
    #[serde(default)]
    pub is_major: bool,
}

impl Holiday {
    pub fn new<N: Into<String>>(date: NaiveDate, name: N, kind: HolidayKind) -> Self {
        Self {
            date,
            name: name.into(),
            kind,
            affects_schedule: true,
            bonus_rest_days: Self::default_bonus(),
            is_major: false,
        }
    }

    pub fn with_bonus(mut self, bonus: Decimal) -> Self {
        self.bonus_rest_days = bonus;
        self
    }

    pub fn major(mut self) -> Self {
        self.is_major = true;
        self
    }

    fn default_bonus() -> Decimal {
        Decimal::ONE
    }
}

/// Classification dérivée d'une date (jamais stockée).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayClassification {
    pub date: NaiveDate,
    pub holiday: Option<Holiday>,
    pub is_weekend_rotation: bool,
    pub is_special_period: bool,
}

impl DayClassification {
    pub fn is_holiday(&self) -> bool {
        self.holiday.is_some()
    }

    pub fn rotation(&self) -> Rotation {
        if self.is_weekend_rotation {
            Rotation::Weekend
        } else {
            Rotation::Weekday
        }
    }

    /// Feriado qui compte pour l'escala (bonus de folga applicable).
    pub fn scheduling_holiday(&self) -> Option<&Holiday> {
        self.holiday.as_ref().filter(|h| h.affects_schedule)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestReason {
    /// Non retenu par la sélection du jour.
    Rotation,
    /// Não participa desta escala.
    NotEligible,
    /// Membre comptabilisé uniquement.
    CountOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Duty {
    Work,
    Rest { streak: u32, reason: RestReason },
}

/// Une ligne de sortie par (membre, date).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub member: MemberId,
    pub date: NaiveDate,
    pub rotation: Rotation,
    pub duty: Duty,
}

impl Assignment {
    pub fn is_work(&self) -> bool {
        matches!(self.duty, Duty::Work)
    }

    pub fn rest_streak(&self) -> Option<u32> {
        match self.duty {
            Duty::Work => None,
            Duty::Rest { streak, .. } => Some(streak),
        }
    }

    /// Code d'affichage : `T`, `F<n>` ou `X`.
    pub fn display_code(&self) -> String {
        match self.duty {
            Duty::Work => "T".to_string(),
            Duty::Rest {
                reason: RestReason::NotEligible,
                ..
            } => "X".to_string(),
            Duty::Rest { streak, .. } => format!("F{streak}"),
        }
    }
}
