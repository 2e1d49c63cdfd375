//! Feriados nationaux (fixes et mobiles) et classification des dates.
//!
//! Tout est fonction pure de l'année : rien n'est stocké.

use crate::model::{DayClassification, Holiday, HolidayKind};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rust_decimal::Decimal;

/// (mois, jour, nom, bonus, majeur)
const FIXED: [(u32, u32, &str, i64, bool); 8] = [
    (1, 1, "Confraternização Universal", 1, true),
    (4, 21, "Tiradentes", 1, false),
    (5, 1, "Dia do Trabalho", 1, false),
    (9, 7, "Independência do Brasil", 1, false),
    (10, 12, "Nossa Senhora Aparecida", 1, false),
    (11, 2, "Finados", 1, false),
    (11, 15, "Proclamação da República", 1, false),
    (12, 25, "Natal", 2, true),
];

/// (décalage par rapport à Pâques, nom)
const MOVEABLE: [(i64, &str); 3] = [
    (-47, "Carnaval"),
    (-2, "Sexta-feira Santa"),
    (60, "Corpus Christi"),
];

/// Pâques grégorienne (algorithme anonyme, Meeus/Jones/Butcher).
///
/// Arithmétique entière uniquement ; divisions euclidiennes.
pub fn easter_month_day(year: i32) -> (u32, u32) {
    let a = year.rem_euclid(19);
    let b = year.div_euclid(100);
    let c = year.rem_euclid(100);
    let d = b.div_euclid(4);
    let e = b.rem_euclid(4);
    let f = (b + 8).div_euclid(25);
    let g = (b - f + 1).div_euclid(3);
    let h = (19 * a + b - d - g + 15).rem_euclid(30);
    let i = c.div_euclid(4);
    let k = c.rem_euclid(4);
    let l = (32 + 2 * e + 2 * i - h - k).rem_euclid(7);
    let m = (a + 11 * h + 22 * l).div_euclid(451);
    let n = h + l - 7 * m + 114;
    let month = n.div_euclid(31);
    let day = n.rem_euclid(31) + 1;
    (month as u32, day as u32)
}

/// Date de Pâques ; `None` seulement hors de la plage de `chrono`.
pub fn compute_easter(year: i32) -> Option<NaiveDate> {
    let (month, day) = easter_month_day(year);
    NaiveDate::from_ymd_opt(year, month, day)
}

pub fn compute_fixed_holidays(year: i32) -> Vec<Holiday> {
    FIXED
        .iter()
        .filter_map(|&(month, day, name, bonus, major)| {
            let date = NaiveDate::from_ymd_opt(year, month, day)?;
            let mut holiday =
                Holiday::new(date, name, HolidayKind::National).with_bonus(Decimal::from(bonus));
            holiday.is_major = major;
            Some(holiday)
        })
        .collect()
}

pub fn compute_moveable_holidays(year: i32) -> Vec<Holiday> {
    let Some(easter) = compute_easter(year) else {
        return Vec::new();
    };
    MOVEABLE
        .iter()
        .filter_map(|&(offset, name)| {
            let date = easter.checked_add_signed(Duration::days(offset))?;
            Some(Holiday::new(date, name, HolidayKind::National))
        })
        .collect()
}

/// Fixes ∪ mobiles, triés par date.
pub fn get_all_holidays(year: i32) -> Vec<Holiday> {
    let mut all = compute_fixed_holidays(year);
    all.extend(compute_moveable_holidays(year));
    all.sort_by_key(|h| h.date);
    all
}

/// Período especial : 26 au 31 décembre inclus.
pub fn is_special_period(date: NaiveDate) -> bool {
    date.month() == 12 && (26..=31).contains(&date.day())
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Source de feriados consultée par le moteur de rotation.
///
/// Les recherches ne lèvent jamais d'erreur : une date inconnue n'est
/// simplement pas fériée.
pub trait HolidayCalendar {
    fn holiday_on(&self, date: NaiveDate) -> Option<Holiday>;

    /// Escala vermelha : week-end, ou feriado qui affecte l'escala.
    fn is_weekend_rotation(&self, date: NaiveDate) -> bool {
        is_weekend(date) || self.holiday_on(date).is_some_and(|h| h.affects_schedule)
    }

    fn classify(&self, date: NaiveDate) -> DayClassification {
        let holiday = self.holiday_on(date);
        let is_weekend_rotation =
            is_weekend(date) || holiday.as_ref().is_some_and(|h| h.affects_schedule);
        DayClassification {
            date,
            holiday,
            is_weekend_rotation,
            is_special_period: is_special_period(date),
        }
    }
}

/// Calendrier limité aux feriados nationaux.
#[derive(Debug, Default, Clone, Copy)]
pub struct NationalCalendar;

impl HolidayCalendar for NationalCalendar {
    fn holiday_on(&self, date: NaiveDate) -> Option<Holiday> {
        get_all_holidays(date.year())
            .into_iter()
            .find(|h| h.date == date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn easter_reference_years() {
        let table = [
            (2000, 4, 23),
            (2001, 4, 15),
            (2008, 3, 23),
            (2010, 4, 4),
            (2016, 3, 27),
            (2018, 4, 1),
            (2019, 4, 21),
            (2020, 4, 12),
            (2021, 4, 4),
            (2022, 4, 17),
            (2023, 4, 9),
            (2024, 3, 31),
            (2025, 4, 20),
            (2026, 4, 5),
            (2038, 4, 25),
        ];
        for (y, m, d) in table {
            assert_eq!(compute_easter(y), Some(date(y, m, d)), "easter {y}");
        }
    }

    #[test]
    fn moveable_holidays_2024() {
        let moveable = compute_moveable_holidays(2024);
        let dates: Vec<_> = moveable.iter().map(|h| h.date).collect();
        assert_eq!(
            dates,
            vec![date(2024, 2, 13), date(2024, 3, 29), date(2024, 5, 30)]
        );
        assert!(moveable.iter().all(|h| h.bonus_rest_days == Decimal::ONE));
    }

    #[test]
    fn christmas_grants_two_days_and_is_major() {
        let fixed = compute_fixed_holidays(2024);
        assert_eq!(fixed.len(), 8);
        let natal = fixed.iter().find(|h| h.date == date(2024, 12, 25)).unwrap();
        assert_eq!(natal.bonus_rest_days, Decimal::from(2));
        assert!(natal.is_major);
        let tiradentes = fixed.iter().find(|h| h.date == date(2024, 4, 21)).unwrap();
        assert_eq!(tiradentes.bonus_rest_days, Decimal::ONE);
        assert!(!tiradentes.is_major);
    }

    #[test]
    fn all_holidays_sorted() {
        let all = get_all_holidays(2024);
        assert_eq!(all.len(), 11);
        assert!(all.windows(2).all(|w| w[0].date <= w[1].date));
        assert_eq!(all[0].date, date(2024, 1, 1));
        assert_eq!(all[1].name, "Carnaval");
    }

    #[test]
    fn special_period_window() {
        assert!(!is_special_period(date(2024, 12, 25)));
        for d in 26..=31 {
            assert!(is_special_period(date(2024, 12, d)));
        }
        assert!(!is_special_period(date(2025, 1, 1)));
    }

    #[test]
    fn national_calendar_classification() {
        let cal = NationalCalendar;
        // 2024-05-30 (jeudi) : Corpus Christi
        let c = cal.classify(date(2024, 5, 30));
        assert!(c.is_holiday());
        assert!(c.is_weekend_rotation);
        // 2024-06-03 : lundi ordinaire
        assert!(!cal.is_weekend_rotation(date(2024, 6, 3)));
        // 2024-06-01 : samedi
        assert!(cal.is_weekend_rotation(date(2024, 6, 1)));
        assert!(cal.holiday_on(date(2024, 6, 1)).is_none());
    }
}
