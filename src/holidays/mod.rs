//! Résolveur de feriados : calendrier national calculé + feriados
//! organisationnels persistés, mis en cache par année.

mod calendar;
mod transfer;
mod validate;

pub use calendar::{
    compute_easter, compute_fixed_holidays, compute_moveable_holidays, easter_month_day,
    get_all_holidays, is_special_period, is_weekend, HolidayCalendar, NationalCalendar,
};
pub use validate::{validate_holiday, HolidayInput};

use crate::model::{Holiday, OrgId};
use crate::storage::Storage;
use chrono::{Datelike, NaiveDate};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum HolidayError {
    #[error("invalid holiday: {}", .0.join("; "))]
    Validation(Vec<String>),
    #[error("invalid import format: {0}")]
    ImportFormat(String),
    #[error(transparent)]
    Serialize(#[from] serde_json::Error),
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

/// Résultat d'un ajout groupé : chaque feriado est validé indépendamment.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub inserted: Vec<Holiday>,
    /// (index dans le lot, messages)
    pub rejected: Vec<(usize, Vec<String>)>,
}

/// Un résolveur par organisation ; le cache n'est jamais partagé.
///
/// Une année absente du cache est lue dans le store au premier accès,
/// y compris depuis `holiday_on`.
#[derive(Debug)]
pub struct HolidayResolver<S> {
    org: OrgId,
    store: S,
    cache: RefCell<HashMap<i32, Vec<Holiday>>>,
}

impl<S: Storage> HolidayResolver<S> {
    pub fn new(org: OrgId, store: S) -> Self {
        Self {
            org,
            store,
            cache: RefCell::new(HashMap::new()),
        }
    }

    pub fn org(&self) -> &OrgId {
        &self.org
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn is_loaded(&self, year: i32) -> bool {
        self.cache.borrow().contains_key(&year)
    }

    fn with_year<R>(
        &self,
        year: i32,
        f: impl FnOnce(&[Holiday]) -> R,
    ) -> Result<R, HolidayError> {
        if !self.is_loaded(year) {
            let list = self.store.select(&self.org, year..=year)?;
            debug!(org = self.org.as_str(), year, count = list.len(), "custom holidays loaded");
            self.cache.borrow_mut().insert(year, list);
        }
        let cache = self.cache.borrow();
        Ok(f(cache.get(&year).map(Vec::as_slice).unwrap_or_default()))
    }

    /// Charge (une fois) les feriados organisationnels de l'année.
    pub fn load_year(&self, year: i32) -> Result<Vec<Holiday>, HolidayError> {
        self.with_year(year, |list| list.to_vec())
    }

    /// Charge toutes les années couvertes par `[start, end]`.
    pub fn load_range(&self, start: NaiveDate, end: NaiveDate) -> Result<(), HolidayError> {
        for year in start.year()..=end.year() {
            self.with_year(year, |_| ())?;
        }
        Ok(())
    }

    /// Nationaux ∪ organisationnels, triés par date.
    ///
    /// Un feriado organisationnel remplace le national de la même date.
    pub fn get_all_holidays(&self, year: i32) -> Vec<Holiday> {
        let custom = match self.load_year(year) {
            Ok(custom) => custom,
            Err(err) => {
                warn!(
                    org = self.org.as_str(),
                    year,
                    error = %err,
                    "custom holidays unavailable, national calendar only"
                );
                Vec::new()
            }
        };
        let mut all: Vec<Holiday> = get_all_holidays(year)
            .into_iter()
            .filter(|n| !custom.iter().any(|c| c.date == n.date))
            .collect();
        all.extend(custom);
        all.sort_by_key(|h| h.date);
        all
    }

    pub fn list_custom_holidays(&self, year: i32) -> Result<Vec<Holiday>, HolidayError> {
        self.load_year(year)
    }

    pub fn add_custom_holiday(&mut self, input: HolidayInput) -> Result<Holiday, HolidayError> {
        let holiday = input.into_holiday().map_err(HolidayError::Validation)?;
        let year = holiday.date.year();
        if self.with_year(year, |list| list.iter().any(|h| h.date == holiday.date))? {
            return Err(HolidayError::Validation(vec![format!(
                "a custom holiday already exists on {}",
                holiday.date
            )]));
        }
        self.store.insert(&self.org, &holiday)?;
        self.cache
            .get_mut()
            .entry(year)
            .or_default()
            .push(holiday.clone());
        Ok(holiday)
    }

    /// Insère les feriados valides, rapporte les autres sans interrompre le lot.
    pub fn add_custom_holidays<I>(&mut self, inputs: I) -> Result<BatchReport, HolidayError>
    where
        I: IntoIterator<Item = HolidayInput>,
    {
        let mut report = BatchReport::default();
        for (idx, input) in inputs.into_iter().enumerate() {
            match self.add_custom_holiday(input) {
                Ok(h) => report.inserted.push(h),
                Err(HolidayError::Validation(errors)) => report.rejected.push((idx, errors)),
                Err(other) => return Err(other),
            }
        }
        Ok(report)
    }

    pub fn remove_custom_holiday(&mut self, date: NaiveDate) -> Result<bool, HolidayError> {
        let removed = self.store.delete(&self.org, date)?;
        if let Some(list) = self.cache.get_mut().get_mut(&date.year()) {
            list.retain(|h| h.date != date);
        }
        Ok(removed)
    }

    /// JSON indexé par année, toutes années stockées confondues.
    pub fn export_custom_holidays(&self) -> Result<String, HolidayError> {
        let years = self.store.years(&self.org)?;
        let mut by_year = BTreeMap::new();
        for year in years {
            by_year.insert(year, self.load_year(year)?);
        }
        transfer::export_json(&by_year)
    }

    /// Remplace, année par année, les feriados présents dans le JSON.
    ///
    /// Le document entier est validé avant la première écriture ; chaque
    /// année est ensuite remplacée d'un bloc par le store. Si le store
    /// échoue, l'année en cours garde son ancien contenu.
    pub fn import_custom_holidays(&mut self, json: &str) -> Result<usize, HolidayError> {
        let parsed = transfer::parse_import(json)?;
        let mut count = 0;
        for (year, list) in parsed {
            self.store.replace_year(&self.org, year, &list)?;
            count += list.len();
            debug!(org = self.org.as_str(), year, count = list.len(), "custom holidays imported");
            self.cache.get_mut().insert(year, list);
        }
        Ok(count)
    }

    pub fn clear_custom_holidays(&mut self) -> Result<(), HolidayError> {
        for year in self.store.years(&self.org)? {
            self.store.replace_year(&self.org, year, &[])?;
            self.cache.get_mut().insert(year, Vec::new());
        }
        Ok(())
    }
}

impl<S: Storage> HolidayCalendar for HolidayResolver<S> {
    /// Les feriados organisationnels priment sur les nationaux à la même date.
    fn holiday_on(&self, date: NaiveDate) -> Option<Holiday> {
        let custom = self.with_year(date.year(), |list| {
            list.iter().find(|h| h.date == date).cloned()
        });
        match custom {
            Ok(Some(h)) => return Some(h),
            Ok(None) => {}
            Err(err) => warn!(
                org = self.org.as_str(),
                year = date.year(),
                error = %err,
                "custom holidays unavailable, national calendar only"
            ),
        }
        NationalCalendar.holiday_on(date)
    }
}
