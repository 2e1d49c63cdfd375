//! Format d'échange JSON des feriados organisationnels :
//! `{ "<année>": [ { "data", "nome", "tipo", "folgasAdicionais" }, ... ] }`.

use super::validate::HolidayInput;
use super::HolidayError;
use crate::model::Holiday;
use chrono::Datelike;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub(crate) struct HolidayRecord {
    pub data: String,
    pub nome: String,
    pub tipo: String,
    #[serde(default = "default_bonus", with = "rust_decimal::serde::float")]
    pub folgas_adicionais: Decimal,
    #[serde(default = "default_true", skip_serializing_if = "is_true")]
    pub afeta_escala: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub principal: bool,
}

fn default_bonus() -> Decimal {
    Decimal::ONE
}

fn default_true() -> bool {
    true
}

fn is_true(b: &bool) -> bool {
    *b
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl From<&Holiday> for HolidayRecord {
    fn from(h: &Holiday) -> Self {
        Self {
            data: h.date.format("%Y-%m-%d").to_string(),
            nome: h.name.clone(),
            tipo: h.kind.wire_name().to_string(),
            folgas_adicionais: h.bonus_rest_days.normalize(),
            afeta_escala: h.affects_schedule,
            principal: h.is_major,
        }
    }
}

impl HolidayRecord {
    fn into_input(self) -> HolidayInput {
        HolidayInput {
            date: self.data,
            name: self.nome,
            kind: self.tipo,
            bonus_rest_days: Some(self.folgas_adicionais),
            affects_schedule: Some(self.afeta_escala),
            is_major: self.principal,
        }
    }
}

pub(crate) fn export_json(by_year: &BTreeMap<i32, Vec<Holiday>>) -> Result<String, HolidayError> {
    let wire: BTreeMap<String, Vec<HolidayRecord>> = by_year
        .iter()
        .map(|(year, list)| (year.to_string(), list.iter().map(HolidayRecord::from).collect()))
        .collect();
    Ok(serde_json::to_string_pretty(&wire)?)
}

/// Analyse complète avant toute écriture : un seul feriado invalide
/// rejette tout l'import.
pub(crate) fn parse_import(json: &str) -> Result<BTreeMap<i32, Vec<Holiday>>, HolidayError> {
    let wire: BTreeMap<String, Vec<HolidayRecord>> = serde_json::from_str(json)
        .map_err(|e| HolidayError::ImportFormat(format!("invalid import format: {e}")))?;

    let mut out = BTreeMap::new();
    for (key, records) in wire {
        let year: i32 = key
            .trim()
            .parse()
            .map_err(|_| HolidayError::ImportFormat(format!("invalid year key: {key:?}")))?;
        let mut list = Vec::with_capacity(records.len());
        for record in records {
            let holiday = record.into_input().into_holiday().map_err(|errors| {
                HolidayError::ImportFormat(format!("year {year}: {}", errors.join("; ")))
            })?;
            if holiday.date.year() != year {
                return Err(HolidayError::ImportFormat(format!(
                    "holiday {} listed under year {year}",
                    holiday.date
                )));
            }
            if list.iter().any(|h: &Holiday| h.date == holiday.date) {
                return Err(HolidayError::ImportFormat(format!(
                    "duplicate holiday date {}",
                    holiday.date
                )));
            }
            list.push(holiday);
        }
        out.insert(year, list);
    }
    Ok(out)
}
