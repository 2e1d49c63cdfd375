use crate::model::{Holiday, OrgId};
use anyhow::Context;
use chrono::{Datelike, NaiveDate};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::io::Write;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Persistance des feriados organisationnels (collaborateur externe).
///
/// Les erreurs remontent telles quelles au résolveur.
pub trait Storage {
    /// Feriados de l'organisation dont l'année est dans `years`, dans l'ordre d'insertion.
    fn select(&self, org: &OrgId, years: RangeInclusive<i32>) -> anyhow::Result<Vec<Holiday>>;
    fn insert(&mut self, org: &OrgId, holiday: &Holiday) -> anyhow::Result<()>;
    /// Renvoie `false` si aucun feriado n'existait à cette date.
    fn delete(&mut self, org: &OrgId, date: NaiveDate) -> anyhow::Result<bool>;
    /// Années ayant au moins un feriado stocké.
    fn years(&self, org: &OrgId) -> anyhow::Result<BTreeSet<i32>>;
    /// Remplace tous les feriados de `year` par `holidays`, en une seule écriture.
    ///
    /// En cas d'erreur, l'année garde son contenu précédent.
    fn replace_year(
        &mut self,
        org: &OrgId,
        year: i32,
        holidays: &[Holiday],
    ) -> anyhow::Result<()>;
}

/// Stockage en mémoire, une liste par organisation.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    by_org: HashMap<OrgId, Vec<Holiday>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn select(&self, org: &OrgId, years: RangeInclusive<i32>) -> anyhow::Result<Vec<Holiday>> {
        Ok(select_years(self.by_org.get(org), &years))
    }

    fn insert(&mut self, org: &OrgId, holiday: &Holiday) -> anyhow::Result<()> {
        self.by_org.entry(org.clone()).or_default().push(holiday.clone());
        Ok(())
    }

    fn delete(&mut self, org: &OrgId, date: NaiveDate) -> anyhow::Result<bool> {
        Ok(remove_date(self.by_org.get_mut(org), date))
    }

    fn years(&self, org: &OrgId) -> anyhow::Result<BTreeSet<i32>> {
        Ok(collect_years(self.by_org.get(org)))
    }

    fn replace_year(
        &mut self,
        org: &OrgId,
        year: i32,
        holidays: &[Holiday],
    ) -> anyhow::Result<()> {
        swap_year(self.by_org.entry(org.clone()).or_default(), year, holidays);
        Ok(())
    }
}

/// Fichier JSON unique `{ "<org>": [feriados...] }`, réécrit atomiquement.
pub struct JsonStorage {
    path: PathBuf,
}

impl JsonStorage {
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        Ok(Self {
            path: path.as_ref().to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> anyhow::Result<BTreeMap<OrgId, Vec<Holiday>>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let data =
            fs::read(&self.path).with_context(|| format!("reading {}", self.path.display()))?;
        let all = serde_json::from_slice(&data)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        Ok(all)
    }

    fn save(&self, all: &BTreeMap<OrgId, Vec<Holiday>>) -> anyhow::Result<()> {
        let json = serde_json::to_vec_pretty(all)?;
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir).with_context(|| "creating temp file")?;
        tmp.write_all(&json)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).with_context(|| "atomic rename")?;
        Ok(())
    }
}

impl Storage for JsonStorage {
    fn select(&self, org: &OrgId, years: RangeInclusive<i32>) -> anyhow::Result<Vec<Holiday>> {
        let all = self.load()?;
        Ok(select_years(all.get(org), &years))
    }

    fn insert(&mut self, org: &OrgId, holiday: &Holiday) -> anyhow::Result<()> {
        let mut all = self.load()?;
        all.entry(org.clone()).or_default().push(holiday.clone());
        self.save(&all)
    }

    fn delete(&mut self, org: &OrgId, date: NaiveDate) -> anyhow::Result<bool> {
        let mut all = self.load()?;
        let removed = remove_date(all.get_mut(org), date);
        if removed {
            self.save(&all)?;
        }
        Ok(removed)
    }

    fn years(&self, org: &OrgId) -> anyhow::Result<BTreeSet<i32>> {
        let all = self.load()?;
        Ok(collect_years(all.get(org)))
    }

    fn replace_year(
        &mut self,
        org: &OrgId,
        year: i32,
        holidays: &[Holiday],
    ) -> anyhow::Result<()> {
        let mut all = self.load()?;
        swap_year(all.entry(org.clone()).or_default(), year, holidays);
        self.save(&all)
            .with_context(|| format!("replacing {year} for {}", org.as_str()))
    }
}

fn select_years(list: Option<&Vec<Holiday>>, years: &RangeInclusive<i32>) -> Vec<Holiday> {
    list.map(|l| {
        l.iter()
            .filter(|h| years.contains(&h.date.year()))
            .cloned()
            .collect()
    })
    .unwrap_or_default()
}

fn remove_date(list: Option<&mut Vec<Holiday>>, date: NaiveDate) -> bool {
    let Some(list) = list else {
        return false;
    };
    let before = list.len();
    list.retain(|h| h.date != date);
    list.len() != before
}

fn swap_year(list: &mut Vec<Holiday>, year: i32, holidays: &[Holiday]) {
    list.retain(|h| h.date.year() != year);
    list.extend(holidays.iter().cloned());
}

fn collect_years(list: Option<&Vec<Holiday>>) -> BTreeSet<i32> {
    list.map(|l| l.iter().map(|h| h.date.year()).collect())
        .unwrap_or_default()
}
