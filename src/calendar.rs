use crate::model::DaySpec;
use anyhow::{bail, Context, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Motif de génération des jours d'un mois.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayPattern {
    /// Effectif d'un jour de semaine.
    pub weekday_headcount: i32,
    /// Effectif d'un jour de week-end (par défaut celui de la semaine).
    #[serde(default)]
    pub weekend_headcount: Option<i32>,
    /// Jours ISO (1 = lundi … 7 = dimanche) comptés comme week-end.
    #[serde(default = "default_weekend_days")]
    pub weekend_days: Vec<u8>,
    /// Effectif forcé pour certains jours du mois (jour férié, renfort…).
    #[serde(default)]
    pub overrides: BTreeMap<u32, i32>,
    /// Jours du mois forcés en week-end (jours fériés).
    #[serde(default)]
    pub holidays: Vec<u32>,
}

fn default_weekend_days() -> Vec<u8> {
    vec![6, 7]
}

impl Default for DayPattern {
    fn default() -> Self {
        Self {
            weekday_headcount: 2,
            weekend_headcount: None,
            weekend_days: default_weekend_days(),
            overrides: BTreeMap::new(),
            holidays: Vec::new(),
        }
    }
}

impl DayPattern {
    pub fn validate(&self) -> Result<()> {
        if self.weekday_headcount < 0 {
            bail!("weekday_headcount must be >= 0");
        }
        if self.weekend_headcount.is_some_and(|h| h < 0) {
            bail!("weekend_headcount must be >= 0");
        }
        if let Some(d) = self.weekend_days.iter().find(|d| !(1..=7).contains(*d)) {
            bail!("weekend day {d} is not an ISO weekday (1-7)");
        }
        Ok(())
    }
}

pub fn load_pattern_from_file<P: AsRef<Path>>(path: P) -> Result<DayPattern> {
    let path = path.as_ref();
    let data = fs::read(path).with_context(|| format!("reading pattern {}", path.display()))?;
    let pattern: DayPattern = serde_json::from_slice(&data)
        .with_context(|| format!("parsing pattern {}", path.display()))?;
    pattern.validate()?;
    Ok(pattern)
}

fn first_of_month(year: i32, month: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1).with_context(|| format!("invalid month {year}-{month:02}"))
}

pub fn days_in_month(year: i32, month: u32) -> Result<u32> {
    let first = first_of_month(year, month)?;
    let next = first
        .checked_add_months(chrono::Months::new(1))
        .context("date overflow")?;
    Ok(next.signed_duration_since(first).num_days() as u32)
}

/// Date du jour `day` (1-based) du mois.
pub fn day_date(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
        .with_context(|| format!("invalid date {year}-{month:02}-{day:02}"))
}

/// Génère un `DaySpec` par jour du mois calendaire.
pub fn generate_month(year: i32, month: u32, pattern: &DayPattern) -> Result<Vec<DaySpec>> {
    pattern.validate()?;
    let len = days_in_month(year, month)?;
    let mut days = Vec::with_capacity(len as usize);
    let mut current = first_of_month(year, month)?;

    for index in 1..=len {
        let weekday = current.weekday().number_from_monday() as u8;
        let is_weekend = pattern.weekend_days.contains(&weekday) || pattern.holidays.contains(&index);
        let headcount = match pattern.overrides.get(&index) {
            Some(&h) => h,
            None if is_weekend => pattern.weekend_headcount.unwrap_or(pattern.weekday_headcount),
            None => pattern.weekday_headcount,
        };
        days.push(DaySpec::new(index, headcount, is_weekend));
        current = current.succ_opt().context("date overflow")?;
    }

    Ok(days)
}
