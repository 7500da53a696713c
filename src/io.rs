use crate::model::{DaySpec, Person, Roster, RosterInput, Schedule};
use anyhow::{bail, Context};
use csv::{ReaderBuilder, WriterBuilder};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// Import de personnes depuis CSV: header `name[,senior][,desired_shifts][,unavailable]`
///
/// `unavailable` : jours séparés par `;`, plages inclusives `a-b` acceptées.
pub fn import_people_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Person>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let name = rec.get(0).context("missing name")?.trim();
        if name.is_empty() {
            bail!("invalid people row (empty name)");
        }
        let mut person = Person::new(out.len(), name);
        if let Some(flag) = non_empty(rec.get(1)) {
            person.senior = parse_bool(flag)
                .with_context(|| format!("invalid senior value for {name}"))?;
        }
        if let Some(count) = non_empty(rec.get(2)) {
            person.desired_shifts = Some(
                count
                    .parse()
                    .with_context(|| format!("invalid desired_shifts value for {name}"))?,
            );
        }
        if let Some(days) = non_empty(rec.get(3)) {
            person.unavailable_days = parse_days(days)
                .with_context(|| format!("invalid unavailable value for {name}"))?;
        }
        out.push(person);
    }
    Ok(out)
}

/// Import des jours: header `day,headcount[,weekend]`
pub fn import_days_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<DaySpec>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let day = rec.get(0).context("missing day")?.trim();
        let day: u32 = day.parse().with_context(|| format!("invalid day: {day}"))?;
        let headcount = rec.get(1).context("missing headcount")?.trim();
        let headcount: i32 = headcount
            .parse()
            .with_context(|| format!("invalid headcount for day {day}"))?;
        let weekend = match non_empty(rec.get(2)) {
            Some(flag) => parse_bool(flag).with_context(|| format!("invalid weekend flag for day {day}"))?,
            None => false,
        };
        out.push(DaySpec::new(day, headcount, weekend));
    }
    Ok(out)
}

/// Charge personnes + jours et valide l'ensemble.
pub fn import_roster_csv<P: AsRef<Path>, D: AsRef<Path>>(people: P, days: D) -> anyhow::Result<RosterInput> {
    let input = RosterInput::new(import_people_csv(people)?, import_days_csv(days)?);
    input.validate()?;
    Ok(input)
}

fn non_empty(field: Option<&str>) -> Option<&str> {
    field.map(str::trim).filter(|s| !s.is_empty())
}

fn parse_bool(s: &str) -> anyhow::Result<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "y" | "oui" => Ok(true),
        "false" | "0" | "no" | "n" | "non" => Ok(false),
        _ => bail!("expected boolean"),
    }
}

fn parse_days(raw: &str) -> anyhow::Result<BTreeSet<u32>> {
    let mut out = BTreeSet::new();
    for chunk in raw.split(';').map(str::trim).filter(|c| !c.is_empty()) {
        if let Some((start, end)) = chunk.split_once('-') {
            let start: u32 = start.trim().parse().with_context(|| format!("invalid day: {start}"))?;
            let end: u32 = end.trim().parse().with_context(|| format!("invalid day: {end}"))?;
            if end < start {
                bail!("invalid range {chunk}: end before start");
            }
            out.extend(start..=end);
        } else {
            out.insert(chunk.parse().with_context(|| format!("invalid day: {chunk}"))?);
        }
    }
    Ok(out)
}

/// Export JSON du roster (jolie mise en forme)
pub fn export_roster_json<P: AsRef<Path>>(path: P, roster: &Roster) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(roster)?;
    fs::write(path, s)?;
    Ok(())
}

/// Export CSV du tableau: header `day,weekend,people` (noms séparés par `;`)
pub fn export_schedule_csv<P: AsRef<Path>>(path: P, roster: &Roster, schedule: &Schedule) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record(["day", "weekend", "people"])?;
    let mut buf = itoa::Buffer::new();
    for assignment in &schedule.days {
        let weekend = roster
            .input
            .days
            .iter()
            .find(|d| d.index == assignment.day)
            .map_or(false, |d| d.is_weekend);
        let names: Vec<&str> = assignment
            .people
            .iter()
            .map(|&id| roster.person_name(id))
            .collect();
        let names = names.join(";");
        w.write_record([
            buf.format(assignment.day),
            if weekend { "1" } else { "0" },
            names.as_str(),
        ])?;
    }
    w.flush()?;
    Ok(())
}

/// Export CSV des charges: header `name,total,weekend`
pub fn export_workload_csv<P: AsRef<Path>>(path: P, roster: &Roster, schedule: &Schedule) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record(["name", "total", "weekend"])?;
    let mut total = itoa::Buffer::new();
    let mut weekend = itoa::Buffer::new();
    for load in &schedule.workloads {
        w.write_record([
            roster.person_name(load.person),
            total.format(load.total),
            weekend.format(load.weekend),
        ])?;
    }
    w.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_days_and_ranges() {
        let days = parse_days("3; 7;12-14").unwrap();
        assert_eq!(days.into_iter().collect::<Vec<_>>(), vec![3, 7, 12, 13, 14]);
    }

    #[test]
    fn rejects_reversed_range() {
        assert!(parse_days("9-4").is_err());
    }

    #[test]
    fn parses_french_booleans() {
        assert!(parse_bool("oui").unwrap());
        assert!(!parse_bool("Non").unwrap());
        assert!(parse_bool("peut-être").is_err());
    }
}
