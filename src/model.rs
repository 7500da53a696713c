use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

/// Identifiant fort pour Person : index stable dans `RosterInput::people`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PersonId(usize);

impl PersonId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Personne de garde
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub name: String,
    /// Un junior doit être accompagné d'un senior (politique `seniority_pairing`).
    #[serde(default = "default_senior")]
    pub senior: bool,
    /// Nombre de gardes souhaité (indicatif).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desired_shifts: Option<u32>,
    /// Jours (1-based) où la personne ne peut pas travailler.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub unavailable_days: BTreeSet<u32>,
}

fn default_senior() -> bool {
    true
}

impl Person {
    pub fn new<N: Into<String>>(id: usize, name: N) -> Self {
        Self {
            id: PersonId::new(id),
            name: name.into(),
            senior: true,
            desired_shifts: None,
            unavailable_days: BTreeSet::new(),
        }
    }

    pub fn junior(mut self) -> Self {
        self.senior = false;
        self
    }

    pub fn unavailable_on<I: IntoIterator<Item = u32>>(mut self, days: I) -> Self {
        self.unavailable_days.extend(days);
        self
    }

    pub fn is_unavailable(&self, day: u32) -> bool {
        self.unavailable_days.contains(&day)
    }
}

/// Jour de l'horizon de planification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySpec {
    pub index: u32,
    /// Signé pour que la validation puisse rejeter une valeur négative venant d'un import.
    pub required_headcount: i32,
    #[serde(default)]
    pub is_weekend: bool,
}

impl DaySpec {
    pub fn new(index: u32, required_headcount: i32, is_weekend: bool) -> Self {
        Self {
            index,
            required_headcount,
            is_weekend,
        }
    }

    /// Effectif requis, une fois l'entrée validée.
    pub fn headcount(&self) -> usize {
        usize::try_from(self.required_headcount).unwrap_or(0)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("roster has no people")]
    NoPeople,
    #[error("planning horizon has no days")]
    NoDays,
    #[error("person at position {position} carries id {found}, expected #{position}")]
    PersonIdMismatch { position: usize, found: PersonId },
    #[error("day at position {position} has index {found}, expected {expected}")]
    DayOutOfSequence {
        position: usize,
        expected: u32,
        found: u32,
    },
    #[error("day {day}: negative headcount {headcount}")]
    NegativeHeadcount { day: u32, headcount: i32 },
    #[error("day {day}: headcount {headcount} exceeds the {people} available people")]
    HeadcountExceedsPeople {
        day: u32,
        headcount: i32,
        people: usize,
    },
    #[error("person {person}: unavailable day {day} outside of 1..={days}")]
    UnavailableDayOutOfRange { person: String, day: u32, days: u32 },
}

/// Faits immuables d'un run : personnes et jours.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterInput {
    pub people: Vec<Person>,
    pub days: Vec<DaySpec>,
}

impl RosterInput {
    pub fn new(people: Vec<Person>, days: Vec<DaySpec>) -> Self {
        Self { people, days }
    }

    pub fn num_days(&self) -> u32 {
        self.days.len() as u32
    }

    /// Jour 1-based. Panique hors bornes : réservé au moteur, après validation.
    pub fn day(&self, day: u32) -> &DaySpec {
        &self.days[(day - 1) as usize]
    }

    pub fn person(&self, id: PersonId) -> Option<&Person> {
        self.people.get(id.index())
    }

    pub fn total_headcount(&self) -> i64 {
        self.days.iter().map(|d| i64::from(d.required_headcount)).sum()
    }

    /// Rejette toute entrée malformée avant la recherche.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.people.is_empty() {
            return Err(ValidationError::NoPeople);
        }
        if self.days.is_empty() {
            return Err(ValidationError::NoDays);
        }
        for (position, person) in self.people.iter().enumerate() {
            if person.id.index() != position {
                return Err(ValidationError::PersonIdMismatch {
                    position,
                    found: person.id,
                });
            }
        }
        for (position, day) in self.days.iter().enumerate() {
            let expected = position as u32 + 1;
            if day.index != expected {
                return Err(ValidationError::DayOutOfSequence {
                    position,
                    expected,
                    found: day.index,
                });
            }
            if day.required_headcount < 0 {
                return Err(ValidationError::NegativeHeadcount {
                    day: day.index,
                    headcount: day.required_headcount,
                });
            }
            if day.headcount() > self.people.len() {
                return Err(ValidationError::HeadcountExceedsPeople {
                    day: day.index,
                    headcount: day.required_headcount,
                    people: self.people.len(),
                });
            }
        }
        let days = self.num_days();
        for person in &self.people {
            if let Some(&day) = person
                .unavailable_days
                .iter()
                .find(|&&d| d == 0 || d > days)
            {
                return Err(ValidationError::UnavailableDayOutOfRange {
                    person: person.name.clone(),
                    day,
                    days,
                });
            }
        }
        Ok(())
    }
}

/// Personnes affectées à un jour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayAssignment {
    pub day: u32,
    pub people: Vec<PersonId>,
}

/// Charge d'une personne sur l'horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workload {
    pub person: PersonId,
    pub total: u32,
    pub weekend: u32,
}

/// Tableau de gardes final, en lecture seule pour l'émetteur de rapport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub days: Vec<DayAssignment>,
    pub workloads: Vec<Workload>,
}

impl Schedule {
    /// Construit le tableau et recalcule les compteurs depuis les affectations.
    pub fn from_days(input: &RosterInput, days: Vec<DayAssignment>) -> Self {
        let mut workloads: Vec<Workload> = input
            .people
            .iter()
            .map(|p| Workload {
                person: p.id,
                total: 0,
                weekend: 0,
            })
            .collect();
        for assignment in &days {
            let weekend = input
                .days
                .iter()
                .find(|d| d.index == assignment.day)
                .map_or(false, |d| d.is_weekend);
            for person in &assignment.people {
                if let Some(w) = workloads.get_mut(person.index()) {
                    w.total += 1;
                    if weekend {
                        w.weekend += 1;
                    }
                }
            }
        }
        Self { days, workloads }
    }

    pub fn people_on(&self, day: u32) -> &[PersonId] {
        self.days
            .iter()
            .find(|d| d.day == day)
            .map(|d| d.people.as_slice())
            .unwrap_or(&[])
    }

    pub fn works(&self, person: PersonId, day: u32) -> bool {
        self.people_on(day).contains(&person)
    }

    pub fn total_spread(&self) -> u32 {
        spread(self.workloads.iter().map(|w| w.total))
    }

    pub fn weekend_spread(&self) -> u32 {
        spread(self.workloads.iter().map(|w| w.weekend))
    }
}

/// max − min, 0 pour un ensemble vide.
pub fn spread<I: IntoIterator<Item = u32>>(values: I) -> u32 {
    let (min, max) = values
        .into_iter()
        .fold((u32::MAX, 0u32), |(lo, hi), v| (lo.min(v), hi.max(v)));
    max.saturating_sub(min)
}

/// Document persisté : entrée + dernier tableau calculé.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Roster {
    pub input: RosterInput,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Schedule>,
}

impl Roster {
    pub fn new(input: RosterInput) -> Self {
        Self {
            input,
            schedule: None,
        }
    }

    pub fn person_name(&self, id: PersonId) -> &str {
        self.input
            .person(id)
            .map_or("?", |p| p.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_input() -> RosterInput {
        RosterInput::new(
            vec![Person::new(0, "alice"), Person::new(1, "bob")],
            vec![DaySpec::new(1, 1, false), DaySpec::new(2, 1, true)],
        )
    }

    #[test]
    fn validate_accepts_well_formed_input() {
        assert_eq!(small_input().validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_negative_headcount() {
        let mut input = small_input();
        input.days[1].required_headcount = -1;
        assert_eq!(
            input.validate(),
            Err(ValidationError::NegativeHeadcount {
                day: 2,
                headcount: -1
            })
        );
    }

    #[test]
    fn validate_rejects_headcount_above_people() {
        let mut input = small_input();
        input.days[0].required_headcount = 3;
        assert!(matches!(
            input.validate(),
            Err(ValidationError::HeadcountExceedsPeople { day: 1, .. })
        ));
    }

    #[test]
    fn validate_rejects_out_of_range_unavailability() {
        let mut input = small_input();
        input.people[1] = Person::new(1, "bob").unavailable_on([3]);
        assert!(matches!(
            input.validate(),
            Err(ValidationError::UnavailableDayOutOfRange { day: 3, .. })
        ));
    }

    #[test]
    fn validate_rejects_gaps_in_days() {
        let mut input = small_input();
        input.days[1].index = 5;
        assert!(matches!(
            input.validate(),
            Err(ValidationError::DayOutOfSequence { expected: 2, found: 5, .. })
        ));
    }

    #[test]
    fn schedule_recomputes_workloads() {
        let input = small_input();
        let schedule = Schedule::from_days(
            &input,
            vec![
                DayAssignment { day: 1, people: vec![PersonId::new(0)] },
                DayAssignment { day: 2, people: vec![PersonId::new(1)] },
            ],
        );
        assert_eq!(schedule.workloads[0], Workload { person: PersonId::new(0), total: 1, weekend: 0 });
        assert_eq!(schedule.workloads[1], Workload { person: PersonId::new(1), total: 1, weekend: 1 });
        assert_eq!(schedule.total_spread(), 0);
        assert_eq!(schedule.weekend_spread(), 1);
    }

    #[test]
    fn spread_of_nothing_is_zero() {
        assert_eq!(spread(Vec::<u32>::new()), 0);
        assert_eq!(spread([4, 1, 3]), 3);
    }
}
