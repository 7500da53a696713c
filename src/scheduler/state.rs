use crate::model::{DayAssignment, PersonId, RosterInput, Schedule};
use std::ops::{Deref, DerefMut};

/// État mutable d'une tentative : affectations jour par jour et compteurs courants.
#[derive(Debug, Clone)]
pub(crate) struct AssignmentState {
    /// Index 0 = jour 1.
    days: Vec<Vec<PersonId>>,
    weekend: Vec<bool>,
    totals: Vec<u32>,
    weekends: Vec<u32>,
}

impl AssignmentState {
    pub(crate) fn new(input: &RosterInput) -> Self {
        let people = input.people.len();
        Self {
            days: vec![Vec::new(); input.days.len()],
            weekend: input.days.iter().map(|d| d.is_weekend).collect(),
            totals: vec![0; people],
            weekends: vec![0; people],
        }
    }

    /// Personnes affectées au jour `day` (vide hors horizon, y compris jour 0).
    pub(crate) fn assigned(&self, day: u32) -> &[PersonId] {
        day.checked_sub(1)
            .and_then(|i| self.days.get(i as usize))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub(crate) fn works(&self, person: PersonId, day: u32) -> bool {
        self.assigned(day).contains(&person)
    }

    pub(crate) fn weekend_count(&self, person: PersonId) -> u32 {
        self.weekends[person.index()]
    }

    pub(crate) fn min_weekend_count(&self) -> u32 {
        self.weekends.iter().copied().min().unwrap_or(0)
    }

    /// Occupe le jour ; l'affectation est libérée au drop du garde sauf `keep()`.
    pub(crate) fn occupy(&mut self, day: u32, people: Vec<PersonId>) -> DaySlot<'_> {
        let idx = (day - 1) as usize;
        debug_assert!(self.days[idx].is_empty(), "day {day} already occupied");
        let weekend = self.weekend[idx];
        for person in &people {
            self.totals[person.index()] += 1;
            if weekend {
                self.weekends[person.index()] += 1;
            }
        }
        self.days[idx] = people;
        DaySlot {
            state: self,
            day,
            kept: false,
        }
    }

    fn release(&mut self, day: u32) {
        let idx = (day - 1) as usize;
        let weekend = self.weekend[idx];
        for person in std::mem::take(&mut self.days[idx]) {
            self.totals[person.index()] -= 1;
            if weekend {
                self.weekends[person.index()] -= 1;
            }
        }
    }

    /// Fige l'état en tableau ; les compteurs sont recalculés depuis les affectations.
    pub(crate) fn into_schedule(self, input: &RosterInput) -> Schedule {
        let days = self
            .days
            .into_iter()
            .enumerate()
            .map(|(i, mut people)| {
                people.sort();
                DayAssignment {
                    day: i as u32 + 1,
                    people,
                }
            })
            .collect();
        Schedule::from_days(input, days)
    }
}

/// Garde RAII sur un jour occupé : toute affectation provisoire est défaite en cas d'échec.
pub(crate) struct DaySlot<'a> {
    state: &'a mut AssignmentState,
    day: u32,
    kept: bool,
}

impl DaySlot<'_> {
    pub(crate) fn keep(mut self) {
        self.kept = true;
    }
}

impl Deref for DaySlot<'_> {
    type Target = AssignmentState;

    fn deref(&self) -> &AssignmentState {
        self.state
    }
}

impl DerefMut for DaySlot<'_> {
    fn deref_mut(&mut self) -> &mut AssignmentState {
        self.state
    }
}

impl Drop for DaySlot<'_> {
    fn drop(&mut self) {
        if !self.kept {
            self.state.release(self.day);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DaySpec, Person};

    fn input() -> RosterInput {
        RosterInput::new(
            vec![Person::new(0, "a"), Person::new(1, "b"), Person::new(2, "c")],
            vec![DaySpec::new(1, 2, false), DaySpec::new(2, 1, true)],
        )
    }

    #[test]
    fn dropped_slot_restores_counters() {
        let input = input();
        let mut state = AssignmentState::new(&input);
        {
            let slot = state.occupy(2, vec![PersonId::new(1)]);
            assert!(slot.works(PersonId::new(1), 2));
            assert_eq!(slot.weekend_count(PersonId::new(1)), 1);
        }
        assert!(state.assigned(2).is_empty());
        assert_eq!(state.weekend_count(PersonId::new(1)), 0);
        assert_eq!(state.totals, vec![0, 0, 0]);
    }

    #[test]
    fn kept_slot_survives() {
        let input = input();
        let mut state = AssignmentState::new(&input);
        state
            .occupy(1, vec![PersonId::new(2), PersonId::new(0)])
            .keep();
        state.occupy(2, vec![PersonId::new(1)]).keep();
        let schedule = state.into_schedule(&input);
        assert_eq!(schedule.people_on(1), &[PersonId::new(0), PersonId::new(2)]);
        assert_eq!(schedule.weekend_spread(), 1);
        assert_eq!(schedule.total_spread(), 0);
    }

    #[test]
    fn day_zero_and_past_horizon_are_empty() {
        let state = AssignmentState::new(&input());
        assert!(state.assigned(0).is_empty());
        assert!(state.assigned(9).is_empty());
    }
}
