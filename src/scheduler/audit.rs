use super::{AssignOptions, Conflict, ConflictKind};
use crate::model::{PersonId, RosterInput, Schedule};

/// Liste toutes les violations de contraintes dures d'un tableau.
pub fn detect_conflicts(input: &RosterInput, schedule: &Schedule, opts: &AssignOptions) -> Vec<Conflict> {
    let mut out = Vec::new();
    let mut push = |day: u32, person: Option<PersonId>, kind: ConflictKind| {
        out.push(Conflict { day, person, kind });
    };

    for assignment in &schedule.days {
        if assignment.day == 0 || assignment.day > input.num_days() {
            push(assignment.day, None, ConflictKind::UnknownDay);
        }
    }

    for spec in &input.days {
        let day = spec.index;
        let people = schedule.people_on(day);

        if people.len() < spec.headcount() {
            push(day, None, ConflictKind::Understaffed);
        } else if people.len() > spec.headcount() {
            push(day, None, ConflictKind::Overstaffed);
        }

        for (idx, &id) in people.iter().enumerate() {
            if people[..idx].contains(&id) {
                push(day, Some(id), ConflictKind::DuplicateInDay);
                continue;
            }
            let Some(person) = input.person(id) else {
                push(day, Some(id), ConflictKind::UnknownPerson);
                continue;
            };
            if person.is_unavailable(day) {
                push(day, Some(id), ConflictKind::Unavailable);
            }
            if day > 1 && schedule.works(id, day - 1) {
                push(day, Some(id), ConflictKind::ConsecutiveDays);
            }
            if opts.no_every_other_day && day > 2 && schedule.works(id, day - 2) {
                push(day, Some(id), ConflictKind::EveryOtherDay);
            }
        }

        if opts.seniority_pairing {
            let (seniors, juniors) = people
                .iter()
                .filter_map(|&id| input.person(id))
                .fold((0usize, 0usize), |(s, j), p| if p.senior { (s + 1, j) } else { (s, j + 1) });
            if juniors > 1 {
                push(day, None, ConflictKind::TooManyJuniors);
            }
            if juniors > 0 && seniors == 0 {
                push(day, None, ConflictKind::MissingSenior);
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DayAssignment, DaySpec, Person};

    fn input() -> RosterInput {
        RosterInput::new(
            vec![
                Person::new(0, "alice").unavailable_on([2]),
                Person::new(1, "bob"),
                Person::new(2, "chloe").junior(),
            ],
            (1..=3).map(|d| DaySpec::new(d, 1, false)).collect(),
        )
    }

    fn schedule(input: &RosterInput, days: &[&[usize]]) -> Schedule {
        let days = days
            .iter()
            .enumerate()
            .map(|(i, people)| DayAssignment {
                day: i as u32 + 1,
                people: people.iter().map(|&p| PersonId::new(p)).collect(),
            })
            .collect();
        Schedule::from_days(input, days)
    }

    fn kinds(conflicts: &[Conflict]) -> Vec<ConflictKind> {
        conflicts.iter().map(|c| c.kind).collect()
    }

    #[test]
    fn clean_schedule_has_no_conflicts() {
        let input = input();
        let s = schedule(&input, &[&[0], &[1], &[0]]);
        assert!(detect_conflicts(&input, &s, &AssignOptions::default()).is_empty());
    }

    #[test]
    fn detects_each_hard_violation() {
        let input = input();
        let s = schedule(&input, &[&[1], &[0, 1], &[]]);
        let found = kinds(&detect_conflicts(&input, &s, &AssignOptions::default()));
        assert_eq!(
            found,
            vec![
                ConflictKind::Overstaffed,
                ConflictKind::Unavailable,
                ConflictKind::ConsecutiveDays,
                ConflictKind::Understaffed,
            ]
        );
    }

    #[test]
    fn duplicates_and_unknown_people() {
        let input = input();
        let mut s = schedule(&input, &[&[1], &[], &[1]]);
        s.days[1].people = vec![PersonId::new(7)];
        s.days[0].people = vec![PersonId::new(1)];
        s.days[2].people = vec![PersonId::new(2), PersonId::new(2)];
        let found = kinds(&detect_conflicts(&input, &s, &AssignOptions::default()));
        assert_eq!(
            found,
            vec![
                ConflictKind::UnknownPerson,
                ConflictKind::Overstaffed,
                ConflictKind::DuplicateInDay,
            ]
        );
    }

    #[test]
    fn optional_policies_are_audited_only_when_enabled() {
        let input = input();
        let s = schedule(&input, &[&[2], &[1], &[2]]);
        assert!(detect_conflicts(&input, &s, &AssignOptions::default()).is_empty());
        let strict = AssignOptions {
            no_every_other_day: true,
            seniority_pairing: true,
            ..AssignOptions::default()
        };
        let found = kinds(&detect_conflicts(&input, &s, &strict));
        assert_eq!(
            found,
            vec![
                ConflictKind::MissingSenior,
                ConflictKind::EveryOtherDay,
                ConflictKind::MissingSenior,
            ]
        );
    }
}
