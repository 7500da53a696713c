use super::state::AssignmentState;
use super::AssignOptions;
use crate::model::{Person, RosterInput};

/// Vérifie si `person` peut travailler le jour `day` compte tenu de l'état courant.
pub(crate) fn can_assign(
    person: &Person,
    day: u32,
    state: &AssignmentState,
    opts: &AssignOptions,
) -> bool {
    if person.is_unavailable(day) {
        return false;
    }
    if state.works(person.id, day.saturating_sub(1)) {
        return false;
    }
    if opts.no_every_other_day && state.works(person.id, day.saturating_sub(2)) {
        return false;
    }
    true
}

/// Admission dans l'équipe du jour en cours de composition (`chosen`).
///
/// `remaining` = places restantes, celle de `person` incluse.
pub(crate) fn can_join(
    input: &RosterInput,
    person: &Person,
    day: u32,
    chosen: &[&Person],
    remaining: usize,
    state: &AssignmentState,
    opts: &AssignOptions,
) -> bool {
    if opts.weekend_pruning
        && input.day(day).is_weekend
        && state.weekend_count(person.id) > state.min_weekend_count() + 1
    {
        return false;
    }

    if opts.seniority_pairing {
        let has_junior = chosen.iter().any(|p| !p.senior);
        let has_senior = chosen.iter().any(|p| p.senior);
        if !person.senior && has_junior {
            return false;
        }
        // dernière place : un junior dans l'équipe impose un senior
        let with_junior = has_junior || !person.senior;
        let with_senior = has_senior || person.senior;
        if remaining == 1 && with_junior && !with_senior {
            return false;
        }
    }

    true
}

/// Premier jour dont l'effectif ne peut être tenu, quel que soit le reste du tableau.
///
/// Bornes nécessaires seulement : nul ne travaille deux fois dans une fenêtre de
/// deux jours (trois avec `no_every_other_day`), la fenêtre exige donc au moins
/// autant de personnes disponibles que la somme de ses effectifs.
pub(crate) fn first_infeasible_day(input: &RosterInput, opts: &AssignOptions) -> Option<u32> {
    let window = if opts.no_every_other_day { 3 } else { 2 };
    let num_days = input.num_days();
    for start in 1..=num_days {
        let end = (start + window - 1).min(num_days);
        for last in start..=end {
            let required: usize = (start..=last).map(|d| input.day(d).headcount()).sum();
            let available = input
                .people
                .iter()
                .filter(|p| (start..=last).any(|d| !p.is_unavailable(d)))
                .count();
            if available < required {
                return Some(last);
            }
        }
        if opts.seniority_pairing {
            // au plus un junior, et jamais seul
            let needed = match input.day(start).headcount() {
                0 => 0,
                1 => 1,
                h => h - 1,
            };
            let seniors = input
                .people
                .iter()
                .filter(|p| p.senior && !p.is_unavailable(start))
                .count();
            if seniors < needed {
                return Some(start);
            }
        }
    }
    None
}
