use super::eligibility::{can_assign, can_join};
use super::state::AssignmentState;
use super::AssignOptions;
use crate::model::{Person, PersonId, RosterInput};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Fin d'une tentative de recherche.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Search {
    /// Tous les jours sont pourvus.
    Found,
    /// Espace de recherche épuisé : pas de solution.
    Exhausted,
    /// Budget de choix dépassé.
    OverBudget,
    /// Interrompue de l'extérieur.
    Cancelled,
}

/// Contexte d'une tentative : un seul RNG initialisé une fois pour toute la recherche.
pub(crate) struct Searcher<'a> {
    input: &'a RosterInput,
    opts: &'a AssignOptions,
    rng: StdRng,
    steps: u64,
    should_stop: &'a (dyn Fn() -> bool + Sync),
}

impl<'a> Searcher<'a> {
    pub(crate) fn new(
        input: &'a RosterInput,
        opts: &'a AssignOptions,
        rng: StdRng,
        should_stop: &'a (dyn Fn() -> bool + Sync),
    ) -> Self {
        Self {
            input,
            opts,
            rng,
            steps: 0,
            should_stop,
        }
    }

    pub(crate) fn steps(&self) -> u64 {
        self.steps
    }

    /// Remplit les jours `day..=N` ; en cas d'échec `state` est rendu intact.
    pub(crate) fn assign_day(&mut self, state: &mut AssignmentState, day: u32) -> Search {
        if day > self.input.num_days() {
            return Search::Found;
        }
        if (self.should_stop)() {
            return Search::Cancelled;
        }

        let input = self.input;
        let mut candidates: Vec<&Person> = input.people.iter().collect();
        candidates.shuffle(&mut self.rng);

        let needed = input.day(day).headcount();
        let mut chosen = Vec::with_capacity(needed);
        let found = self.try_assign_people(state, day, needed, &candidates, 0, &mut chosen);
        if found == Search::Exhausted {
            tracing::trace!(day, "no valid team, backtracking");
        }
        found
    }

    /// Choisit les `needed - chosen.len()` personnes restantes parmi `candidates[from..]`.
    fn try_assign_people(
        &mut self,
        state: &mut AssignmentState,
        day: u32,
        needed: usize,
        candidates: &[&'a Person],
        from: usize,
        chosen: &mut Vec<&'a Person>,
    ) -> Search {
        if chosen.len() == needed {
            let team: Vec<PersonId> = chosen.iter().map(|p| p.id).collect();
            let mut slot = state.occupy(day, team);
            let next = self.assign_day(&mut slot, day + 1);
            if next == Search::Found {
                slot.keep();
            }
            return next;
        }

        let remaining = needed - chosen.len();
        // pas assez de candidats restants pour compléter l'équipe
        if candidates.len().saturating_sub(from) < remaining {
            return Search::Exhausted;
        }

        for (offset, &person) in candidates[from..].iter().enumerate() {
            debug_assert!(!chosen.iter().any(|p| p.id == person.id));
            if !can_assign(person, day, state, self.opts)
                || !can_join(self.input, person, day, chosen, remaining, state, self.opts)
            {
                continue;
            }

            self.steps += 1;
            if self.steps > self.opts.max_steps {
                return Search::OverBudget;
            }

            chosen.push(person);
            let next = self.try_assign_people(state, day, needed, candidates, from + offset + 1, chosen);
            chosen.pop();
            if next != Search::Exhausted {
                return next;
            }
        }

        Search::Exhausted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DaySpec;
    use rand::SeedableRng;

    fn never() -> bool {
        false
    }

    fn run(input: &RosterInput, opts: &AssignOptions, seed: u64) -> (Search, AssignmentState) {
        let mut state = AssignmentState::new(input);
        let mut searcher = Searcher::new(input, opts, StdRng::seed_from_u64(seed), &never);
        let result = searcher.assign_day(&mut state, 1);
        (result, state)
    }

    fn uniform(people: usize, days: u32, headcount: i32) -> RosterInput {
        RosterInput::new(
            (0..people).map(|i| Person::new(i, format!("p{i}"))).collect(),
            (1..=days).map(|d| DaySpec::new(d, headcount, false)).collect(),
        )
    }

    #[test]
    fn fills_every_day_with_exact_headcount() {
        let input = uniform(4, 5, 2);
        let (result, state) = run(&input, &AssignOptions::default(), 7);
        assert_eq!(result, Search::Found);
        for day in 1..=5 {
            assert_eq!(state.assigned(day).len(), 2);
            for person in state.assigned(day) {
                assert!(!state.works(*person, day - 1));
            }
        }
    }

    #[test]
    fn exhausted_search_leaves_state_empty() {
        let input = uniform(2, 3, 2);
        let (result, state) = run(&input, &AssignOptions::default(), 1);
        assert_eq!(result, Search::Exhausted);
        for day in 1..=3 {
            assert!(state.assigned(day).is_empty());
        }
        assert_eq!(state.min_weekend_count(), 0);
    }

    #[test]
    fn budget_is_enforced() {
        let input = uniform(6, 20, 3);
        let opts = AssignOptions {
            max_steps: 5,
            ..AssignOptions::default()
        };
        let (result, _) = run(&input, &opts, 3);
        assert_eq!(result, Search::OverBudget);
    }

    #[test]
    fn cancellation_is_observed_between_days() {
        let input = uniform(4, 5, 2);
        let opts = AssignOptions::default();
        let stop = || true;
        let mut state = AssignmentState::new(&input);
        let mut searcher = Searcher::new(&input, &opts, StdRng::seed_from_u64(0), &stop);
        assert_eq!(searcher.assign_day(&mut state, 1), Search::Cancelled);
        assert_eq!(searcher.steps(), 0);
    }

    #[test]
    fn zero_headcount_days_are_left_empty() {
        let mut input = uniform(3, 3, 1);
        input.days[1].required_headcount = 0;
        let (result, state) = run(&input, &AssignOptions::default(), 11);
        assert_eq!(result, Search::Found);
        assert!(state.assigned(2).is_empty());
    }
}
