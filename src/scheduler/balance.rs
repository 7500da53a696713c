use super::search::{Search, Searcher};
use super::state::AssignmentState;
use super::{audit, AssignOptions, SchedError, SolveOutcome, SolveReport};
use crate::model::{RosterInput, Schedule};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Résultat d'une tentative isolée.
#[derive(Debug)]
pub(super) enum Attempt {
    Feasible(Schedule),
    Infeasible,
    OverBudget,
    Cancelled,
}

#[derive(Debug)]
pub(super) struct AttemptRun {
    pub(super) index: u32,
    pub(super) attempt: Attempt,
    pub(super) steps: u64,
}

impl AttemptRun {
    /// Une tentative équilibrée ou infaisable clôt la résolution.
    pub(super) fn is_decisive(&self, opts: &AssignOptions) -> bool {
        match &self.attempt {
            Attempt::Infeasible => true,
            Attempt::Feasible(schedule) => is_balanced(schedule, opts),
            Attempt::OverBudget | Attempt::Cancelled => false,
        }
    }
}

/// Graine de la tentative `index` : la tentative 0 utilise `seed` tel quel.
pub(super) fn attempt_seed(seed: u64, index: u32) -> u64 {
    seed ^ u64::from(index).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// Une recherche complète du jour 1 au jour N sur un état neuf.
pub(super) fn run_attempt(
    input: &RosterInput,
    opts: &AssignOptions,
    index: u32,
    should_stop: &(dyn Fn() -> bool + Sync),
) -> AttemptRun {
    let rng = StdRng::seed_from_u64(attempt_seed(opts.seed, index));
    let mut state = AssignmentState::new(input);
    let mut searcher = Searcher::new(input, opts, rng, should_stop);
    let attempt = match searcher.assign_day(&mut state, 1) {
        Search::Found => Attempt::Feasible(state.into_schedule(input)),
        Search::Exhausted => Attempt::Infeasible,
        Search::OverBudget => Attempt::OverBudget,
        Search::Cancelled => Attempt::Cancelled,
    };
    AttemptRun {
        index,
        attempt,
        steps: searcher.steps(),
    }
}

pub(super) fn is_balanced(schedule: &Schedule, opts: &AssignOptions) -> bool {
    schedule.total_spread() <= opts.total_tolerance
        && schedule.weekend_spread() <= opts.weekend_tolerance
}

/// Agrège les tentatives dans l'ordre de leur index.
#[derive(Debug, Default)]
pub(super) struct Tally {
    attempts: u32,
    steps: u64,
    best: Option<(u32, Schedule)>,
}

impl Tally {
    /// Retourne l'issue dès qu'une tentative est décisive.
    pub(super) fn observe(&mut self, run: AttemptRun, opts: &AssignOptions) -> Option<SolveOutcome> {
        self.steps += run.steps;
        match run.attempt {
            Attempt::Cancelled => None,
            Attempt::OverBudget => {
                self.attempts += 1;
                tracing::debug!(attempt = run.index, steps = run.steps, "attempt over budget");
                None
            }
            Attempt::Infeasible => {
                self.attempts += 1;
                Some(SolveOutcome::Unsolvable)
            }
            Attempt::Feasible(schedule) => {
                self.attempts += 1;
                let total = schedule.total_spread();
                let weekend = schedule.weekend_spread();
                tracing::debug!(
                    attempt = run.index,
                    seed = attempt_seed(opts.seed, run.index),
                    total_spread = total,
                    weekend_spread = weekend,
                    "feasible schedule"
                );
                if is_balanced(&schedule, opts) {
                    return Some(SolveOutcome::Balanced(schedule));
                }
                let score = total + weekend;
                if self.best.as_ref().map_or(true, |(best, _)| score < *best) {
                    self.best = Some((score, schedule));
                }
                None
            }
        }
    }

    /// Plafond atteint sans issue décisive.
    pub(super) fn exhausted(&mut self) -> SolveOutcome {
        match self.best.take() {
            Some((_, schedule)) => SolveOutcome::Unbalanced(schedule),
            None => SolveOutcome::Exhausted,
        }
    }

    pub(super) fn report(self, outcome: SolveOutcome) -> SolveReport {
        SolveReport {
            outcome,
            attempts: self.attempts,
            steps: self.steps,
        }
    }
}

/// Boucle d'équilibrage séquentielle.
pub(super) fn solve(input: &RosterInput, opts: &AssignOptions) -> SolveReport {
    let never = || false;
    let mut tally = Tally::default();
    for index in 0..opts.max_attempts {
        let run = run_attempt(input, opts, index, &never);
        if let Some(outcome) = tally.observe(run, opts) {
            return tally.report(outcome);
        }
    }
    let outcome = tally.exhausted();
    tally.report(outcome)
}

/// Contrôle a posteriori : un tableau violant une contrainte dure n'est jamais émis.
pub(super) fn verify(
    input: &RosterInput,
    report: SolveReport,
    opts: &AssignOptions,
) -> Result<SolveReport, SchedError> {
    if let Some(schedule) = report.outcome.schedule() {
        let conflicts = audit::detect_conflicts(input, schedule, opts);
        if !conflicts.is_empty() {
            tracing::error!(conflicts = conflicts.len(), "engine produced an inconsistent schedule");
            return Err(SchedError::Inconsistent(conflicts));
        }
        if matches!(report.outcome, SolveOutcome::Balanced(_)) && !is_balanced(schedule, opts) {
            return Err(SchedError::OutOfTolerance {
                total_spread: schedule.total_spread(),
                weekend_spread: schedule.weekend_spread(),
            });
        }
    }
    Ok(report)
}
