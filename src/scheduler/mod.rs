mod audit;
mod balance;
mod eligibility;
mod parallel;
mod search;
mod state;
mod types;

pub use audit::detect_conflicts;
pub use types::{AssignOptions, Conflict, ConflictKind, SchedError, SolveOutcome, SolveReport};

use crate::model::{Roster, RosterInput};

/// Scheduler : encapsule un Roster (entrée + dernier tableau accepté)
#[derive(Debug, Default)]
pub struct Scheduler {
    roster: Roster,
}

impl Scheduler {
    pub fn new(input: RosterInput) -> Self {
        Self {
            roster: Roster::new(input),
        }
    }

    pub fn from_roster(roster: Roster) -> Self {
        Self { roster }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }
    pub fn roster_mut(&mut self) -> &mut Roster {
        &mut self.roster
    }
    pub fn into_roster(self) -> Roster {
        self.roster
    }

    /// Résout et conserve le tableau obtenu (équilibré ou non).
    pub fn assign(&mut self, opts: AssignOptions) -> Result<SolveReport, SchedError> {
        let report = solve(&self.roster.input, &opts)?;
        if let Some(schedule) = report.outcome.schedule() {
            self.roster.schedule = Some(schedule.clone());
        }
        Ok(report)
    }

    /// Conflits du tableau courant (aucun s'il n'y a pas encore de tableau).
    pub fn detect_conflicts(&self, opts: &AssignOptions) -> Vec<Conflict> {
        match &self.roster.schedule {
            Some(schedule) => audit::detect_conflicts(&self.roster.input, schedule, opts),
            None => Vec::new(),
        }
    }
}

/// Valide l'entrée puis répète la recherche jusqu'à un tableau équilibré.
///
/// Une entrée dont un jour ne peut manifestement pas être pourvu est déclarée
/// `Unsolvable` sans tentative (`attempts == 0`).
pub fn solve(input: &RosterInput, opts: &AssignOptions) -> Result<SolveReport, SchedError> {
    input.validate()?;
    warn_on_desired_totals(input);

    let report = if let Some(day) = eligibility::first_infeasible_day(input, opts) {
        tracing::info!(day, "not enough eligible people, search skipped");
        SolveReport {
            outcome: SolveOutcome::Unsolvable,
            attempts: 0,
            steps: 0,
        }
    } else if opts.workers > 1 {
        parallel::solve(input, opts)?
    } else {
        balance::solve(input, opts)
    };

    tracing::info!(
        outcome = report.outcome.label(),
        attempts = report.attempts,
        steps = report.steps,
        "solve finished"
    );
    balance::verify(input, report, opts)
}

fn warn_on_desired_totals(input: &RosterInput) {
    let desired: Option<i64> = input
        .people
        .iter()
        .map(|p| p.desired_shifts.map(i64::from))
        .sum();
    if let Some(desired) = desired {
        let required = input.total_headcount();
        if desired != required {
            tracing::warn!(desired, required, "desired shift counts do not match total headcount");
        }
    }
}
