use super::balance::{run_attempt, AttemptRun, Tally};
use super::{AssignOptions, SchedError, SolveReport};
use crate::model::RosterInput;
use anyhow::Context;
use rayon::prelude::*;
use std::sync::atomic::{AtomicU32, Ordering};

/// Tentatives indépendantes réparties sur `opts.workers` threads.
///
/// La tentative décisive (équilibrée ou infaisable) de plus petit index gagne ;
/// les tentatives d'index supérieur s'arrêtent d'elles-mêmes entre deux jours.
/// Le résultat est donc identique à celui de la boucle séquentielle.
pub(super) fn solve(input: &RosterInput, opts: &AssignOptions) -> Result<SolveReport, SchedError> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(opts.workers)
        .build()
        .context("building worker pool")?;

    let decided = AtomicU32::new(u32::MAX);
    let runs: Vec<AttemptRun> = pool.install(|| {
        (0..opts.max_attempts)
            .into_par_iter()
            .map(|index| {
                let should_stop = || decided.load(Ordering::Relaxed) < index;
                let run = run_attempt(input, opts, index, &should_stop);
                if run.is_decisive(opts) {
                    decided.fetch_min(index, Ordering::Relaxed);
                }
                run
            })
            .collect()
    });

    let mut tally = Tally::default();
    for run in runs {
        if let Some(outcome) = tally.observe(run, opts) {
            return Ok(tally.report(outcome));
        }
    }
    let outcome = tally.exhausted();
    Ok(tally.report(outcome))
}
