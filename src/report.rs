use crate::model::Roster;
use crate::scheduler::{SolveOutcome, SolveReport};
use std::fmt::Write;

/// Permet de customiser le rendu du tableau (texte, markdown, etc.).
pub trait ReportRenderer {
    fn render(&self, roster: &Roster, report: &SolveReport) -> String;
}

/// Rendu texte brut : une ligne par jour puis les charges par personne.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextReport;

impl ReportRenderer for TextReport {
    fn render(&self, roster: &Roster, report: &SolveReport) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Outcome: {} ({} attempt(s), {} tries)",
            report.outcome.label(),
            report.attempts,
            report.steps
        );
        if let Some(schedule) = report.outcome.schedule() {
            render_schedule(&mut out, roster, schedule);
        }
        out
    }
}

/// Rendu du tableau courant d'un roster, sans statistiques de recherche.
pub fn render_roster(roster: &Roster) -> String {
    let mut out = String::new();
    match &roster.schedule {
        Some(schedule) => render_schedule(&mut out, roster, schedule),
        None => out.push_str("No schedule yet\n"),
    }
    out
}

fn render_schedule(out: &mut String, roster: &Roster, schedule: &crate::model::Schedule) {
    for assignment in &schedule.days {
        let names: Vec<&str> = assignment
            .people
            .iter()
            .map(|&id| roster.person_name(id))
            .collect();
        let _ = writeln!(out, "Day {}: {}", assignment.day, names.join(", "));
    }
    out.push('\n');
    for load in &schedule.workloads {
        let _ = writeln!(
            out,
            "{}: total {}, weekend {}",
            roster.person_name(load.person),
            load.total,
            load.weekend
        );
    }
    let _ = writeln!(
        out,
        "Spread: total {}, weekend {}",
        schedule.total_spread(),
        schedule.weekend_spread()
    );
}

/// Code de sortie CLI associé à une issue.
pub fn exit_code(outcome: &SolveOutcome) -> i32 {
    match outcome {
        SolveOutcome::Balanced(_) => 0,
        SolveOutcome::Unbalanced(_) => 2,
        SolveOutcome::Unsolvable => 3,
        SolveOutcome::Exhausted => 4,
    }
}
