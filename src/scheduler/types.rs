use crate::model::{PersonId, Schedule, ValidationError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Options d'assignation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssignOptions {
    /// Écart max toléré entre la plus grosse et la plus petite charge totale.
    pub total_tolerance: u32,
    /// Idem pour les gardes de week-end.
    pub weekend_tolerance: u32,
    /// Nombre maximal de tentatives complètes. 0 donne `Exhausted` sans recherche.
    pub max_attempts: u32,
    /// Nombre maximal de choix provisoires par tentative.
    pub max_steps: u64,
    pub seed: u64,
    /// 1 = séquentiel.
    pub workers: usize,
    /// Interdit aussi de travailler à J-2.
    pub no_every_other_day: bool,
    /// Au plus un junior par jour, toujours accompagné d'un senior.
    pub seniority_pairing: bool,
    /// Écarte le week-end les personnes déjà au-dessus du minimum + 1.
    ///
    /// Règle de recherche, pas contrainte dure : elle restreint l'espace exploré,
    /// `Unsolvable` signifie alors qu'aucun tableau ne la respecte aussi.
    pub weekend_pruning: bool,
}

impl Default for AssignOptions {
    fn default() -> Self {
        Self {
            total_tolerance: 2,
            weekend_tolerance: 2,
            max_attempts: 1000,
            max_steps: 2_000_000,
            seed: 0,
            workers: 1,
            no_every_other_day: false,
            seniority_pairing: false,
            weekend_pruning: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    Understaffed,
    Overstaffed,
    DuplicateInDay,
    Unavailable,
    ConsecutiveDays,
    EveryOtherDay,
    MissingSenior,
    TooManyJuniors,
    UnknownPerson,
    UnknownDay,
}

impl ConflictKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ConflictKind::Understaffed => "understaffed",
            ConflictKind::Overstaffed => "overstaffed",
            ConflictKind::DuplicateInDay => "duplicate",
            ConflictKind::Unavailable => "unavailable",
            ConflictKind::ConsecutiveDays => "consecutive",
            ConflictKind::EveryOtherDay => "every-other-day",
            ConflictKind::MissingSenior => "missing-senior",
            ConflictKind::TooManyJuniors => "too-many-juniors",
            ConflictKind::UnknownPerson => "unknown-person",
            ConflictKind::UnknownDay => "unknown-day",
        }
    }
}

/// Violation d'une contrainte dure dans un tableau.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub day: u32,
    pub person: Option<PersonId>,
    pub kind: ConflictKind,
}

#[derive(Error, Debug)]
pub enum SchedError {
    #[error("invalid roster input: {0}")]
    Invalid(#[from] ValidationError),
    #[error("engine produced an inconsistent schedule ({} conflict(s))", .0.len())]
    Inconsistent(Vec<Conflict>),
    #[error(
        "schedule reported as balanced but spreads are total {total_spread}, weekend {weekend_spread}"
    )]
    OutOfTolerance { total_spread: u32, weekend_spread: u32 },
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Issue d'une résolution complète.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveOutcome {
    /// Les deux écarts sont dans la tolérance.
    Balanced(Schedule),
    /// Plafond de tentatives atteint : meilleur tableau faisable trouvé.
    Unbalanced(Schedule),
    /// Aucune affectation ne respecte les contraintes dures.
    Unsolvable,
    /// Aucun tableau faisable : chaque tentative a épuisé son budget de recherche,
    /// ou `max_attempts` vaut 0.
    Exhausted,
}

impl SolveOutcome {
    pub fn schedule(&self) -> Option<&Schedule> {
        match self {
            SolveOutcome::Balanced(s) | SolveOutcome::Unbalanced(s) => Some(s),
            SolveOutcome::Unsolvable | SolveOutcome::Exhausted => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SolveOutcome::Balanced(_) => "balanced",
            SolveOutcome::Unbalanced(_) => "feasible but unbalanced",
            SolveOutcome::Unsolvable => "no valid schedule",
            SolveOutcome::Exhausted => "search budget exhausted",
        }
    }
}

/// Résultat + statistiques de recherche.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveReport {
    pub outcome: SolveOutcome,
    pub attempts: u32,
    /// Nombre total de choix provisoires, toutes tentatives confondues.
    pub steps: u64,
}
