#![forbid(unsafe_code)]
//! Gardes — construction d'un tableau de gardes mensuel (sans BD).
//!
//! - Recherche par backtracking jour par jour, ordre des candidats aléatoire mais graine fixe.
//! - Boucle d'équilibrage : nouvelles tentatives jusqu'à un écart de charge toléré.
//! - Contraintes dures : indisponibilités, pas deux jours d'affilée, effectif exact.
//! - Entrées/sorties fichiers (JSON/CSV) en dehors du moteur.

pub mod calendar;
pub mod io;
pub mod model;
pub mod report;
pub mod scheduler;
pub mod storage;

pub use calendar::{generate_month, DayPattern};
pub use model::{
    DayAssignment, DaySpec, Person, PersonId, Roster, RosterInput, Schedule, ValidationError,
    Workload,
};
pub use report::{ReportRenderer, TextReport};
pub use scheduler::{
    solve, AssignOptions, Conflict, ConflictKind, SchedError, Scheduler, SolveOutcome, SolveReport,
};
pub use storage::{JsonStorage, Storage};
