#![forbid(unsafe_code)]
use anyhow::{bail, Context, Result};
use gardes::{
    calendar::{self, DayPattern},
    io,
    model::{Roster, RosterInput},
    report::{self, ReportRenderer, TextReport},
    scheduler::{AssignOptions, Scheduler},
    storage::{JsonStorage, Storage},
};
use clap::{Args, Parser, Subcommand};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de tableau de gardes (fichiers JSON/CSV, sans base de données)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON de roster
    #[arg(long, global = true, default_value = "roster.json")]
    roster: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Créer le roster depuis des CSV personnes + jours
    Import {
        #[arg(long)]
        people: String,
        #[arg(long)]
        days: String,
    },

    /// Créer le roster d'un mois calendaire
    Month {
        #[arg(long)]
        people: String,
        #[arg(long)]
        year: i32,
        #[arg(long)]
        month: u32,
        /// Motif JSON (effectifs, week-ends, surcharges)
        #[arg(long)]
        pattern: Option<String>,
        /// Effectif des jours de semaine, si pas de motif
        #[arg(long, default_value_t = 2)]
        headcount: i32,
    },

    /// Valider le roster sans résoudre
    Validate,

    /// Calculer le tableau
    Solve {
        #[command(flatten)]
        options: OptionArgs,
        /// Export CSV du tableau (optionnel)
        #[arg(long)]
        out_csv: Option<String>,
        /// Export CSV des charges (optionnel)
        #[arg(long)]
        workload_csv: Option<String>,
    },

    /// Afficher le tableau enregistré
    Show,

    /// Vérifier les conflits du tableau enregistré
    Check {
        #[command(flatten)]
        options: OptionArgs,
        /// Export CSV des conflits (optionnel)
        #[arg(long)]
        report: Option<String>,
    },
}

/// Options moteur : défauts, puis fichier `--options`, puis drapeaux explicites.
#[derive(Args, Debug)]
struct OptionArgs {
    /// Fichier JSON d'options
    #[arg(long)]
    options: Option<String>,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    total_tolerance: Option<u32>,
    #[arg(long)]
    weekend_tolerance: Option<u32>,
    #[arg(long)]
    max_attempts: Option<u32>,
    #[arg(long)]
    max_steps: Option<u64>,
    #[arg(long)]
    workers: Option<usize>,
    #[arg(long)]
    no_every_other_day: bool,
    #[arg(long)]
    seniority_pairing: bool,
    #[arg(long)]
    weekend_pruning: bool,
}

impl OptionArgs {
    fn resolve(&self) -> Result<AssignOptions> {
        let mut opts = match &self.options {
            Some(path) => {
                let data = std::fs::read(path).with_context(|| format!("reading {path}"))?;
                serde_json::from_slice(&data).with_context(|| format!("parsing {path}"))?
            }
            None => AssignOptions::default(),
        };
        if let Some(v) = self.seed {
            opts.seed = v;
        }
        if let Some(v) = self.total_tolerance {
            opts.total_tolerance = v;
        }
        if let Some(v) = self.weekend_tolerance {
            opts.weekend_tolerance = v;
        }
        if let Some(v) = self.max_attempts {
            opts.max_attempts = v;
        }
        if let Some(v) = self.max_steps {
            opts.max_steps = v;
        }
        if let Some(v) = self.workers {
            opts.workers = v.max(1);
        }
        opts.no_every_other_day |= self.no_every_other_day;
        opts.seniority_pairing |= self.seniority_pairing;
        opts.weekend_pruning |= self.weekend_pruning;
        Ok(opts)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .try_init();
    }

    let storage = JsonStorage::open(&cli.roster);

    let code = match cli.cmd {
        Commands::Import { people, days } => {
            let input = io::import_roster_csv(people, days)?;
            println!(
                "Imported {} people over {} days",
                input.people.len(),
                input.days.len()
            );
            storage.save(&Roster::new(input))?;
            0
        }
        Commands::Month {
            people,
            year,
            month,
            pattern,
            headcount,
        } => {
            let pattern = match pattern {
                Some(path) => calendar::load_pattern_from_file(path)?,
                None => DayPattern {
                    weekday_headcount: headcount,
                    ..DayPattern::default()
                },
            };
            let input = RosterInput::new(
                io::import_people_csv(people)?,
                calendar::generate_month(year, month, &pattern)?,
            );
            input.validate()?;
            println!(
                "Generated {year}-{month:02}: {} people over {} days",
                input.people.len(),
                input.days.len()
            );
            storage.save(&Roster::new(input))?;
            0
        }
        Commands::Validate => {
            let roster = load(&storage)?;
            roster.input.validate()?;
            println!(
                "OK: {} people, {} days, {} shifts to fill",
                roster.input.people.len(),
                roster.input.days.len(),
                roster.input.total_headcount()
            );
            0
        }
        Commands::Solve {
            options,
            out_csv,
            workload_csv,
        } => {
            let opts = options.resolve()?;
            let mut scheduler = Scheduler::from_roster(load(&storage)?);
            let solved = scheduler.assign(opts)?;
            print!("{}", TextReport.render(scheduler.roster(), &solved));
            if let Some(schedule) = solved.outcome.schedule() {
                if let Some(path) = out_csv {
                    io::export_schedule_csv(path, scheduler.roster(), schedule)?;
                }
                if let Some(path) = workload_csv {
                    io::export_workload_csv(path, scheduler.roster(), schedule)?;
                }
                storage.save(scheduler.roster())?;
            }
            // 2 = déséquilibré, 3 = infaisable, 4 = budget épuisé
            report::exit_code(&solved.outcome)
        }
        Commands::Show => {
            let roster = load(&storage)?;
            print!("{}", report::render_roster(&roster));
            0
        }
        Commands::Check { options, report } => {
            let opts = options.resolve()?;
            let scheduler = Scheduler::from_roster(load(&storage)?);
            if scheduler.roster().schedule.is_none() {
                bail!("no schedule in {}", storage.path().display());
            }
            let conflicts = scheduler.detect_conflicts(&opts);
            if conflicts.is_empty() {
                println!("OK: no conflicts");
                0
            } else {
                eprintln!("Found {} conflict(s)", conflicts.len());
                if let Some(path) = report {
                    // CSV simple
                    let mut w = csv::Writer::from_path(path)?;
                    w.write_record(["day", "person", "kind"])?;
                    for c in &conflicts {
                        let person = c
                            .person
                            .map(|id| scheduler.roster().person_name(id))
                            .unwrap_or("");
                        w.write_record([c.day.to_string().as_str(), person, c.kind.as_str()])?;
                    }
                    w.flush()?;
                }
                // Code 2 = WARNING/INCOMPLETE
                2
            }
        }
    };

    std::process::exit(code);
}

fn load(storage: &JsonStorage) -> Result<Roster> {
    if !storage.exists() {
        bail!(
            "roster file {} not found (run `import` or `month` first)",
            storage.path().display()
        );
    }
    storage.load()
}
