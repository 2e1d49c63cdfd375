#![forbid(unsafe_code)]
use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use escala::{
    holidays::{HolidayInput, HolidayResolver},
    io,
    model::OrgId,
    scheduler::{ScheduleOptions, Scheduler},
    storage::{JsonStorage, MemoryStorage, Storage},
    HolidayCalendar, HolidayError,
};
use rust_decimal::Decimal;
use std::fs;
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de l'escala (preta / vermelha) et des feriados
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON des feriados organisationnels
    #[arg(long, global = true)]
    store: Option<String>,

    /// Organisation propriétaire des feriados
    #[arg(long, global = true, default_value = "default")]
    org: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Lister les feriados d'une année (nationaux + organisationnels)
    Holidays {
        #[arg(long)]
        year: i32,
    },

    /// Ajouter un feriado organisationnel
    AddHoliday {
        /// YYYY-MM-DD
        #[arg(long)]
        date: String,
        #[arg(long)]
        name: String,
        /// nacional | regional | organizacional
        #[arg(long, default_value = "organizacional")]
        kind: String,
        #[arg(long)]
        bonus: Option<Decimal>,
        /// Déclenche l'ajuste especial
        #[arg(long)]
        major: bool,
        /// Feriado informatif, sans effet sur l'escala
        #[arg(long)]
        no_schedule: bool,
    },

    /// Retirer un feriado organisationnel
    RemoveHoliday {
        #[arg(long)]
        date: NaiveDate,
    },

    /// Exporter les feriados organisationnels (JSON par année)
    ExportHolidays {
        #[arg(long)]
        out: String,
    },

    /// Importer (remplacer par année) des feriados organisationnels
    ImportHolidays {
        #[arg(long)]
        file: String,
    },

    /// Générer l'escala
    Generate {
        /// CSV des membres
        #[arg(long)]
        members: String,
        #[arg(long)]
        start: NaiveDate,
        #[arg(long)]
        end: NaiveDate,
        /// Options JSON (ScheduleOptions)
        #[arg(long)]
        options: Option<String>,
        /// Autorise les soldes négatifs
        #[arg(long)]
        overdraft: bool,
        #[arg(long)]
        out_json: Option<String>,
        #[arg(long)]
        out_csv: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let org = OrgId::new(&cli.org);
    let code = match cli.store.as_deref() {
        Some(path) => run(cli.cmd, HolidayResolver::new(org, JsonStorage::open(path)?))?,
        None => run(cli.cmd, HolidayResolver::new(org, MemoryStorage::new()))?,
    };

    std::process::exit(code);
}

fn run<S: Storage>(cmd: Commands, mut resolver: HolidayResolver<S>) -> Result<i32> {
    let code = match cmd {
        Commands::Holidays { year } => {
            resolver.load_year(year)?;
            for h in resolver.get_all_holidays(year) {
                println!(
                    "{} | {} | {} | +{}{}",
                    h.date,
                    h.name,
                    h.kind.wire_name(),
                    h.bonus_rest_days.normalize(),
                    if h.is_major { " | principal" } else { "" }
                );
            }
            0
        }
        Commands::AddHoliday {
            date,
            name,
            kind,
            bonus,
            major,
            no_schedule,
        } => {
            let input = HolidayInput {
                date,
                name,
                kind,
                bonus_rest_days: bonus,
                affects_schedule: Some(!no_schedule),
                is_major: major,
            };
            match resolver.add_custom_holiday(input) {
                Ok(h) => {
                    println!("added {} ({})", h.date, h.name);
                    0
                }
                Err(HolidayError::Validation(errors)) => {
                    for e in errors {
                        eprintln!("error: {e}");
                    }
                    1
                }
                Err(other) => return Err(other.into()),
            }
        }
        Commands::RemoveHoliday { date } => {
            if resolver.remove_custom_holiday(date)? {
                println!("removed {date}");
                0
            } else {
                eprintln!("no custom holiday on {date}");
                1
            }
        }
        Commands::ExportHolidays { out } => {
            let json = resolver.export_custom_holidays()?;
            fs::write(&out, json).with_context(|| format!("writing {out}"))?;
            0
        }
        Commands::ImportHolidays { file } => {
            let json = fs::read_to_string(&file).with_context(|| format!("reading {file}"))?;
            let count = resolver.import_custom_holidays(&json)?;
            println!("imported {count} holiday(s)");
            0
        }
        Commands::Generate {
            members,
            start,
            end,
            options,
            overdraft,
            out_json,
            out_csv,
        } => {
            let mut opts: ScheduleOptions = match options {
                Some(path) => {
                    let data = fs::read(&path).with_context(|| format!("reading {path}"))?;
                    serde_json::from_slice(&data).with_context(|| format!("parsing {path}"))?
                }
                None => ScheduleOptions::default(),
            };
            opts.allow_budget_overdraft |= overdraft;

            let roster = io::import_members_csv(&members)?;
            let mut scheduler = Scheduler::new(opts);
            scheduler.add_members(roster);
            let schedule = scheduler.generate_with(start, end, &resolver)?;

            if let Some(path) = out_json {
                io::export_schedule_json(path, &schedule)?;
            }
            if let Some(path) = out_csv {
                io::export_assignments_csv(path, scheduler.members(), &schedule)?;
            }
            print!("{}", io::render_grid(scheduler.members(), &schedule));
            for d in &schedule.days_with_holidays {
                let name = resolver
                    .holiday_on(*d)
                    .map(|h| h.name)
                    .unwrap_or_default();
                println!("feriado {d}: {name}");
            }

            if schedule.warnings.is_empty() {
                0
            } else {
                eprintln!("{} budget warning(s)", schedule.warnings.len());
                for w in &schedule.warnings {
                    eprintln!(
                        "  {} {} ({}): shortfall {}, balance {}",
                        w.date, w.member, w.rotation, w.shortfall, w.balance
                    );
                }
                // Code 2 = WARNING
                2
            }
        }
    };
    Ok(code)
}
