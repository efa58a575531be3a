use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

use crate::config::{Config, ConfigError};
use crate::data::boxes::{BoxRecord, BoxStore, Category, StoreError};
use crate::data::roster::{RosterEntry, RosterError};
use crate::data::scores::{ScoreError, ScoreTable};
use crate::data::sheet::{self, SheetError};
use crate::data::validate::{validate_sheet_file, ValidationSeverity};
use crate::logging;
use crate::optimizer::ranking::{rank_rows, report_rows, write_csv, write_json, ReportError, TeamRow};
use crate::optimizer::{SearchStrategy, TeamSearch};
use crate::types::{Matchup, TypeChart, TypeSet};

#[derive(Debug, Parser)]
#[command(name = "soulbox", version)]
#[command(about = "Type matchups and team search for creature boxes", long_about = None)]
pub struct Cli {
    /// More output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Dual affinity both ways and the matchup ratio
    Matchup {
        /// Attacking type set, e.g. fire or fire/water
        attacker: TypeSet,
        /// Defending type set
        defender: TypeSet,
    },
    /// Manage saved boxes
    Box {
        #[command(subcommand)]
        command: BoxCommand,
    },
    /// Check a tracker sheet export without importing it
    Validate {
        sheet: PathBuf,
        category: Category,
    },
    /// Delete the config file and the data directory
    Clean {
        /// Actually delete; otherwise only list what would go
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum BoxCommand {
    /// List saved boxes
    List,
    /// Show one box and its entries
    Show { name: String },
    /// Create an empty box
    Create {
        name: String,
        game: String,
        category: Category,
        #[arg(long = "player")]
        players: Vec<String>,
    },
    /// Delete a box
    Remove { name: String },
    /// Rename a box
    Rename { old: String, new: String },
    /// Create a box from a tracker sheet exported as CSV
    Import {
        name: String,
        game: String,
        category: Category,
        sheet: PathBuf,
    },
    /// Write a box out in tracker sheet layout
    Export { name: String, out: PathBuf },
    /// Every legal team of the box's active entries
    Report {
        name: String,
        /// Write here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = ReportFormat::Csv)]
        format: ReportFormat,
        #[arg(long, value_enum)]
        sort: Option<SortKey>,
        /// Overrides search.strategy from the config
        #[arg(long)]
        strategy: Option<SearchStrategy>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Csv,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortKey {
    Score,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Score(#[from] ScoreError),
    #[error(transparent)]
    Roster(#[from] RosterError),
    #[error(transparent)]
    Sheet(#[from] SheetError),
    #[error(transparent)]
    Report(#[from] ReportError),
    #[error("{path}: {source}")]
    Io { path: String, source: io::Error },
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> CliError + '_ {
    move |source| CliError::Io {
        path: path.display().to_string(),
        source,
    }
}

/// Resolved config, box store and score table for commands that touch data.
struct Context {
    config: Config,
    store: BoxStore,
    scores: ScoreTable,
}

impl Context {
    fn load() -> Result<Self, CliError> {
        let (config, _) = Config::load()?;
        let store = BoxStore::new(config.resolved_data_dir()?);
        let scores = match config.resolved_score_table() {
            Some(path) => ScoreTable::load_json(&path)?,
            None => ScoreTable::standard(),
        };
        Ok(Self {
            config,
            store,
            scores,
        })
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() { 2 } else { 0 };
        }
    };
    logging::init(cli.verbose);

    let outcome = match cli.command {
        Command::Matchup { attacker, defender } => handle_matchup(attacker, defender),
        Command::Box { command } => handle_box(command),
        Command::Validate { sheet, category } => handle_validate(&sheet, category),
        Command::Clean { force } => handle_clean(force),
    };
    match outcome {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            1
        }
    }
}

fn handle_matchup(attacker: TypeSet, defender: TypeSet) -> Result<i32, CliError> {
    let matchup = Matchup::between(TypeChart::standard(), attacker, defender);
    println!("{attacker} -> {defender}: {}", matchup.forward);
    println!("{defender} -> {attacker}: {}", matchup.reverse);
    println!("ratio: {}", matchup.ratio);
    Ok(0)
}

fn handle_box(command: BoxCommand) -> Result<i32, CliError> {
    let context = Context::load()?;
    let store = &context.store;
    match command {
        BoxCommand::List => {
            let boxes = store.list()?;
            if boxes.is_empty() {
                println!("no boxes in {}", store.root().display());
            }
            for record in boxes {
                println!(
                    "{}\t{}\t{}\t{} entries\t{}",
                    record.name,
                    record.game,
                    record.category,
                    record.entries.len(),
                    record.updated_at
                );
            }
        }
        BoxCommand::Show { name } => show_box(&context, &name)?,
        BoxCommand::Create {
            name,
            game,
            category,
            players,
        } => {
            let path = store.create(&BoxRecord::new(&name, game, category, players))?;
            println!("created box '{name}' at {}", path.display());
        }
        BoxCommand::Remove { name } => {
            store.remove(&name)?;
            println!("removed box '{name}'");
        }
        BoxCommand::Rename { old, new } => {
            store.rename(&old, &new)?;
            println!("renamed box '{old}' to '{new}'");
        }
        BoxCommand::Import {
            name,
            game,
            category,
            sheet: sheet_path,
        } => {
            let rows = sheet::read_rows(&sheet_path)?;
            let parsed = sheet::parse_rows(&rows, category)?;
            let mut record = BoxRecord::new(&name, game, category, parsed.players);
            record.entries = parsed.entries;
            let roster = record.roster(&context.scores)?;
            let path = store.create(&record)?;
            println!(
                "imported {} entries ({} active) into '{name}' at {}",
                roster.len(),
                roster.active().len(),
                path.display()
            );
        }
        BoxCommand::Export { name, out } => {
            let record = store.load(&name)?;
            let rows = sheet::export_rows(&record);
            let file = File::create(&out).map_err(io_error(&out))?;
            sheet::write_rows(&rows, file)?;
            println!("exported '{name}' to {}", out.display());
        }
        BoxCommand::Report {
            name,
            out,
            format,
            sort,
            strategy,
        } => write_report(&context, &name, out.as_deref(), format, sort, strategy)?,
    }
    Ok(0)
}

fn show_box(context: &Context, name: &str) -> Result<(), CliError> {
    let record = context.store.load(name)?;
    let roster = record.roster(&context.scores)?;
    println!("name: {}", record.name);
    println!("game: {}", record.game);
    println!("category: {}", record.category);
    if !record.players.is_empty() {
        println!("players: {}", record.players.join(", "));
    }
    println!("created: {}", record.created_at);
    println!("updated: {}", record.updated_at);
    println!(
        "entries: {} ({} active)",
        roster.len(),
        roster.active().len()
    );
    for entry in roster.entries() {
        println!(
            "  {:<6} {}  [{}]  {:.2}  met: {}",
            status_label(entry),
            entry.name(),
            entry
                .members()
                .iter()
                .map(|member| member.type_set().to_string())
                .collect::<Vec<_>>()
                .join(" & "),
            entry.score(),
            entry.met()
        );
    }
    Ok(())
}

fn status_label(entry: &RosterEntry) -> &'static str {
    if entry.is_dead() {
        "dead"
    } else if entry.is_lost() {
        "lost"
    } else if entry.is_party() {
        "party"
    } else {
        "box"
    }
}

fn write_report(
    context: &Context,
    name: &str,
    out: Option<&Path>,
    format: ReportFormat,
    sort: Option<SortKey>,
    strategy: Option<SearchStrategy>,
) -> Result<(), CliError> {
    let record = context.store.load(name)?;
    let roster = record.roster(&context.scores)?;
    let search = TeamSearch::new(&roster)
        .with_strategy(strategy.unwrap_or(context.config.search.strategy))
        .with_workers(context.config.search.workers);
    let rows: Vec<TeamRow> = report_rows(&search).collect();
    let rows = match sort {
        Some(SortKey::Score) => rank_rows(rows),
        None => rows,
    };
    log::info!(
        "{} teams of {} for box '{}'",
        rows.len(),
        search.team_size(),
        record.name
    );

    let width = context.config.report.columns;
    match out {
        Some(path) => {
            let file = File::create(path).map_err(io_error(path))?;
            match format {
                ReportFormat::Csv => write_csv(&rows, width, file)?,
                ReportFormat::Json => write_json(&rows, file)?,
            }
            println!("wrote {} teams to {}", rows.len(), path.display());
        }
        None => {
            let stdout = io::stdout().lock();
            match format {
                ReportFormat::Csv => write_csv(&rows, width, stdout)?,
                ReportFormat::Json => write_json(&rows, stdout)?,
            }
        }
    }
    Ok(())
}

fn handle_validate(path: &Path, category: Category) -> Result<i32, CliError> {
    let report = validate_sheet_file(path, category)?;
    for diagnostic in &report.diagnostics {
        println!("{diagnostic}");
    }
    let errors = report.count(ValidationSeverity::Error);
    let warnings = report.count(ValidationSeverity::Warning);
    if report.has_errors() {
        eprintln!("validation failed: {errors} error(s), {warnings} warning(s)");
        Ok(1)
    } else {
        println!("validation passed: {warnings} warning(s)");
        Ok(0)
    }
}

fn handle_clean(force: bool) -> Result<i32, CliError> {
    let (config, config_path) = Config::peek()?;
    let data_dir = config.resolved_data_dir()?;
    let targets: Vec<&Path> = [config_path.as_path(), data_dir.as_path()]
        .into_iter()
        .filter(|path| path.exists())
        .collect();

    if targets.is_empty() {
        println!("nothing to remove");
        return Ok(0);
    }
    if !force {
        for path in &targets {
            println!("would remove {}", path.display());
        }
        eprintln!("re-run with --force to delete");
        return Ok(2);
    }
    for path in targets {
        if path.is_dir() {
            fs::remove_dir_all(path).map_err(io_error(path))?;
        } else {
            fs::remove_file(path).map_err(io_error(path))?;
        }
        println!("removed {}", path.display());
    }
    Ok(0)
}
