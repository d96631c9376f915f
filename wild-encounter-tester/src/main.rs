mod assets;
mod reports;
mod simulation;
mod util;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use assets::{FileLoader, fallback_data};
use reports::{write_console_report, write_json_report};
use simulation::{Scenario, ScenarioResult, SimulationConfig, run_scenario};
use util::{parse_party_levels, parse_seeds, split_csv};
use wild_encounter::{Ability, EncounterData, RebalanceMode};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ReportFormat {
    Console,
    Json,
}

/// Lead abilities worth simulating.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LeadAbility {
    None,
    Static,
    MagnetPull,
    KeenEye,
    Intimidate,
    CuteCharm,
    Synchronize,
    Hustle,
    Illuminate,
    Stench,
}

impl LeadAbility {
    const fn ability(self) -> Ability {
        match self {
            Self::None => Ability::Other(0),
            Self::Static => Ability::Static,
            Self::MagnetPull => Ability::MagnetPull,
            Self::KeenEye => Ability::KeenEye,
            Self::Intimidate => Ability::Intimidate,
            Self::CuteCharm => Ability::CuteCharm,
            Self::Synchronize => Ability::Synchronize,
            Self::Hustle => Ability::Hustle,
            Self::Illuminate => Ability::Illuminate,
            Self::Stench => Ability::Stench,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RebalanceArg {
    Disabled,
    RosterIndex,
    UniformPool,
}

impl From<RebalanceArg> for RebalanceMode {
    fn from(arg: RebalanceArg) -> Self {
        match arg {
            RebalanceArg::Disabled => Self::Disabled,
            RebalanceArg::RosterIndex => Self::RosterIndex,
            RebalanceArg::UniformPool => Self::UniformPool,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "wild-encounter-tester", version)]
#[command(about = "Seeded simulation harness for the wild encounter engine")]
struct Args {
    /// Scenarios to run (comma-separated, or "all")
    #[arg(long, default_value = "land")]
    scenarios: String,

    /// List all available scenarios and exit
    #[arg(long)]
    list_scenarios: bool,

    /// Seeds to run (comma-separated)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Steps or field actions per run
    #[arg(long, default_value_t = 500)]
    attempts: usize,

    /// Party levels, lead first (comma-separated)
    #[arg(long, default_value = "20,18")]
    party_levels: String,

    /// Ability of the lead party member
    #[arg(long, value_enum, default_value_t = LeadAbility::None)]
    lead: LeadAbility,

    /// Override the configured rebalance mode
    #[arg(long, value_enum)]
    rebalance: Option<RebalanceArg>,

    /// Directory holding species.json, wild_headers.json and encounter_config.json
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Output report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if maybe_list_scenarios(&args)? {
        return Ok(());
    }

    announce_banner();

    let start_time = Instant::now();
    let scenarios = expand_scenarios(&args.scenarios)?;
    let seeds = parse_seeds(&args.seeds)?;
    let party_levels = parse_party_levels(&args.party_levels)?;
    let data = load_data(&args)?;

    let mut results = Vec::with_capacity(scenarios.len() * seeds.len());
    for scenario in &scenarios {
        for seed in &seeds {
            let config = SimulationConfig {
                party_levels: party_levels.clone(),
                lead_ability: args.lead.ability(),
                rebalance: args.rebalance.map(RebalanceMode::from),
                ..SimulationConfig::new(*seed).with_attempts(args.attempts)
            };
            results.push(run_scenario(&data, *scenario, &config));
        }
    }

    write_reports(&args, &results, start_time)?;

    if results.iter().any(|r| !r.passed) {
        std::process::exit(1);
    }

    Ok(())
}

fn maybe_list_scenarios(args: &Args) -> Result<bool> {
    if !args.list_scenarios {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available scenarios:")?;
    for scenario in Scenario::ALL {
        writeln!(
            output_target.writer(),
            "  {:16} - {}",
            scenario.key(),
            scenario.description()
        )?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn announce_banner() {
    eprintln!("{}", "🌿 Wild Encounter Tester".bright_cyan().bold());
    eprintln!("{}", "========================".cyan());
}

fn expand_scenarios(scenarios_arg: &str) -> Result<Vec<Scenario>> {
    let mut scenarios = Vec::new();
    for token in split_csv(scenarios_arg) {
        if token.eq_ignore_ascii_case("all") {
            scenarios.extend(Scenario::ALL);
            continue;
        }
        let Some(scenario) = Scenario::from_key(&token) else {
            bail!("Unknown scenario: {token} (see --list-scenarios)");
        };
        scenarios.push(scenario);
    }
    scenarios.dedup();
    if scenarios.is_empty() {
        scenarios.push(Scenario::Land);
    }
    Ok(scenarios)
}

fn load_data(args: &Args) -> Result<EncounterData> {
    if let Some(dir) = &args.assets {
        let loader = FileLoader::new(dir);
        return EncounterData::load(&loader)
            .with_context(|| format!("failed to load assets from {}", loader.root().display()));
    }
    let loader = FileLoader::bundled();
    match EncounterData::load(&loader) {
        Ok(data) => Ok(data),
        Err(err) => {
            log::warn!("bundled assets unavailable ({err}); using the demo world");
            fallback_data()
        }
    }
}

fn write_reports(args: &Args, results: &[ScenarioResult], start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;
    match args.report {
        ReportFormat::Console => {
            write_console_report(output_target.writer(), results, start_time.elapsed())?;
        }
        ReportFormat::Json => write_json_report(output_target.writer(), results)?,
    }
    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}
