mod config;
mod history;
mod logging;
mod output;
mod roster;

use chrono::Utc;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use recordpick_core::constants::{DEFAULT_POINTS_CAP, DEFAULT_SIMULATION_TRIALS};
use recordpick_core::{
    next_entry_id, query_history, rate_entry, run_selection, simulate_distribution, HistoryEntry,
    HistoryOrder, HistoryQuery, RedistributionConfig, SelectionStats,
};
use std::path::{Path, PathBuf};

use crate::config::RecordpickConfig;
use crate::roster::Roster;

pub fn bail(msg: impl std::fmt::Display) -> ! {
    eprintln!("Error: {msg}");
    std::process::exit(1);
}

#[derive(Parser)]
#[command(name = "recordpick", version, about = "Pick the next record for the club, weighted toward whoever was picked least")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Choose a participant and one of their unused records, then update weights
    Pick(PickArgs),
    /// Show how the current weights translate into odds, without picking
    Simulate(SimulateArgs),
    /// Summarize past picks from a history file
    Stats(StatsArgs),
    /// List past picks, newest first
    History(HistoryArgs),
    /// Rate a past pick from 0 to 10; rating again replaces your earlier score
    Rate(RateArgs),
    /// Create a default config file at ~/.config/recordpick/config.toml
    Init,
}

#[derive(clap::Args)]
struct RunArgs {
    /// Roster JSON file with members, weights and records
    #[arg(long)]
    roster: Option<PathBuf>,

    /// Attending member by name (repeatable). Default: members marked attending
    #[arg(long = "participant")]
    participants: Vec<String>,

    /// Seed the random source for a reproducible draw
    #[arg(long)]
    seed: Option<u64>,

    /// Output JSON instead of table
    #[arg(long)]
    json: bool,

    /// Show debug logging on stderr
    #[arg(short, long)]
    verbose: bool,

    /// Path to config file (default: ~/.config/recordpick/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser)]
struct PickArgs {
    #[command(flatten)]
    run: RunArgs,

    /// Max points moved to each other participant. Default: 5
    #[arg(long)]
    points_cap: Option<u32>,

    /// Compute and print the pick without touching the roster or history
    #[arg(long)]
    dry_run: bool,

    /// Append the pick to this JSONL history file
    #[arg(long)]
    history: Option<PathBuf>,
}

#[derive(Parser)]
struct SimulateArgs {
    #[command(flatten)]
    run: RunArgs,

    /// Number of draws. Default: 1000
    #[arg(long)]
    trials: Option<usize>,
}

#[derive(Parser)]
struct StatsArgs {
    /// JSONL history file written by `pick --history`
    #[arg(long)]
    history: Option<PathBuf>,

    /// Roster file used to show names instead of ids
    #[arg(long)]
    roster: Option<PathBuf>,

    /// Output JSON instead of table
    #[arg(long)]
    json: bool,

    /// Path to config file (default: ~/.config/recordpick/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser)]
struct HistoryArgs {
    /// JSONL history file written by `pick --history`
    #[arg(long)]
    history: Option<PathBuf>,

    /// Roster file used to show names instead of ids
    #[arg(long)]
    roster: Option<PathBuf>,

    /// Only picks this member took part in (needs a roster)
    #[arg(long)]
    participant: Option<String>,

    /// Highest average rating first instead of newest first
    #[arg(long)]
    sort_by_rating: bool,

    /// Show at most this many picks
    #[arg(long)]
    limit: Option<usize>,

    /// Output JSON instead of table
    #[arg(long)]
    json: bool,

    /// Path to config file (default: ~/.config/recordpick/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser)]
struct RateArgs {
    /// Id of the pick, as shown by `recordpick history`
    #[arg(long)]
    entry: u64,

    /// Member giving the rating
    #[arg(long)]
    rater: String,

    /// Score from 0 to 10
    #[arg(long)]
    score: f64,

    /// JSONL history file written by `pick --history`
    #[arg(long)]
    history: Option<PathBuf>,

    /// Roster file used to resolve the rater's name
    #[arg(long)]
    roster: Option<PathBuf>,

    /// Path to config file (default: ~/.config/recordpick/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Pick(args) => run_pick(args),
        Commands::Simulate(args) => run_simulate(args),
        Commands::Stats(args) => run_stats(args),
        Commands::History(args) => run_history(args),
        Commands::Rate(args) => run_rate(args),
        Commands::Init => {
            let path = config::config_path().unwrap_or_else(|e| bail(e));
            config::write_default_config(&path).unwrap_or_else(|e| bail(e));
            println!("Created config at {}", path.display());
            println!("Edit it to set your default roster, history file, etc.");
        }
    }
}

fn load_run_config(config: &Option<PathBuf>) -> (PathBuf, RecordpickConfig) {
    let config_path = match config {
        Some(path) => path.clone(),
        None => config::config_path().unwrap_or_else(|e| bail(e)),
    };
    let cfg = config::load_config(&config_path).unwrap_or_else(|e| bail(e));
    (config_path, cfg)
}

fn resolve_roster_path(arg: &Option<PathBuf>, cfg: &RecordpickConfig, config_path: &Path) -> PathBuf {
    arg.clone().or_else(|| cfg.roster.clone()).unwrap_or_else(|| {
        bail(format!("No roster specified. Pass --roster or set it in {}", config_path.display()));
    })
}

fn resolve_history_path(arg: &Option<PathBuf>, cfg: &RecordpickConfig, config_path: &Path) -> PathBuf {
    arg.clone().or_else(|| cfg.history.clone()).unwrap_or_else(|| {
        bail(format!("No history file specified. Pass --history or set it in {}", config_path.display()));
    })
}

fn load_optional_roster(arg: &Option<PathBuf>, cfg: &RecordpickConfig) -> Option<Roster> {
    arg.clone()
        .or_else(|| cfg.roster.clone())
        .map(|path| roster::load_roster(&path).unwrap_or_else(|e| bail(e)))
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    }
}

fn run_pick(args: PickArgs) {
    logging::init_tracing(args.run.verbose);

    let (config_path, cfg) = load_run_config(&args.run.config);
    let roster_path = resolve_roster_path(&args.run.roster, &cfg, &config_path);
    let mut roster = roster::load_roster(&roster_path).unwrap_or_else(|e| bail(e));

    let points_cap = args.points_cap.or(cfg.points_cap).unwrap_or(DEFAULT_POINTS_CAP);
    let redistribution = RedistributionConfig::with_points_cap(points_cap);
    let history_path = args.history.clone().or(cfg.history);

    let result = {
        let members = roster.attendees(&args.run.participants).unwrap_or_else(|e| bail(e));
        let candidates = roster::candidates(&members);
        let pool = roster::item_pool(&members);
        tracing::info!(
            roster = %roster_path.display(),
            participants = candidates.len(),
            points_cap,
            "picking"
        );

        let mut rng = make_rng(args.run.seed);
        run_selection(&candidates, &pool, &redistribution, &mut rng).unwrap_or_else(|e| bail(e))
    };

    let applied = !args.dry_run;
    if applied {
        roster.apply(&result).unwrap_or_else(|e| bail(e));
        roster::save_roster(&roster_path, &roster).unwrap_or_else(|e| bail(e));

        if let Some(ref path) = history_path {
            let appended = history::load_history(path).and_then(|entries| {
                let entry = HistoryEntry::from_result(next_entry_id(&entries), &result, Utc::now());
                history::append_entry(path, &entry)
            });
            if let Err(e) = appended {
                // The roster is already saved; the pick stands even if the log line is lost.
                tracing::warn!("{e}");
            }
        }
    }

    if args.run.json {
        output::print_pick_json(&result, &roster, applied);
    } else {
        output::print_pick_table(&result, &roster, applied);
    }
}

fn run_simulate(args: SimulateArgs) {
    logging::init_tracing(args.run.verbose);

    let (config_path, cfg) = load_run_config(&args.run.config);
    let roster_path = resolve_roster_path(&args.run.roster, &cfg, &config_path);
    let roster: Roster = roster::load_roster(&roster_path).unwrap_or_else(|e| bail(e));

    let trials = args.trials.or(cfg.trials).unwrap_or(DEFAULT_SIMULATION_TRIALS);
    let members = roster.attendees(&args.run.participants).unwrap_or_else(|e| bail(e));
    let candidates = roster::candidates(&members);

    let mut rng = make_rng(args.run.seed);
    let dist = simulate_distribution(&candidates, trials, &mut rng).unwrap_or_else(|e| bail(e));

    if args.run.json {
        output::print_distribution_json(&dist, &roster);
    } else {
        output::print_distribution_table(&dist, &roster);
    }
}

fn run_stats(args: StatsArgs) {
    logging::init_tracing(false);

    let (config_path, cfg) = load_run_config(&args.config);
    let history_path = resolve_history_path(&args.history, &cfg, &config_path);
    let roster = load_optional_roster(&args.roster, &cfg);

    let entries = history::load_history(&history_path).unwrap_or_else(|e| bail(e));
    let stats = SelectionStats::from_history(&entries);

    if args.json {
        output::print_stats_json(&stats, roster.as_ref());
    } else {
        output::print_stats_table(&stats, roster.as_ref());
    }
}

fn run_history(args: HistoryArgs) {
    logging::init_tracing(false);

    let (config_path, cfg) = load_run_config(&args.config);
    let history_path = resolve_history_path(&args.history, &cfg, &config_path);
    let roster = load_optional_roster(&args.roster, &cfg);

    let participant = args.participant.as_ref().map(|name| {
        let roster = roster
            .as_ref()
            .unwrap_or_else(|| bail("--participant needs a roster to resolve names; pass --roster"));
        roster.member_id(name).unwrap_or_else(|e| bail(e))
    });
    let query = HistoryQuery {
        participant,
        order: if args.sort_by_rating { HistoryOrder::BestRated } else { HistoryOrder::Newest },
        limit: args.limit,
    };

    let entries = history::load_history(&history_path).unwrap_or_else(|e| bail(e));
    let listed = query_history(&entries, &query);

    if args.json {
        output::print_history_json(&listed, roster.as_ref());
    } else {
        output::print_history_table(&listed, roster.as_ref());
    }
}

fn run_rate(args: RateArgs) {
    logging::init_tracing(false);

    let (config_path, cfg) = load_run_config(&args.config);
    let history_path = resolve_history_path(&args.history, &cfg, &config_path);
    let roster_path = resolve_roster_path(&args.roster, &cfg, &config_path);
    let roster = roster::load_roster(&roster_path).unwrap_or_else(|e| bail(e));
    let rater = roster.member_id(&args.rater).unwrap_or_else(|e| bail(e));

    let mut entries = history::load_history(&history_path).unwrap_or_else(|e| bail(e));
    rate_entry(&mut entries, args.entry, rater, args.score, Utc::now()).unwrap_or_else(|e| bail(e));
    history::save_history(&history_path, &entries).unwrap_or_else(|e| bail(e));

    if let Some(entry) = entries.iter().find(|e| e.id == args.entry) {
        let average = entry.average_rating().unwrap_or(args.score);
        println!(
            "{} rated {} a {}. Average now {average:.1} from {} rating(s)",
            args.rater,
            roster.record_label(entry.chosen_item),
            args.score,
            entry.ratings.len(),
        );
    }
}
