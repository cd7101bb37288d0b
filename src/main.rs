//! Binary entrypoint for the Hunter System CLI.
//!
//! Commands:
//! - `init` - write a starter `hunter.toml` and create the database
//! - `status` / `quests` / `shadows` - print the current state
//! - `gain`, `complete`, `progress`, `add-quest`, `edit-quest`, `reset-daily`,
//!   `extract`, `arise`, `clear-gate` - one-shot operations, persisted on exit
//! - `run` - interactive session with hourly reset checks and delayed extractions
//!
//! See the library crate docs for module-level details: `hunter_system::`.
use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use log::{info, warn};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use hunter_system::config::Config;
use hunter_system::hunter::{
    parse_command, spawn_service, CommandOutcome, ExerciseType, HunterCommand, HunterService,
    HunterStoreBuilder, NewQuest, ProgressionEngine, Rank, Reward, SessionCommand, SledAdapter,
    HELP_TEXT,
};

#[derive(Parser)]
#[command(name = "hunter")]
#[command(about = "Gamified training tracker: quests, levels, ranks and a shadow army")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "hunter.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration and create the database
    Init,
    /// Show level, rank, gold and army totals
    Status,
    /// List quests
    Quests,
    /// List the shadow army
    Shadows,
    /// Add experience points
    Gain { amount: u64 },
    /// Complete a quest and collect its reward
    Complete { quest_id: String },
    /// Record progress on a quest (100 completes it)
    Progress {
        quest_id: String,
        #[arg(value_parser = clap::value_parser!(u8).range(0..=100))]
        percent: u8,
    },
    /// Add a custom quest
    AddQuest {
        title: String,
        #[arg(short, long, default_value = "")]
        description: String,
        /// Difficulty rank (E, D, C, B, A, S)
        #[arg(short, long, default_value = "E")]
        rank: Rank,
        #[arg(long, default_value_t = 50)]
        exp: u64,
        #[arg(long)]
        gold: Option<u64>,
        /// Reset the quest every day
        #[arg(long)]
        daily: bool,
        /// pushups, situps, squats, running, plank or cardio
        #[arg(long)]
        exercise: Option<ExerciseType>,
    },
    /// Change the title and description of a custom quest
    EditQuest {
        quest_id: String,
        title: String,
        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// Reset daily quests now
    ResetDaily,
    /// Extract a shadow of the given type
    Extract { shadow_type: String },
    /// Arise shadows by id, or every dormant shadow with --all
    Arise {
        #[arg(required_unless_present = "all")]
        ids: Vec<String>,
        #[arg(long, conflicts_with = "ids")]
        all: bool,
    },
    /// Claim the reward for a cleared gate
    ClearGate {
        #[arg(long)]
        exp: u64,
        #[arg(long)]
        gold: Option<u64>,
        /// Reward item (repeatable)
        #[arg(long = "item")]
        items: Vec<String>,
    },
    /// Interactive session
    Run,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Init = cli.command {
        init_logging(&None, cli.verbose);
        return init(&cli.config).await;
    }

    let defaulted = tokio::fs::metadata(&cli.config).await.is_err();
    let config = if defaulted {
        Config::default()
    } else {
        Config::load(&cli.config).await?
    };
    init_logging(&Some(config.clone()), cli.verbose);
    if defaulted {
        warn!(
            "No configuration at {}; using defaults (run `hunter init` to create one)",
            cli.config
        );
    }

    let service = open_service(&config)?;
    match into_hunter_command(cli.command) {
        Some(command) => run_once(service, command),
        None => run_session(service, &config).await,
    }
}

/// Map a one-shot subcommand onto the service; `None` for `init` and `run`.
fn into_hunter_command(command: Commands) -> Option<HunterCommand> {
    let command = match command {
        Commands::Init | Commands::Run => return None,
        Commands::Status => HunterCommand::Status,
        Commands::Quests => HunterCommand::ListQuests,
        Commands::Shadows => HunterCommand::ListShadows,
        Commands::Gain { amount } => HunterCommand::GainExperience(amount),
        Commands::Complete { quest_id } => HunterCommand::CompleteQuest(quest_id),
        Commands::Progress { quest_id, percent } => {
            HunterCommand::UpdateProgress { quest_id, percent }
        }
        Commands::AddQuest {
            title,
            description,
            rank,
            exp,
            gold,
            daily,
            exercise,
        } => {
            let mut quest = NewQuest::new(&title, &description, rank, exp);
            quest.reward_gold = gold;
            quest.is_daily = daily;
            quest.exercise_type = exercise;
            HunterCommand::AddQuest(quest)
        }
        Commands::EditQuest {
            quest_id,
            title,
            description,
        } => HunterCommand::EditQuest {
            quest_id,
            title,
            description,
        },
        Commands::ResetDaily => HunterCommand::ResetDaily,
        Commands::Extract { shadow_type } => HunterCommand::Extract(shadow_type),
        Commands::Arise { all: true, .. } => HunterCommand::AriseAll,
        Commands::Arise { mut ids, .. } if ids.len() == 1 => {
            HunterCommand::Arise(ids.remove(0))
        }
        Commands::Arise { ids, .. } => HunterCommand::AriseMany(ids),
        Commands::ClearGate { exp, gold, items } => HunterCommand::GrantReward(Reward {
            exp,
            gold,
            items,
        }),
    };
    Some(command)
}

fn run_once(mut service: HunterService<SledAdapter>, command: HunterCommand) -> Result<()> {
    let outcome = service
        .execute(command)
        .map_err(|e| anyhow!("{}", e))?;
    print_outcome(&outcome);
    // No animation to wait for in one-shot mode
    let flushed = service
        .flush_pending_extractions()
        .map_err(|e| anyhow!("Failed to complete extractions: {}", e))?;
    print_outcome(&flushed);
    Ok(())
}

async fn init(path: &str) -> Result<()> {
    if tokio::fs::metadata(path).await.is_ok() {
        println!("Configuration already exists at {}", path);
    } else {
        Config::create_default(path).await?;
        println!("Created default configuration at {}", path);
    }
    let config = Config::load(path).await?;
    tokio::fs::create_dir_all(&config.storage.data_dir)
        .await
        .map_err(|e| anyhow!("Failed to create data dir {}: {}", config.storage.data_dir, e))?;
    let service = open_service(&config)?;
    println!(
        "Hunter database ready at {} ({} quests)",
        config.storage.database_path(),
        service.engine().quests().len()
    );
    Ok(())
}

fn open_service(config: &Config) -> Result<HunterService<SledAdapter>> {
    let db_path = config.storage.database_path();
    let store = HunterStoreBuilder::new(&db_path)
        .open()
        .map_err(|e| anyhow!("Failed to open hunter database {}: {}", db_path, e))?;
    let builder = ProgressionEngine::builder()
        .config(config.progression.clone())
        .reset_offset(config.schedule.reset_offset());
    HunterService::open(store, builder).map_err(|e| anyhow!("Failed to load hunter state: {}", e))
}

fn print_outcome(outcome: &CommandOutcome) {
    for line in &outcome.lines {
        println!("{}", line);
    }
    for event in &outcome.events {
        println!("** {}", event.describe());
    }
}

async fn run_session(service: HunterService<SledAdapter>, config: &Config) -> Result<()> {
    info!(
        "Starting Hunter System v{} for {}",
        env!("CARGO_PKG_VERSION"),
        config.hunter.name
    );
    let (notify_tx, mut notify_rx) = mpsc::unbounded_channel();
    let (handle, task) = spawn_service(service, config.schedule.reset_check_interval(), notify_tx);

    let printer = tokio::spawn(async move {
        while let Some(event) = notify_rx.recv().await {
            println!("** {}", event.describe());
        }
    });

    println!("Welcome, {}. Type HELP for commands.", config.hunter.name);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            SessionCommand::Quit => break,
            SessionCommand::Help => println!("{}", HELP_TEXT),
            SessionCommand::Invalid(message) => println!("{}", message),
            SessionCommand::Hunter(command) => match handle.execute(command).await {
                Ok(outcome) => print_outcome(&outcome),
                Err(e) => println!("{}", e),
            },
        }
    }

    handle.shutdown().await;
    task.await
        .map_err(|e| anyhow!("Hunter service task failed: {}", e))?;
    printer
        .await
        .map_err(|e| anyhow!("Notification task failed: {}", e))?;
    info!("Session ended");
    Ok(())
}

fn init_logging(config: &Option<Config>, verbosity: u8) {
    use std::io::Write;
    let mut builder = env_logger::Builder::new();
    // CLI verbosity overrides the configured level
    let base_level = match verbosity {
        0 => config
            .as_ref()
            .and_then(|cfg| cfg.logging.level.parse::<log::LevelFilter>().ok())
            .unwrap_or(log::LevelFilter::Info),
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);

    let log_file = config
        .as_ref()
        .and_then(|cfg| cfg.logging.file.as_ref())
        .and_then(|file| {
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(file)
                .ok()
        });

    if let Some(f) = log_file {
        let write_mutex = std::sync::Arc::new(std::sync::Mutex::new(f));
        // Echo to the console only when attached to a terminal
        let is_tty = atty::is(atty::Stream::Stderr);
        builder.format(move |fmt, record| {
            let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
            let line = format!("{} [{}] {}", ts, record.level(), record.args());
            if let Ok(mut guard) = write_mutex.lock() {
                let _ = writeln!(guard, "{}", line);
            }
            if is_tty {
                writeln!(fmt, "{}", line)
            } else {
                Ok(())
            }
        });
    } else {
        builder.format(|fmt, record| {
            let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
            writeln!(fmt, "{} [{}] {}", ts, record.level(), record.args())
        });
    }
    let _ = builder.try_init();
}
