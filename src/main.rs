use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use survoice::{
    load_or_seed_catalog, parse_chatlog_file, reconstruct_qa_pairs, run_analysis, serve,
    AnalysisConfig, AppState, ChatClient, ChatConfig, MemorySessionStore, PermissionConfig,
    ReconstructConfig, SpeechClient, SpeechConfig,
};

#[derive(Parser)]
#[command(name = "survoice")]
#[command(author, version, about = "Hospital survey voice assistant and response analyzer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the live survey dialogue service
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1:5000")]
        bind: SocketAddr,

        /// Survey module catalog file
        #[arg(long, default_value = "modules.json")]
        modules: PathBuf,

        /// Directory for per-session chat logs
        #[arg(long, default_value = "logs")]
        logs_dir: PathBuf,

        /// Directory for synthesized audio files
        #[arg(long, default_value = "static/audio")]
        audio_cache: PathBuf,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Analyze a recorded chat log and append scored rows to the result table
    Analyze {
        /// Input chat log (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// CSV file to append results to
        #[arg(short, long, default_value = "survey_results.csv")]
        out: PathBuf,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Reconstruct question/answer pairs from a chat log without calling the model
    Pairs {
        /// Input chat log (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            bind,
            modules,
            logs_dir,
            audio_cache,
            verbose,
        } => {
            setup_logging(verbose);
            run_server(bind, modules, logs_dir, audio_cache).await
        }
        Commands::Analyze {
            input,
            out,
            verbose,
        } => {
            setup_logging(verbose);
            analyze_chatlog(input, out).await
        }
        Commands::Pairs { input, verbose } => {
            setup_logging(verbose);
            print_pairs(input)
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

async fn run_server(
    bind: SocketAddr,
    modules: PathBuf,
    logs_dir: PathBuf,
    audio_cache: PathBuf,
) -> Result<()> {
    std::fs::create_dir_all(&logs_dir)
        .with_context(|| format!("Failed to create logs directory: {:?}", logs_dir))?;
    std::fs::create_dir_all(&audio_cache)
        .with_context(|| format!("Failed to create audio cache: {:?}", audio_cache))?;

    let catalog = load_or_seed_catalog(&modules).context("Failed to load module catalog")?;
    info!("Loaded {} survey modules from {:?}", catalog.modules.len(), modules);

    let speech_config = SpeechConfig::from_env()?;
    let state = Arc::new(AppState {
        sessions: Arc::new(MemorySessionStore::new()),
        catalog,
        speech: SpeechClient::new(speech_config, audio_cache.clone()),
        permission: PermissionConfig::default(),
        logs_dir,
        audio_cache,
    });

    serve(bind, state).await
}

async fn analyze_chatlog(input: PathBuf, out: PathBuf) -> Result<()> {
    info!("Analyzing chat log {:?}", input);

    let api_config = ChatConfig::from_env()?;
    let client = ChatClient::new(api_config);
    let config = AnalysisConfig::default();

    let rows = run_analysis(&client, &input, &out, &config).await?;
    info!("Saved {} row(s) to {:?}", rows.len(), out);

    Ok(())
}

fn print_pairs(input: PathBuf) -> Result<()> {
    let log = parse_chatlog_file(&input).context("Failed to parse chat log")?;
    let pairs = reconstruct_qa_pairs(&log, &ReconstructConfig::default());

    println!("Question/Answer Pairs");
    println!("=====================");
    for pair in &pairs {
        println!("[{}]", pair.module);
        println!("Q: {}", pair.question);
        println!("A: {}", pair.answer);
        println!();
    }
    println!("{} pair(s) reconstructed", pairs.len());

    Ok(())
}
