use clap::Parser;
use showfinder::config::DEFAULT_BASE_URL;
use showfinder::session::USAGE;
use showfinder::{Config, EpisodePanelMode, ShowFinderError, UiEvent, open_terminal_session, run_session};
use std::io;
use std::process;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

/// Search TV shows on TVMaze and list their episodes.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Search term to submit right away
    term: Option<String>,

    /// Base URL of the TVMaze API
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Keep earlier episode listings in the panel instead of replacing them
    #[arg(long)]
    accumulate_episodes: bool,

    /// Log filter, e.g. "warn", "info" or "showfinder=debug"
    #[arg(long, default_value = "warn")]
    log_level: String,
}

impl Args {
    fn config(&self) -> Config {
        Config {
            base_url: self.base_url.clone(),
            episode_panel_mode: if self.accumulate_episodes {
                EpisodePanelMode::Accumulate
            } else {
                EpisodePanelMode::Replace
            },
            ..Config::default()
        }
    }
}

async fn run(args: Args) -> Result<(), ShowFinderError> {
    let session = open_terminal_session(&args.config())?;

    println!("showfinder - TV show search powered by TVMaze");
    println!("{}", USAGE);

    if let Some(term) = args.term {
        session.bus.emit(&UiEvent::SearchSubmitted { term });
    }

    let stdin = BufReader::new(tokio::io::stdin());
    run_session(stdin, io::stdout(), &session.bus, &session.controller).await?;

    session.subscription.dispose();
    Ok(())
}

fn main() {
    let args = Args::parse();

    // Logs go to stderr so they never interleave with the rendered lists
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&args.log_level))
        .with_writer(io::stderr)
        .init();

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: Failed to start runtime: {}", e);
            process::exit(1);
        }
    };

    // Pipelines share the UI surfaces, so everything stays on this one thread
    let local = tokio::task::LocalSet::new();
    if let Err(e) = local.block_on(&runtime, run(args)) {
        eprintln!("\nError: {}", e);
        process::exit(1);
    }
}
