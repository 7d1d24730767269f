use std::sync::Arc;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use sporadio::{
    cli, config, error,
    types::{OccupancySource, PkceToken},
};
use tokio::sync::Mutex;

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with Spotify API
    Auth,

    /// Scrape the stations and add new songs to playlists
    Sync(SyncOptions),

    /// Show what the stations played recently
    Scrape(ScrapeOptions),

    /// Show how full the managed playlists are
    Playlists(PlaylistsOptions),

    /// Inspect the track cache
    Cache(CacheOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct SyncOptions {
    /// Print the allocation without creating or modifying playlists
    #[clap(long)]
    pub dry_run: bool,

    /// Where to read playlist fill levels from
    #[clap(long, value_enum, default_value = "remote")]
    pub occupancy: OccupancySource,
}

#[derive(Parser, Debug, Clone)]
pub struct ScrapeOptions {
    /// Only scrape this station
    #[clap(long)]
    pub station: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct PlaylistsOptions {
    /// Where to read playlist fill levels from
    #[clap(long, value_enum, default_value = "remote")]
    pub occupancy: OccupancySource,
}

#[derive(Parser, Debug, Clone)]
pub struct CacheOptions {
    /// Filter by artist (case and accent insensitive)
    #[clap(long)]
    pub artist: Option<String>,

    /// Filter by title (case and accent insensitive)
    #[clap(long)]
    pub title: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Auth => {
            let oauth_result: Arc<Mutex<Option<PkceToken>>> = Arc::new(Mutex::new(None));
            cli::auth(Arc::clone(&oauth_result)).await;
        }
        Command::Sync(opt) => cli::sync(opt.dry_run, opt.occupancy).await,
        Command::Scrape(opt) => cli::scrape(opt.station).await,
        Command::Playlists(opt) => cli::playlists(opt.occupancy).await,
        Command::Cache(opt) => cli::cache(opt.artist, opt.title).await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
