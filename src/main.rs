mod app;
mod catalog;
mod config;
mod input;
mod lyrics;
mod player;
mod playlist;
mod tui;

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::Path;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "deezy", version, about = "Deezer preview player with lyrics and a local playlist")]
struct Cli {
    /// Override config file path.
    #[arg(long)]
    config: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the interactive TUI (default).
    Tui,
    /// Search the catalog and print the hits (headless).
    Search { query: String },
    /// Look up lyrics for a track and print them (headless).
    Lyrics { artist: String, title: String },
    /// Print the configured local playlist (headless).
    Playlist,

    /// Audio output device management (mpv).
    Audio {
        #[command(subcommand)]
        cmd: AudioCommand,
    },
}

#[derive(Debug, Subcommand)]
enum AudioCommand {
    /// List mpv audio devices.
    List,
    /// Set mpv audio device (name as shown in list).
    Set { device: String },
    /// Clear mpv audio device override.
    Clear,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load(cli.config.as_deref()).context("load config")?;
    let command = cli.command.unwrap_or(Command::Tui);

    match command {
        Command::Tui => {
            // The terminal belongs to the UI, so logs go to a file.
            init_file_logging(&cfg.paths.data_dir)?;
            let mut app = app::App::new(cfg.clone())?;
            let mut terminal = tui::TerminalGuard::enter(cfg.input.mouse).context("init terminal")?;
            app.run(terminal.terminal_mut()).await?;
        }
        Command::Search { query } => {
            init_stderr_logging();
            let client = catalog::CatalogClient::new(&cfg.catalog)?;
            match catalog::SearchOutcome::from_result(client.search(&query).await) {
                catalog::SearchOutcome::Results(tracks) => print_tracks(&tracks),
                catalog::SearchOutcome::NoResults => println!("No results found"),
                catalog::SearchOutcome::Failed(msg) => anyhow::bail!("search failed: {msg}"),
            }
        }
        Command::Lyrics { artist, title } => {
            init_stderr_logging();
            let client = catalog::CatalogClient::new(&cfg.catalog)?;
            match lyrics::resolve_lyrics(&client, &artist, &title).await {
                lyrics::LyricsOutcome::Found(text) => println!("{text}"),
                other => println!("{}", other.notice().unwrap_or_default()),
            }
        }
        Command::Playlist => {
            init_stderr_logging();
            let path = cfg.playlist_path();
            let list = playlist::Playlist::new(playlist::load_songs(&path)?);
            if list.is_empty() {
                println!("Playlist is empty");
            }
            for (i, s) in list.songs().iter().enumerate() {
                let lyrics = if s.lyrics.is_some() { "  [lyrics]" } else { "" };
                println!("{:02}. {} - {}{}  ({})", i + 1, s.display_name, s.artist, lyrics, s.path);
            }
        }
        Command::Audio { cmd } => {
            init_stderr_logging();
            match cmd {
                AudioCommand::List => {
                    let devices = player::mpv::list_audio_devices().await?;
                    for d in devices {
                        let marker = if cfg.player.audio_device.as_deref() == Some(d.as_str()) {
                            "*"
                        } else {
                            " "
                        };
                        println!("{marker} {d}");
                    }
                }
                AudioCommand::Set { device } => {
                    let mut cfg = cfg;
                    cfg.player.audio_device = Some(device);
                    config::save(&cfg, cli.config.as_deref()).context("save config")?;
                    println!("Updated audio device in config.");
                }
                AudioCommand::Clear => {
                    let mut cfg = cfg;
                    cfg.player.audio_device = None;
                    config::save(&cfg, cli.config.as_deref()).context("save config")?;
                    println!("Cleared audio device override.");
                }
            }
        }
    }

    Ok(())
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();
}

fn init_file_logging(data_dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("create dir {}", data_dir.display()))?;
    let path = data_dir.join("deezy.log");
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(false)
        .with_level(true)
        .with_ansi(false)
        .with_writer(std::sync::Mutex::new(file))
        .init();
    Ok(())
}

fn print_tracks(tracks: &[catalog::TrackSummary]) {
    for (i, t) in tracks.iter().enumerate() {
        println!(
            "{:02}. {} - {}  (id={}, preview={})",
            i + 1,
            t.display_title(),
            t.artist_name,
            t.id,
            t.preview_url
        );
    }
}
