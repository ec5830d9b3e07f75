use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;
use riot_match_dataset::player_stats;
use riot_match_dataset::{RiotClient, RiotConfig, build_dataset, fetch_history, resolve_player};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "riot-match-dataset",
    about = "Build a match outcome dataset from the Riot Games API",
    version
)]
struct Cli {
    /// Regional route for account and match endpoints (e.g., americas)
    #[arg(long, global = true)]
    region: Option<String>,

    /// Platform route for summoner endpoints (e.g., na1)
    #[arg(long, global = true)]
    platform: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct RiotId {
    /// Riot game name (e.g., Summoner name)
    #[arg(long = "game-name")]
    game_name: String,

    /// Riot tag line (e.g., region tag)
    #[arg(long = "tag-line")]
    tag_line: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve a Riot ID to its PUUID and account id
    Puuid {
        #[command(flatten)]
        id: RiotId,
    },
    /// Print the most recent match ids of a player
    History {
        #[command(flatten)]
        id: RiotId,

        #[arg(long, default_value_t = 20)]
        count: usize,
    },
    /// Fetch a player's matches and write the feature table
    BuildDataset {
        #[command(flatten)]
        id: RiotId,

        #[arg(long, default_value_t = 1000)]
        count: usize,

        /// Output path; a .parquet extension writes Parquet, anything else CSV
        #[arg(long, default_value = "data/raw_matches.csv")]
        out: PathBuf,
    },
    /// Win rate, preferred role and champion win rate over recent matches
    PlayerStats {
        #[command(flatten)]
        id: RiotId,

        #[arg(long, default_value_t = 30)]
        count: usize,

        #[arg(long = "champion-id")]
        champion_id: Option<i64>,
    },
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    let config = RiotConfig::from_env()?
        .with_region(cli.region)
        .with_platform(cli.platform);
    let client = RiotClient::new(&config)?;

    match cli.command {
        Command::Puuid { id } => {
            let player = resolve_player(&client, &id.game_name, &id.tag_line)
                .with_context(|| format!("Error fetching PUUID for {}#{}", id.game_name, id.tag_line))?;
            println!("{}", player.puuid);
            if let Some(account_id) = player.account_id {
                println!("{}", account_id);
            }
        }
        Command::History { id, count } => {
            let player = resolve_player(&client, &id.game_name, &id.tag_line)?;
            for match_id in fetch_history(&client, &player.puuid, count)? {
                println!("{}", match_id);
            }
        }
        Command::BuildDataset { id, count, out } => {
            let player = resolve_player(&client, &id.game_name, &id.tag_line)?;
            info!(
                "Resolved {}#{} to {} (account {})",
                id.game_name,
                id.tag_line,
                player.puuid,
                player.account_id.as_deref().unwrap_or("unknown")
            );

            let match_ids = fetch_history(&client, &player.puuid, count)?;
            info!("Fetched {} match ids", match_ids.len());

            let report = build_dataset(&client, &match_ids, &out)?;
            println!(
                "Saved {} matches to {} ({} skipped, {} columns)",
                report.rows_written,
                report.destination.display(),
                report.failures.len(),
                report.columns.len()
            );
        }
        Command::PlayerStats {
            id,
            count,
            champion_id,
        } => {
            let player = resolve_player(&client, &id.game_name, &id.tag_line)?;
            let match_ids = fetch_history(&client, &player.puuid, count)?;
            let summary = player_stats::summarize(&client, &player.puuid, &match_ids, champion_id)?;

            println!("Matches: {}", summary.matches);
            println!("Win rate: {:.3}", summary.win_rate);
            println!("Preferred role: {}", summary.preferred_role);
            if let Some((champion, rate)) = summary.champion_win_rate {
                println!("Champion {} win rate: {:.3}", champion, rate);
            }
        }
    }

    Ok(())
}
