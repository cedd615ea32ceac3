use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod cache;
mod client;
mod config;
mod models;
mod report;
mod scoring;

use crate::cache::CatalogCache;
use crate::client::{SpotifyClient, authorize_url, fetch_session, generate_state};
use crate::config::load_config;
use crate::models::{SessionSnapshot, TrackInput};
use crate::report::SessionReport;
use crate::scoring::{
    CoolGenres, ReviewSession, ReviewStep, ScoredTrack, Scorer, SessionSummary, summarize,
};

#[derive(Parser)]
#[command(name = "spotijudge")]
#[command(about = "Judge how underground your top Spotify tracks are")]
#[command(version)]
struct Args {
    /// Print the Spotify login URL and exit
    #[arg(long = "login-url")]
    login_url: bool,

    /// Authorization code from the login callback
    #[arg(long = "code", conflicts_with_all = ["access_token", "input"])]
    code: Option<String>,

    /// Use an existing access token instead of exchanging a code
    #[arg(long = "access-token", conflicts_with = "input")]
    access_token: Option<String>,

    /// Score a saved session snapshot (JSON) without calling the API
    #[arg(short = 'i', long = "input")]
    input: Option<String>,

    /// JSON array of genre labels to use instead of the built-in cool genres
    #[arg(short = 'g', long = "genres")]
    genres: Option<String>,

    /// Catalog cache file, updated with every artist and track fetched
    #[arg(long = "cache", conflicts_with = "input")]
    cache: Option<String>,

    /// Write the session report as JSON to this file
    #[arg(short = 'o', long = "output")]
    output: Option<String>,

    /// Show the per-rule score breakdown for every track
    #[arg(short = 'd', long = "debug")]
    debug: bool,

    /// Quiet mode - only print the results
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,
}

fn init_tracing(quiet: bool) {
    let default_level = if quiet { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();
}

fn load_snapshot(args: &Args, cache: Option<&mut CatalogCache>) -> Result<SessionSnapshot> {
    if let Some(path) = &args.input {
        info!("Loading session snapshot from {path}");
        return SessionSnapshot::load_from_file(path)
            .with_context(|| format!("Failed to load session snapshot '{path}'"));
    }

    let client = if let Some(token) = &args.access_token {
        SpotifyClient::new(token.clone())
    } else if let Some(code) = &args.code {
        let config = load_config()?;
        SpotifyClient::exchange_code(&config, code).context("Failed to get access token")?
    } else {
        return Err(anyhow::anyhow!(
            "Nothing to score: pass --input, --access-token or --code (see --login-url)"
        ));
    };

    Ok(fetch_session(&client, cache)?)
}

fn print_review(
    scorer: &Scorer,
    review: &ReviewSession,
    tracks: &[TrackInput],
    scored: &[ScoredTrack],
    debug: bool,
) {
    let mut session = review.normalized(scored.len());
    loop {
        let Some(track) = session.current(scored) else {
            break;
        };
        let position = session.track_index;
        let score_display = match track.cool_score {
            Some(score) => format!("{score:.2}"),
            None => "unscored".to_string(),
        };
        let genres_display = if track.genres.is_empty() {
            "no genres".to_string()
        } else {
            track.genres.join(", ")
        };

        println!(
            "{:>2}. \"{}\" by {} [{}] | popularity {} | {}",
            position + 1,
            track.track_name,
            track.artist_name,
            score_display,
            track.track_popularity,
            genres_display
        );

        if debug {
            if let Some(breakdown) = tracks.get(position).and_then(|t| scorer.breakdown(t)) {
                println!(
                    "      genre +{} | explicit +{} | artist pop +{} | followers +{} | track pop +{} = {}",
                    breakdown.genre,
                    breakdown.explicit,
                    breakdown.artist_popularity,
                    breakdown.followers,
                    breakdown.track_popularity,
                    breakdown.raw_total()
                );
            }
        }

        let (next, step) = session.advance(scored.len());
        if step == ReviewStep::Results {
            break;
        }
        session = next;
    }
}

fn print_results(username: &str, summary: &SessionSummary) {
    println!("\n=== RESULTS FOR {} ===", username.to_uppercase());
    println!("Cool Score: {:.2}/100", summary.final_score);
    println!("{}", summary.commentary);
    println!(
        "Scored {} of {} tracks ({} without genre data)",
        summary.scored_count, summary.total_tracks, summary.unscored_count
    );

    println!();
    for (i, track) in summary.ordered_tracks.iter().enumerate() {
        let score_display = track
            .cool_score
            .map(|score| format!("{score:>6.2}"))
            .unwrap_or_else(|| "  --  ".to_string());
        println!(
            "{:>2}. {} \"{}\" by {}",
            i + 1,
            score_display,
            track.track_name,
            track.artist_name
        );
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.quiet);

    if args.login_url {
        let config = load_config()?;
        println!("{}", authorize_url(&config, &generate_state()));
        return Ok(());
    }

    let cool_genres = match &args.genres {
        Some(path) => CoolGenres::load_from_file(path)
            .with_context(|| format!("Failed to load genre list '{path}'"))?,
        None => CoolGenres::canonical(),
    };
    if cool_genres.is_empty() {
        warn!("Cool genre list is empty; no track will earn the genre bonus");
    }
    info!("Using {} cool genres", cool_genres.len());
    let scorer = Scorer::new(cool_genres);

    let mut cache = match &args.cache {
        Some(path) => Some(CatalogCache::load(Path::new(path))?),
        None => None,
    };

    let snapshot = load_snapshot(&args, cache.as_mut())?;
    if snapshot.tracks.is_empty() {
        warn!("No tracks to review");
    }

    let review = ReviewSession::start();
    info!("Starting review session {}", review.session_id);

    let scored = scorer.score_all(&snapshot.tracks);
    if !args.quiet {
        println!("Hey {}, here are your top tracks:\n", snapshot.username);
        print_review(&scorer, &review, &snapshot.tracks, &scored, args.debug);
    }

    let summary = summarize(&scored);
    print_results(&snapshot.username, &summary);

    if let Some(path) = &args.output {
        SessionReport::new(&snapshot, &review, &scored, summary).save(Path::new(path))?;
        info!("Wrote session report to {path}");
    }

    if let (Some(cache), Some(path)) = (&cache, &args.cache) {
        cache.save(Path::new(path))?;
        info!(
            "Catalog cache now holds {} artists and {} tracks",
            cache.artist_count(),
            cache.track_count()
        );
    }

    Ok(())
}
