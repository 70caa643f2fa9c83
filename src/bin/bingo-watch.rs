//! Terminal viewer printing every claim change of one board.
//!
//! Usage: `bingo-watch [board-id] [code]`. Both arguments fall back to the saved client
//! preferences and are written back once the board is found.

use std::{env, time::Duration};

use anyhow::{Context, bail};
use bingo_back::{
    claims::{ClaimStyle, ClaimantCode},
    client::{BoardView, ClaimSyncClient, ClientPrefs, DEFAULT_POLL_INTERVAL, HttpClaimSource, TileSurface},
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

const API_URL_ENV: &str = "BINGO_API_URL";
const DEFAULT_API_URL: &str = "http://localhost:8080";
const POLL_INTERVAL_ENV: &str = "BINGO_POLL_SECS";

/// Prints repaints as lines on stdout.
struct TerminalSurface;

impl TileSurface for TerminalSurface {
    fn repaint(&mut self, x: u32, y: u32, style: &ClaimStyle) {
        let css = style.to_css().unwrap_or_else(|| "unclaimed".into());
        println!("({x}, {y}) {css}");
    }

    fn set_hidden(&mut self, hidden: bool) {
        if hidden {
            println!("board hidden: the server sent an unexpected claim matrix");
        } else {
            println!("board visible again");
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let mut prefs = ClientPrefs::load();
    let mut args = env::args().skip(1);
    if let Some(board) = args.next() {
        prefs.board_id = Some(board.parse::<Uuid>().context("parsing board id")?);
    }
    if let Some(code) = args.next() {
        prefs.code = code.parse::<ClaimantCode>().context("parsing claimant code")?;
    }

    let api_url = env::var(API_URL_ENV).unwrap_or_else(|_| DEFAULT_API_URL.into());
    let source = HttpClaimSource::new(&api_url).context("building HTTP client")?;

    let board_id = match prefs.board_id {
        Some(id) => id,
        None => {
            let boards = source.list_boards().await.context("listing boards")?;
            let Some(first) = boards.first() else {
                bail!("no board on {api_url}; upload one first");
            };
            first.id
        }
    };

    let board = source.board(board_id).await.context("loading board metadata")?;
    prefs.board_id = Some(board.id);
    if let Err(err) = prefs.save() {
        warn!(error = %err, "could not save client preferences");
    }

    info!(
        board_id = %board.id,
        title = %board.title,
        width = board.width,
        height = board.height,
        code = %prefs.code,
        "watching board"
    );

    let poll_interval = env::var(POLL_INTERVAL_ENV)
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_POLL_INTERVAL);

    let view = BoardView::new(board.id, board.width, board.height);
    let client = ClaimSyncClient::new(source, view, TerminalSurface, prefs.code)
        .with_poll_interval(poll_interval);

    client
        .run(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await;

    Ok(())
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
