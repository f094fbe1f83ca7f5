//! # Leaderboard Page Handlers
//!
//! Renders the published snapshot as an HTML page, exports it as JSON and
//! lets the team trigger a refresh. A background task keeps the snapshot fresh.

use crate::www::AppState;
use crate::www::handlers::template;
use crate::www::table;
use crate::www::utils::humanize_since;
use actix_web::{HttpResponse, Responder, http::header, web};
use anyhow::Result;
use chrono::Utc;
use itertools::Itertools;
use serde_json::json;
use std::time::{Duration, Instant};

/// The main handler for the leaderboard page.
pub async fn show(state: web::Data<AppState>) -> impl Responder {
    template::to_response(render_page(&state).await)
}

/// Builds the page title and contents from the current snapshot.
async fn render_page(state: &AppState) -> Result<(String, String)> {
    let mut timings = vec![];

    let t0 = Instant::now();
    let snapshot = state.snapshot().await?;
    timings.push(("snapshot", t0.elapsed().as_millis()));

    let now = Utc::now();
    let board = &snapshot.leaderboard;

    let t0 = Instant::now();
    let table_html = table::render_table(board, now);
    timings.push(("table", t0.elapsed().as_millis()));

    // Auto-refresh the page every five minutes.
    let auto_refresh = "<script>setTimeout(() => location.reload(), 5*60*1000);</script>";
    let contents = format!(
        r#"<h1>Leaderboard</h1>
{auto_refresh}
<p>Total score: <b>{total}</b> over {problems} problems ({rows} traces).
Fetched {ago}.
<form method="post" action="/refresh" style="display:inline"><button>Refresh</button></form></p>
{table_html}
<hr><div style="font:12px monospace;opacity:0.7;margin-top:8px;">timings: {timings}</div>"#,
        total = board.total,
        problems = board.groups().count(),
        rows = board.rows.len(),
        ago = humanize_since(snapshot.fetched_at, now),
        timings = timings
            .iter()
            .map(|(name, ms)| format!("{name}={ms}ms"))
            .join(", "),
    );
    Ok(("Leaderboard".to_string(), contents))
}

/// Exports the current snapshot, including the best trace per problem.
pub async fn json(state: web::Data<AppState>) -> impl Responder {
    match state.snapshot().await {
        Ok(s) => HttpResponse::Ok().json(json!({
            "token": s.token,
            "fetched_at": s.fetched_at.to_rfc3339(),
            "leaderboard": &s.leaderboard,
        })),
        Err(e) => template::to_error_response(&e),
    }
}

/// Fetches a new snapshot and redirects back to the leaderboard.
pub async fn refresh(state: web::Data<AppState>) -> impl Responder {
    match state.refresh().await {
        Ok(_) => HttpResponse::SeeOther()
            .append_header((header::LOCATION, "/leaderboard"))
            .finish(),
        Err(e) => template::to_error_response(&e),
    }
}

/// Refreshes the snapshot every `every` in the background.
pub fn spawn_refresher(state: web::Data<AppState>, every: Duration) {
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(every);
        loop {
            interval.tick().await;
            if let Err(e) = state.refresh().await {
                tracing::warn!("background refresh failed: {:#}", e);
            }
        }
    });
}
