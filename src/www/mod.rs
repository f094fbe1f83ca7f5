//! # Web Server Implementation
//!
//! The dashboard server renders the trace leaderboard from the most recent
//! snapshot of the team database.
//!
//! ## Submodules
//! - `handlers`: Actix request handlers for the dashboard routes.
//! - `table`: Turns a leaderboard into a merged HTML table.
//! - `utils`: Formatting helpers for the UI.

use crate::client;
use crate::reference::ReferenceTable;
use crate::snapshot::{Board, Snapshot};
use anyhow::Result;
use std::sync::Arc;

/// Request handlers for the web server's routes.
pub mod handlers;
/// HTML table rendering of a leaderboard.
pub mod table;
/// Utility functions for the web server.
pub mod utils;

/// State shared by all workers of the server.
pub struct AppState {
    pub board: Board,
    pub reference: ReferenceTable,
    pub data_url: String,
}

impl AppState {
    pub fn new(data_url: String, reference: ReferenceTable) -> Self {
        AppState {
            board: Board::new(),
            reference,
            data_url,
        }
    }

    /// Fetches the data endpoint and publishes the result unless a newer one already landed.
    pub async fn refresh(&self) -> Result<Option<Arc<Snapshot>>> {
        self.board
            .refresh(client::fetch_dataset(&self.data_url), &self.reference)
            .await
    }

    /// The published snapshot, fetching one first if nothing has been published yet.
    pub async fn snapshot(&self) -> Result<Arc<Snapshot>> {
        self.board
            .current_or_refresh(client::fetch_dataset(&self.data_url), &self.reference)
            .await
    }
}
