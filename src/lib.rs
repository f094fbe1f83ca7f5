// # Leaderboard: The Main Library for the ICFP 2018 Dashboard
//
// This crate turns the trace table exported by the team database into a scored,
// grouped leaderboard and renders it as an HTML table.
//
// The pipeline is `record` (bind column names to rows) -> `dataset` (typed
// submissions) -> `leaderboard` (groups, bests, baselines) -> `score`
// (normalized scores and total). `merge` is independent of all of them and
// collapses identical adjacent cells of a rendered grid.
//
// Network access (`reqwest`) and the web server (`tokio`, `actix-web`) sit behind
// feature flags so the core can be used on its own.

/// HTTP client shared by the fetcher. Enabled with the `reqwest` feature.
#[cfg(feature = "reqwest")]
pub mod client;

/// WWW server implementation. Enabled with `tokio`, `reqwest` and `actix-web` features.
#[cfg(feature = "tokio")]
#[cfg(feature = "reqwest")]
#[cfg(feature = "actix-web")]
pub mod www;

/// Environment-driven configuration shared by the binaries.
pub mod config;

/// Binding of column names to positional rows.
pub mod record;

/// The `{columns, data}` document and typed submissions built from it.
pub mod dataset;

/// Grouping of submissions by problem, best and baseline detection.
pub mod leaderboard;

/// Normalized scores relative to the baseline and the known best energy.
pub mod score;

/// Known-best energies per problem name.
pub mod reference;

/// Merging of identical adjacent cells in a rendered grid.
pub mod merge;

/// Last-fetch-wins holder of the published leaderboard snapshot.
pub mod snapshot;

/// A trait for conveniently updating a value to its minimum or maximum.
pub trait SetMinMax {
    /// If `v` is less than `self`, updates `self` to `v` and returns `true`.
    /// Otherwise, returns `false`.
    fn setmin(&mut self, v: Self) -> bool;
    /// If `v` is greater than `self`, updates `self` to `v` and returns `true`.
    /// Otherwise, returns `false`.
    fn setmax(&mut self, v: Self) -> bool;
}
impl<T> SetMinMax for T
where
    T: PartialOrd,
{
    fn setmin(&mut self, v: T) -> bool {
        *self > v && {
            *self = v;
            true
        }
    }
    fn setmax(&mut self, v: T) -> bool {
        *self < v && {
            *self = v;
            true
        }
    }
}

/// Installs the `tracing` subscriber used by the binaries.
///
/// The filter is taken from `RUST_LOG` and defaults to `info`.
pub fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
