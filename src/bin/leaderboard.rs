use anyhow::Result;
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use icfpc2018::client;
use icfpc2018::dataset::Dataset;
use icfpc2018::leaderboard::Leaderboard;
use icfpc2018::reference::ReferenceTable;
use icfpc2018::snapshot;
use icfpc2018::www::table;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "leaderboard", about = "Render the trace leaderboard from the dashboard data")]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Args, Debug)]
struct Source {
    /// Endpoint serving the {columns, data} document
    #[arg(long, env = "LEADERBOARD_DATA_URL", conflicts_with = "file")]
    url: Option<String>,
    /// Saved copy of the document
    #[arg(long)]
    file: Option<PathBuf>,
    /// JSON file replacing the builtin best energies
    #[arg(long, env = "LEADERBOARD_REFERENCE")]
    reference: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the leaderboard table as HTML
    Html(Source),
    /// Print the annotated leaderboard as JSON
    Json(Source),
    /// Print one line per problem and the total score
    Summary(Source),
}

async fn load(source: &Source) -> Result<Leaderboard> {
    let reference = ReferenceTable::load(source.reference.as_deref())?;
    let dataset: Dataset = match (&source.url, &source.file) {
        (_, Some(path)) => client::read_dataset(path)?,
        (Some(url), None) => client::fetch_dataset(url).await?,
        (None, None) => anyhow::bail!("either --url or --file is required"),
    };
    tracing::info!(rows = dataset.len(), "loaded dataset");
    snapshot::build(dataset, &reference)
}

fn summary(board: &Leaderboard) -> String {
    let mut lines = vec![];
    for group in board.groups() {
        let s = &group[0].submission;
        let best = board.best(s.id);
        let best_score = group.iter().find(|e| e.is_best).and_then(|e| e.score);
        let show = |v: Option<i64>| v.map_or("-".to_string(), |v| v.to_string());
        lines.push(format!(
            "{:>6} {:<8} best={:<12} baseline={:<12} score={}",
            s.id,
            s.name,
            show(best.map(|b| b.energy)),
            show(board.baseline(s.id)),
            show(best_score),
        ));
    }
    lines.push(format!("total={}", board.total));
    lines.join("\n")
}

#[tokio::main]
async fn main() -> Result<()> {
    icfpc2018::init_logging();
    let cli = Cli::parse();
    match cli.cmd {
        Commands::Html(source) => {
            let board = load(&source).await?;
            println!("{}", table::render_table(&board, Utc::now()));
        }
        Commands::Json(source) => {
            let board = load(&source).await?;
            println!("{}", serde_json::to_string_pretty(&board)?);
        }
        Commands::Summary(source) => {
            let board = load(&source).await?;
            println!("{}", summary(&board));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_lists_problems_and_total() {
        let dataset = Dataset::from_json(
            r#"{
                "columns": ["id", "name", "stats", "trace_id", "scent", "status", "energy"],
                "data": [
                    [1, "LA001", {"R": 20}, 10, "their default", "DONE", 1000],
                    [1, "LA001", {"R": 20}, 11, "bfs", "DONE", 400],
                    [2, "LA002", {"R": 8}, null, null, null, null]
                ]
            }"#,
        )
        .unwrap();
        let board = snapshot::build(dataset, &ReferenceTable::from_pairs([("la001", 400)])).unwrap();
        let text = summary(&board);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("LA001"));
        assert!(lines[0].contains("best=400"));
        assert!(lines[0].contains("baseline=1000"));
        assert!(lines[0].ends_with("score=4000"));
        assert!(lines[1].contains("best=-"));
        assert!(lines[1].ends_with("score=-"));
        assert_eq!(lines[2], "total=4000");
    }
}
