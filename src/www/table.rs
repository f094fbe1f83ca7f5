//! # Leaderboard Table
//!
//! Renders one row per trace. Problem-level columns repeat the same markup on
//! every row of a problem so that they can be spanned; the problem invocation,
//! link, name and stats are spanned over the group by its `lookahead`, and the
//! trace invocation column is collapsed wherever consecutive rows came from the
//! same run.

use crate::dataset::Submission;
use crate::leaderboard::{Entry, Leaderboard};
use crate::merge::{Grid, MergeSpan};
use crate::www::handlers::template::escape_html;
use crate::www::utils::render_timestamp;
use chrono::{DateTime, Utc};
use itertools::Itertools;
use serde_json::Value;
use std::fmt::Write;

pub const HEADERS: &[&str] = &[
    "Invocation",
    "Problem",
    "Name",
    "Stats",
    "Trace",
    "Status",
    "Energy",
    "Scent",
    "Score",
    "Trace invocation",
    "Time",
    "Age",
];

/// Columns spanned over each problem group.
pub const GROUP_COLUMNS: &[usize] = &[0, 1, 2, 3];

/// Column groups collapsed by content.
pub fn merged_columns() -> Vec<Vec<usize>> {
    vec![vec![9]]
}

/// A rendered `<td>`. Only `html` takes part in merging.
#[derive(Debug, Clone, PartialEq)]
pub struct Td {
    pub html: String,
    pub bold: bool,
    pub first: bool,
}

fn linkify(kind: &str, id: i64) -> String {
    format!("<a href=\"/{kind}/{id}\">/{kind}/{id}</a>")
}

fn render_stats(stats: &serde_json::Map<String, Value>) -> String {
    stats
        .iter()
        .map(|(k, v)| match v {
            Value::String(s) => format!("{}: {}", k, s),
            _ => format!("{}: {}", k, v),
        })
        .join(", ")
}

fn problem_link(s: &Submission) -> String {
    let mut html = linkify("problem", s.id);
    for (present, which) in [(s.has_src, "src"), (s.has_tgt, "tgt")] {
        if present {
            let _ = write!(
                html,
                " (<a href=\"/vis_model/{}?which={which}\">vis {which}</a>)",
                s.id
            );
        }
    }
    html
}

fn trace_link(s: &Submission) -> String {
    match s.trace_id {
        Some(t) if s.has_data => {
            format!("{} (<a href=\"/vis_trace/{t}\">vis</a>)", linkify("trace", t))
        }
        Some(t) => linkify("trace", t),
        None => String::new(),
    }
}

/// The cells of one row, in `HEADERS` order.
pub fn render_row(entry: &Entry, now: DateTime<Utc>) -> Vec<Td> {
    let s = &entry.submission;
    let opt = |v: Option<i64>| v.map(|v| v.to_string()).unwrap_or_default();
    let text = |v: Option<&str>| escape_html(v.unwrap_or_default());
    let cells = [
        (s.prob_inv_id.map(|i| linkify("inv", i)).unwrap_or_default(), false),
        (problem_link(s), false),
        (escape_html(&s.name), false),
        (escape_html(&render_stats(&s.stats)), false),
        (trace_link(s), false),
        (text(s.status.as_deref()), entry.is_best),
        (opt(s.energy), entry.is_best),
        (text(s.scent.as_deref()), entry.is_best),
        (opt(entry.score), false),
        (s.trace_inv_id.map(|i| linkify("inv", i)).unwrap_or_default(), false),
        (
            s.trace_id
                .map(|_| {
                    format!(
                        "{}s+{}s",
                        s.timing.solver_time as i64, s.timing.pyjs_time as i64
                    )
                })
                .unwrap_or_default(),
            false,
        ),
        (
            s.timestamp
                .map(|t| escape_html(&render_timestamp(t, now)))
                .unwrap_or_default(),
            false,
        ),
    ];
    cells
        .into_iter()
        .map(|(html, bold)| Td {
            html,
            bold,
            first: entry.first,
        })
        .collect()
}

/// Spans covering each problem group in `GROUP_COLUMNS`.
pub fn group_spans(board: &Leaderboard) -> Vec<MergeSpan> {
    board
        .rows
        .iter()
        .enumerate()
        .filter_map(|(i, e)| e.lookahead.filter(|&n| n >= 2).map(|n| (i, n)))
        .flat_map(|(start, n)| {
            GROUP_COLUMNS.iter().map(move |&column| MergeSpan {
                column,
                start,
                end: start + n,
            })
        })
        .collect()
}

/// Renders the rows and applies group spans and content merges.
pub fn build_grid(board: &Leaderboard, now: DateTime<Utc>) -> Grid<Td> {
    let mut grid = Grid::new(board.rows.iter().map(|e| render_row(e, now)).collect());
    grid.apply(&group_spans(board));
    let spans = grid.find_spans_by(&merged_columns(), |td| td.html.as_str());
    grid.apply(&spans);
    grid
}

/// Renders the complete `<table>`.
pub fn render_table(board: &Leaderboard, now: DateTime<Utc>) -> String {
    let grid = build_grid(board, now);
    let mut w = String::new();
    w.push_str("<table class=\"leaderboard\" style=\"border-collapse:collapse;font-size:13px;\">\n<thead><tr>");
    for h in HEADERS {
        let _ = write!(w, "<th>{}</th>", h);
    }
    w.push_str("</tr></thead>\n<tbody>\n");
    for row in grid.rows() {
        w.push_str("<tr>");
        for cell in row.iter().flatten() {
            let td = &cell.content;
            let mut style = String::new();
            if td.bold {
                style.push_str("font-weight: bold;");
            }
            if td.first {
                style.push_str("border-top: 2px solid #aaa;");
            }
            let _ = write!(
                w,
                "<td rowspan={} style=\"{}\">{}</td>",
                cell.rowspan, style, td.html
            );
        }
        w.push_str("</tr>\n");
    }
    w.push_str("</tbody>\n</table>");
    w
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::tests::dataset;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2018, 7, 23, 0, 0, 0).unwrap()
    }

    fn board() -> Leaderboard {
        let mut ds = dataset(&[
            (1, "LA001", 20, 10, "their default", "DONE", Some(1000)),
            (1, "LA001", 20, 11, "bfs <v2>", "DONE", Some(400)),
            (1, "LA001", 20, 12, "bfs", "FAIL", None),
            (2, "LA002", 8, 13, "bfs", "DONE", Some(50)),
        ]);
        ds.columns.push("prob_inv_id".into());
        ds.columns.push("trace_inv_id".into());
        for (row, (p, t)) in ds.data.iter_mut().zip([(5, 7), (5, 7), (5, 8), (6, 8)]) {
            row.push(p.into());
            row.push(t.into());
        }
        let mut b = Leaderboard::aggregate(ds.submissions().unwrap()).unwrap();
        b.apply_scores(&crate::reference::ReferenceTable::from_pairs([("la001", 400)]));
        b
    }

    #[test]
    fn row_cells_follow_headers() {
        let b = board();
        let cells = render_row(&b.rows[1], now());
        assert_eq!(cells.len(), HEADERS.len());
        assert_eq!(cells[0].html, "<a href=\"/inv/5\">/inv/5</a>");
        assert_eq!(cells[1].html, "<a href=\"/problem/1\">/problem/1</a>");
        assert_eq!(cells[3].html, "R: 20");
        assert_eq!(cells[4].html, "<a href=\"/trace/11\">/trace/11</a>");
        assert_eq!(cells[6].html, "400");
        assert_eq!(cells[7].html, "bfs &lt;v2&gt;");
        assert_eq!(cells[8].html, "4000");
        assert_eq!(cells[10].html, "0s+0s");
        assert!(cells[5].bold && cells[6].bold && cells[7].bold);
        assert!(!cells[4].bold);
        assert!(!cells[0].first);
        assert!(render_row(&b.rows[0], now())[0].first);
    }

    #[test]
    fn problem_columns_agree_with_lookahead() {
        let b = board();
        let grid = Grid::new(b.rows.iter().map(|e| render_row(e, now())).collect());
        let groups: Vec<Vec<usize>> = GROUP_COLUMNS.iter().map(|&c| vec![c]).collect();
        let mut by_content = grid.find_spans_by(&groups, |td| td.html.as_str());
        let mut by_lookahead = group_spans(&b);
        by_content.sort_by_key(|s| (s.column, s.start));
        by_lookahead.sort_by_key(|s| (s.column, s.start));
        assert_eq!(by_content, by_lookahead);
    }

    #[test]
    fn grid_spans_groups_and_invocations() {
        let g = build_grid(&board(), now());
        let span = |r: usize, c: usize| g.cell(r, c).map(|cell| cell.rowspan);
        // Problem name spans LA001's three rows.
        assert_eq!(
            (0..4).map(|r| span(r, 2)).collect::<Vec<_>>(),
            vec![Some(3), None, None, Some(1)]
        );
        // The problem invocation stays within its group even if the next one matches.
        assert_eq!(span(0, 0), Some(3));
        assert_eq!(span(3, 0), Some(1));
        // Trace invocations 7 and 8 each cover two rows, across the group boundary.
        assert_eq!(
            (0..4).map(|r| span(r, 9)).collect::<Vec<_>>(),
            vec![Some(2), None, Some(2), None]
        );
        // Per-trace columns are never merged.
        assert!((0..4).all(|r| span(r, 4) == Some(1)));
    }

    #[test]
    fn problem_invocation_does_not_cross_groups() {
        let mut b = board();
        for e in b.rows.iter_mut() {
            e.submission.prob_inv_id = Some(5);
        }
        let g = build_grid(&b, now());
        assert_eq!(g.cell(0, 0).map(|c| c.rowspan), Some(3));
        assert_eq!(g.cell(3, 0).map(|c| c.rowspan), Some(1));
        let html = render_table(&b, now());
        assert!(html.contains(
            "<td rowspan=1 style=\"border-top: 2px solid #aaa;\"><a href=\"/inv/5\">/inv/5</a></td>"
        ));
    }

    #[test]
    fn table_markup() {
        let html = render_table(&board(), now());
        assert!(html.starts_with("<table"));
        assert_eq!(html.matches("<tr>").count(), 5);
        assert!(html.contains(
            "<td rowspan=3 style=\"border-top: 2px solid #aaa;\">LA001</td>"
        ));
        assert!(html.contains("<td rowspan=1 style=\"font-weight: bold;\">400</td>"));
    }
}
