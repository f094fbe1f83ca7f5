//! # Trace Table Document
//!
//! The dashboard endpoint answers with `{"columns": [...], "data": [[...], ...]}`:
//! one row per submitted trace, joined with the problem (model) it solves.
//! [`Dataset::submissions`] binds every row to the column list and extracts the
//! fields the leaderboard needs into a [`Submission`].

use crate::record::{MapError, Record, Schema};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Columns every dataset must carry.
pub const REQUIRED_COLUMNS: &[&str] = &[
    "id", "name", "stats", "trace_id", "scent", "status", "energy",
];

/// Status of a trace that finished running.
pub const STATUS_DONE: &str = "DONE";

/// Scent of the trace shipped by the organizers, which serves as the baseline.
pub const SCENT_DEFAULT: &str = "their default";

/// The raw `{columns, data}` document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    pub columns: Vec<String>,
    pub data: Vec<Vec<Value>>,
}

/// Timing information the solver worker stores in `extra`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Timing {
    pub solver_time: f64,
    pub pyjs_time: f64,
}

/// A single trace submitted for a problem.
///
/// `trace_id`, `scent` and `status` are `None` for a problem that has no
/// trace yet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Submission {
    pub id: i64,
    pub name: String,
    /// Problem statistics in the order the database returned them.
    pub stats: serde_json::Map<String, Value>,
    pub trace_id: Option<i64>,
    pub scent: Option<String>,
    pub status: Option<String>,
    pub energy: Option<i64>,
    pub has_src: bool,
    pub has_tgt: bool,
    pub has_data: bool,
    pub prob_inv_id: Option<i64>,
    pub trace_inv_id: Option<i64>,
    pub timing: Timing,
    /// Unix seconds when the trace was recorded.
    pub timestamp: Option<i64>,
}

impl Submission {
    /// Extracts a submission from a bound row.
    pub fn from_record(r: &Record<'_>) -> Result<Self, MapError> {
        let timing = match r.object_opt("extra")? {
            Some(extra) => Timing {
                solver_time: extra
                    .get("solver_time")
                    .and_then(Value::as_f64)
                    .unwrap_or(0.0),
                pyjs_time: extra
                    .get("pyjs_time")
                    .and_then(Value::as_f64)
                    .unwrap_or(0.0),
            },
            None => Timing::default(),
        };
        Ok(Submission {
            id: r.i64("id")?,
            name: r.str_opt("name")?.unwrap_or_default().to_string(),
            stats: r.object_opt("stats")?.cloned().unwrap_or_default(),
            trace_id: r.i64_opt("trace_id")?,
            scent: r.str_opt("scent")?.map(str::to_string),
            status: r.str_opt("status")?.map(str::to_string),
            energy: r.i64_opt("energy")?,
            has_src: r.bool_opt("has_src")?.unwrap_or(false),
            has_tgt: r.bool_opt("has_tgt")?.unwrap_or(false),
            has_data: r.bool_opt("has_data")?.unwrap_or(false),
            prob_inv_id: r.i64_opt("prob_inv_id")?,
            trace_inv_id: r.i64_opt("trace_inv_id")?,
            timing,
            timestamp: r.i64_opt("timestamp")?,
        })
    }

    /// The problem size `R`, if the stats carry an integral one.
    pub fn resolution(&self) -> Option<i64> {
        self.stats.get("R").and_then(Value::as_i64)
    }

    /// Whether this is a finished run of the organizers' default trace.
    pub fn is_baseline(&self) -> bool {
        self.scent.as_deref() == Some(SCENT_DEFAULT) && self.status.as_deref() == Some(STATUS_DONE)
    }
}

impl Dataset {
    /// Parses a JSON document. The endpoint serves it as text, so this takes a string.
    pub fn from_json(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Binds every row to the column list and extracts its submission.
    pub fn submissions(self) -> Result<Vec<Submission>, MapError> {
        let schema = Schema::new(self.columns)?;
        schema.require(REQUIRED_COLUMNS)?;
        self.data
            .into_iter()
            .enumerate()
            .map(|(i, row)| Submission::from_record(&schema.bind(i, row)?))
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    /// Builds a dataset with the full column set. Each tuple is
    /// `(id, name, R, trace_id, scent, status, energy)`.
    pub(crate) fn dataset(
        rows: &[(i64, &str, i64, i64, &str, &str, Option<i64>)],
    ) -> Dataset {
        Dataset {
            columns: REQUIRED_COLUMNS.iter().map(|s| s.to_string()).collect(),
            data: rows
                .iter()
                .map(|&(id, name, r, trace_id, scent, status, energy)| {
                    vec![
                        json!(id),
                        json!(name),
                        json!({ "R": r }),
                        json!(trace_id),
                        json!(scent),
                        json!(status),
                        json!(energy),
                    ]
                })
                .collect(),
        }
    }

    #[test]
    fn parses_document_and_extracts_submissions() {
        let doc = r#"{
            "columns": ["id", "name", "has_src", "has_tgt", "stats", "prob_inv_id",
                        "trace_id", "scent", "status", "energy", "trace_inv_id",
                        "has_data", "extra"],
            "data": [
                [12, "LA001", 0, 1, {"R": 20, "tgt_size": 8}, 3,
                 40, "their default", "DONE", 5000, 4, true,
                 {"solver_time": 1.5, "pyjs_time": 2}],
                [12, "LA001", 0, 1, {"R": 20, "tgt_size": 8}, 3,
                 null, null, null, null, null, false, {}]
            ]
        }"#;
        let subs = Dataset::from_json(doc).unwrap().submissions().unwrap();
        assert_eq!(subs.len(), 2);
        let s = &subs[0];
        assert_eq!(s.id, 12);
        assert_eq!(s.name, "LA001");
        assert_eq!(s.resolution(), Some(20));
        assert!(!s.has_src && s.has_tgt && s.has_data);
        assert_eq!(s.energy, Some(5000));
        assert_eq!(s.prob_inv_id, Some(3));
        assert_eq!(s.timing.solver_time, 1.5);
        assert_eq!(s.timing.pyjs_time, 2.0);
        assert!(s.is_baseline());
        let keys: Vec<&String> = s.stats.keys().collect();
        assert_eq!(keys, vec!["R", "tgt_size"]);

        let t = &subs[1];
        assert_eq!(t.trace_id, None);
        assert_eq!(t.energy, None);
        assert!(!t.is_baseline());
        assert_eq!(t.timing, Timing::default());
    }

    #[test]
    fn baseline_needs_both_scent_and_status() {
        let subs = dataset(&[
            (1, "A", 8, 1, "their default", "FAIL", Some(10)),
            (1, "A", 8, 2, "bfs 1.0", "DONE", Some(10)),
            (1, "A", 8, 3, "their default", "DONE", Some(10)),
        ])
        .submissions()
        .unwrap();
        let flags: Vec<bool> = subs.iter().map(Submission::is_baseline).collect();
        assert_eq!(flags, vec![false, false, true]);
    }

    #[test]
    fn missing_required_column_is_rejected() {
        let ds = Dataset {
            columns: vec!["id".into(), "name".into(), "energy".into()],
            data: vec![vec![json!(1), json!("A"), json!(50)]],
        };
        assert_eq!(
            ds.submissions().unwrap_err(),
            MapError::MissingColumn("stats".into())
        );
    }

    #[test]
    fn short_row_is_rejected() {
        let mut ds = dataset(&[(1, "A", 8, 1, "x", "DONE", Some(1))]);
        ds.data[0].pop();
        assert!(matches!(
            ds.submissions(),
            Err(MapError::LengthMismatch { row: 0, .. })
        ));
    }
}
