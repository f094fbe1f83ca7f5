//! # Leaderboard Aggregation
//!
//! Groups the submissions of one snapshot by problem id and annotates every row
//! with what the table needs: whether it opens its group, how many rows the group
//! spans, and whether it is the best (lowest-energy) submission for its problem.
//! The per-problem best and baseline lookups live in the [`Leaderboard`] and are
//! rebuilt from scratch for every snapshot.

use crate::SetMinMax;
use crate::dataset::Submission;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum AggregateError {
    /// Rows of one problem must be adjacent; the grouping scans forward until the id changes.
    #[error("rows of problem {id} are not contiguous (row {row} reopens the group)")]
    NonContiguous { id: i64, row: usize },
}

/// The best submission seen so far for a problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Best {
    pub trace_id: Option<i64>,
    pub energy: i64,
}

/// A submission annotated with its place in the leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entry {
    #[serde(flatten)]
    pub submission: Submission,
    /// Whether this row opens its problem group.
    pub first: bool,
    /// Number of rows in the group; only set on the first row.
    pub lookahead: Option<usize>,
    pub is_best: bool,
    /// `None` when the score cannot be computed.
    pub score: Option<i64>,
}

/// All rows of one snapshot, grouped and annotated.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Leaderboard {
    pub rows: Vec<Entry>,
    /// Best submission per problem id.
    pub bests: BTreeMap<i64, Best>,
    /// Baseline energy per problem id.
    pub defaults: BTreeMap<i64, i64>,
    /// Sum of the scores of the best rows.
    pub total: i64,
}

impl Leaderboard {
    /// Groups `submissions`, which must keep the rows of each problem together.
    pub fn aggregate(submissions: Vec<Submission>) -> Result<Self, AggregateError> {
        let mut bests: BTreeMap<i64, Best> = BTreeMap::new();
        let mut defaults: BTreeMap<i64, i64> = BTreeMap::new();
        let mut closed: HashSet<i64> = HashSet::new();
        let mut prev: Option<i64> = None;

        for (row, s) in submissions.iter().enumerate() {
            if prev != Some(s.id) {
                if let Some(p) = prev {
                    closed.insert(p);
                }
                if closed.contains(&s.id) {
                    return Err(AggregateError::NonContiguous { id: s.id, row });
                }
                prev = Some(s.id);
            }
            if let Some(energy) = s.energy {
                let candidate = Best {
                    trace_id: s.trace_id,
                    energy,
                };
                bests
                    .entry(s.id)
                    .and_modify(|b| {
                        if b.energy.setmin(energy) {
                            *b = candidate;
                        }
                    })
                    .or_insert(candidate);
                if s.is_baseline() {
                    defaults.entry(s.id).or_insert(energy);
                }
            }
        }

        let n = submissions.len();
        let ids: Vec<i64> = submissions.iter().map(|s| s.id).collect();
        let mut rows = Vec::with_capacity(n);
        for (i, submission) in submissions.into_iter().enumerate() {
            let first = i == 0 || ids[i - 1] != submission.id;
            let lookahead = first.then(|| {
                ids[i..]
                    .iter()
                    .take_while(|&&id| id == submission.id)
                    .count()
            });
            let is_best = bests
                .get(&submission.id)
                .is_some_and(|b| submission.energy.is_some() && b.trace_id == submission.trace_id);
            rows.push(Entry {
                submission,
                first,
                lookahead,
                is_best,
                score: None,
            });
        }

        Ok(Leaderboard {
            rows,
            bests,
            defaults,
            total: 0,
        })
    }

    /// Iterates over problem groups in table order.
    pub fn groups(&self) -> impl Iterator<Item = &[Entry]> {
        self.rows
            .chunk_by(|a, b| a.submission.id == b.submission.id)
    }

    /// Baseline energy of a problem, if its default trace finished.
    pub fn baseline(&self, id: i64) -> Option<i64> {
        self.defaults.get(&id).copied()
    }

    pub fn best(&self, id: i64) -> Option<&Best> {
        self.bests.get(&id)
    }
}
