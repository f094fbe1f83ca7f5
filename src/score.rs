//! # Score Normalization
//!
//! A problem is worth `floor(log2(R)) * 1000` points. A submission earns the
//! share of that which it closes between the organizers' default trace
//! (the baseline, worth nothing) and the best known energy (worth everything).

use crate::leaderboard::Leaderboard;
use crate::reference::ReferenceTable;

/// Points per bit of problem resolution.
const POINTS_PER_LEVEL: i128 = 1000;

/// Normalized score of `team_energy` on a problem of resolution `r`.
///
/// Returns `None` if `r < 1`, for which `log2` is undefined or negative.
/// A reference best that does not beat the baseline is treated as
/// `baseline - 1`, and a submission no better than the baseline scores zero.
pub fn score(r: i64, baseline: i64, team_energy: i64, external_best: i64) -> Option<i64> {
    if r < 1 {
        return None;
    }
    let external_best = external_best.min(baseline - 1);
    let team_energy = team_energy.min(baseline);
    let level = i128::from(r.ilog2());
    let gained = i128::from(baseline) - i128::from(team_energy);
    let range = i128::from(baseline) - i128::from(external_best);
    let s = level * POINTS_PER_LEVEL * gained / range;
    i64::try_from(s).ok()
}

impl Leaderboard {
    /// Fills in the score of every row and the total over the best rows.
    ///
    /// Rows without energy, problems without a finished default trace and
    /// problems missing from `reference` are left unscored.
    pub fn apply_scores(&mut self, reference: &ReferenceTable) {
        let mut total = 0;
        for entry in self.rows.iter_mut() {
            let s = &entry.submission;
            entry.score = match (
                s.energy,
                s.resolution(),
                self.defaults.get(&s.id),
                reference.get(&s.name),
            ) {
                (Some(energy), Some(r), Some(&baseline), Some(best)) => {
                    score(r, baseline, energy, best)
                }
                _ => None,
            };
            if entry.is_best {
                total += entry.score.unwrap_or(0);
            }
        }
        self.total = total;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::tests::dataset;
    use proptest::prelude::*;

    #[test]
    fn reference_above_baseline_is_clamped() {
        // 120 >= 100 is treated as 99, and 150 >= 100 as 100.
        assert_eq!(score(8, 100, 150, 120), Some(0));
        assert_eq!(score(8, 100, 99, 120), Some(3000));
        assert_eq!(score(8, 100, 50, 120), Some(3 * 1000 * 50));
    }

    #[test]
    fn scales_with_log2_of_resolution() {
        assert_eq!(score(1, 100, 50, 0), Some(0));
        assert_eq!(score(2, 100, 50, 0), Some(500));
        assert_eq!(score(20, 100, 50, 0), Some(2000));
        assert_eq!(score(250, 100, 0, 0), Some(7000));
        // Beating the reference is worth more than the full share.
        assert_eq!(score(2, 100, 0, 50), Some(2000));
    }

    #[test]
    fn result_is_floored() {
        // 4 * 1000 * 1 / 3 = 1333.33
        assert_eq!(score(16, 4, 3, 1), Some(1333));
    }

    #[test]
    fn resolution_below_one_is_undefined() {
        assert_eq!(score(0, 100, 50, 10), None);
        assert_eq!(score(-4, 100, 50, 10), None);
    }

    #[test]
    fn scores_and_total_count_only_best_rows() {
        let reference = ReferenceTable::from_pairs([("la001", 400), ("LA002", 10)]);
        let mut b = Leaderboard::aggregate(
            dataset(&[
                (1, "LA001", 20, 10, "their default", "DONE", Some(1000)),
                (1, "LA001", 20, 11, "bfs", "DONE", Some(700)),
                (1, "LA001", 20, 12, "bfs", "DONE", Some(400)),
                (2, "LA002", 8, 13, "bfs", "DONE", Some(50)),
                (3, "LA003", 8, 14, "their default", "DONE", Some(90)),
                (3, "LA003", 8, 15, "bfs", "DONE", Some(30)),
                (3, "LA003", 8, 16, "bfs", "FAIL", None),
            ])
            .submissions()
            .unwrap(),
        )
        .unwrap();
        b.apply_scores(&reference);
        let scores: Vec<Option<i64>> = b.rows.iter().map(|e| e.score).collect();
        assert_eq!(
            scores,
            vec![
                Some(0),
                Some(2000),
                Some(4000),
                // No baseline for LA002.
                None,
                // No reference entry for LA003.
                None,
                None,
                None,
            ]
        );
        assert_eq!(b.total, 4000);
    }

    #[test]
    fn rescoring_replaces_previous_total() {
        let mut b = Leaderboard::aggregate(
            dataset(&[
                (1, "LA001", 4, 10, "their default", "DONE", Some(10)),
                (1, "LA001", 4, 11, "bfs", "DONE", Some(5)),
            ])
            .submissions()
            .unwrap(),
        )
        .unwrap();
        b.apply_scores(&ReferenceTable::from_pairs([("la001", 0)]));
        assert_eq!(b.total, 1000);
        b.apply_scores(&ReferenceTable::from_pairs([("la001", 5)]));
        assert_eq!(b.total, 2000);
        b.apply_scores(&ReferenceTable::default());
        assert_eq!(b.total, 0);
    }

    proptest! {
        #[test]
        fn non_increasing_in_team_energy(
            r in 1i64..512,
            baseline in 1i64..1_000_000,
            best in 0i64..2_000_000,
            a in 0i64..2_000_000,
            d in 0i64..1000,
        ) {
            let lo = score(r, baseline, a, best).unwrap();
            let hi = score(r, baseline, a + d, best).unwrap();
            prop_assert!(hi <= lo);
            prop_assert!(hi >= 0);
        }

        #[test]
        fn clamped_reference_matches_baseline_minus_one(
            r in 1i64..512,
            baseline in 1i64..1_000_000,
            over in 0i64..1000,
            team in 0i64..2_000_000,
        ) {
            prop_assert_eq!(
                score(r, baseline, team, baseline + over),
                score(r, baseline, team, baseline - 1)
            );
        }
    }
}
