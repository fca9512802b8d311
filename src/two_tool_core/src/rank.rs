//! Ranking and collapsing of solution batches.
//!
//! Sorting by `Rank` places solutions with the same color, alg and face (at
//! the same depth) next to each other, which is what lets `dedupe` compare
//! each solution only with the previous survivor. The two are only correct
//! together and are exposed jointly as `rank_and_collapse`.

use crate::{
    cube::Color,
    moves::{Alg, Move},
    solution::Solution,
    start, success,
};
use log::{info, warn};
use serde_json::Value;

/// Total order of solutions, best first. Compares, in order: score, method
/// priority, face score, alg number, color, alg, face, inspection, AUFs and
/// subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Rank<'a>(
    usize,
    usize,
    u32,
    usize,
    Color,
    &'a Alg,
    &'a str,
    &'a Alg,
    Option<Move>,
    Option<Move>,
    &'a str,
);

#[must_use]
pub fn rank(solution: &Solution) -> Rank<'_> {
    Rank(
        solution.score,
        solution.method.priority(),
        solution.face_score,
        solution.alg_number,
        solution.color,
        &solution.alg,
        &solution.face,
        &solution.inspection,
        solution.pre_auf,
        solution.post_auf,
        &solution.subset,
    )
}

/// Drop superseded solutions and every solution equal in color, alg and face
/// to the one kept before it. `sorted` must be ordered by `rank`.
#[must_use]
pub fn dedupe(sorted: Vec<Solution>) -> Vec<Solution> {
    let mut kept: Vec<Solution> = Vec::with_capacity(sorted.len());
    for solution in sorted {
        if solution.should_delete {
            continue;
        }
        if kept.last().is_some_and(|last| {
            last.color == solution.color && last.alg == solution.alg && last.face == solution.face
        }) {
            continue;
        }
        kept.push(solution);
    }
    kept
}

/// Sort a raw batch by rank and collapse duplicates. Malformed solutions are
/// logged and left out without affecting the rest of the batch.
#[must_use]
pub fn rank_and_collapse(batch: Vec<Solution>) -> Vec<Solution> {
    info!(start!("Ranking {} solutions"), batch.len());
    let mut valid = batch
        .into_iter()
        .filter(|solution| match solution.validate() {
            Ok(()) => true,
            Err(e) => {
                warn!("Skipping {} {} `{}`: {e}", solution.method, solution.subset, solution.alg);
                false
            }
        })
        .collect::<Vec<_>>();
    valid.sort_by(|a, b| rank(a).cmp(&rank(b)));
    let collapsed = dedupe(valid);
    info!(success!("{} solutions remain"), collapsed.len());
    collapsed
}

/// Decode a JSON array of solutions and rank it. Elements that fail to
/// decode are logged and skipped.
///
/// # Errors
///
/// If `json` is not an array.
pub fn rank_json_batch(json: &str) -> Result<Vec<Solution>, serde_json::Error> {
    let values: Vec<Value> = serde_json::from_str(json)?;
    let batch = values
        .into_iter()
        .enumerate()
        .filter_map(|(i, value)| match serde_json::from_value(value) {
            Ok(solution) => Some(solution),
            Err(e) => {
                warn!("Skipping solution #{i}: {e}");
                None
            }
        })
        .collect();
    Ok(rank_and_collapse(batch))
}
