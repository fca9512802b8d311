#![warn(clippy::pedantic)]
#![allow(clippy::similar_names, clippy::too_many_lines)]

//! Inspection search for 2x2x2 last-layer methods. Given a scramble, finds
//! short inspections after which a known CLL, EG, TCLL or LS case appears,
//! then ranks and collapses the resulting solutions.

pub mod cube;
pub mod database;
pub mod filter;
pub mod method;
pub mod moves;
pub mod rank;
pub mod search;
pub mod shape;
pub mod solution;
pub mod worker;

pub use cube::{Color, Cube2, Hold};
pub use database::{AlgDatabase, CaseMatch, CaseRecord, DatabaseError};
pub use filter::DisplayFilter;
pub use method::{DepthConfig, Method, MethodGroup};
pub use moves::{Alg, Move, MoveParseError, Scramble};
pub use rank::{Rank, dedupe, rank, rank_and_collapse, rank_json_batch};
pub use search::{Candidate, InspectionSearch};
pub use shape::CaseShape;
pub use solution::{Solution, SolutionError};
pub use worker::{BoundaryError, RequestId, SearchRequest, SearchResponse, SolverWorker};

#[macro_export]
macro_rules! start {
    ($msg:expr) => {
        concat!("⏳ ", $msg)
    };
}

#[macro_export]
macro_rules! working {
    ($msg:expr) => {
        concat!("🛠  ", $msg)
    };
}

#[macro_export]
macro_rules! success {
    ($msg:expr) => {
        concat!("✅ ", $msg)
    };
}

/// Search every method group of `database` for `scramble` and assemble the
/// raw, unranked batch of solutions.
#[must_use]
pub fn search(database: &AlgDatabase, scramble: &Scramble, depths: &DepthConfig) -> Vec<Solution> {
    InspectionSearch::new(database)
        .solve(scramble, depths)
        .iter()
        .map(solution::assemble)
        .collect()
}
