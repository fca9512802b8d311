use crate::{
    cube::{Color, Cube2},
    database::{AlgDatabase, CaseMatch},
    method::{DepthConfig, Method, MethodGroup},
    moves::{Alg, Move, Scramble},
    start, success, working,
};
use fxhash::FxHashMap;
use log::{debug, info};
use std::{panic, thread, time::Instant};

/// A case recognized after some inspection, before it is turned into a
/// `Solution`.
#[derive(Debug, Clone)]
pub struct Candidate<'db> {
    pub group: MethodGroup,
    pub inspection: Alg,
    /// The cube after the scramble and the inspection.
    pub state: Cube2,
    pub matched: CaseMatch<'db>,
    /// A shorter inspection already reaches the same case in the same hold
    /// and color.
    pub should_delete: bool,
}

/// Breadth first inspection search over one database. The search is a pure
/// function of its inputs and may be reused across scrambles.
pub struct InspectionSearch<'db> {
    database: &'db AlgDatabase,
}

impl<'db> InspectionSearch<'db> {
    #[must_use]
    pub fn new(database: &'db AlgDatabase) -> Self {
        Self { database }
    }

    /// Every candidate of every searched group, in the order EG, TCLL, LS and
    /// breadth first within a group.
    #[must_use]
    pub fn solve(&self, scramble: &Scramble, depths: &DepthConfig) -> Vec<Candidate<'db>> {
        info!(start!("Searching inspections for `{}`"), scramble);
        let start = Instant::now();

        let scrambled = Cube2::from_alg(scramble.alg());
        let candidates = thread::scope(|s| {
            let handles = MethodGroup::SEARCHED.map(|group| {
                let max_depth = depths[group];
                s.spawn(move || self.solve_group(group, scrambled, max_depth))
            });
            handles
                .into_iter()
                .flat_map(|handle| match handle.join() {
                    Ok(candidates) => candidates,
                    Err(payload) => panic::resume_unwind(payload),
                })
                .collect::<Vec<_>>()
        });

        info!(
            success!("Found {} candidates in {:.3}s"),
            candidates.len(),
            start.elapsed().as_secs_f64()
        );
        candidates
    }

    fn solve_group(
        &self,
        group: MethodGroup,
        scrambled: Cube2,
        max_depth: u8,
    ) -> Vec<Candidate<'db>> {
        let mut candidates = vec![];
        let mut frontier = vec![(Alg::default(), scrambled)];
        let mut nodes_visited = 0_usize;

        for depth in 0..=max_depth {
            debug!(working!("Searching {} at depth {}..."), group, depth);
            for (inspection, state) in &frontier {
                nodes_visited += 1;
                for matched in self.database.lookup(group, state) {
                    candidates.push(Candidate {
                        group,
                        inspection: inspection.clone(),
                        state: *state,
                        matched,
                        should_delete: false,
                    });
                }
            }
            if depth == max_depth {
                break;
            }
            frontier = expand(&frontier);
        }

        mark_dominated(&mut candidates);
        debug!(
            working!("{} visited {} inspections and found {} candidates"),
            group,
            nodes_visited,
            candidates.len()
        );
        candidates
    }
}

/// All inspections one move longer. Turning the face that was just turned
/// is never useful.
fn expand(frontier: &[(Alg, Cube2)]) -> Vec<(Alg, Cube2)> {
    let mut next = Vec::with_capacity(frontier.len() * 6);
    for (inspection, state) in frontier {
        for move_ in Move::ALL {
            if inspection.last().is_some_and(|last| last.face == move_.face) {
                continue;
            }
            let mut state = *state;
            state.apply_move(move_);
            next.push((inspection.with(move_), state));
        }
    }
    next
}

/// `candidates` must be in breadth first order, so the first candidate of a
/// case has the shortest inspection.
fn mark_dominated(candidates: &mut [Candidate<'_>]) {
    let mut shortest: FxHashMap<(Method, &str, &str, Color), usize> = FxHashMap::default();
    for candidate in candidates.iter_mut() {
        let CaseMatch {
            record,
            hold,
            color,
            ..
        } = candidate.matched;
        let key = (record.method, record.subset.as_str(), hold.label(), color);
        let length = candidate.inspection.len();
        let best = *shortest.entry(key).or_insert(length);
        candidate.should_delete = length > best;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INSERT_ONLY: &str = r#"
        [[case]]
        method = "LS9"
        subset = "Insert"
        algs = ["R U' R'"]
    "#;

    #[test]
    fn test_expand_skips_same_face() {
        let start = [(Alg::default(), Cube2::SOLVED)];
        let one = expand(&start);
        assert_eq!(one.len(), 9);
        let two = expand(&one);
        assert_eq!(two.len(), 9 * 6);
        assert!(two.iter().all(|(inspection, _)| {
            inspection.moves()[0].face != inspection.moves()[1].face
        }));
    }

    #[test]
    fn test_longer_inspection_is_dominated() {
        let database = AlgDatabase::from_toml_str(INSERT_ONLY).unwrap();
        let scramble = Scramble::parse("R U R' U'").unwrap();
        let candidates =
            InspectionSearch::new(&database).solve(&scramble, &DepthConfig::uniform(1));

        let direct = candidates
            .iter()
            .find(|candidate| {
                candidate.inspection.is_empty()
                    && candidate.matched.hold.label().is_empty()
                    && candidate.matched.color == Color::Yellow
            })
            .unwrap();
        assert_eq!(direct.matched.pre_auf, Move::u_turn(1));
        assert_eq!(direct.matched.post_auf, None);
        assert!(!direct.should_delete);

        let after_u = candidates
            .iter()
            .find(|candidate| {
                candidate.inspection.to_string() == "U"
                    && candidate.matched.hold.label().is_empty()
                    && candidate.matched.color == Color::Yellow
            })
            .unwrap();
        assert!(after_u.should_delete);
        assert_eq!(after_u.matched.pre_auf, None);
    }

    #[test]
    fn test_groups_without_cases_find_nothing() {
        let database = AlgDatabase::from_toml_str(INSERT_ONLY).unwrap();
        let scramble = Scramble::parse("R U R'").unwrap();
        let candidates =
            InspectionSearch::new(&database).solve(&scramble, &DepthConfig::uniform(2));
        assert!(!candidates.is_empty());
        assert!(candidates.iter().all(|candidate| candidate.group == MethodGroup::Ls));
    }
}
