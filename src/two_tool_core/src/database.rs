//! The case recognition database.
//!
//! Cases are never described by sticker patterns. Each alg defines the case
//! it solves: for every pre-AUF `U^p` and post-AUF `U^-a`, the state
//! `solved · U^a · alg⁻¹ · U^-p` is keyed by `Cube2::case_key` and indexed
//! under the alg's method group. Looking a state up in all 24 holds then
//! recognizes the case regardless of which color the built face has.
//!
//! The state an alg solves must still have the shape of its method's cases,
//! and an alg may only be filed once.

use crate::{
    cube::{CaseKey, Color, Cube2, Hold, holds},
    method::{Method, MethodGroup},
    moves::{Alg, Move, MoveParseError},
    shape::CaseShape,
    start, success,
};
use fxhash::{FxHashMap, FxHashSet};
use log::{debug, info};
use serde::Deserialize;
use std::time::Instant;
use thiserror::Error;

/// The case table shipped with the crate.
pub const BUILTIN_CASES: &str = include_str!("../data/cases.toml");

/// The color on D in `Cube2::SOLVED`.
const SOLVED_BOTTOM: Color = Color::Yellow;

#[derive(Deserialize)]
struct CaseTable {
    #[serde(rename = "case", default)]
    cases: Vec<CaseDef>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct CaseDef {
    method: Method,
    subset: String,
    #[serde(default)]
    face_score: u32,
    algs: Vec<String>,
}

/// One alg for one case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseRecord {
    pub method: Method,
    pub subset: String,
    pub alg: Alg,
    /// Position of `alg` in its subset's list, zero for the preferred alg.
    pub alg_number: usize,
    /// Recognition baseline from the case definitions.
    pub face_score: u32,
}

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Could not parse the case definitions: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Alg #{alg_number} of {method} {subset} is invalid: {source}")]
    InvalidAlg {
        method: Method,
        subset: String,
        alg_number: usize,
        source: MoveParseError,
    },
    #[error("Alg #{alg_number} of {method} {subset} is empty")]
    EmptyAlg {
        method: Method,
        subset: String,
        alg_number: usize,
    },
    #[error("{method} {subset} has no algs")]
    EmptySubset { method: Method, subset: String },
    #[error("{method} {subset} is defined more than once")]
    DuplicateSubset { method: Method, subset: String },
    #[error("Alg #{alg_number} of {method} {subset} solves a case that is not {method}")]
    WrongShape {
        method: Method,
        subset: String,
        alg_number: usize,
    },
    #[error("Alg #{alg_number} of {method} {subset} repeats {first_method} {first_subset}")]
    DuplicateAlg {
        method: Method,
        subset: String,
        alg_number: usize,
        first_method: Method,
        first_subset: String,
    },
}

#[derive(Debug, Clone, Copy)]
struct IndexEntry {
    record: usize,
    /// Label of the solved bottom color in the indexed key.
    bottom_label: u8,
    pre_auf: u8,
    post_auf: u8,
}

/// A case recognized on a state.
#[derive(Debug, Clone, Copy)]
pub struct CaseMatch<'db> {
    pub record: &'db CaseRecord,
    pub hold: &'static Hold,
    /// Color of the built face, which the hold puts on D.
    pub color: Color,
    pub pre_auf: Option<Move>,
    pub post_auf: Option<Move>,
}

/// Immutable after construction. Construct it once and share it by
/// reference.
#[derive(Debug)]
pub struct AlgDatabase {
    records: Vec<CaseRecord>,
    eg: FxHashMap<CaseKey, Vec<IndexEntry>>,
    tcll: FxHashMap<CaseKey, Vec<IndexEntry>>,
    ls: FxHashMap<CaseKey, Vec<IndexEntry>>,
}

impl AlgDatabase {
    /// Load the builtin case table.
    ///
    /// # Errors
    ///
    /// Only if the embedded table is malformed.
    pub fn builtin() -> Result<Self, DatabaseError> {
        Self::from_toml_str(BUILTIN_CASES)
    }

    /// Load case definitions of the form
    ///
    /// ```toml
    /// [[case]]
    /// method = "CLL"
    /// subset = "Sune"
    /// face_score = 0
    /// algs = ["R U R' U R U2 R'"]
    /// ```
    ///
    /// # Errors
    ///
    /// See `DatabaseError`. No partially loaded database is ever returned.
    pub fn from_toml_str(text: &str) -> Result<Self, DatabaseError> {
        info!(start!("Loading case definitions"));
        let start = Instant::now();

        let table: CaseTable = toml::from_str(text)?;
        let mut seen = FxHashSet::default();
        let mut filed: FxHashMap<Alg, (Method, String)> = FxHashMap::default();
        let mut records = vec![];
        for def in table.cases {
            if !seen.insert((def.method, def.subset.clone())) {
                return Err(DatabaseError::DuplicateSubset {
                    method: def.method,
                    subset: def.subset,
                });
            }
            if def.algs.is_empty() {
                return Err(DatabaseError::EmptySubset {
                    method: def.method,
                    subset: def.subset,
                });
            }
            for (alg_number, text) in def.algs.iter().enumerate() {
                let alg: Alg = text.parse().map_err(|source| DatabaseError::InvalidAlg {
                    method: def.method,
                    subset: def.subset.clone(),
                    alg_number,
                    source,
                })?;
                if alg.is_empty() {
                    return Err(DatabaseError::EmptyAlg {
                        method: def.method,
                        subset: def.subset.clone(),
                        alg_number,
                    });
                }
                // Every alg belongs to exactly one record
                if let Some((first_method, first_subset)) = filed.get(&alg) {
                    return Err(DatabaseError::DuplicateAlg {
                        method: def.method,
                        subset: def.subset.clone(),
                        alg_number,
                        first_method: *first_method,
                        first_subset: first_subset.clone(),
                    });
                }
                if CaseShape::solved_by(&alg).and_then(CaseShape::method) != Some(def.method) {
                    return Err(DatabaseError::WrongShape {
                        method: def.method,
                        subset: def.subset.clone(),
                        alg_number,
                    });
                }
                filed.insert(alg.clone(), (def.method, def.subset.clone()));
                records.push(CaseRecord {
                    method: def.method,
                    subset: def.subset.clone(),
                    alg,
                    alg_number,
                    face_score: def.face_score,
                });
            }
        }

        let mut database = Self {
            records,
            eg: FxHashMap::default(),
            tcll: FxHashMap::default(),
            ls: FxHashMap::default(),
        };
        for record_index in 0..database.records.len() {
            database.index_record(record_index);
        }

        info!(
            success!("Indexed {} algs ({} EG, {} TCLL, {} LS case states) in {:.3}s"),
            database.records.len(),
            database.eg.len(),
            database.tcll.len(),
            database.ls.len(),
            start.elapsed().as_secs_f64()
        );
        Ok(database)
    }

    fn index_record(&mut self, record_index: usize) {
        let record = &self.records[record_index];
        let inverse = record.alg.inverse();
        let index = match record.method.group() {
            MethodGroup::Eg => &mut self.eg,
            MethodGroup::Tcll => &mut self.tcll,
            MethodGroup::Ls => &mut self.ls,
            MethodGroup::Alg => unreachable!("no method belongs to the ALG group"),
        };
        for post in 0..4 {
            for pre in 0..4 {
                let mut state = Cube2::SOLVED;
                state.apply_u(post);
                state.apply_alg(&inverse);
                state.apply_u(4 - pre);
                let (key, relabeling) = state.case_key();
                let Some(bottom_label) = relabeling.label_of(SOLVED_BOTTOM) else {
                    continue;
                };
                let entries = index.entry(key).or_default();
                // A case symmetric under some AUF reaches the same key
                // more than once; keep the first, which has the smallest AUFs
                if entries.iter().any(|entry| entry.record == record_index) {
                    continue;
                }
                entries.push(IndexEntry {
                    record: record_index,
                    bottom_label,
                    pre_auf: pre,
                    post_auf: (4 - post) % 4,
                });
            }
        }
        debug!(
            "Indexed {} {} alg #{}: {}",
            record.method, record.subset, record.alg_number, record.alg
        );
    }

    fn index(&self, group: MethodGroup) -> Option<&FxHashMap<CaseKey, Vec<IndexEntry>>> {
        match group {
            MethodGroup::Eg => Some(&self.eg),
            MethodGroup::Tcll => Some(&self.tcll),
            MethodGroup::Ls => Some(&self.ls),
            MethodGroup::Alg => None,
        }
    }

    /// Every case of `group` recognized on `state`, in every hold. A miss is
    /// not an error and yields nothing.
    #[must_use]
    pub fn lookup(&self, group: MethodGroup, state: &Cube2) -> Vec<CaseMatch<'_>> {
        let Some(index) = self.index(group) else {
            return vec![];
        };
        let mut matches = vec![];
        for hold in holds() {
            let (key, relabeling) = state.viewed(hold).case_key();
            let Some(entries) = index.get(&key) else {
                continue;
            };
            for entry in entries {
                let Some(color) = relabeling.color_of(entry.bottom_label) else {
                    continue;
                };
                matches.push(CaseMatch {
                    record: &self.records[entry.record],
                    hold,
                    color,
                    pre_auf: Move::u_turn(entry.pre_auf),
                    post_auf: Move::u_turn(entry.post_auf),
                });
            }
        }
        matches
    }

    #[must_use]
    pub fn records(&self) -> &[CaseRecord] {
        &self.records
    }

    pub fn records_for(&self, method: Method) -> impl Iterator<Item = &CaseRecord> {
        self.records
            .iter()
            .filter(move |record| record.method == method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    #[test]
    fn test_builtin_loads() {
        let database = AlgDatabase::builtin().unwrap();
        for method in Method::ALL {
            assert!(
                database.records_for(method).next().is_some(),
                "no cases for {method}"
            );
        }
        for record in database.records() {
            assert_eq!(
                database
                    .records_for(record.method)
                    .filter(|other| other.subset == record.subset)
                    .position(|other| other == record),
                Some(record.alg_number)
            );
        }
    }

    #[test]
    fn test_builtin_shapes() {
        let database = AlgDatabase::builtin().unwrap();
        for record in database.records() {
            assert_eq!(
                CaseShape::solved_by(&record.alg).and_then(CaseShape::method),
                Some(record.method),
                "{} {} {}",
                record.method,
                record.subset,
                record.alg
            );
        }
        assert!(database.records().iter().map(|record| &record.alg).all_unique());

        let subsets = |method| {
            database
                .records_for(method)
                .filter(|record| record.alg_number == 0)
                .count()
        };
        // H is symmetric under a half turn of the cube, so two of its six
        // permutations are the same case held the other way
        assert_eq!(subsets(Method::Cll), 42);
        assert_eq!(subsets(Method::Eg1), 40);
        assert_eq!(subsets(Method::Leg1), 3);
        assert_eq!(subsets(Method::Eg2), 43);
        assert_eq!(subsets(Method::TcllPlus), 43);
        assert_eq!(subsets(Method::TcllMinus), 43);
        assert_eq!(subsets(Method::Ls1), 54);
        assert_eq!(subsets(Method::Ls9), 54);
    }

    #[test]
    fn test_exact_case_is_found() {
        let database = AlgDatabase::from_toml_str(
            r#"
            [[case]]
            method = "CLL"
            subset = "Sune"
            algs = ["R U R' U R U2 R'"]
            "#,
        )
        .unwrap();
        let record = &database.records()[0];
        let state = Cube2::from_alg(&record.alg.inverse());
        let matches = database.lookup(MethodGroup::Eg, &state);
        assert!(matches.iter().any(|m| m.hold.label().is_empty()
            && m.color == Color::Yellow
            && m.pre_auf.is_none()
            && m.post_auf.is_none()));
        assert!(database.lookup(MethodGroup::Ls, &state).is_empty());
        assert!(database.lookup(MethodGroup::Alg, &state).is_empty());
    }

    #[test]
    fn test_every_match_solves() {
        let database = AlgDatabase::builtin().unwrap();
        let scramble: Alg = "R U R' U R U2 R'".parse().unwrap();
        let state = Cube2::from_alg(&scramble.inverse());
        for group in MethodGroup::SEARCHED {
            for m in database.lookup(group, &state) {
                let mut cube = state.viewed(m.hold);
                cube.apply_alg(&Alg::new(m.pre_auf.into_iter().collect()));
                cube.apply_alg(&m.record.alg);
                cube.apply_alg(&Alg::new(m.post_auf.into_iter().collect()));
                assert!(cube.is_solved(), "{} {}", m.record.method, m.record.alg);
                assert_eq!(cube.side(crate::cube::Side::D)[0], m.color);
            }
        }
    }

    #[test]
    fn test_malformed_definitions() {
        let unknown_method = r#"
            [[case]]
            method = "ZBLL"
            subset = "T"
            algs = ["R U R'"]
        "#;
        assert!(matches!(
            AlgDatabase::from_toml_str(unknown_method),
            Err(DatabaseError::Toml(_))
        ));

        let foreign_move = r#"
            [[case]]
            method = "CLL"
            subset = "T"
            algs = ["R U R' U' R' F R F'", "R D R'"]
        "#;
        assert!(matches!(
            AlgDatabase::from_toml_str(foreign_move),
            Err(DatabaseError::InvalidAlg { alg_number: 1, .. })
        ));

        let empty_alg = r#"
            [[case]]
            method = "LS1"
            subset = "A"
            algs = [" "]
        "#;
        assert!(matches!(
            AlgDatabase::from_toml_str(empty_alg),
            Err(DatabaseError::EmptyAlg { .. })
        ));

        let no_algs = r#"
            [[case]]
            method = "LS1"
            subset = "A"
            algs = []
        "#;
        assert!(matches!(
            AlgDatabase::from_toml_str(no_algs),
            Err(DatabaseError::EmptySubset { .. })
        ));

        let duplicate = r#"
            [[case]]
            method = "EG-2"
            subset = "H"
            algs = ["R2 F2 R2"]

            [[case]]
            method = "EG-2"
            subset = "H"
            algs = ["R2 U2 R2"]
        "#;
        assert!(matches!(
            AlgDatabase::from_toml_str(duplicate),
            Err(DatabaseError::DuplicateSubset { .. })
        ));
    }

    #[test]
    fn test_mislabeled_alg() {
        let sune_as_eg1 = r#"
            [[case]]
            method = "EG-1"
            subset = "Sune"
            algs = ["R U R' U R U2 R'"]
        "#;
        assert!(matches!(
            AlgDatabase::from_toml_str(sune_as_eg1),
            Err(DatabaseError::WrongShape {
                method: Method::Eg1,
                alg_number: 0,
                ..
            })
        ));

        // The variant leaves the bottom layer solved, so it is a CLL
        let cll_variant_as_eg2 = r#"
            [[case]]
            method = "EG-2"
            subset = "H"
            algs = ["R2 F2 R2", "R2 U2 R U2 R2"]
        "#;
        assert!(matches!(
            AlgDatabase::from_toml_str(cll_variant_as_eg2),
            Err(DatabaseError::WrongShape { alg_number: 1, .. })
        ));

        let insert_as_ls1 = r#"
            [[case]]
            method = "LS1"
            subset = "Insert"
            algs = ["R U' R'"]
        "#;
        assert!(matches!(
            AlgDatabase::from_toml_str(insert_as_ls1),
            Err(DatabaseError::WrongShape { .. })
        ));
        assert!(AlgDatabase::from_toml_str(&insert_as_ls1.replace("LS1", "LS9")).is_ok());
    }

    #[test]
    fn test_repeated_alg() {
        let shared = r#"
            [[case]]
            method = "CLL"
            subset = "Sune"
            algs = ["R U R' U R U2 R'"]

            [[case]]
            method = "EG-2"
            subset = "H"
            algs = ["R2 F2 R2", "R U R' U R U2 R'"]
        "#;
        let Err(DatabaseError::DuplicateAlg {
            method,
            alg_number,
            first_method,
            first_subset,
            ..
        }) = AlgDatabase::from_toml_str(shared)
        else {
            panic!("a shared alg was accepted");
        };
        assert_eq!(method, Method::Eg2);
        assert_eq!(alg_number, 1);
        assert_eq!(first_method, Method::Cll);
        assert_eq!(first_subset, "Sune");

        let repeated = r#"
            [[case]]
            method = "CLL"
            subset = "Sune"
            algs = ["R U R' U R U2 R'", "R U R' U R U2 R'"]
        "#;
        assert!(matches!(
            AlgDatabase::from_toml_str(repeated),
            Err(DatabaseError::DuplicateAlg { alg_number: 1, .. })
        ));
    }
}
