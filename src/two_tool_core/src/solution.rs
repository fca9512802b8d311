use crate::{
    cube::Color,
    method::{Method, MethodGroup},
    moves::{Alg, Move, Scramble},
    search::Candidate,
};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::iter;
use thiserror::Error;

/// A complete way to finish the cube: from the scrambled state, turn
/// `inspection`, rotate into `face`, then turn `pre_auf`, `alg` and
/// `post_auf`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Solution {
    pub method: Method,
    pub method_group: MethodGroup,
    pub subset: String,
    /// Color of the built face, held on D.
    pub color: Color,
    /// Rotation holding the built face on D. Empty when no rotation is
    /// needed.
    pub face: String,
    pub inspection: Alg,
    pub pre_auf: Option<Move>,
    pub alg: Alg,
    pub post_auf: Option<Move>,
    pub depth: usize,
    pub alg_number: usize,
    pub score: usize,
    pub face_score: u32,
    pub should_delete: bool,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SolutionError {
    #[error("{method} belongs to {expected}, not {found}")]
    GroupMismatch {
        method: Method,
        expected: MethodGroup,
        found: MethodGroup,
    },
    #[error("Depth {depth} does not match an inspection of {inspection_length} moves")]
    DepthMismatch {
        depth: usize,
        inspection_length: usize,
    },
}

/// Bind a matched case to the inspection that reached it.
#[must_use]
pub fn assemble(candidate: &Candidate<'_>) -> Solution {
    let record = candidate.matched.record;
    let hold = candidate.matched.hold;
    Solution {
        method: record.method,
        method_group: record.method.group(),
        subset: record.subset.clone(),
        color: candidate.matched.color,
        face: hold.label().to_owned(),
        inspection: candidate.inspection.clone(),
        pre_auf: candidate.matched.pre_auf,
        alg: record.alg.clone(),
        post_auf: candidate.matched.post_auf,
        depth: candidate.inspection.len(),
        alg_number: record.alg_number,
        score: candidate.inspection.len() + record.alg.len(),
        face_score: record.face_score + u32::from(hold.quarter_turns()),
        should_delete: candidate.should_delete,
    }
}

impl Solution {
    /// Check the fields that can disagree in a record that did not come from
    /// `assemble`, such as one decoded from JSON.
    ///
    /// # Errors
    ///
    /// If the method group or the depth is inconsistent.
    pub fn validate(&self) -> Result<(), SolutionError> {
        let expected = self.method.group();
        if self.method_group != expected {
            return Err(SolutionError::GroupMismatch {
                method: self.method,
                expected,
                found: self.method_group,
            });
        }
        if self.depth != self.inspection.len() {
            return Err(SolutionError::DepthMismatch {
                depth: self.depth,
                inspection_length: self.inspection.len(),
            });
        }
        Ok(())
    }

    /// The four annotated lines copied when sharing a solution.
    #[must_use]
    pub fn reconstruction(&self, scramble: &Scramble) -> String {
        let inspection = self.inspection.to_string().to_lowercase();
        let face = [self.face.clone(), auf(self.pre_auf)]
            .into_iter()
            .filter(|part| !part.is_empty())
            .join(" ");
        let alg = [self.alg.to_string(), auf(self.post_auf)]
            .into_iter()
            .filter(|part| !part.is_empty())
            .join(" ");
        let face_comment = if self.method == Method::Cll {
            "layer"
        } else {
            "face"
        };

        let width = [inspection.len(), face.len(), alg.len(), 10]
            .into_iter()
            .max()
            .unwrap_or_default()
            + 4;
        let annotated = [
            (inspection.as_str(), "inspection"),
            (face.as_str(), face_comment),
            (alg.as_str(), self.method.name()),
        ]
        .into_iter()
        .map(|(line, comment)| format!("{line:<width$}// {comment}"));
        let mut text = iter::once(scramble.to_string()).chain(annotated).join("\n");
        text.push('\n');
        text
    }
}

fn auf(turn: Option<Move>) -> String {
    turn.map(|turn| turn.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solution() -> Solution {
        Solution {
            method: Method::Cll,
            method_group: MethodGroup::Eg,
            subset: "Sune".to_owned(),
            color: Color::White,
            face: "x2".to_owned(),
            inspection: "R U'".parse().unwrap(),
            pre_auf: Move::u_turn(2),
            alg: "R U R' U R U2 R'".parse().unwrap(),
            post_auf: None,
            depth: 2,
            alg_number: 0,
            score: 9,
            face_score: 2,
            should_delete: false,
        }
    }

    #[test]
    fn test_validate() {
        assert_eq!(solution().validate(), Ok(()));

        let mut wrong_group = solution();
        wrong_group.method_group = MethodGroup::Ls;
        assert!(matches!(
            wrong_group.validate(),
            Err(SolutionError::GroupMismatch { .. })
        ));

        let mut wrong_depth = solution();
        wrong_depth.depth = 0;
        assert_eq!(
            wrong_depth.validate(),
            Err(SolutionError::DepthMismatch {
                depth: 0,
                inspection_length: 2
            })
        );
    }

    #[test]
    fn test_json_field_names() {
        let json = serde_json::to_value(solution()).unwrap();
        assert_eq!(json["method"], "CLL");
        assert_eq!(json["methodGroup"], "EG");
        assert_eq!(json["color"], "white");
        assert_eq!(json["preAuf"], "U2");
        assert_eq!(json["postAuf"], serde_json::Value::Null);
        assert_eq!(json["algNumber"], 0);
        assert_eq!(json["shouldDelete"], false);
        let decoded: Solution = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, solution());
    }

    #[test]
    fn test_reconstruction() {
        let scramble = Scramble::parse("F R U2 R'").unwrap();
        let text = solution().reconstruction(&scramble);
        assert!(text.ends_with("// CLL\n"));
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "F R U2 R'");
        assert!(lines[1].starts_with("r u' "));
        assert!(lines[1].ends_with("// inspection"));
        assert!(lines[2].starts_with("x2 U2 "));
        assert!(lines[2].ends_with("// layer"));
        assert!(lines[3].starts_with("R U R' U R U2 R' "));
        assert!(lines[3].ends_with("// CLL"));
        let column = lines[1].find("//").unwrap();
        assert!(lines[1..].iter().all(|line| line.find("//") == Some(column)));
    }
}
