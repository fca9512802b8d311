//! The restricted R/U/F move grammar shared by scrambles, inspections and
//! case algorithms.

use itertools::Itertools;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// A face that may be turned. The bottom-back-left corner never moves under
/// these three faces.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Face {
    R,
    U,
    F,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Modifier {
    Single,
    Double,
    Inverse,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Move {
    pub face: Face,
    pub modifier: Modifier,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum MoveParseError {
    #[error("Unknown move `{0}`, expected one of R, U or F optionally followed by 2 or '")]
    InvalidToken(String),
    #[error("Empty move at position {0}, moves must be separated by a single space")]
    EmptyToken(usize),
}

impl Move {
    pub const ALL: [Move; 9] = {
        use Face::{F, R, U};
        use Modifier::{Double, Inverse, Single};
        let v = [
            Move::new(R, Single),
            Move::new(R, Double),
            Move::new(R, Inverse),
            Move::new(U, Single),
            Move::new(U, Double),
            Move::new(U, Inverse),
            Move::new(F, Single),
            Move::new(F, Double),
            Move::new(F, Inverse),
        ];

        let mut i = 0;
        while i < v.len() {
            assert!(i == v[i].index());
            i += 1;
        }

        v
    };

    #[must_use]
    pub const fn new(face: Face, modifier: Modifier) -> Self {
        Self { face, modifier }
    }

    /// The U turn of `quarter_turns` clockwise quarter turns, or `None` for a
    /// multiple of four.
    #[must_use]
    pub const fn u_turn(quarter_turns: u8) -> Option<Self> {
        match quarter_turns % 4 {
            1 => Some(Self::new(Face::U, Modifier::Single)),
            2 => Some(Self::new(Face::U, Modifier::Double)),
            3 => Some(Self::new(Face::U, Modifier::Inverse)),
            _ => None,
        }
    }

    /// Index into `Move::ALL`.
    #[must_use]
    pub const fn index(self) -> usize {
        self.face as usize * 3 + self.modifier as usize
    }

    #[must_use]
    pub const fn quarter_turns(self) -> u8 {
        match self.modifier {
            Modifier::Single => 1,
            Modifier::Double => 2,
            Modifier::Inverse => 3,
        }
    }

    #[must_use]
    pub const fn inverse(self) -> Self {
        let modifier = match self.modifier {
            Modifier::Single => Modifier::Inverse,
            Modifier::Double => Modifier::Double,
            Modifier::Inverse => Modifier::Single,
        };
        Self::new(self.face, modifier)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let face = match self.face {
            Face::R => "R",
            Face::U => "U",
            Face::F => "F",
        };
        let modifier = match self.modifier {
            Modifier::Single => "",
            Modifier::Double => "2",
            Modifier::Inverse => "'",
        };
        write!(f, "{face}{modifier}")
    }
}

impl FromStr for Move {
    type Err = MoveParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let face = match chars.next() {
            Some('R') => Face::R,
            Some('U') => Face::U,
            Some('F') => Face::F,
            _ => return Err(MoveParseError::InvalidToken(s.to_owned())),
        };
        let modifier = match (chars.next(), chars.next()) {
            (None, _) => Modifier::Single,
            (Some('2'), None) => Modifier::Double,
            (Some('\''), None) => Modifier::Inverse,
            _ => return Err(MoveParseError::InvalidToken(s.to_owned())),
        };
        Ok(Self::new(face, modifier))
    }
}

/// An ordered sequence of moves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Alg(Vec<Move>);

impl Alg {
    #[must_use]
    pub fn new(moves: Vec<Move>) -> Self {
        Self(moves)
    }

    #[must_use]
    pub fn moves(&self) -> &[Move] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn last(&self) -> Option<Move> {
        self.0.last().copied()
    }

    #[must_use]
    pub fn with(&self, move_: Move) -> Self {
        let mut moves = Vec::with_capacity(self.0.len() + 1);
        moves.extend_from_slice(&self.0);
        moves.push(move_);
        Self(moves)
    }

    #[must_use]
    pub fn inverse(&self) -> Self {
        Self(self.0.iter().rev().map(|move_| move_.inverse()).collect())
    }
}

impl fmt::Display for Alg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.iter().join(" "))
    }
}

/// Lenient parsing: any amount of whitespace separates moves. Use
/// `Scramble::parse` for the strict scramble grammar.
impl FromStr for Alg {
    type Err = MoveParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split_whitespace()
            .map(str::parse)
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

impl Serialize for Move {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Move {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer)?
            .parse()
            .map_err(de::Error::custom)
    }
}

impl Serialize for Alg {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Alg {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer)?
            .parse()
            .map_err(de::Error::custom)
    }
}

/// Trim surrounding whitespace and fold the curly apostrophe into the
/// straight one.
#[must_use]
pub fn normalize(scramble: &str) -> String {
    scramble.trim().replace('’', "'")
}

/// A validated scramble. Only constructible through `Scramble::parse`, so the
/// search never sees a token outside the R/U/F grammar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Scramble(Alg);

impl Scramble {
    /// Normalize `text` and check it against
    /// `^((R|U|F)[2']? )*(R|U|F)[2']?$`. The empty string is the empty
    /// scramble.
    ///
    /// # Errors
    ///
    /// If a token is not a move or two moves are not separated by exactly one
    /// space.
    pub fn parse(text: &str) -> Result<Self, MoveParseError> {
        let normalized = normalize(text);
        if normalized.is_empty() {
            return Ok(Self::default());
        }
        normalized
            .split(' ')
            .enumerate()
            .map(|(i, token)| {
                if token.is_empty() {
                    Err(MoveParseError::EmptyToken(i))
                } else {
                    token.parse()
                }
            })
            .collect::<Result<Vec<_>, _>>()
            .map(|moves| Self(Alg(moves)))
    }

    #[must_use]
    pub fn alg(&self) -> &Alg {
        &self.0
    }
}

impl FromStr for Scramble {
    type Err = MoveParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Scramble {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let alg: Alg = "R U2 F'".parse().unwrap();
        assert_eq!(alg.len(), 3);
        assert_eq!(alg.to_string(), "R U2 F'");
        assert_eq!(alg.inverse().to_string(), "F U2 R'");
    }

    #[test]
    fn test_rejects_foreign_tokens() {
        for bad in ["D", "R3", "R'2", "r", "x", "U2'"] {
            assert_eq!(
                bad.parse::<Move>(),
                Err(MoveParseError::InvalidToken(bad.to_owned()))
            );
        }
    }

    #[test]
    fn test_scramble_grammar() {
        assert_eq!(Scramble::parse("R U R' U'").unwrap().alg().len(), 4);
        assert!(Scramble::parse("").unwrap().alg().is_empty());
        assert!(Scramble::parse("   ").unwrap().alg().is_empty());
        assert_eq!(
            Scramble::parse("R  U"),
            Err(MoveParseError::EmptyToken(1))
        );
        assert!(Scramble::parse("R U D").is_err());
        assert!(Scramble::parse("RU").is_err());
    }

    #[test]
    fn test_curly_apostrophe() {
        let scramble = Scramble::parse(" R U’ F2 ").unwrap();
        assert_eq!(scramble.to_string(), "R U' F2");
    }

    #[test]
    fn test_normalize_idempotent() {
        for text in ["R U’ F2 ", "", "  F' ", "R2 U2 R’ U R"] {
            let once = normalize(text);
            assert_eq!(normalize(&once), once);
        }
    }

    #[test]
    fn test_u_turn() {
        assert_eq!(Move::u_turn(0), None);
        assert_eq!(Move::u_turn(4), None);
        assert_eq!(Move::u_turn(3).unwrap().to_string(), "U'");
        assert_eq!(Move::u_turn(6).unwrap().to_string(), "U2");
    }
}
