//! Facelet model of the 2x2x2 cube.
//!
//! Stickers are numbered face by face in the order U, L, F, R, B, D. Within a
//! face, stickers are read row by row while looking at that face with U (or F
//! for the D face) on top:
//!
//! ```text
//!              U0  U1
//!              U2  U3
//!      L4  L5  F8  F9  R12 R13 B16 B17
//!      L6  L7  F10 F11 R14 R15 B18 B19
//!              D20 D21
//!              D22 D23
//! ```

use crate::moves::{Alg, Move};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr, sync::LazyLock};
use thiserror::Error;

pub const FACELET_COUNT: usize = 24;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Green,
    Blue,
    Red,
    Orange,
    Yellow,
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Unknown color `{0}`")]
pub struct ColorParseError(String);

impl Color {
    pub const ALL: [Self; 6] = {
        use Color::*;
        let v = [White, Green, Blue, Red, Orange, Yellow];

        let mut i = 0;
        while i < v.len() {
            assert!(i == v[i] as usize);
            i += 1;
        }

        v
    };

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Green => "green",
            Self::Blue => "blue",
            Self::Red => "red",
            Self::Orange => "orange",
            Self::Yellow => "yellow",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|color| color.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ColorParseError(s.to_owned()))
    }
}

/// A permutation of the facelets: the sticker at position `i` moves to
/// position `self.0[i]`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Perm([u8; FACELET_COUNT]);

impl Perm {
    pub const IDENTITY: Self = {
        let mut dest = [0; FACELET_COUNT];
        let mut i = 0;
        while i < FACELET_COUNT {
            dest[i] = i as u8;
            i += 1;
        }
        Self(dest)
    };

    const fn from_cycles(cycles: &[[u8; 4]]) -> Self {
        let mut dest = Self::IDENTITY.0;
        let mut c = 0;
        while c < cycles.len() {
            let cycle = cycles[c];
            let mut i = 0;
            while i < cycle.len() {
                dest[cycle[i] as usize] = cycle[(i + 1) % cycle.len()];
                i += 1;
            }
            c += 1;
        }
        Self(dest)
    }

    /// `self` followed by `other`.
    #[must_use]
    pub const fn then(self, other: Self) -> Self {
        let mut dest = [0; FACELET_COUNT];
        let mut i = 0;
        while i < FACELET_COUNT {
            dest[i] = other.0[self.0[i] as usize];
            i += 1;
        }
        Self(dest)
    }

    #[must_use]
    pub const fn power(self, exponent: u8) -> Self {
        let mut result = Self::IDENTITY;
        let mut i = 0;
        while i < exponent {
            result = result.then(self);
            i += 1;
        }
        result
    }
}

const R_TURN: Perm = Perm::from_cycles(&[[12, 13, 15, 14], [3, 16, 23, 11], [1, 18, 21, 9]]);
const U_TURN: Perm = Perm::from_cycles(&[[0, 1, 3, 2], [8, 4, 16, 12], [9, 5, 17, 13]]);
const F_TURN: Perm = Perm::from_cycles(&[[8, 9, 11, 10], [2, 12, 21, 7], [3, 14, 20, 5]]);

/// Whole-cube rotation in the direction of R.
const X_ROTATION: Perm = Perm::from_cycles(&[
    [12, 13, 15, 14],
    [3, 16, 23, 11],
    [1, 18, 21, 9],
    [5, 4, 6, 7],
    [2, 17, 22, 10],
    [8, 0, 19, 20],
]);
/// Whole-cube rotation in the direction of U.
const Y_ROTATION: Perm = Perm::from_cycles(&[
    [0, 1, 3, 2],
    [8, 4, 16, 12],
    [9, 5, 17, 13],
    [20, 22, 23, 21],
    [10, 6, 18, 14],
    [11, 7, 19, 15],
]);

/// Indexed by `Move::index`.
static TURNS: [Perm; 9] = [
    R_TURN,
    R_TURN.power(2),
    R_TURN.power(3),
    U_TURN,
    U_TURN.power(2),
    U_TURN.power(3),
    F_TURN,
    F_TURN.power(2),
    F_TURN.power(3),
];

impl Move {
    #[must_use]
    pub fn permutation(self) -> &'static Perm {
        &TURNS[self.index()]
    }
}

/// A side of the cube, in facelet numbering order.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Side {
    U,
    L,
    F,
    R,
    B,
    D,
}

impl Side {
    pub const ALL: [Self; 6] = [Self::U, Self::L, Self::F, Self::R, Self::B, Self::D];

    const fn facelets(self) -> std::ops::Range<usize> {
        let start = self as usize * 4;
        start..start + 4
    }
}

/// A corner slot, named by the sides it touches.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Corner {
    Ufr,
    Ufl,
    Ubl,
    Ubr,
    Dfl,
    Dfr,
    Dbr,
    Dbl,
}

impl Corner {
    pub const ALL: [Self; 8] = {
        use Corner::*;
        let v = [Ufr, Ufl, Ubl, Ubr, Dfl, Dfr, Dbr, Dbl];

        let mut i = 0;
        while i < v.len() {
            assert!(i == v[i] as usize);
            i += 1;
        }

        v
    };

    /// The D slots in order around the D side.
    pub const BOTTOM: [Self; 4] = [Self::Dfl, Self::Dfr, Self::Dbr, Self::Dbl];

    /// The U or D facelet first, then the other two clockwise.
    const fn facelets(self) -> [usize; 3] {
        match self {
            Self::Ufr => [3, 12, 9],
            Self::Ufl => [2, 8, 5],
            Self::Ubl => [0, 4, 17],
            Self::Ubr => [1, 16, 13],
            Self::Dfl => [20, 7, 10],
            Self::Dfr => [21, 11, 14],
            Self::Dbr => [23, 15, 18],
            Self::Dbl => [22, 19, 6],
        }
    }

    #[must_use]
    pub fn is_bottom(self) -> bool {
        matches!(self, Self::Dfl | Self::Dfr | Self::Dbr | Self::Dbl)
    }
}

/// The corner piece found in some slot.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CornerPiece {
    /// Where the piece is in `Cube2::SOLVED`.
    pub home: Corner,
    /// How many times the piece is twisted clockwise from having its U or D
    /// color on the slot's U or D facelet.
    pub twist: u8,
}

/// A way of holding the cube: the rotation applied before the alg.
#[derive(Debug)]
pub struct Hold {
    label: String,
    perm: Perm,
    quarter_turns: u8,
}

impl Hold {
    /// Rotation notation such as `x2 y'`; empty for the identity.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn perm(&self) -> &Perm {
        &self.perm
    }

    /// Quarter turns in the shortest x/y rotation sequence.
    #[must_use]
    pub fn quarter_turns(&self) -> u8 {
        self.quarter_turns
    }
}

static HOLDS: LazyLock<Vec<Hold>> = LazyLock::new(|| {
    let generators = [
        ("x", X_ROTATION, 1_u8),
        ("x'", X_ROTATION.power(3), 1),
        ("x2", X_ROTATION.power(2), 2),
        ("y", Y_ROTATION, 1),
        ("y'", Y_ROTATION.power(3), 1),
        ("y2", Y_ROTATION.power(2), 2),
    ];

    let mut holds = vec![Hold {
        label: String::new(),
        perm: Perm::IDENTITY,
        quarter_turns: 0,
    }];
    // Breadth first, so the first label found for a rotation is a shortest
    // one. Every label therefore alternates x and y.
    let mut next = 0;
    while next < holds.len() {
        for (name, generator, turns) in &generators {
            let same_axis = holds[next]
                .label
                .split(' ')
                .next_back()
                .is_some_and(|last| last.starts_with(&name[..1]));
            if same_axis {
                continue;
            }
            let perm = holds[next].perm.then(*generator);
            if holds.iter().any(|hold| hold.perm == perm) {
                continue;
            }
            let label = if holds[next].label.is_empty() {
                (*name).to_owned()
            } else {
                format!("{} {name}", holds[next].label)
            };
            let quarter_turns = holds[next].quarter_turns + turns;
            holds.push(Hold {
                label,
                perm,
                quarter_turns,
            });
        }
        next += 1;
    }
    holds
});

/// All 24 holds, the identity first.
#[must_use]
pub fn holds() -> &'static [Hold] {
    &HOLDS
}

/// The colors of a state renamed in order of first appearance. Equal keys
/// mean two states differ only by a recoloring, so any move sequence solving
/// one solves the other.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct CaseKey([u8; FACELET_COUNT]);

/// Maps the labels of a `CaseKey` back to the colors they replaced.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Relabeling([Option<Color>; 6]);

impl Relabeling {
    #[must_use]
    pub fn color_of(&self, label: u8) -> Option<Color> {
        self.0.get(usize::from(label)).copied().flatten()
    }

    #[must_use]
    pub fn label_of(&self, color: Color) -> Option<u8> {
        self.0
            .iter()
            .position(|&c| c == Some(color))
            .and_then(|label| u8::try_from(label).ok())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Cube2 {
    facelets: [Color; FACELET_COUNT],
}

impl Cube2 {
    /// White on U, green on F, yellow on D.
    pub const SOLVED: Self = {
        use Color::*;
        let side_colors = [White, Orange, Green, Red, Blue, Yellow];
        let mut facelets = [White; FACELET_COUNT];
        let mut i = 0;
        while i < FACELET_COUNT {
            facelets[i] = side_colors[i / 4];
            i += 1;
        }
        Self { facelets }
    };

    #[must_use]
    pub fn from_alg(alg: &Alg) -> Self {
        let mut cube = Self::SOLVED;
        cube.apply_alg(alg);
        cube
    }

    pub fn apply(&mut self, perm: &Perm) {
        let old = self.facelets;
        for (from, &to) in perm.0.iter().enumerate() {
            self.facelets[usize::from(to)] = old[from];
        }
    }

    pub fn apply_move(&mut self, move_: Move) {
        self.apply(move_.permutation());
    }

    pub fn apply_alg(&mut self, alg: &Alg) {
        for &move_ in alg.moves() {
            self.apply_move(move_);
        }
    }

    /// Apply `quarter_turns` clockwise U quarter turns.
    pub fn apply_u(&mut self, quarter_turns: u8) {
        if let Some(move_) = Move::u_turn(quarter_turns) {
            self.apply_move(move_);
        }
    }

    /// The state as seen after rotating the cube into `hold`.
    #[must_use]
    pub fn viewed(&self, hold: &Hold) -> Self {
        let mut viewed = *self;
        viewed.apply(hold.perm());
        viewed
    }

    #[must_use]
    pub fn side(&self, side: Side) -> [Color; 4] {
        let mut colors = [Color::White; 4];
        colors.copy_from_slice(&self.facelets[side.facelets()]);
        colors
    }

    /// Every side shows a single color.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        Side::ALL.into_iter().all(|side| {
            let colors = self.side(side);
            colors.iter().all(|&color| color == colors[0])
        })
    }

    /// The piece in `slot`, told apart by the colors of `Cube2::SOLVED`.
    /// `None` if the colors there belong to no corner.
    #[must_use]
    pub fn corner(&self, slot: Corner) -> Option<CornerPiece> {
        let colors = slot.facelets().map(|i| self.facelets[i]);
        Corner::ALL.into_iter().find_map(|home| {
            let solved = home.facelets().map(|i| Self::SOLVED.facelets[i]);
            (0..3_u8)
                .find(|&twist| {
                    (0..3).all(|j| colors[(j + usize::from(twist)) % 3] == solved[j])
                })
                .map(|twist| CornerPiece { home, twist })
        })
    }

    #[must_use]
    pub fn case_key(&self) -> (CaseKey, Relabeling) {
        let mut labels: [Option<u8>; 6] = [None; 6];
        let mut relabeling = [None; 6];
        let mut next_label = 0;
        let mut key = [0; FACELET_COUNT];
        for (slot, &color) in key.iter_mut().zip(&self.facelets) {
            *slot = *labels[color as usize].get_or_insert_with(|| {
                relabeling[usize::from(next_label)] = Some(color);
                next_label += 1;
                next_label - 1
            });
        }
        (CaseKey(key), Relabeling(relabeling))
    }
}
