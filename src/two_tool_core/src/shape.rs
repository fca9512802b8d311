//! What the rest of the cube looks like around a last layer case. Every
//! method only has cases of one shape, so a case table can be checked
//! against it.

use crate::{
    cube::{Corner, CornerPiece, Cube2},
    method::Method,
    moves::Alg,
};
use itertools::Itertools;

/// How the D corners sit in the D layer, up to turning that layer.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LayerSwap {
    None,
    Adjacent,
    Diagonal,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CaseShape {
    /// Every D corner shows its D color on the D side.
    BuiltFace {
        swap: LayerSwap,
        /// Every U corner also shows its U color on the U side.
        top_oriented: bool,
    },
    /// The D layer is solved except for one corner twisted in place.
    TwistedCorner { clockwise: bool },
    /// Three D corners are solved and the last is in the U layer.
    OpenSlot {
        /// Twist of the D corner waiting in the U layer.
        loose_twist: u8,
        /// Twist of the U corner sitting in its slot.
        slot_twist: u8,
    },
}

const LS: [Method; 9] = [
    Method::Ls1,
    Method::Ls2,
    Method::Ls3,
    Method::Ls4,
    Method::Ls5,
    Method::Ls6,
    Method::Ls7,
    Method::Ls8,
    Method::Ls9,
];

impl CaseShape {
    /// The shape of `cube`, which must be held as `Cube2::SOLVED` is and
    /// only turned with R, U and F. `None` if it has none of the shapes.
    #[must_use]
    pub fn of(cube: &Cube2) -> Option<Self> {
        let bottom: Vec<CornerPiece> = Corner::BOTTOM
            .into_iter()
            .map(|slot| cube.corner(slot))
            .collect::<Option<_>>()?;
        let top: Vec<CornerPiece> = [Corner::Ubl, Corner::Ubr, Corner::Ufr, Corner::Ufl]
            .into_iter()
            .map(|slot| cube.corner(slot))
            .collect::<Option<_>>()?;

        let placed = bottom
            .iter()
            .filter(|piece| piece.home.is_bottom())
            .count();
        match placed {
            4 => {
                let homes = bottom
                    .iter()
                    .map(|piece| Corner::BOTTOM.iter().position(|&slot| slot == piece.home))
                    .collect::<Option<Vec<_>>>()?;
                let swap = layer_swap(&homes)?;
                let twisted = bottom
                    .iter()
                    .filter(|piece| piece.twist != 0)
                    .collect_vec();
                match twisted[..] {
                    [] => Some(Self::BuiltFace {
                        swap,
                        top_oriented: top.iter().all(|piece| piece.twist == 0),
                    }),
                    [piece] if swap == LayerSwap::None => Some(Self::TwistedCorner {
                        clockwise: piece.twist == 1,
                    }),
                    _ => None,
                }
            }
            3 => {
                let solved_three = Corner::BOTTOM
                    .into_iter()
                    .zip(&bottom)
                    .filter(|(_, piece)| piece.home.is_bottom())
                    .all(|(slot, piece)| piece.home == slot && piece.twist == 0);
                if !solved_three {
                    return None;
                }
                let slot = bottom.iter().find(|piece| !piece.home.is_bottom())?;
                let loose = top.iter().find(|piece| piece.home.is_bottom())?;
                Some(Self::OpenSlot {
                    loose_twist: loose.twist,
                    slot_twist: slot.twist,
                })
            }
            _ => None,
        }
    }

    /// The method whose cases have this shape.
    #[must_use]
    pub fn method(self) -> Option<Method> {
        match self {
            Self::BuiltFace {
                swap: LayerSwap::None,
                ..
            } => Some(Method::Cll),
            Self::BuiltFace {
                swap: LayerSwap::Adjacent,
                top_oriented: false,
            } => Some(Method::Eg1),
            Self::BuiltFace {
                swap: LayerSwap::Adjacent,
                top_oriented: true,
            } => Some(Method::Leg1),
            Self::BuiltFace {
                swap: LayerSwap::Diagonal,
                ..
            } => Some(Method::Eg2),
            Self::TwistedCorner { clockwise: true } => Some(Method::TcllPlus),
            Self::TwistedCorner { clockwise: false } => Some(Method::TcllMinus),
            Self::OpenSlot {
                loose_twist,
                slot_twist,
            } => LS
                .get(usize::from(loose_twist) * 3 + usize::from(slot_twist))
                .copied(),
        }
    }

    /// The shape of the case `alg` solves.
    #[must_use]
    pub fn solved_by(alg: &Alg) -> Option<Self> {
        Self::of(&Cube2::from_alg(&alg.inverse()))
    }
}

/// `homes[i]` is the position in `Corner::BOTTOM` of the piece in slot `i`.
/// Some turn of the layer must leave at most two pieces out of place.
fn layer_swap(homes: &[usize]) -> Option<LayerSwap> {
    (0..4).find_map(|turn| {
        let moved = |i: usize| (homes[i] + turn) % 4;
        let wrong = (0..4).filter(|&i| moved(i) != i).collect_vec();
        match wrong[..] {
            [] => Some(LayerSwap::None),
            [a, b] if moved(a) == b && moved(b) == a => Some(if (b - a) % 2 == 1 {
                LayerSwap::Adjacent
            } else {
                LayerSwap::Diagonal
            }),
            _ => None,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(alg: &str) -> Option<CaseShape> {
        CaseShape::solved_by(&alg.parse().unwrap())
    }

    #[test]
    fn test_layer_swap() {
        assert_eq!(layer_swap(&[0, 1, 2, 3]), Some(LayerSwap::None));
        assert_eq!(layer_swap(&[1, 2, 3, 0]), Some(LayerSwap::None));
        assert_eq!(layer_swap(&[1, 0, 2, 3]), Some(LayerSwap::Adjacent));
        assert_eq!(layer_swap(&[2, 1, 0, 3]), Some(LayerSwap::Diagonal));
        // Two adjacent pairs swapped is a diagonal swap after a half turn
        assert_eq!(layer_swap(&[1, 0, 3, 2]), Some(LayerSwap::Diagonal));
        // A three cycle that keeps the back left corner
        assert_eq!(layer_swap(&[1, 2, 0, 3]), Some(LayerSwap::Adjacent));
    }

    #[test]
    fn test_known_shapes() {
        let built = |swap, top_oriented| Some(CaseShape::BuiltFace { swap, top_oriented });
        assert_eq!(shape("R U R' U R U2 R'"), built(LayerSwap::None, false));
        assert_eq!(shape("F R U R' U' F'"), built(LayerSwap::None, false));
        assert_eq!(shape("R2 U2 R2 U2 R2"), built(LayerSwap::None, true));
        assert_eq!(shape("F' U R2 F2 U R'"), built(LayerSwap::Adjacent, false));
        assert_eq!(shape("F2 U F2 U2 R2 U F2"), built(LayerSwap::Adjacent, true));
        assert_eq!(shape("R U2 R F2 R' U2 R'"), built(LayerSwap::Diagonal, false));
        assert_eq!(shape("R2 F2 R2"), built(LayerSwap::Diagonal, true));
        assert_eq!(
            shape("R F' U' R U R F' R2"),
            Some(CaseShape::TwistedCorner { clockwise: true })
        );
        assert_eq!(
            shape("R2 F R' U' R' U F R'"),
            Some(CaseShape::TwistedCorner { clockwise: false })
        );
        assert_eq!(
            shape("R U' R'"),
            Some(CaseShape::OpenSlot {
                loose_twist: 2,
                slot_twist: 2
            })
        );
        assert_eq!(shape("R"), None);
        assert_eq!(shape("R2 U R2"), None);
    }

    #[test]
    fn test_methods() {
        let method = |alg| shape(alg).and_then(CaseShape::method);
        assert_eq!(method("R U R' U R U2 R'"), Some(Method::Cll));
        assert_eq!(method("F' U R2 F2 U R'"), Some(Method::Eg1));
        assert_eq!(method("F2 U F2 U2 R2 U F2"), Some(Method::Leg1));
        assert_eq!(method("R2 F2 R2"), Some(Method::Eg2));
        assert_eq!(method("R F' U' R U R F' R2"), Some(Method::TcllPlus));
        assert_eq!(method("R2 F R' U' R' U F R'"), Some(Method::TcllMinus));
        assert_eq!(method("R U R'"), Some(Method::Ls5));
        assert_eq!(method("R U' R'"), Some(Method::Ls9));
        assert_eq!(method("R2 U R2"), None);
    }
}
