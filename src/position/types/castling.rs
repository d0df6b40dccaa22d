//! Castling rights bitmask.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::piece::Color;

/// Castling rights as a four-bit set.
///
/// Bit layout matches the Zobrist castling table index: white kingside = 1,
/// white queenside = 2, black kingside = 4, black queenside = 8.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const WHITE_OO: CastlingRights = CastlingRights(1);
    pub const WHITE_OOO: CastlingRights = CastlingRights(2);
    pub const BLACK_OO: CastlingRights = CastlingRights(4);
    pub const BLACK_OOO: CastlingRights = CastlingRights(8);
    pub const ANY: CastlingRights = CastlingRights(15);

    /// Kingside right for a color
    #[inline]
    #[must_use]
    pub const fn kingside(color: Color) -> Self {
        match color {
            Color::White => Self::WHITE_OO,
            Color::Black => Self::BLACK_OO,
        }
    }

    /// Queenside right for a color
    #[inline]
    #[must_use]
    pub const fn queenside(color: Color) -> Self {
        match color {
            Color::White => Self::WHITE_OOO,
            Color::Black => Self::BLACK_OOO,
        }
    }

    /// Returns true if every right in `other` is present
    #[inline]
    #[must_use]
    pub const fn has(self, other: CastlingRights) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns true if any right in `other` is present
    #[inline]
    #[must_use]
    pub const fn has_any(self, other: CastlingRights) -> bool {
        self.0 & other.0 != 0
    }

    /// Returns true if no right is set
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn insert(&mut self, other: CastlingRights) {
        self.0 |= other.0;
    }

    #[inline]
    pub fn remove_mask(&mut self, mask: u8) {
        self.0 &= !mask;
    }

    /// Raw bitmask (index into the Zobrist castling table)
    #[inline]
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self.0
    }

    /// Create from a raw bitmask
    #[inline]
    #[must_use]
    pub const fn from_u8(value: u8) -> Self {
        CastlingRights(value & 15)
    }

    /// Index into per-right tables (rook squares, castling paths)
    #[inline]
    #[must_use]
    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rights_disjoint() {
        let all = [
            CastlingRights::WHITE_OO,
            CastlingRights::WHITE_OOO,
            CastlingRights::BLACK_OO,
            CastlingRights::BLACK_OOO,
        ];
        for (i, a) in all.iter().enumerate() {
            for (j, b) in all.iter().enumerate() {
                assert_eq!(a.has_any(*b), i == j);
            }
        }
    }

    #[test]
    fn test_insert_remove() {
        let mut cr = CastlingRights::NONE;
        cr.insert(CastlingRights::kingside(Color::White));
        cr.insert(CastlingRights::queenside(Color::Black));
        assert!(cr.has(CastlingRights::WHITE_OO));
        assert!(cr.has(CastlingRights::BLACK_OOO));
        assert!(!cr.has(CastlingRights::WHITE_OOO));

        cr.remove_mask(CastlingRights::WHITE_OO.as_u8());
        assert!(!cr.has(CastlingRights::WHITE_OO));
        assert!(cr.has(CastlingRights::BLACK_OOO));
    }

    #[test]
    fn test_any_covers_all() {
        assert!(CastlingRights::ANY.has(CastlingRights::WHITE_OO));
        assert!(CastlingRights::ANY.has(CastlingRights::BLACK_OOO));
        assert!(CastlingRights::NONE.is_empty());
    }
}
