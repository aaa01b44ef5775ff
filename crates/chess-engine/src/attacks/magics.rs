//! Magic bitboard tables for sliding piece attack generation.
//!
//! For every square, the occupancy of the squares that can block a slider
//! (its relevant mask, board edges excluded) is multiplied by a fixed magic
//! constant and shifted down to a dense index into a per-square attack
//! table. The tables are filled once by ray-walking every blocker subset.

use crate::Bitboard;
use chess_core::Square;
use std::sync::OnceLock;

/// Magic entry for a single square.
#[derive(Clone, Copy)]
struct Magic {
    /// Mask of relevant blocker squares (excludes edges).
    mask: Bitboard,
    /// The magic multiplier for this square.
    magic: u64,
    /// Right shift amount (64 - number of bits in mask).
    shift: u32,
    /// Offset into the shared attack table.
    offset: usize,
}

impl Magic {
    /// Computes the table index for an occupancy.
    #[inline]
    fn index(&self, occupied: Bitboard) -> usize {
        let relevant = occupied & self.mask;
        self.offset + ((relevant.0.wrapping_mul(self.magic)) >> self.shift) as usize
    }
}

/// The two sliding movement patterns; the queen is their union.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slider {
    Bishop,
    Rook,
}

impl Slider {
    const fn directions(self) -> [(i8, i8); 4] {
        match self {
            Slider::Bishop => [(1, 1), (1, -1), (-1, 1), (-1, -1)],
            Slider::Rook => [(1, 0), (-1, 0), (0, 1), (0, -1)],
        }
    }

    const fn magics(self) -> &'static [u64; 64] {
        match self {
            Slider::Bishop => &BISHOP_MAGICS,
            Slider::Rook => &ROOK_MAGICS,
        }
    }

    /// Squares a slider on `sq` could be blocked on, ignoring the last
    /// square of each ray (a piece there cannot hide anything behind it).
    fn relevant_mask(self, sq: Square) -> Bitboard {
        let mut mask = 0u64;
        let rank = (sq.index() / 8) as i8;
        let file = (sq.index() % 8) as i8;
        for (dr, df) in self.directions() {
            let (mut r, mut f) = (rank + dr, file + df);
            while (0..8).contains(&(r + dr)) && (0..8).contains(&(f + df)) {
                mask |= 1u64 << (r * 8 + f);
                r += dr;
                f += df;
            }
        }
        Bitboard(mask)
    }

    /// Walks each ray from `sq`, stopping on (and including) the first blocker.
    fn attacks_slow(self, sq: Square, blockers: Bitboard) -> Bitboard {
        let mut attacks = 0u64;
        let rank = (sq.index() / 8) as i8;
        let file = (sq.index() % 8) as i8;
        for (dr, df) in self.directions() {
            let (mut r, mut f) = (rank + dr, file + df);
            while (0..8).contains(&r) && (0..8).contains(&f) {
                let bit = 1u64 << (r * 8 + f);
                attacks |= bit;
                if blockers.0 & bit != 0 {
                    break;
                }
                r += dr;
                f += df;
            }
        }
        Bitboard(attacks)
    }
}

/// Per-square magics plus one flat attack table for a slider.
struct SliderTable {
    magics: [Magic; 64],
    attacks: Vec<Bitboard>,
}

impl SliderTable {
    fn build(slider: Slider) -> Self {
        let mut attacks = Vec::new();
        let mut magics = [Magic {
            mask: Bitboard::EMPTY,
            magic: 0,
            shift: 64,
            offset: 0,
        }; 64];

        for sq in Square::all() {
            let mask = slider.relevant_mask(sq);
            let magic = Magic {
                mask,
                magic: slider.magics()[sq.index() as usize],
                shift: 64 - mask.popcount(),
                offset: attacks.len(),
            };
            attacks.resize(magic.offset + (1usize << mask.popcount()), Bitboard::EMPTY);

            // Carry-Rippler enumeration of every subset of the mask
            let mut blockers = Bitboard::EMPTY;
            loop {
                let slot = &mut attacks[magic.index(blockers)];
                let reachable = slider.attacks_slow(sq, blockers);
                debug_assert!(
                    slot.is_empty() || *slot == reachable,
                    "magic collision for {:?} on {}",
                    slider,
                    sq
                );
                *slot = reachable;

                blockers = Bitboard(blockers.0.wrapping_sub(mask.0) & mask.0);
                if blockers.is_empty() {
                    break;
                }
            }
            magics[sq.index() as usize] = magic;
        }

        SliderTable { magics, attacks }
    }

    #[inline]
    fn lookup(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        let magic = &self.magics[sq.index() as usize];
        self.attacks[magic.index(occupied)]
    }
}

/// The process-wide rook and bishop tables.
struct SlidingAttacks {
    bishop: SliderTable,
    rook: SliderTable,
}

static SLIDING_ATTACKS: OnceLock<SlidingAttacks> = OnceLock::new();

fn tables() -> &'static SlidingAttacks {
    SLIDING_ATTACKS.get_or_init(|| {
        let tables = SlidingAttacks {
            bishop: SliderTable::build(Slider::Bishop),
            rook: SliderTable::build(Slider::Rook),
        };
        tracing::debug!(
            bishop_entries = tables.bishop.attacks.len(),
            rook_entries = tables.rook.attacks.len(),
            "built sliding attack tables"
        );
        tables
    })
}

/// Builds the sliding attack tables now rather than on first lookup.
///
/// Positions call this on construction; calling it again is free.
pub fn init_sliding_attacks() {
    tables();
}

/// Returns bishop attacks for a square given occupied squares.
#[inline]
pub fn bishop_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    tables().bishop.lookup(sq, occupied)
}

/// Returns rook attacks for a square given occupied squares.
#[inline]
pub fn rook_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    tables().rook.lookup(sq, occupied)
}

/// Returns queen attacks (bishop + rook).
#[inline]
pub fn queen_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    bishop_attacks(sq, occupied) | rook_attacks(sq, occupied)
}

// Bishop magics, indexed a1..h8. Each hashes its square's relevant
// occupancies into 2^popcount(mask) slots without destructive collisions.
#[rustfmt::skip]
const BISHOP_MAGICS: [u64; 64] = [
    0x89a1121896040240, 0x2004844802002010, 0x2068080051921000, 0x62880a0220200808,
    0x0004042004000000, 0x0100822020200011, 0xc00444222012000a, 0x0028808801216001,
    0x0400492088408100, 0x0201c401040c0084, 0x00840800910a0010, 0x0000082080240060,
    0x2000840504006000, 0x30010c4108405004, 0x1008005410080802, 0x8144042209100900,
    0x0208081020014400, 0x004800201208ca00, 0x0f18140408012008, 0x1004002802102001,
    0x0841000820080811, 0x0040200200a42008, 0x0000800054042000, 0x88010400410c9000,
    0x0520040470104290, 0x1004040051500081, 0x2002081833080021, 0x000400c00c010142,
    0x941408200c002000, 0x0658810000806011, 0x0188071040440a00, 0x4800404002011c00,
    0x0104442040404200, 0x0c02180490200100, 0x0004022401120400, 0x80c0040400080120,
    0x8040010040820802, 0x0480810700020090, 0x0102008e00040242, 0x0809005202050100,
    0x8002024220104080, 0x0431008804142000, 0x0019001802081400, 0x0200014208040080,
    0x3308082008200100, 0x041010500040c020, 0x4012020c04210308, 0x208220a202004080,
    0x0111040120082000, 0x6803040141280a00, 0x2101004202410000, 0x8200000041108022,
    0x0000021082088000, 0x0002410204010040, 0x0040100400809000, 0x0822088220820214,
    0x0040808090012004, 0x00910224040218c9, 0x0402814422015008, 0x0090014004842410,
    0x0001000042304105, 0x0010008830412a00, 0x2520081090008908, 0x40102000a0a60140,
];

// Rook magics, indexed a1..h8.
#[rustfmt::skip]
const ROOK_MAGICS: [u64; 64] = [
    0x0a8002c000108020, 0x06c00049b0002001, 0x0100200010090040, 0x2480041000800801,
    0x0280028004000800, 0x0900410008040022, 0x0280020001001080, 0x2880002041000080,
    0xa000800080400034, 0x0004808020004000, 0x2290802004801000, 0x0411000d00100020,
    0x0402800800040080, 0x000b000401004208, 0x2409000100040200, 0x0001002100004082,
    0x0022878001e24000, 0x1090810021004010, 0x0801030040200012, 0x0500808008001000,
    0x0a08018014000880, 0x8000808004000200, 0x0201008080010200, 0x0801020000441091,
    0x0000800080204005, 0x1040200040100048, 0x0000120200402082, 0x0d14880480100080,
    0x0012040280080080, 0x0100040080020080, 0x9020010080800200, 0x0813241200148449,
    0x0491604001800080, 0x0100401000402001, 0x4820010021001040, 0x0400402202000812,
    0x0209009005000802, 0x0810800601800400, 0x4301083214000150, 0x204026458e001401,
    0x0040204000808000, 0x8001008040010020, 0x8410820820420010, 0x1003001000090020,
    0x0804040008008080, 0x0012000810020004, 0x1000100200040208, 0x430000a044020001,
    0x0280009023410300, 0x00e0100040002240, 0x0000200100401700, 0x2244100408008080,
    0x0008000400801980, 0x0002000810040200, 0x8010100228810400, 0x2000009044210200,
    0x4080008040102101, 0x0040002080411d01, 0x2005524060000901, 0x0502001008400422,
    0x489a000810200402, 0x0001004400080a13, 0x4000011008020084, 0x0026002114058042,
];

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn empty_board_counts() {
        assert_eq!(bishop_attacks(sq("d4"), Bitboard::EMPTY).popcount(), 13);
        assert_eq!(rook_attacks(sq("d4"), Bitboard::EMPTY).popcount(), 14);
        assert_eq!(queen_attacks(sq("d4"), Bitboard::EMPTY).popcount(), 27);
        assert_eq!(bishop_attacks(Square::A1, Bitboard::EMPTY).popcount(), 7);
        assert_eq!(rook_attacks(Square::A1, Bitboard::EMPTY).popcount(), 14);
    }

    #[test]
    fn bishop_attacks_with_blockers() {
        let blockers = Bitboard::from_square(sq("e5")) | Bitboard::from_square(sq("c3"));
        let attacks = bishop_attacks(sq("d4"), blockers);
        // Blockers themselves are attacked, nothing behind them is
        assert!(attacks.contains(sq("e5")));
        assert!(attacks.contains(sq("c3")));
        assert!(!attacks.contains(sq("f6")));
        assert!(!attacks.contains(sq("b2")));
    }

    #[test]
    fn rook_attacks_with_blockers() {
        let attacks = rook_attacks(sq("d4"), Bitboard::from_square(sq("d6")));
        assert!(attacks.contains(sq("d6")));
        assert!(!attacks.contains(sq("d7")));
        assert!(attacks.contains(sq("h4")));
    }

    #[test]
    fn relevant_masks_exclude_edges() {
        let rook_a1 = Slider::Rook.relevant_mask(Square::A1);
        assert_eq!(rook_a1.popcount(), 12);
        assert!(!rook_a1.contains(Square::H1));
        assert!(!rook_a1.contains(Square::A8));
        assert_eq!(Slider::Bishop.relevant_mask(sq("d4")).popcount(), 9);
        assert_eq!(Slider::Rook.relevant_mask(sq("d4")).popcount(), 10);
    }

    #[test]
    fn lookups_match_ray_walk_on_sampled_occupancies() {
        // Deterministic xorshift sample of sparse and dense occupancies
        let mut state = 0x2545_f491_4f6c_dd1du64;
        for _ in 0..2000 {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            let occupied = Bitboard(state & (state >> 3));
            for from in Square::all() {
                assert_eq!(
                    bishop_attacks(from, occupied),
                    Slider::Bishop.attacks_slow(from, occupied)
                );
                assert_eq!(
                    rook_attacks(from, occupied),
                    Slider::Rook.attacks_slow(from, occupied)
                );
            }
        }
    }
}
