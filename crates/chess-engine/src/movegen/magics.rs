//! Magic bitboard tables for sliding piece attack generation.
//!
//! Magic bitboards use a perfect hashing technique to map blocker configurations
//! to precomputed attack bitboards in O(1) time. The tables used at run time
//! are built from known multipliers, which were found offline by the same
//! sparse search [`AttackTables::generate`] runs.

use crate::geometry::{bishop_fill, bishop_mask, rook_fill, rook_mask};
use crate::Bitboard;
use chess_core::Square;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::convert::Infallible;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::debug;

/// Default seed for the magic search.
pub const MAGIC_SEED: u64 = 0x2545_F491_4F6C_DD1D;

/// Candidates drawn per parallel batch.
const CANDIDATE_BATCH: usize = 64;

/// Batches tried per square before a full search gives up.
pub const SEARCH_BUDGET: usize = 1 << 16;

const KNOWN_ROOK_MAGICS: [u64; 64] = [
    0x0080002040008012, 0x0040400020001000, 0x0200220008401080, 0x8200041042000820,
    0x0480040002800800, 0x0300140002010008, 0x82800F0002000280, 0x0500020828804100,
    0x0809800081400020, 0x0000404000201000, 0x0622004080220012, 0x0402001009422200,
    0x4500800400800800, 0x0041800200140080, 0x0003000100040A00, 0x010600009C010052,
    0x1520008080004000, 0x0001010040008020, 0x0202420012820020, 0x0880808008001000,
    0x0800808008000400, 0x4202008002800400, 0x0800040042810810, 0x018002000041009C,
    0x08014002800080A0, 0x0070005840002000, 0x08C0100080802000, 0x4220200900100104,
    0x4000040080080080, 0x081A000280040080, 0x024001C400100208, 0x1004409200010864,
    0x8040400020800080, 0x0000402000401000, 0x0200100080802008, 0x8012000842001020,
    0x0908000880800400, 0x8944000802020010, 0x8840660904000890, 0x0C4000488A000104,
    0x0000804000218004, 0x060848201000C000, 0x2144460080220010, 0x0041100021030008,
    0x0804050008010010, 0x218200104C0A0018, 0x0800820821240010, 0x2480010080420004,
    0x0001002040800100, 0x1400402100920200, 0x00B0080400200020, 0x0000800800100080,
    0x0802003460900A00, 0x00C0020004008080, 0xA801000200842100, 0x00A0010400408200,
    0x0041018006211441, 0x0081008044122202, 0x0000102001040841, 0x0009000810000421,
    0xE402000804102002, 0x0803000400020801, 0x0000100088010204, 0x0201010084002042,
];

const KNOWN_BISHOP_MAGICS: [u64; 64] = [
    0x9008100410840010, 0x8C300105040C8808, 0x0108020410201028, 0x1011050204000001,
    0x010C030800400810, 0x2682023262109021, 0x4484480290102208, 0x0040440401011000,
    0x20A110E00800A880, 0x070C8810030A13A0, 0x1060100400802820, 0x2A12082080204008,
    0x0048011040208080, 0x8000010402422800, 0x9020206802082000, 0x000080808401A020,
    0x00B0010A20092400, 0x0102809C18080120, 0x0058022C00240014, 0x5018011222004400,
    0x8102000400940000, 0x0289000190009000, 0x080609040A010400, 0x0003002220880402,
    0x0002200008081052, 0x0001601510020234, 0x0320820010202600, 0x31080800208A00A0,
    0x010C840009802002, 0xA824002005101000, 0xE04104001200D400, 0x000430810022010C,
    0x0004044004041061, 0x0820900808450808, 0x0022008210100020, 0x0000042008040100,
    0x0004010201040084, 0x10021020400A0804, 0x0102020220084805, 0x0020A10200090C80,
    0xA148080908080420, 0x1002011008000260, 0x080010180408A800, 0xA00480201900C800,
    0x40A0081100400C00, 0x0001200401008C90, 0x2408180808801050, 0x0084008210400201,
    0x3048821003A00108, 0x0101010082A00080, 0x0202004044104000, 0x0000020084040080,
    0x0400004005010008, 0x0460080248020180, 0x04400202C4010000, 0x0050300200404100,
    0x0102010501109200, 0x0000251101012034, 0x8808800025080849, 0x0208240002050400,
    0x0200400020042404, 0x0204131021092108, 0x00005010B200C402, 0x0060081001035011,
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MagicError {
    #[error("no {slider:?} magic for {square} within {batches} batches")]
    Exhausted {
        slider: Slider,
        square: Square,
        batches: usize,
    },
}

/// Sliding piece kinds that use magic lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slider {
    Rook,
    Bishop,
}

impl Slider {
    /// Relevant occupancy mask for this slider on `sq`.
    pub fn mask(self, sq: Square) -> Bitboard {
        match self {
            Slider::Rook => rook_mask(sq),
            Slider::Bishop => bishop_mask(sq),
        }
    }

    /// Reference attacks computed by occluded fill.
    pub fn attacks_by_fill(self, sq: Square, occupied: Bitboard) -> Bitboard {
        match self {
            Slider::Rook => rook_fill(sq, occupied),
            Slider::Bishop => bishop_fill(sq, occupied),
        }
    }

    /// The built-in multiplier for `sq`.
    pub fn known_magic(self, sq: Square) -> u64 {
        match self {
            Slider::Rook => KNOWN_ROOK_MAGICS[sq.index() as usize],
            Slider::Bishop => KNOWN_BISHOP_MAGICS[sq.index() as usize],
        }
    }
}

/// Magic entry for a single square.
#[derive(Debug, Clone, Copy, Default)]
pub struct Magic {
    /// Mask of relevant blocker squares (excludes edges).
    pub mask: Bitboard,
    /// The magic multiplier for this square.
    pub magic: u64,
    /// Right shift amount (64 - index bits).
    pub shift: u8,
    /// Offset into the flat attack table.
    pub offset: usize,
}

impl Magic {
    /// Table index for the given occupancy, relative to `offset`.
    #[inline]
    pub fn index(&self, occupied: Bitboard) -> usize {
        let relevant = occupied & self.mask;
        (relevant.0.wrapping_mul(self.magic) >> self.shift) as usize
    }
}

/// A magic multiplier together with the attack table it indexes.
#[derive(Debug, Clone)]
pub struct FoundMagic {
    pub magic: u64,
    pub shift: u8,
    pub table: Vec<Bitboard>,
}

/// Stores all precomputed attack tables.
pub struct AttackTables {
    /// Rook then bishop attack sets, addressed through `Magic::offset`.
    pub attacks: Vec<Bitboard>,
    pub rook_magics: [Magic; 64],
    pub bishop_magics: [Magic; 64],
}

static ATTACK_TABLES: OnceLock<AttackTables> = OnceLock::new();

/// Gets the global attack tables, initializing if necessary.
pub fn get_attack_tables() -> &'static AttackTables {
    ATTACK_TABLES.get_or_init(AttackTables::known)
}

impl AttackTables {
    /// Tables indexed by the built-in multipliers.
    pub fn known() -> Self {
        let tables = Self::assemble(|slider, sq, mask| {
            let magic = slider.known_magic(sq);
            let shift = (64 - mask.count()) as u8;
            let mut table = vec![Bitboard::EMPTY; 1 << mask.count()];
            for occ in mask.subsets() {
                table[(occ.0.wrapping_mul(magic) >> shift) as usize] =
                    slider.attacks_by_fill(sq, occ);
            }
            Ok::<_, Infallible>(FoundMagic { magic, shift, table })
        });
        match tables {
            Ok(tables) => tables,
            Err(never) => match never {},
        }
    }

    /// Searches a multiplier for every square from `seed`, with index bits
    /// equal to the mask size. Fails if some square is not solved within
    /// [`SEARCH_BUDGET`] batches.
    pub fn generate(seed: u64) -> Result<Self, MagicError> {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::assemble(|slider, sq, mask| {
            find_magic(sq, slider, mask.count(), &mut rng, SEARCH_BUDGET).ok_or(
                MagicError::Exhausted {
                    slider,
                    square: sq,
                    batches: SEARCH_BUDGET,
                },
            )
        })
    }

    fn assemble<E>(
        mut solve: impl FnMut(Slider, Square, Bitboard) -> Result<FoundMagic, E>,
    ) -> Result<Self, E> {
        let mut attacks = Vec::new();
        let mut rook_magics = [Magic::default(); 64];
        let mut bishop_magics = [Magic::default(); 64];

        for (slider, magics) in [
            (Slider::Rook, &mut rook_magics),
            (Slider::Bishop, &mut bishop_magics),
        ] {
            for sq in Square::all() {
                let mask = slider.mask(sq);
                let found = solve(slider, sq, mask)?;
                magics[sq.index() as usize] = Magic {
                    mask,
                    magic: found.magic,
                    shift: found.shift,
                    offset: attacks.len(),
                };
                attacks.extend_from_slice(&found.table);
            }
        }

        debug!(entries = attacks.len(), "magic attack tables built");
        Ok(AttackTables {
            attacks,
            rook_magics,
            bishop_magics,
        })
    }
}

/// Draws a sparse random candidate: few set bits hash better.
///
/// Candidates are not forced odd. Rooks on the seventh rank need the low
/// bit clear in practice.
fn sparse_random(rng: &mut StdRng) -> u64 {
    rng.gen::<u64>() & rng.gen::<u64>() & rng.gen::<u64>()
}

/// Builds the attack table for `magic`, or `None` on a destructive collision.
/// Two occupancies may share an index only if their attack sets agree.
pub fn try_magic(
    magic: u64,
    shift: u8,
    occupancies: &[Bitboard],
    references: &[Bitboard],
) -> Option<Vec<Bitboard>> {
    let mut scratch = Scratch::new(64 - shift as u32);
    scratch
        .fits(magic, shift, occupancies, references)
        .then(|| scratch.table)
}

/// Per-worker collision check state, reused across candidates. A slot is
/// live only if its stamp equals the current epoch, so nothing is cleared
/// between candidates.
struct Scratch {
    table: Vec<Bitboard>,
    stamps: Vec<u32>,
    epoch: u32,
}

impl Scratch {
    fn new(bits: u32) -> Self {
        Scratch {
            table: vec![Bitboard::EMPTY; 1 << bits],
            stamps: vec![0; 1 << bits],
            epoch: 0,
        }
    }

    fn fits(
        &mut self,
        magic: u64,
        shift: u8,
        occupancies: &[Bitboard],
        references: &[Bitboard],
    ) -> bool {
        if self.epoch == u32::MAX {
            self.stamps.fill(0);
            self.epoch = 0;
        }
        self.epoch += 1;
        for (occ, reference) in occupancies.iter().zip(references) {
            let index = (occ.0.wrapping_mul(magic) >> shift) as usize;
            if self.stamps[index] != self.epoch {
                self.stamps[index] = self.epoch;
                self.table[index] = *reference;
            } else if self.table[index] != *reference {
                return false;
            }
        }
        true
    }
}

/// Searches for a magic multiplier for `slider` on `sq` that indexes a table
/// of `1 << bits` entries. `bits` may be smaller than the mask size to look
/// for a tighter table. At most `max_batches` candidate batches are tried.
///
/// Each batch is drawn sequentially from `rng` and tested in parallel; the
/// first success in batch order wins, keeping the result independent of
/// thread scheduling.
pub fn find_magic(
    sq: Square,
    slider: Slider,
    bits: u32,
    rng: &mut StdRng,
    max_batches: usize,
) -> Option<FoundMagic> {
    let mask = slider.mask(sq);
    let shift = (64 - bits) as u8;
    let occupancies: Vec<Bitboard> = mask.subsets().collect();
    let references: Vec<Bitboard> = occupancies
        .iter()
        .map(|&occ| slider.attacks_by_fill(sq, occ))
        .collect();

    for _ in 0..max_batches {
        let batch: Vec<u64> = (0..CANDIDATE_BATCH)
            .map(|_| sparse_random(rng))
            .filter(|&candidate| (mask.0.wrapping_mul(candidate) >> 56).count_ones() >= 6)
            .collect();

        let winner = batch
            .par_iter()
            .map_init(
                || Scratch::new(bits),
                |scratch, &candidate| {
                    (candidate, scratch.fits(candidate, shift, &occupancies, &references))
                },
            )
            .find_first(|&(_, fits)| fits);

        if let Some((magic, _)) = winner {
            let table = try_magic(magic, shift, &occupancies, &references)?;
            return Some(FoundMagic { magic, shift, table });
        }
    }
    None
}

/// Returns bishop attacks for a square given occupied squares.
#[inline]
pub fn bishop_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    let tables = get_attack_tables();
    let magic = &tables.bishop_magics[sq.index() as usize];
    tables.attacks[magic.offset + magic.index(occupied)]
}

/// Returns rook attacks for a square given occupied squares.
#[inline]
pub fn rook_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    let tables = get_attack_tables();
    let magic = &tables.rook_magics[sq.index() as usize];
    tables.attacks[magic.offset + magic.index(occupied)]
}

/// Returns queen attacks (bishop + rook).
#[inline]
pub fn queen_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    bishop_attacks(sq, occupied) | rook_attacks(sq, occupied)
}
