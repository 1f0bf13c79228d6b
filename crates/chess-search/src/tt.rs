//! Transposition table.
//!
//! One entry per slot, addressed by the low bits of the Zobrist key. The
//! full key is stored and checked on every probe, so index collisions are
//! misses, never wrong answers.

use crate::score::{from_tt, to_tt};
use crate::search::ONE_PLY;
use chess_core::Move;
use tracing::trace;

/// How a stored score relates to the true value of the position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// The score is exact.
    Exact,
    /// The search failed high: the true value is at least the score.
    Lower,
    /// The search failed low: the true value is at most the score.
    Upper,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtEntry {
    pub key: u64,
    /// Remaining depth the entry was searched to, in search depth units.
    pub depth: i32,
    pub bound: Bound,
    /// Score relative to the node that stored it (see [`crate::score::to_tt`]).
    pub score: i32,
    /// [`Move::encode`] of the best move, or 0.
    pub best_move: u32,
    pub generation: u8,
}

impl TtEntry {
    /// The stored best move, if any.
    pub fn best_move(&self) -> Option<Move> {
        Move::decode(self.best_move)
    }

    /// The stored score re-based to `ply`, if the entry is deep enough and
    /// its bound settles the window `(alpha, beta)`.
    pub fn usable_score(&self, depth: i32, alpha: i32, beta: i32, ply: usize) -> Option<i32> {
        if self.depth < depth {
            return None;
        }
        let score = from_tt(self.score, ply);
        match self.bound {
            Bound::Exact => Some(score),
            Bound::Lower if score >= beta => Some(score),
            Bound::Upper if score <= alpha => Some(score),
            _ => None,
        }
    }
}

/// A fixed-size, single-writer transposition table.
#[derive(Debug)]
pub struct TranspositionTable {
    slots: Vec<Option<TtEntry>>,
    generation: u8,
    generation_wrap: u8,
    /// In the fractional depth units entries carry.
    replacement_margin: i32,
}

impl TranspositionTable {
    /// A table using at most `megabytes` of memory, rounded down to a power
    /// of two slots. `replacement_margin` is in whole plies.
    pub fn new(megabytes: usize, generation_wrap: u8, replacement_margin: i32) -> Self {
        let len = slot_count::<Option<TtEntry>>(megabytes);
        TranspositionTable {
            slots: vec![None; len],
            generation: 0,
            generation_wrap: generation_wrap.max(2),
            replacement_margin: replacement_margin * ONE_PLY,
        }
    }

    /// Changes the size, generation wrap and replacement margin. Resizing
    /// drops every entry.
    pub fn configure(&mut self, megabytes: usize, generation_wrap: u8, replacement_margin: i32) {
        let len = slot_count::<Option<TtEntry>>(megabytes);
        if len != self.slots.len() {
            self.slots = vec![None; len];
        }
        self.generation_wrap = generation_wrap.max(2);
        self.generation %= self.generation_wrap;
        self.replacement_margin = replacement_margin * ONE_PLY;
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn generation(&self) -> u8 {
        self.generation
    }

    #[inline]
    fn index(&self, key: u64) -> usize {
        (key as usize) & (self.slots.len() - 1)
    }

    /// The entry stored for exactly this key.
    pub fn get(&self, key: u64) -> Option<TtEntry> {
        self.slots[self.index(key)].filter(|entry| entry.key == key)
    }

    /// Stores a search result. `score` is relative to the root and is
    /// re-based to the node at `ply`.
    ///
    /// The occupant of the slot is kept only if it belongs to another
    /// position, was written in the current generation and is deeper than
    /// the newcomer by at least the replacement margin.
    pub fn put(
        &mut self,
        key: u64,
        depth: i32,
        bound: Bound,
        score: i32,
        best_move: Option<Move>,
        ply: usize,
    ) {
        let index = self.index(key);
        let mut best_move = best_move.map_or(0, Move::encode);
        if let Some(old) = self.slots[index] {
            if old.key == key {
                if best_move == 0 {
                    best_move = old.best_move;
                }
            } else if old.generation == self.generation
                && old.depth - depth >= self.replacement_margin
            {
                return;
            }
        }
        self.slots[index] = Some(TtEntry {
            key,
            depth,
            bound,
            score: to_tt(score, ply),
            best_move,
            generation: self.generation,
        });
    }

    /// Removes every entry matching `predicate`; returns how many went.
    pub fn remove<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&TtEntry) -> bool,
    {
        let mut removed = 0;
        for slot in &mut self.slots {
            if slot.as_ref().is_some_and(&mut predicate) {
                *slot = None;
                removed += 1;
            }
        }
        removed
    }

    /// Generations elapsed since `entry` was written.
    pub fn age(&self, entry: &TtEntry) -> u8 {
        let wrap = self.generation_wrap as u16;
        ((self.generation as u16 + wrap - entry.generation as u16 % wrap) % wrap) as u8
    }

    /// Drops entries written more than `max_age` generations ago.
    pub fn age_out(&mut self, max_age: u8) -> usize {
        let generation = self.generation;
        let wrap = self.generation_wrap as u16;
        let removed = self.remove(|entry| {
            let age = (generation as u16 + wrap - entry.generation as u16 % wrap) % wrap;
            age > max_age as u16
        });
        trace!("Aged out {} entries older than {} generations", removed, max_age);
        removed
    }

    /// Starts a new generation, wrapping at the configured modulus.
    pub fn new_generation(&mut self) {
        self.generation = (self.generation + 1) % self.generation_wrap;
    }

    /// Occupied slots among the first thousand that belong to the current
    /// generation, in permille.
    pub fn hashfull(&self) -> u32 {
        let sample = self.slots.len().min(1000);
        let used = self.slots[..sample]
            .iter()
            .flatten()
            .filter(|entry| entry.generation == self.generation)
            .count();
        (used * 1000 / sample.max(1)) as u32
    }

    pub fn clear(&mut self) {
        self.slots.fill(None);
        self.generation = 0;
    }
}

/// Largest power of two number of `T` that fits into `megabytes`.
pub(crate) fn slot_count<T>(megabytes: usize) -> usize {
    let bytes = megabytes.max(1) * 1024 * 1024;
    let fit = (bytes / std::mem::size_of::<T>().max(1)).max(1);
    1 << (usize::BITS - 1 - fit.leading_zeros())
}
