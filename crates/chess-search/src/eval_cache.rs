//! Lock-less cache of static evaluations.
//!
//! Each slot is a pair of `AtomicU64`s holding `key ^ payload` and `payload`.
//! A reader recomputes the key from both words, so a slot torn by a
//! concurrent writer fails verification and reads as a miss.

use crate::tt::slot_count;
use std::sync::atomic::{AtomicU64, Ordering};

const PRESENT: u64 = 1 << 32;

#[derive(Debug, Default)]
struct Slot {
    check: AtomicU64,
    payload: AtomicU64,
}

#[derive(Debug)]
pub struct EvalCache {
    slots: Vec<Slot>,
    generation: u8,
}

impl EvalCache {
    pub fn new(megabytes: usize) -> Self {
        let len = slot_count::<Slot>(megabytes);
        EvalCache {
            slots: (0..len).map(|_| Slot::default()).collect(),
            generation: 0,
        }
    }

    /// Resizes to `megabytes`, dropping all entries if the size changes.
    pub fn resize(&mut self, megabytes: usize) {
        if slot_count::<Slot>(megabytes) != self.slots.len() {
            *self = EvalCache::new(megabytes);
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    fn slot(&self, key: u64) -> &Slot {
        &self.slots[(key as usize) & (self.slots.len() - 1)]
    }

    /// The cached score for `key`, if present and intact.
    pub fn get(&self, key: u64) -> Option<i32> {
        let slot = self.slot(key);
        let payload = slot.payload.load(Ordering::Relaxed);
        let check = slot.check.load(Ordering::Relaxed);
        if check ^ payload != key || payload & PRESENT == 0 {
            return None;
        }
        Some(payload as u16 as i16 as i32)
    }

    /// The generation tag stored with `key`, if present.
    pub fn generation_of(&self, key: u64) -> Option<u8> {
        let slot = self.slot(key);
        let payload = slot.payload.load(Ordering::Relaxed);
        let check = slot.check.load(Ordering::Relaxed);
        (check ^ payload == key && payload & PRESENT != 0).then_some((payload >> 16) as u8)
    }

    /// Stores `score`, always replacing the slot's previous content.
    pub fn put(&self, key: u64, score: i32) {
        let clamped = score.clamp(i16::MIN as i32, i16::MAX as i32) as i16;
        let payload = (clamped as u16 as u64) | ((self.generation as u64) << 16) | PRESENT;
        let slot = self.slot(key);
        slot.check.store(key ^ payload, Ordering::Relaxed);
        slot.payload.store(payload, Ordering::Relaxed);
    }

    pub fn new_generation(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    pub fn clear(&mut self) {
        for slot in &self.slots {
            slot.check.store(0, Ordering::Relaxed);
            slot.payload.store(0, Ordering::Relaxed);
        }
        self.generation = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stores_and_verifies() {
        let cache = EvalCache::new(1);
        assert_eq!(cache.get(42), None);
        cache.put(42, -137);
        assert_eq!(cache.get(42), Some(-137));
        // Same slot, different key.
        assert_eq!(cache.get(42 ^ (cache.capacity() as u64) << 1), None);
    }

    #[test]
    fn key_zero_is_not_a_false_hit() {
        let cache = EvalCache::new(1);
        assert_eq!(cache.get(0), None);
    }

    #[test]
    fn corrupted_slot_is_a_miss() {
        let cache = EvalCache::new(1);
        let key = 0xDEAD_BEEF_1234_5678;
        cache.put(key, 55);
        let slot = cache.slot(key);
        // Simulate a torn write: payload from another store, check from ours.
        slot.payload.fetch_xor(0x0000_0000_0000_0F00, Ordering::Relaxed);
        assert_eq!(cache.get(key), None);
    }

    #[test]
    fn generation_tag_and_clear() {
        let mut cache = EvalCache::new(1);
        cache.new_generation();
        cache.put(9, 1);
        assert_eq!(cache.generation_of(9), Some(1));
        cache.clear();
        assert_eq!(cache.get(9), None);
    }

    #[test]
    fn scores_are_clamped() {
        let cache = EvalCache::new(1);
        cache.put(3, 100_000);
        assert_eq!(cache.get(3), Some(i16::MAX as i32));
    }

    #[test]
    fn shared_between_threads() {
        let cache = std::sync::Arc::new(EvalCache::new(1));
        let handles: Vec<_> = (0..4u64)
            .map(|t| {
                let cache = cache.clone();
                std::thread::spawn(move || {
                    for key in 0..1000u64 {
                        cache.put(key * 4 + t + 1, (key as i32) - 500);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        for key in 0..1000u64 {
            if let Some(score) = cache.get(key * 4 + 1) {
                assert_eq!(score, key as i32 - 500);
            }
        }
    }
}
