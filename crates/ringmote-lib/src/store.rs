//! Authoritative in-memory LED state — single-owner store with one lock.
//!
//! The store owns the live [`RingSnapshot`] and is the only place ring
//! state is mutated. UI edits and background palette applies may share
//! the store across threads, so every operation takes the one internal
//! mutex for its whole duration — `apply_palette` is atomic with respect
//! to `get`/`set` and no reader ever observes a half-applied palette.

use std::sync::Mutex;

use crate::error::{Result, RingmoteError};
use crate::led::LedState;
use crate::palette::Palette;

/// The current state of every LED on the ring, indexed 0..led_count.
pub type RingSnapshot = Vec<LedState>;

/// In-memory mapping from LED index to current color/brightness.
///
/// Created at startup with a uniform default color; never persisted.
#[derive(Debug)]
pub struct LedStateStore {
    leds: Mutex<RingSnapshot>,
}

impl LedStateStore {
    /// Create a store for `led_count` LEDs, all set to the startup default.
    pub fn new(led_count: usize) -> Self {
        Self::with_initial(led_count, LedState::default())
    }

    /// Create a store with every LED set to `initial`.
    pub fn with_initial(led_count: usize, initial: LedState) -> Self {
        LedStateStore {
            leds: Mutex::new(vec![initial; led_count]),
        }
    }

    /// Number of LEDs on the ring.
    pub fn led_count(&self) -> usize {
        self.lock().len()
    }

    /// The state at `index`.
    pub fn get(&self, index: usize) -> Result<LedState> {
        let leds = self.lock();
        leds.get(index).copied().ok_or(RingmoteError::OutOfRange {
            index,
            count: leds.len(),
        })
    }

    /// Replace the state at `index` wholesale.
    pub fn set(&self, index: usize, state: LedState) -> Result<()> {
        let mut leds = self.lock();
        let count = leds.len();
        match leds.get_mut(index) {
            Some(slot) => {
                *slot = state;
                Ok(())
            }
            None => Err(RingmoteError::OutOfRange { index, count }),
        }
    }

    /// Replace the entire snapshot with a palette's colors.
    ///
    /// Fails with `SizeMismatch` before touching any entry, so the
    /// existing snapshot is left unchanged on error.
    pub fn apply_palette(&self, palette: &Palette) -> Result<()> {
        let mut leds = self.lock();
        if palette.len() != leds.len() {
            return Err(RingmoteError::SizeMismatch {
                expected: leds.len(),
                actual: palette.len(),
            });
        }
        leds.copy_from_slice(&palette.colors);
        Ok(())
    }

    /// An owned copy of the current snapshot, for rendering or bulk send.
    pub fn snapshot(&self) -> RingSnapshot {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, RingSnapshot> {
        // A poisoned lock means another thread panicked mid-mutation;
        // every mutation here is a plain slot write, so the data is
        // still structurally sound.
        self.leds.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette;

    const N: usize = 24;

    #[test]
    fn starts_with_uniform_default() {
        let store = LedStateStore::new(N);
        assert_eq!(store.led_count(), N);
        for i in 0..N {
            assert_eq!(store.get(i).unwrap(), LedState::default());
        }
    }

    #[test]
    fn set_get_roundtrip() {
        let store = LedStateStore::new(N);
        let s = LedState::new(1, 2, 3, 4);
        store.set(5, s).unwrap();
        assert_eq!(store.get(5).unwrap(), s);
        // Neighbors untouched.
        assert_eq!(store.get(4).unwrap(), LedState::default());
        assert_eq!(store.get(6).unwrap(), LedState::default());
    }

    #[test]
    fn get_out_of_range() {
        let store = LedStateStore::new(N);
        let err = store.get(N).unwrap_err();
        assert!(matches!(
            err,
            RingmoteError::OutOfRange { index: 24, count: 24 }
        ));
    }

    #[test]
    fn set_out_of_range() {
        let store = LedStateStore::new(N);
        let err = store.set(100, LedState::OFF).unwrap_err();
        assert!(matches!(
            err,
            RingmoteError::OutOfRange { index: 100, count: 24 }
        ));
    }

    #[test]
    fn apply_palette_replaces_snapshot() {
        let store = LedStateStore::new(N);
        let p = palette::find_palette("Christmas", N).unwrap();
        store.apply_palette(&p).unwrap();
        assert_eq!(store.snapshot(), p.colors);
    }

    #[test]
    fn apply_palette_wrong_size_leaves_snapshot_unchanged() {
        let store = LedStateStore::new(N);
        let before = store.snapshot();
        let p = palette::find_palette("Rainbow", 10).unwrap();
        let err = store.apply_palette(&p).unwrap_err();
        assert!(matches!(
            err,
            RingmoteError::SizeMismatch { expected: 24, actual: 10 }
        ));
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn snapshot_is_a_copy() {
        let store = LedStateStore::new(N);
        let snap = store.snapshot();
        store.set(0, LedState::OFF).unwrap();
        // The earlier snapshot must not observe the later write.
        assert_eq!(snap[0], LedState::default());
    }

    #[test]
    fn concurrent_apply_is_atomic() {
        use std::sync::Arc;

        let store = Arc::new(LedStateStore::new(N));
        let red = palette::find_palette("Christmas", N).unwrap();
        let off = palette::find_palette("All Off", N).unwrap();

        let writer = {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                for _ in 0..200 {
                    store.apply_palette(&red).unwrap();
                    store.apply_palette(&off).unwrap();
                }
            })
        };

        // Readers must only ever see one palette or the other in full.
        for _ in 0..200 {
            let snap = store.snapshot();
            let all_off = snap.iter().all(|c| *c == LedState::OFF);
            let christmas = snap
                .iter()
                .enumerate()
                .all(|(i, c)| {
                    if i % 2 == 0 {
                        c.red == 255 && c.green == 0
                    } else {
                        c.red == 0 && c.green == 255
                    }
                });
            let is_default = snap.iter().all(|c| *c == LedState::default());
            assert!(
                all_off || christmas || is_default,
                "observed a half-applied palette"
            );
        }

        writer.join().unwrap();
    }
}
