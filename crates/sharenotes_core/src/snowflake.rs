//! Snowflake-style 64-bit id generation.
//!
//! Ids pack `[41 bits timestamp][10 bits worker id][12 bits sequence]`,
//! most significant bit first. The timestamp counts milliseconds since
//! [`EPOCH_MILLIS`], which gives each worker 4096 ids per millisecond for
//! roughly 69 years. The top bit is always clear, so ids also fit an `i64`.

use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Custom epoch: 2024-01-01T00:00:00Z in Unix milliseconds.
pub const EPOCH_MILLIS: u64 = 1_704_067_200_000;

pub const TIMESTAMP_BITS: u32 = 41;
pub const WORKER_ID_BITS: u32 = 10;
pub const SEQUENCE_BITS: u32 = 12;

/// Largest accepted worker id (1023).
pub const MAX_WORKER_ID: u16 = (1 << WORKER_ID_BITS) - 1;
const MAX_SEQUENCE: u16 = (1 << SEQUENCE_BITS) - 1;
const MAX_TIMESTAMP: u64 = (1 << TIMESTAMP_BITS) - 1;

const WORKER_ID_SHIFT: u32 = SEQUENCE_BITS;
const TIMESTAMP_SHIFT: u32 = WORKER_ID_BITS + SEQUENCE_BITS;

/// Errors raised while constructing a generator or minting an id.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SnowflakeError {
    #[error("worker id {0} is outside 0..=1023")]
    InvalidWorkerId(i64),

    /// The wall clock reads earlier than the last issued timestamp. Retrying
    /// immediately will fail again; the clock has to catch up first.
    #[error("clock moved backwards: last id at {last_ms}ms, clock now at {now_ms}ms since epoch")]
    ClockRegression { last_ms: u64, now_ms: u64 },

    #[error("clock reads {0}ms since Unix epoch, before the generator epoch")]
    ClockBeforeEpoch(u64),

    #[error("timestamp {0}ms since epoch no longer fits in 41 bits")]
    TimestampOverflow(u64),

    #[error("generator state lock is poisoned")]
    Poisoned,
}

/// Millisecond wall-clock source.
pub trait Clock: Send + Sync {
    /// Milliseconds since the Unix epoch.
    fn unix_millis(&self) -> u64;
}

/// [`Clock`] backed by [`SystemTime`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn unix_millis(&self) -> u64 {
        // A pre-1970 clock reads as 0 and is rejected as ClockBeforeEpoch.
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as u64)
            .unwrap_or(0)
    }
}

#[derive(Debug, Default)]
struct GeneratorState {
    last_timestamp: u64,
    sequence: u16,
}

/// Time-ordered id generator for a single worker id.
///
/// Calls are linearized through one mutex, so every id returned by an
/// instance is strictly greater than all ids it returned before.
pub struct SnowflakeGenerator<C: Clock = SystemClock> {
    worker_id: u16,
    clock: C,
    state: Mutex<GeneratorState>,
}

impl SnowflakeGenerator<SystemClock> {
    /// Create a generator reading the system clock.
    ///
    /// # Errors
    /// Returns [`SnowflakeError::InvalidWorkerId`] outside `0..=1023`.
    pub fn new(worker_id: i64) -> Result<Self, SnowflakeError> {
        Self::with_clock(worker_id, SystemClock)
    }
}

impl<C: Clock> SnowflakeGenerator<C> {
    /// Create a generator reading `clock`.
    ///
    /// # Errors
    /// Returns [`SnowflakeError::InvalidWorkerId`] outside `0..=1023`.
    pub fn with_clock(worker_id: i64, clock: C) -> Result<Self, SnowflakeError> {
        let worker_id = u16::try_from(worker_id)
            .ok()
            .filter(|id| *id <= MAX_WORKER_ID)
            .ok_or(SnowflakeError::InvalidWorkerId(worker_id))?;
        Ok(Self {
            worker_id,
            clock,
            state: Mutex::new(GeneratorState::default()),
        })
    }

    pub fn worker_id(&self) -> u16 {
        self.worker_id
    }

    /// Mint the next id.
    ///
    /// When the 4096 sequence values of the current millisecond are used up
    /// this spins on the clock, holding the lock, until the next millisecond.
    /// Sustained demand above that rate shows up as latency, not duplicates.
    ///
    /// # Errors
    /// - [`SnowflakeError::ClockRegression`] when the clock is behind the last
    ///   issued timestamp. Generator state is left untouched.
    /// - [`SnowflakeError::ClockBeforeEpoch`] / [`SnowflakeError::TimestampOverflow`]
    ///   when the clock is outside the representable range.
    /// - [`SnowflakeError::Poisoned`] if a previous holder panicked.
    pub fn generate(&self) -> Result<u64, SnowflakeError> {
        let mut state = self.state.lock().map_err(|_| SnowflakeError::Poisoned)?;
        let now = self.elapsed_millis()?;

        if now < state.last_timestamp {
            return Err(SnowflakeError::ClockRegression {
                last_ms: state.last_timestamp,
                now_ms: now,
            });
        }

        let (timestamp, sequence) = if now == state.last_timestamp {
            let next = (state.sequence + 1) & MAX_SEQUENCE;
            if next == 0 {
                (self.wait_next_millis(state.last_timestamp)?, 0)
            } else {
                (now, next)
            }
        } else {
            (now, 0)
        };

        if timestamp > MAX_TIMESTAMP {
            return Err(SnowflakeError::TimestampOverflow(timestamp));
        }

        state.last_timestamp = timestamp;
        state.sequence = sequence;
        Ok(self.compose(timestamp, sequence))
    }

    fn compose(&self, timestamp: u64, sequence: u16) -> u64 {
        (timestamp << TIMESTAMP_SHIFT)
            | (u64::from(self.worker_id) << WORKER_ID_SHIFT)
            | u64::from(sequence)
    }

    fn elapsed_millis(&self) -> Result<u64, SnowflakeError> {
        let unix = self.clock.unix_millis();
        unix.checked_sub(EPOCH_MILLIS)
            .ok_or(SnowflakeError::ClockBeforeEpoch(unix))
    }

    fn wait_next_millis(&self, last: u64) -> Result<u64, SnowflakeError> {
        loop {
            let now = self.elapsed_millis()?;
            if now > last {
                return Ok(now);
            }
            if now < last {
                return Err(SnowflakeError::ClockRegression {
                    last_ms: last,
                    now_ms: now,
                });
            }
            std::hint::spin_loop();
        }
    }
}

/// Fields unpacked from a Snowflake id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnowflakeParts {
    /// Milliseconds since [`EPOCH_MILLIS`].
    pub timestamp: u64,
    pub worker_id: u16,
    pub sequence: u16,
}

impl SnowflakeParts {
    pub fn decompose(id: u64) -> Self {
        Self {
            timestamp: id >> TIMESTAMP_SHIFT,
            worker_id: ((id >> WORKER_ID_SHIFT) & u64::from(MAX_WORKER_ID)) as u16,
            sequence: (id & u64::from(MAX_SEQUENCE)) as u16,
        }
    }

    /// Mint time in Unix milliseconds.
    pub fn unix_millis(&self) -> u64 {
        self.timestamp + EPOCH_MILLIS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ManualClock;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::{Arc, Barrier};
    use std::thread;

    /// Clock that advances one millisecond every `reads_per_tick` reads.
    struct TickingClock {
        base: u64,
        reads: AtomicU64,
        reads_per_tick: u64,
    }

    impl Clock for TickingClock {
        fn unix_millis(&self) -> u64 {
            let read = self.reads.fetch_add(1, Ordering::SeqCst);
            self.base + read / self.reads_per_tick
        }
    }

    #[test]
    fn worker_id_bounds() {
        assert_eq!(
            SnowflakeGenerator::new(-1).err(),
            Some(SnowflakeError::InvalidWorkerId(-1))
        );
        assert_eq!(
            SnowflakeGenerator::new(1024).err(),
            Some(SnowflakeError::InvalidWorkerId(1024))
        );
        assert_eq!(SnowflakeGenerator::new(0).expect("worker 0").worker_id(), 0);
        let highest = SnowflakeGenerator::new(1023).expect("worker 1023");
        assert_eq!(highest.worker_id(), 1023);
    }

    #[test]
    fn ids_strictly_increase_and_stay_distinct() {
        let generator = SnowflakeGenerator::new(42).expect("generator");
        let mut seen = HashSet::new();
        let mut previous = 0;
        for _ in 0..5_000 {
            let id = generator.generate().expect("generate");
            assert!(id > previous, "{} should be greater than {}", id, previous);
            assert!(seen.insert(id));
            assert_eq!(SnowflakeParts::decompose(id).worker_id, 42);
            previous = id;
        }
        assert!(previous < (1 << 63));
    }

    #[test]
    fn monotonic_for_boundary_worker_ids() {
        for worker_id in [0, 1, 511, 1023] {
            let generator = SnowflakeGenerator::new(worker_id).expect("generator");
            let ids: Vec<u64> = (0..100)
                .map(|_| generator.generate().expect("generate"))
                .collect();
            assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
        }
    }

    #[test]
    fn packs_fields_in_documented_order() {
        let clock = ManualClock::at(EPOCH_MILLIS + 1_000);
        let generator = SnowflakeGenerator::with_clock(5, clock).expect("generator");

        let first = generator.generate().expect("first");
        let second = generator.generate().expect("second");
        assert_eq!(first, (1_000 << 22) | (5 << 12));
        assert_eq!(second, first + 1);
        assert_eq!(
            SnowflakeParts::decompose(second),
            SnowflakeParts {
                timestamp: 1_000,
                worker_id: 5,
                sequence: 1,
            }
        );
        assert_eq!(
            SnowflakeParts::decompose(second).unix_millis(),
            EPOCH_MILLIS + 1_000
        );
    }

    #[test]
    fn sequence_resets_when_millisecond_advances() {
        let clock = ManualClock::at(EPOCH_MILLIS + 10);
        let generator = SnowflakeGenerator::with_clock(1, clock.clone()).expect("generator");
        generator.generate().expect("seq 0");
        generator.generate().expect("seq 1");
        clock.set(EPOCH_MILLIS + 11);
        let id = generator.generate().expect("next ms");
        let parts = SnowflakeParts::decompose(id);
        assert_eq!(parts.timestamp, 11);
        assert_eq!(parts.sequence, 0);
    }

    #[test]
    fn sequence_exhaustion_waits_for_next_millisecond() {
        let clock = TickingClock {
            base: EPOCH_MILLIS + 500,
            reads: AtomicU64::new(0),
            reads_per_tick: 5_000,
        };
        let generator = SnowflakeGenerator::with_clock(3, clock).expect("generator");

        let mut ids = Vec::with_capacity(4_097);
        for _ in 0..4_097 {
            ids.push(generator.generate().expect("generate"));
        }

        let last_in_ms = SnowflakeParts::decompose(ids[4_095]);
        assert_eq!(last_in_ms.timestamp, 500);
        assert_eq!(last_in_ms.sequence, 4_095);

        let rolled = SnowflakeParts::decompose(ids[4_096]);
        assert_eq!(rolled.timestamp, 501);
        assert_eq!(rolled.sequence, 0);
        assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn clock_regression_refuses_to_mint() {
        let clock = ManualClock::at(EPOCH_MILLIS + 2_000);
        let generator = SnowflakeGenerator::with_clock(7, clock.clone()).expect("generator");
        let before = generator.generate().expect("before regression");

        clock.set(EPOCH_MILLIS + 1_995);
        assert_eq!(
            generator.generate(),
            Err(SnowflakeError::ClockRegression {
                last_ms: 2_000,
                now_ms: 1_995,
            })
        );

        // A failed call must not disturb the sequence for the issued millisecond.
        clock.set(EPOCH_MILLIS + 2_000);
        let same_ms = generator.generate().expect("same millisecond");
        assert_eq!(same_ms, before + 1);
    }

    #[test]
    fn clock_before_epoch_is_rejected() {
        let clock = ManualClock::at(EPOCH_MILLIS - 1);
        let generator = SnowflakeGenerator::with_clock(0, clock).expect("generator");
        assert_eq!(
            generator.generate(),
            Err(SnowflakeError::ClockBeforeEpoch(EPOCH_MILLIS - 1))
        );
    }

    #[test]
    fn timestamp_overflow_is_rejected() {
        let clock = ManualClock::at(EPOCH_MILLIS + MAX_TIMESTAMP + 1);
        let generator = SnowflakeGenerator::with_clock(0, clock).expect("generator");
        assert_eq!(
            generator.generate(),
            Err(SnowflakeError::TimestampOverflow(MAX_TIMESTAMP + 1))
        );
    }

    #[test]
    fn concurrent_callers_never_share_an_id() {
        const THREADS: usize = 8;
        const PER_THREAD: usize = 2_000;

        let generator = Arc::new(SnowflakeGenerator::new(9).expect("generator"));
        let barrier = Arc::new(Barrier::new(THREADS));
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let generator = generator.clone();
                let barrier = barrier.clone();
                thread::spawn(move || {
                    barrier.wait();
                    let ids: Vec<u64> = (0..PER_THREAD)
                        .map(|_| generator.generate().expect("generate"))
                        .collect();
                    // Each caller still observes its own ids in order.
                    assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
                    ids
                })
            })
            .collect();

        let mut all = HashSet::new();
        for handle in handles {
            for id in handle.join().expect("worker join") {
                assert!(all.insert(id), "duplicate id {}", id);
            }
        }
        assert_eq!(all.len(), THREADS * PER_THREAD);
    }
}
