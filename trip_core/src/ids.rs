//! Record ID generation.
//!
//! IDs combine a millisecond timestamp with a random suffix. Both inputs are
//! owned by the generator so tests can make them deterministic.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use std::cell::RefCell;

const ALPHANUMERIC: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const LOWER_ALPHANUMERIC: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Source of the current time
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Wall-clock time
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    pub fn from_millis(millis: i64) -> Self {
        Self(Utc.timestamp_millis_opt(millis).single().unwrap_or_default())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Source of uniformly distributed indices
pub trait RandomSource {
    /// A value in `0..upper`
    fn index(&self, upper: usize) -> usize;
}

/// The thread-local generator seeded from OS entropy
#[derive(Clone, Copy, Debug, Default)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn index(&self, upper: usize) -> usize {
        rand::rng().random_range(0..upper)
    }
}

/// Reproducible sequence from a fixed seed
pub struct SeededRandom {
    rng: RefCell<StdRng>,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: RefCell::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededRandom {
    fn index(&self, upper: usize) -> usize {
        self.rng.borrow_mut().random_range(0..upper)
    }
}

/// Generates collision-resistant record IDs
pub struct IdGenerator {
    clock: Box<dyn Clock>,
    random: Box<dyn RandomSource>,
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new(SystemClock, OsRandom)
    }
}

impl IdGenerator {
    pub fn new(clock: impl Clock + 'static, random: impl RandomSource + 'static) -> Self {
        Self {
            clock: Box::new(clock),
            random: Box::new(random),
        }
    }

    /// Fixed clock plus seeded randomness, for reproducible tests
    pub fn deterministic(millis: i64, seed: u64) -> Self {
        Self::new(FixedClock::from_millis(millis), SeededRandom::new(seed))
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// `itn_<millis>_<8 alphanumeric>`
    pub fn itinerary_id(&self) -> String {
        format!("itn_{}_{}", self.timestamp(), self.suffix(ALPHANUMERIC, 8))
    }

    /// `pck_<millis>_<8 alphanumeric>`
    pub fn packing_id(&self) -> String {
        format!("pck_{}_{}", self.timestamp(), self.suffix(ALPHANUMERIC, 8))
    }

    /// `<millis>-<6 lowercase alphanumeric>`
    pub fn expense_id(&self) -> String {
        format!("{}-{}", self.timestamp(), self.suffix(LOWER_ALPHANUMERIC, 6))
    }

    fn timestamp(&self) -> i64 {
        self.clock.now().timestamp_millis()
    }

    fn suffix(&self, alphabet: &[u8], len: usize) -> String {
        (0..len)
            .map(|_| alphabet[self.random.index(alphabet.len())] as char)
            .collect()
    }
}

impl std::fmt::Debug for IdGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdGenerator").finish_non_exhaustive()
    }
}
