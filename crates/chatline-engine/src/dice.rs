use std::collections::VecDeque;
use std::ops::RangeInclusive;

use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};

/// Source of every random decision a session makes: disconnection rolls,
/// reply selection, agent choice and reply latency.
pub trait Dice {
    /// Uniform sample in `[0, 1)`.
    fn roll(&mut self) -> f64;

    /// Uniform index in `0..len`. `len` is never zero.
    fn pick(&mut self, len: usize) -> usize;

    /// Uniform delay in milliseconds.
    fn delay_ms(&mut self, range: RangeInclusive<u64>) -> u64;
}

/// Pick one item uniformly, or `None` for an empty slice.
pub fn choose<'a, T>(dice: &mut dyn Dice, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    items.get(dice.pick(items.len()))
}

/// [`Dice`] backed by a `rand` generator.
#[derive(Debug, Clone)]
pub struct RngDice<R>(R);

impl RngDice<ThreadRng> {
    pub fn thread() -> Self {
        Self(rand::thread_rng())
    }
}

impl RngDice<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Dice for RngDice<R> {
    fn roll(&mut self) -> f64 {
        self.0.gen::<f64>()
    }

    fn pick(&mut self, len: usize) -> usize {
        self.0.gen_range(0..len)
    }

    fn delay_ms(&mut self, range: RangeInclusive<u64>) -> u64 {
        if range.is_empty() {
            return 0;
        }
        self.0.gen_range(range)
    }
}

/// Deterministic [`Dice`] replaying queued outcomes.
///
/// Once a queue runs dry, rolls return `0.99` (never disconnects at the
/// usual probability), picks return `0`, and delays are the range minimum.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    rolls: VecDeque<f64>,
    picks: VecDeque<usize>,
}

impl ScriptedDice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rolls(mut self, rolls: impl IntoIterator<Item = f64>) -> Self {
        self.rolls.extend(rolls);
        self
    }

    pub fn with_picks(mut self, picks: impl IntoIterator<Item = usize>) -> Self {
        self.picks.extend(picks);
        self
    }
}

impl Dice for ScriptedDice {
    fn roll(&mut self) -> f64 {
        self.rolls.pop_front().unwrap_or(0.99)
    }

    fn pick(&mut self, len: usize) -> usize {
        self.picks.pop_front().unwrap_or(0).min(len.saturating_sub(1))
    }

    fn delay_ms(&mut self, range: RangeInclusive<u64>) -> u64 {
        *range.start()
    }
}
