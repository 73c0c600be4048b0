use rand::prelude::*;

/// Source of every random draw the engine makes: die rolls, uniform picks
/// (mystery effect, swap partner) and the fortune coin flip. Injectable so
/// tests can script exact sequences.
pub trait DiceSource {
    /// Uniform die value in `1..=6`.
    fn die(&mut self) -> u8;

    /// Uniform index in `0..n`. Callers never pass `n == 0`.
    fn pick(&mut self, n: usize) -> usize;

    /// Fair coin flip.
    fn coin(&mut self) -> bool;
}

/// Production source backed by a seeded [`SmallRng`]. Equal seeds replay
/// equal games.
#[derive(Clone, Debug)]
pub struct RandomDice {
    rng: SmallRng,
}

impl RandomDice {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl DiceSource for RandomDice {
    fn die(&mut self) -> u8 {
        self.rng.random_range(1..=6)
    }

    fn pick(&mut self, n: usize) -> usize {
        self.rng.random_range(0..n)
    }

    fn coin(&mut self) -> bool {
        self.rng.random_bool(0.5)
    }
}
