use crate::{CellIx, Effect, EffectDescriptor, GOAL, GameError, Result};

/// Classification of a single track cell. Immutable for the session.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum CellKind {
    Start,
    Goal,
    Mystery,
    Special(EffectDescriptor),
    Normal,
}

/// Reflects an overshoot past the goal back into the track. The reflected
/// value is not floored at 0: with a die of at most 6 doubled to 12, the
/// worst case (29 + 12) bounces to 19, so a negative result is unreachable.
pub const fn bounce(raw: CellIx) -> CellIx {
    if raw > GOAL { GOAL - (raw - GOAL) } else { raw }
}

const fn desc(effect: Effect, label: &'static str, sound: &'static str, glyph: char) -> EffectDescriptor {
    EffectDescriptor {
        effect,
        label,
        sound,
        glyph,
    }
}

const STANDARD_SPECIALS: &[(CellIx, EffectDescriptor)] = &[
    (3, desc(Effect::WarpTo(8), "Rocket dash", "rocket", '🚀')),
    (5, desc(Effect::ReturnToStart, "Forgot something", "sad", '😭')),
    (7, desc(Effect::RollAgain, "Lucky seven", "lucky", '✨')),
    (10, desc(Effect::SkipNextTurn, "Nap time", "sleep", '😴')),
    (12, desc(Effect::DoubleNextRoll, "Tailwind", "wind", '💨')),
    (15, desc(Effect::SwapWithOther, "Trading places", "swap", '🔄')),
    (18, desc(Effect::ReturnTo(10), "Bomb", "bomb", '💣')),
    (20, desc(Effect::MoveForward(5), "Pocket money", "money", '💰')),
    (21, desc(Effect::AllReturnToStart, "Black hole", "blackhole", '🌀')),
    (24, desc(Effect::ReturnTo(15), "Big storm", "storm", '⛈')),
    (28, desc(Effect::FortuneChoice, "Fork of fate", "fortune", '🎲')),
    (29, desc(Effect::ReturnToStart, "Tragedy at the gate", "tragedy", '😱')),
];

const STANDARD_MYSTERY: &[CellIx] = &[6, 11, 16, 22, 27];

/// Static track layout: the special-cell table plus the mystery-box set.
/// Fixed data, not behavior.
#[derive(Clone, Debug, PartialEq)]
pub struct Board {
    specials: &'static [(CellIx, EffectDescriptor)],
    mystery: &'static [CellIx],
}

impl Board {
    /// The canonical 31-cell layout.
    pub const fn standard() -> Self {
        Self {
            specials: STANDARD_SPECIALS,
            mystery: STANDARD_MYSTERY,
        }
    }

    /// Builds a layout, failing fast on any inconsistency: an index outside
    /// the open track `1..GOAL`, a duplicate entry, or a cell listed as both
    /// special and mystery.
    pub fn new(
        specials: &'static [(CellIx, EffectDescriptor)],
        mystery: &'static [CellIx],
    ) -> Result<Self> {
        for &(cell, _) in specials {
            if cell == 0 || cell >= GOAL {
                return Err(GameError::CellOutOfRange(cell));
            }
        }
        for &cell in mystery {
            if cell == 0 || cell >= GOAL {
                return Err(GameError::CellOutOfRange(cell));
            }
        }
        for (i, &(cell, _)) in specials.iter().enumerate() {
            if specials[..i].iter().any(|&(seen, _)| seen == cell) || mystery.contains(&cell) {
                return Err(GameError::CellConflict(cell));
            }
        }
        for (i, &cell) in mystery.iter().enumerate() {
            if mystery[..i].contains(&cell) {
                return Err(GameError::CellConflict(cell));
            }
        }
        Ok(Self { specials, mystery })
    }

    pub fn kind(&self, cell: CellIx) -> CellKind {
        if cell == 0 {
            CellKind::Start
        } else if cell == GOAL {
            CellKind::Goal
        } else if self.is_mystery(cell) {
            CellKind::Mystery
        } else if let Some(descriptor) = self.special(cell) {
            CellKind::Special(descriptor)
        } else {
            CellKind::Normal
        }
    }

    pub fn special(&self, cell: CellIx) -> Option<EffectDescriptor> {
        self.specials
            .iter()
            .find(|&&(bound, _)| bound == cell)
            .map(|&(_, descriptor)| descriptor)
    }

    pub fn is_mystery(&self, cell: CellIx) -> bool {
        self.mystery.contains(&cell)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}
