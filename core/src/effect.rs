use serde::{Deserialize, Serialize};

use crate::CellIx;

/// A cell gimmick as a tagged variant. Resolution is a single exhaustive
/// match in the engine; nothing here carries behavior.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    WarpTo(CellIx),
    ReturnToStart,
    ReturnTo(CellIx),
    RollAgain,
    SkipNextTurn,
    DoubleNextRoll,
    SwapWithOther,
    MoveForward(CellIx),
    AllReturnToStart,
    FortuneChoice,
}

impl Effect {
    /// Candidate pool for mystery boxes, drawn from uniformly at landing
    /// time. Deliberately excludes `RollAgain`, `FortuneChoice` and
    /// `AllReturnToStart`.
    pub const MYSTERY_POOL: [Effect; 7] = [
        Effect::WarpTo(8),
        Effect::ReturnToStart,
        Effect::SkipNextTurn,
        Effect::DoubleNextRoll,
        Effect::SwapWithOther,
        Effect::ReturnTo(10),
        Effect::MoveForward(5),
    ];

    /// Per-kind display label, used for mystery draws where no cell binding
    /// exists. Special cells carry their own [`EffectDescriptor`].
    pub const fn label(self) -> &'static str {
        use Effect::*;
        match self {
            WarpTo(_) => "Rocket dash",
            ReturnToStart => "Forgot something",
            ReturnTo(_) => "Bomb",
            RollAgain => "Lucky seven",
            SkipNextTurn => "Nap time",
            DoubleNextRoll => "Tailwind",
            SwapWithOther => "Trading places",
            MoveForward(_) => "Pocket money",
            AllReturnToStart => "Black hole",
            FortuneChoice => "Fork of fate",
        }
    }

    /// Per-kind sound tag for frontends. A static lookup; the engine never
    /// plays anything itself.
    pub const fn sound(self) -> &'static str {
        use Effect::*;
        match self {
            WarpTo(_) => "rocket",
            ReturnToStart => "sad",
            ReturnTo(_) => "bomb",
            RollAgain => "lucky",
            SkipNextTurn => "sleep",
            DoubleNextRoll => "wind",
            SwapWithOther => "swap",
            MoveForward(_) => "money",
            AllReturnToStart => "blackhole",
            FortuneChoice => "fortune",
        }
    }
}

/// One special-cell binding: the effect plus its presentation hints. Two
/// cells may bind the same effect kind under different flavor (the two
/// return-to-start cells sound nothing alike).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EffectDescriptor {
    pub effect: Effect,
    pub label: &'static str,
    pub sound: &'static str,
    pub glyph: char,
}
