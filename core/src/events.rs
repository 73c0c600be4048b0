use alloc::string::String;
use serde::{Deserialize, Serialize};

use crate::{CellIx, Effect, Seat};

/// Background-music layer, derived from player positions. Drives
/// presentation only, never gameplay.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MusicZone {
    Normal,
    Late,
}

/// Outbound notification consumed by the presentation collaborator. One
/// resolved turn yields an ordered sequence of these; the engine never calls
/// into rendering or audio itself.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// A die was drawn. `die` is the raw face; `value` is after any
    /// tailwind doubling.
    DiceRolled {
        seat: Seat,
        die: u8,
        value: u8,
        doubled: bool,
    },
    /// The seat's pending skip consumed this turn; no die was rolled.
    TurnSkipped { seat: Seat },
    PlayerMoved { seat: Seat, from: CellIx, to: CellIx },
    EffectTriggered {
        seat: Seat,
        cell: CellIx,
        effect: Effect,
    },
    /// A mystery box resolved to `effect`, chosen uniformly at landing time.
    MysteryRevealed {
        seat: Seat,
        cell: CellIx,
        effect: Effect,
    },
    TurnChanged { seat: Seat },
    GameEnded { winner: Seat },
    MusicZone { zone: MusicZone },
    /// Free-text play-by-play line for a log pane.
    Message(String),
}
