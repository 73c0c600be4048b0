#![no_std]

extern crate alloc;

use alloc::string::String;
use serde::{Deserialize, Serialize};

pub use board::*;
pub use dice::*;
pub use effect::*;
pub use engine::*;
pub use error::*;
pub use events::*;

mod board;
mod dice;
mod effect;
mod engine;
mod error;
mod events;

/// Board cell index. The track is linear: 0 is the start, [`GOAL`] the goal.
pub type CellIx = u8;

/// Seat index identifying one of the three fixed players.
pub type Seat = usize;

/// Number of seats in a session, fixed for the lifetime of a game.
pub const SEAT_COUNT: usize = 3;

/// Index of the goal cell; the track spans `0..=GOAL`.
pub const GOAL: CellIx = 30;

/// A position at or past this cell puts the session in the late music zone.
pub const LATE_ZONE_START: CellIx = 24;

const DEFAULT_NAMES: [&str; SEAT_COUNT] = ["Kenchan", "Papa", "Mama"];
const DEFAULT_TOKENS: [char; SEAT_COUNT] = ['🔴', '🔵', '🟡'];

/// One of the three fixed participants. Created at session start and mutated
/// only through the engine; [`Game::restart`] resets everything except the
/// pre-game token choice.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub token: char,
    pub position: CellIx,
    pub skip_next: bool,
    pub double_next: bool,
}

impl Player {
    fn for_seat(seat: Seat) -> Self {
        Self {
            name: String::from(DEFAULT_NAMES[seat]),
            token: DEFAULT_TOKENS[seat],
            position: 0,
            skip_next: false,
            double_next: false,
        }
    }

    fn reset(&mut self) {
        self.position = 0;
        self.skip_next = false;
        self.double_next = false;
    }
}

/// Outcome of one call to [`Game::roll_and_resolve`].
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum RollOutcome {
    /// The session is not accepting rolls (not started, or already ended).
    NoChange,
    /// The turn resolved and passed to the next seat.
    Advanced,
    /// The same seat rolls again.
    SamePlayer,
    /// The acting player reached the goal and the session ended.
    Won,
}

impl RollOutcome {
    /// Whether this outcome could have caused an update to the game
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Advanced => true,
            Self::SamePlayer => true,
            Self::Won => true,
        }
    }
}
