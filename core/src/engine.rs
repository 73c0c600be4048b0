use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use crate::*;

/// Session lifecycle. Valid transitions:
/// - NotStarted -> InProgress (`start`)
/// - InProgress -> Ended (a player reaches the goal)
/// - any -> InProgress (`restart`)
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameState {
    /// Pre-game phase; tokens may still be changed, rolls are no-ops.
    NotStarted,
    /// Accepting rolls.
    InProgress,
    /// Terminal; the winner seat is recorded and rolls are no-ops.
    Ended,
}

impl GameState {
    pub const fn is_initial(self) -> bool {
        matches!(self, Self::NotStarted)
    }

    pub const fn is_final(self) -> bool {
        matches!(self, Self::Ended)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::NotStarted
    }
}

/// Full record of one resolved turn: the outcome plus the ordered events the
/// presentation layer replays.
#[derive(Clone, Debug, PartialEq)]
pub struct Turn {
    pub outcome: RollOutcome,
    pub events: Vec<Event>,
}

impl Turn {
    fn unchanged() -> Self {
        Self {
            outcome: RollOutcome::NoChange,
            events: Vec::new(),
        }
    }
}

/// A single game session: three fixed players on a linear track. All
/// mutation goes through the methods here; there is no ambient state.
#[derive(Clone, Debug, PartialEq)]
pub struct Game {
    board: Board,
    players: [Player; SEAT_COUNT],
    current: Seat,
    state: GameState,
    winner: Option<Seat>,
}

impl Game {
    pub fn new(board: Board) -> Self {
        Self {
            board,
            players: [Player::for_seat(0), Player::for_seat(1), Player::for_seat(2)],
            current: 0,
            state: Default::default(),
            winner: None,
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn current_seat(&self) -> Seat {
        self.current
    }

    pub fn current_player(&self) -> &Player {
        &self.players[self.current]
    }

    pub fn winner(&self) -> Option<Seat> {
        self.winner
    }

    /// Derived from positions alone; `Late` once anyone is at or past
    /// [`LATE_ZONE_START`].
    pub fn music_zone(&self) -> MusicZone {
        if self
            .players
            .iter()
            .any(|player| player.position >= LATE_ZONE_START)
        {
            MusicZone::Late
        } else {
            MusicZone::Normal
        }
    }

    /// Pre-game token customization. Locked once the session starts.
    pub fn set_player_token(&mut self, seat: Seat, token: char) -> Result<()> {
        if seat >= SEAT_COUNT {
            return Err(GameError::InvalidSeat);
        }
        if !self.state.is_initial() {
            return Err(GameError::AlreadyStarted);
        }
        self.players[seat].token = token;
        Ok(())
    }

    /// Leaves the token-selection phase and begins accepting rolls.
    pub fn start(&mut self) {
        if self.state.is_initial() {
            self.state = GameState::InProgress;
        }
    }

    /// Reinitializes the whole model (positions, flags, turn pointer) and
    /// re-enters play. Token choices survive.
    pub fn restart(&mut self) {
        for player in &mut self.players {
            player.reset();
        }
        self.current = 0;
        self.winner = None;
        self.state = GameState::InProgress;
    }

    /// Resolves one full turn for the current seat: skip handling, the die
    /// draw, movement with the bounce rule, cell-effect resolution (possibly
    /// chaining further movement) and the turn advance. Synchronous and
    /// infallible; rolling while not in progress is a no-op.
    pub fn roll_and_resolve<D: DiceSource>(&mut self, dice: &mut D) -> Turn {
        if !matches!(self.state, GameState::InProgress) {
            log::debug!("roll ignored, session is {:?}", self.state);
            return Turn::unchanged();
        }

        let mut events = Vec::new();
        let seat = self.current;

        let outcome = if self.players[seat].skip_next {
            self.players[seat].skip_next = false;
            events.push(Event::TurnSkipped { seat });
            self.say(&mut events, format!("{} sits this turn out.", self.name(seat)));
            self.advance_turn(&mut events);
            RollOutcome::Advanced
        } else {
            self.roll_current(dice, &mut events)
        };

        Turn { outcome, events }
    }

    fn roll_current<D: DiceSource>(&mut self, dice: &mut D, events: &mut Vec<Event>) -> RollOutcome {
        let seat = self.current;
        let mut zone = self.music_zone();

        let die = dice.die();
        let doubled = self.players[seat].double_next;
        let value = if doubled {
            self.players[seat].double_next = false;
            die * 2
        } else {
            die
        };
        events.push(Event::DiceRolled {
            seat,
            die,
            value,
            doubled,
        });
        if doubled {
            self.say(
                events,
                format!("Tailwind! {}'s roll counts double.", self.name(seat)),
            );
        }
        log::debug!("seat {seat} rolled {value} (die {die}, doubled: {doubled})");

        let from = self.players[seat].position;
        let to = bounce(from + value);
        self.players[seat].position = to;
        events.push(Event::PlayerMoved { seat, from, to });
        self.say(
            events,
            format!("{} moves {} to square {}.", self.name(seat), value, to),
        );
        self.sync_zone(&mut zone, events);

        if to == GOAL {
            return self.finish(seat, events);
        }

        match self.board.kind(to) {
            CellKind::Mystery => {
                let effect = Effect::MYSTERY_POOL[dice.pick(Effect::MYSTERY_POOL.len())];
                events.push(Event::MysteryRevealed {
                    seat,
                    cell: to,
                    effect,
                });
                self.say(
                    events,
                    format!(
                        "{} opens a mystery box... {}!",
                        self.name(seat),
                        effect.label()
                    ),
                );
                self.resolve_effect(effect, dice, &mut zone, events)
            }
            CellKind::Special(descriptor) => {
                events.push(Event::EffectTriggered {
                    seat,
                    cell: to,
                    effect: descriptor.effect,
                });
                self.say(
                    events,
                    format!("{} landed on {}!", self.name(seat), descriptor.label),
                );
                self.resolve_effect(descriptor.effect, dice, &mut zone, events)
            }
            _ => {
                self.advance_turn(events);
                RollOutcome::Advanced
            }
        }
    }

    /// The single dispatch point for every effect kind. Chained movement
    /// never re-triggers the destination cell; only `MoveForward` and the
    /// fortune heads branch can end the game from here.
    fn resolve_effect<D: DiceSource>(
        &mut self,
        effect: Effect,
        dice: &mut D,
        zone: &mut MusicZone,
        events: &mut Vec<Event>,
    ) -> RollOutcome {
        use Effect::*;

        let seat = self.current;
        match effect {
            WarpTo(target) => {
                self.relocate(seat, target, events);
                self.say(
                    events,
                    format!("{} warps to square {}!", self.name(seat), target),
                );
                self.sync_zone(zone, events);
                self.advance_turn(events);
                RollOutcome::Advanced
            }
            ReturnToStart => {
                self.relocate(seat, 0, events);
                self.say(events, format!("{} goes back to the start.", self.name(seat)));
                self.sync_zone(zone, events);
                self.advance_turn(events);
                RollOutcome::Advanced
            }
            ReturnTo(target) => {
                self.relocate(seat, target, events);
                self.say(
                    events,
                    format!("{} falls back to square {}.", self.name(seat), target),
                );
                self.sync_zone(zone, events);
                self.advance_turn(events);
                RollOutcome::Advanced
            }
            RollAgain => {
                self.say(events, format!("{} rolls again!", self.name(seat)));
                RollOutcome::SamePlayer
            }
            SkipNextTurn => {
                self.players[seat].skip_next = true;
                self.say(
                    events,
                    format!("{} will sit the next turn out.", self.name(seat)),
                );
                self.advance_turn(events);
                RollOutcome::Advanced
            }
            DoubleNextRoll => {
                self.players[seat].double_next = true;
                self.say(
                    events,
                    format!("{}'s next roll counts double!", self.name(seat)),
                );
                self.advance_turn(events);
                RollOutcome::Advanced
            }
            SwapWithOther => {
                let others: [Seat; 2] = match seat {
                    0 => [1, 2],
                    1 => [0, 2],
                    _ => [0, 1],
                };
                let other = others[dice.pick(others.len())];
                let here = self.players[seat].position;
                let there = self.players[other].position;
                self.players[seat].position = there;
                self.players[other].position = here;
                events.push(Event::PlayerMoved {
                    seat,
                    from: here,
                    to: there,
                });
                events.push(Event::PlayerMoved {
                    seat: other,
                    from: there,
                    to: here,
                });
                self.say(
                    events,
                    format!(
                        "{} trades places with {}!",
                        self.name(seat),
                        self.name(other)
                    ),
                );
                self.sync_zone(zone, events);
                self.advance_turn(events);
                RollOutcome::Advanced
            }
            MoveForward(steps) => {
                let from = self.players[seat].position;
                let to = bounce(from + steps);
                self.players[seat].position = to;
                events.push(Event::PlayerMoved { seat, from, to });
                self.say(
                    events,
                    format!("{} jumps {} ahead to square {}.", self.name(seat), steps, to),
                );
                self.sync_zone(zone, events);
                if to == GOAL {
                    self.finish(seat, events)
                } else {
                    self.advance_turn(events);
                    RollOutcome::Advanced
                }
            }
            AllReturnToStart => {
                for (other, player) in self.players.iter_mut().enumerate() {
                    let from = player.position;
                    if from != 0 {
                        player.position = 0;
                        events.push(Event::PlayerMoved {
                            seat: other,
                            from,
                            to: 0,
                        });
                    }
                }
                self.say(
                    events,
                    String::from("A black hole! Everyone returns to the start."),
                );
                self.sync_zone(zone, events);
                self.advance_turn(events);
                RollOutcome::Advanced
            }
            FortuneChoice => {
                if dice.coin() {
                    self.relocate(seat, GOAL, events);
                    self.say(
                        events,
                        format!("Fate smiles on {}: straight to the goal!", self.name(seat)),
                    );
                    self.finish(seat, events)
                } else {
                    let from = self.players[seat].position;
                    self.relocate(seat, from.saturating_sub(5), events);
                    self.say(
                        events,
                        format!("Fate frowns on {}: back 5 squares.", self.name(seat)),
                    );
                    self.sync_zone(zone, events);
                    self.advance_turn(events);
                    RollOutcome::Advanced
                }
            }
        }
    }

    fn relocate(&mut self, seat: Seat, to: CellIx, events: &mut Vec<Event>) {
        let from = self.players[seat].position;
        self.players[seat].position = to;
        events.push(Event::PlayerMoved { seat, from, to });
    }

    fn finish(&mut self, winner: Seat, events: &mut Vec<Event>) -> RollOutcome {
        self.state = GameState::Ended;
        self.winner = Some(winner);
        self.say(events, format!("{} reached the goal!", self.name(winner)));
        events.push(Event::GameEnded { winner });
        log::debug!("game ended, winner seat {winner}");
        RollOutcome::Won
    }

    fn advance_turn(&mut self, events: &mut Vec<Event>) {
        if self.state.is_final() {
            return;
        }
        self.current = (self.current + 1) % SEAT_COUNT;
        events.push(Event::TurnChanged { seat: self.current });
    }

    fn sync_zone(&self, last: &mut MusicZone, events: &mut Vec<Event>) {
        let now = self.music_zone();
        if now != *last {
            *last = now;
            events.push(Event::MusicZone { zone: now });
        }
    }

    fn name(&self, seat: Seat) -> String {
        self.players[seat].name.clone()
    }

    fn say(&self, events: &mut Vec<Event>, text: String) {
        events.push(Event::Message(text));
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new(Board::standard())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::testing::ScriptedDice;

    fn started() -> Game {
        let mut game = Game::default();
        game.start();
        game
    }

    fn game_at(positions: [CellIx; SEAT_COUNT], current: Seat) -> Game {
        let mut game = started();
        for (seat, position) in positions.into_iter().enumerate() {
            game.players[seat].position = position;
        }
        game.current = current;
        game
    }

    fn moves(turn: &Turn) -> Vec<(Seat, CellIx, CellIx)> {
        turn.events
            .iter()
            .filter_map(|event| match *event {
                Event::PlayerMoved { seat, from, to } => Some((seat, from, to)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn rolling_before_start_is_a_no_op() {
        let mut game = Game::default();
        let turn = game.roll_and_resolve(&mut ScriptedDice::dies(&[3]));
        assert_eq!(turn.outcome, RollOutcome::NoChange);
        assert!(turn.events.is_empty());
        assert_eq!(game.players[0].position, 0);
    }

    #[test]
    fn landing_on_warp_cell_moves_and_advances() {
        let mut game = started();
        let turn = game.roll_and_resolve(&mut ScriptedDice::dies(&[3]));

        assert_eq!(turn.outcome, RollOutcome::Advanced);
        assert_eq!(game.players[0].position, 8);
        assert_eq!(game.current_seat(), 1);
        assert_eq!(game.state(), GameState::InProgress);
        assert_eq!(moves(&turn), alloc::vec![(0, 0, 3), (0, 3, 8)]);
    }

    #[test]
    fn turn_events_keep_resolution_order() {
        let mut game = started();
        let turn = game.roll_and_resolve(&mut ScriptedDice::dies(&[3]));

        let shape: Vec<_> = turn
            .events
            .iter()
            .filter(|event| !matches!(event, Event::Message(_)))
            .cloned()
            .collect();
        assert_eq!(
            shape,
            alloc::vec![
                Event::DiceRolled {
                    seat: 0,
                    die: 3,
                    value: 3,
                    doubled: false
                },
                Event::PlayerMoved {
                    seat: 0,
                    from: 0,
                    to: 3
                },
                Event::EffectTriggered {
                    seat: 0,
                    cell: 3,
                    effect: Effect::WarpTo(8)
                },
                Event::PlayerMoved {
                    seat: 0,
                    from: 3,
                    to: 8
                },
                Event::TurnChanged { seat: 1 },
            ]
        );
    }

    #[test]
    fn exact_goal_roll_ends_the_game() {
        let mut game = game_at([27, 0, 0], 0);
        let turn = game.roll_and_resolve(&mut ScriptedDice::dies(&[3]));

        assert_eq!(turn.outcome, RollOutcome::Won);
        assert_eq!(game.state(), GameState::Ended);
        assert_eq!(game.winner(), Some(0));
        assert_eq!(game.current_seat(), 0);
        assert!(turn.events.contains(&Event::GameEnded { winner: 0 }));

        // terminal: further rolls mutate nothing
        let after = game.roll_and_resolve(&mut ScriptedDice::dies(&[3]));
        assert_eq!(after.outcome, RollOutcome::NoChange);
        assert!(after.events.is_empty());
        assert_eq!(game.players[0].position, GOAL);
    }

    #[test]
    fn overshoot_bounces_into_fortune_cell_and_heads_wins() {
        // player 2 at 27 rolls a 5: raw 32 bounces to 28, fortune heads
        let mut game = game_at([0, 0, 27], 2);
        let mut dice = ScriptedDice::dies(&[5]).with_coins(&[true]);
        let turn = game.roll_and_resolve(&mut dice);

        assert_eq!(turn.outcome, RollOutcome::Won);
        assert_eq!(game.players[2].position, GOAL);
        assert_eq!(game.winner(), Some(2));
        assert!(turn.events.contains(&Event::EffectTriggered {
            seat: 2,
            cell: 28,
            effect: Effect::FortuneChoice
        }));
    }

    #[test]
    fn fortune_tails_steps_back_five() {
        let mut game = game_at([0, 0, 27], 2);
        let mut dice = ScriptedDice::dies(&[5]).with_coins(&[false]);
        let turn = game.roll_and_resolve(&mut dice);

        assert_eq!(turn.outcome, RollOutcome::Advanced);
        assert_eq!(game.players[2].position, 23);
        assert_eq!(game.current_seat(), 0);
        assert_eq!(game.state(), GameState::InProgress);
        assert!(turn.events.contains(&Event::MusicZone {
            zone: MusicZone::Normal
        }));
    }

    #[test]
    fn fortune_tails_floors_at_the_start() {
        let mut game = game_at([3, 0, 0], 0);
        let mut events = Vec::new();
        let mut zone = game.music_zone();
        let mut dice = ScriptedDice::dies(&[]).with_coins(&[false]);

        let outcome = game.resolve_effect(Effect::FortuneChoice, &mut dice, &mut zone, &mut events);

        assert_eq!(outcome, RollOutcome::Advanced);
        assert_eq!(game.players[0].position, 0);
    }

    #[test]
    fn skip_flag_consumes_the_turn_without_a_roll() {
        let mut game = started();
        game.players[0].skip_next = true;
        let turn = game.roll_and_resolve(&mut ScriptedDice::dies(&[]));

        assert_eq!(turn.outcome, RollOutcome::Advanced);
        assert!(!game.players[0].skip_next);
        assert_eq!(game.current_seat(), 1);
        assert!(turn.events.contains(&Event::TurnSkipped { seat: 0 }));
        assert!(
            !turn
                .events
                .iter()
                .any(|event| matches!(event, Event::DiceRolled { .. }))
        );
    }

    #[test]
    fn double_flag_doubles_exactly_once() {
        let mut game = started();
        game.players[0].double_next = true;
        let turn = game.roll_and_resolve(&mut ScriptedDice::dies(&[2]));

        assert!(!game.players[0].double_next);
        assert_eq!(game.players[0].position, 4);
        assert!(turn.events.contains(&Event::DiceRolled {
            seat: 0,
            die: 2,
            value: 4,
            doubled: true
        }));

        // the next roll for the same seat is back to face value
        game.current = 0;
        let turn = game.roll_and_resolve(&mut ScriptedDice::dies(&[4]));
        assert_eq!(game.players[0].position, 8);
        assert!(turn.events.contains(&Event::DiceRolled {
            seat: 0,
            die: 4,
            value: 4,
            doubled: false
        }));
    }

    #[test]
    fn lucky_seven_keeps_the_same_player() {
        let mut game = game_at([2, 0, 0], 0);
        let turn = game.roll_and_resolve(&mut ScriptedDice::dies(&[5]));

        assert_eq!(turn.outcome, RollOutcome::SamePlayer);
        assert_eq!(game.current_seat(), 0);
        assert_eq!(game.players[0].position, 7);
        assert!(
            !turn
                .events
                .iter()
                .any(|event| matches!(event, Event::TurnChanged { .. }))
        );
    }

    #[test]
    fn swap_exchanges_positions_with_the_picked_other() {
        let mut game = game_at([9, 4, 19], 0);
        let mut dice = ScriptedDice::dies(&[6]).with_picks(&[0]);
        let turn = game.roll_and_resolve(&mut dice);

        // seat 0 moved to 15 (swap cell), then traded with seat 1
        assert_eq!(game.players[0].position, 4);
        assert_eq!(game.players[1].position, 15);
        assert_eq!(game.players[2].position, 19);
        assert_eq!(turn.outcome, RollOutcome::Advanced);

        // the multiset of positions is preserved by the trade itself
        let mut positions: Vec<_> = game.players.iter().map(|p| p.position).collect();
        positions.sort_unstable();
        assert_eq!(positions, alloc::vec![4, 15, 19]);
    }

    #[test]
    fn black_hole_returns_everyone_to_start() {
        let mut game = game_at([17, 5, 9], 0);
        let turn = game.roll_and_resolve(&mut ScriptedDice::dies(&[4]));

        assert!(game.players.iter().all(|player| player.position == 0));
        assert_eq!(turn.outcome, RollOutcome::Advanced);
        assert_eq!(game.current_seat(), 1);
    }

    #[test]
    fn mystery_box_draws_from_the_pool() {
        let mut game = started();
        let mut dice = ScriptedDice::dies(&[6]).with_picks(&[0]);
        let turn = game.roll_and_resolve(&mut dice);

        assert!(turn.events.contains(&Event::MysteryRevealed {
            seat: 0,
            cell: 6,
            effect: Effect::WarpTo(8)
        }));
        assert_eq!(game.players[0].position, 8);
        assert_eq!(game.current_seat(), 1);
    }

    #[test]
    fn chained_move_forward_can_reach_the_goal() {
        const SPECIALS: &[(CellIx, EffectDescriptor)] = &[(
            27,
            EffectDescriptor {
                effect: Effect::MoveForward(3),
                label: "Pocket money",
                sound: "money",
                glyph: '💰',
            },
        )];
        let mut game = Game::new(Board::new(SPECIALS, &[]).unwrap());
        game.start();
        game.players[0].position = 22;

        let turn = game.roll_and_resolve(&mut ScriptedDice::dies(&[5]));

        assert_eq!(turn.outcome, RollOutcome::Won);
        assert_eq!(game.players[0].position, GOAL);
        assert_eq!(game.winner(), Some(0));
    }

    #[test]
    fn money_cell_jump_does_not_chain_cell_effects() {
        // landing on 20 jumps to 25, a normal cell; the jump must not
        // re-trigger anything there
        let mut game = game_at([14, 0, 0], 0);
        let turn = game.roll_and_resolve(&mut ScriptedDice::dies(&[6]));

        assert_eq!(game.players[0].position, 25);
        assert_eq!(turn.outcome, RollOutcome::Advanced);
        assert_eq!(
            turn.events
                .iter()
                .filter(|event| matches!(
                    event,
                    Event::EffectTriggered { .. } | Event::MysteryRevealed { .. }
                ))
                .count(),
            1
        );
    }

    #[test]
    fn music_zone_flips_to_late_and_back() {
        let mut game = game_at([19, 0, 0], 0);
        let turn = game.roll_and_resolve(&mut ScriptedDice::dies(&[6]));
        assert!(turn.events.contains(&Event::MusicZone {
            zone: MusicZone::Late
        }));
        assert_eq!(game.music_zone(), MusicZone::Late);

        // black hole pulls the only late player back below the threshold
        let mut game = game_at([17, 25, 0], 0);
        assert_eq!(game.music_zone(), MusicZone::Late);
        let turn = game.roll_and_resolve(&mut ScriptedDice::dies(&[4]));
        assert!(turn.events.contains(&Event::MusicZone {
            zone: MusicZone::Normal
        }));
        assert_eq!(game.music_zone(), MusicZone::Normal);
    }

    #[test]
    fn restart_reinitializes_the_session() {
        let mut game = game_at([27, 12, 3], 1);
        game.players[1].skip_next = true;
        game.players[2].double_next = true;
        game.current = 0;
        game.roll_and_resolve(&mut ScriptedDice::dies(&[3]));
        assert_eq!(game.state(), GameState::Ended);

        game.restart();

        assert_eq!(game.state(), GameState::InProgress);
        assert_eq!(game.current_seat(), 0);
        assert_eq!(game.winner(), None);
        for player in game.players() {
            assert_eq!(player.position, 0);
            assert!(!player.skip_next);
            assert!(!player.double_next);
        }
    }

    #[test]
    fn tokens_are_locked_once_the_game_starts() {
        let mut game = Game::default();
        game.set_player_token(1, '🦖').unwrap();
        assert_eq!(game.players[1].token, '🦖');
        assert_eq!(game.set_player_token(9, '🦖'), Err(GameError::InvalidSeat));

        game.start();
        assert_eq!(
            game.set_player_token(1, '🐸'),
            Err(GameError::AlreadyStarted)
        );
        assert_eq!(game.players[1].token, '🦖');
    }

    #[test]
    fn restart_after_restart_keeps_tokens() {
        let mut game = Game::default();
        game.set_player_token(0, '🦊').unwrap();
        game.start();
        game.restart();
        assert_eq!(game.players[0].token, '🦊');
    }
}
