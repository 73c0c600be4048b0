//! Terminal frontend for the sugoroku engine: draws the track, prompts for
//! rolls and replays the engine's event stream as a play-by-play log. All
//! game rules live in `sugoroku-core`; this binary is presentation only.

use std::io::{self, BufRead, Write};

use anyhow::Result;
use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};

use sugoroku_core::{CellKind, Event, GOAL, Game, MusicZone, RandomDice, RollOutcome};

#[derive(Debug, Parser)]
#[command(name = "sugoroku", about = "Three-player sugoroku on a 31-cell track")]
struct Cli {
    /// RNG seed; a random one is drawn when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Play the whole game without waiting for input between turns
    #[arg(long)]
    auto: bool,

    /// Emit events as JSON lines instead of the play-by-play text
    #[arg(long)]
    json: bool,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(cli.verbosity.log_level_filter())
        .init();

    let seed = cli.seed.unwrap_or_else(rand::random);
    log::info!("session seed {seed}");

    let mut dice = RandomDice::new(seed);
    let mut game = Game::default();
    game.start();

    if !cli.json {
        println!("🎲 Sugoroku! First to square {GOAL} wins.");
        print_track(&game);
    }

    let stdin = io::stdin();
    loop {
        if !cli.auto && !cli.json {
            let player = game.current_player();
            print!("[{} {}] Enter to roll, q to quit: ", player.token, player.name);
            io::stdout().flush()?;
            let mut line = String::new();
            stdin.lock().read_line(&mut line)?;
            if line.trim() == "q" {
                break;
            }
        }

        let turn = game.roll_and_resolve(&mut dice);
        for event in &turn.events {
            if cli.json {
                println!("{}", serde_json::to_string(event)?);
            } else {
                render_event(&game, event);
            }
        }
        if !cli.json && turn.outcome.has_update() {
            print_track(&game);
        }

        match turn.outcome {
            RollOutcome::Won | RollOutcome::NoChange => break,
            RollOutcome::Advanced | RollOutcome::SamePlayer => {}
        }
    }

    Ok(())
}

fn render_event(game: &Game, event: &Event) {
    match event {
        Event::DiceRolled { die, .. } => {
            let face = ['⚀', '⚁', '⚂', '⚃', '⚄', '⚅'][usize::from(die - 1)];
            if *die == 6 {
                println!("{face} 💥 Critical hit!");
            } else {
                println!("{face}");
            }
        }
        Event::EffectTriggered { cell, .. } => {
            if let Some(descriptor) = game.board().special(*cell) {
                log::debug!("sound cue: {}", descriptor.sound);
            }
        }
        Event::MysteryRevealed { effect, .. } => {
            println!("🎁 The mystery box rattles...");
            log::debug!("sound cue: {}", effect.sound());
        }
        Event::MusicZone { zone } => match zone {
            MusicZone::Late => println!("♪ BGM switches to the endgame theme!"),
            MusicZone::Normal => println!("♪ BGM returns to the normal theme."),
        },
        Event::GameEnded { winner } => {
            let player = &game.players()[*winner];
            println!("🎆🎇🎆🎇🎆🎇🎆🎇🎆🎇");
            println!("🎉 {} {} wins! 🎉", player.token, player.name);
            println!("🎆🎇🎆🎇🎆🎇🎆🎇🎆🎇");
        }
        Event::Message(text) => println!("  {text}"),
        // movement and turn changes are covered by the message lines and the
        // track redraw
        Event::PlayerMoved { .. } | Event::TurnChanged { .. } | Event::TurnSkipped { .. } => {}
    }
}

fn print_track(game: &Game) {
    let board = game.board();
    for row in (0..=GOAL).collect::<Vec<_>>().chunks(11) {
        let mut line = String::new();
        for &cell in row {
            let glyph = match board.kind(cell) {
                CellKind::Start => '🏁',
                CellKind::Goal => '🏆',
                CellKind::Mystery => '🎁',
                CellKind::Special(descriptor) => descriptor.glyph,
                CellKind::Normal => '・',
            };
            line.push_str(&format!("{cell:>2}{glyph}"));
            for player in game.players() {
                if player.position == cell {
                    line.push(player.token);
                }
            }
            line.push(' ');
        }
        println!("{line}");
    }
    if !game.state().is_final() {
        let player = game.current_player();
        println!("→ {} {} is up (square {})", player.token, player.name, player.position);
    }
}
