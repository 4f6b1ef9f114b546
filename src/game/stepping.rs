//! Debug decorator that shows the tabletop after every phase
//!
//! Wraps any `TurnExecutor`. With pausing enabled it waits for Enter on
//! stdin before handing control back.

use crate::game::results::ExecutionResult;
use crate::game::round_judge::TurnExecutor;
use crate::game::state::Tabletop;
use crate::Result;
use std::fmt::Write as _;
use std::io::{self, BufRead, Write};

pub struct SteppingJudge<E: TurnExecutor> {
    inner: E,
    pause: bool,
}

impl<E: TurnExecutor> SteppingJudge<E> {
    pub fn new(inner: E) -> Self {
        SteppingJudge { inner, pause: true }
    }

    /// Print after each phase without waiting for input
    pub fn without_pause(mut self) -> Self {
        self.pause = false;
        self
    }

    fn wait_for_enter(&self) {
        print!("[Enter] to continue ");
        let _ = io::stdout().flush();
        let mut input = String::new();
        // EOF or a closed stdin just continues
        let _ = io::stdin().lock().read_line(&mut input);
    }
}

/// One-screen summary of the tabletop
pub fn describe_tabletop(tabletop: &Tabletop) -> String {
    let mut out = String::new();
    let phase = tabletop.phase.map_or_else(|| "pre-game".to_string(), |p| p.to_string());
    let _ = writeln!(
        out,
        "== Turn {} | {} | active: {} ==",
        tabletop.turn_id,
        phase,
        tabletop.active_player().name
    );

    for player in tabletop.players() {
        let _ = writeln!(
            out,
            "{}: life {}, library {}, hand {}, graveyard {}",
            player.name,
            player.life,
            player.zones.library.len(),
            player.zones.hand.len(),
            player.zones.graveyard.len()
        );
        let permanents: Vec<String> = tabletop
            .permanents_of(player.id)
            .map(|card| {
                let mut label = card.name.to_string();
                if let (Some(power), Some(toughness)) = (card.power, card.toughness) {
                    let _ = write!(label, " {power}/{toughness}");
                }
                if card.tapped {
                    label.push_str(" (tapped)");
                }
                label
            })
            .collect();
        if !permanents.is_empty() {
            let _ = writeln!(out, "  battlefield: {}", permanents.join(", "));
        }
    }

    if !tabletop.stack.is_empty() {
        let _ = writeln!(out, "stack: {} item(s)", tabletop.stack.len());
    }
    out
}

impl<E: TurnExecutor> TurnExecutor for SteppingJudge<E> {
    fn execute_next_phase(&mut self, tabletop: &mut Tabletop) -> Result<ExecutionResult> {
        let result = self.inner.execute_next_phase(tabletop)?;

        print!("{}", describe_tabletop(tabletop));
        for message in &result.messages {
            println!("  {message}");
        }
        if self.pause {
            self.wait_for_enter();
        }

        Ok(result)
    }
}
