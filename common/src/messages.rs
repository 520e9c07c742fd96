use crate::xo::{GameState, PlayerNum};
use serde::{Deserialize, Serialize};

// Outcome of a finished match from the point of view of the client that
// receives it.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Lose,
    Draw,
}

// Server-to-client messages. The full engine snapshot rides along so the
// shell can re-render without tracking any state of its own.
#[derive(Serialize, Deserialize, Debug)]
pub enum Response {
    // Sent to both players when a match starts or restarts, naming the side
    // the receiving client plays.
    GameStart {
        player_num: PlayerNum,
        state: GameState,
    },
    // Snapshot after every accepted move.
    GameState {
        state: GameState,
    },
    GameEnd {
        outcome: Outcome,
        state: GameState,
    },
}
