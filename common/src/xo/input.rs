use crate::xo::board::{GridPosition, PositionError};
use crate::xo::game_state::{GameResult, GameState};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MoveError {
    #[error("The game is already over")]
    GameOver,
    #[error("Invalid cell position: {0}")]
    InvalidPosition(#[from] PositionError),
    #[error("Play is forced into the sub-board at {0}")]
    WrongSubBoard(GridPosition),
    #[error("The sub-board at {0} is already decided")]
    SubBoardDecided(GridPosition),
    #[error("The cell at {sub} of the sub-board at {main} is already occupied")]
    CellOccupied { main: GridPosition, sub: GridPosition },
}

// A move exactly as it arrives from the shell: four untrusted cell indices.
// (main_row, main_col) picks the sub-board, (sub_row, sub_col) the cell in
// it.
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct RawMove {
    pub main_row: usize,
    pub main_col: usize,
    pub sub_row: usize,
    pub sub_col: usize,
}

#[derive(Copy, Clone, Debug)]
pub struct ValidMove {
    main: GridPosition,
    sub: GridPosition,
}

impl ValidMove {
    // Validates, against the state the move will be applied to:
    // - the game is still in progress
    // - all four indices address cells of a 3x3 grid
    // - a forced sub-board, if any, is respected
    // - the target sub-board is undecided
    // - the target cell is empty
    // A failed check is a normal rejection; the state is left untouched.
    pub fn new(raw_move: RawMove, state: &GameState) -> Result<Self, MoveError> {
        if state.result() != GameResult::InProgress {
            return Err(MoveError::GameOver);
        }
        let main = GridPosition::new(raw_move.main_row, raw_move.main_col)?;
        let sub = GridPosition::new(raw_move.sub_row, raw_move.sub_col)?;
        if let Some(forced) = state.active_board() {
            if forced != main {
                return Err(MoveError::WrongSubBoard(forced));
            }
        }
        let sub_board = state.main_board().sub_board(main);
        if sub_board.outcome().is_decided() {
            return Err(MoveError::SubBoardDecided(main));
        }
        if !sub_board.cell(sub).is_empty() {
            return Err(MoveError::CellOccupied { main, sub });
        }
        Ok(ValidMove { main, sub })
    }

    pub fn main(&self) -> GridPosition {
        self.main
    }

    pub fn sub(&self) -> GridPosition {
        self.sub
    }
}
