pub mod messages;
mod xo;

pub use xo::{
    BoardOutcome, CellState, GameResult, GameState, GridPosition, MainBoard, MoveError,
    PlayerNum, PositionError, RawMove, SubBoard, ValidMove, BOARD_SIZE,
};
