mod board;
mod game_state;
mod input;
mod player;

pub use board::{BoardOutcome, CellState, GridPosition, MainBoard, PositionError, SubBoard, BOARD_SIZE};
pub use game_state::{GameResult, GameState};
pub use input::{MoveError, RawMove, ValidMove};
pub use player::PlayerNum;
