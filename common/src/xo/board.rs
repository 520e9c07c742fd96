use crate::xo::player::PlayerNum;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub const BOARD_SIZE: usize = 3;

// The 8 winning lines of a 3x3 grid: 3 rows, 3 columns, 2 diagonals. Both
// board levels are scored against the same table.
const LINES: [[(usize, usize); BOARD_SIZE]; 8] = [
    [(0, 0), (0, 1), (0, 2)],
    [(1, 0), (1, 1), (1, 2)],
    [(2, 0), (2, 1), (2, 2)],
    [(0, 0), (1, 0), (2, 0)],
    [(0, 1), (1, 1), (2, 1)],
    [(0, 2), (1, 2), (2, 2)],
    [(0, 0), (1, 1), (2, 2)],
    [(0, 2), (1, 1), (2, 0)],
];

// Check the 8 lines of a 3x3 grid. `belongs` reports whether the cell at
// (row, col) counts for the player under test.
fn any_line_complete<F>(belongs: F) -> bool
where
    F: Fn(usize, usize) -> bool,
{
    LINES
        .iter()
        .any(|line| line.iter().all(|&(row, col)| belongs(row, col)))
}

#[derive(Debug)]
pub enum Axis {
    Row,
    Col,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Row => write!(f, "row"),
            Axis::Col => write!(f, "column"),
        }
    }
}

#[derive(Error, Debug)]
pub enum PositionError {
    #[error("{0} index {1} is outside the 3x3 grid")]
    OutOfBounds(Axis, usize),
}

#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
pub struct GridPosition(usize, usize);

impl GridPosition {
    // Ensure that both indices address a cell of a 3x3 grid. Coordinates
    // arriving from the wire are untrusted, so a bad index is an ordinary
    // error rather than a panic.
    pub fn new(row: usize, col: usize) -> Result<Self, PositionError> {
        if row >= BOARD_SIZE {
            return Err(PositionError::OutOfBounds(Axis::Row, row));
        }
        if col >= BOARD_SIZE {
            return Err(PositionError::OutOfBounds(Axis::Col, col));
        }
        Ok(GridPosition(row, col))
    }

    pub fn row(&self) -> usize {
        self.0
    }

    pub fn col(&self) -> usize {
        self.1
    }
}

impl fmt::Display for GridPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.0, self.1)
    }
}

#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
pub enum CellState {
    Empty,
    Marked { player_num: PlayerNum },
}

impl CellState {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellState::Empty)
    }

    pub fn is_marked_by(&self, num: PlayerNum) -> bool {
        match self {
            CellState::Marked { player_num } => *player_num == num,
            CellState::Empty => false,
        }
    }
}

#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
pub enum BoardOutcome {
    Undecided,
    WonBy { player_num: PlayerNum },
    Drawn,
}

impl BoardOutcome {
    pub fn is_decided(&self) -> bool {
        !matches!(self, BoardOutcome::Undecided)
    }

    pub fn is_won_by(&self, num: PlayerNum) -> bool {
        match self {
            BoardOutcome::WonBy { player_num } => *player_num == num,
            _ => false,
        }
    }

    // A decided cell of the main board can never count towards a line for
    // `num` again: it is drawn, or the opponent holds it.
    pub fn blocks(&self, num: PlayerNum) -> bool {
        match self {
            BoardOutcome::Undecided => false,
            BoardOutcome::Drawn => true,
            BoardOutcome::WonBy { player_num } => *player_num != num,
        }
    }
}

#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
pub struct SubBoard {
    cells: [[CellState; BOARD_SIZE]; BOARD_SIZE],
    outcome: BoardOutcome,
}

impl Default for SubBoard {
    fn default() -> Self {
        SubBoard {
            cells: [[CellState::Empty; BOARD_SIZE]; BOARD_SIZE],
            outcome: BoardOutcome::Undecided,
        }
    }
}

impl SubBoard {
    // Reconstruct a sub-board from raw cells, settling the outcome the same
    // way live play would: a completed line wins, a full grid without one is
    // drawn.
    pub fn from_cells(cells: [[CellState; BOARD_SIZE]; BOARD_SIZE]) -> Self {
        let mut sub_board = SubBoard {
            cells,
            outcome: BoardOutcome::Undecided,
        };
        for num in [PlayerNum::P1, PlayerNum::P2] {
            if any_line_complete(|row, col| cells[row][col].is_marked_by(num)) {
                sub_board.outcome = BoardOutcome::WonBy { player_num: num };
                return sub_board;
            }
        }
        if sub_board.is_full() {
            sub_board.outcome = BoardOutcome::Drawn;
        }
        sub_board
    }

    pub fn cell(&self, pos: GridPosition) -> CellState {
        self.cells[pos.row()][pos.col()]
    }

    pub fn outcome(&self) -> BoardOutcome {
        self.outcome
    }

    fn is_full(&self) -> bool {
        self.cells.iter().flatten().all(|cell| !cell.is_empty())
    }

    // Write the mover's mark and settle the outcome. Only the mover can have
    // just completed a line, so the win check runs for them alone; the win
    // check runs before the full-grid check, so winning on the last empty
    // cell never reads as a draw. Callers must have validated that the
    // outcome is still undecided and the cell empty.
    pub(crate) fn place(&mut self, pos: GridPosition, player_num: PlayerNum) {
        self.cells[pos.row()][pos.col()] = CellState::Marked { player_num };
        if any_line_complete(|row, col| self.cells[row][col].is_marked_by(player_num)) {
            self.outcome = BoardOutcome::WonBy { player_num };
        } else if self.is_full() {
            self.outcome = BoardOutcome::Drawn;
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct MainBoard {
    sub_boards: [[SubBoard; BOARD_SIZE]; BOARD_SIZE],
}

impl Default for MainBoard {
    fn default() -> Self {
        MainBoard {
            sub_boards: [[SubBoard::default(); BOARD_SIZE]; BOARD_SIZE],
        }
    }
}

impl MainBoard {
    pub fn from_sub_boards(sub_boards: [[SubBoard; BOARD_SIZE]; BOARD_SIZE]) -> Self {
        MainBoard { sub_boards }
    }

    pub fn sub_board(&self, pos: GridPosition) -> &SubBoard {
        &self.sub_boards[pos.row()][pos.col()]
    }

    pub(crate) fn sub_board_mut(&mut self, pos: GridPosition) -> &mut SubBoard {
        &mut self.sub_boards[pos.row()][pos.col()]
    }

    // The outcome of the outer game, scoring sub-board outcomes as marks of
    // a flattened 3x3 board. A won sub-board counts for its winner; a drawn
    // one blocks its cell for both players.
    pub fn outcome(&self) -> BoardOutcome {
        for num in [PlayerNum::P1, PlayerNum::P2] {
            if self.won_by(num) {
                return BoardOutcome::WonBy { player_num: num };
            }
        }
        if self.is_dead() {
            BoardOutcome::Drawn
        } else {
            BoardOutcome::Undecided
        }
    }

    pub(crate) fn won_by(&self, num: PlayerNum) -> bool {
        any_line_complete(|row, col| self.sub_boards[row][col].outcome().is_won_by(num))
    }

    // A dead position is a draw even while cells remain playable: no line is
    // completable by either player once every line holds a drawn sub-board
    // or sub-boards won by both sides.
    pub(crate) fn is_dead(&self) -> bool {
        [PlayerNum::P1, PlayerNum::P2]
            .iter()
            .all(|&num| LINES.iter().all(|line| !self.line_completable(line, num)))
    }

    fn line_completable(&self, line: &[(usize, usize); BOARD_SIZE], num: PlayerNum) -> bool {
        line.iter()
            .all(|&(row, col)| !self.sub_boards[row][col].outcome().blocks(num))
    }
}
