use crate::xo::board::{GridPosition, MainBoard};
use crate::xo::input::{MoveError, RawMove, ValidMove};
use crate::xo::player::PlayerNum;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameResult {
    InProgress,
    Win { player_num: PlayerNum },
    Draw,
}

// The aggregate root of one match. Every mutation goes through `update`
// with a move validated against this same state; there is no other mutation
// path. One instance per match, nothing process-wide.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    main_board: MainBoard,
    current_player: PlayerNum,
    active_board: Option<GridPosition>,
    result: GameResult,
}

impl Default for GameState {
    fn default() -> Self {
        GameState {
            main_board: MainBoard::default(),
            current_player: PlayerNum::P1,
            active_board: None,
            result: GameResult::InProgress,
        }
    }
}

impl GameState {
    pub fn main_board(&self) -> &MainBoard {
        &self.main_board
    }

    pub fn current_player(&self) -> PlayerNum {
        self.current_player
    }

    // None means the current player may pick any undecided sub-board.
    pub fn active_board(&self) -> Option<GridPosition> {
        self.active_board
    }

    pub fn result(&self) -> GameResult {
        self.result
    }

    // Validate and apply in one step. On rejection the error names the cause
    // and the state is untouched.
    pub fn apply_move(&mut self, raw_move: RawMove) -> Result<(), MoveError> {
        let valid_move = ValidMove::new(raw_move, self)?;
        self.update(valid_move);
        Ok(())
    }

    // Apply an already-validated move. The update order matters: the target
    // sub-board settles first, then the game result, then the forced-board
    // pointer, and the turn only passes while the game is still running.
    pub fn update(&mut self, valid_move: ValidMove) {
        let player_num = self.current_player;
        let main = valid_move.main();
        let sub = valid_move.sub();

        self.main_board.sub_board_mut(main).place(sub, player_num);

        // Only a sub-board won by this move can decide the outer game.
        if self.main_board.sub_board(main).outcome().is_won_by(player_num)
            && self.main_board.won_by(player_num)
        {
            self.result = GameResult::Win { player_num };
        }
        if self.result == GameResult::InProgress && self.main_board.is_dead() {
            self.result = GameResult::Draw;
        }

        // The cell just played addresses the sub-board the opponent is sent
        // to; a decided destination frees the choice instead.
        self.active_board = if self.main_board.sub_board(sub).outcome().is_decided() {
            None
        } else {
            Some(sub)
        };

        if self.result == GameResult::InProgress {
            self.current_player = player_num.other();
        }
    }

    pub fn reset(&mut self) {
        *self = GameState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xo::board::{BoardOutcome, CellState, SubBoard, BOARD_SIZE};

    fn raw(main_row: usize, main_col: usize, sub_row: usize, sub_col: usize) -> RawMove {
        RawMove {
            main_row,
            main_col,
            sub_row,
            sub_col,
        }
    }

    fn pos(row: usize, col: usize) -> GridPosition {
        GridPosition::new(row, col).unwrap()
    }

    fn play_all(state: &mut GameState, moves: &[(usize, usize, usize, usize)]) {
        for &(main_row, main_col, sub_row, sub_col) in moves {
            state
                .apply_move(raw(main_row, main_col, sub_row, sub_col))
                .unwrap();
        }
    }

    // Five legal moves that bounce play back to (0, 0) until Player 1 owns
    // its whole top row.
    const WIN_SUB_BOARD: [(usize, usize, usize, usize); 5] = [
        (0, 0, 0, 2),
        (0, 2, 0, 0),
        (0, 0, 0, 1),
        (0, 1, 0, 0),
        (0, 0, 0, 0),
    ];

    // Extends WIN_SUB_BOARD until Player 1 also wins (0, 1) and (0, 2),
    // completing the top row of the main board. Player 2 only ever feeds
    // play back without threatening a sub-board.
    const WIN_GAME: [(usize, usize, usize, usize); 17] = [
        (0, 0, 0, 2),
        (0, 2, 0, 0),
        (0, 0, 0, 1),
        (0, 1, 0, 0),
        (0, 0, 0, 0),
        (2, 2, 0, 1),
        (0, 1, 0, 2),
        (0, 2, 0, 1),
        (0, 1, 1, 2),
        (1, 2, 0, 1),
        (0, 1, 2, 2),
        (2, 2, 0, 2),
        (0, 2, 2, 0),
        (2, 0, 0, 2),
        (0, 2, 2, 1),
        (2, 1, 0, 2),
        (0, 2, 2, 2),
    ];

    fn drawn_board() -> SubBoard {
        let x = CellState::Marked {
            player_num: PlayerNum::P1,
        };
        let o = CellState::Marked {
            player_num: PlayerNum::P2,
        };
        SubBoard::from_cells([[x, x, o], [o, o, x], [x, x, o]])
    }

    #[test]
    fn test_first_move_marks_cell_and_forces_board() {
        let mut state = GameState::default();
        state.apply_move(raw(0, 0, 0, 0)).unwrap();
        assert!(state
            .main_board()
            .sub_board(pos(0, 0))
            .cell(pos(0, 0))
            .is_marked_by(PlayerNum::P1));
        assert_eq!(state.active_board(), Some(pos(0, 0)));
        assert_eq!(state.current_player(), PlayerNum::P2);
        assert_eq!(state.result(), GameResult::InProgress);
    }

    #[test]
    fn test_rejected_move_leaves_state_unchanged() {
        let mut state = GameState::default();
        state.apply_move(raw(0, 0, 0, 0)).unwrap();
        let before = state.clone();
        // Play is forced into (0, 0); (1, 1) is the wrong sub-board.
        assert!(state.apply_move(raw(1, 1, 0, 0)).is_err());
        assert_eq!(state, before);
        // Occupied cell and out-of-range indices reject the same way.
        assert!(state.apply_move(raw(0, 0, 0, 0)).is_err());
        assert!(state.apply_move(raw(0, 0, 3, 3)).is_err());
        assert_eq!(state, before);
    }

    #[test]
    fn test_turns_alternate_while_in_progress() {
        let mut state = GameState::default();
        let mut expected = PlayerNum::P1;
        for &(main_row, main_col, sub_row, sub_col) in &WIN_GAME[..16] {
            assert_eq!(state.current_player(), expected);
            state
                .apply_move(raw(main_row, main_col, sub_row, sub_col))
                .unwrap();
            expected = expected.other();
        }
    }

    #[test]
    fn test_forced_board_follows_sub_cell() {
        let mut state = GameState::default();
        for &(main_row, main_col, sub_row, sub_col) in &WIN_GAME {
            state
                .apply_move(raw(main_row, main_col, sub_row, sub_col))
                .unwrap();
            let destination = pos(sub_row, sub_col);
            if state.main_board().sub_board(destination).outcome().is_decided() {
                assert_eq!(state.active_board(), None);
            } else {
                assert_eq!(state.active_board(), Some(destination));
            }
        }
    }

    #[test]
    fn test_winning_a_sub_board_frees_board_choice() {
        let mut state = GameState::default();
        play_all(&mut state, &WIN_SUB_BOARD);
        assert_eq!(
            state.main_board().sub_board(pos(0, 0)).outcome(),
            BoardOutcome::WonBy {
                player_num: PlayerNum::P1
            }
        );
        // The winning move pointed back into the now-decided (0, 0).
        assert_eq!(state.active_board(), None);
        assert_eq!(state.current_player(), PlayerNum::P2);
        assert_eq!(state.result(), GameResult::InProgress);
    }

    #[test]
    fn test_decided_sub_board_rejects_further_marks() {
        let mut state = GameState::default();
        play_all(&mut state, &WIN_SUB_BOARD);
        let outcome = state.main_board().sub_board(pos(0, 0)).outcome();
        assert!(state.apply_move(raw(0, 0, 2, 2)).is_err());
        // The outcome never reverts once decided.
        assert_eq!(state.main_board().sub_board(pos(0, 0)).outcome(), outcome);
    }

    #[test]
    fn test_winning_three_sub_boards_in_a_row_wins_the_game() {
        let mut state = GameState::default();
        play_all(&mut state, &WIN_GAME);
        for col in 0..BOARD_SIZE {
            assert_eq!(
                state.main_board().sub_board(pos(0, col)).outcome(),
                BoardOutcome::WonBy {
                    player_num: PlayerNum::P1
                }
            );
        }
        assert_eq!(
            state.result(),
            GameResult::Win {
                player_num: PlayerNum::P1
            }
        );
        // The turn does not pass once the game is over, and no further move
        // is accepted.
        assert_eq!(state.current_player(), PlayerNum::P1);
        assert!(matches!(
            state.apply_move(raw(1, 1, 1, 1)),
            Err(MoveError::GameOver)
        ));
    }

    #[test]
    fn test_drawing_the_last_sub_board_draws_the_game() {
        let e = CellState::Empty;
        let x = CellState::Marked {
            player_num: PlayerNum::P1,
        };
        let o = CellState::Marked {
            player_num: PlayerNum::P2,
        };
        let mut sub_boards = [[drawn_board(); BOARD_SIZE]; BOARD_SIZE];
        // (2, 2) is one mark short of a draw; (2, 2) in it stays empty.
        sub_boards[2][2] = SubBoard::from_cells([[x, x, o], [o, o, x], [x, x, e]]);
        let mut state = GameState {
            main_board: MainBoard::from_sub_boards(sub_boards),
            current_player: PlayerNum::P2,
            active_board: Some(pos(2, 2)),
            result: GameResult::InProgress,
        };
        state.apply_move(raw(2, 2, 2, 2)).unwrap();
        assert_eq!(
            state.main_board().sub_board(pos(2, 2)).outcome(),
            BoardOutcome::Drawn
        );
        assert_eq!(state.result(), GameResult::Draw);
        // A drawn game is terminal.
        assert!(matches!(
            state.apply_move(raw(2, 2, 2, 2)),
            Err(MoveError::GameOver)
        ));
    }

    #[test]
    fn test_dead_position_is_drawn_before_all_boards_are_decided() {
        let e = CellState::Empty;
        let x = CellState::Marked {
            player_num: PlayerNum::P1,
        };
        let o = CellState::Marked {
            player_num: PlayerNum::P2,
        };
        let mut sub_boards = [[SubBoard::default(); BOARD_SIZE]; BOARD_SIZE];
        sub_boards[0][0] = drawn_board();
        sub_boards[1][1] = drawn_board();
        // Drawing (2, 2) leaves every main-board line running through a
        // drawn sub-board, so the game is dead with six boards untouched.
        sub_boards[2][2] = SubBoard::from_cells([[x, x, o], [o, o, x], [x, x, e]]);
        let mut state = GameState {
            main_board: MainBoard::from_sub_boards(sub_boards),
            current_player: PlayerNum::P2,
            active_board: Some(pos(2, 2)),
            result: GameResult::InProgress,
        };
        state.apply_move(raw(2, 2, 2, 2)).unwrap();
        assert_eq!(
            state.main_board().sub_board(pos(2, 2)).outcome(),
            BoardOutcome::Drawn
        );
        assert_eq!(state.result(), GameResult::Draw);
    }

    #[test]
    fn test_reset_returns_to_the_initial_state() {
        let mut state = GameState::default();
        play_all(&mut state, &WIN_GAME);
        assert_ne!(state, GameState::default());
        state.reset();
        assert_eq!(state, GameState::default());
        // Play restarts normally after a reset.
        assert!(state.apply_move(raw(1, 1, 1, 1)).is_ok());
    }
}
