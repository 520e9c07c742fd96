use crate::client::SendMsg;
use crate::util;
use common::{
    messages::{Outcome, Response},
    GameResult, GameState, PlayerNum, RawMove,
};
use hashbrown::HashMap;
use serde::Serialize;
use serde_json::from_str;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::warn;

pub type Games = Arc<RwLock<HashMap<String, Game>>>;

#[derive(Clone, Debug)]
enum ProtocolState {
    InGame,
    // true means that the player wants a rematch, false means they don't
    Rematch([Option<bool>; 2]),
    End,
}

// One hosted match. The rules live entirely in the engine's GameState; this
// type only sequences the session protocol around it.
#[derive(Debug)]
pub struct Game {
    game_state: GameState,
    // The first element is Player 1's ID and the second is Player 2's ID
    player_ids: [String; 2],
    protocol_state: ProtocolState,
}

impl Game {
    pub fn new(player_ids: [String; 2]) -> Self {
        Game {
            game_state: GameState::default(),
            player_ids,
            protocol_state: ProtocolState::InGame,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.game_state
    }

    pub fn is_over(&self) -> bool {
        matches!(self.protocol_state, ProtocolState::End)
    }

    // Given a client's ID, gets the opponent's ID for the game they have joined
    pub fn opponent_id(&self, id: String) -> String {
        if id == self.player_ids[0] {
            self.player_ids[1].clone()
        } else if id == self.player_ids[1] {
            self.player_ids[0].clone()
        } else {
            panic!(
                "Client with ID {} did not match any of the game's client IDs {:?}",
                id, self.player_ids
            );
        }
    }

    pub fn handle_message(
        &mut self,
        player_num: PlayerNum,
        msg: &str,
        client: &impl SendMsg,
        opponent: &impl SendMsg,
    ) {
        use ProtocolState::*;
        self.protocol_state = match self.protocol_state.clone() {
            InGame => {
                let raw_move: RawMove = match from_str(msg) {
                    Ok(raw_move) => raw_move,
                    Err(err) => {
                        warn!("Failed to deserialize input into a move: {}", err);
                        return;
                    }
                };
                self.process_move(client, opponent, player_num, raw_move)
            }
            Rematch(choices) => {
                let choice: bool = match from_str(msg) {
                    Ok(choice) => choice,
                    Err(err) => {
                        warn!("Failed to deserialize input into rematch choice: {}", err);
                        return;
                    }
                };
                self.process_rematch_choice(client, opponent, choices, player_num, choice)
            }
            End => End,
        }
    }

    fn process_move(
        &mut self,
        client: &impl SendMsg,
        opponent: &impl SendMsg,
        player_num: PlayerNum,
        raw_move: RawMove,
    ) -> ProtocolState {
        if player_num != self.game_state.current_player() {
            warn!("Player {:?} sent a move out of turn", player_num);
            return ProtocolState::InGame;
        }
        if let Err(err) = self.game_state.apply_move(raw_move) {
            warn!("Rejected move from {:?}: {}", player_num, err);
            return ProtocolState::InGame;
        }
        match self.game_state.result() {
            GameResult::InProgress => {
                let snapshot = Response::GameState {
                    state: self.game_state.clone(),
                };
                let opponent_snapshot = Response::GameState {
                    state: self.game_state.clone(),
                };
                send_messages(client, snapshot, opponent, opponent_snapshot);
                ProtocolState::InGame
            }
            GameResult::Win { player_num: winner } => {
                let (client_outcome, opponent_outcome) = if winner == player_num {
                    (Outcome::Win, Outcome::Lose)
                } else {
                    (Outcome::Lose, Outcome::Win)
                };
                self.send_outcomes(client, client_outcome, opponent, opponent_outcome);
                ProtocolState::Rematch([None, None])
            }
            GameResult::Draw => {
                self.send_outcomes(client, Outcome::Draw, opponent, Outcome::Draw);
                ProtocolState::Rematch([None, None])
            }
        }
    }

    fn process_rematch_choice(
        &mut self,
        client: &impl SendMsg,
        opponent: &impl SendMsg,
        choices: [Option<bool>; 2],
        player_num: PlayerNum,
        choice: bool,
    ) -> ProtocolState {
        let choices = match player_num {
            PlayerNum::P1 => [Some(choice), choices[1]],
            PlayerNum::P2 => [choices[0], Some(choice)],
        };
        match choices {
            [Some(true), Some(true)] => {
                self.game_state.reset();
                let restart = Response::GameStart {
                    player_num,
                    state: self.game_state.clone(),
                };
                let opponent_restart = Response::GameStart {
                    player_num: player_num.other(),
                    state: self.game_state.clone(),
                };
                send_messages(client, restart, opponent, opponent_restart);
                ProtocolState::InGame
            }
            // Let ws module handle removing the game
            [_, Some(false)] | [Some(false), _] => ProtocolState::End,
            _ => ProtocolState::Rematch(choices),
        }
    }

    fn send_outcomes(
        &self,
        client: &impl SendMsg,
        client_outcome: Outcome,
        opponent: &impl SendMsg,
        opponent_outcome: Outcome,
    ) {
        let client_msg = Response::GameEnd {
            outcome: client_outcome,
            state: self.game_state.clone(),
        };
        let opponent_msg = Response::GameEnd {
            outcome: opponent_outcome,
            state: self.game_state.clone(),
        };
        send_messages(client, client_msg, opponent, opponent_msg);
    }
}

fn send_message<M: Serialize>(client: &impl SendMsg, message: M) {
    // If the message fails to send even after retries, there's not much we can do but proceed
    let _ = util::retry(1, || client.send(&serde_json::to_string(&message).unwrap()));
}

fn send_messages<M1: Serialize, M2: Serialize>(
    client1: &impl SendMsg,
    message1: M1,
    client2: &impl SendMsg,
    message2: M2,
) {
    send_message(client1, message1);
    send_message(client2, message2);
}
