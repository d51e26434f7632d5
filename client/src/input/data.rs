use serde::{Deserialize, Serialize};
use shared::players::MoveAction;

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone, Copy, Eq, Hash, PartialOrd, Ord)]
pub enum GameAction {
    MoveForward,
    MoveBackward,
    MoveLeft,
    MoveRight,
    Jump,
}

impl GameAction {
    pub const ALL: [GameAction; 5] = [
        GameAction::MoveForward,
        GameAction::MoveBackward,
        GameAction::MoveLeft,
        GameAction::MoveRight,
        GameAction::Jump,
    ];

    /// The held movement this action stands for, if any.
    pub fn move_action(self) -> Option<MoveAction> {
        match self {
            GameAction::MoveForward => Some(MoveAction::MoveForward),
            GameAction::MoveBackward => Some(MoveAction::MoveBackward),
            GameAction::MoveLeft => Some(MoveAction::MoveLeft),
            GameAction::MoveRight => Some(MoveAction::MoveRight),
            GameAction::Jump => None,
        }
    }
}
