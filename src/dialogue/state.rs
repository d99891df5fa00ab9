use serde::{Deserialize, Serialize};

/// The scripted conversation states.
///
/// The conversation is a fixed linear script with a single branch at the
/// permission gate; every robot line advances the state exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogueState {
    Start,
    AwaitingPermission,
    PermissionDenied,
    AskDailyActivity,
    AwaitingActivity,
    AskingQuestions,
    End,
}

impl DialogueState {
    /// Whether the conversation has ended and the session should be flushed.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::End)
    }

    /// Where a patient reply takes the conversation before the next robot
    /// line is produced. Only the permission gate branches on reply
    /// content; every other state is advanced by the robot side.
    pub fn after_patient_reply(self, permission_granted: bool) -> Self {
        match self {
            Self::AwaitingPermission => {
                if permission_granted {
                    Self::AskDailyActivity
                } else {
                    Self::PermissionDenied
                }
            }
            other => other,
        }
    }
}
