use serde::{Deserialize, Serialize};

/// Who produced an utterance in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    Robot,
    Patient,
}

/// A single utterance within a conversation log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub who: Speaker,
    /// Scripted or cleaned text. Robot turns always carry this.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Raw captured transcript, kept verbatim for patient turns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_raw: Option<String>,
}

impl Turn {
    pub fn robot(text: impl Into<String>) -> Self {
        Self {
            who: Speaker::Robot,
            text: Some(text.into()),
            text_raw: None,
        }
    }

    pub fn patient(text_raw: impl Into<String>) -> Self {
        Self {
            who: Speaker::Patient,
            text: None,
            text_raw: Some(text_raw.into()),
        }
    }

    /// Text used when this turn answers a question: the raw capture wins
    /// over any cleaned text, empty when neither is present.
    pub fn answer_text(&self) -> String {
        self.text_raw
            .as_deref()
            .or(self.text.as_deref())
            .unwrap_or("")
            .trim()
            .to_string()
    }

    /// Text used when classifying this turn as a question.
    pub fn question_text(&self) -> String {
        self.text.as_deref().unwrap_or("").trim().to_string()
    }
}

/// One survey submodule: a named topic with its candidate question phrasings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmoduleSpec {
    pub name: String,
    #[serde(default)]
    pub questions: Vec<String>,
}

/// A persisted conversation record as flushed by the dialogue service.
///
/// The analyzer only reads `main_module_name`, `submodules`, and `turns`;
/// the session envelope fields are carried for completeness.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatLog {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default)]
    pub ended_at: Option<String>,
    #[serde(default)]
    pub main_module_name: String,
    #[serde(default)]
    pub submodules: Vec<SubmoduleSpec>,
    #[serde(default)]
    pub turns: Vec<Turn>,
}
