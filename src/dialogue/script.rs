use rand::seq::SliceRandom;

use crate::models::ModuleCatalog;

use super::session::Session;
use super::state::DialogueState;

/// Scripted Thai lines spoken by the robot.
pub const GREETING: &str = "สวัสดีครับ ผมขอรบกวนถามคำถามสั้นๆ ได้ไหมครับ";
pub const DENIED_CLOSING: &str = "ขอบคุณครับ แล้วขอให้มีวันที่ดีนะครับ";
pub const DAILY_ACTIVITY_QUESTION: &str = "วันนี้ท่านมาใช้บริการอะไรที่โรงพยาบาลครับ";
pub const THANK_YOU_CLOSING: &str = "ขอบคุณมากสำหรับคำตอบของท่าน ขอให้มีวันที่ดีนะครับ";

/// Patient phrases that decline the survey at the permission gate.
#[derive(Debug, Clone)]
pub struct PermissionConfig {
    pub denial_keywords: Vec<String>,
}

impl Default for PermissionConfig {
    fn default() -> Self {
        Self {
            denial_keywords: ["ไม่", "ไม่สะดวก", "ไม่เอา"].map(String::from).to_vec(),
        }
    }
}

/// Whether a reply at the permission gate grants permission to proceed.
pub fn permission_granted(reply: &str, config: &PermissionConfig) -> bool {
    !config
        .denial_keywords
        .iter()
        .any(|k| reply.contains(k.as_str()))
}

/// Advance the script and produce the robot's next line.
///
/// Mutates the session state; selecting the module plan happens here when
/// the conversation reaches the activity question. Returns `None` once the
/// conversation has ended (or while waiting on a patient reply).
pub fn next_robot_turn<R: rand::Rng>(
    session: &mut Session,
    catalog: &ModuleCatalog,
    rng: &mut R,
) -> Option<String> {
    match session.state {
        DialogueState::Start => {
            session.state = DialogueState::AwaitingPermission;
            Some(GREETING.to_string())
        }
        DialogueState::PermissionDenied => {
            session.state = DialogueState::End;
            Some(DENIED_CLOSING.to_string())
        }
        DialogueState::AskDailyActivity => {
            session.state = DialogueState::AwaitingActivity;
            Some(DAILY_ACTIVITY_QUESTION.to_string())
        }
        DialogueState::AwaitingActivity => {
            let module = catalog.choose_module(rng)?;
            session.main_module_name = module.kind.clone();
            session.submodules = module.submodules.clone();
            session.submodule_index = 0;
            session.state = DialogueState::AskingQuestions;
            Some(format!(
                "ขออนุญาติสอบถามเกี่ยวกับ'{}' สั้นๆ นะครับ",
                session.main_module_name
            ))
        }
        DialogueState::AskingQuestions => {
            let index = session.submodule_index;
            match session.submodules.get(index) {
                Some(sub) => {
                    session.submodule_index += 1;
                    Some(sub.questions.choose(rng).cloned().unwrap_or_default())
                }
                None => {
                    session.state = DialogueState::End;
                    Some(THANK_YOU_CLOSING.to_string())
                }
            }
        }
        DialogueState::AwaitingPermission | DialogueState::End => None,
    }
}
