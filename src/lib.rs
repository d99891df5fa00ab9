pub mod analysis;
pub mod dialogue;
pub mod io;
pub mod llm;
pub mod models;
pub mod server;

pub use analysis::{
    best_submodule_for, looks_like_question, reconstruct_qa_pairs, rows_from_response,
    run_analysis, similarity_ratio, AnalysisConfig, ClassifierConfig, MatcherConfig,
    ReconstructConfig, SummaryParseConfig,
};
pub use dialogue::{
    next_robot_turn, permission_granted, DialogueState, MemorySessionStore, PermissionConfig,
    Session, SessionStore,
};
pub use io::{append_result_rows, load_or_seed_catalog, parse_chatlog_file, parse_chatlog_json};
pub use llm::{build_survey_prompt, ChatClient, ChatConfig};
pub use models::{
    ChatLog, ModuleCatalog, QaPair, ResultRow, Speaker, SubmoduleSpec, SurveyModule, Turn,
};
pub use server::{serve, AppState, SpeechClient, SpeechConfig};
