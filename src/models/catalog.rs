use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::SubmoduleSpec;

/// One main survey module grouping related submodules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyModule {
    /// Display name of the module, stored as "Type" in the catalog file.
    #[serde(rename = "Type")]
    pub kind: String,
    #[serde(default)]
    pub submodules: Vec<SubmoduleSpec>,
}

impl SurveyModule {
    /// One random question from each submodule, in submodule order.
    pub fn form_questions<R: rand::Rng>(&self, rng: &mut R) -> Vec<String> {
        self.submodules
            .iter()
            .filter_map(|sub| sub.questions.choose(rng).cloned())
            .collect()
    }
}

/// The survey taxonomy: all main modules with their submodules and questions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleCatalog {
    pub modules: Vec<SurveyModule>,
}

impl ModuleCatalog {
    /// Placeholder catalog written out when no modules file exists yet.
    pub fn default_catalog() -> Self {
        Self {
            modules: vec![SurveyModule {
                kind: "ปัจจัยตัวอย่าง".to_string(),
                submodules: vec![SubmoduleSpec {
                    name: "หัวข้อย่อยตัวอย่าง".to_string(),
                    questions: vec!["คำถามตัวอย่าง 1".to_string()],
                }],
            }],
        }
    }

    /// Pick one main module for a new conversation plan.
    pub fn choose_module<R: rand::Rng>(&self, rng: &mut R) -> Option<&SurveyModule> {
        self.modules.choose(rng)
    }
}
