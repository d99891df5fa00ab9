use serde::Serialize;

/// A reconstructed question/answer unit attributed to a submodule.
///
/// Rebuilt from scratch on every analysis run; the module label is never
/// empty once reconstruction has finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QaPair {
    pub module: String,
    pub question: String,
    pub answer: String,
}

/// One row of the persisted result table. Field order is the column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultRow {
    pub module: String,
    pub questions: String,
    pub answers: String,
    pub summary: String,
    /// Raw digit string pulled from the score line; empty when absent.
    pub score: String,
}

impl ResultRow {
    /// A row for a pair the model produced no block for.
    pub fn unscored(qa: &QaPair) -> Self {
        Self {
            module: qa.module.clone(),
            questions: qa.question.clone(),
            answers: qa.answer.clone(),
            summary: String::new(),
            score: String::new(),
        }
    }
}
