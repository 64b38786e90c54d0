//! Question record model
//!
//! The same four-field shape is stored in all three JSON files and is used
//! as the request body for submissions and edited commits.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Question text shown while no verified translation exists yet
pub const PLACEHOLDER_QUESTION: &str = "Traduction manquante...";

/// One quiz question with its correct answer and two distractors.
///
/// Fields may be empty but are capped at 4096 characters when received
/// over the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct QuestionRecord {
    #[validate(length(max = 4096, message = "Question must be at most 4096 characters"))]
    pub question: String,

    #[validate(length(max = 4096, message = "Correct answer must be at most 4096 characters"))]
    pub correct: String,

    #[validate(length(max = 4096, message = "First incorrect answer must be at most 4096 characters"))]
    pub incorrect_1: String,

    #[validate(length(max = 4096, message = "Second incorrect answer must be at most 4096 characters"))]
    pub incorrect_2: String,
}

impl QuestionRecord {
    pub fn new(
        question: impl Into<String>,
        correct: impl Into<String>,
        incorrect_1: impl Into<String>,
        incorrect_2: impl Into<String>,
    ) -> Self {
        Self {
            question: question.into(),
            correct: correct.into(),
            incorrect_1: incorrect_1.into(),
            incorrect_2: incorrect_2.into(),
        }
    }

    /// Stand-in for a question that has no verified translation
    pub fn placeholder() -> Self {
        Self::new(PLACEHOLDER_QUESTION, "", "", "")
    }
}
