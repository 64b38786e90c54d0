//! Submission cursor
//!
//! The position of a submitter in the question list travels with each request
//! and response; the server keeps no per-user position.

use crate::error::AppError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionCursor {
    pub index: usize,
    pub total: usize,
}

/// Result of moving past a submitted question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorStep {
    pub cursor: SubmissionCursor,
    /// Set when the submitted question was the last one
    pub completed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Next,
    Previous,
}

impl SubmissionCursor {
    pub fn new(index: usize, total: usize) -> Result<Self, AppError> {
        if index < total {
            Ok(Self { index, total })
        } else {
            Err(AppError::IndexOutOfRange { index, total })
        }
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 >= self.total
    }

    /// 1-based position for display
    pub fn position(&self) -> usize {
        self.index + 1
    }

    pub fn progress(&self) -> f64 {
        self.position() as f64 / self.total as f64
    }

    /// Move on after a submission, staying on the last question at the end
    pub fn advance(self) -> CursorStep {
        if self.is_last() {
            CursorStep {
                cursor: self,
                completed: true,
            }
        } else {
            CursorStep {
                cursor: Self {
                    index: self.index + 1,
                    ..self
                },
                completed: false,
            }
        }
    }

    pub fn step(self, direction: Direction) -> Self {
        let index = match direction {
            Direction::Next => (self.index + 1).min(self.total.saturating_sub(1)),
            Direction::Previous => self.index.saturating_sub(1),
        };
        Self { index, ..self }
    }
}
