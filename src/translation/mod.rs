//! Translation workflows
//!
//! Community submission of proposals and admin review of them.

mod desk;
mod review;
mod session;

pub use desk::{ResolveOutcome, ReviewItem, ReviewQueue, SubmissionView, SubmitOutcome, TranslationDesk};
pub use review::ReviewAction;
pub use session::{Direction, SubmissionCursor};
