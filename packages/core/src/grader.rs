//! Grader trait and error taxonomy.

use std::future::Future;
use std::pin::Pin;

use crate::{EssaySubmission, GradeResult};

/// Errors a grading attempt can end with.
///
/// Every variant is terminal for the job it belongs to; the dispatcher
/// records the message on the job and moves on. An unknown job id is
/// represented as absence on poll, not as an error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GradeError {
    /// The scoring reply carried no decodable structured block. Fatal,
    /// never retried.
    #[error("could not parse grading reply")]
    Parse,

    /// The scoring service answered with no content.
    #[error("scoring service returned an empty reply")]
    EmptyReply,

    /// The scoring service kept throttling until the retry budget ran out.
    #[error("rate limited after {attempts} attempts")]
    RateLimited { attempts: u32 },

    /// Any other call failure. Fatal immediately.
    #[error("scoring call failed: {0}")]
    Transport(String),
}

/// Future type for async grading calls.
pub type GradeFuture = Pin<Box<dyn Future<Output = Result<GradeResult, GradeError>> + Send>>;

/// Trait for grading one essay submission.
///
/// Implementations must be reentrant: concurrent calls share nothing but
/// the implementation's own read-only handles. The dispatcher holds a
/// `dyn Grader` so tests can swap in stubs.
pub trait Grader: Send + Sync + 'static {
    /// Grade a submission and return the validated result.
    fn grade(&self, submission: &EssaySubmission) -> GradeFuture;
}

/// A simple function-based grader, mainly for tests and wiring.
pub struct FnGrader<F>
where
    F: Fn(&EssaySubmission) -> GradeFuture + Send + Sync + 'static,
{
    grade_fn: F,
}

impl<F> FnGrader<F>
where
    F: Fn(&EssaySubmission) -> GradeFuture + Send + Sync + 'static,
{
    /// Create a new function-based grader.
    pub fn new(grade_fn: F) -> Self {
        Self { grade_fn }
    }
}

impl<F> Grader for FnGrader<F>
where
    F: Fn(&EssaySubmission) -> GradeFuture + Send + Sync + 'static,
{
    fn grade(&self, submission: &EssaySubmission) -> GradeFuture {
        (self.grade_fn)(submission)
    }
}
