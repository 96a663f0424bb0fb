use crate::error::{Error, Result};
use crate::matching::model::Matching;

/// Shared shape of the matchers: construct over a graph, `run` once, then read
/// the result.
pub trait MatchingAlgorithm {
    fn name(&self) -> &'static str;

    /// Compute the matching. A second call fails with [`Error::AlreadyRun`]
    /// and leaves the first result in place.
    fn run(&mut self) -> Result<()>;

    fn has_finished(&self) -> bool;

    /// Borrow the result; [`Error::NotRun`] before `run`.
    fn matching(&self) -> Result<&Matching>;

    /// Owned copy of the result.
    fn get_matching(&self) -> Result<Matching> {
        self.matching().cloned()
    }
}

/// Result slot shared by the matchers; enforces the run-once contract.
#[derive(Debug, Clone, Default)]
pub(crate) struct RunState {
    result: Option<Matching>,
}

impl RunState {
    pub(crate) fn ensure_not_run(&self) -> Result<()> {
        if self.result.is_some() {
            Err(Error::AlreadyRun)
        } else {
            Ok(())
        }
    }

    pub(crate) fn finish(&mut self, matching: Matching) {
        self.result = Some(matching);
    }

    pub(crate) fn has_finished(&self) -> bool {
        self.result.is_some()
    }

    pub(crate) fn matching(&self) -> Result<&Matching> {
        self.result.as_ref().ok_or(Error::NotRun)
    }
}
