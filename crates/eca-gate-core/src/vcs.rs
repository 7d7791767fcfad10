//! Version-control capability.

use crate::commit::Commit;
use crate::error::GateResult;
use crate::range::CherryEntry;

/// Read-only queries against the repository receiving the push.
pub trait VersionControl {
    /// Patch-equivalence diff of `revision` against `reference`, oldest first.
    fn range_diff(&self, reference: &str, revision: &str) -> GateResult<Vec<CherryEntry>>;

    /// Metadata of a single commit.
    fn read_fields(&self, sha: &str) -> GateResult<Commit>;

    /// Metadata of several commits, in the order given.
    ///
    /// Implementations backed by a subprocess should override this with a
    /// single bulk query.
    fn read_many(&self, shas: &[String]) -> GateResult<Vec<Commit>> {
        shas.iter().map(|sha| self.read_fields(sha)).collect()
    }
}
