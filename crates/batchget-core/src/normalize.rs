//! Turns configured targets into queueable jobs.

use batchget_schema::Target;

use crate::probe::InstalledSet;

/// A normalized target, owned by exactly one worker once dequeued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    /// The target, with `path` filled in.
    pub target: Target,
    /// Final identifier segment, used to prefix output.
    pub short_name: String,
}

/// Outcome of [`normalize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalized {
    /// Ready to be queued.
    Job(Job),
    /// Already installed; nothing to do.
    Skip(Target),
}

/// Filter out installed targets and derive the defaults of the rest.
///
/// The installed check uses the lower-cased identifier. A target without an
/// explicit `path` gets the identifier-derived subpath.
pub fn normalize(mut target: Target, installed: &InstalledSet) -> Normalized {
    if installed.contains(&target.id) {
        return Normalized::Skip(target);
    }

    if target.path.is_empty() {
        target.path = target.id.default_subpath();
    }
    let short_name = target.id.short_name().to_string();

    Normalized::Job(Job { target, short_name })
}
