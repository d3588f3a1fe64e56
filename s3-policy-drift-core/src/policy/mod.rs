//! Policy document handling: canonical form and structural diffing.

pub mod canonical;
pub mod diff;

pub use canonical::{canonical_pretty, canonicalize};
pub use diff::{diff_documents, render_diff, DiffEntry, DiffKind};
