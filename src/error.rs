//! Document-level failure taxonomy.
//!
//! Element-level problems (an unresolvable annotation, a transition with the
//! wrong arity, an empty species id) are recovered in place with a warning
//! and never surface here. These types cover the failures that abort a whole
//! operation, split so a host can offer different recovery paths for a
//! malformed source document, an inconsistent diagram, and a failed write.

use thiserror::Error;

/// Failure while turning an SBML document into a diagram.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("source document malformed: {0}")]
    SourceMalformed(String),
}

/// Failure while turning a diagram back into an SBML document.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The connectivity precondition failed; nothing was written.
    #[error("diagram inconsistent: {0}")]
    GraphInconsistent(String),
    #[error("serialization failed")]
    Serialization(#[from] std::io::Error),
}
