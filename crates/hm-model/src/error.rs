use hm_core::{CoreError, ModelId};
use thiserror::Error;

/// Failures raised by [`ModelTree`][crate::ModelTree] operations.
///
/// Every variant is detected before the tree is touched, so a failed call
/// leaves the tree exactly as it was.
#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("model {0} does not exist (destroyed or never created)")]
    UnknownModel(ModelId),

    #[error("cannot add a null child to {parent}")]
    NullChild {
        parent:    ModelId,
        /// The stale handle, if one was passed instead of `None`.
        candidate: Option<ModelId>,
    },

    #[error("model {0} cannot be its own child")]
    SelfReference(ModelId),

    #[error("{child} is already a descendant of {parent}")]
    DuplicateDescendant { parent: ModelId, child: ModelId },

    #[error("adding {child} under {parent} would create a cycle")]
    CyclicDescendant { parent: ModelId, child: ModelId },

    #[error("{child} is already owned by another parent")]
    AlreadyAttached { child: ModelId },

    #[error("dt must be positive, got {dt}")]
    NonPositiveStep { dt: f64 },

    #[error("model {0} is owned by a parent and cannot be removed on its own")]
    StillAttached(ModelId),

    #[error(transparent)]
    Tag(#[from] CoreError),
}

impl ModelError {
    /// `true` for caller precondition violations (bad argument), as opposed
    /// to lookups of nodes that no longer exist.
    pub fn is_invalid_argument(&self) -> bool {
        !matches!(self, ModelError::UnknownModel(_))
    }

    /// `true` for the attach failures that would break single ownership:
    /// duplicate membership, cycles, and second parents.
    pub fn is_duplicate_or_cycle(&self) -> bool {
        matches!(
            self,
            ModelError::DuplicateDescendant { .. }
                | ModelError::CyclicDescendant { .. }
                | ModelError::AlreadyAttached { .. }
        )
    }
}

pub type ModelResult<T> = Result<T, ModelError>;
