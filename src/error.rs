use thiserror::Error;

use crate::math::Coord;

/// Top-level error type for buffering and union operations.
#[derive(Debug, Error)]
pub enum BufferError {
    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Operation(#[from] OperationError),
}

impl BufferError {
    /// Returns `true` if the error is a robustness failure that a retry at a
    /// coarser precision may resolve.
    #[must_use]
    pub fn is_topology(&self) -> bool {
        matches!(self, Self::Topology(_))
    }
}

/// Inconsistent topology found while noding, labelling or ring building.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TopologyError {
    #[error("side location conflict at {0}")]
    SideLocationConflict(Coord),

    #[error("depth mismatch at {0}")]
    DepthMismatch(Coord),

    #[error("assigned depths do not match at {0}")]
    AssignedDepthsDoNotMatch(Coord),

    #[error("unable to find edge to compute depths at {0}")]
    UnableToComputeDepth(Coord),

    #[error("no outgoing directed edge found at {0}")]
    NoOutgoingDirEdge(Coord),

    #[error("ring cannot be closed: dangling directed edge at {0}")]
    RingNotClosed(Coord),

    #[error("directed edge visited twice during ring building at {0}")]
    DirEdgeVisitedTwice(Coord),

    #[error("unable to assign hole to a shell at {0}")]
    UnassignedHole(Coord),

    #[error("found two shells in minimal edge ring list at {0}")]
    FoundTwoShells(Coord),

    #[error("invalid topology: {0}")]
    InvalidTopology(String),

    #[error("entity not found: {0}")]
    EntityNotFound(String),
}

/// Errors caused by the caller's input rather than by numeric robustness.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Convenience type alias for results using [`BufferError`].
pub type Result<T> = std::result::Result<T, BufferError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_topology_errors_are_retryable() {
        let input: BufferError = OperationError::InvalidInput("nan".to_owned()).into();
        assert!(!input.is_topology());
        assert_eq!(input.to_string(), "invalid input: nan");
        let topo: BufferError = TopologyError::DepthMismatch(Coord::new(1.0, 2.0)).into();
        assert!(topo.is_topology());
    }
}
