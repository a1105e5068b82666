use thiserror::Error;

/// Why a start or end point was not placed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("Cannot place on a wall (obstacle)!")]
    Wall,
    #[error("Point already placed here!")]
    Duplicate,
    #[error("No maze loaded yet")]
    NoGrid,
}

/// Everything that can go wrong in a session. All of these are recoverable
/// and shown to the user as a short lived notice.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Advisory {
    #[error("Failed to load images: {0}")]
    Catalog(String),
    #[error("Failed to process image: {0}")]
    GridFetch(String),
    #[error("Failed to load image preview: {0}")]
    ImageFetch(String),
    #[error(transparent)]
    PlacementRejected(#[from] Rejection),
    #[error("Please place at least one start and one end point.")]
    MissingEndpoints,
    #[error("No path found between start and end points!")]
    NoPathFound,
    #[error("Failed to find path: {0}")]
    SolveTransport(String),
}

impl Advisory {
    /// Placement feedback only needs to be on screen briefly
    pub fn is_transient(&self) -> bool {
        matches!(self, Advisory::PlacementRejected(_))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            Advisory::from(Rejection::Wall).to_string(),
            "Cannot place on a wall (obstacle)!"
        );
        assert_eq!(
            Advisory::GridFetch("connection refused".into()).to_string(),
            "Failed to process image: connection refused"
        );
        assert!(Advisory::from(Rejection::Duplicate).is_transient());
        assert!(!Advisory::NoPathFound.is_transient());
    }
}
