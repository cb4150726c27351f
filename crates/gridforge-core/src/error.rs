use crate::artboard::ArtboardId;

/// Failures at the boundary where document artboards are turned into grid
/// origins. Grid generation and snapping themselves never fail.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    #[error("artboard {0} is not part of the document")]
    UnknownArtboard(ArtboardId),

    #[error("artboard {0} has a non-finite bounding rectangle")]
    NonFiniteBounds(ArtboardId),
}

pub type Result<T> = std::result::Result<T, GridError>;
