use thiserror::Error;

/// Top-level error type for the strokis tessellator.
#[derive(Debug, Error)]
pub enum StrokisError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Tessellation(#[from] TessellationError),
}

/// Errors raised while constructing batches, drawers or styles.
///
/// These are only ever returned from constructors and setters, so a value
/// that exists is always usable.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("pixel size must be positive and finite, got {0}")]
    PixelSize(f32),

    #[error("batch capacity {requested} is outside [{min}, {max}] vertices")]
    Capacity {
        requested: usize,
        min: usize,
        max: usize,
    },

    #[error("stroke width must be positive and finite, got {0}")]
    StrokeWidth(f32),
}

/// Errors raised while triangulating a filled polygon.
#[derive(Debug, Error)]
pub enum TessellationError {
    #[error("polygon outline needs at least 3 distinct points, got {0}")]
    TooFewPoints(usize),

    #[error("polygon outline intersects itself")]
    SelfIntersecting,

    #[error("triangulation failed: {0}")]
    Failed(String),
}

/// Convenience type alias for results using [`StrokisError`].
pub type Result<T> = std::result::Result<T, StrokisError>;
