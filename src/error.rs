use thiserror::Error;

/// Errors raised while building a fly-through.
///
/// All of these are startup failures. Once the rig is built, ticking and
/// shading never fail.
#[derive(Debug, Error)]
pub enum FlythroughError {
    /// The asset carried no line geometry at all.
    #[error("no line geometry found for path")]
    MissingPath,
    /// The coordinate buffer length is not a multiple of three.
    #[error("malformed path geometry: buffer of {len} floats is not a multiple of 3")]
    MalformedGeometry { len: usize },
    /// A closed curve needs at least two control points.
    #[error("closed curve needs at least 2 control points, found {found}")]
    InsufficientControlPoints { found: usize },
    /// A path asset failed to load.
    #[error("failed to load path asset `{path}`: {reason}")]
    AssetLoad { path: String, reason: String },
    #[error("loop period must be positive and finite, got {0}")]
    InvalidLoopPeriod(f64),
    #[error("invalid color `{0}`")]
    InvalidColor(String),
    #[error("failed to parse config: {0}")]
    ConfigParse(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = FlythroughError> = std::result::Result<T, E>;
