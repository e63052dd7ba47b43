//! Error types shared by the clustering and fitting stages.
//!
//! Two levels exist:
//! - [`LaneError`] aborts the whole call (bad shapes, bad parameters, a
//!   singular transform, a failing predictor).
//! - [`LaneFitError`] is attached to a single lane and never stops the others.

/// Failure of a clustering, fitting or detector call as a whole.
#[derive(Debug, Clone, PartialEq)]
pub enum LaneError {
    /// Embedding map and foreground mask disagree on their spatial size.
    DimensionMismatch {
        /// `(width, height)` of the embedding map.
        embedding: (usize, usize),
        /// `(width, height)` of the foreground mask.
        mask: (usize, usize),
    },
    /// The transform built from the predicted parameters has no inverse.
    DegenerateTransform {
        /// Determinant of the constrained 3×3 matrix.
        determinant: f32,
    },
    /// A parameter is outside its valid range.
    InvalidParams(String),
    /// Backing storage does not match the declared shape.
    InvalidBuffer {
        /// Number of elements implied by the shape.
        expected: usize,
        /// Number of elements supplied.
        got: usize,
    },
    /// An injected predictor reported a failure.
    Predictor(String),
}

impl std::fmt::Display for LaneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DimensionMismatch { embedding, mask } => write!(
                f,
                "dimension mismatch: embedding is {}x{}, mask is {}x{}",
                embedding.0, embedding.1, mask.0, mask.1
            ),
            Self::DegenerateTransform { determinant } => {
                write!(f, "degenerate transform: determinant {:e}", determinant)
            }
            Self::InvalidParams(msg) => write!(f, "invalid parameters: {}", msg),
            Self::InvalidBuffer { expected, got } => {
                write!(f, "invalid buffer: expected {} elements, got {}", expected, got)
            }
            Self::Predictor(msg) => write!(f, "predictor failed: {}", msg),
        }
    }
}

impl std::error::Error for LaneError {}

/// Failure local to one lane; the lane yields an empty point sequence.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum LaneFitError {
    /// Fewer usable points than `poly_degree + 1`.
    InsufficientPoints {
        /// Points required by the polynomial degree.
        needed: usize,
        /// Usable points after rectification.
        got: usize,
    },
    /// The least-squares solve produced no finite coefficients, or none of
    /// the resampled points could be projected back.
    NumericalFailure,
}

impl std::fmt::Display for LaneFitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InsufficientPoints { needed, got } => {
                write!(f, "insufficient points: need {}, got {}", needed, got)
            }
            Self::NumericalFailure => write!(f, "least-squares fit failed"),
        }
    }
}

impl std::error::Error for LaneFitError {}
