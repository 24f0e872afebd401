use std::error::Error;
use std::fmt;

/// Fatal conditions of the MP3 pipeline.
///
/// Any of these aborts the whole computation; no partial energies are returned.
#[derive(Debug, Clone, PartialEq)]
pub enum MP3Error {
    /// Tensor or matrix extents do not agree with each other.
    ShapeMismatch(String),

    /// Projected tensor footprint exceeds the caller-supplied budget.
    MemoryBudget { stage: &'static str, required_gb: f64, budget_gb: f64 },

    /// An iterative collaborator (SCF) did not converge.
    NotConverged(String),

    /// Input no computation can start from, such as an odd electron count.
    InvalidInput(String),

    /// Failure reading external data.
    Io(String),
}

impl fmt::Display for MP3Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::ShapeMismatch(msg) => write!(f, "Shape mismatch: {msg}"),
            Self::MemoryBudget { stage, required_gb, budget_gb } => write!(
                f,
                "Estimated memory utilization ({required_gb:.2} GB) exceeds the memory limit of {budget_gb:.2} GB \
                 (aborted before {stage})"
            ),
            Self::NotConverged(msg) => write!(f, "Not converged: {msg}"),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {msg}"),
            Self::Io(msg) => write!(f, "I/O error: {msg}"),
        }
    }
}

impl Error for MP3Error {}

/// Check that a tensor has exactly the expected shape.
pub fn check_shape(name: &str, shape: &[usize], expected: &[usize]) -> Result<(), MP3Error> {
    if shape != expected {
        return Err(MP3Error::ShapeMismatch(format!("{name} has shape {shape:?}, expected {expected:?}")));
    }
    Ok(())
}
