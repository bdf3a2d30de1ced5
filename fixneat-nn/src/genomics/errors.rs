use std::error::Error;
use std::fmt;
use std::io;
use std::num::ParseFloatError;

/// An error type indicating a failure to
/// load a weight vector into a genome. The
/// genome's weights are left untouched.
#[derive(Debug)]
pub enum WeightLoadError {
    /// The number of weights differs from
    /// the genome's number of connections.
    ShapeMismatch { expected: usize, found: usize },
    /// A line (1-based) could not be parsed as a weight.
    Parse {
        line: usize,
        source: ParseFloatError,
    },
    /// The weights could not be read.
    Io(io::Error),
}

impl fmt::Display for WeightLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShapeMismatch { expected, found } => write!(
                f,
                "weight count mismatch: genome has {} connections, found {} weights",
                expected, found
            ),
            Self::Parse { line, source } => {
                write!(f, "invalid weight on line {}: {}", line, source)
            }
            Self::Io(e) => write!(f, "failed to read weights: {}", e),
        }
    }
}

impl Error for WeightLoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ShapeMismatch { .. } => None,
            Self::Parse { source, .. } => Some(source),
            Self::Io(e) => Some(e),
        }
    }
}

impl From<io::Error> for WeightLoadError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}
