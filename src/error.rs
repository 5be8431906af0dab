use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, SimError>;

/// Why a requested geometry cannot be laid out.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    /// A dimension or the pore count is outside the model limits.
    #[error("{parameter} must be within {min}..={max}, got {value}")]
    OutOfRange {
        parameter: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },

    /// The pores do not leave room for membrane segments between them.
    #[error("height {height} is too small to contain {pores} pores (segment height {segment_height})")]
    SegmentTooShort {
        height: u32,
        pores: u32,
        segment_height: f64,
    },
}

/// Recoverable kernel errors. Every variant means the operation was refused
/// and kernel state is unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("invalid layout: {0}")]
    Layout(#[from] LayoutError),

    /// The registry already holds its maximum number of particles.
    #[error("particle capacity of {capacity} reached")]
    CapacityExceeded { capacity: usize },

    /// Placement search found no free spot.
    #[error("no space available after {attempts} placement attempts")]
    NoSpaceAvailable { attempts: u32 },

    /// Invalid construction or scripted-placement parameter.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_error_display_is_informative() {
        let e = SimError::from(LayoutError::SegmentTooShort {
            height: 100,
            pores: 4,
            segment_height: -6.666,
        });
        let msg = format!("{e}");
        assert!(msg.contains("invalid layout"));
        assert!(msg.contains("4 pores"));
    }

    #[test]
    fn capacity_error_names_the_limit() {
        let msg = SimError::CapacityExceeded { capacity: 100 }.to_string();
        assert!(msg.contains("100"));
    }
}
