use super::config::ConfigError;
use crate::core::forces::ForceError;
use crate::core::models::band::BandError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {source}")]
    Configuration {
        #[from]
        source: ConfigError,
    },

    #[error("Invalid band: {0}")]
    InvalidBand(BandError),

    #[error("Dimension mismatch in {context}: expected {expected}, found {found}")]
    DimensionMismatch {
        context: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Degenerate geometry at image {image}: tangent is undefined")]
    DegenerateGeometry { image: usize },

    #[error("Evaluation failed at image {image}: {reason}")]
    Evaluation { image: usize, reason: String },

    #[error("Band has {found} interior images but the run is configured for {expected}")]
    ImageCountMismatch { expected: usize, found: usize },

    #[error("Internal logic error: {0}")]
    Internal(String),
}

impl From<BandError> for EngineError {
    fn from(error: BandError) -> Self {
        match error {
            BandError::DimensionMismatch {
                context,
                expected,
                found,
            } => EngineError::DimensionMismatch {
                context,
                expected,
                found,
            },
            other => EngineError::InvalidBand(other),
        }
    }
}

impl From<ForceError> for EngineError {
    fn from(error: ForceError) -> Self {
        match error {
            ForceError::DegenerateGeometry { image } => EngineError::DegenerateGeometry { image },
            ForceError::LengthMismatch { expected, found } => EngineError::DimensionMismatch {
                context: "force inputs",
                expected,
                found,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_dimension_errors_surface_as_dimension_mismatch() {
        let error = EngineError::from(BandError::DimensionMismatch {
            context: "interior image count",
            expected: 3,
            found: 2,
        });
        assert!(matches!(
            error,
            EngineError::DimensionMismatch {
                expected: 3,
                found: 2,
                ..
            }
        ));
    }

    #[test]
    fn other_band_errors_are_wrapped() {
        let error = EngineError::from(BandError::TooFewImages(0));
        assert!(matches!(error, EngineError::InvalidBand(BandError::TooFewImages(0))));
    }

    #[test]
    fn degenerate_force_error_keeps_image_index() {
        let error = EngineError::from(ForceError::DegenerateGeometry { image: 4 });
        assert!(matches!(error, EngineError::DegenerateGeometry { image: 4 }));
        assert_eq!(
            error.to_string(),
            "Degenerate geometry at image 4: tangent is undefined"
        );
    }

    #[test]
    fn config_errors_convert_with_question_mark() {
        fn fails() -> Result<(), EngineError> {
            Err::<(), _>(ConfigError::MissingParameter("mass"))?;
            Ok(())
        }
        assert!(matches!(fails(), Err(EngineError::Configuration { .. })));
    }
}
