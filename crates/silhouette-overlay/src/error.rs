use silhouette_image::ImageError;
use silhouette_io::IoError;

/// An error type for the overlay pipeline.
#[derive(thiserror::Error, Debug)]
pub enum OverlayError {
    /// The input could not be read or the result could not be encoded.
    #[error(transparent)]
    Io(#[from] IoError),

    /// An image operation received inconsistent shapes.
    #[error(transparent)]
    Image(#[from] ImageError),

    /// A parameter is outside of its accepted range.
    #[error("Parameter {name} = {value} is out of range [{min}, {max}]")]
    ParameterOutOfRange {
        /// Name of the parameter.
        name: &'static str,
        /// The rejected value.
        value: f64,
        /// Smallest accepted value.
        min: f64,
        /// Largest accepted value.
        max: f64,
    },

    /// The background color is not of the form `#rrggbb`.
    #[error("Invalid background color {0:?}, expected #rrggbb")]
    InvalidColor(String),

    /// The requested work is larger than the configured limits.
    #[error("The {what} of {value} exceeds the limit of {limit}")]
    ResourceLimitExceeded {
        /// The quantity that was limited.
        what: &'static str,
        /// The requested amount.
        value: u64,
        /// The configured maximum.
        limit: u64,
    },
}
