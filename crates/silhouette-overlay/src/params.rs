use std::{fmt, ops::RangeInclusive, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::OverlayError;

/// Accepted padding, in pixels added on each side.
pub const PADDING_RANGE: RangeInclusive<usize> = 0..=200;

/// Accepted disk radius of the dilation structuring element.
pub const DISK_SIZE_RANGE: RangeInclusive<usize> = 1..=20;

/// Accepted number of dilate and blur rounds.
pub const NUM_DILATIONS_RANGE: RangeInclusive<usize> = 1..=20;

/// Accepted standard deviation of the gaussian blur.
pub const SIGMA_RANGE: RangeInclusive<f32> = 0.0..=10.0;

/// The color painted behind the silhouette.
///
/// Parsed from and displayed as `#rrggbb`.
///
/// # Example
///
/// ```
/// use silhouette_overlay::BackgroundColor;
///
/// let color: BackgroundColor = "#1e90ff".parse().unwrap();
/// assert_eq!(color, BackgroundColor { r: 30, g: 144, b: 255 });
/// assert_eq!(color.to_string(), "#1e90ff");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BackgroundColor {
    /// Red component.
    pub r: u8,
    /// Green component.
    pub g: u8,
    /// Blue component.
    pub b: u8,
}

impl BackgroundColor {
    /// Opaque white, `#ffffff`.
    pub const WHITE: Self = Self {
        r: 255,
        g: 255,
        b: 255,
    };

    /// Parse a color written as `#` followed by six hexadecimal digits.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::InvalidColor`] for anything else.
    pub fn from_hex(hex: &str) -> Result<Self, OverlayError> {
        let invalid = || OverlayError::InvalidColor(hex.to_string());

        let digits = hex.strip_prefix('#').ok_or_else(invalid)?;
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let component = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());

        Ok(Self {
            r: component(0)?,
            g: component(2)?,
            b: component(4)?,
        })
    }

    /// The color as a fully opaque RGBA pixel.
    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }
}

impl Default for BackgroundColor {
    fn default() -> Self {
        Self::WHITE
    }
}

impl FromStr for BackgroundColor {
    type Err = OverlayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for BackgroundColor {
    type Error = OverlayError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<BackgroundColor> for String {
    fn from(color: BackgroundColor) -> Self {
        color.to_string()
    }
}

impl fmt::Display for BackgroundColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// The parameters of one overlay run.
///
/// Missing fields take their default when deserialized, so a partial query string is a
/// valid set of parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayParams {
    /// Samples of the green channel strictly below this value belong to the silhouette.
    pub threshold: u8,
    /// Pixels added on every side of the mask before dilating.
    pub padding: usize,
    /// Radius of the disk used to dilate the mask.
    pub disk_size: usize,
    /// Number of dilate, blur and rebinarize rounds.
    pub num_dilations: usize,
    /// Standard deviation of the gaussian blur applied after each dilation.
    pub sigma: f32,
    /// The color painted where the dilated mask is set.
    pub background_color: BackgroundColor,
}

impl Default for OverlayParams {
    fn default() -> Self {
        Self {
            threshold: 170,
            padding: 100,
            disk_size: 4,
            num_dilations: 12,
            sigma: 4.0,
            background_color: BackgroundColor::WHITE,
        }
    }
}

impl OverlayParams {
    /// Check every parameter against its accepted range.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::ParameterOutOfRange`] naming the first offending parameter.
    /// A sigma that is not finite is out of range.
    pub fn validate(&self) -> Result<(), OverlayError> {
        check_range("padding", self.padding, &PADDING_RANGE)?;
        check_range("disk_size", self.disk_size, &DISK_SIZE_RANGE)?;
        check_range("num_dilations", self.num_dilations, &NUM_DILATIONS_RANGE)?;

        // NaN fails the range check as well
        if !SIGMA_RANGE.contains(&self.sigma) {
            return Err(OverlayError::ParameterOutOfRange {
                name: "sigma",
                value: self.sigma as f64,
                min: *SIGMA_RANGE.start() as f64,
                max: *SIGMA_RANGE.end() as f64,
            });
        }

        Ok(())
    }
}

fn check_range(
    name: &'static str,
    value: usize,
    range: &RangeInclusive<usize>,
) -> Result<(), OverlayError> {
    if range.contains(&value) {
        return Ok(());
    }
    Err(OverlayError::ParameterOutOfRange {
        name,
        value: value as f64,
        min: *range.start() as f64,
        max: *range.end() as f64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_params_are_valid() -> Result<(), OverlayError> {
        let params = OverlayParams::default();
        params.validate()?;
        assert_eq!(params.threshold, 170);
        assert_eq!(params.padding, 100);
        assert_eq!(params.disk_size, 4);
        assert_eq!(params.num_dilations, 12);
        assert_eq!(params.sigma, 4.0);
        assert_eq!(params.background_color.to_string(), "#ffffff");
        Ok(())
    }

    #[test]
    fn bounds_are_inclusive() -> Result<(), OverlayError> {
        let low = OverlayParams {
            threshold: 0,
            padding: 0,
            disk_size: 1,
            num_dilations: 1,
            sigma: 0.0,
            ..Default::default()
        };
        low.validate()?;

        let high = OverlayParams {
            threshold: 255,
            padding: 200,
            disk_size: 20,
            num_dilations: 20,
            sigma: 10.0,
            ..Default::default()
        };
        high.validate()?;
        Ok(())
    }

    #[test]
    fn out_of_range_is_rejected() {
        let cases = [
            (
                "padding",
                OverlayParams {
                    padding: 201,
                    ..Default::default()
                },
            ),
            (
                "disk_size",
                OverlayParams {
                    disk_size: 0,
                    ..Default::default()
                },
            ),
            (
                "num_dilations",
                OverlayParams {
                    num_dilations: 21,
                    ..Default::default()
                },
            ),
            (
                "sigma",
                OverlayParams {
                    sigma: -0.5,
                    ..Default::default()
                },
            ),
            (
                "sigma",
                OverlayParams {
                    sigma: f32::NAN,
                    ..Default::default()
                },
            ),
            (
                "sigma",
                OverlayParams {
                    sigma: f32::INFINITY,
                    ..Default::default()
                },
            ),
        ];

        for (expected, params) in cases {
            match params.validate() {
                Err(OverlayError::ParameterOutOfRange { name, .. }) => assert_eq!(name, expected),
                other => panic!("{expected}: unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn parse_background_color() -> Result<(), OverlayError> {
        assert_eq!(
            BackgroundColor::from_hex("#FF8000")?,
            BackgroundColor {
                r: 255,
                g: 128,
                b: 0
            }
        );
        assert_eq!("#000000".parse::<BackgroundColor>()?.to_rgba(), [0, 0, 0, 255]);

        for bad in ["ffffff", "#fff", "#fffffff", "#gg0000", "", "#", "#+12345"] {
            assert!(
                matches!(
                    BackgroundColor::from_hex(bad),
                    Err(OverlayError::InvalidColor(ref s)) if s == bad
                ),
                "{bad:?} should be rejected"
            );
        }
        Ok(())
    }

    #[test]
    fn deserialize_partial_params() -> Result<(), serde_json::Error> {
        let params: OverlayParams =
            serde_json::from_str(r##"{"threshold": 90, "background_color": "#102030"}"##)?;

        assert_eq!(params.threshold, 90);
        assert_eq!(params.padding, 100);
        assert_eq!(
            params.background_color,
            BackgroundColor {
                r: 16,
                g: 32,
                b: 48
            }
        );

        let bad = serde_json::from_str::<OverlayParams>(r#"{"background_color": "red"}"#);
        assert!(bad.is_err());
        Ok(())
    }
}
