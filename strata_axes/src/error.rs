// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis configuration errors.

extern crate alloc;

use alloc::string::String;

use thiserror::Error;

use crate::axis::AxisOrient;

/// Errors returned by axis constructors and setters.
///
/// Every variant describes a malformed argument. A setter that returns an error leaves the axis
/// exactly as it was.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum AxisError {
    /// A length-like property was negative or not finite.
    #[error("{property} must be a finite, non-negative number (got {value})")]
    InvalidLength {
        /// Name of the rejected property.
        property: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// An orientation string did not name one of `top`, `bottom`, `left`, `right`.
    #[error("unsupported orientation \"{0}\"")]
    UnknownOrientation(String),
    /// The axis cannot be drawn in this orientation.
    #[error("only horizontal orientations are supported (got {0})")]
    UnsupportedOrientation(AxisOrient),
    /// A tier label position string was neither `between` nor `center`.
    #[error("unsupported tier label position \"{0}\"")]
    UnknownTierLabelPosition(String),
    /// A time interval string did not name a known interval.
    #[error("unknown time interval \"{0}\"")]
    UnknownTimeInterval(String),
    /// A candidate list of time axis configurations was malformed.
    #[error("invalid time axis configurations: {0}")]
    InvalidConfigurations(&'static str),
}

impl AxisError {
    /// Returns `true` for errors caused by a malformed argument.
    ///
    /// This is currently every variant; callers that only care about the class of failure
    /// should use this instead of matching.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Self::InvalidLength { .. }
                | Self::UnknownOrientation(_)
                | Self::UnsupportedOrientation(_)
                | Self::UnknownTierLabelPosition(_)
                | Self::UnknownTimeInterval(_)
                | Self::InvalidConfigurations(_)
        )
    }
}

/// Validates a length-like property.
pub(crate) fn check_length(property: &'static str, value: f64) -> Result<f64, AxisError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(AxisError::InvalidLength { property, value })
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::string::ToString;

    use super::*;

    #[test]
    fn check_length_accepts_zero_and_rejects_negative_or_nan() {
        assert_eq!(check_length("margin", 0.0), Ok(0.0));
        assert!(check_length("margin", -1.0).is_err());
        assert!(check_length("margin", f64::NAN).is_err());
        assert!(check_length("margin", f64::INFINITY).is_err());
    }

    #[test]
    fn messages_name_the_property() {
        let err = check_length("tick_label_padding", -2.0).unwrap_err();
        assert!(err.is_invalid_argument());
        assert_eq!(
            err.to_string(),
            "tick_label_padding must be a finite, non-negative number (got -2)"
        );
    }
}
