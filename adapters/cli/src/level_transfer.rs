#![allow(clippy::missing_errors_doc)]

use std::{error::Error, fmt};

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use curve_fit_core::{Mode, ParseNameError, Point, TargetSet, TargetSetError};

const LEVEL_DOMAIN: &str = "curve";
const LEVEL_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded level payload.
pub(crate) const LEVEL_HEADER: &str = "curve:v1";
/// Delimiter used to separate the prefix, mode and payload.
const FIELD_DELIMITER: char = ':';

/// Shareable description of a single level.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct LevelCode {
    /// Curve family of the level.
    pub(crate) mode: Mode,
    /// Targets the player has to fit.
    pub(crate) targets: TargetSet,
}

impl LevelCode {
    /// Encodes the level into a single-line string suitable for sharing.
    #[must_use]
    pub(crate) fn encode(&self) -> String {
        let json =
            serde_json::to_vec(self.targets.points()).expect("target serialization never fails");
        let encoded = STANDARD_NO_PAD.encode(json);
        format!("{LEVEL_HEADER}:{}:{encoded}", self.mode)
    }

    /// Decodes a level from the provided string representation.
    pub(crate) fn decode(value: &str) -> Result<Self, LevelTransferError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(LevelTransferError::EmptyPayload);
        }

        let mut parts = trimmed.split(FIELD_DELIMITER);
        let domain = parts.next().ok_or(LevelTransferError::MissingPrefix)?;
        let version = parts.next().ok_or(LevelTransferError::MissingVersion)?;
        let mode = parts.next().ok_or(LevelTransferError::MissingMode)?;
        let payload = parts.next().ok_or(LevelTransferError::MissingPayload)?;
        if parts.next().is_some() {
            return Err(LevelTransferError::TrailingSegments);
        }

        if domain != LEVEL_DOMAIN {
            return Err(LevelTransferError::InvalidPrefix(domain.to_owned()));
        }
        if version != LEVEL_VERSION {
            return Err(LevelTransferError::UnsupportedVersion(version.to_owned()));
        }

        let mode: Mode = mode.parse().map_err(LevelTransferError::InvalidMode)?;
        let bytes = STANDARD_NO_PAD
            .decode(payload.as_bytes())
            .map_err(LevelTransferError::InvalidEncoding)?;
        let points: Vec<Point> =
            serde_json::from_slice(&bytes).map_err(LevelTransferError::InvalidPayload)?;
        let targets = TargetSet::new(points).map_err(LevelTransferError::InvalidTargets)?;

        let expected = mode.point_count().get();
        if targets.len() != expected {
            return Err(LevelTransferError::WrongPointCount {
                mode,
                expected,
                found: targets.len(),
            });
        }

        Ok(Self { mode, targets })
    }
}

/// Errors that can occur while decoding level codes.
#[derive(Debug)]
pub(crate) enum LevelTransferError {
    /// The provided string was empty or contained only whitespace.
    EmptyPayload,
    /// The prefix segment was missing from the level code.
    MissingPrefix,
    /// The level code did not contain a version segment.
    MissingVersion,
    /// The level code did not name a curve family.
    MissingMode,
    /// The level code did not include the payload segment.
    MissingPayload,
    /// The level code continued past the payload segment.
    TrailingSegments,
    /// The level code used an unexpected prefix segment.
    InvalidPrefix(String),
    /// The level code used an unsupported version identifier.
    UnsupportedVersion(String),
    /// The curve family could not be parsed.
    InvalidMode(ParseNameError),
    /// The base64 payload could not be decoded.
    InvalidEncoding(base64::DecodeError),
    /// The decoded payload could not be deserialised.
    InvalidPayload(serde_json::Error),
    /// The decoded points violate the target-set invariants.
    InvalidTargets(TargetSetError),
    /// The number of points does not match the curve family.
    WrongPointCount {
        /// Curve family named by the code.
        mode: Mode,
        /// Points required by the family.
        expected: usize,
        /// Points contained in the payload.
        found: usize,
    },
}

impl fmt::Display for LevelTransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPayload => write!(f, "level code was empty"),
            Self::MissingPrefix => write!(f, "level code is missing the prefix"),
            Self::MissingVersion => write!(f, "level code is missing the version"),
            Self::MissingMode => write!(f, "level code is missing the curve mode"),
            Self::MissingPayload => write!(f, "level code is missing the payload"),
            Self::TrailingSegments => write!(f, "level code has segments after the payload"),
            Self::InvalidPrefix(prefix) => write!(f, "level prefix '{prefix}' is not supported"),
            Self::UnsupportedVersion(version) => {
                write!(f, "level version '{version}' is not supported")
            }
            Self::InvalidMode(error) => write!(f, "could not parse level mode: {error}"),
            Self::InvalidEncoding(error) => {
                write!(f, "could not decode level payload: {error}")
            }
            Self::InvalidPayload(error) => {
                write!(f, "could not parse level payload: {error}")
            }
            Self::InvalidTargets(error) => write!(f, "level targets are invalid: {error}"),
            Self::WrongPointCount {
                mode,
                expected,
                found,
            } => write!(
                f,
                "{mode} levels need {expected} targets but the code holds {found}"
            ),
        }
    }
}

impl Error for LevelTransferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidMode(error) => Some(error),
            Self::InvalidEncoding(error) => Some(error),
            Self::InvalidPayload(error) => Some(error),
            Self::InvalidTargets(error) => Some(error),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cubic_level() -> LevelCode {
        LevelCode {
            mode: Mode::Cubic,
            targets: TargetSet::new(vec![
                Point::new(-4, 3),
                Point::new(-1, 0),
                Point::new(0, -4),
                Point::new(2, 2),
            ])
            .expect("valid targets"),
        }
    }

    #[test]
    fn encoded_level_decodes_to_same_targets() {
        let level = cubic_level();
        let encoded = level.encode();
        assert!(encoded.starts_with(&format!("{LEVEL_HEADER}:cubic:")));

        let decoded = LevelCode::decode(&encoded).expect("level decodes");
        assert_eq!(level, decoded);
    }

    #[test]
    fn rejects_foreign_prefix_and_version() {
        assert!(matches!(
            LevelCode::decode("graph:v1:cubic:AA"),
            Err(LevelTransferError::InvalidPrefix(prefix)) if prefix == "graph"
        ));
        assert!(matches!(
            LevelCode::decode("curve:v2:cubic:AA"),
            Err(LevelTransferError::UnsupportedVersion(_))
        ));
        assert!(matches!(
            LevelCode::decode("   "),
            Err(LevelTransferError::EmptyPayload)
        ));
        assert!(matches!(
            LevelCode::decode("curve:v1"),
            Err(LevelTransferError::MissingMode)
        ));
    }

    #[test]
    fn rejects_segments_after_payload() {
        let code = format!("{}:junk", cubic_level().encode());
        assert!(matches!(
            LevelCode::decode(&code),
            Err(LevelTransferError::TrailingSegments)
        ));
    }

    #[test]
    fn rejects_unknown_mode() {
        assert!(matches!(
            LevelCode::decode("curve:v1:quartic:AA"),
            Err(LevelTransferError::InvalidMode(_))
        ));
    }

    #[test]
    fn rejects_point_count_mismatch() {
        let code = cubic_level().encode().replacen(":cubic:", ":linear:", 1);
        assert!(matches!(
            LevelCode::decode(&code),
            Err(LevelTransferError::WrongPointCount {
                mode: Mode::Linear,
                expected: 2,
                found: 4,
            })
        ));
    }

    #[test]
    fn rejects_duplicate_x_payload() {
        let json = br#"[{"x":1,"y":0},{"x":1,"y":2}]"#;
        let code = format!("{LEVEL_HEADER}:linear:{}", STANDARD_NO_PAD.encode(json));
        assert!(matches!(
            LevelCode::decode(&code),
            Err(LevelTransferError::InvalidTargets(TargetSetError::DuplicateX { x: 1 }))
        ));
    }
}
