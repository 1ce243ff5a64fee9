//! Software version value object (semantic versioning)

use crate::error::{AppError, AppResult};

/// A "major.minor.patch" software version, compared numerically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SoftwareVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl SoftwareVersion {
    /// Parse a version string such as "1.2.3".
    ///
    /// Every dotted component must be a non-negative integer and at least
    /// three are required; extra components are ignored.
    pub fn from_string(version: &str) -> AppResult<Self> {
        let parts: Result<Vec<u32>, _> =
            version.split('.').map(|p| p.trim().parse::<u32>()).collect();
        let parts = parts.map_err(|_| {
            AppError::Validation(format!(
                "Invalid version format: {}. Expected format: major.minor.patch",
                version
            ))
        })?;
        if parts.len() < 3 {
            return Err(AppError::Validation(format!(
                "Invalid version format: {}. Expected format: major.minor.patch",
                version
            )));
        }

        Ok(Self {
            major: parts[0],
            minor: parts[1],
            patch: parts[2],
        })
    }
}

impl std::fmt::Display for SoftwareVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_three_components() {
        let v = SoftwareVersion::from_string("1.2.3").unwrap();
        assert_eq!((v.major, v.minor, v.patch), (1, 2, 3));
    }

    #[test]
    fn rejects_short_or_malformed_input() {
        assert!(SoftwareVersion::from_string("1.2").is_err());
        assert!(SoftwareVersion::from_string("").is_err());
        assert!(SoftwareVersion::from_string("1.2.x").is_err());
        assert!(SoftwareVersion::from_string("a.b.c").is_err());
        assert!(SoftwareVersion::from_string("1.2.3.x").is_err());
    }

    #[test]
    fn comparison_is_numeric_not_lexicographic() {
        let a = SoftwareVersion::from_string("1.2.3").unwrap();
        let b = SoftwareVersion::from_string("1.10.0").unwrap();
        assert!(a < b);

        let c = SoftwareVersion::from_string("2.0.0").unwrap();
        assert!(b < c);

        let d = SoftwareVersion::from_string("1.2.3").unwrap();
        assert_eq!(a, d);
    }
}
