//! Typed result of an optional lookup.
//!
//! Optional UI (environment-dependent widgets, admin panels behind auth) must not
//! fail a test just by being missing, but a broken session must not pass for a
//! missing element either. [`Presence`] keeps the three cases apart.

use crate::result::{VitrinaError, VitrinaResult};

/// Outcome of looking for something that may legitimately be missing
#[derive(Debug)]
pub enum Presence<T> {
    /// Found
    Present(T),
    /// Confirmed missing: the lookup ran to its timeout without a match
    Absent,
    /// The lookup itself failed; absence is not established
    Unknown(VitrinaError),
}

impl<T> Presence<T> {
    /// Classify a lookup result: not-found and timeouts are [`Presence::Absent`]
    pub fn from_lookup(result: VitrinaResult<T>) -> Self {
        match result {
            Ok(value) => Self::Present(value),
            Err(VitrinaError::ElementNotFound { .. } | VitrinaError::Timeout { .. }) => Self::Absent,
            Err(e) => Self::Unknown(e),
        }
    }

    /// Check if found
    #[must_use]
    pub const fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    /// Check if confirmed missing
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Check if the lookup errored
    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown(_))
    }

    /// The found value, discarding the reason it is missing
    #[must_use]
    pub fn present(self) -> Option<T> {
        match self {
            Self::Present(value) => Some(value),
            Self::Absent | Self::Unknown(_) => None,
        }
    }

    /// Transform the found value
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Presence<U> {
        match self {
            Self::Present(value) => Presence::Present(f(value)),
            Self::Absent => Presence::Absent,
            Self::Unknown(e) => Presence::Unknown(e),
        }
    }

    /// `Ok(Some)` when present, `Ok(None)` when absent, the error otherwise
    pub fn into_result(self) -> VitrinaResult<Option<T>> {
        match self {
            Self::Present(value) => Ok(Some(value)),
            Self::Absent => Ok(None),
            Self::Unknown(e) => Err(e),
        }
    }
}

impl<T> From<VitrinaResult<T>> for Presence<T> {
    fn from(result: VitrinaResult<T>) -> Self {
        Self::from_lookup(result)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    mod presence_tests {
        use super::*;

        #[test]
        fn test_not_found_is_absent() {
            let p: Presence<()> = Presence::from_lookup(Err(VitrinaError::ElementNotFound {
                locator: "testid=x".to_string(),
                timeout_ms: 10,
            }));
            assert!(p.is_absent());
            assert_eq!(p.into_result().unwrap(), None);
        }

        #[test]
        fn test_driver_error_is_unknown() {
            let p: Presence<()> = Presence::from_lookup(Err(VitrinaError::driver("gone")));
            assert!(p.is_unknown());
            assert!(p.into_result().is_err());
        }

        #[test]
        fn test_map_keeps_variant() {
            let p = Presence::Present(2).map(|n| n * 2);
            assert_eq!(p.present(), Some(4));
            let a: Presence<i32> = Presence::Absent;
            assert!(a.map(|n| n + 1).is_absent());
        }
    }
}
