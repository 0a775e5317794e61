//! Environment-driven case budget for property suites.

use std::env;

/// Environment variable overriding the number of cases per property.
pub const RENYI_PBT_CASES_ENV_KEY: &str = "RENYI_PBT_CASES";

/// Case budget shared by the property suites of every crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PropertyRunProfile {
    cases: u32,
}

impl PropertyRunProfile {
    /// Reads [`RENYI_PBT_CASES_ENV_KEY`], falling back to `default_cases` when
    /// it is unset or invalid.
    ///
    /// # Examples
    ///
    /// ```
    /// use renyi_test_support::proptest_profile::PropertyRunProfile;
    ///
    /// let profile = PropertyRunProfile::from_env(32);
    /// assert!(profile.cases() > 0);
    /// ```
    #[must_use]
    pub fn from_env(default_cases: u32) -> Self {
        let raw = env::var(RENYI_PBT_CASES_ENV_KEY).ok();
        Self::from_override(raw.as_deref(), default_cases)
    }

    /// Resolves a profile from an optional raw override.
    ///
    /// Invalid overrides are logged and ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use renyi_test_support::proptest_profile::PropertyRunProfile;
    ///
    /// assert_eq!(PropertyRunProfile::from_override(Some("12"), 64).cases(), 12);
    /// assert_eq!(PropertyRunProfile::from_override(Some("zero"), 64).cases(), 64);
    /// assert_eq!(PropertyRunProfile::from_override(None, 64).cases(), 64);
    /// ```
    #[must_use]
    pub fn from_override(raw: Option<&str>, default_cases: u32) -> Self {
        let cases = match raw.map(parse_cases) {
            None => default_cases,
            Some(Ok(cases)) => cases,
            Some(Err(reason)) => {
                ::tracing::warn!(
                    env = RENYI_PBT_CASES_ENV_KEY,
                    raw = raw.unwrap_or_default(),
                    %reason,
                    "ignoring invalid property-test case override",
                );
                default_cases
            }
        };
        Self { cases }
    }

    /// Number of cases to run per property.
    #[must_use]
    pub fn cases(&self) -> u32 {
        self.cases
    }
}

fn parse_cases(raw: &str) -> Result<u32, String> {
    match raw.trim().parse::<u32>() {
        Ok(0) => Err("cases must be > 0".to_owned()),
        Ok(cases) => Ok(cases),
        Err(error) => Err(format!("parse error: {error}")),
    }
}
