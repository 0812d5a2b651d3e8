//! Semantic version ordering for update decisions.

use semver::Version;

use super::{UpdateError, UpdateResult};

/// Parse a semver string, surfacing failures as an [`UpdateError`].
pub fn parse_version(value: &str) -> UpdateResult<Version> {
    Version::parse(value.trim()).map_err(|e| UpdateError::InvalidVersion {
        version: value.to_string(),
        reason: e.to_string(),
    })
}

/// True iff `candidate` is strictly newer than `current`.
///
/// Full semver ordering applies, including pre-release precedence. An
/// unparsable version on either side is an error, never silently ordered.
pub fn is_newer(current: &str, candidate: &str) -> UpdateResult<bool> {
    Ok(parse_version(candidate)? > parse_version(current)?)
}
