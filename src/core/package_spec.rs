//! Package identification - WHICH package, built for WHICH triplet.
//!
//! A `PackageSpec` is the `(name, triplet)` pair that keys every map in
//! quay. Its string form is `name:triplet`.

use std::fmt;

use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::core::Triplet;

/// Why a spec or triplet string was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedReason {
    EmptyName,
    InvalidName,
    UnknownTriplet,
    TooManyColons,
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedReason::EmptyName => write!(f, "package name is empty"),
            MalformedReason::InvalidName => write!(
                f,
                "package names may only contain lowercase letters, digits, `-`, `_` and `.`"
            ),
            MalformedReason::UnknownTriplet => write!(f, "unknown triplet"),
            MalformedReason::TooManyColons => write!(f, "expected at most one `:`"),
        }
    }
}

/// Error parsing a package spec or triplet.
#[derive(Debug, Clone, PartialEq, Eq, Error, miette::Diagnostic)]
pub enum ParseError {
    #[error("malformed package spec `{input}`: {reason}")]
    #[diagnostic(
        code(quay::spec::malformed),
        help("package specs are written `name` or `name:triplet`, e.g. `zlib:x64-windows`")
    )]
    Malformed {
        input: String,
        reason: MalformedReason,
    },
}

/// The identity of a package on a platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackageSpec {
    name: String,
    triplet: Triplet,
}

impl PackageSpec {
    /// Parse `name` or `name:triplet`, falling back to `default_triplet`.
    pub fn parse(text: &str, default_triplet: Triplet) -> Result<PackageSpec, ParseError> {
        let malformed = |reason| ParseError::Malformed {
            input: text.to_string(),
            reason,
        };

        let mut parts = text.split(':');
        let name = parts.next().unwrap_or_default();
        let triplet = match (parts.next(), parts.next()) {
            (None, _) => default_triplet,
            (Some(triplet), None) => Triplet::from_canonical_name(triplet)
                .map_err(|_| malformed(MalformedReason::UnknownTriplet))?,
            (Some(_), Some(_)) => return Err(malformed(MalformedReason::TooManyColons)),
        };

        validate_name(name).map_err(malformed)?;

        Ok(PackageSpec {
            name: name.to_string(),
            triplet,
        })
    }

    /// Pair a known package name with a triplet.
    pub fn from_name_and_triplet(name: &str, triplet: Triplet) -> Result<PackageSpec, ParseError> {
        validate_name(name).map_err(|reason| ParseError::Malformed {
            input: name.to_string(),
            reason,
        })?;

        Ok(PackageSpec {
            name: name.to_string(),
            triplet,
        })
    }

    /// The package name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The target triplet.
    pub fn triplet(&self) -> Triplet {
        self.triplet
    }

    /// Directory name used to store the built package, e.g. `zlib_x64-windows`.
    ///
    /// Triplets never contain `_`, so splitting on the last `_` recovers the
    /// pair and no two specs share a directory.
    pub fn install_dir_name(&self) -> String {
        format!("{}_{}", self.name, self.triplet)
    }
}

/// Check that `name` is usable as a package name.
///
/// Names end up in file names, comma-separated `Depends` lists and
/// `name:triplet` strings, so separators of any of those are rejected.
pub fn validate_name(name: &str) -> Result<(), MalformedReason> {
    if name.is_empty() {
        return Err(MalformedReason::EmptyName);
    }

    let valid = name.chars().all(|c| {
        c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '_' | '.')
    });
    if !valid || name == "." || name == ".." {
        return Err(MalformedReason::InvalidName);
    }

    Ok(())
}

impl fmt::Display for PackageSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.triplet)
    }
}

impl Serialize for PackageSpec {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}
