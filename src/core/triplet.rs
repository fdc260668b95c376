//! Target triplets - WHERE a package is built for.
//!
//! A triplet names an architecture and a platform family (`x64-windows`,
//! `arm64-osx`, `x64-linux-static`). Triplets are interned, so they are
//! cheap to copy and compare.

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{LazyLock, PoisonError, RwLock};

use crate::core::package_spec::{MalformedReason, ParseError};

/// Architectures a triplet may start with.
pub const KNOWN_ARCHITECTURES: &[&str] = &["x86", "x64", "arm", "arm64", "wasm32"];

/// Platform families a qualifier may refer to by name.
pub const KNOWN_PLATFORMS: &[&str] = &[
    "windows",
    "uwp",
    "linux",
    "osx",
    "freebsd",
    "android",
    "ios",
    "mingw",
    "emscripten",
];

/// Global triplet interner, keyed by canonical name.
static TRIPLET_INTERNER: LazyLock<RwLock<HashMap<String, &'static TripletInner>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

/// A canonicalized platform identifier (interned).
#[derive(Clone, Copy)]
pub struct Triplet {
    inner: &'static TripletInner,
}

#[derive(Debug)]
struct TripletInner {
    canonical_name: String,
    architecture: String,
    platform: String,
}

impl Triplet {
    /// Parse and intern a triplet from its canonical name.
    ///
    /// Names are lowercase, `-`-separated, start with a known architecture
    /// and carry at least a platform component.
    pub fn from_canonical_name(name: &str) -> Result<Triplet, ParseError> {
        let unknown = || ParseError::Malformed {
            input: name.to_string(),
            reason: MalformedReason::UnknownTriplet,
        };

        let (architecture, platform) = split_canonical_name(name).ok_or_else(unknown)?;
        Ok(Self::intern(name, architecture, platform))
    }

    /// Whether `name` has the shape of a canonical triplet name, without
    /// interning it.
    pub fn is_well_formed(name: &str) -> bool {
        split_canonical_name(name).is_some()
    }

    #[cfg(test)]
    pub(crate) fn is_interned(name: &str) -> bool {
        TRIPLET_INTERNER
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    /// The triplet matching the machine quay runs on.
    pub fn host() -> Triplet {
        let architecture = match std::env::consts::ARCH {
            "x86" => "x86",
            "arm" => "arm",
            "aarch64" => "arm64",
            "wasm32" => "wasm32",
            _ => "x64",
        };
        let platform = match std::env::consts::OS {
            "windows" => "windows",
            "macos" => "osx",
            "freebsd" => "freebsd",
            "android" => "android",
            "ios" => "ios",
            _ => "linux",
        };

        Self::intern(&format!("{architecture}-{platform}"), architecture, platform)
    }

    fn intern(name: &str, architecture: &str, platform: &str) -> Triplet {
        {
            let interner = TRIPLET_INTERNER
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            if let Some(&inner) = interner.get(name) {
                return Triplet { inner };
            }
        }

        let mut interner = TRIPLET_INTERNER
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let inner = *interner.entry(name.to_string()).or_insert_with(|| {
            Box::leak(Box::new(TripletInner {
                canonical_name: name.to_string(),
                architecture: architecture.to_string(),
                platform: platform.to_string(),
            }))
        });

        Triplet { inner }
    }

    /// The canonical name, e.g. `x64-windows`.
    pub fn canonical_name(&self) -> &'static str {
        &self.inner.canonical_name
    }

    /// The target architecture, e.g. `x64`.
    pub fn architecture(&self) -> &'static str {
        &self.inner.architecture
    }

    /// The platform family, e.g. `windows`.
    pub fn platform(&self) -> &'static str {
        &self.inner.platform
    }

    /// Whether a qualifier identifier names this triplet, its architecture or
    /// its platform family.
    pub fn matches(&self, identifier: &str) -> bool {
        identifier == self.canonical_name()
            || identifier == self.architecture()
            || identifier == self.platform()
    }
}

/// Architecture and platform of a well-formed canonical name.
fn split_canonical_name(name: &str) -> Option<(&str, &str)> {
    let well_formed = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if !well_formed {
        return None;
    }

    let mut parts = name.split('-');
    let architecture = parts.next().unwrap_or_default();
    let platform = parts.next().unwrap_or_default();
    if !KNOWN_ARCHITECTURES.contains(&architecture)
        || platform.is_empty()
        || parts.any(str::is_empty)
    {
        return None;
    }
    Some((architecture, platform))
}

impl PartialEq for Triplet {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.inner, other.inner)
    }
}

impl Eq for Triplet {}

impl Hash for Triplet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(self.inner, state)
    }
}

impl PartialOrd for Triplet {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Triplet {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.canonical_name().cmp(other.canonical_name())
    }
}

impl fmt::Debug for Triplet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Triplet({})", self.canonical_name())
    }
}

impl fmt::Display for Triplet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}
