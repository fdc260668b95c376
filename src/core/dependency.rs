//! Dependency expressions from a recipe's `Build-Depends` field.
//!
//! A dependency is written `name` or `name (qualifier)`. The qualifier
//! restricts the dependency to some triplets:
//!
//! ```text
//! libpng (x64-windows)       only on that exact triplet
//! pthreads (windows | uwp)   on either platform family
//! openssl (x64 & !uwp)       on x64, except for uwp
//! ```
//!
//! An identifier matches a triplet when it equals the triplet's canonical
//! name, architecture or platform family. Qualifiers naming anything quay
//! does not know (or that fail to parse) are never satisfied, so the
//! dependency is dropped instead of failing the recipe.

use std::fmt;

use thiserror::Error;

use crate::core::triplet::{KNOWN_ARCHITECTURES, KNOWN_PLATFORMS};
use crate::core::Triplet;

/// Error parsing a dependency expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DependencyParseError {
    #[error("empty dependency")]
    Empty,

    #[error("unbalanced parentheses in `{0}`")]
    Unbalanced(String),

    #[error("empty platform qualifier in `{0}`")]
    EmptyQualifier(String),
}

/// A package name plus an optional platform qualifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyExpr {
    name: String,
    qualifier: Option<Qualifier>,
}

impl DependencyExpr {
    /// An unqualified dependency.
    pub fn new(name: impl Into<String>) -> Self {
        DependencyExpr {
            name: name.into(),
            qualifier: None,
        }
    }

    /// A dependency restricted by `qualifier`.
    pub fn with_qualifier(name: impl Into<String>, qualifier: &str) -> Self {
        DependencyExpr {
            name: name.into(),
            qualifier: Some(Qualifier::parse(qualifier)),
        }
    }

    /// Parse `name` or `name (qualifier)`.
    ///
    /// Only the shape is checked here; whether the name forms a valid
    /// package spec is decided during resolution.
    pub fn parse(text: &str) -> Result<Self, DependencyParseError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(DependencyParseError::Empty);
        }

        let Some(open) = text.find('(') else {
            if text.contains(')') {
                return Err(DependencyParseError::Unbalanced(text.to_string()));
            }
            return Ok(DependencyExpr::new(text));
        };

        let name = text[..open].trim();
        let rest = &text[open + 1..];
        let Some(qualifier) = rest.strip_suffix(')') else {
            return Err(DependencyParseError::Unbalanced(text.to_string()));
        };
        if qualifier.contains(['(', ')']) {
            return Err(DependencyParseError::Unbalanced(text.to_string()));
        }
        if name.is_empty() {
            return Err(DependencyParseError::Empty);
        }
        if qualifier.trim().is_empty() {
            return Err(DependencyParseError::EmptyQualifier(text.to_string()));
        }

        Ok(DependencyExpr::with_qualifier(name, qualifier))
    }

    /// Parse a comma-separated `Build-Depends` list.
    pub fn parse_list(text: &str) -> Result<Vec<Self>, DependencyParseError> {
        text.split(',')
            .filter(|part| !part.trim().is_empty())
            .map(DependencyExpr::parse)
            .collect()
    }

    /// The dependency's package name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The platform qualifier, if any.
    pub fn qualifier(&self) -> Option<&Qualifier> {
        self.qualifier.as_ref()
    }

    /// Whether this dependency applies when building for `triplet`.
    pub fn applies_to(&self, triplet: Triplet) -> bool {
        self.qualifier
            .as_ref()
            .map_or(true, |qualifier| qualifier.evaluate(triplet))
    }
}

impl fmt::Display for DependencyExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.qualifier {
            Some(qualifier) => write!(f, "{} ({})", self.name, qualifier),
            None => f.write_str(&self.name),
        }
    }
}

/// A platform qualifier: alternatives (`|`) of conjunctions (`&`) of
/// possibly negated (`!`) identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Qualifier {
    text: String,
    /// Empty when the text did not parse.
    alternatives: Vec<Vec<Term>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Term {
    negated: bool,
    identifier: String,
}

impl Qualifier {
    /// Parse a qualifier. Never fails: malformed text yields a qualifier
    /// that matches nothing.
    pub fn parse(text: &str) -> Self {
        let text = text.trim().to_string();
        let alternatives = Self::parse_alternatives(&text).unwrap_or_default();
        Qualifier { text, alternatives }
    }

    fn parse_alternatives(text: &str) -> Option<Vec<Vec<Term>>> {
        text.split('|')
            .map(|alternative| {
                alternative
                    .split('&')
                    .map(|term| {
                        let term = term.trim();
                        let (negated, identifier) = match term.strip_prefix('!') {
                            Some(rest) => (true, rest.trim()),
                            None => (false, term),
                        };
                        let valid = !identifier.is_empty()
                            && identifier
                                .chars()
                                .all(|c| c.is_ascii_alphanumeric() || c == '-');
                        valid.then(|| Term {
                            negated,
                            identifier: identifier.to_string(),
                        })
                    })
                    .collect::<Option<Vec<_>>>()
            })
            .collect()
    }

    /// Evaluate the qualifier against a triplet.
    pub fn evaluate(&self, triplet: Triplet) -> bool {
        let all_known = self
            .alternatives
            .iter()
            .flatten()
            .all(|term| is_known_identifier(&term.identifier));
        if !all_known {
            return false;
        }

        self.alternatives.iter().any(|terms| {
            terms
                .iter()
                .all(|term| triplet.matches(&term.identifier) != term.negated)
        })
    }

    /// The qualifier as written.
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Qualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

fn is_known_identifier(identifier: &str) -> bool {
    KNOWN_ARCHITECTURES.contains(&identifier)
        || KNOWN_PLATFORMS.contains(&identifier)
        || Triplet::is_well_formed(identifier)
}

/// Evaluate each dependency against `triplet`, keeping the names that apply.
///
/// Order is preserved and repeated names collapse to their first occurrence.
pub fn filter_dependencies(depends: &[DependencyExpr], triplet: Triplet) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(depends.len());
    for dep in depends {
        if dep.applies_to(triplet) && !names.iter().any(|n| n == dep.name()) {
            names.push(dep.name().to_string());
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triplet(name: &str) -> Triplet {
        Triplet::from_canonical_name(name).unwrap()
    }

    #[test]
    fn test_parse_plain_and_qualified() {
        let plain = DependencyExpr::parse(" bzip2 ").unwrap();
        assert_eq!(plain.name(), "bzip2");
        assert!(plain.qualifier().is_none());

        let qualified = DependencyExpr::parse("libpng (x64-windows)").unwrap();
        assert_eq!(qualified.name(), "libpng");
        assert_eq!(qualified.qualifier().unwrap().as_str(), "x64-windows");
        assert_eq!(qualified.to_string(), "libpng (x64-windows)");
    }

    #[test]
    fn test_parse_rejects_bad_shapes() {
        assert_eq!(DependencyExpr::parse("  "), Err(DependencyParseError::Empty));
        assert_eq!(DependencyExpr::parse("(windows)"), Err(DependencyParseError::Empty));
        assert!(matches!(
            DependencyExpr::parse("libpng (windows"),
            Err(DependencyParseError::Unbalanced(_))
        ));
        assert!(matches!(
            DependencyExpr::parse("libpng ()"),
            Err(DependencyParseError::EmptyQualifier(_))
        ));
    }

    #[test]
    fn test_qualifier_evaluation_does_not_intern_identifiers() {
        let deps = [DependencyExpr::parse("zlib (x64-qualifieronly)").unwrap()];

        assert!(filter_dependencies(&deps, triplet("x64-windows")).is_empty());
        assert!(!Triplet::is_interned("x64-qualifieronly"));
    }

    #[test]
    fn test_parse_list() {
        let deps = DependencyExpr::parse_list("libpng (x64-windows), bzip2,, zlib").unwrap();
        let names: Vec<_> = deps.iter().map(|d| d.name()).collect();
        assert_eq!(names, ["libpng", "bzip2", "zlib"]);
    }

    #[test]
    fn test_qualifier_matching() {
        let win = triplet("x64-windows");
        let uwp = triplet("x64-uwp");
        let linux = triplet("arm64-linux");

        let exact = Qualifier::parse("x64-windows");
        assert!(exact.evaluate(win));
        assert!(!exact.evaluate(uwp));

        let either = Qualifier::parse("windows | uwp");
        assert!(either.evaluate(win));
        assert!(either.evaluate(uwp));
        assert!(!either.evaluate(linux));

        let conj = Qualifier::parse("x64 & !uwp");
        assert!(conj.evaluate(win));
        assert!(!conj.evaluate(uwp));
        assert!(!conj.evaluate(linux));
    }

    #[test]
    fn test_unknown_or_malformed_qualifiers_never_match() {
        let win = triplet("x64-windows");

        assert!(!Qualifier::parse("windows | plan9").evaluate(win));
        assert!(!Qualifier::parse("!plan9").evaluate(win));
        assert!(!Qualifier::parse("windows &").evaluate(win));
        assert!(!Qualifier::parse("win dows").evaluate(win));
    }

    #[test]
    fn test_filter_dependencies() {
        let depends = vec![
            DependencyExpr::parse("libpng (x64-windows)").unwrap(),
            DependencyExpr::parse("bzip2").unwrap(),
            DependencyExpr::parse("pthreads (linux)").unwrap(),
            DependencyExpr::parse("libpng").unwrap(),
        ];

        assert_eq!(
            filter_dependencies(&depends, triplet("x64-windows")),
            ["libpng", "bzip2"]
        );
        assert_eq!(
            filter_dependencies(&depends, triplet("x64-linux")),
            ["bzip2", "pthreads", "libpng"]
        );
    }

    #[test]
    fn test_filter_never_drops_matching_or_keeps_excluded() {
        let depends = vec![
            DependencyExpr::with_qualifier("a", "windows"),
            DependencyExpr::with_qualifier("b", "!windows"),
        ];

        for name in ["x86-windows", "x64-linux", "arm64-osx"] {
            let t = triplet(name);
            let kept = filter_dependencies(&depends, t);
            for dep in &depends {
                assert_eq!(kept.iter().any(|k| k == dep.name()), dep.applies_to(t));
            }
        }
    }
}
