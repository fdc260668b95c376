//! Test fixtures for common test scenarios.
//!
//! This module provides port recipes, quay roots and status databases in
//! the shapes most tests need.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::core::{BinaryParagraph, PackageSpec, SourceParagraph, Triplet};
use crate::status::{StatusDatabase, StatusStore};
use crate::util::{Config, GlobalContext};

/// Fixture for one port recipe.
#[derive(Debug, Clone)]
pub struct PortFixture {
    name: String,
    version: String,
    description: String,
    maintainer: String,
    depends: String,
}

impl PortFixture {
    /// A port at version 1.0 with no dependencies.
    pub fn new(name: impl Into<String>) -> Self {
        PortFixture {
            name: name.into(),
            version: "1.0".to_string(),
            description: String::new(),
            maintainer: String::new(),
            depends: String::new(),
        }
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn maintainer(mut self, maintainer: impl Into<String>) -> Self {
        self.maintainer = maintainer.into();
        self
    }

    /// Set the `Build-Depends` list, e.g. `"libpng (windows), bzip2"`.
    pub fn depends(mut self, depends: impl Into<String>) -> Self {
        self.depends = depends.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The `CONTROL` file text for this port.
    pub fn to_control_text(&self) -> String {
        let mut text = format!("Source: {}\nVersion: {}\n", self.name, self.version);
        if !self.description.is_empty() {
            text.push_str(&format!("Description: {}\n", self.description));
        }
        if !self.maintainer.is_empty() {
            text.push_str(&format!("Maintainer: {}\n", self.maintainer));
        }
        if !self.depends.is_empty() {
            text.push_str(&format!("Build-Depends: {}\n", self.depends));
        }
        text
    }

    /// The parsed source paragraph.
    pub fn to_source(&self) -> SourceParagraph {
        SourceParagraph::parse(&self.to_control_text()).unwrap()
    }

    /// Write `ports/<name>/CONTROL` under `root`.
    pub fn write_to(&self, root: &Path) -> PathBuf {
        let dir = root.join("ports").join(&self.name);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("CONTROL"), self.to_control_text()).unwrap();
        dir
    }
}

/// Fixture for a quay root in a temporary directory.
///
/// Knows the `x64-windows` triplet and carries an empty build script.
#[derive(Debug)]
pub struct RootFixture {
    dir: TempDir,
}

impl RootFixture {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let root = dir.path();

        std::fs::create_dir_all(root.join("triplets")).unwrap();
        std::fs::write(root.join("triplets/x64-windows.cmake"), "").unwrap();
        std::fs::create_dir_all(root.join("scripts")).unwrap();
        std::fs::write(root.join("scripts/ports.cmake"), "").unwrap();

        RootFixture { dir }
    }

    /// Add a port recipe.
    pub fn port(self, port: PortFixture) -> Self {
        port.write_to(self.path());
        self
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// A context for this root with default configuration.
    pub fn context(&self) -> GlobalContext {
        GlobalContext::with_config(self.path(), Config::default())
    }
}

impl Default for RootFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// A binary paragraph for `name` built on `triplet`, with no dependencies.
pub fn paragraph_for(name: &str, triplet: Triplet) -> BinaryParagraph {
    BinaryParagraph {
        spec: PackageSpec::from_name_and_triplet(name, triplet).unwrap(),
        version: "1.0".to_string(),
        description: String::new(),
        maintainer: String::new(),
        depends: Vec::new(),
    }
}

/// A status database in `dir/status.d` with `packages` installed.
pub fn installed_db(dir: &Path, packages: &[BinaryParagraph]) -> StatusDatabase {
    let (db, _) = StatusDatabase::load(StatusStore::new(dir.join("status.d"))).unwrap();
    for pgh in packages {
        db.mark_half_installed(&pgh.spec).unwrap();
        db.mark_installed(pgh.clone()).unwrap();
    }
    db
}
