//! Implementation of `quay list`.

use anyhow::Result;

use crate::core::BinaryParagraph;
use crate::ops::status::database_load_check;
use crate::util::GlobalContext;

/// Installed packages, sorted by spec.
pub fn list_installed(gctx: &GlobalContext) -> Result<Vec<BinaryParagraph>> {
    let status_db = database_load_check(gctx)?;
    Ok(status_db
        .installed()
        .into_iter()
        .filter_map(|entry| entry.package().cloned())
        .collect())
}

/// One line of `quay list` output.
pub fn format_entry(pgh: &BinaryParagraph) -> String {
    let mut line = format!("{:<40} {:<16}", pgh.spec.to_string(), pgh.version);
    if let Some(summary) = pgh.description.lines().next() {
        line.push(' ');
        line.push_str(summary);
    }
    line.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Triplet;
    use crate::test_support::{installed_db, paragraph_for, RootFixture};

    #[test]
    fn test_list_installed_sorted() {
        let root = RootFixture::new();
        let gctx = root.context();
        let status_root = gctx.status_dir();
        let windows = Triplet::from_canonical_name("x64-windows").unwrap();
        installed_db(
            status_root.parent().unwrap(),
            &[paragraph_for("zlib", windows), paragraph_for("bzip2", windows)],
        );

        let names: Vec<String> = list_installed(&gctx)
            .unwrap()
            .iter()
            .map(|p| p.spec.to_string())
            .collect();
        assert_eq!(names, ["bzip2:x64-windows", "zlib:x64-windows"]);
    }

    #[test]
    fn test_format_entry() {
        let mut pgh = paragraph_for("zlib", Triplet::from_canonical_name("x64-windows").unwrap());
        pgh.version = "1.2.11".to_string();
        pgh.description = "A compression library\nwith a long description".to_string();

        let line = format_entry(&pgh);
        assert!(line.starts_with("zlib:x64-windows "));
        assert!(line.contains("1.2.11"));
        assert!(line.ends_with("A compression library"));
        assert!(!line.contains("long description"));
    }
}
