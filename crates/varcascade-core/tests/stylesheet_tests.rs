//! Integration tests for building stylesheet trees from CSS.

use std::io::Write;

use varcascade_core::prelude::*;
use varcascade_core::Error;

#[test]
fn from_file_records_source_path() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, ":root {{ --gap: 4px; }}").unwrap();
    writeln!(file, ".card {{ margin: var(--gap); }}").unwrap();

    let sheet = Stylesheet::from_file(file.path()).unwrap();

    assert_eq!(sheet.source_path(), Some(file.path()));
    assert_eq!(sheet.declarations().len(), 2);
}

#[test]
fn from_file_missing_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.css");

    let err = Stylesheet::from_file(&missing).unwrap_err();
    assert!(matches!(err, Error::Io { .. }));
}

#[test]
fn nested_structure_is_preserved() {
    let css = r#"
        /* theme */
        :root { --x: 1px; }
        @media print {
            :root { --x: 2px; }
            @supports (display: grid) {
                .grid { gap: var(--x); }
            }
        }
    "#;
    let sheet = Stylesheet::parse(css).unwrap();
    let decls = sheet.declarations();
    assert_eq!(decls.len(), 3);

    let gap = sheet.declaration(decls[2]);
    let chain: Vec<_> = sheet
        .ancestors(gap.parent())
        .map(|id| sheet.scope(id).kind().clone())
        .collect();

    assert_eq!(
        chain,
        vec![
            ScopeKind::Rule {
                selectors: vec![".grid".into()]
            },
            ScopeKind::AtRule {
                name: "supports".into(),
                params: "(display: grid)".into()
            },
            ScopeKind::AtRule {
                name: "media".into(),
                params: "print".into()
            },
            ScopeKind::Root,
        ]
    );
}

#[test]
fn declarations_at_root_level_are_kept() {
    let sheet = Stylesheet::parse("--loose: 1px; .a { color: red }").unwrap();
    let decls = sheet.declarations();

    assert_eq!(decls.len(), 2);
    assert_eq!(sheet.declaration(decls[0]).parent(), sheet.root());
    assert!(sheet.declaration(decls[0]).is_custom_property());
}
