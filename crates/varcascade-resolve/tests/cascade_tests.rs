//! Cascade behaviour of `var()` resolution over whole stylesheets.

use tracing_subscriber::EnvFilter;
use varcascade_core::prelude::*;
use varcascade_resolve::prelude::*;

struct Fixture {
    sheet: Stylesheet,
    vars: VarMap,
}

impl Fixture {
    fn new(css: &str) -> Self {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let sheet = Stylesheet::parse(css).unwrap();
        let vars = VarMap::index(&sheet);
        Self { sheet, vars }
    }

    /// The `n`th declaration of `property` in source order.
    fn decl(&self, property: &str, n: usize) -> DeclId {
        self.sheet
            .declarations()
            .into_iter()
            .filter(|&id| self.sheet.declaration(id).property() == property)
            .nth(n)
            .unwrap()
    }

    fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.sheet, &self.vars, ResolveOptions::default())
    }

    fn value(&self, property: &str, n: usize) -> Option<String> {
        self.resolver().resolve(self.decl(property, n)).unwrap().value
    }
}

#[test]
fn value_without_references_is_unchanged() {
    let fx = Fixture::new(".a { margin: 0 auto; width: calc(100% - 2px) }");
    let resolution = fx.resolver().resolve(fx.decl("width", 0)).unwrap();

    assert_eq!(resolution.value.as_deref(), Some("calc(100% - 2px)"));
    assert!(resolution.variables_used.is_empty());
    assert!(resolution.warnings.is_empty());
}

#[test]
fn closest_visible_declaration_wins() {
    let fx = Fixture::new(
        r#"
        :root { --x: 1px }
        .a { --x: 2px; width: var(--x) }
        .b { width: var(--x) }
        "#,
    );

    assert_eq!(fx.value("width", 0).as_deref(), Some("2px"));
    assert_eq!(fx.value("width", 1).as_deref(), Some("1px"));
}

#[test]
fn descendant_rules_see_ancestor_declarations() {
    let fx = Fixture::new(
        r#"
        :root { --x: 1px }
        .a { --x: 2px }
        .a .b { width: var(--x) }
        .c > .b { width: var(--x) }
        "#,
    );

    assert_eq!(fx.value("width", 0).as_deref(), Some("2px"));
    assert_eq!(fx.value("width", 1).as_deref(), Some("1px"));
}

#[test]
fn later_declaration_wins() {
    let fx = Fixture::new(":root { --x: 1px } :root { --x: 3px } .a { width: var(--x) }");

    assert_eq!(fx.value("width", 0).as_deref(), Some("3px"));
}

#[test]
fn important_declaration_is_pinned() {
    let fx = Fixture::new(":root { --x: 1px !important } .a { --x: 2px; width: var(--x) }");

    assert_eq!(fx.value("width", 0).as_deref(), Some("1px"));
}

#[test]
fn later_important_declaration_overrides() {
    let fx = Fixture::new(":root { --x: 1px } .a { --x: 2px !important } .a { width: var(--x) }");

    assert_eq!(fx.value("width", 0).as_deref(), Some("2px"));
}

#[test]
fn fallback_only_when_undeclared() {
    let fx = Fixture::new(
        r#"
        :root { --defined: blue }
        .a { color: var(--undefined, red); background: var(--defined, red) }
        "#,
    );

    assert_eq!(fx.value("color", 0).as_deref(), Some("red"));
    assert_eq!(fx.value("background", 0).as_deref(), Some("blue"));
}

#[test]
fn fallback_references_are_resolved() {
    let fx = Fixture::new(":root { --base: 4px } .a { margin: var(--gap, calc(var(--base) * 2)) }");

    assert_eq!(fx.value("margin", 0).as_deref(), Some("calc(4px * 2)"));
}

#[test]
fn circular_references_are_undefined() {
    let fx = Fixture::new("a { --x: var(--y); --y: var(--x); }");
    let resolution = fx.resolver().resolve(fx.decl("--x", 0)).unwrap();

    assert_eq!(resolution.value, None);
    assert!(!resolution.warnings.is_empty());
    assert_eq!(resolution.variables_used, vec!["--y"]);
}

#[test]
fn self_reference_uses_fallback() {
    let fx = Fixture::new(":root { --x: var(--x, 1px) } .a { width: var(--x) }");

    assert_eq!(fx.value("--x", 0).as_deref(), Some("1px"));
}

#[test]
fn cached_values_are_reused() {
    let fx = Fixture::new(
        r#"
        :root { --y: 1px; --x: var(--y) }
        .a { width: var(--x) }
        .b { height: var(--x) }
        "#,
    );
    let mut resolver = fx.resolver();

    // width, --x and --y are each evaluated once.
    let first = resolver.resolve(fx.decl("width", 0)).unwrap();
    assert_eq!(first.value.as_deref(), Some("1px"));
    assert_eq!(resolver.evaluations(), 3);
    assert_eq!(fx.sheet.declaration(fx.decl("--x", 0)).cached_value(), Some("1px"));

    let again = resolver.resolve(fx.decl("width", 0)).unwrap();
    assert_eq!(again, first);
    assert_eq!(resolver.evaluations(), 4);

    let height = resolver.resolve(fx.decl("height", 0)).unwrap();
    assert_eq!(height.value.as_deref(), Some("1px"));
    assert_eq!(resolver.evaluations(), 5);
}

#[test]
fn media_declarations_apply_inside_media_only() {
    let fx = Fixture::new(
        r#"
        :root { --x: 1px }
        @media print {
            :root { --x: 2px }
            .a { width: var(--x) }
        }
        .a { width: var(--x) }
        "#,
    );

    assert_eq!(fx.value("width", 0).as_deref(), Some("2px"));
    assert_eq!(fx.value("width", 1).as_deref(), Some("1px"));
}

#[test]
fn matched_declarations_resolve_in_reference_context() {
    let fx = Fixture::new(
        r#"
        :root { --a: var(--b); --b: 1px }
        .y { width: var(--a) }
        @media print {
            :root { --b: 2px }
            .x { width: var(--a) }
        }
        "#,
    );
    let mut resolver = fx.resolver();

    let outside = resolver.resolve(fx.decl("width", 0)).unwrap();
    assert_eq!(outside.value.as_deref(), Some("1px"));
    assert_eq!(fx.sheet.declaration(fx.decl("--a", 0)).cached_value(), Some("1px"));

    let inside = resolver.resolve(fx.decl("width", 1)).unwrap();
    assert_eq!(inside.value.as_deref(), Some("2px"));
}

#[test]
fn pseudo_scopes_need_opt_in() {
    let fx = Fixture::new(".a:hover { --x: red } .a { color: var(--x, blue) }");
    let color = fx.decl("color", 0);

    let strict = fx.resolver().resolve(color).unwrap();
    assert_eq!(strict.value.as_deref(), Some("blue"));

    let options = ResolveOptions::default().with_ignore_pseudo_scope(true);
    let fresh = Fixture::new(".a:hover { --x: red } .a { color: var(--x, blue) }");
    let widened = Resolver::new(&fresh.sheet, &fresh.vars, options)
        .resolve(fresh.decl("color", 0))
        .unwrap();
    assert_eq!(widened.value.as_deref(), Some("red"));
}

#[test]
fn deep_chains_hit_the_depth_limit() {
    let css = r#"
        :root { --a: var(--b); --b: var(--c); --c: var(--d); --d: 1px }
        .x { width: var(--a) }
    "#;
    let fx = Fixture::new(css);
    let options = ResolveOptions::default().with_max_depth(2);

    let err = Resolver::new(&fx.sheet, &fx.vars, options)
        .resolve(fx.decl("width", 0))
        .unwrap_err();
    assert_eq!(
        err,
        ResolveError::DepthLimit {
            limit: 2,
            property: "--c".into()
        }
    );

    let fresh = Fixture::new(css);
    assert_eq!(fresh.value("width", 0).as_deref(), Some("1px"));
}

#[test]
fn unresolved_reference_does_not_affect_siblings() {
    let fx = Fixture::new(":root { --x: 1px } .a { width: var(--missing); height: var(--x) }");

    assert_eq!(fx.value("width", 0), None);
    assert_eq!(fx.value("height", 0).as_deref(), Some("1px"));
}

#[test]
fn malformed_calls_are_left_untouched() {
    let fx = Fixture::new(":root { --x: 1px } .a { content: \"var(--x\" }");

    assert_eq!(fx.value("content", 0).as_deref(), Some("\"var(--x\""));
}

#[test]
fn splicing_does_not_widen_visibility() {
    let fx = Fixture::new(
        r#"
        :root { --y: 1px }
        .c { --y: 5px }
        .a, .c { --x: var(--y) }
        .a { .b { width: var(--x) } }
        "#,
    );

    assert_eq!(fx.value("width", 0).as_deref(), Some("1px"));
}

#[test]
fn declarations_in_the_same_at_rule_resolve_in_place() {
    let fx = Fixture::new(
        r#"
        @media print {
            :root { --x: var(--b); --b: 2px }
            .a { width: var(--x) }
        }
        "#,
    );

    assert_eq!(fx.value("width", 0).as_deref(), Some("2px"));
    assert_eq!(fx.sheet.declaration(fx.decl("--x", 0)).cached_value(), Some("2px"));
}

#[test]
fn widened_matching_leaves_the_cache_alone() {
    let fx = Fixture::new(":root { --y: blue } .a:hover { --y: red } .a { --x: var(--y) }");
    let x = fx.decl("--x", 0);
    let options = ResolveOptions::default().with_ignore_pseudo_scope(true);

    let widened = Resolver::new(&fx.sheet, &fx.vars, options).resolve(x).unwrap();
    assert_eq!(widened.value.as_deref(), Some("red"));
    assert_eq!(fx.sheet.declaration(x).cached_value(), None);

    assert_eq!(fx.value("--x", 0).as_deref(), Some("blue"));
    assert_eq!(fx.sheet.declaration(x).cached_value(), Some("blue"));
}
