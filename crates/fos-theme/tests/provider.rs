//! Stylesheet loading: printing, diagnostics and imports

use fos_theme::{CssErrorKind, EngineConfig, MapResolver, StyleNode, StyleProvider, StyleTree};

fn provider() -> StyleProvider {
    StyleProvider::with_config(EngineConfig::default())
}

const THEME: &str = r#"
@define-color accent #ff0000;
@define-color accent_dim alpha(@accent, 0.5);

@keyframes pulse {
  from { opacity: 0.2 }
  50% { opacity: 1 }
  to { opacity: 0.2 }
}

@binding-set Edit {
  bind "<Control>a" { "select-all" () };
}

button.suggested-action:hover, label {
  color: @accent;
  margin-top: 4px;
}

window > box button {
  background-color: @accent_dim;
  -FooButton-spacing: 6;
}
"#;

#[test]
fn test_print_round_trip() {
    let mut first = provider();
    first.load_from_data(THEME).unwrap();
    assert_eq!(first.rulesets().len(), 3);

    let printed = first.to_string();
    let mut second = provider();
    second.load_from_data(&printed).unwrap();

    assert_eq!(second.to_string(), printed);
    assert_eq!(second.rulesets().len(), first.rulesets().len());
    assert_eq!(second.get_color("accent"), first.get_color("accent"));
    assert_eq!(second.get_keyframes("pulse"), first.get_keyframes("pulse"));
    assert_eq!(second.binding_set("Edit"), first.binding_set("Edit"));
}

#[test]
fn test_print_sorts_declarations() {
    let mut provider = provider();
    provider.load_from_data("a { opacity: 1; color: #000000; }").unwrap();
    let printed = provider.to_string();
    let color = printed.find("color:").unwrap();
    let opacity = printed.find("opacity:").unwrap();
    assert!(color < opacity, "{printed}");
}

#[test]
fn test_partial_content_survives_errors() {
    let mut provider = provider();
    let result = provider.load_from_data(
        "a { color: #ff0000 } b { color: } c { opacity: 0.5; margin-top: 1px 2px 3px 4px 5px } d { opacity: 1 }",
    );

    let error = result.unwrap_err();
    assert_eq!(error.kind, CssErrorKind::Syntax);
    assert!(provider.errors().len() >= 2);

    let selectors: Vec<String> = provider.rulesets().iter().map(|r| r.selector().to_string()).collect();
    assert_eq!(selectors, vec!["a", "c", "d"]);
}

#[test]
fn test_rules_after_broken_keyframes_survive() {
    for text in [
        "@keyframes k { 120% { opacity: 1 } } a { opacity: 0.5 } b { opacity: 0.25 }",
        "@keyframes k { from { opacity: 0 } 50% opacity: 1; } a { opacity: 0.5 } b { opacity: 0.25 }",
        "@keyframes k { from { opacity: 0 } bogus { opacity: 1 } to { opacity: 1 } } a { opacity: 0.5 } b { opacity: 0.25 }",
    ] {
        let mut provider = provider();
        let error = provider.load_from_data(text).unwrap_err();
        assert_eq!(error.kind, CssErrorKind::Syntax, "{text}");
        assert_eq!(provider.errors().len(), 1, "{text}: {:?}", provider.errors().errors());
        assert!(provider.get_keyframes("k").is_none(), "{text}");

        let selectors: Vec<String> = provider.rulesets().iter().map(|r| r.selector().to_string()).collect();
        assert_eq!(selectors, vec!["a", "b"], "{text}");
    }
}

#[test]
fn test_deprecations_are_warnings() {
    let mut provider = provider();
    let result = provider.load_from_data("a:prelight { opacity: 1 } @binding-set X { unbind \"a\"; };");
    assert!(result.is_ok());
    assert_eq!(provider.errors().warnings().count(), 2);
    assert_eq!(provider.errors().hard_errors().count(), 0);
}

#[test]
fn test_load_replaces_previous_contents() {
    let mut provider = provider();
    let _ = provider.load_from_data("@define-color a #000000; bogus { frob: 1 }");
    assert!(!provider.errors().is_empty());

    provider.load_from_data("b { opacity: 1 }").unwrap();
    assert!(provider.errors().is_empty());
    assert!(provider.get_color("a").is_none());
    assert_eq!(provider.rulesets().len(), 1);
}

#[test]
fn test_import() {
    let resolver = MapResolver::new()
        .with("base.css", "@define-color fg #00ff00; a { opacity: 0.5 }")
        .with("broken.css", "x { frob: 1 }");

    let mut provider = provider();
    provider
        .load_named("@import url(\"base.css\");\nb { color: @fg }", Some("main.css"), &resolver)
        .unwrap();
    assert_eq!(provider.rulesets().len(), 2);
    assert!(provider.get_color("fg").is_some());

    let result = provider.load_named("@import 'broken.css';", Some("main.css"), &resolver);
    let error = result.unwrap_err();
    assert_eq!(error.kind, CssErrorKind::Name);
    assert_eq!(error.section.file(), Some("broken.css"));
}

#[test]
fn test_import_failures() {
    let resolver = MapResolver::new().with("loop.css", "@import \"loop.css\";");

    let mut provider = provider();
    let error = provider
        .load_named("@import \"loop.css\";", Some("loop.css"), &resolver)
        .unwrap_err();
    assert_eq!(error.kind, CssErrorKind::Import);
    assert_eq!(error.message, "Loading 'loop.css' would recurse");

    let error = provider
        .load_named("@import \"missing.css\";", Some("main.css"), &resolver)
        .unwrap_err();
    assert_eq!(error.kind, CssErrorKind::Import);
    assert_eq!(error.message, "Failed to import: No such document 'missing.css'");

    let error = provider.load_from_data("@import \"x.css\"").unwrap_err();
    assert_eq!(error.message, "expected semicolon");
}

#[test]
fn test_nested_import_recursion() {
    let resolver = MapResolver::new()
        .with("a.css", "@import \"b.css\"; a { opacity: 1 }")
        .with("b.css", "@import \"a.css\"; b { opacity: 1 }");

    let mut provider = provider();
    let error = provider.load_named("@import \"a.css\";", None, &resolver).unwrap_err();
    assert_eq!(error.message, "Loading 'a.css' would recurse");
    assert_eq!(provider.rulesets().len(), 2);
}

#[test]
fn test_widget_style_lookup() {
    let mut provider = provider();
    provider.load_from_data(THEME).unwrap();

    let mut tree = StyleTree::new();
    let window = tree.add_root(StyleNode::new("window"));
    let vbox = tree.append_child(window, StyleNode::new("box"));
    let button = tree.append_child(vbox, StyleNode::new("button"));

    let spacing = provider.widget_style_property(&tree.matcher(button), "-FooButton-spacing");
    assert_eq!(spacing.map(|w| w.value.as_str()), Some("6"));
    assert!(
        provider
            .widget_style_property(&tree.matcher(vbox), "-FooButton-spacing")
            .is_none()
    );
}
