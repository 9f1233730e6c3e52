mod common;

use common::{CountingEngine, Fixture};
use proscenium_core::api::{AssetKind, ResolveError};
use proscenium_core::{Importer, Pipeline};
use std::sync::Arc;

fn paths(importer: &Importer) -> Vec<String> {
    importer.imported().map(|(path, _)| path.canonical()).collect()
}

#[test]
fn test_duplicate_import_keeps_first_position() {
    let fixture = Fixture::new();
    fixture.write("app/lib/a.js", "");
    fixture.write("app/lib/b.css", "");
    let resolver = fixture.resolver();
    let a = resolver.resolve("/lib/a.js", None).unwrap();
    let b = resolver.resolve("/lib/b.css", None).unwrap();

    let mut importer = Importer::new();
    assert!(importer.import(b.clone(), AssetKind::Stylesheet));
    assert!(importer.import(a.clone(), AssetKind::Script));
    assert!(!importer.import(b.clone(), AssetKind::Stylesheet));

    assert_eq!(paths(&importer), vec!["/lib/b.css", "/lib/a.js"]);
    let kinds: Vec<_> = importer.imported().map(|(_, kind)| kind).collect();
    assert_eq!(kinds, vec![AssetKind::Stylesheet, AssetKind::Script]);
}

#[test]
fn test_reset_matches_fresh_importer() {
    let fixture = Fixture::new();
    fixture.write("app/lib/a.js", "");
    let resolver = fixture.resolver();
    let a = resolver.resolve("/lib/a.js", None).unwrap();

    let mut importer = Importer::new();
    importer.import(a.clone(), AssetKind::Script);
    importer.reset();

    assert!(importer.is_empty());
    assert!(importer.import(a, AssetKind::Script));
    assert_eq!(importer.entries().next().map(|e| e.index), Some(0));
}

#[test]
fn test_sideload_component_siblings() {
    let fixture = Fixture::new();
    fixture.write("app/app/components/card_component.rb", "");
    fixture.write("app/app/components/card_component.js", "");
    fixture.write("app/app/components/card_component.module.css", "");
    fixture.write("app/app/components/card_component.js.map", "");
    let resolver = fixture.resolver();
    let component = resolver
        .resolve("/app/components/card_component.rb", None)
        .unwrap();

    let mut importer = Importer::new();
    assert_eq!(importer.sideload(&resolver, &component).unwrap(), 2);
    assert_eq!(
        paths(&importer),
        vec![
            "/app/components/card_component.js",
            "/app/components/card_component.module.css",
        ]
    );
    let kinds: Vec<_> = importer.imported().map(|(_, kind)| kind).collect();
    assert_eq!(kinds, vec![AssetKind::Script, AssetKind::Stylesheet]);

    // Rendering the same component again adds nothing.
    assert_eq!(importer.sideload(&resolver, &component).unwrap(), 0);
}

#[test]
fn test_render_scopes_are_independent() {
    let fixture = Fixture::new();
    fixture.write("app/lib/a.js", "");
    let pipeline = Pipeline::from_config(&fixture.config(), Arc::new(CountingEngine::new())).unwrap();

    let mut first = pipeline.render();
    assert!(first.side_load("/lib/a", None).unwrap());
    assert!(!first.side_load("/lib/a.js", None).unwrap());

    let mut second = pipeline.render();
    assert!(second.side_load("/lib/a", None).unwrap());
    assert_eq!(first.importer().len(), 1);
    assert_eq!(second.importer().len(), 1);
}

#[test]
fn test_render_scope_side_load_failure_is_reported() {
    let fixture = Fixture::new();
    let pipeline = Pipeline::from_config(&fixture.config(), Arc::new(CountingEngine::new())).unwrap();

    let mut render = pipeline.render();
    let err = render.side_load("/lib/missing", None).unwrap_err();
    assert_eq!(err, ResolveError::PathResolutionFailed("/lib/missing".to_string()));
    assert!(render.importer().is_empty());
}

#[test]
fn test_render_scope_class_names_side_load_stylesheet() {
    let fixture = Fixture::new();
    let pipeline = Pipeline::from_config(&fixture.config(), Arc::new(CountingEngine::new())).unwrap();

    let mut render = pipeline.render();
    let names = render
        .class_names("/lib/css_modules/basic", ["@title", "plain"])
        .unwrap();
    assert_eq!(names, vec!["titlec3f452b4", "plain"]);

    let imported: Vec<_> = render
        .imported()
        .map(|(path, kind)| (path.canonical(), kind))
        .collect();
    assert_eq!(
        imported,
        vec![(
            "/lib/css_modules/basic.module.css".to_string(),
            AssetKind::Stylesheet
        )]
    );
}

#[test]
fn test_render_scope_side_load_as_overrides_kind() {
    let fixture = Fixture::new();
    fixture.write("app/lib/theme.css", "");
    let pipeline = Pipeline::from_config(&fixture.config(), Arc::new(CountingEngine::new())).unwrap();

    let mut render = pipeline.render();
    assert!(render.side_load_as("/lib/theme.css", None, AssetKind::Script).unwrap());
    let importer = render.into_importer();
    assert_eq!(importer.imported().next().map(|(_, kind)| kind), Some(AssetKind::Script));
}
