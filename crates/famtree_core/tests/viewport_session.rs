use famtree_core::{
    AppConfig, DiagramRenderer, FamilyTreeService, FileViewportStorage, HtmlPageRenderer,
    InMemoryPersonStore, Rect, TransformMode, TreeView, ViewState, ViewportConfig,
    ViewportController, ViewportStorage,
};

#[test]
fn pan_and_zoom_survive_a_restart() {
    let dir = tempfile::tempdir().unwrap();

    let mut session = ViewportController::restore(
        ViewportConfig::default(),
        FileViewportStorage::new(dir.path()),
    );
    session.pan_start(200.0, 200.0);
    session.pan_move(260.0, 150.0);
    session.pan_end();
    session.zoom(-250.0);
    let saved = session.view();
    drop(session);

    let restored = ViewportController::restore(
        ViewportConfig::default(),
        FileViewportStorage::new(dir.path()),
    );
    assert_eq!(restored.view(), saved);
    assert_eq!(
        restored.transform(),
        "translate(60px, -50px) scale(1.25)"
    );
}

#[test]
fn repeated_zoom_stays_within_bounds() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = ViewportController::restore(
        ViewportConfig::default(),
        FileViewportStorage::new(dir.path()),
    );

    for _ in 0..100 {
        session.zoom(-120.0);
    }
    assert_eq!(session.view().scale, 2.0);

    for _ in 0..100 {
        session.zoom(120.0);
    }
    assert_eq!(session.view().scale, 0.3);
}

#[test]
fn translate_only_mode_and_custom_key() {
    let dir = tempfile::tempdir().unwrap();
    let config = ViewportConfig {
        storage_key: "tree-b".to_string(),
        transform_mode: TransformMode::TranslateOnly,
        ..ViewportConfig::default()
    };
    let mut session = ViewportController::restore(config, FileViewportStorage::new(dir.path()));

    let transform = session
        .center_on(
            Rect::new(0.0, 0.0, 20.0, 20.0),
            Rect::new(0.0, 0.0, 220.0, 120.0),
        )
        .map(str::to_string);
    assert_eq!(transform.as_deref(), Some("translate(100px, 50px)"));

    let stored = FileViewportStorage::new(dir.path())
        .load("tree-b")
        .unwrap()
        .unwrap();
    let view: ViewState = serde_json::from_str(&stored).unwrap();
    assert_eq!(view.offset_x, 100.0);
    assert!(dir.path().join("tree-b.json").exists());
}

#[test]
fn saved_view_is_applied_to_the_next_html_page() {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig {
        viewport_dir: Some(dir.path().to_path_buf()),
        ..AppConfig::default()
    };

    let mut session = config.restore_viewport().unwrap();
    session.pan_start(0.0, 0.0);
    session.pan_move(-30.0, 45.0);
    session.pan_end();
    drop(session);

    let restored = config.restore_viewport().unwrap();
    let mut service =
        FamilyTreeService::new(InMemoryPersonStore::with_sample(), config.chart.clone());
    service.refresh().unwrap();
    let mut view = TreeView::new(
        HtmlPageRenderer::default().with_canvas_transform(restored.transform()),
    );

    let page = service.render(&mut view).unwrap();
    assert!(page
        .html
        .contains("style=\"transform: translate(-30px, 45px) scale(1)\""));
    assert!(view.renderer().render("flowchart TD\n").is_ok());
}
