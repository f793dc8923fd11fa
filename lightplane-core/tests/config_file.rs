use lightplane_core::{FitPolicy, Pipeline, ProjectionError, SceneConfig};
use std::fs;

const WEDGE_STL: &str = "solid wedge
  facet normal 0 0 1
    outer loop
      vertex 0 0 0
      vertex 10 0 0
      vertex 0 10 0
    endloop
  endfacet
  facet normal 0 0 -1
    outer loop
      vertex 0 0 -5
      vertex 0 10 -5
      vertex 10 0 -5
    endloop
  endfacet
endsolid wedge
";

#[test]
fn test_load_scene_with_stl_mesh() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("wedge.stl"), WEDGE_STL).unwrap();
    let config_path = dir.path().join("scene.toml");
    fs::write(
        &config_path,
        r#"
        policy = "tight"

        [light]
        position = [0.0, 0.0, 100.0]
        target = [0.0, 0.0, 0.0]

        [[mesh]]
        name = "wedge"
        stl = "wedge.stl"

        [[mesh]]
        name = "box"
        scale = [4.0, 4.0, 4.0]
        contributes = false
        "#,
    )
    .unwrap();

    let config = SceneConfig::load(&config_path).unwrap();
    let policy = config.policy().unwrap();
    assert_eq!(policy, FitPolicy::Tight);

    let scene = config.into_scene(dir.path()).unwrap();
    assert_eq!(scene.meshes[0].vertex_count(), 6);

    let pipeline = Pipeline::new(scene, policy);
    let pass = pipeline.last_pass();
    assert_eq!(pass.result.points.len(), 6);
    assert_eq!(pass.result.spans.len(), 1);

    // Looking down -z: the wedge spans 10 units along both plane axes
    let extents = pass.extents.unwrap();
    assert!((extents.width() - 10.0).abs() < 1e-4);
    assert!((extents.height() - 10.0).abs() < 1e-4);
}

#[test]
fn test_missing_stl_reported() {
    let dir = tempfile::tempdir().unwrap();
    let config = SceneConfig::from_toml_str(
        r#"
        [[mesh]]
        name = "ghost"
        stl = "nowhere.stl"
        "#,
    )
    .unwrap();
    let err = config.into_scene(dir.path()).unwrap_err();
    assert!(matches!(err, ProjectionError::Io { .. }));
}

#[test]
fn test_missing_config_file_reported() {
    let dir = tempfile::tempdir().unwrap();
    let err = SceneConfig::load(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ProjectionError::Io { .. }));
}
