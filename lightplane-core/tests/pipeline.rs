use lightplane_core::{
    accumulate, fit_orthographic_extents, FitPolicy, Light, Mesh, Pipeline, PlaneBasis,
    ProjectionError, RotationState, Scene, SceneUpdate,
};
use nalgebra::{Point3, Vector3};
use std::f32::consts::TAU;

fn single_box_scene() -> Scene {
    let mesh = Mesh::unit_box("box").with_scale(30.0, 30.0, 30.0);
    Scene::new(vec![mesh], Light::new(Point3::new(100.0, 0.0, 0.0), Point3::origin()))
}

#[test]
fn test_single_box_seen_from_x() {
    let pipeline = Pipeline::new(single_box_scene(), FitPolicy::Tight);
    let pass = pipeline.last_pass();

    let basis = pass.basis.unwrap();
    assert!((basis.normal - Vector3::new(-1.0, 0.0, 0.0)).norm() < 1e-6);
    assert!((basis.p1 - Vector3::new(0.0, 0.0, -1.0)).norm() < 1e-6);
    assert!((basis.p2 - Vector3::new(0.0, 1.0, 0.0)).norm() < 1e-6);

    assert_eq!(pass.result.points.len(), 24);
    let extents = pass.extents.unwrap();
    assert!((extents.left + 15.0).abs() < 1e-4);
    assert!((extents.right - 15.0).abs() < 1e-4);
    assert!((extents.top - 15.0).abs() < 1e-4);
    assert!((extents.bottom + 15.0).abs() < 1e-4);

    let shadow = &pipeline.scene().light.shadow;
    assert_eq!(shadow.extents, extents);
    assert!(!shadow.needs_update);
}

#[test]
fn test_symmetric_policy_matches_legacy_fit() {
    let mut pipeline = Pipeline::new(single_box_scene(), FitPolicy::Tight);
    let extents = pipeline.set_policy(FitPolicy::Symmetric).extents.unwrap();
    assert!((extents.right - 30.0).abs() < 1e-4);
    assert!((extents.left + 30.0).abs() < 1e-4);
    assert_eq!(extents.top, extents.right);
    assert_eq!(extents.bottom, extents.left);
}

#[test]
fn test_box_corners_inside_tight_fit_for_any_rotation() {
    let light = Light::new(Point3::new(60.0, 80.0, -30.0), Point3::new(0.0, 10.0, 0.0));
    let basis = PlaneBasis::from_light(&light).unwrap();

    let steps = 24;
    for step in 0..steps {
        let angle = TAU * step as f32 / steps as f32;
        let mesh = Mesh::unit_box("box")
            .with_scale(30.0, 45.0, 70.0)
            .with_rotation(RotationState::new(angle * 0.5, angle, angle * 0.25));
        let result = accumulate(&[mesh], &basis, &light.position);
        let extents = fit_orthographic_extents(&result.bounds, FitPolicy::Tight).unwrap();

        assert!(extents.left <= extents.right);
        assert!(extents.bottom <= extents.top);
        for p in &result.points {
            assert!(p.x >= extents.left && p.x <= extents.right, "angle {angle}: {p:?}");
            assert!(p.y >= extents.bottom && p.y <= extents.top, "angle {angle}: {p:?}");
        }
    }
}

#[test]
fn test_bounds_ordered_for_non_empty_passes() {
    let lights = [
        (Point3::new(100.0, 0.0, 0.0), Point3::origin()),
        (Point3::new(-50.0, 90.0, 20.0), Point3::new(10.0, 0.1, -5.0)),
        (Point3::new(0.0, 100.0, 0.0), Point3::new(0.0, 0.1, 0.0)),
    ];
    for (position, target) in lights {
        let mut scene = Scene::default();
        scene.light = Light::new(position, target);
        let pipeline = Pipeline::new(scene, FitPolicy::Tight);
        let bounds = pipeline.last_pass().result.bounds;
        assert!(bounds.min.x <= bounds.max.x);
        assert!(bounds.min.y <= bounds.max.y);
        assert!(bounds.min.x.is_finite() && bounds.max.y.is_finite());
    }
}

#[test]
fn test_repeated_passes_are_identical() {
    let mut pipeline = Pipeline::default();
    let first = pipeline.run_pass().clone();
    let second = pipeline.run_pass().clone();
    assert_eq!(first, second);
}

#[test]
fn test_point_order_follows_contributing_meshes() {
    let pipeline = Pipeline::default();
    let spans = &pipeline.last_pass().result.spans;
    let names: Vec<_> = spans.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["box", "tower", "crate"]);
    assert_eq!(spans[1].range, 24..48);
    assert_eq!(spans[2].range, 48..72);
}

#[test]
fn test_all_meshes_off_keeps_previous_extents() {
    let mut pipeline = Pipeline::default();
    let previous = pipeline.scene().light.shadow.extents;

    for mesh in 0..3 {
        pipeline.dispatch(SceneUpdate::Contribution {
            mesh,
            contributes: false,
        });
    }

    let pass = pipeline.last_pass();
    assert!(pass.result.is_empty());
    assert_eq!(pass.extents, None);
    assert_eq!(pass.skipped, Some(ProjectionError::EmptyContribution));

    let shadow = &pipeline.scene().light.shadow;
    assert_eq!(shadow.extents, previous);
    assert!(shadow.extents.is_finite());
    assert!(shadow.projection_matrix().iter().all(|v| v.is_finite()));
}

#[test]
fn test_turning_a_mesh_back_on_refits() {
    let mut pipeline = Pipeline::default();
    for mesh in 0..3 {
        pipeline.dispatch(SceneUpdate::Contribution {
            mesh,
            contributes: false,
        });
    }
    let pass = pipeline.dispatch(SceneUpdate::Contribution {
        mesh: 2,
        contributes: true,
    });
    assert_eq!(pass.result.points.len(), 24);
    assert!(pass.extents.is_some());
    assert_eq!(pass.skipped, None);
}

#[test]
fn test_target_on_light_is_rejected() {
    let mut pipeline = Pipeline::default();
    pipeline.dispatch(SceneUpdate::LightPosition(Point3::new(10.0, 20.0, 5.0)));
    let previous = pipeline.scene().light.shadow.extents;

    let pass = pipeline.dispatch(SceneUpdate::LightTarget(Point3::new(10.0, 20.0, 5.0)));

    assert!(pass.basis.is_none());
    assert!(matches!(
        pass.skipped,
        Some(ProjectionError::ZeroLengthDirection { .. })
    ));
    assert!(pass.result.is_empty());

    let extents = pipeline.scene().light.shadow.extents;
    assert!(extents.is_finite());
    assert_eq!(extents, previous);
}

#[test]
fn test_light_straight_above_projects_finite_points() {
    let mut pipeline = Pipeline::default();
    pipeline.dispatch(SceneUpdate::LightTarget(Point3::new(0.0, 0.1, 0.0)));
    let pass = pipeline.dispatch(SceneUpdate::LightPosition(Point3::new(0.0, 100.0, 0.0)));

    assert!(pass.basis.unwrap().used_fallback);
    assert!(pass
        .result
        .points
        .iter()
        .all(|p| p.x.is_finite() && p.y.is_finite()));
    assert!(pass.extents.unwrap().is_finite());
}

#[test]
fn test_scale_change_moves_extents() {
    let mut pipeline = Pipeline::new(single_box_scene(), FitPolicy::Tight);
    let before = pipeline.last_pass().extents.unwrap();
    let after = pipeline
        .dispatch(SceneUpdate::MeshScale {
            mesh: 0,
            scale: Vector3::new(30.0, 60.0, 30.0),
        })
        .extents
        .unwrap();
    assert!((after.height() - 2.0 * before.height()).abs() < 1e-3);
    assert!((after.width() - before.width()).abs() < 1e-3);
}

#[test]
fn test_nan_scale_leaves_every_point_inside_extents() {
    let mut pipeline = Pipeline::default();
    let before = pipeline.last_pass().clone();

    let pass = pipeline.dispatch(SceneUpdate::MeshScale {
        mesh: 1,
        scale: Vector3::new(f32::NAN, 10.0, 10.0),
    });

    assert_eq!(pass.result.points.len(), 72);
    let extents = pass.extents.unwrap();
    for p in &pass.result.points {
        assert!(p.x.is_finite() && p.y.is_finite(), "{p:?}");
        assert!(p.x >= extents.left && p.x <= extents.right, "{p:?}");
        assert!(p.y >= extents.bottom && p.y <= extents.top, "{p:?}");
    }
    assert_eq!(pass.result.points, before.result.points);
    assert_eq!(pipeline.scene().meshes[1].scale, Vector3::new(20.0, 60.0, 20.0));
}

#[test]
fn test_nan_light_position_is_ignored() {
    let mut pipeline = Pipeline::default();
    let previous = pipeline.scene().light.shadow.extents;

    let pass = pipeline.dispatch(SceneUpdate::LightPosition(Point3::new(f32::NAN, 0.0, 0.0)));

    assert_eq!(pass.skipped, None);
    assert_eq!(pass.extents, Some(previous));
    assert_eq!(pipeline.scene().light.position, Point3::new(100.0, 0.0, 0.0));
}
