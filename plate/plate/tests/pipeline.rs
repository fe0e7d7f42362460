//! End-to-end tests: scene editing, slicing and export together.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::float_cmp)]
#![allow(clippy::cast_precision_loss)]

use approx::assert_relative_eq;
use plate::prelude::*;
use plate::slice::{PlanarSlicer, SliceBackend, SliceError, SliceRun};

fn block(x: f64, y: f64, z: f64) -> IndexedMesh {
    IndexedMesh::cuboid(Point3::origin(), Point3::new(x, y, z))
}

fn style(thickness: f64) -> BuildStyle {
    BuildStyle::default().with_layer_thickness(thickness)
}

#[test]
fn box_layers_follow_thickness() {
    let mut scene = SceneManager::new();
    scene.add("box", block(10.0, 10.0, 5.0), None);

    let mut slicer = SlicerService::default();
    slicer
        .slice(&scene.collect_for_slicing(), &style(0.5), &mut NullProgress)
        .unwrap();

    let part = &slicer.last_parts()[0];
    assert_eq!(part.layer_count(), 10);
    for (i, layer) in part.layers.iter().enumerate() {
        assert_relative_eq!(layer.z_height, i as f64 * 0.5, epsilon = 1e-12);
        assert_eq!(layer.contours.len(), 1);
    }
}

#[test]
fn export_before_slice_fails() {
    let slicer = SlicerService::default();
    let dir = tempfile::tempdir().unwrap();

    let err = slicer.export_plan(dir.path().join("plan.cli")).unwrap_err();
    assert!(matches!(err, SliceError::NoSliceData));
    assert!(
        slicer
            .export_layer_preview(dir.path().join("layer.svg"), 0)
            .is_err()
    );
}

#[test]
fn arranged_scene_slices_and_exports() {
    let mut scene = SceneManager::new();
    for (i, height) in [2.0, 3.0, 1.5, 2.5].into_iter().enumerate() {
        scene.add(format!("part_{i}"), block(8.0, 8.0, height), None);
    }
    assert_eq!(scene.auto_arrange(), 4);
    assert!(scene.check_build_volume().is_empty());

    // Hidden objects are not sliced.
    let hidden = scene.objects()[3].id();
    assert!(scene.toggle_visibility(hidden));
    let items = scene.collect_for_slicing();
    assert_eq!(items.len(), 3);

    let mut slicer = SlicerService::default();
    let summary = slicer.slice(&items, &style(0.1), &mut NullProgress).unwrap();
    assert_eq!(summary.total_layers, 20 + 30 + 15);
    assert_eq!(summary.parts[1].name, "part_1");
    assert!(summary.estimated_build_hours > 0.0);

    let dir = tempfile::tempdir().unwrap();
    let plan_path = dir.path().join("plate.cli");
    let written = slicer.export_plan(&plan_path).unwrap();
    assert_eq!(written, 65);

    let text = std::fs::read_to_string(&plan_path).unwrap();
    assert_eq!(text.lines().filter(|l| l.starts_with("$$LAYER/")).count(), 65);
    assert_eq!(text.matches(";; Part: ").count(), 3);
    assert!(text.ends_with("$$END\n"));

    let svg_path = dir.path().join("layer_0.svg");
    assert!(slicer.export_layer_preview(&svg_path, 0).unwrap());
    let svg = std::fs::read_to_string(&svg_path).unwrap();
    assert_eq!(svg.matches("<polyline").count(), 3);
}

#[test]
fn slice_is_isolated_from_later_edits() {
    let mut scene = SceneManager::new();
    let id = scene.add("box", block(10.0, 10.0, 2.0), None);
    let items = scene.collect_for_slicing();

    scene
        .set_transform(
            id,
            &TransformUpdate::new().with_scale(Vector3::new(1.0, 1.0, 3.0)),
            Some("Scale"),
        )
        .unwrap();

    let mut slicer = SlicerService::default();
    let summary = slicer.slice(&items, &style(0.5), &mut NullProgress).unwrap();
    assert_eq!(summary.total_layers, 4);
    assert_eq!(summary.parts[0].z_range, (0.0, 2.0));

    let rescaled = slicer
        .slice(&scene.collect_for_slicing(), &style(0.5), &mut NullProgress)
        .unwrap();
    assert_eq!(rescaled.total_layers, 12);
}

#[test]
fn background_job_reports_progress() {
    let mut scene = SceneManager::new();
    scene.add("tall", block(5.0, 5.0, 6.0), None);
    scene.add("short", block(5.0, 5.0, 2.0), None);
    scene.auto_arrange();

    let mut slicer = SlicerService::default();
    let job = slicer.spawn(scene.collect_for_slicing(), style(0.05)).unwrap();

    let reports: Vec<SliceProgress> = job.progress().iter().collect();
    let run: SliceRun = job.join().unwrap();

    assert_eq!(run.summary.total_layers, 160);
    assert!(reports.windows(2).all(|w| w[0].fraction <= w[1].fraction));
    assert_eq!(reports.first().unwrap().fraction, 0.0);
    assert_eq!(reports.last().unwrap().fraction, 1.0);
    assert!(reports.iter().any(|r| r.message == "Slicing short... (2/2)"));

    slicer.install(run);
    assert_eq!(slicer.last_summary().unwrap().total_layers, 160);
    let installed = slicer.last_run().unwrap();
    assert_eq!(installed.parts.len(), 2);
    assert_eq!(installed.parts[1].name, "short");
}

#[test]
fn cancelled_slice_is_an_error() {
    let mut scene = SceneManager::new();
    scene.add("box", block(10.0, 10.0, 1.0), None);

    let cancel = CancelToken::new();
    cancel.cancel();
    let result = PlanarSlicer::new().slice(
        &scene.collect_for_slicing(),
        &style(0.01),
        &mut NullProgress,
        &cancel,
    );
    assert!(matches!(result, Err(SliceError::Cancelled)));
}

#[test]
fn project_round_trip_preserves_placement() {
    let mut scene = SceneManager::new();
    let id = scene.add("box", block(10.0, 10.0, 5.0), Some("parts/box.stl".into()));
    scene
        .set_transform(
            id,
            &TransformUpdate::new().with_translation(Vector3::new(15.0, -5.0, 0.0)),
            Some("Move"),
        )
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("project.json");
    scene.save_json(&path).unwrap();

    let mut reloaded = SceneManager::new();
    let report = reloaded
        .load_json(&path, |_| Some(block(10.0, 10.0, 5.0)))
        .unwrap();
    assert_eq!(report.restored.len(), 1);
    assert!(report.skipped.is_empty());

    let original = scene.collect_for_slicing();
    let restored = reloaded.collect_for_slicing();
    let a = original[0].mesh.bounds();
    let b = restored[0].mesh.bounds();
    assert_relative_eq!(a.min, b.min, epsilon = 1e-9);
    assert_relative_eq!(a.max, b.max, epsilon = 1e-9);
}
