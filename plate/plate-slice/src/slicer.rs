//! Planar slicing of world-space meshes into layer stacks.

// Layer counts don't overflow in practice
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

use std::time::Instant;

use plate_mesh::{Aabb, MeshItem, SectionAdapter, TriangleSectioner, Vector3};
use tracing::{debug, info, warn};

use crate::error::{SliceError, SliceResult};
use crate::estimate::estimate_build_time;
use crate::layer::{Layer, Part};
use crate::params::{BuildStyle, SlicerOptions};
use crate::progress::{CancelToken, ProgressObserver, SliceProgress};
use crate::result::{SliceRun, SliceSummary};

/// Slack when dividing a height by the layer thickness, so an exact multiple
/// is not lost to rounding.
const LAYER_COUNT_EPSILON: f64 = 1e-9;

/// Most layers a single part may be cut into.
pub const MAX_LAYERS_PER_PART: usize = 1_000_000;

/// A complete slicing strategy.
///
/// [`PlanarSlicer`] is the built-in implementation. Another backend (for
/// example one that also generates hatch vectors) can be swapped in behind
/// [`SlicerService`](crate::SlicerService) without changing callers.
pub trait SliceBackend: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Slice every item, in order.
    ///
    /// # Errors
    ///
    /// Returns [`SliceError::InvalidLayerThickness`] for an unusable style,
    /// [`SliceError::TooManyLayers`] if a part needs more layers than the
    /// backend allows, and [`SliceError::Cancelled`] if `cancel` fires. Per-layer section
    /// failures are not errors.
    fn slice(
        &self,
        items: &[MeshItem],
        style: &BuildStyle,
        observer: &mut dyn ProgressObserver,
        cancel: &CancelToken,
    ) -> SliceResult<SliceRun>;
}

/// Slices each mesh with horizontal planes at fixed spacing.
///
/// For each item, layers start at the mesh's lowest Z and step by the layer
/// thickness, stopping before the top: `max(1, floor(height / thickness))`
/// layers. A height whose section fails or is empty is kept as an empty
/// layer.
///
/// # Example
///
/// ```
/// use plate_mesh::{IndexedMesh, MeshItem, Point3};
/// use plate_slice::{BuildStyle, CancelToken, NullProgress, PlanarSlicer, SliceBackend};
///
/// let block = IndexedMesh::cuboid(Point3::origin(), Point3::new(10.0, 10.0, 5.0));
/// let items = [MeshItem::new("1", "block", block)];
/// let style = BuildStyle::default().with_layer_thickness(0.5);
///
/// let run = PlanarSlicer::new()
///     .slice(&items, &style, &mut NullProgress, &CancelToken::new())
///     .unwrap();
/// assert_eq!(run.summary.total_layers, 10);
/// assert_eq!(run.parts[0].layers[3].z_height, 1.5);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PlanarSlicer<A = TriangleSectioner> {
    adapter: A,
    options: SlicerOptions,
}

impl PlanarSlicer {
    /// Create a slicer using the built-in [`TriangleSectioner`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<A: SectionAdapter> PlanarSlicer<A> {
    /// Create a slicer around a custom section adapter.
    #[must_use]
    pub fn with_adapter(adapter: A) -> Self {
        Self {
            adapter,
            options: SlicerOptions::default(),
        }
    }

    /// Replace the slicer options.
    #[must_use]
    pub fn with_options(mut self, options: SlicerOptions) -> Self {
        self.options = options;
        self
    }

    /// The slicer options.
    #[must_use]
    pub const fn options(&self) -> &SlicerOptions {
        &self.options
    }

    fn slice_item(
        &self,
        item: &MeshItem,
        heights: &[f64],
        progress: &mut Reporter<'_>,
        cancel: &CancelToken,
    ) -> SliceResult<Part> {
        let interval = self.options.progress_interval.max(1);
        let mut layers = Vec::with_capacity(heights.len());
        let mut failed = 0usize;

        for (index, &z) in heights.iter().enumerate() {
            if cancel.is_cancelled() {
                info!(part = %item.name, layer = index, "Slice cancelled");
                return Err(SliceError::Cancelled);
            }

            let contours = match self.adapter.section_at(&item.mesh, z, &Vector3::z()) {
                Ok(Some(loops)) => loops.into_iter().filter(|c| !c.is_empty()).collect(),
                Ok(None) => Vec::new(),
                Err(err) => {
                    failed += 1;
                    debug!(part = %item.name, z, error = %err, "Section failed");
                    Vec::new()
                }
            };
            layers.push(Layer::new(index, z, contours));

            progress.advance();
            if index % interval == 0 {
                progress.emit(format!(
                    "Slicing {}: layer {}/{}",
                    item.name,
                    index + 1,
                    heights.len()
                ));
            }
        }

        let part = Part {
            id: item.id.clone(),
            name: item.name.clone(),
            mesh: item.mesh.clone(),
            layers,
        };

        let empty = part.empty_layer_count();
        if failed > 0 {
            warn!(part = %part.name, failed, "Sectioning failed on some layers");
        }
        if empty > 0 {
            debug!(part = %part.name, empty, "Layers without contours");
        }

        let (z_min, z_max) = part.z_range();
        info!(
            part = %part.name,
            layers = part.layer_count(),
            z_min,
            z_max,
            "Part sliced"
        );

        Ok(part)
    }
}

impl<A: SectionAdapter> SliceBackend for PlanarSlicer<A> {
    fn name(&self) -> &str {
        "planar"
    }

    fn slice(
        &self,
        items: &[MeshItem],
        style: &BuildStyle,
        observer: &mut dyn ProgressObserver,
        cancel: &CancelToken,
    ) -> SliceResult<SliceRun> {
        style.validate()?;
        let start = Instant::now();
        let thickness = style.layer_thickness_mm;

        let plans: Vec<Vec<f64>> = items
            .iter()
            .map(|item| layer_heights(&item.mesh.bounds(), thickness))
            .collect::<SliceResult<_>>()?;
        let expected: usize = plans.iter().map(Vec::len).sum();

        info!(
            backend = self.name(),
            items = items.len(),
            layer_thickness = thickness,
            expected_layers = expected,
            "Starting slice"
        );

        let mut progress = Reporter::new(observer, expected);
        progress.emit("Starting slice...");

        let mut parts = Vec::with_capacity(items.len());
        for (i, (item, heights)) in items.iter().zip(&plans).enumerate() {
            progress.emit(format!("Slicing {}... ({}/{})", item.name, i + 1, items.len()));
            parts.push(self.slice_item(item, heights, &mut progress, cancel)?);
        }

        let elapsed_s = start.elapsed().as_secs_f64();
        let total_layers: usize = parts.iter().map(Part::layer_count).sum();
        let estimated_hours = estimate_build_time(style, total_layers, Some(items));
        progress.finish(format!("Complete: {total_layers} layers in {elapsed_s:.1}s"));

        info!(
            layers = total_layers,
            elapsed_s,
            build_hours = estimated_hours,
            "Slicing complete"
        );

        let summary = SliceSummary::from_parts(&parts, style, elapsed_s, estimated_hours);
        Ok(SliceRun { parts, summary })
    }
}

/// Cutting heights for a mesh with the given bounds.
///
/// Heights are `z_min + i * thickness` for `i` in
/// `0..max(1, floor(height / thickness))`; an empty box yields none.
///
/// # Errors
///
/// Returns [`SliceError::InvalidLayerThickness`] for a thickness that is not
/// positive and finite, and [`SliceError::TooManyLayers`] if the part would
/// need more than [`MAX_LAYERS_PER_PART`] layers.
pub fn layer_heights(bounds: &Aabb, thickness: f64) -> SliceResult<Vec<f64>> {
    if !thickness.is_finite() || thickness <= 0.0 {
        return Err(SliceError::InvalidLayerThickness(thickness));
    }
    if bounds.is_empty() {
        return Ok(Vec::new());
    }

    let z_min = bounds.min.z;
    let height = bounds.max.z - z_min;
    let layers = (height / thickness + LAYER_COUNT_EPSILON).floor().max(1.0);
    if !layers.is_finite() || layers > MAX_LAYERS_PER_PART as f64 {
        return Err(SliceError::TooManyLayers {
            layers,
            max: MAX_LAYERS_PER_PART,
        });
    }

    Ok((0..layers as usize)
        .map(|i| (i as f64).mul_add(thickness, z_min))
        .collect())
}

// ============================================================================
// Internal helper functions
// ============================================================================

/// Tracks completed layers and forwards reports, swallowing observer errors.
struct Reporter<'a> {
    observer: &'a mut dyn ProgressObserver,
    completed: usize,
    total: usize,
}

impl<'a> Reporter<'a> {
    fn new(observer: &'a mut dyn ProgressObserver, total: usize) -> Self {
        Self {
            observer,
            completed: 0,
            total,
        }
    }

    const fn advance(&mut self) {
        self.completed += 1;
    }

    fn emit(&mut self, message: impl Into<String>) {
        let report = SliceProgress::new(self.completed, self.total, message);
        self.send(&report);
    }

    fn finish(&mut self, message: impl Into<String>) {
        let report = SliceProgress::finished(self.total, message);
        self.send(&report);
    }

    fn send(&mut self, report: &SliceProgress) {
        if let Err(err) = self.observer.report(report) {
            debug!(error = %err, "Progress observer failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use plate_mesh::{IndexedMesh, Point3, Polyline, SectionError, SectionResult};
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::progress::{NullProgress, ObserverError};

    fn block_item(name: &str, min: (f64, f64, f64), max: (f64, f64, f64)) -> MeshItem {
        MeshItem::new(
            name,
            name,
            IndexedMesh::cuboid(
                Point3::new(min.0, min.1, min.2),
                Point3::new(max.0, max.1, max.2),
            ),
        )
    }

    fn run(items: &[MeshItem], thickness: f64) -> SliceRun {
        let style = BuildStyle::default().with_layer_thickness(thickness);
        PlanarSlicer::new()
            .slice(items, &style, &mut NullProgress, &CancelToken::new())
            .unwrap()
    }

    #[test]
    fn test_layer_heights() {
        let bounds = Aabb::new(Point3::new(0.0, 0.0, 1.0), Point3::new(1.0, 1.0, 2.0));
        let heights = layer_heights(&bounds, 0.3).unwrap();
        assert_eq!(heights.len(), 3);
        assert_relative_eq!(heights[2], 1.6, epsilon = 1e-12);

        // Exact multiple despite 0.1 not being representable.
        let bounds = Aabb::new(Point3::origin(), Point3::new(1.0, 1.0, 0.3));
        assert_eq!(layer_heights(&bounds, 0.1).unwrap().len(), 3);

        // Thinner than one layer still yields one.
        let flat = Aabb::new(Point3::origin(), Point3::new(1.0, 1.0, 0.01));
        assert_eq!(layer_heights(&flat, 0.03).unwrap(), vec![0.0]);

        assert!(layer_heights(&Aabb::empty(), 0.03).unwrap().is_empty());
    }

    #[test]
    fn test_layer_heights_rejects_bad_thickness() {
        let bounds = Aabb::new(Point3::origin(), Point3::new(1.0, 1.0, 1.0));
        for thickness in [0.0, -0.1, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                layer_heights(&bounds, thickness),
                Err(SliceError::InvalidLayerThickness(_))
            ));
        }
    }

    #[test]
    fn test_layer_heights_cap() {
        let bounds = Aabb::new(Point3::origin(), Point3::new(1.0, 1.0, 1.0));
        let under_cap = 2.0 / MAX_LAYERS_PER_PART as f64;
        assert_eq!(
            layer_heights(&bounds, under_cap).unwrap().len(),
            MAX_LAYERS_PER_PART / 2
        );

        assert!(matches!(
            layer_heights(&bounds, under_cap / 4.0),
            Err(SliceError::TooManyLayers { max: MAX_LAYERS_PER_PART, .. })
        ));
    }

    #[test]
    fn test_tiny_thickness_is_an_error() {
        // Passes style validation but would need ~5e300 layers.
        let items = [block_item("a", (0.0, 0.0, 0.0), (1.0, 1.0, 5.0))];
        let style = BuildStyle::default().with_layer_thickness(1e-300);
        assert!(style.validate().is_ok());

        let mut reports = Vec::new();
        let mut observer = |p: &SliceProgress| reports.push(p.clone());
        let err = PlanarSlicer::new()
            .slice(&items, &style, &mut observer, &CancelToken::new())
            .unwrap_err();
        assert!(matches!(err, SliceError::TooManyLayers { .. }));
        assert!(reports.is_empty());
    }

    #[test]
    fn test_box_layer_count_and_heights() {
        let result = run(&[block_item("box", (0.0, 0.0, 0.0), (10.0, 10.0, 5.0))], 0.03);
        let part = &result.parts[0];

        assert_eq!(part.layer_count(), 166);
        for (i, layer) in part.layers.iter().enumerate() {
            assert_eq!(layer.index, i);
            assert_relative_eq!(layer.z_height, i as f64 * 0.03, epsilon = 1e-9);
            assert_eq!(layer.contours.len(), 1);
            assert!(layer.contours[0].is_closed());
        }
    }

    #[test]
    fn test_parts_keep_input_order() {
        let items = [
            block_item("tall", (0.0, 0.0, 0.0), (5.0, 5.0, 4.0)),
            block_item("short", (10.0, 0.0, 1.0), (15.0, 5.0, 2.0)),
        ];
        let result = run(&items, 0.5);

        assert_eq!(result.parts[0].name, "tall");
        assert_eq!(result.parts[1].name, "short");
        assert_eq!(result.parts[0].layer_count(), 8);
        assert_eq!(result.parts[1].layer_count(), 2);
        assert_relative_eq!(result.parts[1].layers[0].z_height, 1.0);
        assert_eq!(result.summary.total_layers, 10);
        assert_eq!(result.summary.parts[1].z_range, (1.0, 2.0));
        assert!(result.summary.estimated_build_hours > 0.0);
    }

    #[test]
    fn test_empty_mesh_yields_no_layers() {
        let items = [MeshItem::new("e", "empty", IndexedMesh::new())];
        let result = run(&items, 0.1);
        assert_eq!(result.parts.len(), 1);
        assert_eq!(result.parts[0].layer_count(), 0);
    }

    #[test]
    fn test_invalid_thickness() {
        let style = BuildStyle::default().with_layer_thickness(0.0);
        let err = PlanarSlicer::new()
            .slice(&[], &style, &mut NullProgress, &CancelToken::new())
            .unwrap_err();
        assert!(matches!(err, SliceError::InvalidLayerThickness(_)));
    }

    #[test]
    fn test_progress_sequence() {
        let items = [
            block_item("a", (0.0, 0.0, 0.0), (1.0, 1.0, 5.0)),
            block_item("b", (0.0, 0.0, 0.0), (1.0, 1.0, 2.5)),
        ];
        let style = BuildStyle::default().with_layer_thickness(0.1);
        let mut reports = Vec::new();
        let mut observer = |p: &SliceProgress| reports.push(p.clone());

        PlanarSlicer::new()
            .with_options(SlicerOptions::default().with_progress_interval(20))
            .slice(&items, &style, &mut observer, &CancelToken::new())
            .unwrap();

        let first = reports.first().unwrap();
        assert_eq!(first.message, "Starting slice...");
        assert_relative_eq!(first.fraction, 0.0);
        assert_eq!(first.total, 75);

        assert_eq!(reports[1].message, "Slicing a... (1/2)");
        assert_eq!(reports[2].message, "Slicing a: layer 1/50");

        let last = reports.last().unwrap();
        assert_relative_eq!(last.fraction, 1.0);
        assert!(last.message.starts_with("Complete: 75 layers"));

        assert!(reports.windows(2).all(|w| w[0].fraction <= w[1].fraction));
        // Start, 2 item headers, layers 1/21/41 of a, 1/21 of b, final.
        assert_eq!(reports.len(), 9);
    }

    struct FailingObserver(usize);

    impl ProgressObserver for FailingObserver {
        fn report(&mut self, _progress: &SliceProgress) -> Result<(), ObserverError> {
            self.0 += 1;
            Err("display went away".into())
        }
    }

    #[test]
    fn test_observer_errors_do_not_abort() {
        let items = [block_item("a", (0.0, 0.0, 0.0), (1.0, 1.0, 1.0))];
        let mut observer = FailingObserver(0);
        let result = PlanarSlicer::new().slice(
            &items,
            &BuildStyle::default().with_layer_thickness(0.1),
            &mut observer,
            &CancelToken::new(),
        );
        assert_eq!(result.unwrap().summary.total_layers, 10);
        assert!(observer.0 > 0);
    }

    #[test]
    fn test_cancel_before_start() {
        let items = [block_item("a", (0.0, 0.0, 0.0), (1.0, 1.0, 1.0))];
        let cancel = CancelToken::new();
        cancel.cancel();
        let result = PlanarSlicer::new().slice(
            &items,
            &BuildStyle::default(),
            &mut NullProgress,
            &cancel,
        );
        assert!(matches!(result, Err(SliceError::Cancelled)));
    }

    #[test]
    fn test_cancel_mid_run() {
        let items = [block_item("a", (0.0, 0.0, 0.0), (1.0, 1.0, 1.0))];
        let cancel = CancelToken::new();
        let trigger = cancel.clone();
        let mut observer = |p: &SliceProgress| {
            if p.completed >= 3 {
                trigger.cancel();
            }
        };
        let result = PlanarSlicer::new()
            .with_options(SlicerOptions::default().with_progress_interval(1))
            .slice(
                &items,
                &BuildStyle::default().with_layer_thickness(0.1),
                &mut observer,
                &cancel,
            );
        assert!(matches!(result, Err(SliceError::Cancelled)));
    }

    /// Fails on every other call.
    struct FlakyAdapter {
        calls: AtomicUsize,
    }

    impl SectionAdapter for FlakyAdapter {
        fn section_at(
            &self,
            mesh: &IndexedMesh,
            z: f64,
            normal: &Vector3<f64>,
        ) -> SectionResult<Option<Vec<Polyline>>> {
            if self.calls.fetch_add(1, Ordering::Relaxed) % 2 == 1 {
                return Err(SectionError::EmptyMesh);
            }
            TriangleSectioner.section_at(mesh, z, normal)
        }
    }

    #[test]
    fn test_section_failures_become_empty_layers() {
        let items = [block_item("a", (0.0, 0.0, 0.0), (2.0, 2.0, 1.0))];
        let slicer = PlanarSlicer::with_adapter(FlakyAdapter {
            calls: AtomicUsize::new(0),
        });
        let result = slicer
            .slice(
                &items,
                &BuildStyle::default().with_layer_thickness(0.25),
                &mut NullProgress,
                &CancelToken::new(),
            )
            .unwrap();

        let part = &result.parts[0];
        assert_eq!(part.layer_count(), 4);
        assert_eq!(part.empty_layer_count(), 2);
        assert!(part.layers[1].is_empty());
        assert!(!part.layers[2].is_empty());
    }
}
