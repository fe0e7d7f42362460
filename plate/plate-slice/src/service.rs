//! The slicing front end: backend selection, last result and exports.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use plate_mesh::MeshItem;
use tracing::info;

use crate::error::{SliceError, SliceResult};
use crate::export::{preview_svg, write_plan};
use crate::layer::Part;
use crate::params::BuildStyle;
use crate::progress::{CancelToken, ProgressObserver};
use crate::result::{SliceRun, SliceSummary};
use crate::slicer::{PlanarSlicer, SliceBackend};
use crate::worker::SliceJob;

/// Runs slices through a swappable backend and keeps the latest result.
///
/// Each successful run replaces the previous one wholesale. A failed or
/// cancelled run leaves the previous result in place.
///
/// # Example
///
/// ```
/// use plate_mesh::{IndexedMesh, MeshItem, Point3};
/// use plate_slice::{BuildStyle, NullProgress, SlicerService};
///
/// let mut service = SlicerService::default();
/// let block = IndexedMesh::cuboid(Point3::origin(), Point3::new(10.0, 10.0, 5.0));
/// let items = [MeshItem::new("1", "block", block)];
///
/// let summary = service
///     .slice(&items, &BuildStyle::default().with_layer_thickness(0.5), &mut NullProgress)
///     .unwrap();
/// assert_eq!(summary.total_layers, 10);
///
/// let mut plan = Vec::new();
/// assert_eq!(service.write_plan(&mut plan).unwrap(), 10);
/// ```
pub struct SlicerService {
    backend: Arc<dyn SliceBackend>,
    last: Option<SliceRun>,
}

impl Default for SlicerService {
    fn default() -> Self {
        Self::new(Arc::new(PlanarSlicer::new()))
    }
}

impl std::fmt::Debug for SlicerService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlicerService")
            .field("backend", &self.backend.name())
            .field("last", &self.last.as_ref().map(|run| &run.summary))
            .finish()
    }
}

impl SlicerService {
    /// Create a service around a backend.
    #[must_use]
    pub fn new(backend: Arc<dyn SliceBackend>) -> Self {
        Self {
            backend,
            last: None,
        }
    }

    /// Name of the active backend.
    #[must_use]
    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Slice `items` on the calling thread and keep the result.
    ///
    /// # Errors
    ///
    /// Returns the backend's error. The previous result is kept on failure.
    pub fn slice(
        &mut self,
        items: &[MeshItem],
        style: &BuildStyle,
        observer: &mut dyn ProgressObserver,
    ) -> SliceResult<&SliceSummary> {
        let run = self
            .backend
            .slice(items, style, observer, &CancelToken::new())?;
        Ok(&self.install(run).summary)
    }

    /// Start slicing `items` on a background thread with the active backend.
    ///
    /// The result is not kept automatically; pass the joined run to
    /// [`install`](Self::install).
    ///
    /// # Errors
    ///
    /// Returns [`SliceError::WorkerSpawn`] if the thread cannot be created.
    pub fn spawn(&self, items: Vec<MeshItem>, style: BuildStyle) -> SliceResult<SliceJob> {
        SliceJob::spawn(Arc::clone(&self.backend), items, style)
    }

    /// Make `run` the latest result.
    pub fn install(&mut self, run: SliceRun) -> &SliceRun {
        self.last.insert(run)
    }

    /// The latest result, if any.
    #[must_use]
    pub const fn last_run(&self) -> Option<&SliceRun> {
        self.last.as_ref()
    }

    /// Summary of the latest result.
    #[must_use]
    pub fn last_summary(&self) -> Option<&SliceSummary> {
        self.last.as_ref().map(|run| &run.summary)
    }

    /// Parts of the latest result, empty before the first slice.
    #[must_use]
    pub fn last_parts(&self) -> &[Part] {
        self.last
            .as_ref()
            .map(|run| run.parts.as_slice())
            .unwrap_or_default()
    }

    /// Write the latest result as a layer file.
    ///
    /// Returns the number of layers written.
    ///
    /// # Errors
    ///
    /// Returns [`SliceError::NoSliceData`] before the first slice, or if it
    /// produced no parts, and [`SliceError::Io`] if writing fails.
    pub fn write_plan<W: Write>(&self, writer: &mut W) -> SliceResult<usize> {
        let run = self.require_run()?;
        Ok(write_plan(
            writer,
            &run.parts,
            run.summary.style.layer_thickness_mm,
        )?)
    }

    /// Write the latest result as a layer file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`SliceError::NoSliceData`] before the first slice and
    /// [`SliceError::IoWrite`] if the file cannot be written.
    pub fn export_plan(&self, path: impl AsRef<Path>) -> SliceResult<usize> {
        let path = path.as_ref();
        let run = self.require_run()?;

        let io_err = |source: std::io::Error| SliceError::IoWrite {
            path: path.to_path_buf(),
            source,
        };

        let file = File::create(path).map_err(io_err)?;
        let mut writer = BufWriter::new(file);
        let layers = write_plan(&mut writer, &run.parts, run.summary.style.layer_thickness_mm)
            .map_err(io_err)?;

        info!(path = %path.display(), layers, "Exported layer file");
        Ok(layers)
    }

    /// SVG preview of one layer index across all parts.
    ///
    /// Returns `Ok(None)` if no part has contours at that index.
    ///
    /// # Errors
    ///
    /// Returns [`SliceError::NoSliceData`] before the first slice.
    pub fn layer_preview_svg(&self, layer_index: usize) -> SliceResult<Option<String>> {
        let run = self.require_run()?;
        Ok(preview_svg(&run.parts, layer_index))
    }

    /// Write an SVG preview of one layer index to `path`.
    ///
    /// Returns `false`, without creating the file, if no part has contours
    /// at that index.
    ///
    /// # Errors
    ///
    /// Returns [`SliceError::NoSliceData`] before the first slice and
    /// [`SliceError::IoWrite`] if the file cannot be written.
    pub fn export_layer_preview(
        &self,
        path: impl AsRef<Path>,
        layer_index: usize,
    ) -> SliceResult<bool> {
        let path = path.as_ref();
        let Some(svg) = self.layer_preview_svg(layer_index)? else {
            return Ok(false);
        };

        std::fs::write(path, svg).map_err(|source| SliceError::IoWrite {
            path: path.to_path_buf(),
            source,
        })?;

        info!(path = %path.display(), layer = layer_index, "Exported layer preview");
        Ok(true)
    }

    // ========================================================================
    // Internal helper functions
    // ========================================================================

    fn require_run(&self) -> SliceResult<&SliceRun> {
        match &self.last {
            Some(run) if !run.is_empty() => Ok(run),
            _ => Err(SliceError::NoSliceData),
        }
    }
}
