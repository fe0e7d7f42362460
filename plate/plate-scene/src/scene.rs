//! The scene manager: objects, selection, plate and history.

// Grid indices are small; precision loss is not a concern.
#![allow(clippy::cast_precision_loss)]

use std::fs;
use std::path::{Path, PathBuf};

use nalgebra::Vector3;
use plate_mesh::{IndexedMesh, MeshItem};
use tracing::{debug, info, warn};

use crate::error::{SceneError, SceneResult};
use crate::history::UndoRedoManager;
use crate::object::{ObjectId, SceneObject};
use crate::plate::{BuildPlate, VolumeIssue};
use crate::recent::RecentFiles;
use crate::snapshot::{ObjectRecord, ProjectSnapshot, SNAPSHOT_VERSION, TransformRecord};
use crate::transform::{Axis, Transform, TransformUpdate};

/// Undo label used by [`SceneManager::auto_arrange`].
pub const AUTO_ARRANGE_LABEL: &str = "Auto-arrange";

/// Fraction of the plate radius used as auto-arrange cell spacing.
const ARRANGE_SPACING_FACTOR: f64 = 0.6;

/// Default duplicate offset as a multiple of the source X extent.
const DUPLICATE_OFFSET_FACTOR: f64 = 1.2;

/// Owns every object on the build plate.
///
/// All mutation happens through `&mut self`, so a single owner drives the
/// scene. Slicing works on the deep copies returned by
/// [`collect_for_slicing`](Self::collect_for_slicing) and never sees a
/// half-applied edit.
///
/// # Example
///
/// ```
/// use plate_mesh::{IndexedMesh, Point3};
/// use plate_scene::{Axis, SceneManager};
///
/// let mut scene = SceneManager::new();
/// let block = IndexedMesh::cuboid(Point3::new(20.0, 20.0, 3.0), Point3::new(30.0, 30.0, 8.0));
/// let id = scene.add("block", block, None);
///
/// // Centered on the plate and resting on Z = 0.
/// let bounds = scene.get(id).unwrap().world_bounds();
/// assert!((bounds.min.z).abs() < 1e-9);
/// assert!((bounds.center().x).abs() < 1e-9);
///
/// assert!(scene.mirror_selected(Axis::X));
/// assert_eq!(scene.perform_undo().as_deref(), Some("Mirror X"));
/// ```
#[derive(Debug, Clone)]
pub struct SceneManager {
    objects: Vec<SceneObject>,
    selection: Option<ObjectId>,
    build_plate: BuildPlate,
    history: UndoRedoManager,
    recent: RecentFiles,
    next_id: u64,
}

impl Default for SceneManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of [`SceneManager::restore`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RestoreReport {
    /// Ids of the objects recreated, in document order.
    pub restored: Vec<ObjectId>,
    /// Records that could not be recreated.
    pub skipped: Vec<SkippedObject>,
}

/// A snapshot record that [`SceneManager::restore`] could not recreate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedObject {
    /// Name stored in the record.
    pub name: String,
    /// Human-readable reason.
    pub reason: String,
}

impl SceneManager {
    /// Create an empty scene on the default plate.
    #[must_use]
    pub fn new() -> Self {
        Self::with_build_plate(BuildPlate::default())
    }

    /// Create an empty scene on the given plate.
    #[must_use]
    pub fn with_build_plate(build_plate: BuildPlate) -> Self {
        Self {
            objects: Vec::new(),
            selection: None,
            build_plate,
            history: UndoRedoManager::default(),
            recent: RecentFiles::default(),
            next_id: 1,
        }
    }

    /// Replace the undo history with one of a different depth.
    #[must_use]
    pub fn with_history(mut self, history: UndoRedoManager) -> Self {
        self.history = history;
        self
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    /// All objects in insertion order.
    #[must_use]
    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    /// Look up an object.
    #[must_use]
    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.id() == id)
    }

    /// The selected object, if any.
    #[must_use]
    pub fn selected(&self) -> Option<&SceneObject> {
        self.selection.and_then(|id| self.get(id))
    }

    /// Id of the selected object, if any.
    #[must_use]
    pub const fn selected_id(&self) -> Option<ObjectId> {
        self.selection
    }

    /// Number of objects.
    #[must_use]
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Recently added source files.
    #[must_use]
    pub const fn recent_files(&self) -> &RecentFiles {
        &self.recent
    }

    /// The build plate.
    #[must_use]
    pub const fn build_plate(&self) -> &BuildPlate {
        &self.build_plate
    }

    /// Replace the build plate dimensions.
    pub fn set_build_plate(&mut self, build_plate: BuildPlate) {
        self.build_plate = build_plate;
    }

    /// The undo/redo history.
    #[must_use]
    pub const fn history(&self) -> &UndoRedoManager {
        &self.history
    }

    // ------------------------------------------------------------------------
    // Object lifecycle
    // ------------------------------------------------------------------------

    /// Place a new mesh on the plate and select it.
    ///
    /// The mesh is moved so its XY centroid sits on the origin and its lowest
    /// point on `Z = 0`. A given source path is recorded in the recent list.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        mut mesh: IndexedMesh,
        source_path: Option<PathBuf>,
    ) -> ObjectId {
        rest_on_plate(&mut mesh);

        if let Some(path) = &source_path {
            self.recent.touch(path);
        }

        let id = self.allocate_id();
        let object = SceneObject::new(id, name.into(), mesh, source_path);
        debug!(id = %id, name = object.name(), "Added object");
        self.objects.push(object);
        self.select(Some(id));
        id
    }

    /// Remove an object. Returns `false` if the id is unknown.
    pub fn remove(&mut self, id: ObjectId) -> bool {
        let Some(index) = self.objects.iter().position(|o| o.id() == id) else {
            return false;
        };
        let object = self.objects.remove(index);
        if self.selection == Some(id) {
            self.selection = None;
        }
        self.history.forget(id);
        debug!(id = %id, name = object.name(), "Removed object");
        true
    }

    /// Remove the selected object. Returns `false` if nothing is selected.
    pub fn remove_selected(&mut self) -> bool {
        self.selection.is_some_and(|id| self.remove(id))
    }

    /// Copy an object and select the copy.
    ///
    /// Without an explicit offset, the copy is moved along +X by 1.2 times
    /// the source's world X extent so the two never overlap. Returns `None`
    /// if the id is unknown.
    pub fn duplicate(&mut self, id: ObjectId, offset: Option<Vector3<f64>>) -> Option<ObjectId> {
        let source = self.get(id)?;
        let offset = offset.unwrap_or_else(|| {
            Vector3::new(
                source.world_bounds().size().x * DUPLICATE_OFFSET_FACTOR,
                0.0,
                0.0,
            )
        });

        let name = format!("{}_copy", source.name());
        let mesh = source.mesh().clone();
        let source_path = source.source_path().map(Path::to_path_buf);
        let mut transform = *source.transform();
        transform.translate_by(&offset);

        let new_id = self.allocate_id();
        let mut copy = SceneObject::new(new_id, name, mesh, source_path);
        copy.transform = transform;
        debug!(source = %id, id = %new_id, "Duplicated object");
        self.objects.push(copy);
        self.select(Some(new_id));
        Some(new_id)
    }

    /// Duplicate the selected object.
    pub fn duplicate_selected(&mut self, offset: Option<Vector3<f64>>) -> Option<ObjectId> {
        let id = self.selection?;
        self.duplicate(id, offset)
    }

    // ------------------------------------------------------------------------
    // Selection and visibility
    // ------------------------------------------------------------------------

    /// Change the selection.
    ///
    /// `None` clears it. An unknown id leaves the current selection in place
    /// and returns `false`.
    pub fn select(&mut self, id: Option<ObjectId>) -> bool {
        if let Some(target) = id
            && self.get(target).is_none()
        {
            return false;
        }

        for object in &mut self.objects {
            object.selected = Some(object.id()) == id;
        }
        self.selection = id;
        true
    }

    /// Clear the selection.
    pub fn deselect_all(&mut self) {
        self.select(None);
    }

    /// Flip an object's visibility. Returns `false` if the id is unknown.
    pub fn toggle_visibility(&mut self, id: ObjectId) -> bool {
        match self.find_mut(id) {
            Some(object) => {
                object.visible = !object.visible;
                true
            }
            None => false,
        }
    }

    // ------------------------------------------------------------------------
    // Transforms
    // ------------------------------------------------------------------------

    /// Apply a partial transform update.
    ///
    /// With `undo_label`, the change is recorded in the history under that
    /// label. Returns `Ok(false)` if the id is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::DegenerateScale`] if the update sets a zero
    /// scale component; the object is left unchanged.
    pub fn set_transform(
        &mut self,
        id: ObjectId,
        update: &TransformUpdate,
        undo_label: Option<&str>,
    ) -> SceneResult<bool> {
        let Some(object) = self.find_mut(id) else {
            return Ok(false);
        };

        let before = object.transform;
        object.transform.set(update)?;
        let after = object.transform;

        if let Some(label) = undo_label {
            self.history.push(id, label, before, after);
        }
        Ok(true)
    }

    /// Mirror the selected object along `axis`, recording `"Mirror {AXIS}"`.
    ///
    /// Returns `false` if nothing is selected.
    pub fn mirror_selected(&mut self, axis: Axis) -> bool {
        let Some(id) = self.selection else {
            return false;
        };
        let Some(object) = self.find_mut(id) else {
            return false;
        };

        let before = object.transform;
        object.transform.mirror(axis);
        let after = object.transform;

        self.history.push(id, format!("Mirror {axis}"), before, after);
        true
    }

    /// Revert the most recent recorded edit, returning its label.
    pub fn perform_undo(&mut self) -> Option<String> {
        let entry = self.history.undo()?;
        if let Some(object) = self.find_mut(entry.object_id) {
            object.transform = entry.before;
        }
        debug!(label = %entry.label, "Undo");
        Some(entry.label)
    }

    /// Reapply the most recently undone edit, returning its label.
    pub fn perform_redo(&mut self) -> Option<String> {
        let entry = self.history.redo()?;
        if let Some(object) = self.find_mut(entry.object_id) {
            object.transform = entry.after;
        }
        debug!(label = %entry.label, "Redo");
        Some(entry.label)
    }

    // ------------------------------------------------------------------------
    // Plate checks and layout
    // ------------------------------------------------------------------------

    /// Check every visible object against the build volume.
    ///
    /// An object with several problems appears once per problem.
    #[must_use]
    pub fn check_build_volume(&self) -> Vec<VolumeIssue> {
        let mut issues = Vec::new();
        for object in self.objects.iter().filter(|o| o.is_visible()) {
            for violation in self.build_plate.violations(&object.world_bounds()) {
                let issue = VolumeIssue {
                    id: object.id(),
                    name: object.name().to_string(),
                    violation,
                };
                warn!(id = %issue.id, "{issue}");
                issues.push(issue);
            }
        }
        issues
    }

    /// Lay out visible objects on a square grid centered on the origin.
    ///
    /// Uses `ceil(sqrt(n))` columns with cells `0.6 × radius` apart. Only X
    /// and Y translation change; each move is recorded as its own
    /// `"Auto-arrange"` history entry. Returns the number of objects placed.
    pub fn auto_arrange(&mut self) -> usize {
        let visible: Vec<ObjectId> = self
            .objects
            .iter()
            .filter(|o| o.is_visible())
            .map(SceneObject::id)
            .collect();
        let n = visible.len();
        if n == 0 {
            return 0;
        }

        let cols = grid_columns(n);
        let rows = n.div_ceil(cols);
        let spacing = self.build_plate.radius() * ARRANGE_SPACING_FACTOR;
        let col_mid = (cols - 1) as f64 / 2.0;
        let row_mid = (rows - 1) as f64 / 2.0;

        for (i, id) in visible.into_iter().enumerate() {
            let Some(object) = self.find_mut(id) else {
                continue;
            };
            let x = ((i % cols) as f64 - col_mid) * spacing;
            let y = ((i / cols) as f64 - row_mid) * spacing;

            let before = object.transform;
            object.transform.place_xy(x, y);
            let after = object.transform;
            self.history.push(id, AUTO_ARRANGE_LABEL, before, after);
        }

        debug!(objects = n, cols, rows, spacing, "Auto-arranged");
        n
    }

    // ------------------------------------------------------------------------
    // Slicing handoff
    // ------------------------------------------------------------------------

    /// World-space copies of every visible object, in scene order.
    ///
    /// The returned meshes share nothing with the scene; later edits do not
    /// affect them.
    #[must_use]
    pub fn collect_for_slicing(&self) -> Vec<MeshItem> {
        self.objects
            .iter()
            .filter(|o| o.is_visible())
            .map(|o| MeshItem::new(o.id().to_string(), o.name(), o.world_mesh()))
            .collect()
    }

    // ------------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------------

    /// Structural snapshot of the plate and object placements.
    ///
    /// Undo history and geometry are not included.
    #[must_use]
    pub fn serialize(&self) -> ProjectSnapshot {
        ProjectSnapshot {
            version: SNAPSHOT_VERSION.to_string(),
            build_plate: self.build_plate,
            objects: self
                .objects
                .iter()
                .map(|o| ObjectRecord {
                    id: o.id().to_string(),
                    name: o.name().to_string(),
                    source_path: o
                        .source_path()
                        .map(|p| p.to_string_lossy().into_owned())
                        .unwrap_or_default(),
                    transform: TransformRecord::from(o.transform()),
                    visible: o.is_visible(),
                })
                .collect(),
        }
    }

    /// The snapshot as indented JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::Json`] if serialization fails.
    pub fn serialize_json(&self) -> SceneResult<String> {
        self.serialize().to_json_pretty()
    }

    /// Write the snapshot to a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::IoWrite`] if the file cannot be written.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> SceneResult<()> {
        let path = path.as_ref();
        let json = self.serialize_json()?;
        fs::write(path, json).map_err(|source| SceneError::IoWrite {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), objects = self.objects.len(), "Saved project");
        Ok(())
    }

    /// Replace the scene with the contents of a snapshot.
    ///
    /// Each record's mesh is obtained from `resolver` by source path, placed
    /// on the plate as [`add`](Self::add) would, then given the stored
    /// transform. Records without a path, with an unresolvable path or with
    /// a degenerate transform are skipped and reported. Objects get fresh
    /// ids; selection and history are cleared.
    pub fn restore<F>(&mut self, snapshot: &ProjectSnapshot, mut resolver: F) -> RestoreReport
    where
        F: FnMut(&Path) -> Option<IndexedMesh>,
    {
        self.objects.clear();
        self.selection = None;
        self.history.clear();
        self.build_plate = snapshot.build_plate;

        let mut report = RestoreReport::default();
        for record in &snapshot.objects {
            match self.restore_record(record, &mut resolver) {
                Ok(id) => report.restored.push(id),
                Err(reason) => {
                    warn!(name = %record.name, %reason, "Skipped object during restore");
                    report.skipped.push(SkippedObject {
                        name: record.name.clone(),
                        reason,
                    });
                }
            }
        }

        info!(
            restored = report.restored.len(),
            skipped = report.skipped.len(),
            "Restored project"
        );
        report
    }

    /// Load a snapshot file and [`restore`](Self::restore) it.
    ///
    /// # Errors
    ///
    /// Returns any error from [`ProjectSnapshot::load_json`]; the scene is
    /// untouched in that case.
    pub fn load_json<P, F>(&mut self, path: P, resolver: F) -> SceneResult<RestoreReport>
    where
        P: AsRef<Path>,
        F: FnMut(&Path) -> Option<IndexedMesh>,
    {
        let snapshot = ProjectSnapshot::load_json(path)?;
        Ok(self.restore(&snapshot, resolver))
    }

    // ------------------------------------------------------------------------
    // Internal helpers
    // ------------------------------------------------------------------------

    fn restore_record<F>(
        &mut self,
        record: &ObjectRecord,
        resolver: &mut F,
    ) -> Result<ObjectId, String>
    where
        F: FnMut(&Path) -> Option<IndexedMesh>,
    {
        if record.source_path.is_empty() {
            return Err("no source path".to_string());
        }
        let path = PathBuf::from(&record.source_path);
        let transform = Transform::try_from(&record.transform).map_err(|e| e.to_string())?;
        let mut mesh =
            resolver(&path).ok_or_else(|| format!("could not load '{}'", path.display()))?;
        rest_on_plate(&mut mesh);

        let id = self.allocate_id();
        let mut object = SceneObject::new(id, record.name.clone(), mesh, Some(path));
        object.transform = transform;
        object.visible = record.visible;
        self.objects.push(object);
        Ok(id)
    }

    fn find_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.iter_mut().find(|o| o.id() == id)
    }

    fn allocate_id(&mut self) -> ObjectId {
        let id = ObjectId::new(self.next_id);
        self.next_id += 1;
        id
    }
}

/// Center the footprint on the origin and drop the mesh onto `Z = 0`.
fn rest_on_plate(mesh: &mut IndexedMesh) {
    let bounds = mesh.bounds();
    if bounds.is_empty() {
        return;
    }
    let centroid = mesh.centroid();
    mesh.translate(&Vector3::new(-centroid.x, -centroid.y, -bounds.min.z));
}

/// Smallest `c` with `c * c >= n`.
fn grid_columns(n: usize) -> usize {
    let mut cols = 1;
    while cols * cols < n {
        cols += 1;
    }
    cols
}
