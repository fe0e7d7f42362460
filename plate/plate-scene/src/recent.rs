//! Most-recently-used file list.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

/// Default number of remembered paths.
pub const DEFAULT_RECENT_CAPACITY: usize = 10;

/// Most-recently-used paths, newest first, without duplicates.
#[derive(Debug, Clone)]
pub struct RecentFiles {
    paths: VecDeque<PathBuf>,
    capacity: usize,
}

impl Default for RecentFiles {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_RECENT_CAPACITY)
    }
}

impl RecentFiles {
    /// Create a list holding at most `capacity` paths.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            paths: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Move `path` to the front, dropping the oldest entry past capacity.
    pub fn touch(&mut self, path: &Path) {
        self.paths.retain(|p| p != path);
        self.paths.push_front(path.to_path_buf());
        self.paths.truncate(self.capacity);
    }

    /// Paths, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.paths.iter().map(PathBuf::as_path)
    }

    /// Number of remembered paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// True if nothing is remembered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_front_insert_and_dedup() {
        let mut recent = RecentFiles::default();
        recent.touch(Path::new("a.stl"));
        recent.touch(Path::new("b.stl"));
        recent.touch(Path::new("a.stl"));

        let paths: Vec<_> = recent.iter().collect();
        assert_eq!(paths, vec![Path::new("a.stl"), Path::new("b.stl")]);
    }

    #[test]
    fn test_capacity() {
        let mut recent = RecentFiles::default();
        for i in 0..15 {
            recent.touch(Path::new(&format!("part_{i}.stl")));
        }
        assert_eq!(recent.len(), DEFAULT_RECENT_CAPACITY);
        assert_eq!(recent.iter().next(), Some(Path::new("part_14.stl")));
        assert_eq!(recent.iter().last(), Some(Path::new("part_5.stl")));
    }
}
