//! In-memory hierarchical files.
//!
//! Lets the decoder run against synthetic granules without libhdf5, and
//! counts open handles so callers can check that every decode call releases
//! its file.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::error::{GranuleError, GranuleResult};
use crate::hdf::{join_path, AttributeMap, AttributeValue, Dataset, GranuleOpener, HierarchicalFile};

#[derive(Debug, Clone)]
struct Entry {
    dataset: Dataset,
    attributes: AttributeMap,
}

/// Contents of a synthetic granule, keyed by full dataset path.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGranule {
    datasets: BTreeMap<String, Entry>,
    groups: BTreeSet<String>,
}

impl InMemoryGranule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a dataset. Parent groups are created implicitly.
    pub fn with_dataset(mut self, path: &str, shape: Vec<usize>, values: Vec<f64>) -> Self {
        let path = join_path(&[path]);
        self.register_parents(&path);
        self.datasets.insert(
            path,
            Entry {
                dataset: Dataset { shape, values },
                attributes: AttributeMap::new(),
            },
        );
        self
    }

    /// Attach an attribute to a dataset added earlier.
    pub fn with_attribute(mut self, path: &str, name: &str, value: AttributeValue) -> Self {
        if let Some(entry) = self.datasets.get_mut(&join_path(&[path])) {
            entry.attributes.insert(name.to_string(), value);
        }
        self
    }

    /// Add an empty group.
    pub fn with_group(mut self, path: &str) -> Self {
        let path = join_path(&[path]);
        self.register_parents(&path);
        self.groups.insert(path);
        self
    }

    fn register_parents(&mut self, path: &str) {
        let mut prefix = String::new();
        let segments: Vec<&str> = path.split('/').collect();
        for segment in &segments[..segments.len().saturating_sub(1)] {
            if !prefix.is_empty() {
                prefix.push('/');
            }
            prefix.push_str(segment);
            self.groups.insert(prefix.clone());
        }
    }

    fn require_group(&self, path: &str) -> GranuleResult<String> {
        let path = join_path(&[path]);
        if path.is_empty() || self.groups.contains(&path) {
            Ok(path)
        } else {
            Err(GranuleError::GroupNotFound(path))
        }
    }

    fn entry(&self, path: &str) -> GranuleResult<&Entry> {
        let path = join_path(&[path]);
        self.datasets
            .get(&path)
            .ok_or(GranuleError::DatasetNotFound(path))
    }
}

/// Direct children of `parent` among `paths`.
fn children<'a>(parent: &str, paths: impl Iterator<Item = &'a String>) -> Vec<String> {
    paths
        .filter_map(|p| {
            let rest = if parent.is_empty() {
                p.as_str()
            } else {
                p.strip_prefix(parent)?.strip_prefix('/')?
            };
            (!rest.is_empty() && !rest.contains('/')).then(|| rest.to_string())
        })
        .collect()
}

/// Opens every path as the same in-memory granule.
#[derive(Debug, Clone)]
pub struct InMemoryOpener {
    granule: Arc<InMemoryGranule>,
    open_handles: Arc<AtomicUsize>,
}

impl InMemoryOpener {
    pub fn new(granule: InMemoryGranule) -> Self {
        Self {
            granule: Arc::new(granule),
            open_handles: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of handles opened and not yet dropped.
    pub fn open_handles(&self) -> usize {
        self.open_handles.load(Ordering::SeqCst)
    }
}

impl GranuleOpener for InMemoryOpener {
    type File = InMemoryFile;

    fn open(&self, _path: &Path) -> GranuleResult<InMemoryFile> {
        self.open_handles.fetch_add(1, Ordering::SeqCst);
        Ok(InMemoryFile {
            granule: Arc::clone(&self.granule),
            open_handles: Arc::clone(&self.open_handles),
        })
    }
}

/// Open handle on an [`InMemoryGranule`].
#[derive(Debug)]
pub struct InMemoryFile {
    granule: Arc<InMemoryGranule>,
    open_handles: Arc<AtomicUsize>,
}

impl Drop for InMemoryFile {
    fn drop(&mut self) {
        self.open_handles.fetch_sub(1, Ordering::SeqCst);
    }
}

impl HierarchicalFile for InMemoryFile {
    fn list_groups(&self, path: &str) -> GranuleResult<Vec<String>> {
        let path = self.granule.require_group(path)?;
        Ok(children(&path, self.granule.groups.iter()))
    }

    fn list_datasets(&self, path: &str) -> GranuleResult<Vec<String>> {
        let path = self.granule.require_group(path)?;
        Ok(children(&path, self.granule.datasets.keys()))
    }

    fn read_dataset(&self, path: &str) -> GranuleResult<Dataset> {
        Ok(self.granule.entry(path)?.dataset.clone())
    }

    fn read_attributes(&self, path: &str) -> GranuleResult<AttributeMap> {
        Ok(self.granule.entry(path)?.attributes.clone())
    }
}
