//! Decomposition of the SWC sample tree into unbranched paths.

use crate::record::SwcRecord;
use crate::{Error, Result};
use std::collections::HashMap;
use swcvox_core::{TracingPath, TracingPoint, TransformParameters};

/// Parent/child links between samples, indexed by record position.
#[derive(Debug, Clone)]
pub struct SampleTree {
    children: Vec<Vec<usize>>,
    roots: Vec<usize>,
}

impl SampleTree {
    /// Links records through their parent ids.
    ///
    /// # Errors
    /// Returns an error on duplicate ids or references to unknown parents.
    pub fn build(records: &[SwcRecord]) -> Result<Self> {
        let mut index = HashMap::with_capacity(records.len());
        for (i, record) in records.iter().enumerate() {
            if index.insert(record.id, i).is_some() {
                return Err(Error::DuplicateId {
                    id: record.id,
                    line: record.line,
                });
            }
        }

        let mut children = vec![Vec::new(); records.len()];
        let mut roots = Vec::new();
        for (i, record) in records.iter().enumerate() {
            match record.parent {
                None => roots.push(i),
                Some(parent) => {
                    let &p = index.get(&parent).ok_or(Error::MissingParent {
                        id: record.id,
                        parent,
                    })?;
                    children[p].push(i);
                }
            }
        }

        Ok(Self { children, roots })
    }

    /// Indices of root samples, in file order.
    #[must_use]
    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    /// Indices of the direct children of a sample.
    #[must_use]
    pub fn children(&self, node: usize) -> &[usize] {
        &self.children[node]
    }

    /// Number of samples with more than one child.
    #[must_use]
    pub fn fork_count(&self) -> usize {
        self.children.iter().filter(|c| c.len() > 1).count()
    }

    /// Number of samples without children.
    #[must_use]
    pub fn tip_count(&self) -> usize {
        self.children.iter().filter(|c| c.is_empty()).count()
    }
}

/// Pending path start during traversal.
struct Branch {
    start: usize,
    fork: Option<usize>,
    parent_path: Option<usize>,
}

/// Splits the sample tree into paths, transforming every coordinate.
///
/// A path starts at each root and at each child of a sample that does not
/// have exactly one child; it follows single-child links until the next
/// fork or tip. Branch paths begin with their fork sample.
///
/// # Errors
/// Returns [`Error::NoPaths`] for an empty record list, and the
/// [`SampleTree::build`] errors or [`Error::Cycle`] for broken topology.
pub fn build_paths(records: &[SwcRecord], params: &TransformParameters) -> Result<Vec<TracingPath>> {
    if records.is_empty() {
        return Err(Error::NoPaths);
    }

    let tree = SampleTree::build(records)?;
    let point = |i: usize| {
        let r = &records[i];
        let [x, y, z] = params.apply(r.x, r.y, r.z);
        TracingPoint::new(x, y, z, r.swc_type)
    };

    let mut visited = vec![false; records.len()];
    let mut paths: Vec<TracingPath> = Vec::new();
    let mut pending: Vec<Branch> = tree
        .roots()
        .iter()
        .rev()
        .map(|&start| Branch {
            start,
            fork: None,
            parent_path: None,
        })
        .collect();

    while let Some(branch) = pending.pop() {
        let id = paths.len();
        let mut path = TracingPath::new(id, branch.parent_path, records[branch.start].swc_type);
        if let Some(fork) = branch.fork {
            path.push(point(fork));
        }

        let mut current = branch.start;
        loop {
            visited[current] = true;
            path.push(point(current));
            match tree.children(current) {
                [only] => current = *only,
                _ => break,
            }
        }

        for &child in tree.children(current).iter().rev() {
            pending.push(Branch {
                start: child,
                fork: Some(current),
                parent_path: Some(id),
            });
        }
        paths.push(path);
    }

    if let Some(orphan) = visited.iter().position(|&v| !v) {
        return Err(Error::Cycle {
            id: records[orphan].id,
        });
    }

    log::debug!(
        "built {} paths from {} samples ({} roots, {} forks)",
        paths.len(),
        records.len(),
        tree.roots().len(),
        tree.fork_count()
    );

    Ok(paths)
}
