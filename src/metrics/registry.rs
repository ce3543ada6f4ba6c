use std::collections::BTreeMap;

use parking_lot::RwLock;
use serde::Serialize;

use super::keys::validate_name;
use crate::error::Result;

/// Naming and description bookkeeping for a metric.
///
/// Parent/child links are names, not pointers; the window engine never
/// looks at any of this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricDescriptor {
    pub name: String,
    pub description: String,
    pub parent: Option<String>,
    /// In registration order.
    pub children: Vec<String>,
}

/// Flat name → descriptor map.
#[derive(Debug, Default)]
pub struct MetricRegistry {
    metrics: RwLock<BTreeMap<String, MetricDescriptor>>,
}

impl MetricRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name`, or update its description and parent if it exists.
    ///
    /// Children already attached to `name` are kept. An unknown `parent`
    /// leaves the metric without one.
    pub fn register(&self, name: &str, description: &str, parent: Option<&str>) -> Result<()> {
        validate_name(name)?;

        let mut metrics = self.metrics.write();

        let parent = parent.filter(|p| *p != name).and_then(|p| {
            if metrics.contains_key(p) {
                Some(p.to_owned())
            } else {
                tracing::warn!(metric = name, parent = p, "parent metric not registered; ignoring");
                None
            }
        });

        let previous_parent = metrics.get(name).and_then(|m| m.parent.clone());
        if previous_parent != parent {
            if let Some(old) = previous_parent {
                if let Some(m) = metrics.get_mut(&old) {
                    m.children.retain(|c| c != name);
                }
            }
            if let Some(new) = &parent {
                if let Some(m) = metrics.get_mut(new) {
                    m.children.push(name.to_owned());
                }
            }
        }

        let entry = metrics
            .entry(name.to_owned())
            .or_insert_with(|| MetricDescriptor {
                name: name.to_owned(),
                description: String::new(),
                parent: None,
                children: Vec::new(),
            });
        entry.description = description.to_owned();
        entry.parent = parent;
        Ok(())
    }

    /// Register only if `name` is not already known.
    pub fn ensure_registered(&self, name: &str, description: &str, parent: Option<&str>) -> Result<()> {
        if self.metrics.read().contains_key(name) {
            return Ok(());
        }
        self.register(name, description, parent)
    }

    /// All registered names (sorted), or the child names of `parent`.
    /// An unknown parent yields an empty list.
    pub fn names(&self, parent: Option<&str>) -> Vec<String> {
        let metrics = self.metrics.read();
        match parent {
            None => metrics.keys().cloned().collect(),
            Some(p) => metrics.get(p).map(|m| m.children.clone()).unwrap_or_default(),
        }
    }

    pub fn get(&self, name: &str) -> Option<MetricDescriptor> {
        self.metrics.read().get(name).cloned()
    }

    /// Descriptors of `name`'s children, or `None` if `name` is unknown.
    pub fn children(&self, name: &str) -> Option<Vec<MetricDescriptor>> {
        let metrics = self.metrics.read();
        let parent = metrics.get(name)?;
        Some(
            parent
                .children
                .iter()
                .filter_map(|c| metrics.get(c).cloned())
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.metrics.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.read().is_empty()
    }
}
