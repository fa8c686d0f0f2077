// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Component name resolution.
//!
//! Components form a tree through the [`Component`] trait. A [`Resolver`]
//! finds a component by a dotted path, either from the root or relative to
//! a requesting component. Nothing is cached: every call walks the live
//! hierarchy.
//!
//! # Relative paths
//!
//! ```text
//! relative := '.'* (name ('.' name)*)?
//! ```
//!
//! Each leading `.` moves one level up from the sender; the remaining
//! names descend. `""` is the sender itself, `".Sibling"` a sibling,
//! `"..Uncle"` a sibling of the parent and `"Child.Leaf"` a descendant.
//!
//! # Example
//!
//! ```rust
//! use smp_reflect::{Component, Composite, Resolver};
//! use std::sync::Arc;
//!
//! let sim = Composite::root("Simulator");
//! let bus = sim.add_child("Bus").unwrap();
//! let rtu = bus.add_child("Rtu").unwrap();
//! bus.add_child("Obc").unwrap();
//!
//! let resolver = Resolver::new(sim.clone());
//! let found = resolver.resolve_absolute("Bus.Rtu").expect("absolute");
//! assert_eq!(found.name(), "Rtu");
//!
//! let sender: Arc<dyn Component> = rtu;
//! let obc = resolver.resolve_relative(".Obc", &sender).expect("sibling");
//! assert_eq!(obc.name(), "Obc");
//! ```

use crate::config::PATH_SEPARATOR;
use crate::error::{Error, Result};
use crate::path::is_identifier;
use parking_lot::RwLock;
use std::sync::{Arc, Weak};

/// A node of the component hierarchy.
pub trait Component: Send + Sync {
    fn name(&self) -> &str;

    /// Parent component (`None` for the root).
    fn parent(&self) -> Option<Arc<dyn Component>>;

    /// Direct children, in insertion order.
    fn children(&self) -> Vec<Arc<dyn Component>>;

    /// Direct child called `name`.
    fn child(&self, name: &str) -> Option<Arc<dyn Component>> {
        self.children().into_iter().find(|c| c.name() == name)
    }
}

/// Plain in-memory [`Component`] tree node.
#[derive(Debug)]
pub struct Composite {
    name: String,
    parent: Weak<Composite>,
    children: RwLock<Vec<Arc<Composite>>>,
}

impl Composite {
    /// Create a hierarchy root.
    pub fn root(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            parent: Weak::new(),
            children: RwLock::new(Vec::new()),
        })
    }

    /// Add a child component.
    ///
    /// Names follow the identifier rule and are unique among siblings.
    pub fn add_child(self: &Arc<Self>, name: &str) -> Result<Arc<Composite>> {
        if !is_identifier(name) {
            return Err(Error::InvalidFieldName(name.to_string()));
        }
        let mut children = self.children.write();
        if children.iter().any(|c| c.name == name) {
            return Err(Error::DuplicateName(name.to_string()));
        }
        let child = Arc::new(Self {
            name: name.to_string(),
            parent: Arc::downgrade(self),
            children: RwLock::new(Vec::new()),
        });
        children.push(child.clone());
        log::debug!("[Composite::add_child] {}.{}", self.name, name);
        Ok(child)
    }

    /// Detach a child (and its subtree).
    pub fn remove_child(&self, name: &str) -> Option<Arc<Composite>> {
        let mut children = self.children.write();
        let index = children.iter().position(|c| c.name == name)?;
        Some(children.remove(index))
    }

    /// Absolute path from the root (which is not part of the path).
    pub fn path(&self) -> String {
        let mut parent = self.parent.upgrade();
        if parent.is_none() {
            return String::new();
        }
        let mut names = vec![self.name.clone()];
        while let Some(node) = parent {
            parent = node.parent.upgrade();
            if parent.is_some() {
                names.push(node.name.clone());
            }
        }
        names.reverse();
        names.join(&PATH_SEPARATOR.to_string())
    }
}

impl Component for Composite {
    fn name(&self) -> &str {
        &self.name
    }

    fn parent(&self) -> Option<Arc<dyn Component>> {
        self.parent
            .upgrade()
            .map(|parent| parent as Arc<dyn Component>)
    }

    fn children(&self) -> Vec<Arc<dyn Component>> {
        self.children
            .read()
            .iter()
            .map(|c| c.clone() as Arc<dyn Component>)
            .collect()
    }

    fn child(&self, name: &str) -> Option<Arc<dyn Component>> {
        self.children
            .read()
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.clone() as Arc<dyn Component>)
    }
}

/// Finds components by path.
#[derive(Clone)]
pub struct Resolver {
    root: Arc<dyn Component>,
}

impl Resolver {
    pub fn new(root: Arc<dyn Component>) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Arc<dyn Component> {
        &self.root
    }

    /// Resolve a path of child names starting below the root.
    ///
    /// Returns `None` for an empty path, an empty segment or any name
    /// without a matching child.
    pub fn resolve_absolute(&self, path: &str) -> Option<Arc<dyn Component>> {
        if path.is_empty() {
            return None;
        }
        let found = descend(self.root.clone(), path);
        log::trace!(
            "[Resolver::resolve_absolute] {} -> {}",
            path,
            if found.is_some() { "found" } else { "none" }
        );
        found
    }

    /// Resolve a path relative to `sender`.
    ///
    /// Returns `None` when ascending above the root or when a name does not
    /// match.
    pub fn resolve_relative(
        &self,
        path: &str,
        sender: &Arc<dyn Component>,
    ) -> Option<Arc<dyn Component>> {
        let names = path.trim_start_matches(PATH_SEPARATOR);
        let ascend = path.len() - names.len();
        let mut current = sender.clone();
        for _ in 0..ascend {
            current = current.parent()?;
        }
        if names.is_empty() {
            return Some(current);
        }
        descend(current, names)
    }
}

fn descend(from: Arc<dyn Component>, path: &str) -> Option<Arc<dyn Component>> {
    path.split(PATH_SEPARATOR).try_fold(from, |node, name| {
        if name.is_empty() {
            None
        } else {
            node.child(name)
        }
    })
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("root", &self.root.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> (Arc<Composite>, Arc<Composite>) {
        let root = Composite::root("Sim");
        let a = root.add_child("A").expect("A");
        let b = a.add_child("B").expect("B");
        let c = b.add_child("C").expect("C");
        b.add_child("D").expect("D");
        a.add_child("E").expect("E");
        root.add_child("F").expect("F");
        (root, c)
    }

    #[test]
    fn test_absolute_exact_path_only() {
        let (root, c) = tree();
        let resolver = Resolver::new(root.clone());
        let found = resolver.resolve_absolute("A.B.C").expect("A.B.C");
        assert_eq!(found.name(), "C");
        assert_eq!(c.path(), "A.B.C");

        for miss in ["A.B.X", "A.X.C", "X.B.C", "A.B.C.D", "A.B.C.", "", "A..C", "Sim.A"] {
            assert!(resolver.resolve_absolute(miss).is_none(), "resolved {:?}", miss);
        }
    }

    #[test]
    fn test_relative_grammar() {
        let (root, c) = tree();
        let resolver = Resolver::new(root);
        let sender: Arc<dyn Component> = c;

        let name = |path: &str| resolver.resolve_relative(path, &sender).map(|c| c.name().to_string());
        assert_eq!(name("").as_deref(), Some("C"));
        assert_eq!(name(".D").as_deref(), Some("D"));
        assert_eq!(name("..E").as_deref(), Some("E"));
        assert_eq!(name("...F").as_deref(), Some("F"));
        assert_eq!(name(".").as_deref(), Some("B"));
        assert_eq!(name("...").as_deref(), Some("Sim"));
        assert_eq!(name("...."), None);
        assert_eq!(name(".D.X"), None);
        assert_eq!(name("..B.D").as_deref(), Some("D"));
        assert_eq!(name("..B..D"), None);
    }

    #[test]
    fn test_hierarchy_changes_are_seen() {
        let (root, _) = tree();
        let resolver = Resolver::new(root.clone());
        assert!(resolver.resolve_absolute("F").is_some());
        root.remove_child("F").expect("removed");
        assert!(resolver.resolve_absolute("F").is_none());
        root.add_child("F").expect("re-added");
        assert!(resolver.resolve_absolute("F").is_some());
    }

    #[test]
    fn test_add_child_rejects_duplicates() {
        let root = Composite::root("Sim");
        root.add_child("A").expect("A");
        assert_eq!(root.add_child("A").unwrap_err(), Error::DuplicateName("A".into()));
        assert!(root.add_child("A.B").is_err());
        assert_eq!(root.children().len(), 1);
        assert!(root.parent().is_none());
        assert_eq!(root.path(), "");
    }
}
