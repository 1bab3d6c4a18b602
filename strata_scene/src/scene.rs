// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyed mark storage and diffing.

extern crate alloc;

use alloc::boxed::Box;
use alloc::vec::Vec;

use hashbrown::HashMap;

use crate::mark::{Mark, MarkId, MarkPayload};

/// A change to the retained scene produced by [`Scene::tick`].
#[derive(Clone, Debug, PartialEq)]
pub enum MarkDiff {
    /// A mark that was not present in the previous pass.
    Enter {
        /// Mark identity.
        id: MarkId,
        /// Paint order.
        z_index: i32,
        /// Visibility.
        visible: bool,
        /// Payload.
        new: Box<MarkPayload>,
    },
    /// A mark whose payload, paint order, or visibility changed.
    Update {
        /// Mark identity.
        id: MarkId,
        /// Previous paint order.
        old_z_index: i32,
        /// New paint order.
        new_z_index: i32,
        /// New visibility.
        visible: bool,
        /// Previous payload.
        old: Box<MarkPayload>,
        /// New payload.
        new: Box<MarkPayload>,
    },
    /// A mark that is no longer produced.
    Exit {
        /// Mark identity.
        id: MarkId,
        /// Last payload.
        old: Box<MarkPayload>,
    },
}

impl MarkDiff {
    /// Returns the id of the affected mark.
    pub fn id(&self) -> MarkId {
        match self {
            Self::Enter { id, .. } | Self::Update { id, .. } | Self::Exit { id, .. } => *id,
        }
    }
}

/// The retained set of marks from the latest pass.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    marks: HashMap<MarkId, Mark>,
}

impl Scene {
    /// Creates an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the scene content with `marks` and returns what changed, ordered by mark id.
    ///
    /// If the same id appears more than once, the last occurrence wins.
    pub fn tick(&mut self, marks: impl IntoIterator<Item = Mark>) -> Vec<MarkDiff> {
        let mut next: HashMap<MarkId, Mark> = HashMap::new();
        for mark in marks {
            next.insert(mark.id, mark);
        }

        let mut diffs = Vec::new();
        for (id, mark) in &next {
            match self.marks.get(id) {
                None => diffs.push(MarkDiff::Enter {
                    id: *id,
                    z_index: mark.z_index,
                    visible: mark.visible,
                    new: Box::new(mark.payload.clone()),
                }),
                Some(old) if old != mark => diffs.push(MarkDiff::Update {
                    id: *id,
                    old_z_index: old.z_index,
                    new_z_index: mark.z_index,
                    visible: mark.visible,
                    old: Box::new(old.payload.clone()),
                    new: Box::new(mark.payload.clone()),
                }),
                Some(_) => {}
            }
        }
        for (id, old) in &self.marks {
            if !next.contains_key(id) {
                diffs.push(MarkDiff::Exit {
                    id: *id,
                    old: Box::new(old.payload.clone()),
                });
            }
        }
        diffs.sort_by_key(MarkDiff::id);

        self.marks = next;
        diffs
    }

    /// Returns the number of retained marks, hidden ones included.
    pub fn len(&self) -> usize {
        self.marks.len()
    }

    /// Returns `true` if the scene holds no marks.
    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    /// Looks up a mark by id.
    pub fn get(&self, id: MarkId) -> Option<&Mark> {
        self.marks.get(&id)
    }

    /// Returns all marks in paint order (`z_index`, then id).
    pub fn marks(&self) -> Vec<&Mark> {
        let mut out: Vec<&Mark> = self.marks.values().collect();
        out.sort_by_key(|m| (m.z_index, m.id));
        out
    }

    /// Returns the visible marks in paint order.
    pub fn visible_marks(&self) -> Vec<&Mark> {
        let mut out = self.marks();
        out.retain(|m| m.visible);
        out
    }

    /// Removes every mark, returning exit diffs for them.
    pub fn clear(&mut self) -> Vec<MarkDiff> {
        self.tick(core::iter::empty())
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Line;

    use super::*;

    fn line(id: u64, x: f64) -> Mark {
        Mark::line(MarkId(id), Line::new((x, 0.0), (x, 5.0)))
    }

    #[test]
    fn first_tick_enters_everything() {
        let mut scene = Scene::new();
        let diffs = scene.tick([line(2, 0.0), line(1, 10.0)]);
        assert_eq!(diffs.len(), 2);
        assert!(matches!(diffs[0], MarkDiff::Enter { id: MarkId(1), .. }));
        assert_eq!(scene.len(), 2);
    }

    #[test]
    fn unchanged_tick_produces_no_diffs() {
        let mut scene = Scene::new();
        scene.tick([line(1, 0.0), line(2, 10.0)]);
        let diffs = scene.tick([line(1, 0.0), line(2, 10.0)]);
        assert!(diffs.is_empty(), "expected no diffs, got {diffs:?}");
    }

    #[test]
    fn visibility_change_is_an_update_not_an_exit() {
        let mut scene = Scene::new();
        scene.tick([line(1, 0.0)]);
        let diffs = scene.tick([line(1, 0.0).with_visible(false)]);
        assert_eq!(diffs.len(), 1);
        assert!(matches!(diffs[0], MarkDiff::Update { visible: false, .. }));
        assert_eq!(scene.len(), 1);
        assert!(scene.visible_marks().is_empty());
    }

    #[test]
    fn missing_marks_exit() {
        let mut scene = Scene::new();
        scene.tick([line(1, 0.0), line(2, 10.0)]);
        let diffs = scene.tick([line(2, 10.0)]);
        assert_eq!(diffs.len(), 1);
        assert!(matches!(diffs[0], MarkDiff::Exit { id: MarkId(1), .. }));
        assert_eq!(scene.clear().len(), 1);
        assert!(scene.is_empty());
    }
}
