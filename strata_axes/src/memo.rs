// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lazily computed values with explicit invalidation.

use core::cell::Cell;

/// A lazily computed `Copy` value.
///
/// The value is computed on the first [`Memo::get_or_init`] after construction or after
/// [`Memo::invalidate`], and reused until the next invalidation.
#[derive(Debug, Default)]
pub struct Memo<T: Copy> {
    value: Cell<Option<T>>,
}

impl<T: Copy> Memo<T> {
    /// Creates an empty memo.
    pub const fn new() -> Self {
        Self {
            value: Cell::new(None),
        }
    }

    /// Returns the cached value, computing it with `init` if there is none.
    pub fn get_or_init(&self, init: impl FnOnce() -> T) -> T {
        if let Some(v) = self.value.get() {
            return v;
        }
        let v = init();
        self.value.set(Some(v));
        v
    }

    /// Returns the cached value without computing it.
    pub fn peek(&self) -> Option<T> {
        self.value.get()
    }

    /// Drops the cached value.
    pub fn invalidate(&self) {
        self.value.set(None);
    }
}

/// Render bookkeeping shared between an axis and its scale subscription.
///
/// The scale callback only touches this state: it drops memoized sizes and marks the axis as
/// needing a render. The render itself happens on the host's next pass.
#[derive(Debug)]
pub(crate) struct RenderState {
    /// The measured cross dimension (height of horizontal axes, width of vertical ones).
    pub(crate) cross_size: Memo<f64>,
    pending: Cell<bool>,
}

impl RenderState {
    pub(crate) fn new() -> Self {
        Self {
            cross_size: Memo::new(),
            pending: Cell::new(true),
        }
    }

    /// Invalidates memoized sizes and schedules a render.
    pub(crate) fn redraw(&self) {
        self.cross_size.invalidate();
        self.pending.set(true);
    }

    /// Schedules a render without touching memoized sizes.
    pub(crate) fn schedule(&self) {
        self.pending.set(true);
    }

    pub(crate) fn is_pending(&self) -> bool {
        self.pending.get()
    }

    pub(crate) fn mark_rendered(&self) {
        self.pending.set(false);
    }
}
