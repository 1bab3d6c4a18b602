// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Developer-facing warnings emitted while rendering.
//!
//! Rendering never fails once an axis is configured; conditions worth telling a developer
//! about are reported through an injected [`Diagnostics`] sink instead.

extern crate alloc;

use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

/// A non-fatal condition encountered during layout or rendering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AxisWarning {
    /// No candidate time configuration fits; the least precise one is used anyway.
    ZoomedOutTooFar {
        /// Number of candidate configurations that were tried.
        configurations: usize,
    },
}

impl fmt::Display for AxisWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZoomedOutTooFar { configurations } => write!(
                f,
                "zoomed out too far: could not find suitable interval to display labels \
                 ({configurations} configurations tried)"
            ),
        }
    }
}

/// A sink for [`AxisWarning`]s.
pub trait Diagnostics {
    /// Reports a warning.
    fn warn(&self, warning: &AxisWarning);
}

/// Discards every warning. This is the default sink.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopDiagnostics;

impl Diagnostics for NoopDiagnostics {
    fn warn(&self, _warning: &AxisWarning) {}
}

/// Forwards warnings to the `log` facade at `warn` level.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn warn(&self, warning: &AxisWarning) {
        log::warn!("{warning}");
    }
}

/// Keeps every warning in memory.
#[derive(Debug, Default)]
pub struct RecordingDiagnostics {
    warnings: RefCell<Vec<AxisWarning>>,
}

impl RecordingDiagnostics {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the recorded warnings.
    pub fn warnings(&self) -> Vec<AxisWarning> {
        self.warnings.borrow().clone()
    }

    /// Removes and returns the recorded warnings.
    pub fn take(&self) -> Vec<AxisWarning> {
        core::mem::take(&mut *self.warnings.borrow_mut())
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn warn(&self, warning: &AxisWarning) {
        self.warnings.borrow_mut().push(warning.clone());
    }
}
