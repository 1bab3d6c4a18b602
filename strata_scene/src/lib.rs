// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A minimal retained scene for guide marks.
//!
//! Guides (axes, tiers, annotations) produce a flat list of [`Mark`]s every render pass. The
//! [`Scene`] keeps the marks from the previous pass keyed by [`MarkId`] and reports what changed
//! as [`MarkDiff`]s, so a renderer only has to touch marks that actually entered, moved, changed
//! visibility, or left.
//!
//! Hidden marks stay in the scene: visibility is part of a mark's state, not its presence.

#![no_std]

extern crate alloc;

mod mark;
mod scene;

pub use mark::{
    CirclePayload, LinePayload, Mark, MarkId, MarkKind, MarkPayload, RectPayload, TextAnchor,
    TextBaseline, TextPayload,
};
pub use scene::{MarkDiff, Scene};
