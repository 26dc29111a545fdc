// SPDX-FileCopyrightText: 2025 Joshua Goins <josh@redstrate.com>
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::codes::{BlendMode, ShadowPolicy};

/// Normalized values derived from the header, for whatever builds a shader graph out of the material.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DerivedFields {
    /// 0.0 for opaque, 0.5 for additive, 1.0 for alpha blending (and everything else).
    pub blend_intent: f32,
    /// 0.0 if the material shouldn't cast shadows, 1.0 otherwise.
    pub shadow_intent: f32,
}

impl DerivedFields {
    pub fn compute(blend_mode: BlendMode, shadow_policy: ShadowPolicy) -> Self {
        Self {
            blend_intent: blend_intent(blend_mode),
            shadow_intent: shadow_intent(shadow_policy),
        }
    }
}

/// Only opaque and additive are told apart, every other mode is treated as alpha blending.
pub fn blend_intent(blend_mode: BlendMode) -> f32 {
    match blend_mode {
        BlendMode::OPAQUE => 0.0,
        BlendMode::ADDITIVE => 0.5,
        _ => 1.0,
    }
}

pub fn shadow_intent(shadow_policy: ShadowPolicy) -> f32 {
    match shadow_policy {
        ShadowPolicy::NONE | ShadowPolicy::RENDER_AS_DECAL => 0.0,
        _ => 1.0,
    }
}
