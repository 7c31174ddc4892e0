//! Per-activation effect properties and the augments that shape them.

use serde::{Deserialize, Serialize};

/// A modifier attached to a ritual instance when it is activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Augment {
    /// Flips the effect between benign and corrupted mode.
    Inverted,
    /// Widens the effect radius by the given number of cells.
    Expanded(u32),
    /// Narrows the effect radius by the given number of cells, never below
    /// one.
    Contracted(u32),
}

/// How one ritual instance behaves: how far it reaches and which mode it
/// runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EffectProperties {
    /// Effective radius for this activation.
    pub size: u32,
    /// Whether the destructive branch runs instead of the benign one.
    pub corrupted: bool,
}

impl EffectProperties {
    /// Benign properties with the given radius.
    pub const fn benign(size: u32) -> Self {
        Self {
            size,
            corrupted: false,
        }
    }

    /// Derive properties from a base radius and the instance's augments,
    /// applied in order. Two inversions cancel out.
    pub fn derive(base_size: u32, augments: &[Augment]) -> Self {
        augments
            .iter()
            .fold(Self::benign(base_size), |props, augment| match *augment {
                Augment::Inverted => Self {
                    corrupted: !props.corrupted,
                    ..props
                },
                Augment::Expanded(additional) => Self {
                    size: props.size.saturating_add(additional),
                    ..props
                },
                Augment::Contracted(reduction) => Self {
                    size: props.size.saturating_sub(reduction).max(1),
                    ..props
                },
            })
    }
}
