//! Core value structs: cell states, entity snapshots, status effects, item
//! drops, and broadcast events.

use serde::{Deserialize, Serialize};

use crate::enums::{
    CropKind, EffectEventKind, EntityKind, Item, Material, OreKind, StatusKind, VariantKind,
};
use crate::ids::{EntityId, RitualId};
use crate::position::Position;

// ---------------------------------------------------------------------------
// CellState
// ---------------------------------------------------------------------------

/// Hardness shared by every ore cell.
pub const ORE_HARDNESS: f32 = 3.0;

/// The contents of one world cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellState {
    /// Empty space.
    #[default]
    Air,
    /// A plain material.
    Block(Material),
    /// An ore embedded in stone.
    Ore(OreKind),
    /// A growing plant.
    Crop {
        /// The plant.
        kind: CropKind,
        /// Current growth stage, `0..=kind.max_stage()`.
        stage: u8,
    },
}

impl CellState {
    /// Shorthand for [`CellState::Block`].
    pub const fn block(material: Material) -> Self {
        Self::Block(material)
    }

    /// A freshly planted crop.
    pub const fn seedling(kind: CropKind) -> Self {
        Self::Crop { kind, stage: 0 }
    }

    /// Whether the cell is empty.
    pub const fn is_air(self) -> bool {
        matches!(self, Self::Air)
    }

    /// The plain material of the cell, if it is a [`CellState::Block`].
    pub const fn material(self) -> Option<Material> {
        match self {
            Self::Block(material) => Some(material),
            _ => None,
        }
    }

    /// Whether the cell holds the given plain material.
    pub fn is(self, material: Material) -> bool {
        self.material() == Some(material)
    }

    /// Mining hardness, or `None` for cells that cannot be broken.
    pub const fn hardness(self) -> Option<f32> {
        match self {
            Self::Air => None,
            Self::Block(material) => material.hardness(),
            Self::Ore(_) => Some(ORE_HARDNESS),
            Self::Crop { .. } => Some(0.0),
        }
    }

    /// Resistance against destructive removal.
    pub const fn blast_resistance(self) -> f32 {
        match self {
            Self::Air | Self::Crop { .. } => 0.0,
            Self::Block(material) => material.blast_resistance(),
            Self::Ore(_) => ORE_HARDNESS,
        }
    }

    /// Whether the cell is a full solid.
    pub const fn is_solid(self) -> bool {
        match self {
            Self::Air | Self::Crop { .. } => false,
            Self::Block(material) => material.is_solid(),
            Self::Ore(_) => true,
        }
    }

    /// Whether something may be placed into this cell without removing it
    /// first.
    pub const fn is_replaceable(self) -> bool {
        match self {
            Self::Air => true,
            Self::Block(material) => material.is_replaceable(),
            Self::Ore(_) | Self::Crop { .. } => false,
        }
    }

    /// What the cell drops when it is broken, if anything.
    pub const fn drop(self) -> Option<ItemDrop> {
        match self {
            Self::Air => None,
            Self::Block(material) => match material {
                Material::Water
                | Material::Lava
                | Material::Fire
                | Material::Snow
                | Material::Bedrock
                | Material::Glass
                | Material::Ice
                | Material::Leaves => None,
                Material::Stone => Some(ItemDrop::single(Item::Block(Material::Cobblestone))),
                Material::Grass | Material::Farmland => {
                    Some(ItemDrop::single(Item::Block(Material::Dirt)))
                }
                other => Some(ItemDrop::single(Item::Block(other))),
            },
            Self::Ore(ore) => Some(ItemDrop::single(Item::Ore(ore))),
            Self::Crop { kind, .. } => Some(ItemDrop::single(Item::Crop(kind))),
        }
    }
}

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

/// A read-only view of an entity at the moment it was queried.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    /// The entity's identifier.
    pub id: EntityId,
    /// What the entity is.
    pub kind: EntityKind,
    /// The cell the entity occupies.
    pub position: Position,
    /// Remaining health (zero for projectiles).
    pub health: f32,
}

/// A timed status effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatusEffect {
    /// The effect.
    pub kind: StatusKind,
    /// How long the effect lasts, in ticks.
    pub duration_ticks: u32,
    /// Effect level, `0` for the base level.
    pub amplifier: u8,
}

impl StatusEffect {
    /// Construct a status effect.
    pub const fn new(kind: StatusKind, duration_ticks: u32, amplifier: u8) -> Self {
        Self {
            kind,
            duration_ticks,
            amplifier,
        }
    }
}

/// A stack of items dropped into the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemDrop {
    /// The item.
    pub item: Item,
    /// Stack size, at least 1.
    pub count: u32,
}

impl ItemDrop {
    /// A stack of one.
    pub const fn single(item: Item) -> Self {
        Self { item, count: 1 }
    }
}

// ---------------------------------------------------------------------------
// Effect events
// ---------------------------------------------------------------------------

/// A visual/audio event produced by a world mutation.
///
/// Events are purely observational. Losing one never affects simulation
/// correctness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EffectEvent {
    /// The ritual instance that caused the mutation.
    pub ritual: RitualId,
    /// The variant of that ritual.
    pub variant: VariantKind,
    /// What happened.
    pub kind: EffectEventKind,
    /// Where it happened.
    pub position: Position,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_cell_is_air() {
        assert!(CellState::default().is_air());
        assert!(CellState::Air.is_replaceable());
        assert!(CellState::Air.hardness().is_none());
    }

    #[test]
    fn stone_drops_cobblestone() {
        let drop = CellState::block(Material::Stone).drop();
        assert_eq!(drop, Some(ItemDrop::single(Item::Block(Material::Cobblestone))));
    }

    #[test]
    fn fluids_drop_nothing() {
        assert!(CellState::block(Material::Water).drop().is_none());
        assert!(CellState::block(Material::Lava).drop().is_none());
    }

    #[test]
    fn ore_cells_are_solid_and_breakable() {
        let ore = CellState::Ore(OreKind::Iron);
        assert!(ore.is_solid());
        assert!(ore.hardness().is_some());
        assert_eq!(ore.drop(), Some(ItemDrop::single(Item::Ore(OreKind::Iron))));
    }

    #[test]
    fn crops_are_neither_solid_nor_replaceable() {
        let crop = CellState::seedling(CropKind::Wheat);
        assert!(!crop.is_solid());
        assert!(!crop.is_replaceable());
        assert!(crop.material().is_none());
    }
}
