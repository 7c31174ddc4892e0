//! Enumeration types for the ritual effect engine.
//!
//! Materials, ores, and crops describe world cells; entity, status, and item
//! kinds describe what lives in and drops into the world; variant and event
//! kinds describe the effects themselves.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Materials
// ---------------------------------------------------------------------------

/// The substance of a non-air, non-ore, non-crop cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Material {
    // --- Earth ---
    /// Natural stone.
    Stone,
    /// Broken stone.
    Cobblestone,
    /// Bare soil.
    Dirt,
    /// Soil with a grass cover.
    Grass,
    /// Tilled, hydrated soil that crops stand on.
    Farmland,
    /// Loose sand.
    Sand,
    /// Loose gravel.
    Gravel,
    /// Riverbed clay.
    Clay,
    /// Compressed sand.
    Sandstone,
    /// Fused sand.
    Glass,

    // --- Infernal ---
    /// Soft infernal rock.
    Netherrack,
    /// Smouldering rock that burns whatever stands on it.
    Magma,
    /// Cooled lava, nearly indestructible.
    Obsidian,
    /// The unbreakable floor of the world.
    Bedrock,

    // --- Fluids and frost ---
    /// Still water.
    Water,
    /// Still lava.
    Lava,
    /// Frozen water.
    Ice,
    /// Compacted ice that does not melt on its own.
    PackedIce,
    /// A thin snow layer.
    Snow,
    /// Open flame.
    Fire,

    // --- Vegetation ---
    /// Tree trunk.
    Log,
    /// Tree foliage.
    Leaves,
}

impl Material {
    /// Mining hardness, or `None` for cells that cannot be broken at all.
    pub const fn hardness(self) -> Option<f32> {
        match self {
            Self::Stone => Some(1.5),
            Self::Cobblestone | Self::Log => Some(2.0),
            Self::Dirt | Self::Sand | Self::Ice | Self::PackedIce | Self::Magma => Some(0.5),
            Self::Grass | Self::Farmland | Self::Gravel | Self::Clay => Some(0.6),
            Self::Sandstone => Some(0.8),
            Self::Glass => Some(0.3),
            Self::Netherrack => Some(0.4),
            Self::Obsidian => Some(50.0),
            Self::Snow => Some(0.1),
            Self::Leaves => Some(0.2),
            Self::Fire => Some(0.0),
            Self::Bedrock | Self::Water | Self::Lava => None,
        }
    }

    /// Resistance against explosive (destructive) removal.
    pub const fn blast_resistance(self) -> f32 {
        match self {
            Self::Stone | Self::Cobblestone => 6.0,
            Self::Dirt | Self::Sand | Self::Ice | Self::Magma => 0.5,
            Self::Grass | Self::Farmland | Self::Gravel | Self::Clay | Self::PackedIce => 0.6,
            Self::Sandstone => 0.8,
            Self::Glass => 0.3,
            Self::Netherrack => 0.4,
            Self::Obsidian => 1200.0,
            Self::Bedrock => 3_600_000.0,
            Self::Water | Self::Lava => 100.0,
            Self::Snow => 0.1,
            Self::Fire => 0.0,
            Self::Log => 2.0,
            Self::Leaves => 0.2,
        }
    }

    /// Whether the material flows.
    pub const fn is_fluid(self) -> bool {
        matches!(self, Self::Water | Self::Lava)
    }

    /// Whether the material is a full solid cell that supports what stands
    /// on it.
    pub const fn is_solid(self) -> bool {
        !matches!(self, Self::Water | Self::Lava | Self::Fire | Self::Snow)
    }

    /// Whether fire can consume the material.
    pub const fn is_flammable(self) -> bool {
        matches!(self, Self::Log | Self::Leaves)
    }

    /// Whether placing something into this cell may overwrite it freely.
    pub const fn is_replaceable(self) -> bool {
        matches!(self, Self::Snow | Self::Fire)
    }
}

// ---------------------------------------------------------------------------
// Ores
// ---------------------------------------------------------------------------

/// An ore embedded in stone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OreKind {
    /// Coal seam.
    Coal,
    /// Copper ore.
    Copper,
    /// Iron ore.
    Iron,
    /// Redstone ore.
    Redstone,
    /// Lapis lazuli ore.
    Lapis,
    /// Gold ore.
    Gold,
    /// Diamond ore.
    Diamond,
}

impl OreKind {
    /// Every ore kind, in table order.
    pub const ALL: [Self; 7] = [
        Self::Coal,
        Self::Copper,
        Self::Iron,
        Self::Redstone,
        Self::Lapis,
        Self::Gold,
        Self::Diamond,
    ];

    /// Default relative weight when an ore is chosen at random.
    pub const fn default_weight(self) -> u32 {
        match self {
            Self::Coal => 40,
            Self::Copper => 25,
            Self::Iron => 20,
            Self::Redstone => 8,
            Self::Lapis => 4,
            Self::Gold => 2,
            Self::Diamond => 1,
        }
    }
}

// ---------------------------------------------------------------------------
// Crops
// ---------------------------------------------------------------------------

/// A growable plant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CropKind {
    /// Wheat on farmland.
    Wheat,
    /// Carrots on farmland.
    Carrot,
    /// Potatoes on farmland.
    Potato,
    /// Beetroot on farmland.
    Beetroot,
    /// Infernal wart.
    NetherWart,
    /// Sugar cane, grows upward in stacks.
    SugarCane,
    /// Cactus, grows upward in stacks.
    Cactus,
}

impl CropKind {
    /// The final growth stage (or, for stacking crops, the age at which the
    /// stack grows one cell taller).
    pub const fn max_stage(self) -> u8 {
        match self {
            Self::Wheat | Self::Carrot | Self::Potato => 7,
            Self::Beetroot | Self::NetherWart => 3,
            Self::SugarCane | Self::Cactus => 15,
        }
    }

    /// Whether the crop grows by stacking a new cell on top instead of by
    /// maturing in place.
    pub const fn is_stacking(self) -> bool {
        matches!(self, Self::SugarCane | Self::Cactus)
    }

    /// Maximum column height for stacking crops (1 for regular crops).
    pub const fn max_height(self) -> u8 {
        if self.is_stacking() { 3 } else { 1 }
    }
}

// ---------------------------------------------------------------------------
// Entities and status effects
// ---------------------------------------------------------------------------

/// The kind of an animal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimalKind {
    /// Sheep, shed wool.
    Sheep,
    /// Cows, shed leather.
    Cow,
    /// Chickens, lay eggs and shed feathers.
    Chicken,
    /// Pigs.
    Pig,
}

/// The kind of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// A player.
    Player,
    /// A hostile creature.
    Hostile,
    /// A passive animal.
    Animal(AnimalKind),
    /// A projectile in flight.
    Projectile {
        /// Whether the projectile was fired by a hostile creature.
        hostile: bool,
    },
}

impl EntityKind {
    /// Whether the entity is alive (can receive status effects and damage).
    pub const fn is_living(self) -> bool {
        !matches!(self, Self::Projectile { .. })
    }

    /// Whether the entity threatens players and animals.
    pub const fn is_threat(self) -> bool {
        matches!(self, Self::Hostile | Self::Projectile { hostile: true })
    }

    /// Whether the entity is something a ward protects.
    pub const fn is_defender(self) -> bool {
        matches!(self, Self::Player | Self::Animal(_))
    }
}

/// A status effect that can be applied to a living entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    /// Heals over time.
    Regeneration,
    /// Reduces incoming damage.
    Resistance,
    /// Increases outgoing damage.
    Strength,
    /// Increases movement speed.
    Speed,
    /// Reduces movement speed.
    Slowness,
    /// Reduces outgoing damage.
    Weakness,
    /// Damages over time, never lethal.
    Poison,
    /// Damages over time, may be lethal.
    Wither,
    /// Distorts vision.
    Nausea,
}

impl StatusKind {
    /// Whether the status effect is detrimental to its bearer.
    pub const fn is_harmful(self) -> bool {
        matches!(
            self,
            Self::Slowness | Self::Weakness | Self::Poison | Self::Wither | Self::Nausea
        )
    }
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

/// An item that can be dropped into the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Item {
    /// Raw cod.
    Cod,
    /// Raw salmon.
    Salmon,
    /// Pufferfish.
    Pufferfish,
    /// Tropical fish.
    TropicalFish,
    /// A soaked leather boot.
    SoggyBoot,
    /// A nautilus shell.
    NautilusShell,
    /// Sheep wool.
    Wool,
    /// Cow leather.
    Leather,
    /// Chicken feather.
    Feather,
    /// Chicken egg.
    Egg,
    /// Pork.
    Porkchop,
    /// A block of the given material.
    Block(Material),
    /// Raw output of the given ore.
    Ore(OreKind),
    /// Harvest of the given crop.
    Crop(CropKind),
}

// ---------------------------------------------------------------------------
// Variants and events
// ---------------------------------------------------------------------------

/// The ritual effect variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantKind {
    /// Crop growth.
    Growth,
    /// Projectile and predator suppression.
    Protection,
    /// Progressive melting.
    Melt,
    /// Fishing from open water.
    Fishing,
    /// Ore formation in clean stone.
    OreGeneration,
    /// Controlled block removal.
    Excavation,
    /// Animal product harvesting.
    Herding,
    /// Damage against hostile creatures.
    Smiting,
    /// Cleansing of hazardous terrain.
    Purification,
}

impl VariantKind {
    /// Every variant, in declaration order.
    pub const ALL: [Self; 9] = [
        Self::Growth,
        Self::Protection,
        Self::Melt,
        Self::Fishing,
        Self::OreGeneration,
        Self::Excavation,
        Self::Herding,
        Self::Smiting,
        Self::Purification,
    ];

    /// Stable snake-case name, matching the configuration keys.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Growth => "growth",
            Self::Protection => "protection",
            Self::Melt => "melt",
            Self::Fishing => "fishing",
            Self::OreGeneration => "ore_generation",
            Self::Excavation => "excavation",
            Self::Herding => "herding",
            Self::Smiting => "smiting",
            Self::Purification => "purification",
        }
    }
}

impl core::fmt::Display for VariantKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a broadcast effect event shows to nearby observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectEventKind {
    // --- Growth ---
    /// A crop advanced at least one stage or grew taller.
    CropGrown,
    /// A crop was destroyed.
    CropWithered,
    /// Soil was degraded.
    SoilDegraded,

    // --- Protection ---
    /// A hostile projectile was removed.
    ProjectileDeflected,
    /// A hostile creature was slowed and weakened.
    HostileRepelled,
    /// Players and animals in range were made resistant.
    DefendersWarded,
    /// Hostile creatures were strengthened.
    HostilesEmpowered,

    // --- Melt ---
    /// A block melted into its molten or thawed form.
    BlockMelted,
    /// A fluid froze.
    BlockFrozen,
    /// A fire was lit.
    BlockIgnited,
    /// A block was instantly scorched into another material.
    BlockScorched,

    // --- Fishing ---
    /// A catch was dropped above the water.
    FishCaught,
    /// Water was removed.
    WaterDrained,

    // --- Ore generation ---
    /// Stone turned into ore.
    OreFormed,

    // --- Excavation ---
    /// A block was removed and dropped.
    BlockExcavated,
    /// A block was destroyed without a drop.
    BlockShattered,

    // --- Herding ---
    /// An animal dropped its product.
    AnimalHarvested,
    /// Animals were hurt.
    AnimalsHurt,

    // --- Smiting ---
    /// A hostile creature was damaged.
    HostileSmitten,
    /// Every living entity near a point was damaged.
    EntitiesSmitten,

    // --- Purification ---
    /// A hazardous cell was made safe.
    HazardCleansed,
    /// Terrain was turned into a more hazardous material.
    TerrainCorrupted,
}
