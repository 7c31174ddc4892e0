//! The concrete effect variants.
//!
//! Each module holds one [`EffectStrategy`](crate::strategy::EffectStrategy)
//! implementation. Position-keyed variants cache cells found by random
//! sampling; entity-keyed variants (protection, herding, smiting) cache the
//! qualifying entities around the origin.
//!
//! # Modules
//!
//! - [`growth`] -- Crops advance stages; corrupted: crops wither, soil degrades.
//! - [`protection`] -- Projectiles deflected, hostiles repelled, defenders
//!   warded; corrupted: hostiles empowered.
//! - [`melt`] -- Progressive melting; corrupted: instant freeze, ignite, scorch.
//! - [`fishing`] -- Timed catches from open water; corrupted: water drained or
//!   frozen.
//! - [`ore_generation`] -- Enclosed stone turns into weighted random ore.
//! - [`excavation`] -- Blocks removed with drops; corrupted: shattered.
//! - [`herding`] -- Animals shed products; corrupted: animals hurt.
//! - [`smiting`] -- Hostiles struck; corrupted: everything nearby struck.
//! - [`purification`] -- Hazards cleansed; corrupted: terrain turned infernal.

use ritual_types::Position;
use ritual_world::World;

pub mod excavation;
pub mod fishing;
pub mod growth;
pub mod herding;
pub mod melt;
pub mod ore_generation;
pub mod protection;
pub mod purification;
pub mod smiting;

pub use excavation::ExcavationStrategy;
pub use fishing::{FishingStrategy, FishingTimer};
pub use growth::GrowthStrategy;
pub use herding::HerdingStrategy;
pub use melt::{MeltProgress, MeltStrategy};
pub use ore_generation::OreGenerationStrategy;
pub use protection::ProtectionStrategy;
pub use purification::PurificationStrategy;
pub use smiting::SmitingStrategy;

/// Whether a fire could be lit at `pos`: empty, standing on a solid cell.
fn can_ignite(world: &dyn World, pos: Position) -> bool {
    world.read(pos).is_air() && world.read(pos.below()).is_solid()
}

#[cfg(test)]
pub(crate) mod testing {
    use ritual_types::{CellState, Material, Position, RitualId};
    use ritual_world::GridWorld;

    use crate::context::Activation;

    /// A loaded world with a stone floor at `y = 59` around the origin.
    pub(crate) fn floor_world() -> GridWorld {
        let mut world = GridWorld::new();
        world.load_area(Position::ORIGIN, 1);
        let filled = world.fill(
            Position::new(-8, 59, -8),
            Position::new(8, 59, 8),
            CellState::block(Material::Stone),
        );
        assert!(filled.is_ok());
        world
    }

    /// A full-strength activation at `origin`.
    pub(crate) fn activation(origin: Position) -> Activation {
        Activation {
            ritual: RitualId::new(),
            origin,
            strength: 1.0,
        }
    }
}
