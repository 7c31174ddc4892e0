//! Default demo terrain for the headless engine.
//!
//! Builds a 64x64 flat world (surface at `y = 60`) over the sixteen chunk
//! columns around the origin, with one site per kind of ritual effect: a
//! farm, a pond, a frost field, a lava pool, a quarry, a pasture, and a
//! hostile camp. Layout is fixed, so every run starts from the same world.

use ritual_types::{
    AnimalKind, CellState, ChunkPos, CropKind, EntityKind, Material, Offset, OreKind, Position,
};

use crate::error::WorldError;
use crate::grid::GridWorld;

/// Surface height of the demo terrain.
pub const SURFACE_Y: i32 = 60;

/// Lowest layer of the demo terrain (bedrock).
pub const FLOOR_Y: i32 = 50;

/// Half-width of the demo terrain in cells.
pub const HALF_WIDTH: i32 = 32;

/// Centers of the demo sites, returned alongside the world so callers can
/// anchor rituals on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoSites {
    /// Tilled farmland planted with crops, sugar cane along a water channel.
    pub farm: Position,
    /// A pond of open water.
    pub pond: Position,
    /// Ice and snow.
    pub frost: Position,
    /// Lava, magma, netherrack, and a burning tree.
    pub lava_pool: Position,
    /// Deep stone with a scattered iron vein.
    pub quarry: Position,
    /// Grass with grazing animals.
    pub pasture: Position,
    /// Hostile creatures and their projectiles.
    pub hostile_camp: Position,
}

/// Create the demo terrain with every chunk loaded.
///
/// # Errors
///
/// Returns [`WorldError::OutOfBounds`] if the layout leaves the world's
/// height range (it does not with the default range).
pub fn create_demo_terrain() -> Result<(GridWorld, DemoSites), WorldError> {
    let mut world = GridWorld::new();
    let lo = HALF_WIDTH.saturating_neg();
    let hi = HALF_WIDTH.saturating_sub(1);

    // Layers: bedrock, stone, dirt, grass.
    world.fill(
        Position::new(lo, FLOOR_Y, lo),
        Position::new(hi, FLOOR_Y, hi),
        CellState::block(Material::Bedrock),
    )?;
    world.fill(
        Position::new(lo, FLOOR_Y.saturating_add(1), lo),
        Position::new(hi, SURFACE_Y.saturating_sub(3), hi),
        CellState::block(Material::Stone),
    )?;
    world.fill(
        Position::new(lo, SURFACE_Y.saturating_sub(2), lo),
        Position::new(hi, SURFACE_Y.saturating_sub(1), hi),
        CellState::block(Material::Dirt),
    )?;
    world.fill(
        Position::new(lo, SURFACE_Y, lo),
        Position::new(hi, SURFACE_Y, hi),
        CellState::block(Material::Grass),
    )?;

    let sites = DemoSites {
        farm: Position::new(-20, SURFACE_Y, -20),
        pond: Position::new(12, SURFACE_Y, 12),
        frost: Position::new(-20, SURFACE_Y, 12),
        lava_pool: Position::new(20, SURFACE_Y, -20),
        quarry: Position::new(0, 54, 0),
        pasture: Position::new(0, SURFACE_Y.saturating_add(1), -20),
        hostile_camp: Position::new(0, SURFACE_Y.saturating_add(1), 20),
    };

    build_farm(&mut world, sites.farm)?;
    build_pond(&mut world, sites.pond)?;
    build_frost(&mut world, sites.frost)?;
    build_lava_pool(&mut world, sites.lava_pool)?;
    build_quarry(&mut world, sites.quarry)?;
    populate_pasture(&mut world, sites.pasture);
    populate_hostile_camp(&mut world, sites.hostile_camp);

    for chunk_x in -2..=1 {
        for chunk_z in -2..=1 {
            world.load_chunk(ChunkPos::new(chunk_x, chunk_z));
        }
    }

    Ok((world, sites))
}

/// A 9x9 plot of farmland with crops at staggered stages, plus a sand strip
/// of sugar cane along a water channel on its east edge.
fn build_farm(world: &mut GridWorld, center: Position) -> Result<(), WorldError> {
    const CROPS: [CropKind; 4] = [
        CropKind::Wheat,
        CropKind::Carrot,
        CropKind::Potato,
        CropKind::Beetroot,
    ];

    for dx in -4_i32..=4 {
        for dz in -4_i32..=4 {
            let soil = Position::new(center.x.saturating_add(dx), center.y, center.z.saturating_add(dz));
            world.set(soil, CellState::block(Material::Farmland))?;

            let index = usize::try_from(dx.saturating_add(4)).unwrap_or(0) % CROPS.len();
            let kind = CROPS.get(index).copied().unwrap_or(CropKind::Wheat);
            let stage_seed = u8::try_from(dz.saturating_add(4).rem_euclid(4)).unwrap_or(0);
            let stage = stage_seed.min(kind.max_stage());
            world.set(soil.above(), CellState::Crop { kind, stage })?;
        }
    }

    let channel_x = center.x.saturating_add(5);
    let cane_x = center.x.saturating_add(6);
    for dz in -4_i32..=4 {
        let z = center.z.saturating_add(dz);
        world.set(Position::new(channel_x, center.y, z), CellState::block(Material::Water))?;
        world.set(Position::new(cane_x, center.y, z), CellState::block(Material::Sand))?;
        world.set(
            Position::new(cane_x, center.y.saturating_add(1), z),
            CellState::seedling(CropKind::SugarCane),
        )?;
    }
    Ok(())
}

/// A 5x5 pond, three cells deep, with open air above.
fn build_pond(world: &mut GridWorld, center: Position) -> Result<(), WorldError> {
    world.fill(
        Position::new(center.x.saturating_sub(2), center.y.saturating_sub(2), center.z.saturating_sub(2)),
        Position::new(center.x.saturating_add(2), center.y, center.z.saturating_add(2)),
        CellState::block(Material::Water),
    )
}

/// A 7x7 field of ice topped with snow, bordered by sand.
fn build_frost(world: &mut GridWorld, center: Position) -> Result<(), WorldError> {
    world.fill(
        Position::new(center.x.saturating_sub(4), center.y, center.z.saturating_sub(4)),
        Position::new(center.x.saturating_add(4), center.y, center.z.saturating_add(4)),
        CellState::block(Material::Sand),
    )?;
    world.fill(
        Position::new(center.x.saturating_sub(3), center.y, center.z.saturating_sub(3)),
        Position::new(center.x.saturating_add(3), center.y, center.z.saturating_add(3)),
        CellState::block(Material::Ice),
    )?;
    world.fill(
        Position::new(center.x.saturating_sub(1), center.y, center.z.saturating_sub(1)),
        Position::new(center.x.saturating_add(1), center.y, center.z.saturating_add(1)),
        CellState::block(Material::PackedIce),
    )?;
    world.fill(
        Position::new(center.x.saturating_sub(3), center.y.saturating_add(1), center.z.saturating_sub(3)),
        Position::new(center.x.saturating_add(3), center.y.saturating_add(1), center.z.saturating_add(3)),
        CellState::block(Material::Snow),
    )
}

/// A lava pool ringed with magma and netherrack, next to a burning tree.
fn build_lava_pool(world: &mut GridWorld, center: Position) -> Result<(), WorldError> {
    world.fill(
        Position::new(center.x.saturating_sub(4), center.y, center.z.saturating_sub(4)),
        Position::new(center.x.saturating_add(4), center.y, center.z.saturating_add(4)),
        CellState::block(Material::Netherrack),
    )?;
    world.fill(
        Position::new(center.x.saturating_sub(2), center.y, center.z.saturating_sub(2)),
        Position::new(center.x.saturating_add(2), center.y, center.z.saturating_add(2)),
        CellState::block(Material::Magma),
    )?;
    world.fill(
        Position::new(center.x.saturating_sub(1), center.y.saturating_sub(1), center.z.saturating_sub(1)),
        Position::new(center.x.saturating_add(1), center.y, center.z.saturating_add(1)),
        CellState::block(Material::Lava),
    )?;

    let trunk = Position::new(center.x.saturating_add(4), center.y.saturating_add(1), center.z);
    world.fill(
        trunk,
        trunk.offset(Offset::new(0, 2, 0)),
        CellState::block(Material::Log),
    )?;
    world.set(
        trunk.offset(Offset::new(0, 3, 0)),
        CellState::block(Material::Fire),
    )?;
    world.set(
        Position::new(center.x.saturating_sub(4), center.y.saturating_add(1), center.z),
        CellState::block(Material::Fire),
    )
}

/// A diagonal iron vein and a coal pocket through the stone below the
/// quarry center.
fn build_quarry(world: &mut GridWorld, center: Position) -> Result<(), WorldError> {
    for step in 0_i32..5 {
        world.set(
            Position::new(
                center.x.saturating_add(step),
                center.y.saturating_sub(step / 2),
                center.z.saturating_sub(step),
            ),
            CellState::Ore(OreKind::Iron),
        )?;
    }
    world.fill(
        Position::new(center.x.saturating_sub(6), center.y, center.z.saturating_add(4)),
        Position::new(center.x.saturating_sub(5), center.y.saturating_add(1), center.z.saturating_add(5)),
        CellState::Ore(OreKind::Coal),
    )
}

/// Sheep, cows, chickens, and pigs grazing around the pasture.
fn populate_pasture(world: &mut GridWorld, center: Position) {
    let herd = [
        (AnimalKind::Sheep, -3, -2),
        (AnimalKind::Sheep, -2, 2),
        (AnimalKind::Cow, 2, -3),
        (AnimalKind::Cow, 3, 1),
        (AnimalKind::Chicken, 0, 3),
        (AnimalKind::Chicken, 1, -1),
        (AnimalKind::Pig, -1, 0),
    ];
    for (kind, dx, dz) in herd {
        world.spawn_entity(
            EntityKind::Animal(kind),
            Position::new(center.x.saturating_add(dx), center.y, center.z.saturating_add(dz)),
            10.0,
        );
    }
}

/// Hostile creatures around the camp, a player standing guard, and hostile
/// projectiles in flight.
fn populate_hostile_camp(world: &mut GridWorld, center: Position) {
    for (dx, dz) in [(-3, -3), (3, -2), (-2, 3), (4, 4), (0, -4)] {
        world.spawn_entity(
            EntityKind::Hostile,
            Position::new(center.x.saturating_add(dx), center.y, center.z.saturating_add(dz)),
            20.0,
        );
    }
    world.spawn_entity(EntityKind::Player, center, 20.0);
    for (dx, dy, dz) in [(1, 2, 1), (-1, 3, 2), (2, 1, -2)] {
        world.spawn_entity(
            EntityKind::Projectile { hostile: true },
            Position::new(
                center.x.saturating_add(dx),
                center.y.saturating_add(dy),
                center.z.saturating_add(dz),
            ),
            0.0,
        );
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::access::World;

    #[test]
    fn demo_terrain_builds_and_loads_every_column() {
        let (world, sites) = create_demo_terrain().unwrap();

        assert_eq!(world.loaded_chunks().count(), 16);
        assert!(world.is_loaded(Position::new(-32, SURFACE_Y, -32)));
        assert!(world.is_loaded(Position::new(31, SURFACE_Y, 31)));
        assert!(!world.is_loaded(Position::new(32, SURFACE_Y, 0)));

        assert!(matches!(world.read(sites.farm.above()), CellState::Crop { .. }));
        assert!(world.read(sites.pond).is(Material::Water));
        assert!(world.read(sites.pond.above()).is_air());
        assert!(world.read(sites.frost).is(Material::PackedIce));
        assert!(world.read(sites.lava_pool).is(Material::Lava));
        assert_eq!(world.read(sites.quarry), CellState::Ore(OreKind::Iron));
        assert!(world.read(Position::new(0, FLOOR_Y, 0)).is(Material::Bedrock));
    }

    #[test]
    fn demo_terrain_populates_entities() {
        let (world, sites) = create_demo_terrain().unwrap();
        let animals = world
            .entities_in_radius(sites.pasture, 5)
            .into_iter()
            .filter(|e| matches!(e.kind, EntityKind::Animal(_)))
            .count();
        assert_eq!(animals, 7);

        let threats = world
            .entities_in_radius(sites.hostile_camp, 5)
            .into_iter()
            .filter(|e| e.kind.is_threat())
            .count();
        assert_eq!(threats, 8);
    }
}
