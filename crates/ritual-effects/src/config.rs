//! Per-variant tunables.
//!
//! Every variant section shares the same four settings (enable flag, search
//! range, store capacity, potency multiplier) plus its own knobs. Sections
//! deserialize with defaults for anything missing, and [`EffectsConfig::sanitized`]
//! clamps out-of-range values to safe minimums once at load time, so the
//! tick loop never sees a misconfiguration.

use ritual_types::VariantKind;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Default broadcast radius for effect events, in cells.
pub const DEFAULT_BROADCAST_RADIUS: u32 = 32;

/// Smallest accepted decay step for a repetition chain.
pub const MIN_REPETITION_STEP: f32 = 0.01;

// ---------------------------------------------------------------------------
// Shared settings
// ---------------------------------------------------------------------------

/// The settings every variant has.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariantConfig {
    /// Whether the variant runs at all.
    pub enabled: bool,
    /// Half-width of the candidate search cube.
    pub search_range: u32,
    /// Candidate store capacity.
    pub max_count: usize,
    /// Multiplier applied to incoming strength.
    pub potency_multiplier: f32,
}

impl VariantConfig {
    /// Clamp the settings to safe values, logging every correction.
    #[must_use]
    pub fn sanitized(self, variant: VariantKind) -> Self {
        let mut clamped = self;
        if clamped.search_range == 0 {
            warn!(%variant, "search_range of 0 clamped to 1");
            clamped.search_range = 1;
        }
        if clamped.max_count == 0 {
            warn!(%variant, "max_count of 0 clamped to 1");
            clamped.max_count = 1;
        }
        if !clamped.potency_multiplier.is_finite() || clamped.potency_multiplier < 0.0 {
            warn!(%variant, value = clamped.potency_multiplier, "potency_multiplier clamped to 0");
            clamped.potency_multiplier = 0.0;
        }
        clamped
    }
}

/// Replace a repetition step that is not finite or below [`MIN_REPETITION_STEP`].
fn step_or(value: f32, fallback: f32, variant: VariantKind, field: &str) -> f32 {
    if value.is_finite() && value >= MIN_REPETITION_STEP {
        value
    } else {
        warn!(%variant, field, value, fallback, min = MIN_REPETITION_STEP, "repetition step replaced");
        fallback
    }
}

/// Replace a value that is not a finite non-negative number.
fn non_negative_or(value: f32, fallback: f32, variant: VariantKind, field: &str) -> f32 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        warn!(%variant, field, value, fallback, "negative value replaced");
        fallback
    }
}

/// Replace a zero tick count.
fn at_least_one(value: u32, variant: VariantKind, field: &str) -> u32 {
    if value == 0 {
        warn!(%variant, field, "value of 0 clamped to 1");
        1
    } else {
        value
    }
}

/// Generates a variant section: the shared settings with per-variant
/// defaults, the variant's own knobs, and the accessor for the shared part.
macro_rules! variant_section {
    (
        $(#[$meta:meta])*
        $name:ident($variant:expr) {
            search_range: $range:expr,
            max_count: $capacity:expr,
            $(
                $(#[$field_meta:meta])*
                $field:ident: $ty:ty = $default:expr,
            )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(default)]
        pub struct $name {
            /// Whether the variant runs at all (default: true).
            pub enabled: bool,
            #[doc = concat!("Half-width of the candidate search cube (default: ", stringify!($range), ").")]
            pub search_range: u32,
            #[doc = concat!("Candidate store capacity (default: ", stringify!($capacity), ").")]
            pub max_count: usize,
            /// Multiplier applied to incoming strength (default: 1.0).
            pub potency_multiplier: f32,
            $(
                $(#[$field_meta])*
                pub $field: $ty,
            )*
        }

        impl Default for $name {
            fn default() -> Self {
                Self {
                    enabled: true,
                    search_range: $range,
                    max_count: $capacity,
                    potency_multiplier: 1.0,
                    $($field: $default,)*
                }
            }
        }

        impl $name {
            /// The settings shared by every variant.
            pub const fn base(&self) -> VariantConfig {
                VariantConfig {
                    enabled: self.enabled,
                    search_range: self.search_range,
                    max_count: self.max_count,
                    potency_multiplier: self.potency_multiplier,
                }
            }

            fn sanitize_base(&mut self) {
                let clamped = self.base().sanitized($variant);
                self.search_range = clamped.search_range;
                self.max_count = clamped.max_count;
                self.potency_multiplier = clamped.potency_multiplier;
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Variant sections
// ---------------------------------------------------------------------------

variant_section! {
    /// Crop growth.
    GrowthConfig(VariantKind::Growth) {
        search_range: 4,
        max_count: 20,
        /// Decay step of the extra-growth repetition chain (default: 0.2).
        repetition_step: f32 = 0.2,
    }
}

variant_section! {
    /// Projectile and hostile suppression.
    ProtectionConfig(VariantKind::Protection) {
        search_range: 6,
        max_count: 16,
        /// Duration of slowness and weakness on repelled hostiles (default: 100).
        repel_ticks: u32 = 100,
        /// Duration of resistance on warded players and animals (default: 200).
        ward_ticks: u32 = 200,
        /// Radius around the sampled cell whose hostiles are empowered when
        /// corrupted (default: 3).
        corruption_radius: u32 = 3,
    }
}

variant_section! {
    /// Progressive melting.
    MeltConfig(VariantKind::Melt) {
        search_range: 3,
        max_count: 10,
        /// Ticks of progress needed to melt frost; sand takes twice and rock
        /// three times as long (default: 6).
        melt_duration: u32 = 6,
    }
}

variant_section! {
    /// Fishing from open water.
    FishingConfig(VariantKind::Fishing) {
        search_range: 3,
        max_count: 8,
        /// Timer value at which a catch drops (default: 20).
        catch_ticks: u32 = 20,
        /// Decay step of the timer repetition chain (default: 0.1).
        repetition_step: f32 = 0.1,
    }
}

variant_section! {
    /// Ore formation.
    OreGenerationConfig(VariantKind::OreGeneration) {
        search_range: 4,
        max_count: 12,
        /// Only convert stone whose six neighbours are all solid (default: true).
        require_enclosed: bool = true,
    }
}

variant_section! {
    /// Controlled block removal.
    ExcavationConfig(VariantKind::Excavation) {
        search_range: 3,
        max_count: 16,
        /// Hardest block the benign branch removes (default: 3.0).
        max_hardness: f32 = 3.0,
        /// Most blast-resistant block the corrupted branch shatters (default: 6.0).
        max_blast_resistance: f32 = 6.0,
    }
}

variant_section! {
    /// Animal product harvesting.
    HerdingConfig(VariantKind::Herding) {
        search_range: 5,
        max_count: 12,
        /// Chance that a picked animal drops its product (default: 0.25).
        drop_chance: f32 = 0.25,
        /// Damage dealt to each animal near the sampled cell when corrupted
        /// (default: 2.0).
        corruption_damage: f32 = 2.0,
        /// Radius around the sampled cell whose animals are hurt (default: 3).
        corruption_radius: u32 = 3,
    }
}

variant_section! {
    /// Damage against hostiles.
    SmitingConfig(VariantKind::Smiting) {
        search_range: 6,
        max_count: 12,
        /// Damage per strike (default: 4.0).
        damage: f32 = 4.0,
        /// Radius around the sampled cell whose living entities are struck
        /// when corrupted (default: 2).
        corruption_radius: u32 = 2,
    }
}

variant_section! {
    /// Cleansing of hazardous terrain.
    PurificationConfig(VariantKind::Purification) {
        search_range: 4,
        max_count: 16,
    }
}

impl GrowthConfig {
    fn sanitize(&mut self) {
        self.sanitize_base();
        self.repetition_step = step_or(self.repetition_step, 0.2, VariantKind::Growth, "repetition_step");
    }
}

impl ProtectionConfig {
    fn sanitize(&mut self) {
        self.sanitize_base();
        self.repel_ticks = at_least_one(self.repel_ticks, VariantKind::Protection, "repel_ticks");
        self.ward_ticks = at_least_one(self.ward_ticks, VariantKind::Protection, "ward_ticks");
    }
}

impl MeltConfig {
    fn sanitize(&mut self) {
        self.sanitize_base();
        self.melt_duration = at_least_one(self.melt_duration, VariantKind::Melt, "melt_duration");
    }
}

impl FishingConfig {
    fn sanitize(&mut self) {
        self.sanitize_base();
        self.catch_ticks = at_least_one(self.catch_ticks, VariantKind::Fishing, "catch_ticks");
        self.repetition_step = step_or(self.repetition_step, 0.1, VariantKind::Fishing, "repetition_step");
    }
}

impl OreGenerationConfig {
    fn sanitize(&mut self) {
        self.sanitize_base();
    }
}

impl ExcavationConfig {
    fn sanitize(&mut self) {
        self.sanitize_base();
        let kind = VariantKind::Excavation;
        self.max_hardness = non_negative_or(self.max_hardness, 0.0, kind, "max_hardness");
        self.max_blast_resistance =
            non_negative_or(self.max_blast_resistance, 0.0, kind, "max_blast_resistance");
    }
}

impl HerdingConfig {
    fn sanitize(&mut self) {
        self.sanitize_base();
        let kind = VariantKind::Herding;
        self.drop_chance = non_negative_or(self.drop_chance, 0.0, kind, "drop_chance").min(1.0);
        self.corruption_damage = non_negative_or(self.corruption_damage, 0.0, kind, "corruption_damage");
    }
}

impl SmitingConfig {
    fn sanitize(&mut self) {
        self.sanitize_base();
        self.damage = non_negative_or(self.damage, 0.0, VariantKind::Smiting, "damage");
    }
}

impl PurificationConfig {
    fn sanitize(&mut self) {
        self.sanitize_base();
    }
}

// ---------------------------------------------------------------------------
// All effects
// ---------------------------------------------------------------------------

/// Settings for every variant plus the shared broadcast radius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectsConfig {
    /// Delivery radius for effect events (default: 32).
    pub broadcast_radius: u32,
    /// Crop growth.
    pub growth: GrowthConfig,
    /// Projectile and hostile suppression.
    pub protection: ProtectionConfig,
    /// Progressive melting.
    pub melt: MeltConfig,
    /// Fishing.
    pub fishing: FishingConfig,
    /// Ore formation.
    pub ore_generation: OreGenerationConfig,
    /// Controlled block removal.
    pub excavation: ExcavationConfig,
    /// Animal product harvesting.
    pub herding: HerdingConfig,
    /// Damage against hostiles.
    pub smiting: SmitingConfig,
    /// Cleansing of hazardous terrain.
    pub purification: PurificationConfig,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            broadcast_radius: DEFAULT_BROADCAST_RADIUS,
            growth: GrowthConfig::default(),
            protection: ProtectionConfig::default(),
            melt: MeltConfig::default(),
            fishing: FishingConfig::default(),
            ore_generation: OreGenerationConfig::default(),
            excavation: ExcavationConfig::default(),
            herding: HerdingConfig::default(),
            smiting: SmitingConfig::default(),
            purification: PurificationConfig::default(),
        }
    }
}

impl EffectsConfig {
    /// The shared settings of one variant.
    pub const fn variant(&self, kind: VariantKind) -> VariantConfig {
        match kind {
            VariantKind::Growth => self.growth.base(),
            VariantKind::Protection => self.protection.base(),
            VariantKind::Melt => self.melt.base(),
            VariantKind::Fishing => self.fishing.base(),
            VariantKind::OreGeneration => self.ore_generation.base(),
            VariantKind::Excavation => self.excavation.base(),
            VariantKind::Herding => self.herding.base(),
            VariantKind::Smiting => self.smiting.base(),
            VariantKind::Purification => self.purification.base(),
        }
    }

    /// Clamp every section to safe values.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        self.growth.sanitize();
        self.protection.sanitize();
        self.melt.sanitize();
        self.fishing.sanitize();
        self.ore_generation.sanitize();
        self.excavation.sanitize();
        self.herding.sanitize();
        self.smiting.sanitize();
        self.purification.sanitize();
        self
    }
}
