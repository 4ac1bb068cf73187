//! Per-tile cell state
//!
//! A [`Cell`] is plain data: a discrete growth stage, five continuous fields kept in
//! `[0, 1]`, and the fire flag with its remaining fuel. All behaviour lives in the
//! solver passes and the grid.

use serde::{Deserialize, Serialize};

/// Default water level for a freshly created cell
pub const DEFAULT_WATER: f32 = 0.2;
/// Default sunlight level for a freshly created cell
pub const DEFAULT_SUNLIGHT: f32 = 0.8;
/// Default heat level for a freshly created cell
pub const DEFAULT_HEAT: f32 = 0.1;
/// Default durability for a freshly created cell
pub const DEFAULT_DURABILITY: f32 = 1.0;
/// Default success (fitness) for a freshly created cell
pub const DEFAULT_SUCCESS: f32 = 0.5;

/// Discrete growth level of the plant occupying a cell
///
/// Progression is strictly forward (`Empty → SmallPlant → SmallTree → MediumTree →
/// LargeTree`). `Burnt` is reached only through fire and is terminal until the cell is
/// reseeded from outside the tick pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum GrowthStage {
    /// Bare ground
    #[default]
    Empty = 0,
    /// Seedling
    SmallPlant = 1,
    /// Sapling
    SmallTree = 2,
    /// Established tree
    MediumTree = 3,
    /// Mature tree; shades its neighbours
    LargeTree = 4,
    /// Burn scar
    Burnt = 5,
}

impl GrowthStage {
    /// All stages in declaration order
    pub const ALL: [GrowthStage; 6] = [
        GrowthStage::Empty,
        GrowthStage::SmallPlant,
        GrowthStage::SmallTree,
        GrowthStage::MediumTree,
        GrowthStage::LargeTree,
        GrowthStage::Burnt,
    ];

    /// True for every stage that carries a living plant
    #[inline]
    pub fn has_plant(self) -> bool {
        !matches!(self, GrowthStage::Empty | GrowthStage::Burnt)
    }

    /// The stage one growth step further, if any
    pub fn next(self) -> Option<Self> {
        match self {
            GrowthStage::SmallPlant => Some(GrowthStage::SmallTree),
            GrowthStage::SmallTree => Some(GrowthStage::MediumTree),
            GrowthStage::MediumTree => Some(GrowthStage::LargeTree),
            GrowthStage::Empty | GrowthStage::LargeTree | GrowthStage::Burnt => None,
        }
    }

    /// Convert from u8 for FFI compatibility
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.get(usize::from(value)).copied()
    }

    /// Convert to u8 for FFI compatibility
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Human-readable name
    pub fn name(self) -> &'static str {
        match self {
            GrowthStage::Empty => "Empty",
            GrowthStage::SmallPlant => "Small Plant",
            GrowthStage::SmallTree => "Small Tree",
            GrowthStage::MediumTree => "Medium Tree",
            GrowthStage::LargeTree => "Large Tree",
            GrowthStage::Burnt => "Burnt",
        }
    }
}

/// State of one grid tile
///
/// Continuous fields are normalised to `[0, 1]`; the engine clamps them on every
/// commit. `success` is a slow-moving fitness signal and `durability` a slow-moving
/// health signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Growth stage
    pub stage: GrowthStage,
    /// Soil water (0-1)
    pub water: f32,
    /// Light reaching the ground (0-1)
    pub sunlight: f32,
    /// Temperature signal (0-1)
    pub heat: f32,
    /// Plant health (0-1)
    pub durability: f32,
    /// Plant fitness (0-1)
    pub success: f32,
    /// Whether the tile is currently burning
    pub is_on_fire: bool,
    /// Fuel left for an active fire (0-1)
    pub fire_fuel: f32,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            stage: GrowthStage::Empty,
            water: DEFAULT_WATER,
            sunlight: DEFAULT_SUNLIGHT,
            heat: DEFAULT_HEAT,
            durability: DEFAULT_DURABILITY,
            success: DEFAULT_SUCCESS,
            is_on_fire: false,
            fire_fuel: 0.0,
        }
    }
}

impl Cell {
    /// True when a living plant occupies the tile
    #[inline]
    pub fn has_plant(&self) -> bool {
        self.stage.has_plant()
    }

    /// Set the tile burning with at least `fuel` left to burn
    #[inline]
    pub fn ignite(&mut self, fuel: f32) {
        self.is_on_fire = true;
        self.fire_fuel = self.fire_fuel.max(fuel);
    }

    /// Put out the fire and drop any remaining fuel
    #[inline]
    pub fn extinguish(&mut self) {
        self.is_on_fire = false;
        self.fire_fuel = 0.0;
    }

    /// Turn the tile into a burn scar
    pub fn scorch(&mut self) {
        self.extinguish();
        self.stage = GrowthStage::Burnt;
        self.durability = 0.0;
    }

    /// Plant a seedling; only bare or burnt ground accepts a seed
    ///
    /// Returns `true` when the seed took.
    pub fn plant_seed(&mut self) -> bool {
        if matches!(self.stage, GrowthStage::Empty | GrowthStage::Burnt) {
            self.stage = GrowthStage::SmallPlant;
            self.durability = 1.0;
            true
        } else {
            false
        }
    }

    /// Clamp every continuous field to `[0, 1]` and enforce `Burnt ⇒ durability == 0`
    pub fn clamp_fields(&mut self) {
        self.water = clamp_unit(self.water);
        self.sunlight = clamp_unit(self.sunlight);
        self.heat = clamp_unit(self.heat);
        self.durability = clamp_unit(self.durability);
        self.success = clamp_unit(self.success);
        self.fire_fuel = clamp_unit(self.fire_fuel);
        if self.stage == GrowthStage::Burnt {
            self.durability = 0.0;
        }
    }

    /// True when every continuous field lies in `[0, 1]`
    pub fn fields_in_range(&self) -> bool {
        [
            self.water,
            self.sunlight,
            self.heat,
            self.durability,
            self.success,
            self.fire_fuel,
        ]
        .iter()
        .all(|v| (0.0..=1.0).contains(v))
    }
}

/// Clamp to `[0, 1]`, mapping NaN to 0
#[inline]
pub fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_cell_values() {
        let cell = Cell::default();
        assert_eq!(cell.stage, GrowthStage::Empty);
        assert_eq!(cell.water, 0.2);
        assert_eq!(cell.sunlight, 0.8);
        assert_eq!(cell.heat, 0.1);
        assert_eq!(cell.durability, 1.0);
        assert_eq!(cell.success, 0.5);
        assert!(!cell.is_on_fire);
        assert!(!cell.has_plant());
    }

    #[test]
    fn test_stage_progression() {
        assert_eq!(GrowthStage::SmallPlant.next(), Some(GrowthStage::SmallTree));
        assert_eq!(GrowthStage::MediumTree.next(), Some(GrowthStage::LargeTree));
        assert_eq!(GrowthStage::LargeTree.next(), None);
        assert_eq!(GrowthStage::Burnt.next(), None);
        assert_eq!(GrowthStage::Empty.next(), None);
    }

    #[test]
    fn test_stage_u8_conversion() {
        for stage in GrowthStage::ALL {
            assert_eq!(GrowthStage::from_u8(stage.as_u8()), Some(stage));
        }
        assert_eq!(GrowthStage::from_u8(6), None);
    }

    #[test]
    fn test_plant_seed_only_on_bare_ground() {
        let mut cell = Cell::default();
        assert!(cell.plant_seed());
        assert_eq!(cell.stage, GrowthStage::SmallPlant);

        cell.stage = GrowthStage::MediumTree;
        assert!(!cell.plant_seed());
        assert_eq!(cell.stage, GrowthStage::MediumTree);

        cell.scorch();
        assert!(cell.plant_seed());
        assert_eq!(cell.durability, 1.0);
    }

    #[test]
    fn test_ignite_keeps_larger_fuel() {
        let mut cell = Cell::default();
        cell.fire_fuel = 0.9;
        cell.ignite(0.8);
        assert!(cell.is_on_fire);
        assert_eq!(cell.fire_fuel, 0.9);
    }

    #[test]
    fn test_clamp_fields_enforces_burnt_durability() {
        let mut cell = Cell {
            stage: GrowthStage::Burnt,
            water: 1.4,
            sunlight: -0.2,
            heat: f32::NAN,
            durability: 0.7,
            success: 0.3,
            is_on_fire: false,
            fire_fuel: 0.0,
        };
        cell.clamp_fields();
        assert_eq!(cell.water, 1.0);
        assert_eq!(cell.sunlight, 0.0);
        assert_eq!(cell.heat, 0.0);
        assert_eq!(cell.durability, 0.0);
        assert!(cell.fields_in_range());
    }
}
