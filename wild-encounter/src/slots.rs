//! Slot selection against fixed cumulative breakpoints.
//!
//! Slot `k` owns the half-open draw interval `[cum[k-1], cum[k])`; the last
//! breakpoint of every category is its draw denominator.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::rng::RandomSource;
use crate::species::{Ability, ElementType, SpeciesCatalog};
use crate::table::EncounterTable;

pub const LAND_SLOT_COUNT: usize = 12;
pub const WATER_ROCK_SLOT_COUNT: usize = 4;
pub const HONEY_SLOT_COUNT: usize = 6;
pub const FISHING_SLOT_COUNT: usize = 10;

/// 20/20/10/10/10/10/5/5/4/4/1/1 percent.
pub const LAND_BREAKPOINTS: [u32; LAND_SLOT_COUNT] = [20, 40, 50, 60, 70, 80, 85, 90, 94, 98, 99, 100];
/// 60/30/5/5 percent.
pub const WATER_ROCK_BREAKPOINTS: [u32; WATER_ROCK_SLOT_COUNT] = [60, 90, 95, 100];
/// 30/30/20/10/5/5 percent.
pub const HONEY_BREAKPOINTS: [u32; HONEY_SLOT_COUNT] = [30, 60, 80, 90, 95, 100];
pub const OLD_ROD_BREAKPOINTS: [u32; 2] = [70, 100];
pub const GOOD_ROD_BREAKPOINTS: [u32; 3] = [60, 80, 100];
pub const SUPER_ROD_BREAKPOINTS: [u32; 5] = [40, 80, 95, 99, 100];

/// Shared denominator for every rod: one draw serves whichever rod is in use.
pub const FISHING_DRAW_TOTAL: u32 = max_u32(
    max_u32(total(&OLD_ROD_BREAKPOINTS), total(&GOOD_ROD_BREAKPOINTS)),
    total(&SUPER_ROD_BREAKPOINTS),
);

const fn total(breakpoints: &[u32]) -> u32 {
    breakpoints[breakpoints.len() - 1]
}

const fn max_u32(a: u32, b: u32) -> u32 {
    if a > b { a } else { b }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RodTier {
    Old,
    Good,
    Super,
}

impl RodTier {
    /// First fishing-table slot owned by this rod.
    #[must_use]
    pub const fn first_slot(self) -> usize {
        match self {
            Self::Old => 0,
            Self::Good => 2,
            Self::Super => 5,
        }
    }

    #[must_use]
    pub const fn breakpoints(self) -> &'static [u32] {
        match self {
            Self::Old => &OLD_ROD_BREAKPOINTS,
            Self::Good => &GOOD_ROD_BREAKPOINTS,
            Self::Super => &SUPER_ROD_BREAKPOINTS,
        }
    }
}

/// Slot selection category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotCategory {
    Land,
    WaterRock,
    Honey,
    Fishing(RodTier),
}

impl SlotCategory {
    /// Draw denominator for this category.
    #[must_use]
    pub const fn draw_total(self) -> u32 {
        match self {
            Self::Land => total(&LAND_BREAKPOINTS),
            Self::WaterRock => total(&WATER_ROCK_BREAKPOINTS),
            Self::Honey => total(&HONEY_BREAKPOINTS),
            Self::Fishing(_) => FISHING_DRAW_TOTAL,
        }
    }

    /// Map a draw in `[0, draw_total)` to a table slot index.
    #[must_use]
    pub fn slot_for_draw(self, draw: u32) -> usize {
        match self {
            Self::Land => interval_index(&LAND_BREAKPOINTS, draw),
            Self::WaterRock => interval_index(&WATER_ROCK_BREAKPOINTS, draw),
            Self::Honey => interval_index(&HONEY_BREAKPOINTS, draw),
            Self::Fishing(rod) => rod.first_slot() + interval_index(rod.breakpoints(), draw),
        }
    }
}

/// Index of the half-open interval containing `draw`; draws past the end land in the last slot.
#[must_use]
pub fn interval_index(breakpoints: &[u32], draw: u32) -> usize {
    breakpoints
        .partition_point(|cumulative| *cumulative <= draw)
        .min(breakpoints.len().saturating_sub(1))
}

/// Draw once and pick a slot for `category`.
pub fn select_slot<R: RandomSource + ?Sized>(category: SlotCategory, rng: &mut R) -> usize {
    let draw = rng.below(category.draw_total());
    let slot = category.slot_for_draw(draw);
    log::trace!("slot draw {draw} -> {category:?} slot {slot}");
    slot
}

/// Lead abilities that steer slot choice toward one type, in the order they are tried.
pub const TYPE_STEERING: [(Ability, ElementType); 6] = [
    (Ability::MagnetPull, ElementType::Steel),
    (Ability::Static, ElementType::Electric),
    (Ability::LightningRod, ElementType::Electric),
    (Ability::FlashFire, ElementType::Fire),
    (Ability::Harvest, ElementType::Grass),
    (Ability::StormDrain, ElementType::Water),
];

/// Try to steer the slot toward the lead ability's type.
///
/// Each matching pair costs one coin flip; a pair yields a slot only when some,
/// but not all, of the scanned slots carry the type.
pub fn steered_slot<C, R>(
    table: &EncounterTable,
    lead_ability: Option<Ability>,
    catalog: &C,
    rng: &mut R,
) -> Option<usize>
where
    C: SpeciesCatalog + ?Sized,
    R: RandomSource + ?Sized,
{
    let ability = lead_ability?;
    for (steering, element) in TYPE_STEERING {
        if ability != steering || rng.below(2) != 0 {
            continue;
        }
        if let Some(slot) = random_slot_with_type(table, element, catalog, rng) {
            log::trace!("{ability:?} steered slot {slot} toward {element:?}");
            return Some(slot);
        }
    }
    None
}

fn random_slot_with_type<C, R>(
    table: &EncounterTable,
    element: ElementType,
    catalog: &C,
    rng: &mut R,
) -> Option<usize>
where
    C: SpeciesCatalog + ?Sized,
    R: RandomSource + ?Sized,
{
    let scanned = table.len().min(LAND_SLOT_COUNT);
    let matching: SmallVec<[usize; LAND_SLOT_COUNT]> = table.slots()[..scanned]
        .iter()
        .enumerate()
        .filter(|(_, slot)| {
            catalog
                .species_info(slot.species)
                .is_some_and(|info| info.has_type(element))
        })
        .map(|(index, _)| index)
        .collect();

    if matching.is_empty() || matching.len() == scanned {
        return None;
    }
    let pick = rng.below(u32::try_from(matching.len()).unwrap_or(u32::MAX)) as usize;
    matching.get(pick).copied()
}
