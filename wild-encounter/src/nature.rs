//! Nature selection for freshly generated wild creatures.
use serde::{Deserialize, Serialize};

use crate::party::PartyMember;
use crate::rng::RandomSource;
use crate::species::{Ability, FLAVOR_COUNT, Flavor, NATURE_COUNT, Nature};

/// Percent chance that an active flavor item steers the nature in the safari zone.
pub const FLAVOR_STEER_PERCENT: u32 = 80;

/// Flavor strengths of the treat currently placed in the safari zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FlavorBlock {
    /// Strength per flavor in block order: spicy, dry, sweet, bitter, sour.
    pub flavors: [u8; FLAVOR_COUNT],
}

impl FlavorBlock {
    #[must_use]
    pub const fn new(flavors: [u8; FLAVOR_COUNT]) -> Self {
        Self { flavors }
    }

    #[must_use]
    pub const fn strength(&self, flavor: Flavor) -> u8 {
        self.flavors[flavor as usize]
    }

    /// Preference gain: liked flavors add their strength, disliked ones subtract it.
    #[must_use]
    pub fn gain_for(&self, nature: Nature) -> i32 {
        let liked = nature
            .liked_flavor()
            .map_or(0, |flavor| i32::from(self.strength(flavor)));
        let disliked = nature
            .disliked_flavor()
            .map_or(0, |flavor| i32::from(self.strength(flavor)));
        liked - disliked
    }
}

/// Choose a nature. First match wins: flavor steering in the safari zone,
/// a Synchronize lead, then a uniform roll.
pub fn pick_nature<R: RandomSource + ?Sized>(
    in_safari: bool,
    flavor: Option<&FlavorBlock>,
    lead: Option<&PartyMember>,
    rng: &mut R,
) -> Nature {
    if in_safari && rng.below(100) < FLAVOR_STEER_PERCENT {
        if let Some(block) = flavor {
            if let Some(nature) = flavor_steered_nature(block, rng) {
                log::trace!("flavor steered nature to {nature:?}");
                return nature;
            }
        }
    }

    if let Some(member) = lead {
        if member.active_ability() == Some(Ability::Synchronize) {
            return member.nature;
        }
    }

    Nature::from_index(rng.below(NATURE_COUNT as u32))
}

/// Shuffle natures with pairwise coin-flip swaps and take the first one that
/// enjoys the block. Costs 300 draws regardless of outcome.
fn flavor_steered_nature<R: RandomSource + ?Sized>(
    block: &FlavorBlock,
    rng: &mut R,
) -> Option<Nature> {
    let mut order = Nature::ALL;
    for i in 0..NATURE_COUNT - 1 {
        for j in i + 1..NATURE_COUNT {
            if rng.below(2) == 1 {
                order.swap(i, j);
            }
        }
    }
    order.into_iter().find(|nature| block.gain_for(*nature) > 0)
}
