//! Wild creature creation: rebalance, special forms, gender, and nature.
use serde::{Deserialize, Serialize};

use crate::nature::{FlavorBlock, pick_nature};
use crate::party::PartyMember;
use crate::rebalance::{Progression, RebalanceSettings, rebalance};
use crate::rng::RandomSource;
use crate::species::{Ability, Gender, MoveId, Nature, SpeciesCatalog, SpeciesId};

/// A freshly generated opposing creature, handed over to the party store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedCreature {
    pub species: SpeciesId,
    pub level: u8,
    pub nature: Nature,
    /// Forced gender; `None` leaves it to the creature's personality.
    pub gender: Option<Gender>,
    /// Fixed move set; only outbreak creatures carry one.
    pub moves: Option<[MoveId; 4]>,
}

impl GeneratedCreature {
    #[must_use]
    pub const fn with_moves(mut self, moves: [MoveId; 4]) -> Self {
        self.moves = Some(moves);
        self
    }
}

/// A species that appears in one of several cosmetic forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecialForm {
    pub base: SpeciesId,
    pub forms: [SpeciesId; 6],
}

impl SpecialForm {
    /// Roll one of seven outcomes for the base species: zero keeps it, the
    /// rest pick a form in order. Other species pass through without a draw.
    pub fn roll<R: RandomSource + ?Sized>(&self, species: SpeciesId, rng: &mut R) -> SpeciesId {
        if species != self.base {
            return species;
        }
        match rng.below(7) {
            0 => species,
            outcome => self.forms[outcome as usize - 1],
        }
    }
}

/// Player-side inputs that shape a new creature.
#[derive(Debug, Clone, Copy)]
pub struct CreationContext<'a> {
    pub party: &'a [PartyMember],
    pub in_safari: bool,
    pub flavor: Option<FlavorBlock>,
    pub progression: Progression,
}

impl CreationContext<'_> {
    #[must_use]
    pub fn lead(&self) -> Option<&PartyMember> {
        self.party.first()
    }
}

/// Build the opposing creature for `species` at `level`.
///
/// Order of draws: rebalance (uniform mode only), the attraction roll, then nature.
pub fn create_creature<C, R>(
    species: SpeciesId,
    level: u8,
    settings: &RebalanceSettings,
    context: &CreationContext<'_>,
    catalog: &C,
    rng: &mut R,
) -> GeneratedCreature
where
    C: SpeciesCatalog + ?Sized,
    R: RandomSource + ?Sized,
{
    let species = rebalance(species, settings, context.progression, catalog, rng);
    let lead = context.lead();

    let gendered = catalog
        .species_info(species)
        .is_some_and(|info| info.gender_ratio.has_gender_choice());
    let charmer = lead.filter(|member| member.active_ability() == Some(Ability::CuteCharm));

    let mut gender = None;
    if let Some(charmer) = charmer.filter(|_| gendered) {
        if rng.below(3) != 0 {
            let lead_gender = catalog.gender_of(charmer.species, charmer.personality);
            gender = Some(if lead_gender == Gender::Female {
                Gender::Male
            } else {
                Gender::Female
            });
        }
    }

    let nature = pick_nature(context.in_safari, context.flavor.as_ref(), lead, rng);
    GeneratedCreature {
        species,
        level,
        nature,
        gender,
        moves: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rebalance::{RebalanceMode, RebalanceRoster};
    use crate::rng::ScriptedRolls;
    use crate::species::{ElementType, GenderRatio, SpeciesInfo, SpeciesTable};

    fn catalog() -> SpeciesTable {
        let mut table = SpeciesTable::new();
        let base = SpeciesInfo {
            base_stat_total: 320,
            types: [ElementType::Normal, ElementType::Fairy],
            gender_ratio: GenderRatio::Mixed(191),
        };
        table.insert(SpeciesId(35), "CLEFAIRY", base);
        table.insert(
            SpeciesId(81),
            "MAGNEMITE",
            SpeciesInfo {
                gender_ratio: GenderRatio::Genderless,
                ..base
            },
        );
        table
    }

    fn off() -> RebalanceSettings {
        RebalanceSettings::new(RebalanceMode::Disabled, RebalanceRoster::default())
    }

    #[test]
    fn cute_charm_forces_opposite_gender() {
        let catalog = catalog();
        // personality low byte 0 -> female lead under Mixed(191)
        let party = [PartyMember::new(SpeciesId(35), 20, Ability::CuteCharm)];
        let context = CreationContext {
            party: &party,
            in_safari: false,
            flavor: None,
            progression: Progression::default(),
        };
        let mut rolls = ScriptedRolls::new([1, 4]);
        let creature = create_creature(SpeciesId(35), 12, &off(), &context, &catalog, &mut rolls);
        assert_eq!(creature.gender, Some(Gender::Male));
        assert_eq!(creature.nature, Nature::Naughty);
        assert_eq!(creature.moves, None);
    }

    #[test]
    fn cute_charm_fails_on_a_third() {
        let catalog = catalog();
        let party = [PartyMember::new(SpeciesId(35), 20, Ability::CuteCharm).with_personality(0xFF)];
        let context = CreationContext {
            party: &party,
            in_safari: false,
            flavor: None,
            progression: Progression::default(),
        };
        let mut rolls = ScriptedRolls::new([3, 0]);
        let creature = create_creature(SpeciesId(35), 12, &off(), &context, &catalog, &mut rolls);
        assert_eq!(creature.gender, None);
        assert_eq!(rolls.consumed(), 2);
    }

    #[test]
    fn genderless_species_skip_the_attraction_roll() {
        let catalog = catalog();
        let party = [PartyMember::new(SpeciesId(35), 20, Ability::CuteCharm)];
        let context = CreationContext {
            party: &party,
            in_safari: false,
            flavor: None,
            progression: Progression::default(),
        };
        let mut rolls = ScriptedRolls::new([7]);
        let creature = create_creature(SpeciesId(81), 12, &off(), &context, &catalog, &mut rolls);
        assert_eq!(creature.gender, None);
        assert_eq!(creature.nature, Nature::Relaxed);
        assert_eq!(rolls.consumed(), 1);
    }

    #[test]
    fn special_form_rolls_seven_ways() {
        let form = SpecialForm {
            base: SpeciesId(774),
            forms: [1, 2, 3, 4, 5, 6].map(|n| SpeciesId(1000 + n)),
        };
        let mut rolls = ScriptedRolls::new([0, 1, 6, 13]);
        assert_eq!(form.roll(SpeciesId(774), &mut rolls), SpeciesId(774));
        assert_eq!(form.roll(SpeciesId(774), &mut rolls), SpeciesId(1001));
        assert_eq!(form.roll(SpeciesId(774), &mut rolls), SpeciesId(1006));
        assert_eq!(form.roll(SpeciesId(774), &mut rolls), SpeciesId(1006));
        assert_eq!(form.roll(SpeciesId(12), &mut rolls), SpeciesId(12));
        assert_eq!(rolls.consumed(), 4);
    }
}
