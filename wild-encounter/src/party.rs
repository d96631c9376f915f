//! Player party members as seen by the encounter pipeline.
use serde::{Deserialize, Serialize};

use crate::species::{Ability, HeldItem, Nature, SpeciesId};

pub const PARTY_SIZE: usize = 6;

/// Read-only snapshot of one party slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyMember {
    pub species: SpeciesId,
    pub level: u8,
    pub ability: Ability,
    #[serde(default)]
    pub held_item: Option<HeldItem>,
    #[serde(default)]
    pub is_egg: bool,
    pub hp: u16,
    pub nature: Nature,
    #[serde(default)]
    pub personality: u32,
}

impl PartyMember {
    #[must_use]
    pub const fn new(species: SpeciesId, level: u8, ability: Ability) -> Self {
        Self {
            species,
            level,
            ability,
            held_item: None,
            is_egg: false,
            hp: 1,
            nature: Nature::Hardy,
            personality: 0,
        }
    }

    #[must_use]
    pub const fn egg(species: SpeciesId) -> Self {
        Self {
            species,
            level: 1,
            ability: Ability::Other(0),
            held_item: None,
            is_egg: true,
            hp: 0,
            nature: Nature::Hardy,
            personality: 0,
        }
    }

    #[must_use]
    pub const fn with_held_item(mut self, item: HeldItem) -> Self {
        self.held_item = Some(item);
        self
    }

    #[must_use]
    pub const fn with_nature(mut self, nature: Nature) -> Self {
        self.nature = nature;
        self
    }

    #[must_use]
    pub const fn with_hp(mut self, hp: u16) -> Self {
        self.hp = hp;
        self
    }

    #[must_use]
    pub const fn with_personality(mut self, personality: u32) -> Self {
        self.personality = personality;
        self
    }

    /// Can this member take part in a battle.
    #[must_use]
    pub const fn is_usable(&self) -> bool {
        self.hp > 0 && !self.is_egg
    }

    /// Ability that is allowed to affect encounters: eggs contribute none.
    #[must_use]
    pub const fn active_ability(&self) -> Option<Ability> {
        if self.is_egg { None } else { Some(self.ability) }
    }
}

/// Level of the first member that has HP and is not an egg.
#[must_use]
pub fn first_usable_level(party: &[PartyMember]) -> Option<u8> {
    party
        .iter()
        .take(PARTY_SIZE)
        .find(|member| member.is_usable())
        .map(|member| member.level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_usable_skips_fainted_and_eggs() {
        let party = vec![
            PartyMember::egg(SpeciesId(1)),
            PartyMember::new(SpeciesId(2), 40, Ability::Other(1)).with_hp(0),
            PartyMember::new(SpeciesId(3), 18, Ability::Other(1)),
        ];
        assert_eq!(first_usable_level(&party), Some(18));
        assert_eq!(first_usable_level(&party[..2]), None);
    }

    #[test]
    fn eggs_never_expose_abilities() {
        let mut member = PartyMember::new(SpeciesId(5), 10, Ability::Synchronize);
        assert_eq!(member.active_ability(), Some(Ability::Synchronize));
        member.is_egg = true;
        assert_eq!(member.active_ability(), None);
    }
}
