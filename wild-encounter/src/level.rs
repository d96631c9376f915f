//! Wild level scaling relative to the player's party.
use crate::party::{PARTY_SIZE, PartyMember};
use crate::rng::RandomSource;

/// Wild levels stay in this band while the party median is below [`LOW_MEDIAN_CUTOFF`].
pub const LOW_LEVEL_BAND: LevelBounds = LevelBounds { min: 2, max: 4 };
pub const LOW_MEDIAN_CUTOFF: u8 = 8;

/// Sorted party levels, zero-padded to a full party. Eggs sit in the buffer as
/// level 1 but do not count as battlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartyLevelSample {
    levels: [u8; PARTY_SIZE],
    battlers: usize,
    lead_level: u8,
}

impl PartyLevelSample {
    #[must_use]
    pub fn from_party(party: &[PartyMember]) -> Self {
        let mut levels = [0_u8; PARTY_SIZE];
        for (slot, member) in levels.iter_mut().zip(party.iter()) {
            *slot = if member.is_egg { 1 } else { member.level };
        }
        levels.sort_unstable();
        let battlers = party.iter().take(PARTY_SIZE).filter(|member| !member.is_egg).count();
        let lead_level = party.first().map_or(0, |member| member.level);
        Self {
            levels,
            battlers,
            lead_level,
        }
    }

    /// Build directly from battler levels; useful when no full party snapshot exists.
    #[must_use]
    pub fn from_levels(raw: &[u8]) -> Self {
        let mut levels = [0_u8; PARTY_SIZE];
        let battlers = raw.len().min(PARTY_SIZE);
        levels[..battlers].copy_from_slice(&raw[..battlers]);
        levels.sort_unstable();
        Self {
            levels,
            battlers,
            lead_level: raw.first().copied().unwrap_or(0),
        }
    }

    /// Members that are not eggs.
    #[must_use]
    pub const fn battlers(&self) -> usize {
        self.battlers
    }

    /// Upper median of the battler levels. A lone battler short-circuits to
    /// the lead's level. Padding and eggs sort to the front, so the index
    /// skips them.
    #[must_use]
    pub fn median(&self) -> u8 {
        match self.battlers {
            0 => 0,
            1 => self.lead_level,
            count => self.levels[count / 2 + (PARTY_SIZE - count)],
        }
    }
}

/// Inclusive wild level range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelBounds {
    pub min: u8,
    pub max: u8,
}

impl LevelBounds {
    #[must_use]
    pub const fn from_median(median: u8) -> Self {
        if median < LOW_MEDIAN_CUTOFF {
            LOW_LEVEL_BAND
        } else {
            Self {
                min: median - 6,
                max: median - 3,
            }
        }
    }

    #[must_use]
    pub const fn span(self) -> u32 {
        (self.max - self.min) as u32 + 1
    }

    #[must_use]
    pub const fn contains(self, level: u8) -> bool {
        level >= self.min && level <= self.max
    }
}

/// Roll a wild level scaled to the party median.
///
/// A lead with Hustle, Vital Spirit, or Pressure wins a coin flip for the top
/// of the range and otherwise shifts the roll down by one.
pub fn choose_level<R: RandomSource + ?Sized>(party: &[PartyMember], rng: &mut R) -> u8 {
    let median = PartyLevelSample::from_party(party).median();
    let bounds = LevelBounds::from_median(median);
    let mut offset = rng.below(bounds.span()) as u8;

    let lead_raises = party
        .first()
        .and_then(PartyMember::active_ability)
        .is_some_and(|ability| ability.raises_wild_level());
    if lead_raises {
        if rng.below(2) == 0 {
            log::trace!("lead ability pinned wild level to {}", bounds.max);
            return bounds.max;
        }
        offset = offset.saturating_sub(1);
    }

    bounds.min + offset
}
