//! Per-step encounter-rate evaluation.
use crate::rng::RandomSource;
use crate::species::{Ability, HeldItem};
use crate::world::Weather;

/// Denominator of the rate roll; final rates are clamped here.
pub const RATE_CEILING: u32 = 2880;
/// Table rates are stored on a coarse scale.
pub const RATE_SCALE: u32 = 16;

/// Everything that modifies a table's base rate on one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateInputs {
    pub base_rate: u8,
    pub cycling: bool,
    pub encounter_up: bool,
    pub encounter_down: bool,
    pub lead_item: Option<HeldItem>,
    /// Lead ability, or `None` when abilities are ignored or the lead is an egg.
    pub lead_ability: Option<Ability>,
    pub weather: Weather,
    pub in_pyramid: bool,
}

impl RateInputs {
    #[must_use]
    pub const fn base(base_rate: u8) -> Self {
        Self {
            base_rate,
            cycling: false,
            encounter_up: false,
            encounter_down: false,
            lead_item: None,
            lead_ability: None,
            weather: Weather::Clear,
            in_pyramid: false,
        }
    }

    /// Final rate on the `RATE_CEILING` scale. Integer arithmetic truncates at every step.
    #[must_use]
    pub fn final_rate(&self) -> u32 {
        let mut rate = u32::from(self.base_rate) * RATE_SCALE;
        if self.cycling {
            rate = rate * 80 / 100;
        }
        if self.encounter_up {
            rate += rate / 2;
        } else if self.encounter_down {
            rate /= 2;
        }
        if self.lead_item == Some(HeldItem::CleanseTag) {
            rate = rate * 2 / 3;
        }
        if let Some(ability) = self.lead_ability {
            rate = apply_ability(rate, ability, self.weather, self.in_pyramid);
        }
        rate.min(RATE_CEILING)
    }
}

fn apply_ability(rate: u32, ability: Ability, weather: Weather, in_pyramid: bool) -> u32 {
    match ability {
        Ability::Stench if in_pyramid => rate * 3 / 4,
        Ability::Illuminate | Ability::ArenaTrap => rate * 2,
        Ability::Stench | Ability::WhiteSmoke | Ability::QuickFeet | Ability::Infiltrator => rate / 2,
        Ability::SandVeil if weather == Weather::Sandstorm => rate / 2,
        Ability::SnowCloak if weather == Weather::Snow => rate / 2,
        Ability::NoGuard => rate * 3 / 2,
        _ => rate,
    }
}

/// Roll against the final rate. Always consumes one draw.
pub fn should_trigger<R: RandomSource + ?Sized>(inputs: &RateInputs, rng: &mut R) -> bool {
    let rate = inputs.final_rate();
    let roll = rng.below(RATE_CEILING);
    log::trace!("rate roll {roll} against {rate}");
    roll < rate
}
