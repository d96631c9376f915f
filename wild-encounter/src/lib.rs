//! Wild Encounter Engine
//!
//! Platform-agnostic wild-creature encounter generation for an overworld RPG.
//! The crate decides whether a step or field action triggers an encounter,
//! which species and level appear, and which battle to launch. Game state is
//! reached only through the collaborator traits in [`world`].

pub mod config;
pub mod creature;
pub mod engine;
pub mod level;
pub mod nature;
pub mod outbreak;
pub mod party;
pub mod rate;
pub mod rebalance;
pub mod rng;
pub mod sandbox;
pub mod session;
pub mod slots;
pub mod species;
pub mod table;
pub mod world;

// Re-export commonly used types
pub use config::{ConfigError, EncounterConfig, EncounterRules, FishingWindow};
pub use creature::{CreationContext, GeneratedCreature, SpecialForm, create_creature};
pub use engine::{AreaKind, CheckFlags, EncounterEngine, LocalSighting, Step};
pub use level::{LevelBounds, PartyLevelSample, choose_level};
pub use nature::{FlavorBlock, pick_nature};
pub use outbreak::MassOutbreak;
pub use party::{PARTY_SIZE, PartyMember};
pub use rate::{RATE_CEILING, RateInputs, should_trigger};
pub use rebalance::{
    BstWindow, Progression, RebalanceMode, RebalanceRoster, RebalanceSettings, rebalance,
};
pub use rng::{EncounterRng, RandomSource, ScriptedRolls};
pub use sandbox::SandboxWorld;
pub use session::EncounterSession;
pub use slots::{RodTier, SlotCategory, select_slot, steered_slot};
pub use species::{
    Ability, ElementType, Gender, GenderRatio, HeldItem, MoveId, Nature, SpeciesCatalog, SpeciesId,
    SpeciesInfo, SpeciesTable,
};
pub use table::{EncounterTable, MapId, TableError, TableKind, WildHeader, WildHeaderSet, WildSlot};
pub use world::{
    BattleKind, BattleLauncher, Facility, FieldEffects, FlagStore, FrontierFacilities, MapView,
    Overworld, PartyStore, RoamerSighting, RoamerTracker, TileBehavior, Weather,
};

/// Trait for abstracting encounter data loading.
/// Platform-specific implementations should provide this
pub trait DataLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the species catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the species data cannot be loaded.
    fn load_species(&self) -> Result<SpeciesTable, Self::Error>;

    /// Load every wild header.
    ///
    /// # Errors
    ///
    /// Returns an error if the header data cannot be loaded or fails validation.
    fn load_wild_headers(&self) -> Result<WildHeaderSet, Self::Error>;

    /// Load encounter tunables.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded or parsed.
    fn load_config(&self) -> Result<EncounterConfig, Self::Error>;
}

/// Failure while assembling [`EncounterData`].
#[derive(Debug, thiserror::Error)]
pub enum LoadError<E: std::error::Error + 'static> {
    #[error("failed to load encounter data")]
    Loader(#[source] E),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Loaded encounter content: the species catalog, wild headers, and a ready engine.
#[derive(Debug, Clone)]
pub struct EncounterData {
    pub species: SpeciesTable,
    pub headers: WildHeaderSet,
    pub engine: EncounterEngine,
}

impl EncounterData {
    /// Load everything through `loader` and resolve the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if loading fails or the configuration does not resolve.
    pub fn load<L: DataLoader>(loader: &L) -> Result<Self, LoadError<L::Error>> {
        let species = loader.load_species().map_err(LoadError::Loader)?;
        let headers = loader.load_wild_headers().map_err(LoadError::Loader)?;
        let config = loader.load_config().map_err(LoadError::Loader)?;
        let engine = EncounterEngine::from_config(&config, &species)?;
        Ok(Self {
            species,
            headers,
            engine,
        })
    }

    /// Sandbox world over this data, positioned on `map`.
    #[must_use]
    pub fn sandbox(&self, map: MapId) -> SandboxWorld {
        SandboxWorld::new(self.species.clone(), self.headers.clone(), map)
    }
}
