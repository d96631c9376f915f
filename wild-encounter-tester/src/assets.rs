use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use wild_encounter::{
    ConfigError, DataLoader, EncounterConfig, EncounterData, EncounterEngine, RebalanceMode,
    SandboxWorld, SpeciesTable, TableError, WildHeaderSet,
};

const SPECIES_FILE: &str = "species.json";
const HEADERS_FILE: &str = "wild_headers.json";
const CONFIG_FILE: &str = "encounter_config.json";

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid species data")]
    Species(#[from] serde_json::Error),
    #[error("invalid wild headers")]
    Headers(#[from] TableError),
    #[error("invalid encounter config")]
    Config(#[from] ConfigError),
}

/// Reads encounter content from a directory of JSON files.
#[derive(Debug, Clone)]
pub struct FileLoader {
    root: PathBuf,
}

impl FileLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Assets shipped next to the tester crate.
    pub fn bundled() -> Self {
        Self::new(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets"))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read(&self, file: &str) -> Result<String, AssetError> {
        let path = self.root.join(file);
        fs::read_to_string(&path).map_err(|source| AssetError::Io { path, source })
    }
}

impl DataLoader for FileLoader {
    type Error = AssetError;

    fn load_species(&self) -> Result<SpeciesTable, Self::Error> {
        Ok(SpeciesTable::from_json(&self.read(SPECIES_FILE)?)?)
    }

    fn load_wild_headers(&self) -> Result<WildHeaderSet, Self::Error> {
        Ok(WildHeaderSet::from_json(&self.read(HEADERS_FILE)?)?)
    }

    fn load_config(&self) -> Result<EncounterConfig, Self::Error> {
        Ok(EncounterConfig::from_json(&self.read(CONFIG_FILE)?)?)
    }
}

/// Content used when no asset directory can be loaded: the sandbox demo world
/// with rebalancing switched off.
pub fn fallback_data() -> anyhow::Result<EncounterData> {
    let demo = SandboxWorld::demo();
    let mut config = EncounterConfig::default_config();
    config.rebalance.mode = RebalanceMode::Disabled;
    let engine = EncounterEngine::from_config(&config, &demo.species)?;
    Ok(EncounterData {
        species: demo.species,
        headers: demo.headers,
        engine,
    })
}
