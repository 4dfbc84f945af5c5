//! Named weight containers. Both stores hold the same bincode encoding, so a
//! network saved to memory and one saved to disk are byte-identical.

use crate::error::PolicyError;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerWeights {
    pub inputs: usize,
    pub outputs: usize,
    /// Row-major `outputs x inputs`, every entry +1 or -1.
    pub kernel: Vec<f32>,
    pub bias: Vec<f32>,
}

/// Per-layer snapshot of a binary network, indexed from the input side.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WeightSet {
    pub layers: Vec<LayerWeights>,
}

impl WeightSet {
    pub fn encode(&self) -> Result<Vec<u8>, PolicyError> {
        Ok(bincode::serde::encode_to_vec(self, bincode::config::standard())?)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, PolicyError> {
        let (set, _) = bincode::serde::decode_from_slice(bytes, bincode::config::standard())?;
        Ok(set)
    }
}

pub trait WeightStore {
    fn save(&mut self, name: &str, weights: &WeightSet) -> Result<(), PolicyError>;
    fn load(&self, name: &str) -> Result<WeightSet, PolicyError>;
}

/// Stores each weight set as `<dir>/<name>.bin`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.bin"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl WeightStore for FileStore {
    fn save(&mut self, name: &str, weights: &WeightSet) -> Result<(), PolicyError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(name), weights.encode()?)?;
        Ok(())
    }

    fn load(&self, name: &str) -> Result<WeightSet, PolicyError> {
        match fs::read(self.path_for(name)) {
            Ok(bytes) => WeightSet::decode(&bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(PolicyError::MissingWeights(name.to_owned())),
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: AHashMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }
}

impl WeightStore for MemoryStore {
    fn save(&mut self, name: &str, weights: &WeightSet) -> Result<(), PolicyError> {
        self.entries.insert(name.to_owned(), weights.encode()?);
        Ok(())
    }

    fn load(&self, name: &str) -> Result<WeightSet, PolicyError> {
        let bytes = self
            .entries
            .get(name)
            .ok_or_else(|| PolicyError::MissingWeights(name.to_owned()))?;
        WeightSet::decode(bytes)
    }
}
