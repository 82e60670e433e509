//! Model serialization and persistence
//!
//! Saves trained models as JSON together with a small metadata header so
//! a loaded file can be sanity-checked before use.

use crate::core::{Result, SvmError, Task};
use crate::model::SvmModel;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// On-disk representation of a trained model
#[derive(Serialize, Deserialize)]
pub struct SavedModel {
    pub metadata: ModelMetadata,
    pub model: SvmModel,
}

/// Metadata for tracking and validation
#[derive(Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Library version used to create the model
    pub library_version: String,
    /// Number of support vectors
    pub n_support: usize,
    /// Task the model was trained for
    pub task: Task,
}

impl SavedModel {
    pub fn new(model: SvmModel) -> Self {
        let metadata = ModelMetadata {
            library_version: env!("CARGO_PKG_VERSION").to_string(),
            n_support: model.n_support,
            task: model.task,
        };
        Self { metadata, model }
    }

    /// Save as pretty-printed JSON
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Load and validate a saved model
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let saved: SavedModel = serde_json::from_reader(reader)?;
        if saved.metadata.n_support != saved.model.n_support {
            return Err(SvmError::InvalidInput(format!(
                "model file is inconsistent: metadata says {} support vectors, model holds {}",
                saved.metadata.n_support, saved.model.n_support
            )));
        }
        Ok(saved)
    }

    /// Take the model out of its envelope
    pub fn into_model(self) -> SvmModel {
        self.model
    }
}
