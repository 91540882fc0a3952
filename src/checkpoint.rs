//! Model checkpointing
//!
//! Persists module records with burn's binary file recorder at full
//! precision. Loading requires a freshly initialized module of the same
//! architecture to pour the record into.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use burn::{
    module::Module,
    prelude::*,
    record::{BinFileRecorder, FullPrecisionSettings},
};

/// File stem used for the best-policy checkpoint during training.
pub const BEST_POLICY: &str = "policy_best";

#[derive(Debug)]
pub enum CheckpointError {
    Io(io::Error),
    Recorder(String),
    /// No checkpoint file exists under the requested name.
    NotFound(PathBuf),
}

impl fmt::Display for CheckpointError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckpointError::Io(e) => write!(f, "checkpoint i/o error: {e}"),
            CheckpointError::Recorder(msg) => write!(f, "checkpoint recorder error: {msg}"),
            CheckpointError::NotFound(path) => {
                write!(f, "no checkpoint found at {}", path.display())
            }
        }
    }
}

impl std::error::Error for CheckpointError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CheckpointError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for CheckpointError {
    fn from(e: io::Error) -> Self {
        CheckpointError::Io(e)
    }
}

/// Saves and restores module records under a fixed directory.
pub struct Checkpointer {
    dir: PathBuf,
}

impl Checkpointer {
    /// Create the checkpoint directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, CheckpointError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.bin"))
    }

    /// Persist `module` under `name`, replacing any previous checkpoint with
    /// that name. Returns the path written.
    pub fn save<B: Backend, M: Module<B>>(
        &self,
        module: &M,
        name: &str,
    ) -> Result<PathBuf, CheckpointError> {
        let path = self.file_path(name);
        let recorder = BinFileRecorder::<FullPrecisionSettings>::new();
        module
            .clone()
            .save_file(&path, &recorder)
            .map_err(|e| CheckpointError::Recorder(e.to_string()))?;
        Ok(path)
    }

    /// Load the checkpoint `name` into `template`, a module with matching
    /// architecture.
    pub fn load<B: Backend, M: Module<B>>(
        &self,
        template: M,
        name: &str,
        device: &B::Device,
    ) -> Result<M, CheckpointError> {
        let path = self.file_path(name);
        if !path.exists() {
            return Err(CheckpointError::NotFound(path));
        }
        let recorder = BinFileRecorder::<FullPrecisionSettings>::new();
        template
            .load_file(path, &recorder, device)
            .map_err(|e| CheckpointError::Recorder(e.to_string()))
    }

    /// Load `name` if it exists, otherwise keep `template` as-is. The flag
    /// reports whether a checkpoint was restored.
    pub fn restore<B: Backend, M: Module<B>>(
        &self,
        template: M,
        name: &str,
        device: &B::Device,
    ) -> Result<(M, bool), CheckpointError> {
        match self.load(template.clone(), name, device) {
            Ok(module) => Ok((module, true)),
            Err(CheckpointError::NotFound(_)) => Ok((template, false)),
            Err(e) => Err(e),
        }
    }
}
