//! Inference runtime seam and its ONNX Runtime implementation.

use std::fmt;
use std::path::{Path, PathBuf};

use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use thiserror::Error;

use crate::defaults::ONNX_INTRA_THREADS;

/// Task mode an inference object is built for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Task {
    /// Object detection
    #[default]
    Detect,
}

impl Task {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Detect => "detect",
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised while constructing an inference object.
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("Failed to load model from {}: {message}", path.display())]
    Session { path: PathBuf, message: String },

    #[error("Model at {} declares no inputs", .0.display())]
    NoInputs(PathBuf),
}

/// Builds inference objects from weight files.
pub trait InferenceRuntime: Send + Sync {
    type Model: Send;

    fn construct(&self, weights: &Path, task: Task) -> Result<Self::Model, RuntimeError>;
}

/// Detection model backed by an ONNX Runtime session.
pub struct DetectionModel {
    weights_path: PathBuf,
    task: Task,
    session: Session,
    input_name: String,
    output_names: Vec<String>,
}

impl DetectionModel {
    pub fn weights_path(&self) -> &Path {
        &self.weights_path
    }

    pub fn task(&self) -> Task {
        self.task
    }

    /// Name of the image input tensor.
    pub fn input_name(&self) -> &str {
        &self.input_name
    }

    pub fn output_names(&self) -> &[String] {
        &self.output_names
    }

    /// The underlying session, for running inference.
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }
}

impl fmt::Debug for DetectionModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DetectionModel")
            .field("weights_path", &self.weights_path)
            .field("task", &self.task)
            .field("input_name", &self.input_name)
            .field("output_names", &self.output_names)
            .finish_non_exhaustive()
    }
}

/// [`InferenceRuntime`] producing ONNX Runtime sessions.
#[derive(Debug, Clone)]
pub struct OrtRuntime {
    intra_threads: usize,
}

impl OrtRuntime {
    pub fn new() -> Self {
        Self::with_threads(ONNX_INTRA_THREADS)
    }

    pub fn with_threads(intra_threads: usize) -> Self {
        Self {
            intra_threads: intra_threads.max(1),
        }
    }
}

impl Default for OrtRuntime {
    fn default() -> Self {
        Self::new()
    }
}

fn session_error(path: &Path, error: impl fmt::Display) -> RuntimeError {
    RuntimeError::Session {
        path: path.to_path_buf(),
        message: error.to_string(),
    }
}

impl InferenceRuntime for OrtRuntime {
    type Model = DetectionModel;

    fn construct(&self, weights: &Path, task: Task) -> Result<DetectionModel, RuntimeError> {
        log::debug!(
            "Creating ONNX Runtime session for {} (task {}, {} threads)",
            weights.display(),
            task,
            self.intra_threads
        );

        let session = Session::builder()
            .map_err(|e| session_error(weights, e))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| session_error(weights, e))?
            .with_intra_threads(self.intra_threads)
            .map_err(|e| session_error(weights, e))?
            .commit_from_file(weights)
            .map_err(|e| session_error(weights, e))?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .ok_or_else(|| RuntimeError::NoInputs(weights.to_path_buf()))?;
        let output_names = session.outputs.iter().map(|o| o.name.clone()).collect();

        Ok(DetectionModel {
            weights_path: weights.to_path_buf(),
            task,
            session,
            input_name,
            output_names,
        })
    }
}
