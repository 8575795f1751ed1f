//! Registered model resolution and loading.

pub mod discovery;
pub mod registry;
pub mod resolver;
pub mod runtime;
pub mod staging;
pub mod uri;

pub use registry::{ModelRegistry, RegistryError};
pub use resolver::{LoadedModel, ModelResolver, ResolverConfig};
pub use runtime::{DetectionModel, InferenceRuntime, OrtRuntime, RuntimeError, Task};
pub use staging::StagingDir;
pub use uri::{ModelUri, VersionSelector};
