pub mod collateral;
pub mod llm;
pub mod profile;

pub use collateral::{CollateralError, CollateralService};
pub use llm::{LlmClient, ModelClient, ModelError};
pub use profile::{ProfileAssembler, ProfileGenerationError, ProvenanceReport};
