pub mod claims;
pub mod collateral;
pub mod config;
pub mod profile;
pub mod source;

pub use claims::{Claim, UNSOURCED_CONFIDENCE_CEILING};
pub use collateral::{EmailDraft, MeetingSummary, NextStep, Persona, PitchObjection, PitchOutline};
pub use config::{Config, FetchConfig, ProfileConfig};
pub use profile::{CompanyProfile, ProfileGeneration};
pub use source::{AccountContext, Source, SourceStatus, ensure_scheme, extract_domain};
