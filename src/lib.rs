//! Bloom Planner
//!
//! Resolves a free-text plant name and a sowing month into a bloom window
//! and care guidance.
//!
//! - `utils/`: Name similarity and month arithmetic
//! - `record`: Canonical plant record and per-tier row adapters
//! - `data` / `local_index`: Static dataset loaded once at startup
//! - `remote` / `suggest`: Record store and name-suggestion collaborators
//! - `resolver`: Tiered resolution state machine (local, remote, generated)
//! - `bloom` / `timeline`: Text normalization and month-granular timeline
//! - `calculator`: End-to-end calculation
//!
//! The HTTP server lives behind the `api` feature.

pub mod utils;
pub mod error;
pub mod config;
pub mod record;
pub mod data;
pub mod local_index;
pub mod remote;
pub mod suggest;
pub mod resolver;
pub mod bloom;
pub mod timeline;
pub mod calculator;

// HTTP surface
#[cfg(feature = "api")]
pub mod api_server;

// Re-export commonly used types
pub use utils::{Month, similarity, find_best_match};
pub use config::PlannerConfig;
pub use record::{PlantRecord, SourceTier};
pub use local_index::LocalIndex;
pub use remote::{RecordStore, RemoteCache, Page};
pub use suggest::SuggestionProvider;
pub use resolver::{PlantResolver, ResolutionResult, ResolutionStage};
pub use bloom::BloomProfile;
pub use timeline::{compute_timeline, TimelineResult};
pub use calculator::{BloomCalculation, BloomCalculator};

#[cfg(feature = "api")]
pub use api_server::{AppState, create_router};
