//! `symptrack` - The core of a daily symptom tracking app
//!
//! This library provides the symptom category selection model, the survey
//! catalog filtered into an active subset, the navigation surface and the
//! selection screen state machine, all persisted through a key-value store.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod analytics;
pub mod catalog;
pub mod cli;
pub mod components;
pub mod config;
pub mod error;
pub mod logging;
pub mod navigation;
pub mod persistence;
pub mod screen;
pub mod storage;
pub mod survey;
pub mod symptoms;

pub use catalog::{Catalog, Category, SurveyQuestion};
pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use navigation::{Navigation, Route, Router, SymptomScreenParams};
pub use persistence::LocalStorage;
pub use screen::{ScreenEvent, ScreenState, SymptomScreen};
pub use storage::{KeyValueStore, MemoryStore, SqliteStore, StoreStats};
pub use survey::{build_active_questions, ActiveQuestion, ActiveSurvey};
pub use symptoms::{CustomSymptoms, SubmitOutcome, SymptomModel, SymptomSelection};
