//! # Flowplan
//!
//! Turns a free-text automation request into an ordered flow of typed
//! steps, reporting progress to an observer while it works.
//!
//! A planning run has three stages:
//!
//! - **Retrieval**: rank the pieces relevant to the request
//! - **Coarse planning**: ask a generation provider for a plan that fits a
//!   declared output schema
//! - **Materialization**: expand each planned step in order, giving every
//!   step the steps created before it
//!
//! Each milestone is sent to the run's [`EventSink`](events::EventSink) as a
//! `CONTEXT_FOUND`, `PLAN_GENERATED` or `STEP_CREATED` event.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use flowplan::prelude::*;
//! use std::sync::Arc;
//!
//! let catalog = Arc::new(PieceCatalog::from_json_str(&pieces_json)?);
//! let planner = FlowPlanner::for_catalog(
//!     &PlannerConfig::from_file("flowplan.json")?,
//!     Arc::new(StaticRetriever::new(catalog.context_items())),
//!     Arc::new(OpenAiProvider::new(OpenAiConfig::from_env()?)?),
//!     catalog,
//! );
//!
//! let sink = Arc::new(LoggingEventSink::info());
//! let flow = planner
//!     .plan("Post new spreadsheet rows to Slack", Some(sink), PlanOptions::new())
//!     .await?;
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod config;
pub mod contracts;
pub mod core;
pub mod errors;
pub mod events;
pub mod generation;
pub mod materializer;
pub mod observability;
pub mod pipeline;
pub mod planner;
pub mod retrieval;
pub mod testing;
pub mod utils;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::PlannerConfig;
    pub use crate::contracts::{OutputSchema, SchemaError, SchemaType, StructuredOutput};
    pub use crate::core::{
        CoarsePlan, ContextItem, ExplicitStep, ExplicitStepSequence, FlowDocument,
        MaterializedStep, PlannedStepIntent, StepKind,
    };
    pub use crate::errors::{
        ConfigError, GenerationError, MaterializationError, PlannerError, ProviderError,
        RetrievalError,
    };
    pub use crate::events::{
        ChannelEventSink, CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink,
        ProgressEvent,
    };
    #[cfg(feature = "http")]
    pub use crate::generation::{OpenAiConfig, OpenAiProvider};
    pub use crate::generation::{GenerationProvider, GenerationSettings, RetryConfig};
    pub use crate::materializer::{CatalogStepMaterializer, PieceCatalog, StepMaterializer};
    pub use crate::observability::{init_tracing, LogFormat};
    pub use crate::pipeline::FlowPlanner;
    pub use crate::planner::PlanOptions;
    #[cfg(feature = "http")]
    pub use crate::retrieval::HttpRetriever;
    pub use crate::retrieval::{LexicalRetriever, Retriever, StaticRetriever};
    pub use crate::utils::{generate_run_id, iso_timestamp};
}
