//! Cairn Core
//!
//! Shared types, configuration, and error taxonomy for the Cairn tiered
//! conversational memory subsystem.
//!
//! # Overview
//!
//! Cairn supplies relevant context to a conversational assistant before
//! each reply: fast per-conversation working memory, durable episodic
//! history with relevance-ranked retrieval, and a cached semantic
//! knowledge snapshot. This crate holds what the tiers share:
//! - message and timestamp types
//! - configuration with validated defaults
//! - the error taxonomy and its degradation policy
//! - the HTTP client abstraction for the knowledge source
//! - telemetry bootstrap

pub mod config;
pub mod constants;
pub mod error;
pub mod http;
pub mod message;
pub mod telemetry;
pub mod time;

pub use config::{
    CairnConfig, KnowledgeConfig, RetentionConfig, SearchConfig, WorkingMemoryConfig,
};
pub use constants::*;
pub use error::{Error, Result};
pub use http::{
    default_http_client, FailingHttpClient, HttpClient, HttpError, HttpRequest, HttpResponse,
    HttpResult, ReqwestHttpClient, StaticHttpClient,
};
pub use message::{Message, Role};
pub use telemetry::{init_telemetry, TelemetryConfig};
pub use time::{now, Timestamp};
