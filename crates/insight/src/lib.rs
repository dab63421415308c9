//! # MediNext Insight
//!
//! Client for the Superwise hosted agent API used to produce a short clinical interpretation
//! of one patient's lab values and history.
//!
//! This crate contains:
//! - `SuperwiseConfig`, resolved once at startup from the environment
//! - `PatientClinicalExcerpt`, the identifier-free field subset that leaves the process
//! - the prompt builder and request payload
//! - `SuperwiseClient`, a blocking client with per-attempt timeout and fixed-delay retries
//! - `AnalysisResult`, the classified outcome of a call
//!
//! **No dataset concerns**: loading, searching and summarising patient records belongs in
//! `medinext-core`.

#![warn(rust_2018_idioms)]

pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod excerpt;
pub mod guardrail;
pub mod prompt;
pub mod request;
pub mod result;
pub mod retry;

pub use client::{InsightProvider, SuperwiseClient};
pub use config::{SuperwiseConfig, SuperwiseEndpoint};
pub use error::{InsightError, InsightResult};
pub use excerpt::{age_on, PatientClinicalExcerpt};
pub use guardrail::is_guardrail_violation;
pub use prompt::render_prompt;
pub use request::{AnalysisRequest, ChatTurn};
pub use result::AnalysisResult;
pub use retry::{AttemptOutcome, CallState, RetryPolicy};
