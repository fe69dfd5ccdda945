//! Core of the critic code-review assistant.
//!
//! - [`types`]: the session data model shared by every step.
//! - [`strip`]: comment removal for "accept clean".
//! - [`diagnostics`]: free-form checker output to line-anchored diagnostics.
//! - [`client`]: the remote analysis service contract and its HTTP implementation.
//! - [`controller`]: the workflow state machine.
//! - [`driver`]: runs a controller's remote calls against a client.

pub mod client;
pub mod controller;
pub mod diagnostics;
pub mod driver;
pub mod error;
pub mod strip;
pub mod types;

pub use client::{AnalysisClient, ClientOptions, HttpAnalysisClient};
pub use controller::{AnnotationEvent, Completion, Controller, Effect, Intent, RemoteCall};
pub use error::AnalysisError;
pub use types::{Decision, Diagnostic, LanguageTag, Pending, PendingOp, Session, Severity};
