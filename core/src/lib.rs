//! Blocking API client for the Nozbe task manager.
//!
//! # Overview
//! Builds keyed URLs for the five remote actions, issues GET requests through
//! an owned `Transport`, and decodes the JSON bodies into untyped records.
//!
//! # Design
//! - `NozbeClient` holds only its `ClientConfig` and its transport. The
//!   default transport is a pooled `ureq::Agent`; tests inject their own.
//! - Transport failures and non-2xx statuses are errors. Bodies that fail to
//!   decode as JSON are not: they become an empty list.
//! - Entities are `serde_json` objects. The client reads a project's `id` and
//!   `name` and nothing else.

pub mod action;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod types;

pub use action::Action;
pub use client::NozbeClient;
pub use config::{ClientConfig, DEFAULT_API_URL};
pub use error::{ApiError, Result};
pub use http::{HttpRequest, HttpResponse, Transport, UreqTransport};
pub use types::{Context, Project, Record, Task};
