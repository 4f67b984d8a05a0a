//! Synthetic load for the SMS spam classifier.
//!
//! Posts randomly sampled SMS messages with random ham/spam guesses to the istio
//! (production) and canary deployments of the classifier, from a fixed number of
//! concurrent workers per deployment.
//!
//! - `config`: CLI flags, target URLs and the immutable [`config::RunConfig`]
//! - `corpus`: corpus file loading and [`corpus::MessagePool`] sampling
//! - `payload`: the `{ sms, guess }` request body
//! - `client`: HTTP client and transport failure policy
//! - `runner`: worker fan-out, join and cooperative stop
//!
//! Request failures are absorbed by the workers; only configuration and corpus
//! errors reach the caller.

pub mod client;
pub mod config;
pub mod corpus;
pub mod payload;
pub mod runner;
pub mod sig_down;
pub mod signal;
pub mod telemetry;

pub use config::{Config, RunConfig, Target};
pub use corpus::MessagePool;
pub use runner::{LoadRun, RunReport};
