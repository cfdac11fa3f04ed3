//! # API Shared
//!
//! Shared definitions for the Lambda Repo front ends.
//!
//! Contains:
//! - Health response type and `HealthService`
//! - The API-Gateway style event adapter (`gateway`), used by the CLI to replay events
//!
//! Used by `api-rest` and `lambda-repo-cli`.

pub mod gateway;
pub mod health;

pub use gateway::{dispatch, GatewayRequest, GatewayResponse};
pub use health::{HealthRes, HealthService};
