//! awsdash - read-only web dashboard for AWS compute resources
//!
//! - [`aws`] - Signed EC2 / ELBv2 Query API client behind [`aws::ComputeApi`]
//! - [`resource`] - Credential probe, per-kind aggregation, view model
//! - [`web`] - axum router and HTML pages
//! - [`config`] - Environment and config file settings

pub mod aws;
pub mod config;
pub mod resource;
pub mod web;
