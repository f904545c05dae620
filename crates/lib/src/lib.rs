//! packpub-lib: Core of the packpub build step
//!
//! This crate provides the pieces a host build runtime composes into the
//! "pack and publish" step:
//! - `materialize`: idempotent, retried extraction of bundled tool binaries
//! - `command`: argument lists with index-based redaction of secrets
//! - `artifacts`: resolution of artifact path rules into concrete files
//! - `step`: the orchestrated build step and its state machine

pub mod artifacts;
pub mod catalog;
pub mod command;
pub mod consts;
pub mod host;
pub mod materialize;
pub mod platform;
pub mod resources;
pub mod step;
