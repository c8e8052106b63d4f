//! # pingwatch-common
//!
//! Shared vocabulary for the `pingwatch` workspace.
//!
//! * **[`config`]**: the run configuration and its loader.
//! * **[`target`]**: the devices under watch.
//! * **[`probe`]**: the outcome of a single reachability check.
//! * **[`notification`]**: the payload handed to notifiers on escalation.

pub mod config;
pub mod notification;
pub mod probe;
pub mod target;
