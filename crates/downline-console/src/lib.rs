//! Downline Console - the terminal dashboard for a binary-placement
//! referral team.
//!
//! Hosts the view subsystem from `downline-view` over an organization
//! tree from `downline-model`: applies requested mutations, renders the
//! TUI, and owns config, logging, and the event log.

pub mod config;
pub mod dashboard;
pub mod event_log;
pub mod host;
