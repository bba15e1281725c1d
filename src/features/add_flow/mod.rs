//! # Feature: Add Flow
//!
//! Guided, multi-message creation of a subscription started by `/add`:
//! service name, then amount, then next payment date. Flows are keyed per
//! user and channel, time out when left idle, and can be aborted with `/cancel`.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false

pub mod flow;
pub mod sessions;

pub use flow::{AddFlow, AddStep, FlowReply};
pub use sessions::{AddFlowSessions, SessionEvent};
