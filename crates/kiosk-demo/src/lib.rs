#![forbid(unsafe_code)]

//! Scripted kiosk session driving the engines through an [`EngineHost`].
//!
//! [`EngineHost`]: kiosk_runtime::EngineHost

pub mod cli;
pub mod session;
