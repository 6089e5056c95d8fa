//! Core types and logic for the watools ecosystem.
//!
//! This crate holds everything the CLI's commands share that does not touch
//! the network or the terminal: the Wild Apricot domain types, the
//! recurring-event schedule generator, the offset-corrected countdown, and
//! the registration batch runner. Network access happens behind the traits
//! in [`registration`], implemented by the CLI's API client.

pub mod countdown;
pub mod error;
pub mod event;
pub mod member;
pub mod offset;
pub mod registration;
pub mod schedule;

pub use error::{WaToolsError, WaToolsResult};
