//! Markup Reader Module
//!
//! - SliceReader: Zero-copy slice parser
//! - Events: markup event types for pull parsing

pub mod events;
pub mod slice;
