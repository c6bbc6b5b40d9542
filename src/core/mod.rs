//! Core markup parsing primitives
//!
//! This module contains the fundamental building blocks for markup parsing:
//! - Scanner: SIMD-accelerated delimiter detection using memchr
//! - Tokenizer: State machine for token extraction
//! - Entities: Character reference decoding and escaping with Cow (zero-copy when possible)
//! - Attributes: Attribute parsing and extraction

pub mod attributes;
pub mod entities;
pub mod scanner;
pub mod tokenizer;
