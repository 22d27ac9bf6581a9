//! Character-level Markov-chain language model library.
//!
//! This crate provides a fixed-window character language model including:
//! - Training from any character stream (with cyclic wrap-around)
//! - Per-window probability and cumulative-probability tables
//! - Weighted random text generation, seedable for reproducibility
//!
//! The model degrades silently on misuse by design: an unknown window stops
//! generation and returns the partial text, a too-short corpus trains an
//! empty model, and a too-short initial text is returned unchanged.

/// Core model types and training/generation logic.
///
/// This module exposes the high-level `LanguageModel` interface together
/// with the per-window statistics it is built from.
pub mod model;
