//! Top-level module for the Markov-chain language model.
//!
//! This module provides a character-level language model, including:
//! - Per-window next-character statistics (`CharData`, `WindowStats`)
//! - A trainable, seedable model (`LanguageModel`)
//! - Weighted random sampling over cumulative-probability tables

/// Per-window statistics: one `CharData` record per observed next character,
/// kept in first-observation order, plus counting, probability calculation
/// and weighted sampling.
pub mod char_data;

/// The language model itself: fixed window length, window-to-statistics map,
/// owned random source, training and generation.
pub mod language_model;
