//! Data models for stored pastes.

/// Stored paste record and digest helpers.
pub mod paste;
