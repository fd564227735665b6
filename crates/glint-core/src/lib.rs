//! Core types for the Glint palette.
//!
//! This crate contains shared data structures that are used across all Glint crates:
//! - Action records, drafts, and patches
//! - Settings and recent colors
//! - Palette modes and search engines
//! - Key chords
//! - Configuration types
//! - Error types

mod action;
mod chord;
mod color;
mod config;
mod engine;
mod error;
mod mode;
mod settings;

pub use action::{ActionDraft, ActionId, ActionPatch, ActionRecord};
pub use chord::Chord;
pub use color::{normalize_hex, push_recent, RecentColor, RECENT_COLOR_CAP};
pub use config::{config_dir, config_path, ensure_config_dir, AppConfig, ChordConfig};
pub use engine::SearchEngine;
pub use error::{
    AdapterError, ConfigError, PickerError, ProtocolError, StoreError, SyncError, ToolError,
};
pub use mode::PaletteMode;
pub use settings::{default_settings, now_millis, setting_keys, SettingRecord};
