//! Palette state machine, shortcut dispatch, and suggestion adapters.
//!
//! The crate splits one open palette into three layers:
//! - `PaletteSession`: a pure event-in/effect-out state machine
//! - `PaletteDriver`: the async shell running its timers, fetches, and
//!   commits against host traits
//! - adapters: pluggable candidate producers (fuzzy over local items,
//!   web query suggestions)
//!
//! The same session backs the floating overlay and the embedded popup;
//! only the presentation flag differs.

pub mod adapter;
mod debounce;
mod dispatch;
mod driver;
mod focus;
mod geometry;
mod picker;
mod session;

pub use adapter::{Candidate, CommitAction, SuggestionSource};
pub use debounce::{Debouncer, DEBOUNCE_DELAY};
pub use dispatch::{KeyDisposition, KeyPress, ShortcutDispatcher};
pub use driver::{DriverConfig, ModeAdapters, PaletteDriver, PaletteHost, PaletteView};
pub use focus::{
    FocusTarget, TargetKind, OUTSIDE_ARM_DELAY, REFOCUS_DELAY, RETENTION_SCHEDULE_MS,
};
pub use geometry::{
    centered_position, clamp_position, position_is_valid, resolve_open_position, Point, Size,
    Viewport, ESTIMATED_FOOTPRINT, VIEWPORT_MARGIN,
};
pub use picker::{ColorFlow, PickerHost, PickerOutcome};
pub use session::{
    CommitRequest, DragState, OpenState, OpeningState, PaletteEffect, PaletteEvent, PalettePhase,
    PaletteSession, Presentation,
};
