//! Local collections, sync bridge, and tool catalog for the Glint palette.
//!
//! This crate owns the persistent side of the palette:
//! - `Store`: the Action/Setting/RecentColor collections and their laws
//! - `StorageArea`: the host key-value substrate behind an async trait
//! - `SyncBridge`: whole-collection snapshot push/pull across contexts
//! - `ToolCatalog`: the per-context map from action id to live capability

mod area;
mod catalog;
mod store;
mod sync;

pub use area::{JsonFileArea, MemoryArea, StorageArea};
pub use catalog::{ResolvedTool, ToolCatalog, ToolHandler};
pub use store::Store;
pub use sync::{SyncBridge, ACTIONS_KEY};
