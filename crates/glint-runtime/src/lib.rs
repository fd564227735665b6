//! Cross-context runtime: message routing plus the context shells.
//!
//! ## Architecture
//!
//! ```text
//!  ┌────────────────────── background ──────────────────────┐
//!  │  Router ── Store (authoritative) ── SyncBridge ── area │
//!  │     │                                                  │
//!  │  TabRegistry ←─ host commands (intent_for_command)     │
//!  └─────┼──────────────────────────────────────────────────┘
//!        │ request/reply (Envelope)          │ Intent
//!  ┌─────┴────────────┐            ┌─────────┴──────────┐
//!  │   PopupContext   │            │   ContentContext   │
//!  │  CRUD + embedded │            │  chords + floating │
//!  │  palette, replica│            │  palette, replica  │
//!  └──────────────────┘            └────────────────────┘
//! ```
//!
//! The background owns the durable Action collection; every other
//! context holds a read replica and funnels writes through the
//! [`Router`]. Palette surfaces in content and popup are the same
//! driver stack wired to different presentations.

mod context;
mod host;
mod message;
mod router;

pub mod logging;

pub use context::{BackgroundContext, ContentContext, PopupContext, TabRegistry};
pub use host::{CommandHost, SurfaceHost, TabHost, TabId};
pub use message::{decode_request, intent_for_command, Intent, Request, Response};
pub use router::{Envelope, Router};
