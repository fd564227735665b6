//! Async palette driver.
//!
//! Owns a `PaletteSession` on a background task, executes the effects it
//! emits, and broadcasts render-ready `PaletteView` snapshots over a
//! watch channel. Timers and adapter fetches run as spawned tasks that
//! feed their outcomes back into the event queue, so the session itself
//! never blocks.
//!
//! ## Architecture
//!
//! ```text
//! PaletteDriver ──events──► run_loop ──effects──► timers / adapters / host
//!      ▲                       │                        │
//!      │                    session                     │ outcome events
//!      └──view watch◄──────────┴────────────────────────┘
//! ```

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use glint_core::{AppConfig, PaletteMode};
use tokio::sync::{mpsc, watch};

use crate::adapter::{Candidate, CommitAction, SuggestionSource};
use crate::debounce::DEBOUNCE_DELAY;
use crate::focus::RETENTION_SCHEDULE_MS;
use crate::geometry::{Point, Viewport};
use crate::session::{
    CommitRequest, PaletteEffect, PaletteEvent, PalettePhase, PaletteSession, Presentation,
};

/// Event queue depth between the driver handle and its task.
const EVENT_BUFFER: usize = 64;

// =============================================================================
// Configuration
// =============================================================================

/// Driver tuning knobs.
#[derive(Debug, Clone, Copy)]
pub struct DriverConfig {
    /// Delay between the last keystroke and the adapter fetch.
    pub debounce: Duration,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            debounce: DEBOUNCE_DELAY,
        }
    }
}

impl DriverConfig {
    /// Pull tunables out of the application config.
    pub fn from_app(config: &AppConfig) -> Self {
        Self {
            debounce: Duration::from_millis(config.debounce_ms),
        }
    }
}

// =============================================================================
// Host + Adapters
// =============================================================================

/// What the embedding surface provides to a running palette.
#[async_trait]
pub trait PaletteHost: Send + Sync {
    /// Read the saved position for a mode, if any.
    async fn load_position(&self, mode: PaletteMode) -> Option<Point>;

    /// Persist the final position for a mode.
    async fn save_position(&self, mode: PaletteMode, position: Point);

    /// Move keyboard focus to the palette input.
    fn focus_input(&self);

    /// Carry out a committed action.
    async fn commit(&self, action: CommitAction);

    /// The palette closed; tear down the surface.
    fn dismissed(&self);
}

/// One suggestion source per palette mode.
#[derive(Clone)]
pub struct ModeAdapters {
    pub web: Arc<dyn SuggestionSource>,
    pub tool: Arc<dyn SuggestionSource>,
}

impl ModeAdapters {
    pub fn new(web: Arc<dyn SuggestionSource>, tool: Arc<dyn SuggestionSource>) -> Self {
        Self { web, tool }
    }

    pub fn for_mode(&self, mode: PaletteMode) -> &Arc<dyn SuggestionSource> {
        match mode {
            PaletteMode::Web => &self.web,
            PaletteMode::Tool => &self.tool,
        }
    }
}

// =============================================================================
// View
// =============================================================================

/// Render-ready snapshot of the palette, broadcast after every event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaletteView {
    pub open: bool,
    pub mode: Option<PaletteMode>,
    pub query: String,
    pub candidates: Vec<Candidate>,
    pub selected: usize,
    pub position: Point,
    pub dragging: bool,
    pub placeholder: String,
}

fn build_view(session: &PaletteSession) -> PaletteView {
    match session.phase() {
        PalettePhase::Closed => PaletteView::default(),
        // Not rendered yet: the first paint waits for the position.
        PalettePhase::Opening(opening) => PaletteView {
            mode: Some(opening.mode),
            ..PaletteView::default()
        },
        PalettePhase::Open(state) => PaletteView {
            open: true,
            mode: Some(state.mode),
            query: state.raw_query.clone(),
            candidates: state.candidates.clone(),
            selected: state.selected,
            position: state.position,
            dragging: state.drag.is_some(),
            placeholder: state.mode.placeholder().to_string(),
        },
    }
}

// =============================================================================
// Driver
// =============================================================================

/// Handle to a palette running on a background task.
#[derive(Clone)]
pub struct PaletteDriver {
    events: mpsc::Sender<PaletteEvent>,
    view: watch::Receiver<PaletteView>,
    adapters: ModeAdapters,
}

impl PaletteDriver {
    /// Start the driver task.
    pub fn spawn(adapters: ModeAdapters, host: Arc<dyn PaletteHost>, config: DriverConfig) -> Self {
        let (event_tx, event_rx) = mpsc::channel(EVENT_BUFFER);
        let (view_tx, view_rx) = watch::channel(PaletteView::default());

        tokio::spawn(run_loop(
            event_rx,
            event_tx.clone(),
            view_tx,
            adapters.clone(),
            host,
            config,
        ));

        Self {
            events: event_tx,
            view: view_rx,
            adapters,
        }
    }

    /// Watch the view stream. The receiver always holds the latest
    /// snapshot.
    pub fn subscribe(&self) -> watch::Receiver<PaletteView> {
        self.view.clone()
    }

    /// Request the palette in `mode`. No-op while one is already open.
    pub async fn open(&self, mode: PaletteMode, presentation: Presentation, viewport: Viewport) {
        let direct_commit = self.adapters.for_mode(mode).supports_direct_commit();
        self.send(PaletteEvent::OpenRequested {
            mode,
            presentation,
            viewport,
            direct_commit,
        })
        .await;
    }

    /// Forward a new raw query value.
    pub async fn query_changed(&self, raw: impl Into<String>) {
        self.send(PaletteEvent::QueryChanged(raw.into())).await;
    }

    /// Commit the current selection (or the raw query).
    pub async fn submit(&self) {
        self.send(PaletteEvent::Submit).await;
    }

    /// Close without committing.
    pub async fn cancel(&self) {
        self.send(PaletteEvent::Cancel).await;
    }

    /// Forward any session event.
    pub async fn send(&self, event: PaletteEvent) {
        if self.events.send(event).await.is_err() {
            tracing::warn!("Palette driver task is gone; dropping event");
        }
    }
}

async fn run_loop(
    mut events: mpsc::Receiver<PaletteEvent>,
    self_tx: mpsc::Sender<PaletteEvent>,
    view_tx: watch::Sender<PaletteView>,
    adapters: ModeAdapters,
    host: Arc<dyn PaletteHost>,
    config: DriverConfig,
) {
    let mut session = PaletteSession::new().with_debounce(config.debounce);

    while let Some(event) = events.recv().await {
        let effects = session.apply(event);
        let _ = view_tx.send(build_view(&session));

        for effect in effects {
            run_effect(effect, &session, &self_tx, &adapters, &host).await;
        }
    }
}

async fn run_effect(
    effect: PaletteEffect,
    session: &PaletteSession,
    self_tx: &mpsc::Sender<PaletteEvent>,
    adapters: &ModeAdapters,
    host: &Arc<dyn PaletteHost>,
) {
    match effect {
        PaletteEffect::LoadPosition { mode } => {
            let host = host.clone();
            let tx = self_tx.clone();
            tokio::spawn(async move {
                let saved = host.load_position(mode).await;
                let _ = tx.send(PaletteEvent::PositionLoaded(saved)).await;
            });
        }

        PaletteEffect::ScheduleDebounce { generation, delay } => {
            let tx = self_tx.clone();
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                let _ = tx.send(PaletteEvent::DebounceElapsed { generation }).await;
            });
        }

        PaletteEffect::FetchCandidates { query } => {
            // Fetches only arise while open, where the mode is known.
            let Some(mode) = session.open().map(|s| s.mode) else {
                return;
            };
            let future = adapters.for_mode(mode).search(&query);
            let tx = self_tx.clone();
            tokio::spawn(async move {
                let candidates = future.await;
                let _ = tx
                    .send(PaletteEvent::CandidatesReady { query, candidates })
                    .await;
            });
        }

        PaletteEffect::FocusInput => host.focus_input(),

        PaletteEffect::StartFocusRetention => {
            let tx = self_tx.clone();
            tokio::spawn(async move {
                let mut elapsed = 0;
                for ms in RETENTION_SCHEDULE_MS {
                    tokio::time::sleep(Duration::from_millis(ms - elapsed)).await;
                    elapsed = ms;
                    if tx.send(PaletteEvent::RefocusTick).await.is_err() {
                        return;
                    }
                }
            });
        }

        PaletteEffect::ScheduleRefocus { delay } => {
            let tx = self_tx.clone();
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                let _ = tx.send(PaletteEvent::RefocusTick).await;
            });
        }

        PaletteEffect::ScheduleOutsideArm { delay } => {
            let tx = self_tx.clone();
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                let _ = tx.send(PaletteEvent::OutsideArmed).await;
            });
        }

        PaletteEffect::SavePosition { mode, position } => {
            let host = host.clone();
            tokio::spawn(async move {
                host.save_position(mode, position).await;
            });
        }

        PaletteEffect::Commit(request) => {
            let action = match request {
                CommitRequest::Candidate(candidate) => Some(candidate.commit),
                CommitRequest::DirectQuery { mode, query } => {
                    adapters.for_mode(mode).direct_commit(&query)
                }
            };
            if let Some(action) = action {
                host.commit(action).await;
            }
        }

        PaletteEffect::Dismissed => host.dismissed(),
    }
}

// =============================================================================
// Tests
// =============================================================================
