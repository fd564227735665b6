//! Palette session state machine.
//!
//! One `PaletteSession` owns the state of one palette: query, candidates,
//! selection, position, drag. It is event-in/effect-out and knows nothing
//! about timers, rendering, or the network; the driver executes effects
//! and feeds their outcomes back as events. Invalid states are impossible:
//! drag state only exists inside `Open`, the position-loading wait only
//! inside `Opening`.
//!
//! ## Event Flow
//!
//! ```text
//! OpenRequested ──► Opening ──PositionLoaded──► Open ◄──┐
//!   (floating)                                  │       │ QueryChanged /
//!                                               │       │ DebounceElapsed /
//! OpenRequested ───────────────────────────────►│       │ CandidatesReady /
//!   (embedded)                                  │       │ drag events
//!                                               ▼       │
//!                              Submit / Cancel / OutsidePointerDown
//!                                               │
//!                                               ▼
//!                                            Closed
//! ```

use std::time::Duration;

use glint_core::PaletteMode;

use crate::adapter::Candidate;
use crate::debounce::{Debouncer, DEBOUNCE_DELAY};
use crate::focus::{FocusTarget, OUTSIDE_ARM_DELAY, REFOCUS_DELAY};
use crate::geometry::{
    clamp_position, resolve_open_position, Point, Size, Viewport, ESTIMATED_FOOTPRINT,
};

// =============================================================================
// Presentation
// =============================================================================

/// How the palette is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation {
    /// Overlay floating over arbitrary page content; draggable, position
    /// persisted per mode, focus defended.
    Floating,
    /// Fixed surface inside the popup document.
    Embedded,
}

// =============================================================================
// Phases
// =============================================================================

/// Top-level session phase. Invalid states are impossible.
#[derive(Debug, Default)]
pub enum PalettePhase {
    /// No palette.
    #[default]
    Closed,

    /// Floating only: waiting for the saved position so the first paint
    /// lands on the right spot instead of jumping.
    Opening(OpeningState),

    /// Palette is visible and interactive.
    Open(OpenState),
}

/// State while waiting for the saved position.
#[derive(Debug)]
pub struct OpeningState {
    pub mode: PaletteMode,
    pub viewport: Viewport,
    direct_commit: bool,
}

/// State while the palette is visible.
#[derive(Debug)]
pub struct OpenState {
    pub mode: PaletteMode,
    pub presentation: Presentation,
    pub viewport: Viewport,

    /// What the user has typed, updated on every keystroke.
    pub raw_query: String,

    /// The last query that survived the debounce window; candidate sets
    /// are only accepted for this value.
    pub debounced_query: String,

    pub candidates: Vec<Candidate>,

    /// Index into `candidates`; kept in range, reset when the list
    /// changes.
    pub selected: usize,

    /// Current top-left, already clamped.
    pub position: Point,

    /// Rendered footprint once measured; the estimate stands in before.
    pub measured: Option<Size>,

    /// Present only while a handle drag is in progress.
    pub drag: Option<DragState>,

    /// Whether the adapter behind this session can commit a raw query.
    direct_commit: bool,

    /// Outside-pointer dismissal only applies once armed, so the click
    /// that opened the palette cannot close it.
    outside_armed: bool,

    debouncer: Debouncer,
}

impl OpenState {
    fn new(
        mode: PaletteMode,
        presentation: Presentation,
        viewport: Viewport,
        position: Point,
        direct_commit: bool,
    ) -> Self {
        Self {
            mode,
            presentation,
            viewport,
            raw_query: String::new(),
            debounced_query: String::new(),
            candidates: Vec::new(),
            selected: 0,
            position,
            measured: None,
            drag: None,
            direct_commit,
            outside_armed: false,
            debouncer: Debouncer::new(),
        }
    }

    /// Footprint used for clamping: measured when available.
    pub fn footprint(&self) -> Size {
        self.measured.unwrap_or(ESTIMATED_FOOTPRINT)
    }

    /// The candidate under the selection, if the list is non-empty.
    pub fn selected_candidate(&self) -> Option<&Candidate> {
        self.candidates.get(self.selected)
    }

    fn reclamp(&mut self) {
        self.position = clamp_position(self.position, self.footprint(), self.viewport);
    }
}

/// Pointer-to-corner offset captured when a drag starts.
#[derive(Debug, Clone, Copy)]
pub struct DragState {
    pub offset: Point,
}

// =============================================================================
// Events
// =============================================================================

/// Everything that can happen to a session.
#[derive(Debug, Clone)]
pub enum PaletteEvent {
    /// A trigger path asked for the palette. No-op while one is open.
    OpenRequested {
        mode: PaletteMode,
        presentation: Presentation,
        viewport: Viewport,
        /// Whether the active adapter supports committing the raw query.
        direct_commit: bool,
    },

    /// The saved per-mode position arrived (floating open path).
    PositionLoaded(Option<Point>),

    /// The input's raw value changed.
    QueryChanged(String),

    /// The debounce timer stamped with `generation` fired.
    DebounceElapsed { generation: u64 },

    /// An adapter search resolved.
    CandidatesReady {
        query: String,
        candidates: Vec<Candidate>,
    },

    /// ArrowDown.
    SelectNext,

    /// ArrowUp.
    SelectPrev,

    /// Pointer hovered a candidate row.
    HoverCandidate(usize),

    /// Enter.
    Submit,

    /// Pointer committed a candidate row.
    CandidateClicked(usize),

    /// Escape.
    Cancel,

    /// Pointer went down outside the palette bounds.
    OutsidePointerDown,

    /// The outside-dismiss arming delay elapsed.
    OutsideArmed,

    /// Pointer went down on the drag handle.
    DragStarted { pointer: Point },

    /// Pointer moved while dragging.
    DragMoved { pointer: Point },

    /// Pointer released while dragging.
    DragReleased,

    /// The rendered footprint was measured.
    Measured(Size),

    /// The viewport changed size.
    ViewportResized(Viewport),

    /// Focus moved off the palette input onto `target`.
    FocusLost { target: FocusTarget },

    /// A scheduled focus re-assertion came due.
    RefocusTick,
}

// =============================================================================
// Effects
// =============================================================================

/// Work the driver must perform after an event is applied.
#[derive(Debug, Clone, PartialEq)]
pub enum PaletteEffect {
    /// Read the saved position for the mode; answer with
    /// `PositionLoaded`.
    LoadPosition { mode: PaletteMode },

    /// Start a debounce timer; answer with `DebounceElapsed` carrying the
    /// same generation.
    ScheduleDebounce { generation: u64, delay: Duration },

    /// Ask the adapter for candidates; answer with `CandidatesReady`
    /// carrying the same query.
    FetchCandidates { query: String },

    /// Focus the palette input now.
    FocusInput,

    /// Begin the mount-time focus retention schedule.
    StartFocusRetention,

    /// Deliver a `RefocusTick` after the delay.
    ScheduleRefocus { delay: Duration },

    /// Deliver an `OutsideArmed` after the delay.
    ScheduleOutsideArm { delay: Duration },

    /// Persist the final clamped position for the mode.
    SavePosition { mode: PaletteMode, position: Point },

    /// Deliver the commit. Always followed by `Dismissed`.
    Commit(CommitRequest),

    /// The session closed; cancel pending timers and tear down.
    Dismissed,
}

/// What a commit resolved to.
#[derive(Debug, Clone, PartialEq)]
pub enum CommitRequest {
    /// A concrete candidate was chosen.
    Candidate(Candidate),

    /// Direct commit of the raw query (no candidate selected).
    DirectQuery { mode: PaletteMode, query: String },
}

// =============================================================================
// Session
// =============================================================================

/// The state machine for one palette.
#[derive(Debug, Default)]
pub struct PaletteSession {
    phase: PalettePhase,
    debounce_delay: Duration,
}

impl PaletteSession {
    /// Create a closed session with the default debounce delay.
    pub fn new() -> Self {
        Self {
            phase: PalettePhase::Closed,
            debounce_delay: DEBOUNCE_DELAY,
        }
    }

    /// Override the debounce delay.
    pub fn with_debounce(mut self, delay: Duration) -> Self {
        self.debounce_delay = delay;
        self
    }

    /// Current phase.
    pub fn phase(&self) -> &PalettePhase {
        &self.phase
    }

    /// Open state, if visible.
    pub fn open(&self) -> Option<&OpenState> {
        match &self.phase {
            PalettePhase::Open(state) => Some(state),
            _ => None,
        }
    }

    /// True from `OpenRequested` until close; duplicate open requests
    /// no-op while this holds.
    pub fn is_active(&self) -> bool {
        !matches!(self.phase, PalettePhase::Closed)
    }

    /// Apply one event, returning the effects the driver must run.
    pub fn apply(&mut self, event: PaletteEvent) -> Vec<PaletteEffect> {
        match event {
            PaletteEvent::OpenRequested {
                mode,
                presentation,
                viewport,
                direct_commit,
            } => self.open_requested(mode, presentation, viewport, direct_commit),
            PaletteEvent::PositionLoaded(saved) => self.position_loaded(saved),
            PaletteEvent::QueryChanged(raw) => self.query_changed(raw),
            PaletteEvent::DebounceElapsed { generation } => self.debounce_elapsed(generation),
            PaletteEvent::CandidatesReady { query, candidates } => {
                self.candidates_ready(query, candidates)
            }
            PaletteEvent::SelectNext => self.select_step(1),
            PaletteEvent::SelectPrev => self.select_step(-1),
            PaletteEvent::HoverCandidate(index) => self.hover(index),
            PaletteEvent::Submit => self.submit(),
            PaletteEvent::CandidateClicked(index) => self.candidate_clicked(index),
            PaletteEvent::Cancel => self.close(),
            PaletteEvent::OutsidePointerDown => self.outside_pointer(),
            PaletteEvent::OutsideArmed => self.outside_armed(),
            PaletteEvent::DragStarted { pointer } => self.drag_started(pointer),
            PaletteEvent::DragMoved { pointer } => self.drag_moved(pointer),
            PaletteEvent::DragReleased => self.drag_released(),
            PaletteEvent::Measured(size) => self.measured(size),
            PaletteEvent::ViewportResized(viewport) => self.viewport_resized(viewport),
            PaletteEvent::FocusLost { target } => self.focus_lost(target),
            PaletteEvent::RefocusTick => self.refocus_tick(),
        }
    }

    // -------------------------------------------------------------------------
    // Opening
    // -------------------------------------------------------------------------

    fn open_requested(
        &mut self,
        mode: PaletteMode,
        presentation: Presentation,
        viewport: Viewport,
        direct_commit: bool,
    ) -> Vec<PaletteEffect> {
        if self.is_active() {
            tracing::debug!("Palette already open; ignoring open request");
            return Vec::new();
        }

        match presentation {
            Presentation::Floating => {
                self.phase = PalettePhase::Opening(OpeningState {
                    mode,
                    viewport,
                    direct_commit,
                });
                vec![PaletteEffect::LoadPosition { mode }]
            }
            Presentation::Embedded => {
                self.phase = PalettePhase::Open(OpenState::new(
                    mode,
                    Presentation::Embedded,
                    viewport,
                    Point::default(),
                    direct_commit,
                ));
                vec![
                    PaletteEffect::FocusInput,
                    PaletteEffect::FetchCandidates {
                        query: String::new(),
                    },
                    PaletteEffect::ScheduleOutsideArm {
                        delay: OUTSIDE_ARM_DELAY,
                    },
                ]
            }
        }
    }

    fn position_loaded(&mut self, saved: Option<Point>) -> Vec<PaletteEffect> {
        let PalettePhase::Opening(opening) = &self.phase else {
            // A position load that outlived its open attempt.
            return Vec::new();
        };

        let position = resolve_open_position(saved, ESTIMATED_FOOTPRINT, opening.viewport);
        self.phase = PalettePhase::Open(OpenState::new(
            opening.mode,
            Presentation::Floating,
            opening.viewport,
            position,
            opening.direct_commit,
        ));

        vec![
            PaletteEffect::FocusInput,
            PaletteEffect::StartFocusRetention,
            PaletteEffect::FetchCandidates {
                query: String::new(),
            },
            PaletteEffect::ScheduleOutsideArm {
                delay: OUTSIDE_ARM_DELAY,
            },
        ]
    }

    // -------------------------------------------------------------------------
    // Query / Candidates
    // -------------------------------------------------------------------------

    fn query_changed(&mut self, raw: String) -> Vec<PaletteEffect> {
        let delay = self.debounce_delay;
        let Some(state) = self.open_mut() else {
            return Vec::new();
        };

        state.raw_query = raw;
        let generation = state.debouncer.arm();
        vec![PaletteEffect::ScheduleDebounce { generation, delay }]
    }

    fn debounce_elapsed(&mut self, generation: u64) -> Vec<PaletteEffect> {
        let Some(state) = self.open_mut() else {
            return Vec::new();
        };
        if !state.debouncer.is_live(generation) {
            // Superseded by a later keystroke.
            return Vec::new();
        }

        state.debounced_query = state.raw_query.clone();
        vec![PaletteEffect::FetchCandidates {
            query: state.debounced_query.clone(),
        }]
    }

    fn candidates_ready(
        &mut self,
        query: String,
        candidates: Vec<Candidate>,
    ) -> Vec<PaletteEffect> {
        let Some(state) = self.open_mut() else {
            return Vec::new();
        };
        if query != state.debounced_query {
            // A slow fetch for a query the user has moved past.
            tracing::debug!("Discarding stale candidates for '{query}'");
            return Vec::new();
        }

        state.candidates = candidates;
        state.selected = 0;
        Vec::new()
    }

    // -------------------------------------------------------------------------
    // Selection / Commit
    // -------------------------------------------------------------------------

    fn select_step(&mut self, delta: isize) -> Vec<PaletteEffect> {
        if let Some(state) = self.open_mut() {
            let len = state.candidates.len();
            if len > 0 {
                let len = len as isize;
                let current = state.selected as isize;
                state.selected = ((current + delta).rem_euclid(len)) as usize;
            }
        }
        Vec::new()
    }

    fn hover(&mut self, index: usize) -> Vec<PaletteEffect> {
        if let Some(state) = self.open_mut() {
            if index < state.candidates.len() {
                state.selected = index;
            }
        }
        Vec::new()
    }

    fn submit(&mut self) -> Vec<PaletteEffect> {
        let Some(state) = self.open_mut() else {
            return Vec::new();
        };

        if let Some(candidate) = state.selected_candidate().cloned() {
            return self.commit(CommitRequest::Candidate(candidate));
        }

        let raw = state.raw_query.trim().to_string();
        if state.direct_commit && !raw.is_empty() {
            let mode = state.mode;
            return self.commit(CommitRequest::DirectQuery { mode, query: raw });
        }

        Vec::new()
    }

    fn candidate_clicked(&mut self, index: usize) -> Vec<PaletteEffect> {
        let Some(state) = self.open_mut() else {
            return Vec::new();
        };
        let Some(candidate) = state.candidates.get(index).cloned() else {
            return Vec::new();
        };
        self.commit(CommitRequest::Candidate(candidate))
    }

    fn commit(&mut self, request: CommitRequest) -> Vec<PaletteEffect> {
        self.phase = PalettePhase::Closed;
        vec![PaletteEffect::Commit(request), PaletteEffect::Dismissed]
    }

    fn close(&mut self) -> Vec<PaletteEffect> {
        if !self.is_active() {
            return Vec::new();
        }
        self.phase = PalettePhase::Closed;
        vec![PaletteEffect::Dismissed]
    }

    fn outside_pointer(&mut self) -> Vec<PaletteEffect> {
        match &self.phase {
            // A drag in progress must not read as an outside click, and
            // neither may the pointer event that triggered the open.
            PalettePhase::Open(state) if state.drag.is_none() && state.outside_armed => {
                self.close()
            }
            _ => Vec::new(),
        }
    }

    fn outside_armed(&mut self) -> Vec<PaletteEffect> {
        if let Some(state) = self.open_mut() {
            state.outside_armed = true;
        }
        Vec::new()
    }

    // -------------------------------------------------------------------------
    // Drag
    // -------------------------------------------------------------------------

    fn drag_started(&mut self, pointer: Point) -> Vec<PaletteEffect> {
        if let Some(state) = self.open_mut() {
            if state.presentation == Presentation::Floating {
                state.drag = Some(DragState {
                    offset: Point {
                        x: pointer.x - state.position.x,
                        y: pointer.y - state.position.y,
                    },
                });
            }
        }
        Vec::new()
    }

    fn drag_moved(&mut self, pointer: Point) -> Vec<PaletteEffect> {
        if let Some(state) = self.open_mut() {
            if let Some(drag) = state.drag {
                let proposed = Point {
                    x: pointer.x - drag.offset.x,
                    y: pointer.y - drag.offset.y,
                };
                state.position = clamp_position(proposed, state.footprint(), state.viewport);
            }
        }
        Vec::new()
    }

    fn drag_released(&mut self) -> Vec<PaletteEffect> {
        let Some(state) = self.open_mut() else {
            return Vec::new();
        };
        if state.drag.take().is_none() {
            return Vec::new();
        }
        vec![PaletteEffect::SavePosition {
            mode: state.mode,
            position: state.position,
        }]
    }

    // -------------------------------------------------------------------------
    // Layout / Focus
    // -------------------------------------------------------------------------

    fn measured(&mut self, size: Size) -> Vec<PaletteEffect> {
        if let Some(state) = self.open_mut() {
            state.measured = Some(size);
            state.reclamp();
        }
        Vec::new()
    }

    fn viewport_resized(&mut self, viewport: Viewport) -> Vec<PaletteEffect> {
        if let Some(state) = self.open_mut() {
            state.viewport = viewport;
            state.reclamp();
        }
        Vec::new()
    }

    fn focus_lost(&mut self, target: FocusTarget) -> Vec<PaletteEffect> {
        let Some(state) = self.open_mut() else {
            return Vec::new();
        };
        if state.presentation != Presentation::Floating {
            return Vec::new();
        }
        if target.should_refocus() {
            vec![PaletteEffect::ScheduleRefocus {
                delay: REFOCUS_DELAY,
            }]
        } else {
            Vec::new()
        }
    }

    fn refocus_tick(&mut self) -> Vec<PaletteEffect> {
        match &self.phase {
            PalettePhase::Open(state) if state.presentation == Presentation::Floating => {
                vec![PaletteEffect::FocusInput]
            }
            _ => Vec::new(),
        }
    }

    fn open_mut(&mut self) -> Option<&mut OpenState> {
        match &mut self.phase {
            PalettePhase::Open(state) => Some(state),
            _ => None,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
