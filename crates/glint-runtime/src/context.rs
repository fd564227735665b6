//! Context shells.
//!
//! Three execution contexts share the collections but never an address
//! space:
//! - `BackgroundContext`: the router plus tab/command plumbing. Sole
//!   writer of the Action collection.
//! - `ContentContext`: per-tab shell running chord dispatch and the
//!   floating palette against a read replica.
//! - `PopupContext`: shortcut CRUD via the router plus the embedded
//!   palette.
//!
//! Content and popup both assemble the same stack: a hydrated replica, a
//! `PaletteBridge` host that turns commits into router traffic, and the
//! two per-mode suggestion sources.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use glint_core::{
    ActionDraft, ActionId, ActionPatch, ActionRecord, AppConfig, ConfigError, PaletteMode,
    ProtocolError, SyncError,
};
use glint_palette::adapter::{FuzzyAdapter, SuggestionFetcher, WebSuggestAdapter};
use glint_palette::{
    Candidate, CommitAction, DriverConfig, KeyDisposition, KeyPress, ModeAdapters, PaletteDriver,
    PaletteEvent, PaletteHost, PaletteView, Point, Presentation, ShortcutDispatcher,
    SuggestionSource, Viewport,
};
use glint_store::{Store, SyncBridge, ToolCatalog};
use parking_lot::Mutex;
use tokio::sync::{mpsc, watch};

use crate::host::{CommandHost, SurfaceHost, TabHost, TabId};
use crate::message::{intent_for_command, Intent};
use crate::router::Router;

/// Intent queue depth per registered tab.
const INTENT_BUFFER: usize = 8;

// =============================================================================
// Tab Registry
// =============================================================================

/// Maps live tabs to their intent channels.
#[derive(Default)]
pub struct TabRegistry {
    tabs: Mutex<HashMap<TabId, mpsc::Sender<Intent>>>,
}

impl TabRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tab, returning the receiving end of its intent channel.
    /// Re-registering an id replaces the previous channel.
    pub fn register(&self, id: TabId) -> mpsc::Receiver<Intent> {
        let (tx, rx) = mpsc::channel(INTENT_BUFFER);
        self.tabs.lock().insert(id, tx);
        tracing::debug!("Registered tab {} ({} live)", id.0, self.count());
        rx
    }

    /// Drop a tab's channel. Returns false if it was not registered.
    pub fn deregister(&self, id: TabId) -> bool {
        self.tabs.lock().remove(&id).is_some()
    }

    /// Number of registered tabs.
    pub fn count(&self) -> usize {
        self.tabs.lock().len()
    }

    /// Deliver an intent to one tab. A missing or dead channel reads as
    /// no live tab.
    pub async fn deliver(&self, id: TabId, intent: Intent) -> Result<(), ProtocolError> {
        let sender = self.tabs.lock().get(&id).cloned();
        let Some(sender) = sender else {
            return Err(ProtocolError::NoActiveTab);
        };
        if sender.send(intent).await.is_err() {
            self.deregister(id);
            return Err(ProtocolError::NoActiveTab);
        }
        Ok(())
    }
}

// =============================================================================
// Background
// =============================================================================

/// The extension's hub: router, tab registry, and command handling.
pub struct BackgroundContext {
    router: Router,
    registry: Arc<TabRegistry>,
    tabs: Arc<dyn TabHost>,
    commands_enabled: bool,
}

impl BackgroundContext {
    /// Start the router task and command plumbing.
    pub fn spawn(
        store: Store,
        bridge: SyncBridge,
        tabs: Arc<dyn TabHost>,
        config: &AppConfig,
    ) -> Self {
        let router = Router::spawn(store, bridge, tabs.clone());
        Self {
            router,
            registry: Arc::new(TabRegistry::new()),
            tabs,
            commands_enabled: config.host_commands,
        }
    }

    /// A cloneable handle to the router.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// The tab registry, for content contexts to register against.
    pub fn registry(&self) -> Arc<TabRegistry> {
        self.registry.clone()
    }

    /// Route an intent to the host's active tab.
    pub async fn send_intent(&self, intent: Intent) -> Result<(), ProtocolError> {
        let Some(active) = self.tabs.active_tab().await else {
            return Err(ProtocolError::NoActiveTab);
        };
        self.registry.deliver(active, intent).await
    }

    /// Handle one named host command.
    pub async fn handle_command(&self, name: &str) -> Result<(), ProtocolError> {
        if !self.commands_enabled {
            tracing::debug!("Host commands disabled; ignoring '{name}'");
            return Ok(());
        }
        let intent = intent_for_command(name)
            .ok_or_else(|| ProtocolError::Unsupported(name.to_string()))?;
        self.send_intent(intent).await
    }

    /// Pump a command stream until it ends. Delivery failures are logged,
    /// not fatal: commands can fire while no tab is ready.
    pub async fn run_commands(&self, commands: Arc<dyn CommandHost>) {
        while let Some(name) = commands.next_command().await {
            if let Err(err) = self.handle_command(&name).await {
                tracing::debug!("Command '{name}' not delivered: {err}");
            }
        }
    }
}

// =============================================================================
// Palette stack (shared by content and popup)
// =============================================================================

/// Palette host that turns commits into router traffic and persists
/// positions into the context's own replica.
struct PaletteBridge {
    router: Router,
    store: Arc<Mutex<Store>>,
    catalog: Arc<ToolCatalog>,
    surface: Arc<dyn SurfaceHost>,
}

#[async_trait]
impl PaletteHost for PaletteBridge {
    async fn load_position(&self, mode: PaletteMode) -> Option<Point> {
        let value = self.store.lock().setting_value(mode.position_key()).cloned()?;
        serde_json::from_value(value).ok()
    }

    async fn save_position(&self, mode: PaletteMode, position: Point) {
        match serde_json::to_value(position) {
            Ok(value) => self.store.lock().set_setting(mode.position_key(), value),
            Err(err) => tracing::warn!("Could not encode position: {err}"),
        }
    }

    fn focus_input(&self) {
        self.surface.focus_input();
    }

    async fn commit(&self, action: CommitAction) {
        match action {
            CommitAction::WebSearch { query } => {
                let url = self.store.lock().search_engine().search_url(&query);
                if let Err(err) = self.router.open_tab(url).await {
                    tracing::warn!("Web search tab failed: {err}");
                }
            }
            CommitAction::OpenUrl { url } => {
                if let Err(err) = self.router.open_tab(url).await {
                    tracing::warn!("Open tab failed: {err}");
                }
            }
            CommitAction::InvokeTool { id } => {
                if let Err(err) = self.catalog.invoke(&id).await {
                    tracing::warn!("Tool invocation failed: {err}");
                }
            }
        }
    }

    fn dismissed(&self) {
        self.surface.dismissed();
    }
}

/// Web suggestions for whatever engine the replica currently holds.
struct WebSource {
    store: Arc<Mutex<Store>>,
    fetcher: Option<Arc<dyn SuggestionFetcher>>,
}

impl WebSource {
    fn adapter(&self) -> WebSuggestAdapter {
        let engine = self.store.lock().search_engine();
        match &self.fetcher {
            Some(fetcher) => WebSuggestAdapter::new(engine).with_fetcher(fetcher.clone()),
            None => WebSuggestAdapter::new(engine),
        }
    }
}

impl SuggestionSource for WebSource {
    fn search(&self, query: &str) -> BoxFuture<'static, Vec<Candidate>> {
        self.adapter().search(query)
    }

    fn supports_direct_commit(&self) -> bool {
        true
    }

    fn direct_commit(&self, query: &str) -> Option<CommitAction> {
        self.adapter().direct_commit(query)
    }
}

/// Fuzzy matching over the replica's current Action collection.
struct ToolSource {
    store: Arc<Mutex<Store>>,
    catalog: Arc<ToolCatalog>,
}

impl SuggestionSource for ToolSource {
    fn search(&self, query: &str) -> BoxFuture<'static, Vec<Candidate>> {
        let tools = self.catalog.rehydrate(self.store.lock().actions());
        FuzzyAdapter::for_tools(&tools).search(query)
    }
}

/// Pull the durable Action snapshot into a fresh replica.
async fn hydrate_store(bridge: &SyncBridge) -> Arc<Mutex<Store>> {
    let mut store = Store::new();
    store.ensure_defaults();
    match bridge.pull(&mut store).await {
        Ok(true) => tracing::debug!("Hydrated {} actions", store.action_count()),
        Ok(false) => tracing::debug!("No stored actions yet"),
        Err(err) => tracing::warn!("Initial hydrate failed: {err}; starting empty"),
    }
    Arc::new(Mutex::new(store))
}

/// Re-pull the Action snapshot into an existing replica.
async fn refresh_actions(
    bridge: &SyncBridge,
    store: &Arc<Mutex<Store>>,
) -> Result<bool, SyncError> {
    match bridge.pull_snapshot().await? {
        Some(records) => {
            store.lock().replace_actions(records);
            Ok(true)
        }
        None => Ok(false),
    }
}

fn build_driver(
    router: &Router,
    store: &Arc<Mutex<Store>>,
    catalog: &Arc<ToolCatalog>,
    surface: Arc<dyn SurfaceHost>,
    fetcher: Option<Arc<dyn SuggestionFetcher>>,
    config: &AppConfig,
) -> PaletteDriver {
    let host = Arc::new(PaletteBridge {
        router: router.clone(),
        store: store.clone(),
        catalog: catalog.clone(),
        surface,
    });
    let adapters = ModeAdapters::new(
        Arc::new(WebSource {
            store: store.clone(),
            fetcher,
        }),
        Arc::new(ToolSource {
            store: store.clone(),
            catalog: catalog.clone(),
        }),
    );
    PaletteDriver::spawn(adapters, host, DriverConfig::from_app(config))
}

// =============================================================================
// Content
// =============================================================================

/// Per-tab shell: chord dispatch plus the floating palette.
#[derive(Clone)]
pub struct ContentContext {
    driver: PaletteDriver,
    dispatcher: ShortcutDispatcher,
    store: Arc<Mutex<Store>>,
    bridge: SyncBridge,
    viewport: Arc<Mutex<Viewport>>,
}

impl ContentContext {
    /// Assemble the content stack: hydrate the replica, build the
    /// dispatcher from config, and start the palette driver.
    pub async fn spawn(
        router: Router,
        bridge: SyncBridge,
        catalog: Arc<ToolCatalog>,
        surface: Arc<dyn SurfaceHost>,
        config: &AppConfig,
        viewport: Viewport,
    ) -> Result<Self, ConfigError> {
        let dispatcher = ShortcutDispatcher::from_config(config)?;
        let store = hydrate_store(&bridge).await;
        let driver = build_driver(&router, &store, &catalog, surface, None, config);
        Ok(Self {
            driver,
            dispatcher,
            store,
            bridge,
            viewport: Arc::new(Mutex::new(viewport)),
        })
    }

    /// Classify one key press; a chord match opens the palette. The
    /// caller must consume the event when told to open.
    pub async fn handle_key(&self, press: KeyPress) -> KeyDisposition {
        if !self.store.lock().shortcuts_enabled() {
            return KeyDisposition::Pass;
        }
        let disposition = self.dispatcher.dispatch(&press);
        if let KeyDisposition::OpenPalette(mode) = disposition {
            self.open_palette(mode).await;
        }
        disposition
    }

    /// Open the floating palette. No-op while one is already open.
    pub async fn open_palette(&self, mode: PaletteMode) {
        let viewport = *self.viewport.lock();
        self.driver
            .open(mode, Presentation::Floating, viewport)
            .await;
    }

    /// Track a viewport resize, re-clamping any open palette.
    pub async fn viewport_resized(&self, viewport: Viewport) {
        *self.viewport.lock() = viewport;
        self.driver
            .send(PaletteEvent::ViewportResized(viewport))
            .await;
    }

    /// Re-pull the Action snapshot (storage change notification from the
    /// host). Returns `true` when a snapshot was applied.
    pub async fn refresh(&self) -> Result<bool, SyncError> {
        refresh_actions(&self.bridge, &self.store).await
    }

    /// Consume intents from the background until the channel closes.
    pub fn attach_intents(&self, mut intents: mpsc::Receiver<Intent>) {
        let context = self.clone();
        tokio::spawn(async move {
            while let Some(intent) = intents.recv().await {
                context.open_palette(intent.mode()).await;
            }
        });
    }

    /// Watch the palette view stream.
    pub fn views(&self) -> watch::Receiver<PaletteView> {
        self.driver.subscribe()
    }

    /// The underlying palette driver, for pointer and edit events.
    pub fn driver(&self) -> &PaletteDriver {
        &self.driver
    }

    /// The context's replica (settings and recent colors live here).
    pub fn store(&self) -> Arc<Mutex<Store>> {
        self.store.clone()
    }
}

// =============================================================================
// Popup
// =============================================================================

/// Popup shell: shortcut CRUD through the router plus the embedded
/// palette.
#[derive(Clone)]
pub struct PopupContext {
    router: Router,
    driver: PaletteDriver,
    store: Arc<Mutex<Store>>,
    bridge: SyncBridge,
    viewport: Viewport,
}

impl PopupContext {
    pub async fn spawn(
        router: Router,
        bridge: SyncBridge,
        catalog: Arc<ToolCatalog>,
        surface: Arc<dyn SurfaceHost>,
        config: &AppConfig,
        viewport: Viewport,
    ) -> Self {
        let store = hydrate_store(&bridge).await;
        let driver = build_driver(&router, &store, &catalog, surface, None, config);
        Self {
            router,
            driver,
            store,
            bridge,
            viewport,
        }
    }

    /// The authoritative shortcut collection, from the background.
    pub async fn shortcuts(&self) -> Result<Vec<ActionRecord>, ProtocolError> {
        self.router.shortcuts().await
    }

    pub async fn create_shortcut(&self, draft: ActionDraft) -> Result<(), ProtocolError> {
        self.router.create_shortcut(draft).await?;
        self.sync_replica().await;
        Ok(())
    }

    pub async fn update_shortcut(
        &self,
        id: ActionId,
        updates: ActionPatch,
    ) -> Result<(), ProtocolError> {
        self.router.update_shortcut(id, updates).await?;
        self.sync_replica().await;
        Ok(())
    }

    pub async fn delete_shortcut(&self, id: ActionId) -> Result<(), ProtocolError> {
        self.router.delete_shortcut(id).await?;
        self.sync_replica().await;
        Ok(())
    }

    /// Open the embedded tool finder.
    pub async fn open_tool_finder(&self) {
        self.driver
            .open(PaletteMode::Tool, Presentation::Embedded, self.viewport)
            .await;
    }

    /// Open the embedded web search.
    pub async fn open_web_search(&self) {
        self.driver
            .open(PaletteMode::Web, Presentation::Embedded, self.viewport)
            .await;
    }

    /// Watch the palette view stream.
    pub fn views(&self) -> watch::Receiver<PaletteView> {
        self.driver.subscribe()
    }

    pub fn driver(&self) -> &PaletteDriver {
        &self.driver
    }

    // The popup's replica feeds its tool finder; keep it aligned after
    // every mutation it makes.
    async fn sync_replica(&self) {
        if let Err(err) = refresh_actions(&self.bridge, &self.store).await {
            tracing::warn!("Replica refresh failed: {err}");
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
