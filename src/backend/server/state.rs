/**
 * Application State Management
 *
 * `AppState` is the single container handed to every handler and to every
 * connection task. Nothing in the realtime core reaches for global state:
 * the presence registry, the stores and the broadcast channel are all
 * constructed once and passed in here.
 *
 * # Thread Safety
 *
 * - `PresenceRegistry` and `TypingState` guard their tables with a mutex
 * - the archive and directory are `Send + Sync` trait objects
 * - `broadcast::Sender` is cloned per subscriber
 *
 * # State Extraction
 *
 * The `FromRef` implementations let handlers take only the part they
 * need, e.g. `State(presence): State<PresenceRegistry>`.
 */

use std::sync::Arc;

use axum::extract::FromRef;
use tokio::sync::broadcast;

use crate::backend::auth::directory::UserDirectory;
use crate::backend::messaging::archive::MessageArchive;
use crate::backend::messaging::typing::TypingState;
use crate::backend::realtime::broadcast::RealtimeEventBroadcast;
use crate::backend::realtime::presence::PresenceRegistry;
use crate::shared::{AppConfig, ServerEvent};

/// Application state shared by the HTTP routes and socket tasks
#[derive(Clone)]
pub struct AppState {
    /// Validated server configuration
    pub config: Arc<AppConfig>,

    /// User directory (identity, presence fields)
    pub directory: Arc<dyn UserDirectory>,

    /// Message archive (system of record)
    pub archive: Arc<dyn MessageArchive>,

    /// Who is reachable right now
    pub presence: PresenceRegistry,

    /// Who is shown as typing to whom
    pub typing: TypingState,

    /// Presence broadcast to every live connection
    pub realtime_broadcast: RealtimeEventBroadcast,
}

impl AppState {
    /// Build state around the given stores with empty in-memory tables
    pub fn new(
        config: AppConfig,
        directory: Arc<dyn UserDirectory>,
        archive: Arc<dyn MessageArchive>,
    ) -> Self {
        let (realtime_broadcast, _) = broadcast::channel::<ServerEvent>(config.broadcast_capacity);
        Self {
            config: Arc::new(config),
            directory,
            archive,
            presence: PresenceRegistry::new(),
            typing: TypingState::new(),
            realtime_broadcast,
        }
    }
}

impl FromRef<AppState> for PresenceRegistry {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.presence.clone()
    }
}

impl FromRef<AppState> for RealtimeEventBroadcast {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.realtime_broadcast.clone()
    }
}

impl FromRef<AppState> for Arc<AppConfig> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.config.clone()
    }
}
