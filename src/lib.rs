pub mod app_core;
pub mod checkout;
pub mod coloring;
pub mod input;
pub mod local_snapshot;
pub mod persisted;
pub mod runtime;
pub mod store;

pub use app_core::{AppAction, AppCore, AppSnapshot, AppSubscription, GameRoute};
pub use checkout::{
    create_checkout_session, CheckoutError, CheckoutTransport, HttpTransport, LineItem,
    CHECKOUT_BASE_URL_DEFAULT,
};
pub use coloring::{ColoringAction, ColoringState, ColoringView};
pub use persisted::{BootRecord, HighScoreTable, SettingsBlob, ThemeMode};
pub use runtime::{TickDriver, TICK_STEP_MS};
pub use store::{FileStore, KeyValueStore, MemoryStore};
