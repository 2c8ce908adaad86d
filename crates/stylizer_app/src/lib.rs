//! Stylizer app: binds the lifecycle state machine to the engine.
mod assets;
mod config;
mod controller;
mod effects;
mod logging;
mod observer;

pub use assets::{load_asset, media_type_for, AssetError};
pub use config::{StylizerConfig, API_URL_VAR};
pub use controller::LifecycleController;
pub use effects::{map_event, EffectRunner};
pub use logging::{initialize as initialize_logging, LogDestination};
pub use observer::{LoggingObserver, Observer};
pub use stylizer_engine::DEFAULT_ARTIFACT_NAME;
