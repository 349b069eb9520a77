pub mod app_config;
pub mod config;
pub mod criteria;
pub mod facility;
pub mod payload;
pub mod url_state;
pub mod view;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use criteria::{SearchCriteria, ANY};
pub use facility::{FacilityRecord, GeoPosition, PlaceSelection};
pub use payload::{strip_inactive_keys, SearchOrigin, SearchPayload, SEARCH_RADIUS_MILES};
pub use url_state::UrlQuery;
pub use view::{Anchor, DrawerHeight, DrawerMode, ViewState, MOBILE_BREAKPOINT_PX};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
