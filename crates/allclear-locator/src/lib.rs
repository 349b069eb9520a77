//! Facility search orchestration: location triggers, the shared map state
//! store, and the view projections that render from it.

pub mod geolocation;
pub mod resolver;
pub mod state;
pub mod store;
pub mod view_sync;
pub mod viewport;

pub use geolocation::{FixedGeolocation, GeolocationOutcome, GeolocationSource};
pub use resolver::{LocationResolver, MountOutcome, ResolverOptions};
pub use state::{MapState, SearchFailure, SearchTicket};
pub use store::MapStore;
pub use view_sync::{
    FilterBadge, ListAction, ListItemEvent, ListView, MapMarker, RetryPrompt, ViewSync,
};
pub use viewport::{HeadlessViewport, MapViewport, ViewportError};
