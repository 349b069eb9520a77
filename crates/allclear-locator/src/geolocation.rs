//! Device location request seam.

use allclear_core::GeoPosition;
use futures::future::BoxFuture;

/// Terminal outcome of one device location request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeolocationOutcome {
    Accepted(GeoPosition),
    /// The user refused, or the platform could not provide a fix. Carries no
    /// payload.
    Declined,
}

pub trait GeolocationSource: Send + Sync {
    /// Requests the device position once.
    fn current_position(&self) -> BoxFuture<'_, GeolocationOutcome>;
}

/// A source that always answers with the same outcome.
///
/// Used by the CLI, where the "device" location comes from a flag.
#[derive(Debug, Clone, Copy)]
pub struct FixedGeolocation(pub GeolocationOutcome);

impl FixedGeolocation {
    #[must_use]
    pub fn from_option(position: Option<GeoPosition>) -> Self {
        Self(position.map_or(GeolocationOutcome::Declined, GeolocationOutcome::Accepted))
    }
}

impl GeolocationSource for FixedGeolocation {
    fn current_position(&self) -> BoxFuture<'_, GeolocationOutcome> {
        let outcome = self.0;
        Box::pin(async move { outcome })
    }
}
