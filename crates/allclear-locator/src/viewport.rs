//! Map viewport seam.

use std::sync::Mutex;

use allclear_core::GeoPosition;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ViewportError {
    /// The map widget has not finished loading.
    #[error("map viewport is not ready")]
    NotReady,

    #[error("map rejected pan to {latitude},{longitude}: {reason}")]
    Rejected {
        latitude: f64,
        longitude: f64,
        reason: String,
    },
}

/// The map widget, as far as the resolver is concerned.
pub trait MapViewport: Send + Sync {
    /// Centers the map on `position`.
    ///
    /// # Errors
    ///
    /// Returns [`ViewportError`] if the map cannot pan right now.
    fn pan_to(&self, position: GeoPosition) -> Result<(), ViewportError>;

    fn center(&self) -> GeoPosition;
}

/// A viewport without a rendered map. Tracks the center only.
#[derive(Debug)]
pub struct HeadlessViewport {
    center: Mutex<GeoPosition>,
}

impl HeadlessViewport {
    #[must_use]
    pub fn new(initial_center: GeoPosition) -> Self {
        Self {
            center: Mutex::new(initial_center),
        }
    }
}

impl MapViewport for HeadlessViewport {
    fn pan_to(&self, position: GeoPosition) -> Result<(), ViewportError> {
        if !position.is_valid() {
            return Err(ViewportError::Rejected {
                latitude: position.latitude,
                longitude: position.longitude,
                reason: "coordinates out of range".to_owned(),
            });
        }
        *self
            .center
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = position;
        Ok(())
    }

    fn center(&self) -> GeoPosition {
        *self
            .center
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
