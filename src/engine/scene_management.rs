//! Asset loading for [`MorphEngine`].

use log::{error, info, warn};

use super::MorphEngine;
use crate::error::MorphoError;
use crate::scene::{AssetLoader, SceneTarget};

/// Handle for one in-flight load, issued by
/// [`MorphEngine::begin_load`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a load ticket must be passed to `complete_load`"]
pub struct LoadTicket {
    version: u64,
}

impl LoadTicket {
    /// Load version this ticket was issued for.
    pub fn version(self) -> u64 {
        self.version
    }
}

/// How a completed load was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The asset is now current. `animated` is `false` when it has no
    /// displacement slot and the engine fell back to mode none.
    Loaded {
        /// Whether the displacement kernel is available.
        animated: bool,
    },
    /// A newer load began first; the result was released unused.
    Superseded,
}

impl MorphEngine {
    /// Start a load: bump the load version and drop all blend and marker
    /// state immediately. The current asset keeps rendering until the
    /// matching [`complete_load`](Self::complete_load).
    ///
    /// # Errors
    ///
    /// Returns [`MorphoError::Disposed`] after disposal.
    pub fn begin_load(&mut self) -> Result<LoadTicket, MorphoError> {
        if self.disposed {
            return Err(MorphoError::Disposed);
        }
        self.load_version += 1;
        self.controller.invalidate(self.clock_now());
        self.restart_pending = true;
        self.markers.clear();
        Ok(LoadTicket {
            version: self.load_version,
        })
    }

    /// Finish a load started with [`begin_load`](Self::begin_load).
    ///
    /// A stale ticket (a newer load began since) releases the fetched
    /// asset and leaves the engine untouched. Otherwise the previous asset
    /// is released and replaced. An asset without a displacement slot
    /// still loads, with animation degraded to mode none.
    ///
    /// # Errors
    ///
    /// Propagates the loader's error for a current ticket, leaving the
    /// previous asset in place. Returns [`MorphoError::Disposed`] after
    /// disposal.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Box<dyn SceneTarget>, MorphoError>,
    ) -> Result<LoadOutcome, MorphoError> {
        if self.disposed || ticket.version != self.load_version {
            if let Ok(mut stale) = result {
                stale.release();
            }
            if self.disposed {
                return Err(MorphoError::Disposed);
            }
            warn!(
                "load {} superseded by load {}; result discarded",
                ticket.version, self.load_version
            );
            return Ok(LoadOutcome::Superseded);
        }

        let mut asset = match result {
            Ok(asset) => asset,
            Err(err) => {
                error!("load {} failed: {err}", ticket.version);
                return Err(err);
            }
        };

        if let Some(mut previous) = self.scene.take() {
            previous.release();
        }
        let animated = asset.displacement_slot().is_some();
        let frame = asset.frame();
        self.scene = Some(asset);
        self.timing.reset();
        self.controller.invalidate(self.clock_now());
        self.restart_pending = true;
        self.markers.clear();

        if animated {
            self.kernel_available = true;
        } else {
            self.degrade_animation("asset has no displacement slot");
        }
        info!(
            "load {} complete: center {:?}, radius {:.3}",
            ticket.version, frame.center, frame.radius
        );
        Ok(LoadOutcome::Loaded { animated })
    }

    /// Fetch `url` through `loader` and install the result.
    ///
    /// # Errors
    ///
    /// See [`complete_load`](Self::complete_load).
    pub async fn load_asset<L: AssetLoader>(
        &mut self,
        loader: &L,
        url: &str,
    ) -> Result<LoadOutcome, MorphoError> {
        let ticket = self.begin_load()?;
        info!("loading {url}");
        let result = loader.load(url).await;
        self.complete_load(ticket, result)
    }
}
