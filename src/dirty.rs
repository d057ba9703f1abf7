/// Whether the cached shadow raster can be reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirtyState {
    /// The cached raster matches the current parameters and bounds.
    Clean,
    /// The raster must be rebuilt before it is painted again.
    Dirty,
}

/// Everything that can invalidate the cached shadow raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Invalidation {
    /// The tracker was just created and nothing has been rasterized yet.
    Created,
    Enabled,
    Radius,
    Offset,
    Spread,
    Color,
    /// The content was laid out with a different size.
    Bounds,
    /// The host reported that the content changed its appearance.
    Content,
    /// The shadow resources were released.
    Released,
}

/// Tracks whether the shadow raster has to be recomputed.
///
/// There is no partial invalidation: any trigger dirties the whole raster,
/// and only a successful rebuild makes it clean again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirtyTracker {
    state: DirtyState,
    last_invalidation: Option<Invalidation>,
}

impl DirtyTracker {
    pub fn new() -> Self {
        Self {
            state: DirtyState::Dirty,
            last_invalidation: Some(Invalidation::Created),
        }
    }

    pub fn invalidate(&mut self, reason: Invalidation) {
        if self.state == DirtyState::Clean {
            log::trace!("shadow raster invalidated: {reason:?}");
        }
        self.state = DirtyState::Dirty;
        self.last_invalidation = Some(reason);
    }

    /// Call this only after the full capture/extract/blur pipeline succeeded.
    pub fn mark_clean(&mut self) {
        self.state = DirtyState::Clean;
        self.last_invalidation = None;
    }

    pub fn state(&self) -> DirtyState {
        self.state
    }

    pub fn is_dirty(&self) -> bool {
        self.state == DirtyState::Dirty
    }

    /// The most recent trigger since the raster was last clean.
    pub fn last_invalidation(&self) -> Option<Invalidation> {
        self.last_invalidation
    }
}

impl Default for DirtyTracker {
    fn default() -> Self {
        Self::new()
    }
}
