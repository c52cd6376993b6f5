use crate::resource::{Handle, HandleKey, ResourceId};

/// The frame handed out by [`Surface::get_current_texture`](super::Surface::get_current_texture).
///
/// A plain value: the surface's frame slot key, the generation of the acquisition that
/// produced it and the native texture id. The slot key is rebound in the registry on
/// every acquisition, so resolving the slot always yields the live texture, while the
/// generation lets the surface reject frames that were already presented.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct FrameTexture {
    pub(crate) slot: HandleKey,
    pub(crate) generation: u64,
    pub(crate) id: ResourceId,
}

impl FrameTexture {
    pub fn slot(&self) -> HandleKey {
        self.slot
    }

    /// Acquisition counter of the owning surface when this frame was produced.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn resource_id(&self) -> ResourceId {
        self.id
    }
}

impl Handle for FrameTexture {
    fn handle_key(&self) -> HandleKey {
        self.slot
    }
}
