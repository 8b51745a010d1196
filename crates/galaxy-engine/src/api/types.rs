use bytemuck::{Pod, Zeroable};

/// A sound request emitted by the map.
/// The numeric value maps to a host-defined sound; playback is fire-and-forget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct SoundEvent(pub u32);

impl SoundEvent {
    /// Drag started.
    pub const ENGINE_START: Self = Self(1);
    /// Drag ended.
    pub const ENGINE_STOP: Self = Self(2);
    /// Barrier hit (already rate-limited by the map).
    pub const COLLISION: Self = Self(3);
}

/// A map event communicated to the host via the shared buffer.
/// Generic container: `kind` identifies the event, `a/b/c` carry payload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct GameEvent {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl GameEvent {
    pub const FLOATS: usize = 4;
}
