use bytemuck::{Pod, Zeroable};

/// Per-star render data written to the shared buffer for the canvas painter.
/// 16 floats = 64 bytes stride.
///
/// Everything here is already evaluated for the current frame: the painter
/// draws it as-is and keeps no state between frames.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct StarInstance {
    /// Screen X in pixels.
    pub x: f32,
    /// Screen Y in pixels.
    pub y: f32,
    /// Core radius in pixels.
    pub radius: f32,
    /// Opacity (0.0 = invisible, 1.0 = opaque).
    pub alpha: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    /// 0 = normal, 1 = special, 2 = ultra-special.
    pub kind: f32,
    /// Halo gradient radius; 0 when the star has no halo.
    pub halo_radius: f32,
    pub ray_count: f32,
    pub ray_length: f32,
    /// Ray fan rotation in radians.
    pub ray_rotation: f32,
    pub orbiter_count: f32,
    pub orbiter_radius: f32,
    /// Angle of the first orbiting accent in radians.
    pub orbiter_phase: f32,
    /// Parallax layer index (0 = distant).
    pub layer: f32,
}

impl StarInstance {
    pub const FLOATS: usize = 16;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;
}

/// Star instances for one frame, back layer first.
pub struct StarBuffer {
    pub instances: Vec<StarInstance>,
    capacity: usize,
}

impl StarBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            instances: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
    }

    /// Append an instance. Returns false (and drops it) once the buffer is full.
    pub fn push(&mut self, instance: StarInstance) -> bool {
        if self.instances.len() >= self.capacity {
            return false;
        }
        self.instances.push(instance);
        true
    }

    pub fn is_full(&self) -> bool {
        self.instances.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    /// Raw pointer to instance data for shared-buffer reads.
    pub fn instances_ptr(&self) -> *const f32 {
        self.instances.as_ptr() as *const f32
    }
}

impl Default for StarBuffer {
    fn default() -> Self {
        Self::with_capacity(4096)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn star_instance_is_16_floats() {
        assert_eq!(std::mem::size_of::<StarInstance>(), 64);
        assert_eq!(StarInstance::STRIDE_BYTES, 64);
    }

    #[test]
    fn push_stops_at_capacity() {
        let mut buf = StarBuffer::with_capacity(2);
        assert!(buf.push(StarInstance::default()));
        assert!(buf.push(StarInstance::default()));
        assert!(!buf.push(StarInstance::default()));
        assert_eq!(buf.instance_count(), 2);
        assert!(buf.is_full());
    }
}
