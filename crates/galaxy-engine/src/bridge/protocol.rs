/// Shared buffer layout between the map and the host painter.
///
/// Layout (all values in f32 / 4 bytes):
/// ```text
/// [Header: 16 floats]
/// [Stars: max_stars × 16 floats]
/// [Sparks: max_sparks × 6 floats]
/// [Vectors: max_vector_vertices × 6 floats]
/// [Sounds: max_sounds × 1 float]
/// [Events: max_events × 4 floats]
/// ```
///
/// Capacities are written once into the header at init; readers compute
/// section offsets from them.

use crate::api::game::GameConfig;
use crate::api::types::GameEvent;
use crate::renderer::instance::StarInstance;
use crate::systems::effects::SparkInstance;

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 16;

/// Header field indices.
pub const HEADER_LOCK: usize = 0;
pub const HEADER_FRAME_COUNTER: usize = 1;
pub const HEADER_MAX_STARS: usize = 2;
pub const HEADER_STAR_COUNT: usize = 3;
pub const HEADER_MAX_SPARKS: usize = 4;
pub const HEADER_SPARK_COUNT: usize = 5;
pub const HEADER_MAX_VECTOR_VERTICES: usize = 6;
pub const HEADER_VECTOR_VERTEX_COUNT: usize = 7;
pub const HEADER_MAX_SOUNDS: usize = 8;
pub const HEADER_SOUND_COUNT: usize = 9;
pub const HEADER_MAX_EVENTS: usize = 10;
pub const HEADER_EVENT_COUNT: usize = 11;
pub const HEADER_PROTOCOL_VERSION: usize = 12;
pub const HEADER_VIEWPORT_WIDTH: usize = 13;
pub const HEADER_VIEWPORT_HEIGHT: usize = 14;
/// Simulation time in seconds.
pub const HEADER_TIME: usize = 15;

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Floats per star instance (wire format).
pub const STAR_FLOATS: usize = StarInstance::FLOATS;

/// Floats per spark instance: x, y, size, alpha, heat, pad.
pub const SPARK_FLOATS: usize = SparkInstance::FLOATS;

/// Floats per overlay vertex: x, y, r, g, b, a.
pub const VECTOR_VERTEX_FLOATS: usize = 6;

/// Floats per game event: kind, a, b, c.
pub const EVENT_FLOATS: usize = GameEvent::FLOATS;

/// Runtime-computed buffer layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolLayout {
    pub max_stars: usize,
    pub max_sparks: usize,
    pub max_vector_vertices: usize,
    pub max_sounds: usize,
    pub max_events: usize,

    pub star_data_floats: usize,
    pub spark_data_floats: usize,
    pub vector_data_floats: usize,
    pub sound_data_floats: usize,
    pub event_data_floats: usize,

    pub star_data_offset: usize,
    pub spark_data_offset: usize,
    pub vector_data_offset: usize,
    pub sound_data_offset: usize,
    pub event_data_offset: usize,

    /// Total buffer size in floats.
    pub buffer_total_floats: usize,
    /// Total buffer size in bytes.
    pub buffer_total_bytes: usize,
}

impl ProtocolLayout {
    /// Compute layout from raw capacity values.
    pub fn new(
        max_stars: usize,
        max_sparks: usize,
        max_vector_vertices: usize,
        max_sounds: usize,
        max_events: usize,
    ) -> Self {
        let star_data_floats = max_stars * STAR_FLOATS;
        let spark_data_floats = max_sparks * SPARK_FLOATS;
        let vector_data_floats = max_vector_vertices * VECTOR_VERTEX_FLOATS;
        let sound_data_floats = max_sounds;
        let event_data_floats = max_events * EVENT_FLOATS;

        let star_data_offset = HEADER_FLOATS;
        let spark_data_offset = star_data_offset + star_data_floats;
        let vector_data_offset = spark_data_offset + spark_data_floats;
        let sound_data_offset = vector_data_offset + vector_data_floats;
        let event_data_offset = sound_data_offset + sound_data_floats;

        let buffer_total_floats = event_data_offset + event_data_floats;

        Self {
            max_stars,
            max_sparks,
            max_vector_vertices,
            max_sounds,
            max_events,
            star_data_floats,
            spark_data_floats,
            vector_data_floats,
            sound_data_floats,
            event_data_floats,
            star_data_offset,
            spark_data_offset,
            vector_data_offset,
            sound_data_offset,
            event_data_offset,
            buffer_total_floats,
            buffer_total_bytes: buffer_total_floats * 4,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(
            config.max_stars,
            config.max_sparks,
            config.max_vector_vertices,
            config.max_sounds,
            config.max_events,
        )
    }

    /// Fill the capacity and version fields of a header.
    pub fn write_capacities(&self, header: &mut [f32; HEADER_FLOATS]) {
        header[HEADER_MAX_STARS] = self.max_stars as f32;
        header[HEADER_MAX_SPARKS] = self.max_sparks as f32;
        header[HEADER_MAX_VECTOR_VERTICES] = self.max_vector_vertices as f32;
        header[HEADER_MAX_SOUNDS] = self.max_sounds as f32;
        header[HEADER_MAX_EVENTS] = self.max_events as f32;
        header[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_default_config_matches_expected_sizes() {
        let layout = ProtocolLayout::from_config(&GameConfig::default());

        assert_eq!(layout.max_stars, 4096);
        assert_eq!(layout.star_data_floats, 4096 * 16);
        assert_eq!(layout.spark_data_floats, 256 * 6);
        assert_eq!(layout.vector_data_floats, 16384 * 6);
        assert_eq!(layout.sound_data_floats, 32);
        assert_eq!(layout.event_data_floats, 32 * 4);
        assert_eq!(layout.buffer_total_bytes, layout.buffer_total_floats * 4);
    }

    #[test]
    fn offsets_are_contiguous() {
        let layout = ProtocolLayout::new(100, 20, 300, 10, 8);

        assert_eq!(layout.star_data_offset, HEADER_FLOATS);
        assert_eq!(layout.spark_data_offset, layout.star_data_offset + layout.star_data_floats);
        assert_eq!(layout.vector_data_offset, layout.spark_data_offset + layout.spark_data_floats);
        assert_eq!(layout.sound_data_offset, layout.vector_data_offset + layout.vector_data_floats);
        assert_eq!(layout.event_data_offset, layout.sound_data_offset + layout.sound_data_floats);
        assert_eq!(layout.buffer_total_floats, layout.event_data_offset + layout.event_data_floats);
    }

    #[test]
    fn custom_capacities_compute_correctly() {
        let layout = ProtocolLayout::new(10, 2, 30, 4, 5);
        let expected_total = HEADER_FLOATS + 10 * 16 + 2 * 6 + 30 * 6 + 4 + 5 * 4;
        assert_eq!(layout.buffer_total_floats, expected_total);
    }

    #[test]
    fn header_capacities_round_trip_through_floats() {
        let layout = ProtocolLayout::new(4096, 256, 16384, 32, 32);
        let mut header = [0.0; HEADER_FLOATS];
        layout.write_capacities(&mut header);
        assert_eq!(header[HEADER_MAX_STARS] as usize, 4096);
        assert_eq!(header[HEADER_MAX_VECTOR_VERTICES] as usize, 16384);
        assert_eq!(header[HEADER_PROTOCOL_VERSION], PROTOCOL_VERSION);
    }
}
