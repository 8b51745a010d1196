pub mod api;
pub mod bridge;
pub mod config;
pub mod core;
pub mod error;
pub mod extensions;
pub mod galaxy;
pub mod input;
pub mod persist;
pub mod renderer;
pub mod systems;

pub use glam;

// Re-export key types at crate root for convenience
pub use api::game::{EngineContext, Game, GameConfig};
pub use api::types::{GameEvent, SoundEvent};
pub use bridge::protocol::ProtocolLayout;
pub use config::MapConfig;
pub use core::scheduler::Scheduler;
pub use core::time::{FixedTimestep, VirtualClock};
pub use core::world::{toroidal_delta, toroidal_distance, wrap, Proposal, WorldState};
pub use error::{MapError, MapResult};
pub use galaxy::{GalaxyMap, Job, MapEvent};
pub use input::{Controller, InputEvent, InputQueue, CUSTOM_RESIZE};
pub use persist::{MemoryStore, PositionStore, STORAGE_KEY};
pub use renderer::instance::{StarBuffer, StarInstance};
pub use systems::collision::{Barrier, CollisionEvent};
pub use systems::effects::{EffectsState, SparkInstance};
pub use systems::poi::{default_points, PointOfInterest};
pub use systems::starfield::Starfield;

#[cfg(feature = "vectors")]
pub use systems::vector::{VectorColor, VectorState};

pub use extensions::{Easing, Tween};
