pub mod controller;
pub mod queue;

pub use controller::{heading_for, plan_move, Controller, MovePlan, Release, Step};
pub use queue::{InputEvent, InputQueue, CUSTOM_RESIZE};
