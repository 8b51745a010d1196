pub mod instance;

pub use instance::{StarBuffer, StarInstance};
