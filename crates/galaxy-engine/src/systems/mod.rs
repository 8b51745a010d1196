pub mod collision;
pub mod effects;
pub mod poi;
pub mod starfield;
#[cfg(feature = "vectors")]
pub mod vector;
