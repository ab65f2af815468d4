//! Offset animation primitives
//!
//! ## Atoms
//! - `easing` - Pure easing curves (cubic, quintic, exponential)
//! - `timing` - Progress and interpolation helpers over a virtual clock
//!
//! ## Controller
//! - `offset` - A single eased transition of the container's content offset

pub mod easing;
pub mod offset;
pub mod timing;

pub use offset::OffsetAnimation;
