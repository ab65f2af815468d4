pub mod animation;
pub mod animator;
pub mod component;
pub mod config;
pub mod container;
pub mod error;
pub mod geometry;
pub mod scheduler;
pub mod simulate;
pub mod view;

pub use animator::{Animator, AnimatorDisplay, AnimatorKind, AnimatorTexts, Indicator, RefreshState};
pub use component::{ComponentId, Edge, RefreshComponent, RefreshKind};
pub use config::{EasingType, RefreshConfig};
pub use container::{ContainerEvent, ScrollContainer};
pub use error::{Error, Result};
pub use geometry::{EdgeInsets, Point, Rect, Size};
pub use view::ScrollView;
