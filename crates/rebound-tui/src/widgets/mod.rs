mod feed_list;
mod indicator;
mod status_bar;

pub use feed_list::{list_viewport, FeedListWidget};
pub use indicator::RefreshIndicatorWidget;
pub use status_bar::StatusBarWidget;
