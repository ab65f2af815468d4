//! Animators: the visual half of a refresh component
//!
//! An animator never looks at the container. The owning component feeds it
//! a discrete [`RefreshState`] and a continuous offset ratio; the animator
//! turns them into an [`AnimatorDisplay`] (title, indicator, progress) and a
//! layout inside its own frame. Renderers only read those two values.

mod auto;
mod pull;

pub use auto::AutoRefreshAnimator;
pub use pull::PullToRefreshAnimator;

use std::fmt;

use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthStr;

use crate::config::RefreshTexts;
use crate::geometry::{Rect, Size};

/// Width of one title column in points
const TITLE_COLUMN_WIDTH: f64 = 8.0;
const TITLE_HEIGHT: f64 = 20.0;
const INDICATOR_SIZE: f64 = 16.0;
/// Gap between the title's left edge and the indicator's center
const SPINNER_GAP: f64 = 16.0;
const ARROW_GAP: f64 = 12.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshState {
    #[default]
    Idle,
    Pulling,
    ReleaseToRefresh,
    Refreshing,
    NoMoreData,
}

impl fmt::Display for RefreshState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RefreshState::Idle => "idle",
            RefreshState::Pulling => "pulling",
            RefreshState::ReleaseToRefresh => "release_to_refresh",
            RefreshState::Refreshing => "refreshing",
            RefreshState::NoMoreData => "no_more_data",
        };
        f.write_str(label)
    }
}

/// Built-in animator families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimatorKind {
    /// Arrow + title, 60pt tall, used by manual pull components
    Pull,
    /// Spinner + title, 40pt tall, used by auto-load components
    Auto,
}

impl AnimatorKind {
    pub fn build(self, is_top: bool, texts: &RefreshTexts) -> Box<dyn Animator> {
        let texts = AnimatorTexts::for_edge(texts, is_top);
        match self {
            AnimatorKind::Pull => Box::new(PullToRefreshAnimator::new(is_top, texts)),
            AnimatorKind::Auto => Box::new(AutoRefreshAnimator::new(is_top, texts)),
        }
    }
}

/// Texts resolved for one edge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimatorTexts {
    pub pulling: String,
    pub load_more: String,
    pub release_to_refresh: String,
    pub refreshing: String,
    pub loading: String,
    pub no_more_data: String,
}

impl AnimatorTexts {
    pub fn for_edge(texts: &RefreshTexts, is_top: bool) -> Self {
        let index = if is_top { 0 } else { 1 };
        Self {
            pulling: texts.pulling[index].clone(),
            load_more: texts.load_more[index].clone(),
            release_to_refresh: texts.release_to_refresh.clone(),
            refreshing: texts.refreshing.clone(),
            loading: texts.loading.clone(),
            no_more_data: texts.no_more_data.clone(),
        }
    }
}

impl Default for AnimatorTexts {
    fn default() -> Self {
        Self::for_edge(&RefreshTexts::default(), true)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrowDirection {
    Up,
    Down,
}

impl ArrowDirection {
    pub fn flipped(self) -> Self {
        match self {
            ArrowDirection::Up => ArrowDirection::Down,
            ArrowDirection::Down => ArrowDirection::Up,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    None,
    Arrow(ArrowDirection),
    Spinner,
}

/// What the animator currently shows
#[derive(Debug, Clone, PartialEq)]
pub struct AnimatorDisplay {
    pub title: String,
    pub indicator: Indicator,
    /// Continuous pull progress in [0, 1]
    pub progress: f64,
}

impl Default for AnimatorDisplay {
    fn default() -> Self {
        Self {
            title: String::new(),
            indicator: Indicator::None,
            progress: 0.0,
        }
    }
}

/// Subview frames inside the animator's bounds
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AnimatorLayout {
    pub title: Rect,
    pub indicator: Rect,
}

impl AnimatorLayout {
    fn centered(display: &AnimatorDisplay, size: Size) -> Self {
        let title_width = display.title.width() as f64 * TITLE_COLUMN_WIDTH;
        let title = Rect::new(
            (size.width - title_width) / 2.0,
            (size.height - TITLE_HEIGHT) / 2.0,
            title_width,
            TITLE_HEIGHT,
        );
        let gap = match display.indicator {
            Indicator::Arrow(_) => ARROW_GAP,
            _ => SPINNER_GAP,
        };
        let indicator_center_x = title.origin.x - gap;
        let indicator = Rect::new(
            indicator_center_x - INDICATOR_SIZE / 2.0,
            (size.height - INDICATOR_SIZE) / 2.0,
            INDICATOR_SIZE,
            INDICATOR_SIZE,
        );
        Self { title, indicator }
    }
}

/// State shared by every animator implementation
#[derive(Debug, Clone)]
pub struct AnimatorCore {
    state: RefreshState,
    offset_ratio: f64,
    texts: AnimatorTexts,
    is_top: bool,
    size: Size,
    display: AnimatorDisplay,
    layout: AnimatorLayout,
    texts_dirty: bool,
    renders: usize,
}

impl AnimatorCore {
    pub fn new(is_top: bool, texts: AnimatorTexts) -> Self {
        Self {
            state: RefreshState::Idle,
            offset_ratio: 0.0,
            texts,
            is_top,
            size: Size::ZERO,
            display: AnimatorDisplay::default(),
            layout: AnimatorLayout::default(),
            // first refresh_display renders the idle title
            texts_dirty: true,
            renders: 0,
        }
    }

    pub fn is_top(&self) -> bool {
        self.is_top
    }

    pub fn texts(&self) -> &AnimatorTexts {
        &self.texts
    }
}

/// Clamp into [0, 1]; NaN collapses to zero
pub fn clamp_ratio(ratio: f64) -> f64 {
    if ratio.is_nan() {
        0.0
    } else {
        ratio.clamp(0.0, 1.0)
    }
}

pub trait Animator: fmt::Debug {
    fn core(&self) -> &AnimatorCore;

    fn core_mut(&mut self) -> &mut AnimatorCore;

    /// Resting height of the control
    fn view_height(&self) -> f64;

    /// Drag distance needed to cross the trigger threshold
    fn trigger_height(&self) -> f64 {
        0.0
    }

    /// Title and indicator for `state`
    fn render(&self, state: RefreshState) -> AnimatorDisplay;

    fn state(&self) -> RefreshState {
        self.core().state
    }

    /// Re-render and re-layout when the state changes
    fn set_state(&mut self, state: RefreshState) {
        if self.core().state == state {
            return;
        }
        self.core_mut().state = state;
        self.rerender();
    }

    fn offset_ratio(&self) -> f64 {
        self.core().offset_ratio
    }

    /// Update the continuous visual only; the title is left alone
    fn set_offset_ratio(&mut self, ratio: f64) {
        let ratio = clamp_ratio(ratio);
        let core = self.core_mut();
        if core.offset_ratio == ratio {
            return;
        }
        core.offset_ratio = ratio;
        core.display.progress = ratio;
    }

    /// Lay out subviews inside `size`
    fn adjust_view(&mut self, size: Size) {
        let core = self.core_mut();
        core.size = size;
        core.layout = AnimatorLayout::centered(&core.display, size);
    }

    fn size(&self) -> Size {
        self.core().size
    }

    fn display(&self) -> &AnimatorDisplay {
        &self.core().display
    }

    fn layout(&self) -> &AnimatorLayout {
        &self.core().layout
    }

    fn texts(&self) -> &AnimatorTexts {
        &self.core().texts
    }

    /// Replace the texts. The display catches up on the next
    /// [`Animator::refresh_display`], however many texts changed.
    fn set_texts(&mut self, texts: AnimatorTexts) {
        let core = self.core_mut();
        if core.texts == texts {
            return;
        }
        core.texts = texts;
        core.texts_dirty = true;
    }

    /// Apply pending text changes; returns whether a render happened
    fn refresh_display(&mut self) -> bool {
        if !self.core().texts_dirty {
            return false;
        }
        self.core_mut().texts_dirty = false;
        self.rerender();
        true
    }

    /// Number of renders so far
    fn renders(&self) -> usize {
        self.core().renders
    }

    fn rerender(&mut self) {
        let mut display = self.render(self.core().state);
        let core = self.core_mut();
        display.progress = core.offset_ratio;
        core.display = display;
        core.renders += 1;
        let size = core.size;
        self.adjust_view(size);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_texts_pick_edge_variant() {
        let mut texts = RefreshTexts::default();
        texts.pulling = ["Pull down".to_string(), "Pull up".to_string()];
        assert_eq!(AnimatorTexts::for_edge(&texts, true).pulling, "Pull down");
        assert_eq!(AnimatorTexts::for_edge(&texts, false).pulling, "Pull up");
    }

    #[test]
    fn test_clamp_ratio_bounds() {
        assert_eq!(clamp_ratio(-4.0), 0.0);
        assert_eq!(clamp_ratio(0.25), 0.25);
        assert_eq!(clamp_ratio(f64::INFINITY), 1.0);
        assert_eq!(clamp_ratio(f64::NAN), 0.0);
    }

    #[test]
    fn test_build_kind_geometry() {
        let texts = RefreshTexts::default();
        let pull = AnimatorKind::Pull.build(true, &texts);
        assert_eq!(pull.view_height(), 60.0);
        assert_eq!(pull.trigger_height(), 60.0);

        let auto = AnimatorKind::Auto.build(false, &texts);
        assert_eq!(auto.view_height(), 40.0);
        assert_eq!(auto.trigger_height(), 24.0);
    }

    #[test]
    fn test_layout_centers_title() {
        let mut animator = AnimatorKind::Auto.build(true, &RefreshTexts::default());
        animator.set_state(RefreshState::Refreshing);
        animator.adjust_view(Size::new(320.0, 40.0));

        let layout = animator.layout();
        // "Loading..." is 10 columns wide
        assert_eq!(layout.title.size.width, 80.0);
        assert_eq!(layout.title.origin.x, 120.0);
        assert_eq!(layout.title.center().y, 20.0);
        assert_eq!(layout.indicator.center().x, 104.0);
    }

    #[test]
    fn test_set_state_same_value_does_not_rerender() {
        let mut animator = AnimatorKind::Pull.build(true, &RefreshTexts::default());
        animator.set_state(RefreshState::Pulling);
        let renders = animator.renders();
        animator.set_state(RefreshState::Pulling);
        assert_eq!(animator.renders(), renders);
    }

    #[test]
    fn test_offset_ratio_keeps_title() {
        let mut animator = AnimatorKind::Pull.build(true, &RefreshTexts::default());
        animator.set_state(RefreshState::Pulling);
        let title = animator.display().title.clone();
        animator.set_offset_ratio(0.5);
        assert_eq!(animator.display().title, title);
        assert_eq!(animator.display().progress, 0.5);
        animator.set_offset_ratio(3.0);
        assert_eq!(animator.offset_ratio(), 1.0);
    }

    #[test]
    fn test_text_changes_are_coalesced() {
        let mut animator = AnimatorKind::Pull.build(true, &RefreshTexts::default());
        let renders = animator.renders();

        let mut texts = animator.texts().clone();
        texts.pulling = "Drag me".to_string();
        animator.set_texts(texts.clone());
        texts.refreshing = "Working".to_string();
        animator.set_texts(texts);

        assert_eq!(animator.renders(), renders);
        assert!(animator.refresh_display());
        assert_eq!(animator.renders(), renders + 1);
        assert_eq!(animator.display().title, "Drag me");
        assert!(!animator.refresh_display());
    }
}
