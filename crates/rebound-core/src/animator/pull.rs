use super::{Animator, AnimatorCore, AnimatorDisplay, AnimatorTexts, ArrowDirection, Indicator, RefreshState};

/// Arrow + title animator for manual pull components
#[derive(Debug, Clone)]
pub struct PullToRefreshAnimator {
    core: AnimatorCore,
}

impl PullToRefreshAnimator {
    pub fn new(is_top: bool, texts: AnimatorTexts) -> Self {
        Self {
            core: AnimatorCore::new(is_top, texts),
        }
    }

    /// Arrow direction while pulling; it flips once the trigger is crossed
    fn pulling_arrow(&self) -> ArrowDirection {
        if self.core.is_top() {
            ArrowDirection::Down
        } else {
            ArrowDirection::Up
        }
    }
}

impl Animator for PullToRefreshAnimator {
    fn core(&self) -> &AnimatorCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut AnimatorCore {
        &mut self.core
    }

    fn view_height(&self) -> f64 {
        60.0
    }

    fn trigger_height(&self) -> f64 {
        60.0
    }

    fn render(&self, state: RefreshState) -> AnimatorDisplay {
        let texts = self.core.texts();
        let (title, indicator) = match state {
            RefreshState::Idle => (texts.pulling.clone(), Indicator::None),
            RefreshState::Pulling => (texts.pulling.clone(), Indicator::Arrow(self.pulling_arrow())),
            RefreshState::ReleaseToRefresh => (
                texts.release_to_refresh.clone(),
                Indicator::Arrow(self.pulling_arrow().flipped()),
            ),
            RefreshState::Refreshing => (texts.refreshing.clone(), Indicator::Spinner),
            // pull components never end their data; keep whatever is shown
            RefreshState::NoMoreData => (self.core.display.title.clone(), Indicator::None),
        };
        AnimatorDisplay {
            title,
            indicator,
            progress: self.core.offset_ratio,
        }
    }
}
