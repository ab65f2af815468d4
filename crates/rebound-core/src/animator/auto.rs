use super::{Animator, AnimatorCore, AnimatorDisplay, AnimatorTexts, Indicator, RefreshState};

/// Spinner + title animator for auto-load components
#[derive(Debug, Clone)]
pub struct AutoRefreshAnimator {
    core: AnimatorCore,
}

impl AutoRefreshAnimator {
    pub fn new(is_top: bool, texts: AnimatorTexts) -> Self {
        Self {
            core: AnimatorCore::new(is_top, texts),
        }
    }
}

impl Animator for AutoRefreshAnimator {
    fn core(&self) -> &AnimatorCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut AnimatorCore {
        &mut self.core
    }

    fn view_height(&self) -> f64 {
        40.0
    }

    fn trigger_height(&self) -> f64 {
        24.0
    }

    fn render(&self, state: RefreshState) -> AnimatorDisplay {
        let texts = self.core.texts();
        let (title, indicator) = match state {
            RefreshState::Idle | RefreshState::Pulling => (texts.load_more.clone(), Indicator::None),
            RefreshState::Refreshing => (texts.loading.clone(), Indicator::Spinner),
            RefreshState::NoMoreData => (texts.no_more_data.clone(), Indicator::None),
            // auto-load never waits for a release
            RefreshState::ReleaseToRefresh => (self.core.display.title.clone(), Indicator::None),
        };
        AnimatorDisplay {
            title,
            indicator,
            progress: self.core.offset_ratio,
        }
    }
}
