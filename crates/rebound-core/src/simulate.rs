//! Headless offset scripts
//!
//! A script drives one refresh component through a [`ScrollView`] and
//! records what it looks like after every step:
//!
//! ```text
//! # pull the header down and let go
//! drag
//! offset -20
//! offset -65
//! release
//! wait 300
//! stop animated
//! ```

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::Serialize;

use crate::animator::RefreshState;
use crate::component::{Edge, RefreshKind};
use crate::config::RefreshConfig;
use crate::geometry::{Point, Size};
use crate::view::ScrollView;
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// Set the raw content offset
    Offset(f64),
    /// Put a finger down
    Drag,
    /// Lift the finger
    Release,
    /// Let the clock run
    Wait(Duration),
    Stop { animated: bool },
    NoMore(bool),
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Offset(y) => write!(f, "offset {y}"),
            Step::Drag => f.write_str("drag"),
            Step::Release => f.write_str("release"),
            Step::Wait(duration) => write!(f, "wait {}", duration.as_millis()),
            Step::Stop { animated: true } => f.write_str("stop animated"),
            Step::Stop { animated: false } => f.write_str("stop"),
            Step::NoMore(value) => write!(f, "nomore {value}"),
        }
    }
}

/// Parsed script; each step keeps its 1-based source line
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Script {
    steps: Vec<(usize, Step)>,
}

impl Script {
    pub fn parse(text: &str) -> Result<Self> {
        let mut steps = Vec::new();
        for (index, raw) in text.lines().enumerate() {
            let line = index + 1;
            let content = raw.split('#').next().unwrap_or_default().trim();
            if content.is_empty() {
                continue;
            }
            steps.push((line, parse_step(content, line)?));
        }
        Ok(Self { steps })
    }

    pub fn steps(&self) -> &[(usize, Step)] {
        &self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl FromStr for Script {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

fn invalid(line: usize, message: impl Into<String>) -> Error {
    Error::InvalidScript {
        line,
        message: message.into(),
    }
}

fn parse_step(content: &str, line: usize) -> Result<Step> {
    let mut words = content.split_whitespace();
    let command = words.next().unwrap_or_default();
    let argument = words.next();
    if let Some(extra) = words.next() {
        return Err(invalid(line, format!("unexpected argument '{extra}'")));
    }

    let number = |name: &str| -> Result<f64> {
        let text = argument.ok_or_else(|| invalid(line, format!("{name} needs a value")))?;
        text.parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or_else(|| invalid(line, format!("'{text}' is not a number")))
    };
    let no_argument = |step: Step| -> Result<Step> {
        match argument {
            Some(extra) => Err(invalid(line, format!("unexpected argument '{extra}'"))),
            None => Ok(step),
        }
    };

    match command {
        "offset" => Ok(Step::Offset(number("offset")?)),
        "drag" => no_argument(Step::Drag),
        "release" => no_argument(Step::Release),
        "wait" => {
            let ms = number("wait")?;
            if ms < 0.0 {
                return Err(invalid(line, "wait cannot be negative"));
            }
            Ok(Step::Wait(Duration::from_millis(ms as u64)))
        }
        "stop" => match argument {
            None => Ok(Step::Stop { animated: false }),
            Some("animated") => Ok(Step::Stop { animated: true }),
            Some(other) => Err(invalid(line, format!("unknown stop mode '{other}'"))),
        },
        "nomore" => match argument {
            Some("true") => Ok(Step::NoMore(true)),
            Some("false") => Ok(Step::NoMore(false)),
            Some(other) => Err(invalid(line, format!("'{other}' is not a boolean"))),
            None => Err(invalid(line, "nomore needs true or false")),
        },
        other => Err(invalid(line, format!("unknown command '{other}'"))),
    }
}

/// Container and component the script runs against
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Setup {
    pub edge: Edge,
    pub kind: RefreshKind,
    /// Visible height of the container
    pub height: f64,
    pub content_height: f64,
}

impl Default for Setup {
    fn default() -> Self {
        Self {
            edge: Edge::Top,
            kind: RefreshKind::Pull,
            height: 100.0,
            content_height: 400.0,
        }
    }
}

/// Snapshot taken after one step
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepReport {
    pub line: usize,
    pub step: String,
    pub time_ms: u128,
    pub offset: f64,
    pub state: RefreshState,
    pub ratio: f64,
    pub inset_top: f64,
    pub inset_bottom: f64,
    pub triggers: usize,
}

impl fmt::Display for StepReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>3} {:<16} t={:>5}ms offset={:>8.2} state={:<18} ratio={:.2} inset=({:.1}, {:.1}) triggers={}",
            self.line,
            self.step,
            self.time_ms,
            self.offset,
            self.state.to_string(),
            self.ratio,
            self.inset_top,
            self.inset_bottom,
            self.triggers,
        )
    }
}

/// Run `script` and report after every step
pub fn run(script: &Script, setup: Setup, config: RefreshConfig) -> Result<Vec<StepReport>> {
    let tick = Duration::from_millis(config.demo.tick_rate_ms.max(1));
    let mut view = ScrollView::new(Size::new(320.0, setup.height), config);
    view.set_content_size(Size::new(320.0, setup.content_height));
    match (setup.edge, setup.kind) {
        (Edge::Top, RefreshKind::Pull) => view.add_top_refresh(|| {}),
        (Edge::Bottom, RefreshKind::Pull) => view.add_bottom_refresh(|| {}),
        (Edge::Top, RefreshKind::AutoLoad) => view.add_top_auto_refresh(|| {}),
        (Edge::Bottom, RefreshKind::AutoLoad) => view.add_bottom_auto_refresh(|| {}),
    };
    view.advance(Duration::ZERO);

    let mut reports = Vec::with_capacity(script.steps.len());
    for &(line, step) in &script.steps {
        apply(&mut view, setup.edge, step, tick).map_err(|e| invalid(line, e.to_string()))?;
        reports.push(snapshot(&view, setup.edge, line, step));
    }
    Ok(reports)
}

/// One JSON object per report, newline separated
pub fn to_json_lines(reports: &[StepReport]) -> Result<String> {
    let mut out = String::new();
    for report in reports {
        out.push_str(&serde_json::to_string(report)?);
        out.push('\n');
    }
    Ok(out)
}

fn apply(view: &mut ScrollView, edge: Edge, step: Step, tick: Duration) -> Result<()> {
    match step {
        Step::Offset(y) => view.set_content_offset(Point::new(0.0, y)),
        Step::Drag => {
            view.begin_dragging();
        }
        Step::Release => view.end_dragging(),
        Step::Wait(duration) => {
            let mut remaining = duration;
            while !remaining.is_zero() {
                let dt = remaining.min(tick);
                view.advance(dt);
                remaining -= dt;
            }
        }
        Step::Stop { animated } => view.stop_refreshing(edge, animated)?,
        Step::NoMore(value) => view.set_no_more_data(edge, value)?,
    }
    Ok(())
}

fn snapshot(view: &ScrollView, edge: Edge, line: usize, step: Step) -> StepReport {
    let container = view.container();
    let inset = container.content_inset();
    let component = view.component(edge);
    StepReport {
        line,
        step: step.to_string(),
        time_ms: view.now().as_millis(),
        offset: container.content_offset().y,
        state: component.map(|c| c.state()).unwrap_or_default(),
        ratio: component.map(|c| c.offset_ratio()).unwrap_or_default(),
        inset_top: inset.top,
        inset_bottom: inset.bottom,
        triggers: component.map(|c| c.trigger_count()).unwrap_or_default(),
    }
}
