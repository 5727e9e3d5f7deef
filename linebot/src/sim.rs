//! Simulated robot hardware driven by a scripted scenario.
//!
//! A scenario is a TOML list of sensor frames. The distance and line sensors share one
//! [`ScenarioFeed`] and keep returning the current frame until the run loop advances it,
//! so both reads of a cycle see the same data.

use std::{cell::Cell, path::Path, rc::Rc};

use color_eyre::{
    Result,
    eyre::{WrapErr, ensure},
};
use linebot_core::{
    ColorPattern, DifferentialDrive, Display, DistanceReading, DistanceSensor, DriveProfile,
    LineReading, LineSensor, Robot, WheelCommand, WheelDriver,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

const BUILTIN_SCENARIO: &str = include_str!("../scenarios/demo.toml");

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ScenarioFile {
    #[serde(default = "default_name")]
    pub name: String,
    /// Start over after the last frame instead of holding it.
    #[serde(default = "default_looped")]
    pub looped: bool,
    pub frames: Vec<Frame>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Frame {
    pub distances: [u32; 4],
    #[serde(default)]
    pub intensities: [u16; 4],
    /// Overrides the colors classified from `intensities`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<ColorPattern>,
    /// Number of cycles the frame is held.
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

fn default_name() -> String {
    "Untitled".to_string()
}

fn default_looped() -> bool {
    true
}

fn default_repeat() -> u32 {
    1
}

impl Frame {
    pub fn distances(&self) -> DistanceReading {
        DistanceReading::new(self.distances)
    }

    pub fn line(&self, threshold: u16) -> LineReading {
        match self.colors {
            Some(colors) => LineReading::new(colors.0).with_intensities(self.intensities),
            None => LineReading::from_intensities(self.intensities, threshold),
        }
    }
}

impl ScenarioFile {
    /// The demo lap bundled into the binary.
    pub fn load_builtin() -> Result<Self> {
        Self::parse(BUILTIN_SCENARIO).wrap_err("failed to parse built-in scenario")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read scenario {}", path.display()))?;
        Self::parse(&text).wrap_err_with(|| format!("failed to parse scenario {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        let scenario: Self = toml::from_str(text)?;
        ensure!(
            scenario.frames.iter().any(|frame| frame.repeat > 0),
            "scenario has no frames to play"
        );
        Ok(scenario)
    }

    /// Frames with `repeat` applied, one entry per cycle.
    pub fn expanded(&self) -> Vec<Frame> {
        self.frames
            .iter()
            .flat_map(|frame| std::iter::repeat_n(frame.clone(), frame.repeat as usize))
            .collect()
    }

    pub fn into_feed(self, threshold: u16) -> Rc<ScenarioFeed> {
        info!(name = %self.name, frames = self.frames.len(), looped = self.looped, "loaded scenario");
        Rc::new(ScenarioFeed::new(&self, threshold))
    }
}

/// Frame cursor shared by the simulated sensors.
#[derive(Debug)]
pub struct ScenarioFeed {
    frames: Vec<(DistanceReading, LineReading)>,
    looped: bool,
    cursor: Cell<usize>,
    exhausted: Cell<bool>,
}

impl ScenarioFeed {
    pub fn new(scenario: &ScenarioFile, threshold: u16) -> Self {
        Self {
            frames: scenario
                .expanded()
                .iter()
                .map(|frame| (frame.distances(), frame.line(threshold)))
                .collect(),
            looped: scenario.looped,
            cursor: Cell::new(0),
            exhausted: Cell::new(false),
        }
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn position(&self) -> usize {
        self.cursor.get()
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted.get()
    }

    /// Move to the next frame. Wraps when looped; otherwise holds the last frame.
    pub fn advance(&self) {
        let next = self.cursor.get() + 1;
        if next < self.frames.len() {
            self.cursor.set(next);
        } else if self.looped {
            self.cursor.set(0);
        } else if !self.exhausted.replace(true) {
            warn!(frames = self.frames.len(), "scenario exhausted, holding last frame");
        }
    }

    fn current(&self) -> (DistanceReading, LineReading) {
        self.frames[self.cursor.get()]
    }
}

pub struct SimDistanceSensor(pub Rc<ScenarioFeed>);

impl DistanceSensor for SimDistanceSensor {
    fn read_distances(&mut self) -> linebot_core::Result<DistanceReading> {
        Ok(self.0.current().0)
    }
}

pub struct SimLineSensor(pub Rc<ScenarioFeed>);

impl LineSensor for SimLineSensor {
    fn read_line(&mut self) -> linebot_core::Result<LineReading> {
        Ok(self.0.current().1)
    }
}

/// Wheel driver that only remembers what it was told.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordingWheels {
    pub left: WheelCommand,
    pub right: WheelCommand,
    pub applied: u64,
}

impl Default for RecordingWheels {
    fn default() -> Self {
        Self {
            left: WheelCommand::STOP,
            right: WheelCommand::STOP,
            applied: 0,
        }
    }
}

impl WheelDriver for RecordingWheels {
    fn drive(&mut self, left: WheelCommand, right: WheelCommand) -> linebot_core::Result<()> {
        self.left = left;
        self.right = right;
        self.applied += 1;
        Ok(())
    }
}

pub type SimRobot<V> =
    Robot<SimDistanceSensor, SimLineSensor, DifferentialDrive<RecordingWheels>, V>;

/// Wires the simulated devices for one run.
pub fn build_robot<V: Display>(feed: &Rc<ScenarioFeed>, profile: DriveProfile, display: V) -> SimRobot<V> {
    Robot::new(
        SimDistanceSensor(Rc::clone(feed)),
        SimLineSensor(Rc::clone(feed)),
        DifferentialDrive::new(RecordingWheels::default(), profile),
        display,
    )
}
