use std::fmt;

use crate::command::MotionCommand;
use crate::decision::Snapshot;
use crate::distance::DistanceReading;
use crate::line::{LineChannel, LineReading};

/// Shown in place of the command label before the engine has issued anything.
pub const NO_COMMAND: &str = "None";

/// Human-readable verdict of the distance model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    BallFound,
    ObjectFound,
    Clear,
}

impl Status {
    /// Ball detection wins over obstacle detection.
    pub fn of(distances: &DistanceReading) -> Self {
        if distances.is_ball() {
            Self::BallFound
        } else if distances.is_obstacle() {
            Self::ObjectFound
        } else {
            Self::Clear
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::BallFound => "Ball Found",
            Self::ObjectFound => "Object Found",
            Self::Clear => "",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Read-only view handed to displays once per cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub distances: DistanceReading,
    pub line: LineReading,
    pub last_command: Option<MotionCommand>,
    pub status: Status,
}

impl Report {
    pub fn new(snapshot: &Snapshot, last_command: Option<MotionCommand>) -> Self {
        Self {
            distances: snapshot.distances,
            line: snapshot.line,
            last_command,
            status: Status::of(&snapshot.distances),
        }
    }

    pub fn command_label(&self) -> &'static str {
        self.last_command.map_or(NO_COMMAND, MotionCommand::label)
    }

    pub fn message(&self) -> &'static str {
        self.status.message()
    }

    fn intensity(&self, channel: LineChannel) -> String {
        self.line
            .intensity(channel)
            .map_or_else(|| "-".to_string(), |v| v.to_string())
    }

    /// Full dump for a text terminal.
    pub fn terminal_lines(&self) -> Vec<String> {
        let d = &self.distances;
        let mut lines = vec![
            "ToF Data:".to_string(),
            format!("Side:{} Right:{}", d.side(), d.right()),
            format!("Bottom:{} Left:{}", d.bottom(), d.left()),
            String::new(),
            format!("Next Move: {}", self.command_label()),
            self.message().to_string(),
            String::new(),
            "IR Data:".to_string(),
        ];
        lines.extend(LineChannel::ALL.iter().map(|&channel| {
            format!(
                "{}:{}, {}",
                line_channel_name(channel),
                self.line.color(channel),
                self.intensity(channel)
            )
        }));
        lines
    }

    /// Text for the small distance screen.
    pub fn distance_panel(&self) -> Vec<String> {
        let d = &self.distances;
        vec![
            "ToF Data:".to_string(),
            format!("S:{} R:{}", d.side(), d.right()),
            format!("B:{} L:{}", d.bottom(), d.left()),
            self.command_label().to_string(),
            self.message().to_string(),
        ]
    }

    /// Text for the small line-sensor screen.
    pub fn line_panel(&self) -> Vec<String> {
        let mut lines = vec!["IR Data:".to_string()];
        lines.extend(LineChannel::ALL.iter().map(|&channel| {
            format!(
                "{}:{} {}",
                line_channel_tag(channel),
                self.line.color(channel),
                self.intensity(channel)
            )
        }));
        lines
    }
}

fn line_channel_name(channel: LineChannel) -> &'static str {
    match channel {
        LineChannel::FarLeft => "Far Left",
        LineChannel::Left => "Left",
        LineChannel::Right => "Right",
        LineChannel::FarRight => "Far Right",
    }
}

fn line_channel_tag(channel: LineChannel) -> &'static str {
    match channel {
        LineChannel::FarLeft => "FL",
        LineChannel::Left => "L",
        LineChannel::Right => "R",
        LineChannel::FarRight => "FR",
    }
}
