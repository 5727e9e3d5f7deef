use std::fmt;

use serde::{Deserialize, Serialize};

/// The eight maneuvers the decision engine can pick from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionCommand {
    Backward,
    Forward,
    FarLeft,
    FarRight,
    Left,
    Right,
    Stop,
    Search,
}

impl MotionCommand {
    pub const ALL: [MotionCommand; 8] = [
        Self::Backward,
        Self::Forward,
        Self::FarLeft,
        Self::FarRight,
        Self::Left,
        Self::Right,
        Self::Stop,
        Self::Search,
    ];

    /// Stable name shown on the displays.
    pub fn label(self) -> &'static str {
        match self {
            Self::Backward => "backwards",
            Self::Forward => "forwards",
            Self::FarLeft => "far_left",
            Self::FarRight => "far_right",
            Self::Left => "left",
            Self::Right => "right",
            Self::Stop => "stop",
            Self::Search => "search",
        }
    }

    /// Left and right wheel commands for this maneuver.
    pub fn wheels(self, profile: &DriveProfile) -> (WheelCommand, WheelCommand) {
        let DriveProfile {
            cruise,
            turn,
            reverse,
        } = *profile;
        match self {
            Self::Forward => (WheelCommand::forward(cruise), WheelCommand::forward(cruise)),
            Self::Backward => (WheelCommand::backward(reverse), WheelCommand::backward(reverse)),
            Self::Left => (WheelCommand::forward(turn), WheelCommand::forward(cruise)),
            Self::Right => (WheelCommand::forward(cruise), WheelCommand::forward(turn)),
            Self::FarLeft => (WheelCommand::forward(0), WheelCommand::forward(turn)),
            Self::FarRight => (WheelCommand::forward(turn), WheelCommand::forward(0)),
            Self::Stop => (WheelCommand::STOP, WheelCommand::STOP),
            // spin in place
            Self::Search => (WheelCommand::forward(turn), WheelCommand::backward(turn)),
        }
    }
}

impl fmt::Display for MotionCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WheelDirection {
    Forward,
    Backward,
}

/// Direction plus PWM magnitude for a single DC motor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WheelCommand {
    pub direction: WheelDirection,
    pub speed: u8,
}

impl WheelCommand {
    pub const STOP: WheelCommand = WheelCommand::forward(0);

    pub const fn forward(speed: u8) -> Self {
        Self {
            direction: WheelDirection::Forward,
            speed,
        }
    }

    pub const fn backward(speed: u8) -> Self {
        Self {
            direction: WheelDirection::Backward,
            speed,
        }
    }

    /// Signed magnitude, negative when driving backward.
    pub fn signed(self) -> i16 {
        match self.direction {
            WheelDirection::Forward => i16::from(self.speed),
            WheelDirection::Backward => -i16::from(self.speed),
        }
    }
}

impl fmt::Display for WheelCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+}", self.signed())
    }
}

/// PWM magnitudes used by the maneuvers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriveProfile {
    /// Straight-ahead speed, also the outer wheel of a gentle turn.
    pub cruise: u8,
    /// Inner wheel of a gentle turn, outer wheel of a sharp turn, both wheels when searching.
    pub turn: u8,
    pub reverse: u8,
}

impl Default for DriveProfile {
    fn default() -> Self {
        Self {
            cruise: 250,
            turn: 200,
            reverse: 200,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_unique() {
        let mut labels: Vec<_> = MotionCommand::ALL.iter().map(|c| c.label()).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), MotionCommand::ALL.len());
        assert_eq!(MotionCommand::FarLeft.to_string(), "far_left");
    }

    #[test]
    fn default_profile_wheel_table() {
        let profile = DriveProfile::default();
        let table: Vec<(i16, i16)> = MotionCommand::ALL
            .iter()
            .map(|c| {
                let (l, r) = c.wheels(&profile);
                (l.signed(), r.signed())
            })
            .collect();
        assert_eq!(
            table,
            vec![
                (-200, -200), // backward
                (250, 250),   // forward
                (0, 200),     // far left
                (200, 0),     // far right
                (200, 250),   // left
                (250, 200),   // right
                (0, 0),       // stop
                (200, -200),  // search
            ]
        );
    }

    #[test]
    fn wheel_command_formats_signed() {
        assert_eq!(WheelCommand::backward(120).to_string(), "-120");
        assert_eq!(WheelCommand::forward(7).to_string(), "+7");
        assert_eq!(WheelCommand::STOP.to_string(), "+0");
    }
}
