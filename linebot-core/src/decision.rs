use tracing::{debug, trace};

use crate::command::MotionCommand;
use crate::devices::MotionActuator;
use crate::distance::DistanceReading;
use crate::error::Result;
use crate::line::{LineChannel, LineReading};

/// Both sensor families, read back to back within one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Snapshot {
    pub distances: DistanceReading,
    pub line: LineReading,
}

impl Snapshot {
    pub fn new(distances: impl Into<DistanceReading>, line: LineReading) -> Self {
        Self {
            distances: distances.into(),
            line,
        }
    }
}

/// A condition paired with the maneuver it triggers.
#[derive(Clone, Copy)]
pub struct Rule {
    pub command: MotionCommand,
    pub holds: fn(&Snapshot) -> bool,
}

/// Situations in priority order. The first one that holds wins.
pub const RULES: [Rule; 8] = [
    Rule {
        command: MotionCommand::Backward,
        holds: |s| s.distances.is_side_collision(),
    },
    Rule {
        command: MotionCommand::Forward,
        holds: |s| s.line.all_white(),
    },
    Rule {
        command: MotionCommand::FarLeft,
        holds: |s| s.line.is_black(LineChannel::FarLeft),
    },
    Rule {
        command: MotionCommand::FarRight,
        holds: |s| s.line.is_black(LineChannel::FarRight),
    },
    Rule {
        command: MotionCommand::Left,
        holds: |s| s.line.is_black(LineChannel::Left),
    },
    Rule {
        command: MotionCommand::Right,
        holds: |s| s.line.is_black(LineChannel::Right),
    },
    // Reserved slot, no trigger is defined for stopping.
    Rule {
        command: MotionCommand::Stop,
        holds: |_| false,
    },
    Rule {
        command: MotionCommand::Search,
        holds: |s| !s.distances.is_ball(),
    },
];

/// Strict-priority decision table over [`RULES`].
///
/// Remembers the last command it issued; nothing else carries over between cycles.
#[derive(Debug)]
pub struct DecisionEngine<M> {
    actuator: M,
    last_command: Option<MotionCommand>,
}

impl<M: MotionActuator> DecisionEngine<M> {
    pub fn new(actuator: M) -> Self {
        Self {
            actuator,
            last_command: None,
        }
    }

    /// Truth value of every rule, highest priority first.
    pub fn evaluate_situations(&self, snapshot: &Snapshot) -> [bool; 8] {
        RULES.map(|rule| (rule.holds)(snapshot))
    }

    /// Issues the command of the first situation that holds and records it.
    ///
    /// When nothing holds the actuator is left alone and the previous command is returned.
    pub fn make_move(&mut self, snapshot: &Snapshot) -> Result<Option<MotionCommand>> {
        let situations = self.evaluate_situations(snapshot);
        trace!(?situations, ?snapshot, "evaluated situations");

        let Some(index) = situations.iter().position(|&holds| holds) else {
            trace!(last = ?self.last_command, "no situation holds");
            return Ok(self.last_command);
        };

        let command = RULES[index].command;
        self.actuator.apply(command)?;
        if self.last_command != Some(command) {
            debug!(from = ?self.last_command, to = %command, rule = index, "command changed");
        }
        self.last_command = Some(command);
        Ok(self.last_command)
    }

    pub fn last_command(&self) -> Option<MotionCommand> {
        self.last_command
    }

    pub fn actuator(&self) -> &M {
        &self.actuator
    }

    pub fn actuator_mut(&mut self) -> &mut M {
        &mut self.actuator
    }
}
