//! Hardware seams. The core only talks to sensors, motors and screens through these
//! traits; real drivers and the simulator both plug in here.

use tracing::trace;

use crate::command::{DriveProfile, MotionCommand, WheelCommand};
use crate::distance::DistanceReading;
use crate::error::Result;
use crate::line::LineReading;
use crate::report::Report;

/// Four-channel time-of-flight array.
pub trait DistanceSensor {
    fn read_distances(&mut self) -> Result<DistanceReading>;
}

/// Four-channel reflectance array, already classified into floor colors.
pub trait LineSensor {
    fn read_line(&mut self) -> Result<LineReading>;
}

/// Anything that can carry out a [`MotionCommand`].
pub trait MotionActuator {
    fn apply(&mut self, command: MotionCommand) -> Result<()>;
}

/// Independent left/right DC motors.
pub trait WheelDriver {
    fn drive(&mut self, left: WheelCommand, right: WheelCommand) -> Result<()>;
}

/// Screen or terminal the report is rendered to.
pub trait Display {
    fn render(&mut self, report: &Report) -> Result<()>;

    /// Blank the output. Called once during shutdown.
    fn clear(&mut self) -> Result<()>;
}

/// Maps maneuvers onto a pair of wheels through a [`DriveProfile`].
#[derive(Debug)]
pub struct DifferentialDrive<W> {
    wheels: W,
    profile: DriveProfile,
}

impl<W: WheelDriver> DifferentialDrive<W> {
    pub fn new(wheels: W, profile: DriveProfile) -> Self {
        Self { wheels, profile }
    }

    pub fn wheels(&self) -> &W {
        &self.wheels
    }

    pub fn profile(&self) -> &DriveProfile {
        &self.profile
    }
}

impl<W: WheelDriver> MotionActuator for DifferentialDrive<W> {
    fn apply(&mut self, command: MotionCommand) -> Result<()> {
        let (left, right) = command.wheels(&self.profile);
        trace!(%command, %left, %right, "driving wheels");
        self.wheels.drive(left, right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Wheels(Vec<(WheelCommand, WheelCommand)>);

    impl WheelDriver for Wheels {
        fn drive(&mut self, left: WheelCommand, right: WheelCommand) -> Result<()> {
            self.0.push((left, right));
            Ok(())
        }
    }

    #[test]
    fn differential_drive_uses_profile() {
        let profile = DriveProfile {
            cruise: 180,
            turn: 90,
            reverse: 60,
        };
        let mut drive = DifferentialDrive::new(Wheels::default(), profile);
        drive.apply(MotionCommand::Left).unwrap();
        drive.apply(MotionCommand::Backward).unwrap();
        drive.apply(MotionCommand::Search).unwrap();

        assert_eq!(
            drive.wheels().0,
            vec![
                (WheelCommand::forward(90), WheelCommand::forward(180)),
                (WheelCommand::backward(60), WheelCommand::backward(60)),
                (WheelCommand::forward(90), WheelCommand::backward(90)),
            ]
        );
    }
}
