//! Decision core of a line-following, ball-seeking robot.
//!
//! Four time-of-flight sensors and four reflectance sensors are fused every cycle into
//! exactly one [`MotionCommand`] by a strict-priority rule table. Hardware stays behind
//! the traits in [`devices`].

pub mod command;
pub mod decision;
pub mod devices;
pub mod distance;
pub mod error;
pub mod line;
pub mod report;
pub mod robot;

pub use command::{DriveProfile, MotionCommand, WheelCommand, WheelDirection};
pub use decision::{DecisionEngine, RULES, Rule, Snapshot};
pub use devices::{DifferentialDrive, Display, DistanceSensor, LineSensor, MotionActuator, WheelDriver};
pub use distance::{DistanceChannel, DistanceReading};
pub use error::{Error, Result};
pub use line::{ColorPattern, ColorSymbol, LineChannel, LineReading};
pub use report::{NO_COMMAND, Report, Status};
pub use robot::Robot;
