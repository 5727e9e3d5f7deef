use tracing::{debug, info, warn};

use crate::command::MotionCommand;
use crate::decision::{DecisionEngine, Snapshot};
use crate::devices::{Display, DistanceSensor, LineSensor, MotionActuator};
use crate::error::Result;
use crate::report::Report;

/// Wires the injected devices around a [`DecisionEngine`] and runs one control cycle at a time.
///
/// Pacing and interrupt handling belong to the caller.
#[derive(Debug)]
pub struct Robot<D, L, M, V> {
    distance: D,
    line: L,
    engine: DecisionEngine<M>,
    display: V,
    cycles: u64,
}

impl<D, L, M, V> Robot<D, L, M, V>
where
    D: DistanceSensor,
    L: LineSensor,
    M: MotionActuator,
    V: Display,
{
    pub fn new(distance: D, line: L, actuator: M, display: V) -> Self {
        Self {
            distance,
            line,
            engine: DecisionEngine::new(actuator),
            display,
            cycles: 0,
        }
    }

    pub fn read_snapshot(&mut self) -> Result<Snapshot> {
        Ok(Snapshot {
            distances: self.distance.read_distances()?,
            line: self.line.read_line()?,
        })
    }

    /// Decide and move on a fresh snapshot, then re-read the sensors and render.
    pub fn cycle(&mut self) -> Result<Report> {
        let snapshot = self.read_snapshot()?;
        let command = self.engine.make_move(&snapshot)?;

        let report = Report::new(&self.read_snapshot()?, command);
        self.display.render(&report)?;

        self.cycles += 1;
        debug!(cycle = self.cycles, command = report.command_label(), status = %report.status, "cycle done");
        Ok(report)
    }

    /// Blank the displays, then stop the motors.
    ///
    /// The motors are stopped even when clearing fails; the first error is returned.
    pub fn shutdown(&mut self) -> Result<()> {
        info!(cycles = self.cycles, "shutting down");
        let cleared = self.display.clear();
        if let Err(error) = &cleared {
            warn!(%error, "failed to clear display");
        }
        let stopped = self.engine.actuator_mut().apply(MotionCommand::Stop);
        cleared.and(stopped)
    }

    pub fn engine(&self) -> &DecisionEngine<M> {
        &self.engine
    }

    pub fn display(&self) -> &V {
        &self.display
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }
}
