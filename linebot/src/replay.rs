use std::io::Write;

use color_eyre::{Result, eyre::WrapErr};
use linebot_core::{DecisionEngine, DifferentialDrive, DriveProfile, NO_COMMAND, Snapshot, Status};

use crate::sim::{RecordingWheels, ScenarioFile};

/// Steps once through every frame of `scenario` and writes one row per decision.
pub fn replay(
    scenario: &ScenarioFile,
    profile: DriveProfile,
    threshold: u16,
    out: &mut impl Write,
) -> Result<()> {
    let mut engine = DecisionEngine::new(DifferentialDrive::new(RecordingWheels::default(), profile));

    writeln!(out, "# {}", scenario.name)?;
    writeln!(
        out,
        "{:>5}  {:<20}  {:<6}  {:<10}  {:>5} {:>5}  {}",
        "cycle", "distances", "line", "command", "left", "right", "status"
    )?;
    for (cycle, frame) in scenario.expanded().iter().enumerate() {
        let snapshot = Snapshot::new(frame.distances(), frame.line(threshold));
        let command = engine
            .make_move(&snapshot)
            .wrap_err_with(|| format!("cycle {cycle} failed"))?;
        let wheels = engine.actuator().wheels();
        let d = snapshot.distances.as_array();

        writeln!(
            out,
            "{:>5}  {:<20}  {:<6}  {:<10}  {:>5} {:>5}  {}",
            cycle,
            format!("{},{},{},{}", d[0], d[1], d[2], d[3]),
            snapshot.line.colors.to_string(),
            command.map_or(NO_COMMAND, |c| c.label()),
            wheels.left.to_string(),
            wheels.right.to_string(),
            Status::of(&snapshot.distances),
        )?;
    }
    Ok(())
}
