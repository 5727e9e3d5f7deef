use std::{rc::Rc, time::Duration};

use color_eyre::{Result, eyre::WrapErr};
use linebot_core::Display;
use tracing::info;

use crate::sim::{ScenarioFeed, SimRobot};

#[derive(Debug, Clone, Copy)]
pub struct LoopOptions {
    pub interval: Duration,
    /// Stop on our own after this many cycles.
    pub cycles: Option<u64>,
}

impl LoopOptions {
    pub fn limit_reached(&self, cycles: u64) -> bool {
        self.cycles.is_some_and(|limit| cycles >= limit)
    }
}

/// Runs the control loop with plain terminal output until Ctrl-C or the cycle limit.
pub fn run<V: Display>(mut robot: SimRobot<V>, feed: Rc<ScenarioFeed>, options: LoopOptions) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to start runtime")?;
    runtime.block_on(run_loop(&mut robot, &feed, options))?;
    println!("Stopped");
    Ok(())
}

/// Drives the loop, then shuts the robot down whether or not a cycle failed.
async fn run_loop<V: Display>(
    robot: &mut SimRobot<V>,
    feed: &ScenarioFeed,
    options: LoopOptions,
) -> Result<()> {
    let outcome = drive(robot, feed, options).await;
    let stopped = robot.shutdown().wrap_err("shutdown failed");
    outcome.and(stopped)
}

async fn drive<V: Display>(
    robot: &mut SimRobot<V>,
    feed: &ScenarioFeed,
    options: LoopOptions,
) -> Result<()> {
    let interrupt = tokio::signal::ctrl_c();
    tokio::pin!(interrupt);

    info!(interval_ms = options.interval.as_millis() as u64, "control loop started");
    while !options.limit_reached(robot.cycles()) {
        robot.cycle().wrap_err("control cycle failed")?;
        feed.advance();

        if options.limit_reached(robot.cycles()) {
            break;
        }

        tokio::select! {
            result = &mut interrupt => {
                result.wrap_err("failed to listen for Ctrl-C")?;
                info!("interrupted");
                return Ok(());
            }
            _ = tokio::time::sleep(options.interval) => {}
        }
    }

    info!("cycle limit reached");
    Ok(())
}

#[cfg(test)]
mod tests {
    use linebot_core::{DriveProfile, Error, MotionCommand, Report, WheelCommand};

    use super::*;
    use crate::display::TerminalDisplay;
    use crate::sim::{ScenarioFile, build_robot};

    const OPEN_FLOOR: &str = r#"
        [[frames]]
        distances = [100, 100, 100, 100]
        colors = "WWWW"
        "#;

    struct BrokenScreen;

    impl Display for BrokenScreen {
        fn render(&mut self, _report: &Report) -> linebot_core::Result<()> {
            Err(Error::device("oled", "i2c nack"))
        }

        fn clear(&mut self) -> linebot_core::Result<()> {
            Ok(())
        }
    }

    fn options(cycles: Option<u64>) -> LoopOptions {
        LoopOptions {
            interval: Duration::from_millis(1),
            cycles,
        }
    }

    #[tokio::test]
    async fn bounded_run_plays_frames_then_stops_motors() {
        let scenario = ScenarioFile::parse(
            r#"
            looped = false

            [[frames]]
            distances = [100, 100, 100, 100]
            colors = "WWWW"

            [[frames]]
            distances = [100, 100, 100, 100]
            colors = "WBWW"
            "#,
        )
        .unwrap();
        let feed = scenario.into_feed(10_000);
        let mut robot = build_robot(&feed, DriveProfile::default(), TerminalDisplay::new(Vec::new()));

        run_loop(&mut robot, &feed, options(Some(3))).await.unwrap();

        assert_eq!(robot.cycles(), 3);
        assert_eq!(robot.engine().last_command(), Some(MotionCommand::Left));
        assert!(feed.is_exhausted());

        let wheels = robot.engine().actuator().wheels();
        assert_eq!((wheels.left, wheels.right), (WheelCommand::STOP, WheelCommand::STOP));
        // three decisions plus the shutdown stop
        assert_eq!(wheels.applied, 4);
    }

    #[tokio::test]
    async fn zero_cycle_limit_only_stops_motors() {
        let feed = ScenarioFile::parse(OPEN_FLOOR).unwrap().into_feed(10_000);
        let mut robot = build_robot(&feed, DriveProfile::default(), TerminalDisplay::new(Vec::new()));

        run_loop(&mut robot, &feed, options(Some(0))).await.unwrap();

        assert_eq!(robot.cycles(), 0);
        assert_eq!(robot.engine().last_command(), None);
        let wheels = robot.engine().actuator().wheels();
        assert_eq!((wheels.left, wheels.right), (WheelCommand::STOP, WheelCommand::STOP));
        assert_eq!(wheels.applied, 1);
    }

    #[tokio::test]
    async fn failed_cycle_still_stops_motors() {
        let feed = ScenarioFile::parse(OPEN_FLOOR).unwrap().into_feed(10_000);
        let mut robot = build_robot(&feed, DriveProfile::default(), BrokenScreen);

        let err = run_loop(&mut robot, &feed, options(None)).await.unwrap_err();
        assert!(err.to_string().contains("control cycle failed"));

        // forwards was applied before rendering failed, then the shutdown stop
        let wheels = robot.engine().actuator().wheels();
        assert_eq!((wheels.left, wheels.right), (WheelCommand::STOP, WheelCommand::STOP));
        assert_eq!(wheels.applied, 2);
    }
}
