//! Property tests for the distance model and the priority table.

use linebot_core::{
    ColorSymbol, DecisionEngine, DistanceReading, LineReading, MotionActuator, MotionCommand,
    RULES, Result, Snapshot,
};
use proptest::prelude::*;

#[derive(Default)]
struct Recorder(Vec<MotionCommand>);

impl MotionActuator for Recorder {
    fn apply(&mut self, command: MotionCommand) -> Result<()> {
        self.0.push(command);
        Ok(())
    }
}

fn arb_distances() -> impl Strategy<Value = DistanceReading> {
    prop::array::uniform4(0u32..2_000).prop_map(DistanceReading::new)
}

fn arb_line() -> impl Strategy<Value = LineReading> {
    prop::array::uniform4(prop_oneof![Just(ColorSymbol::Black), Just(ColorSymbol::White)])
        .prop_map(LineReading::new)
}

fn arb_snapshot() -> impl Strategy<Value = Snapshot> {
    (arb_distances(), arb_line()).prop_map(|(distances, line)| Snapshot { distances, line })
}

// =============================================================================
// Distance model
// =============================================================================

proptest! {
    #[test]
    fn obstacle_is_front_closer_than_both_sides(d in prop::array::uniform4(0u32..2_000)) {
        let reading = DistanceReading::new(d);
        prop_assert_eq!(reading.is_obstacle(), d[3] > d[2] && d[1] > d[2]);
    }

    #[test]
    fn ball_matches_truncated_offset_formula(d in prop::array::uniform4(0u32..2_000)) {
        let reading = DistanceReading::new(d);
        let [_, right, bottom, left] = d.map(f64::from);
        let top = ((left - right) / 2.0 + 80.0).trunc();
        prop_assert_eq!(reading.is_ball(), top - bottom > 70.0);
    }

    #[test]
    fn lateral_imbalance_is_antisymmetric(d in prop::array::uniform4(0u32..2_000)) {
        let mirrored = DistanceReading::new([d[0], d[3], d[2], d[1]]);
        prop_assert_eq!(DistanceReading::new(d).lateral_imbalance(), -mirrored.lateral_imbalance());
    }
}

// =============================================================================
// Decision table
// =============================================================================

proptest! {
    /// Whatever holds, the engine issues the lowest-indexed true rule.
    #[test]
    fn first_true_rule_wins(snapshot in arb_snapshot()) {
        let mut engine = DecisionEngine::new(Recorder::default());
        let situations = engine.evaluate_situations(&snapshot);
        let expected = situations.iter().position(|&holds| holds).map(|i| RULES[i].command);

        let chosen = engine.make_move(&snapshot).unwrap();
        prop_assert_eq!(chosen, expected);
        prop_assert_eq!(engine.actuator().0.last().copied(), expected);
    }

    #[test]
    fn evaluation_has_no_hidden_state(snapshot in arb_snapshot(), other in arb_snapshot()) {
        let mut engine = DecisionEngine::new(Recorder::default());
        let before = engine.evaluate_situations(&snapshot);
        engine.make_move(&other).unwrap();
        prop_assert_eq!(before, engine.evaluate_situations(&snapshot));
    }

    #[test]
    fn side_collision_always_backs_off(
        d in prop::array::uniform4(0u32..2_000),
        close in 0u32..=40,
        left_side in any::<bool>(),
        line in arb_line(),
    ) {
        let mut d = d;
        d[if left_side { 3 } else { 1 }] = close;
        let mut engine = DecisionEngine::new(Recorder::default());
        let chosen = engine.make_move(&Snapshot::new(d, line)).unwrap();
        prop_assert_eq!(chosen, Some(MotionCommand::Backward));
    }

    /// With two-valued colors every snapshot lands on some line rule, so one command
    /// is issued per cycle.
    #[test]
    fn every_cycle_issues_exactly_one_command(snapshots in prop::collection::vec(arb_snapshot(), 1..20)) {
        let mut engine = DecisionEngine::new(Recorder::default());
        for snapshot in &snapshots {
            engine.make_move(snapshot).unwrap();
        }
        prop_assert_eq!(engine.actuator().0.len(), snapshots.len());
        prop_assert!(!engine.actuator().0.contains(&MotionCommand::Stop));
    }
}

// =============================================================================
// Scenarios
// =============================================================================

fn decide(distances: [u32; 4], colors: &str) -> Option<MotionCommand> {
    let mut engine = DecisionEngine::new(Recorder::default());
    engine
        .make_move(&Snapshot::new(distances, colors.parse().unwrap()))
        .unwrap()
}

#[test]
fn scenario_open_floor() {
    assert_eq!(decide([100, 100, 100, 100], "WWWW"), Some(MotionCommand::Forward));
}

#[test]
fn scenario_side_collision() {
    assert_eq!(decide([100, 30, 100, 100], "BBWW"), Some(MotionCommand::Backward));
}

#[test]
fn scenario_far_left() {
    assert_eq!(decide([100, 100, 100, 100], "BWWW"), Some(MotionCommand::FarLeft));
}

#[test]
fn scenario_search_situation_without_ball() {
    let engine = DecisionEngine::new(Recorder::default());
    let snapshot = Snapshot::new([100, 100, 100, 100], "WBWW".parse().unwrap());
    let situations = engine.evaluate_situations(&snapshot);
    assert!(!snapshot.distances.is_ball());
    assert!(situations[7]);
    assert!(!situations[0] && !situations[6]);
}

#[test]
fn line_reading_deserializes_from_toml() {
    #[derive(serde::Deserialize)]
    struct Frame {
        line: LineReading,
    }

    let frame: Frame = toml::from_str(
        r#"
        [line]
        colors = "WBBW"
        intensities = [100, 20000, 20000, 100]
        "#,
    )
    .unwrap();
    assert_eq!(frame.line.colors.to_string(), "WBBW");
    assert_eq!(frame.line.intensities, Some([100, 20000, 20000, 100]));

    let bad = toml::from_str::<Frame>("[line]\ncolors = \"WBQW\"\n");
    assert!(bad.is_err());
}
