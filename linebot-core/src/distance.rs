use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Baseline distance (mm) the side/top sensor expects when nothing sits between the side sensors.
pub const TOP_BASELINE_MM: f64 = 80.0;

/// How much closer than the corrected baseline the front sensor must read before a ball is reported.
pub const BALL_MARGIN_MM: i64 = 70;

/// A side sensor at or below this range (mm) means a collision is imminent.
pub const SIDE_COLLISION_MM: u32 = 40;

/// Mounting position of each time-of-flight sensor. The discriminant is the channel index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DistanceChannel {
    Side = 0,
    Right = 1,
    Bottom = 2,
    Left = 3,
}

impl DistanceChannel {
    pub const ALL: [DistanceChannel; 4] = [Self::Side, Self::Right, Self::Bottom, Self::Left];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// One snapshot of the four time-of-flight sensors, in millimeters.
///
/// Layout (channel index):
///   0: side / top
///   1: right
///   2: bottom / front
///   3: left
///
/// Every derived signal below is recomputed from the snapshot on each call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DistanceReading([u32; 4]);

impl DistanceReading {
    pub const CHANNELS: usize = 4;

    pub const fn new(millimeters: [u32; 4]) -> Self {
        Self(millimeters)
    }

    pub fn get(&self, channel: DistanceChannel) -> u32 {
        self.0[channel.index()]
    }

    pub fn side(&self) -> u32 {
        self.get(DistanceChannel::Side)
    }

    pub fn right(&self) -> u32 {
        self.get(DistanceChannel::Right)
    }

    pub fn bottom(&self) -> u32 {
        self.get(DistanceChannel::Bottom)
    }

    pub fn left(&self) -> u32 {
        self.get(DistanceChannel::Left)
    }

    pub fn as_array(&self) -> [u32; 4] {
        self.0
    }

    /// Half the left/right difference in mm. Positive when the left sensor sees farther.
    pub fn lateral_imbalance(&self) -> f64 {
        (i64::from(self.left()) - i64::from(self.right())) as f64 / 2.0
    }

    /// Expected top-sensor distance corrected for lateral imbalance.
    pub fn top_offset(&self) -> f64 {
        self.lateral_imbalance() + TOP_BASELINE_MM
    }

    /// A small round target sits directly ahead: the front sensor reads more than
    /// [`BALL_MARGIN_MM`] closer than the truncated top offset.
    pub fn is_ball(&self) -> bool {
        let top = self.top_offset().trunc() as i64;
        top - i64::from(self.bottom()) > BALL_MARGIN_MM
    }

    /// Something blocks the path: the front sensor is closer than both side sensors.
    pub fn is_obstacle(&self) -> bool {
        self.left() > self.bottom() && self.right() > self.bottom()
    }

    /// Either side sensor reads within [`SIDE_COLLISION_MM`].
    pub fn is_side_collision(&self) -> bool {
        self.right() <= SIDE_COLLISION_MM || self.left() <= SIDE_COLLISION_MM
    }
}

impl From<[u32; 4]> for DistanceReading {
    fn from(millimeters: [u32; 4]) -> Self {
        Self::new(millimeters)
    }
}

impl TryFrom<&[u32]> for DistanceReading {
    type Error = Error;

    fn try_from(values: &[u32]) -> Result<Self> {
        let millimeters: [u32; 4] = values.try_into().map_err(|_| Error::InvalidReading {
            sensor: "distance",
            expected: Self::CHANNELS,
            actual: values.len(),
        })?;
        Ok(Self(millimeters))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lateral_imbalance_is_signed_half_difference() {
        let reading = DistanceReading::new([0, 100, 0, 151]);
        assert_eq!(reading.lateral_imbalance(), 25.5);
        assert_eq!(reading.top_offset(), 105.5);

        let reading = DistanceReading::new([0, 151, 0, 100]);
        assert_eq!(reading.lateral_imbalance(), -25.5);
        assert_eq!(reading.top_offset(), 54.5);
    }

    #[test]
    fn ball_uses_truncated_top_offset() {
        // top offset 80.5 truncates to 80; 80 - 9 = 71 > 70
        assert!(DistanceReading::new([0, 100, 9, 101]).is_ball());
        // 80 - 10 = 70 is not strictly greater
        assert!(!DistanceReading::new([0, 100, 10, 101]).is_ball());
        // negative offsets truncate toward zero: -0.5 + 80 = 79.5 -> 79
        assert!(!DistanceReading::new([0, 101, 9, 100]).is_ball());
        assert!(DistanceReading::new([0, 101, 8, 100]).is_ball());
    }

    #[test]
    fn obstacle_needs_front_closer_than_both_sides() {
        assert!(DistanceReading::new([100, 120, 10, 120]).is_obstacle());
        assert!(!DistanceReading::new([100, 120, 120, 130]).is_obstacle());
        assert!(!DistanceReading::new([100, 5, 10, 120]).is_obstacle());
    }

    #[test]
    fn side_collision_threshold_is_inclusive() {
        assert!(DistanceReading::new([100, 40, 100, 100]).is_side_collision());
        assert!(DistanceReading::new([100, 100, 100, 40]).is_side_collision());
        assert!(!DistanceReading::new([0, 41, 0, 41]).is_side_collision());
    }

    #[test]
    fn slices_must_have_four_channels() {
        let ok = DistanceReading::try_from(&[1u32, 2, 3, 4][..]).unwrap();
        assert_eq!(ok.left(), 4);

        let err = DistanceReading::try_from(&[1u32, 2, 3][..]).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidReading {
                sensor: "distance",
                expected: 4,
                actual: 3
            }
        );
    }
}
