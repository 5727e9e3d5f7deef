use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Floor color under one reflectance sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorSymbol {
    #[serde(rename = "B")]
    Black,
    #[serde(rename = "W")]
    White,
}

impl ColorSymbol {
    /// Analog reflectance at or above `threshold` reads as the black line.
    pub fn classify(intensity: u16, threshold: u16) -> Self {
        if intensity >= threshold {
            Self::Black
        } else {
            Self::White
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Self::Black => 'B',
            Self::White => 'W',
        }
    }
}

impl fmt::Display for ColorSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl TryFrom<char> for ColorSymbol {
    type Error = Error;

    fn try_from(c: char) -> Result<Self> {
        match c {
            'B' => Ok(Self::Black),
            'W' => Ok(Self::White),
            other => Err(Error::InvalidColor(other.to_string())),
        }
    }
}

impl FromStr for ColorSymbol {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::try_from(c),
            _ => Err(Error::InvalidColor(s.to_string())),
        }
    }
}

/// Reflectance sensor positions, left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineChannel {
    FarLeft = 0,
    Left = 1,
    Right = 2,
    FarRight = 3,
}

impl LineChannel {
    pub const ALL: [LineChannel; 4] = [Self::FarLeft, Self::Left, Self::Right, Self::FarRight];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// The four color symbols, written as a compact `"BWWW"` string in config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ColorPattern(pub [ColorSymbol; 4]);

impl ColorPattern {
    pub const ALL_WHITE: ColorPattern = ColorPattern([ColorSymbol::White; 4]);
}

impl FromStr for ColorPattern {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let symbols = s
            .chars()
            .map(ColorSymbol::try_from)
            .collect::<Result<Vec<_>>>()?;
        let actual = symbols.len();
        let symbols: [ColorSymbol; 4] = symbols.try_into().map_err(|_| Error::InvalidReading {
            sensor: "line",
            expected: LineReading::CHANNELS,
            actual,
        })?;
        Ok(Self(symbols))
    }
}

impl TryFrom<String> for ColorPattern {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<ColorPattern> for String {
    fn from(pattern: ColorPattern) -> Self {
        pattern.to_string()
    }
}

impl fmt::Display for ColorPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.iter().try_for_each(|c| write!(f, "{c}"))
    }
}

/// One snapshot of the reflectance sensors.
///
/// Intensities are the raw analog values behind the symbols. They are only ever
/// reported, never used for decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineReading {
    pub colors: ColorPattern,
    #[serde(default)]
    pub intensities: Option<[u16; 4]>,
}

impl LineReading {
    pub const CHANNELS: usize = 4;

    pub fn new(colors: [ColorSymbol; 4]) -> Self {
        Self {
            colors: ColorPattern(colors),
            intensities: None,
        }
    }

    pub fn with_intensities(mut self, intensities: [u16; 4]) -> Self {
        self.intensities = Some(intensities);
        self
    }

    /// Classifies raw intensities against `threshold` and keeps them for reporting.
    pub fn from_intensities(intensities: [u16; 4], threshold: u16) -> Self {
        Self::new(intensities.map(|v| ColorSymbol::classify(v, threshold))).with_intensities(intensities)
    }

    /// Fails fast on anything that is not exactly four known symbols.
    pub fn from_symbols(symbols: &[ColorSymbol]) -> Result<Self> {
        let colors: [ColorSymbol; 4] = symbols.try_into().map_err(|_| Error::InvalidReading {
            sensor: "line",
            expected: Self::CHANNELS,
            actual: symbols.len(),
        })?;
        Ok(Self::new(colors))
    }

    pub fn color(&self, channel: LineChannel) -> ColorSymbol {
        self.colors.0[channel.index()]
    }

    pub fn intensity(&self, channel: LineChannel) -> Option<u16> {
        self.intensities.map(|values| values[channel.index()])
    }

    pub fn all_white(&self) -> bool {
        self.colors == ColorPattern::ALL_WHITE
    }

    pub fn is_black(&self, channel: LineChannel) -> bool {
        self.color(channel) == ColorSymbol::Black
    }
}

impl FromStr for LineReading {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let colors: ColorPattern = s.parse()?;
        Ok(Self::new(colors.0))
    }
}
