use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A sensor family delivered the wrong number of channels.
    #[error("{sensor} reading has {actual} channels, expected {expected}")]
    InvalidReading {
        sensor: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("invalid floor color symbol {0:?}, expected 'B' or 'W'")]
    InvalidColor(String),

    /// Raised by a device driver; the core never retries.
    #[error("{device} failed: {message}")]
    Device {
        device: &'static str,
        message: String,
    },
}

impl Error {
    pub fn device(device: &'static str, message: impl Into<String>) -> Self {
        Self::Device {
            device,
            message: message.into(),
        }
    }
}
