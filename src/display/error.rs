//! Error taxonomy for the display subsystem.
//!
//! Each stage of the create sequence has its own error type; the session
//! controller wraps them in [`SessionError`]. The C boundary only sees
//! [`SessionError::code`].

use thiserror::Error;

/// Failure applying a display configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ModeSwitchError {
    #[error("failed to set screen mode: bad flags")]
    BadFlags,
    #[error("failed to set screen mode: change failed")]
    ChangeFailed,
    #[error("failed to set screen mode: bad mode")]
    BadMode,
    #[error("failed to set screen mode: unknown error ({0})")]
    Unknown(i32),
}

/// Failure registering the surface window class.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to register window class '{class_name}': {reason}")]
pub struct RegistrationError {
    pub class_name: String,
    pub reason: String,
}

/// Failure creating the surface window.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to create {width}x{height} window: {reason}")]
pub struct WindowCreationError {
    pub width: u32,
    pub height: u32,
    pub reason: String,
}

/// Failure creating the input-system object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InputError {
    /// Beta version reported without a usable object.
    #[error("failed to create input system - beta version")]
    BetaVersion,
    #[error("failed to create input system - invalid parameter")]
    InvalidParam,
    #[error("failed to create input system - old version")]
    OldVersion,
    #[error("failed to create input system - out of memory")]
    OutOfMemory,
    #[error("failed to create input system ({0:#010x})")]
    Other(i32),
}

/// Rejection from the pixel format negotiator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PixelFormatError {
    #[error("desktop colour depth {available} is below the requested {requested}")]
    InsufficientColorDepth { requested: u32, available: u32 },
    #[error("failed to choose pixel format")]
    NoMatchingFormat,
    #[error("could not describe pixel format {0}")]
    DescribeFailed(i32),
    #[error("pixel format offers {actual} colour bits, {requested} requested")]
    ColorDepthTooLow { requested: u32, actual: u32 },
    #[error("pixel format offers {actual} stencil bits, {requested} requested")]
    StencilTooLow { requested: u32, actual: u32 },
    #[error("pixel format offers {actual} depth bits, {requested} requested")]
    DepthTooLow { requested: u32, actual: u32 },
    #[error("capabilities not supported (missing {missing:#x})")]
    CapabilitiesUnsupported { missing: u32 },
    #[error("failed to set pixel format {0}")]
    CommitFailed(i32),
}

/// Any failure of a create-display request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("a display session is already active")]
    AlreadyActive,
    #[error("invalid display request: {0}")]
    InvalidRequest(String),
    #[error(transparent)]
    ModeSwitch(#[from] ModeSwitchError),
    #[error(transparent)]
    Registration(#[from] RegistrationError),
    #[error(transparent)]
    WindowCreation(#[from] WindowCreationError),
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    PixelFormat(#[from] PixelFormatError),
}

impl SessionError {
    /// Stable numeric code reported across the C boundary. Zero is reserved
    /// for "no error".
    #[must_use]
    pub const fn code(&self) -> i32 {
        match self {
            Self::AlreadyActive => 1,
            Self::InvalidRequest(_) => 2,
            Self::ModeSwitch(ModeSwitchError::BadFlags) => 10,
            Self::ModeSwitch(ModeSwitchError::ChangeFailed) => 11,
            Self::ModeSwitch(ModeSwitchError::BadMode) => 12,
            Self::ModeSwitch(ModeSwitchError::Unknown(_)) => 13,
            Self::Registration(_) => 20,
            Self::WindowCreation(_) => 30,
            Self::Input(InputError::BetaVersion) => 40,
            Self::Input(InputError::InvalidParam) => 41,
            Self::Input(InputError::OldVersion) => 42,
            Self::Input(InputError::OutOfMemory) => 43,
            Self::Input(InputError::Other(_)) => 44,
            Self::PixelFormat(PixelFormatError::InsufficientColorDepth { .. }) => 50,
            Self::PixelFormat(PixelFormatError::NoMatchingFormat) => 51,
            Self::PixelFormat(PixelFormatError::DescribeFailed(_)) => 52,
            Self::PixelFormat(PixelFormatError::ColorDepthTooLow { .. }) => 53,
            Self::PixelFormat(PixelFormatError::StencilTooLow { .. }) => 54,
            Self::PixelFormat(PixelFormatError::DepthTooLow { .. }) => 55,
            Self::PixelFormat(PixelFormatError::CapabilitiesUnsupported { .. }) => 56,
            Self::PixelFormat(PixelFormatError::CommitFailed(_)) => 57,
        }
    }
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;
