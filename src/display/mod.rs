//! Native display bootstrap: mode enumeration, fullscreen switching, the
//! surface window, pixel format negotiation and the input-system handle.

pub mod error;
pub mod ffi;
pub mod input;
pub mod mock;
pub mod mode_switch;
pub mod modes;
pub mod pixel_format;
pub mod platform;
pub mod session;
pub mod surface;
pub mod types;

#[cfg(windows)]
pub mod win32;

pub use error::{
    InputError, ModeSwitchError, PixelFormatError, RegistrationError, SessionError, SessionResult,
    WindowCreationError,
};
pub use pixel_format::{AcceptedFormat, PixelFormatRequest};
pub use platform::{DisplayPlatform, DisplaySettings};
pub use session::{SessionController, SessionState};
pub use types::{DisplayModeDescriptor, DisplayRequest, PixelFormatFlags, RawDisplayMode, WindowHandle};

#[cfg(windows)]
pub use win32::Win32Platform;
