//! Input subsystem handle.
//!
//! One input-system object per display session, created after the window
//! exists so that devices can later be bound to it.

use crate::display::error::InputError;
use crate::display::platform::DisplayPlatform;
use crate::display::types::{InputHandle, ModuleHandle};

/// Interface version requested by default.
pub const DEFAULT_INPUT_VERSION: u32 = 0x0800;

/// HRESULT codes returned by the input-system factory.
pub mod hresult {
    pub const DI_OK: i32 = 0;
    pub const DIERR_OLDDIRECTINPUTVERSION: i32 = 0x8007_047E_u32 as i32;
    pub const DIERR_BETADIRECTINPUTVERSION: i32 = 0x8007_0481_u32 as i32;
    pub const DIERR_INVALIDPARAM: i32 = 0x8007_0057_u32 as i32;
    pub const DIERR_OUTOFMEMORY: i32 = 0x8007_000E_u32 as i32;
}

impl InputError {
    /// Translate a failure code. Success codes are not errors and map to
    /// `None`.
    #[must_use]
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            hresult::DI_OK => None,
            hresult::DIERR_BETADIRECTINPUTVERSION => Some(Self::BetaVersion),
            hresult::DIERR_INVALIDPARAM => Some(Self::InvalidParam),
            hresult::DIERR_OLDDIRECTINPUTVERSION => Some(Self::OldVersion),
            hresult::DIERR_OUTOFMEMORY => Some(Self::OutOfMemory),
            other => Some(Self::Other(other)),
        }
    }
}

/// Owner of the session's input-system object.
#[derive(Debug, Default)]
pub struct InputSubsystem {
    handle: Option<InputHandle>,
}

impl InputSubsystem {
    #[must_use]
    pub const fn new() -> Self {
        Self { handle: None }
    }

    #[must_use]
    pub const fn handle(&self) -> Option<InputHandle> {
        self.handle
    }

    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.handle.is_some()
    }

    /// Create the input-system object.
    ///
    /// A beta-version report that still hands back an object is accepted
    /// with a warning.
    pub fn initialize<P: DisplayPlatform + ?Sized>(
        &mut self,
        platform: &mut P,
        module: ModuleHandle,
        version: u32,
    ) -> Result<InputHandle, InputError> {
        if let Some(handle) = self.handle {
            return Ok(handle);
        }

        let outcome = platform.create_input(module, version);
        let handle = match (InputError::from_code(outcome.code), outcome.handle) {
            (None, Some(handle)) => handle,
            (Some(InputError::BetaVersion), Some(handle)) => {
                log::warn!("input system reports beta version {:#06x}, continuing", version);
                handle
            }
            (None, None) => {
                log::error!("input system returned success without an object");
                return Err(InputError::Other(outcome.code));
            }
            (Some(err), leaked) => {
                if let Some(handle) = leaked {
                    platform.release_input(handle);
                }
                log::error!("{}", err);
                return Err(err);
            }
        };

        self.handle = Some(handle);
        Ok(handle)
    }

    /// Release the object if one is held.
    pub fn release<P: DisplayPlatform + ?Sized>(&mut self, platform: &mut P) {
        if let Some(handle) = self.handle.take() {
            platform.release_input(handle);
            log::debug!("released input system {:#x}", handle.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::mock::MockPlatform;
    use rstest::rstest;

    #[rstest]
    #[case(hresult::DI_OK, None)]
    #[case(hresult::DIERR_BETADIRECTINPUTVERSION, Some(InputError::BetaVersion))]
    #[case(hresult::DIERR_INVALIDPARAM, Some(InputError::InvalidParam))]
    #[case(hresult::DIERR_OLDDIRECTINPUTVERSION, Some(InputError::OldVersion))]
    #[case(hresult::DIERR_OUTOFMEMORY, Some(InputError::OutOfMemory))]
    #[case(0x8000_4005_u32 as i32, Some(InputError::Other(0x8000_4005_u32 as i32)))]
    fn test_from_code(#[case] code: i32, #[case] expected: Option<InputError>) {
        assert_eq!(InputError::from_code(code), expected);
    }

    #[test]
    fn test_initialize_and_release() {
        let mut platform = MockPlatform::new();
        let module = platform.module_handle();
        let mut input = InputSubsystem::new();

        let handle = input
            .initialize(&mut platform, module, DEFAULT_INPUT_VERSION)
            .unwrap();
        assert!(input.is_initialized());
        assert_eq!(platform.live_inputs(), vec![handle]);

        input.release(&mut platform);
        input.release(&mut platform);
        assert!(!input.is_initialized());
        assert!(platform.live_inputs().is_empty());
    }

    #[test]
    fn test_beta_version_is_tolerated() {
        let mut platform =
            MockPlatform::new().with_input_code(hresult::DIERR_BETADIRECTINPUTVERSION);
        let module = platform.module_handle();
        let mut input = InputSubsystem::new();
        assert!(input.initialize(&mut platform, module, 0x0300).is_ok());
        assert_eq!(platform.live_inputs().len(), 1);
    }

    #[test]
    fn test_old_version_is_fatal() {
        let mut platform =
            MockPlatform::new().with_input_code(hresult::DIERR_OLDDIRECTINPUTVERSION);
        let module = platform.module_handle();
        let mut input = InputSubsystem::new();
        assert_eq!(
            input.initialize(&mut platform, module, 0x0900),
            Err(InputError::OldVersion)
        );
        assert!(!input.is_initialized());
        assert!(platform.live_inputs().is_empty());
    }
}
