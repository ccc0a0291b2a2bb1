//! Fullscreen display mode switching.

use crate::display::error::ModeSwitchError;
use crate::display::platform::{DisplayPlatform, DisplaySettings};

/// `DISP_CHANGE_*` outcome codes.
pub mod disp_change {
    pub const SUCCESSFUL: i32 = 0;
    pub const RESTART: i32 = 1;
    pub const FAILED: i32 = -1;
    pub const BADMODE: i32 = -2;
    pub const NOTUPDATED: i32 = -3;
    pub const BADFLAGS: i32 = -4;
    pub const BADPARAM: i32 = -5;
}

impl ModeSwitchError {
    /// Translate an OS change code. `None` means the change succeeded.
    #[must_use]
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            disp_change::SUCCESSFUL => None,
            disp_change::BADFLAGS => Some(Self::BadFlags),
            disp_change::FAILED => Some(Self::ChangeFailed),
            disp_change::BADMODE => Some(Self::BadMode),
            other => Some(Self::Unknown(other)),
        }
    }
}

/// Settings for a mode switch. A refresh rate of zero means "OS default"
/// and is not sent.
#[must_use]
pub const fn settings_for(width: u32, height: u32, bpp: u32, refresh_hz: u32) -> DisplaySettings {
    DisplaySettings {
        width,
        height,
        bits_per_pixel: bpp,
        refresh_hz: if refresh_hz == 0 { None } else { Some(refresh_hz) },
    }
}

/// Switch the physical display. Any error is terminal for the current
/// create attempt.
pub fn apply_mode<P: DisplayPlatform + ?Sized>(
    platform: &mut P,
    width: u32,
    height: u32,
    bpp: u32,
    refresh_hz: u32,
) -> Result<(), ModeSwitchError> {
    let settings = settings_for(width, height, bpp, refresh_hz);
    match ModeSwitchError::from_code(platform.change_display_settings(&settings)) {
        None => {
            log::info!("display mode set to {}x{}x{} @ {}Hz", width, height, bpp, refresh_hz);
            Ok(())
        }
        Some(err) => {
            log::error!("{}", err);
            Err(err)
        }
    }
}

/// Restore the default display configuration. Failures are logged only.
pub fn reset_mode<P: DisplayPlatform + ?Sized>(platform: &mut P) {
    let code = platform.reset_display_settings();
    if let Some(err) = ModeSwitchError::from_code(code) {
        log::warn!("display mode reset reported: {}", err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::mock::MockPlatform;
    use rstest::rstest;

    #[rstest]
    #[case(disp_change::SUCCESSFUL, None)]
    #[case(disp_change::BADFLAGS, Some(ModeSwitchError::BadFlags))]
    #[case(disp_change::FAILED, Some(ModeSwitchError::ChangeFailed))]
    #[case(disp_change::BADMODE, Some(ModeSwitchError::BadMode))]
    #[case(disp_change::RESTART, Some(ModeSwitchError::Unknown(1)))]
    #[case(disp_change::NOTUPDATED, Some(ModeSwitchError::Unknown(-3)))]
    #[case(disp_change::BADPARAM, Some(ModeSwitchError::Unknown(-5)))]
    fn test_from_code(#[case] code: i32, #[case] expected: Option<ModeSwitchError>) {
        assert_eq!(ModeSwitchError::from_code(code), expected);
    }

    #[test]
    fn test_zero_refresh_is_not_sent() {
        assert_eq!(settings_for(800, 600, 32, 0).refresh_hz, None);
        assert_eq!(settings_for(800, 600, 32, 75).refresh_hz, Some(75));
    }

    #[test]
    fn test_apply_mode_success() {
        let mut platform = MockPlatform::new();
        apply_mode(&mut platform, 800, 600, 32, 60).unwrap();
        let current = platform.current_display_settings().unwrap();
        assert_eq!(current.width, 800);
        assert_eq!(current.refresh_hz, Some(60));
    }

    #[test]
    fn test_apply_mode_failure() {
        let mut platform = MockPlatform::new().with_display_change_code(disp_change::BADMODE);
        assert_eq!(
            apply_mode(&mut platform, 800, 600, 32, 60),
            Err(ModeSwitchError::BadMode)
        );
        assert!(platform.current_display_settings().is_none());
    }

    #[test]
    fn test_reset_mode_is_idempotent() {
        let mut platform = MockPlatform::new();
        apply_mode(&mut platform, 640, 480, 16, 0).unwrap();
        reset_mode(&mut platform);
        reset_mode(&mut platform);
        assert!(platform.current_display_settings().is_none());
    }

    #[test]
    fn test_reset_mode_swallows_failure() {
        let mut platform = MockPlatform::new().with_reset_code(disp_change::FAILED);
        reset_mode(&mut platform);
    }
}
