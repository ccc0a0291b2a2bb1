//! Display session controller.
//!
//! Drives the create sequence
//!
//! ```text
//! Uninitialized -> [fullscreen: apply mode] -> register class (once)
//!     -> WindowCreated -> InputInitialized -> PixelFormatCommitted -> Active
//! ```
//!
//! and funnels every failure, and every explicit destroy, through the single
//! [`SessionController::teardown`] routine.

use crate::config::BridgeConfig;
use crate::display::error::{SessionError, SessionResult, WindowCreationError};
use crate::display::input::InputSubsystem;
use crate::display::mode_switch;
use crate::display::modes;
use crate::display::pixel_format::{self, AcceptedFormat, PixelFormatRequest};
use crate::display::platform::DisplayPlatform;
use crate::display::surface::SurfaceHost;
use crate::display::types::{DisplayModeDescriptor, DisplayRequest, WindowHandle};

/// Where the current session is in the create sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Uninitialized,
    WindowCreated,
    InputInitialized,
    PixelFormatCommitted,
    Active,
}

/// Owns the platform and every resource of the (at most one) display
/// session.
pub struct SessionController<P: DisplayPlatform> {
    platform: P,
    surface: SurfaceHost,
    input: InputSubsystem,
    input_version: u32,
    state: SessionState,
    format: Option<AcceptedFormat>,
}

impl<P: DisplayPlatform> SessionController<P> {
    /// Controller with default configuration.
    #[must_use]
    pub fn new(platform: P) -> Self {
        Self::with_config(platform, &BridgeConfig::default())
    }

    #[must_use]
    pub fn with_config(platform: P, config: &BridgeConfig) -> Self {
        Self {
            platform,
            surface: SurfaceHost::new(config.window_class_name.clone(), config.window_title.clone()),
            input: InputSubsystem::new(),
            input_version: config.input_version,
            state: SessionState::Uninitialized,
            format: None,
        }
    }

    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    /// Handle of the active session's window.
    #[must_use]
    pub fn window(&self) -> Option<WindowHandle> {
        if self.is_active() {
            self.surface.window()
        } else {
            None
        }
    }

    /// Pixel format committed for the active session.
    #[must_use]
    pub const fn accepted_format(&self) -> Option<AcceptedFormat> {
        self.format
    }

    #[must_use]
    pub const fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    #[must_use]
    pub const fn surface(&self) -> &SurfaceHost {
        &self.surface
    }

    /// Enumerate display modes. Does not touch session state.
    #[must_use]
    pub fn list_modes(&self) -> Vec<DisplayModeDescriptor> {
        modes::list_modes(&self.platform)
    }

    /// Create a display. Fails without side effects if a session is already
    /// active; any other failure tears down everything acquired so far.
    pub fn create_display(&mut self, request: &DisplayRequest) -> SessionResult<WindowHandle> {
        if self.state != SessionState::Uninitialized {
            log::error!("create requested while a display session is active");
            return Err(SessionError::AlreadyActive);
        }

        log::debug!(
            "creating display: size {}x{} {}hz {}bpp...",
            request.width,
            request.height,
            request.refresh_hz,
            request.bpp
        );

        match self.run_create(request) {
            Ok(window) => {
                self.state = SessionState::Active;
                log::info!("display session active, window {:#x}", window.0);
                Ok(window)
            }
            Err(err) => {
                log::error!("display creation failed: {}", err);
                self.teardown();
                Err(err)
            }
        }
    }

    fn run_create(&mut self, request: &DisplayRequest) -> SessionResult<WindowHandle> {
        if request.fullscreen {
            mode_switch::apply_mode(
                &mut self.platform,
                request.width,
                request.height,
                request.bpp,
                request.refresh_hz,
            )?;
        }

        let module = self.platform.module_handle();
        self.surface
            .ensure_window_class_registered(&mut self.platform, module)?;

        let window = self.surface.create_window(
            &mut self.platform,
            request.width,
            request.height,
            request.fullscreen,
            module,
        )?;
        self.state = SessionState::WindowCreated;

        self.input
            .initialize(&mut self.platform, module, self.input_version)?;
        self.state = SessionState::InputInitialized;

        let dc = self
            .surface
            .device_context()
            .ok_or_else(|| WindowCreationError {
                width: request.width,
                height: request.height,
                reason: "window has no device context".to_string(),
            })?;
        let format_request = PixelFormatRequest::new(
            request.bpp,
            request.alpha_bits,
            request.depth_bits,
            request.stencil_bits,
        );
        let accepted = pixel_format::negotiate(&mut self.platform, dc, &format_request)?;
        self.format = Some(accepted);
        self.state = SessionState::PixelFormatCommitted;

        Ok(window)
    }

    /// Explicit destroy request. Always succeeds.
    pub fn destroy_display(&mut self) {
        self.teardown();
    }

    /// Release everything in reverse order: input, window, display mode,
    /// cursor. Safe to call in any state, any number of times.
    pub fn teardown(&mut self) {
        self.input.release(&mut self.platform);
        self.surface.destroy_window(&mut self.platform);
        mode_switch::reset_mode(&mut self.platform);
        self.platform.set_cursor_visible(true);

        self.format = None;
        self.state = SessionState::Uninitialized;
        log::debug!("destroyed display");
    }
}
