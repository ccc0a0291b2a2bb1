//! Surface window host.
//!
//! Owns the one window and device context a display session renders into.
//! The window class is registered on first use and stays registered for the
//! life of the host. The window itself has no OS-drawn content; its message
//! handler only keeps the system from interrupting a fullscreen session.

use parking_lot::Mutex;

use crate::display::error::{RegistrationError, WindowCreationError};
use crate::display::platform::DisplayPlatform;
use crate::display::types::{
    DeviceContext, ModuleHandle, NativeWindow, WindowClassSpec, WindowHandle, WindowParams,
    WindowStyle,
};

/// `WM_*` message identifiers the filter cares about.
pub mod messages {
    pub const WM_PAINT: u32 = 0x000F;
    pub const WM_SYSCOMMAND: u32 = 0x0112;
    pub const SC_SCREENSAVE: usize = 0xF140;
    pub const SC_MONITORPOWER: usize = 0xF170;
}

/// What the window procedure does with a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageDisposition {
    /// Return 0 without default processing.
    Intercept,
    /// Hand to the default window procedure.
    Forward,
}

/// Message filter for the surface window.
///
/// Screen saver and monitor power-down commands are swallowed, as are paint
/// requests. Everything else goes to the default handler.
#[must_use]
pub fn classify_message(message: u32, wparam: usize) -> MessageDisposition {
    match message {
        messages::WM_SYSCOMMAND => match wparam & 0xFFF0 {
            messages::SC_SCREENSAVE | messages::SC_MONITORPOWER => MessageDisposition::Intercept,
            _ => MessageDisposition::Forward,
        },
        messages::WM_PAINT => MessageDisposition::Intercept,
        _ => MessageDisposition::Forward,
    }
}

/// Lifecycle of the surface window.
pub struct SurfaceHost {
    class_name: String,
    title: String,
    class_registered: Mutex<bool>,
    window: Option<NativeWindow>,
}

impl SurfaceHost {
    #[must_use]
    pub fn new(class_name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            title: title.into(),
            class_registered: Mutex::new(false),
            window: None,
        }
    }

    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    #[must_use]
    pub fn is_class_registered(&self) -> bool {
        *self.class_registered.lock()
    }

    /// Current window, if one exists.
    #[must_use]
    pub fn window(&self) -> Option<WindowHandle> {
        self.window.map(|w| w.window)
    }

    /// Device context of the current window.
    #[must_use]
    pub fn device_context(&self) -> Option<DeviceContext> {
        self.window.map(|w| w.device_context)
    }

    /// Register the window class unless an earlier call already did.
    pub fn ensure_window_class_registered<P: DisplayPlatform + ?Sized>(
        &self,
        platform: &mut P,
        module: ModuleHandle,
    ) -> Result<(), RegistrationError> {
        let mut registered = self.class_registered.lock();
        if *registered {
            return Ok(());
        }

        let spec = WindowClassSpec {
            class_name: self.class_name.clone(),
            module,
        };
        platform.register_window_class(&spec).map_err(|reason| {
            log::error!("failed to register window class: {}", reason);
            RegistrationError {
                class_name: self.class_name.clone(),
                reason,
            }
        })?;

        *registered = true;
        Ok(())
    }

    /// Create the surface window at the origin. Hides the system cursor on
    /// success.
    pub fn create_window<P: DisplayPlatform + ?Sized>(
        &mut self,
        platform: &mut P,
        width: u32,
        height: u32,
        fullscreen: bool,
        module: ModuleHandle,
    ) -> Result<WindowHandle, WindowCreationError> {
        let params = WindowParams {
            class_name: self.class_name.clone(),
            title: self.title.clone(),
            style: WindowStyle::for_fullscreen(fullscreen),
            x: 0,
            y: 0,
            width,
            height,
            module,
        };

        let window = platform.create_window(&params).map_err(|reason| {
            log::error!("failed to create window: {}", reason);
            WindowCreationError {
                width,
                height,
                reason,
            }
        })?;

        self.window = Some(window);
        platform.set_cursor_visible(false);
        log::debug!("created display window {:#x}", window.window.0);
        Ok(window.window)
    }

    /// Destroy the window if there is one, then make the cursor visible.
    pub fn destroy_window<P: DisplayPlatform + ?Sized>(&mut self, platform: &mut P) {
        if let Some(window) = self.window.take() {
            platform.destroy_window(window);
            log::debug!("destroyed display window {:#x}", window.window.0);
        }
        platform.set_cursor_visible(true);
    }
}
