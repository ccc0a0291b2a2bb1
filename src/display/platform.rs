//! The OS seam.
//!
//! [`DisplayPlatform`] lists the primitive OS calls the display core needs.
//! The core never talks to the OS directly; `Win32Platform` implements this
//! for real hardware and `MockPlatform` simulates it for tests.
//!
//! Methods return raw OS outcome codes where the core owns the translation
//! (display changes, input creation), and `Option`/`Result` where the OS only
//! reports success or failure.

use crate::display::types::{
    DeviceContext, FormatId, InputHandle, ModuleHandle, NativeWindow, PixelFormatDescriptor,
    RawDisplayMode, RawInputOutcome, WindowClassSpec, WindowParams,
};

/// Display settings sent to the OS on a mode switch.
///
/// `refresh_hz` of `None` leaves the refresh rate to the OS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplaySettings {
    pub width: u32,
    pub height: u32,
    pub bits_per_pixel: u32,
    pub refresh_hz: Option<u32>,
}

/// Primitive OS operations used by the display core.
pub trait DisplayPlatform {
    /// Every display configuration the primary adapter reports, in OS order.
    fn enumerate_raw_modes(&self) -> Vec<RawDisplayMode>;

    /// Switch the primary display for a fullscreen session. Returns the OS
    /// change code (`DISP_CHANGE_*`).
    fn change_display_settings(&mut self, settings: &DisplaySettings) -> i32;

    /// Restore the registry default display configuration. Returns the OS
    /// change code.
    fn reset_display_settings(&mut self) -> i32;

    /// Handle of the module that owns windows and input objects.
    fn module_handle(&self) -> ModuleHandle;

    /// Register the surface window class with the message filter installed.
    fn register_window_class(&mut self, class: &WindowClassSpec) -> Result<(), String>;

    /// Create, show and repaint a window, returning it with its device
    /// context.
    fn create_window(&mut self, params: &WindowParams) -> Result<NativeWindow, String>;

    /// Release the device context and destroy the window.
    fn destroy_window(&mut self, window: NativeWindow);

    /// Set system cursor visibility. Repeated calls with the same value are
    /// no-ops.
    fn set_cursor_visible(&mut self, visible: bool);

    /// Bits per pixel of the device context's current surface.
    fn device_color_depth(&self, dc: DeviceContext) -> u32;

    /// Closest format the OS offers for `desired`, if any.
    fn choose_pixel_format(&mut self, dc: DeviceContext, desired: &PixelFormatDescriptor) -> Option<FormatId>;

    /// What the OS says format `id` really is.
    fn describe_pixel_format(&self, dc: DeviceContext, id: FormatId) -> Option<PixelFormatDescriptor>;

    /// Commit format `id` to the device context.
    fn set_pixel_format(
        &mut self,
        dc: DeviceContext,
        id: FormatId,
        desired: &PixelFormatDescriptor,
    ) -> Result<(), String>;

    /// Create the input-system object for `version`.
    fn create_input(&mut self, module: ModuleHandle, version: u32) -> RawInputOutcome;

    /// Release a previously created input-system object.
    fn release_input(&mut self, handle: InputHandle);
}
