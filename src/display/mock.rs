//! In-memory display platform.
//!
//! Simulates just enough of the OS for the display core to be exercised
//! without a desktop: a mode list with a switchable current mode, a window
//! table, a cursor flag, a pixel format table with a "closest match"
//! chooser, and an input factory. Every failure the core handles can be
//! forced through a builder method, and every state-changing call is
//! journaled so ordering can be asserted.

use std::collections::HashMap;

use crate::display::input::hresult;
use crate::display::mode_switch::disp_change;
use crate::display::platform::{DisplayPlatform, DisplaySettings};
use crate::display::types::{
    DeviceContext, FormatId, InputHandle, ModuleHandle, NativeWindow, PixelFormatDescriptor,
    PixelFormatFlags, RawDisplayMode, RawInputOutcome, WindowClassSpec, WindowHandle,
    WindowParams,
};

const MOCK_MODULE: ModuleHandle = ModuleHandle(0x0040_0000);

/// A state-changing call received by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    ChangeDisplaySettings(DisplaySettings),
    ResetDisplaySettings,
    RegisterWindowClass(String),
    CreateWindow(WindowParams),
    DestroyWindow(WindowHandle),
    SetCursorVisible(bool),
    ChoosePixelFormat(PixelFormatDescriptor),
    SetPixelFormat(DeviceContext, FormatId),
    CreateInput(u32),
    ReleaseInput(InputHandle),
}

/// Simulated OS.
#[derive(Debug)]
pub struct MockPlatform {
    raw_modes: Vec<RawDisplayMode>,
    desktop_depth: u32,
    current_mode: Option<DisplaySettings>,
    display_change_code: Option<i32>,
    reset_code: i32,

    fail_registration: bool,
    registered_classes: Vec<String>,
    fail_window: bool,
    windows: Vec<NativeWindow>,
    windows_created: usize,
    last_window_params: Option<WindowParams>,
    cursor_visible: bool,

    formats: Vec<PixelFormatDescriptor>,
    fail_describe: bool,
    fail_commit: bool,
    committed: HashMap<DeviceContext, FormatId>,

    input_code: i32,
    inputs: Vec<InputHandle>,

    next_handle: isize,
    calls: Vec<MockCall>,
}

impl Default for MockPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPlatform {
    /// A 32-bit desktop offering a handful of modes and no pixel formats.
    #[must_use]
    pub fn new() -> Self {
        Self {
            raw_modes: vec![
                RawDisplayMode::new(640, 480, 8, 60),
                RawDisplayMode::new(640, 480, 16, 60),
                RawDisplayMode::new(800, 600, 32, 60),
                RawDisplayMode::new(1024, 768, 32, 75),
            ],
            desktop_depth: 32,
            current_mode: None,
            display_change_code: None,
            reset_code: disp_change::SUCCESSFUL,
            fail_registration: false,
            registered_classes: Vec::new(),
            fail_window: false,
            windows: Vec::new(),
            windows_created: 0,
            last_window_params: None,
            cursor_visible: true,
            formats: Vec::new(),
            fail_describe: false,
            fail_commit: false,
            committed: HashMap::new(),
            input_code: hresult::DI_OK,
            inputs: Vec::new(),
            next_handle: 0x1000,
            calls: Vec::new(),
        }
    }

    /// [`MockPlatform::new`] plus one format that satisfies a 32-bit colour,
    /// 8 alpha, 24 depth, 8 stencil request exactly.
    #[must_use]
    pub fn standard() -> Self {
        Self::new().with_formats(vec![PixelFormatDescriptor {
            flags: PixelFormatFlags::REQUIRED,
            color_bits: 32,
            alpha_bits: 8,
            depth_bits: 24,
            stencil_bits: 8,
        }])
    }

    #[must_use]
    pub fn with_raw_modes(mut self, modes: Vec<RawDisplayMode>) -> Self {
        self.raw_modes = modes;
        self
    }

    #[must_use]
    pub fn with_desktop_depth(mut self, bits: u32) -> Self {
        self.desktop_depth = bits;
        self
    }

    /// Force every display change to return `code`.
    #[must_use]
    pub fn with_display_change_code(mut self, code: i32) -> Self {
        self.display_change_code = Some(code);
        self
    }

    /// Force display resets to report `code`. The mode is still restored.
    #[must_use]
    pub fn with_reset_code(mut self, code: i32) -> Self {
        self.reset_code = code;
        self
    }

    #[must_use]
    pub fn with_registration_failure(mut self) -> Self {
        self.fail_registration = true;
        self
    }

    #[must_use]
    pub fn with_window_failure(mut self) -> Self {
        self.fail_window = true;
        self
    }

    /// Pixel format table; format ids are 1-based indices into it.
    #[must_use]
    pub fn with_formats(mut self, formats: Vec<PixelFormatDescriptor>) -> Self {
        self.formats = formats;
        self
    }

    #[must_use]
    pub fn with_describe_failure(mut self) -> Self {
        self.fail_describe = true;
        self
    }

    #[must_use]
    pub fn with_commit_failure(mut self) -> Self {
        self.fail_commit = true;
        self
    }

    /// Status code returned by the input factory. An object is still handed
    /// back for success and beta-version codes.
    #[must_use]
    pub fn with_input_code(mut self, code: i32) -> Self {
        self.input_code = code;
        self
    }

    /// Treat an externally made window as live.
    pub fn adopt_window(&mut self, window: NativeWindow) {
        self.windows.push(window);
    }

    /// Mode applied by the last successful switch, `None` when at default.
    #[must_use]
    pub const fn current_display_settings(&self) -> Option<DisplaySettings> {
        self.current_mode
    }

    #[must_use]
    pub fn registration_count(&self) -> usize {
        self.registered_classes.len()
    }

    #[must_use]
    pub fn last_window_params(&self) -> Option<&WindowParams> {
        self.last_window_params.as_ref()
    }

    #[must_use]
    pub const fn cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    /// Windows not yet destroyed.
    #[must_use]
    pub fn live_windows(&self) -> Vec<WindowHandle> {
        self.windows.iter().map(|w| w.window).collect()
    }

    #[must_use]
    pub const fn windows_created(&self) -> usize {
        self.windows_created
    }

    /// Input objects not yet released.
    #[must_use]
    pub fn live_inputs(&self) -> Vec<InputHandle> {
        self.inputs.clone()
    }

    #[must_use]
    pub fn committed_format(&self, dc: DeviceContext) -> Option<FormatId> {
        self.committed.get(&dc).copied()
    }

    #[must_use]
    pub fn calls(&self) -> &[MockCall] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    fn next_handle(&mut self) -> isize {
        self.next_handle += 0x10;
        self.next_handle
    }

    fn mode_is_reported(&self, settings: &DisplaySettings) -> bool {
        self.raw_modes.iter().any(|m| {
            m.width == settings.width
                && m.height == settings.height
                && m.bits_per_pixel == settings.bits_per_pixel
                && settings.refresh_hz.map_or(true, |hz| hz == m.refresh_hz)
        })
    }

    fn satisfies(format: &PixelFormatDescriptor, desired: &PixelFormatDescriptor) -> bool {
        format.color_bits >= desired.color_bits
            && format.alpha_bits >= desired.alpha_bits
            && format.depth_bits >= desired.depth_bits
            && format.stencil_bits >= desired.stencil_bits
    }
}

impl DisplayPlatform for MockPlatform {
    fn enumerate_raw_modes(&self) -> Vec<RawDisplayMode> {
        self.raw_modes.clone()
    }

    fn change_display_settings(&mut self, settings: &DisplaySettings) -> i32 {
        self.calls.push(MockCall::ChangeDisplaySettings(*settings));
        let code = match self.display_change_code {
            Some(code) => code,
            None if self.mode_is_reported(settings) => disp_change::SUCCESSFUL,
            None => disp_change::BADMODE,
        };
        if code == disp_change::SUCCESSFUL {
            self.current_mode = Some(*settings);
        }
        code
    }

    fn reset_display_settings(&mut self) -> i32 {
        self.calls.push(MockCall::ResetDisplaySettings);
        self.current_mode = None;
        self.reset_code
    }

    fn module_handle(&self) -> ModuleHandle {
        MOCK_MODULE
    }

    fn register_window_class(&mut self, class: &WindowClassSpec) -> Result<(), String> {
        self.calls
            .push(MockCall::RegisterWindowClass(class.class_name.clone()));
        if self.fail_registration {
            return Err("class registration refused".to_string());
        }
        if self.registered_classes.contains(&class.class_name) {
            return Err("class already exists".to_string());
        }
        self.registered_classes.push(class.class_name.clone());
        Ok(())
    }

    fn create_window(&mut self, params: &WindowParams) -> Result<NativeWindow, String> {
        self.calls.push(MockCall::CreateWindow(params.clone()));
        self.last_window_params = Some(params.clone());
        if self.fail_window {
            return Err("window creation refused".to_string());
        }
        if !self.registered_classes.contains(&params.class_name) {
            return Err(format!("class '{}' is not registered", params.class_name));
        }
        let window = WindowHandle(self.next_handle());
        let device_context = DeviceContext(self.next_handle());
        let native = NativeWindow {
            window,
            device_context,
        };
        self.windows.push(native);
        self.windows_created += 1;
        Ok(native)
    }

    fn destroy_window(&mut self, window: NativeWindow) {
        self.calls.push(MockCall::DestroyWindow(window.window));
        self.windows.retain(|w| w.window != window.window);
        self.committed.remove(&window.device_context);
    }

    fn set_cursor_visible(&mut self, visible: bool) {
        self.calls.push(MockCall::SetCursorVisible(visible));
        self.cursor_visible = visible;
    }

    fn device_color_depth(&self, _dc: DeviceContext) -> u32 {
        self.current_mode
            .map_or(self.desktop_depth, |mode| mode.bits_per_pixel)
    }

    fn choose_pixel_format(&mut self, _dc: DeviceContext, desired: &PixelFormatDescriptor) -> Option<FormatId> {
        self.calls.push(MockCall::ChoosePixelFormat(*desired));
        let exact = self
            .formats
            .iter()
            .position(|f| Self::satisfies(f, desired));
        let index = exact.or_else(|| {
            self.formats
                .iter()
                .enumerate()
                .max_by_key(|(_, f)| (f.depth_bits, f.stencil_bits, f.color_bits, f.alpha_bits))
                .map(|(i, _)| i)
        })?;
        i32::try_from(index + 1).ok().map(FormatId)
    }

    fn describe_pixel_format(&self, _dc: DeviceContext, id: FormatId) -> Option<PixelFormatDescriptor> {
        if self.fail_describe {
            return None;
        }
        let index = usize::try_from(id.0).ok()?.checked_sub(1)?;
        self.formats.get(index).copied()
    }

    fn set_pixel_format(
        &mut self,
        dc: DeviceContext,
        id: FormatId,
        _desired: &PixelFormatDescriptor,
    ) -> Result<(), String> {
        self.calls.push(MockCall::SetPixelFormat(dc, id));
        if self.fail_commit {
            return Err("pixel format refused".to_string());
        }
        if self.committed.contains_key(&dc) {
            return Err("device context already has a pixel format".to_string());
        }
        self.committed.insert(dc, id);
        Ok(())
    }

    fn create_input(&mut self, _module: ModuleHandle, version: u32) -> RawInputOutcome {
        self.calls.push(MockCall::CreateInput(version));
        let code = self.input_code;
        let handle = match code {
            hresult::DI_OK | hresult::DIERR_BETADIRECTINPUTVERSION => {
                let handle = InputHandle(self.next_handle());
                self.inputs.push(handle);
                Some(handle)
            }
            _ => None,
        };
        RawInputOutcome { code, handle }
    }

    fn release_input(&mut self, handle: InputHandle) {
        self.calls.push(MockCall::ReleaseInput(handle));
        self.inputs.retain(|h| *h != handle);
    }
}
