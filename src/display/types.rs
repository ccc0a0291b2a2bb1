//! Core value types shared by the display subsystem.
//!
//! Handles are thin newtypes over the OS integer handle so that the core
//! never dereferences them; only the platform backend knows what they are.

use bitflags::bitflags;

/// Lowest colour depth considered a true-colour mode. Indexed modes below
/// this are never reported.
pub const MIN_TRUE_COLOR_BITS: u32 = 16;

/// Alpha buffer sizes manufactured for every raw mode.
pub const ALPHA_BITS_CHOICES: [u32; 2] = [0, 8];
/// Depth buffer sizes manufactured for every raw mode.
pub const DEPTH_BITS_CHOICES: [u32; 4] = [0, 8, 16, 24];
/// Stencil buffer sizes manufactured for every raw mode.
pub const STENCIL_BITS_CHOICES: [u32; 2] = [0, 8];

/// Number of descriptors emitted per qualifying raw mode.
pub const COMBINATIONS_PER_MODE: usize =
    ALPHA_BITS_CHOICES.len() * DEPTH_BITS_CHOICES.len() * STENCIL_BITS_CHOICES.len();

/// A single hardware-reported display configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawDisplayMode {
    pub width: u32,
    pub height: u32,
    pub bits_per_pixel: u32,
    pub refresh_hz: u32,
}

impl RawDisplayMode {
    #[must_use]
    pub const fn new(width: u32, height: u32, bits_per_pixel: u32, refresh_hz: u32) -> Self {
        Self {
            width,
            height,
            bits_per_pixel,
            refresh_hz,
        }
    }

    /// Palette modes are filtered out before expansion.
    #[must_use]
    pub const fn is_true_color(&self) -> bool {
        self.bits_per_pixel >= MIN_TRUE_COLOR_BITS
    }
}

/// A display mode as reported to the host: a raw mode plus one
/// alpha/depth/stencil combination.
///
/// Laid out for direct copy across the C boundary.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DisplayModeDescriptor {
    pub width: u32,
    pub height: u32,
    pub color_bits_per_pixel: u32,
    pub refresh_hz: u32,
    pub alpha_bits: u32,
    pub depth_bits: u32,
    pub stencil_bits: u32,
}

impl DisplayModeDescriptor {
    /// Combine a raw mode with buffer sizes.
    #[must_use]
    pub const fn from_raw(raw: &RawDisplayMode, alpha_bits: u32, depth_bits: u32, stencil_bits: u32) -> Self {
        Self {
            width: raw.width,
            height: raw.height,
            color_bits_per_pixel: raw.bits_per_pixel,
            refresh_hz: raw.refresh_hz,
            alpha_bits,
            depth_bits,
            stencil_bits,
        }
    }

    /// The hardware part of this descriptor.
    #[must_use]
    pub const fn raw(&self) -> RawDisplayMode {
        RawDisplayMode::new(self.width, self.height, self.color_bits_per_pixel, self.refresh_hz)
    }
}

bitflags! {
    /// Pixel format capability flags. Bit values match the Win32 `PFD_*`
    /// constants so the backend can pass them straight through.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PixelFormatFlags: u32 {
        const DOUBLE_BUFFER = 0x0000_0001;
        const DRAW_TO_WINDOW = 0x0000_0004;
        const SUPPORT_OPENGL = 0x0000_0020;
        const GENERIC_ACCELERATED = 0x0000_1000;
    }
}

impl PixelFormatFlags {
    /// Capabilities every accepted surface format must report.
    pub const REQUIRED: Self = Self::DRAW_TO_WINDOW
        .union(Self::SUPPORT_OPENGL)
        .union(Self::DOUBLE_BUFFER);
}

/// OS-side description of a pixel format. Pixel type is always RGBA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelFormatDescriptor {
    pub flags: PixelFormatFlags,
    pub color_bits: u32,
    pub alpha_bits: u32,
    pub depth_bits: u32,
    pub stencil_bits: u32,
}

/// Opaque 1-based pixel format index handed out by the OS chooser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FormatId(pub i32);

/// Native window handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowHandle(pub isize);

impl WindowHandle {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        self.0 == 0
    }
}

/// Native device context handle belonging to a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceContext(pub isize);

/// Native module (instance) handle used to own windows and input objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModuleHandle(pub isize);

/// Native input-system object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InputHandle(pub isize);

/// A window together with the device context used as the render target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeWindow {
    pub window: WindowHandle,
    pub device_context: DeviceContext,
}

/// Window frame style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowStyle {
    /// Borderless popup covering the switched display.
    Popup,
    /// Popup with a caption bar for windowed sessions.
    PopupWithCaption,
}

impl WindowStyle {
    #[must_use]
    pub const fn for_fullscreen(fullscreen: bool) -> Self {
        if fullscreen {
            Self::Popup
        } else {
            Self::PopupWithCaption
        }
    }
}

/// Everything the platform needs to register the surface window class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowClassSpec {
    pub class_name: String,
    pub module: ModuleHandle,
}

/// Parameters for one surface window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowParams {
    pub class_name: String,
    pub title: String,
    pub style: WindowStyle,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub module: ModuleHandle,
}

/// Outcome of asking the OS for an input-system object: the raw status code
/// and whatever object came back with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawInputOutcome {
    pub code: i32,
    pub handle: Option<InputHandle>,
}

/// A complete create-display request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayRequest {
    pub width: u32,
    pub height: u32,
    pub bpp: u32,
    pub refresh_hz: u32,
    pub alpha_bits: u32,
    pub depth_bits: u32,
    pub stencil_bits: u32,
    pub fullscreen: bool,
}

impl DisplayRequest {
    /// Request a fullscreen display using an enumerated mode.
    #[must_use]
    pub const fn fullscreen(mode: &DisplayModeDescriptor) -> Self {
        Self {
            width: mode.width,
            height: mode.height,
            bpp: mode.color_bits_per_pixel,
            refresh_hz: mode.refresh_hz,
            alpha_bits: mode.alpha_bits,
            depth_bits: mode.depth_bits,
            stencil_bits: mode.stencil_bits,
            fullscreen: true,
        }
    }

    /// Request a windowed display using an enumerated mode.
    #[must_use]
    pub const fn windowed(mode: &DisplayModeDescriptor) -> Self {
        let mut request = Self::fullscreen(mode);
        request.fullscreen = false;
        request
    }
}
