//! Win32 display platform.
//!
//! GDI for display modes and pixel formats, USER32 for the surface window,
//! DirectInput for the input-system object.

use std::ffi::c_void;
use std::io;
use std::iter;
use std::mem;
use std::ptr;

use windows_sys::core::GUID;
use windows_sys::Win32::Foundation::{HINSTANCE, HWND, LPARAM, LRESULT, WPARAM};
use windows_sys::Win32::Graphics::Gdi::{
    ChangeDisplaySettingsW, EnumDisplaySettingsW, GetDeviceCaps, GetStockObject, GetWindowDC,
    ReleaseDC, UpdateWindow, BITSPIXEL, BLACK_BRUSH, CDS_FULLSCREEN, DEVMODEW, DM_BITSPERPEL,
    DM_DISPLAYFLAGS, DM_DISPLAYFREQUENCY, DM_PELSHEIGHT, DM_PELSWIDTH, HDC,
};
use windows_sys::Win32::Graphics::OpenGL::{
    ChoosePixelFormat, DescribePixelFormat, SetPixelFormat, PFD_MAIN_PLANE, PFD_TYPE_RGBA,
    PIXELFORMATDESCRIPTOR,
};
use windows_sys::Win32::System::LibraryLoader::GetModuleHandleW;
use windows_sys::Win32::UI::WindowsAndMessaging::{
    CreateWindowExW, DefWindowProcW, DestroyWindow, LoadCursorW, LoadIconW, RegisterClassW,
    ShowCursor, ShowWindow, CS_GLOBALCLASS, CS_OWNDC, IDC_ARROW, IDI_APPLICATION, SW_SHOW,
    WNDCLASSW, WS_CAPTION, WS_POPUP,
};

use crate::display::platform::{DisplayPlatform, DisplaySettings};
use crate::display::surface::{classify_message, MessageDisposition};
use crate::display::types::{
    DeviceContext, FormatId, InputHandle, ModuleHandle, NativeWindow, PixelFormatDescriptor,
    PixelFormatFlags, RawDisplayMode, RawInputOutcome, WindowClassSpec, WindowHandle,
    WindowParams, WindowStyle,
};

/// IID_IDirectInput8W
const IID_IDIRECTINPUT8W: GUID = GUID::from_u128(0xBF798031_483A_4DA2_AA99_5D64ED369700);

#[link(name = "dinput8")]
extern "system" {
    fn DirectInput8Create(
        hinst: HINSTANCE,
        version: u32,
        riid: *const GUID,
        out: *mut *mut c_void,
        outer: *mut c_void,
    ) -> i32;
}

/// Leading slots of every COM vtable.
#[repr(C)]
struct IUnknownVtbl {
    query_interface: unsafe extern "system" fn(*mut c_void, *const GUID, *mut *mut c_void) -> i32,
    add_ref: unsafe extern "system" fn(*mut c_void) -> u32,
    release: unsafe extern "system" fn(*mut c_void) -> u32,
}

/// # Safety
/// `object` must be a live COM interface pointer.
unsafe fn release_com(object: *mut c_void) -> u32 {
    let vtbl = *(object as *const *const IUnknownVtbl);
    ((*vtbl).release)(object)
}

/// Window procedure for the surface window class.
unsafe extern "system" fn surface_window_proc(
    hwnd: HWND,
    message: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    match classify_message(message, wparam) {
        MessageDisposition::Intercept => 0,
        MessageDisposition::Forward => DefWindowProcW(hwnd, message, wparam, lparam),
    }
}

fn wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(iter::once(0)).collect()
}

fn last_error() -> String {
    io::Error::last_os_error().to_string()
}

fn hwnd(handle: WindowHandle) -> HWND {
    handle.0 as HWND
}

fn hdc(dc: DeviceContext) -> HDC {
    dc.0 as HDC
}

fn to_pfd(desc: &PixelFormatDescriptor) -> PIXELFORMATDESCRIPTOR {
    // SAFETY: plain C struct, all-zero is a valid "don't care" value.
    let mut pfd: PIXELFORMATDESCRIPTOR = unsafe { mem::zeroed() };
    pfd.nSize = mem::size_of::<PIXELFORMATDESCRIPTOR>() as u16;
    pfd.nVersion = 1;
    pfd.dwFlags = desc.flags.bits() as _;
    pfd.iPixelType = PFD_TYPE_RGBA as _;
    pfd.cColorBits = desc.color_bits.min(u8::MAX as u32) as u8;
    pfd.cAlphaBits = desc.alpha_bits.min(u8::MAX as u32) as u8;
    pfd.cDepthBits = desc.depth_bits.min(u8::MAX as u32) as u8;
    pfd.cStencilBits = desc.stencil_bits.min(u8::MAX as u32) as u8;
    pfd.iLayerType = PFD_MAIN_PLANE as _;
    pfd
}

fn from_pfd(pfd: &PIXELFORMATDESCRIPTOR) -> PixelFormatDescriptor {
    PixelFormatDescriptor {
        flags: PixelFormatFlags::from_bits_truncate(pfd.dwFlags as u32),
        color_bits: u32::from(pfd.cColorBits),
        alpha_bits: u32::from(pfd.cAlphaBits),
        depth_bits: u32::from(pfd.cDepthBits),
        stencil_bits: u32::from(pfd.cStencilBits),
    }
}

/// The real Win32 desktop.
#[derive(Debug, Default)]
pub struct Win32Platform {
    cursor_hidden: bool,
}

impl Win32Platform {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cursor_hidden: false,
        }
    }
}

impl DisplayPlatform for Win32Platform {
    fn enumerate_raw_modes(&self) -> Vec<RawDisplayMode> {
        let mut modes = Vec::new();
        let mut index = 0u32;
        loop {
            // SAFETY: DEVMODEW is a plain C struct; dmSize is set before use.
            let mut devmode: DEVMODEW = unsafe { mem::zeroed() };
            devmode.dmSize = mem::size_of::<DEVMODEW>() as u16;
            if unsafe { EnumDisplaySettingsW(ptr::null(), index, &mut devmode) } == 0 {
                break;
            }
            modes.push(RawDisplayMode::new(
                devmode.dmPelsWidth,
                devmode.dmPelsHeight,
                devmode.dmBitsPerPel,
                devmode.dmDisplayFrequency,
            ));
            index += 1;
        }
        modes
    }

    fn change_display_settings(&mut self, settings: &DisplaySettings) -> i32 {
        // SAFETY: see enumerate_raw_modes.
        let mut devmode: DEVMODEW = unsafe { mem::zeroed() };
        devmode.dmSize = mem::size_of::<DEVMODEW>() as u16;
        devmode.dmBitsPerPel = settings.bits_per_pixel;
        devmode.dmPelsWidth = settings.width;
        devmode.dmPelsHeight = settings.height;
        devmode.dmFields = DM_BITSPERPEL | DM_PELSWIDTH | DM_PELSHEIGHT | DM_DISPLAYFLAGS;
        if let Some(hz) = settings.refresh_hz {
            devmode.dmDisplayFrequency = hz;
            devmode.dmFields |= DM_DISPLAYFREQUENCY;
        }
        unsafe { ChangeDisplaySettingsW(&devmode, CDS_FULLSCREEN) }
    }

    fn reset_display_settings(&mut self) -> i32 {
        unsafe { ChangeDisplaySettingsW(ptr::null(), 0) }
    }

    fn module_handle(&self) -> ModuleHandle {
        ModuleHandle(unsafe { GetModuleHandleW(ptr::null()) } as isize)
    }

    fn register_window_class(&mut self, class: &WindowClassSpec) -> Result<(), String> {
        let class_name = wide(&class.class_name);
        let window_class = WNDCLASSW {
            style: CS_GLOBALCLASS | CS_OWNDC,
            lpfnWndProc: Some(surface_window_proc),
            cbClsExtra: 0,
            cbWndExtra: 0,
            hInstance: class.module.0 as HINSTANCE,
            hIcon: unsafe { LoadIconW(ptr::null_mut(), IDI_APPLICATION) },
            hCursor: unsafe { LoadCursorW(ptr::null_mut(), IDC_ARROW) },
            hbrBackground: unsafe { GetStockObject(BLACK_BRUSH) } as _,
            lpszMenuName: ptr::null(),
            lpszClassName: class_name.as_ptr(),
        };
        if unsafe { RegisterClassW(&window_class) } == 0 {
            return Err(last_error());
        }
        Ok(())
    }

    fn create_window(&mut self, params: &WindowParams) -> Result<NativeWindow, String> {
        let width = i32::try_from(params.width).map_err(|e| e.to_string())?;
        let height = i32::try_from(params.height).map_err(|e| e.to_string())?;
        let style = match params.style {
            WindowStyle::Popup => WS_POPUP,
            WindowStyle::PopupWithCaption => WS_POPUP | WS_CAPTION,
        };
        let class_name = wide(&params.class_name);
        let title = wide(&params.title);

        let window = unsafe {
            CreateWindowExW(
                0,
                class_name.as_ptr(),
                title.as_ptr(),
                style,
                params.x,
                params.y,
                width,
                height,
                ptr::null_mut(),
                ptr::null_mut(),
                params.module.0 as HINSTANCE,
                ptr::null(),
            )
        };
        if window.is_null() {
            return Err(last_error());
        }

        unsafe {
            ShowWindow(window, SW_SHOW);
            UpdateWindow(window);
        }

        let dc = unsafe { GetWindowDC(window) };
        if dc.is_null() {
            let reason = last_error();
            unsafe { DestroyWindow(window) };
            return Err(reason);
        }

        Ok(NativeWindow {
            window: WindowHandle(window as isize),
            device_context: DeviceContext(dc as isize),
        })
    }

    fn destroy_window(&mut self, window: NativeWindow) {
        unsafe {
            ReleaseDC(hwnd(window.window), hdc(window.device_context));
            if DestroyWindow(hwnd(window.window)) == 0 {
                log::warn!("DestroyWindow failed: {}", last_error());
            }
        }
    }

    fn set_cursor_visible(&mut self, visible: bool) {
        if visible == !self.cursor_hidden {
            return;
        }
        unsafe { ShowCursor(i32::from(visible)) };
        self.cursor_hidden = !visible;
    }

    fn device_color_depth(&self, dc: DeviceContext) -> u32 {
        let bits = unsafe { GetDeviceCaps(hdc(dc), BITSPIXEL) };
        u32::try_from(bits).unwrap_or(0)
    }

    fn choose_pixel_format(&mut self, dc: DeviceContext, desired: &PixelFormatDescriptor) -> Option<FormatId> {
        let pfd = to_pfd(desired);
        match unsafe { ChoosePixelFormat(hdc(dc), &pfd) } {
            0 => {
                log::debug!("ChoosePixelFormat: {}", last_error());
                None
            }
            id => Some(FormatId(id)),
        }
    }

    fn describe_pixel_format(&self, dc: DeviceContext, id: FormatId) -> Option<PixelFormatDescriptor> {
        // SAFETY: filled in by DescribePixelFormat.
        let mut pfd: PIXELFORMATDESCRIPTOR = unsafe { mem::zeroed() };
        let size = mem::size_of::<PIXELFORMATDESCRIPTOR>() as u32;
        if unsafe { DescribePixelFormat(hdc(dc), id.0 as _, size, &mut pfd) } == 0 {
            log::debug!("DescribePixelFormat: {}", last_error());
            return None;
        }
        Some(from_pfd(&pfd))
    }

    fn set_pixel_format(
        &mut self,
        dc: DeviceContext,
        id: FormatId,
        desired: &PixelFormatDescriptor,
    ) -> Result<(), String> {
        let pfd = to_pfd(desired);
        if unsafe { SetPixelFormat(hdc(dc), id.0, &pfd) } == 0 {
            return Err(last_error());
        }
        Ok(())
    }

    fn create_input(&mut self, module: ModuleHandle, version: u32) -> RawInputOutcome {
        let mut object: *mut c_void = ptr::null_mut();
        let code = unsafe {
            DirectInput8Create(
                module.0 as HINSTANCE,
                version,
                &IID_IDIRECTINPUT8W,
                &mut object,
                ptr::null_mut(),
            )
        };
        RawInputOutcome {
            code,
            handle: (!object.is_null()).then(|| InputHandle(object as isize)),
        }
    }

    fn release_input(&mut self, handle: InputHandle) {
        // SAFETY: handles only come from create_input and are released once.
        unsafe { release_com(handle.0 as *mut c_void) };
    }
}
