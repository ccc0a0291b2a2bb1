//! C ABI for host programs.
//!
//! One process-wide [`Bridge`] owns the session controller. Every entry
//! point takes the controller lock for its whole duration, so a second
//! caller never sees a half-built or half-torn-down session.

use std::ffi::CStr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicI32, AtomicIsize, Ordering};

use libc::{c_char, c_int};
use parking_lot::Mutex;

use crate::display::error::{SessionError, SessionResult};
use crate::display::platform::DisplayPlatform;
use crate::display::session::SessionController;
use crate::display::types::{DisplayModeDescriptor, DisplayRequest};
use crate::logging::{self, LogLevel};

fn non_negative(name: &str, value: c_int) -> SessionResult<u32> {
    u32::try_from(value)
        .map_err(|_| SessionError::InvalidRequest(format!("{} must not be negative, got {}", name, value)))
}

/// Build a request from raw ABI arguments, rejecting negative values.
#[allow(clippy::too_many_arguments)]
pub fn request_from_abi(
    width: c_int,
    height: c_int,
    bpp: c_int,
    refresh_hz: c_int,
    alpha_bits: c_int,
    depth_bits: c_int,
    stencil_bits: c_int,
    fullscreen: c_int,
) -> SessionResult<DisplayRequest> {
    Ok(DisplayRequest {
        width: non_negative("width", width)?,
        height: non_negative("height", height)?,
        bpp: non_negative("bpp", bpp)?,
        refresh_hz: non_negative("refresh rate", refresh_hz)?,
        alpha_bits: non_negative("alpha bits", alpha_bits)?,
        depth_bits: non_negative("depth bits", depth_bits)?,
        stencil_bits: non_negative("stencil bits", stencil_bits)?,
        fullscreen: fullscreen != 0,
    })
}

fn clamp_count(n: usize) -> c_int {
    c_int::try_from(n).unwrap_or(c_int::MAX)
}

/// Session controller plus the values published to the host.
pub struct Bridge<P: DisplayPlatform> {
    controller: Mutex<SessionController<P>>,
    window: AtomicIsize,
    last_error: AtomicI32,
}

impl<P: DisplayPlatform> Bridge<P> {
    pub fn new(controller: SessionController<P>) -> Self {
        Self {
            controller: Mutex::new(controller),
            window: AtomicIsize::new(0),
            last_error: AtomicI32::new(0),
        }
    }

    pub fn mode_count(&self) -> c_int {
        clamp_count(self.controller.lock().list_modes().len())
    }

    /// Copy up to `out.len()` descriptors; returns the number written.
    pub fn list_modes_into(&self, out: &mut [DisplayModeDescriptor]) -> usize {
        let modes = self.controller.lock().list_modes();
        let n = modes.len().min(out.len());
        out[..n].copy_from_slice(&modes[..n]);
        n
    }

    /// # Safety
    /// A non-null `out` must be valid for writes of `capacity` descriptors.
    pub unsafe fn list_modes_raw(&self, out: *mut DisplayModeDescriptor, capacity: c_int) -> c_int {
        if out.is_null() {
            return self.mode_count();
        }
        let capacity = usize::try_from(capacity).unwrap_or(0);
        if capacity == 0 {
            return 0;
        }
        let out = std::slice::from_raw_parts_mut(out, capacity);
        clamp_count(self.list_modes_into(out))
    }

    /// Returns true on success; the handle is then available through
    /// [`Bridge::window_handle`].
    pub fn create(&self, request: SessionResult<DisplayRequest>) -> bool {
        let mut controller = self.controller.lock();
        let result = request.and_then(|request| controller.create_display(&request));
        match result {
            Ok(window) => {
                self.window.store(window.0, Ordering::SeqCst);
                self.last_error.store(0, Ordering::SeqCst);
                true
            }
            Err(err) => {
                if let SessionError::InvalidRequest(reason) = &err {
                    log::error!("invalid display request: {}", reason);
                }
                // A rejected duplicate create leaves the live session alone.
                if !controller.is_active() {
                    self.window.store(0, Ordering::SeqCst);
                }
                self.last_error.store(err.code(), Ordering::SeqCst);
                false
            }
        }
    }

    pub fn window_handle(&self) -> isize {
        self.window.load(Ordering::SeqCst)
    }

    pub fn last_error(&self) -> c_int {
        self.last_error.load(Ordering::SeqCst)
    }

    pub fn destroy(&self) {
        let mut controller = self.controller.lock();
        controller.destroy_display();
        self.window.store(0, Ordering::SeqCst);
    }

    /// Run `f` with the controller locked.
    pub fn with_controller<R>(&self, f: impl FnOnce(&mut SessionController<P>) -> R) -> R {
        f(&mut self.controller.lock())
    }
}

#[cfg(windows)]
mod exports {
    use std::sync::LazyLock;

    use super::*;
    use crate::config::{self, BridgeConfig};
    use crate::display::win32::Win32Platform;

    static BRIDGE: LazyLock<Bridge<Win32Platform>> = LazyLock::new(|| {
        let config = config::load_config().unwrap_or_else(|err| {
            log::warn!("ignoring bridge configuration: {:#}", err);
            BridgeConfig::default()
        });
        Bridge::new(SessionController::with_config(Win32Platform::new(), &config))
    });

    #[no_mangle]
    pub extern "C" fn display_bridge_mode_count() -> c_int {
        BRIDGE.mode_count()
    }

    /// # Safety
    /// A non-null `out` must be valid for writes of `capacity` descriptors.
    #[no_mangle]
    pub unsafe extern "C" fn display_bridge_list_modes(
        out: *mut DisplayModeDescriptor,
        capacity: c_int,
    ) -> c_int {
        BRIDGE.list_modes_raw(out, capacity)
    }

    #[no_mangle]
    #[allow(clippy::too_many_arguments)]
    pub extern "C" fn display_bridge_create(
        width: c_int,
        height: c_int,
        bpp: c_int,
        refresh_hz: c_int,
        alpha_bits: c_int,
        depth_bits: c_int,
        stencil_bits: c_int,
        fullscreen: c_int,
    ) -> c_int {
        let request = request_from_abi(
            width,
            height,
            bpp,
            refresh_hz,
            alpha_bits,
            depth_bits,
            stencil_bits,
            fullscreen,
        );
        c_int::from(BRIDGE.create(request))
    }

    #[no_mangle]
    pub extern "C" fn display_bridge_window_handle() -> isize {
        BRIDGE.window_handle()
    }

    #[no_mangle]
    pub extern "C" fn display_bridge_last_error() -> c_int {
        BRIDGE.last_error()
    }

    #[no_mangle]
    pub extern "C" fn display_bridge_destroy() {
        BRIDGE.destroy();
    }
}

#[cfg(windows)]
pub use exports::*;

/// Install the diagnostic sink. A null `path` logs to stderr.
///
/// Returns 0 on success, -1 on failure.
///
/// # Safety
/// A non-null `path` must be a valid null-terminated C string.
#[no_mangle]
pub unsafe extern "C" fn display_bridge_log_init(path: *const c_char, level: c_int) -> c_int {
    let path = if path.is_null() {
        None
    } else {
        match CStr::from_ptr(path).to_str() {
            Ok(s) => Some(PathBuf::from(s)),
            Err(_) => return -1,
        }
    };

    match logging::init(path.as_deref(), LogLevel::from_i32(level)) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("display_bridge_log_init: failed to open log sink {:?}: {}", path, e);
            -1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::mock::MockPlatform;
    use serial_test::serial;
    use std::ffi::CString;

    fn bridge() -> Bridge<MockPlatform> {
        Bridge::new(SessionController::new(MockPlatform::standard()))
    }

    fn good_request() -> SessionResult<DisplayRequest> {
        request_from_abi(800, 600, 32, 60, 8, 24, 8, 1)
    }

    #[test]
    fn test_negative_arguments_are_rejected() {
        assert!(matches!(
            request_from_abi(-1, 600, 32, 60, 0, 0, 0, 0),
            Err(SessionError::InvalidRequest(_))
        ));
        assert!(matches!(
            request_from_abi(800, 600, 32, 60, 0, 0, -8, 0),
            Err(SessionError::InvalidRequest(_))
        ));

        let bridge = bridge();
        assert!(!bridge.create(request_from_abi(800, -600, 32, 60, 0, 0, 0, 1)));
        assert_eq!(bridge.last_error(), 2);
        bridge.with_controller(|ctl| assert!(ctl.platform().calls().is_empty()));
    }

    #[test]
    fn test_create_publishes_handle() {
        let bridge = bridge();
        assert_eq!(bridge.window_handle(), 0);
        assert!(bridge.create(good_request()));
        assert_ne!(bridge.window_handle(), 0);
        assert_eq!(bridge.last_error(), 0);

        bridge.destroy();
        assert_eq!(bridge.window_handle(), 0);
        bridge.with_controller(|ctl| assert!(ctl.platform().live_windows().is_empty()));
    }

    #[test]
    fn test_duplicate_create_keeps_session() {
        let bridge = bridge();
        assert!(bridge.create(good_request()));
        let window = bridge.window_handle();

        assert!(!bridge.create(good_request()));
        assert_eq!(bridge.last_error(), SessionError::AlreadyActive.code());
        assert_eq!(bridge.window_handle(), window);
        bridge.with_controller(|ctl| assert!(ctl.is_active()));
        bridge.destroy();
    }

    #[test]
    fn test_failed_create_records_code() {
        let bridge = bridge();
        assert!(!bridge.create(request_from_abi(800, 600, 32, 60, 8, 24, 16, 1)));
        assert_eq!(bridge.last_error(), 54);
        assert_eq!(bridge.window_handle(), 0);

        assert!(bridge.create(good_request()));
        assert_eq!(bridge.last_error(), 0);
        bridge.destroy();
    }

    #[test]
    fn test_list_modes_raw() {
        let bridge = bridge();
        let total = unsafe { bridge.list_modes_raw(std::ptr::null_mut(), 0) };
        assert_eq!(total, bridge.mode_count());
        assert_eq!(total, 48);

        let mut buf = vec![DisplayModeDescriptor::default(); 20];
        let written = unsafe { bridge.list_modes_raw(buf.as_mut_ptr(), buf.len() as c_int) };
        assert_eq!(written, 20);
        assert_eq!(buf[0].width, 640);
        assert_eq!(buf[0].color_bits_per_pixel, 16);
        assert_eq!(buf[16].width, 800);

        assert_eq!(unsafe { bridge.list_modes_raw(buf.as_mut_ptr(), -3) }, 0);
    }

    #[test]
    #[serial(logger)]
    fn test_log_init_abi() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("abi.log");
        let c_path = CString::new(path.to_str().unwrap()).unwrap();

        assert_eq!(unsafe { display_bridge_log_init(c_path.as_ptr(), 4) }, 0);
        log::info!("abi sink ready");
        assert!(std::fs::read_to_string(&path).unwrap().contains("abi sink ready"));

        let bad = CString::new(dir.path().join("missing/abi.log").to_str().unwrap()).unwrap();
        assert_eq!(unsafe { display_bridge_log_init(bad.as_ptr(), 4) }, -1);
    }
}
