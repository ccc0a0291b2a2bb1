//! End-to-end display session scenarios against the simulated platform.

use display_bridge::config::BridgeConfig;
use display_bridge::display::error::{PixelFormatError, SessionError};
use display_bridge::display::input::hresult;
use display_bridge::display::mock::{MockCall, MockPlatform};
use display_bridge::display::mode_switch::disp_change;
use display_bridge::display::types::{PixelFormatDescriptor, PixelFormatFlags, RawDisplayMode, WindowStyle};
use display_bridge::display::{DisplayRequest, SessionController, SessionState};
use rstest::rstest;

fn format(color: u32, alpha: u32, depth: u32, stencil: u32) -> PixelFormatDescriptor {
    PixelFormatDescriptor {
        flags: PixelFormatFlags::REQUIRED,
        color_bits: color,
        alpha_bits: alpha,
        depth_bits: depth,
        stencil_bits: stencil,
    }
}

fn single_mode_platform(formats: Vec<PixelFormatDescriptor>) -> MockPlatform {
    MockPlatform::new()
        .with_raw_modes(vec![RawDisplayMode::new(800, 600, 32, 60)])
        .with_formats(formats)
}

fn fullscreen_request() -> DisplayRequest {
    DisplayRequest {
        width: 800,
        height: 600,
        bpp: 32,
        refresh_hz: 60,
        alpha_bits: 8,
        depth_bits: 24,
        stencil_bits: 8,
        fullscreen: true,
    }
}

#[test]
fn smoke_fullscreen_session() {
    let mut ctl = SessionController::new(single_mode_platform(vec![format(32, 8, 24, 8)]));

    let window = ctl.create_display(&fullscreen_request()).unwrap();
    assert!(!window.is_null());
    assert_eq!(ctl.state(), SessionState::Active);
    assert_eq!(ctl.platform().live_windows(), vec![window]);

    let settings = ctl.platform().current_display_settings().unwrap();
    assert_eq!((settings.width, settings.height, settings.bits_per_pixel), (800, 600, 32));
    assert_eq!(settings.refresh_hz, Some(60));

    let params = ctl.platform().last_window_params().unwrap();
    assert_eq!(params.style, WindowStyle::Popup);
    assert_eq!((params.x, params.y), (0, 0));
    assert_eq!(params.title, "Display Bridge");

    ctl.destroy_display();
    assert!(ctl.platform().live_windows().is_empty());
    assert!(ctl.platform().current_display_settings().is_none());
    assert!(ctl.platform().cursor_visible());
}

#[test]
fn smoke_insufficient_depth_then_recover() {
    let mut ctl = SessionController::new(single_mode_platform(vec![format(32, 8, 16, 8)]));

    let err = ctl.create_display(&fullscreen_request()).unwrap_err();
    assert_eq!(
        err,
        SessionError::PixelFormat(PixelFormatError::DepthTooLow {
            requested: 24,
            actual: 16
        })
    );
    assert_eq!(ctl.state(), SessionState::Uninitialized);
    assert!(ctl.platform().live_windows().is_empty());
    assert!(ctl.platform().current_display_settings().is_none());

    // Enumeration and a satisfiable create still work afterwards.
    assert_eq!(ctl.list_modes().len(), 16);
    let request = DisplayRequest {
        depth_bits: 16,
        ..fullscreen_request()
    };
    ctl.create_display(&request).unwrap();
    assert!(ctl.is_active());
    ctl.destroy_display();
}

#[test]
fn smoke_repeated_sessions() {
    let mut ctl = SessionController::new(MockPlatform::standard());
    ctl.destroy_display();
    for i in 0..5 {
        let request = DisplayRequest {
            fullscreen: i % 2 == 0,
            ..fullscreen_request()
        };
        ctl.create_display(&request).unwrap();
        ctl.destroy_display();
        ctl.destroy_display();
    }
    assert_eq!(ctl.platform().windows_created(), 5);
    assert!(ctl.platform().live_windows().is_empty());
    assert!(ctl.platform().live_inputs().is_empty());
    assert_eq!(ctl.platform().registration_count(), 1);
}

#[test]
fn smoke_default_refresh_is_not_sent() {
    let mut ctl = SessionController::new(MockPlatform::standard());
    let request = DisplayRequest {
        refresh_hz: 0,
        ..fullscreen_request()
    };
    ctl.create_display(&request).unwrap();
    let settings = ctl.platform().current_display_settings().unwrap();
    assert_eq!(settings.refresh_hz, None);
    ctl.destroy_display();
}

#[test]
fn smoke_configured_window_identity() {
    let config = BridgeConfig {
        window_class_name: "HOSTSURFACE".to_string(),
        window_title: "Host Game".to_string(),
        input_version: 0x0700,
        ..BridgeConfig::default()
    };
    let mut ctl = SessionController::with_config(MockPlatform::standard(), &config);
    ctl.create_display(&fullscreen_request()).unwrap();

    let calls = ctl.platform().calls();
    assert!(calls.contains(&MockCall::RegisterWindowClass("HOSTSURFACE".to_string())));
    assert!(calls.contains(&MockCall::CreateInput(0x0700)));
    assert_eq!(ctl.platform().last_window_params().unwrap().title, "Host Game");
    ctl.destroy_display();
}

#[rstest]
#[case::mode_switch(MockPlatform::standard().with_display_change_code(disp_change::FAILED), true)]
#[case::unreported_mode(MockPlatform::standard().with_raw_modes(vec![RawDisplayMode::new(640, 480, 16, 60)]), true)]
#[case::registration(MockPlatform::standard().with_registration_failure(), true)]
#[case::window(MockPlatform::standard().with_window_failure(), true)]
#[case::input(MockPlatform::standard().with_input_code(hresult::DIERR_INVALIDPARAM), true)]
#[case::desktop_depth(MockPlatform::standard().with_desktop_depth(16), false)]
#[case::no_formats(MockPlatform::standard().with_formats(Vec::new()), true)]
#[case::describe(MockPlatform::standard().with_describe_failure(), true)]
#[case::commit(MockPlatform::standard().with_commit_failure(), true)]
fn smoke_failed_create_leaves_nothing_alive(#[case] platform: MockPlatform, #[case] fullscreen: bool) {
    let mut ctl = SessionController::new(platform);
    let request = DisplayRequest {
        fullscreen,
        ..fullscreen_request()
    };

    assert!(ctl.create_display(&request).is_err());

    assert_eq!(ctl.state(), SessionState::Uninitialized);
    assert!(ctl.window().is_none());
    assert!(ctl.platform().live_windows().is_empty());
    assert!(ctl.platform().live_inputs().is_empty());
    assert!(ctl.platform().current_display_settings().is_none());
    assert!(ctl.platform().cursor_visible());
}
