//! Display mode enumeration.
//!
//! Lists hardware display modes and manufactures the alpha/depth/stencil
//! combinations a caller may request on top of each one. The buffer sizes
//! are not checked against the hardware here; negotiation does that when a
//! display is actually created.

use crate::display::platform::DisplayPlatform;
use crate::display::types::{
    DisplayModeDescriptor, RawDisplayMode, ALPHA_BITS_CHOICES, COMBINATIONS_PER_MODE,
    DEPTH_BITS_CHOICES, STENCIL_BITS_CHOICES,
};

/// Query the platform and expand every true-colour mode.
///
/// Each call is a fresh query. Duplicate raw modes reported by the OS are
/// passed through as-is.
pub fn list_modes<P: DisplayPlatform + ?Sized>(platform: &P) -> Vec<DisplayModeDescriptor> {
    let raw_modes = platform.enumerate_raw_modes();
    let modes = expand_modes(&raw_modes);
    log::debug!(
        "enumerated {} raw display modes, {} descriptors",
        raw_modes.len(),
        modes.len()
    );
    modes
}

/// Expand raw modes, dropping indexed-colour ones.
#[must_use]
pub fn expand_modes(raw_modes: &[RawDisplayMode]) -> Vec<DisplayModeDescriptor> {
    let qualifying = raw_modes.iter().filter(|m| m.is_true_color());
    let mut out = Vec::with_capacity(raw_modes.len() * COMBINATIONS_PER_MODE);
    for raw in qualifying {
        out.extend(expand_mode(raw));
    }
    out
}

/// All buffer combinations for one raw mode, depth-major.
pub fn expand_mode(raw: &RawDisplayMode) -> impl Iterator<Item = DisplayModeDescriptor> + '_ {
    DEPTH_BITS_CHOICES.into_iter().flat_map(move |depth| {
        STENCIL_BITS_CHOICES.into_iter().flat_map(move |stencil| {
            ALPHA_BITS_CHOICES
                .into_iter()
                .map(move |alpha| DisplayModeDescriptor::from_raw(raw, alpha, depth, stencil))
        })
    })
}
