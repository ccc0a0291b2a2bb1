//! Pixel format negotiation.
//!
//! The OS chooser returns the *closest* format, which may be worse than what
//! was asked for, so the chosen format is re-described and checked against
//! every requested minimum before it is committed.

use crate::display::error::PixelFormatError;
use crate::display::platform::DisplayPlatform;
use crate::display::types::{DeviceContext, FormatId, PixelFormatDescriptor, PixelFormatFlags};

/// Caller requirements for the surface pixel format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelFormatRequest {
    pub bpp: u32,
    pub alpha_bits: u32,
    pub depth_bits: u32,
    pub stencil_bits: u32,
    /// Flags the described format must contain.
    pub required_flags: PixelFormatFlags,
    /// Extra flags passed to the chooser but not enforced.
    pub hint_flags: PixelFormatFlags,
}

impl PixelFormatRequest {
    /// A request with the default surface capabilities: a double-buffered
    /// OpenGL window, preferring accelerated formats.
    #[must_use]
    pub const fn new(bpp: u32, alpha_bits: u32, depth_bits: u32, stencil_bits: u32) -> Self {
        Self {
            bpp,
            alpha_bits,
            depth_bits,
            stencil_bits,
            required_flags: PixelFormatFlags::REQUIRED,
            hint_flags: PixelFormatFlags::GENERIC_ACCELERATED,
        }
    }

    /// Descriptor handed to the OS chooser.
    #[must_use]
    pub fn descriptor(&self) -> PixelFormatDescriptor {
        PixelFormatDescriptor {
            flags: self.required_flags | self.hint_flags,
            color_bits: self.bpp,
            alpha_bits: self.alpha_bits,
            depth_bits: self.depth_bits,
            stencil_bits: self.stencil_bits,
        }
    }
}

/// A committed pixel format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcceptedFormat {
    pub id: FormatId,
    pub described: PixelFormatDescriptor,
}

/// Outcome of a negotiation.
pub type PixelFormatResult = Result<AcceptedFormat, PixelFormatError>;

/// Check a described format against the request. Checks run in a fixed
/// order and the first failure is reported.
pub fn validate(
    request: &PixelFormatRequest,
    described: &PixelFormatDescriptor,
) -> Result<(), PixelFormatError> {
    if described.color_bits < request.bpp {
        return Err(PixelFormatError::ColorDepthTooLow {
            requested: request.bpp,
            actual: described.color_bits,
        });
    }
    if described.stencil_bits < request.stencil_bits {
        return Err(PixelFormatError::StencilTooLow {
            requested: request.stencil_bits,
            actual: described.stencil_bits,
        });
    }
    if described.depth_bits < request.depth_bits {
        return Err(PixelFormatError::DepthTooLow {
            requested: request.depth_bits,
            actual: described.depth_bits,
        });
    }
    let missing = request.required_flags.difference(described.flags);
    if !missing.is_empty() {
        return Err(PixelFormatError::CapabilitiesUnsupported {
            missing: missing.bits(),
        });
    }
    Ok(())
}

/// Select, validate and commit a pixel format for `dc`.
///
/// On rejection nothing has been committed; the caller is responsible for
/// tearing down the surface.
pub fn negotiate<P: DisplayPlatform + ?Sized>(
    platform: &mut P,
    dc: DeviceContext,
    request: &PixelFormatRequest,
) -> PixelFormatResult {
    let result = negotiate_inner(platform, dc, request);
    if let Err(err) = &result {
        log::error!("pixel format rejected: {}", err);
    }
    result
}

fn negotiate_inner<P: DisplayPlatform + ?Sized>(
    platform: &mut P,
    dc: DeviceContext,
    request: &PixelFormatRequest,
) -> PixelFormatResult {
    let available = platform.device_color_depth(dc);
    if available < request.bpp {
        return Err(PixelFormatError::InsufficientColorDepth {
            requested: request.bpp,
            available,
        });
    }

    let desired = request.descriptor();
    let id = platform
        .choose_pixel_format(dc, &desired)
        .ok_or(PixelFormatError::NoMatchingFormat)?;

    let described = platform
        .describe_pixel_format(dc, id)
        .ok_or(PixelFormatError::DescribeFailed(id.0))?;

    validate(request, &described)?;

    log::debug!("pixel format is {}", id.0);
    platform.set_pixel_format(dc, id, &desired).map_err(|reason| {
        log::error!("failed to set pixel format: {}", reason);
        PixelFormatError::CommitFailed(id.0)
    })?;

    Ok(AcceptedFormat { id, described })
}
