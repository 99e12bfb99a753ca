use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{HandpointError, Result};

/// Native pixel dimensions of an image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Where (and how large) an image is drawn on screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplayRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl DisplayRect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// A rect at the origin, for callers that already have element-relative offsets.
    pub fn sized(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.left && x < self.left + self.width && y >= self.top && y < self.top + self.height
    }

    fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// A pixel coordinate in source-image space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcePoint {
    pub x: u32,
    pub y: u32,
}

impl fmt::Display for SourcePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Map a click in screen space onto the image's native pixel grid.
///
/// Each axis is scaled by `natural / displayed`, rounded, then clamped into
/// `[0, natural)` so clicks on the element's edge never leave the image.
pub fn to_source_point(
    click_x: f32,
    click_y: f32,
    rect: DisplayRect,
    natural: ImageSize,
) -> Result<SourcePoint> {
    if !rect.is_valid() {
        return Err(HandpointError::InvalidDisplayRect {
            width: rect.width,
            height: rect.height,
        });
    }
    if natural.width == 0 || natural.height == 0 {
        return Err(HandpointError::InvalidDimensions {
            width: natural.width,
            height: natural.height,
        });
    }

    let scale_x = natural.width as f32 / rect.width;
    let scale_y = natural.height as f32 / rect.height;

    Ok(SourcePoint {
        x: scale_axis(click_x - rect.left, scale_x, natural.width),
        y: scale_axis(click_y - rect.top, scale_y, natural.height),
    })
}

fn scale_axis(offset: f32, scale: f32, extent: u32) -> u32 {
    let v = (offset * scale).round();
    if !v.is_finite() || v <= 0.0 {
        0
    } else {
        (v as u32).min(extent - 1)
    }
}
