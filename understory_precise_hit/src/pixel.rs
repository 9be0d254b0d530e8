// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scratch raster used for pixel-exact hit testing.

use alloc::vec;
use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Rect, Size};
use peniko::Color;

use crate::HitGeometry;

const CLEAR: [u8; 4] = [0, 0, 0, 0];

/// Largest canvas [`HitCanvas::new`] will allocate, in pixels (an 8K surface fits).
pub const MAX_CANVAS_PIXELS: usize = 1 << 26;

/// Opaque flat color that identifies probe number `index`.
///
/// Keys cycle through the 24-bit RGB space and never produce black, so a key
/// can always be told apart from a cleared pixel.
pub fn color_key(index: u32) -> Color {
    let rgb = index % 0x00FF_FFFF + 1;
    let [_, r, g, b] = rgb.to_be_bytes();
    Color::from_rgba8(r, g, b, 0xFF)
}

fn to_bytes(color: Color) -> [u8; 4] {
    let c = color.to_rgba8();
    [c.r, c.g, c.b, c.a]
}

/// An offscreen RGBA buffer that is never presented.
///
/// Painting is non-antialiased: a pixel takes the fill color when the
/// geometry covers its center, and is left alone otherwise. That keeps every
/// painted pixel exactly equal to the key color, so read-back is a plain
/// equality test.
#[derive(Clone)]
pub struct HitCanvas {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 4]>,
}

impl core::fmt::Debug for HitCanvas {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let painted = self.pixels.iter().filter(|p| **p != CLEAR).count();
        f.debug_struct("HitCanvas")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("painted", &painted)
            .finish_non_exhaustive()
    }
}

impl HitCanvas {
    /// Allocate a cleared canvas.
    ///
    /// Returns `None` for a zero-sized surface, or one with more than
    /// [`MAX_CANVAS_PIXELS`] pixels.
    pub fn new(width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        let len = (width as usize)
            .checked_mul(height as usize)
            .filter(|len| *len <= MAX_CANVAS_PIXELS)?;
        Some(Self {
            width,
            height,
            pixels: vec![CLEAR; len],
        })
    }

    /// Allocate a canvas covering `size`, rounding fractional sizes up.
    pub fn for_size(size: Size) -> Option<Self> {
        if !(size.width.is_finite() && size.height.is_finite()) {
            return None;
        }
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Surface sizes are clamped to the u32 range first."
        )]
        let (w, h) = (
            size.width.ceil().clamp(0.0, f64::from(u32::MAX)) as u32,
            size.height.ceil().clamp(0.0, f64::from(u32::MAX)) as u32,
        );
        Self::new(w, h)
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Canvas area in surface coordinates.
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }

    /// Reset every pixel to transparent.
    pub fn clear(&mut self) {
        self.pixels.fill(CLEAR);
    }

    /// Returns `true` when nothing has been painted since the last clear.
    pub fn is_blank(&self) -> bool {
        self.pixels.iter().all(|p| *p == CLEAR)
    }

    /// Paint `geometry` in a flat `color`. Returns the number of pixels set.
    pub fn fill(&mut self, geometry: &HitGeometry, color: Color) -> usize {
        if geometry.is_degenerate() {
            return 0;
        }
        self.fill_where(geometry.bounding_box(), color, |pt| geometry.covers(pt))
    }

    /// Paint every pixel of `region` whose center satisfies `inside`.
    ///
    /// Renderers that know a silhouette only procedurally (glyph coverage,
    /// image alpha) use this to paint into the canvas without going through
    /// [`HitGeometry`].
    pub fn fill_where(
        &mut self,
        region: Rect,
        color: Color,
        mut inside: impl FnMut(Point) -> bool,
    ) -> usize {
        let Some((x0, y0, x1, y1)) = self.pixel_span(region) else {
            return 0;
        };
        let bytes = to_bytes(color);
        let stride = self.width as usize;
        let mut painted = 0;
        for y in y0..y1 {
            let cy = f64::from(y) + 0.5;
            for x in x0..x1 {
                if inside(Point::new(f64::from(x) + 0.5, cy)) {
                    self.pixels[y as usize * stride + x as usize] = bytes;
                    painted += 1;
                }
            }
        }
        painted
    }

    /// Color of the pixel at integer coordinates, if inside the canvas.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        let [r, g, b, a] = *self.pixel_bytes(x, y)?;
        Some(Color::from_rgba8(r, g, b, a))
    }

    /// Returns `true` when the pixel containing `pt` holds exactly `key`.
    ///
    /// Points outside the canvas (or non-finite) are never a match.
    pub fn is_key_at(&self, pt: Point, key: Color) -> bool {
        let Some((x, y)) = self.pixel_of(pt) else {
            return false;
        };
        self.pixel_bytes(x, y)
            .is_some_and(|p| *p != CLEAR && *p == to_bytes(key))
    }

    fn pixel_bytes(&self, x: u32, y: u32) -> Option<&[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
    }

    fn pixel_of(&self, pt: Point) -> Option<(u32, u32)> {
        if !pt.is_finite() || pt.x < 0.0 || pt.y < 0.0 {
            return None;
        }
        let (x, y) = (pt.x.floor(), pt.y.floor());
        if x >= f64::from(self.width) || y >= f64::from(self.height) {
            return None;
        }
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Both coordinates were checked against the canvas size."
        )]
        Some((x as u32, y as u32))
    }

    /// Integer pixel range `[x0, x1) × [y0, y1)` touched by `region`.
    fn pixel_span(&self, region: Rect) -> Option<(u32, u32, u32, u32)> {
        let clipped = region.abs().intersect(self.bounds());
        if !(clipped.width() > 0.0 && clipped.height() > 0.0) {
            return None;
        }
        #[allow(
            clippy::cast_possible_truncation,
            reason = "The region was clipped to the canvas bounds."
        )]
        Some((
            clipped.x0.floor() as u32,
            clipped.y0.floor() as u32,
            clipped.x1.ceil() as u32,
            clipped.y1.ceil() as u32,
        ))
    }
}
