// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Narrow-phase hit testing of single nodes.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Size};
use understory_precise_hit::{HitCanvas, HitParams, PreciseHitTest, color_key};

use crate::error::StageError;
use crate::scene::{NodeKind, SceneAccess};

/// Decides whether a point lands on a node.
///
/// Analytic shapes are tested against their [`SceneAccess::hit_geometry`].
/// Pixel-exact shapes are painted alone into a scratch [`HitCanvas`], sized
/// to the surface and never shown, in a fresh color key; the pixel under the
/// point is then compared with the key.
///
/// Containers, stale nodes, non-finite points and points outside the surface
/// never hit.
#[derive(Debug, Default)]
pub struct HitTester {
    params: HitParams,
    canvas: Option<HitCanvas>,
    probes: u32,
}

impl HitTester {
    /// A tester using `params` for analytic tolerances.
    pub fn new(params: HitParams) -> Self {
        Self {
            params,
            canvas: None,
            probes: 0,
        }
    }

    /// Analytic tolerances.
    pub fn params(&self) -> HitParams {
        self.params
    }

    /// Replace the analytic tolerances.
    pub fn set_params(&mut self, params: HitParams) {
        self.params = params;
    }

    /// Allocate (or reallocate) the scratch canvas for a surface of `size`.
    ///
    /// Hit tests do this lazily; calling it up front surfaces the error for a
    /// surface with no pixels or too many of them.
    pub fn resize(&mut self, size: Size) -> Result<(), StageError> {
        if let Some(c) = &self.canvas
            && canvas_matches(c, size)
        {
            return Ok(());
        }
        let Some(canvas) = HitCanvas::for_size(size) else {
            // A failed resize must not leave a canvas for the old size behind.
            self.canvas = None;
            let (width, height) = (size.width, size.height);
            return Err(if width > 0.0 && height > 0.0 {
                StageError::SurfaceTooLarge { width, height }
            } else {
                StageError::EmptySurface { width, height }
            });
        };
        tracing::debug!(width = canvas.width(), height = canvas.height(), "hit canvas allocated");
        self.canvas = Some(canvas);
        Ok(())
    }

    /// The scratch canvas, if one has been allocated.
    pub fn canvas(&self) -> Option<&HitCanvas> {
        self.canvas.as_ref()
    }

    /// Returns `true` if `point` lands on `node`.
    pub fn hit_test<S: SceneAccess>(&mut self, scene: &S, node: S::Key, point: Point) -> bool {
        if !point.is_finite() || !inside_surface(point, scene.surface_size()) {
            return false;
        }
        let hit = match scene.kind(node) {
            None | Some(NodeKind::Container) => false,
            Some(NodeKind::Shape { pixel_exact: false }) => scene
                .hit_geometry(node)
                .is_some_and(|g| g.hits(point, &self.params)),
            Some(NodeKind::Shape { pixel_exact: true }) => self.probe_pixels(scene, node, point),
        };
        tracing::trace!(?node, x = point.x, y = point.y, hit, "hit probe");
        hit
    }

    fn probe_pixels<S: SceneAccess>(&mut self, scene: &S, node: S::Key, point: Point) -> bool {
        if self.resize(scene.surface_size()).is_err() {
            return false;
        }
        let Some(canvas) = self.canvas.as_mut() else {
            return false;
        };
        let key = color_key(self.probes);
        self.probes = self.probes.wrapping_add(1);
        canvas.clear();
        scene.paint_hit_region(node, canvas, key) && canvas.is_key_at(point, key)
    }
}

fn inside_surface(point: Point, size: Size) -> bool {
    point.x >= 0.0 && point.y >= 0.0 && point.x < size.width && point.y < size.height
}

fn canvas_matches(canvas: &HitCanvas, size: Size) -> bool {
    f64::from(canvas.width()) == size.width.ceil() && f64::from(canvas.height()) == size.height.ceil()
}
