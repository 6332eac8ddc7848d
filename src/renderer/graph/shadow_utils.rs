//! Shadow Utilities
//!
//! Pure math functions for cascaded shadow mapping, kept apart from the
//! coordinator for reuse and testability.
//!
//! # Provided Functions
//!
//! - Split fraction validation and conversion to view-space depths
//! - Frustum slice corners in world space
//! - Tight, texel-snapped orthographic light-space fit per cascade
//! - Atlas sub-viewport layout (single row)

use glam::{Mat4, Vec3};

use crate::errors::{RenderError, Result};
use crate::renderer::core::view::Viewport;
use crate::scene::camera::{Aabb, Camera};

/// Number of cascades per directional light.
pub const CASCADE_COUNT: usize = 4;

// ============================================================================
// Split Fractions
// ============================================================================

/// Checks that `fractions` lie in `(0, 1]`, strictly increase and end at 1.
pub fn validate_split_fractions(fractions: &[f32; CASCADE_COUNT]) -> Result<()> {
    let mut prev = 0.0f32;
    for (i, &f) in fractions.iter().enumerate() {
        if !f.is_finite() || f <= 0.0 || f > 1.0 {
            return Err(RenderError::InvalidConfiguration(format!(
                "cascade split {i} = {f} is outside (0, 1]"
            )));
        }
        if f <= prev {
            return Err(RenderError::InvalidConfiguration(format!(
                "cascade splits must strictly increase (split {i} = {f} <= {prev})"
            )));
        }
        prev = f;
    }
    if (fractions[CASCADE_COUNT - 1] - 1.0).abs() > f32::EPSILON {
        return Err(RenderError::InvalidConfiguration(format!(
            "last cascade split must be 1.0, got {}",
            fractions[CASCADE_COUNT - 1]
        )));
    }
    Ok(())
}

/// Converts split fractions of the `[near, far]` range to view-space depths.
#[must_use]
pub fn split_depths(near: f32, far: f32, fractions: &[f32; CASCADE_COUNT]) -> [f32; CASCADE_COUNT] {
    fractions.map(|f| near + (far - near) * f)
}

// ============================================================================
// Frustum Corners in World Space
// ============================================================================

/// Computes the 8 corners of the camera frustum slice `[slice_near,
/// slice_far]` (view-space distances) in world space.
///
/// Corners 0-3 lie on the near face, 4-7 on the far face.
#[must_use]
pub fn compute_frustum_corners_world(
    camera: &Camera,
    slice_near: f32,
    slice_far: f32,
) -> [Vec3; 8] {
    let (l_near, r_near, b_near, t_near) = camera.view_bounds_at(slice_near);
    let (l_far, r_far, b_far, t_far) = camera.view_bounds_at(slice_far);

    // Corners in view space (RH: -Z is forward)
    let corners_view = [
        Vec3::new(l_near, b_near, -slice_near),
        Vec3::new(r_near, b_near, -slice_near),
        Vec3::new(r_near, t_near, -slice_near),
        Vec3::new(l_near, t_near, -slice_near),
        Vec3::new(l_far, b_far, -slice_far),
        Vec3::new(r_far, b_far, -slice_far),
        Vec3::new(r_far, t_far, -slice_far),
        Vec3::new(l_far, t_far, -slice_far),
    ];

    let inv_view = camera.view_matrix().inverse();
    corners_view.map(|c| inv_view.transform_point3(c))
}

// ============================================================================
// Light Space
// ============================================================================

/// Rotation-only light view looking along `light_direction`.
///
/// Anchored at the world origin so that light-space coordinates of static
/// geometry do not move with the camera (required for texel snapping).
#[must_use]
pub fn light_view_matrix(light_direction: Vec3) -> Mat4 {
    let dir = if light_direction.length_squared() > 1e-6 {
        light_direction.normalize()
    } else {
        Vec3::NEG_Y
    };
    let up = if dir.y.abs() > 0.99 { Vec3::X } else { Vec3::Y };
    Mat4::look_at_rh(Vec3::ZERO, dir, up)
}

/// Light-space orthographic volume of one cascade.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CascadeFit {
    pub light_view: Mat4,
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
    /// Distance to the near plane along the light direction.
    pub near: f32,
    /// Distance to the far plane along the light direction.
    pub far: f32,
}

impl CascadeFit {
    #[must_use]
    pub fn view_projection(&self) -> Mat4 {
        Mat4::orthographic_rh(self.left, self.right, self.bottom, self.top, self.near, self.far)
            * self.light_view
    }

    #[must_use]
    pub fn camera(&self) -> Camera {
        Camera::new_orthographic(
            self.light_view,
            self.left,
            self.right,
            self.bottom,
            self.top,
            self.near,
            self.far,
        )
    }
}

fn light_space_bounds(light_view: &Mat4, points: &[Vec3]) -> (Vec3, Vec3) {
    let mut ls_min = Vec3::splat(f32::MAX);
    let mut ls_max = Vec3::splat(f32::MIN);
    for p in points {
        let ls = light_view.transform_point3(*p);
        ls_min = ls_min.min(ls);
        ls_max = ls_max.max(ls);
    }
    (ls_min, ls_max)
}

/// Fits an orthographic light-space volume around a frustum slice.
///
/// - With `scene_bounds`, the XY extent is clipped to the part of the slice
///   that overlaps the scene and Z is extended towards the light to include
///   every potential caster in the scene.
/// - Without bounds, Z is pushed towards the light by `caster_extension`.
///
/// When `texel_snap` is set, the XY bounds are snapped to the texel grid of
/// a `tile_size` shadow map to prevent shimmer.
#[must_use]
pub fn fit_cascade(
    light_direction: Vec3,
    frustum_corners: &[Vec3; 8],
    scene_bounds: Option<&Aabb>,
    tile_size: u32,
    caster_extension: f32,
    texel_snap: bool,
) -> CascadeFit {
    let light_view = light_view_matrix(light_direction);
    let (mut ls_min, mut ls_max) = light_space_bounds(&light_view, frustum_corners);

    // In RH light view, larger z is closer to the light.
    if let Some(bounds) = scene_bounds {
        let (b_min, b_max) = light_space_bounds(&light_view, &bounds.corners());

        let clipped_min = ls_min.max(b_min);
        let clipped_max = ls_max.min(b_max);
        if clipped_min.x < clipped_max.x && clipped_min.y < clipped_max.y {
            ls_min.x = clipped_min.x;
            ls_min.y = clipped_min.y;
            ls_max.x = clipped_max.x;
            ls_max.y = clipped_max.y;
        }

        ls_max.z = ls_max.z.max(b_max.z);
        if b_min.z > ls_min.z && b_min.z < ls_max.z {
            ls_min.z = b_min.z;
        }
    } else {
        let base_z_range = (ls_max.z - ls_min.z).max(1.0);
        ls_max.z += caster_extension.max(base_z_range);
    }

    if texel_snap && tile_size > 0 {
        let units_per_texel_x = (ls_max.x - ls_min.x) / tile_size as f32;
        let units_per_texel_y = (ls_max.y - ls_min.y) / tile_size as f32;

        if units_per_texel_x > 0.0 {
            ls_min.x = (ls_min.x / units_per_texel_x).floor() * units_per_texel_x;
            ls_max.x = (ls_max.x / units_per_texel_x).ceil() * units_per_texel_x;
        }
        if units_per_texel_y > 0.0 {
            ls_min.y = (ls_min.y / units_per_texel_y).floor() * units_per_texel_y;
            ls_max.y = (ls_max.y / units_per_texel_y).ceil() * units_per_texel_y;
        }
    }

    CascadeFit {
        light_view,
        left: ls_min.x,
        right: ls_max.x,
        bottom: ls_min.y,
        top: ls_max.y,
        // glam orthographic_rh: near/far are distances along -Z
        near: -ls_max.z,
        far: -ls_min.z,
    }
}

// ============================================================================
// Atlas Layout
// ============================================================================

/// Sub-viewport of cascade `index` in a single-row atlas of `tile_size`
/// square tiles.
#[must_use]
pub fn cascade_viewport(index: usize, tile_size: u32) -> Viewport {
    Viewport::new(index as u32 * tile_size, 0, tile_size, tile_size)
}

/// Atlas extent for `CASCADE_COUNT` tiles in one row.
#[must_use]
pub fn atlas_size(tile_size: u32) -> (u32, u32) {
    (tile_size * CASCADE_COUNT as u32, tile_size)
}
