use glam::{Mat4, Vec3};

/// A camera as seen by the frame orchestrator.
///
/// Holds projection parameters plus cached view / projection matrices.
/// Conventions follow glam's right-handed helpers: the camera looks down
/// `-Z` in view space and NDC depth is `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    // === Projection ===
    pub projection_type: ProjectionType,
    /// Vertical field of view in radians (perspective only).
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,

    // Cached matrices, read-only for the renderer
    pub(crate) position: Vec3,
    pub(crate) view_matrix: Mat4,
    pub(crate) projection_matrix: Mat4,
    pub(crate) view_projection_matrix: Mat4,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectionType {
    Perspective,
    /// Off-center orthographic volume in view space.
    Orthographic {
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
    },
}

impl Camera {
    /// Creates a perspective camera at the origin looking down `-Z`.
    ///
    /// `fov` is given in degrees.
    #[must_use]
    pub fn new_perspective(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut cam = Self {
            projection_type: ProjectionType::Perspective,
            fov: fov.to_radians(),
            aspect,
            near,
            far,

            position: Vec3::ZERO,
            view_matrix: Mat4::IDENTITY,
            projection_matrix: Mat4::IDENTITY,
            view_projection_matrix: Mat4::IDENTITY,
        };

        cam.update_projection_matrix();
        cam
    }

    /// Creates an orthographic camera from an explicit view matrix and
    /// view-space bounds. Used for shadow cascades.
    #[must_use]
    pub fn new_orthographic(
        view_matrix: Mat4,
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    ) -> Self {
        let mut cam = Self {
            projection_type: ProjectionType::Orthographic {
                left,
                right,
                bottom,
                top,
            },
            fov: 0.0,
            aspect: (right - left) / (top - bottom).max(f32::EPSILON),
            near,
            far,

            position: view_matrix.inverse().transform_point3(Vec3::ZERO),
            view_matrix,
            projection_matrix: Mat4::IDENTITY,
            view_projection_matrix: Mat4::IDENTITY,
        };

        cam.update_projection_matrix();
        cam
    }

    pub fn update_projection_matrix(&mut self) {
        self.projection_matrix = match self.projection_type {
            ProjectionType::Perspective => {
                Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
            }
            ProjectionType::Orthographic {
                left,
                right,
                bottom,
                top,
            } => Mat4::orthographic_rh(left, right, bottom, top, self.near, self.far),
        };

        self.view_projection_matrix = self.projection_matrix * self.view_matrix;
    }

    /// Places the camera at `position` looking at `target`.
    pub fn look_at(&mut self, position: Vec3, target: Vec3, up: Vec3) {
        self.position = position;
        self.view_matrix = Mat4::look_at_rh(position, target, up);
        self.view_projection_matrix = self.projection_matrix * self.view_matrix;
    }

    #[inline]
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    #[inline]
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        self.view_matrix
    }

    #[inline]
    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection_matrix
    }

    #[inline]
    #[must_use]
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.view_projection_matrix
    }

    /// View-space `(left, right, bottom, top)` of the view volume's cross
    /// section at distance `depth`.
    ///
    /// Orthographic bounds are returned as configured, so off-centre
    /// volumes keep their offset.
    #[must_use]
    pub fn view_bounds_at(&self, depth: f32) -> (f32, f32, f32, f32) {
        match self.projection_type {
            ProjectionType::Perspective => {
                let h = (self.fov * 0.5).tan() * depth;
                let w = h * self.aspect;
                (-w, w, -h, h)
            }
            ProjectionType::Orthographic {
                left,
                right,
                bottom,
                top,
            } => (left, right, bottom, top),
        }
    }
}

/// World-space axis aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    #[must_use]
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    #[must_use]
    pub fn corners(&self) -> [Vec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            Vec3::new(a.x, a.y, a.z),
            Vec3::new(b.x, a.y, a.z),
            Vec3::new(b.x, b.y, a.z),
            Vec3::new(a.x, b.y, a.z),
            Vec3::new(a.x, a.y, b.z),
            Vec3::new(b.x, a.y, b.z),
            Vec3::new(b.x, b.y, b.z),
            Vec3::new(a.x, b.y, b.z),
        ]
    }
}
