//! Cascaded Shadow Map Coordinator
//!
//! Splits the camera frustum into [`CASCADE_COUNT`] depth slices, fits an
//! orthographic light-space volume around each slice and assigns each a
//! square tile of a single depth atlas.
//!
//! ```text
//! ┌────────────┬────────────┬────────────┬────────────┐
//! │ cascade 0  │ cascade 1  │ cascade 2  │ cascade 3  │  tile_size high
//! └────────────┴────────────┴────────────┴────────────┘
//!   x = 0        x = tile     x = 2·tile   x = 3·tile
//! ```
//!
//! The coordinator owns the atlas. Shadow views produced by
//! [`secondary_views`](CascadedShadowMapCoordinator::secondary_views) must
//! all be rendered before the frame that samples the atlas is generated.

use glam::{Mat4, Vec3};

use crate::errors::Result;
use crate::renderer::core::{
    CommandContext, RenderDevice, RenderView, ResourceArena, TextureDesc, TextureId, TextureView,
    ViewRole, Viewport,
};
use crate::renderer::graph::generator::{GeneratorArgs, ShadowMapArgs};
use crate::renderer::graph::shadow_utils::{self, CASCADE_COUNT, CascadeFit};
use crate::renderer::settings::ShadowSettings;
use crate::scene::camera::{Aabb, Camera};

const ATLAS_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Shadow data consumed by the lighting and volumetric stages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowParams {
    /// Shader-resource view of the whole atlas.
    pub atlas: TextureView,
    pub view_projections: [Mat4; CASCADE_COUNT],
    /// Far end of each cascade as a fraction of the near–far range.
    pub split_ends: [f32; CASCADE_COUNT],
    /// Far end of each cascade as a view-space depth.
    pub split_depths: [f32; CASCADE_COUNT],
}

/// One fitted cascade.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cascade {
    /// Orthographic light camera covering the slice.
    pub camera: Camera,
    pub view_projection: Mat4,
    /// Tile of this cascade within the atlas.
    pub viewport: Viewport,
    pub split_near: f32,
    pub split_end: f32,
    /// View-space depth where the slice begins.
    pub near_depth: f32,
    /// View-space depth where the slice ends.
    pub far_depth: f32,
}

pub struct CascadedShadowMapCoordinator {
    settings: ShadowSettings,
    atlas: Option<TextureId>,
    atlas_dsv: TextureView,
    atlas_srv: TextureView,
    scene_bounds: Option<Aabb>,
    cascades: Vec<Cascade>,
}

impl CascadedShadowMapCoordinator {
    /// Validates `settings` and allocates the depth atlas.
    pub fn new(
        device: &mut dyn RenderDevice,
        resources: &mut ResourceArena,
        settings: &ShadowSettings,
    ) -> Result<Self> {
        settings.validate()?;

        let (width, height) = settings.atlas_size();
        let atlas = resources.create_texture(
            device,
            TextureDesc {
                label: "Shadow Atlas",
                width,
                height,
                format: ATLAS_FORMAT,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                    | wgpu::TextureUsages::TEXTURE_BINDING,
            },
        )?;

        let views = resources
            .view(atlas, ViewRole::DepthStencil)
            .and_then(|dsv| Ok((dsv, resources.view(atlas, ViewRole::ShaderResource)?)));
        let (atlas_dsv, atlas_srv) = match views {
            Ok(views) => views,
            Err(err) => {
                resources.release_texture(device, atlas);
                return Err(err);
            }
        };

        log::debug!(
            "Shadow atlas created: {width}x{height}, {CASCADE_COUNT} cascades of {}",
            settings.tile_size
        );

        Ok(Self {
            settings: settings.clone(),
            atlas: Some(atlas),
            atlas_dsv,
            atlas_srv,
            scene_bounds: None,
            cascades: Vec::with_capacity(CASCADE_COUNT),
        })
    }

    /// World-space bounds of every potential shadow caster.
    ///
    /// `None` falls back to extending each cascade towards the light by the
    /// configured caster extension.
    pub fn set_scene_bounds(&mut self, bounds: Option<Aabb>) {
        self.scene_bounds = bounds;
    }

    #[must_use]
    pub fn scene_bounds(&self) -> Option<&Aabb> {
        self.scene_bounds.as_ref()
    }

    #[must_use]
    pub fn settings(&self) -> &ShadowSettings {
        &self.settings
    }

    /// Refits every cascade to `camera` for a light travelling along
    /// `light_direction`.
    pub fn update(&mut self, camera: &Camera, light_direction: Vec3) {
        let fractions = &self.settings.split_fractions;
        let depths = shadow_utils::split_depths(camera.near, camera.far, fractions);

        self.cascades.clear();
        let mut split_near = 0.0;
        let mut near_depth = camera.near;

        for i in 0..CASCADE_COUNT {
            let corners =
                shadow_utils::compute_frustum_corners_world(camera, near_depth, depths[i]);
            let fit: CascadeFit = shadow_utils::fit_cascade(
                light_direction,
                &corners,
                self.scene_bounds.as_ref(),
                self.settings.tile_size,
                self.settings.caster_extension,
                self.settings.stabilize,
            );

            self.cascades.push(Cascade {
                camera: fit.camera(),
                view_projection: fit.view_projection(),
                viewport: shadow_utils::cascade_viewport(i, self.settings.tile_size),
                split_near,
                split_end: fractions[i],
                near_depth,
                far_depth: depths[i],
            });

            split_near = fractions[i];
            near_depth = depths[i];
        }

        log::trace!(
            "CSM updated: far depths {:?}",
            self.cascades.iter().map(|c| c.far_depth).collect::<Vec<_>>()
        );
    }

    /// Fitted cascades; empty until the first [`update`](Self::update).
    #[must_use]
    pub fn cascades(&self) -> &[Cascade] {
        &self.cascades
    }

    #[must_use]
    #[inline]
    pub fn is_updated(&self) -> bool {
        !self.cascades.is_empty()
    }

    #[must_use]
    #[inline]
    pub fn atlas_dsv(&self) -> TextureView {
        self.atlas_dsv
    }

    #[must_use]
    #[inline]
    pub fn atlas_srv(&self) -> TextureView {
        self.atlas_srv
    }

    #[must_use]
    #[inline]
    pub fn atlas_size(&self) -> (u32, u32) {
        self.settings.atlas_size()
    }

    /// Atlas view, matrices and split ends of the last update.
    ///
    /// Matrices are identity before the first update.
    #[must_use]
    pub fn shadow_params(&self) -> ShadowParams {
        let cascade = |i: usize| self.cascades.get(i);
        ShadowParams {
            atlas: self.atlas_srv,
            view_projections: std::array::from_fn(|i| {
                cascade(i).map_or(Mat4::IDENTITY, |c| c.view_projection)
            }),
            split_ends: self.settings.split_fractions,
            split_depths: std::array::from_fn(|i| cascade(i).map_or(0.0, |c| c.far_depth)),
        }
    }

    /// Refits the cascades, clears the atlas to the far depth and returns
    /// one shadow view per cascade.
    ///
    /// Every returned view must be rendered before the next frame is
    /// generated.
    pub fn secondary_views(
        &mut self,
        ctx: &mut CommandContext<'_>,
        camera: &Camera,
        light_direction: Vec3,
    ) -> Result<Vec<RenderView>> {
        self.update(camera, light_direction);
        ctx.clear_depth(self.atlas_dsv, 1.0)?;

        let atlas_size = self.atlas_size();
        Ok(self
            .cascades
            .iter()
            .enumerate()
            .map(|(i, cascade)| {
                RenderView::new(
                    format!("CSM_Cascade_{i}"),
                    cascade.camera,
                    GeneratorArgs::ShadowMap(ShadowMapArgs {
                        cascade_index: i,
                        dsv: self.atlas_dsv,
                        atlas_size,
                        viewport: cascade.viewport,
                    }),
                )
            })
            .collect())
    }

    /// Releases the atlas. Calling it again is a no-op.
    pub fn shutdown(&mut self, device: &mut dyn RenderDevice, resources: &mut ResourceArena) {
        if let Some(atlas) = self.atlas.take() {
            resources.release_texture(device, atlas);
            self.cascades.clear();
            log::debug!("Shadow atlas released");
        }
    }

    #[must_use]
    #[inline]
    pub fn is_released(&self) -> bool {
        self.atlas.is_none()
    }
}

impl Drop for CascadedShadowMapCoordinator {
    fn drop(&mut self) {
        if self.atlas.is_some() {
            log::warn!(
                "CascadedShadowMapCoordinator dropped without shutdown; shadow atlas leaked"
            );
        }
    }
}
