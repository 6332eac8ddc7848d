//! Pass Sequencer
//!
//! The main-view generator of a deferred frame. [`PassSequencer`] owns the
//! frame buffers and the shadow atlas, resolves its passes and shaders once
//! at construction, and records the fixed stage order of
//! [`FrameStage`] for every [`generate`](PassSequencer::generate) call.
//!
//! # Frame Schedule
//!
//! ```text
//! secondary_views(camera)     → 4 shadow views (rendered by the caller)
//! generate(frame, visibility) → clear → queues → G-buffer → velocity → SSAO
//!                               → [volumetric] → tiled lighting → [SSR]
//!                               → composite → sky → DoF → [motion blur]
//!                               → tone map → frame target
//! ```
//!
//! Stages in brackets run only when enabled in [`FrameArgs`]; a disabled
//! stage records nothing and opens no profiler scope, and its output reaches
//! the consumers as `None`.
//!
//! # Binding Discipline
//!
//! The velocity, tiled-lighting, composite and sky stages reset every binding
//! before binding fresh targets and re-binding the per-view parameters. The
//! alpha-masked stage reuses the G-buffer stage's bindings unchanged.
//!
//! # Ordering
//!
//! Shadow views returned by [`secondary_views`](PassSequencer::secondary_views)
//! must all be rendered before `generate` for the same frame. This is a
//! documented precondition, not a checked one.

use glam::Vec3;

use crate::errors::{RenderError, Result};
use crate::renderer::core::{CommandContext, RenderDevice, RenderView, ResourceArena, TextureView};
use crate::renderer::graph::cascaded_shadow::CascadedShadowMapCoordinator;
use crate::renderer::graph::frame::FrameArgs;
use crate::renderer::graph::frame_resources::FrameResourcePool;
use crate::renderer::graph::generator::{
    AmbientOcclusionArgs, DepthOfFieldArgs, GeneratorArgs, GeneratorId, GeneratorRegistry,
    MotionBlurArgs, ReflectionArgs, TiledLightingArgs, ToneMapArgs, VolumetricLightArgs,
};
use crate::renderer::graph::passes::{CameraVelocityPass, CompositeInputs, CompositePass};
use crate::renderer::graph::profiler::Profiler;
use crate::renderer::graph::queue::{PassCategory, QueueBuilder, RenderQueues, VisibilityData};
use crate::renderer::graph::stage::FrameStage;
use crate::renderer::pipeline::{PassIndex, ShaderLibrary, require_pass};
use crate::renderer::settings::SequencerSettings;
use crate::scene::camera::Camera;

/// Generators every frame dispatches to.
pub const REQUIRED_GENERATORS: [GeneratorId; 5] = [
    GeneratorId::ShadowMap,
    GeneratorId::AmbientOcclusion,
    GeneratorId::TiledLighting,
    GeneratorId::DepthOfField,
    GeneratorId::ToneMapper,
];

const COLOR_CLEAR: wgpu::Color = wgpu::Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 0.0,
};

const NORMAL_CLEAR: wgpu::Color = wgpu::Color {
    r: 0.5,
    g: 0.5,
    b: 0.5,
    a: 0.0,
};

/// Angular tolerance (as `1 - cos`) for the frame/sun direction mismatch warning.
const LIGHT_DIRECTION_TOLERANCE: f32 = 1e-4;

pub struct PassSequencer {
    settings: SequencerSettings,

    pool: FrameResourcePool,
    shadows: CascadedShadowMapCoordinator,

    generators: GeneratorRegistry,
    queue_builder: Box<dyn QueueBuilder>,
    queues: RenderQueues,

    pass_indices: [PassIndex; 4],
    velocity_pass: CameraVelocityPass,
    composite_pass: CompositePass,

    profiler: Profiler,
    sun_direction: Vec3,
    warned_unshadowed: bool,
    shut_down: bool,
}

impl PassSequencer {
    /// Validates `settings`, resolves every pass and shader, checks the
    /// always-used generators and allocates the frame buffers followed by the
    /// shadow atlas.
    ///
    /// Nothing stays allocated when construction fails.
    pub fn new(
        device: &mut dyn RenderDevice,
        resources: &mut ResourceArena,
        shaders: &dyn ShaderLibrary,
        generators: GeneratorRegistry,
        queue_builder: Box<dyn QueueBuilder>,
        settings: SequencerSettings,
    ) -> Result<Self> {
        settings.validate()?;

        let mut pass_indices = [PassIndex(0); 4];
        for category in PassCategory::ALL {
            pass_indices[category.index()] = require_pass(shaders, category.pass_name())?;
        }
        let velocity_pass = CameraVelocityPass::new(shaders)?;
        let composite_pass = CompositePass::new(shaders)?;

        generators.require(&REQUIRED_GENERATORS)?;

        let mut pool = FrameResourcePool::new(device, resources, settings.width, settings.height)?;
        let shadows = match CascadedShadowMapCoordinator::new(device, resources, &settings.shadow) {
            Ok(shadows) => shadows,
            Err(err) => {
                pool.shutdown(device, resources);
                return Err(err);
            }
        };

        log::debug!(
            "PassSequencer created: {}x{}, {} allocations",
            settings.width,
            settings.height,
            pool.allocation_count() + 1
        );

        Ok(Self {
            settings,
            pool,
            shadows,
            generators,
            queue_builder,
            queues: RenderQueues::empty(),
            pass_indices,
            velocity_pass,
            composite_pass,
            profiler: Profiler::new(),
            sun_direction: Vec3::NEG_Y,
            warned_unshadowed: false,
            shut_down: false,
        })
    }

    // ── Accessors ──────────────────────────────────────────────────────────

    #[must_use]
    pub fn settings(&self) -> &SequencerSettings {
        &self.settings
    }

    #[must_use]
    pub fn pool(&self) -> &FrameResourcePool {
        &self.pool
    }

    #[must_use]
    pub fn coordinator(&self) -> &CascadedShadowMapCoordinator {
        &self.shadows
    }

    /// Mutable access for configuring shadow caster bounds.
    pub fn coordinator_mut(&mut self) -> &mut CascadedShadowMapCoordinator {
        &mut self.shadows
    }

    #[must_use]
    pub fn profiler(&self) -> &Profiler {
        &self.profiler
    }

    /// Queues built by the last frame.
    #[must_use]
    pub fn queues(&self) -> &RenderQueues {
        &self.queues
    }

    #[must_use]
    pub fn pass_index(&self, category: PassCategory) -> PassIndex {
        self.pass_indices[category.index()]
    }

    #[must_use]
    pub fn sun_light_dir(&self) -> Vec3 {
        self.sun_direction
    }

    /// Sets the persistent sun direction (the direction light travels).
    ///
    /// A zero or non-finite direction is ignored.
    pub fn set_sun_light_dir(&mut self, direction: Vec3) {
        match direction.try_normalize() {
            Some(dir) => self.sun_direction = dir,
            None => log::warn!("Ignoring degenerate sun direction {direction}"),
        }
    }

    // ── Views ──────────────────────────────────────────────────────────────

    /// Builds the main view for `frame`.
    #[must_use]
    pub fn main_view(frame: FrameArgs) -> RenderView {
        RenderView::new("Main", frame.camera, GeneratorArgs::MainView(Box::new(frame)))
    }

    /// Refits the shadow cascades to `camera` and the sun direction, clears
    /// the atlas and returns one shadow view per cascade.
    pub fn secondary_views(
        &mut self,
        ctx: &mut CommandContext<'_>,
        camera: &Camera,
    ) -> Result<Vec<RenderView>> {
        self.shadows.secondary_views(ctx, camera, self.sun_direction)
    }

    /// Dispatches `view` by generator id.
    ///
    /// The main view is generated by this sequencer and returns `None`;
    /// every other view goes to its registered generator.
    pub fn render_view(
        &mut self,
        ctx: &mut CommandContext<'_>,
        view: &RenderView,
        visibility: Option<&VisibilityData>,
    ) -> Result<Option<TextureView>> {
        match &view.args {
            GeneratorArgs::MainView(frame) => {
                let visibility = visibility.ok_or_else(|| {
                    RenderError::InvalidConfiguration(format!(
                        "main view '{}' rendered without visibility data",
                        view.name
                    ))
                })?;
                self.generate(ctx, frame, visibility)?;
                Ok(None)
            }
            args => {
                ctx.push_debug_group(&view.name);
                let output = self.generators.generate(ctx, args, visibility);
                ctx.pop_debug_group();
                output
            }
        }
    }

    /// Runs the whole frame: shadow views first, then the main view.
    pub fn render_frame(
        &mut self,
        ctx: &mut CommandContext<'_>,
        frame: &FrameArgs,
        visibility: &VisibilityData,
    ) -> Result<()> {
        let shadow_views = self.secondary_views(ctx, &frame.camera)?;
        for view in &shadow_views {
            self.render_view(ctx, view, Some(visibility))?;
        }
        self.generate(ctx, frame, visibility)
    }

    // ── Frame generation ───────────────────────────────────────────────────

    /// Records one frame into `frame.target`.
    ///
    /// Any error leaves the frame incomplete and should be treated as fatal.
    pub fn generate(
        &mut self,
        ctx: &mut CommandContext<'_>,
        frame: &FrameArgs,
        visibility: &VisibilityData,
    ) -> Result<()> {
        if self.shut_down {
            return Err(RenderError::InvalidConfiguration(
                "frame generated after shutdown".into(),
            ));
        }
        let size = self.pool.size();
        frame.validate(size)?;
        self.check_light_state(frame);

        self.profiler.begin_frame();

        let viewport = frame.viewport;
        let camera = frame.camera;

        self.run_stage(ctx, FrameStage::Clear, &camera, |this, ctx| {
            ctx.clear_depth(this.pool.depth.dsv, 1.0)?;
            ctx.clear_color(this.pool.color.rtv, COLOR_CLEAR)?;
            ctx.clear_color(this.pool.normal.rtv, NORMAL_CLEAR)
        })?;

        self.run_stage(ctx, FrameStage::BuildQueues, &camera, |this, _| {
            this.queues = this.queue_builder.build_render_queues(visibility);
            Ok(())
        })?;

        self.run_stage(ctx, FrameStage::GBuffer, &camera, |this, ctx| {
            ctx.bind_view_parameters(&camera);
            ctx.set_viewport(&viewport, size);
            ctx.set_render_targets(
                &[this.pool.color.rtv, this.pool.normal.rtv],
                Some(this.pool.depth.dsv),
            )?;
            ctx.draw_queue(
                this.pass_index(PassCategory::Opaque),
                this.queues.get(PassCategory::Opaque),
            )
        })?;

        self.run_stage(ctx, FrameStage::GBufferAlphaMasked, &camera, |this, ctx| {
            ctx.draw_queue(
                this.pass_index(PassCategory::AlphaMasked),
                this.queues.get(PassCategory::AlphaMasked),
            )
        })?;

        self.run_stage(ctx, FrameStage::CameraVelocity, &camera, |this, ctx| {
            this.velocity_pass.record(
                ctx,
                &camera,
                frame.prev_view_projection,
                this.pool.depth.srv,
                this.pool.velocity.rtv,
                &viewport,
                size,
            )
        })?;

        self.run_stage(ctx, FrameStage::AmbientOcclusion, &camera, |this, ctx| {
            let args = GeneratorArgs::AmbientOcclusion(AmbientOcclusionArgs {
                normal: this.pool.normal.srv,
                depth: this.pool.depth.srv,
                viewport,
                target: this.pool.ambient_occlusion.rtv,
                target_size: size,
            });
            this.generators.generate(ctx, &args, None).map(drop)
        })?;

        let scattering = if frame.volumetric_lights {
            self.run_stage(ctx, FrameStage::VolumetricLights, &camera, |this, ctx| {
                let args = GeneratorArgs::VolumetricLight(VolumetricLightArgs {
                    camera,
                    viewport,
                    depth: this.pool.depth.srv,
                    shadows: this.shadows.shadow_params(),
                    light_direction: this.sun_direction,
                    light_color: frame.light_color,
                });
                this.generators.generate(ctx, &args, None)
            })?
        } else {
            None
        };

        self.run_stage(ctx, FrameStage::TiledLighting, &camera, |this, ctx| {
            let args = GeneratorArgs::TiledLighting(TiledLightingArgs {
                camera,
                viewport,
                target: this.pool.lighting.uav,
                target_size: size,
                color: this.pool.color.srv,
                normal: this.pool.normal.srv,
                depth: this.pool.depth.srv,
                ambient_occlusion: this.pool.ambient_occlusion.srv,
                scattering,
                shadows: this.shadows.shadow_params(),
            });
            this.generators.generate(ctx, &args, None).map(drop)
        })?;

        let reflections = if frame.reflections.enabled {
            self.run_stage(ctx, FrameStage::Reflections, &camera, |this, ctx| {
                let args = GeneratorArgs::Reflections(ReflectionArgs {
                    camera,
                    viewport,
                    color: this.pool.lighting.srv,
                    normal: this.pool.normal.srv,
                    depth: this.pool.depth.srv,
                    thickness: frame.reflections.thickness,
                });
                this.generators.generate(ctx, &args, None)
            })?
        } else {
            None
        };

        self.run_stage(ctx, FrameStage::Composite, &camera, |this, ctx| {
            let inputs = CompositeInputs {
                lighting: this.pool.lighting.srv,
                reflections,
                normal: this.pool.normal.srv,
                depth: this.pool.depth.srv,
                color: this.pool.color.srv,
                atmospheric_lut: frame.atmospheric_lut,
            };
            this.composite_pass
                .record(ctx, &inputs, this.pool.composite.rtv, &viewport, size)
        })?;

        self.run_stage(ctx, FrameStage::Sky, &camera, |this, ctx| {
            ctx.set_viewport(&viewport, size);
            ctx.set_render_targets(&[this.pool.composite.rtv], Some(this.pool.depth.dsv))?;
            ctx.draw_queue(
                this.pass_index(PassCategory::Sky),
                this.queues.get(PassCategory::Sky),
            )
        })?;

        self.run_stage(ctx, FrameStage::DepthOfField, &camera, |this, ctx| {
            let args = GeneratorArgs::DepthOfField(DepthOfFieldArgs {
                camera,
                viewport,
                color: this.pool.composite.srv,
                depth: this.pool.depth.srv,
                target: this.pool.depth_of_field.rtv,
                target_size: size,
                settings: frame.depth_of_field,
            });
            this.generators.generate(ctx, &args, None).map(drop)
        })?;

        let mut tone_map_source = self.pool.depth_of_field.srv;
        if frame.motion_blur.enabled {
            tone_map_source = self.run_stage(ctx, FrameStage::MotionBlur, &camera, |this, ctx| {
                let args = GeneratorArgs::MotionBlur(MotionBlurArgs {
                    velocity: this.pool.velocity.srv,
                    color: this.pool.depth_of_field.srv,
                    depth: this.pool.depth.srv,
                    viewport,
                    sample_count: frame.motion_blur.sample_count,
                });
                this.generators
                    .generate(ctx, &args, None)?
                    .ok_or_else(|| RenderError::GeneratorFailure {
                        id: GeneratorId::MotionBlur,
                        message: "no output produced".into(),
                    })
            })?;
        }

        self.run_stage(ctx, FrameStage::ToneMap, &camera, |this, ctx| {
            let args = GeneratorArgs::ToneMapper(ToneMapArgs {
                source: tone_map_source,
                target: frame.target,
                viewport,
            });
            this.generators.generate(ctx, &args, None).map(drop)
        })
    }

    /// Runs `f` inside the profiler scope and debug group of `stage`.
    ///
    /// Stages that reset bindings start from an empty binding state with
    /// `camera`'s view parameters bound. The scope is closed even when `f`
    /// fails.
    fn run_stage<'c, T>(
        &mut self,
        ctx: &mut CommandContext<'c>,
        stage: FrameStage,
        camera: &Camera,
        f: impl FnOnce(&mut Self, &mut CommandContext<'c>) -> Result<T>,
    ) -> Result<T> {
        let scope = self.profiler.begin_scope(stage.name());
        ctx.push_debug_group(stage.name());
        if stage.resets_bindings() {
            Self::reset_and_bind_view(ctx, camera);
        }
        let result = f(self, ctx);
        ctx.pop_debug_group();
        self.profiler.end_scope(scope);
        result
    }

    fn reset_and_bind_view(ctx: &mut CommandContext<'_>, camera: &Camera) {
        ctx.reset_bindings();
        ctx.bind_view_parameters(camera);
    }

    fn check_light_state(&mut self, frame: &FrameArgs) {
        if !self.shadows.is_updated() && !self.warned_unshadowed {
            log::warn!("Frame generated before any shadow cascade update; shadow atlas is empty");
            self.warned_unshadowed = true;
        }

        if let Some(dir) = frame.light_direction.try_normalize()
            && 1.0 - dir.dot(self.sun_direction) > LIGHT_DIRECTION_TOLERANCE
        {
            log::warn!(
                "Frame light direction {dir} differs from sun direction {}; shadows and volumetrics use the sun direction",
                self.sun_direction
            );
        }
    }

    // ── Shutdown ───────────────────────────────────────────────────────────

    /// Releases the shadow atlas, then the frame buffers.
    ///
    /// Calling it again is a no-op.
    pub fn shutdown(&mut self, device: &mut dyn RenderDevice, resources: &mut ResourceArena) {
        if self.shut_down {
            return;
        }
        self.shadows.shutdown(device, resources);
        self.pool.shutdown(device, resources);
        self.shut_down = true;
        log::debug!("PassSequencer shut down");
    }

    #[must_use]
    #[inline]
    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }
}

impl Drop for PassSequencer {
    fn drop(&mut self) {
        if !self.shut_down {
            log::warn!("PassSequencer dropped without shutdown");
        }
    }
}
