//! Shared test doubles: a device and generators that append to one ordered
//! event log, plus a harness wiring them to a sequencer.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use glam::{Mat4, Vec3};

use prism::errors::DeviceError;
use prism::renderer::core::{
    CommandContext, RawTextureId, RawView, RenderDevice, ResourceArena, TextureDesc, TextureId,
    TextureView, ViewParameters, ViewRole, Viewport,
};
use prism::renderer::graph::{
    DepthOfFieldSettings, FrameArgs, GeneratorArgs, GeneratorId, GeneratorRegistry,
    MotionBlurSettings, PassCategory, PassMask, PassSequencer, ReflectionSettings,
    SortedQueueBuilder, SubGenerator, VisibilityData, VisibleItem,
};
use prism::renderer::graph::queue::RenderQueue;
use prism::renderer::pipeline::{PassIndex, ShaderHandle, StaticShaderLibrary};
use prism::renderer::settings::SequencerSettings;
use prism::scene::camera::Camera;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// ─── Event log ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    CreateTexture {
        label: &'static str,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
        raw: RawTextureId,
    },
    ReleaseTexture(RawTextureId),
    ClearDepth {
        target: RawView,
        depth: f32,
    },
    ClearColor {
        target: RawView,
        color: wgpu::Color,
    },
    Unbind,
    BindViewParameters(ViewParameters),
    SetViewport(Viewport, (u32, u32)),
    SetRenderTargets {
        colors: Vec<RawView>,
        depth: Option<RawView>,
    },
    DrawQueue {
        pass: PassIndex,
        category: PassCategory,
        items: Vec<u64>,
    },
    DrawFullscreen {
        shader: ShaderHandle,
        resources: Vec<Option<RawView>>,
        constants: Vec<u8>,
    },
    PushGroup(String),
    PopGroup,
    Generate(GeneratorArgs),
}

pub type Log = Rc<RefCell<Vec<Event>>>;

pub fn new_log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

// ─── Device ───────────────────────────────────────────────────────────────────

pub struct RecordingDevice {
    log: Log,
    next_raw: u64,
    /// Fails the n-th (0-based) texture creation.
    pub fail_at: Option<usize>,
    created: usize,
}

impl RecordingDevice {
    pub fn new(log: Log) -> Self {
        Self {
            log,
            next_raw: 0,
            fail_at: None,
            created: 0,
        }
    }

    fn push(&self, event: Event) {
        self.log.borrow_mut().push(event);
    }
}

impl RenderDevice for RecordingDevice {
    fn create_texture(&mut self, desc: &TextureDesc) -> Result<RawTextureId, DeviceError> {
        let index = self.created;
        self.created += 1;
        if self.fail_at == Some(index) {
            return Err(DeviceError::new("out of video memory"));
        }
        self.next_raw += 1;
        let raw = RawTextureId(self.next_raw);
        self.push(Event::CreateTexture {
            label: desc.label,
            width: desc.width,
            height: desc.height,
            format: desc.format,
            raw,
        });
        Ok(raw)
    }

    fn release_texture(&mut self, texture: RawTextureId) {
        self.push(Event::ReleaseTexture(texture));
    }

    fn clear_depth_stencil(&mut self, target: RawView, depth: f32) {
        self.push(Event::ClearDepth { target, depth });
    }

    fn clear_render_target(&mut self, target: RawView, color: wgpu::Color) {
        self.push(Event::ClearColor { target, color });
    }

    fn unbind_resources(&mut self) {
        self.push(Event::Unbind);
    }

    fn bind_view_parameters(&mut self, params: &ViewParameters) {
        self.push(Event::BindViewParameters(*params));
    }

    fn set_viewport(&mut self, viewport: &Viewport, target_size: (u32, u32)) {
        self.push(Event::SetViewport(*viewport, target_size));
    }

    fn set_render_targets(&mut self, colors: &[RawView], depth: Option<RawView>) {
        self.push(Event::SetRenderTargets {
            colors: colors.to_vec(),
            depth,
        });
    }

    fn draw_queue(&mut self, pass: PassIndex, queue: &RenderQueue) {
        self.push(Event::DrawQueue {
            pass,
            category: queue.category,
            items: queue.items.iter().map(|item| item.id).collect(),
        });
    }

    fn draw_fullscreen(
        &mut self,
        shader: ShaderHandle,
        resources: &[Option<RawView>],
        constants: &[u8],
    ) {
        self.push(Event::DrawFullscreen {
            shader,
            resources: resources.to_vec(),
            constants: constants.to_vec(),
        });
    }

    fn push_debug_group(&mut self, label: &str) {
        self.push(Event::PushGroup(label.to_owned()));
    }

    fn pop_debug_group(&mut self) {
        self.push(Event::PopGroup);
    }
}

// ─── Generators ───────────────────────────────────────────────────────────────

/// Records its arguments and returns a fixed output.
pub struct RecordingGenerator {
    log: Log,
    output: Option<TextureView>,
}

impl SubGenerator for RecordingGenerator {
    fn generate(
        &mut self,
        _ctx: &mut CommandContext<'_>,
        args: &GeneratorArgs,
        _visibility: Option<&VisibilityData>,
    ) -> prism::Result<Option<TextureView>> {
        self.log.borrow_mut().push(Event::Generate(args.clone()));
        Ok(self.output)
    }
}

// ─── Harness ──────────────────────────────────────────────────────────────────

pub const WIDTH: u32 = 320;
pub const HEIGHT: u32 = 180;
pub const TILE: u32 = 64;

/// Generator-owned outputs.
#[derive(Debug, Clone, Copy)]
pub struct Outputs {
    pub scattering: TextureView,
    pub reflections: TextureView,
    pub blurred: TextureView,
}

pub struct Harness {
    pub log: Log,
    pub device: RecordingDevice,
    pub arena: ResourceArena,
    pub shaders: StaticShaderLibrary,
    pub target: TextureView,
    pub lut: TextureView,
    pub outputs: Outputs,
    pub external: Vec<TextureId>,
}

impl Harness {
    pub fn new() -> Self {
        init_logger();
        let log = new_log();
        let mut device = RecordingDevice::new(log.clone());
        let mut arena = ResourceArena::new();
        let mut external = Vec::new();

        let mut texture = |label: &'static str, role: ViewRole, usage: wgpu::TextureUsages| {
            let id = arena
                .create_texture(
                    &mut device,
                    TextureDesc {
                        label,
                        width: WIDTH,
                        height: HEIGHT,
                        format: wgpu::TextureFormat::Rgba16Float,
                        usage,
                    },
                )
                .unwrap();
            external.push(id);
            arena.view(id, role).unwrap()
        };

        let target = texture(
            "Backbuffer",
            ViewRole::RenderTarget,
            wgpu::TextureUsages::RENDER_ATTACHMENT,
        );
        let lut = texture(
            "Rayleigh LUT",
            ViewRole::ShaderResource,
            wgpu::TextureUsages::TEXTURE_BINDING,
        );
        let outputs = Outputs {
            scattering: texture(
                "Scattering",
                ViewRole::ShaderResource,
                wgpu::TextureUsages::TEXTURE_BINDING,
            ),
            reflections: texture(
                "Reflections",
                ViewRole::ShaderResource,
                wgpu::TextureUsages::TEXTURE_BINDING,
            ),
            blurred: texture(
                "Motion Blur",
                ViewRole::ShaderResource,
                wgpu::TextureUsages::TEXTURE_BINDING,
            ),
        };

        log.borrow_mut().clear();

        Self {
            log,
            device,
            arena,
            shaders: StaticShaderLibrary::with_deferred_defaults(),
            target,
            lut,
            outputs,
            external,
        }
    }

    pub fn generator(&self, output: Option<TextureView>) -> Box<dyn SubGenerator> {
        Box::new(RecordingGenerator {
            log: self.log.clone(),
            output,
        })
    }

    /// A registry with every generator present.
    pub fn registry(&self) -> GeneratorRegistry {
        self.registry_without(&[])
    }

    pub fn registry_without(&self, missing: &[GeneratorId]) -> GeneratorRegistry {
        let all = [
            (GeneratorId::ShadowMap, None),
            (GeneratorId::AmbientOcclusion, None),
            (GeneratorId::VolumetricLight, Some(self.outputs.scattering)),
            (GeneratorId::TiledLighting, None),
            (GeneratorId::Reflections, Some(self.outputs.reflections)),
            (GeneratorId::DepthOfField, None),
            (GeneratorId::MotionBlur, Some(self.outputs.blurred)),
            (GeneratorId::ToneMapper, None),
        ];
        let mut registry = GeneratorRegistry::new();
        for (id, output) in all {
            if !missing.contains(&id) {
                registry.register(id, self.generator(output)).unwrap();
            }
        }
        registry
    }

    pub fn settings() -> SequencerSettings {
        let mut settings = SequencerSettings::new(WIDTH, HEIGHT);
        settings.shadow.tile_size = TILE;
        settings
    }

    pub fn sequencer(&mut self) -> prism::Result<PassSequencer> {
        let registry = self.registry();
        self.sequencer_with(registry, Self::settings())
    }

    pub fn sequencer_with(
        &mut self,
        registry: GeneratorRegistry,
        settings: SequencerSettings,
    ) -> prism::Result<PassSequencer> {
        PassSequencer::new(
            &mut self.device,
            &mut self.arena,
            &self.shaders,
            registry,
            Box::new(SortedQueueBuilder),
            settings,
        )
    }

    pub fn context(&mut self) -> CommandContext<'_> {
        CommandContext::new(&mut self.device, &mut self.arena)
    }

    pub fn take_log(&self) -> Vec<Event> {
        std::mem::take(&mut *self.log.borrow_mut())
    }

    /// A frame with every optional stage disabled.
    pub fn frame_args(&self) -> FrameArgs {
        let mut camera = Camera::new_perspective(60.0, WIDTH as f32 / HEIGHT as f32, 0.1, 1000.0);
        camera.look_at(Vec3::new(0.0, 2.0, 10.0), Vec3::ZERO, Vec3::Y);

        FrameArgs {
            camera,
            viewport: Viewport::full(WIDTH, HEIGHT),
            target: self.target,
            light_direction: Vec3::NEG_Y,
            light_color: Vec3::ONE,
            atmospheric_lut: self.lut,
            prev_view_projection: Mat4::IDENTITY,
            volumetric_lights: false,
            reflections: ReflectionSettings {
                enabled: false,
                thickness: 0.5,
            },
            depth_of_field: DepthOfFieldSettings {
                focus_plane: 10.0,
                size: 5.0,
                near_transition_size: 1.0,
                far_transition_size: 10.0,
                near_blur_fraction: 0.015,
                far_blur_fraction: 0.01,
            },
            motion_blur: MotionBlurSettings {
                enabled: false,
                sample_count: 8,
            },
        }
    }

    /// Frame arguments with every optional stage enabled.
    pub fn frame_args_all_enabled(&self) -> FrameArgs {
        let mut frame = self.frame_args();
        frame.volumetric_lights = true;
        frame.reflections.enabled = true;
        frame.motion_blur.enabled = true;
        frame
    }

    pub fn resolve(&self, view: TextureView) -> RawView {
        self.arena.resolve(view).unwrap()
    }
}

pub fn visibility() -> VisibilityData {
    let item = |id, passes, sort_key| VisibleItem {
        id,
        passes,
        sort_key,
    };
    VisibilityData {
        items: vec![
            item(1, PassMask::OPAQUE, 30),
            item(2, PassMask::ALPHA_MASKED, 10),
            item(3, PassMask::OPAQUE, 20),
            item(4, PassMask::SKY, 0),
        ],
    }
}

/// Generator dispatches recorded in `events`, in order.
pub fn generator_calls(events: &[Event]) -> Vec<GeneratorArgs> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::Generate(args) => Some(args.clone()),
            _ => None,
        })
        .collect()
}

/// Names of the debug groups pushed in `events`, in order.
pub fn group_names(events: &[Event]) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::PushGroup(name) => Some(name.clone()),
            _ => None,
        })
        .collect()
}

/// Events recorded inside the debug group `name`.
pub fn events_in_group(events: &[Event], name: &str) -> Vec<Event> {
    let mut inside = false;
    let mut out = Vec::new();
    for event in events {
        match event {
            Event::PushGroup(group) if group == name => inside = true,
            Event::PopGroup if inside => inside = false,
            e if inside => out.push(e.clone()),
            _ => {}
        }
    }
    out
}
