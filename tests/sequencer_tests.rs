//! Pass Sequencer Tests
//!
//! Tests for:
//! - Stage order and gating of optional stages
//! - Binding resets and view-parameter rebinding
//! - Absent optional outputs and toggle isolation
//! - Motion blur pass-through
//! - Idempotence of identical frames
//! - Construction failures and release order

mod common;

use glam::{Mat4, Vec3};

use common::{Event, Harness, events_in_group, generator_calls, group_names, visibility};

use prism::errors::RenderError;
use prism::renderer::core::{RawView, ViewParameters, Viewport};
use prism::renderer::graph::passes::VelocityConstants;
use prism::renderer::graph::{
    FrameArgs, FrameStage, GeneratorArgs, GeneratorId, PassCategory, PassSequencer,
    TiledLightingArgs, ToneMapArgs,
};
use prism::renderer::pipeline::{ShaderLibrary, StaticShaderLibrary};
use prism::renderer::settings::SequencerSettings;

const ALL_STAGES: [&str; 14] = [
    "clear",
    "build_queues",
    "gbuffer",
    "gbuffer_alpha_masked",
    "camera_velocity",
    "ssao",
    "volumetric_lights",
    "tiled_deferred",
    "screen_space_reflections",
    "composite",
    "skydome",
    "depth_of_field",
    "motion_blur",
    "tonemap",
];

fn run_frame(
    h: &mut Harness,
    seq: &mut PassSequencer,
    frame: &FrameArgs,
) -> prism::Result<Vec<Event>> {
    h.take_log();
    let vis = visibility();
    let result = {
        let mut ctx = h.context();
        seq.generate(&mut ctx, frame, &vis)
    };
    result.map(|()| h.take_log())
}

fn shutdown(h: &mut Harness, mut seq: PassSequencer) {
    seq.shutdown(&mut h.device, &mut h.arena);
}

fn ids(calls: &[GeneratorArgs]) -> Vec<GeneratorId> {
    calls.iter().map(GeneratorArgs::id).collect()
}

fn composite_draw(h: &Harness, events: &[Event]) -> (Vec<Option<RawView>>, Vec<u8>) {
    let shader = h.shaders.shader("reflections_composite").unwrap();
    events
        .iter()
        .find_map(|e| match e {
            Event::DrawFullscreen {
                shader: s,
                resources,
                constants,
            } if *s == shader => Some((resources.clone(), constants.clone())),
            _ => None,
        })
        .expect("composite draw recorded")
}

fn without_group(events: &[Event], name: &str) -> Vec<Event> {
    let mut inside = false;
    let mut out = Vec::new();
    for event in events {
        match event {
            Event::PushGroup(group) if group == name => inside = true,
            Event::PopGroup if inside => inside = false,
            _ if inside => {}
            e => out.push(e.clone()),
        }
    }
    out
}

fn differing(a: &[Event], b: &[Event]) -> Vec<(Event, Event)> {
    assert_eq!(a.len(), b.len(), "event streams differ in length");
    a.iter()
        .zip(b)
        .filter(|(x, y)| x != y)
        .map(|(x, y)| (x.clone(), y.clone()))
        .collect()
}

// ============================================================================
// Stage order
// ============================================================================

#[test]
fn all_stages_run_in_order_when_enabled() {
    let mut h = Harness::new();
    let mut seq = h.sequencer().unwrap();
    let frame = h.frame_args_all_enabled();

    let events = run_frame(&mut h, &mut seq, &frame).unwrap();

    assert_eq!(group_names(&events), ALL_STAGES);
    assert_eq!(seq.profiler().scope_names(), ALL_STAGES);
    assert_eq!(
        ids(&generator_calls(&events)),
        [
            GeneratorId::AmbientOcclusion,
            GeneratorId::VolumetricLight,
            GeneratorId::TiledLighting,
            GeneratorId::Reflections,
            GeneratorId::DepthOfField,
            GeneratorId::MotionBlur,
            GeneratorId::ToneMapper,
        ]
    );

    shutdown(&mut h, seq);
}

#[test]
fn disabled_stages_record_nothing() {
    let mut h = Harness::new();
    let mut seq = h.sequencer().unwrap();
    let frame = h.frame_args();

    let events = run_frame(&mut h, &mut seq, &frame).unwrap();

    let expected: Vec<&str> = ALL_STAGES
        .into_iter()
        .filter(|s| !matches!(*s, "volumetric_lights" | "screen_space_reflections" | "motion_blur"))
        .collect();
    assert_eq!(group_names(&events), expected);
    assert_eq!(seq.profiler().scope_names(), expected);
    assert_eq!(
        ids(&generator_calls(&events)),
        [
            GeneratorId::AmbientOcclusion,
            GeneratorId::TiledLighting,
            GeneratorId::DepthOfField,
            GeneratorId::ToneMapper,
        ]
    );

    shutdown(&mut h, seq);
}

#[test]
fn clear_stage_resets_depth_color_and_normal() {
    let mut h = Harness::new();
    let mut seq = h.sequencer().unwrap();
    let frame = h.frame_args();

    let events = run_frame(&mut h, &mut seq, &frame).unwrap();
    let pool = seq.pool();

    assert_eq!(
        events_in_group(&events, "clear"),
        [
            Event::ClearDepth {
                target: h.resolve(pool.depth.dsv),
                depth: 1.0,
            },
            Event::ClearColor {
                target: h.resolve(pool.color.rtv),
                color: wgpu::Color {
                    r: 0.0,
                    g: 0.0,
                    b: 0.0,
                    a: 0.0
                },
            },
            Event::ClearColor {
                target: h.resolve(pool.normal.rtv),
                color: wgpu::Color {
                    r: 0.5,
                    g: 0.5,
                    b: 0.5,
                    a: 0.0
                },
            },
        ]
    );

    shutdown(&mut h, seq);
}

// ============================================================================
// Bindings
// ============================================================================

#[test]
fn geometry_stages_share_one_set_of_bindings() {
    let mut h = Harness::new();
    let mut seq = h.sequencer().unwrap();
    let frame = h.frame_args();

    let events = run_frame(&mut h, &mut seq, &frame).unwrap();
    let pool = seq.pool();

    assert_eq!(
        events_in_group(&events, "gbuffer"),
        [
            Event::BindViewParameters(ViewParameters::from_camera(&frame.camera)),
            Event::SetViewport(frame.viewport, (common::WIDTH, common::HEIGHT)),
            Event::SetRenderTargets {
                colors: vec![h.resolve(pool.color.rtv), h.resolve(pool.normal.rtv)],
                depth: Some(h.resolve(pool.depth.dsv)),
            },
            Event::DrawQueue {
                pass: seq.pass_index(PassCategory::Opaque),
                category: PassCategory::Opaque,
                items: vec![3, 1],
            },
        ]
    );

    assert_eq!(
        events_in_group(&events, "gbuffer_alpha_masked"),
        [Event::DrawQueue {
            pass: seq.pass_index(PassCategory::AlphaMasked),
            category: PassCategory::AlphaMasked,
            items: vec![2],
        }]
    );

    shutdown(&mut h, seq);
}

#[test]
fn four_stages_reset_and_rebind_view_parameters() {
    let mut h = Harness::new();
    let mut seq = h.sequencer().unwrap();
    let frame = h.frame_args_all_enabled();

    let events = run_frame(&mut h, &mut seq, &frame).unwrap();
    let view_params = Event::BindViewParameters(ViewParameters::from_camera(&frame.camera));

    let resetting: Vec<&str> = FrameStage::ALL
        .iter()
        .filter(|stage| stage.resets_bindings())
        .map(|stage| stage.name())
        .collect();
    assert_eq!(resetting, ["camera_velocity", "tiled_deferred", "composite", "skydome"]);

    for stage in FrameStage::ALL {
        let inner = events_in_group(&events, stage.name());
        if stage.resets_bindings() {
            assert_eq!(inner[0], Event::Unbind, "{stage:?} does not start with a reset");
            assert_eq!(inner[1], view_params, "{stage:?} does not rebind view parameters");
        } else {
            assert!(!inner.contains(&Event::Unbind), "{stage:?} resets bindings");
        }
    }

    let resets = events.iter().filter(|e| **e == Event::Unbind).count();
    assert_eq!(resets, 4);

    shutdown(&mut h, seq);
}

#[test]
fn sky_is_depth_tested_against_the_shared_depth_buffer() {
    let mut h = Harness::new();
    let mut seq = h.sequencer().unwrap();
    let frame = h.frame_args();

    let events = run_frame(&mut h, &mut seq, &frame).unwrap();
    let pool = seq.pool();
    let sky = events_in_group(&events, "skydome");

    assert!(sky.contains(&Event::SetRenderTargets {
        colors: vec![h.resolve(pool.composite.rtv)],
        depth: Some(h.resolve(pool.depth.dsv)),
    }));
    assert_eq!(
        sky.last(),
        Some(&Event::DrawQueue {
            pass: seq.pass_index(PassCategory::Sky),
            category: PassCategory::Sky,
            items: vec![4],
        })
    );

    shutdown(&mut h, seq);
}

#[test]
fn velocity_pass_reprojects_with_previous_view_projection() {
    let mut h = Harness::new();
    let mut seq = h.sequencer().unwrap();
    let mut frame = h.frame_args();
    frame.prev_view_projection =
        Mat4::from_translation(Vec3::new(0.1, 0.0, 0.0)) * frame.camera.view_projection_matrix();

    let events = run_frame(&mut h, &mut seq, &frame).unwrap();
    let velocity = events_in_group(&events, "camera_velocity");

    let expected = VelocityConstants {
        reprojection: frame.prev_view_projection * frame.camera.view_matrix().inverse(),
    };
    assert!(velocity.contains(&Event::SetRenderTargets {
        colors: vec![h.resolve(seq.pool().velocity.rtv)],
        depth: None,
    }));
    assert!(velocity.contains(&Event::DrawFullscreen {
        shader: h.shaders.shader("camera_velocity").unwrap(),
        resources: vec![Some(h.resolve(seq.pool().depth.srv))],
        constants: bytemuck::bytes_of(&expected).to_vec(),
    }));

    shutdown(&mut h, seq);
}

// ============================================================================
// Optional outputs
// ============================================================================

#[test]
fn disabled_features_reach_consumers_as_absent() {
    let mut h = Harness::new();
    let mut seq = h.sequencer().unwrap();
    let frame = h.frame_args();

    let events = run_frame(&mut h, &mut seq, &frame).unwrap();

    let calls = generator_calls(&events);
    let lighting = calls
        .iter()
        .find_map(|c| match c {
            GeneratorArgs::TiledLighting(args) => Some(*args),
            _ => None,
        })
        .unwrap();
    assert_eq!(lighting.scattering, None);
    assert_eq!(lighting.target, seq.pool().lighting.uav);
    assert_eq!(lighting.shadows, seq.coordinator().shadow_params());

    let (resources, _) = composite_draw(&h, &events);
    assert_eq!(resources.len(), 6);
    assert_eq!(resources[1], None);
    assert_eq!(resources[5], Some(h.resolve(h.lut)));

    shutdown(&mut h, seq);
}

#[test]
fn enabled_features_forward_generator_outputs() {
    let mut h = Harness::new();
    let mut seq = h.sequencer().unwrap();
    let frame = h.frame_args_all_enabled();

    let events = run_frame(&mut h, &mut seq, &frame).unwrap();
    let calls = generator_calls(&events);

    let scattering = calls.iter().find_map(|c| match c {
        GeneratorArgs::TiledLighting(args) => Some(args.scattering),
        _ => None,
    });
    assert_eq!(scattering, Some(Some(h.outputs.scattering)));

    let (resources, _) = composite_draw(&h, &events);
    assert_eq!(resources[1], Some(h.resolve(h.outputs.reflections)));

    shutdown(&mut h, seq);
}

#[test]
fn toggling_reflections_changes_nothing_else() {
    let mut h = Harness::new();
    let mut seq = h.sequencer().unwrap();
    let off = h.frame_args();
    let mut on = off.clone();
    on.reflections.enabled = true;

    let a = run_frame(&mut h, &mut seq, &off).unwrap();
    let b = run_frame(&mut h, &mut seq, &on).unwrap();

    let diff = differing(&a, &without_group(&b, "screen_space_reflections"));
    assert_eq!(diff.len(), 1, "unexpected differences: {diff:?}");

    let (ra, _) = composite_draw(&h, &a);
    let (rb, _) = composite_draw(&h, &b);
    for slot in [0, 2, 3, 4, 5] {
        assert_eq!(ra[slot], rb[slot]);
    }

    shutdown(&mut h, seq);
}

#[test]
fn toggling_volumetric_lights_only_changes_the_scattering_input() {
    let mut h = Harness::new();
    let mut seq = h.sequencer().unwrap();
    let off = h.frame_args();
    let mut on = off.clone();
    on.volumetric_lights = true;

    let a = run_frame(&mut h, &mut seq, &off).unwrap();
    let b = run_frame(&mut h, &mut seq, &on).unwrap();

    let diff = differing(&a, &without_group(&b, "volumetric_lights"));
    assert_eq!(diff.len(), 1, "unexpected differences: {diff:?}");
    match &diff[0] {
        (
            Event::Generate(GeneratorArgs::TiledLighting(x)),
            Event::Generate(GeneratorArgs::TiledLighting(y)),
        ) => {
            assert_eq!(x.scattering, None);
            assert_eq!(y.scattering, Some(h.outputs.scattering));
            assert_eq!(TiledLightingArgs { scattering: None, ..*y }, *x);
        }
        other => panic!("unexpected difference {other:?}"),
    }

    shutdown(&mut h, seq);
}

#[test]
fn volumetric_lights_use_the_sun_direction_and_shadow_params() {
    let mut h = Harness::new();
    let mut seq = h.sequencer().unwrap();
    seq.set_sun_light_dir(Vec3::new(0.0, -2.0, -2.0));
    let mut frame = h.frame_args();
    frame.volumetric_lights = true;
    frame.light_direction = Vec3::new(0.0, -1.0, -1.0);

    {
        let mut ctx = h.context();
        seq.secondary_views(&mut ctx, &frame.camera).unwrap();
    }
    let events = run_frame(&mut h, &mut seq, &frame).unwrap();

    let volumetric = generator_calls(&events)
        .into_iter()
        .find_map(|c| match c {
            GeneratorArgs::VolumetricLight(args) => Some(args),
            _ => None,
        })
        .unwrap();
    assert!((volumetric.light_direction - Vec3::new(0.0, -1.0, -1.0).normalize()).length() < 1e-6);
    assert_eq!(volumetric.shadows, seq.coordinator().shadow_params());
    assert_eq!(volumetric.depth, seq.pool().depth.srv);
    assert!(volumetric.shadows.view_projections.iter().all(|m| *m != Mat4::IDENTITY));

    shutdown(&mut h, seq);
}

// ============================================================================
// Motion blur
// ============================================================================

#[test]
fn tone_mapper_reads_depth_of_field_when_motion_blur_is_off() {
    let mut h = Harness::new();
    let mut seq = h.sequencer().unwrap();
    let frame = h.frame_args();

    let events = run_frame(&mut h, &mut seq, &frame).unwrap();
    let tone_map = generator_calls(&events).pop().unwrap();

    assert_eq!(
        tone_map,
        GeneratorArgs::ToneMapper(ToneMapArgs {
            source: seq.pool().depth_of_field.srv,
            target: h.target,
            viewport: frame.viewport,
        })
    );

    shutdown(&mut h, seq);
}

#[test]
fn tone_mapper_reads_blurred_output_when_motion_blur_is_on() {
    let mut h = Harness::new();
    let mut seq = h.sequencer().unwrap();
    let mut frame = h.frame_args();
    frame.motion_blur.enabled = true;
    frame.motion_blur.sample_count = 12;

    let events = run_frame(&mut h, &mut seq, &frame).unwrap();
    let calls = generator_calls(&events);

    match &calls[calls.len() - 2] {
        GeneratorArgs::MotionBlur(args) => {
            assert_eq!(args.color, seq.pool().depth_of_field.srv);
            assert_eq!(args.velocity, seq.pool().velocity.srv);
            assert_eq!(args.sample_count, 12);
        }
        other => panic!("expected motion blur, got {other:?}"),
    }
    match &calls[calls.len() - 1] {
        GeneratorArgs::ToneMapper(args) => assert_eq!(args.source, h.outputs.blurred),
        other => panic!("expected tone mapper, got {other:?}"),
    }

    shutdown(&mut h, seq);
}

#[test]
fn motion_blur_without_output_fails_and_leaves_the_sequencer_usable() {
    let mut h = Harness::new();
    let mut registry = h.registry();
    registry
        .register(GeneratorId::MotionBlur, h.generator(None))
        .unwrap();
    let mut seq = h.sequencer_with(registry, Harness::settings()).unwrap();

    let mut frame = h.frame_args();
    frame.motion_blur.enabled = true;
    let err = run_frame(&mut h, &mut seq, &frame).unwrap_err();
    assert!(matches!(
        err,
        RenderError::GeneratorFailure {
            id: GeneratorId::MotionBlur,
            ..
        }
    ));

    frame.motion_blur.enabled = false;
    assert!(run_frame(&mut h, &mut seq, &frame).is_ok());
    assert_eq!(seq.profiler().scope_names().last(), Some(&"tonemap"));

    shutdown(&mut h, seq);
}

// ============================================================================
// Idempotence
// ============================================================================

#[test]
fn identical_frames_record_identical_work() {
    let mut h = Harness::new();
    let mut seq = h.sequencer().unwrap();
    let frame = h.frame_args_all_enabled();

    let first = run_frame(&mut h, &mut seq, &frame).unwrap();
    let second = run_frame(&mut h, &mut seq, &frame).unwrap();
    assert_eq!(first, second);

    shutdown(&mut h, seq);
}

// ============================================================================
// Views
// ============================================================================

#[test]
fn render_frame_draws_shadow_views_before_the_main_view() {
    let mut h = Harness::new();
    let mut seq = h.sequencer().unwrap();
    let frame = h.frame_args();
    let vis = visibility();

    h.take_log();
    {
        let mut ctx = h.context();
        seq.render_frame(&mut ctx, &frame, &vis).unwrap();
    }
    let events = h.take_log();

    let atlas = h.resolve(seq.coordinator().atlas_dsv());
    assert_eq!(
        events[0],
        Event::ClearDepth {
            target: atlas,
            depth: 1.0
        }
    );

    let calls = generator_calls(&events);
    for (i, call) in calls[..4].iter().enumerate() {
        match call {
            GeneratorArgs::ShadowMap(args) => assert_eq!(args.cascade_index, i),
            other => panic!("expected shadow view {i}, got {other:?}"),
        }
    }
    assert_eq!(calls[4].id(), GeneratorId::AmbientOcclusion);
    assert_eq!(&group_names(&events)[..4], [
        "CSM_Cascade_0",
        "CSM_Cascade_1",
        "CSM_Cascade_2",
        "CSM_Cascade_3"
    ]);

    shutdown(&mut h, seq);
}

#[test]
fn main_view_dispatches_to_the_sequencer() {
    let mut h = Harness::new();
    let mut seq = h.sequencer().unwrap();
    let view = PassSequencer::main_view(h.frame_args());
    assert_eq!(view.generator, GeneratorId::MainView);

    let vis = visibility();
    let (missing, rendered) = {
        let mut ctx = h.context();
        let missing = seq.render_view(&mut ctx, &view, None);
        let rendered = seq.render_view(&mut ctx, &view, Some(&vis));
        (missing, rendered)
    };
    assert!(matches!(missing, Err(RenderError::InvalidConfiguration(_))));
    assert_eq!(rendered.unwrap(), None);
    assert_eq!(seq.profiler().scope_names().len(), 11);

    shutdown(&mut h, seq);
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn frame_arguments_are_validated_before_recording() {
    let mut h = Harness::new();
    let mut seq = h.sequencer().unwrap();

    let mut frame = h.frame_args();
    frame.target = h.lut;
    assert!(matches!(
        run_frame(&mut h, &mut seq, &frame),
        Err(RenderError::InvalidConfiguration(_))
    ));
    assert!(h.take_log().is_empty());

    let mut frame = h.frame_args();
    frame.viewport = Viewport::new(10, 0, common::WIDTH, common::HEIGHT);
    assert!(run_frame(&mut h, &mut seq, &frame).is_err());

    shutdown(&mut h, seq);
}

#[test]
fn viewport_past_the_coordinate_range_is_rejected() {
    let mut h = Harness::new();
    let mut seq = h.sequencer().unwrap();

    for viewport in [
        Viewport::new(u32::MAX, 0, 16, 16),
        Viewport::new(0, u32::MAX - 4, 16, 16),
        Viewport::new(1, 0, u32::MAX, 16),
    ] {
        let mut frame = h.frame_args();
        frame.viewport = viewport;
        assert!(matches!(
            run_frame(&mut h, &mut seq, &frame),
            Err(RenderError::InvalidConfiguration(_))
        ));
        assert!(h.take_log().is_empty());
    }

    shutdown(&mut h, seq);
}

#[test]
fn missing_pass_is_reported_without_allocating() {
    let mut h = Harness::new();
    let mut shaders = StaticShaderLibrary::new();
    for pass in ["gbuffer", "gbuffer_alpha_masked", "debug"] {
        shaders.add_pass(pass);
    }
    shaders.add_shader("camera_velocity");
    shaders.add_shader("reflections_composite");
    h.shaders = shaders;

    let live = h.arena.len();
    let err = h.sequencer().err().expect("skydome is missing");
    assert!(matches!(err, RenderError::PassNotFound(ref name) if name.contains("skydome")));
    assert_eq!(h.arena.len(), live);
    assert!(h.take_log().is_empty());
}

#[test]
fn missing_shader_is_reported_as_pass_not_found() {
    let mut h = Harness::new();
    let mut shaders = StaticShaderLibrary::new();
    for pass in ["gbuffer", "gbuffer_alpha_masked", "skydome", "debug"] {
        shaders.add_pass(pass);
    }
    shaders.add_shader("camera_velocity");
    h.shaders = shaders;

    assert!(matches!(
        h.sequencer(),
        Err(RenderError::PassNotFound(ref name)) if name.contains("reflections_composite")
    ));
}

#[test]
fn missing_required_generator_fails_construction() {
    let mut h = Harness::new();
    let registry = h.registry_without(&[GeneratorId::ToneMapper]);
    let live = h.arena.len();

    assert!(matches!(
        h.sequencer_with(registry, Harness::settings()),
        Err(RenderError::GeneratorNotRegistered(GeneratorId::ToneMapper))
    ));
    assert_eq!(h.arena.len(), live);
}

#[test]
fn missing_optional_generator_fails_only_when_enabled() {
    let mut h = Harness::new();
    let registry = h.registry_without(&[GeneratorId::Reflections]);
    let mut seq = h.sequencer_with(registry, Harness::settings()).unwrap();

    let mut frame = h.frame_args();
    assert!(run_frame(&mut h, &mut seq, &frame).is_ok());

    frame.reflections.enabled = true;
    assert!(matches!(
        run_frame(&mut h, &mut seq, &frame),
        Err(RenderError::GeneratorNotRegistered(GeneratorId::Reflections))
    ));

    shutdown(&mut h, seq);
}

#[test]
fn invalid_settings_are_rejected() {
    let mut h = Harness::new();
    let mut settings = Harness::settings();
    settings.shadow.split_fractions = [0.1, 0.3, 0.2, 1.0];
    let registry = h.registry();

    assert!(matches!(
        h.sequencer_with(registry, settings),
        Err(RenderError::InvalidConfiguration(_))
    ));
}

#[test]
fn settings_load_from_json() -> anyhow::Result<()> {
    let settings: SequencerSettings = serde_json::from_str(r#"{ "width": 1280, "height": 720 }"#)?;
    assert_eq!(settings, SequencerSettings::new(1280, 720));
    assert_eq!(settings.shadow.split_fractions, [0.025, 0.05, 0.5, 1.0]);

    let custom: SequencerSettings = serde_json::from_str(
        r#"{ "width": 640, "height": 360, "shadow": { "tile_size": 512, "stabilize": false } }"#,
    )?;
    assert_eq!(custom.shadow.tile_size, 512);
    assert!(!custom.shadow.stabilize);
    assert_eq!(custom.shadow.caster_extension, 100.0);
    custom.validate()?;
    Ok(())
}

// ============================================================================
// Shutdown
// ============================================================================

#[test]
fn shutdown_releases_atlas_then_pool_in_reverse_order() {
    let mut h = Harness::new();
    let live = h.arena.len();
    let mut seq = h.sequencer().unwrap();

    let created: Vec<_> = h
        .take_log()
        .into_iter()
        .filter_map(|e| match e {
            Event::CreateTexture { label, raw, .. } => Some((label, raw)),
            _ => None,
        })
        .collect();
    assert_eq!(created.len(), 9);
    assert_eq!(created[8].0, "Shadow Atlas");

    seq.shutdown(&mut h.device, &mut h.arena);
    seq.shutdown(&mut h.device, &mut h.arena);

    let released: Vec<_> = h
        .take_log()
        .into_iter()
        .filter_map(|e| match e {
            Event::ReleaseTexture(raw) => Some(raw),
            _ => None,
        })
        .collect();
    let expected: Vec<_> = created.iter().rev().map(|(_, raw)| *raw).collect();
    assert_eq!(released, expected);
    assert_eq!(h.arena.len(), live);
    assert!(seq.is_shut_down());

    let frame = h.frame_args();
    assert!(matches!(
        run_frame(&mut h, &mut seq, &frame),
        Err(RenderError::InvalidConfiguration(_))
    ));
}
