//! Headless bevy app rendering into an offscreen image, read back through a screenshot.

use std::path::Path;

use bevy::app::PluginsState;
use bevy::core_pipeline::tonemapping::{DebandDither, Tonemapping};
use bevy::image::{ImageAddressMode, ImageSampler, ImageSamplerDescriptor};
use bevy::prelude::*;
use bevy::render::RenderPlugin;
use bevy::render::camera::RenderTarget;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use bevy::render::render_asset::RenderAssetUsages;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat, TextureUsages};
use bevy::render::view::screenshot::{Screenshot, ScreenshotCaptured};
use bevy::window::ExitCondition;
use image::{ImageFormat, RgbaImage};
use rs_entity::{PartColoring, PartMesh, SkinMaterial};
use tracing::debug;

use crate::error::RenderError;
use crate::lighting::ambient_light;
use crate::scene::Scene;

pub const MAX_DIMENSION: u32 = 8192;

/// Updates before the capture is requested, so pipelines and assets are in place.
const WARMUP_FRAMES: u32 = 6;
/// Updates allowed for the capture to arrive.
const CAPTURE_FRAMES: u32 = 30;

/// Despawned after every render.
#[derive(Component)]
struct SceneEntity;

#[derive(Resource, Default)]
struct CapturedFrame(Option<Image>);

pub struct RenderOutput {
    pub color: RgbaImage,
}

impl RenderOutput {
    pub fn width(&self) -> u32 {
        self.color.width()
    }

    pub fn height(&self) -> u32 {
        self.color.height()
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.color.get_pixel(x, y).0
    }

    pub fn save(&self, path: &Path) -> Result<(), RenderError> {
        self.color
            .save_with_format(path, ImageFormat::Png)
            .map_err(|source| RenderError::Write {
                path: path.to_path_buf(),
                source,
            })
    }
}

/// A windowless bevy app with one offscreen color target. Reusable across renders.
pub struct OffscreenRenderer {
    app: App,
    target: Handle<Image>,
    width: u32,
    height: u32,
}

impl OffscreenRenderer {
    pub fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(RenderError::InvalidResolution { width, height });
        }

        let mut app = App::new();
        app.add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: None,
                    exit_condition: ExitCondition::DontExit,
                    ..default()
                })
                .set(RenderPlugin {
                    synchronous_pipeline_compilation: true,
                    ..default()
                }),
        );
        app.init_resource::<CapturedFrame>();

        // No runner drives this app, so wait for the renderer here.
        while app.plugins_state() == PluginsState::Adding {
            bevy::tasks::tick_global_task_pools_on_main_thread();
        }
        app.finish();
        app.cleanup();

        let target = app
            .world_mut()
            .resource_mut::<Assets<Image>>()
            .add(target_image(width, height));

        debug!(width, height, "offscreen renderer ready");
        Ok(Self {
            app,
            target,
            width,
            height,
        })
    }

    /// Spawns the scene, captures one frame and despawns the scene again.
    pub fn render(&mut self, scene: &Scene<'_>) -> Result<RenderOutput, RenderError> {
        scene.validate()?;
        self.spawn_scene(scene);

        for _ in 0..WARMUP_FRAMES {
            self.app.update();
        }
        self.app
            .world_mut()
            .spawn(Screenshot::image(self.target.clone()))
            .observe(store_capture);

        let mut captured = None;
        for _ in 0..CAPTURE_FRAMES {
            self.app.update();
            captured = self.app.world_mut().resource_mut::<CapturedFrame>().0.take();
            if captured.is_some() {
                break;
            }
        }
        self.despawn_scene();

        let image = captured.ok_or(RenderError::CaptureTimedOut {
            frames: WARMUP_FRAMES + CAPTURE_FRAMES,
        })?;
        let color = into_rgba(image)?;
        debug!(
            width = self.width,
            height = self.height,
            parts = scene.model.parts.len(),
            "captured frame"
        );
        Ok(RenderOutput { color })
    }

    fn spawn_scene(&mut self, scene: &Scene<'_>) {
        let world = self.app.world_mut();
        world.insert_resource(ambient_light(scene.ambient));

        let vertex_material = world
            .resource_mut::<Assets<StandardMaterial>>()
            .add(StandardMaterial {
                base_color: Color::WHITE,
                unlit: scene.unlit,
                perceptual_roughness: 1.0,
                metallic: 0.0,
                ..default()
            });
        let skin_material = scene.model.material.as_ref().map(|material| {
            let texture = world
                .resource_mut::<Assets<Image>>()
                .add(skin_image(material));
            world
                .resource_mut::<Assets<StandardMaterial>>()
                .add(skin_standard_material(material, texture, scene.unlit))
        });

        for part in &scene.model.parts {
            let material = match (&part.coloring, &skin_material) {
                (PartColoring::Textured { .. }, Some(skin)) => skin.clone(),
                _ => vertex_material.clone(),
            };
            let mesh = world.resource_mut::<Assets<Mesh>>().add(part_to_mesh(part));
            world.spawn((
                Name::new(part.name),
                Mesh3d(mesh),
                MeshMaterial3d(material),
                Transform::IDENTITY,
                SceneEntity,
            ));
        }

        scene.light.spawn(world, SceneEntity);

        let [r, g, b, a] = scene.background;
        world.spawn((
            Camera3d::default(),
            Camera {
                target: RenderTarget::Image(self.target.clone().into()),
                clear_color: ClearColorConfig::Custom(Color::srgba_u8(r, g, b, a)),
                ..default()
            },
            scene
                .camera
                .projection(self.width as f32 / self.height as f32),
            scene.camera.transform(),
            // Keep output texels equal to their inputs.
            Tonemapping::None,
            DebandDither::Disabled,
            Msaa::Off,
            SceneEntity,
        ));
    }

    fn despawn_scene(&mut self) {
        let world = self.app.world_mut();
        let stale: Vec<Entity> = world
            .query_filtered::<Entity, With<SceneEntity>>()
            .iter(world)
            .collect();
        for entity in stale {
            world.despawn(entity);
        }
    }
}

fn store_capture(trigger: Trigger<ScreenshotCaptured>, mut frame: ResMut<CapturedFrame>) {
    frame.0 = Some(trigger.event().0.clone());
}

fn target_image(width: u32, height: u32) -> Image {
    let size = Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    };
    let mut image = Image::new(
        size,
        TextureDimension::D2,
        vec![0u8; (width * height * 4) as usize],
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::RENDER_WORLD | RenderAssetUsages::MAIN_WORLD,
    );
    image.texture_descriptor.usage = TextureUsages::COPY_DST
        | TextureUsages::COPY_SRC
        | TextureUsages::RENDER_ATTACHMENT
        | TextureUsages::TEXTURE_BINDING;
    image
}

fn skin_image(material: &SkinMaterial) -> Image {
    let rgba = material.texture.rgba();
    let mut image = Image::new(
        Extent3d {
            width: rgba.width(),
            height: rgba.height(),
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        rgba.as_raw().clone(),
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::default(),
    );

    let mut sampler = ImageSamplerDescriptor::nearest();
    sampler.address_mode_u = ImageAddressMode::ClampToEdge;
    sampler.address_mode_v = ImageAddressMode::ClampToEdge;
    sampler.address_mode_w = ImageAddressMode::ClampToEdge;
    image.sampler = ImageSampler::Descriptor(sampler);
    image
}

fn skin_standard_material(
    material: &SkinMaterial,
    texture: Handle<Image>,
    unlit: bool,
) -> StandardMaterial {
    StandardMaterial {
        base_color: Color::WHITE,
        base_color_texture: Some(texture),
        alpha_mode: match material.alpha_mode {
            rs_entity::AlphaMode::Opaque => AlphaMode::Opaque,
            rs_entity::AlphaMode::Mask(cutoff) => AlphaMode::Mask(cutoff),
        },
        unlit: unlit || material.unlit,
        perceptual_roughness: 1.0,
        metallic: 0.0,
        ..default()
    }
}

/// Flat-shaded mesh for one part: three vertices per face, each carrying the face normal.
pub fn part_to_mesh(part: &PartMesh) -> Mesh {
    let count = part.face_count() * 3;
    let mut positions: Vec<[f32; 3]> = Vec::with_capacity(count);
    let mut normals: Vec<[f32; 3]> = Vec::with_capacity(count);
    let mut uvs: Vec<[f32; 2]> = Vec::new();
    let mut colors: Vec<[f32; 4]> = Vec::new();

    for (face, tri) in part.faces.iter().enumerate() {
        let normal = part.face_normal(face).to_array();
        for (k, &index) in tri.iter().enumerate() {
            positions.push(part.positions[index as usize].to_array());
            normals.push(normal);
            match &part.coloring {
                PartColoring::VertexColors { colors: source, .. } => {
                    colors.push(linear_color(source[index as usize]));
                }
                PartColoring::Textured { uvs: source } => uvs.push(source[face][k]),
            }
        }
    }

    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::default(),
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    if !uvs.is_empty() {
        mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
    }
    if !colors.is_empty() {
        mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, colors);
    }
    mesh.insert_indices(Indices::U32((0..count as u32).collect()));
    mesh
}

/// Vertex colors are linear in the shader; skin bytes are sRGB.
fn linear_color([r, g, b, a]: [u8; 4]) -> [f32; 4] {
    let c = LinearRgba::from(Srgba::rgba_u8(r, g, b, a));
    [c.red, c.green, c.blue, c.alpha]
}

fn into_rgba(image: Image) -> Result<RgbaImage, RenderError> {
    let format = image.texture_descriptor.format;
    let (width, height) = (image.width(), image.height());
    let Some(mut data) = image.data else {
        return Err(RenderError::UnreadableCapture {
            detail: "no pixel data".to_string(),
        });
    };
    match format {
        TextureFormat::Rgba8UnormSrgb | TextureFormat::Rgba8Unorm => {}
        TextureFormat::Bgra8UnormSrgb | TextureFormat::Bgra8Unorm => {
            data.chunks_exact_mut(4).for_each(|px| px.swap(0, 2));
        }
        other => {
            return Err(RenderError::UnreadableCapture {
                detail: format!("unsupported format {other:?}"),
            });
        }
    }
    RgbaImage::from_raw(width, height, data).ok_or_else(|| RenderError::UnreadableCapture {
        detail: format!("buffer does not match {width}x{height}"),
    })
}
