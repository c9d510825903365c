//! WGPU-based rendering engine
//!
//! Owns the surface, the device and every GPU resource that is not tied to a
//! scene object: the depth buffer, the shared bind groups and the two
//! pipelines (Phong-lit geometry and the flat-colored light marker).

use std::path::Path;

use log::{debug, info, warn};
use wgpu::{Device, Queue, TextureFormat};

use super::{
    lighting::LightingUniform,
    shader::{PipelineConfig, Shader},
};
use crate::{
    error::{GlintError, Result},
    gfx::{
        camera::camera_utils::CameraUniform,
        resources::{
            global_bindings::GlobalBindings, material::MaterialBindings,
            texture_resource::TextureResource,
        },
        scene::{
            mesh::DrawMesh,
            object::{Object, ObjectBindings},
            scene::{Scene, SceneGpu},
        },
    },
};

const LIT_VERTEX_SOURCE: &str = include_str!("shaders/lit.vert.wgsl");
const LIT_FRAGMENT_SOURCE: &str = include_str!("shaders/lit.frag.wgsl");
const LIGHT_SOURCE_FRAGMENT_SOURCE: &str = include_str!("shaders/light_source.frag.wgsl");

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.2,
    g: 0.3,
    b: 0.3,
    a: 1.0,
};

/// Core rendering engine managing GPU resources and draw calls
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Device,
    queue: Queue,
    config: wgpu::SurfaceConfiguration,
    depth_texture: TextureResource,
    format: TextureFormat,
    global_bindings: GlobalBindings,
    object_bindings: ObjectBindings,
    material_bindings: MaterialBindings,
    lit_shader: Shader,
    light_source_shader: Shader,
}

impl RenderEngine {
    /// Creates a render engine drawing into `window`.
    ///
    /// Shaders are compiled from the copies bundled in the binary unless
    /// `shader_dir` names a directory holding `lit.vert.wgsl`,
    /// `lit.frag.wgsl` and `light_source.frag.wgsl`.
    ///
    /// # Arguments
    /// * `window` - Target the surface is created for
    /// * `width` - Initial surface width in pixels
    /// * `height` - Initial surface height in pixels
    /// * `shader_dir` - Optional directory to read the WGSL files from
    ///
    /// # Returns
    /// The configured engine, or the first surface, adapter, device or
    /// shader error hit while setting it up
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        shader_dir: Option<&Path>,
    ) -> Result<RenderEngine> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        info!("Using adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: 4096,
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = pick_surface_format(&surface_capabilities.formats)
            .ok_or(GlintError::NoSurfaceFormat)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_capabilities.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture =
            TextureResource::create_depth_texture(&device, &config, "depth_texture");

        let global_bindings = GlobalBindings::new(&device);
        let object_bindings = ObjectBindings::new(&device);
        let material_bindings = MaterialBindings::new(&device, &queue);

        let lit_config = PipelineConfig::new("Lit Pipeline", format)
            .with_depth_format(TextureResource::DEPTH_FORMAT)
            .with_bind_group_layouts(vec![
                global_bindings.camera_layout(),
                global_bindings.lighting_layout(),
                object_bindings.bind_group_layout(),
                material_bindings.bind_group_layout(),
            ]);
        let light_source_config = PipelineConfig::new("Light Source Pipeline", format)
            .with_depth_format(TextureResource::DEPTH_FORMAT)
            .with_bind_group_layouts(vec![
                global_bindings.camera_layout(),
                global_bindings.lighting_layout(),
                object_bindings.bind_group_layout(),
            ]);

        let (lit_shader, light_source_shader) = match shader_dir {
            Some(dir) => {
                info!("Loading shaders from '{}'", dir.display());
                let vertex = dir.join("lit.vert.wgsl");
                (
                    Shader::from_files(&device, &lit_config, &vertex, dir.join("lit.frag.wgsl"))?,
                    Shader::from_files(
                        &device,
                        &light_source_config,
                        &vertex,
                        dir.join("light_source.frag.wgsl"),
                    )?,
                )
            }
            None => (
                Shader::from_source(
                    &device,
                    &lit_config,
                    "lit",
                    &[LIT_VERTEX_SOURCE, LIT_FRAGMENT_SOURCE].join("\n"),
                )?,
                Shader::from_source(
                    &device,
                    &light_source_config,
                    "light_source",
                    &[LIT_VERTEX_SOURCE, LIGHT_SOURCE_FRAGMENT_SOURCE].join("\n"),
                )?,
            ),
        };

        info!(
            "Render engine ready: {}x{} {:?}",
            config.width, config.height, format
        );

        Ok(RenderEngine {
            surface,
            device,
            queue,
            config,
            depth_texture,
            format,
            global_bindings,
            object_bindings,
            material_bindings,
            lit_shader,
            light_source_shader,
        })
    }

    /// Uploads the per-frame camera and lighting uniforms.
    pub fn update(&mut self, camera: CameraUniform, lighting: LightingUniform) {
        self.global_bindings.update(&self.queue, camera, lighting);
    }

    /// What the scene needs to create and upload its own GPU resources.
    pub fn scene_gpu(&self) -> SceneGpu<'_> {
        SceneGpu {
            device: &self.device,
            queue: &self.queue,
            objects: &self.object_bindings,
            materials: &self.material_bindings,
        }
    }

    /// Draws the scene, then lets `ui_callback` record an overlay pass onto
    /// the same surface texture.
    ///
    /// The light marker is drawn with the flat pipeline, cubes and models with
    /// the lit one. Objects without a bind group are skipped.
    ///
    /// A lost or outdated surface is reconfigured and the frame skipped; other
    /// surface errors only skip the frame.
    ///
    /// # Arguments
    /// * `scene` - Scene whose GPU resources were created and synced this frame
    /// * `ui_callback` - Optional overlay recorder, called with the device,
    ///   queue, frame encoder and surface view after the main pass
    pub fn render_frame<F>(&mut self, scene: &Scene, ui_callback: Option<F>)
    where
        F: FnOnce(&Device, &Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
    {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                debug!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return;
            }
            Err(err) => {
                warn!("Skipping frame: {}", err);
                return;
            }
        };

        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_bind_group(0, self.global_bindings.camera_bind_group(), &[]);
            render_pass.set_bind_group(1, self.global_bindings.lighting_bind_group(), &[]);

            render_pass.set_pipeline(self.light_source_shader.pipeline());
            if bind_object(&mut render_pass, scene.light_source()) {
                render_pass.draw_mesh(scene.cube_mesh());
            }

            render_pass.set_pipeline(self.lit_shader.pipeline());
            for cube in scene.cubes() {
                if bind_object(&mut render_pass, cube) {
                    render_pass.draw_mesh_with_material(scene.cube_mesh(), 3);
                }
            }
            for entry in scene.models() {
                if bind_object(&mut render_pass, &entry.object) {
                    for mesh in &entry.model.meshes {
                        render_pass.draw_mesh_with_material(mesh, 3);
                    }
                }
            }
        }

        if let Some(ui_callback) = ui_callback {
            ui_callback(
                &self.device,
                &self.queue,
                &mut encoder,
                &surface_texture_view,
            );
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
    }

    /// Renders the scene without an overlay.
    pub fn render_frame_simple(&mut self, scene: &Scene) {
        self.render_frame(
            scene,
            None::<fn(&Device, &Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView)>,
        );
    }

    /// Reconfigures the surface and recreates the depth buffer. Zero sizes are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, &self.config, "depth_texture");
        debug!("Surface resized to {}x{}", width, height);
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    pub fn surface_format(&self) -> TextureFormat {
        self.format
    }
}

/// First non-sRGB format, so shader output is written as is, like the
/// [`TextureResource::COLOR_FORMAT`] texels it is computed from. Falls back to
/// the first supported format.
fn pick_surface_format(formats: &[TextureFormat]) -> Option<TextureFormat> {
    formats
        .iter()
        .copied()
        .find(|format| !format.is_srgb())
        .or_else(|| formats.first().copied())
}

/// Binds the object's uniform at group 2. False when it has nothing to draw with.
fn bind_object(render_pass: &mut wgpu::RenderPass<'_>, object: &Object) -> bool {
    if !object.visible {
        return false;
    }
    match object.bind_group() {
        Some(bind_group) => {
            render_pass.set_bind_group(2, bind_group, &[]);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_and_textures_agree_on_srgb() {
        let formats = [TextureFormat::Bgra8UnormSrgb, TextureFormat::Bgra8Unorm];

        let format = pick_surface_format(&formats).unwrap();

        assert_eq!(format, TextureFormat::Bgra8Unorm);
        assert_eq!(format.is_srgb(), TextureResource::COLOR_FORMAT.is_srgb());
    }

    #[test]
    fn srgb_only_surface_falls_back_to_first_format() {
        assert_eq!(
            pick_surface_format(&[TextureFormat::Rgba8UnormSrgb]),
            Some(TextureFormat::Rgba8UnormSrgb)
        );
        assert_eq!(pick_surface_format(&[]), None);
    }
}
