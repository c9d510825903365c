//! WGSL shader modules and the pipelines built from them.

use std::{fs, path::Path};

use log::{debug, error};
use wgpu::*;

use crate::{
    error::{GlintError, Result},
    gfx::scene::vertex::Vertex3D,
};

/// Render state a [`Shader`] pipeline is created with.
#[derive(Debug, Clone)]
pub struct PipelineConfig<'a> {
    pub label: String,
    pub bind_group_layouts: Vec<&'a BindGroupLayout>,
    pub color_format: TextureFormat,
    pub depth_format: Option<TextureFormat>,
    pub cull_mode: Option<Face>,
    pub blend: Option<BlendState>,
}

impl<'a> PipelineConfig<'a> {
    pub fn new(label: &str, color_format: TextureFormat) -> Self {
        Self {
            label: label.to_owned(),
            bind_group_layouts: Vec::new(),
            color_format,
            depth_format: None,
            cull_mode: None,
            blend: Some(BlendState::REPLACE),
        }
    }

    pub fn with_bind_group_layouts(mut self, layouts: Vec<&'a BindGroupLayout>) -> Self {
        self.bind_group_layouts = layouts;
        self
    }

    pub fn with_depth_format(mut self, format: TextureFormat) -> Self {
        self.depth_format = Some(format);
        self
    }
}

/// A compiled WGSL module (`vs_main` and `fs_main`) and its render pipeline.
pub struct Shader {
    pipeline: RenderPipeline,
}

impl Shader {
    /// Reads, concatenates and compiles a vertex and a fragment file.
    ///
    /// When both paths are the same the file is read once and is expected to
    /// hold both entry points.
    pub fn from_files(
        device: &Device,
        config: &PipelineConfig,
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
    ) -> Result<Self> {
        let source = read_shader_sources(vertex_path.as_ref(), fragment_path.as_ref())?;
        Self::from_source(device, config, &config.label, &source)
    }

    /// Compiles `source` and builds the pipeline. Validation errors become
    /// [`GlintError::ShaderCompile`] instead of a device panic.
    pub fn from_source(
        device: &Device,
        config: &PipelineConfig,
        label: &str,
        source: &str,
    ) -> Result<Self> {
        device.push_error_scope(ErrorFilter::Validation);

        let module = device.create_shader_module(ShaderModuleDescriptor {
            label: Some(label),
            source: ShaderSource::Wgsl(source.into()),
        });
        let pipeline = create_pipeline(device, config, &module);

        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            error!("Shader '{}' failed to compile", label);
            return Err(GlintError::ShaderCompile {
                label: label.to_owned(),
                message: err.to_string(),
            });
        }

        debug!("Shader '{}' compiled", label);
        Ok(Self { pipeline })
    }

    pub fn pipeline(&self) -> &RenderPipeline {
        &self.pipeline
    }
}

/// Source of the vertex file followed by the fragment file, or the vertex
/// file alone when both paths are equal.
pub fn read_shader_sources(vertex_path: &Path, fragment_path: &Path) -> Result<String> {
    let read = |path: &Path| {
        fs::read_to_string(path).map_err(|source| GlintError::ShaderRead {
            path: path.to_path_buf(),
            source,
        })
    };

    let mut source = read(vertex_path)?;
    if fragment_path != vertex_path {
        source.push('\n');
        source.push_str(&read(fragment_path)?);
    }
    Ok(source)
}

fn create_pipeline(device: &Device, config: &PipelineConfig, module: &ShaderModule) -> RenderPipeline {
    let pipeline_layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
        label: Some(&format!("{} Layout", config.label)),
        bind_group_layouts: &config.bind_group_layouts,
        push_constant_ranges: &[],
    });

    let depth_stencil = config.depth_format.map(|format| DepthStencilState {
        format,
        depth_write_enabled: true,
        depth_compare: CompareFunction::Less,
        stencil: StencilState::default(),
        bias: DepthBiasState::default(),
    });

    device.create_render_pipeline(&RenderPipelineDescriptor {
        label: Some(&config.label),
        layout: Some(&pipeline_layout),
        vertex: VertexState {
            module,
            entry_point: Some("vs_main"),
            buffers: &[Vertex3D::desc()],
            compilation_options: PipelineCompilationOptions::default(),
        },
        fragment: Some(FragmentState {
            module,
            entry_point: Some("fs_main"),
            targets: &[Some(ColorTargetState {
                format: config.color_format,
                blend: config.blend,
                write_mask: ColorWrites::ALL,
            })],
            compilation_options: PipelineCompilationOptions::default(),
        }),
        primitive: PrimitiveState {
            topology: PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: FrontFace::Ccw,
            cull_mode: config.cull_mode,
            polygon_mode: PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil,
        multisample: MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn vertex_and_fragment_files_are_concatenated() {
        let vertex = write_temp("glint_shader_test.vert.wgsl", "fn vs_main() {}");
        let fragment = write_temp("glint_shader_test.frag.wgsl", "fn fs_main() {}");

        let source = read_shader_sources(&vertex, &fragment).unwrap();

        assert_eq!(source, "fn vs_main() {}\nfn fs_main() {}");
    }

    #[test]
    fn same_path_is_read_once() {
        let path = write_temp("glint_shader_test_single.wgsl", "fn vs_main() {}\nfn fs_main() {}");

        let source = read_shader_sources(&path, &path).unwrap();

        assert_eq!(source.matches("fs_main").count(), 1);
    }

    #[test]
    fn missing_file_reports_the_path() {
        let vertex = write_temp("glint_shader_test_present.wgsl", "");
        let missing = Path::new("no/such/shader.wgsl");

        let err = read_shader_sources(&vertex, missing).unwrap_err();

        assert!(matches!(err, GlintError::ShaderRead { ref path, .. } if path == missing));
    }

    #[test]
    fn bundled_shaders_define_both_entry_points() {
        let lit = [
            include_str!("shaders/lit.vert.wgsl"),
            include_str!("shaders/lit.frag.wgsl"),
        ]
        .concat();
        assert!(lit.contains("fn vs_main"));
        assert!(lit.contains("fn fs_main"));
        let light_source = include_str!("shaders/light_source.frag.wgsl");
        assert!(light_source.contains("fn fs_main"));
    }

    #[test]
    fn config_defaults_have_no_culling() {
        let config = PipelineConfig::new("lit", TextureFormat::Bgra8Unorm)
            .with_depth_format(TextureFormat::Depth32Float);
        assert!(config.cull_mode.is_none());
        assert_eq!(config.depth_format, Some(TextureFormat::Depth32Float));
        assert_eq!(config.blend, Some(BlendState::REPLACE));
    }
}
