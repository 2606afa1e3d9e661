//! Shader programs: a vertex and a fragment WGSL stage linked into one
//! render pipeline, plus the program's named uniform block.
//!
//! Building a program goes through [`ProgramBuilder`] (compile each stage,
//! then link); only a linked [`ShaderProgram`] accepts uniforms and draws.
//! Uniforms are snapshotted per draw into slots of a dynamic-offset buffer,
//! so setting a uniform between two draws of the same frame affects only
//! the second one.

use std::{
    fs,
    num::NonZeroU64,
    path::{Path, PathBuf},
};

use wgpu::{
    BindGroup, BindGroupEntry, BindGroupLayout, BindGroupLayoutDescriptor, BindGroupLayoutEntry,
    BindingResource, BindingType, BlendState, Buffer, BufferBinding, BufferBindingType,
    BufferDescriptor, BufferUsages, ColorTargetState, ColorWrites, CompareFunction,
    DepthBiasState, DepthStencilState, Device, ErrorFilter, FragmentState,
    PipelineCompilationOptions, PipelineLayoutDescriptor, PrimitiveState, Queue, RenderPipeline,
    RenderPipelineDescriptor, ShaderModule, ShaderModuleDescriptor, ShaderSource, ShaderStages,
    StencilState, VertexState,
};

use crate::{
    frame::{DrawCall, Frame, FrameError},
    gpu::{DEPTH_FORMAT, GpuContext},
    material::{Material, TextureSlot, texture_layout},
    mesh::{GpuMesh, Vertex},
    texture::SampledTexture,
    uniforms::{UniformBlock, UniformError, UniformLayout, UniformValue, align_up},
};

/// Draws one program may issue per frame.
pub const MAX_DRAWS_PER_FRAME: u32 = 16;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub const fn entry_point(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vs_main",
            ShaderStage::Fragment => "fs_main",
        }
    }

    /// File extension of a stage source: `<name>.vert.wgsl`, `<name>.frag.wgsl`.
    pub const fn extension(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vert.wgsl",
            ShaderStage::Fragment => "frag.wgsl",
        }
    }
}

impl std::fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProgramError {
    #[error("failed to read {stage} shader {path}: {source}")]
    Io {
        stage: ShaderStage,
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{stage} shader {path} failed to compile: {message}")]
    Compile {
        stage: ShaderStage,
        path: PathBuf,
        message: String,
    },
    #[error("program '{program}' has no {stage} stage")]
    MissingStage {
        program: String,
        stage: ShaderStage,
    },
    #[error("program '{program}' failed to link: {message}")]
    Link { program: String, message: String },
    #[error("program '{program}': {source}")]
    Uniform {
        program: String,
        source: UniformError,
    },
    #[error("program '{program}' exceeded {max} draws in one frame", max = MAX_DRAWS_PER_FRAME)]
    TooManyDraws { program: String },
    #[error("program '{program}' expects {expected} textures, got {found}")]
    MaterialArity {
        program: String,
        expected: usize,
        found: usize,
    },
    #[error("program '{program}' texture slot {index} expects {expected:?}, got {found:?}")]
    MaterialSlot {
        program: String,
        index: usize,
        expected: TextureSlot,
        found: TextureSlot,
    },
    #[error("program '{program}' cannot draw with a material made for '{material}'")]
    ForeignMaterial { program: String, material: String },
    #[error("program '{program}' needs a material to draw")]
    MissingMaterial { program: String },
    #[error(transparent)]
    Frame(#[from] FrameError),
}

struct CompiledStage {
    module: ShaderModule,
    path: PathBuf,
}

/// A program whose stages are being compiled.
pub struct ProgramBuilder<'g> {
    gpu: &'g GpuContext,
    name: String,
    layout: UniformLayout,
    textures: Vec<TextureSlot>,
    vertex: Option<CompiledStage>,
    fragment: Option<CompiledStage>,
}

impl<'g> ProgramBuilder<'g> {
    pub fn uniforms(mut self, layout: UniformLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn textures(mut self, slots: &[TextureSlot]) -> Self {
        self.textures = slots.to_vec();
        self
    }

    /// Read and compile one stage. Compilation errors are caught in a
    /// validation error scope and reported with the stage and file.
    pub fn compile_shader(mut self, stage: ShaderStage, path: &Path) -> Result<Self, ProgramError> {
        log::info!("Compiling {stage} shader {}", path.display());
        let source = fs::read_to_string(path).map_err(|source| ProgramError::Io {
            stage,
            path: path.to_owned(),
            source,
        })?;
        if !source.contains(stage.entry_point()) {
            return Err(ProgramError::Compile {
                stage,
                path: path.to_owned(),
                message: format!("entry point `{}` not found", stage.entry_point()),
            });
        }

        let device = self.gpu.device();
        device.push_error_scope(ErrorFilter::Validation);
        let module = device.create_shader_module(ShaderModuleDescriptor {
            label: Some(&path.display().to_string()),
            source: ShaderSource::Wgsl(source.into()),
        });
        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            return Err(ProgramError::Compile {
                stage,
                path: path.to_owned(),
                message: err.to_string(),
            });
        }

        let compiled = Some(CompiledStage {
            module,
            path: path.to_owned(),
        });
        match stage {
            ShaderStage::Vertex => self.vertex = compiled,
            ShaderStage::Fragment => self.fragment = compiled,
        }
        Ok(self)
    }

    /// Link the compiled stages into a render pipeline.
    pub fn link(self) -> Result<ShaderProgram, ProgramError> {
        let missing = |stage| ProgramError::MissingStage {
            program: self.name.clone(),
            stage,
        };
        let vertex = self.vertex.as_ref().ok_or_else(|| missing(ShaderStage::Vertex))?;
        let fragment = self
            .fragment
            .as_ref()
            .ok_or_else(|| missing(ShaderStage::Fragment))?;

        let device = self.gpu.device();
        let block_size = self.layout.size();
        let uniform_layout = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some(&format!("{} uniforms BGL", self.name)),
            entries: &[BindGroupLayoutEntry {
                binding: 0,
                visibility: ShaderStages::VERTEX_FRAGMENT,
                ty: BindingType::Buffer {
                    ty: BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: NonZeroU64::new(block_size as u64),
                },
                count: None,
            }],
        });
        let textures = (!self.textures.is_empty()).then(|| {
            texture_layout(device, &format!("{} textures BGL", self.name), &self.textures)
        });
        let mut layouts: Vec<&BindGroupLayout> = vec![&uniform_layout];
        layouts.extend(textures.as_ref());

        device.push_error_scope(ErrorFilter::Validation);
        let pipeline_layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some(&format!("{} layout", self.name)),
            bind_group_layouts: &layouts,
            push_constant_ranges: &[],
        });
        let pipeline = device.create_render_pipeline(&RenderPipelineDescriptor {
            label: Some(&self.name),
            layout: Some(&pipeline_layout),
            vertex: VertexState {
                module: &vertex.module,
                entry_point: Some(ShaderStage::Vertex.entry_point()),
                buffers: &[Vertex::LAYOUT],
                compilation_options: PipelineCompilationOptions::default(),
            },
            fragment: Some(FragmentState {
                module: &fragment.module,
                entry_point: Some(ShaderStage::Fragment.entry_point()),
                targets: &[Some(ColorTargetState {
                    format: self.gpu.surface_format(),
                    blend: Some(BlendState::REPLACE),
                    write_mask: ColorWrites::ALL,
                })],
                compilation_options: PipelineCompilationOptions::default(),
            }),
            // no culling: several techniques shade back faces
            primitive: PrimitiveState::default(),
            depth_stencil: Some(DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: CompareFunction::LessEqual,
                stencil: StencilState::default(),
                bias: DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });
        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            return Err(ProgramError::Link {
                program: self.name.clone(),
                message: format!(
                    "{err} (stages {} + {})",
                    vertex.path.display(),
                    fragment.path.display()
                ),
            });
        }

        let stride = align_up(
            block_size,
            device.limits().min_uniform_buffer_offset_alignment,
        );
        let uniform_buffer = device.create_buffer(&BufferDescriptor {
            label: Some(&format!("{} UBO", self.name)),
            size: stride as u64 * MAX_DRAWS_PER_FRAME as u64,
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{} uniforms BG", self.name)),
            layout: &uniform_layout,
            entries: &[BindGroupEntry {
                binding: 0,
                resource: BindingResource::Buffer(BufferBinding {
                    buffer: &uniform_buffer,
                    offset: 0,
                    size: NonZeroU64::new(block_size as u64),
                }),
            }],
        });
        log::info!("Linked program '{}'", self.name);

        Ok(ShaderProgram {
            device: device.clone(),
            queue: self.gpu.queue().clone(),
            pipeline,
            uniform_buffer,
            uniform_bind_group,
            texture_layout: textures,
            texture_slots: self.textures,
            uniforms: UniformBlock::new(self.layout),
            stride,
            next_slot: 0,
            slot_frame: 0,
            name: self.name,
        })
    }
}

pub struct ShaderProgram {
    name: String,
    device: Device,
    queue: Queue,
    pipeline: RenderPipeline,
    uniform_buffer: Buffer,
    uniform_bind_group: BindGroup,
    texture_layout: Option<BindGroupLayout>,
    texture_slots: Vec<TextureSlot>,
    uniforms: UniformBlock,
    stride: u32,
    next_slot: u32,
    slot_frame: u64,
}

impl ShaderProgram {
    pub fn builder<'g>(gpu: &'g GpuContext, name: &str) -> ProgramBuilder<'g> {
        ProgramBuilder {
            gpu,
            name: name.to_owned(),
            layout: UniformLayout::new(),
            textures: Vec::new(),
            vertex: None,
            fragment: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_uniform(
        &mut self,
        name: &str,
        value: impl Into<UniformValue>,
    ) -> Result<(), ProgramError> {
        self.uniforms
            .set(name, value)
            .map_err(|source| ProgramError::Uniform {
                program: self.name.clone(),
                source,
            })
    }

    /// Bind `textures` to this program's texture slots, in order.
    pub fn create_material(
        &self,
        textures: &[&dyn SampledTexture],
    ) -> Result<Material, ProgramError> {
        if textures.len() != self.texture_slots.len() {
            return Err(ProgramError::MaterialArity {
                program: self.name.clone(),
                expected: self.texture_slots.len(),
                found: textures.len(),
            });
        }
        for (index, (tex, &expected)) in textures.iter().zip(&self.texture_slots).enumerate() {
            if tex.slot() != expected {
                return Err(ProgramError::MaterialSlot {
                    program: self.name.clone(),
                    index,
                    expected,
                    found: tex.slot(),
                });
            }
        }
        let Some(layout) = &self.texture_layout else {
            return Err(ProgramError::MaterialArity {
                program: self.name.clone(),
                expected: 0,
                found: textures.len(),
            });
        };

        let entries: Vec<BindGroupEntry> = textures
            .iter()
            .enumerate()
            .flat_map(|(i, tex)| {
                let binding = 2 * i as u32;
                [
                    BindGroupEntry {
                        binding,
                        resource: BindingResource::TextureView(tex.view()),
                    },
                    BindGroupEntry {
                        binding: binding + 1,
                        resource: BindingResource::Sampler(tex.sampler()),
                    },
                ]
            })
            .collect();
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{} material", self.name)),
            layout,
            entries: &entries,
        });
        Ok(Material {
            program: self.name.clone(),
            bind_group,
        })
    }

    /// Record an indexed draw of `mesh` into the current pass of `frame`,
    /// with a snapshot of the uniforms as they are now.
    pub fn draw(
        &mut self,
        frame: &mut Frame,
        mesh: &GpuMesh,
        material: Option<&Material>,
    ) -> Result<(), ProgramError> {
        if frame.index() != self.slot_frame {
            self.slot_frame = frame.index();
            self.next_slot = 0;
        }
        if self.next_slot >= MAX_DRAWS_PER_FRAME {
            return Err(ProgramError::TooManyDraws {
                program: self.name.clone(),
            });
        }
        let material = match (material, self.texture_slots.is_empty()) {
            (Some(m), _) if m.program != self.name => {
                return Err(ProgramError::ForeignMaterial {
                    program: self.name.clone(),
                    material: m.program.clone(),
                });
            }
            (None, false) => {
                return Err(ProgramError::MissingMaterial {
                    program: self.name.clone(),
                });
            }
            (m, _) => m.map(|m| m.bind_group.clone()),
        };

        let offset = self.next_slot * self.stride;
        frame.push_draw(DrawCall {
            pipeline: self.pipeline.clone(),
            uniforms: self.uniform_bind_group.clone(),
            uniform_offset: offset,
            material,
            vertex_buffer: mesh.vertex_buffer.clone(),
            index_buffer: mesh.index_buffer.clone(),
            index_count: mesh.index_count,
        })?;
        self.queue
            .write_buffer(&self.uniform_buffer, offset as u64, self.uniforms.bytes());
        self.next_slot += 1;
        Ok(())
    }
}

/// `<dir>/<name>.vert.wgsl` or `<dir>/<name>.frag.wgsl`.
pub fn stage_path(dir: &Path, name: &str, stage: ShaderStage) -> PathBuf {
    dir.join(format!("{name}.{}", stage.extension()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_paths_use_extension_convention() {
        let dir = Path::new("shaders");
        assert_eq!(
            stage_path(dir, "cubemap_reflect", ShaderStage::Vertex),
            PathBuf::from("shaders/cubemap_reflect.vert.wgsl")
        );
        assert_eq!(
            stage_path(dir, "cubemap_reflect", ShaderStage::Fragment),
            PathBuf::from("shaders/cubemap_reflect.frag.wgsl")
        );
    }

    #[test]
    fn uniform_error_names_the_program() {
        let err = ProgramError::Uniform {
            program: "texture".into(),
            source: UniformError::Unknown("Kd".into()),
        };
        assert_eq!(err.to_string(), "program 'texture': no uniform named 'Kd'");
    }
}
