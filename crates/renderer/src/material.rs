//! Texture bindings of a shader program.
//!
//! Texture slot `i` of a program is bound in group 1 as a texture at
//! binding `2 * i` and its sampler at binding `2 * i + 1`.

use wgpu::{
    BindGroup, BindGroupLayout, BindGroupLayoutEntry, BindingType, SamplerBindingType,
    ShaderStages, TextureSampleType, TextureViewDimension,
};

/// Kind of texture a program expects in one slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextureSlot {
    D2,
    Cube,
}

impl TextureSlot {
    fn view_dimension(self) -> TextureViewDimension {
        match self {
            TextureSlot::D2 => TextureViewDimension::D2,
            TextureSlot::Cube => TextureViewDimension::Cube,
        }
    }
}

/// The bound textures of one draw, created by
/// [`ShaderProgram::create_material`](crate::ShaderProgram::create_material).
pub struct Material {
    pub(crate) program: String,
    pub(crate) bind_group: BindGroup,
}

impl Material {
    /// Name of the program this material was made for.
    pub fn program(&self) -> &str {
        &self.program
    }
}

pub(crate) fn texture_layout(device: &wgpu::Device, label: &str, slots: &[TextureSlot]) -> BindGroupLayout {
    let entries: Vec<BindGroupLayoutEntry> = slots
        .iter()
        .enumerate()
        .flat_map(|(i, slot)| {
            let binding = 2 * i as u32;
            [
                BindGroupLayoutEntry {
                    binding,
                    visibility: ShaderStages::FRAGMENT,
                    ty: BindingType::Texture {
                        sample_type: TextureSampleType::Float { filterable: true },
                        view_dimension: slot.view_dimension(),
                        multisampled: false,
                    },
                    count: None,
                },
                BindGroupLayoutEntry {
                    binding: binding + 1,
                    visibility: ShaderStages::FRAGMENT,
                    ty: BindingType::Sampler(SamplerBindingType::Filtering),
                    count: None,
                },
            ]
        })
        .collect();
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &entries,
    })
}
