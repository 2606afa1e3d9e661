//! Named uniform blocks with WGSL uniform-buffer layout.
//!
//! A [`UniformLayout`] lists the members of one WGSL `struct` in
//! declaration order and computes their offsets with the WGSL alignment
//! rules. A [`UniformBlock`] keeps the last value set for every member and
//! the packed bytes ready for upload.

use glam::{Mat3, Mat4, Vec3, Vec4};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UniformType {
    F32,
    U32,
    Vec3,
    Vec4,
    Mat3,
    Mat4,
}

impl UniformType {
    pub const fn align(self) -> u32 {
        match self {
            UniformType::F32 | UniformType::U32 => 4,
            UniformType::Vec3 | UniformType::Vec4 | UniformType::Mat3 | UniformType::Mat4 => 16,
        }
    }

    pub const fn size(self) -> u32 {
        match self {
            UniformType::F32 | UniformType::U32 => 4,
            UniformType::Vec3 => 12,
            UniformType::Vec4 => 16,
            // three vec3 columns, each padded to 16 bytes
            UniformType::Mat3 => 48,
            UniformType::Mat4 => 64,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UniformValue {
    F32(f32),
    U32(u32),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat3(Mat3),
    Mat4(Mat4),
}

impl UniformValue {
    pub fn ty(&self) -> UniformType {
        match self {
            UniformValue::F32(_) => UniformType::F32,
            UniformValue::U32(_) => UniformType::U32,
            UniformValue::Vec3(_) => UniformType::Vec3,
            UniformValue::Vec4(_) => UniformType::Vec4,
            UniformValue::Mat3(_) => UniformType::Mat3,
            UniformValue::Mat4(_) => UniformType::Mat4,
        }
    }

    /// Write the value into `dst`, which must be `self.ty().size()` long.
    fn write(&self, dst: &mut [u8]) {
        match self {
            UniformValue::F32(v) => dst.copy_from_slice(bytemuck::bytes_of(v)),
            UniformValue::U32(v) => dst.copy_from_slice(bytemuck::bytes_of(v)),
            UniformValue::Vec3(v) => dst.copy_from_slice(bytemuck::cast_slice(&v.to_array())),
            UniformValue::Vec4(v) => dst.copy_from_slice(bytemuck::cast_slice(&v.to_array())),
            UniformValue::Mat3(m) => {
                for (i, col) in dst.chunks_exact_mut(16).enumerate() {
                    col[..12].copy_from_slice(bytemuck::cast_slice(&m.col(i).to_array()));
                    col[12..].fill(0);
                }
            }
            UniformValue::Mat4(m) => {
                dst.copy_from_slice(bytemuck::cast_slice(&m.to_cols_array()));
            }
        }
    }
}

impl From<f32> for UniformValue {
    fn from(v: f32) -> Self {
        UniformValue::F32(v)
    }
}

impl From<u32> for UniformValue {
    fn from(v: u32) -> Self {
        UniformValue::U32(v)
    }
}

/// WGSL has no host-shareable `bool`; flags travel as `u32`.
impl From<bool> for UniformValue {
    fn from(v: bool) -> Self {
        UniformValue::U32(v as u32)
    }
}

impl From<Vec3> for UniformValue {
    fn from(v: Vec3) -> Self {
        UniformValue::Vec3(v)
    }
}

impl From<Vec4> for UniformValue {
    fn from(v: Vec4) -> Self {
        UniformValue::Vec4(v)
    }
}

impl From<Mat3> for UniformValue {
    fn from(v: Mat3) -> Self {
        UniformValue::Mat3(v)
    }
}

impl From<Mat4> for UniformValue {
    fn from(v: Mat4) -> Self {
        UniformValue::Mat4(v)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum UniformError {
    #[error("no uniform named '{0}'")]
    Unknown(String),
    #[error("uniform '{name}' is {expected:?}, got {found:?}")]
    TypeMismatch {
        name: String,
        expected: UniformType,
        found: UniformType,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UniformField {
    pub name: &'static str,
    pub ty: UniformType,
    pub offset: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UniformLayout {
    fields: Vec<UniformField>,
    end: u32,
}

impl UniformLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a member, placed at the next offset its alignment allows.
    pub fn field(mut self, name: &'static str, ty: UniformType) -> Self {
        let offset = align_up(self.end, ty.align());
        self.fields.push(UniformField { name, ty, offset });
        self.end = offset + ty.size();
        self
    }

    pub fn fields(&self) -> &[UniformField] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&UniformField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Struct size rounded up to 16 bytes, as a uniform binding requires.
    pub fn size(&self) -> u32 {
        align_up(self.end, 16).max(16)
    }
}

/// CPU copy of one uniform block.
#[derive(Clone, Debug)]
pub struct UniformBlock {
    layout: UniformLayout,
    values: Vec<Option<UniformValue>>,
    bytes: Vec<u8>,
}

impl UniformBlock {
    pub fn new(layout: UniformLayout) -> Self {
        Self {
            values: vec![None; layout.fields.len()],
            bytes: vec![0; layout.size() as usize],
            layout,
        }
    }

    pub fn set(&mut self, name: &str, value: impl Into<UniformValue>) -> Result<(), UniformError> {
        let value = value.into();
        let (idx, field) = self
            .layout
            .fields
            .iter()
            .enumerate()
            .find(|(_, f)| f.name == name)
            .ok_or_else(|| UniformError::Unknown(name.to_owned()))?;
        if field.ty != value.ty() {
            return Err(UniformError::TypeMismatch {
                name: name.to_owned(),
                expected: field.ty,
                found: value.ty(),
            });
        }
        let start = field.offset as usize;
        value.write(&mut self.bytes[start..start + field.ty.size() as usize]);
        self.values[idx] = Some(value);
        Ok(())
    }

    /// Last value set for `name`, if any.
    pub fn get(&self, name: &str) -> Option<UniformValue> {
        let idx = self.layout.fields.iter().position(|f| f.name == name)?;
        self.values[idx]
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

#[inline]
pub(crate) fn align_up(value: u32, align: u32) -> u32 {
    value.div_ceil(align) * align
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ads_layout() -> UniformLayout {
        UniformLayout::new()
            .field("model_view", UniformType::Mat4)
            .field("normal_matrix", UniformType::Mat3)
            .field("mvp", UniformType::Mat4)
            .field("light_position", UniformType::Vec4)
            .field("light_intensity", UniformType::Vec3)
            .field("ka", UniformType::Vec3)
            .field("kd", UniformType::Vec3)
            .field("ks", UniformType::Vec3)
            .field("shininess", UniformType::F32)
    }

    #[test]
    fn offsets_follow_wgsl_rules() {
        let layout = ads_layout();
        let offsets: Vec<u32> = layout.fields().iter().map(|f| f.offset).collect();
        assert_eq!(offsets, vec![0, 64, 112, 176, 192, 208, 224, 240, 252]);
        assert_eq!(layout.size(), 256);
    }

    #[test]
    fn scalar_packs_after_vec3() {
        let layout = UniformLayout::new()
            .field("camera", UniformType::Vec3)
            .field("flag", UniformType::U32)
            .field("color", UniformType::Vec4);
        assert_eq!(layout.get("flag").unwrap().offset, 12);
        assert_eq!(layout.get("color").unwrap().offset, 16);
        assert_eq!(layout.size(), 32);
    }

    #[test]
    fn set_writes_bytes_and_remembers_value() {
        let mut block = UniformBlock::new(ads_layout());
        block.set("shininess", 100.0f32).unwrap();
        assert_eq!(block.get("shininess"), Some(UniformValue::F32(100.0)));
        assert_eq!(&block.bytes()[252..256], &100.0f32.to_ne_bytes());
    }

    #[test]
    fn mat3_columns_are_padded() {
        let mut block = UniformBlock::new(ads_layout());
        let m = Mat3::from_cols(Vec3::X, Vec3::Y * 2.0, Vec3::Z * 3.0);
        block.set("normal_matrix", m).unwrap();
        let floats: &[f32] = bytemuck::cast_slice(&block.bytes()[64..112]);
        assert_eq!(
            floats,
            &[1.0, 0.0, 0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 0.0, 0.0, 3.0, 0.0]
        );
    }

    #[test]
    fn bool_is_stored_as_u32() {
        let mut block = UniformBlock::new(UniformLayout::new().field("flag", UniformType::U32));
        block.set("flag", true).unwrap();
        assert_eq!(block.get("flag"), Some(UniformValue::U32(1)));
    }

    #[test]
    fn unknown_name_is_an_error() {
        let mut block = UniformBlock::new(ads_layout());
        assert_eq!(
            block.set("Shininess", 1.0f32),
            Err(UniformError::Unknown("Shininess".into()))
        );
    }

    #[test]
    fn wrong_type_is_an_error_and_keeps_old_value() {
        let mut block = UniformBlock::new(ads_layout());
        block.set("ka", Vec3::ONE).unwrap();
        let err = block.set("ka", Vec4::ONE).unwrap_err();
        assert_eq!(
            err,
            UniformError::TypeMismatch {
                name: "ka".into(),
                expected: UniformType::Vec3,
                found: UniformType::Vec4,
            }
        );
        assert_eq!(block.get("ka"), Some(UniformValue::Vec3(Vec3::ONE)));
    }
}
