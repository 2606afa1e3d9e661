//! Asset loading and CPU-side geometry.
//! Textures (RGBA8), cube-map faces, OBJ meshes and the procedural shapes
//! the scenes draw.

pub mod cubemap;
pub mod mesh;
pub mod obj;
pub mod paths;
pub mod shapes;
pub mod texture;

pub use paths::AssetPaths;
