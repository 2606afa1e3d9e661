//! Runtime configuration from `TEXLAB_*` environment variables.

use std::path::PathBuf;

pub const SHADER_DIR_VAR: &str = "TEXLAB_SHADER_DIR";
pub const MEDIA_DIR_VAR: &str = "TEXLAB_MEDIA_DIR";
pub const GPU_BACKEND_VAR: &str = "TEXLAB_GPU_BACKEND";
pub const SHOW_FPS_VAR: &str = "TEXLAB_SHOW_FPS";

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub shader_dir: PathBuf,
    pub media_dir: PathBuf,
    pub backends: wgpu::Backends,
    pub show_fps: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup; unset keys take defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            shader_dir: lookup(SHADER_DIR_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("shaders")),
            media_dir: lookup(MEDIA_DIR_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("media")),
            backends: lookup(GPU_BACKEND_VAR)
                .map(|v| parse_backend(&v))
                .unwrap_or_else(wgpu::Backends::all),
            show_fps: lookup(SHOW_FPS_VAR).is_some_and(|v| parse_flag(&v)),
        }
    }
}

/// Accept: auto|vulkan|dx12|metal|gl, plus the usual aliases.
pub fn parse_backend(value: &str) -> wgpu::Backends {
    match value.to_ascii_lowercase().as_str() {
        "auto" => wgpu::Backends::all(),
        "vulkan" | "vk" => wgpu::Backends::VULKAN,
        "dx12" | "d3d12" => wgpu::Backends::DX12,
        "metal" | "mtl" => wgpu::Backends::METAL,
        "gl" | "opengl" | "gles" => wgpu::Backends::GL,
        other => {
            log::warn!("Unknown backend '{other}', falling back to auto.");
            wgpu::Backends::all()
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "1" | "true" | "on" | "yes"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> AppConfig {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = config(&[]);
        assert_eq!(cfg.shader_dir, PathBuf::from("shaders"));
        assert_eq!(cfg.media_dir, PathBuf::from("media"));
        assert_eq!(cfg.backends, wgpu::Backends::all());
        assert!(!cfg.show_fps);
    }

    #[test]
    fn overrides_from_variables() {
        let cfg = config(&[
            (SHADER_DIR_VAR, "/opt/texlab/shaders"),
            (MEDIA_DIR_VAR, "assets"),
            (GPU_BACKEND_VAR, "Vulkan"),
            (SHOW_FPS_VAR, "on"),
        ]);
        assert_eq!(cfg.shader_dir, PathBuf::from("/opt/texlab/shaders"));
        assert_eq!(cfg.media_dir, PathBuf::from("assets"));
        assert_eq!(cfg.backends, wgpu::Backends::VULKAN);
        assert!(cfg.show_fps);
    }

    #[test]
    fn backend_aliases() {
        assert_eq!(parse_backend("vk"), wgpu::Backends::VULKAN);
        assert_eq!(parse_backend("d3d12"), wgpu::Backends::DX12);
        assert_eq!(parse_backend("mtl"), wgpu::Backends::METAL);
        assert_eq!(parse_backend("gles"), wgpu::Backends::GL);
        assert_eq!(parse_backend("auto"), wgpu::Backends::all());
        assert_eq!(parse_backend("glide"), wgpu::Backends::all());
    }

    #[test]
    fn fps_flag_values() {
        for on in ["1", "true", "ON", "yes"] {
            assert!(parse_flag(on), "{on}");
        }
        for off in ["0", "off", "", "nope"] {
            assert!(!parse_flag(off), "{off}");
        }
    }
}
