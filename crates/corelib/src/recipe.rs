//! Recipe names: the CLI-selectable identifiers of the rendering techniques.

use std::fmt;
use std::str::FromStr;

use crate::CoreError;

/// One rendering technique. The set is closed; names are case-sensitive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Recipe {
    AlphaTest,
    MultiTex,
    NormalMap,
    ProjTex,
    ReflectCube,
    RefractCube,
    RenderToTex,
    Texture,
}

impl Recipe {
    /// All recipes, in the order they are listed in the usage text.
    pub const ALL: [Recipe; 8] = [
        Recipe::AlphaTest,
        Recipe::MultiTex,
        Recipe::NormalMap,
        Recipe::ProjTex,
        Recipe::ReflectCube,
        Recipe::RefractCube,
        Recipe::RenderToTex,
        Recipe::Texture,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Recipe::AlphaTest => "alpha-test",
            Recipe::MultiTex => "multi-tex",
            Recipe::NormalMap => "normal-map",
            Recipe::ProjTex => "proj-tex",
            Recipe::ReflectCube => "reflect-cube",
            Recipe::RefractCube => "refract-cube",
            Recipe::RenderToTex => "render-to-tex",
            Recipe::Texture => "texture",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Recipe::AlphaTest => "discard fragments by texture alpha",
            Recipe::MultiTex => "blend two textures on one surface",
            Recipe::NormalMap => "tangent-space normal mapping",
            Recipe::ProjTex => "project a texture onto the scene",
            Recipe::ReflectCube => "reflective surface from a cube map",
            Recipe::RefractCube => "refractive surface from a cube map",
            Recipe::RenderToTex => "render a scene into a texture",
            Recipe::Texture => "basic texture mapping",
        }
    }
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Recipe {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Recipe::ALL
            .into_iter()
            .find(|r| r.name() == s)
            .ok_or_else(|| CoreError::UnknownRecipe(s.to_owned()))
    }
}
