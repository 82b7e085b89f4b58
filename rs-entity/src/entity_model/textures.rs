use rs_utils::TextureAtlas;

/// Cutoff below which skin pixels are treated as holes (hat layer, sleeves...).
pub const SKIN_ALPHA_CUTOFF: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AlphaMode {
    Opaque,
    /// Fragments whose alpha is below the cutoff (0..1) are discarded.
    Mask(f32),
}

impl AlphaMode {
    pub fn keeps(self, alpha: u8) -> bool {
        match self {
            AlphaMode::Opaque => true,
            AlphaMode::Mask(cutoff) => f32::from(alpha) / 255.0 >= cutoff,
        }
    }
}

/// One UV-textured material shared by every part of a model.
#[derive(Debug, Clone)]
pub struct SkinMaterial {
    pub texture: TextureAtlas,
    pub alpha_mode: AlphaMode,
    /// Skip lighting and output the texel as-is.
    pub unlit: bool,
}

impl SkinMaterial {
    /// Lit material with alpha cutout, sampled nearest/clamp-to-edge.
    pub fn cutout(texture: TextureAtlas) -> Self {
        Self {
            texture,
            alpha_mode: AlphaMode::Mask(SKIN_ALPHA_CUTOFF),
            unlit: false,
        }
    }

    /// Texel at `uv`, or `None` if the alpha mode discards it.
    pub fn sample(&self, uv: [f32; 2]) -> Option<[u8; 4]> {
        let texel = self.texture.sample_nearest(uv[0], uv[1]);
        self.alpha_mode.keeps(texel[3]).then_some(texel)
    }
}
