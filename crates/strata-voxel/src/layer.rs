//! The two scalar fields stored per cell.

/// Identifies one of the per-cell scalar layers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Layer {
    /// Drives the isosurface and collision. Stored clamped to `[-1, 1]`.
    Density = 0,
    /// Secondary attribute blended into rendering (material, biome).
    Environment = 1,
}

impl Layer {
    /// Both layers in storage order.
    pub const ALL: [Layer; 2] = [Layer::Density, Layer::Environment];

    /// Maps a raw layer index to a layer, `None` outside `{0, 1}`.
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Layer::Density),
            1 => Some(Layer::Environment),
            _ => None,
        }
    }

    /// Storage index of this layer.
    pub fn index(self) -> usize {
        self as usize
    }
}
