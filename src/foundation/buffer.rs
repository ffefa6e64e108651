use crate::foundation::error::{CisError, CisResult};

/// An RGB color with components in the `0..=255` range.
pub type Rgb = [f32; 3];

/// Width and height of a canvas, layer, or buffer, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Dims {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Dims {
    /// Construct dimensions, requiring both sides to be at least 1.
    pub fn new(width: u32, height: u32) -> CisResult<Self> {
        if width == 0 || height == 0 {
            return Err(CisError::validation("dims must be at least 1x1"));
        }
        Ok(Self { width, height })
    }

    /// Total number of pixels.
    pub fn pixel_count(self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Position of a layer's lower-valued corner within the canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Offset {
    /// Horizontal offset in pixels.
    pub x: u32,
    /// Vertical offset in pixels.
    pub y: u32,
}

/// A flat, row-major pixel buffer with a fixed component count per pixel.
///
/// All engine math is `f32`; 8-bit color buffers are widened on ingest and
/// keep the `0..=255` range. Scalar buffers (depth, raw values) use one
/// component, RGB color and luminance buffers use three.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelBuffer {
    dims: Dims,
    components: usize,
    data: Vec<f32>,
}

impl PixelBuffer {
    /// Wrap existing data, validating that its length matches the shape.
    pub fn new(dims: Dims, components: usize, data: Vec<f32>) -> CisResult<Self> {
        if components == 0 {
            return Err(CisError::validation("buffer components must be > 0"));
        }
        let expected = dims.pixel_count() * components;
        if data.len() != expected {
            return Err(CisError::validation(format!(
                "buffer data length {} does not match {}x{}x{}",
                data.len(),
                dims.width,
                dims.height,
                components
            )));
        }
        Ok(Self {
            dims,
            components,
            data,
        })
    }

    /// A buffer with every component set to `fill`.
    pub fn filled(dims: Dims, components: usize, fill: f32) -> Self {
        Self {
            dims,
            components,
            data: vec![fill; dims.pixel_count() * components],
        }
    }

    /// A buffer with every component set to zero.
    pub fn zeroed(dims: Dims, components: usize) -> Self {
        Self::filled(dims, components, 0.0)
    }

    /// Buffer dimensions.
    pub fn dims(&self) -> Dims {
        self.dims
    }

    /// Components per pixel.
    pub fn components(&self) -> usize {
        self.components
    }

    /// Number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.dims.pixel_count()
    }

    /// Raw component data, row-major.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Mutable raw component data, row-major.
    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// One component of one pixel, by linear pixel index.
    pub fn comp(&self, pixel: usize, c: usize) -> f32 {
        self.data[pixel * self.components + c]
    }

    /// Set one component of one pixel, by linear pixel index.
    pub fn set_comp(&mut self, pixel: usize, c: usize, v: f32) {
        self.data[pixel * self.components + c] = v;
    }

    /// All components of one pixel, by linear pixel index.
    pub fn pixel(&self, pixel: usize) -> &[f32] {
        let start = pixel * self.components;
        &self.data[start..start + self.components]
    }

    /// Mutable components of one pixel, by linear pixel index.
    pub fn pixel_mut(&mut self, pixel: usize) -> &mut [f32] {
        let start = pixel * self.components;
        &mut self.data[start..start + self.components]
    }

    /// Largest component value, or `None` for an empty buffer.
    pub fn max_component(&self) -> Option<f32> {
        if self.data.is_empty() {
            return None;
        }
        Some(self.data.iter().fold(f32::NEG_INFINITY, |a, &b| a.max(b)))
    }

    /// Smallest component value, or `None` for an empty buffer.
    pub fn min_component(&self) -> Option<f32> {
        if self.data.is_empty() {
            return None;
        }
        Some(self.data.iter().fold(f32::INFINITY, |a, &b| a.min(b)))
    }

    /// `true` when the other buffer has identical dims and components.
    pub fn same_shape(&self, other: &PixelBuffer) -> bool {
        self.dims == other.dims && self.components == other.components
    }
}
