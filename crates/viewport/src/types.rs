use std::fmt;

/// Linear RGBA colour with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque grey with all colour components set to `value`.
    pub const fn grey(value: f32) -> Self {
        Self::new(value, value, value, 1.0)
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Parses `#rrggbb` or `#rrggbbaa` (the leading `#` is optional).
    pub fn from_hex(value: &str) -> Option<Self> {
        let digits = value.trim().trim_start_matches('#');
        if !matches!(digits.len(), 6 | 8) || !digits.is_ascii() {
            return None;
        }
        let channel = |index: usize| {
            u8::from_str_radix(&digits[index * 2..index * 2 + 2], 16)
                .ok()
                .map(|byte| byte as f32 / 255.0)
        };
        let alpha = if digits.len() == 8 { channel(3)? } else { 1.0 };
        Some(Self::new(channel(0)?, channel(1)?, channel(2)?, alpha))
    }
}

impl From<[f32; 4]> for Rgba {
    fn from(value: [f32; 4]) -> Self {
        Self::new(value[0], value[1], value[2], value[3])
    }
}

/// Default checkerboard tiles.
pub const CHECKER_DARK: Rgba = Rgba::grey(0.65);
pub const CHECKER_LIGHT: Rgba = Rgba::grey(0.90);

/// Side length, in framebuffer pixels, of one checkerboard tile.
pub const CHECKER_TILE_SIZE: f32 = 64.0;

/// What the background pass paints behind the image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Background {
    Checkerboard { color1: Rgba, color2: Rgba },
    /// Host-chosen colours; equal colours give a flat fill.
    Solid { color1: Rgba, color2: Rgba },
}

impl Background {
    /// Resolves the request made by the host.
    ///
    /// Checkerboard mode always uses the default tile colours; otherwise both
    /// colours are kept as passed.
    pub fn from_request(checkerboard: bool, color1: Rgba, color2: Rgba) -> Self {
        if checkerboard {
            Self::default()
        } else {
            Self::Solid { color1, color2 }
        }
    }

    /// The two colours handed to the background program.
    pub fn colors(&self) -> (Rgba, Rgba) {
        match *self {
            Self::Checkerboard { color1, color2 } | Self::Solid { color1, color2 } => {
                (color1, color2)
            }
        }
    }

    pub fn is_checkerboard(&self) -> bool {
        matches!(self, Self::Checkerboard { .. })
    }
}

impl Default for Background {
    fn default() -> Self {
        Self::Checkerboard {
            color1: CHECKER_DARK,
            color2: CHECKER_LIGHT,
        }
    }
}

/// One of the four texel channels that can be shown or isolated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Red,
    Green,
    Blue,
    Alpha,
}

impl Channel {
    pub const ALL: [Channel; 4] = [Channel::Red, Channel::Green, Channel::Blue, Channel::Alpha];
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Channel::Red => "R",
            Channel::Green => "G",
            Channel::Blue => "B",
            Channel::Alpha => "A",
        })
    }
}

/// Per-channel visibility flags.
///
/// `alpha` is a weight rather than a flag: the UI only ever sets `0.0` or
/// `1.0`, but the compositor is defined for any value in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelMask {
    pub red: bool,
    pub green: bool,
    pub blue: bool,
    pub alpha: f32,
}

impl ChannelMask {
    pub fn new(red: bool, green: bool, blue: bool, alpha: bool) -> Self {
        Self {
            red,
            green,
            blue,
            alpha: if alpha { 1.0 } else { 0.0 },
        }
    }

    pub fn shows_alpha(&self) -> bool {
        self.alpha != 0.0
    }
}

impl Default for ChannelMask {
    /// Colour channels on, alpha off.
    fn default() -> Self {
        Self::new(true, true, true, false)
    }
}

/// 4x4 transform applied to every sampled texel.
///
/// Stored row-major: output channel `j` is `sum_i texel[i] * rows[i][j]`,
/// i.e. the texel is treated as a row vector multiplied by the matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelMatrix {
    pub rows: [[f32; 4]; 4],
}

impl ChannelMatrix {
    pub const ZERO: Self = Self { rows: [[0.0; 4]; 4] };

    pub fn diagonal(values: [f32; 4]) -> Self {
        let mut rows = [[0.0; 4]; 4];
        for (index, value) in values.into_iter().enumerate() {
            rows[index][index] = value;
        }
        Self { rows }
    }

    /// Applies the matrix to a texel, mirroring the fragment program including
    /// its alpha compensation term.
    pub fn apply(&self, texel: [f32; 4]) -> [f32; 4] {
        let mut out = [0.0; 4];
        for (j, slot) in out.iter_mut().enumerate() {
            *slot = (0..4).map(|i| texel[i] * self.rows[i][j]).sum();
        }
        out[3] += 1.0 - self.rows[3][3];
        out
    }

    /// The sixteen floats in the order the GPU programs expect.
    pub fn to_gpu(&self) -> [[f32; 4]; 4] {
        self.rows
    }
}

impl Default for ChannelMatrix {
    fn default() -> Self {
        Self::diagonal([1.0, 1.0, 1.0, 0.0])
    }
}

/// Anisotropic multipliers applied to the unit quad's half extents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    pub x: f32,
    pub y: f32,
}

impl Scale {
    pub const ONE: Self = Self { x: 1.0, y: 1.0 };

    pub fn to_array(self) -> [f32; 2] {
        [self.x, self.y]
    }
}

/// Quad vertex: position followed by texture coordinate.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

/// Decoded raster ready for upload: `width * height * 4` bytes of RGBA8,
/// row-major, top row first, no row padding.
#[derive(Clone, PartialEq, Eq)]
pub struct DecodedImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl DecodedImage {
    /// Wraps a pixel buffer, returning `None` when the buffer length does not
    /// match the dimensions or either dimension is zero.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(4)?;
        if width == 0 || height == 0 || pixels.len() != expected {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    /// Takes ownership of an already-decoded RGBA8 buffer.
    pub fn from_rgba(image: image::RgbaImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
            pixels: image.into_raw(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

impl fmt::Debug for DecodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.pixels.len())
            .finish()
    }
}

/// Read-only description of the GPU the viewport renders with.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GpuDiagnostics {
    pub vendor: String,
    pub renderer: String,
    pub api_version: String,
    pub shader_version: String,
}

impl fmt::Display for GpuDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Vendor: {}", self.vendor)?;
        writeln!(f, "Renderer: {}", self.renderer)?;
        writeln!(f, "API Version: {}", self.api_version)?;
        write!(f, "Shader Version: {}", self.shader_version)
    }
}
