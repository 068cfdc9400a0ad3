use super::PackedColor;

/// Sepia weights, one row per output channel, columns in (r, g, b) order.
const SEPIA_WEIGHTS: [[f64; 3]; 3] = [
    [0.393, 0.769, 0.189],
    [0.349, 0.686, 0.168],
    [0.272, 0.534, 0.131],
];

/// The fixed set of per-pixel color filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKind {
    Grayscale,
    Sepia,
    Invert,
}

impl FilterKind {
    pub const ALL: [Self; 3] = [Self::Grayscale, Self::Sepia, Self::Invert];

    /// Map one color through the filter. Pure and total over all packed colors.
    pub fn apply(self, color: PackedColor) -> PackedColor {
        match self {
            Self::Grayscale => grayscale(color),
            Self::Sepia => sepia(color),
            Self::Invert => invert(color),
        }
    }

    /// Button caption.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Grayscale => "Black and White",
            Self::Sepia => "Sepia",
            Self::Invert => "Invert",
        }
    }

    /// Stable lowercase name used in logs.
    pub const fn id(self) -> &'static str {
        match self {
            Self::Grayscale => "grayscale",
            Self::Sepia => "sepia",
            Self::Invert => "invert",
        }
    }
}

fn grayscale(color: PackedColor) -> PackedColor {
    let [r, g, b] = color.channels();
    let sum = u16::from(r) + u16::from(g) + u16::from(b);
    // sum / 3 never exceeds 255.
    let average = u8::try_from(sum / 3).unwrap_or(u8::MAX);
    PackedColor::from_rgb(average, average, average)
}

fn sepia(color: PackedColor) -> PackedColor {
    let [r, g, b] = color.channels().map(f64::from);
    let [red, green, blue] =
        SEPIA_WEIGHTS.map(|[wr, wg, wb]| truncate_channel(wr * r + wg * g + wb * b));
    PackedColor::from_rgb(red, green, blue)
}

fn invert(color: PackedColor) -> PackedColor {
    let [r, g, b] = color.channels();
    PackedColor::from_rgb(u8::MAX - r, u8::MAX - g, u8::MAX - b)
}

/// Clamp to 255 and drop the fraction (truncation, not rounding).
fn truncate_channel(value: f64) -> u8 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    {
        value.min(f64::from(u8::MAX)) as u8
    }
}
