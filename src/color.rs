/// A 24-bit colour as the terminal receives it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const ALICE_BLUE: Rgb = Rgb::new(240, 248, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }
}

/// Fill and stroke colours handed to a render surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Color {
    Rgb(Rgb),
    /// Hue in degrees, saturation and lightness in percent.
    Hsl { hue: f32, saturation: f32, lightness: f32 },
}

impl Color {
    pub const ALICE_BLUE: Color = Color::Rgb(Rgb::ALICE_BLUE);

    pub fn hsl(hue: f32, saturation: f32, lightness: f32) -> Self {
        Color::Hsl { hue, saturation, lightness }
    }

    /// Out of range saturation and lightness are clamped, so a negative
    /// saturation renders as grey.
    pub fn to_rgb(self) -> Rgb {
        match self {
            Color::Rgb(rgb) => rgb,
            Color::Hsl { hue, saturation, lightness } => {
                let h = hue.rem_euclid(360.0) / 60.0;
                let s = saturation.max(0.0).min(100.0) / 100.0;
                let l = lightness.max(0.0).min(100.0) / 100.0;

                let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
                let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());
                let m = l - chroma / 2.0;

                let (r, g, b) = match h as u32 {
                    0 => (chroma, x, 0.0),
                    1 => (x, chroma, 0.0),
                    2 => (0.0, chroma, x),
                    3 => (0.0, x, chroma),
                    4 => (x, 0.0, chroma),
                    _ => (chroma, 0.0, x),
                };

                Rgb::new(channel(r + m), channel(g + m), channel(b + m))
            }
        }
    }
}

fn channel(value: f32) -> u8 {
    (value * 255.0).round().max(0.0).min(255.0) as u8
}
