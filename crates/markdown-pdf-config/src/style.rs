use std::fmt;
use std::str::FromStr;

/// Visual parameters for every render block variant.
#[derive(Clone, Debug, PartialEq)]
pub struct StyleConfig {
    pub heading1: HeadingStyle,
    pub heading2: HeadingStyle,
    pub heading3: HeadingStyle,
    pub paragraph: ParagraphStyle,
    pub list: ListStyle,
    pub spacer_height: f32,
}

impl StyleConfig {
    /// Style for a heading of `depth` 1–3. Deeper values use the level-3 style.
    pub fn heading(&self, depth: u8) -> &HeadingStyle {
        match depth {
            0 | 1 => &self.heading1,
            2 => &self.heading2,
            _ => &self.heading3,
        }
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        StyleConfig {
            heading1: HeadingStyle {
                font_size: 20.0,
                color: Rgb::new(0x1F, 0x29, 0x37),
                space_before: 0.0,
                space_after: 10.0,
            },
            heading2: HeadingStyle {
                font_size: 14.0,
                color: Rgb::new(0x11, 0x18, 0x27),
                space_before: 12.0,
                space_after: 6.0,
            },
            heading3: HeadingStyle {
                font_size: 12.0,
                color: Rgb::new(0x37, 0x41, 0x51),
                space_before: 6.0,
                space_after: 4.0,
            },
            paragraph: ParagraphStyle {
                font_size: 10.5,
                line_height: 14.0,
                space_after: 4.0,
            },
            list: ListStyle { indent: 18.0 },
            spacer_height: 6.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeadingStyle {
    pub font_size: f32,
    pub color: Rgb,
    pub space_before: f32,
    pub space_after: f32,
}

/// Body text style, shared by paragraphs and list items.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParagraphStyle {
    pub font_size: f32,
    pub line_height: f32,
    pub space_after: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ListStyle {
    /// Distance from the left margin to the item text; the bullet sits inside it.
    pub indent: f32,
}

/// 24-bit colour parsed from `#RRGGBB` or `#RGB`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// Channels scaled to `0.0..=1.0`.
    pub fn to_unit(self) -> [f32; 3] {
        [
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
        ]
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let hex = value.trim().strip_prefix('#').ok_or(())?;
        if !hex.chars().all(|ch| ch.is_ascii_hexdigit()) {
            return Err(());
        }

        let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| ());
        match hex.len() {
            6 => Ok(Rgb::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            3 => {
                let expand = |idx: usize| channel(&hex[idx..=idx]).map(|v| v * 17);
                Ok(Rgb::new(expand(0)?, expand(1)?, expand(2)?))
            }
            _ => Err(()),
        }
    }
}

/// Page geometry handed to the renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageSettings {
    pub size: PageSize,
    pub margins: Margins,
}

impl PageSettings {
    pub fn width(&self) -> f32 {
        self.size.dimensions().0
    }

    pub fn height(&self) -> f32 {
        self.size.dimensions().1
    }

    pub fn content_width(&self) -> f32 {
        self.width() - self.margins.left - self.margins.right
    }

    pub fn content_height(&self) -> f32 {
        self.height() - self.margins.top - self.margins.bottom
    }
}

impl Default for PageSettings {
    fn default() -> Self {
        PageSettings {
            size: PageSize::A4,
            margins: Margins::uniform(40.0),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PageSize {
    A4,
    Letter,
}

impl PageSize {
    /// Width and height in points.
    pub fn dimensions(self) -> (f32, f32) {
        match self {
            PageSize::A4 => (595.2756, 841.8898),
            PageSize::Letter => (612.0, 792.0),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PageSize::A4 => "a4",
            PageSize::Letter => "letter",
        }
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PageSize {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "a4" => Ok(PageSize::A4),
            "letter" => Ok(PageSize::Letter),
            _ => Err(()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Margins {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

impl Margins {
    pub fn uniform(value: f32) -> Self {
        Margins {
            top: value,
            bottom: value,
            left: value,
            right: value,
        }
    }
}
