//! CSS color values
//!
//! Parsing and classification of CSS colors. The engine resolves every color
//! to straight-alpha RGBA; highlight color channels are serialized back to
//! `rgb()`/`rgba()` strings when written to custom properties.

use std::fmt;

/// An RGBA color with 8-bit channels and fractional alpha
///
/// # Examples
///
/// ```
/// use overmark::style::Rgba;
///
/// let violet = Rgba::new(122, 89, 255, 0.08);
/// assert_eq!(violet.r, 122);
/// assert!(!violet.is_opaque());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
  /// Red component (0-255)
  pub r: u8,
  /// Green component (0-255)
  pub g: u8,
  /// Blue component (0-255)
  pub b: u8,
  /// Alpha component (0.0-1.0)
  pub a: f32,
}

impl Rgba {
  /// Fully transparent black
  pub const TRANSPARENT: Self = Self {
    r: 0,
    g: 0,
    b: 0,
    a: 0.0,
  };

  /// Opaque black
  pub const BLACK: Self = Self {
    r: 0,
    g: 0,
    b: 0,
    a: 1.0,
  };

  /// Opaque white
  pub const WHITE: Self = Self {
    r: 255,
    g: 255,
    b: 255,
    a: 1.0,
  };

  /// Creates a new RGBA color
  ///
  /// # Arguments
  /// * `r` - Red component (0-255)
  /// * `g` - Green component (0-255)
  /// * `b` - Blue component (0-255)
  /// * `a` - Alpha component (0.0-1.0)
  pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
    Self { r, g, b, a }
  }

  /// Creates an opaque RGB color (alpha = 1.0)
  ///
  /// # Examples
  ///
  /// ```
  /// use overmark::style::Rgba;
  ///
  /// let purple = Rgba::rgb(128, 0, 128);
  /// assert_eq!(purple.a, 1.0);
  /// ```
  pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
    Self { r, g, b, a: 1.0 }
  }

  /// Returns true if the color is fully transparent
  pub fn is_transparent(self) -> bool {
    self.a == 0.0
  }

  /// Returns true if the color is fully opaque
  pub fn is_opaque(self) -> bool {
    self.a == 1.0
  }

  /// Returns a new color with the given alpha value
  pub fn with_alpha(self, alpha: f32) -> Self {
    Self {
      r: self.r,
      g: self.g,
      b: self.b,
      a: alpha.clamp(0.0, 1.0),
    }
  }

  /// Converts to an array [r, g, b, a] for rendering
  pub fn to_array(self) -> [u8; 4] {
    [self.r, self.g, self.b, (self.a * 255.0) as u8]
  }

  /// WCAG 2.x relative luminance, ignoring alpha.
  ///
  /// Channels are linearized with the sRGB transfer curve and weighted
  /// 0.2126 / 0.7152 / 0.0722.
  ///
  /// # Examples
  ///
  /// ```
  /// use overmark::style::Rgba;
  ///
  /// assert_eq!(Rgba::BLACK.relative_luminance(), 0.0);
  /// assert!((Rgba::WHITE.relative_luminance() - 1.0).abs() < 1e-5);
  /// ```
  pub fn relative_luminance(self) -> f32 {
    fn linearize(channel: u8) -> f32 {
      let c = channel as f32 / 255.0;
      if c <= 0.03928 {
        c / 12.92
      } else {
        ((c + 0.055) / 1.055).powf(2.4)
      }
    }
    0.2126 * linearize(self.r) + 0.7152 * linearize(self.g) + 0.0722 * linearize(self.b)
  }

  /// Classifies text painted in this color as dark or light.
  ///
  /// Dark text sits on light backgrounds, so highlights behind it use the
  /// higher-alpha color variants.
  pub fn is_dark(self) -> bool {
    self.relative_luminance() < 0.5
  }

  /// Parse a color from a CSS color string
  ///
  /// Supports:
  /// - Hex: #RGB, #RRGGBB, #RGBA, #RRGGBBAA
  /// - RGB: rgb(r, g, b), rgba(r, g, b, a)
  /// - HSL: hsl(h, s%, l%), hsla(h, s%, l%, a)
  /// - Named colors: the CSS basic keywords plus common extended names
  /// - Special: transparent
  ///
  /// # Examples
  ///
  /// ```
  /// use overmark::style::Rgba;
  ///
  /// assert!(Rgba::parse("#ff0000").is_ok());
  /// assert!(Rgba::parse("rgba(122, 89, 255, 0.08)").is_ok());
  /// assert!(Rgba::parse("red").is_ok());
  /// assert!(Rgba::parse("transparent").is_ok());
  /// ```
  pub fn parse(s: &str) -> Result<Self, ColorParseError> {
    let s = s.trim();

    if s.eq_ignore_ascii_case("transparent") {
      return Ok(Rgba::TRANSPARENT);
    }

    if s.starts_with('#') {
      return parse_hex(s);
    }

    if s.starts_with("rgb(") || s.starts_with("rgba(") {
      return parse_rgb(s);
    }

    if s.starts_with("hsl(") || s.starts_with("hsla(") {
      return parse_hsl(s);
    }

    if let Some(rgba) = parse_named_color(s) {
      return Ok(rgba);
    }

    Err(ColorParseError::InvalidFormat(s.to_string()))
  }
}

impl fmt::Display for Rgba {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.a == 1.0 {
      write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    } else {
      write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
  }
}

/// Parse error for color strings
#[derive(Debug, Clone, PartialEq)]
pub enum ColorParseError {
  InvalidFormat(String),
  InvalidHex(String),
  InvalidComponent(String),
}

impl fmt::Display for ColorParseError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ColorParseError::InvalidFormat(s) => write!(f, "Invalid color format: {}", s),
      ColorParseError::InvalidHex(s) => write!(f, "Invalid hex color: {}", s),
      ColorParseError::InvalidComponent(s) => write!(f, "Invalid color component: {}", s),
    }
  }
}

impl std::error::Error for ColorParseError {}

/// Parse hex color (#RGB, #RRGGBB, #RGBA, #RRGGBBAA)
fn parse_hex(s: &str) -> Result<Rgba, ColorParseError> {
  let hex = &s[1..];
  if !hex.is_ascii() {
    return Err(ColorParseError::InvalidHex(s.to_string()));
  }

  let channel = |range: std::ops::Range<usize>, widen: bool| -> Result<u8, ColorParseError> {
    let raw = &hex[range];
    let doubled;
    let digits = if widen {
      doubled = raw.repeat(2);
      doubled.as_str()
    } else {
      raw
    };
    u8::from_str_radix(digits, 16).map_err(|_| ColorParseError::InvalidHex(s.to_string()))
  };

  let (r, g, b, a) = match hex.len() {
    3 => (channel(0..1, true)?, channel(1..2, true)?, channel(2..3, true)?, 1.0),
    4 => (
      channel(0..1, true)?,
      channel(1..2, true)?,
      channel(2..3, true)?,
      channel(3..4, true)? as f32 / 255.0,
    ),
    6 => (channel(0..2, false)?, channel(2..4, false)?, channel(4..6, false)?, 1.0),
    8 => (
      channel(0..2, false)?,
      channel(2..4, false)?,
      channel(4..6, false)?,
      channel(6..8, false)? as f32 / 255.0,
    ),
    _ => return Err(ColorParseError::InvalidHex(s.to_string())),
  };

  Ok(Rgba::new(r, g, b, a))
}

/// Parse rgb() or rgba() function
fn parse_rgb(s: &str) -> Result<Rgba, ColorParseError> {
  let is_rgba = s.starts_with("rgba");
  let start = if is_rgba { 5 } else { 4 };

  let end = s
    .find(')')
    .ok_or_else(|| ColorParseError::InvalidFormat(s.to_string()))?;
  let inner = &s[start..end];

  let parts: Vec<&str> = inner.split(',').map(|s| s.trim()).collect();

  if parts.len() < 3 || (is_rgba && parts.len() < 4) {
    return Err(ColorParseError::InvalidFormat(s.to_string()));
  }

  let r = parse_color_component(parts[0])?;
  let g = parse_color_component(parts[1])?;
  let b = parse_color_component(parts[2])?;
  let a = if parts.len() >= 4 {
    parts[3]
      .parse::<f32>()
      .map_err(|_| ColorParseError::InvalidComponent(parts[3].to_string()))?
  } else {
    1.0
  };

  Ok(Rgba::new(r, g, b, a.clamp(0.0, 1.0)))
}

/// Parse hsl() or hsla() function, resolving straight to RGBA
fn parse_hsl(s: &str) -> Result<Rgba, ColorParseError> {
  let is_hsla = s.starts_with("hsla");
  let start = if is_hsla { 5 } else { 4 };

  let end = s
    .find(')')
    .ok_or_else(|| ColorParseError::InvalidFormat(s.to_string()))?;
  let inner = &s[start..end];

  let parts: Vec<&str> = inner.split(',').map(|s| s.trim()).collect();

  if parts.len() < 3 || (is_hsla && parts.len() < 4) {
    return Err(ColorParseError::InvalidFormat(s.to_string()));
  }

  let h = parts[0]
    .parse::<f32>()
    .map_err(|_| ColorParseError::InvalidComponent(parts[0].to_string()))?;
  let sat = parse_percentage(parts[1])? / 100.0;
  let l = parse_percentage(parts[2])? / 100.0;
  let a = if parts.len() >= 4 {
    parts[3]
      .parse::<f32>()
      .map_err(|_| ColorParseError::InvalidComponent(parts[3].to_string()))?
  } else {
    1.0
  };

  Ok(hsl_to_rgba(h, sat, l, a.clamp(0.0, 1.0)))
}

/// HSL to RGB per CSS Color Module Level 3
fn hsl_to_rgba(h: f32, s: f32, l: f32, a: f32) -> Rgba {
  if s == 0.0 {
    let gray = (l * 255.0).round() as u8;
    return Rgba::new(gray, gray, gray, a);
  }

  let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
  let p = 2.0 * l - q;
  let h = (h.rem_euclid(360.0)) / 360.0;

  let r = hue_to_rgb(p, q, h + 1.0 / 3.0);
  let g = hue_to_rgb(p, q, h);
  let b = hue_to_rgb(p, q, h - 1.0 / 3.0);

  Rgba::new(
    (r * 255.0).round() as u8,
    (g * 255.0).round() as u8,
    (b * 255.0).round() as u8,
    a,
  )
}

fn hue_to_rgb(p: f32, q: f32, mut t: f32) -> f32 {
  if t < 0.0 {
    t += 1.0;
  }
  if t > 1.0 {
    t -= 1.0;
  }
  if t < 1.0 / 6.0 {
    p + (q - p) * 6.0 * t
  } else if t < 1.0 / 2.0 {
    q
  } else if t < 2.0 / 3.0 {
    p + (q - p) * (2.0 / 3.0 - t) * 6.0
  } else {
    p
  }
}

/// Parse color component (0-255 or 0-100%)
fn parse_color_component(s: &str) -> Result<u8, ColorParseError> {
  if let Some(percent_str) = s.strip_suffix('%') {
    let percent = percent_str
      .parse::<f32>()
      .map_err(|_| ColorParseError::InvalidComponent(s.to_string()))?;
    Ok((percent / 100.0 * 255.0).round() as u8)
  } else {
    s.parse::<u8>()
      .map_err(|_| ColorParseError::InvalidComponent(s.to_string()))
  }
}

/// Parse percentage (0-100%)
fn parse_percentage(s: &str) -> Result<f32, ColorParseError> {
  let percent_str = s
    .strip_suffix('%')
    .ok_or_else(|| ColorParseError::InvalidComponent(s.to_string()))?;
  percent_str
    .parse::<f32>()
    .map_err(|_| ColorParseError::InvalidComponent(s.to_string()))
}

/// Parse named color: the CSS basic keywords plus common extended names
fn parse_named_color(s: &str) -> Option<Rgba> {
  let lower = s.to_lowercase();
  match lower.as_str() {
    "aqua" => Some(Rgba::rgb(0, 255, 255)),
    "black" => Some(Rgba::BLACK),
    "blue" => Some(Rgba::rgb(0, 0, 255)),
    "brown" => Some(Rgba::rgb(165, 42, 42)),
    "cyan" => Some(Rgba::rgb(0, 255, 255)),
    "fuchsia" => Some(Rgba::rgb(255, 0, 255)),
    "gold" => Some(Rgba::rgb(255, 215, 0)),
    "gray" => Some(Rgba::rgb(128, 128, 128)),
    "green" => Some(Rgba::rgb(0, 128, 0)),
    "grey" => Some(Rgba::rgb(128, 128, 128)),
    "indigo" => Some(Rgba::rgb(75, 0, 130)),
    "lime" => Some(Rgba::rgb(0, 255, 0)),
    "magenta" => Some(Rgba::rgb(255, 0, 255)),
    "maroon" => Some(Rgba::rgb(128, 0, 0)),
    "navy" => Some(Rgba::rgb(0, 0, 128)),
    "olive" => Some(Rgba::rgb(128, 128, 0)),
    "orange" => Some(Rgba::rgb(255, 165, 0)),
    "pink" => Some(Rgba::rgb(255, 192, 203)),
    "purple" => Some(Rgba::rgb(128, 0, 128)),
    "rebeccapurple" => Some(Rgba::rgb(102, 51, 153)),
    "red" => Some(Rgba::rgb(255, 0, 0)),
    "silver" => Some(Rgba::rgb(192, 192, 192)),
    "teal" => Some(Rgba::rgb(0, 128, 128)),
    "violet" => Some(Rgba::rgb(238, 130, 238)),
    "white" => Some(Rgba::WHITE),
    "yellow" => Some(Rgba::rgb(255, 255, 0)),
    _ => None,
  }
}
