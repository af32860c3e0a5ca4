//! Theme loading: btop-style `theme[key]="value"` and hex → ratatui Color.

use ratatui::style::Color;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Tiles 2, 4, ..., 2048, then one colour for everything above.
pub const TILE_COLORS: usize = 12;

const TILE_KEYS: [&str; TILE_COLORS] = [
    "tile_2", "tile_4", "tile_8", "tile_16", "tile_32", "tile_64", "tile_128", "tile_256",
    "tile_512", "tile_1024", "tile_2048", "tile_max",
];

const fn rgb(hex: u32) -> Color {
    Color::Rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
}

/// One Dark tile ladder: muted greys up to bright accents.
const ONEDARK_TILES: [Color; TILE_COLORS] = [
    rgb(0x5C6370),
    rgb(0xABB2BF),
    rgb(0xD19A66),
    rgb(0xE5C07B),
    rgb(0xE06C75),
    rgb(0xBE5046),
    rgb(0x98C379),
    rgb(0x56B6C2),
    rgb(0x61AFEF),
    rgb(0xC678DD),
    rgb(0xFFD75F),
    rgb(0xFFFFFF),
];

const HIGH_CONTRAST_TILES: [Color; TILE_COLORS] = [
    rgb(0xC0C0C0),
    rgb(0xFFFFFF),
    rgb(0xFFAA00),
    rgb(0xFF7700),
    rgb(0xFF0000),
    rgb(0xFF00FF),
    rgb(0x00FF00),
    rgb(0x00FFFF),
    rgb(0x0088FF),
    rgb(0xAA55FF),
    rgb(0xFFFF00),
    rgb(0xFFFFFF),
];

/// Blue/orange dominated ladder; avoids relying on red vs green.
const COLORBLIND_TILES: [Color; TILE_COLORS] = [
    rgb(0xBBBBBB),
    rgb(0x88CCEE),
    rgb(0x33BBEE),
    rgb(0x0077BB),
    rgb(0xEE7733),
    rgb(0xCC3311),
    rgb(0x009988),
    rgb(0xEE3377),
    rgb(0xDDCC77),
    rgb(0xAA4499),
    rgb(0xFFFFFF),
    rgb(0xBBBB00),
];

#[derive(Debug, Clone)]
pub struct Theme {
    /// Tile background per power of two, see [`TILE_COLORS`].
    pub tiles: [Color; TILE_COLORS],
    /// Screen background; also the text colour on tiles.
    pub bg: Color,
    /// Background of an empty cell.
    pub cell_bg: Color,
    /// Board border.
    pub div_line: Color,
    /// Text (score, status).
    pub main_fg: Color,
    /// Highlight / titles.
    pub title: Color,
    /// Key help.
    pub inactive_fg: Color,
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

impl Default for Theme {
    fn default() -> Self {
        Self::onedark_default()
    }
}

impl Theme {
    pub fn onedark_default() -> Self {
        Self {
            tiles: ONEDARK_TILES,
            bg: rgb(0x282C34),
            cell_bg: rgb(0x31353F),
            div_line: rgb(0x3F444F),
            main_fg: rgb(0xABB2BF),
            title: rgb(0xE5C07B),
            inactive_fg: rgb(0x5C6370),
        }
    }

    /// Load theme from a btop-style file: `theme[key]="value"` or `theme[key]='value'`.
    /// Falls back to One Dark defaults if path is None or file is missing.
    /// `palette` replaces the tile ladder unless it is `Normal`.
    pub fn load(path: Option<&Path>, palette: crate::Palette) -> Result<Self, ThemeError> {
        let mut theme = match path {
            Some(p) if p.exists() => {
                let s = std::fs::read_to_string(p)?;
                Self::from_map(&parse_theme_file(&s))?
            }
            _ => Self::onedark_default(),
        };
        theme.apply_palette(palette);
        Ok(theme)
    }

    pub fn apply_palette(&mut self, palette: crate::Palette) {
        match palette {
            crate::Palette::Normal => {}
            crate::Palette::HighContrast => {
                self.tiles = HIGH_CONTRAST_TILES;
                self.bg = Color::Black;
                self.main_fg = Color::White;
            }
            crate::Palette::Colorblind => self.tiles = COLORBLIND_TILES,
        }
    }

    /// Missing keys keep the One Dark value; malformed hex is an error.
    fn from_map(map: &HashMap<String, String>) -> Result<Self, ThemeError> {
        let mut theme = Self::onedark_default();
        let set = |key: &str, slot: &mut Color| -> Result<(), ThemeError> {
            if let Some(v) = map.get(key) {
                *slot = parse_hex(v)?;
            }
            Ok(())
        };
        for (key, slot) in TILE_KEYS.into_iter().zip(theme.tiles.iter_mut()) {
            set(key, slot)?;
        }
        set("main_bg", &mut theme.bg)?;
        set("cell_bg", &mut theme.cell_bg)?;
        set("div_line", &mut theme.div_line)?;
        set("main_fg", &mut theme.main_fg)?;
        set("title", &mut theme.title)?;
        set("inactive_fg", &mut theme.inactive_fg)?;
        Ok(theme)
    }

    /// Background for a tile value; empty cells get `cell_bg`.
    pub fn tile_color(&self, value: u32) -> Color {
        if value < 2 {
            return self.cell_bg;
        }
        let index = (value.ilog2() as usize).saturating_sub(1);
        self.tiles[index.min(TILE_COLORS - 1)]
    }
}

/// Parse btop-style theme file into key -> value map.
fn parse_theme_file(s: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in s.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some(stripped) = line.strip_prefix("theme[") else {
            continue;
        };
        let Some(end) = stripped.find(']') else {
            continue;
        };
        let key = stripped[..end].trim();
        let rest = stripped[end + 1..].trim();
        if let Some(value) = rest.strip_prefix('=') {
            let value = value.trim().trim_matches('"').trim_matches('\'');
            if !value.is_empty() {
                map.insert(key.to_string(), value.to_string());
            }
        }
    }
    map
}

/// Parse hex colour "#RRGGBB" or "#RGB" into ratatui Color.
pub fn parse_hex(s: &str) -> Result<Color, ThemeError> {
    let s = s.trim().trim_start_matches('#');
    let invalid = || ThemeError::InvalidHex(s.to_string());
    if !s.is_ascii() {
        return Err(invalid());
    }
    let channel = |range: std::ops::Range<usize>, scale: u8| {
        u8::from_str_radix(&s[range], 16)
            .map(|v| v * scale)
            .map_err(|_| invalid())
    };
    let (r, g, b) = match s.len() {
        6 => (channel(0..2, 1)?, channel(2..4, 1)?, channel(4..6, 1)?),
        3 => (channel(0..1, 17)?, channel(1..2, 17)?, channel(2..3, 17)?),
        _ => return Err(invalid()),
    };
    Ok(Color::Rgb(r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_6() {
        let c = parse_hex("#98C379").unwrap();
        assert!(matches!(c, Color::Rgb(0x98, 0xC3, 0x79)));
    }

    #[test]
    fn test_parse_hex_3() {
        let c = parse_hex("#FFF").unwrap();
        assert!(matches!(c, Color::Rgb(255, 255, 255)));
    }

    #[test]
    fn test_parse_hex_rejects_garbage() {
        assert!(parse_hex("#12345").is_err());
        assert!(parse_hex("#GGHHII").is_err());
    }

    #[test]
    fn test_parse_theme_line() {
        let map = parse_theme_file(r##"theme[tile_8]="#31353F""##);
        assert_eq!(map.get("tile_8"), Some(&"#31353F".to_string()));
    }

    #[test]
    fn test_from_map_overrides_only_given_keys() {
        let map = parse_theme_file("theme[tile_2]='#010203'\n# comment\ntheme[title]=\"#FFF\"");
        let theme = Theme::from_map(&map).unwrap();
        assert_eq!(theme.tiles[0], Color::Rgb(1, 2, 3));
        assert_eq!(theme.title, Color::Rgb(255, 255, 255));
        assert_eq!(theme.tiles[1], ONEDARK_TILES[1]);
    }

    #[test]
    fn test_tile_color_ladder() {
        let theme = Theme::default();
        assert_eq!(theme.tile_color(0), theme.cell_bg);
        assert_eq!(theme.tile_color(2), ONEDARK_TILES[0]);
        assert_eq!(theme.tile_color(2048), ONEDARK_TILES[10]);
        assert_eq!(theme.tile_color(8192), ONEDARK_TILES[11]);
    }

    #[test]
    fn test_palette_swaps_tiles() {
        let mut theme = Theme::default();
        theme.apply_palette(crate::Palette::Colorblind);
        assert_eq!(theme.tiles, COLORBLIND_TILES);
    }
}
