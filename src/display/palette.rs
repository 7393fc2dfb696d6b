use crate::options::{Color, Options};

use super::DisplayError;

/// Four display colors indexed by `plane0 + 2 * plane1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    colors: [Color; 4],
}

impl Palette {
    /// Background, primary fill, secondary fill, blend.
    pub const fn new(colors: [Color; 4]) -> Self {
        Self { colors }
    }

    pub fn from_options(options: &Options) -> Self {
        Self::new([
            options.background_color,
            options.fill_color,
            options.fill_color2,
            options.blend_color,
        ])
    }

    pub fn background(&self) -> Color {
        self.colors[0]
    }

    pub fn color(&self, index: u16) -> Result<Color, DisplayError> {
        self.colors
            .get(index as usize)
            .copied()
            .ok_or(DisplayError::InvalidColor(index))
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::from_options(&Options::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_follows_option_order() {
        let options = Options::default();
        let palette = Palette::from_options(&options);
        assert_eq!(palette.color(0).unwrap(), options.background_color);
        assert_eq!(palette.color(1).unwrap(), options.fill_color);
        assert_eq!(palette.color(2).unwrap(), options.fill_color2);
        assert_eq!(palette.color(3).unwrap(), options.blend_color);
    }

    #[test]
    fn index_past_blend_is_rejected() {
        let palette = Palette::default();
        assert_eq!(
            palette.color(4),
            Err(DisplayError::InvalidColor(4))
        );
        assert_eq!(
            palette.color(256),
            Err(DisplayError::InvalidColor(256))
        );
    }
}
