//! Colour name lookup used by the named paint actions.

use crate::PaintColor;

static STANDARD_COLORS: [(&str, PaintColor); 11] = [
    ("black", PaintColor::from_rgb(0, 0, 0)),
    ("blue", PaintColor::from_rgb(0, 0, 255)),
    ("cyan", PaintColor::from_rgb(0, 255, 255)),
    ("gray", PaintColor::from_rgb(128, 128, 128)),
    ("green", PaintColor::from_rgb(0, 255, 0)),
    ("magenta", PaintColor::from_rgb(255, 0, 255)),
    ("orange", PaintColor::from_rgb(255, 200, 0)),
    ("pink", PaintColor::from_rgb(255, 175, 175)),
    ("red", PaintColor::from_rgb(255, 0, 0)),
    ("white", PaintColor::from_rgb(255, 255, 255)),
    ("yellow", PaintColor::from_rgb(255, 255, 0)),
];

/// Resolves case-insensitive colour names to paint colours.
pub trait ColorLookup {
    /// Colour registered under `name`, if any.
    fn lookup(&self, name: &str) -> Option<PaintColor>;

    /// Whether `name` resolves to a colour.
    fn is_recognized(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }
}

/// The eleven basic colour names every painter understands.
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardPalette;

impl StandardPalette {
    /// Name registered for `color`, if it is one of the standard colours.
    #[must_use]
    pub fn name_of(&self, color: PaintColor) -> Option<&'static str> {
        STANDARD_COLORS
            .iter()
            .find(|(_, candidate)| *candidate == color)
            .map(|(name, _)| *name)
    }
}

impl ColorLookup for StandardPalette {
    fn lookup(&self, name: &str) -> Option<PaintColor> {
        STANDARD_COLORS
            .iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
            .map(|(_, color)| *color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_ignores_case() {
        let palette = StandardPalette;
        assert_eq!(palette.lookup("Red"), Some(PaintColor::from_rgb(255, 0, 0)));
        assert_eq!(palette.lookup("YELLOW"), Some(PaintColor::from_rgb(255, 255, 0)));
        assert!(palette.is_recognized("gray"));
        assert!(!palette.is_recognized("chartreuse"));
        assert!(!palette.is_recognized(" red "));
        assert!(!palette.is_recognized(""));
    }

    #[test]
    fn name_of_inverts_lookup() {
        let palette = StandardPalette;
        for (name, _) in &STANDARD_COLORS {
            let color = palette.lookup(name).expect("registered colour");
            assert_eq!(palette.name_of(color), Some(*name));
        }
        assert_eq!(palette.name_of(PaintColor::from_rgb(1, 2, 3)), None);
    }
}
