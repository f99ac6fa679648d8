/// Per-episode accent colour. Only the rendering layer looks at it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Accent {
    #[default]
    Yellow,
    Pink,
    Green,
    Blue,
    Purple,
}

impl Accent {
    /// Unknown theme names fall back to yellow.
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "pink" => Accent::Pink,
            "green" => Accent::Green,
            "blue" => Accent::Blue,
            "purple" => Accent::Purple,
            _ => Accent::Yellow,
        }
    }

    /// Chat clients have no colours, so each accent gets a coloured emoji.
    /// Pink has no square, it uses a heart.
    pub fn marker(&self) -> &'static str {
        match self {
            Accent::Yellow => "🟨",
            Accent::Pink => "🩷",
            Accent::Green => "🟩",
            Accent::Blue => "🟦",
            Accent::Purple => "🟪",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_theme_defaults_to_yellow() {
        assert_eq!(Accent::from_name("teal"), Accent::Yellow);
        assert_eq!(Accent::from_name("Purple"), Accent::Purple);
        assert_eq!(Accent::default().marker(), "🟨");
        assert_eq!(Accent::Pink.marker(), "🩷");
    }
}
