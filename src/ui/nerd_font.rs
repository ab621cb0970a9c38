/// Nerd font glyphs used by the headless commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NerdFont {
    Check,
    Cross,
    Warning,
    Clock,
    Git,
    Upload,
    Package,
}

impl NerdFont {
    pub fn unicode(self) -> char {
        match self {
            Self::Check => '\u{f00c}',      // fa-check
            Self::Cross => '\u{f00d}',      // fa-times
            Self::Warning => '\u{f071}',    // fa-exclamation-triangle
            Self::Clock => '\u{f017}',      // fa-clock
            Self::Git => '\u{f1d3}',        // fa-git
            Self::Upload => '\u{f093}',     // fa-upload
            Self::Package => '\u{f187}',    // fa-archive
        }
    }
}

impl std::fmt::Display for NerdFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.unicode())
    }
}

impl From<NerdFont> for char {
    fn from(icon: NerdFont) -> Self {
        icon.unicode()
    }
}
