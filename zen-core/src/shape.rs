use std::fmt;

/// Target geometry the particle cloud morphs into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum ShapeKind {
    #[default]
    Sphere,
    Heart,
    Flower,
    Saturn,
    Meditator,
    Fireworks,
}

impl ShapeKind {
    /// Every shape, in the order the UI lists them.
    pub const ALL: [ShapeKind; 6] = [
        ShapeKind::Sphere,
        ShapeKind::Heart,
        ShapeKind::Flower,
        ShapeKind::Saturn,
        ShapeKind::Meditator,
        ShapeKind::Fireworks,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Sphere => "Sphere",
            ShapeKind::Heart => "Heart",
            ShapeKind::Flower => "Flower",
            ShapeKind::Saturn => "Saturn",
            ShapeKind::Meditator => "Meditator",
            ShapeKind::Fireworks => "Fireworks",
        }
    }

    /// Looks a shape up by name, case-insensitively.
    ///
    /// Unknown names fall back to [`ShapeKind::Sphere`] instead of failing.
    pub fn from_name(name: &str) -> ShapeKind {
        let name = name.trim();
        match Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
        {
            Some(kind) => kind,
            None => {
                log::warn!("unknown shape `{name}`, falling back to Sphere");
                ShapeKind::Sphere
            }
        }
    }

    /// Whether the expansion phase pulses instead of breathing.
    #[inline]
    pub fn is_pulsing(self) -> bool {
        matches!(self, ShapeKind::Fireworks)
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
