use std::{fmt, str::FromStr};

use palette::{Srgb, Srgba, WithAlpha};

/// Color themes selectable with the `theme` query parameter.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum Theme {
    #[default]
    Indigo,
    Rose,
    Emerald,
    Amber,
    React,
    Spring,
    Ai,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    pub offset: f32,
    pub color: Srgba<u8>,
}

/// A 135° linear gradient.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    pub stops: Vec<GradientStop>,
}

impl Gradient {
    /// Evenly spaced opaque stops.
    pub fn even(colors: &[Srgb<u8>]) -> Self {
        let last = colors.len().saturating_sub(1).max(1) as f32;
        Self {
            stops: colors
                .iter()
                .enumerate()
                .map(|(i, c)| GradientStop { offset: i as f32 / last, color: c.with_alpha(255) })
                .collect(),
        }
    }

    pub fn two(from: Srgba<u8>, to: Srgba<u8>) -> Self {
        Self {
            stops: vec![
                GradientStop { offset: 0.0, color: from },
                GradientStop { offset: 1.0, color: to },
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub primary: Srgb<u8>,
    pub secondary: Srgb<u8>,
    /// Translucent primary used behind decorations and the badge.
    pub accent: Srgba<u8>,
    pub text_accent: Srgb<u8>,
    pub gradient: Gradient,
}

/// Alpha applied to `primary` to derive `accent` (0.2).
pub const ACCENT_ALPHA: u8 = 51;

pub fn rgb(hex: u32) -> Srgb<u8> {
    Srgb::new((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
}

fn scheme(primary: u32, secondary: u32, gradient: &[u32], text_accent: u32) -> Palette {
    let primary = rgb(primary);
    Palette {
        primary,
        secondary: rgb(secondary),
        accent: primary.with_alpha(ACCENT_ALPHA),
        text_accent: rgb(text_accent),
        gradient: Gradient::even(&gradient.iter().map(|&c| rgb(c)).collect::<Vec<_>>()),
    }
}

impl Theme {
    pub const fn variants() -> &'static [Self] {
        &[Self::Indigo, Self::Rose, Self::Emerald, Self::Amber, Self::React, Self::Spring, Self::Ai]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Indigo => "indigo",
            Self::Rose => "rose",
            Self::Emerald => "emerald",
            Self::Amber => "amber",
            Self::React => "react",
            Self::Spring => "spring",
            Self::Ai => "ai",
        }
    }

    /// Resolves the query parameter. Unknown or missing keys select the default theme.
    pub fn from_param(value: Option<&str>) -> Self {
        value.and_then(|v| v.parse().ok()).unwrap_or_default()
    }

    pub fn palette(self) -> Palette {
        match self {
            Self::Indigo => scheme(0x6366f1, 0x818cf8, &[0x6366f1, 0x8b5cf6], 0xa5b4fc),
            Self::Rose => scheme(0xf43f5e, 0xfb7185, &[0xf43f5e, 0xec4899], 0xfda4af),
            Self::Emerald => scheme(0x10b981, 0x34d399, &[0x10b981, 0x14b8a6], 0x6ee7b7),
            Self::Amber => scheme(0xf59e0b, 0xfbbf24, &[0xf59e0b, 0xd97706], 0xfcd34d),
            Self::React => scheme(0x61dafb, 0x00d8ff, &[0x61dafb, 0x4299e1, 0x3182ce], 0xa5e9fa),
            Self::Spring => scheme(0x6db33f, 0x8bc34a, &[0x6db33f, 0x4caf50, 0x2e7d32], 0xa4d276),
            Self::Ai => scheme(0x9333ea, 0xa855f7, &[0x9333ea, 0x805ad5, 0x6b46c1], 0xc084fc),
        }
    }
}

impl FromStr for Theme {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "indigo" => Ok(Self::Indigo),
            "rose" => Ok(Self::Rose),
            "emerald" => Ok(Self::Emerald),
            "amber" => Ok(Self::Amber),
            "react" => Ok(Self::React),
            "spring" => Ok(Self::Spring),
            "ai" => Ok(Self::Ai),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Formats a color as `#rrggbb`, ignoring alpha.
pub fn html_color(c: Srgb<u8>) -> String {
    let (r, g, b) = c.into_components();
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}
