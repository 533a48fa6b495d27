use std::{
    fs::File,
    io::{BufReader, ErrorKind},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, de::Error as _};
use time::{UtcOffset, macros::format_description};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self { Self { port: default_port() } }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    /// Directory of additional font files, loaded on startup.
    pub fonts_dir: Option<PathBuf>,
    #[serde(default = "default_true")]
    pub system_fonts: bool,
    #[serde(default = "default_font_family")]
    pub font_family: String,
    /// Offset used when displaying announcement dates.
    #[serde(default = "default_utc_offset", deserialize_with = "deserialize_utc_offset")]
    pub utc_offset: UtcOffset,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            fonts_dir: None,
            system_fonts: true,
            font_family: default_font_family(),
            utc_offset: default_utc_offset(),
        }
    }
}

impl Config {
    /// Loads the config file at `path`. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!("No config file at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to open {}", path.display()));
            }
        };
        serde_yaml::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse {}", path.display()))
    }
}

fn default_port() -> u16 { 3000 }

fn default_true() -> bool { true }

fn default_font_family() -> String {
    "Pretendard, 'Noto Sans KR', 'Noto Sans CJK KR', 'Apple SD Gothic Neo', sans-serif".to_string()
}

fn default_utc_offset() -> UtcOffset { time::macros::offset!(+9) }

fn deserialize_utc_offset<'de, D>(deserializer: D) -> Result<UtcOffset, D::Error>
where D: Deserializer<'de> {
    let value = String::deserialize(deserializer)?;
    if value == "Z" {
        return Ok(UtcOffset::UTC);
    }
    UtcOffset::parse(&value, format_description!("[offset_hour sign:mandatory]:[offset_minute]"))
        .map_err(|e| D::Error::custom(format!("invalid utc_offset {value:?}: {e}")))
}
