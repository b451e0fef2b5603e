use serde::{Deserialize, Deserializer, Serialize};

fn default_true() -> bool {
    true
}

/// Treat an explicit `null` the same as a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Named rectangle in natural screenshot pixels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub name: String,
    pub x1: i64,
    pub y1: i64,
    pub x2: i64,
    pub y2: i64,
}

impl Region {
    pub fn width(&self) -> i64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> i64 {
        self.y2 - self.y1
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrSettings {
    pub enabled: bool,
    pub regions: Vec<Region>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyword {
    pub text: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub ping: bool,
}

impl Keyword {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            enabled: true,
            ping: false,
        }
    }
}

/// Toggle columns of the keyword table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordFlag {
    Enabled,
    Ping,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhookSettings {
    pub enabled: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default = "default_true")]
    pub biome_notifications: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub user_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub keywords: Vec<Keyword>,
}

impl Default for WebhookSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            url: String::new(),
            biome_notifications: default_true(),
            user_id: String::new(),
            keywords: Vec::new(),
        }
    }
}
