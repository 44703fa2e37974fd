// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::taxonomy::{ALL_CHANNELS, FAVORITES, HISTORY};

/// Language codes the directory knows how to label.
const KNOWN_LANGUAGES: &[&str] = &[
    "ar", "en", "fr", "es", "pt", "tr", "ur", "he", "de", "ru", "zh", "it", "nl", "pl", "sv", "no",
    "fi", "da", "hi", "bn", "sw",
];

const YOUTUBE_HOSTS: &[&str] = &["youtube.com", "youtu.be", "youtube-nocookie.com"];

// Providers are inconsistent: a tag may be a plain string, a list of strings
// or missing entirely. The first non-empty string wins.
fn deserialize_string_or_first<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Value = Deserialize::deserialize(deserializer)?;

    Ok(match value {
        Value::String(s) if !s.is_empty() => Some(s),
        Value::Array(arr) => arr.into_iter().find_map(|v| match v {
            Value::String(s) if !s.is_empty() => Some(s),
            _ => None,
        }),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// A single channel as authored in the catalog.
///
/// Only `name` and `url` are required. Anything else a provider attached to
/// the record is kept verbatim in `extra` and echoed back to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub name: String,
    pub url: String,
    #[serde(
        default,
        deserialize_with = "deserialize_string_or_first",
        skip_serializing_if = "Option::is_none"
    )]
    pub lang: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_string_or_first",
        skip_serializing_if = "Option::is_none"
    )]
    pub category: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Channel {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            lang: None,
            category: None,
            extra: Map::new(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }

    pub fn stream_kind(&self) -> StreamKind {
        let url = self.url.to_lowercase();
        if YOUTUBE_HOSTS.iter().any(|host| url.contains(host)) {
            return StreamKind::YouTube;
        }

        let platform = ["platform", "source"]
            .iter()
            .filter_map(|key| self.extra.get(*key).and_then(Value::as_str))
            .any(|value| value.to_lowercase().contains("youtube"));

        if platform {
            StreamKind::YouTube
        } else {
            StreamKind::Live
        }
    }

    /// Best-effort language label: an explicit known code, otherwise Arabic
    /// when any text field carries Arabic script.
    pub fn detect_language(&self) -> Option<String> {
        let declared = self
            .extra
            .get("language")
            .and_then(Value::as_str)
            .into_iter()
            .chain(self.lang.as_deref());

        for candidate in declared {
            let code = candidate.trim().to_lowercase();
            if KNOWN_LANGUAGES.contains(&code.as_str()) {
                return Some(code);
            }
        }

        let mut texts = vec![self.name.as_str(), self.url.as_str()];
        texts.extend(self.category.as_deref());
        texts.extend(self.extra.values().filter_map(Value::as_str));

        if texts.iter().any(|t| t.chars().any(is_arabic)) {
            return Some("ar".to_string());
        }

        None
    }
}

fn is_arabic(c: char) -> bool {
    ('\u{0600}'..='\u{06FF}').contains(&c)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Live,
    YouTube,
}

impl std::fmt::Display for StreamKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StreamKind::Live => write!(f, "live"),
            StreamKind::YouTube => write!(f, "youtube"),
        }
    }
}

/// A channel as returned by a query. `country_name` is only stamped when the
/// channel was gathered from every country at once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListedChannel {
    #[serde(flatten)]
    pub channel: Channel,
    #[serde(
        rename = "countryName",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub country_name: Option<String>,
}

impl ListedChannel {
    /// A stamped country replaces any `countryName` the record carried.
    pub fn new(mut channel: Channel, country_name: Option<String>) -> Self {
        if country_name.is_some() {
            channel.extra.remove("countryName");
        }
        Self {
            channel,
            country_name,
        }
    }

    pub fn key(&self) -> ChannelKey {
        ChannelKey {
            name: self.channel.name.clone(),
            url: self.channel.url.clone(),
            country_name: self.country_name.clone(),
        }
    }
}

impl std::fmt::Display for ListedChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.country_name {
            Some(country) => write!(f, "{} ({})", self.channel.name, country),
            None => write!(f, "{}", self.channel.name),
        }
    }
}

/// Structural identity of a listed channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChannelKey {
    pub name: String,
    pub url: String,
    pub country_name: Option<String>,
}

/// The (country, category) pair a listing is built for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelFilter {
    pub country: Option<String>,
    pub category: Option<String>,
}

impl ChannelFilter {
    pub fn new(country: Option<String>, category: Option<String>) -> Self {
        Self { country, category }.normalized()
    }

    pub fn country(country: impl Into<String>) -> Self {
        Self::new(Some(country.into()), None)
    }

    pub fn category(category: impl Into<String>) -> Self {
        Self::new(None, Some(category.into()))
    }

    pub fn with_category(self, category: impl Into<String>) -> Self {
        Self::new(self.country, Some(category.into()))
    }

    /// Empty strings carry no filter.
    pub fn normalized(self) -> Self {
        Self {
            country: self.country.filter(|c| !c.is_empty()),
            category: self.category.filter(|c| !c.is_empty()),
        }
    }

    /// Whether the pair selects anything from the catalog. Without a country
    /// only a real category does; `all-channels` and the client-local
    /// collections do not.
    pub fn is_browsable(&self) -> bool {
        if self.country.is_some() {
            return true;
        }
        matches!(
            self.category.as_deref(),
            Some(c) if ![ALL_CHANNELS, HISTORY, FAVORITES].contains(&c)
        )
    }
}
