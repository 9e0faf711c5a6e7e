use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use std::fmt;
use std::marker::PhantomData;
use url::Url;

pub const CONTENT_PATH: &str = "/content/site.json";

#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("content request failed: {0}")]
    Transport(String),
    #[error("content document is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Everything the page renders below the hero.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SiteContent {
    pub stats: ProfileStats,
    pub skills: SkillSet,
    #[serde(default)]
    pub projects: Vec<Project>,
}

impl SiteContent {
    pub fn from_json(raw: &str) -> Result<Self, ContentError> {
        Ok(serde_json::from_str(raw)?)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ProfileStats {
    #[serde(default, deserialize_with = "display_value")]
    pub years_experience: String,
    #[serde(default, deserialize_with = "display_value")]
    pub projects_completed: String,
    #[serde(default, deserialize_with = "display_value")]
    pub technologies_mastered: String,
    #[serde(default, deserialize_with = "display_value")]
    pub response_time: String,
}

pub type SkillSet = OrderedMap<Vec<String>>;
pub type Metrics = OrderedMap<String>;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub link: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub challenge_solved: String,
    #[serde(default)]
    pub metrics: Option<Metrics>,
}

impl Project {
    /// The trimmed video URL, present only when there is something to play.
    pub fn playable_video(&self) -> Option<&str> {
        self.video_url
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    pub fn image(&self) -> Option<&str> {
        self.image_url
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    /// Address shown in the mock browser bar: the link without its scheme.
    pub fn display_address(&self) -> String {
        match Url::parse(&self.link) {
            Ok(parsed) if parsed.has_host() => {
                let rest = &parsed.as_str()[parsed.scheme().len() + "://".len()..];
                rest.trim_end_matches('/').to_string()
            }
            _ => self.link.trim_start_matches("https://").to_string(),
        }
    }
}

/// String-keyed map that keeps document order.
#[derive(Clone, Debug, PartialEq)]
pub struct OrderedMap<V> {
    entries: Vec<(String, V)>,
}

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();
        if let Some(slot) = self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            slot.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for OrderedMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedMapVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedMapVisitor<V> {
            type Value = OrderedMap<V>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map with string keys")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut map = OrderedMap::new();
                while let Some((key, value)) = access.next_entry::<String, V>()? {
                    map.insert(key, value);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(OrderedMapVisitor(PhantomData))
    }
}

// Stats may be authored as numbers ("years_experience": 3) or strings ("3+").
fn display_value<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(value) => Ok(value),
        serde_json::Value::Null => Ok(String::new()),
        other => Ok(other.to_string()),
    }
}

#[cfg(test)]
pub(crate) fn sample_project() -> Project {
    Project {
        title: "Booking Engine".to_string(),
        description: "Reservations without phone calls.".to_string(),
        kind: "Web App".to_string(),
        link: "https://booking.example.com/".to_string(),
        image_url: Some("/images/booking.png".to_string()),
        video_url: None,
        technologies: vec!["Rust".to_string(), "Yew".to_string()],
        features: vec!["Online payments".to_string()],
        challenge_solved: "Manual scheduling by phone.".to_string(),
        metrics: None,
    }
}
