use serde::Deserialize;
use serde_json::{Map, Value};

// --- Snapshot payload ---

/// One polled snapshot document.
///
/// Posts are grouped under arbitrary keys (usually the scraper output file
/// they came from). Group values are kept as raw JSON so that heterogeneous
/// or partial snapshots still deserialize; the flattener decides what counts
/// as a post.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Snapshot {
    #[serde(
        default,
        alias = "resultsByGroup",
        deserialize_with = "lenient::object"
    )]
    pub results_by_group: Map<String, Value>,
}

impl Snapshot {
    pub fn parse(body: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(body)?)
    }
}

/// A single post as it appears inside a snapshot group.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPost {
    #[serde(default, alias = "post_id", deserialize_with = "lenient::string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub flag: Option<String>,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub reactions: Vec<RawReaction>,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub comments: Vec<RawComment>,
}

/// A reaction entry. Only the reacting user is carried; the reaction kind is
/// irrelevant to engagement tracking.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawReaction {
    #[serde(default, alias = "user_id", deserialize_with = "lenient::string")]
    pub id: Option<String>,
    #[serde(default, alias = "user_name", deserialize_with = "lenient::string")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawComment {
    #[serde(default, alias = "user_id", deserialize_with = "lenient::string")]
    pub id: Option<String>,
    #[serde(default, alias = "user_name", deserialize_with = "lenient::string")]
    pub name: Option<String>,
    #[serde(default, alias = "message", deserialize_with = "lenient::string")]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub created_time: Option<String>,
}

// --- Post registry ---

/// A row of the manager-facing post registry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistryEntry {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub flag: Option<String>,
}

/// Parse a registry document: a JSON array whose object entries are posts.
pub fn parse_registry(body: &str) -> crate::Result<Vec<RegistryEntry>> {
    let items: Vec<Value> = serde_json::from_str(body)?;
    Ok(items
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}

/// Deserializers that never reject a document because one field has the
/// wrong shape. A field of the wrong type becomes its empty value.
pub mod lenient {
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::{Map, Value};

    /// Strings pass through, numbers become their decimal form, anything else is `None`.
    pub fn string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
    }

    /// Arrays keep every element that deserializes as `T`; non-arrays are empty.
    pub fn seq<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Array(items) => items
                .into_iter()
                .filter(Value::is_object)
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
            _ => Vec::new(),
        })
    }

    pub fn object<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Object(map) => map,
            _ => Map::new(),
        })
    }
}
