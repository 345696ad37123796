//! Upstream record shapes and their mapping into domain values
//!
//! Every field is optional here; defaults are applied when converting.

use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::Value;

use crate::domain::{ChatResponse, KnowledgeBase, SearchResult};

#[derive(Debug, Clone, Deserialize)]
pub struct KnowledgeBaseRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub document_count: Option<u64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub create_time: Option<String>,
}

impl KnowledgeBaseRecord {
    pub fn has_id(&self, id: &str) -> bool {
        self.id.as_deref() == Some(id)
    }

    pub fn carries_id(&self) -> bool {
        self.id.as_deref().is_some_and(|id| !id.is_empty())
    }
}

impl From<KnowledgeBaseRecord> for KnowledgeBase {
    fn from(record: KnowledgeBaseRecord) -> Self {
        Self {
            id: record.id.unwrap_or_default(),
            name: record.name.unwrap_or_default(),
            description: record.desc.or(record.description).unwrap_or_default(),
            document_count: record.document_count.unwrap_or(0),
            create_time: record.create_time.unwrap_or_default(),
        }
    }
}

/// One `hit_test` hit, also used for chat references
#[derive(Debug, Clone, Deserialize)]
pub struct HitRecord {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub document_name: Option<String>,
    #[serde(default)]
    pub similarity: Option<f64>,
}

impl From<HitRecord> for SearchResult {
    fn from(record: HitRecord) -> Self {
        Self {
            content: record.content.unwrap_or_default(),
            title: record.title.unwrap_or_default(),
            source: record.source.or(record.document_name).unwrap_or_default(),
            similarity: record.similarity.unwrap_or(0.0),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatRecord {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub reference: Option<Vec<HitRecord>>,
}

impl From<ChatRecord> for ChatResponse {
    fn from(record: ChatRecord) -> Self {
        let references = record
            .reference
            .unwrap_or_default()
            .into_iter()
            .map(SearchResult::from)
            .collect();

        ChatResponse::new(
            record.content.or(record.answer).unwrap_or_default(),
            references,
        )
    }
}

/// Accept a string, number or boolean and keep it as a string
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(de::Error::custom(format!(
            "expected a string or number, got {}",
            other
        ))),
    }
}
