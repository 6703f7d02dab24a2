use serde_json::Value;

use crate::error::{FinderError, Result};
use crate::types::{CanonicalItem, RawRecord, SourceKind};

/// Base trait for source-specific normalizers
pub trait SourceNormalizer: Send + Sync {
    /// Convert one raw record into the canonical item shape
    fn normalize(&self, record: &RawRecord) -> Result<CanonicalItem>;

    /// The source kind this normalizer handles
    fn source_kind(&self) -> SourceKind;

    /// Human-readable name for logs
    fn name(&self) -> &str;
}

/// Field helpers shared by the normalizers
pub struct NormalizerUtils;

impl NormalizerUtils {
    /// String form of a JS-truthy scalar. `null`, `""`, `false` and `0` are
    /// all treated as absent.
    pub fn truthy_string(value: &Value) -> Option<String> {
        match value {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
            Value::Bool(true) => Some("true".to_string()),
            _ => None,
        }
    }

    /// First truthy value among the given key spellings.
    pub fn first_truthy(data: &Value, keys: &[&str]) -> Option<String> {
        keys.iter()
            .filter_map(|key| data.get(*key))
            .find_map(Self::truthy_string)
    }

    /// Like [`first_truthy`](Self::first_truthy) but the field must be present.
    pub fn required(data: &Value, keys: &[&str], source_kind: SourceKind) -> Result<String> {
        Self::first_truthy(data, keys).ok_or_else(|| {
            FinderError::MissingField(format!("{} record has no '{}'", source_kind, keys[0]))
        })
    }

    /// Look up a nested path such as `["location", "address"]`.
    pub fn at_path<'a>(data: &'a Value, path: &[&str]) -> Option<&'a Value> {
        path.iter().try_fold(data, |node, key| node.get(*key))
    }
}
