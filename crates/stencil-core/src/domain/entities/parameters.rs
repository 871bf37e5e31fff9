//! Template parameters: declarations read from a template, and the ordered
//! set of resolved values carried along a chain.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::domain::error::DomainError;

// ============================================================================
// ParameterSet
// ============================================================================

/// Ordered mapping from parameter key to resolved value.
///
/// Insertion order is preserved: it is the order in which keys are prompted,
/// written to the renderer manifest, and persisted in project manifests.
/// Re-inserting an existing key replaces the value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterSet {
    entries: Vec<(String, String)>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Insert or replace a value, returning the previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Add every key of `other` that is not yet present. Existing values win.
    pub fn fill_from(&mut self, other: &ParameterSet) {
        for (key, value) in other.iter() {
            if !self.contains_key(key) {
                self.entries.push((key.to_string(), value.to_string()));
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render as a flat JSON object (the renderer manifest format).
    pub fn to_manifest_json(&self) -> String {
        let map: Map<String, Value> = self
            .iter()
            .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
            .collect();
        format!("{:#}", Value::Object(map))
    }

    /// Render in declaration-file format, every value becoming a default.
    ///
    /// A project manifest written this way is read back with
    /// [`ParameterDeclaration::parse_all`].
    pub fn to_declaration_json(&self) -> String {
        let map: Map<String, Value> = self
            .iter()
            .map(|(k, v)| {
                let mut entry = Map::new();
                entry.insert("default".into(), Value::String(v.to_string()));
                (k.to_string(), Value::Object(entry))
            })
            .collect();
        format!("{:#}", Value::Object(map))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ParameterSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (k, v) in iter {
            set.insert(k, v);
        }
        set
    }
}

impl IntoIterator for ParameterSet {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for ParameterSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self.iter() {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ParameterSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SetVisitor;

        impl<'de> Visitor<'de> for SetVisitor {
            type Value = ParameterSet;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a flat object of parameter values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<ParameterSet, A::Error> {
                let mut set = ParameterSet::new();
                while let Some((key, value)) = access.next_entry::<String, Value>()? {
                    let value = scalar_to_string(&value).map_err(serde::de::Error::custom)?;
                    set.insert(key, value);
                }
                Ok(set)
            }
        }

        deserializer.deserialize_map(SetVisitor)
    }
}

// ============================================================================
// Prompt specification
// ============================================================================

/// Value type a prompt answer must parse as.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PromptKind {
    #[default]
    Text,
    Integer,
    Float,
    Boolean,
}

impl FromStr for PromptKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "str" | "string" | "text" => Ok(Self::Text),
            "int" | "integer" => Ok(Self::Integer),
            "float" | "number" => Ok(Self::Float),
            "bool" | "boolean" => Ok(Self::Boolean),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for PromptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Text => "str",
            Self::Integer => "int",
            Self::Float => "float",
            Self::Boolean => "bool",
        };
        f.write_str(s)
    }
}

/// How to ask for a parameter that has no usable default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptSpec {
    pub text: Option<String>,
    pub kind: PromptKind,
    pub choices: Vec<String>,
}

impl PromptSpec {
    /// The label shown to the user; falls back to the key.
    pub fn label<'a>(&'a self, key: &'a str) -> &'a str {
        self.text.as_deref().unwrap_or(key)
    }

    /// Validate and normalise an answer.
    ///
    /// Empty answers are always rejected.
    pub fn accept(&self, answer: &str) -> Result<String, String> {
        let answer = answer.trim();
        if answer.is_empty() {
            return Err("a value is required".into());
        }

        if !self.choices.is_empty() {
            return self
                .choices
                .iter()
                .find(|c| c.as_str() == answer)
                .cloned()
                .ok_or_else(|| format!("choose one of: {}", self.choices.join(", ")));
        }

        match self.kind {
            PromptKind::Text => Ok(answer.to_string()),
            PromptKind::Integer => answer
                .parse::<i64>()
                .map(|n| n.to_string())
                .map_err(|_| format!("'{answer}' is not an integer")),
            PromptKind::Float => answer
                .parse::<f64>()
                .map(|_| answer.to_string())
                .map_err(|_| format!("'{answer}' is not a number")),
            PromptKind::Boolean => match answer.to_ascii_lowercase().as_str() {
                "y" | "yes" | "true" | "1" => Ok("true".into()),
                "n" | "no" | "false" | "0" => Ok("false".into()),
                _ => Err(format!("'{answer}' is not a yes/no value")),
            },
        }
    }
}

// ============================================================================
// ParameterDeclaration
// ============================================================================

/// One entry of a template's declaration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterDeclaration {
    key: String,
    default: String,
    prompt: PromptSpec,
}

#[derive(Debug, Deserialize)]
struct RawDeclaration {
    #[serde(default)]
    default: Value,
    #[serde(default)]
    text: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    choices: Option<Vec<Value>>,
}

impl ParameterDeclaration {
    pub fn new(key: impl Into<String>, default: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            default: default.into(),
            prompt: PromptSpec::default(),
        }
    }

    pub fn with_prompt(mut self, prompt: PromptSpec) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// The stored default; empty when the file gave a falsy value.
    pub fn default_value(&self) -> &str {
        &self.default
    }

    pub fn prompt(&self) -> &PromptSpec {
        &self.prompt
    }

    /// Parse a declaration file.
    ///
    /// Entries keep their file order. Falsy defaults (`""`, `null`, `false`,
    /// `0`, empty list/object) are normalised to the empty string, which
    /// forces a prompt.
    pub fn parse_all(source: &str, file: &Path) -> Result<Vec<Self>, DomainError> {
        let malformed = |reason: String| DomainError::MalformedDeclaration {
            file: file.display().to_string(),
            reason,
        };

        let document: Value = serde_json::from_str(source).map_err(|e| malformed(e.to_string()))?;
        let Value::Object(entries) = document else {
            return Err(malformed("top level must be a JSON object".into()));
        };

        let mut declarations = Vec::with_capacity(entries.len());
        for (key, entry) in entries {
            let raw: RawDeclaration = serde_json::from_value(entry)
                .map_err(|e| malformed(format!("entry '{key}': {e}")))?;

            let default =
                scalar_to_string(&raw.default).map_err(|e| malformed(format!("entry '{key}': {e}")))?;

            let kind = match raw.kind.as_deref() {
                None => PromptKind::Text,
                Some(k) => k.parse().map_err(|kind| DomainError::UnsupportedPromptType {
                    key: key.clone(),
                    kind,
                })?,
            };

            let choices = match raw.choices {
                None => Vec::new(),
                Some(list) if list.is_empty() => {
                    return Err(DomainError::EmptyChoices { key });
                }
                Some(list) => list
                    .iter()
                    .map(scalar_to_string)
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|e| malformed(format!("entry '{key}': {e}")))?,
            };

            declarations.push(Self {
                key,
                default,
                prompt: PromptSpec {
                    text: raw.text,
                    kind,
                    choices,
                },
            });
        }

        Ok(declarations)
    }
}

/// Convert a JSON scalar to its parameter string; falsy values become `""`.
fn scalar_to_string(value: &Value) -> Result<String, String> {
    match value {
        Value::Null | Value::Bool(false) => Ok(String::new()),
        Value::Bool(true) => Ok("true".into()),
        Value::Number(n) if n.as_f64() == Some(0.0) => Ok(String::new()),
        Value::Number(n) => Ok(n.to_string()),
        Value::String(s) => Ok(s.clone()),
        Value::Array(a) if a.is_empty() => Ok(String::new()),
        Value::Object(o) if o.is_empty() => Ok(String::new()),
        _ => Err("values must be strings, numbers or booleans".into()),
    }
}
