// src/recipe.rs
use serde::{Deserialize, Deserializer, Serialize, de::IgnoredAny};
use serde_json::{Map, Value};

/// The structured reply shape the system prompt asks the model for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeCollection {
    pub recipes: Vec<Recipe>,
}

/// One recipe as returned by the model. Only `title` is interpreted here, everything
/// else the model sends along (description, steps, ...) is carried through untouched.
///
/// `title` is kept as raw JSON so an odd value (number, object) survives the round trip;
/// it just never becomes a search query. Whatever the model put in `image` is dropped,
/// that field belongs to the enricher.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<Value>,
    #[serde(default, deserialize_with = "discard", skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Recipe {
    pub fn titled(title: impl Into<String>) -> Self {
        Self { title: Some(Value::String(title.into())), ..Default::default() }
    }

    /// Title usable as a search query: a non-blank string, trimmed.
    pub fn search_title(&self) -> Option<&str> {
        self.title
            .as_ref()
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

fn discard<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    IgnoredAny::deserialize(deserializer)?;
    Ok(None)
}

/// Interpret a (sanitized) model reply as a recipe collection.
///
/// Returns `None` for anything that is not a JSON object with a `recipes` array of objects;
/// the caller falls back to passing the text through.
pub fn parse_recipes(text: &str) -> Option<RecipeCollection> {
    let value: Value = serde_json::from_str(text).ok()?;
    if !value.get("recipes").is_some_and(Value::is_array) {
        return None;
    }
    serde_json::from_value(value).ok()
}
