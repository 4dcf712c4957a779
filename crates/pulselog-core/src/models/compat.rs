//! Lenient deserializers for record shapes written by earlier versions.
//!
//! Older collections stored numbers as form strings (`"170"`, `""`), gender as
//! an empty string when unknown, and sometimes symptoms as one joined string.

use serde::{Deserialize, Deserializer};

use super::Gender;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDecimal {
    Number(f64),
    Text(String),
}

/// Accept a number, a numeric string, an empty string or null.
pub(crate) fn optional_decimal<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<RawDecimal>::deserialize(deserializer)? {
        None => None,
        Some(RawDecimal::Number(n)) => Some(n),
        Some(RawDecimal::Text(s)) => s.trim().parse::<f64>().ok(),
    }
    .filter(|n| n.is_finite()))
}

/// Accept `"male"`/`"female"` (or the Korean labels); anything else is unset.
pub(crate) fn optional_gender<'de, D>(deserializer: D) -> Result<Option<Gender>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(Gender::parse))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSymptoms {
    List(Vec<String>),
    Joined(String),
}

/// Accept a list or a comma-joined string; duplicates are dropped, order kept.
pub(crate) fn symptom_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items: Vec<String> = match Option::<RawSymptoms>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(RawSymptoms::List(list)) => list,
        Some(RawSymptoms::Joined(joined)) => joined.split(',').map(str::to_string).collect(),
    };

    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        let item = item.trim();
        if !item.is_empty() && !out.iter().any(|s| s == item) {
            out.push(item.to_string());
        }
    }
    Ok(out)
}

/// Accept a string or a JSON number for text fields (`"pulse": 72`).
pub(crate) fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawText {
        Text(String),
        Number(serde_json::Number),
        Flag(bool),
    }

    Ok(match Option::<RawText>::deserialize(deserializer)? {
        None => String::new(),
        Some(RawText::Text(s)) => s,
        Some(RawText::Number(n)) => n.to_string(),
        Some(RawText::Flag(b)) => b.to_string(),
    })
}
