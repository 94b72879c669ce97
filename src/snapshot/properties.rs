//! Page property decoding.

use super::rich_text::{plain_text, str_at};
use crate::error::{Error, Result};
use crate::model::{DateValue, FileRef, Properties, PropertyValue};
use serde_json::{Map, Value};

/// Decode the snapshot property collection, preserving its order.
pub(crate) fn properties(collection: &Map<String, Value>) -> Result<Properties> {
    let mut props = Properties::new();
    for (name, entry) in collection {
        props.insert(name.clone(), property(name, entry)?);
    }
    Ok(props)
}

fn property(name: &str, entry: &Value) -> Result<PropertyValue> {
    let tag = entry
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::malformed(format!("property '{}' has no type tag", name)))?;

    if !PropertyValue::is_known_tag(tag) {
        log::warn!(
            "Unrecognized property type '{}' for '{}', passing through",
            tag,
            name
        );
        return Ok(PropertyValue::Unknown {
            kind: tag.to_string(),
            value: entry.get(tag).cloned().unwrap_or(Value::Null),
        });
    }

    let value = entry.get(tag).ok_or_else(|| {
        Error::malformed(format!("{} property '{}' has no '{}' value", tag, name, tag))
    })?;
    let shape = |expected: &str| {
        Error::malformed(format!(
            "{} property '{}' should hold {}, found {}",
            tag, name, expected, value
        ))
    };

    let decoded = match tag {
        "title" => PropertyValue::Title(plain_text(Some(value))),
        "rich_text" => PropertyValue::Text(plain_text(Some(value))),
        "url" => PropertyValue::Url(nullable_str(value).ok_or_else(|| shape("a string"))?),
        "email" => PropertyValue::Email(nullable_str(value).ok_or_else(|| shape("a string"))?),
        "phone_number" => {
            PropertyValue::PhoneNumber(nullable_str(value).ok_or_else(|| shape("a string"))?)
        }
        "select" => PropertyValue::Select(option_name(value).ok_or_else(|| shape("an option"))?),
        "status" => PropertyValue::Status(option_name(value).ok_or_else(|| shape("an option"))?),
        "multi_select" => PropertyValue::MultiSelect(
            collect_strings(value, &["name"]).ok_or_else(|| shape("a list of options"))?,
        ),
        "people" => PropertyValue::People(
            collect_strings(value, &["id"]).ok_or_else(|| shape("a list of users"))?,
        ),
        "relation" => PropertyValue::Relation(
            collect_strings(value, &["id"]).ok_or_else(|| shape("a list of pages"))?,
        ),
        "checkbox" => PropertyValue::Checkbox(value.as_bool().ok_or_else(|| shape("a boolean"))?),
        "number" => PropertyValue::Number(match value {
            Value::Null => None,
            other => Some(other.as_f64().ok_or_else(|| shape("a number"))?),
        }),
        "date" => PropertyValue::Date(match value {
            Value::Null => None,
            other => Some(date(other).ok_or_else(|| shape("a date object"))?),
        }),
        "files" => PropertyValue::Files(files(value).ok_or_else(|| shape("a list of files"))?),
        _ => PropertyValue::Rollup(value.clone()),
    };

    Ok(decoded)
}

/// `Some(None)` for null, `Some(Some(s))` for a string, `None` for anything else.
fn nullable_str(value: &Value) -> Option<Option<String>> {
    match value {
        Value::Null => Some(None),
        Value::String(s) => Some(Some(s.clone())),
        _ => None,
    }
}

fn option_name(value: &Value) -> Option<Option<String>> {
    match value {
        Value::Null => Some(None),
        Value::Object(_) => Some(Some(str_at(value, &["name"])?.to_string())),
        _ => None,
    }
}

fn collect_strings(value: &Value, path: &[&str]) -> Option<Vec<String>> {
    value
        .as_array()?
        .iter()
        .map(|item| str_at(item, path).map(str::to_string))
        .collect()
}

fn date(value: &Value) -> Option<DateValue> {
    Some(DateValue {
        start: str_at(value, &["start"])?.to_string(),
        end: str_at(value, &["end"]).map(str::to_string),
        timezone: str_at(value, &["time_zone"]).map(str::to_string),
    })
}

fn files(value: &Value) -> Option<Vec<FileRef>> {
    value
        .as_array()?
        .iter()
        .map(|item| {
            let url = str_at(item, &["external", "url"])
                .or_else(|| str_at(item, &["file", "url"]))?;
            let name = str_at(item, &["name"]).unwrap_or(url);
            Some(FileRef::new(name, url))
        })
        .collect()
}
