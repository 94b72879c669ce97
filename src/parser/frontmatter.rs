//! Front matter decoding.

use crate::dialect::Dialect;
use crate::model::{DateValue, FileRef, Properties, PropertyValue};
use serde_json::Value;

/// Index of the closing `---` line if `lines` open with a front matter block.
///
/// The block is only recognized when the first line is `---` and the second
/// line starts with the dialect's key prefix, possibly inside YAML quotes.
pub(crate) fn find_front_matter(lines: &[&str], dialect: &dyn Dialect) -> Option<usize> {
    if lines.len() < 3 || lines[0].trim_end() != "---" {
        return None;
    }
    if !dialect.starts_key_line(lines[1]) {
        return None;
    }
    let end = lines
        .iter()
        .skip(1)
        .position(|line| line.trim_end() == "---")
        .map(|i| i + 1);
    if end.is_none() {
        log::debug!("Front matter opener without a closing fence, reading it as body");
    }
    end
}

/// Decode front matter YAML into typed properties.
///
/// Keys that do not follow the typed key convention are skipped with a
/// warning; anything else that fails to decode is an error message.
pub(crate) fn decode_front_matter(
    yaml: &str,
    dialect: &dyn Dialect,
) -> std::result::Result<Properties, String> {
    let value: Value = serde_yaml::from_str(yaml).map_err(|e| e.to_string())?;
    let map = match value {
        Value::Object(map) => map,
        other => return Err(format!("expected a mapping, found {}", other)),
    };

    let mut props = Properties::new();
    for (key, value) in &map {
        let Some((tag, name)) = dialect.parse_property_key(key) else {
            log::warn!("Skipping front matter key '{}' without a type tag", key);
            continue;
        };
        let decoded =
            decode_property(tag, value).map_err(|e| format!("property '{}': {}", name, e))?;
        props.insert(name, decoded);
    }

    log::debug!("Decoded front matter with {} properties", props.len());
    Ok(props)
}

fn decode_property(tag: &str, value: &Value) -> std::result::Result<PropertyValue, String> {
    let decoded = match tag {
        "title" => PropertyValue::Title(scalar(value)?.unwrap_or_default()),
        "rich_text" => PropertyValue::Text(scalar(value)?.unwrap_or_default()),
        "url" => PropertyValue::Url(scalar(value)?),
        "select" => PropertyValue::Select(scalar(value)?),
        "status" => PropertyValue::Status(scalar(value)?),
        "email" => PropertyValue::Email(scalar(value)?),
        "phone_number" => PropertyValue::PhoneNumber(scalar(value)?),
        "multi_select" => PropertyValue::MultiSelect(list(value)?),
        "people" => PropertyValue::People(list(value)?),
        "relation" => PropertyValue::Relation(list(value)?),
        "checkbox" => PropertyValue::Checkbox(
            value
                .as_bool()
                .ok_or_else(|| format!("expected a boolean, found {}", value))?,
        ),
        "number" => PropertyValue::Number(match value {
            Value::Null => None,
            Value::Number(n) => n.as_f64(),
            Value::String(s) => Some(
                s.trim()
                    .parse::<f64>()
                    .map_err(|_| format!("expected a number, found '{}'", s))?,
            ),
            other => return Err(format!("expected a number, found {}", other)),
        }),
        "date" => PropertyValue::Date(date(value)?),
        "files" => PropertyValue::Files(files(value)?),
        "rollup" => PropertyValue::Rollup(value.clone()),
        other => PropertyValue::Unknown {
            kind: other.to_string(),
            value: value.clone(),
        },
    };
    Ok(decoded)
}

/// A nullable scalar, stringified.
fn scalar(value: &Value) -> std::result::Result<Option<String>, String> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        other => Err(format!("expected a scalar, found {}", other)),
    }
}

fn list(value: &Value) -> std::result::Result<Vec<String>, String> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                scalar(item)?.ok_or_else(|| "list entries must not be null".to_string())
            })
            .collect(),
        other => Err(format!("expected a list, found {}", other)),
    }
}

fn date(value: &Value) -> std::result::Result<Option<DateValue>, String> {
    let date = match value {
        Value::Null => return Ok(None),
        Value::String(s) => DateValue::on(s.clone()),
        Value::Object(map) => DateValue {
            start: map
                .get("start")
                .and_then(Value::as_str)
                .ok_or("date needs a 'start'")?
                .to_string(),
            end: scalar(map.get("end").unwrap_or(&Value::Null))?,
            timezone: scalar(map.get("timezone").unwrap_or(&Value::Null))?,
        },
        other => return Err(format!("expected a date, found {}", other)),
    };

    if !date.is_valid() {
        return Err(format!("invalid date '{}'", date.start));
    }
    Ok(Some(date))
}

fn files(value: &Value) -> std::result::Result<Vec<FileRef>, String> {
    let Some(items) = value.as_array() else {
        return match value {
            Value::Null => Ok(Vec::new()),
            other => Err(format!("expected a list of files, found {}", other)),
        };
    };

    items
        .iter()
        .map(|item| -> std::result::Result<FileRef, String> {
            match item {
                Value::String(url) => Ok(FileRef::new(url.clone(), url.clone())),
                Value::Object(map) => {
                    let url = map
                        .get("url")
                        .and_then(Value::as_str)
                        .ok_or("file needs a 'url'")?;
                    let name = map.get("name").and_then(Value::as_str).unwrap_or(url);
                    Ok(FileRef::new(name, url))
                }
                other => Err(format!("expected a file, found {}", other)),
            }
        })
        .collect()
}
