//! Front matter emission.

use crate::dialect::Dialect;
use crate::error::{Error, Result};
use crate::model::{Properties, PropertyValue};
use serde_json::{json, Map, Value};

/// Render properties as a `---` delimited YAML block with typed keys.
///
/// Returns an empty string when there are no properties.
pub fn render_front_matter(properties: &Properties, dialect: &dyn Dialect) -> Result<String> {
    if properties.is_empty() {
        return Ok(String::new());
    }

    let mut map = Map::new();
    for (name, value) in properties.iter() {
        map.insert(dialect.property_key(value.type_tag(), name), property_value(value));
    }

    let yaml = serde_yaml::to_string(&map)
        .map_err(|e| Error::Render(format!("front matter serialization error: {}", e)))?;
    log::debug!("Rendered front matter with {} properties", properties.len());

    Ok(format!("---\n{}---\n", yaml))
}

/// The literal shape of a property value: scalar, list, or nested object.
fn property_value(value: &PropertyValue) -> Value {
    match value {
        PropertyValue::Title(s) | PropertyValue::Text(s) => json!(s),
        PropertyValue::Url(s)
        | PropertyValue::Select(s)
        | PropertyValue::PhoneNumber(s)
        | PropertyValue::Email(s)
        | PropertyValue::Status(s) => json!(s),
        PropertyValue::MultiSelect(items)
        | PropertyValue::People(items)
        | PropertyValue::Relation(items) => json!(items),
        PropertyValue::Date(None) => Value::Null,
        PropertyValue::Date(Some(date)) => json!({
            "start": date.start,
            "end": date.end,
            "timezone": date.timezone,
        }),
        PropertyValue::Files(files) => Value::Array(
            files
                .iter()
                .map(|f| json!({"name": f.name, "url": f.url}))
                .collect(),
        ),
        PropertyValue::Checkbox(b) => json!(b),
        PropertyValue::Number(n) => json!(n),
        PropertyValue::Rollup(v) | PropertyValue::Unknown { value: v, .. } => v.clone(),
    }
}
