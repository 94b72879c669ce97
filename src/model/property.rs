//! Typed page properties.

use chrono::{DateTime, NaiveDate};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A typed, named page property value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum PropertyValue {
    /// Page title, flattened to plain text
    Title(String),

    /// Rich text property, flattened to plain text
    #[serde(rename = "rich_text")]
    Text(String),

    /// URL
    Url(Option<String>),

    /// Single select option name
    Select(Option<String>),

    /// Multi-select option names, in order
    MultiSelect(Vec<String>),

    /// Date or date range
    Date(Option<DateValue>),

    /// User ids
    People(Vec<String>),

    /// Attached files
    Files(Vec<FileRef>),

    /// Checkbox
    Checkbox(bool),

    /// Number
    Number(Option<f64>),

    /// Phone number
    PhoneNumber(Option<String>),

    /// Email address
    Email(Option<String>),

    /// Status option name
    Status(Option<String>),

    /// Related page ids
    Relation(Vec<String>),

    /// Computed rollup value, passed through untouched
    Rollup(serde_json::Value),

    /// Property of a type outside the known set, passed through untouched
    Unknown {
        /// Original property type tag
        kind: String,
        /// Original value
        value: serde_json::Value,
    },
}

impl PropertyValue {
    /// Type tag used in snapshots and front matter keys.
    pub fn type_tag(&self) -> &str {
        match self {
            PropertyValue::Title(_) => "title",
            PropertyValue::Text(_) => "rich_text",
            PropertyValue::Url(_) => "url",
            PropertyValue::Select(_) => "select",
            PropertyValue::MultiSelect(_) => "multi_select",
            PropertyValue::Date(_) => "date",
            PropertyValue::People(_) => "people",
            PropertyValue::Files(_) => "files",
            PropertyValue::Checkbox(_) => "checkbox",
            PropertyValue::Number(_) => "number",
            PropertyValue::PhoneNumber(_) => "phone_number",
            PropertyValue::Email(_) => "email",
            PropertyValue::Status(_) => "status",
            PropertyValue::Relation(_) => "relation",
            PropertyValue::Rollup(_) => "rollup",
            PropertyValue::Unknown { kind, .. } => kind,
        }
    }

    /// Check if the type tag is one of the known property types.
    pub fn is_known_tag(tag: &str) -> bool {
        matches!(
            tag,
            "title"
                | "rich_text"
                | "url"
                | "select"
                | "multi_select"
                | "date"
                | "people"
                | "files"
                | "checkbox"
                | "number"
                | "phone_number"
                | "email"
                | "status"
                | "relation"
                | "rollup"
        )
    }
}

/// A date or date range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateValue {
    /// Start date (`YYYY-MM-DD` or RFC 3339 date-time)
    pub start: String,

    /// End date, for ranges
    #[serde(default)]
    pub end: Option<String>,

    /// IANA time zone name
    #[serde(default)]
    pub timezone: Option<String>,
}

impl DateValue {
    /// Create a single-day date.
    pub fn on(start: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            ..Default::default()
        }
    }

    /// Calendar date of the start, if it parses.
    pub fn start_date(&self) -> Option<NaiveDate> {
        parse_date(&self.start)
    }

    /// Check that start and end (when present) are valid dates.
    pub fn is_valid(&self) -> bool {
        parse_date(&self.start).is_some()
            && self
                .end
                .as_deref()
                .map_or(true, |e| parse_date(e).is_some())
    }
}

/// Parse `YYYY-MM-DD` or an RFC 3339 date-time into a calendar date.
pub(crate) fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
}

/// A file attached to a files property.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    /// File name
    pub name: String,

    /// File URL
    pub url: String,
}

impl FileRef {
    /// Create a file reference.
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// Page properties, keyed by name, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties {
    entries: Vec<(String, PropertyValue)>,
}

impl Properties {
    /// Create an empty property map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a property, replacing an existing one of the same name in place.
    pub fn insert(&mut self, name: impl Into<String>, value: PropertyValue) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Builder-style variant of [`Properties::insert`].
    pub fn with(mut self, name: impl Into<String>, value: PropertyValue) -> Self {
        self.insert(name, value);
        self
    }

    /// Look up a property by name.
    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Iterate over properties in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Number of properties.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no properties.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The first title property, if any.
    pub fn title(&self) -> Option<&str> {
        self.entries.iter().find_map(|(_, v)| match v {
            PropertyValue::Title(t) => Some(t.as_str()),
            _ => None,
        })
    }
}

impl FromIterator<(String, PropertyValue)> for Properties {
    fn from_iter<I: IntoIterator<Item = (String, PropertyValue)>>(iter: I) -> Self {
        let mut props = Properties::new();
        for (name, value) in iter {
            props.insert(name, value);
        }
        props
    }
}

impl Serialize for Properties {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Properties {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PropertiesVisitor;

        impl<'de> Visitor<'de> for PropertiesVisitor {
            type Value = Properties;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of property names to typed values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Properties, A::Error> {
                let mut props = Properties::new();
                while let Some((name, value)) = access.next_entry::<String, PropertyValue>()? {
                    props.insert(name, value);
                }
                Ok(props)
            }
        }

        deserializer.deserialize_map(PropertiesVisitor)
    }
}
