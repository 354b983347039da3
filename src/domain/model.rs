use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Tag/value pairs found outside any line block.
pub type HeaderMap = BTreeMap<String, String>;

/// One `UB<n>` ... `UE` block of the legacy export.
///
/// Fields keep the order in which their tags first appeared; setting a tag
/// again replaces the value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRecord {
    fields: Vec<(String, String)>,
}

impl LineRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, tag: impl Into<String>, value: impl Into<String>) {
        let tag = tag.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == tag) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((tag, value)),
        }
    }

    pub fn get(&self, tag: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == tag)
            .map(|(_, value)| value.as_str())
    }

    /// Value of `tag`, treating an empty value the same as a missing one.
    pub fn non_empty(&self, tag: &str) -> Option<&str> {
        self.get(tag).filter(|value| !value.is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for LineRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = LineRecord::new();
        for (tag, value) in iter {
            record.set(tag, value);
        }
        record
    }
}

/// Structural result of parsing a legacy export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyDocument {
    pub header: HeaderMap,
    pub lines: Vec<LineRecord>,
}

/// Line quantity: numeric when the source value is all digits, verbatim otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Quantity {
    Count(u64),
    Raw(String),
}

impl Quantity {
    pub fn from_source(value: &str) -> Self {
        if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
            // 超出 u64 範圍的數字保留原字串
            match value.parse::<u64>() {
                Ok(count) => Quantity::Count(count),
                Err(_) => Quantity::Raw(value.to_string()),
            }
        } else {
            Quantity::Raw(value.to_string())
        }
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Quantity::Count(1)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Count(count) => write!(f, "{}", count),
            Quantity::Raw(raw) => f.write_str(raw),
        }
    }
}

/// Residual line field carried into the `Attributes` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub key: String,
    pub value: String,
}

impl Attribute {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub reference: String,
    pub quantity: Quantity,
    pub item_id: String,
    pub attributes: Vec<Attribute>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipToAddress {
    pub name: String,
    pub street: String,
    pub zip_code: String,
    pub city: String,
    pub region: String,
    pub country: String,
    pub extra_address_info: String,
}

impl Default for ShipToAddress {
    fn default() -> Self {
        Self {
            name: String::new(),
            street: String::new(),
            zip_code: String::new(),
            city: String::new(),
            region: String::new(),
            country: super::DEFAULT_COUNTRY.to_string(),
            extra_address_info: String::new(),
        }
    }
}

/// Mapped purchase order, ready for rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseOrder {
    pub order_number: String,
    pub reference1: String,
    pub shipping_reference: String,
    pub bill_to_account: String,
    pub requested_delivery_date: String,
    pub ship_to: ShipToAddress,
    pub lines: Vec<OrderLine>,
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub purchase_order: PurchaseOrder,
    pub xml_output: String,
    pub json_output: Option<String>,
    pub csv_output: Option<String>,
}
