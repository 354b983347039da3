//! Business mapping from the raw legacy structure to a purchase order.

use crate::domain::model::{
    Attribute, HeaderMap, LegacyDocument, LineRecord, OrderLine, PurchaseOrder, Quantity,
    ShipToAddress,
};
use regex::Regex;
use std::sync::OnceLock;

pub const ORDER_NUMBER_TAG: &str = "K1";
pub const BILL_TO_ACCOUNT_TAG: &str = "K2";
pub const SHIPPING_REFERENCE_TAG: &str = "K3";
pub const DELIVERY_DATE_TAG: &str = "K4";
pub const SHIP_TO_TAG: &str = "O4";

/// Distinguished fields of an order line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineField {
    Quantity,
    ItemId,
    Reference,
}

/// Where a distinguished line field comes from.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: LineField,
    pub primary: &'static str,
    pub fallback: Option<&'static str>,
    /// `None` means the default depends on the line position.
    pub default: Option<&'static str>,
    /// Treat a present but empty value like a missing tag.
    pub skip_empty: bool,
}

impl FieldRule {
    fn lookup<'a>(&self, record: &'a LineRecord, tag: &str) -> Option<&'a str> {
        if self.skip_empty {
            record.non_empty(tag)
        } else {
            record.get(tag)
        }
    }

    pub fn resolve<'a>(&self, record: &'a LineRecord) -> Option<&'a str> {
        self.lookup(record, self.primary)
            .or_else(|| self.fallback.and_then(|tag| self.lookup(record, tag)))
            .or(self.default)
    }

    fn consumes(&self, tag: &str) -> bool {
        self.primary == tag || self.fallback == Some(tag)
    }
}

pub static LINE_FIELD_RULES: [FieldRule; 3] = [
    FieldRule {
        field: LineField::Quantity,
        primary: "O72",
        fallback: Some("P1"),
        default: Some("1"),
        skip_empty: true,
    },
    FieldRule {
        field: LineField::ItemId,
        primary: "P2",
        fallback: None,
        default: Some("UNKNOWN"),
        skip_empty: false,
    },
    FieldRule {
        field: LineField::Reference,
        primary: "P4",
        fallback: None,
        default: None,
        skip_empty: false,
    },
];

pub fn rule_for(field: LineField) -> &'static FieldRule {
    match field {
        LineField::Quantity => &LINE_FIELD_RULES[0],
        LineField::ItemId => &LINE_FIELD_RULES[1],
        LineField::Reference => &LINE_FIELD_RULES[2],
    }
}

/// True when `tag` feeds one of the distinguished line fields.
pub fn is_consumed_tag(tag: &str) -> bool {
    LINE_FIELD_RULES.iter().any(|rule| rule.consumes(tag))
}

/// Map one line record at its 1-based `position`.
pub fn map_line(record: &LineRecord, position: usize) -> OrderLine {
    let quantity = rule_for(LineField::Quantity)
        .resolve(record)
        .map(Quantity::from_source)
        .unwrap_or_default();

    let item_id = rule_for(LineField::ItemId)
        .resolve(record)
        .unwrap_or_default()
        .to_string();

    let reference = rule_for(LineField::Reference)
        .resolve(record)
        .map(str::to_string)
        .unwrap_or_else(|| format!("LINE-{}", position));

    let attributes = record
        .iter()
        .filter(|(tag, _)| !is_consumed_tag(tag))
        .map(|(tag, value)| Attribute::new(tag, value))
        .collect();

    OrderLine {
        reference,
        quantity,
        item_id,
        attributes,
    }
}

pub fn map_lines(lines: &[LineRecord]) -> Vec<OrderLine> {
    lines
        .iter()
        .enumerate()
        .map(|(index, record)| map_line(record, index + 1))
        .collect()
}

fn header_value<'a>(header: &'a HeaderMap, tag: &str) -> &'a str {
    header.get(tag).map(String::as_str).unwrap_or_default()
}

/// Pick the raw ship-to text: first line carrying `O4`, else the header.
///
/// Only the first line with the tag counts; if its value is empty the header
/// is used, later lines are not consulted.
pub fn find_address_source<'a>(header: &'a HeaderMap, lines: &'a [LineRecord]) -> Option<&'a str> {
    lines
        .iter()
        .find_map(|record| record.get(SHIP_TO_TAG))
        .filter(|value| !value.is_empty())
        .or_else(|| {
            header
                .get(SHIP_TO_TAG)
                .map(String::as_str)
                .filter(|value| !value.is_empty())
        })
}

fn zip_code_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b(\d{4}) *([A-Z]{2})\b").expect("postal code pattern is valid")
    })
}

/// Decompose a free-text ship-to block into address fields.
///
/// Heuristic for Dutch addresses: the first segment holding a `1234 AB`
/// postal code gives the zip code and city, the first other non-numeric
/// segment gives the name. Street is never filled.
pub fn extract_address(raw: &str) -> ShipToAddress {
    let mut address = ShipToAddress::default();

    let segments = raw
        .split(['\n', '\r'])
        .map(str::trim)
        .filter(|segment| !segment.is_empty());

    for segment in segments {
        if address.zip_code.is_empty() {
            if let Some(caps) = zip_code_regex().captures(segment) {
                address.zip_code = format!("{}{}", &caps[1], &caps[2]);
                if let Some(whole) = caps.get(0) {
                    let rest = format!("{}{}", &segment[..whole.start()], &segment[whole.end()..]);
                    let city = rest.trim_matches(|c: char| c == ',' || c.is_whitespace());
                    if !city.is_empty() && address.city.is_empty() {
                        address.city = city.to_string();
                    }
                }
                continue;
            }
        }

        let numeric = segment.chars().all(|c| c.is_ascii_digit());
        if address.name.is_empty() && !numeric {
            address.name = segment.to_string();
        }
    }

    tracing::debug!(
        "Extracted ship-to address: name={:?}, zip={:?}, city={:?}",
        address.name,
        address.zip_code,
        address.city
    );

    address
}

/// Map parsed header and lines into a purchase order.
pub fn map_order(header: &HeaderMap, lines: &[LineRecord]) -> PurchaseOrder {
    let ship_to = find_address_source(header, lines)
        .map(extract_address)
        .unwrap_or_default();

    PurchaseOrder {
        order_number: header_value(header, ORDER_NUMBER_TAG).to_string(),
        // 沒有舊格式欄位對應第二個參考欄位
        reference1: String::new(),
        shipping_reference: header_value(header, SHIPPING_REFERENCE_TAG).to_string(),
        bill_to_account: header_value(header, BILL_TO_ACCOUNT_TAG).to_string(),
        requested_delivery_date: header_value(header, DELIVERY_DATE_TAG).to_string(),
        ship_to,
        lines: map_lines(lines),
    }
}

pub fn map_document(document: &LegacyDocument) -> PurchaseOrder {
    map_order(&document.header, &document.lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(fields: &[(&str, &str)]) -> LineRecord {
        fields.iter().copied().collect()
    }

    #[test]
    fn test_quantity_prefers_o72() {
        let line = map_line(&record(&[("O72", "5"), ("P1", "9")]), 1);
        assert_eq!(line.quantity, Quantity::Count(5));
    }

    #[test]
    fn test_quantity_falls_back_to_p1() {
        let line = map_line(&record(&[("P1", "7")]), 1);
        assert_eq!(line.quantity, Quantity::Count(7));

        let line = map_line(&record(&[("O72", ""), ("P1", "7")]), 1);
        assert_eq!(line.quantity, Quantity::Count(7));
    }

    #[test]
    fn test_quantity_defaults_to_one() {
        let line = map_line(&record(&[("P2", "X")]), 1);
        assert_eq!(line.quantity, Quantity::Count(1));
    }

    #[test]
    fn test_non_numeric_quantity_kept_verbatim() {
        let line = map_line(&record(&[("O72", "2,5 kg")]), 1);
        assert_eq!(line.quantity, Quantity::Raw("2,5 kg".to_string()));
    }

    #[test]
    fn test_item_and_reference_defaults() {
        let line = map_line(&record(&[("O72", "1")]), 3);
        assert_eq!(line.item_id, "UNKNOWN");
        assert_eq!(line.reference, "LINE-3");

        let line = map_line(&record(&[("P2", "ITEM9"), ("P4", "REF-1")]), 3);
        assert_eq!(line.item_id, "ITEM9");
        assert_eq!(line.reference, "REF-1");
    }

    #[test]
    fn test_empty_item_and_reference_are_kept() {
        let line = map_line(&record(&[("P4", ""), ("P2", "")]), 2);
        assert_eq!(line.reference, "");
        assert_eq!(line.item_id, "");
        assert_eq!(line.quantity, Quantity::Count(1));
    }

    #[test]
    fn test_empty_p1_falls_back_to_default_quantity() {
        let line = map_line(&record(&[("O72", ""), ("P1", "")]), 1);
        assert_eq!(line.quantity, Quantity::Count(1));
    }

    #[test]
    fn test_residual_attributes_keep_source_order() {
        let line = map_line(
            &record(&[("P2", "A"), ("X9", "foo"), ("O72", "2"), ("O4", "addr"), ("P1", "3")]),
            1,
        );
        assert_eq!(
            line.attributes,
            vec![Attribute::new("X9", "foo"), Attribute::new("O4", "addr")]
        );
    }

    #[test]
    fn test_rule_table_is_complete() {
        for field in [LineField::Quantity, LineField::ItemId, LineField::Reference] {
            assert_eq!(rule_for(field).field, field);
        }
        for tag in ["O72", "P1", "P2", "P4"] {
            assert!(is_consumed_tag(tag), "{} should be consumed", tag);
        }
        assert!(!is_consumed_tag("O4"));
        assert!(rule_for(LineField::Quantity).skip_empty);
        assert!(!rule_for(LineField::ItemId).skip_empty);
        assert!(!rule_for(LineField::Reference).skip_empty);
    }

    #[test]
    fn test_map_lines_positions_are_one_based() {
        let lines = vec![record(&[("P2", "A")]), record(&[("P2", "B"), ("P4", "R")]), record(&[("P2", "C")])];
        let mapped = map_lines(&lines);
        let references: Vec<_> = mapped.iter().map(|l| l.reference.as_str()).collect();
        assert_eq!(references, vec!["LINE-1", "R", "LINE-3"]);
    }

    #[test]
    fn test_extract_address_dutch_postal_code() {
        let address = extract_address("J. Smith\n1234 AB Amsterdam");
        assert_eq!(address.name, "J. Smith");
        assert_eq!(address.zip_code, "1234AB");
        assert_eq!(address.city, "Amsterdam");
        assert_eq!(address.street, "");
        assert_eq!(address.country, "NL");

        assert_eq!(extract_address("J. Smith\r1234 AB Amsterdam"), address);
        assert_eq!(extract_address("J. Smith\r\n1234 AB Amsterdam"), address);
    }

    #[test]
    fn test_extract_address_variants() {
        let address = extract_address("  Acme BV \n\n 42 \n Utrecht, 3511AB ");
        assert_eq!(address.name, "Acme BV");
        assert_eq!(address.zip_code, "3511AB");
        assert_eq!(address.city, "Utrecht");

        // 只有第一個郵遞區號有效
        let address = extract_address("1234 AB Amsterdam\n5678 CD Rotterdam");
        assert_eq!(address.zip_code, "1234AB");
        assert_eq!(address.city, "Amsterdam");
        assert_eq!(address.name, "5678 CD Rotterdam");
    }

    #[test]
    fn test_extract_address_is_case_sensitive() {
        let address = extract_address("Shop\n1234 ab Amsterdam");
        assert_eq!(address.zip_code, "");
        assert_eq!(address.city, "");
        assert_eq!(address.name, "Shop");
    }

    #[test]
    fn test_extract_address_repeated_spaces_in_postal_code() {
        let address = extract_address("Shop\n1234  AB");
        assert_eq!(address.zip_code, "1234AB");
        assert_eq!(address.city, "");
        assert_eq!(address.name, "Shop");

        let address = extract_address("1234   CD Den Haag");
        assert_eq!(address.zip_code, "1234CD");
        assert_eq!(address.city, "Den Haag");
    }

    #[test]
    fn test_extract_address_empty() {
        assert_eq!(extract_address(""), ShipToAddress::default());
        assert_eq!(extract_address("   \n  "), ShipToAddress::default());
        assert_eq!(ShipToAddress::default().country, "NL");
    }

    #[test]
    fn test_address_source_prefers_lines_over_header() {
        let mut header = HeaderMap::new();
        header.insert("O4".to_string(), "Header Name".to_string());
        let lines = vec![record(&[("P2", "A")]), record(&[("O4", "Line Name")])];

        assert_eq!(find_address_source(&header, &lines), Some("Line Name"));
        assert_eq!(find_address_source(&header, &lines[..1]), Some("Header Name"));
        assert_eq!(find_address_source(&HeaderMap::new(), &lines[..1]), None);
    }

    #[test]
    fn test_empty_first_address_falls_back_to_header() {
        let mut header = HeaderMap::new();
        header.insert("O4".to_string(), "Header Name".to_string());
        let lines = vec![record(&[("O4", "")]), record(&[("O4", "Second Line Name")])];

        assert_eq!(find_address_source(&header, &lines), Some("Header Name"));
        assert_eq!(find_address_source(&HeaderMap::new(), &lines), None);
    }

    #[test]
    fn test_map_order_header_fields() {
        let mut header = HeaderMap::new();
        header.insert("K1".to_string(), "PO123".to_string());
        header.insert("K2".to_string(), "ACC-1".to_string());
        header.insert("K4".to_string(), "2024-05-01".to_string());
        header.insert("Z9".to_string(), "ignored".to_string());

        let order = map_order(&header, &[]);
        assert_eq!(order.order_number, "PO123");
        assert_eq!(order.reference1, "");
        assert_eq!(order.bill_to_account, "ACC-1");
        assert_eq!(order.shipping_reference, "");
        assert_eq!(order.requested_delivery_date, "2024-05-01");
        assert_eq!(order.ship_to, ShipToAddress::default());
        assert!(order.lines.is_empty());
    }
}
