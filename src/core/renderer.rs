//! Serializes a mapped [`PurchaseOrder`] into the downstream XML schema.
//!
//! The element order is fixed and every element is always written, empty
//! values as self-closing tags.

use crate::domain::model::{OrderLine, PurchaseOrder, ShipToAddress};
use crate::utils::error::{ConvertError, Result};
use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

const INDENT_SIZE: usize = 2;

type XmlWriter = Writer<Vec<u8>>;

fn open(writer: &mut XmlWriter, name: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    Ok(())
}

fn close(writer: &mut XmlWriter, name: &str) -> Result<()> {
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn text_element(writer: &mut XmlWriter, name: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        writer.write_event(Event::Empty(BytesStart::new(name)))?;
        return Ok(());
    }
    open(writer, name)?;
    writer.write_event(Event::Text(BytesText::from_escaped(partial_escape(value))))?;
    close(writer, name)
}

fn write_ship_to(writer: &mut XmlWriter, address: &ShipToAddress) -> Result<()> {
    open(writer, "ShipToAddress")?;
    text_element(writer, "Name", &address.name)?;
    text_element(writer, "StreetName", &address.street)?;
    text_element(writer, "ZipCode", &address.zip_code)?;
    text_element(writer, "City", &address.city)?;
    text_element(writer, "Region", &address.region)?;
    text_element(writer, "Country", &address.country)?;
    text_element(writer, "ExtraAddressInfo1", &address.extra_address_info)?;
    close(writer, "ShipToAddress")
}

fn write_line(writer: &mut XmlWriter, line: &OrderLine) -> Result<()> {
    open(writer, "Line")?;
    text_element(writer, "Reference", &line.reference)?;
    text_element(writer, "Quantity", &line.quantity.to_string())?;
    text_element(writer, "ItemId", &line.item_id)?;
    text_element(writer, "Description", "")?;

    if line.attributes.is_empty() {
        text_element(writer, "Attributes", "")?;
    } else {
        open(writer, "Attributes")?;
        for attribute in &line.attributes {
            open(writer, "Attribute")?;
            text_element(writer, "Key", &attribute.key)?;
            text_element(writer, "Value", &attribute.value)?;
            close(writer, "Attribute")?;
        }
        close(writer, "Attributes")?;
    }

    close(writer, "Line")
}

/// Reject orders that could not have come out of the mapper.
fn check_contract(order: &PurchaseOrder) -> Result<()> {
    for (index, line) in order.lines.iter().enumerate() {
        if line.attributes.iter().any(|attribute| attribute.key.is_empty()) {
            return Err(ConvertError::ContractViolation {
                message: format!("line {} has an attribute without a key", index + 1),
            });
        }
    }
    Ok(())
}

/// Render the order as pretty-printed UTF-8 XML with a declaration.
pub fn render(order: &PurchaseOrder) -> Result<String> {
    check_contract(order)?;

    let mut writer = Writer::new_with_indent(Vec::new(), b' ', INDENT_SIZE);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    open(&mut writer, "PurchaseOrder")?;
    text_element(&mut writer, "PurchaseOrderNumber", &order.order_number)?;
    text_element(&mut writer, "Reference1", &order.reference1)?;
    text_element(&mut writer, "ShippingReference", &order.shipping_reference)?;
    text_element(&mut writer, "BillToAccount", &order.bill_to_account)?;
    text_element(&mut writer, "RequestedDeliveryDate", &order.requested_delivery_date)?;
    write_ship_to(&mut writer, &order.ship_to)?;

    if order.lines.is_empty() {
        text_element(&mut writer, "Lines", "")?;
    } else {
        open(&mut writer, "Lines")?;
        for line in &order.lines {
            write_line(&mut writer, line)?;
        }
        close(&mut writer, "Lines")?;
    }
    close(&mut writer, "PurchaseOrder")?;

    let mut xml = String::from_utf8(writer.into_inner())?;
    xml.push('\n');
    Ok(xml)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Attribute, Quantity};

    fn sample_order() -> PurchaseOrder {
        PurchaseOrder {
            order_number: "PO123".to_string(),
            bill_to_account: "ACC-1".to_string(),
            ship_to: ShipToAddress {
                name: "J. Smith".to_string(),
                zip_code: "1234AB".to_string(),
                city: "Amsterdam".to_string(),
                ..ShipToAddress::default()
            },
            lines: vec![OrderLine {
                reference: "LINE-1".to_string(),
                quantity: Quantity::Count(3),
                item_id: "ITEM9".to_string(),
                attributes: vec![Attribute::new("X1", "a & b")],
            }],
            ..PurchaseOrder::default()
        }
    }

    #[test]
    fn test_render_layout() {
        let xml = render(&sample_order()).unwrap();
        let expected = "\
<?xml version=\"1.0\" encoding=\"UTF-8\"?>
<PurchaseOrder>
  <PurchaseOrderNumber>PO123</PurchaseOrderNumber>
  <Reference1/>
  <ShippingReference/>
  <BillToAccount>ACC-1</BillToAccount>
  <RequestedDeliveryDate/>
  <ShipToAddress>
    <Name>J. Smith</Name>
    <StreetName/>
    <ZipCode>1234AB</ZipCode>
    <City>Amsterdam</City>
    <Region/>
    <Country>NL</Country>
    <ExtraAddressInfo1/>
  </ShipToAddress>
  <Lines>
    <Line>
      <Reference>LINE-1</Reference>
      <Quantity>3</Quantity>
      <ItemId>ITEM9</ItemId>
      <Description/>
      <Attributes>
        <Attribute>
          <Key>X1</Key>
          <Value>a &amp; b</Value>
        </Attribute>
      </Attributes>
    </Line>
  </Lines>
</PurchaseOrder>
";
        assert_eq!(xml, expected);
    }

    #[test]
    fn test_render_empty_order() {
        let xml = render(&PurchaseOrder::default()).unwrap();
        assert!(xml.contains("  <PurchaseOrderNumber/>\n"));
        assert!(xml.contains("    <Country>NL</Country>\n"));
        assert!(xml.contains("  <Lines/>\n"));
        assert!(xml.lines().all(|line| !line.trim().is_empty()));
    }

    #[test]
    fn test_render_is_deterministic() {
        let order = sample_order();
        assert_eq!(render(&order).unwrap(), render(&order).unwrap());
    }

    #[test]
    fn test_render_escapes_markup_only() {
        let mut order = sample_order();
        order.ship_to.name = "O'Neil <Trading>".to_string();
        let xml = render(&order).unwrap();
        assert!(xml.contains("<Name>O'Neil &lt;Trading&gt;</Name>"));
    }

    #[test]
    fn test_render_line_without_attributes() {
        let mut order = sample_order();
        order.lines[0].attributes.clear();
        order.lines[0].quantity = Quantity::Raw("2,5".to_string());
        let xml = render(&order).unwrap();
        assert!(xml.contains("      <Quantity>2,5</Quantity>\n"));
        assert!(xml.contains("      <Attributes/>\n"));
    }

    #[test]
    fn test_render_rejects_attribute_without_key() {
        let mut order = sample_order();
        order.lines[0].attributes.push(Attribute::new("", "orphan"));
        let err = render(&order).unwrap_err();
        assert!(matches!(err, ConvertError::ContractViolation { .. }));
    }
}
