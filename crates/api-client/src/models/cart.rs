//! Cart items for custom cut orders

use serde::{Deserialize, Serialize};

/// Unit for part dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    Mm,
    Inch,
}

/// Part dimensions as entered by the customer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: String,
    pub height: String,
    pub unit: LengthUnit,
}

impl Dimensions {
    /// Width and height in millimetres, if both parse as numbers
    #[must_use]
    pub fn in_mm(&self) -> Option<(f64, f64)> {
        let width: f64 = self.width.trim().parse().ok()?;
        let height: f64 = self.height.trim().parse().ok()?;
        let factor = match self.unit {
            LengthUnit::Mm => 1.0,
            LengthUnit::Inch => 25.4,
        };
        Some((width * factor, height * factor))
    }
}

/// Line in the cart
///
/// The uploaded file itself never goes over the wire; only its URL once
/// stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: String,
    pub file_name: String,
    pub material: String,
    pub thickness: String,
    pub quantity: u32,
    pub coating: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_services: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub svg: Option<String>,
    #[serde(rename = "priceTL", default, skip_serializing_if = "Option::is_none")]
    pub price_tl: Option<String>,
    #[serde(rename = "priceUSD", default, skip_serializing_if = "Option::is_none")]
    pub price_usd: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_item_deserialize() {
        let json = r#"{
            "id": "c-1",
            "fileName": "bracket.dxf",
            "material": "steel",
            "thickness": "2",
            "quantity": 4,
            "coating": "none",
            "fileUrl": null,
            "priceUSD": "12.40",
            "dimensions": {"width": "2", "height": "1.5", "unit": "inch"}
        }"#;

        let item: CartItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.price_usd.as_deref(), Some("12.40"));
        assert!(item.file_url.is_none());

        let (w, h) = item.dimensions.unwrap().in_mm().unwrap();
        assert!((w - 50.8).abs() < 1e-9);
        assert!((h - 38.1).abs() < 1e-9);
    }

    #[test]
    fn test_dimensions_rejects_garbage() {
        let dims = Dimensions {
            width: "wide".into(),
            height: "10".into(),
            unit: LengthUnit::Mm,
        };
        assert!(dims.in_mm().is_none());
    }
}
