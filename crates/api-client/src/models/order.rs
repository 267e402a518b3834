//! Orders, order summaries and checkout

use super::customer::AddressData;
use super::product::ShopProductData;
use super::{Currency, Locale};
use serde::{Deserialize, Serialize};

/// Why cash on delivery is not available
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CodFailureReason {
    OutstandingShipmentsExceedsLimit,
    OutstandingShipmentsAndNewBasketTotalExceedsLimit,
    CustomerNotEligible,
    CountryNotEligible,
}

/// Customs line on an order summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomsCharge {
    pub label: String,
    pub price: f64,
}

/// Remaining cash-on-delivery allowance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodBalance {
    pub amount: f64,
    pub currency: Currency,
}

/// Cash-on-delivery eligibility for a basket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashOnDeliveryAvailability {
    pub is_available: bool,
    pub cod_balance: CodBalance,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<CodFailureReason>,
}

/// Pricing breakdown for a basket or order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopOrderSummaryData {
    pub vsn: String,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customs_charges: Option<Vec<CustomsCharge>>,
    pub shipment_cost: f64,
    pub currency: Currency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promotion_discount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_code: Option<String>,
    pub product_cost_pre_discount: f64,
    pub product_cost: f64,
    pub product_discount_percent: f64,
    pub total_discount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cod_service_fee: Option<f64>,
    pub total: f64,
    pub total_due: f64,
    pub cash_on_delivery_availability: CashOnDeliveryAvailability,
}

impl ShopOrderSummaryData {
    /// Sum of all customs charges
    #[must_use]
    pub fn customs_total(&self) -> f64 {
        self.customs_charges
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|c| c.price)
            .sum()
    }
}

/// Fulfilment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShopOrderStatus {
    Processing,
    Preparing,
    Shipped,
    Cancelled,
}

impl ShopOrderStatus {
    /// Whether the order can still change
    #[must_use]
    pub fn is_open(self) -> bool {
        matches!(self, Self::Processing | Self::Preparing)
    }
}

/// Order as listed in the account overview
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopOrderListItemData {
    pub id: String,
    pub order_id: String,
    pub created_date: String,
    pub status: ShopOrderStatus,
}

/// Full order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopOrderData {
    pub id: String,
    pub order_id: String,
    pub total_order_product_count: u32,
    pub address: AddressData,
    pub status: ShopOrderStatus,
    pub created_date: String,
    pub products: Vec<ShopProductData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_url: Option<String>,
    pub payment_summary: ShopOrderSummaryData,
}

/// Payment method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentType {
    Stripe,
    UniversalBank,
    #[serde(rename = "COD")]
    Cod,
}

/// Body for pricing a basket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummaryRequestData {
    pub products: Vec<ShopProductData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<AddressData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draft_payment_method: Option<PaymentType>,
    pub locale: Locale,
}

/// Body for placing an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequestData {
    pub id: String,
    pub destination: AddressData,
    pub locale: Locale,
    pub payment_type: PaymentType,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_order_summary_deserialize() {
        let json = json!({
            "vsn": "3",
            "id": "basket-1",
            "customsCharges": [{"label": "VAT", "price": 4.5}, {"label": "Duty", "price": 1.5}],
            "shipmentCost": 10.0,
            "currency": "USD",
            "productCostPreDiscount": 100.0,
            "productCost": 90.0,
            "productDiscountPercent": 10.0,
            "totalDiscount": 10.0,
            "total": 106.0,
            "totalDue": 106.0,
            "cashOnDeliveryAvailability": {
                "isAvailable": false,
                "codBalance": {"amount": 0.0, "currency": "USD"},
                "failureReason": "CountryNotEligible"
            }
        });

        let summary: ShopOrderSummaryData = serde_json::from_value(json).unwrap();
        assert_eq!(summary.customs_total(), 6.0);
        assert_eq!(
            summary.cash_on_delivery_availability.failure_reason,
            Some(CodFailureReason::CountryNotEligible)
        );
    }

    #[test]
    fn test_payment_type_wire_names() {
        assert_eq!(serde_json::to_value(PaymentType::Cod).unwrap(), json!("COD"));
        assert_eq!(
            serde_json::to_value(PaymentType::UniversalBank).unwrap(),
            json!("UniversalBank")
        );
    }

    #[test]
    fn test_order_status() {
        let status: ShopOrderStatus = serde_json::from_value(json!("shipped")).unwrap();
        assert_eq!(status, ShopOrderStatus::Shipped);
        assert!(!status.is_open());
        assert!(ShopOrderStatus::Preparing.is_open());
    }
}
