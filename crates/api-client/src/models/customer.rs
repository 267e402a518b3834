//! Customers, addresses and shared value types

use serde::{Deserialize, Serialize};

/// Currency conversion rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRate {
    pub from: String,
    pub to: String,
    pub rate: f64,
}

/// Customer profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerData {
    pub full_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub culture: Option<String>,
}

/// Body for creating a customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateCustomerRequestData {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub culture: String,
}

/// One page of results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResults<T> {
    pub current_page: u32,
    pub page_count: u32,
    pub page_size: u32,
    pub total_record_count: u64,
    pub results: Vec<T>,
}

impl<T> PagedResults<T> {
    /// Whether another page follows this one
    #[must_use]
    pub fn has_next_page(&self) -> bool {
        self.current_page < self.page_count
    }
}

/// Delivery address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressData {
    pub id: i64,
    pub name: String,
    pub contact_name: String,
    pub contact_surname: String,
    pub father_name: String,
    pub date_of_birth: String,
    pub passport_number: String,
    pub phone_code: String,
    pub phone_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_number: Option<String>,
    pub line1: String,
    pub line2: String,
    pub line3: String,
    pub postcode: String,
    pub district: String,
    pub city: String,
    pub state: String,
    /// Destination country code
    pub country_code: String,
}

/// Phone number split into dialing code and local number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneNumber {
    pub phone_code: String,
    pub phone_number: String,
}

impl PhoneNumber {
    /// Number in `+<code> <number>` form
    #[must_use]
    pub fn international(&self) -> String {
        format!("+{} {}", self.phone_code.trim_start_matches('+'), self.phone_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paged_results_deserialize() {
        let json = r#"{
            "currentPage": 1,
            "pageCount": 3,
            "pageSize": 2,
            "totalRecordCount": 6,
            "results": [{"from": "USD", "to": "TRY", "rate": 32.5}]
        }"#;

        let page: PagedResults<ExchangeRate> = serde_json::from_str(json).unwrap();
        assert_eq!(page.results.len(), 1);
        assert_eq!(page.results[0].to, "TRY");
        assert!(page.has_next_page());
    }

    #[test]
    fn test_customer_skips_missing_optionals() {
        let customer = CustomerData {
            full_name: "Ada Lovelace".into(),
            email: "ada@shop.test".into(),
            phone_code: None,
            phone_number: None,
            culture: Some("en-GB".into()),
        };
        let value = serde_json::to_value(&customer).unwrap();
        assert_eq!(value["fullName"], "Ada Lovelace");
        assert!(value.get("phoneCode").is_none());
        assert_eq!(value["culture"], "en-GB");
    }

    #[test]
    fn test_phone_number_international() {
        let phone = PhoneNumber {
            phone_code: "+90".into(),
            phone_number: "5551234567".into(),
        };
        assert_eq!(phone.international(), "+90 5551234567");
    }
}
