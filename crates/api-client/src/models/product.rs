//! Product types

use super::search::ShopSearchOptions;
use super::Currency;
use serde::{Deserialize, Serialize};

/// Price of a product or variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopProductPrice {
    pub current_price: f64,
    pub original_price: f64,
    pub currency: Currency,
}

impl ShopProductPrice {
    /// Whether the product is marked down
    #[must_use]
    pub fn is_discounted(&self) -> bool {
        self.current_price < self.original_price
    }

    /// Markdown as a whole percentage of the original price
    #[must_use]
    pub fn discount_percent(&self) -> u32 {
        if !self.is_discounted() || self.original_price <= 0.0 {
            return 0;
        }
        let ratio = 1.0 - self.current_price / self.original_price;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let percent = (ratio * 100.0).round() as u32;
        percent
    }
}

/// Aggregated review score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopProductRating {
    pub average_rating: f64,
    pub total_count: u64,
}

/// Product as shown in search results and listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopProductListItemData {
    pub id: String,
    pub brand: String,
    pub brand_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub name: String,
    pub url: String,
    pub img_src: String,
    pub price: ShopProductPrice,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<ShopProductRating>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breadcrumbs: Option<String>,
}

/// One selectable value of a variant (a size, a color)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopProductVariantOptionData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub value: String,
    pub is_available: bool,
    pub selected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

/// Variant dimension with its options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShopProductVariantData {
    pub name: String,
    pub options: Vec<ShopProductVariantOptionData>,
}

impl ShopProductVariantData {
    /// Currently selected option
    #[must_use]
    pub fn selected(&self) -> Option<&ShopProductVariantOptionData> {
        self.options.iter().find(|o| o.selected)
    }
}

/// Name/value attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopProductAttribute {
    pub name: String,
    pub value: String,
}

/// Customer review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShopProductReview {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// Breadcrumb linking back to a search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopProductBreadcrumb {
    pub text: String,
    pub search_options: ShopSearchOptions,
}

/// Full product, also used for basket lines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopProductData {
    pub id: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img_src: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variants: Option<Vec<ShopProductVariantData>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub price: ShopProductPrice,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<ShopProductRating>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Vec<ShopProductAttribute>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviews: Option<Vec<ShopProductReview>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_recommendation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_guide: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breadcrumbs: Option<Vec<ShopProductBreadcrumb>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
}

impl ShopProductData {
    /// Line total at the current price
    #[must_use]
    pub fn line_total(&self) -> f64 {
        self.price.current_price * f64::from(self.quantity)
    }
}
