//! Storefront data models
//!
//! Wire types exchanged with the storefront backend. Field names follow the
//! backend's camelCase JSON; optional fields are skipped when absent so
//! request bodies stay minimal.
//!
//! | Module | Contents |
//! |--------|----------|
//! | `customer` | customers, addresses, phone numbers, exchange rates, paging |
//! | `product` | product detail and listing types |
//! | `order` | order summaries, checkout requests, order status |
//! | `search` | search options, filters, search responses |
//! | `layout` | header/footer links and social buttons |
//! | `cart` | cart items for custom cut orders |
//! | `category` | category navigation tree |

pub mod cart;
pub mod category;
pub mod customer;
pub mod layout;
pub mod order;
pub mod product;
pub mod search;

pub use cart::{CartItem, Dimensions, LengthUnit};
pub use category::CategoryNode;
pub use customer::{
    AddressData, CreateCustomerRequestData, CustomerData, ExchangeRate, PagedResults, PhoneNumber,
};
pub use layout::{ShopFooterData, ShopFooterLink, ShopHeaderData, ShopHeaderLink, SharedSocialButton, SocialPlatform};
pub use order::{
    CashOnDeliveryAvailability, CheckoutRequestData, CodBalance, CodFailureReason, CustomsCharge,
    OrderSummaryRequestData, PaymentType, ShopOrderData, ShopOrderListItemData, ShopOrderStatus,
    ShopOrderSummaryData,
};
pub use product::{
    ShopProductAttribute, ShopProductBreadcrumb, ShopProductData, ShopProductListItemData,
    ShopProductPrice, ShopProductRating, ShopProductReview, ShopProductVariantData,
    ShopProductVariantOptionData,
};
pub use search::{
    FilterSearchOptions, SearchSession, ShopFilter, ShopFilterType, ShopGender, ShopSearchOptions,
    ShopSearchResponse, ShopSearchResponseFilters, ShopSearchSort,
};

/// Locale code such as `en` or `tr`
pub type Locale = String;

/// ISO currency code such as `USD`
pub type Currency = String;
