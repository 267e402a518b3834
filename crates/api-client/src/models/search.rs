//! Search options, filters and results

use super::product::ShopProductListItemData;
use super::Locale;
use serde::{Deserialize, Serialize};

/// Gender facet; the backend encodes these as digit strings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShopGender {
    #[serde(rename = "1")]
    Women,
    #[serde(rename = "2")]
    Men,
    #[serde(rename = "3")]
    Children,
    #[serde(rename = "4")]
    Girls,
    #[serde(rename = "5")]
    Boys,
    #[serde(rename = "6")]
    BabyGirls,
    #[serde(rename = "7")]
    BabyBoys,
}

impl ShopGender {
    /// Wire code
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Women => "1",
            Self::Men => "2",
            Self::Children => "3",
            Self::Girls => "4",
            Self::Boys => "5",
            Self::BabyGirls => "6",
            Self::BabyBoys => "7",
        }
    }
}

/// Sort orders offered by the search backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShopSearchSort {
    Dsc,
    Asc,
    Rcc,
    Bst,
    Fav,
    Rct,
}

impl ShopSearchSort {
    /// Wire code
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Dsc => "dsc",
            Self::Asc => "asc",
            Self::Rcc => "rcc",
            Self::Bst => "bst",
            Self::Fav => "fav",
            Self::Rct => "rct",
        }
    }
}

/// Search request options
///
/// Also used, partially filled, for breadcrumbs and the options echoed back
/// by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopSearchOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub locale: Locale,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<ShopGender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    /// Skip query translation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nt: Option<bool>,
    /// Skip filter computation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nf: Option<bool>,
    /// Opaque search session token returned by the backend
    #[serde(rename = "_S1", default, skip_serializing_if = "Option::is_none")]
    pub s1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<ShopSearchSort>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ph: Option<String>,
    /// Extra terms, forwarded verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Price range as `min-max`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
}

impl ShopSearchOptions {
    /// Options for a locale with nothing else set
    pub fn new(locale: impl Into<Locale>) -> Self {
        Self {
            locale: locale.into(),
            ..Self::default()
        }
    }

    /// Set the free-text query
    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Restrict to a category
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set the sort order
    #[must_use]
    pub fn with_sort(mut self, sort: ShopSearchSort) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Set the page
    #[must_use]
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Carry the backend's search session forward
    #[must_use]
    pub fn with_session(mut self, session: &SearchSession) -> Self {
        if session.s1.is_some() {
            self.s1.clone_from(&session.s1);
        }
        self
    }

    /// Options for the page after this one
    #[must_use]
    pub fn next_page(&self) -> Self {
        let mut next = self.clone();
        next.page = Some(self.page.unwrap_or(1) + 1);
        next
    }

    /// Apply a filter's options on top of these, restarting from page one
    #[must_use]
    pub fn apply_filter(&self, filter: &ShopFilter) -> Self {
        let mut next = self.clone();
        let opts = &filter.search_options;
        let merge = |slot: &mut Option<String>, value: &Option<String>| {
            if value.is_some() {
                slot.clone_from(value);
            }
        };
        merge(&mut next.query, &opts.query);
        merge(&mut next.brand, &opts.brand);
        merge(&mut next.category, &opts.category);
        merge(&mut next.size, &opts.size);
        merge(&mut next.price, &opts.price);
        merge(&mut next.color, &opts.color);
        if opts.color.is_none() {
            merge(&mut next.color, &opts.colors);
        }
        if opts.gender.is_some() {
            next.gender = opts.gender;
        }
        next.page = None;
        next
    }

    /// Query pairs for a search request, in a stable order
    #[must_use]
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(&str, String)> = Vec::new();

        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        let text = [
            ("query", &self.query),
            ("brand", &self.brand),
            ("category", &self.category),
        ];
        pairs.extend(
            text.iter()
                .filter_map(|&(k, v)| v.clone().map(|v| (k, v))),
        );
        if !self.locale.is_empty() {
            pairs.push(("locale", self.locale.clone()));
        }
        if let Some(gender) = self.gender {
            pairs.push(("gender", gender.code().to_string()));
        }
        if let Some(ref size) = self.size {
            pairs.push(("size", size.clone()));
        }
        if let Some(nt) = self.nt {
            pairs.push(("nt", nt.to_string()));
        }
        if let Some(nf) = self.nf {
            pairs.push(("nf", nf.to_string()));
        }
        if let Some(ref s1) = self.s1 {
            pairs.push(("_S1", s1.clone()));
        }
        if let Some(sort) = self.sort {
            pairs.push(("sort", sort.code().to_string()));
        }
        let rest = [
            ("ph", &self.ph),
            ("xt", &self.xt),
            ("collection", &self.collection),
            ("color", &self.color),
            ("price", &self.price),
        ];
        pairs.extend(
            rest.iter()
                .filter_map(|&(k, v)| v.clone().map(|v| (k, v))),
        );

        pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
    }
}

/// Kind of facet a filter belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShopFilterType {
    Brand,
    Category,
    Gender,
    Size,
    Price,
    Color,
}

/// Options a filter contributes to a search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSearchOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<ShopGender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Selectable facet value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopFilter {
    #[serde(rename = "type")]
    pub filter_type: ShopFilterType,
    pub text: String,
    pub search_options: FilterSearchOptions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_multiple: Option<bool>,
}

/// Facets returned with a search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopSearchResponseFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_options: Option<ShopSearchOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<ShopFilter>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brands: Option<Vec<ShopFilter>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genders: Option<Vec<ShopFilter>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sizes: Option<Vec<ShopFilter>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<ShopFilter>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_ranges: Option<Vec<ShopFilter>>,
}

impl ShopSearchResponseFilters {
    /// Every filter across all facets
    pub fn iter(&self) -> impl Iterator<Item = &ShopFilter> {
        [
            &self.categories,
            &self.brands,
            &self.genders,
            &self.sizes,
            &self.colors,
            &self.price_ranges,
        ]
        .into_iter()
        .flatten()
        .flatten()
    }

    /// Filters currently applied
    pub fn selected(&self) -> impl Iterator<Item = &ShopFilter> {
        self.iter().filter(|f| f.selected == Some(true))
    }
}

/// Session data to send back with follow-up searches
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchSession {
    #[serde(rename = "_S1", default, skip_serializing_if = "Option::is_none")]
    pub s1: Option<String>,
}

/// Search results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopSearchResponse {
    pub products: Vec<ShopProductListItemData>,
    pub total_count: u64,
    /// Query after translation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tq: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<ShopSearchResponseFilters>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_options: Option<Vec<ShopSearchSort>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<SearchSession>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(options: &ShopSearchOptions) -> Vec<(String, String)> {
        options.to_query()
    }

    #[test]
    fn test_to_query_only_set_fields() {
        let options = ShopSearchOptions::new("en")
            .with_query("sneakers")
            .with_sort(ShopSearchSort::Bst);

        assert_eq!(
            pairs(&options),
            vec![
                ("query".to_string(), "sneakers".to_string()),
                ("locale".to_string(), "en".to_string()),
                ("sort".to_string(), "bst".to_string()),
            ]
        );
    }

    #[test]
    fn test_to_query_wire_names() {
        let options = ShopSearchOptions {
            gender: Some(ShopGender::BabyBoys),
            nt: Some(true),
            s1: Some("sess".into()),
            price: Some("10-50".into()),
            ..ShopSearchOptions::new("tr")
        };

        let query = pairs(&options);
        assert!(query.contains(&("gender".to_string(), "7".to_string())));
        assert!(query.contains(&("nt".to_string(), "true".to_string())));
        assert!(query.contains(&("_S1".to_string(), "sess".to_string())));
        assert!(query.contains(&("price".to_string(), "10-50".to_string())));
    }

    #[test]
    fn test_apply_filter_resets_page() {
        let filter: ShopFilter = serde_json::from_str(
            r#"{"type": "brand", "text": "Acme", "searchOptions": {"brand": "acme", "gender": "2"}}"#,
        )
        .unwrap();

        let options = ShopSearchOptions::new("en").with_query("boots").with_page(3);
        let next = options.apply_filter(&filter);

        assert_eq!(next.brand.as_deref(), Some("acme"));
        assert_eq!(next.gender, Some(ShopGender::Men));
        assert_eq!(next.query.as_deref(), Some("boots"));
        assert_eq!(next.page, None);
    }

    #[test]
    fn test_next_page_and_session() {
        let session = SearchSession { s1: Some("abc".into()) };
        let options = ShopSearchOptions::new("en").with_session(&session);
        assert_eq!(options.next_page().page, Some(2));
        assert_eq!(options.next_page().next_page().page, Some(3));
        assert_eq!(options.s1.as_deref(), Some("abc"));
    }

    #[test]
    fn test_search_response_deserialize() {
        let json = r#"{
            "products": [{
                "id": "p-1", "brand": "Acme", "brandId": "b-1", "name": "Boot",
                "url": "/p-1", "imgSrc": "/p-1.jpg",
                "price": {"currentPrice": 10, "originalPrice": 12, "currency": "USD"}
            }],
            "totalCount": 1,
            "tq": "boot",
            "filters": {
                "brands": [{"type": "brand", "text": "Acme", "searchOptions": {"brand": "acme"}, "selected": true}],
                "sizes": [{"type": "size", "text": "42", "searchOptions": {"size": "42"}}]
            },
            "sortOptions": ["dsc", "asc"],
            "session": {"_S1": "s-1"}
        }"#;

        let response: ShopSearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.products[0].brand_id, "b-1");
        assert_eq!(response.sort_options, Some(vec![ShopSearchSort::Dsc, ShopSearchSort::Asc]));
        assert_eq!(response.session.unwrap().s1.as_deref(), Some("s-1"));

        let filters = response.filters.unwrap();
        assert_eq!(filters.iter().count(), 2);
        assert_eq!(filters.selected().map(|f| f.text.as_str()).collect::<Vec<_>>(), vec!["Acme"]);
    }
}
