//! Header and footer content

use serde::{Deserialize, Serialize};

/// Header navigation link; `slug` may be missing for placeholder entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopHeaderLink {
    pub label: String,
    #[serde(default)]
    pub slug: Option<String>,
}

/// Footer link, possibly grouping child links
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopFooterLink {
    pub label: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<ShopFooterLink>>,
}

impl ShopFooterLink {
    /// Links in this subtree that have a URL, depth first
    #[must_use]
    pub fn navigable(&self) -> Vec<&ShopFooterLink> {
        let mut out = Vec::new();
        if self.url.is_some() {
            out.push(self);
        }
        for child in self.children.iter().flatten() {
            out.extend(child.navigable());
        }
        out
    }
}

/// Social network of a share button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SocialPlatform {
    Facebook,
    X,
    Linkedin,
    Instagram,
    Telegram,
}

/// Social link shown in the footer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedSocialButton {
    pub platform: SocialPlatform,
    pub url: String,
}

/// Header content
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopHeaderData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<ShopHeaderLink>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner_links: Option<Vec<ShopHeaderLink>>,
}

/// Footer content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopFooterData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<ShopFooterLink>>,
    pub socials: Vec<SharedSocialButton>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_footer_deserialize() {
        let json = r#"{
            "links": [{
                "label": "Help",
                "url": null,
                "children": [
                    {"label": "Shipping", "url": "/help/shipping"},
                    {"label": "Returns", "url": "/help/returns"}
                ]
            }],
            "socials": [{"platform": "x", "url": "https://x.com/shop"}]
        }"#;

        let footer: ShopFooterData = serde_json::from_str(json).unwrap();
        assert_eq!(footer.socials[0].platform, SocialPlatform::X);

        let help = &footer.links.unwrap()[0];
        let labels: Vec<_> = help.navigable().iter().map(|l| l.label.as_str()).collect();
        assert_eq!(labels, vec!["Shipping", "Returns"]);
    }

    #[test]
    fn test_header_link_without_slug() {
        let header: ShopHeaderData =
            serde_json::from_str(r#"{"links": [{"label": "Sale", "slug": null}, {"label": "New"}]}"#).unwrap();
        let links = header.links.unwrap();
        assert!(links.iter().all(|l| l.slug.is_none()));
        assert!(header.banner_links.is_none());
    }
}
