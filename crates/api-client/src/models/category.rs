//! Category navigation tree
//!
//! Top-level nodes are departments, their children are groups, and the
//! groups' children are the leaves a shopper actually picks. Keys double as
//! translation keys for display.

use serde::{Deserialize, Serialize};

/// Node in the category tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryNode {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<CategoryNode>>,
}

impl CategoryNode {
    /// Node without icon or children
    pub fn leaf(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            icon: None,
            children: None,
        }
    }

    /// Node with children
    pub fn branch(key: impl Into<String>, children: Vec<CategoryNode>) -> Self {
        Self {
            key: key.into(),
            icon: None,
            children: Some(children),
        }
    }

    /// Whether the node has no children
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.as_ref().is_none_or(Vec::is_empty)
    }

    /// Direct children, empty for leaves
    #[must_use]
    pub fn children(&self) -> &[CategoryNode] {
        self.children.as_deref().unwrap_or_default()
    }

    /// All leaves below this node, depth first
    #[must_use]
    pub fn leaves(&self) -> Vec<&CategoryNode> {
        if self.is_leaf() {
            return vec![self];
        }
        self.children().iter().flat_map(CategoryNode::leaves).collect()
    }

    /// Find a node by key in this subtree
    #[must_use]
    pub fn find(&self, key: &str) -> Option<&CategoryNode> {
        if self.key == key {
            return Some(self);
        }
        self.children().iter().find_map(|c| c.find(key))
    }

    /// Nodes from this one down to `key`, inclusive
    #[must_use]
    pub fn path_to(&self, key: &str) -> Option<Vec<&CategoryNode>> {
        if self.key == key {
            return Some(vec![self]);
        }
        self.children().iter().find_map(|c| {
            c.path_to(key).map(|mut path| {
                path.insert(0, self);
                path
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> CategoryNode {
        CategoryNode::branch(
            "women",
            vec![
                CategoryNode::branch(
                    "clothing",
                    vec![CategoryNode::leaf("dresses"), CategoryNode::leaf("jeans")],
                ),
                CategoryNode::branch("shoes", vec![CategoryNode::leaf("boots")]),
            ],
        )
    }

    #[test]
    fn test_leaves() {
        let keys: Vec<_> = tree().leaves().iter().map(|n| n.key.clone()).collect();
        assert_eq!(keys, vec!["dresses", "jeans", "boots"]);
    }

    #[test]
    fn test_find_and_path() {
        let root = tree();
        assert!(root.find("jeans").is_some_and(CategoryNode::is_leaf));
        assert!(root.find("hats").is_none());

        let path: Vec<_> = root
            .path_to("boots")
            .unwrap()
            .iter()
            .map(|n| n.key.as_str())
            .collect();
        assert_eq!(path, vec!["women", "shoes", "boots"]);
    }

    #[test]
    fn test_deserialize_with_icon() {
        let node: CategoryNode =
            serde_json::from_str(r#"{"key": "men", "icon": "man", "children": []}"#).unwrap();
        assert_eq!(node.icon.as_deref(), Some("man"));
        assert!(node.is_leaf());
    }
}
