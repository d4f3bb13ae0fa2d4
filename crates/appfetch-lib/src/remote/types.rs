use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeType {
    Folder,
    Item,
    #[serde(other)]
    Other,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceType {
    File,
    Folder,
    #[serde(other)]
    Other,
}

/// One entry of a metadata listing.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MetadataNode {
    #[serde(default)]
    pub name: Option<String>,
    pub url: String,
    pub resource_type: ResourceType,
    #[serde(default)]
    pub node_type: Option<NodeType>,
    #[serde(default)]
    pub items: Option<Vec<MetadataNode>>,
}

impl MetadataNode {
    pub fn file(url: impl Into<String>) -> Self {
        Self {
            name: None,
            url: url.into(),
            resource_type: ResourceType::File,
            node_type: Some(NodeType::Item),
            items: None,
        }
    }

    pub fn folder(url: impl Into<String>, items: Option<Vec<MetadataNode>>) -> Self {
        Self {
            name: None,
            url: url.into(),
            resource_type: ResourceType::Folder,
            node_type: Some(NodeType::Folder),
            items,
        }
    }
}

/// A single response of `v1/metadata/<folder>`.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ListingPage {
    pub node_type: NodeType,
    #[serde(default)]
    pub items: Vec<MetadataNode>,
    #[serde(default)]
    pub next_token: Option<String>,
}

impl ListingPage {
    /// The continuation token, if the listing has more pages.
    pub fn continuation(&self) -> Option<&str> {
        self.next_token.as_deref().filter(|token| !token.is_empty())
    }
}
