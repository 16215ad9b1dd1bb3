//! Shapes of the JSON documents emitted by the RxJS documentation build.
//!
//! Only the fields read by the site renderer and the index builder are
//! modelled; everything else in the generated files is ignored.

use std::{fs, path::Path};

use serde::{Deserialize, de::DeserializeOwned};

use crate::error::{IoContext, Result};

/// One node of the side navigation tree.
///
/// Navigation data is external and loosely shaped: container nodes carry only
/// `children`, leaves may omit `children`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NavigationNode {
    /// Display title.
    #[serde(default)]
    pub title: Option<String>,
    /// Page id relative to the output root, without extension.
    #[serde(default)]
    pub url: Option<String>,
    /// Nested nodes.
    #[serde(default)]
    pub children: Vec<Self>,
}

impl NavigationNode {
    /// A leaf node with a title and url.
    pub fn leaf(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            url: Some(url.into()),
            children: Vec::new(),
        }
    }

    /// A titled container node without a url.
    pub fn section(title: impl Into<String>, children: Vec<Self>) -> Self {
        Self {
            title: Some(title.into()),
            url: None,
            children,
        }
    }
}

/// Version stamp embedded in `navigation.json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VersionInfo {
    /// Full version string, e.g. `7.8.1`.
    #[serde(default)]
    pub raw: String,
}

/// Top-level `navigation.json` document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Navigation {
    /// The side navigation forest.
    #[serde(rename = "SideNav", default)]
    pub side_nav: Vec<NavigationNode>,
    /// Version of the documented library.
    #[serde(rename = "__versionInfo", default)]
    pub version_info: VersionInfo,
}

impl Navigation {
    /// Wrap the side navigation forest in a synthetic container root.
    pub fn root(&self) -> NavigationNode {
        NavigationNode {
            title: None,
            url: None,
            children: self.side_nav.clone(),
        }
    }
}

/// A titled group of API items in `api-list.json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiGroup {
    /// Group title, usually the import path.
    pub title: String,
    /// Items in the group.
    #[serde(default)]
    pub items: Vec<ApiItem>,
}

/// A single exported symbol in `api-list.json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiItem {
    /// Symbol name.
    pub title: String,
    /// Page id of the symbol's documentation, without extension.
    pub path: String,
    /// Raw doc type as emitted upstream; validated by the index builder.
    #[serde(rename = "docType")]
    pub doc_type: String,
}

impl ApiItem {
    /// Construct an item from its parts.
    pub fn new(title: impl Into<String>, path: impl Into<String>, doc_type: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            path: path.into(),
            doc_type: doc_type.into(),
        }
    }
}

/// A rendered content document (guide, API page or misc page).
#[derive(Debug, Clone, Deserialize)]
pub struct ContentDoc {
    /// Page id relative to the output root.
    pub id: String,
    /// Optional explicit title.
    #[serde(default)]
    pub title: Option<String>,
    /// HTML body.
    #[serde(default)]
    pub contents: String,
}

/// Read and deserialize a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path).at(path)?;
    Ok(serde_json::from_str(&raw)?)
}
