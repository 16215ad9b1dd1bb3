//! Search index construction.
//!
//! Rows come from two sources: the side navigation tree (guides) and the flat
//! API list (symbols). A row is only emitted when its page was rendered, and
//! the combined set must not repeat a (name, type, path) triple.

use std::{
    collections::{BTreeSet, HashSet},
    fmt,
    path::PathBuf,
    str::FromStr,
};

use tracing::debug;

use crate::{
    error::{Result, RxdashError},
    model::{ApiGroup, NavigationNode},
};

/// Extension appended to page ids to form output paths.
pub const PAGE_EXTENSION: &str = "html";

/// Navigation urls that never produce an index entry.
pub const DEFAULT_EXCLUDED_URLS: &[&str] = &["operator-decision-tree"];

/// Entry type stored in the `type` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntryKind {
    /// A navigation page.
    Guide,
    /// `const`
    Constant,
    /// `interface`
    Interface,
    /// `class`
    Class,
    /// `function`
    Function,
    /// `type-alias`
    Type,
    /// `enum`
    Enum,
}

impl EntryKind {
    /// Map an upstream `docType` onto its entry kind.
    pub fn from_doc_type(doc_type: &str) -> Option<Self> {
        match doc_type {
            "const" => Some(Self::Constant),
            "interface" => Some(Self::Interface),
            "class" => Some(Self::Class),
            "function" => Some(Self::Function),
            "type-alias" => Some(Self::Type),
            "enum" => Some(Self::Enum),
            _ => None,
        }
    }

    /// Label written to the index.
    pub fn label(self) -> &'static str {
        match self {
            Self::Guide => "Guide",
            Self::Constant => "Constant",
            Self::Interface => "Interface",
            Self::Class => "Class",
            Self::Function => "Function",
            Self::Type => "Type",
            Self::Enum => "Enum",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EntryKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        [
            Self::Guide,
            Self::Constant,
            Self::Interface,
            Self::Class,
            Self::Function,
            Self::Type,
            Self::Enum,
        ]
        .into_iter()
        .find(|kind| kind.label() == s)
        .ok_or_else(|| format!("unknown entry type: {s}"))
    }
}

/// A single search index row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IndexRow {
    /// Display name.
    pub name: String,
    /// Entry type.
    pub kind: EntryKind,
    /// Page path relative to the documents root, with extension.
    pub path: String,
}

impl IndexRow {
    /// Construct a row.
    pub fn new(name: impl Into<String>, kind: EntryKind, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            path: path.into(),
        }
    }
}

/// Output path for a page id.
pub fn page_path(id: &str) -> String {
    format!("{id}.{PAGE_EXTENSION}")
}

/// Answers whether a rendered page exists.
pub trait RenderedPages {
    /// `path` is relative to the output root and already carries its extension.
    fn page_exists(&self, path: &str) -> bool;
}

/// Checks the rendered output directory on disk.
#[derive(Debug, Clone)]
pub struct OutputDir {
    /// Root of the rendered site.
    root: PathBuf,
}

impl OutputDir {
    /// Check pages under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl RenderedPages for OutputDir {
    fn page_exists(&self, path: &str) -> bool {
        self.root.join(path).is_file()
    }
}

/// Walks navigation and API inputs and produces index rows.
#[derive(Debug, Clone)]
pub struct IndexBuilder<'a, P: RenderedPages> {
    /// Existence gate.
    pages: &'a P,
    /// Navigation urls never indexed.
    excluded: BTreeSet<String>,
}

impl<'a, P: RenderedPages> IndexBuilder<'a, P> {
    /// Create a builder with the default exclusion set.
    pub fn new(pages: &'a P) -> Self {
        Self {
            pages,
            excluded: DEFAULT_EXCLUDED_URLS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Replace the excluded navigation urls.
    pub fn with_excluded<I, S>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded = urls.into_iter().map(Into::into).collect();
        self
    }

    /// Guide rows for every indexable node beneath `root`, including `root` itself.
    pub fn index_navigation(&self, root: &NavigationNode) -> Vec<IndexRow> {
        let mut rows = Vec::new();
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            stack.extend(node.children.iter().rev());
            if let Some(row) = self.navigation_row(node) {
                rows.push(row);
            }
        }
        rows
    }

    /// Row for a single navigation node, after exclusion and alias rewriting.
    fn navigation_row(&self, node: &NavigationNode) -> Option<IndexRow> {
        let (title, url) = match (&node.title, &node.url) {
            (Some(title), Some(url)) => (title.as_str(), url.as_str()),
            _ => return None,
        };
        if self.excluded.contains(url) {
            debug!(url, "navigation entry excluded");
            return None;
        }
        let (title, url) = rewrite_alias(title, url);
        let path = page_path(url);
        if !self.pages.page_exists(&path) {
            debug!(title, path = %path, "skipping navigation entry without rendered page");
            return None;
        }
        Some(IndexRow::new(title, EntryKind::Guide, path))
    }

    /// Symbol rows for every rendered item in `groups`.
    ///
    /// Fails on the first unknown `docType`; no rows are returned in that case.
    pub fn index_api_list(&self, groups: &[ApiGroup]) -> Result<Vec<IndexRow>> {
        let mut rows = Vec::new();
        for item in groups.iter().flat_map(|group| group.items.iter()) {
            let kind = EntryKind::from_doc_type(&item.doc_type).ok_or_else(|| {
                RxdashError::UnknownDocType {
                    title: item.title.clone(),
                    doc_type: item.doc_type.clone(),
                }
            })?;
            let path = page_path(&item.path);
            if !self.pages.page_exists(&path) {
                debug!(title = %item.title, path = %path, "skipping API item without rendered page");
                continue;
            }
            rows.push(IndexRow::new(item.title.clone(), kind, path));
        }
        Ok(rows)
    }

    /// Index both sources and check the combined rows for duplicates.
    pub fn build(&self, navigation: &NavigationNode, groups: &[ApiGroup]) -> Result<SearchIndex> {
        let mut rows = self.index_navigation(navigation);
        rows.extend(self.index_api_list(groups)?);
        SearchIndex::from_rows(rows)
    }
}

/// Legacy navigation aliases: `API` points at the API list page and
/// `Reference` at the API index page.
pub fn rewrite_alias<'t>(title: &'t str, url: &'t str) -> (&'t str, &'t str) {
    match title {
        "API" => ("API List", "api/api-list"),
        "Reference" => (title, "api/index"),
        _ => (title, url),
    }
}

/// A validated set of index rows with no repeated triple.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchIndex {
    /// Rows in insertion order.
    rows: Vec<IndexRow>,
}

impl SearchIndex {
    /// Accept `rows`, rejecting the first repeated (name, type, path) triple.
    pub fn from_rows(rows: Vec<IndexRow>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(rows.len());
        for row in &rows {
            if !seen.insert(row) {
                return Err(RxdashError::DuplicateIndexEntry {
                    name: row.name.clone(),
                    kind: row.kind.label().to_string(),
                    path: row.path.clone(),
                });
            }
        }
        Ok(Self { rows })
    }

    /// Rows in insertion order.
    pub fn rows(&self) -> &[IndexRow] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the index holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows as an order-independent set.
    pub fn row_set(&self) -> BTreeSet<IndexRow> {
        self.rows.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::ApiItem;

    impl RenderedPages for HashSet<String> {
        fn page_exists(&self, path: &str) -> bool {
            self.contains(path)
        }
    }

    fn pages(paths: &[&str]) -> HashSet<String> {
        paths.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn api_alias_is_rewritten_before_page_check() {
        let rendered = pages(&["api/api-list.html"]);
        let root = NavigationNode::section("Docs", vec![NavigationNode::leaf("API", "api")]);
        let rows = IndexBuilder::new(&rendered).index_navigation(&root);
        assert_eq!(rows, vec![IndexRow::new("API List", EntryKind::Guide, "api/api-list.html")]);
    }

    #[test]
    fn reference_alias_keeps_title() {
        let rendered = pages(&["api/index.html", "reference.html"]);
        let root = NavigationNode::section("", vec![NavigationNode::leaf("Reference", "reference")]);
        let rows = IndexBuilder::new(&rendered).index_navigation(&root);
        assert_eq!(rows, vec![IndexRow::new("Reference", EntryKind::Guide, "api/index.html")]);
    }

    #[test]
    fn containers_and_excluded_urls_are_skipped() {
        let rendered = pages(&["operator-decision-tree.html", "guide/overview.html"]);
        let root = NavigationNode::section(
            "Guide",
            vec![
                NavigationNode::leaf("Decision tree", "operator-decision-tree"),
                NavigationNode {
                    title: None,
                    url: Some("guide/overview".into()),
                    children: vec![NavigationNode::leaf("Overview", "guide/overview")],
                },
            ],
        );
        let rows = IndexBuilder::new(&rendered).index_navigation(&root);
        assert_eq!(rows, vec![IndexRow::new("Overview", EntryKind::Guide, "guide/overview.html")]);
    }

    #[test]
    fn custom_exclusions_replace_defaults() {
        let rendered = pages(&["operator-decision-tree.html", "guide/glossary.html"]);
        let root = NavigationNode::section(
            "",
            vec![
                NavigationNode::leaf("Decision tree", "operator-decision-tree"),
                NavigationNode::leaf("Glossary", "guide/glossary"),
            ],
        );
        let rows = IndexBuilder::new(&rendered)
            .with_excluded(["guide/glossary"])
            .index_navigation(&root);
        assert_eq!(
            rows,
            vec![IndexRow::new("Decision tree", EntryKind::Guide, "operator-decision-tree.html")]
        );
    }

    #[test]
    fn walk_does_not_mutate_input() {
        let rendered = pages(&["api/api-list.html"]);
        let root = NavigationNode::section("", vec![NavigationNode::leaf("API", "api")]);
        let before = root.clone();
        let _rows = IndexBuilder::new(&rendered).index_navigation(&root);
        assert_eq!(root, before);
    }

    #[test]
    fn api_items_map_doc_types() {
        let rendered = pages(&["api/a.html", "api/b.html", "api/c.html", "api/d.html", "api/e.html", "api/f.html"]);
        let groups = vec![ApiGroup {
            title: "index".into(),
            items: vec![
                ApiItem::new("A", "api/a", "const"),
                ApiItem::new("B", "api/b", "interface"),
                ApiItem::new("C", "api/c", "class"),
                ApiItem::new("D", "api/d", "function"),
                ApiItem::new("E", "api/e", "type-alias"),
                ApiItem::new("F", "api/f", "enum"),
                ApiItem::new("G", "api/g", "class"),
            ],
        }];
        let rows = IndexBuilder::new(&rendered).index_api_list(&groups).unwrap();
        let labels: Vec<_> = rows.iter().map(|r| (r.name.as_str(), r.kind.label())).collect();
        assert_eq!(
            labels,
            vec![
                ("A", "Constant"),
                ("B", "Interface"),
                ("C", "Class"),
                ("D", "Function"),
                ("E", "Type"),
                ("F", "Enum"),
            ]
        );
    }

    #[test]
    fn unknown_doc_type_is_fatal() {
        let rendered = pages(&["api/a.html"]);
        let groups = vec![ApiGroup {
            title: "index".into(),
            items: vec![ApiItem::new("A", "api/a", "class"), ApiItem::new("pipe", "api/pipe", "decorator")],
        }];
        let err = IndexBuilder::new(&rendered).index_api_list(&groups).unwrap_err();
        assert!(matches!(
            err,
            RxdashError::UnknownDocType { ref title, ref doc_type } if title == "pipe" && doc_type == "decorator"
        ));
    }

    #[test]
    fn duplicates_are_rejected() {
        let rendered = pages(&["api/api-list.html"]);
        let root = NavigationNode::section(
            "",
            vec![NavigationNode::leaf("API", "api"), NavigationNode::leaf("API List", "api/api-list")],
        );
        let err = IndexBuilder::new(&rendered).build(&root, &[]).unwrap_err();
        assert!(matches!(
            err,
            RxdashError::DuplicateIndexEntry { ref name, ref path, .. } if name == "API List" && path == "api/api-list.html"
        ));
    }

    #[test]
    fn same_name_different_type_is_allowed() {
        let rows = vec![
            IndexRow::new("map", EntryKind::Guide, "api/operators/map.html"),
            IndexRow::new("map", EntryKind::Function, "api/operators/map.html"),
        ];
        assert_eq!(SearchIndex::from_rows(rows).unwrap().len(), 2);
    }

    #[test]
    fn kind_labels_round_trip() {
        for label in ["Guide", "Constant", "Interface", "Class", "Function", "Type", "Enum"] {
            assert_eq!(label.parse::<EntryKind>().unwrap().label(), label);
        }
        assert!("Method".parse::<EntryKind>().is_err());
    }
}
