// Each integration test crate uses a different subset of these helpers.
#![allow(dead_code)]

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde_json::{Value, json};
use tempfile::TempDir;

/// A scratch workspace holding a fake RxJS checkout and a working directory.
pub struct Fixture {
    pub dir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        let fixture = Self {
            dir: TempDir::new().unwrap(),
        };
        fs::create_dir_all(fixture.work()).unwrap();
        fs::create_dir_all(fixture.generated()).unwrap();
        fixture
    }

    pub fn rxjs(&self) -> PathBuf {
        self.dir.path().join("rxjs")
    }

    pub fn work(&self) -> PathBuf {
        self.dir.path().join("work")
    }

    pub fn dist(&self) -> PathBuf {
        self.rxjs().join("docs_app/dist")
    }

    pub fn generated(&self) -> PathBuf {
        self.dist().join("generated")
    }

    pub fn write_json(&self, relative: &str, value: &Value) {
        write_file(&self.generated().join(relative), &serde_json::to_string_pretty(value).unwrap());
    }

    pub fn navigation(&self, side_nav: Value, version: &str) {
        self.write_json(
            "navigation.json",
            &json!({ "SideNav": side_nav, "__versionInfo": { "raw": version } }),
        );
    }

    pub fn guide(&self, id: &str, contents: &str) {
        self.write_json(
            &format!("docs/{id}.json"),
            &json!({ "id": id, "contents": contents }),
        );
    }

    pub fn api_page(&self, id: &str, title: &str, contents: &str) {
        self.write_json(
            &format!("docs/{id}.json"),
            &json!({ "id": id, "title": title, "contents": contents }),
        );
    }

    pub fn api_list(&self, groups: Value) {
        self.write_json("docs/api/api-list.json", &groups);
    }

    /// A small but complete documentation build.
    pub fn standard() -> Self {
        let f = Self::new();
        f.navigation(
            json!([
                { "title": "Introduction", "url": "guide/overview" },
                { "title": "Concepts", "children": [
                    { "title": "Observable", "url": "guide/observable" },
                    { "title": "Never rendered", "url": "guide/missing" },
                    { "title": "Operator Decision Tree", "url": "operator-decision-tree" }
                ]},
                { "title": "Reference", "children": [
                    { "title": "API", "url": "api" }
                ]}
            ]),
            "7.8.1",
        );
        f.guide(
            "guide/overview",
            r#"<h1>Introduction</h1><h2>First examples</h2><a href="/api/index/class/Observable">Observable</a>"#,
        );
        f.guide("guide/observable", r#"<p>no heading</p><a href="guide/overview#first">back</a>"#);
        f.write_json(
            "docs/guide/operator-decision-tree.json",
            &json!({ "id": "operator-decision-tree", "contents": "<h1>Decision tree</h1>" }),
        );
        f.api_page(
            "api/index/class/Observable",
            "Observable",
            r#"<a href="api/index/function/of">of</a><img src="/assets/images/marble.png">"#,
        );
        f.api_page("api/index/function/of", "of", "<p>of</p>");
        f.api_list(json!([
            { "title": "index", "items": [
                { "title": "Observable", "path": "api/index/class/Observable", "docType": "class" },
                { "title": "of", "path": "api/index/function/of", "docType": "function" },
                { "title": "config", "path": "api/index/const/config", "docType": "const" }
            ]}
        ]));
        write_file(&f.dist().join("styles.abc123.css"), "body {}");
        write_file(&f.dist().join("assets/images/marble.png"), "png");
        write_file(&f.work().join("assets/docset.js"), "// js");
        write_file(&f.work().join("templates/icon.png"), "icon");
        f
    }
}

pub fn write_file(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}
