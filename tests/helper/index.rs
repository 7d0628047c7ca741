//! A package index served by mockito, speaking the PyPI JSON API

use mockito::{Mock, Server, ServerGuard};
use serde_json::{Map, Value, json};

/// One published release of a package
pub struct Release {
    pub version: &'static str,
    pub upload_time: &'static str,
    pub filename: String,
    /// Archive bytes, or None when the file is listed but must never be downloaded
    pub archive: Option<Vec<u8>>,
}

impl Release {
    pub fn new(
        version: &'static str,
        upload_time: &'static str,
        filename: impl Into<String>,
        archive: Vec<u8>,
    ) -> Self {
        Self {
            version,
            upload_time,
            filename: filename.into(),
            archive: Some(archive),
        }
    }

    /// A release whose sdist is listed but has no body to serve
    pub fn listed_only(
        version: &'static str,
        upload_time: &'static str,
        filename: impl Into<String>,
    ) -> Self {
        Self {
            version,
            upload_time,
            filename: filename.into(),
            archive: None,
        }
    }
}

pub struct FakeIndex {
    server: ServerGuard,
    mocks: Vec<Mock>,
    untouched: Vec<Mock>,
}

impl FakeIndex {
    pub async fn start() -> Self {
        Self {
            server: Server::new_async().await,
            mocks: Vec::new(),
            untouched: Vec::new(),
        }
    }

    pub fn url(&self) -> String {
        self.server.url()
    }

    /// Serve `/pypi/{name}/json` and every release archive under `/packages/`
    pub async fn publish(&mut self, name: &str, current: &str, releases: Vec<Release>) {
        let mut listing = Map::new();

        for release in releases {
            let path = format!("/packages/{}", release.filename);
            listing.insert(
                release.version.to_string(),
                json!([{
                    "packagetype": "sdist",
                    "filename": release.filename,
                    "url": format!("{}{}", self.server.url(), path),
                    "upload_time": release.upload_time,
                }]),
            );

            match release.archive {
                Some(bytes) => {
                    let mock = self
                        .server
                        .mock("GET", path.as_str())
                        .with_status(200)
                        .with_body(bytes)
                        .create_async()
                        .await;
                    self.mocks.push(mock);
                }
                None => {
                    let mock = self
                        .server
                        .mock("GET", path.as_str())
                        .with_status(200)
                        .expect(0)
                        .create_async()
                        .await;
                    self.untouched.push(mock);
                }
            }
        }

        let body = json!({
            "info": { "name": name, "version": current },
            "releases": Value::Object(listing),
        });
        let mock = self
            .server
            .mock("GET", format!("/pypi/{name}/json").as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await;
        self.mocks.push(mock);
    }

    /// Answer `/pypi/{name}/json` with 404
    pub async fn missing(&mut self, name: &str) {
        let mock = self
            .server
            .mock("GET", format!("/pypi/{name}/json").as_str())
            .with_status(404)
            .create_async()
            .await;
        self.mocks.push(mock);
    }

    /// Check that no listed-only archive was downloaded
    pub async fn assert_untouched(&self) {
        for mock in &self.untouched {
            mock.assert_async().await;
        }
    }
}
