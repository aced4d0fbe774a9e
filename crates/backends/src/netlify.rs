//! Netlify backend.
//!
//! Talks to the Netlify deploy API. Netlify reports a SHA-1 per published
//! file — the same digest the manifest crate computes — so true incremental
//! diffing works against the live site.

use std::future::Future;
use std::pin::Pin;

use serde::Deserialize;
use siteship_manifest::Manifest;
use siteship_publish::{Backend, ProbeReport, PublishError, UploadOutcome};
use siteship_settings::Settings;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::paths::{site_relative, url_path};

const NETLIFY_API: &str = "https://api.netlify.com/api/v1";

/// Backend publishing through the Netlify API.
pub struct NetlifyBackend {
    client: reqwest::Client,
    base: String,
    site_id: String,
    token: String,
    /// Deploy session, created lazily on the first upload.
    deploy_id: OnceCell<String>,
}

#[derive(Debug, Deserialize)]
struct DeployResource {
    id: String,
}

#[derive(Debug, Deserialize)]
struct FileResource {
    /// Site-absolute path, e.g. `/index.html`.
    id: String,
    sha: String,
}

impl NetlifyBackend {
    /// Builds the backend from user settings. Requires the access token and
    /// site id; honors the proxy configuration.
    pub fn from_settings(settings: &Settings) -> Result<Self, PublishError> {
        if settings.netlify_access_token.is_empty() || settings.netlify_site_id.is_empty() {
            return Err(PublishError::AdapterInit(
                "netlify access token and site id are required".into(),
            ));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(proxy) = settings.proxy_url() {
            builder = builder.proxy(
                reqwest::Proxy::all(&proxy)
                    .map_err(|e| PublishError::AdapterInit(format!("invalid proxy: {e}")))?,
            );
        }
        let client = builder
            .build()
            .map_err(|e| PublishError::AdapterInit(e.to_string()))?;

        Ok(Self {
            client,
            base: NETLIFY_API.to_string(),
            site_id: settings.netlify_site_id.clone(),
            token: settings.netlify_access_token.clone(),
            deploy_id: OnceCell::new(),
        })
    }

    async fn deploy_id(&self) -> Result<&str, PublishError> {
        let id = self
            .deploy_id
            .get_or_try_init(|| async {
                let url = format!("{}/sites/{}/deploys", self.base, self.site_id);
                let resp = self
                    .client
                    .post(&url)
                    .bearer_auth(&self.token)
                    .json(&serde_json::json!({}))
                    .send()
                    .await
                    .map_err(http_err)?;

                if !resp.status().is_success() {
                    return Err(PublishError::Http(format!(
                        "deploy create failed: {}",
                        resp.status()
                    )));
                }

                let deploy: DeployResource = resp.json().await.map_err(http_err)?;
                debug!(deploy = %deploy.id, "created netlify deploy");
                Ok(deploy.id)
            })
            .await?;
        Ok(id)
    }
}

fn http_err(e: reqwest::Error) -> PublishError {
    PublishError::Http(e.to_string())
}

fn manifest_from_files(files: Vec<FileResource>) -> Manifest {
    files
        .into_iter()
        .map(|f| {
            let key = if f.id.starts_with('/') {
                f.id
            } else {
                format!("/{}", f.id)
            };
            (key, f.sha.to_lowercase())
        })
        .collect()
}

impl Backend for NetlifyBackend {
    fn name(&self) -> &str {
        "netlify"
    }

    fn probe(&self) -> Pin<Box<dyn Future<Output = Result<ProbeReport, PublishError>> + Send + '_>> {
        Box::pin(async {
            let url = format!("{}/sites/{}", self.base, self.site_id);
            let resp = self
                .client
                .get(&url)
                .bearer_auth(&self.token)
                .send()
                .await
                .map_err(http_err)?;

            Ok(ProbeReport {
                reachable: resp.status().is_success(),
                detail: format!("site lookup: {}", resp.status()),
            })
        })
    }

    fn upload(
        &self,
        rel_path: &str,
        content: &[u8],
    ) -> Pin<Box<dyn Future<Output = Result<UploadOutcome, PublishError>> + Send + '_>> {
        let key = rel_path.to_string();
        let content = content.to_vec();
        Box::pin(async move {
            site_relative(&key)?;
            let deploy_id = self.deploy_id().await?;

            let url = format!("{}/deploys/{}/files{}", self.base, deploy_id, url_path(&key));
            let resp = self
                .client
                .put(&url)
                .bearer_auth(&self.token)
                .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
                .body(content)
                .send()
                .await
                .map_err(http_err)?;

            let status = resp.status();
            if status.is_success() {
                Ok(UploadOutcome::success(status.to_string()))
            } else {
                Ok(UploadOutcome::failure(status.to_string()))
            }
        })
    }

    fn list_remote_manifest(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Manifest>, PublishError>> + Send + '_>> {
        Box::pin(async {
            let url = format!("{}/sites/{}/files", self.base, self.site_id);
            let resp = self
                .client
                .get(&url)
                .bearer_auth(&self.token)
                .send()
                .await
                .map_err(http_err)?;

            if !resp.status().is_success() {
                return Err(PublishError::Http(format!(
                    "file listing failed: {}",
                    resp.status()
                )));
            }

            let files: Vec<FileResource> = resp.json().await.map_err(http_err)?;
            Ok(Some(manifest_from_files(files)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use siteship_settings::ProxyMode;

    fn netlify_settings() -> Settings {
        let mut settings = Settings::default();
        settings.netlify_access_token = "tok".into();
        settings.netlify_site_id = "site-1".into();
        settings
    }

    #[test]
    fn requires_token_and_site_id() {
        let Err(err) = NetlifyBackend::from_settings(&Settings::default()) else {
            panic!("empty settings should fail init");
        };
        assert!(matches!(err, PublishError::AdapterInit(_)));

        let backend = NetlifyBackend::from_settings(&netlify_settings()).unwrap();
        assert_eq!(backend.name(), "netlify");
        assert_eq!(backend.site_id, "site-1");
    }

    #[test]
    fn honors_proxy_settings() {
        let mut settings = netlify_settings();
        settings.enabled_proxy = ProxyMode::Proxy;
        settings.proxy_path = "http://127.0.0.1".into();
        settings.proxy_port = "1080".into();
        assert!(NetlifyBackend::from_settings(&settings).is_ok());
    }

    #[test]
    fn file_listing_becomes_a_manifest() {
        let files: Vec<FileResource> = serde_json::from_str(
            r#"[
                {"id": "/index.html", "sha": "ABCDEF0123"},
                {"id": "css/site.css", "sha": "0011223344"}
            ]"#,
        )
        .unwrap();

        let manifest = manifest_from_files(files);
        assert_eq!(manifest.get("/index.html").unwrap(), "abcdef0123");
        assert_eq!(manifest.get("/css/site.css").unwrap(), "0011223344");
    }
}
