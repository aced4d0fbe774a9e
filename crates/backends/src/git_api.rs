//! Git-hosting backend (GitHub / Gitee).
//!
//! Publishes through the repository contents REST API: one `PUT
//! /repos/{owner}/{repo}/contents/{path}` per file, base64 payload,
//! updating in place when the file already exists. Git blob shas are not
//! content fingerprints, so this backend reports no remote manifest and the
//! orchestrator uploads the whole build.

use std::future::Future;
use std::pin::Pin;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Deserialize;
use siteship_publish::{Backend, ProbeReport, PublishError, UploadOutcome};
use siteship_settings::{Platform, Settings};
use tracing::debug;

use crate::paths::{site_relative, url_path};

/// Which git-hosting API flavor to speak.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GitHost {
    Github,
    Gitee,
}

impl GitHost {
    fn api_base(&self) -> &'static str {
        match self {
            GitHost::Github => "https://api.github.com",
            GitHost::Gitee => "https://gitee.com/api/v5",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            GitHost::Github => "github",
            GitHost::Gitee => "gitee",
        }
    }
}

/// Backend publishing through a git-hosting contents API.
pub struct GitApiBackend {
    client: reqwest::Client,
    host: GitHost,
    owner: String,
    repo: String,
    branch: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct ContentsMeta {
    sha: String,
}

impl GitApiBackend {
    /// Builds the backend from user settings. `platform` must be a git
    /// host, `repository` an `owner/repo` slug or clone URL, `token` set.
    pub fn from_settings(settings: &Settings) -> Result<Self, PublishError> {
        let host = match settings.platform {
            Platform::Github => GitHost::Github,
            Platform::Gitee => GitHost::Gitee,
            other => {
                return Err(PublishError::AdapterInit(format!(
                    "platform {} is not a git contents API host",
                    other.as_str()
                )));
            }
        };

        if settings.token.is_empty() {
            return Err(PublishError::AdapterInit("access token is required".into()));
        }

        let (owner, repo) = parse_repo_slug(&settings.repository)?;
        let branch = if settings.branch.is_empty() {
            "master".to_string()
        } else {
            settings.branch.clone()
        };

        let mut builder = reqwest::Client::builder().user_agent("siteship");
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
            host,
            owner,
            repo,
            branch,
            token: settings.token.clone(),
        })
    }

    fn repo_url(&self) -> String {
        format!("{}/repos/{}/{}", self.host.api_base(), self.owner, self.repo)
    }

    fn contents_url(&self, rel: &str) -> String {
        format!("{}/contents/{}", self.repo_url(), url_path(rel))
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        let req = self.client.request(method, url);
        match self.host {
            GitHost::Github => req.bearer_auth(&self.token),
            GitHost::Gitee => req.query(&[("access_token", self.token.as_str())]),
        }
    }

    /// Blob sha of the file on the branch, or `None` when it does not
    /// exist yet. The contents API requires it to update in place.
    async fn existing_sha(&self, rel: &str) -> Result<Option<String>, PublishError> {
        let resp = self
            .request(reqwest::Method::GET, &self.contents_url(rel))
            .query(&[("ref", self.branch.as_str())])
            .send()
            .await
            .map_err(http_err)?;

        match resp.status() {
            status if status.is_success() => {
                let meta: ContentsMeta = resp.json().await.map_err(http_err)?;
                Ok(Some(meta.sha))
            }
            reqwest::StatusCode::NOT_FOUND => Ok(None),
            status => Err(PublishError::Http(format!("contents lookup failed: {status}"))),
        }
    }
}

fn http_err(e: reqwest::Error) -> PublishError {
    PublishError::Http(e.to_string())
}

/// Extracts `(owner, repo)` from a slug or clone URL: `owner/repo`,
/// `owner/repo.git`, `https://host/owner/repo`, `git@host:owner/repo.git`.
fn parse_repo_slug(repository: &str) -> Result<(String, String), PublishError> {
    let s = repository.trim().trim_end_matches('/');
    let s = s.strip_suffix(".git").unwrap_or(s);
    let tail = if let Some((_, rest)) = s.split_once("://") {
        rest
    } else if let Some((_, rest)) = s.split_once(':') {
        rest
    } else {
        s
    };

    let parts: Vec<&str> = tail.split('/').filter(|p| !p.is_empty()).collect();
    if parts.len() < 2 {
        return Err(PublishError::AdapterInit(format!(
            "cannot parse repository {repository:?}"
        )));
    }
    Ok((
        parts[parts.len() - 2].to_string(),
        parts[parts.len() - 1].to_string(),
    ))
}

fn upload_payload(rel: &str, content: &[u8], branch: &str, sha: Option<&str>) -> serde_json::Value {
    let mut payload = serde_json::json!({
        "message": format!("publish {rel}"),
        "content": BASE64.encode(content),
        "branch": branch,
    });
    if let Some(sha) = sha {
        payload["sha"] = sha.into();
    }
    payload
}

impl Backend for GitApiBackend {
    fn name(&self) -> &str {
        self.host.label()
    }

    fn probe(&self) -> Pin<Box<dyn Future<Output = Result<ProbeReport, PublishError>> + Send + '_>> {
        Box::pin(async {
            let resp = self
                .request(reqwest::Method::GET, &self.repo_url())
                .send()
                .await
                .map_err(http_err)?;

            Ok(ProbeReport {
                reachable: resp.status().is_success(),
                detail: format!("repository lookup: {}", resp.status()),
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
            let rel = site_relative(&key)?.to_string();
            let sha = self.existing_sha(&rel).await?;
            let payload = upload_payload(&rel, &content, &self.branch, sha.as_deref());

            let resp = self
                .request(reqwest::Method::PUT, &self.contents_url(&rel))
                .json(&payload)
                .send()
                .await
                .map_err(http_err)?;

            let status = resp.status();
            debug!(path = %key, update = sha.is_some(), %status, "contents PUT");
            if status.is_success() {
                Ok(UploadOutcome::success(status.to_string()))
            } else {
                Ok(UploadOutcome::failure(status.to_string()))
            }
        })
    }

    fn remove(
        &self,
        rel_path: &str,
    ) -> Pin<Box<dyn Future<Output = Result<UploadOutcome, PublishError>> + Send + '_>> {
        let key = rel_path.to_string();
        Box::pin(async move {
            let rel = site_relative(&key)?.to_string();
            let Some(sha) = self.existing_sha(&rel).await? else {
                return Ok(UploadOutcome::failure(format!("no such file: {key}")));
            };

            let payload = serde_json::json!({
                "message": format!("remove {rel}"),
                "sha": sha,
                "branch": self.branch,
            });
            let resp = self
                .request(reqwest::Method::DELETE, &self.contents_url(&rel))
                .json(&payload)
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
}

#[cfg(test)]
mod tests {
    use super::*;

    fn github_settings() -> Settings {
        let mut settings = Settings::default();
        settings.platform = Platform::Github;
        settings.repository = "octocat/blog".into();
        settings.branch = "gh-pages".into();
        settings.token = "t0ken".into();
        settings
    }

    #[test]
    fn parses_repository_forms() {
        for repo in [
            "octocat/blog",
            "octocat/blog.git",
            "https://github.com/octocat/blog",
            "https://github.com/octocat/blog.git",
            "git@github.com:octocat/blog.git",
            "https://gitee.com/octocat/blog/",
        ] {
            let (owner, name) = parse_repo_slug(repo).unwrap();
            assert_eq!((owner.as_str(), name.as_str()), ("octocat", "blog"), "{repo}");
        }
    }

    #[test]
    fn rejects_unparseable_repository() {
        assert!(parse_repo_slug("").is_err());
        assert!(parse_repo_slug("just-a-name").is_err());
    }

    #[test]
    fn from_settings_validates() {
        let backend = GitApiBackend::from_settings(&github_settings()).unwrap();
        assert_eq!(backend.name(), "github");
        assert_eq!(backend.branch, "gh-pages");
        assert_eq!(
            backend.contents_url("a/b c.html"),
            "https://api.github.com/repos/octocat/blog/contents/a/b%20c.html"
        );

        let mut no_token = github_settings();
        no_token.token.clear();
        assert!(matches!(
            GitApiBackend::from_settings(&no_token),
            Err(PublishError::AdapterInit(_))
        ));

        let mut wrong_platform = github_settings();
        wrong_platform.platform = Platform::Netlify;
        assert!(GitApiBackend::from_settings(&wrong_platform).is_err());
    }

    #[test]
    fn gitee_uses_its_api_base() {
        let mut settings = github_settings();
        settings.platform = Platform::Gitee;
        let backend = GitApiBackend::from_settings(&settings).unwrap();
        assert_eq!(backend.name(), "gitee");
        assert!(backend.repo_url().starts_with("https://gitee.com/api/v5"));
    }

    #[test]
    fn empty_branch_defaults_to_master() {
        let mut settings = github_settings();
        settings.branch.clear();
        let backend = GitApiBackend::from_settings(&settings).unwrap();
        assert_eq!(backend.branch, "master");
    }

    #[test]
    fn upload_payload_encodes_content() {
        let payload = upload_payload("index.html", b"abc", "master", None);
        assert_eq!(payload["content"], "YWJj");
        assert_eq!(payload["branch"], "master");
        assert!(payload.get("sha").is_none());

        let update = upload_payload("index.html", b"abc", "master", Some("beef"));
        assert_eq!(update["sha"], "beef");
    }
}
