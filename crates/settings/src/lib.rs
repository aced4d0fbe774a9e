//! Deployment settings data shapes.
//!
//! Mirrors the settings record persisted by the desktop app: which hosting
//! platform to publish to, the credentials for it, proxy configuration, and
//! the comment-widget settings that share the same storage file. The publish
//! engine treats all of this as opaque read-only input.

pub mod comment;

pub use comment::{CommentSetting, DisqusSetting, GitalkSetting};

use serde::{Deserialize, Serialize};

/// Hosting platform a site is published to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[default]
    Github,
    Coding,
    Sftp,
    Gitee,
    Netlify,
    Oss,
}

impl Platform {
    /// The lowercase platform name as stored in settings files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Github => "github",
            Platform::Coding => "coding",
            Platform::Sftp => "sftp",
            Platform::Gitee => "gitee",
            Platform::Netlify => "netlify",
            Platform::Oss => "oss",
        }
    }
}

/// Whether outgoing requests go direct or through the configured proxy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProxyMode {
    #[default]
    Direct,
    Proxy,
}

/// User deployment settings.
///
/// Field names match the camelCase JSON the app stores on disk. Every field
/// defaults so partially filled settings files still parse.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub platform: Platform,
    pub domain: String,
    pub repository: String,
    pub branch: String,
    pub username: String,
    pub email: String,
    pub token_username: String,
    pub token: String,
    pub cname: String,
    pub port: String,
    pub server: String,
    pub password: String,
    pub private_key: String,
    pub remote_path: String,
    pub proxy_path: String,
    pub proxy_port: String,
    pub enabled_proxy: ProxyMode,
    pub netlify_access_token: String,
    pub netlify_site_id: String,

    // Object storage configs.
    pub oss_access_key_id: String,
    pub oss_access_key_secret: String,
    pub oss_bucket: String,
    pub oss_region: String,
    pub oss_endpoint: String,
    pub oss_prefix: String,
    pub oss_cname: bool,
}

impl Settings {
    /// True when a proxy is configured and enabled.
    pub fn uses_proxy(&self) -> bool {
        self.enabled_proxy == ProxyMode::Proxy && !self.proxy_path.is_empty()
    }

    /// Proxy URL in `host:port` form, if proxying is enabled.
    pub fn proxy_url(&self) -> Option<String> {
        if !self.uses_proxy() {
            return None;
        }
        if self.proxy_port.is_empty() {
            Some(self.proxy_path.clone())
        } else {
            Some(format!("{}:{}", self.proxy_path, self.proxy_port))
        }
    }
}
