//! Backend selection from user settings.

use std::path::PathBuf;

use siteship_publish::{Backend, PublishError, Publisher};
use siteship_settings::{Platform, Settings};

use crate::git_api::GitApiBackend;
use crate::netlify::NetlifyBackend;

/// Constructs the backend named by `settings.platform`.
pub fn backend_for(settings: &Settings) -> Result<Box<dyn Backend>, PublishError> {
    match settings.platform {
        Platform::Github | Platform::Gitee => {
            Ok(Box::new(GitApiBackend::from_settings(settings)?))
        }
        Platform::Netlify => Ok(Box::new(NetlifyBackend::from_settings(settings)?)),
        Platform::Coding | Platform::Sftp | Platform::Oss => Err(PublishError::AdapterInit(
            format!("platform {} is not supported by this build", settings.platform.as_str()),
        )),
    }
}

/// Publisher for `build_dir` wired to the platform selected in `settings`.
/// The backend is constructed lazily on first use, so settings problems
/// surface as an init failure of the run that first needs the backend.
pub fn publisher_for(settings: Settings, build_dir: impl Into<PathBuf>) -> Publisher {
    Publisher::new(
        build_dir.into(),
        Box::new(move || {
            let settings = settings.clone();
            Box::pin(async move { backend_for(&settings) })
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selects_backend_by_platform() {
        let mut settings = Settings::default();
        settings.platform = Platform::Netlify;
        settings.netlify_access_token = "tok".into();
        settings.netlify_site_id = "site".into();
        assert_eq!(backend_for(&settings).unwrap().name(), "netlify");

        settings.platform = Platform::Github;
        settings.repository = "owner/site".into();
        settings.token = "tok".into();
        assert_eq!(backend_for(&settings).unwrap().name(), "github");
    }

    #[test]
    fn unsupported_platforms_fail_init() {
        for platform in [Platform::Coding, Platform::Sftp, Platform::Oss] {
            let mut settings = Settings::default();
            settings.platform = platform;
            let Err(err) = backend_for(&settings) else {
                panic!("{platform:?} should fail init");
            };
            assert!(matches!(err, PublishError::AdapterInit(_)), "{platform:?}");
        }
    }

    #[tokio::test]
    async fn publisher_surfaces_init_failure_lazily() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), b"<html>").unwrap();

        let mut settings = Settings::default();
        settings.platform = Platform::Oss;
        let publisher = publisher_for(settings, dir.path());

        let result = publisher.publish().await;
        assert!(!result.success);
        assert!(result.message.contains("not supported"));
    }
}
