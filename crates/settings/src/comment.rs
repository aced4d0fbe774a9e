//! Comment-widget settings.
//!
//! These share the app's settings storage but never reach the publish
//! engine; they only configure the rendered site's comment widget.

use serde::{Deserialize, Serialize};

/// Disqus widget configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisqusSetting {
    pub api: String,
    pub apikey: String,
    pub shortname: String,
}

/// Gitalk widget configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GitalkSetting {
    pub client_id: String,
    pub client_secret: String,
    pub repository: String,
    pub owner: String,
}

/// Which comment platform the site uses, plus per-platform settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CommentSetting {
    pub comment_platform: String,
    pub show_comment: bool,
    pub disqus_setting: DisqusSetting,
    pub gitalk_setting: GitalkSetting,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comment_setting_roundtrip() {
        let json = r#"{
            "commentPlatform": "gitalk",
            "showComment": true,
            "gitalkSetting": {
                "clientId": "id",
                "clientSecret": "secret",
                "repository": "blog",
                "owner": "me"
            }
        }"#;
        let c: CommentSetting = serde_json::from_str(json).unwrap();
        assert!(c.show_comment);
        assert_eq!(c.comment_platform, "gitalk");
        assert_eq!(c.gitalk_setting.owner, "me");
        assert!(c.disqus_setting.shortname.is_empty());
    }
}
