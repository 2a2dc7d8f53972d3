// Asset path to URL rewriting

pub const DEFAULT_ASSET_BASE: &str = "http://127.0.0.1:9999/public/attachments/";

/// Base URL that relative asset paths (covers, colors, album images) hang off
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetBase(String);

impl AssetBase {
    pub fn new(base: impl Into<String>) -> Self {
        let mut base = base.into();
        if !base.ends_with('/') {
            base.push('/');
        }
        Self(base)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.0, path.trim_start_matches('/'))
    }

    pub fn url_opt(&self, path: Option<&str>) -> Option<String> {
        path.map(|p| self.url(p))
    }
}

impl Default for AssetBase {
    fn default() -> Self {
        Self::new(DEFAULT_ASSET_BASE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_with_single_slash() {
        let base = AssetBase::new("http://cdn.test/a");
        assert_eq!(base.as_str(), "http://cdn.test/a/");
        assert_eq!(base.url("x.png"), "http://cdn.test/a/x.png");
        assert_eq!(base.url("/y.png"), "http://cdn.test/a/y.png");
    }

    #[test]
    fn test_default_base() {
        assert_eq!(
            AssetBase::default().url("cover.jpg"),
            "http://127.0.0.1:9999/public/attachments/cover.jpg"
        );
    }

    #[test]
    fn test_url_opt() {
        let base = AssetBase::default();
        assert_eq!(base.url_opt(None), None);
        assert!(base.url_opt(Some("c.png")).unwrap().ends_with("/attachments/c.png"));
    }
}
