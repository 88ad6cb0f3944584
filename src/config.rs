/// Options controlling which request paths may be served and from where.
///
/// The defaults serve every file with an extension, relative to the working directory,
/// except hidden ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServeConfig {
    pub(crate) serve_path: Option<String>,
    pub(crate) allowed_extensions: Vec<String>,
    pub(crate) serve_hidden_files: bool,
}

impl ServeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve request paths under this directory, e.g. `"./public/"`.
    ///
    /// If the last segment of the serve path equals the first segment of the request
    /// path, that request segment is dropped, so `"./public/css"` serves `/css/site.css`
    /// from `./public/css/site.css`.
    pub fn with_serve_path(mut self, serve_path: impl Into<String>) -> Self {
        self.serve_path = Some(serve_path.into());
        self
    }

    /// Only serve files whose extension (including the leading `.`, e.g. `".css"`)
    /// is in `extensions`. An empty list allows every extension.
    pub fn with_allowed_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_extensions.clear();
        for extension in extensions {
            let extension = extension.into();
            if !self.allowed_extensions.contains(&extension) {
                self.allowed_extensions.push(extension);
            }
        }
        self
    }

    /// Serve files whose name starts with `.`.
    ///
    /// Defaults to `false`.
    pub fn serve_hidden_files(mut self, serve: bool) -> Self {
        self.serve_hidden_files = serve;
        self
    }

    pub fn serve_path(&self) -> Option<&str> {
        self.serve_path.as_deref()
    }

    pub fn allowed_extensions(&self) -> &[String] {
        &self.allowed_extensions
    }

    pub fn serves_hidden_files(&self) -> bool {
        self.serve_hidden_files
    }

    pub(crate) fn extension_allowed(&self, extension: &str) -> bool {
        self.allowed_extensions.is_empty() || self.allowed_extensions.iter().any(|e| e == extension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ServeConfig::new();

        assert_eq!(config.serve_path(), None);
        assert!(config.allowed_extensions().is_empty());
        assert!(!config.serves_hidden_files());
        assert!(config.extension_allowed(".anything"));
    }

    #[test]
    fn allowed_extensions_keep_order_without_duplicates() {
        let config = ServeConfig::new().with_allowed_extensions([".css", ".js", ".css"]);

        assert_eq!(config.allowed_extensions(), [".css", ".js"]);
        assert!(config.extension_allowed(".js"));
        assert!(!config.extension_allowed(".txt"));
        assert!(!config.extension_allowed(".CSS"));
    }

    #[test]
    fn empty_allow_list_allows_everything() {
        let config = ServeConfig::new().with_allowed_extensions(Vec::<String>::new());

        assert!(config.extension_allowed(".txt"));
    }
}
