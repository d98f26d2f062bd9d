//! Remote index configuration
//!
//! Gem downloads are performed by RubyGems; the fetcher only decides which
//! source flags every `gem` invocation carries.

/// Source configuration shared by every `gem` invocation of one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Fetcher {
    /// Skip the dependency API and consult only the declared full indexes
    pub disable_endpoint: bool,
}

impl Fetcher {
    /// `gem` flags selecting `sources`
    pub fn source_args(&self, sources: &[String]) -> Vec<String> {
        let mut args = Vec::new();
        if self.disable_endpoint && !sources.is_empty() {
            args.push("--clear-sources".to_string());
        }
        for source in sources {
            args.push("--source".to_string());
            args.push(source.clone());
        }
        args
    }
}
