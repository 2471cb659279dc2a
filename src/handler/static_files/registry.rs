//! Source registry
//!
//! Holds the configured sources ordered by descending prefix length, so the
//! first prefix that matches a URL path is also the most specific one.

use super::source::{SourceConfig, SourceDto};
use crate::error::Result;
use crate::logger;

/// A registry lookup hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceMatch<'a> {
    pub config: &'a SourceConfig,
    /// URL path with the source prefix removed
    pub rel: &'a str,
}

#[derive(Debug, Default, Clone)]
pub struct SourceRegistry {
    configs: Vec<SourceConfig>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from raw source definitions
    pub fn from_dtos(dtos: &[SourceDto]) -> Result<Self> {
        let mut registry = Self::new();
        registry.add_configs(dtos)?;
        Ok(registry)
    }

    /// Replace all sources.
    ///
    /// Every definition is validated first; on error the registry is unchanged.
    pub fn set_configs(&mut self, dtos: &[SourceDto]) -> Result<()> {
        let parsed = parse_all(dtos)?;
        self.configs.clear();
        for cfg in parsed {
            self.insert(cfg);
        }
        self.sort();
        Ok(())
    }

    /// Append sources, skipping any whose prefix is already registered.
    ///
    /// Every definition is validated first; on error the registry is unchanged.
    pub fn add_configs(&mut self, dtos: &[SourceDto]) -> Result<()> {
        let parsed = parse_all(dtos)?;
        for cfg in parsed {
            self.insert(cfg);
        }
        self.sort();
        Ok(())
    }

    /// Find the source with the longest prefix that starts `url_path`
    pub fn find<'a>(&'a self, url_path: &'a str) -> Option<SourceMatch<'a>> {
        self.configs.iter().find_map(|config| {
            url_path
                .strip_prefix(config.prefix())
                .map(|rel| SourceMatch { config, rel })
        })
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    /// Sources in lookup order
    pub fn iter(&self) -> impl Iterator<Item = &SourceConfig> {
        self.configs.iter()
    }

    fn insert(&mut self, cfg: SourceConfig) {
        if self.configs.iter().any(|c| c.prefix() == cfg.prefix()) {
            logger::log_warning(&format!(
                "Static source with prefix {} already exists, skipping {}",
                cfg.prefix(),
                cfg.root().display()
            ));
            return;
        }
        logger::log_info(&format!(
            "Static source {} -> {}",
            cfg.prefix(),
            cfg.root().display()
        ));
        self.configs.push(cfg);
    }

    /// Stable sort keeps registration order among equal-length prefixes
    fn sort(&mut self) {
        self.configs
            .sort_by(|a, b| b.prefix().len().cmp(&a.prefix().len()));
    }
}

fn parse_all(dtos: &[SourceDto]) -> Result<Vec<SourceConfig>> {
    dtos.iter().map(SourceConfig::from_dto).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefixes(registry: &SourceRegistry) -> Vec<&str> {
        registry.iter().map(SourceConfig::prefix).collect()
    }

    #[test]
    fn test_longest_prefix_wins() {
        let registry = SourceRegistry::from_dtos(&[
            SourceDto::new("/srv/files", "/files/"),
            SourceDto::new("/srv/special", "/files/special/"),
        ])
        .unwrap();

        let hit = registry.find("/files/special/x").unwrap();
        assert_eq!(hit.config.prefix(), "/files/special/");
        assert_eq!(hit.rel, "x");

        let hit = registry.find("/files/y.txt").unwrap();
        assert_eq!(hit.config.prefix(), "/files/");
        assert_eq!(hit.rel, "y.txt");
    }

    #[test]
    fn test_no_match_is_none() {
        let registry =
            SourceRegistry::from_dtos(&[SourceDto::new("/srv/files", "/files/")]).unwrap();
        assert!(registry.find("/other").is_none());
        // Prefix always ends with '/', so the bare directory path does not match
        assert!(registry.find("/files").is_none());
    }

    #[test]
    fn test_root_prefix_catches_everything_else() {
        let registry = SourceRegistry::from_dtos(&[
            SourceDto::new("/srv/web", "/"),
            SourceDto::new("/srv/npm", "/node_modules"),
        ])
        .unwrap();
        assert_eq!(prefixes(&registry), ["/node_modules/", "/"]);

        let hit = registry.find("/app/main.js").unwrap();
        assert_eq!(hit.config.prefix(), "/");
        assert_eq!(hit.rel, "app/main.js");
    }

    #[test]
    fn test_duplicate_prefix_first_wins() {
        let mut registry =
            SourceRegistry::from_dtos(&[SourceDto::new("/srv/first", "/assets")]).unwrap();
        registry
            .add_configs(&[SourceDto::new("/srv/second", "/assets/")])
            .unwrap();

        assert_eq!(registry.len(), 1);
        assert!(registry.iter().next().unwrap().root().ends_with("first"));
    }

    #[test]
    fn test_set_configs_replaces() {
        let mut registry =
            SourceRegistry::from_dtos(&[SourceDto::new("/srv/old", "/old")]).unwrap();
        registry
            .set_configs(&[SourceDto::new("/srv/new", "/new")])
            .unwrap();
        assert_eq!(prefixes(&registry), ["/new/"]);
    }

    #[test]
    fn test_invalid_source_leaves_registry_untouched() {
        let mut registry =
            SourceRegistry::from_dtos(&[SourceDto::new("/srv/keep", "/keep")]).unwrap();
        let result = registry.set_configs(&[
            SourceDto::new("/srv/ok", "/ok"),
            SourceDto::default(),
        ]);
        assert!(result.is_err());
        assert_eq!(prefixes(&registry), ["/keep/"]);
    }

    #[test]
    fn test_equal_length_prefixes_keep_registration_order() {
        let registry = SourceRegistry::from_dtos(&[
            SourceDto::new("/srv/a", "/aa"),
            SourceDto::new("/srv/b", "/bb"),
        ])
        .unwrap();
        assert_eq!(prefixes(&registry), ["/aa/", "/bb/"]);
    }
}
