//! Profile configuration: namespaces, class mappings and output switches.
use crate::error::ProfileError;
use crate::prefixes::{is_prefix_name, PrefixMap};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use url::Url;

pub const DEFAULT_BASE_NS: &str = "https://w3id.org/agri-image/";
pub const DEFAULT_BASE_PREFIX: &str = "agimage";

fn default_classes() -> BTreeMap<String, String> {
    [
        ("Dataset", "dcat:Dataset"),
        ("Platform", "sosa:Platform"),
        ("Sensor", "sosa:Sensor"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

/// Prefixes older tables use for the base namespace.
fn default_base_aliases() -> Vec<String> {
    vec!["newont".to_string()]
}

/// Misspelt namespaces found in older tables, with their correction.
fn default_namespace_fixes() -> BTreeMap<String, String> {
    BTreeMap::from([(
        "w3id.org/agri-images".to_string(),
        "w3id.org/agri-image".to_string(),
    )])
}

/// Settings read from a TOML file. Every key is optional.
///
/// ```toml
/// base-ns = "https://w3id.org/agri-image/"
/// base-prefix = "agimage"
/// add-codelists = true
///
/// [prefixes]
/// obo = "http://purl.obolibrary.org/obo/"
///
/// [classes]
/// Dataset = "dcat:Dataset"
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ProfileConfig {
    pub base_ns: String,
    pub base_prefix: String,
    pub title: Option<String>,
    pub version: Option<String>,
    /// Extra prefix bindings, added to (or overriding) the built-in ones.
    pub prefixes: BTreeMap<String, String>,
    /// Classes mapped wholesale to an external class, by local class name.
    pub classes: BTreeMap<String, String>,
    /// Prefixes read as the base namespace, never written.
    pub base_aliases: Vec<String>,
    /// Substring rewrites applied to every IRI read from the table.
    pub namespace_fixes: BTreeMap<String, String>,
    pub add_codelists: bool,
    pub emit_external_class_blocks: bool,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        ProfileConfig {
            base_ns: DEFAULT_BASE_NS.to_string(),
            base_prefix: DEFAULT_BASE_PREFIX.to_string(),
            title: None,
            version: None,
            prefixes: BTreeMap::new(),
            classes: default_classes(),
            base_aliases: default_base_aliases(),
            namespace_fixes: default_namespace_fixes(),
            add_codelists: false,
            emit_external_class_blocks: false,
        }
    }
}

impl ProfileConfig {
    pub fn from_file(path: &Path) -> Result<Self, ProfileError> {
        let text = fs::read_to_string(path).map_err(|e| ProfileError::io(path, e))?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self, ProfileError> {
        toml::from_str(text).map_err(|e| ProfileError::Config(e.to_string()))
    }

    /// Checks the namespace settings and builds the prefix bindings they imply.
    pub fn prefix_map(&self) -> Result<PrefixMap, ProfileError> {
        let url = Url::parse(&self.base_ns)
            .map_err(|e| ProfileError::Config(format!("base-ns `{}`: {}", self.base_ns, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ProfileError::Config(format!(
                "base-ns `{}` must be an http(s) URL",
                self.base_ns
            )));
        }
        if !(self.base_ns.ends_with('/') || self.base_ns.ends_with('#')) {
            return Err(ProfileError::Config(format!(
                "base-ns `{}` must end with `/` or `#`",
                self.base_ns
            )));
        }
        if !is_prefix_name(&self.base_prefix) {
            return Err(ProfileError::Config(format!(
                "base-prefix `{}` is not a valid prefix name",
                self.base_prefix
            )));
        }
        let mut map =
            PrefixMap::standard(&self.base_prefix, &self.base_ns).map_err(ProfileError::Config)?;
        for (prefix, ns) in &self.prefixes {
            if prefix == &self.base_prefix && ns != &self.base_ns {
                return Err(ProfileError::Config(format!(
                    "prefix `{}` is reserved for base-ns",
                    prefix
                )));
            }
            map.insert(prefix, ns).map_err(ProfileError::Config)?;
        }
        for alias in &self.base_aliases {
            if alias != &self.base_prefix {
                map.alias(alias, &self.base_ns).map_err(ProfileError::Config)?;
            }
        }
        for (from, to) in &self.namespace_fixes {
            map.fix_namespace(from, to).map_err(ProfileError::Config)?;
        }
        for (class, target) in &self.classes {
            map.expand(target).map_err(|_| {
                ProfileError::Config(format!(
                    "class mapping `{}` -> `{}` does not resolve to an IRI",
                    class, target
                ))
            })?;
        }
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefixes::TermError;
    use std::error::Error;

    #[test]
    fn defaults_map_authoritative_classes() -> Result<(), Box<dyn Error>> {
        let config = ProfileConfig::default();
        assert_eq!(config.classes.get("Sensor").map(String::as_str), Some("sosa:Sensor"));
        let map = config.prefix_map()?;
        assert_eq!(map.namespace("agimage"), Some(DEFAULT_BASE_NS));
        Ok(())
    }

    #[test]
    fn file_overrides_defaults() -> Result<(), Box<dyn Error>> {
        let config = ProfileConfig::from_toml(
            r#"
base-ns = "http://example.org/farm#"
base-prefix = "farm"
add-codelists = true

[prefixes]
obo = "http://purl.obolibrary.org/obo/"

[classes]
Camera = "sosa:Sensor"
"#,
        )?;
        assert!(config.add_codelists);
        assert_eq!(config.classes.len(), 1);
        let map = config.prefix_map()?;
        assert_eq!(map.namespace("farm"), Some("http://example.org/farm#"));
        assert_eq!(map.namespace("obo"), Some("http://purl.obolibrary.org/obo/"));
        Ok(())
    }

    #[test]
    fn rejects_base_without_separator() {
        let config = ProfileConfig {
            base_ns: "https://w3id.org/agri-image".to_string(),
            ..ProfileConfig::default()
        };
        assert!(matches!(config.prefix_map(), Err(ProfileError::Config(_))));
    }

    #[test]
    fn rejects_unresolvable_class_mapping() {
        let mut config = ProfileConfig::default();
        config
            .classes
            .insert("Plot".to_string(), "nowhere:Plot".to_string());
        assert!(config.prefix_map().is_err());
    }

    #[test]
    fn legacy_prefix_reads_as_base() -> Result<(), Box<dyn Error>> {
        let map = ProfileConfig::default().prefix_map()?;
        assert_eq!(
            map.expand("newont:plot").map(|n| n.as_str().to_string()),
            Ok(format!("{}plot", DEFAULT_BASE_NS))
        );
        assert_eq!(
            map.expand("https://w3id.org/agri-images/Camera")
                .map(|n| n.as_str().to_string()),
            Ok(format!("{}Camera", DEFAULT_BASE_NS))
        );

        let config = ProfileConfig::from_toml(
            r#"
base-aliases = []
namespace-fixes = {}
"#,
        )?;
        let map = config.prefix_map()?;
        assert_eq!(map.expand("newont:plot"), Err(TermError::UnknownPrefix));
        assert_eq!(
            map.expand("https://w3id.org/agri-images/Camera")
                .map(|n| n.as_str().to_string()),
            Ok("https://w3id.org/agri-images/Camera".to_string())
        );
        Ok(())
    }

    #[test]
    fn explicit_prefix_overrides_alias() -> Result<(), Box<dyn Error>> {
        let config = ProfileConfig::from_toml(
            r#"
[prefixes]
newont = "http://example.org/newont/"
"#,
        )?;
        let map = config.prefix_map()?;
        assert_eq!(
            map.expand("newont:plot").map(|n| n.as_str().to_string()),
            Ok("http://example.org/newont/plot".to_string())
        );
        Ok(())
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(ProfileConfig::from_toml("base_namespace = \"x\"").is_err());
    }
}
