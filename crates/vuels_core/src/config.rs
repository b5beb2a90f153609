//! Component compiler options.

use std::fs;
use std::path::{Path, PathBuf};

use jsonc_parser::ParseOptions;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use vuels_language::ServiceEnvironment;

use crate::ConfigError;

/// How component files are parsed and type-checked.
///
/// Read from the `vueCompilerOptions` section of the project configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VueCompilerOptions {
    /// Targeted framework version.
    pub target: f64,
    /// Module that provides the component runtime types.
    pub lib: String,
    /// File extensions treated as component files.
    pub extensions: Vec<String>,
    /// Report unknown components and attributes in templates.
    pub strict_templates: bool,
    /// Skip generating template type-check code.
    pub skip_template_codegen: bool,
    /// Infer slot types from JSX-like usage.
    pub jsx_slots: bool,
    /// Forward undeclared attributes to the root element type.
    pub fallthrough_attributes: bool,
    /// Attribute patterns accepted on every element.
    pub data_attributes: Vec<String>,
    /// Attribute patterns accepted on native elements.
    pub html_attributes: Vec<String>,
    /// Language plugins to load, by module name.
    pub plugins: Vec<String>,
    /// Prop name used by `v-model` without an argument.
    pub experimental_model_prop_name: Option<String>,
}

impl Default for VueCompilerOptions {
    fn default() -> Self {
        Self {
            target: 3.3,
            lib: "vue".to_string(),
            extensions: vec![".vue".to_string()],
            strict_templates: false,
            skip_template_codegen: false,
            jsx_slots: false,
            fallthrough_attributes: false,
            data_attributes: Vec::new(),
            html_attributes: vec!["aria-*".to_string()],
            plugins: Vec::new(),
            experimental_model_prop_name: None,
        }
    }
}

impl VueCompilerOptions {
    /// Project configuration files searched in the workspace root, in order.
    pub const CONFIG_FILES: &'static [&'static str] = &["tsconfig.json", "jsconfig.json"];

    /// Finds the project configuration file in `root`.
    pub fn discover(root: &Path) -> Option<PathBuf> {
        Self::CONFIG_FILES
            .iter()
            .map(|name| root.join(name))
            .find(|path| path.is_file())
    }

    /// Loads options from a project configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        Self::from_jsonc(&content, &path.display().to_string())
    }

    /// Parses options from the text of a project configuration file.
    ///
    /// Comments and trailing commas are accepted. A file without a
    /// `vueCompilerOptions` section yields the defaults.
    pub fn from_jsonc(content: &str, path: &str) -> Result<Self, ConfigError> {
        let value = jsonc_parser::parse_to_serde_value(content, &ParseOptions::default())
            .map_err(|e| ConfigError::parse(path, e.to_string()))?;

        match value.and_then(|mut v| v.get_mut("vueCompilerOptions").map(|o| o.take())) {
            Some(section) => Ok(serde_json::from_value(section)?),
            None => Ok(Self::default()),
        }
    }

    /// Resolves the options for an environment.
    ///
    /// Falls back to the defaults when no configuration is found or it cannot
    /// be read.
    pub fn resolve(env: &ServiceEnvironment) -> Self {
        let Some(root) = env.workspace_root() else {
            return Self::default();
        };
        let Some(path) = Self::discover(&root) else {
            debug!("No project configuration in {}", root.display());
            return Self::default();
        };

        match Self::from_file(&path) {
            Ok(options) => {
                debug!("Loaded vueCompilerOptions from {}", path.display());
                options
            }
            Err(e) => {
                warn!("Falling back to default vueCompilerOptions: {}", e);
                Self::default()
            }
        }
    }

    /// Returns `true` if the file name has a component file extension.
    pub fn is_component_file(&self, file_name: &str) -> bool {
        self.extensions.iter().any(|ext| file_name.ends_with(ext.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use vuels_language::lsp_types::Url;

    #[test]
    fn test_defaults_without_section() {
        let content = r#"{ "compilerOptions": {} }"#;
        let options = VueCompilerOptions::from_jsonc(content, "tsconfig.json").unwrap();
        assert_eq!(options, VueCompilerOptions::default());
    }

    #[test]
    fn test_jsonc_section() {
        let content = r#"{
            // project settings
            "compilerOptions": { "strict": true },
            "vueCompilerOptions": {
                "target": 2.7,
                "strictTemplates": true,
                "extensions": [".vue", ".md"],
            },
        }"#;
        let options = VueCompilerOptions::from_jsonc(content, "tsconfig.json").unwrap();
        assert_eq!(options.target, 2.7);
        assert!(options.strict_templates);
        assert_eq!(options.extensions, vec![".vue".to_string(), ".md".to_string()]);
        assert_eq!(options.lib, "vue");
    }

    #[test]
    fn test_invalid_section_shape() {
        let result =
            VueCompilerOptions::from_jsonc(r#"{ "vueCompilerOptions": { "target": "x" } }"#, "t");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_parse_error() {
        let result = VueCompilerOptions::from_jsonc("{ oops", "tsconfig.json");
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_resolve_from_workspace() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("jsconfig.json"),
            r#"{ "vueCompilerOptions": { "jsxSlots": true } }"#,
        )
        .unwrap();
        let env = ServiceEnvironment::new(vec![Url::from_file_path(dir.path()).unwrap()]);

        let options = VueCompilerOptions::resolve(&env);
        assert!(options.jsx_slots);
    }

    #[test]
    fn test_resolve_prefers_tsconfig() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("tsconfig.json"),
            r#"{ "vueCompilerOptions": { "target": 3.5 } }"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("jsconfig.json"),
            r#"{ "vueCompilerOptions": { "target": 2.7 } }"#,
        )
        .unwrap();
        let env = ServiceEnvironment::new(vec![Url::from_file_path(dir.path()).unwrap()]);
        assert_eq!(VueCompilerOptions::resolve(&env).target, 3.5);
    }

    #[test]
    fn test_resolve_malformed_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("tsconfig.json"), "{ not json").unwrap();
        let env = ServiceEnvironment::new(vec![Url::from_file_path(dir.path()).unwrap()]);
        assert_eq!(VueCompilerOptions::resolve(&env), VueCompilerOptions::default());
    }

    #[test]
    fn test_is_component_file() {
        let options = VueCompilerOptions::default();
        assert!(options.is_component_file("/a/App.vue"));
        assert!(!options.is_component_file("/a/main.ts"));
    }
}
