use crate::Result;
use crate::facts::{ProjectSpec, SourceKind};
use camino::{Utf8Path, Utf8PathBuf};
use directories::BaseDirs;
use ohno::{IntoAppError, app_err, bail};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::io;
use strum::IntoEnumIterator;

/// The default configuration YAML content, embedded from `default_config.yml`
pub const DEFAULT_CONFIG_YAML: &str = include_str!("../../default_config.yml");

/// File stem tried when no explicit config path is given
const CONFIG_STEM: &str = "projects";

/// Extensions tried, in order, for each candidate location
const CONFIG_EXTENSIONS: [&str; 4] = ["toml", "yml", "yaml", "json"];

fn default_precedence() -> Vec<SourceKind> {
    SourceKind::iter().collect()
}

/// Optional hosting-platform tokens.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct Auth {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gitlab_token: Option<String>,
}

/// One tracked project as written in the configuration file.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct ProjectEntry {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_control: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hosting: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_registry: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frontend_registry: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ci: Option<String>,
}

impl ProjectEntry {
    /// The (kind, identifier) pairs this entry carries.
    fn identifiers(&self) -> impl Iterator<Item = (SourceKind, &String)> {
        [
            (SourceKind::VersionControl, self.version_control.as_ref()),
            (SourceKind::Hosting, self.hosting.as_ref()),
            (SourceKind::PackageRegistry, self.package_registry.as_ref()),
            (SourceKind::FrontendRegistry, self.frontend_registry.as_ref()),
            (SourceKind::Ci, self.ci.as_ref()),
        ]
        .into_iter()
        .filter_map(|(kind, id)| id.map(|id| (kind, id)))
    }

    fn to_spec(&self) -> ProjectSpec {
        let mut spec = ProjectSpec::new(&self.name);
        for (kind, identifier) in self.identifiers() {
            spec = spec.with_source(kind, identifier);
        }
        spec
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct Config {
    /// Which source wins when two sources report the same fact: earlier
    /// entries beat later ones. Kinds left out rank after all listed kinds.
    #[serde(default = "default_precedence")]
    pub precedence: Vec<SourceKind>,

    #[serde(default)]
    pub auth: Auth,

    #[serde(default)]
    pub projects: Vec<ProjectEntry>,
}

impl Config {
    /// Load configuration from an explicit path, or from the first candidate
    /// location that exists.
    ///
    /// # Errors
    ///
    /// Returns an error if no file can be found, the file cannot be read or
    /// parsed, or the contents are structurally invalid.
    pub fn load(config_path: Option<&Utf8PathBuf>) -> Result<(Self, Utf8PathBuf)> {
        let (final_path, text) = if let Some(path) = config_path {
            let text = fs::read_to_string(path).into_app_err_with(|| format!("reading projstat configuration from {path}"))?;
            (path.clone(), text)
        } else {
            let candidates = Self::candidate_paths();

            let mut found = None;
            for path in &candidates {
                match fs::read_to_string(path) {
                    Ok(text) => {
                        found = Some((path.clone(), text));
                        break;
                    }
                    Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                    Err(e) => return Err(e).into_app_err_with(|| format!("reading projstat configuration from {path}")),
                }
            }

            let Some(result) = found else {
                bail!(
                    "no configuration file available; tried {}",
                    candidates.iter().map(|p| p.as_str()).collect::<Vec<_>>().join(", ")
                );
            };
            result
        };

        let config = Self::parse(&text, &final_path)?;
        config.validate()?;
        Ok((config, final_path))
    }

    fn parse(text: &str, path: &Utf8Path) -> Result<Self> {
        let extension = path.extension().unwrap_or_default();
        match extension {
            "toml" => toml::from_str(text).into_app_err_with(|| format!("parsing TOML configuration from {path}")),
            "yml" | "yaml" => serde_yaml::from_str(text).into_app_err_with(|| format!("parsing YAML configuration from {path}")),
            "json" => serde_json::from_str(text).into_app_err_with(|| format!("parsing JSON configuration from {path}")),
            _ => Err(app_err!("unsupported configuration file extension: {extension}")),
        }
    }

    /// The locations tried when no explicit path is given: the current
    /// directory first, then the user's config directory.
    fn candidate_paths() -> Vec<Utf8PathBuf> {
        let mut candidates = Vec::new();

        for ext in CONFIG_EXTENSIONS {
            candidates.push(Utf8PathBuf::from(format!("{CONFIG_STEM}.{ext}")));
        }

        if let Some(base) = BaseDirs::new() {
            if let Ok(config_dir) = Utf8PathBuf::from_path_buf(base.config_dir().join("projstat")) {
                for ext in CONFIG_EXTENSIONS {
                    candidates.push(config_dir.join(format!("{CONFIG_STEM}.{ext}")));
                }
            }
        }

        candidates
    }

    /// Check the structural invariants the aggregation run depends on.
    fn validate(&self) -> Result<()> {
        if self.projects.is_empty() {
            bail!("no projects configured");
        }

        let mut seen = HashSet::new();
        for project in &self.projects {
            if project.name.trim().is_empty() {
                bail!("a project entry has an empty name");
            }
            if !seen.insert(project.name.as_str()) {
                bail!("duplicate project name '{}'", project.name);
            }
            for (kind, identifier) in project.identifiers() {
                if identifier.trim().is_empty() {
                    bail!("project '{}' has an empty {kind} identifier", project.name);
                }
            }
        }

        let mut seen_kinds = HashSet::new();
        for kind in &self.precedence {
            if !seen_kinds.insert(kind) {
                bail!("source kind '{kind}' appears more than once in the precedence list");
            }
        }

        Ok(())
    }

    /// The configured projects as specs, in declaration order.
    #[must_use]
    pub fn project_specs(&self) -> Vec<ProjectSpec> {
        self.projects.iter().map(ProjectEntry::to_spec).collect()
    }

    /// Save configuration to a file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save(&self, output_path: &Utf8Path) -> Result<()> {
        let extension = output_path.extension().unwrap_or_default();
        let text = match extension {
            "toml" => toml::to_string_pretty(self)
                .into_app_err_with(|| format!("serializing configuration to TOML for saving to {output_path}"))?,
            "yml" | "yaml" => serde_yaml::to_string(self)
                .into_app_err_with(|| format!("serializing configuration to YAML for saving to {output_path}"))?,
            "json" => serde_json::to_string_pretty(self)
                .into_app_err_with(|| format!("serializing configuration to JSON for saving to {output_path}"))?,
            _ => return Err(app_err!("unsupported configuration file extension: {extension}")),
        };

        fs::write(output_path, text).into_app_err_with(|| format!("writing configuration to {output_path}"))?;
        Ok(())
    }

    /// Save the default configuration, preserving the template's comments
    /// when the target format is YAML.
    pub fn save_default(output_path: &Utf8Path) -> Result<()> {
        let extension = output_path.extension().unwrap_or_default();

        if matches!(extension, "yml" | "yaml") {
            fs::write(output_path, DEFAULT_CONFIG_YAML)
                .into_app_err_with(|| format!("writing default configuration to {output_path}"))?;
            Ok(())
        } else {
            Self::default().save(output_path)
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        serde_yaml::from_str(DEFAULT_CONFIG_YAML).expect("default_config.yml should be valid YAML that deserializes to Config")
    }
}
