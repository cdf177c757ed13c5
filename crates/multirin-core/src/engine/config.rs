use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_MIN_DISTANCE: f64 = 0.0;
pub const DEFAULT_MAX_DISTANCE: f64 = 4.0;
pub const DEFAULT_TOO_FAR_DISTANCE: f64 = 25.0;
pub const DEFAULT_STRUCTURE_SCALE: f64 = 10.0;
pub const DEFAULT_MIXED_EXCLUSIONS: &[&str] = &["CB"];

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Invalid value for '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("I/O error reading config '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Invalid configuration in '{path}': {source}")]
    Invalid { path: String, source: ConfigError },
}

/// Geometric and weighting parameters of the per-structure contact builder.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactConfig {
    /// Inclusive lower bound of a counted contact, in Angstroms.
    pub min_distance: f64,
    /// Exclusive upper bound of a counted contact, in Angstroms.
    pub max_distance: f64,
    /// Any atom pair farther apart than this abandons the residue pair.
    pub too_far_distance: f64,
    /// Divide sub-weights by `(atom_count_i + atom_count_j) / 10`.
    pub normalize_by_residue_size: bool,
    /// Add the backbone label-reachability term for sequence neighbours.
    pub include_backbone_coupling: bool,
    /// Atom names ignored by the sidechain/backbone cross terms of adjacent residues.
    pub mixed_exclusions: Vec<String>,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            min_distance: DEFAULT_MIN_DISTANCE,
            max_distance: DEFAULT_MAX_DISTANCE,
            too_far_distance: DEFAULT_TOO_FAR_DISTANCE,
            normalize_by_residue_size: true,
            include_backbone_coupling: true,
            mixed_exclusions: DEFAULT_MIXED_EXCLUSIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Normalization and scaling applied when stacking per-structure networks.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationConfig {
    pub normalize_per_structure: bool,
    /// Maximum of every nonzero slice after per-structure normalization.
    pub structure_scale: f64,
    /// Maximum of the whole tensor after global scaling; `None` disables the step.
    pub global_scale: Option<f64>,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            normalize_per_structure: true,
            structure_scale: DEFAULT_STRUCTURE_SCALE,
            global_scale: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct NetworkConfig {
    pub contact: ContactConfig,
    pub aggregation: AggregationConfig,
}

fn invalid(name: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidParameter {
        name,
        reason: reason.into(),
    }
}

fn require_finite(name: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(invalid(name, format!("{value} is not a finite number")))
    }
}

fn require_positive(name: &'static str, value: f64) -> Result<f64, ConfigError> {
    if require_finite(name, value)? > 0.0 {
        Ok(value)
    } else {
        Err(invalid(name, format!("{value} must be greater than zero")))
    }
}

#[derive(Default)]
pub struct ContactConfigBuilder {
    min_distance: Option<f64>,
    max_distance: Option<f64>,
    too_far_distance: Option<f64>,
    normalize_by_residue_size: Option<bool>,
    include_backbone_coupling: Option<bool>,
    mixed_exclusions: Option<Vec<String>>,
}

impl ContactConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min_distance(mut self, distance: f64) -> Self {
        self.min_distance = Some(distance);
        self
    }
    pub fn max_distance(mut self, distance: f64) -> Self {
        self.max_distance = Some(distance);
        self
    }
    pub fn too_far_distance(mut self, distance: f64) -> Self {
        self.too_far_distance = Some(distance);
        self
    }
    pub fn normalize_by_residue_size(mut self, enabled: bool) -> Self {
        self.normalize_by_residue_size = Some(enabled);
        self
    }
    pub fn include_backbone_coupling(mut self, enabled: bool) -> Self {
        self.include_backbone_coupling = Some(enabled);
        self
    }
    pub fn mixed_exclusions<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.mixed_exclusions = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn build(self) -> Result<ContactConfig, ConfigError> {
        let defaults = ContactConfig::default();

        let min_distance = require_finite(
            "min_distance",
            self.min_distance.unwrap_or(defaults.min_distance),
        )?;
        if min_distance < 0.0 {
            return Err(invalid("min_distance", "must not be negative"));
        }
        let max_distance = require_positive(
            "max_distance",
            self.max_distance.unwrap_or(defaults.max_distance),
        )?;
        if max_distance <= min_distance {
            return Err(invalid(
                "max_distance",
                format!("{max_distance} must exceed min_distance {min_distance}"),
            ));
        }
        let too_far_distance = require_positive(
            "too_far_distance",
            self.too_far_distance.unwrap_or(defaults.too_far_distance),
        )?;
        if too_far_distance < max_distance {
            return Err(invalid(
                "too_far_distance",
                format!("{too_far_distance} must not be below max_distance {max_distance}"),
            ));
        }

        Ok(ContactConfig {
            min_distance,
            max_distance,
            too_far_distance,
            normalize_by_residue_size: self
                .normalize_by_residue_size
                .unwrap_or(defaults.normalize_by_residue_size),
            include_backbone_coupling: self
                .include_backbone_coupling
                .unwrap_or(defaults.include_backbone_coupling),
            mixed_exclusions: self
                .mixed_exclusions
                .map(|names| names.into_iter().map(|n| n.trim().to_string()).collect())
                .unwrap_or(defaults.mixed_exclusions),
        })
    }
}

#[derive(Default)]
pub struct AggregationConfigBuilder {
    normalize_per_structure: Option<bool>,
    structure_scale: Option<f64>,
    global_scale: Option<f64>,
}

impl AggregationConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn normalize_per_structure(mut self, enabled: bool) -> Self {
        self.normalize_per_structure = Some(enabled);
        self
    }
    pub fn structure_scale(mut self, scale: f64) -> Self {
        self.structure_scale = Some(scale);
        self
    }
    pub fn global_scale(mut self, scale: f64) -> Self {
        self.global_scale = Some(scale);
        self
    }

    pub fn build(self) -> Result<AggregationConfig, ConfigError> {
        let defaults = AggregationConfig::default();
        Ok(AggregationConfig {
            normalize_per_structure: self
                .normalize_per_structure
                .unwrap_or(defaults.normalize_per_structure),
            structure_scale: require_positive(
                "structure_scale",
                self.structure_scale.unwrap_or(defaults.structure_scale),
            )?,
            global_scale: self
                .global_scale
                .map(|scale| require_positive("global_scale", scale))
                .transpose()?,
        })
    }
}

/// Flat on-disk representation; every key is optional and falls back to its default.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct NetworkConfigFile {
    contact_min_distance: Option<f64>,
    contact_max_distance: Option<f64>,
    too_far_distance: Option<f64>,
    normalize_by_residue_size: Option<bool>,
    include_backbone_coupling: Option<bool>,
    mixed_exclusions: Option<Vec<String>>,
    normalize_per_structure: Option<bool>,
    structure_scale: Option<f64>,
    global_scale: Option<f64>,
}

impl NetworkConfigFile {
    fn into_config(self) -> Result<NetworkConfig, ConfigError> {
        let mut contact = ContactConfigBuilder::new();
        if let Some(v) = self.contact_min_distance {
            contact = contact.min_distance(v);
        }
        if let Some(v) = self.contact_max_distance {
            contact = contact.max_distance(v);
        }
        if let Some(v) = self.too_far_distance {
            contact = contact.too_far_distance(v);
        }
        if let Some(v) = self.normalize_by_residue_size {
            contact = contact.normalize_by_residue_size(v);
        }
        if let Some(v) = self.include_backbone_coupling {
            contact = contact.include_backbone_coupling(v);
        }
        if let Some(v) = self.mixed_exclusions {
            contact = contact.mixed_exclusions(v);
        }

        let mut aggregation = AggregationConfigBuilder::new();
        if let Some(v) = self.normalize_per_structure {
            aggregation = aggregation.normalize_per_structure(v);
        }
        if let Some(v) = self.structure_scale {
            aggregation = aggregation.structure_scale(v);
        }
        if let Some(v) = self.global_scale {
            aggregation = aggregation.global_scale(v);
        }

        Ok(NetworkConfig {
            contact: contact.build()?,
            aggregation: aggregation.build()?,
        })
    }
}

impl NetworkConfig {
    /// Parses a kebab-case TOML document; missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigLoadError> {
        Self::parse(content, "<string>")
    }

    pub fn load(path: &Path) -> Result<Self, ConfigLoadError> {
        let display = path.to_string_lossy().to_string();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigLoadError::Io {
            path: display.clone(),
            source: e,
        })?;
        Self::parse(&content, &display)
    }

    fn parse(content: &str, path: &str) -> Result<Self, ConfigLoadError> {
        let file: NetworkConfigFile =
            toml::from_str(content).map_err(|e| ConfigLoadError::Toml {
                path: path.to_string(),
                source: e,
            })?;
        file.into_config().map_err(|e| ConfigLoadError::Invalid {
            path: path.to_string(),
            source: e,
        })
    }

    /// Re-runs the builder checks on values that may have been assigned field by field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.contact.validate()?;
        self.aggregation.validate()
    }
}

impl ContactConfig {
    /// Applies the [`ContactConfigBuilder`] checks to this value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ContactConfigBuilder::new()
            .min_distance(self.min_distance)
            .max_distance(self.max_distance)
            .too_far_distance(self.too_far_distance)
            .build()
            .map(|_| ())
    }
}

impl AggregationConfig {
    /// Applies the [`AggregationConfigBuilder`] checks to this value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut builder = AggregationConfigBuilder::new().structure_scale(self.structure_scale);
        if let Some(scale) = self.global_scale {
            builder = builder.global_scale(scale);
        }
        builder.build().map(|_| ())
    }
}
