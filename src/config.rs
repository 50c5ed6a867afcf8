//! # Tuning Configuration
//!
//! This module defines [`TuningSpec`], the immutable desired state of a
//! reconciliation run, and the logic for parsing it from YAML.
//!
//! A tuning file lists two tables that describe the same logical decisions
//! through different channels:
//!
//! - **`properties`**: custom properties of the resource adapter, applied
//!   only where the adapter revision exposes them.
//! - **`arguments`**: `-D<key>=<value>` system properties merged into every
//!   server's argument strings, understood by older runtimes.
//!
//! The same value is applied at every scope. Any top-level key omitted from a
//! tuning file keeps its built-in default, so a file only needs to name what
//! it changes:
//!
//! ```yaml
//! properties:
//!   maxConnections: 500
//!   reconnectionRetryInterval: 2000
//! argument_fields: [genericJvmArguments]
//! ```
//!
//! Scalar values may be written as strings, numbers or booleans; they are
//! always handled as the text written in the file, so `0x1F` stays `0x1F`.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::merge::{ArgumentToken, ValueSyntax};

/// Description substring that identifies the built-in MQ resource adapter.
pub const MQ_RESOURCE_ADAPTER_TAG: &str = "Built In WebSphere MQ Resource Adapter";

/// Configuration type listed when discovering resource adapters.
pub const RESOURCE_ADAPTER_KIND: &str = "J2CResourceAdapter";

/// Largest signed 32-bit integer; effectively "unlimited" for the adapter.
pub const MAX_INT: &str = "2147483647";

/// Argument field carrying the generic JVM arguments of a server.
pub const GENERIC_JVM_ARGUMENTS: &str = "genericJvmArguments";

/// Argument field carrying the debug arguments of a server.
pub const DEBUG_ARGS: &str = "debugArgs";

/// Desired state applied uniformly across the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TuningSpec {
    resource_kind: String,
    description_tag: String,
    properties: BTreeMap<String, String>,
    arguments: BTreeMap<String, String>,
    argument_fields: Vec<String>,
    value_syntax: ValueSyntax,
}

impl Default for TuningSpec {
    /// Tuning that keeps the MQ resource adapter retrying indefinitely and
    /// lifts its connection limits, leaving pooling to the applications.
    fn default() -> Self {
        let properties = [
            ("maxConnections", MAX_INT),
            ("connectionConcurrency", "1"),
            ("reconnectionRetryCount", MAX_INT),
            ("reconnectionRetryInterval", "5000"),
            ("startupRetryCount", MAX_INT),
            ("startupRetryInterval", "5000"),
        ];
        let arguments = [
            ("com.ibm.mq.jms.tuning.startupReconnectionRetryCount", MAX_INT),
            ("com.ibm.mq.jms.tuning.startupReconnectionRetryInterval", "5000"),
            ("com.ibm.mq.cfg.TCP.Connect_Timeout", "10"),
        ];

        Self {
            resource_kind: RESOURCE_ADAPTER_KIND.to_string(),
            description_tag: MQ_RESOURCE_ADAPTER_TAG.to_string(),
            properties: to_table(&properties),
            arguments: to_table(&arguments),
            argument_fields: vec![GENERIC_JVM_ARGUMENTS.to_string(), DEBUG_ARGS.to_string()],
            value_syntax: ValueSyntax::default(),
        }
    }
}

impl TuningSpec {
    /// An empty tuning: no properties, no arguments, default fields and tag.
    pub fn empty() -> Self {
        Self {
            properties: BTreeMap::new(),
            arguments: BTreeMap::new(),
            ..Self::default()
        }
    }

    /// Set or replace a desired adapter property.
    pub fn with_property(mut self, name: &str, value: &str) -> Self {
        self.properties.insert(name.to_string(), value.to_string());
        self
    }

    /// Set or replace a desired argument setting.
    pub fn with_argument(mut self, key: &str, value: &str) -> Self {
        self.arguments.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_argument_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.argument_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_value_syntax(mut self, syntax: ValueSyntax) -> Self {
        self.value_syntax = syntax;
        self
    }

    pub fn with_description_tag(mut self, tag: &str) -> Self {
        self.description_tag = tag.to_string();
        self
    }

    pub fn resource_kind(&self) -> &str {
        &self.resource_kind
    }

    pub fn description_tag(&self) -> &str {
        &self.description_tag
    }

    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    pub fn arguments(&self) -> &BTreeMap<String, String> {
        &self.arguments
    }

    pub fn argument_fields(&self) -> &[String] {
        &self.argument_fields
    }

    pub fn value_syntax(&self) -> ValueSyntax {
        self.value_syntax
    }

    /// Compile one matcher per argument setting, paired with its value.
    pub fn argument_tokens(&self) -> Result<Vec<(ArgumentToken, &str)>> {
        self.arguments
            .iter()
            .map(|(key, value)| Ok((ArgumentToken::new(key, self.value_syntax)?, value.as_str())))
            .collect()
    }

    /// Check the tuning for values that would make a run misbehave.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigParse`] if:
    /// - the resource kind, tag, a property name or a field name is empty
    /// - an argument key cannot form a single `-D` token
    /// - an argument value would not be recognised by `value_syntax`, which
    ///   would append a fresh token on every run
    /// - arguments are configured but no argument field is
    pub fn validate(&self) -> Result<()> {
        if self.resource_kind.trim().is_empty() {
            return Err(Error::config("resource_kind must not be empty"));
        }
        if self.description_tag.trim().is_empty() {
            return Err(Error::ConfigParse {
                message: "description_tag must not be empty".to_string(),
                hint: Some("an empty tag would classify every resource as a match".to_string()),
            });
        }
        if self.properties.keys().any(|name| name.trim().is_empty()) {
            return Err(Error::config("property names must not be empty"));
        }
        if self.argument_fields.iter().any(|field| field.trim().is_empty()) {
            return Err(Error::config("argument field names must not be empty"));
        }
        if !self.arguments.is_empty() && self.argument_fields.is_empty() {
            return Err(Error::ConfigParse {
                message: "arguments are configured but argument_fields is empty".to_string(),
                hint: Some(format!(
                    "list the fields to update, e.g. [{}, {}]",
                    GENERIC_JVM_ARGUMENTS, DEBUG_ARGS
                )),
            });
        }

        for (key, value) in &self.arguments {
            ArgumentToken::new(key, self.value_syntax)?;
            if !self.value_syntax.accepts(value) {
                let hint = match self.value_syntax {
                    ValueSyntax::Digits => "set value_syntax: token to manage non-numeric values",
                    ValueSyntax::Token => "argument values must not contain whitespace or quotes",
                };
                return Err(Error::ConfigParse {
                    message: format!(
                        "argument '{}' has value '{}' which {} syntax cannot match",
                        key, value, self.value_syntax
                    ),
                    hint: Some(hint.to_string()),
                });
            }
        }

        Ok(())
    }

    /// Render the tuning as YAML.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

/// Parse and validate a tuning from YAML.
///
/// An empty document yields [`TuningSpec::default`].
pub fn parse(yaml_content: &str) -> Result<TuningSpec> {
    let spec = if yaml_content.trim().is_empty() {
        TuningSpec::default()
    } else {
        serde_yaml::from_str::<TuningSpec>(yaml_content)?
    };
    spec.validate()?;
    Ok(spec)
}

/// Parse and validate a tuning from a file.
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<TuningSpec> {
    let content = std::fs::read_to_string(path).map_err(Error::Io)?;
    parse(&content)
}

fn to_table(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
