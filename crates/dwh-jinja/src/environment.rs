//! Jinja environment setup for warehouse SQL templates

use crate::error::{JinjaError, JinjaResult};
use dwh_core::sql_utils::escape_sql_string;
use dwh_core::Config;
use minijinja::{Environment, ErrorKind, UndefinedBehavior, Value};
use std::collections::BTreeMap;

/// Named parameters available to every template
#[derive(Debug, Clone, Default)]
pub struct TemplateParams {
    values: BTreeMap<String, Value>,
}

impl TemplateParams {
    /// Create an empty parameter set
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the parameter set from configuration.
    ///
    /// Values are escaped for use inside single-quoted SQL literals. `region`
    /// is always defined (as none when not configured) so templates can
    /// branch on it under strict undefined handling.
    pub fn from_config(config: &Config) -> Self {
        let mut params = Self::new();
        params.insert("iam_role_arn", escape_sql_string(&config.iam_role.arn));
        params.insert("log_data", escape_sql_string(&config.s3.log_data));
        params.insert("log_jsonpath", escape_sql_string(&config.s3.log_jsonpath));
        params.insert("song_data", escape_sql_string(&config.s3.song_data));
        params.insert_optional(
            "region",
            config.s3.region.as_deref().map(escape_sql_string),
        );
        params
    }

    /// Set a parameter
    pub fn insert(&mut self, name: &str, value: impl Into<Value>) {
        self.values.insert(name.to_string(), value.into());
    }

    /// Set a parameter that may be absent; absent values render as falsy
    pub fn insert_optional(&mut self, name: &str, value: Option<String>) {
        let value = match value {
            Some(v) => Value::from(v),
            None => Value::from(()),
        };
        self.values.insert(name.to_string(), value);
    }
}

/// Jinja templating environment for warehouse statements
pub struct TemplateEnvironment {
    env: Environment<'static>,
    params: TemplateParams,
}

impl TemplateEnvironment {
    /// Create a new strict environment with the given parameters
    pub fn new(params: TemplateParams) -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);

        Self { env, params }
    }

    /// Register a named template
    pub fn add_template(&mut self, name: &'static str, source: &'static str) -> JinjaResult<()> {
        self.env.add_template(name, source)?;
        Ok(())
    }

    /// Render a registered template by name
    pub fn render_named(&self, name: &str) -> JinjaResult<String> {
        let template = self.env.get_template(name).map_err(|e| {
            if e.kind() == ErrorKind::TemplateNotFound {
                JinjaError::UnknownTemplate {
                    name: name.to_string(),
                }
            } else {
                JinjaError::from(e)
            }
        })?;

        let rendered = template
            .render(&self.params.values)
            .map_err(|e| classify(name, e))?;
        log::debug!("Rendered template {}", name);
        Ok(rendered)
    }
}

fn classify(template: &str, err: minijinja::Error) -> JinjaError {
    if err.kind() == ErrorKind::UndefinedError {
        JinjaError::UndefinedParameter {
            template: template.to_string(),
            detail: err.to_string(),
        }
    } else {
        JinjaError::from(err)
    }
}

#[cfg(test)]
#[path = "environment_test.rs"]
mod tests;
