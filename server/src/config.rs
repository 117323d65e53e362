//! Process configuration, read from the environment at startup.

use std::env;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value for {var}: {value:?} ({expected})")]
    Invalid {
        var: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// What happens to dependents when a category or recipe is deleted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeletePolicy {
    /// Delete the entity and leave recipes/reviews pointing at it untouched.
    #[default]
    Orphan,
    /// Refuse the delete while anything still references the entity.
    Restrict,
}

/// Schema and referential rules that vary per deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Policy {
    pub require_recipe_category: bool,
    pub delete: DeletePolicy,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            require_recipe_category: true,
            delete: DeletePolicy::Orphan,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection string, or `memory:` for the in-process store
    pub database_url: String,
    pub port: u16,
    pub policy: Policy,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let port = match lookup("PORT") {
            Some(value) => value.trim().parse::<u16>().map_err(|_| ConfigError::Invalid {
                var: "PORT",
                value,
                expected: "a port number",
            })?,
            None => DEFAULT_PORT,
        };

        let require_recipe_category = match lookup("RECIPE_CATEGORY_REQUIRED") {
            Some(value) => parse_bool(&value).ok_or(ConfigError::Invalid {
                var: "RECIPE_CATEGORY_REQUIRED",
                value,
                expected: "true or false",
            })?,
            None => Policy::default().require_recipe_category,
        };

        let delete = match lookup("DELETE_POLICY") {
            Some(value) => match value.trim().to_ascii_lowercase().as_str() {
                "orphan" => DeletePolicy::Orphan,
                "restrict" => DeletePolicy::Restrict,
                _ => {
                    return Err(ConfigError::Invalid {
                        var: "DELETE_POLICY",
                        value,
                        expected: "orphan or restrict",
                    })
                }
            },
            None => DeletePolicy::default(),
        };

        Ok(Self {
            database_url,
            port,
            policy: Policy {
                require_recipe_category,
                delete,
            },
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
