//! Node identity resolution.

use crate::config::NODE_NAME_ENV;
use crate::error::IdentityError;

/// Name of the node this daemon labels.
///
/// A non-empty explicit name is used as-is. Otherwise, including an empty
/// explicit name, the name is read from an environment variable on every call
/// to [`NodeIdentity::resolve`] until a lookup succeeds; after that it stays
/// fixed for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct NodeIdentity {
    name: Option<String>,
    env_var: String,
}

impl NodeIdentity {
    pub fn new(explicit: Option<String>, env_var: impl Into<String>) -> Self {
        Self {
            name: explicit.filter(|name| !name.is_empty()),
            env_var: env_var.into(),
        }
    }

    pub fn fixed(name: impl Into<String>) -> Self {
        Self::new(Some(name.into()), NODE_NAME_ENV)
    }

    pub fn from_env(env_var: impl Into<String>) -> Self {
        Self::new(None, env_var)
    }

    /// The node name, looking it up in the environment if not yet known.
    pub fn resolve(&mut self) -> Result<&str, IdentityError> {
        if self.name.is_none() {
            let found = std::env::var(&self.env_var)
                .ok()
                .filter(|name| !name.is_empty())
                .ok_or_else(|| IdentityError::Missing {
                    var: self.env_var.clone(),
                })?;
            self.name = Some(found);
        }

        Ok(self.name.as_deref().unwrap_or_default())
    }
}
