// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{Result, TagrunError};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::TagrunError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.runner))
    }
}

/// Check the semantic rules serde cannot express.
pub fn validate_config(cfg: &RawConfigFile) -> Result<()> {
    if let Some(tag) = cfg.runner.tag.as_deref() {
        validate_tag(tag)?;
    }

    if let Some(program) = cfg.runner.shell_program.as_deref() {
        if program.trim().is_empty() {
            return Err(TagrunError::ConfigError(
                "[runner].shell_program must not be empty".to_string(),
            ));
        }
    }

    Ok(())
}

/// A tag prefixes single output lines, so it may not span lines itself.
pub fn validate_tag(tag: &str) -> Result<()> {
    if tag.contains(['\n', '\r']) {
        return Err(TagrunError::ConfigError(format!(
            "tag {tag:?} must not contain line breaks"
        )));
    }
    Ok(())
}
