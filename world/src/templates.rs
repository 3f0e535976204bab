//! Loading and validation of enemy stat templates.

use std::{
    fs,
    path::{Path, PathBuf},
};

use goblin_siege_core::{EnemyKind, EnemyTemplate};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Errors raised while loading enemy templates.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// The template file could not be read.
    #[error("failed to read enemy templates at {}", path.display())]
    Read {
        /// Location that failed to load.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The template file is not valid TOML for the expected layout.
    #[error("failed to parse enemy templates")]
    Parse(#[from] toml::de::Error),
    /// A template field holds a value the simulation cannot use.
    #[error("template `{template}` has invalid {field}: {value}")]
    InvalidField {
        /// Template containing the field.
        template: &'static str,
        /// Name of the rejected field.
        field: &'static str,
        /// Rejected value.
        value: f32,
    },
}

/// Stat templates for every enemy kind.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TemplateBook {
    slime: EnemyTemplate,
    king_slime: EnemyTemplate,
    skeleton: EnemyTemplate,
    goblin: EnemyTemplate,
    goblin_priest: EnemyTemplate,
}

impl TemplateBook {
    /// Parses and validates templates from TOML text.
    ///
    /// Tables are named after [`EnemyKind::template_name`]; omitted tables and
    /// fields keep their defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, TemplateError> {
        let book: Self = toml::from_str(contents)?;
        book.validate()?;
        Ok(book)
    }

    /// Reads, parses and validates templates from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TemplateError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| TemplateError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let book = Self::from_toml_str(&contents)?;
        debug!(path = %path.display(), "loaded enemy templates");
        Ok(book)
    }

    /// Template configuring the provided kind.
    #[must_use]
    pub fn get(&self, kind: EnemyKind) -> &EnemyTemplate {
        match kind {
            EnemyKind::Slime => &self.slime,
            EnemyKind::KingSlime => &self.king_slime,
            EnemyKind::Skeleton => &self.skeleton,
            EnemyKind::Goblin => &self.goblin,
            EnemyKind::GoblinPriest => &self.goblin_priest,
        }
    }

    /// Replaces the template of a kind after validating it.
    pub fn set(&mut self, kind: EnemyKind, template: EnemyTemplate) -> Result<(), TemplateError> {
        validate_template(kind.template_name(), &template)?;
        match kind {
            EnemyKind::Slime => self.slime = template,
            EnemyKind::KingSlime => self.king_slime = template,
            EnemyKind::Skeleton => self.skeleton = template,
            EnemyKind::Goblin => self.goblin = template,
            EnemyKind::GoblinPriest => self.goblin_priest = template,
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), TemplateError> {
        for kind in EnemyKind::ALL {
            validate_template(kind.template_name(), self.get(kind))?;
        }
        Ok(())
    }
}

fn validate_template(name: &'static str, template: &EnemyTemplate) -> Result<(), TemplateError> {
    let invalid = |field: &'static str, value: f32| TemplateError::InvalidField {
        template: name,
        field,
        value,
    };

    let fields = [
        ("hp", template.hp),
        ("speed", template.speed),
        ("damage", template.damage),
        ("reward_ratio", template.reward_ratio),
        ("recover_interval", template.recover_interval),
        ("recover_range", template.recover_range),
        ("recover_intensity", template.recover_intensity),
    ];
    if let Some((field, value)) = fields.into_iter().find(|(_, value)| !value.is_finite()) {
        return Err(invalid(field, value));
    }

    if template.hp <= 0.0 {
        return Err(invalid("hp", template.hp));
    }
    if template.speed < 0.0 {
        return Err(invalid("speed", template.speed));
    }
    if template.recover_interval <= 0.0 {
        return Err(invalid("recover_interval", template.recover_interval));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_named_tables_and_keeps_defaults() {
        let book = TemplateBook::from_toml_str(
            r#"
            [goblin_priest]
            hp = 80.0
            recover_interval = 2.0
            recover_range = 1.5
            recover_intensity = 10.0
            "#,
        )
        .expect("templates should parse");

        let priest = book.get(EnemyKind::GoblinPriest);
        assert_eq!(priest.hp, 80.0);
        assert_eq!(priest.recover_range, 1.5);
        assert_eq!(priest.speed, EnemyTemplate::default().speed);
        assert_eq!(book.get(EnemyKind::Slime), &EnemyTemplate::default());
    }

    #[test]
    fn rejects_zero_health() {
        let error = TemplateBook::from_toml_str("[slime]\nhp = 0.0\n")
            .expect_err("zero hp must be rejected");

        assert!(matches!(
            error,
            TemplateError::InvalidField {
                template: "slime",
                field: "hp",
                ..
            }
        ));
    }

    #[test]
    fn rejects_non_positive_skill_interval() {
        let error = TemplateBook::from_toml_str("[goblin]\nrecover_interval = 0.0\n")
            .expect_err("zero interval must be rejected");

        assert!(matches!(
            error,
            TemplateError::InvalidField {
                field: "recover_interval",
                ..
            }
        ));
    }

    #[test]
    fn rejects_unknown_tables() {
        let error = TemplateBook::from_toml_str("[dragon]\nhp = 10.0\n")
            .expect_err("unknown kinds must be rejected");
        assert!(matches!(error, TemplateError::Parse(_)));
    }

    #[test]
    fn set_validates_replacement() {
        let mut book = TemplateBook::default();
        let broken = EnemyTemplate {
            speed: -1.0,
            ..EnemyTemplate::default()
        };

        assert!(book.set(EnemyKind::Goblin, broken).is_err());
        assert_eq!(book.get(EnemyKind::Goblin), &EnemyTemplate::default());
    }

    #[test]
    fn bundled_templates_are_valid() {
        let contents = include_str!("../../assets/enemy_templates.toml");
        let book = TemplateBook::from_toml_str(contents).expect("bundled templates parse");

        assert!(book.get(EnemyKind::GoblinPriest).recover_range > 0.0);
    }

    #[test]
    fn missing_file_reports_path() {
        let error = TemplateBook::load("does/not/exist.toml").expect_err("missing file");
        assert!(error.to_string().contains("does/not/exist.toml"));
    }
}
