//! Static registry of the bundled collage templates

use thiserror::Error;

/// Errors that can occur during template lookups
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TemplateError {
    /// Template not found in registry
    #[error("template not found: {name}")]
    NotFound { name: String },
}

/// A named layout choice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Template {
    /// Display name, also used for lookups
    pub name: &'static str,
    /// Document reference handed to the scene graph
    pub document: &'static str,
    /// Icon reference for the template picker
    pub icon: &'static str,
    /// Number of image placeholders the document defines
    pub placeholder_count: usize,
    /// Bundled document source
    pub source: &'static str,
}

const BUNDLED: [Template; 5] = [
    Template {
        name: "full-half-half",
        document: "bundled://full_half_half.toml",
        icon: "icons/full_half.png",
        placeholder_count: 3,
        source: include_str!("../../templates/full_half_half.toml"),
    },
    Template {
        name: "half-half-full",
        document: "bundled://half_half_full.toml",
        icon: "icons/half_full.png",
        placeholder_count: 3,
        source: include_str!("../../templates/half_half_full.toml"),
    },
    Template {
        name: "Christmas",
        document: "bundled://christmas.toml",
        icon: "icons/christmas.png",
        placeholder_count: 3,
        source: include_str!("../../templates/christmas.toml"),
    },
    Template {
        name: "Bonjour",
        document: "bundled://bonjour.toml",
        icon: "icons/bonjour.png",
        placeholder_count: 3,
        source: include_str!("../../templates/bonjour.toml"),
    },
    Template {
        name: "Missing You",
        document: "bundled://missing_you.toml",
        icon: "icons/missing_you.png",
        placeholder_count: 3,
        source: include_str!("../../templates/missing_you.toml"),
    },
];

/// Read-only access to the template catalogue
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateRegistry;

impl TemplateRegistry {
    /// Every template, in picker order
    pub fn all() -> &'static [Template] {
        &BUNDLED
    }

    /// Look up a template by name (case-insensitive)
    pub fn find(name: &str) -> Result<&'static Template, TemplateError> {
        BUNDLED
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| TemplateError::NotFound {
                name: name.to_string(),
            })
    }

    /// Look up a template by its document reference
    pub fn find_by_document(uri: &str) -> Option<&'static Template> {
        BUNDLED.iter().find(|t| t.document == uri)
    }

    /// Get all template names
    pub fn names() -> impl Iterator<Item = &'static str> {
        BUNDLED.iter().map(|t| t.name)
    }
}
