//! Documentation generator for a configuration schema
//!
//! Generates a markdown reference and a `.env` template from [`Schema`] metadata.

use crate::config::{Schema, SettingKind, SettingSource, SettingSpec, meta};
use std::collections::HashSet;
use std::fmt::Write;

/// Configuration for docs generation
#[derive(Debug, Clone, Default)]
pub struct DocsConfig {
    /// Title for the documentation
    pub title: Option<String>,
    /// Description/introduction text
    pub description: Option<String>,
    /// Whether to list fixed literals alongside environment settings
    pub show_fixed: bool,
    /// Whether to group by category
    pub group_by_category: bool,
}

impl DocsConfig {
    #[must_use]
    pub fn new() -> Self {
        Self {
            show_fixed: true,
            group_by_category: true,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    #[must_use]
    pub fn hide_fixed(mut self) -> Self {
        self.show_fixed = false;
        self
    }

    #[must_use]
    pub fn flat(mut self) -> Self {
        self.group_by_category = false;
        self
    }
}

/// Generate markdown documentation for a schema
#[must_use]
pub fn generate_docs(schema: &Schema, config: DocsConfig) -> String {
    let mut output = String::new();

    let title = config
        .title
        .unwrap_or_else(|| "Configuration Reference".to_string());
    let _ = writeln!(output, "# {title}\n");

    if let Some(desc) = config.description {
        let _ = writeln!(output, "{desc}\n");
    }

    let settings: Vec<&SettingSpec> = schema
        .iter()
        .filter(|s| config.show_fixed || !s.is_fixed())
        .collect();

    if config.group_by_category {
        // Categories in first-appearance order, settings in schema order within each
        let mut categories: Vec<&str> = Vec::new();
        for spec in &settings {
            let category = category_of(spec);
            if !categories.contains(&category) {
                categories.push(category);
            }
        }

        for category in categories {
            let _ = writeln!(output, "\n## {}\n", capitalize(category));
            for spec in settings.iter().filter(|s| category_of(s) == category) {
                format_setting(&mut output, spec);
            }
        }
    } else {
        output.push_str("## Settings\n\n");
        for spec in &settings {
            format_setting(&mut output, spec);
        }
    }

    output
}

/// Generate a `.env` template listing every environment variable the schema reads
///
/// Defaults are pre-filled except for secrets. Fixed literals are omitted and a
/// variable shared by several settings appears once.
#[must_use]
pub fn generate_env_template(schema: &Schema) -> String {
    let mut output = String::new();
    let mut seen = HashSet::new();

    for spec in schema {
        let Some(var) = spec.env_var() else {
            continue;
        };
        if !seen.insert(var) {
            continue;
        }

        if let Some(desc) = spec.get_meta_str(meta::DESCRIPTION) {
            let _ = writeln!(output, "# {desc}");
        }
        let policy = if spec.required && spec.default.is_none() {
            "required"
        } else {
            "optional"
        };
        let _ = writeln!(output, "# {} ({policy})", format_kind(spec.kind));

        let value = match spec.default {
            Some(ref default) if !spec.is_secret() => default.as_str(),
            _ => "",
        };
        let _ = writeln!(output, "{var}={value}\n");
    }

    output
}

fn category_of(spec: &SettingSpec) -> &str {
    spec.get_meta_str(meta::CATEGORY).unwrap_or("general")
}

fn format_setting(out: &mut String, spec: &SettingSpec) {
    let _ = writeln!(out, "### `{}`\n", spec.name);

    let mut badges = Vec::new();
    if spec.required && spec.default.is_none() {
        badges.push("Required");
    }
    if spec.is_secret() {
        badges.push("Secret");
    }
    if spec.is_fixed() {
        badges.push("Fixed");
    }
    if !badges.is_empty() {
        let _ = writeln!(out, "{}\n", badges.join(" • "));
    }

    if let Some(desc) = spec.get_meta_str(meta::DESCRIPTION) {
        let _ = writeln!(out, "{desc}\n");
    }

    out.push_str("| Property | Value |\n");
    out.push_str("|----------|-------|\n");
    let _ = writeln!(out, "| **Type** | {} |", format_kind(spec.kind));

    match spec.source {
        SettingSource::Fixed(ref literal) => {
            let _ = writeln!(out, "| **Value** | {} |", format_literal(spec, literal));
        }
        SettingSource::Env(_) => {
            if let Some(var) = spec.env_var() {
                let _ = writeln!(out, "| **Variable** | `{var}` |");
            }
            if let Some(ref default) = spec.default {
                let _ = writeln!(out, "| **Default** | {} |", format_literal(spec, default));
            }
        }
    }

    let integer = &spec.constraints.integer;
    match (integer.min, integer.max) {
        (Some(min), Some(max)) => {
            let _ = writeln!(out, "| **Range** | {min} - {max} |");
        }
        (Some(min), None) => {
            let _ = writeln!(out, "| **Minimum** | {min} |");
        }
        (None, Some(max)) => {
            let _ = writeln!(out, "| **Maximum** | {max} |");
        }
        (None, None) => {}
    }

    if let Some(ref pattern) = spec.constraints.text.pattern {
        let _ = writeln!(out, "| **Pattern** | `{pattern}` |");
    }

    if let Some(ref schemes) = spec.constraints.url.schemes {
        let _ = writeln!(out, "| **Schemes** | {} |", schemes.join(", "));
    }

    out.push_str("\n---\n\n");
}

fn format_kind(kind: SettingKind) -> &'static str {
    match kind {
        SettingKind::String => "String",
        SettingKind::Integer => "Integer",
        SettingKind::Boolean => "Boolean",
        SettingKind::Url => "URL",
    }
}

fn format_literal(spec: &SettingSpec, literal: &str) -> String {
    if spec.is_secret() {
        "*hidden*".to_string()
    } else {
        format!("`\"{literal}\"`")
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

// =============================================================================
// Tests
// =============================================================================
