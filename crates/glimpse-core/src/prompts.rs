//! Prompt Library for vision requests
//!
//! Prompts are loaded with a two-layer resolution:
//! 1. Check for override in data dir (~/.local/share/glimpse/prompts/overrides/)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Overrides let users tune the wording sent to the vision model without
//! rebuilding. The reply normalizer tolerates whatever shape comes back, so
//! an override that asks for plain text still produces a usable result.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::settings::Language;

/// Embedded default prompts (compiled into binary)
mod defaults {
    pub const DESCRIBE_IMAGE: &str = include_str!("../prompts/describe_image.md");
}

/// Known prompt IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptId {
    DescribeImage,
}

impl PromptId {
    /// Get the string identifier for this prompt
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DescribeImage => "describe_image",
        }
    }

    /// Get all known prompt IDs
    pub fn all() -> &'static [PromptId] {
        &[Self::DescribeImage]
    }

    fn default_content(&self) -> &'static str {
        match self {
            Self::DescribeImage => defaults::DESCRIBE_IMAGE,
        }
    }
}

/// Prompt frontmatter metadata
#[derive(Debug, Clone, Deserialize)]
pub struct PromptMetadata {
    /// Unique identifier
    pub id: String,
    /// Version number for tracking changes
    pub version: u32,
}

/// A loaded prompt with metadata and content
#[derive(Debug, Clone)]
pub struct Prompt {
    pub metadata: PromptMetadata,
    /// The prompt content (system + user sections)
    pub content: String,
    /// Whether this came from an override file
    pub is_override: bool,
    pub override_path: Option<PathBuf>,
}

impl Prompt {
    pub fn system_section(&self) -> Option<&str> {
        extract_section(&self.content, "# System")
    }

    pub fn user_section(&self) -> Option<&str> {
        extract_section(&self.content, "# User")
    }

    /// Render the whole prompt with `{{var}}` placeholders replaced
    pub fn render(&self, vars: &HashMap<&str, &str>) -> String {
        render_template(&self.content, vars)
    }

    /// Render just the user section, or the whole prompt if it has none
    pub fn render_user(&self, vars: &HashMap<&str, &str>) -> String {
        match self.user_section() {
            Some(user) => render_template(user, vars),
            None => self.render(vars),
        }
    }

    /// Render the image-description request for a reply language
    ///
    /// The system section (if any) is prepended, since the vision endpoints
    /// used here take a single text part.
    pub fn render_for_image(&self, language: Language, product_hint: Option<&str>) -> String {
        let mut vars = HashMap::new();
        vars.insert("language", language.display_name());
        if let Some(hint) = product_hint {
            vars.insert("product_hint", hint);
        }

        let user = self.render_user(&vars);
        match self.system_section() {
            Some(system) => format!("{}\n\n{}", system, user),
            None => user,
        }
    }
}

/// Prompt library for loading and caching prompts
pub struct PromptLibrary {
    override_dir: Option<PathBuf>,
    cache: HashMap<PromptId, Prompt>,
}

impl PromptLibrary {
    /// Create a new prompt library with default paths
    pub fn new() -> Self {
        Self {
            override_dir: default_prompts_dir(),
            cache: HashMap::new(),
        }
    }

    /// Create a prompt library with a custom override directory
    pub fn with_override_dir(path: PathBuf) -> Self {
        Self {
            override_dir: Some(path),
            cache: HashMap::new(),
        }
    }

    /// Create a prompt library with no override directory (embedded only)
    pub fn embedded_only() -> Self {
        Self {
            override_dir: None,
            cache: HashMap::new(),
        }
    }

    /// Get a prompt by ID, loading from override or default
    pub fn get(&mut self, id: PromptId) -> Result<&Prompt> {
        if !self.cache.contains_key(&id) {
            let prompt = self.load(id)?;
            self.cache.insert(id, prompt);
        }
        self.cache
            .get(&id)
            .ok_or_else(|| Error::NotFound(format!("Prompt {}", id.as_str())))
    }

    fn load(&self, id: PromptId) -> Result<Prompt> {
        if let Some(path) = self.override_path(id) {
            if path.exists() {
                let content = fs::read_to_string(&path).map_err(|e| {
                    Error::InvalidData(format!("Failed to read prompt override: {}", e))
                })?;
                let (metadata, body) = parse_prompt(&content)?;
                tracing::debug!(prompt = id.as_str(), path = %path.display(), "Using prompt override");
                return Ok(Prompt {
                    metadata,
                    content: body,
                    is_override: true,
                    override_path: Some(path),
                });
            }
        }

        let (metadata, body) = parse_prompt(id.default_content())?;
        Ok(Prompt {
            metadata,
            content: body,
            is_override: false,
            override_path: None,
        })
    }

    pub fn has_override(&self, id: PromptId) -> bool {
        self.override_path(id).is_some_and(|p| p.exists())
    }

    fn override_path(&self, id: PromptId) -> Option<PathBuf> {
        self.override_dir
            .as_ref()
            .map(|d| d.join(format!("{}.md", id.as_str())))
    }
}

impl Default for PromptLibrary {
    fn default() -> Self {
        Self::new()
    }
}

/// Default prompts override directory
pub fn default_prompts_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("glimpse").join("prompts").join("overrides"))
}

/// Parse a prompt file into metadata and body
fn parse_prompt(content: &str) -> Result<(PromptMetadata, String)> {
    let content = content.trim();

    if !content.starts_with("---") {
        return Err(Error::InvalidData(
            "Prompt must start with YAML frontmatter (---)".into(),
        ));
    }

    let rest = &content[3..];
    let end = rest.find("---").ok_or_else(|| {
        Error::InvalidData("Prompt frontmatter not closed (missing second ---)".into())
    })?;

    let frontmatter = rest[..end].trim();
    let body = rest[end + 3..].trim();

    let metadata: PromptMetadata = serde_yaml::from_str(frontmatter)
        .map_err(|e| Error::InvalidData(format!("Invalid prompt frontmatter: {}", e)))?;

    Ok((metadata, body.to_string()))
}

fn extract_section<'a>(content: &'a str, header: &str) -> Option<&'a str> {
    let start = content.find(header)?;
    let after_header = &content[start + header.len()..];
    let end = after_header.find("\n# ").unwrap_or(after_header.len());
    Some(after_header[..end].trim())
}

fn render_template(template: &str, vars: &HashMap<&str, &str>) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        let pattern = format!("{{{{{}}}}}", key);
        result = result.replace(&pattern, value);
    }
    remove_unmatched_conditionals(&result, vars)
}

/// Resolve `{{#if var}}...{{/if}}` blocks: keep the body when `var` is set
/// and non-empty, drop the whole block otherwise
fn remove_unmatched_conditionals(content: &str, vars: &HashMap<&str, &str>) -> String {
    let mut result = content.to_string();

    while let Some(if_start) = result.find("{{#if ") {
        let var_start = if_start + 6;
        let Some(var_end) = result[var_start..].find("}}") else {
            break;
        };
        let var_name = &result[var_start..var_start + var_end];
        let block_start = var_start + var_end + 2;
        let Some(endif_pos) = result[block_start..].find("{{/if}}") else {
            break;
        };
        let full_end = block_start + endif_pos + 7;

        let keep = vars.get(var_name).is_some_and(|v| !v.is_empty());
        result = if keep {
            format!(
                "{}{}{}",
                &result[..if_start],
                &result[block_start..block_start + endif_pos],
                &result[full_end..]
            )
        } else {
            format!("{}{}", &result[..if_start], &result[full_end..])
        };
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_prompt() {
        let content = r#"---
id: test_prompt
version: 1
---

# System
Test system prompt.

# User
Test user prompt with {{variable}}.
"#;

        let (metadata, body) = parse_prompt(content).unwrap();
        assert_eq!(metadata.id, "test_prompt");
        assert_eq!(metadata.version, 1);
        assert!(body.contains("# System"));
        assert!(body.contains("# User"));
    }

    #[test]
    fn test_parse_prompt_without_frontmatter() {
        assert!(parse_prompt("# User\nhello").is_err());
        assert!(parse_prompt("---\nid: x\nversion: 1\n").is_err());
    }

    #[test]
    fn test_extract_section() {
        let content = "# System\nSystem content here.\n\n# User\nUser content here.";
        assert_eq!(
            extract_section(content, "# System"),
            Some("System content here.")
        );
        assert_eq!(
            extract_section(content, "# User"),
            Some("User content here.")
        );
    }

    #[test]
    fn test_conditional_blocks() {
        let content = "Start{{#if hint}}\nHint: {{hint}}{{/if}}\nEnd";

        let mut vars = HashMap::new();
        vars.insert("hint", "phone");
        let result = render_template(content, &vars);
        assert!(result.contains("Hint: phone"));

        let empty_vars: HashMap<&str, &str> = HashMap::new();
        let result = render_template(content, &empty_vars);
        assert!(!result.contains("Hint:"));
        assert!(result.contains("Start"));
        assert!(result.contains("End"));
    }

    #[test]
    fn test_describe_image_renders_language() {
        let mut lib = PromptLibrary::embedded_only();
        let prompt = lib.get(PromptId::DescribeImage).unwrap();

        let english = prompt.render_for_image(Language::English, None);
        assert!(english.contains("Write every text value in English."));
        assert!(english.contains("keyFeatures"));
        assert!(english.starts_with("You are a vision assistant"));
        assert!(!english.contains("{{"));
        assert!(!english.contains("The user says"));

        let korean = prompt.render_for_image(Language::Korean, Some("a camera"));
        assert!(korean.contains("Write every text value in Korean."));
        assert!(korean.contains("The user says this is: a camera"));
    }

    #[test]
    fn test_default_prompts_parse() {
        for id in PromptId::all() {
            let (metadata, _) = parse_prompt(id.default_content()).unwrap();
            assert_eq!(metadata.id, id.as_str());
        }
    }

    #[test]
    fn test_override_dir_takes_precedence() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("describe_image.md"),
            "---\nid: describe_image\nversion: 9\n---\n# User\nJust say what you see in {{language}}.",
        )
        .unwrap();

        let mut lib = PromptLibrary::with_override_dir(dir.path().to_path_buf());
        assert!(lib.has_override(PromptId::DescribeImage));

        let prompt = lib.get(PromptId::DescribeImage).unwrap();
        assert!(prompt.is_override);
        assert_eq!(prompt.metadata.version, 9);
        assert_eq!(
            prompt.render_for_image(Language::Korean, None),
            "Just say what you see in Korean."
        );
    }
}
