use crate::parsers::text::TextCleanOptions;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// One way of locating a field value inside a candidate element
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldRule {
    /// Regex the element's tag name must match (any tag if None)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,

    /// Regex the element's class attribute must match (any element if None)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,

    /// Attribute holding the value; the element's trimmed text if None
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
}

impl FieldRule {
    fn text(tag: Option<&str>, class: &str) -> Self {
        Self {
            tag: tag.map(str::to_string),
            class: Some(class.to_string()),
            attribute: None,
        }
    }

    fn attr(tag: &str, class: &str, attribute: &str) -> Self {
        Self {
            tag: Some(tag.to_string()),
            class: Some(class.to_string()),
            attribute: Some(attribute.to_string()),
        }
    }
}

/// Pattern configuration for candidate discovery and field lookup.
///
/// Each field holds a ranked list of rules; the first rule producing a
/// non-empty value wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeuristicConfig {
    /// Class or id pattern marking a candidate element
    #[serde(default = "default_candidate_pattern")]
    pub candidate_pattern: String,

    /// Class pattern marking a "next page" link
    #[serde(default = "default_next_pattern")]
    pub next_pattern: String,

    #[serde(default = "default_name_rules")]
    pub name: Vec<FieldRule>,

    #[serde(default = "default_price_rules")]
    pub price: Vec<FieldRule>,

    #[serde(default = "default_description_rules")]
    pub description: Vec<FieldRule>,

    #[serde(default = "default_model_rules")]
    pub model_number: Vec<FieldRule>,

    #[serde(default = "default_image_rules")]
    pub image: Vec<FieldRule>,

    /// Whether to collapse whitespace runs in extracted text (trim only if false)
    #[serde(default = "default_collapse_whitespace")]
    pub collapse_whitespace: bool,
}

fn default_collapse_whitespace() -> bool {
    false
}

fn default_candidate_pattern() -> String {
    r"(?i)(product|item)".to_string()
}

fn default_next_pattern() -> String {
    r"(?i)\bnext\b".to_string()
}

fn default_name_rules() -> Vec<FieldRule> {
    vec![
        FieldRule::text(Some(r"^h[1-6]$"), r"(?i)(name|title)"),
        FieldRule::text(None, r"(?i)(name|title)"),
    ]
}

fn default_price_rules() -> Vec<FieldRule> {
    vec![
        FieldRule::text(Some(r"^span$"), r"(?i)(price|amount)"),
        FieldRule::text(None, r"(?i)(price|amount)"),
    ]
}

fn default_description_rules() -> Vec<FieldRule> {
    vec![
        FieldRule::text(Some(r"^p$"), r"(?i)(description|detail)"),
        FieldRule::text(None, r"(?i)(description|detail)"),
    ]
}

fn default_model_rules() -> Vec<FieldRule> {
    vec![
        FieldRule::text(Some(r"^span$"), r"(?i)(model|sku)"),
        FieldRule::text(None, r"(?i)(model|sku)"),
    ]
}

fn default_image_rules() -> Vec<FieldRule> {
    vec![
        FieldRule::attr("^img$", r"(?i)(image|img|photo)", "src"),
        // lazy-loaded images keep the real source here
        FieldRule::attr("^img$", r"(?i)(image|img|photo)", "data-src"),
    ]
}

impl Default for HeuristicConfig {
    fn default() -> Self {
        Self {
            candidate_pattern: default_candidate_pattern(),
            next_pattern: default_next_pattern(),
            name: default_name_rules(),
            price: default_price_rules(),
            description: default_description_rules(),
            model_number: default_model_rules(),
            image: default_image_rules(),
            collapse_whitespace: default_collapse_whitespace(),
        }
    }
}

/// A [`FieldRule`] with its patterns compiled
#[derive(Debug)]
pub struct CompiledRule {
    tag: Option<Regex>,
    class: Option<Regex>,
    attribute: Option<String>,
}

impl CompiledRule {
    fn new(rule: &FieldRule) -> Result<Self, regex::Error> {
        Ok(Self {
            tag: rule.tag.as_deref().map(Regex::new).transpose()?,
            class: rule.class.as_deref().map(Regex::new).transpose()?,
            attribute: rule.attribute.clone(),
        })
    }

    /// Whether an element with this tag and class attribute satisfies the rule
    pub fn matches(&self, tag: &str, class: Option<&str>) -> bool {
        if let Some(regex) = &self.tag {
            if !regex.is_match(tag) {
                return false;
            }
        }
        match &self.class {
            Some(regex) => class.is_some_and(|c| regex.is_match(c)),
            None => true,
        }
    }

    pub fn attribute(&self) -> Option<&str> {
        self.attribute.as_deref()
    }
}

/// Compiled heuristics used by the extraction engine
#[derive(Debug)]
pub struct Heuristics {
    candidate: Regex,
    next: Regex,
    pub name: Vec<CompiledRule>,
    pub price: Vec<CompiledRule>,
    pub description: Vec<CompiledRule>,
    pub model_number: Vec<CompiledRule>,
    pub image: Vec<CompiledRule>,
    pub text_options: TextCleanOptions,
}

impl Default for Heuristics {
    fn default() -> Self {
        Self::new(&HeuristicConfig::default()).expect("Default heuristic patterns should be valid")
    }
}

impl Heuristics {
    /// Compile a heuristic configuration
    pub fn new(config: &HeuristicConfig) -> Result<Self, regex::Error> {
        Ok(Self {
            candidate: Regex::new(&config.candidate_pattern)?,
            next: Regex::new(&config.next_pattern)?,
            name: compile_rules(&config.name)?,
            price: compile_rules(&config.price)?,
            description: compile_rules(&config.description)?,
            model_number: compile_rules(&config.model_number)?,
            image: compile_rules(&config.image)?,
            text_options: TextCleanOptions {
                normalize_whitespace: config.collapse_whitespace,
            },
        })
    }

    /// Check whether an element's class or id marks it as a product candidate
    pub fn is_candidate(&self, class: Option<&str>, id: Option<&str>) -> bool {
        class.is_some_and(|c| self.candidate.is_match(c))
            || id.is_some_and(|i| self.candidate.is_match(i))
    }

    /// Check whether a link is a "next page" link by class or rel
    pub fn is_next_link(&self, class: Option<&str>, rel: Option<&str>) -> bool {
        if rel.is_some_and(|r| r.split_whitespace().any(|v| v.eq_ignore_ascii_case("next"))) {
            return true;
        }
        class.is_some_and(|c| self.next.is_match(c))
    }
}

fn compile_rules(rules: &[FieldRule]) -> Result<Vec<CompiledRule>, regex::Error> {
    rules.iter().map(CompiledRule::new).collect()
}
