//! Template to regex compilation.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

static PLACEHOLDER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$[A-Z]+").unwrap());

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("template is empty")]
    EmptyTemplate,
    #[error("placeholder '{placeholder}' in template '{template}' has no binding")]
    UnboundPlaceholder {
        template: String,
        placeholder: String,
    },
    #[error("failed to build template regex: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// How much of a candidate the compiled pattern must consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Anchor {
    /// The pattern must match from the first character; trailing text is ignored.
    Start,
    /// The pattern must match the whole candidate.
    #[default]
    Full,
}

/// A naming template with its variable bindings, ready to compile.
///
/// Placeholders are `$UPPER` tokens. Literal variables and the text around
/// placeholders are escaped; open variables are inserted as-is, so their
/// patterns stay live. Substituted values are never searched for further
/// placeholders.
#[derive(Debug, Clone)]
pub struct Template {
    template: String,
    literal_vars: Vec<(String, String)>,
    open_vars: Vec<(String, String)>,
    suffix: Option<String>,
    anchor: Anchor,
}

impl Template {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            literal_vars: Vec::new(),
            open_vars: Vec::new(),
            suffix: None,
            anchor: Anchor::default(),
        }
    }

    /// Bind `placeholder` to a fixed string.
    pub fn literal(mut self, placeholder: impl Into<String>, value: impl Into<String>) -> Self {
        self.literal_vars.push((placeholder.into(), value.into()));
        self
    }

    /// Bind `placeholder` to a regex fragment, usually a capture group.
    pub fn open(mut self, placeholder: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.open_vars.push((placeholder.into(), pattern.into()));
        self
    }

    /// Require a literal trailer after the template, e.g. `:example.org`.
    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    pub fn anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn compile(&self) -> Result<TemplateMatcher, TemplateError> {
        if self.template.is_empty() {
            return Err(TemplateError::EmptyTemplate);
        }

        // Walk the raw template once so substituted values are never
        // rescanned for placeholders.
        let mut pattern = String::new();
        let mut last_end = 0;
        for m in PLACEHOLDER_PATTERN.find_iter(&self.template) {
            pattern.push_str(&regex::escape(&self.template[last_end..m.start()]));
            pattern.push_str(&self.binding(m.as_str())?);
            last_end = m.end();
        }
        pattern.push_str(&regex::escape(&self.template[last_end..]));

        if let Some(suffix) = &self.suffix {
            pattern.push_str(&regex::escape(suffix));
        }

        // Open captures such as `(.*)` must be able to cross newlines.
        let anchored = match self.anchor {
            Anchor::Start => format!("(?s)^{}", pattern),
            Anchor::Full => format!("(?s)^{}$", pattern),
        };

        Ok(TemplateMatcher {
            regex: Regex::new(&anchored)?,
        })
    }

    /// The regex text a placeholder expands to. Literal bindings win over
    /// open ones.
    fn binding(&self, token: &str) -> Result<String, TemplateError> {
        let lookup = |vars: &[(String, String)]| {
            vars.iter()
                .find(|(placeholder, _)| placeholder == token)
                .map(|(_, value)| value.clone())
        };

        if let Some(value) = lookup(&self.literal_vars) {
            return Ok(regex::escape(&value));
        }
        lookup(&self.open_vars).ok_or_else(|| TemplateError::UnboundPlaceholder {
            template: self.template.clone(),
            placeholder: token.to_string(),
        })
    }
}

/// Compile `template` with the given bindings, anchored at both ends.
pub fn compile(
    template: &str,
    literal_vars: &[(&str, &str)],
    open_vars: &[(&str, &str)],
    suffix: Option<&str>,
) -> Result<TemplateMatcher, TemplateError> {
    let mut builder = Template::new(template);
    for (placeholder, value) in literal_vars {
        builder = builder.literal(*placeholder, *value);
    }
    for (placeholder, pattern) in open_vars {
        builder = builder.open(*placeholder, *pattern);
    }
    if let Some(suffix) = suffix {
        builder = builder.suffix(suffix);
    }
    builder.compile()
}

/// A compiled template. Cheap to clone and safe to share between threads.
#[derive(Debug, Clone)]
pub struct TemplateMatcher {
    regex: Regex,
}

impl TemplateMatcher {
    pub fn is_match(&self, candidate: &str) -> bool {
        self.regex.is_match(candidate)
    }

    /// All capture groups of a matching candidate, in order.
    ///
    /// Groups that did not participate in the match are returned as `""`.
    pub fn captures<'h>(&self, candidate: &'h str) -> Option<Vec<&'h str>> {
        let caps = self.regex.captures(candidate)?;
        Some(
            caps.iter()
                .skip(1)
                .map(|m| m.map_or("", |m| m.as_str()))
                .collect(),
        )
    }

    /// The first capture group of a matching candidate.
    pub fn capture<'h>(&self, candidate: &'h str) -> Option<&'h str> {
        self.regex
            .captures(candidate)?
            .get(1)
            .map(|m| m.as_str())
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

impl fmt::Display for TemplateMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.regex.as_str())
    }
}
