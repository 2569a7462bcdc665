// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! `{{var}}` URL template expansion.
//!
//! Templates are expanded repeatedly until no tokens remain, so a variable whose value
//! itself contains a token is resolved on the next round. Expansion gives up after
//! [`MAX_TEMPLATE_EXPANSION_ROUNDS`] rounds.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::debug;

use crate::constants::MAX_TEMPLATE_EXPANSION_ROUNDS;
use crate::dns_errors::TemplateError;

static TEMPLATE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{(\w+)\}\}").expect("template token regex is valid"));

static COMPUTE_VERSION_SEGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/compute/[a-zA-Z0-9]*/projects/").expect("compute version regex is valid")
});

/// Expand every `{{name}}` token in `template` from `vars`.
///
/// Unknown variables expand to the empty string.
///
/// # Errors
///
/// Returns [`TemplateError::RecursionLimitExceeded`] if tokens are still present after
/// [`MAX_TEMPLATE_EXPANSION_ROUNDS`] rounds, which happens when a variable refers to
/// itself directly or through other variables.
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
/// use gcdns::template::expand_template;
///
/// let vars = HashMap::from([("project".to_string(), "p1".to_string())]);
/// assert_eq!(expand_template("projects/{{project}}/x", &vars).unwrap(), "projects/p1/x");
/// ```
pub fn expand_template(
    template: &str,
    vars: &HashMap<String, String>,
) -> Result<String, TemplateError> {
    let mut current = template.to_string();

    for round in 0..MAX_TEMPLATE_EXPANSION_ROUNDS {
        if !TEMPLATE_TOKEN.is_match(&current) {
            return Ok(current);
        }
        current = TEMPLATE_TOKEN
            .replace_all(&current, |caps: &Captures<'_>| {
                vars.get(&caps[1]).cloned().unwrap_or_default()
            })
            .into_owned();
        debug!(round = round + 1, expanded = %current, "Expanded template round");
    }

    if TEMPLATE_TOKEN.is_match(&current) {
        return Err(TemplateError::RecursionLimitExceeded {
            template: template.to_string(),
            rounds: MAX_TEMPLATE_EXPANSION_ROUNDS,
        });
    }
    Ok(current)
}

/// Rewrite a compute self link of any API version to its `v1` form.
///
/// ```
/// use gcdns::template::convert_self_link_to_v1;
///
/// assert_eq!(
///     convert_self_link_to_v1("https://compute.googleapis.com/compute/beta/projects/p/global/networks/n"),
///     "https://compute.googleapis.com/compute/v1/projects/p/global/networks/n",
/// );
/// ```
#[must_use]
pub fn convert_self_link_to_v1(link: &str) -> String {
    COMPUTE_VERSION_SEGMENT
        .replace(link, "/compute/v1/projects/")
        .into_owned()
}

/// Resolves the `network_url` of a health-checked target into a fully-qualified URL.
#[derive(Debug, Clone)]
pub struct NetworkUrlResolver {
    compute_base_path: String,
    project: String,
}

impl NetworkUrlResolver {
    /// Create a resolver for the given compute base path and record-set project.
    pub fn new(compute_base_path: impl Into<String>, project: impl Into<String>) -> Self {
        Self {
            compute_base_path: compute_base_path.into(),
            project: project.into(),
        }
    }

    /// Resolve a network reference.
    ///
    /// - empty stays empty
    /// - `https://...` is kept verbatim
    /// - a relative path (`projects/p/global/networks/n`) is appended to the compute base path
    /// - a bare name becomes `{base}projects/{project}/global/networks/{name}`
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError`] if the expanded URL never stabilizes.
    pub fn resolve(&self, network: &str) -> Result<String, TemplateError> {
        if network.is_empty() {
            return Ok(String::new());
        }
        if network.starts_with("https://") {
            return Ok(network.to_string());
        }

        let template = if network.contains('/') {
            format!("{}{network}", self.compute_base_path)
        } else {
            format!(
                "{}projects/{{{{project}}}}/global/networks/{network}",
                self.compute_base_path
            )
        };

        let vars = HashMap::from([("project".to_string(), self.project.clone())]);
        let url = expand_template(&template, &vars)?;
        Ok(convert_self_link_to_v1(&url))
    }
}
