// Copyright © 2025 reachbook.org
// Licensed under ReachBook License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use regex::Regex;
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::modules::template::Template;

// Keys are arbitrary non-brace text so the token is always consumed,
// whatever characters the template author used.
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([^{}]+?)\s*\}\}").unwrap());

pub struct Renderer;

impl Renderer {
    /// Substitute every `{{key}}` occurrence with its field value.
    ///
    /// Placeholders with no matching field render as `[key]` so raw template
    /// syntax never reaches a recipient. Replacement is global, case-sensitive
    /// and a pure function of the inputs.
    pub fn render(template: &Template, fields: &HashMap<String, String>) -> String {
        PLACEHOLDER
            .replace_all(&template.body, |captures: &regex::Captures| {
                let key = &captures[1];
                match fields.get(key) {
                    Some(value) => Cow::Owned(value.clone()),
                    None => Cow::Owned(format!("[{}]", key)),
                }
            })
            .into_owned()
    }

    /// Wrap rendered plain text into a minimal styled HTML block for the email
    /// channel. Applied uniformly to every recipient body before dispatch.
    pub fn into_email_html(text: &str) -> String {
        let mut escaped = String::new();
        for ch in text.chars() {
            match ch {
                '&' => escaped.push_str("&amp;"),
                '<' => escaped.push_str("&lt;"),
                '>' => escaped.push_str("&gt;"),
                '\n' => escaped.push_str("<br/>"),
                other => escaped.push(other),
            }
        }
        format!(
            "<div style=\"font-family:sans-serif;white-space:normal;line-height:1.5\">{}</div>",
            escaped
        )
    }
}
