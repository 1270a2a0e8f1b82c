// Copyright © 2025 reachbook.org
// Licensed under ReachBook License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::HashMap;

use crate::modules::contact::Channel;
use crate::modules::template::render::Renderer;
use crate::modules::template::Template;

fn template(body: &str) -> Template {
    Template {
        id: 1,
        name: "greeting".into(),
        body: body.into(),
        channel: Channel::WhatsApp,
        active: true,
    }
}

fn fields(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn replaces_every_occurrence() {
    let rendered = Renderer::render(
        &template("{{name}}, hello {{name}}! Your code is {{code}}."),
        &fields(&[("name", "Asha"), ("code", "42")]),
    );
    assert_eq!(rendered, "Asha, hello Asha! Your code is 42.");
}

#[test]
fn unmatched_placeholder_renders_bracketed_marker() {
    // Raw {{key}} tokens must never leak to a recipient.
    let rendered = Renderer::render(&template("Hi {{name}}"), &HashMap::new());
    assert_eq!(rendered, "Hi [name]");
    assert!(!rendered.contains("{{"));
}

#[test]
fn replaces_keys_with_nonword_characters() {
    let rendered = Renderer::render(
        &template("Hi {{first-name}} from {{org.unit}}"),
        &fields(&[("first-name", "Asha"), ("org.unit", "Sales")]),
    );
    assert_eq!(rendered, "Hi Asha from Sales");
}

#[test]
fn unknown_nonword_placeholder_never_leaks_raw_syntax() {
    let rendered = Renderer::render(&template("Hi {{first name}}"), &HashMap::new());
    assert_eq!(rendered, "Hi [first name]");
    assert!(!rendered.contains("{{"));
}

#[test]
fn matching_is_case_sensitive() {
    let rendered = Renderer::render(&template("Hi {{Name}}"), &fields(&[("name", "Asha")]));
    assert_eq!(rendered, "Hi [Name]");
}

#[test]
fn tolerates_inner_whitespace() {
    let rendered = Renderer::render(&template("Hi {{ name }}"), &fields(&[("name", "Asha")]));
    assert_eq!(rendered, "Hi Asha");
}

#[test]
fn render_is_idempotent_for_same_inputs() {
    let template = template("Dear {{name}}, see {{offer}}");
    let fields = fields(&[("name", "Asha")]);
    let first = Renderer::render(&template, &fields);
    let second = Renderer::render(&template, &fields);
    assert_eq!(first, second);
    assert_eq!(first, "Dear Asha, see [offer]");
}

#[test]
fn email_html_wrap_escapes_and_breaks_lines() {
    let html = Renderer::into_email_html("1 < 2 & 3\nnew line");
    assert!(html.starts_with("<div"));
    assert!(html.contains("1 &lt; 2 &amp; 3<br/>new line"));
}
