//! Outreach message templates.
//!
//! Placeholders use double braces: `{{username}}`, `{{product_name}}`,
//! `{{product_url}}`, `{{subreddit}}`. Whitespace inside the braces is
//! ignored. Unknown placeholders are copied through untouched.

use std::collections::HashMap;

/// Values substituted into a template
#[derive(Debug, Clone, Default)]
pub struct TemplateVars<'a> {
    values: HashMap<&'static str, &'a str>,
}

impl<'a> TemplateVars<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn username(mut self, value: &'a str) -> Self {
        self.values.insert("username", value);
        self
    }

    pub fn product_name(mut self, value: &'a str) -> Self {
        self.values.insert("product_name", value);
        self
    }

    pub fn product_url(mut self, value: &'a str) -> Self {
        self.values.insert("product_url", value);
        self
    }

    pub fn subreddit(mut self, value: &'a str) -> Self {
        self.values.insert("subreddit", value);
        self
    }

    fn get(&self, key: &str) -> Option<&'a str> {
        self.values.get(key).copied()
    }
}

/// Render `template` with `vars`
pub fn render_template(template: &str, vars: &TemplateVars<'_>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];

        match after_open.find("}}") {
            Some(end) => {
                let key = after_open[..end].trim();
                match vars.get(key) {
                    Some(value) => out.push_str(value),
                    None => out.push_str(&rest[start..start + 2 + end + 2]),
                }
                rest = &after_open[end + 2..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_known_placeholders() {
        let vars = TemplateVars::new()
            .username("spez")
            .product_name("Acme")
            .product_url("https://acme.dev");
        let rendered = render_template(
            "Hi {{username}}, try {{ product_name }} at {{product_url}}!",
            &vars,
        );
        assert_eq!(rendered, "Hi spez, try Acme at https://acme.dev!");
    }

    #[test]
    fn test_unknown_placeholder_untouched() {
        let vars = TemplateVars::new().username("spez");
        assert_eq!(
            render_template("{{greeting}} {{username}}", &vars),
            "{{greeting}} spez"
        );
    }

    #[test]
    fn test_unclosed_braces() {
        let vars = TemplateVars::new().username("spez");
        assert_eq!(render_template("Hi {{username", &vars), "Hi {{username");
        assert_eq!(render_template("no placeholders", &vars), "no placeholders");
    }

    #[test]
    fn test_repeated_placeholder() {
        let vars = TemplateVars::new().subreddit("SaaS");
        assert_eq!(
            render_template("r/{{subreddit}} and r/{{subreddit}}", &vars),
            "r/SaaS and r/SaaS"
        );
    }
}
