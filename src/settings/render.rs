//! Markup for field controls
//!
//! One render function per field type. Every value interpolated into
//! markup goes through [`escape`].

use super::types::{FieldSpec, FieldType};
use serde_json::Value;

/// Everything a field renderer needs
pub struct FieldContext<'a> {
    /// Submission key, e.g. `voicewp_settings[apiKey]`
    pub input_name: String,
    pub value: Option<&'a Value>,
    pub spec: &'a FieldSpec,
}

/// Render a field control for its type
pub fn render(ty: &FieldType, ctx: &FieldContext<'_>) -> String {
    match ty {
        FieldType::Text | FieldType::Other(_) => render_text(ctx),
    }
}

fn render_text(ctx: &FieldContext<'_>) -> String {
    let name = escape(&ctx.input_name);
    let mut html = format!(
        r#"<input type="text" name="{name}" id="{name}" value="{}" />"#,
        escape(&display_value(ctx.value))
    );
    if let Some(description) = ctx.spec.description() {
        html.push_str(&description_line(description));
    }
    html
}

fn description_line(description: &str) -> String {
    format!(r#"<p class="description">{}</p>"#, escape(description))
}

/// Stored value as it appears in a form control
pub fn display_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(true)) => "1".to_string(),
        Some(Value::Bool(false)) => String::new(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => other.to_string(),
    }
}

/// Escape text for HTML element content and quoted attribute values
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_escape() {
        assert_eq!(escape("plain"), "plain");
        assert_eq!(
            escape(r#"<b a="1">'&'</b>"#),
            "&lt;b a=&quot;1&quot;&gt;&#039;&amp;&#039;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_display_value() {
        assert_eq!(display_value(None), "");
        assert_eq!(display_value(Some(&Value::Null)), "");
        assert_eq!(display_value(Some(&json!("abc"))), "abc");
        assert_eq!(display_value(Some(&json!(42))), "42");
        assert_eq!(display_value(Some(&json!(true))), "1");
        assert_eq!(display_value(Some(&json!(false))), "");
    }

    #[test]
    fn test_text_without_description() {
        let spec = FieldSpec::new("API Key");
        let value = json!("abc123");
        let ctx = FieldContext {
            input_name: "voicewp_settings[apiKey]".to_string(),
            value: Some(&value),
            spec: &spec,
        };

        assert_eq!(
            render(&FieldType::Text, &ctx),
            r#"<input type="text" name="voicewp_settings[apiKey]" id="voicewp_settings[apiKey]" value="abc123" />"#
        );
    }

    #[test]
    fn test_text_with_description() {
        let spec = FieldSpec::new("B").with_description("desc");
        let ctx = FieldContext {
            input_name: "s[b]".to_string(),
            value: None,
            spec: &spec,
        };

        assert_eq!(
            render(&FieldType::Text, &ctx),
            r#"<input type="text" name="s[b]" id="s[b]" value="" /><p class="description">desc</p>"#
        );
    }

    #[test]
    fn test_unknown_type_renders_as_text() {
        let spec = FieldSpec::new("Choice").with_type("select");
        let ctx = FieldContext {
            input_name: "s[choice]".to_string(),
            value: None,
            spec: &spec,
        };

        let html = render(&spec.field_type(), &ctx);
        assert!(html.starts_with(r#"<input type="text" name="s[choice]""#));
    }
}
