use crate::state::rebound;
use crate::value::Value;
use crate::Reflect;

/// Which leaf conversion a textual form uses. `Display` renders strings
/// bare for human output; `Diagnostic` quotes them unambiguously. The style
/// propagates into nested objects; sequence and map elements always render
/// diagnostically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Display,
    Diagnostic,
}

/// Formats an instance as `ClassName(pos1, pos2, ..., key=val, ...)`,
/// omitting parameters left at their declared default.
///
/// Panics if the signature violates the variadic-slot contract, which is a
/// configuration error rather than a runtime condition.
pub fn render<T: Reflect + ?Sized>(instance: &T, style: Style) -> String {
    let state = rebound(instance);
    render_call(
        T::signature().class_name(),
        &state.args,
        &state.kwargs,
        style,
    )
}

fn render_call(class: &str, args: &[Value], kwargs: &[(String, Value)], style: Style) -> String {
    let mut parts: Vec<String> = args.iter().map(|v| render_value(v, style)).collect();
    parts.extend(
        kwargs
            .iter()
            .map(|(k, v)| format!("{k}={}", render_value(v, style))),
    );
    format!("{class}({})", parts.join(", "))
}

pub fn render_value(value: &Value, style: Style) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Int(n) => n.to_string(),
        Value::Float(x) => serde_json::Number::from_f64(*x)
            .map(|n| n.to_string())
            .unwrap_or_else(|| x.to_string()),
        Value::Str(s) => match style {
            Style::Display => s.clone(),
            Style::Diagnostic => serde_json::Value::String(s.clone()).to_string(),
        },
        // a class or callable reference prefers its qualified name in both
        // styles
        Value::Symbol(name) => name.clone(),
        Value::Seq(items) => {
            let parts: Vec<String> = items
                .iter()
                .map(|v| render_value(v, Style::Diagnostic))
                .collect();
            format!("[{}]", parts.join(", "))
        }
        Value::Map(entries) => {
            let parts: Vec<String> = entries
                .iter()
                .map(|(k, v)| {
                    format!(
                        "{}: {}",
                        serde_json::Value::String(k.clone()),
                        render_value(v, Style::Diagnostic)
                    )
                })
                .collect();
            format!("{{{}}}", parts.join(", "))
        }
        Value::Object {
            class,
            args,
            kwargs,
        } => render_call(class, args, kwargs, style),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaf_styles_differ_on_strings_only() {
        let value = Value::Str("A".into());
        assert_eq!(render_value(&value, Style::Display), "A");
        assert_eq!(render_value(&value, Style::Diagnostic), "\"A\"");
        assert_eq!(render_value(&Value::Int(5), Style::Display), "5");
        assert_eq!(render_value(&Value::Float(2.0), Style::Diagnostic), "2.0");
    }

    #[test]
    fn sequences_always_render_diagnostically() {
        let value = Value::Seq(vec![Value::Str("A".into()), Value::Int(3)]);
        assert_eq!(render_value(&value, Style::Display), "[\"A\", 3]");
        assert_eq!(render_value(&value, Style::Diagnostic), "[\"A\", 3]");
    }

    #[test]
    fn symbols_render_bare() {
        assert_eq!(render_value(&Value::Symbol("dir".into()), Style::Diagnostic), "dir");
    }

    #[test]
    fn nested_objects_inherit_the_style() {
        let value = Value::Object {
            class: "Inner".into(),
            args: vec![Value::Str("x".into())],
            kwargs: vec![("k".into(), Value::Int(1))],
        };
        assert_eq!(render_value(&value, Style::Display), "Inner(x, k=1)");
        assert_eq!(render_value(&value, Style::Diagnostic), "Inner(\"x\", k=1)");
    }
}
