use crate::json::Value;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeMap;

lazy_static! {
    static ref PLACEHOLDER: Regex = Regex::new(r"<([^>]+)>").unwrap();
}

pub type Properties = BTreeMap<String, String>;

/// What happens to a field that references a property the table does not have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingProperty {
    /// The whole field becomes the empty string.
    #[default]
    Blank,
    /// Injection fails with [`InjectError::PropertyNotFound`].
    Fail,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InjectError {
    #[error("Property not found: '{key}'")]
    PropertyNotFound { key: String },
}

/// Substitutes `<key>` placeholders using a flat property table.
#[derive(Debug, Clone, Copy)]
pub struct Injector<'a> {
    properties: &'a Properties,
    policy: MissingProperty,
}

impl<'a> Injector<'a> {
    pub fn new(properties: &'a Properties) -> Self {
        Self {
            properties,
            policy: MissingProperty::default(),
        }
    }

    pub fn with_policy(mut self, policy: MissingProperty) -> Self {
        self.policy = policy;
        self
    }

    /// Replaces every placeholder in `template`.
    ///
    /// The scan moves a cursor over the untouched template and copies into a
    /// fresh buffer, so text that came from a replacement is never scanned again.
    pub fn inject_str(&self, template: &str) -> Result<String, InjectError> {
        let mut output = String::with_capacity(template.len());
        let mut cursor = 0;

        while let Some(captures) = PLACEHOLDER.captures_at(template, cursor) {
            let (Some(span), Some(key)) = (captures.get(0), captures.get(1)) else {
                break;
            };
            match self.properties.get(key.as_str()) {
                Some(replacement) => {
                    output.push_str(&template[cursor..span.start()]);
                    output.push_str(replacement);
                    cursor = span.end();
                }
                None => {
                    return match self.policy {
                        MissingProperty::Blank => Ok(String::new()),
                        MissingProperty::Fail => Err(InjectError::PropertyNotFound {
                            key: key.as_str().to_string(),
                        }),
                    };
                }
            }
        }

        output.push_str(&template[cursor..]);
        Ok(output)
    }

    /// Injects into every string leaf. Object keys are left alone.
    pub fn inject_value(&self, value: &Value) -> Result<Value, InjectError> {
        Ok(match value {
            Value::String(text) => Value::String(self.inject_str(text)?),
            Value::Object(map) => Value::Object(
                map.iter()
                    .map(|(key, child)| {
                        Ok::<_, InjectError>((key.clone(), self.inject_value(child)?))
                    })
                    .collect::<Result<_, InjectError>>()?,
            ),
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .map(|item| self.inject_value(item))
                    .collect::<Result<_, _>>()?,
            ),
            Value::Number(_) | Value::Bool(_) | Value::Null => value.clone(),
        })
    }

    pub fn inject_map(
        &self,
        map: &BTreeMap<String, String>,
    ) -> Result<BTreeMap<String, String>, InjectError> {
        map.iter()
            .map(|(key, template)| {
                Ok::<_, InjectError>((key.clone(), self.inject_str(template)?))
            })
            .collect()
    }
}

/// String injection with the default (blanking) policy.
pub fn inject(template: &str, properties: &Properties) -> String {
    Injector::new(properties)
        .inject_str(template)
        .unwrap_or_default()
}

/// Value injection with the default (blanking) policy.
pub fn inject_value(value: &Value, properties: &Properties) -> Value {
    Injector::new(properties)
        .inject_value(value)
        .unwrap_or_else(|_| value.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json::decode;

    fn props(pairs: &[(&str, &str)]) -> Properties {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_inject_without_placeholders() {
        let empty = Properties::new();
        assert_eq!(inject("/v1/users?sort=asc", &empty), "/v1/users?sort=asc");
        assert_eq!(inject("", &empty), "");
        assert_eq!(inject("a > b", &empty), "a > b");
    }

    #[test]
    fn test_inject_multiple() {
        let properties = props(&[("a", "1"), ("b", "2")]);
        assert_eq!(inject("<a>-<b>", &properties), "1-2");
        assert_eq!(inject("x<a>y<a>z", &properties), "x1y1z");
    }

    #[test]
    fn test_inject_missing_blanks_whole_field() {
        let properties = props(&[("a", "1")]);
        assert_eq!(inject("x<missing>y", &Properties::new()), "");
        assert_eq!(inject("<a>/<missing>", &properties), "");
    }

    #[test]
    fn test_inject_missing_with_fail_policy() {
        let properties = props(&[("a", "1")]);
        let injector = Injector::new(&properties).with_policy(MissingProperty::Fail);
        assert_eq!(
            injector.inject_str("<a>/<nope>"),
            Err(InjectError::PropertyNotFound {
                key: "nope".to_string()
            })
        );
        assert_eq!(injector.inject_str("<a>").unwrap(), "1");
    }

    #[test]
    fn test_replacement_is_not_rescanned() {
        assert_eq!(inject("<a>", &props(&[("a", "<a>")])), "<a>");
        assert_eq!(inject("<a><b>", &props(&[("a", "<b"), ("b", "B")])), "<bB");
        // A replacement that names a missing key does not trigger blanking.
        assert_eq!(inject("<a>!", &props(&[("a", "<zzz>")])), "<zzz>!");
    }

    #[test]
    fn test_placeholder_stops_at_first_close() {
        let properties = props(&[("id", "7")]);
        assert_eq!(inject("<id>>", &properties), "7>");
        assert_eq!(inject("<> <id>", &properties), "<> 7");
    }

    #[test]
    fn test_inject_value_distributes() {
        let properties = props(&[("a", "v")]);
        let body =
            decode(br#"{"k": "<a>", "list": ["<a>", 1, true, null], "deep": {"x": "<a>!"}}"#)
                .unwrap();
        let expected =
            decode(br#"{"k": "v", "list": ["v", 1, true, null], "deep": {"x": "v!"}}"#).unwrap();
        assert_eq!(inject_value(&body, &properties), expected);
    }

    #[test]
    fn test_inject_value_leaves_keys() {
        let properties = props(&[("a", "v")]);
        let body = decode(br#"{"<a>": "<a>"}"#).unwrap();
        assert_eq!(
            inject_value(&body, &properties),
            decode(br#"{"<a>": "v"}"#).unwrap()
        );
    }

    #[test]
    fn test_inject_map() {
        let properties = props(&[("token", "abc")]);
        let headers = props(&[("Authorization", "Bearer <token>"), ("X-Plain", "plain")]);
        let injected = Injector::new(&properties).inject_map(&headers).unwrap();
        assert_eq!(injected["Authorization"], "Bearer abc");
        assert_eq!(injected["X-Plain"], "plain");
    }
}
