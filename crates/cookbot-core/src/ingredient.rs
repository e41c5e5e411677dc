//! Ingredient lines as the agents send them, and how they are displayed.
//!
//! Agents return either a bare name (`"garlic"`) or a record with a display
//! amount and an optional unit. Amounts are opaque text: nothing here parses
//! or scales them.

use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Ingredient {
    Name(String),
    Measured {
        name: String,
        #[serde(default, deserialize_with = "scalar_text")]
        amount: String,
        #[serde(
            default,
            deserialize_with = "optional_scalar_text",
            skip_serializing_if = "Option::is_none"
        )]
        unit: Option<String>,
    },
    /// Anything else an agent sends. Kept so one odd entry doesn't sink the
    /// whole reply.
    Raw(serde_json::Value),
}

/// Numbers and booleans become their text; `null` becomes `None`.
fn optional_scalar_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::String(text) => Ok(Some(text)),
        serde_json::Value::Number(n) => Ok(Some(n.to_string())),
        serde_json::Value::Bool(b) => Ok(Some(b.to_string())),
        other => Err(de::Error::custom(format!("expected text, got {}", other))),
    }
}

fn scalar_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_scalar_text(deserializer)?.unwrap_or_default())
}

impl Ingredient {
    pub fn measured(name: &str, amount: &str, unit: Option<&str>) -> Self {
        Ingredient::Measured {
            name: name.to_string(),
            amount: amount.to_string(),
            unit: unit.map(str::to_string),
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Ingredient::Name(name) | Ingredient::Measured { name, .. } => Some(name),
            Ingredient::Raw(_) => None,
        }
    }

    /// Single display line: `"{name} {amount} {unit}"` with empty parts dropped.
    pub fn render(&self) -> String {
        match self {
            Ingredient::Name(name) => name.clone(),
            Ingredient::Measured { name, amount, unit } => {
                [name.as_str(), amount.as_str(), unit.as_deref().unwrap_or("")]
                    .iter()
                    .map(|part| part.trim())
                    .filter(|part| !part.is_empty())
                    .collect::<Vec<_>>()
                    .join(" ")
            }
            Ingredient::Raw(serde_json::Value::String(text)) => text.clone(),
            Ingredient::Raw(value) => value.to_string(),
        }
    }
}

impl From<&str> for Ingredient {
    fn from(name: &str) -> Self {
        Ingredient::Name(name.to_string())
    }
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

pub fn render(ingredient: &Ingredient) -> String {
    ingredient.render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_measured_with_unit() {
        let onion = Ingredient::measured("onion", "2", Some("pcs"));
        assert_eq!(render(&onion), "onion 2 pcs");
    }

    #[test]
    fn test_render_measured_without_unit() {
        let salt = Ingredient::measured("salt", "1 tsp", None);
        assert_eq!(render(&salt), "salt 1 tsp");
    }

    #[test]
    fn test_render_bare_name_is_unchanged() {
        assert_eq!(render(&Ingredient::from("garlic")), "garlic");
    }

    #[test]
    fn test_render_trims_fields() {
        let soy = Ingredient::measured("  soy sauce ", " 2 ", Some(" tbsp "));
        assert_eq!(soy.render(), "soy sauce 2 tbsp");

        let pepper = Ingredient::measured("pepper", "a pinch", Some("   "));
        assert_eq!(pepper.render(), "pepper a pinch");
    }

    #[test]
    fn test_deserialize_mixed_list() {
        let list: Vec<Ingredient> = serde_json::from_value(json!([
            "egg",
            {"name": "flour", "amount": "200", "unit": "g"},
            {"name": "milk", "amount": "1 cup"},
            {"name": "butter"},
            42
        ]))
        .unwrap();

        assert_eq!(list[0], Ingredient::from("egg"));
        assert_eq!(list[1], Ingredient::measured("flour", "200", Some("g")));
        assert_eq!(list[2], Ingredient::measured("milk", "1 cup", None));
        assert_eq!(list[3].render(), "butter");
        assert_eq!(list[4], Ingredient::Raw(json!(42)));
        assert_eq!(list[4].render(), "42");
    }

    #[test]
    fn test_record_with_name_coerces_scalar_fields() {
        let list: Vec<Ingredient> = serde_json::from_value(json!([
            {"name": "egg", "amount": 2},
            {"name": "water", "amount": 1.5, "unit": "l"},
            {"name": "salt", "amount": null, "unit": null},
            {"name": "sugar", "amount": "3", "unit": 100}
        ]))
        .unwrap();

        assert_eq!(list[0], Ingredient::measured("egg", "2", None));
        assert_eq!(list[0].render(), "egg 2");
        assert_eq!(list[1].render(), "water 1.5 l");
        assert_eq!(list[2], Ingredient::measured("salt", "", None));
        assert_eq!(list[2].render(), "salt");
        assert_eq!(list[3].render(), "sugar 3 100");
    }

    #[test]
    fn test_record_with_nested_amount_falls_back_to_raw() {
        let odd: Ingredient =
            serde_json::from_value(json!({"name": "rice", "amount": {"cups": 2}})).unwrap();
        assert!(matches!(odd, Ingredient::Raw(_)));
    }

    #[test]
    fn test_record_without_name_falls_back_to_raw() {
        let odd: Ingredient = serde_json::from_value(json!({"item": "rice"})).unwrap();
        assert_eq!(odd.name(), None);
        assert_eq!(odd.render(), r#"{"item":"rice"}"#);
    }
}
