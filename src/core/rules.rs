use regex::Regex;
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::utils::error::{AdminError, Result};

/// 在轉型之前套用於儲存格文字的轉換規則
#[derive(Debug, Clone)]
pub enum TransformRule {
    /// `search|replacement`，只取代第一次出現
    ReplaceText {
        search: String,
        replacement: String,
    },
    /// `pattern|replacement`，只取代第一個符合的片段
    RegexReplace {
        pattern: Regex,
        replacement: String,
    },
    Trim,
    Uppercase,
    Lowercase,
    StripPrefix(String),
    StripSuffix(String),
}

impl TransformRule {
    pub fn parse(name: &str, value: &str) -> Result<Self> {
        let rule = match name {
            "replace_text" => {
                let (search, replacement) = split_pair(name, value, false)?;
                TransformRule::ReplaceText {
                    search: search.to_string(),
                    replacement: replacement.to_string(),
                }
            }
            "regex_replace" => {
                // 以最後一個 `|` 分割，讓 pattern 可以使用 alternation
                let (pattern, replacement) = split_pair(name, value, true)?;
                let pattern =
                    Regex::new(pattern).map_err(|e| AdminError::InvalidConfigValueError {
                        field: name.to_string(),
                        value: value.to_string(),
                        reason: format!("invalid regex: {}", e),
                    })?;
                TransformRule::RegexReplace {
                    pattern,
                    replacement: replacement.to_string(),
                }
            }
            "trim" => TransformRule::Trim,
            "uppercase" => TransformRule::Uppercase,
            "lowercase" => TransformRule::Lowercase,
            "strip_prefix" => TransformRule::StripPrefix(value.to_string()),
            "strip_suffix" => TransformRule::StripSuffix(value.to_string()),
            other => {
                return Err(AdminError::InvalidConfigValueError {
                    field: "transformation_rules".to_string(),
                    value: other.to_string(),
                    reason: "unknown transformation rule".to_string(),
                })
            }
        };
        Ok(rule)
    }

    pub fn name(&self) -> &'static str {
        match self {
            TransformRule::ReplaceText { .. } => "replace_text",
            TransformRule::RegexReplace { .. } => "regex_replace",
            TransformRule::Trim => "trim",
            TransformRule::Uppercase => "uppercase",
            TransformRule::Lowercase => "lowercase",
            TransformRule::StripPrefix(_) => "strip_prefix",
            TransformRule::StripSuffix(_) => "strip_suffix",
        }
    }

    /// 還原成持久化時的規則值
    pub fn value(&self) -> String {
        match self {
            TransformRule::ReplaceText {
                search,
                replacement,
            } => format!("{}|{}", search, replacement),
            TransformRule::RegexReplace {
                pattern,
                replacement,
            } => format!("{}|{}", pattern.as_str(), replacement),
            TransformRule::Trim | TransformRule::Uppercase | TransformRule::Lowercase => {
                String::new()
            }
            TransformRule::StripPrefix(s) | TransformRule::StripSuffix(s) => s.clone(),
        }
    }

    pub fn apply(&self, input: &str) -> String {
        match self {
            TransformRule::ReplaceText {
                search,
                replacement,
            } => {
                if search.is_empty() {
                    input.to_string()
                } else {
                    input.replacen(search.as_str(), replacement, 1)
                }
            }
            TransformRule::RegexReplace {
                pattern,
                replacement,
            } => pattern.replace(input, replacement.as_str()).into_owned(),
            TransformRule::Trim => input.trim().to_string(),
            TransformRule::Uppercase => input.to_uppercase(),
            TransformRule::Lowercase => input.to_lowercase(),
            TransformRule::StripPrefix(prefix) => {
                input.strip_prefix(prefix.as_str()).unwrap_or(input).to_string()
            }
            TransformRule::StripSuffix(suffix) => {
                input.strip_suffix(suffix.as_str()).unwrap_or(input).to_string()
            }
        }
    }
}

fn split_pair<'a>(name: &str, value: &'a str, from_end: bool) -> Result<(&'a str, &'a str)> {
    let pair = if from_end {
        value.rsplit_once('|')
    } else {
        value.split_once('|')
    };
    pair.ok_or_else(|| AdminError::InvalidConfigValueError {
        field: name.to_string(),
        value: value.to_string(),
        reason: "expected 'search|replacement'".to_string(),
    })
}

/// 依宣告順序保存的轉換規則；持久化格式為 名稱 → 值 的 map
#[derive(Debug, Clone, Default)]
pub struct TransformationRules(Vec<TransformRule>);

impl TransformationRules {
    pub fn new(rules: Vec<TransformRule>) -> Self {
        Self(rules)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TransformRule> {
        self.0.iter()
    }

    pub fn apply(&self, input: &str) -> String {
        self.0
            .iter()
            .fold(input.to_string(), |acc, rule| rule.apply(&acc))
    }
}

impl Serialize for TransformationRules {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for rule in &self.0 {
            map.serialize_entry(rule.name(), &rule.value())?;
        }
        map.end()
    }
}

struct RulesVisitor;

impl<'de> Visitor<'de> for RulesVisitor {
    type Value = TransformationRules;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of transformation rule names to values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<Self::Value, A::Error> {
        let mut rules = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((name, value)) = access.next_entry::<String, String>()? {
            let rule = TransformRule::parse(&name, &value).map_err(de::Error::custom)?;
            rules.push(rule);
        }
        Ok(TransformationRules(rules))
    }
}

impl<'de> Deserialize<'de> for TransformationRules {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(RulesVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_text_only_first_occurrence() {
        let rule = TransformRule::parse("replace_text", ",|.").unwrap();
        assert_eq!(rule.apply("1,234,5"), "1.234,5");
    }

    #[test]
    fn test_replace_text_requires_separator() {
        assert!(TransformRule::parse("replace_text", "no-separator").is_err());
    }

    #[test]
    fn test_unknown_rule_rejected() {
        let err = TransformRule::parse("reverse", "").unwrap_err();
        assert!(err.to_string().contains("unknown transformation rule"));
    }

    #[test]
    fn test_regex_replace() {
        let rule = TransformRule::parse("regex_replace", r"\s*EUR$|").unwrap();
        assert_eq!(rule.apply("19,99 EUR"), "19,99");
        assert!(TransformRule::parse("regex_replace", "(unclosed|x").is_err());

        let alternation = TransformRule::parse("regex_replace", "^(pz|pcs)\\.?\\s*|").unwrap();
        assert_eq!(alternation.apply("pcs. 12"), "12");
    }

    #[test]
    fn test_strip_prefix_and_suffix() {
        let prefix = TransformRule::parse("strip_prefix", "SKU-").unwrap();
        let suffix = TransformRule::parse("strip_suffix", "kg").unwrap();
        assert_eq!(prefix.apply("SKU-0042"), "0042");
        assert_eq!(prefix.apply("0042"), "0042");
        assert_eq!(suffix.apply("2.5kg"), "2.5");
    }

    #[test]
    fn test_rules_keep_declaration_order() {
        // 先轉大寫再取代：順序不同結果就不同
        let rules: TransformationRules = serde_json::from_str(
            r#"{"uppercase": "", "replace_text": "A|b", "trim": ""}"#,
        )
        .unwrap();

        let names: Vec<&str> = rules.iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["uppercase", "replace_text", "trim"]);
        assert_eq!(rules.apply(" aaa "), "bAA");

        let json = serde_json::to_string(&rules).unwrap();
        assert_eq!(json, r#"{"uppercase":"","replace_text":"A|b","trim":""}"#);
    }

    #[test]
    fn test_rules_from_toml_table() {
        #[derive(Deserialize)]
        struct Holder {
            rules: TransformationRules,
        }

        let holder: Holder = toml::from_str(
            r#"
[rules]
strip_suffix = " EUR"
replace_text = ",|."
"#,
        )
        .unwrap();
        assert_eq!(holder.rules.len(), 2);
        assert_eq!(holder.rules.apply("19,99 EUR"), "19.99");
    }
}
