//! Reply parsing.
//!
//! The reply is first read as strict JSON. Providers that ignore the
//! requested schema tend to wrap the object in prose, so on failure the span
//! from the first `{` to the last `}` is tried instead. Either way the result
//! must match [`FinancialAdvice`] and carry a score in 0..=100.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

use super::provider::ResponseSchema;

/// Highest valid financial health score.
pub const MAX_HEALTH_SCORE: u32 = 100;

/// Parsed advice as returned to views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialAdvice {
    pub recommendations: Vec<Recommendation>,

    #[serde(rename = "financialHealthScore")]
    pub financial_health_score: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub category: AdviceCategory,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub impact: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdviceCategory {
    Budgeting,
    Savings,
    Spending,
    Income,
    Investment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// JSON schema sent to providers that support structured output.
#[must_use]
pub fn advice_schema() -> ResponseSchema {
    let recommendation = serde_json::json!({
        "type": "object",
        "properties": {
            "category": {
                "type": "string",
                "enum": ["budgeting", "savings", "spending", "income", "investment"]
            },
            "title": { "type": "string" },
            "description": { "type": "string" },
            "priority": { "type": "string", "enum": ["high", "medium", "low"] },
            "impact": { "type": "string" }
        },
        "required": ["category", "title", "description", "priority", "impact"],
        "additionalProperties": false
    });

    ResponseSchema {
        name: "financial_advice",
        schema: serde_json::json!({
            "type": "object",
            "properties": {
                "recommendations": { "type": "array", "items": recommendation },
                "financialHealthScore": { "type": "integer" }
            },
            "required": ["recommendations", "financialHealthScore"],
            "additionalProperties": false
        }),
    }
}

/// Parse a completion reply into advice.
///
/// # Errors
///
/// Returns `Error::Parse` if no JSON object is recoverable, it does not
/// match the advice shape, or the score is out of range.
pub fn parse_advice(reply: &str) -> Result<FinancialAdvice> {
    let advice = match serde_json::from_str::<FinancialAdvice>(reply.trim()) {
        Ok(advice) => advice,
        Err(_) => {
            let span = json_object_span(reply).ok_or_else(|| Error::Parse {
                reason: "no JSON object in reply".to_string(),
            })?;
            serde_json::from_str(span).map_err(|e| Error::Parse {
                reason: e.to_string(),
            })?
        }
    };

    if advice.financial_health_score > MAX_HEALTH_SCORE {
        return Err(Error::Parse {
            reason: format!(
                "financialHealthScore {} exceeds {MAX_HEALTH_SCORE}",
                advice.financial_health_score
            ),
        });
    }

    Ok(advice)
}

/// Greedy `{ ... }` span: first opening brace to last closing brace.
fn json_object_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"{
        "recommendations": [
            {
                "category": "savings",
                "title": "Build a tax reserve",
                "description": "Move 25% of each invoice into a separate account.",
                "priority": "high",
                "impact": "Avoids a cash crunch at filing time"
            }
        ],
        "financialHealthScore": 72
    }"#;

    #[test]
    fn test_parse_strict_reply() {
        let advice = parse_advice(FULL).unwrap();
        assert_eq!(advice.financial_health_score, 72);
        assert_eq!(advice.recommendations.len(), 1);
        assert_eq!(advice.recommendations[0].category, AdviceCategory::Savings);
        assert_eq!(advice.recommendations[0].priority, Priority::High);
    }

    #[test]
    fn test_parse_wrapped_reply() {
        let advice =
            parse_advice(r#"Here you go: {"recommendations":[],"financialHealthScore":80} thanks"#)
                .unwrap();
        assert!(advice.recommendations.is_empty());
        assert_eq!(advice.financial_health_score, 80);
    }

    #[test]
    fn test_parse_fenced_reply() {
        let reply = format!("```json\n{FULL}\n```");
        assert!(parse_advice(&reply).is_ok());
    }

    #[test]
    fn test_no_object_is_parse_error() {
        let err = parse_advice("I cannot help with that.").unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
        assert_eq!(err.to_string(), "Failed to parse AI response");
    }

    #[test]
    fn test_shape_mismatch_is_parse_error() {
        let err = parse_advice(r#"{"advice": "spend less"}"#).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));

        let err = parse_advice(
            r#"{"recommendations":[{"category":"crypto","title":"t","description":"d","priority":"high","impact":"i"}],"financialHealthScore":50}"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn test_score_out_of_range() {
        let err = parse_advice(r#"{"recommendations":[],"financialHealthScore":150}"#).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));

        let err = parse_advice(r#"{"recommendations":[],"financialHealthScore":-1}"#).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn test_serializes_with_camel_case_score() {
        let advice = parse_advice(r#"{"recommendations":[],"financialHealthScore":80}"#).unwrap();
        let json = serde_json::to_value(&advice).unwrap();
        assert_eq!(json, serde_json::json!({"recommendations": [], "financialHealthScore": 80}));
    }

    #[test]
    fn test_schema_requires_both_fields() {
        let schema = advice_schema();
        assert_eq!(schema.name, "financial_advice");
        assert_eq!(
            schema.schema["required"],
            serde_json::json!(["recommendations", "financialHealthScore"])
        );
    }
}
