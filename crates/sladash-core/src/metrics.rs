#![forbid(unsafe_code)]

//! One-shot governance metrics panel.
//!
//! The panel issues a single request per page load through a
//! [`SummarySource`]. On success each slot gets `value` or `"-"` plus its unit
//! suffix; on any failure the slots keep their server-rendered placeholders.
//! No retry, no timeout, no polling.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | `FetchError::Transport` | Network error, no window | Slots untouched |
//! | `FetchError::Decode` | Body is not JSON | Slots untouched |
//! | `FetchError::Malformed` | JSON is not an object | Slots untouched |
//! | `FetchError::Server` | Payload carries a truthy `error` | Slots untouched |

use std::fmt;
use std::future::Future;

use serde::Deserialize;
use serde_json::Value;

use crate::config::{Anchors, EngineConfig};
use crate::dom::Document;

/// Rendered in place of an absent value.
pub const MISSING: &str = "-";

/// Metrics fetch failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    Transport(String),
    Decode(String),
    Malformed(&'static str),
    Server(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Transport(msg) => write!(f, "transport error: {msg}"),
            FetchError::Decode(msg) => write!(f, "decode error: {msg}"),
            FetchError::Malformed(msg) => write!(f, "malformed payload: {msg}"),
            FetchError::Server(msg) => write!(f, "server reported error: {msg}"),
        }
    }
}

impl std::error::Error for FetchError {}

/// Async transport for the summary endpoint.
pub trait SummarySource {
    /// Fetch the raw response body for `endpoint`.
    fn fetch_summary(&self, endpoint: &str) -> impl Future<Output = Result<String, FetchError>>;
}

/// Display slots, in payload order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricField {
    SlaHealth,
    BreachRate,
    TotalEscalations,
    AvgResolutionTime,
}

impl MetricField {
    pub const ALL: [MetricField; 4] = [
        MetricField::SlaHealth,
        MetricField::BreachRate,
        MetricField::TotalEscalations,
        MetricField::AvgResolutionTime,
    ];

    /// Unit appended after the value (or after the `-` placeholder).
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::BreachRate => "%",
            Self::AvgResolutionTime => "h",
            Self::SlaHealth | Self::TotalEscalations => "",
        }
    }

    fn slot_id(self, anchors: &Anchors) -> &str {
        match self {
            Self::SlaHealth => &anchors.sla_health_id,
            Self::BreachRate => &anchors.breach_rate_id,
            Self::TotalEscalations => &anchors.total_escalations_id,
            Self::AvgResolutionTime => &anchors.avg_resolution_time_id,
        }
    }
}

/// Governance summary payload. Every field may be absent or `null`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MetricsSummary {
    #[serde(default)]
    pub sla_health: Option<Value>,
    #[serde(default)]
    pub breach_rate: Option<Value>,
    #[serde(default)]
    pub total_escalations: Option<Value>,
    #[serde(default)]
    pub avg_resolution_time: Option<Value>,
}

impl MetricsSummary {
    /// Parse a response body, rejecting error payloads.
    pub fn from_json(body: &str) -> Result<Self, FetchError> {
        let value: Value =
            serde_json::from_str(body).map_err(|e| FetchError::Decode(e.to_string()))?;
        let Some(object) = value.as_object() else {
            return Err(FetchError::Malformed("payload is not a JSON object"));
        };
        if let Some(err) = object.get("error").filter(|e| is_truthy(e)) {
            return Err(FetchError::Server(display_value(err)));
        }
        serde_json::from_value(value).map_err(|e| FetchError::Decode(e.to_string()))
    }

    #[must_use]
    pub fn get(&self, field: MetricField) -> Option<&Value> {
        match field {
            MetricField::SlaHealth => self.sla_health.as_ref(),
            MetricField::BreachRate => self.breach_rate.as_ref(),
            MetricField::TotalEscalations => self.total_escalations.as_ref(),
            MetricField::AvgResolutionTime => self.avg_resolution_time.as_ref(),
        }
    }

    /// Text for one slot: present value or `-`, then the unit suffix.
    #[must_use]
    pub fn render(&self, field: MetricField) -> String {
        let value = self
            .get(field)
            .filter(|v| !v.is_null())
            .map_or_else(|| MISSING.to_owned(), display_value);
        format!("{value}{}", field.suffix())
    }
}

/// JavaScript truthiness, as the dashboard backend's `error` flag is read.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Render like a JS template string: whole floats drop their `.0`.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}

/// Metrics container plus whichever of the four display slots exist.
#[derive(Debug, Clone)]
pub struct MetricsPanel<E> {
    endpoint: String,
    slots: Vec<(MetricField, E)>,
}

impl<E> MetricsPanel<E>
where
    E: Clone + PartialEq + std::fmt::Debug,
{
    /// Bind when the metrics container exists.
    pub fn bind<D>(doc: &D, config: &EngineConfig) -> Option<Self>
    where
        D: Document<Element = E>,
    {
        doc.element_by_id(&config.anchors.metrics_container_id)?;
        let slots = MetricField::ALL
            .into_iter()
            .filter_map(|field| {
                doc.element_by_id(field.slot_id(&config.anchors))
                    .map(|el| (field, el))
            })
            .collect::<Vec<_>>();
        tracing::debug!(slots = slots.len(), endpoint = %config.summary_endpoint, "metrics panel bound");
        Some(Self {
            endpoint: config.summary_endpoint.clone(),
            slots,
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch once and render. On error nothing is written and the error is
    /// returned for the host to log.
    pub async fn load<D, S>(&self, doc: &D, source: &S) -> Result<MetricsSummary, FetchError>
    where
        D: Document<Element = E>,
        S: SummarySource,
    {
        let body = source.fetch_summary(&self.endpoint).await?;
        let summary = MetricsSummary::from_json(&body)?;
        self.render(doc, &summary);
        Ok(summary)
    }

    /// [`load`](Self::load) with the failure swallowed and logged.
    pub async fn load_best_effort<D, S>(&self, doc: &D, source: &S)
    where
        D: Document<Element = E>,
        S: SummarySource,
    {
        if let Err(err) = self.load(doc, source).await {
            tracing::debug!(endpoint = %self.endpoint, error = %err, "metrics unavailable, keeping placeholders");
        }
    }

    pub fn render<D>(&self, doc: &D, summary: &MetricsSummary)
    where
        D: Document<Element = E>,
    {
        for (field, el) in &self.slots {
            doc.set_text(el, &summary.render(*field));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn absent_fields_keep_their_suffix() {
        let s = MetricsSummary::from_json(r#"{ "sla_health": "Good", "breach_rate": 4.5 }"#).unwrap();
        assert_eq!(s.render(MetricField::SlaHealth), "Good");
        assert_eq!(s.render(MetricField::BreachRate), "4.5%");
        assert_eq!(s.render(MetricField::TotalEscalations), "-");
        assert_eq!(s.render(MetricField::AvgResolutionTime), "-h");
    }

    #[test]
    fn null_and_integer_values() {
        let s = MetricsSummary::from_json(
            r#"{ "sla_health": null, "total_escalations": 12, "avg_resolution_time": 3.25 }"#,
        )
        .unwrap();
        assert_eq!(s.render(MetricField::SlaHealth), "-");
        assert_eq!(s.render(MetricField::BreachRate), "-%");
        assert_eq!(s.render(MetricField::TotalEscalations), "12");
        assert_eq!(s.render(MetricField::AvgResolutionTime), "3.25h");
    }

    #[test]
    fn whole_floats_render_without_fraction() {
        let s = MetricsSummary::from_json(r#"{ "breach_rate": 100.0, "sla_health": 97.5 }"#).unwrap();
        assert_eq!(s.render(MetricField::BreachRate), "100%");
        assert_eq!(s.render(MetricField::SlaHealth), "97.5");
    }

    #[test]
    fn error_payloads_are_rejected() {
        assert_eq!(
            MetricsSummary::from_json(r#"{ "error": "x" }"#),
            Err(FetchError::Server("x".into()))
        );
        assert!(matches!(
            MetricsSummary::from_json(r#"{ "error": { "code": 500 } }"#),
            Err(FetchError::Server(_))
        ));
    }

    #[test]
    fn falsy_error_flag_is_not_an_error() {
        for body in [
            r#"{ "error": null, "sla_health": "Good" }"#,
            r#"{ "error": false, "sla_health": "Good" }"#,
            r#"{ "error": "", "sla_health": "Good" }"#,
            r#"{ "error": 0, "sla_health": "Good" }"#,
        ] {
            let s = MetricsSummary::from_json(body).unwrap();
            assert_eq!(s.render(MetricField::SlaHealth), "Good");
        }
    }

    #[test]
    fn non_object_and_non_json_bodies_fail() {
        assert!(matches!(
            MetricsSummary::from_json("<html>502</html>"),
            Err(FetchError::Decode(_))
        ));
        assert_eq!(
            MetricsSummary::from_json("null"),
            Err(FetchError::Malformed("payload is not a JSON object"))
        );
        assert!(MetricsSummary::from_json("[1, 2]").is_err());
    }
}
