//! Turns an `AggregatedSeries` into a renderer-agnostic `ChartModel`.
//!
//! The model holds index-aligned labels and values, the y-axis upper bound and a declarative
//! `StyleDescriptor`. A renderer gets it either directly or as a [`RenderPayload`], which has the
//! `{labels, datasets, options}` shape that chart.js style renderers consume.

use crate::aggregate::{AggregatedSeries, DatePoint};
use crate::model::Amount;
use serde::{Deserialize, Serialize};

/// Added to the largest value so that the highest point sits below the top of the y-axis. It is
/// also the upper bound of an empty chart.
pub const SCALE_MARGIN: i64 = 30;

/// The label of the single dataset in a rendered chart.
pub const DATASET_LABEL: &str = "Total Transaction Amount";

/// Shown instead of a chart when the selected customer has nothing to plot.
pub const NO_DATA_MESSAGE: &str = "No data available for the selected customer.";

/// How the series should be drawn. The pipeline never reads these values; they pass through to
/// the renderer unchanged. Field names serialize to the chart.js dataset keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StyleDescriptor {
    pub background_color: String,
    pub border_color: String,
    pub border_width: f64,
    pub point_background_color: String,
    pub point_border_color: String,
    pub point_hover_background_color: String,
    pub point_hover_border_color: String,
    /// Whether the area under the line is filled with `background_color`.
    pub fill: bool,
    /// Bezier curve tension of the line, `0.0` draws straight segments.
    pub tension: f64,
    pub font: FontDescriptor,
}

impl Default for StyleDescriptor {
    fn default() -> Self {
        Self {
            background_color: BLACK.to_string(),
            border_color: BLACK.to_string(),
            border_width: 1.0,
            point_background_color: BLACK.to_string(),
            point_border_color: WHITE.to_string(),
            point_hover_background_color: WHITE.to_string(),
            point_hover_border_color: BLACK.to_string(),
            fill: false,
            tension: 0.0,
            font: FontDescriptor::default(),
        }
    }
}

const BLACK: &str = "rgba(0, 0, 0, 1)";
const WHITE: &str = "#fff";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FontDescriptor {
    pub family: String,
    pub size: f64,
}

impl Default for FontDescriptor {
    fn default() -> Self {
        Self {
            family: "sans-serif".to_string(),
            size: 12.0,
        }
    }
}

/// The chart for one customer.
///
/// `labels` and `values` always have the same length. When both are empty the model is an empty
/// state: `scale_max` is `SCALE_MARGIN` and nothing should be drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartModel {
    labels: Vec<String>,
    values: Vec<Amount>,
    scale_max: Amount,
    style: StyleDescriptor,
}

impl ChartModel {
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn values(&self) -> &[Amount] {
        &self.values
    }

    pub fn scale_max(&self) -> Amount {
        self.scale_max
    }

    pub fn style(&self) -> &StyleDescriptor {
        &self.style
    }

    /// True when there is nothing to plot and the "no data" state should be shown instead.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Builds the document handed to the rendering collaborator.
    pub fn render_payload(&self) -> RenderPayload {
        RenderPayload {
            labels: self.labels.clone(),
            datasets: vec![Dataset {
                label: DATASET_LABEL.to_string(),
                data: self.values.clone(),
                style: self.style.clone(),
            }],
            options: Options {
                scales: Scales {
                    y: LinearAxis {
                        axis_type: "linear".to_string(),
                        min: Amount::ZERO,
                        max: self.scale_max,
                    },
                },
            },
        }
    }
}

/// Builds the chart model for `series`.
///
/// `scale_max` is the largest value plus `SCALE_MARGIN`, or just `SCALE_MARGIN` when the series is
/// empty. It stops at `Amount::MAX`.
pub fn build(series: &AggregatedSeries, style: &StyleDescriptor) -> ChartModel {
    let labels: Vec<String> = series
        .points()
        .iter()
        .map(|p| p.label().to_string())
        .collect();
    let values: Vec<Amount> = series.points().iter().map(DatePoint::sum).collect();
    let margin = Amount::from(SCALE_MARGIN);
    let scale_max = match values.iter().max() {
        Some(max) => max.saturating_add(margin),
        None => margin,
    };
    ChartModel {
        labels,
        values,
        scale_max,
        style: style.clone(),
    }
}

/// `{ "labels": [...], "datasets": [{ "label", "data", <style> }], "options": {...} }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderPayload {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
    pub options: Options,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub label: String,
    pub data: Vec<Amount>,
    #[serde(flatten)]
    pub style: StyleDescriptor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Options {
    pub scales: Scales,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scales {
    pub y: LinearAxis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearAxis {
    #[serde(rename = "type")]
    pub axis_type: String,
    pub min: Amount,
    pub max: Amount,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::test::scenario_a;
    use serde_json::json;

    #[test]
    fn test_scenario_a_scale() {
        let snapshot = scenario_a();
        let series = aggregate(snapshot.transactions(), 1);
        let model = build(&series, &StyleDescriptor::default());
        assert_eq!(model.labels(), &["2024-01-01", "2024-01-02"]);
        assert_eq!(model.values(), &[Amount::from(70), Amount::from(10)]);
        assert_eq!(model.scale_max(), Amount::from(100));
        assert!(!model.is_empty());
    }

    #[test]
    fn test_empty_series() {
        let model = build(&AggregatedSeries::default(), &StyleDescriptor::default());
        assert!(model.is_empty());
        assert!(model.labels().is_empty());
        assert_eq!(model.scale_max(), Amount::from(SCALE_MARGIN));
    }

    #[test]
    fn test_negative_values() {
        let series: AggregatedSeries = [DatePoint::new("a", -50), DatePoint::new("b", -5)]
            .into_iter()
            .collect();
        let model = build(&series, &StyleDescriptor::default());
        assert_eq!(model.scale_max(), Amount::from(25));
    }

    #[test]
    fn test_scale_max_at_the_top_of_the_range() {
        let series: AggregatedSeries = [DatePoint::new("a", Amount::MAX)].into_iter().collect();
        let model = build(&series, &StyleDescriptor::default());
        assert_eq!(model.scale_max(), Amount::MAX);
        assert_eq!(model.values(), &[Amount::MAX]);
    }

    #[test]
    fn test_style_passes_through() {
        let style = StyleDescriptor {
            border_color: "red".to_string(),
            fill: true,
            ..StyleDescriptor::default()
        };
        let model = build(&AggregatedSeries::default(), &style);
        assert_eq!(model.style(), &style);
    }

    #[test]
    fn test_render_payload_shape() {
        let snapshot = scenario_a();
        let model = build(
            &aggregate(snapshot.transactions(), 1),
            &StyleDescriptor::default(),
        );
        let value = serde_json::to_value(model.render_payload()).unwrap();
        assert_eq!(value["labels"], json!(["2024-01-01", "2024-01-02"]));
        assert_eq!(value["datasets"][0]["label"], json!(DATASET_LABEL));
        assert_eq!(value["datasets"][0]["data"], json!([70.0, 10.0]));
        assert_eq!(value["datasets"][0]["borderColor"], json!("rgba(0, 0, 0, 1)"));
        assert_eq!(value["datasets"][0]["pointBorderColor"], json!("#fff"));
        assert_eq!(value["datasets"][0]["borderWidth"], json!(1.0));
        assert_eq!(value["options"]["scales"]["y"]["type"], json!("linear"));
        assert_eq!(value["options"]["scales"]["y"]["min"], json!(0.0));
        assert_eq!(value["options"]["scales"]["y"]["max"], json!(100.0));
    }

    #[test]
    fn test_style_deserializes_partially() {
        let style: StyleDescriptor =
            serde_json::from_str(r#"{"borderColor": "blue", "font": {"size": 14}}"#).unwrap();
        assert_eq!(style.border_color, "blue");
        assert_eq!(style.font.size, 14.0);
        assert_eq!(style.font.family, "sans-serif");
        assert_eq!(style.point_border_color, "#fff");
    }
}
