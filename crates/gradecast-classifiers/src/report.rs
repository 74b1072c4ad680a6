//! Standalone HTML summary of a training run.
use maud::{html, Markup, PreEscaped, DOCTYPE};

use crate::config::TrainConfig;
use crate::trainer::TrainOutcome;

const STYLE: &str = "
body { font-family: sans-serif; margin: 2em; color: #222; }
h1 { border-bottom: 2px solid #3a6ea5; padding-bottom: 0.3em; }
table { border-collapse: collapse; margin: 1em 0; }
th, td { border: 1px solid #ccc; padding: 4px 10px; text-align: right; }
th:first-child, td:first-child { text-align: left; }
.bar { background-color: #3a6ea5; height: 10px; }
.code-container {
    background-color: #f5f5f5;
    padding: 10px;
    border-radius: 5px;
    overflow-x: auto;
    font-family: monospace;
    white-space: pre-wrap;
}";

fn overview(outcome: &TrainOutcome, config: &TrainConfig) -> Markup {
    let summary = &outcome.summary;
    html! {
        h2 { "Overview" }
        p {
            "Pass/fail classifier trained on " (config.train_data.display())
            ". A student passes when the final grade is at least 10."
        }
        table {
            tr { td { "Model" } td { (outcome.artifact.metadata.model_type) } }
            tr { td { "Rows read" } td { (summary.rows_read) } }
            tr { td { "Rows kept" } td { (summary.rows_kept) } }
            tr { td { "Dropped: missing label" } td { (summary.dropped_missing_label) } }
            tr { td { "Dropped: unmappable category" } td { (summary.dropped_unmappable) } }
            tr { td { "Dropped: missing feature" } td { (summary.dropped_missing_feature) } }
            tr { td { "Training rows" } td { (outcome.n_train) } }
            tr { td { "Evaluation rows" } td { (outcome.n_test) } }
            tr { td { "Split seed" } td { (config.seed) } }
            tr { td { "Created" } td { (outcome.artifact.metadata.created_at) } }
        }
    }
}

fn evaluation(outcome: &TrainOutcome) -> Markup {
    let report = &outcome.evaluation;
    html! {
        h2 { "Evaluation" }
        p { "Accuracy on the held-out rows: " strong { (format!("{:.4}", report.accuracy)) } }
        table {
            tr { th { "" } th { "precision" } th { "recall" } th { "f1-score" } th { "support" } }
            @for (label, m) in report.rows() {
                tr {
                    td { (label) }
                    td { (format!("{:.2}", m.precision)) }
                    td { (format!("{:.2}", m.recall)) }
                    td { (format!("{:.2}", m.f1)) }
                    td { (m.support) }
                }
            }
        }
    }
}

fn importances(outcome: &TrainOutcome) -> Markup {
    let mut ranked = outcome.feature_importances.clone().unwrap_or_default();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    html! {
        @if !ranked.is_empty() {
            h2 { "Feature importances" }
            table {
                tr { th { "feature" } th { "importance" } th { "" } }
                @for (name, value) in &ranked {
                    tr {
                        td { (name) }
                        td { (format!("{:.4}", value)) }
                        td { div class="bar" style=(format!("width: {:.0}px", value * 300.0)) {} }
                    }
                }
            }
        }
    }
}

/// Render the report of a finished training run as a full HTML page.
pub fn render_training_report(outcome: &TrainOutcome, config: &TrainConfig) -> String {
    let config_json = serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("configuration could not be serialized: {}", e));

    let page = html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                title { "gradecast training report" }
                style { (PreEscaped(STYLE)) }
            }
            body {
                h1 { "gradecast training report" }
                (overview(outcome, config))
                (evaluation(outcome))
                (importances(outcome))
                h2 { "Configuration" }
                div class="code-container" {
                    pre { code { (config_json) } }
                }
            }
        }
    };
    page.into_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MaxFeatures, ModelConfig, ModelType};
    use crate::data_handling::{TransformSummary, TransformedData};
    use crate::math::Array2;
    use crate::schema::{self, N_FEATURES};
    use crate::trainer::train;

    #[test]
    fn report_has_all_sections() {
        let mut x = Array2::with_columns(N_FEATURES);
        let mut y = Vec::new();
        for i in 0..30 {
            let mut row = [0.0f32; N_FEATURES];
            row[0] = (i % 20) as f32;
            x.push_row(&row).unwrap();
            y.push(i % 20 >= 10);
        }
        let data = TransformedData {
            x,
            y,
            feature_names: schema::feature_names(),
            summary: TransformSummary {
                rows_read: 32,
                rows_kept: 30,
                dropped_missing_label: 2,
                ..Default::default()
            },
        };
        let config = TrainConfig {
            model: ModelConfig::new(ModelType::RandomForest {
                n_trees: 5,
                max_depth: Some(4),
                min_samples_split: 2,
                min_samples_leaf: 1,
                max_features: MaxFeatures::All,
                seed: 1,
            }),
            ..Default::default()
        };
        let outcome = train(&data, &config).unwrap();
        let html = render_training_report(&outcome, &config);

        assert!(html.starts_with("<!DOCTYPE html>"));
        for needle in [
            "Overview",
            "Evaluation",
            "Feature importances",
            "exercise_grade",
            "weighted avg",
            "Configuration",
            "random_forest",
        ] {
            assert!(html.contains(needle), "missing {}", needle);
        }
    }
}
