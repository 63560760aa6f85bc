//! End-to-end tests of the template → ingestion → rolling store pipeline.

use serialvis_rs::{
    config::AppConfig, ingest::IngestPipeline, template::MatchOutcome, template::Template,
    PlotterError,
};

fn pipeline(format: &str, max_points: usize) -> IngestPipeline {
    let config = AppConfig {
        max_points,
        ..AppConfig::default()
    };
    IngestPipeline::new(Template::compile(format).unwrap(), &config)
}

#[test]
fn matched_and_garbage_lines_keep_series_aligned() {
    let mut p = pipeline("Temp: ${temp}, Hum: ${humidity}", 500);

    p.ingest_line("Temp: 23.50, Hum: 61.10", 0.1);
    p.ingest_line("garbage", 0.2);
    p.ingest_line("Temp: 24.00, Hum: 60.00", 0.3);

    let store = p.store();
    assert_eq!(store.len(), 3);
    for series in store.series() {
        assert_eq!(series.len(), 3);
    }

    let temp: Vec<f64> = store.series()[0].values().collect();
    assert_eq!(temp[0], 23.50);
    assert!(temp[1].is_nan());
    assert_eq!(temp[2], 24.00);

    let hum: Vec<f64> = store.series()[1].values().collect();
    assert_eq!(hum[0], 61.10);
    assert!(hum[1].is_nan());
    assert_eq!(hum[2], 60.00);
}

#[test]
fn rolling_window_retains_most_recent_samples() {
    let mut p = pipeline("v=${v}", 3);
    for v in [1, 2, 3, 4, 5] {
        p.ingest_line(&format!("v={v}"), v as f64);
    }
    let values: Vec<f64> = p.store().series()[0].values().collect();
    assert_eq!(values, vec![3.0, 4.0, 5.0]);
    assert_eq!(p.store().len(), 3);
}

#[test]
fn clear_then_ingest_without_recompilation() {
    let mut p = pipeline("v=${v}", 10);
    p.ingest_line("v=1.0", 0.1);
    p.clear();
    assert_eq!(p.store().len(), 0);
    assert_eq!(p.log().len(), 0);

    p.ingest_line("v=2.0", 0.2);
    let values: Vec<f64> = p.store().series()[0].values().collect();
    assert_eq!(values, vec![2.0]);
}

#[test]
fn zero_placeholder_formats_are_rejected() {
    for format in ["", "plain text", "$ {not_a_placeholder}", "${}"] {
        assert!(
            matches!(Template::compile(format), Err(PlotterError::EmptyTemplate)),
            "format {format:?} should be rejected"
        );
    }
}

#[test]
fn log_is_bounded_independently_of_plot() {
    let config = AppConfig {
        max_points: 500,
        max_log_lines: 5,
        ..AppConfig::default()
    };
    let mut p = IngestPipeline::new(Template::compile("v=${v}").unwrap(), &config);
    for i in 0..20 {
        p.ingest_line(&format!("v={i}"), i as f64);
    }
    assert_eq!(p.log().len(), 5);
    assert_eq!(p.store().len(), 20);
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    /// A literal fragment that cannot be confused with a number or a
    /// placeholder. Includes regex metacharacters on purpose.
    fn fragment() -> impl Strategy<Value = String> {
        "[A-Za-z :,()#*+?^|]{1,6}"
    }

    fn unique_names() -> impl Strategy<Value = Vec<String>> {
        proptest::collection::hash_set("[a-z][a-z0-9_]{0,5}", 1..4)
            .prop_map(|set| set.into_iter().collect())
    }

    proptest! {
        /// Compiling a format and matching a line generated by substituting
        /// numeric strings reproduces exactly those values.
        #[test]
        fn substituted_lines_roundtrip(
            names in unique_names(),
            fragments in proptest::collection::vec(fragment(), 4),
            tail in fragment(),
            raw_values in proptest::collection::vec(-1000.0f64..1000.0, 4),
        ) {
            let mut format = String::new();
            let mut line = String::new();
            let mut expected = Vec::new();

            for (i, name) in names.iter().enumerate() {
                let frag = &fragments[i % fragments.len()];
                let text = format!("{:.2}", raw_values[i % raw_values.len()]);

                format.push_str(frag);
                format.push_str(&format!("${{{name}}}"));
                line.push_str(frag);
                line.push_str(&text);
                expected.push(text.parse::<f64>().unwrap());
            }
            format.push_str(&tail);
            line.push_str(&tail);

            let template = Template::compile(&format).unwrap();
            prop_assert_eq!(template.placeholders(), names.as_slice());
            match template.match_line(&line) {
                MatchOutcome::Values(values) => prop_assert_eq!(values, expected),
                other => prop_assert!(false, "expected values, got {:?}", other),
            }
        }

        /// Ingesting any mix of matching and garbage lines never breaks the
        /// equal-length invariant between the axis and every series.
        #[test]
        fn series_lengths_always_equal(
            lines in proptest::collection::vec(
                prop_oneof![
                    Just("v=1.5".to_string()),
                    Just("nonsense".to_string()),
                    "[a-z ]{0,10}",
                ],
                1..50,
            ),
        ) {
            let mut p = pipeline("v=${v}", 16);
            for (i, text) in lines.iter().enumerate() {
                p.ingest_line(text, i as f64);
                prop_assert!(p.store().len() <= 16);
                for series in p.store().series() {
                    prop_assert_eq!(series.len(), p.store().len());
                }
            }
        }
    }
}
