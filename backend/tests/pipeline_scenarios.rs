use serde_json::json;
use veplot::models::{
    EligibilityPolicy, Payload, PlotOptions, SnapshotRecord, VariableCatalog, VariableSpec,
};
use veplot::services::{merge_snapshots, GapTrimmer, SeriesExtractor};
use veplot::{PipelineError, RenderPlanBuilder};

fn voltage_catalog() -> VariableCatalog {
    VariableCatalog::new(vec![VariableSpec::new("V", "battery voltage")
        .with_unit("V")
        .with_scale(0.001)])
}

fn payload(value: serde_json::Value) -> Payload {
    serde_json::from_value(value).unwrap()
}

fn points(output: &veplot::models::RenderOutput, code: &str) -> Vec<(i64, f64)> {
    output
        .plan(code)
        .map(|p| p.series.iter().map(|pt| (pt.t, pt.value)).collect())
        .unwrap_or_default()
}

#[test]
fn test_carry_forward_with_scale() {
    let catalog = voltage_catalog();
    let input = payload(json!({"d": [
        {"_t": 0, "V": 12500},
        {"_t": 1000, "V": 12600},
        {"_t": 2000}
    ]}));

    let output = RenderPlanBuilder::new(&catalog).build_payload(&input).unwrap();
    let series = points(&output, "V");

    let expected = [(0, 12.5), (1000, 12.6), (2000, 12.6)];
    assert_eq!(series.len(), expected.len());
    for ((t, v), (et, ev)) in series.iter().zip(expected) {
        assert_eq!(*t, et);
        assert!((v - ev).abs() < 1e-9, "{} != {}", v, ev);
    }
}

#[test]
fn test_gap_trim_keeps_latest_run() {
    let catalog = VariableCatalog::new(vec![VariableSpec::new("P", "power")]);
    let input = payload(json!({"d": [
        {"_t": 0, "P": 1},
        {"_t": 100000, "P": 2},
        {"_t": 200000, "P": 3}
    ]}));

    let output = RenderPlanBuilder::new(&catalog)
        .with_options(PlotOptions::new().with_maxgap(50_000))
        .build_payload(&input)
        .unwrap();

    assert_eq!(points(&output, "P"), vec![(200_000, 3.0)]);
    let hints = &output.plan("P").unwrap().axis_hints;
    assert_eq!(hints.min_x, 200_000);
    assert_eq!(hints.max_x, 200_000);
    assert_eq!(output.bounds.min, 0);
}

#[test]
fn test_window_filter() {
    let catalog = VariableCatalog::new(vec![VariableSpec::new("P", "power")]);
    let records: Vec<_> = [0, 1000, 2000, 3000]
        .iter()
        .map(|&t| SnapshotRecord::new(t).with("P", t as f64))
        .collect();

    let output = RenderPlanBuilder::new(&catalog)
        .with_options(PlotOptions::new().with_window(Some(1000), Some(2000)))
        .build(&records)
        .unwrap();

    let ts: Vec<_> = points(&output, "P").into_iter().map(|(t, _)| t).collect();
    assert_eq!(ts, vec![1000, 2000]);
    // Axis bounds stay dataset-wide.
    assert_eq!(output.plan("P").unwrap().axis_hints.max_x, 3000);
}

#[test]
fn test_absent_from_first_record_is_dropped() {
    let catalog = voltage_catalog();
    let input = payload(json!({"d": [{"_t": 0}, {"_t": 1000, "V": 5}]}));

    let output = RenderPlanBuilder::new(&catalog).build_payload(&input).unwrap();
    assert!(output.plans.is_empty());
    assert!(output.failures.is_empty());

    let output = RenderPlanBuilder::new(&catalog)
        .with_options(PlotOptions::new().with_eligibility(EligibilityPolicy::AnySnapshot))
        .build_payload(&input)
        .unwrap();
    assert_eq!(output.codes(), vec!["V"]);
}

#[test]
fn test_ve_direct_catalog_end_to_end() {
    let catalog = VariableCatalog::ve_direct();
    let input = Payload::from_json_str(
        r#"{"d": [
            {"_t": 1700000000000, "V": "12840", "I": "-1500", "PPV": 0, "battery temperature": 29815},
            {"_t": 1700000060000, "V": "12850", "PPV": 12},
            {"_t": 1700000120000, "I": "200", "LOAD": "ON"}
        ]}"#,
    )
    .unwrap();

    let output = RenderPlanBuilder::new(&catalog).build_payload(&input).unwrap();
    assert_eq!(
        output.codes(),
        vec!["V", "PPV", "I", "battery temperature"]
    );

    let temperature = output.plan("battery temperature").unwrap();
    assert_eq!(temperature.label, "battery temperature (°C)");
    let labels = temperature.axis_hints.range_labels.clone().unwrap();
    assert_eq!(labels, ["25".to_string(), "25".to_string(), "25".to_string()]);

    let current = output.plan("I").unwrap();
    let summary = current.summary.unwrap();
    assert_eq!(summary.min, -1.5);
    assert_eq!(summary.max, 0.2);
    assert_eq!(summary.last, 0.2);
    assert_eq!(
        current.axis_hints.left_label,
        "2023-11-14 22:13:20 UTC"
    );
    assert_eq!(
        current.axis_hints.right_label,
        "2023-11-14 22:15:20 UTC"
    );
}

#[test]
fn test_plotvars_keep_catalog_order() {
    let catalog = VariableCatalog::ve_direct();
    let records = vec![SnapshotRecord::new(0)
        .with("P", 10.0)
        .with("V", 12000.0)
        .with("T", 20.0)];

    let output = RenderPlanBuilder::new(&catalog)
        .with_options(PlotOptions::new().with_plotvars(["P", "V"]))
        .build(&records)
        .unwrap();
    assert_eq!(output.codes(), vec!["V", "P"]);
}

#[test]
fn test_repeated_runs_are_identical() {
    let catalog = VariableCatalog::ve_direct();
    let records: Vec<_> = (0..50)
        .map(|i| {
            let record = SnapshotRecord::new(i * 1000);
            if i % 7 == 0 {
                record.with("V", 12000.0 + i as f64)
            } else {
                record.with("P", i as f64)
            }
        })
        .collect();
    let builder = RenderPlanBuilder::new(&catalog)
        .with_options(PlotOptions::new().with_maxgap(5000).with_window(Some(3000), None));

    let first = builder.build(&records).unwrap();
    let second = builder.build(&records).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_whole_input_errors() {
    let catalog = VariableCatalog::ve_direct();
    let builder = RenderPlanBuilder::new(&catalog);

    let err = builder.build_payload(&Payload::default()).unwrap_err();
    assert!(matches!(err, PipelineError::EmptyInput { .. }));

    let err = builder
        .build_payload(&payload(json!({"d": [{"_t": 0, "V": 1}, {"V": 2}]})))
        .unwrap_err();
    assert_eq!(err, PipelineError::MissingTimestamp { index: 1 });

    let err = builder
        .build_payload(&payload(json!({"d": [{"_t": "soon"}]})))
        .unwrap_err();
    assert!(matches!(err, PipelineError::InvalidTimestamp { index: 0, .. }));

    let err = RenderPlanBuilder::new(&catalog)
        .with_options(PlotOptions::new().with_maxgap(-1))
        .build(&[SnapshotRecord::new(0)])
        .unwrap_err();
    assert_eq!(err, PipelineError::InvalidMaxGap { maxgap: -1 });
}

#[test]
fn test_stages_compose_by_hand() {
    let records = vec![
        SnapshotRecord::new(0).with("V", 1.0),
        SnapshotRecord::new(10).with("V", 2.0),
        SnapshotRecord::new(500),
        SnapshotRecord::new(510).with("V", 4.0),
    ];
    let merged = merge_snapshots(&records).unwrap();
    let series = SeriesExtractor::new(&merged).extract("V");
    assert_eq!(series.len(), 4);

    let trimmed = GapTrimmer::new(Some(100)).unwrap().trim(series);
    let ts: Vec<_> = trimmed.iter().map(|p| p.t).collect();
    assert_eq!(ts, vec![500, 510]);
    assert_eq!(trimmed.first().unwrap().value, 2.0);
}
