//! Rendering smoke tests: heatmap output files are produced and non-empty.

use tempfile::TempDir;

use roistats::{render, render_pair, AggregationContext, Atlas, HeatmapOptions, MeasurementIndex, RoistatsError};

fn demo_context(scale: f64) -> AggregationContext {
    let atlas = Atlas::new("desikan", 4, "desikan_");
    let measurements = MeasurementIndex::new(&["fa_cort.desikan", "md_cort.desikan", "vol_cort.desikan"])
        .unwrap()
        .with_display_labels(&["FA", "MD", "Volume"])
        .unwrap();
    let mut ctx = AggregationContext::new(atlas, measurements);
    ctx.set_column(0, &[1.0 * scale, -2.0 * scale, 3.5 * scale, 0.0], &[0.01, 0.2, 0.04, 0.9])
        .unwrap();
    ctx.set_column(1, &[-0.5 * scale, 2.2 * scale, -3.9 * scale, 1.1], &[0.6, 0.03, 0.001, 0.5])
        .unwrap();
    ctx.set_column(2, &[0.2, 0.4, -0.1, 2.8 * scale], &[0.8, 0.7, 0.9, 0.02])
        .unwrap();
    ctx
}

#[test]
fn a_single_panel_heatmap_is_rendered() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("heatmap.png");

    let ctx = demo_context(1.0);
    render(&out, &ctx, "exposure one", &HeatmapOptions::default()).unwrap();

    let meta = std::fs::metadata(&out).unwrap();
    assert!(meta.len() > 0);
}

#[test]
fn a_masked_pair_of_panels_is_rendered_with_a_shared_scale() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("heatmaps_masked.png");

    let left = demo_context(1.0);
    let right = demo_context(0.5);
    let opts = HeatmapOptions {
        mask_above: Some(0.05),
        ..HeatmapOptions::default()
    };
    render_pair(&out, &left, &right, ("exposure one", "exposure two"), &opts).unwrap();

    let meta = std::fs::metadata(&out).unwrap();
    assert!(meta.len() > 0);
}

#[test]
fn an_automatic_value_range_covers_both_panels() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("heatmaps_auto.png");

    let left = demo_context(1.0);
    let right = demo_context(2.0);
    assert_eq!((-7.8, 7.8), right.value_range());

    let opts = HeatmapOptions {
        value_range: None,
        ..HeatmapOptions::default()
    };
    render_pair(&out, &left, &right, ("one", "two"), &opts).unwrap();
    assert!(std::fs::metadata(&out).unwrap().len() > 0);
}

#[test]
fn panels_of_different_shapes_are_rejected() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("bad.png");

    let left = demo_context(1.0);
    let atlas = Atlas::new("aseg", 2, "aseg_");
    let measurements = MeasurementIndex::new(&["vol_subcort.aseg"]).unwrap();
    let right = AggregationContext::new(atlas, measurements);

    let res = render_pair(&out, &left, &right, ("a", "b"), &HeatmapOptions::default());
    assert!(matches!(res, Err(RoistatsError::ShapeMismatch(_, _, _))));
    assert!(!out.exists());
}
