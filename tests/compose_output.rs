//! Snapshot tests for the scripted composition pipeline

use collage_editor::{compose, layout_report, Composition, EditorConfig, Rgba, TemplateRegistry};

#[test]
fn test_template_catalogue() {
    let listing = TemplateRegistry::all()
        .iter()
        .map(|t| format!("{} {} {}", t.name, t.placeholder_count, t.document))
        .collect::<Vec<_>>()
        .join("\n");
    insta::assert_snapshot!(listing, @r"
    full-half-half 3 bundled://full_half_half.toml
    half-half-full 3 bundled://half_half_full.toml
    Christmas 3 bundled://christmas.toml
    Bonjour 3 bundled://bonjour.toml
    Missing You 3 bundled://missing_you.toml
    ");
}

#[test]
fn test_report_after_swap() {
    let composition = Composition::new("full-half-half", ["a.jpg", "b.jpg", "c.jpg"])
        .with_margin(0.0)
        .with_corner_radius(4.0)
        .with_background(Rgba::rgb(0xff, 0x00, 0x00))
        .with_swap(0, 2);
    let editor = compose(&composition, EditorConfig::default()).expect("Should compose");
    let report = layout_report(&editor).expect("Should report");
    insta::assert_snapshot!(report, @r"
    template: full-half-half (session-1)
    background: #ff0000
    0 a.jpg slot=2 x=50.00 y=50.00 w=50.00 h=50.00 r=4.0
    1 b.jpg slot=1 x=0.00 y=50.00 w=50.00 h=50.00 r=4.0
    2 c.jpg slot=0 x=0.00 y=0.00 w=100.00 h=50.00 r=4.0
    ");
}

#[test]
fn test_report_with_margin() {
    let composition =
        Composition::new("half-half-full", ["a.jpg", "b.jpg", "c.jpg"]).with_margin(2.0);
    let editor = compose(&composition, EditorConfig::default()).expect("Should compose");
    let report = layout_report(&editor).expect("Should report");
    // Inset by 1 on each side, then the group contracts by 0.98 about (50, 50)
    insta::assert_snapshot!(report, @r"
    template: half-half-full (session-1)
    background: #ffffff
    0 a.jpg slot=0 x=1.98 y=1.98 w=47.04 h=47.04 r=1.0
    1 b.jpg slot=1 x=1.98 y=50.98 w=96.04 h=47.04 r=1.0
    2 c.jpg slot=2 x=50.98 y=1.98 w=47.04 h=47.04 r=1.0
    ");
}
