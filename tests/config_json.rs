use pflotran_mesh::convert::{ConvertOptions, Dimension, OutputFormat};
use pflotran_mesh::io::integral_flux::{FluxOption, IntegralFluxOptions, SurfaceEncoding};
use pflotran_mesh::topology::orientation::ReorientOptions;

#[test]
fn partial_convert_options_fill_in_defaults() {
    let options: ConvertOptions =
        serde_json::from_str(r#"{"dimension":"Auto","format":"Binary"}"#).expect("parse");
    assert_eq!(options.dimension, Dimension::Auto);
    assert_eq!(options.format, OutputFormat::Binary);
    assert!(options.reorient);
    assert_eq!(options.reorient_options, ReorientOptions::default());
}

#[test]
fn reorient_tuning_from_json() {
    let options: ConvertOptions =
        serde_json::from_str(r#"{"reorient":false,"reorient_options":{"max_iterations":8}}"#)
            .expect("parse");
    assert!(!options.reorient);
    assert_eq!(options.reorient_options.max_iterations, 8);
    assert_eq!(
        options.reorient_options.coplanar_tolerance,
        ReorientOptions::default().coplanar_tolerance
    );
}

#[test]
fn convert_options_round_trip() {
    let options = ConvertOptions {
        dimension: Dimension::Two,
        reorient: false,
        reorient_options: ReorientOptions {
            coplanar_tolerance: 1e-6,
            max_iterations: 128,
        },
        format: OutputFormat::Binary,
    };
    let json = serde_json::to_string(&options).expect("serialize");
    let back: ConvertOptions = serde_json::from_str(&json).expect("parse");
    assert_eq!(back, options);
}

#[test]
fn integral_flux_options_from_json() {
    let options: IntegralFluxOptions = serde_json::from_str(
        r#"{"encoding":"CellIds","flux_option":"Absolute","invert_direction":true}"#,
    )
    .expect("parse");
    assert_eq!(options.encoding, SurfaceEncoding::CellIds);
    assert_eq!(options.flux_option, FluxOption::Absolute);
    assert!(options.invert_direction);

    let defaults: IntegralFluxOptions = serde_json::from_str("{}").expect("parse");
    assert_eq!(defaults, IntegralFluxOptions::default());
}

#[test]
fn unknown_variants_are_rejected() {
    assert!(serde_json::from_str::<ConvertOptions>(r#"{"dimension":"Four"}"#).is_err());
}
