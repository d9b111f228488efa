use dia_core::{format_float, DiaError, FieldValue, SelectionScheme};

#[test]
fn codes_decode_to_fixed_names() {
    let expected = [
        ("0", "MuLambda"),
        ("1", "Tournament"),
        ("2", "FitnessSharing"),
        ("3", "NoveltySearch"),
        ("4", "EpsilonLexicase"),
        ("5", "DownSampledLexicase"),
        ("6", "CohortLexicase"),
        ("7", "NoveltyLexicase"),
        ("8", "EcoEa"),
    ];
    for (code, name) in expected {
        let scheme = SelectionScheme::from_code(code).expect("known code");
        assert_eq!(scheme.name(), name);
        assert_eq!(scheme.code().to_string(), code);
    }
}

#[test]
fn unknown_code_is_a_selection_error() {
    for raw in ["9", "-1", "lexicase", ""] {
        let err = SelectionScheme::from_code(raw).expect_err("unknown code");
        assert!(matches!(err, DiaError::Selection(_)), "{raw}: {err}");
        assert_eq!(err.info().context["code"], raw);
    }
}

#[test]
fn only_subsampling_schemes_name_a_proportion_key() {
    for scheme in SelectionScheme::ALL {
        let key = scheme.sample_prop_key();
        match scheme {
            SelectionScheme::DownSampledLexicase => assert_eq!(key, Some("DSLEX_PROP")),
            SelectionScheme::CohortLexicase => assert_eq!(key, Some("COH_LEX_PROP")),
            _ => assert_eq!(key, None),
        }
    }
}

#[test]
fn floats_render_like_earlier_aggregates() {
    assert_eq!(FieldValue::Float(1000.0).to_string(), "1000.0");
    assert_eq!(FieldValue::Float(0.5).to_string(), "0.5");
    assert_eq!(FieldValue::Float(1.0).to_string(), "1.0");
    assert_eq!(FieldValue::Int(42).to_string(), "42");
    assert_eq!(FieldValue::from("0.125").to_string(), "0.125");
}

#[test]
fn extreme_magnitudes_use_exponent_form() {
    assert_eq!(format_float(1e16), "1e+16");
    assert_eq!(format_float(2.5e20), "2.5e+20");
    assert_eq!(format_float(1e-5), "1e-05");
    assert_eq!(format_float(1.5e-7), "1.5e-07");
    assert_eq!(format_float(1e100), "1e+100");
    assert_eq!(format_float(9_999_999_999_999_998.0), "9999999999999998.0");
    assert_eq!(format_float(0.0001), "0.0001");
    assert_eq!(format_float(0.0), "0.0");
    assert_eq!(format_float(f64::NAN), "nan");
}
