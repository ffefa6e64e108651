use super::*;

fn pt(x: f32, r: f32, g: f32, b: f32) -> ControlPoint {
    ControlPoint {
        x,
        r,
        g,
        b,
        a: 1.0,
    }
}

#[test]
fn validate_rejects_short_or_unordered_points() {
    let cm = Colormap::from_points("one", vec![pt(0.0, 0.0, 0.0, 0.0)]);
    assert!(cm.validate().is_err());

    let cm = Colormap::from_points(
        "backwards",
        vec![pt(0.8, 0.0, 0.0, 0.0), pt(0.2, 1.0, 1.0, 1.0)],
    );
    assert!(cm.validate().is_err());

    let cm = Colormap::from_points(
        "outside",
        vec![pt(-0.1, 0.0, 0.0, 0.0), pt(1.0, 1.0, 1.0, 1.0)],
    );
    assert!(cm.validate().is_err());

    assert!(Colormap::grayscale().validate().is_ok());
}

#[test]
fn sample_interpolates_and_clamps() {
    let cm = Colormap::from_points(
        "ramp",
        vec![pt(0.0, 0.0, 0.0, 0.0), pt(1.0, 1.0, 0.0, 0.0)],
    );
    assert_eq!(cm.sample(0.5).unwrap(), [127.5, 0.0, 0.0]);
    assert_eq!(cm.sample(-2.0).unwrap(), [0.0, 0.0, 0.0]);
    assert_eq!(cm.sample(2.0).unwrap(), [255.0, 0.0, 0.0]);
}

#[test]
fn url_colormaps_cannot_be_sampled() {
    let cm = Colormap {
        name: "remote".to_string(),
        source: ColormapSource::Url {
            url: "https://example.com/maps/viridis.json".to_string(),
        },
    };
    assert!(cm.validate().is_ok());
    assert!(cm.sample(0.5).is_err());
    assert!(Lut::from_colormap(&cm, 4).is_err());
}

#[test]
fn lut_shape_is_validated() {
    let colors = vec![[0.0, 0.0, 0.0], [255.0, 255.0, 255.0]];
    assert!(Lut::new(colors.clone(), vec![0.0, 0.5, 1.0]).is_ok());
    assert!(Lut::new(colors.clone(), vec![0.0, 1.0]).is_err());
    assert!(Lut::new(colors, vec![0.0, 0.6, 0.5]).is_err());
    assert!(Lut::new(vec![], vec![0.0]).is_err());
}

#[test]
fn lookup_clamps_to_the_table_ends() {
    let lut = Lut::new(
        vec![[1.0, 0.0, 0.0], [2.0, 0.0, 0.0], [3.0, 0.0, 0.0]],
        vec![0.0, 0.25, 0.5, 1.0],
    )
    .unwrap();
    // Below the first boundary takes the bottom color.
    assert_eq!(lut.lookup(-0.5), [1.0, 0.0, 0.0]);
    assert_eq!(lut.lookup(0.0), [1.0, 0.0, 0.0]);
    assert_eq!(lut.lookup(0.3), [2.0, 0.0, 0.0]);
    // At and above the last boundary takes the top color.
    assert_eq!(lut.lookup(1.0), [3.0, 0.0, 0.0]);
    assert_eq!(lut.lookup(7.0), [3.0, 0.0, 0.0]);
}

#[test]
fn from_colormap_uses_uniform_bins() {
    let lut = Lut::from_colormap(&Colormap::grayscale(), 4).unwrap();
    assert_eq!(lut.len(), 4);
    assert_eq!(lut.bins(), &[0.0, 0.25, 0.5, 0.75, 1.0]);
    // Bin centers of a grayscale ramp are an increasing gray sequence.
    let g0 = lut.lookup(0.1)[0];
    let g3 = lut.lookup(0.9)[0];
    assert!(g0 < g3);
}

#[test]
fn colormap_json_roundtrip() {
    let cm = Colormap::from_points(
        "ramp",
        vec![pt(0.0, 0.1, 0.2, 0.3), pt(1.0, 0.9, 0.8, 0.7)],
    );
    let json = serde_json::to_string(&cm).unwrap();
    let back: Colormap = serde_json::from_str(&json).unwrap();
    assert_eq!(back, cm);

    let remote = Colormap {
        name: "remote".to_string(),
        source: ColormapSource::Url {
            url: "file:///maps/x.json".to_string(),
        },
    };
    let json = serde_json::to_string(&remote).unwrap();
    let back: Colormap = serde_json::from_str(&json).unwrap();
    assert_eq!(back, remote);
}
