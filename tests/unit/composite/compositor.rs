use super::*;
use crate::composite::decode::encode_value_rgb;
use crate::foundation::buffer::Dims;
use crate::model::colormap::Colormap;

fn buf(w: u32, h: u32, c: usize, data: Vec<f32>) -> PixelBuffer {
    PixelBuffer::new(Dims::new(w, h).unwrap(), c, data).unwrap()
}

fn solid(w: u32, h: u32, rgb: Rgb) -> PixelBuffer {
    let mut data = Vec::new();
    for _ in 0..(w * h) {
        data.extend_from_slice(&rgb);
    }
    buf(w, h, 3, data)
}

fn color_layer(name: &str, color: PixelBuffer, depth: PixelBuffer) -> LayerSpec {
    let mut spec = LayerSpec::new(name);
    spec.color = Some(color);
    spec.depth = Some(depth);
    spec
}

fn unlit_config() -> CompositeConfig {
    CompositeConfig {
        lighting_enabled: false,
        ..CompositeConfig::default()
    }
}

const RED: Rgb = [255.0, 0.0, 0.0];
const BLUE: Rgb = [0.0, 0.0, 255.0];

#[test]
fn empty_layer_list_fails() {
    let err = DepthCompositor::new(unlit_config())
        .render(&[])
        .unwrap_err();
    assert!(err.to_string().contains("no valid layers to render"));
    assert!(PassthroughCompositor.render(&[]).is_err());
}

#[test]
fn layers_without_buffers_fail_when_nothing_else_renders() {
    let layers = vec![LayerSpec::new("a"), LayerSpec::new("b")];
    assert!(DepthCompositor::new(unlit_config()).render(&layers).is_err());
}

#[test]
fn single_layer_matches_passthrough() {
    // Constant depth carries no geometry/background split, so the merged
    // image is the color array untouched, exactly like the pass-through
    // compositor.
    let color = solid(2, 2, [10.0, 20.0, 30.0]);
    let depth = buf(2, 2, 1, vec![1.0; 4]);
    let layers = vec![color_layer("only", color.clone(), depth)];

    let a = PassthroughCompositor.render(&layers).unwrap();
    let b = DepthCompositor::new(unlit_config()).render(&layers).unwrap();
    assert_eq!(a, color);
    assert_eq!(a, b);
}

#[test]
fn depth_merge_two_layers_2x2() {
    // Layer A: depth 1 everywhere, red. Layer B: depth [0,2,2,2], blue.
    // B wins only the top-left pixel; nothing remains at the background
    // depth of 2, so no pixel takes the background color.
    let a = color_layer("a", solid(2, 2, RED), buf(2, 2, 1, vec![1.0; 4]));
    let b = color_layer(
        "b",
        solid(2, 2, BLUE),
        buf(2, 2, 1, vec![0.0, 2.0, 2.0, 2.0]),
    );

    let config = CompositeConfig {
        lighting_enabled: false,
        background: [9.0, 9.0, 9.0],
        ..CompositeConfig::default()
    };
    let out = DepthCompositor::new(config).render(&[a, b]).unwrap();

    assert_eq!(out.pixel(0), &BLUE);
    assert_eq!(out.pixel(1), &RED);
    assert_eq!(out.pixel(2), &RED);
    assert_eq!(out.pixel(3), &RED);
}

#[test]
fn equal_depths_keep_the_earlier_layer() {
    let a = color_layer("a", solid(2, 1, RED), buf(2, 1, 1, vec![1.0, 2.0]));
    let b = color_layer("b", solid(2, 1, BLUE), buf(2, 1, 1, vec![1.0, 2.0]));

    let out = DepthCompositor::new(unlit_config()).render(&[a, b]).unwrap();
    assert_eq!(out.pixel(0), &RED);
}

#[test]
fn background_depth_pixels_take_the_background_color() {
    let color = solid(2, 2, RED);
    let depth = buf(2, 2, 1, vec![0.5, 2.0, 2.0, 2.0]);
    let config = CompositeConfig {
        lighting_enabled: false,
        background: [7.0, 8.0, 9.0],
        ..CompositeConfig::default()
    };
    let out = DepthCompositor::new(config)
        .render(&[color_layer("only", color, depth)])
        .unwrap();

    assert_eq!(out.pixel(0), &RED);
    for i in 1..4 {
        assert_eq!(out.pixel(i), &[7.0, 8.0, 9.0]);
    }
}

#[test]
fn lighting_modulates_base_and_inserted_layers() {
    let mut a = color_layer("a", solid(1, 1, [200.0, 200.0, 200.0]), buf(1, 1, 1, vec![1.0]));
    a.luminance = Some(buf(1, 1, 3, vec![0.0, 128.0, 0.0]));

    let config = CompositeConfig::default(); // lighting on
    let out = DepthCompositor::new(config.clone()).render(&[a.clone()]).unwrap();
    let expected = 200.0 * 128.0 / 255.0;
    for c in 0..3 {
        assert!((out.comp(0, c) - expected).abs() < 1e-3);
    }

    // Same modulation applies to an overlay at insertion time.
    let base = color_layer("base", solid(1, 1, RED), buf(1, 1, 1, vec![5.0]));
    let mut over = color_layer("over", solid(1, 1, [200.0, 200.0, 200.0]), buf(1, 1, 1, vec![1.0]));
    over.luminance = Some(buf(1, 1, 3, vec![0.0, 128.0, 0.0]));
    let out = DepthCompositor::new(config).render(&[base, over]).unwrap();
    for c in 0..3 {
        assert!((out.comp(0, c) - expected).abs() < 1e-3);
    }
}

#[test]
fn lut_customization_decodes_raw_values() {
    // Values [5, 15, 25] against range (10, 20) normalize to [0, 0.5, 1]
    // and pick the bottom, middle, top of a 4-color LUT. The fourth pixel
    // is background and takes the background color.
    let lut = Lut::from_colormap(&Colormap::grayscale(), 4).unwrap();
    let bottom = lut.lookup(0.0);
    let middle = lut.lookup(0.5);
    let top = lut.lookup(1.0);

    let mut layer = LayerSpec::new("values");
    layer.value = Some(buf(2, 2, 1, vec![5.0, 15.0, 25.0, 0.0]));
    layer.depth = Some(buf(2, 2, 1, vec![0.0, 0.5, 0.5, 3.0]));

    let mut config = unlit_config();
    config.background = [1.0, 2.0, 3.0];
    config.color_definitions.insert(
        "values".to_string(),
        ColorSpec::Lut {
            lut,
            range: (10.0, 20.0),
        },
    );

    let out = DepthCompositor::new(config).render(&[layer]).unwrap();
    assert_eq!(out.pixel(0), &bottom);
    assert_eq!(out.pixel(1), &middle);
    assert_eq!(out.pixel(2), &top);
    assert_eq!(out.pixel(3), &[1.0, 2.0, 3.0]);
}

#[test]
fn packed_rgb_values_decode_through_the_lut() {
    // 0.7 sits away from the uniform bin edges, so the ~6e-8 pack/unpack
    // error cannot move it into a neighboring bin.
    let lut = Lut::from_colormap(&Colormap::grayscale(), 8).unwrap();
    let expected = lut.lookup(0.7);

    let px = encode_value_rgb(0.7);
    let mut data = Vec::new();
    data.extend_from_slice(&px);
    data.extend_from_slice(&[0.0, 0.0, 0.0]);
    let mut layer = LayerSpec::new("packed");
    layer.value = Some(buf(2, 1, 3, data));
    layer.depth = Some(buf(2, 1, 1, vec![0.0, 1.0]));

    let mut config = unlit_config();
    config
        .color_definitions
        .insert("packed".to_string(), ColorSpec::Lut {
            lut,
            range: (0.0, 1.0),
        });

    let out = DepthCompositor::new(config).render(&[layer]).unwrap();
    assert_eq!(out.pixel(0), &expected);
}

#[test]
fn raw_scalar_layer_without_lut_is_skipped() {
    // A raw scalar value array with no LUT registered is not a color;
    // the compositor falls through to the next layer.
    let mut scalars = LayerSpec::new("scalars");
    scalars.value = Some(buf(1, 1, 1, vec![42.0]));
    scalars.depth = Some(buf(1, 1, 1, vec![0.0]));

    let base = color_layer("base", solid(1, 1, RED), buf(1, 1, 1, vec![1.0]));

    let out = DepthCompositor::new(unlit_config())
        .render(&[scalars.clone(), base])
        .unwrap();
    assert_eq!(out.pixel(0), &RED);

    // Alone it cannot seed a composite.
    assert!(DepthCompositor::new(unlit_config()).render(&[scalars]).is_err());
}

#[test]
fn geometry_fill_overrides_foreground_only() {
    let color = solid(2, 1, RED);
    let depth = buf(2, 1, 1, vec![0.0, 1.0]);
    let mut config = unlit_config();
    config.geometry_color_enabled = true;
    config.background = [0.0, 0.0, 0.0];
    config
        .color_definitions
        .insert("geo".to_string(), ColorSpec::Fill([0.0, 255.0, 0.0]));

    let out = DepthCompositor::new(config)
        .render(&[color_layer("geo", color, depth)])
        .unwrap();
    assert_eq!(out.pixel(0), &[0.0, 255.0, 0.0]);
    // The background pixel is recolored by the final background fill.
    assert_eq!(out.pixel(1), &[0.0, 0.0, 0.0]);
}

#[test]
fn fill_is_ignored_without_geometry_color_mode() {
    let color = solid(1, 1, RED);
    let depth = buf(1, 1, 1, vec![0.5]);
    let mut config = unlit_config();
    config
        .color_definitions
        .insert("geo".to_string(), ColorSpec::Fill([0.0, 255.0, 0.0]));

    let out = DepthCompositor::new(config)
        .render(&[color_layer("geo", color, depth)])
        .unwrap();
    assert_eq!(out.pixel(0), &RED);
}

#[test]
fn non_rgb_color_buffers_are_rejected() {
    // An RGBA color array must be rejected up front, not panic partway
    // through a merge or the background fill.
    let rgba = buf(2, 1, 4, vec![255.0, 0.0, 0.0, 1.0, 0.0, 255.0, 0.0, 1.0]);
    let depth = buf(2, 1, 1, vec![0.0, 1.0]);

    let err = DepthCompositor::new(unlit_config())
        .render(&[color_layer("rgba", rgba.clone(), depth.clone())])
        .unwrap_err();
    assert!(matches!(err, CisError::Composite(_)));

    // The geometry fill override rejects it the same way.
    let mut config = unlit_config();
    config.geometry_color_enabled = true;
    config
        .color_definitions
        .insert("rgba".to_string(), ColorSpec::Fill([0.0, 255.0, 0.0]));
    assert!(
        DepthCompositor::new(config)
            .render(&[color_layer("rgba", rgba, depth)])
            .is_err()
    );
}

#[test]
fn skipped_layers_log_under_a_subscriber() {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .finish();
    tracing::subscriber::with_default(subscriber, || {
        let base = color_layer("base", solid(1, 1, RED), buf(1, 1, 1, vec![1.0]));
        let out = DepthCompositor::new(unlit_config())
            .render(&[LayerSpec::new("empty"), base])
            .unwrap();
        assert_eq!(out.pixel(0), &RED);
    });
}

#[test]
fn missing_depth_is_a_decode_error() {
    let mut layer = LayerSpec::new("no-depth");
    layer.color = Some(solid(1, 1, RED));
    let err = DepthCompositor::new(unlit_config())
        .render(&[layer])
        .unwrap_err();
    assert!(matches!(err, CisError::Decode(_)));
}

#[test]
fn render_batch_matches_sequential_renders() {
    let compositor = DepthCompositor::new(unlit_config());
    let jobs: Vec<Vec<LayerSpec>> = (0..4)
        .map(|i| {
            vec![color_layer(
                "l",
                solid(2, 2, [i as f32, 0.0, 0.0]),
                buf(2, 2, 1, vec![1.0; 4]),
            )]
        })
        .collect();

    let parallel = render_batch(&compositor, &jobs).unwrap();
    for (job, out) in jobs.iter().zip(&parallel) {
        assert_eq!(out, &compositor.render(job).unwrap());
    }
}
