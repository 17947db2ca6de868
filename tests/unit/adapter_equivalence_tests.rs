// Cross-surface tests: the raster preview and the document canvas must agree
// on every mark once the vertical axis flip is applied.

use rstest::rstest;

use guardmark::render::document::decode_marks;
use guardmark::render::{
    render_instances, AxisFlip, DocumentCanvas, DrawnMark, PreviewSurface, RenderSkip,
};
use guardmark::watermark::{place, Page, Pattern, Rgb, WatermarkConfig, WatermarkInstance};

fn white() -> Rgb {
    Rgb::new(1.0, 1.0, 1.0)
}

/// Difference of two angles in degrees, folded into [0, 180].
fn angle_diff(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(360.0);
    d.min(360.0 - d)
}

fn assert_equivalent(preview: &[DrawnMark], document: &[DrawnMark], flip: AxisFlip) {
    assert_eq!(preview.len(), document.len());
    for (i, (p, d)) in preview.iter().zip(document).enumerate() {
        let flipped = flip.to_document(p);
        assert!(
            flipped.approx_eq(d, 1e-9),
            "mark {} differs: {:?} vs {:?}",
            i,
            flipped,
            d
        );
    }
}

#[rstest]
#[case(Pattern::Single)]
#[case(Pattern::Grid)]
#[case(Pattern::Diagonal)]
#[case(Pattern::Paranoid)]
#[case(Pattern::AntiRemoval)]
fn test_surfaces_draw_same_marks(#[case] pattern: Pattern) {
    let page = Page::new(300.0, 400.0).unwrap();
    let config = WatermarkConfig {
        font_size: 24.0,
        spacing: 80.0,
        random_seed: Some("equivalence".to_string()),
        ..WatermarkConfig::new("SAMPLE", pattern)
    };
    let instances = place(&config, &page).unwrap();

    let mut surface = PreviewSurface::new(&page, 1.0, white()).unwrap();
    let mut canvas = DocumentCanvas::new(&page);
    let preview = render_instances(&mut surface, &instances);
    let document = render_instances(&mut canvas, &instances);

    assert!(preview.skipped.is_empty(), "{:?}", preview.skipped);
    assert!(document.skipped.is_empty(), "{:?}", document.skipped);
    assert_eq!(preview.drawn.len(), instances.len());
    assert_equivalent(&preview.drawn, &document.drawn, AxisFlip::new(page.height));
}

#[test]
fn test_encoded_content_matches_preview() {
    let page = Page::new(595.0, 842.0).unwrap();
    let config = WatermarkConfig {
        random_seed: Some("fixed-seed-1".to_string()),
        ..WatermarkConfig::new("CONFIDENTIAL", Pattern::Paranoid)
    };
    let instances = place(&config, &page).unwrap();

    let mut surface = PreviewSurface::new(&page, 0.5, white()).unwrap();
    let mut canvas = DocumentCanvas::new(&page);
    let preview = render_instances(&mut surface, &instances);
    render_instances(&mut canvas, &instances);

    // Content streams carry single-precision reals.
    let decoded = decode_marks(canvas.operations(), &canvas.ext_gstates(), (0.0, 0.0));
    let flip = AxisFlip::new(page.height);

    assert_eq!(decoded.len(), preview.drawn.len());
    for (p, d) in preview.drawn.iter().zip(&decoded) {
        let expected = flip.to_document(p);
        assert!((expected.x - d.x).abs() < 0.01);
        assert!((expected.y - d.y).abs() < 0.01);
        assert!(angle_diff(expected.rotation, d.rotation) < 0.01);
        assert!((expected.opacity - d.opacity).abs() < 1e-6);
    }
}

#[test]
fn test_flip_round_trip() {
    let flip = AxisFlip::new(842.0);
    let mark = DrawnMark {
        x: 12.5,
        y: 100.0,
        rotation: 30.0,
        opacity: 0.4,
    };
    let document = flip.to_document(&mark);
    assert_eq!(document.y, 742.0);
    assert_eq!(document.rotation, -30.0);
    assert_eq!(flip.to_preview(&document), mark);
}

#[test]
fn test_unsupported_text_skipped_on_both_surfaces() {
    let page = Page::new(200.0, 200.0).unwrap();
    let instances = vec![
        WatermarkInstance {
            text: "\u{E000}".to_string(),
            x: 20.0,
            y: 50.0,
            font_size: 12.0,
            rotation: 0.0,
            opacity: 0.5,
            color: Rgb::BLACK,
        },
        WatermarkInstance {
            text: "OK".to_string(),
            x: 20.0,
            y: 80.0,
            font_size: 12.0,
            rotation: 10.0,
            opacity: 0.5,
            color: Rgb::BLACK,
        },
    ];

    let mut surface = PreviewSurface::new(&page, 1.0, white()).unwrap();
    let mut canvas = DocumentCanvas::new(&page);
    let preview = render_instances(&mut surface, &instances);
    let document = render_instances(&mut canvas, &instances);

    let expected = vec![(0, RenderSkip::UnsupportedGlyph { ch: '\u{E000}' })];
    assert_eq!(preview.skipped, expected);
    assert_eq!(document.skipped, expected);
    assert_equivalent(&preview.drawn, &document.drawn, AxisFlip::new(page.height));
}

#[rstest]
#[case("СЕКРЕТ", Some('С'))]
#[case("機密", Some('機'))]
#[case("ŠKODA Œuvre", None)]
#[case("„Entwurf“ †", None)]
fn test_non_ascii_text_agrees_across_surfaces(
    #[case] text: &str,
    #[case] rejected: Option<char>,
) {
    let page = Page::new(300.0, 400.0).unwrap();
    let config = WatermarkConfig {
        font_size: 24.0,
        spacing: 80.0,
        ..WatermarkConfig::new(text, Pattern::Diagonal)
    };
    let instances = place(&config, &page).unwrap();
    assert!(!instances.is_empty());

    let mut surface = PreviewSurface::new(&page, 1.0, white()).unwrap();
    let mut canvas = DocumentCanvas::new(&page);
    let preview = render_instances(&mut surface, &instances);
    let document = render_instances(&mut canvas, &instances);

    assert_eq!(preview.skipped, document.skipped);
    assert_equivalent(&preview.drawn, &document.drawn, AxisFlip::new(page.height));
    match rejected {
        Some(ch) => {
            assert!(preview.drawn.is_empty());
            assert!(preview
                .skipped
                .iter()
                .all(|(_, skip)| *skip == RenderSkip::UnsupportedGlyph { ch }));
        }
        None => assert_eq!(preview.drawn.len(), instances.len()),
    }
}

#[rstest]
#[case(1.0)]
#[case(0.01)]
#[case(4.0)]
fn test_huge_mark_drawn_at_any_scale(#[case] scale: f64) {
    let page = Page::new(595.0, 842.0).unwrap();
    let config = WatermarkConfig {
        font_size: 2000.0,
        rotation: 0.0,
        ..WatermarkConfig::new("CONFIDENTIAL", Pattern::Single)
    };
    let instances = place(&config, &page).unwrap();
    assert_eq!(instances.len(), 1);

    let mut surface = PreviewSurface::new(&page, scale, white()).unwrap();
    let mut canvas = DocumentCanvas::new(&page);
    let preview = render_instances(&mut surface, &instances);
    let document = render_instances(&mut canvas, &instances);

    assert!(preview.skipped.is_empty(), "{:?}", preview.skipped);
    assert!(document.skipped.is_empty(), "{:?}", document.skipped);
    assert_equivalent(&preview.drawn, &document.drawn, AxisFlip::new(page.height));

    if scale >= 1.0 {
        let inked = surface
            .image()
            .pixels()
            .filter(|p| p.0 != [255, 255, 255, 255])
            .count();
        assert!(inked > 0);
    }
}

#[test]
fn test_tiny_marks_drawn_on_both_surfaces() {
    let page = Page::new(300.0, 400.0).unwrap();
    let config = WatermarkConfig {
        font_size: 1.0,
        spacing: 40.0,
        random_seed: Some("tiny".to_string()),
        ..WatermarkConfig::new("tiny", Pattern::AntiRemoval)
    };
    let instances = place(&config, &page).unwrap();

    let mut surface = PreviewSurface::new(&page, 0.05, white()).unwrap();
    let mut canvas = DocumentCanvas::new(&page);
    let preview = render_instances(&mut surface, &instances);
    let document = render_instances(&mut canvas, &instances);

    assert!(preview.skipped.is_empty(), "{:?}", preview.skipped);
    assert_eq!(preview.drawn.len(), instances.len());
    assert_equivalent(&preview.drawn, &document.drawn, AxisFlip::new(page.height));
}
