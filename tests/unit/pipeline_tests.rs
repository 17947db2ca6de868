// Document stamping and preview pipeline tests

use lopdf::content::Content;
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use tempfile::TempDir;

use guardmark::config::{PageScope, PageSelection, PreviewConfig};
use guardmark::error::GuardmarkError;
use guardmark::pipeline::{place_with_margin, render_preview, stamp_file, write_preview};
use guardmark::render::document::{decode_marks, effective_resources};
use guardmark::watermark::{place, Page, Pattern, WatermarkConfig};

/// Document with `count` pages, each carrying a small line drawing.
fn sample_doc(count: u32, width: i64, height: i64) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let kids: Vec<Object> = (0..count)
        .map(|_| {
            let content = doc.add_object(Stream::new(
                dictionary! {},
                b"0 0 m 100 100 l S".to_vec(),
            ));
            doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content,
                "MediaBox" => vec![0.into(), 0.into(), width.into(), height.into()],
            })
            .into()
        })
        .collect();
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count as i64,
        }),
    );
    let catalog = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog);
    doc
}

fn page_operations(doc: &Document, page_id: ObjectId) -> Content {
    let bytes = doc.get_page_content(page_id).expect("page content");
    Content::decode(&bytes).expect("decodable content")
}

#[test]
fn test_stamp_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.pdf");
    let output = dir.path().join("out.pdf");
    sample_doc(2, 595, 842).save(&input).unwrap();

    let config = WatermarkConfig {
        random_seed: Some("fixed-seed-1".to_string()),
        ..WatermarkConfig::new("CONFIDENTIAL", Pattern::Paranoid)
    };
    let report = stamp_file(&input, &output, &config, &PageSelection::default()).unwrap();

    let page = Page::new(595.0, 842.0).unwrap();
    let instances = place(&config, &page).unwrap();
    assert_eq!(report.pages_stamped, 2);
    assert_eq!(report.instances_drawn, 2 * instances.len());
    assert_eq!(report.instances_skipped, 0);

    let stamped = Document::load(&output).unwrap();
    for page_id in stamped.get_pages().values() {
        let content = page_operations(&stamped, *page_id);

        // Original drawing stays first, isolated in its own graphics state.
        let operators: Vec<&str> = content
            .operations
            .iter()
            .map(|op| op.operator.as_str())
            .collect();
        assert_eq!(&operators[..5], ["q", "m", "l", "S", "Q"]);

        let resources = effective_resources(&stamped, *page_id).unwrap();
        let states = resources.get(b"ExtGState").unwrap().as_dict().unwrap();
        assert!(resources.get(b"Font").unwrap().as_dict().unwrap().has(b"WmF1"));

        let marks = decode_marks(&content.operations, states, (0.0, 0.0));
        assert_eq!(marks.len(), instances.len());
        for (mark, instance) in marks.iter().zip(&instances) {
            assert!((mark.x - instance.x).abs() < 0.01);
            assert!((mark.y - (842.0 - instance.y)).abs() < 0.01);
            assert!((mark.opacity - instance.opacity).abs() < 1e-6);
        }
    }
}

#[test]
fn test_odd_pages_only() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.pdf");
    let output = dir.path().join("out.pdf");
    sample_doc(3, 300, 300).save(&input).unwrap();

    let selection = PageSelection {
        scope: PageScope::OddOnly,
        ..PageSelection::default()
    };
    let config = WatermarkConfig::new("ODD", Pattern::Single);
    let report = stamp_file(&input, &output, &config, &selection).unwrap();
    assert_eq!(report.pages_total, 3);
    assert_eq!(report.pages_stamped, 2);

    let stamped = Document::load(&output).unwrap();
    let pages = stamped.get_pages();
    let text_objects = |number: u32| {
        page_operations(&stamped, pages[&number])
            .operations
            .iter()
            .filter(|op| op.operator == "BT")
            .count()
    };
    assert_eq!(text_objects(1), 1);
    assert_eq!(text_objects(2), 0);
    assert_eq!(text_objects(3), 1);
}

#[test]
fn test_missing_input_is_io_or_pdf_error() {
    let dir = TempDir::new().unwrap();
    let result = stamp_file(
        &dir.path().join("missing.pdf"),
        &dir.path().join("out.pdf"),
        &WatermarkConfig::default(),
        &PageSelection::default(),
    );
    assert!(result.is_err());
    assert!(!dir.path().join("out.pdf").exists());
}

#[test]
fn test_preview_png_written() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("preview.png");

    let config = WatermarkConfig::new("PREVIEW", Pattern::AntiRemoval);
    let page = Page::new(200.0, 300.0).unwrap();
    let preview = PreviewConfig {
        scale: 0.5,
        ..PreviewConfig::default()
    };
    let report = write_preview(&config, &page, 10.0, &preview, &path).unwrap();

    assert!(report.skipped.is_empty());
    let decoded = image::open(&path).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (100, 150));
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
}

#[test]
fn test_preview_write_failure_is_image_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing").join("preview.png");

    let config = WatermarkConfig::new("PREVIEW", Pattern::Single);
    let page = Page::new(200.0, 300.0).unwrap();
    let result = write_preview(&config, &page, 0.0, &PreviewConfig::default(), &path);

    let err = result.unwrap_err();
    assert!(matches!(err, GuardmarkError::Image(_)), "{:?}", err);
    assert!(err.to_string().starts_with("Image error"));
}

#[test]
fn test_margin_shared_by_placement_and_preview() {
    let config = WatermarkConfig {
        random_seed: Some("margin".to_string()),
        ..WatermarkConfig::new("MARGIN", Pattern::Grid)
    };
    let page = Page::new(400.0, 500.0).unwrap();
    let margin = 40.0;

    let placement = place_with_margin(&config, &page, margin).unwrap();
    assert!(!placement.instances.is_empty());
    for instance in &placement.instances {
        assert!(instance.x >= margin && instance.x <= page.width - margin);
        assert!(instance.y >= margin && instance.y <= page.height - margin);
    }

    // The JSON placement and the preview see the same instances.
    let (_, report) = render_preview(&config, &page, margin, &PreviewConfig::default()).unwrap();
    assert_eq!(report.drawn.len(), placement.instances.len());
    for (mark, instance) in report.drawn.iter().zip(&placement.instances) {
        assert!((mark.x - instance.x).abs() < 1e-9);
        assert!((mark.y - instance.y).abs() < 1e-9);
    }

    let unbounded = place(&config, &page).unwrap();
    assert_ne!(unbounded.len(), placement.instances.len());
}
