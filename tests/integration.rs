use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use docx_rs::{Docx, Hyperlink, HyperlinkType, Paragraph, Run};
use image::{GrayImage, Luma};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use pretty_assertions::assert_eq;

use textract::core::model::{Diagnostic, Extraction, Notice};
use textract::core::{ExtractError, FileKind};
use textract::export::{Exporter, TextExporter};
use textract::ocr::renderer::RenderedPage;
use textract::ocr::{OcrEngine, Rasterizer, SegmentationMode};
use textract::{Extractor, UploadedFile};

/// Answers every request with the text registered for its segmentation mode.
#[derive(Debug)]
struct FixedEngine {
    block: &'static str,
    auto: &'static str,
    sparse: &'static str,
}

impl OcrEngine for FixedEngine {
    fn recognize(&self, _image: &Path, mode: SegmentationMode) -> textract::core::Result<String> {
        Ok(match mode {
            SegmentationMode::UniformBlock => self.block,
            SegmentationMode::Auto => self.auto,
            SegmentationMode::SparseText => self.sparse,
        }
        .to_string())
    }
}

fn ocr_extractor(block: &'static str, auto: &'static str, sparse: &'static str) -> Extractor {
    Extractor::new(Some(Box::new(FixedEngine {
        block,
        auto,
        sparse,
    })))
}

/// Reads back the page name for rendered pages and nothing for anything else,
/// so only the original-image strategies produce text.
#[derive(Debug)]
struct PageNameEngine;

impl OcrEngine for PageNameEngine {
    fn recognize(&self, image: &Path, _mode: SegmentationMode) -> textract::core::Result<String> {
        let stem = image.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
        Ok(match stem {
            "page-2" => String::new(),
            stem if stem.starts_with("page-") => format!("{stem} words"),
            _ => String::new(),
        })
    }
}

/// Writes one blank PNG per entry, sized as given.
#[derive(Debug)]
struct FakeRasterizer(Vec<(u32, u32)>);

impl Rasterizer for FakeRasterizer {
    fn render_pages(&self, _pdf: &Path, out_dir: &Path) -> textract::core::Result<Vec<RenderedPage>> {
        let mut pages = Vec::new();
        for (idx, (width, height)) in self.0.iter().enumerate() {
            let number = idx as u32 + 1;
            let path: PathBuf = out_dir.join(format!("page-{number}.png"));
            GrayImage::from_pixel(*width, *height, Luma([255])).save(&path)?;
            pages.push(RenderedPage { number, path });
        }
        Ok(pages)
    }
}

#[derive(Debug)]
struct BrokenRasterizer;

impl Rasterizer for BrokenRasterizer {
    fn render_pages(&self, _pdf: &Path, _out_dir: &Path) -> textract::core::Result<Vec<RenderedPage>> {
        Err(ExtractError::Render("pdftoppm missing".into()))
    }
}

fn png_bytes(width: u32, height: u32) -> Result<Vec<u8>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("image.png");
    GrayImage::from_pixel(width, height, Luma([240])).save(&path)?;
    Ok(fs::read(path)?)
}

fn docx_bytes(paragraphs: &[&str]) -> Result<Vec<u8>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("doc.docx");
    let mut docx = Docx::new();
    for text in paragraphs {
        let paragraph = if text.is_empty() {
            Paragraph::new()
        } else {
            Paragraph::new().add_run(Run::new().add_text(*text))
        };
        docx = docx.add_paragraph(paragraph);
    }
    docx.build().pack(fs::File::create(&path)?)?;
    Ok(fs::read(path)?)
}

/// One page per entry; `None` pages carry no text operators.
fn pdf_bytes(pages: &[Option<&str>]) -> Result<Vec<u8>> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let operations = match text {
            Some(text) => vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![100.into(), 600.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
            None => Vec::new(),
        };
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}

#[test]
fn docx_drops_blank_paragraphs() -> Result<()> {
    let upload = UploadedFile::new("letter.docx", docx_bytes(&["Hello", "", "World"])?);
    let report = Extractor::new(None).process(&upload)?;

    assert_eq!(report.route, FileKind::Docx);
    assert_eq!(report.extraction, Extraction::Text("Hello\nWorld".into()));
    Ok(())
}

#[test]
fn docx_without_text_reports_no_text() -> Result<()> {
    let upload = UploadedFile::new("blank.docx", docx_bytes(&["", ""])?);
    let report = Extractor::new(None).process(&upload)?;

    assert_eq!(report.rendered(), "No text found in document.");
    Ok(())
}

#[test]
fn pdf_marks_text_bearing_pages() -> Result<()> {
    let upload = UploadedFile::new(
        "report.pdf",
        pdf_bytes(&[Some("First page"), None, Some("Third page")])?,
    );
    let report = Extractor::new(None).process(&upload)?;
    let text = report.rendered();

    assert_eq!(text.matches("--- Page ").count(), 2);
    let first = text.find("--- Page 1 ---").expect("page 1 marker");
    let third = text.find("--- Page 3 ---").expect("page 3 marker");
    assert!(first < third);
    assert!(!text.contains("--- Page 2 ---"));
    assert!(text.contains("First page"));
    assert!(text.contains("Third page"));
    Ok(())
}

#[test]
fn scanned_pdf_without_ocr_is_explained() -> Result<()> {
    let upload = UploadedFile::new("scan.pdf", pdf_bytes(&[None, None])?);
    let report = Extractor::new(None).process(&upload)?;

    assert_eq!(
        report.extraction,
        Extraction::Diagnostic(Diagnostic::ScannedPdfUnsupported)
    );
    assert!(report.rendered().starts_with("No text found in PDF."));
    Ok(())
}

#[test]
fn docx_keeps_hyperlink_text() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("links.docx");
    Docx::new()
        .add_paragraph(
            Paragraph::new()
                .add_run(Run::new().add_text("See "))
                .add_hyperlink(
                    Hyperlink::new("usage", HyperlinkType::Anchor)
                        .add_run(Run::new().add_text("the docs")),
                ),
        )
        .build()
        .pack(fs::File::create(&path)?)?;

    let upload = UploadedFile::new("links.docx", fs::read(path)?);
    let report = Extractor::new(None).process(&upload)?;

    assert_eq!(report.extraction, Extraction::Text("See the docs".into()));
    Ok(())
}

#[test]
fn scanned_pdf_ocrs_each_rendered_page() -> Result<()> {
    let extractor = Extractor::new(Some(Box::new(PageNameEngine)))
        .with_renderer(FakeRasterizer(vec![(400, 400), (50, 50), (400, 400)]));
    let upload = UploadedFile::new("scan.pdf", pdf_bytes(&[None, None, None])?);
    let report = extractor.process(&upload)?;

    assert_eq!(report.route, FileKind::Pdf);
    assert_eq!(
        report.rendered(),
        "--- Page 1 ---\npage-1 words\n\n--- Page 3 ---\npage-3 words"
    );
    assert_eq!(
        report.notices,
        vec![
            Notice::BestMethod {
                method: "Original PSM6"
            },
            Notice::LowResolution {
                width: 50,
                height: 50
            },
            Notice::BestMethod {
                method: "Original PSM6"
            },
        ]
    );
    Ok(())
}

#[test]
fn scanned_pdf_without_readable_pages_reports_no_text() -> Result<()> {
    let extractor =
        ocr_extractor("", " ", "\n").with_renderer(FakeRasterizer(vec![(400, 400), (400, 400)]));
    let upload = UploadedFile::new("scan.pdf", pdf_bytes(&[None, None])?);
    let report = extractor.process(&upload)?;

    assert_eq!(
        report.extraction,
        Extraction::Diagnostic(Diagnostic::NoTextInImage)
    );
    assert!(report.notices.is_empty());
    Ok(())
}

#[test]
fn scanned_pdf_falls_back_to_image_ocr_when_rendering_fails() -> Result<()> {
    let extractor = ocr_extractor("never", "used", "here").with_renderer(BrokenRasterizer);
    let upload = UploadedFile::new("scan.pdf", pdf_bytes(&[None])?);
    let report = extractor.process(&upload)?;

    assert_eq!(report.route, FileKind::Pdf);
    assert!(report
        .rendered()
        .starts_with("Error extracting from image:"));
    assert!(report.notices.is_empty());
    Ok(())
}

#[test]
fn small_image_warns_and_still_extracts() -> Result<()> {
    let extractor = ocr_extractor("", "", "");
    let upload = UploadedFile::new("tiny.png", png_bytes(50, 50)?);
    let report = extractor.process(&upload)?;

    assert_eq!(
        report.notices,
        vec![Notice::LowResolution {
            width: 50,
            height: 50
        }]
    );
    assert_eq!(
        report.rendered(),
        "No text found in the image. Try a clearer image with better contrast."
    );
    Ok(())
}

#[test]
fn image_keeps_longest_result() -> Result<()> {
    let extractor = ocr_extractor("block text", "  the automatic layout result  ", "sparse");
    let upload = UploadedFile::new("page.PNG", png_bytes(400, 320)?);
    let report = extractor.process(&upload)?;

    assert_eq!(report.route, FileKind::Image);
    assert_eq!(report.rendered(), "the automatic layout result");
    assert_eq!(
        report.notices,
        vec![Notice::BestMethod {
            method: "Auto PSM3"
        }]
    );
    Ok(())
}

#[test]
fn image_without_ocr_is_unavailable() -> Result<()> {
    let upload = UploadedFile::new("photo.jpg", png_bytes(10, 10)?);
    let report = Extractor::new(None).process(&upload)?;

    assert_eq!(
        report.rendered(),
        "Tesseract OCR is not installed. Please install it to extract text from images."
    );
    Ok(())
}

#[test]
fn text_round_trip_drops_invalid_bytes() -> Result<()> {
    let upload = UploadedFile::new("notes.txt", b"  line one\n\xffline two \n\n".to_vec());
    let report = Extractor::new(None).process(&upload)?;

    assert_eq!(report.extraction, Extraction::Text("line one\nline two".into()));
    Ok(())
}

#[test]
fn unsupported_extension_is_rejected() -> Result<()> {
    let extractor = ocr_extractor("never", "called", "here");
    let report = extractor.process(&UploadedFile::new("setup.exe", b"MZ".to_vec()))?;

    assert_eq!(report.route, FileKind::Unsupported("exe".into()));
    assert_eq!(report.rendered(), "Unsupported file type: exe");
    assert!(report.notices.is_empty());
    Ok(())
}

#[test]
fn route_depends_only_on_extension() -> Result<()> {
    let mut upload = UploadedFile::new("notes.txt", b"same bytes".to_vec());
    upload.mime_type = "application/pdf".into();
    let report = Extractor::new(None).process(&upload)?;

    assert_eq!(report.route, FileKind::Text);
    assert_eq!(report.rendered(), "same bytes");
    Ok(())
}

#[test]
fn artifact_is_named_after_upload() -> Result<()> {
    let out = tempfile::tempdir()?;
    let upload = UploadedFile::new("minutes.final.txt", b"agenda".to_vec());
    let report = Extractor::new(None).process(&upload)?;

    let path = TextExporter::new(out.path().to_path_buf()).export(&upload, &report)?;

    assert_eq!(path, out.path().join("minutes_extracted.txt"));
    assert_eq!(fs::read_to_string(path)?, "agenda");
    Ok(())
}
