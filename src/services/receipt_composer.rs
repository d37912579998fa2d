//! 收据合成服务 - 业务能力层
//!
//! 把截图作为新的一页追加到收据 PDF 末尾，原地修改文件

use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use tracing::debug;

use crate::error::{RobotError, RobotResult};
use crate::models::{DocumentArtifact, ScreenshotArtifact};

/// A4 宽度（pt），收据没有 MediaBox 时使用
const DEFAULT_PAGE_WIDTH: f32 = 595.0;
/// 图片四周留白（pt）
const PAGE_MARGIN: f32 = 36.0;

#[derive(Debug, Default, Clone, Copy)]
pub struct ReceiptComposer;

impl ReceiptComposer {
    pub fn new() -> Self {
        Self
    }

    /// 合成最终收据，返回合成后的页数
    ///
    /// 原有页面顺序不变，截图在最后一页。任一文件不存在时返回
    /// `ArtifactMissing`，此时收据文件不会被修改。
    pub fn compose(
        &self,
        screenshot: &ScreenshotArtifact,
        document: &DocumentArtifact,
    ) -> RobotResult<usize> {
        for path in [&screenshot.path, &document.path] {
            if !path.is_file() {
                return Err(RobotError::ArtifactMissing { path: path.clone() });
            }
        }
        self.append_files_to_document(&[screenshot.path.as_path()], &document.path)
    }

    /// 依次把图片追加为 `target` 的新页面（追加，不覆盖）
    pub fn append_files_to_document(&self, files: &[&Path], target: &Path) -> RobotResult<usize> {
        let mut doc = Document::load(target).map_err(|e| RobotError::document(target, e))?;
        let pages_id = pages_root(&doc).map_err(|e| RobotError::document(target, e))?;
        let page_width = first_page_width(&doc).unwrap_or(DEFAULT_PAGE_WIDTH);

        for file in files {
            let image = image::open(file)
                .map_err(|e| RobotError::document(*file, e))?
                .to_rgb8();
            let (width, height) = image.dimensions();

            let image_id = doc.add_object(Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => width as i64,
                    "Height" => height as i64,
                    "ColorSpace" => "DeviceRGB",
                    "BitsPerComponent" => 8,
                },
                image.into_raw(),
            ));

            let draw_width = page_width - 2.0 * PAGE_MARGIN;
            let draw_height = draw_width * height as f32 / width.max(1) as f32;
            let page_height = draw_height + 2.0 * PAGE_MARGIN;

            let content = Content {
                operations: vec![
                    Operation::new("q", vec![]),
                    Operation::new(
                        "cm",
                        vec![
                            draw_width.into(),
                            0.into(),
                            0.into(),
                            draw_height.into(),
                            PAGE_MARGIN.into(),
                            PAGE_MARGIN.into(),
                        ],
                    ),
                    Operation::new("Do", vec![Object::Name(b"Im0".to_vec())]),
                    Operation::new("Q", vec![]),
                ],
            };
            let encoded = content
                .encode()
                .map_err(|e| RobotError::document(target, e))?;
            let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), page_width.into(), page_height.into()],
                "Contents" => content_id,
                "Resources" => dictionary! {
                    "XObject" => dictionary! { "Im0" => image_id },
                },
            });

            push_page(&mut doc, pages_id, page_id).map_err(|e| RobotError::document(target, e))?;
            debug!("已追加页面: {} → {}", file.display(), target.display());
        }

        doc.compress();
        doc.save(target).map_err(|e| RobotError::document(target, e))?;
        Ok(doc.get_pages().len())
    }
}

/// 读取 PDF 页数
pub fn page_count(path: &Path) -> RobotResult<usize> {
    let doc = Document::load(path).map_err(|e| RobotError::document(path, e))?;
    Ok(doc.get_pages().len())
}

fn pages_root(doc: &Document) -> lopdf::Result<ObjectId> {
    let root = doc.trailer.get(b"Root")?.as_reference()?;
    doc.get_dictionary(root)?.get(b"Pages")?.as_reference()
}

fn push_page(doc: &mut Document, pages_id: ObjectId, page_id: ObjectId) -> lopdf::Result<()> {
    let pages = doc.get_object_mut(pages_id)?.as_dict_mut()?;
    pages.get_mut(b"Kids")?.as_array_mut()?.push(page_id.into());
    let count = pages.get(b"Count")?.as_i64()?;
    pages.set("Count", count + 1);
    Ok(())
}

/// 第一页的宽度，MediaBox 可能继承自页面树
fn first_page_width(doc: &Document) -> Option<f32> {
    let first = *doc.get_pages().values().next()?;
    let media_box = doc
        .get_dictionary(first)
        .ok()
        .and_then(|page| page.get(b"MediaBox").ok())
        .or_else(|| {
            let pages = pages_root(doc).ok()?;
            doc.get_dictionary(pages).ok()?.get(b"MediaBox").ok()
        })?;
    let media_box = match media_box {
        Object::Reference(id) => doc.get_object(*id).ok()?,
        other => other,
    };
    let bounds = media_box.as_array().ok()?;
    let left = bounds.first()?.as_float().ok()?;
    let right = bounds.get(2)?.as_float().ok()?;
    Some(right - left).filter(|w| *w > 2.0 * PAGE_MARGIN)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    /// 生成一个只有文字的单页 PDF
    fn write_pdf(path: &Path, pages: usize) {
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
        for i in 0..pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![100.into(), 600.into()]),
                    Operation::new("Tj", vec![Object::string_literal(format!("Receipt {}", i))]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let pages_dict = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages_dict));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.save(path).unwrap();
    }

    fn write_png(path: &Path) {
        image::RgbImage::from_pixel(40, 20, image::Rgb([200, 30, 30]))
            .save(path)
            .unwrap();
    }

    fn artifacts(dir: &Path) -> (ScreenshotArtifact, DocumentArtifact) {
        (
            ScreenshotArtifact {
                order_number: "1".to_string(),
                path: dir.join("order_1.png"),
            },
            DocumentArtifact {
                order_number: "1".to_string(),
                path: dir.join("order_1.pdf"),
            },
        )
    }

    #[test]
    fn test_compose_adds_exactly_one_page() {
        let dir = tempfile::tempdir().unwrap();
        let (shot, doc) = artifacts(dir.path());
        write_pdf(&doc.path, 1);
        write_png(&shot.path);

        let before = page_count(&doc.path).unwrap();
        let after = ReceiptComposer::new().compose(&shot, &doc).unwrap();

        assert_eq!(before, 1);
        assert_eq!(after, 2);
        assert_eq!(page_count(&doc.path).unwrap(), 2);
    }

    #[test]
    fn test_screenshot_is_last_page() {
        let dir = tempfile::tempdir().unwrap();
        let (shot, doc) = artifacts(dir.path());
        write_pdf(&doc.path, 2);
        write_png(&shot.path);

        ReceiptComposer::new().compose(&shot, &doc).unwrap();

        let pdf = Document::load(&doc.path).unwrap();
        let pages = pdf.get_pages();
        assert_eq!(pages.len(), 3);

        let last = pdf.get_dictionary(pages[&3]).unwrap();
        let resources = last.get(b"Resources").unwrap().as_dict().unwrap();
        assert!(resources.get(b"XObject").is_ok());

        let first = pdf.get_dictionary(pages[&1]).unwrap();
        assert!(first.get(b"Resources").is_err());
    }

    #[test]
    fn test_missing_document_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let (shot, doc) = artifacts(dir.path());
        write_png(&shot.path);

        match ReceiptComposer::new().compose(&shot, &doc) {
            Err(RobotError::ArtifactMissing { path }) => assert_eq!(path, doc.path),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_missing_screenshot_leaves_document_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let (shot, doc) = artifacts(dir.path());
        write_pdf(&doc.path, 1);
        let before = std::fs::read(&doc.path).unwrap();

        let result = ReceiptComposer::new().compose(&shot, &doc);

        assert!(matches!(
            result,
            Err(RobotError::ArtifactMissing { ref path }) if *path == shot.path
        ));
        assert_eq!(std::fs::read(&doc.path).unwrap(), before);
    }

    #[test]
    fn test_page_count_of_missing_file_fails() {
        assert!(page_count(&PathBuf::from("nope/order_0.pdf")).is_err());
    }
}
