//! Loading document text from disk.

use std::path::{Path, PathBuf};

use anyhow::Context;
use lopdf::Document as PdfDocument;
use studymate_rag::Document;
use tracing::{debug, warn};

/// Read every file into one [`Document`] per file.
///
/// Files with a `.pdf` extension have their text layer extracted page by
/// page; everything else is read as UTF-8 text. The document id is the file
/// name and `source_uri` is the path as given.
pub fn load_documents(paths: &[PathBuf]) -> anyhow::Result<Vec<Document>> {
    paths.iter().map(|path| load_document(path)).collect()
}

fn load_document(path: &Path) -> anyhow::Result<Document> {
    let text = if is_pdf(path) {
        extract_pdf_text(path)?
    } else {
        std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?
    };
    let id = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    debug!(document.id = %id, chars = text.chars().count(), "loaded document");
    Ok(Document::new(id, text).with_source_uri(path.display().to_string()))
}

fn is_pdf(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

/// Concatenate the text of every page in page order, pages separated by a
/// blank line.
fn extract_pdf_text(path: &Path) -> anyhow::Result<String> {
    let pdf = PdfDocument::load(path)
        .with_context(|| format!("failed to parse PDF {}", path.display()))?;

    let mut pages = Vec::new();
    for page_number in pdf.get_pages().into_keys() {
        match pdf.extract_text(&[page_number]) {
            Ok(raw) => {
                let text = normalize_text(&raw);
                if !text.is_empty() {
                    pages.push(text);
                }
            }
            Err(e) => {
                warn!(path = %path.display(), page = page_number, error = %e, "skipping unreadable PDF page");
            }
        }
    }

    if pages.is_empty() {
        warn!(path = %path.display(), "PDF has no extractable text");
    }
    Ok(pages.join("\n\n"))
}

fn normalize_text(text: &str) -> String {
    text.lines().map(str::trim).filter(|line| !line.is_empty()).collect::<Vec<_>>().join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{Object, Stream, dictionary};

    /// Write a PDF with one line of Courier text per page.
    fn write_pdf(path: &Path, pages: &[&str]) {
        let mut pdf = PdfDocument::with_version("1.5");
        let pages_id = pdf.new_object_id();
        let font_id = pdf.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = pdf.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for text in pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id =
                pdf.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = pdf.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
            });
            kids.push(page_id.into());
        }

        let page_count = kids.len() as i64;
        pdf.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => page_count,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            }),
        );
        let catalog_id = pdf.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        pdf.trailer.set("Root", catalog_id);
        pdf.save(path).unwrap();
    }

    #[test]
    fn loads_text_files_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("sky.txt");
        let second = dir.path().join("water.md");
        std::fs::write(&first, "The sky is blue.").unwrap();
        std::fs::write(&second, "Water boils at 100C.").unwrap();

        let documents = load_documents(&[first.clone(), second]).unwrap();

        assert_eq!(documents.len(), 2);
        assert_eq!(documents[0].id, "sky.txt");
        assert_eq!(documents[0].text, "The sky is blue.");
        assert_eq!(documents[0].source_uri.as_deref(), Some(first.display().to_string().as_str()));
        assert_eq!(documents[1].id, "water.md");
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = load_documents(&[PathBuf::from("/definitely/not/here.txt")]).unwrap_err();
        assert!(err.to_string().contains("here.txt"));
    }

    #[test]
    fn pdf_pages_are_extracted_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.PDF");
        write_pdf(&path, &["The sky is blue.", "Water boils at 100C."]);

        let documents = load_documents(&[path]).unwrap();

        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].id, "notes.PDF");
        let text = &documents[0].text;
        let sky = text.find("The sky is blue.").expect("first page text");
        let water = text.find("Water boils at 100C.").expect("second page text");
        assert!(sky < water);
    }

    #[test]
    fn unparseable_pdf_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, "not a pdf").unwrap();

        let err = load_documents(&[path]).unwrap_err();
        assert!(err.to_string().contains("broken.pdf"));
    }

    #[test]
    fn normalize_drops_blank_lines_and_padding() {
        assert_eq!(normalize_text("  one \n\n\t two\n   \n"), "one\ntwo");
    }
}
