//! Plain-text extraction from resume documents.
//!
//! PDF goes through `pdf-extract`; DOCX is unpacked as zipped XML and the
//! paragraph text of `word/document.xml` is collected. No OCR: documents
//! without a text layer yield empty output and are skipped upstream.

use anyhow::{bail, Context, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::Read;
use std::path::Path;

/// Returns true for the document types the resume scanner handles.
pub fn is_resume_file(path: &Path) -> bool {
    matches!(
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref(),
        Some("pdf") | Some("docx")
    )
}

/// Extracts the plain text of a resume, dispatching on the file extension.
pub fn extract_text(path: &Path) -> Result<String> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "pdf" => extract_pdf(path),
        "docx" => extract_docx(path),
        other => bail!("unsupported resume format '{other}'"),
    }
}

fn extract_pdf(path: &Path) -> Result<String> {
    pdf_extract::extract_text(path)
        .map_err(|e| anyhow::anyhow!("failed to extract PDF text from {}: {e}", path.display()))
}

fn extract_docx(path: &Path) -> Result<String> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let mut archive = zip::ZipArchive::new(file)
        .with_context(|| format!("{} is not a valid DOCX archive", path.display()))?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .context("DOCX archive has no word/document.xml")?
        .read_to_string(&mut xml)?;

    Ok(document_xml_to_text(&xml))
}

/// Collects the run text of a WordprocessingML document, one line per paragraph.
fn document_xml_to_text(xml: &str) -> String {
    let mut reader = Reader::from_str(xml);
    let mut text = String::new();
    let mut in_run_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"t" => in_run_text = true,
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_run_text = false,
                b"p" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Text(e)) if in_run_text => {
                if let Ok(run) = e.unescape() {
                    text.push_str(&run);
                }
            }
            Ok(Event::Eof) => break,
            // A truncated document still yields whatever text came before the damage.
            Err(_) => break,
            _ => {}
        }
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_is_resume_file_accepts_pdf_and_docx() {
        assert!(is_resume_file(&PathBuf::from("cv.pdf")));
        assert!(is_resume_file(&PathBuf::from("cv.DOCX")));
        assert!(!is_resume_file(&PathBuf::from("cv.txt")));
        assert!(!is_resume_file(&PathBuf::from("no_extension")));
    }

    #[test]
    fn test_document_xml_paragraphs_become_lines() {
        let xml = r#"<?xml version="1.0"?>
            <w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
              <w:body>
                <w:p><w:r><w:t>First line</w:t></w:r></w:p>
                <w:p><w:r><w:t>Second</w:t></w:r><w:r><w:t> line</w:t></w:r></w:p>
              </w:body>
            </w:document>"#;
        assert_eq!(document_xml_to_text(xml), "First line\nSecond line\n");
    }

    #[test]
    fn test_document_xml_ignores_non_run_text() {
        let xml = r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
            <w:body>ignored<w:p><w:r><w:t>kept</w:t></w:r></w:p></w:body>
        </w:document>"#;
        assert_eq!(document_xml_to_text(xml), "kept\n");
    }

    #[test]
    fn test_document_xml_unescapes_entities() {
        let xml = r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
            <w:body><w:p><w:r><w:t>C&amp;C engineer</w:t></w:r></w:p></w:body>
        </w:document>"#;
        assert_eq!(document_xml_to_text(xml), "C&C engineer\n");
    }

    #[test]
    fn test_unsupported_extension_is_an_error() {
        assert!(extract_text(&PathBuf::from("cv.txt")).is_err());
    }
}
