//! Binary-document decoding: PDF and DOCX byte buffers to plain text.
//!
//! A document with no extractable text layer yields an empty string, not an
//! error; the caller's minimum-length gate decides what to do with it.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;

use super::{ExtractError, MediaType};

/// Decodes the buffer according to the declared media type and returns the
/// concatenated text in document order.
pub fn extract_text(media_type: MediaType, data: &[u8]) -> Result<String, ExtractError> {
    match media_type {
        MediaType::Pdf => extract_pdf(data),
        MediaType::Docx => extract_docx(data),
    }
}

fn extract_pdf(data: &[u8]) -> Result<String, ExtractError> {
    pdf_extract::extract_text_from_mem(data).map_err(|e| ExtractError::Decode(e.to_string()))
}

/// A .docx file is a ZIP container; the document body lives in
/// `word/document.xml` as runs of `<w:t>` text inside `<w:p>` paragraphs.
fn extract_docx(data: &[u8]) -> Result<String, ExtractError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(data))
        .map_err(|e| ExtractError::Decode(format!("not a valid DOCX container: {e}")))?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|_| ExtractError::Decode("DOCX container has no word/document.xml".to_string()))?
        .read_to_string(&mut xml)
        .map_err(|e| ExtractError::Decode(format!("unreadable document part: {e}")))?;

    document_xml_text(&xml)
}

fn document_xml_text(xml: &str) -> Result<String, ExtractError> {
    let mut reader = Reader::from_str(xml);
    let mut out = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"w:t" => in_text_run = true,
            Ok(Event::End(e)) if e.name().as_ref() == b"w:t" => in_text_run = false,
            Ok(Event::End(e)) if e.name().as_ref() == b"w:p" => out.push('\n'),
            Ok(Event::Text(t)) if in_text_run => {
                let text = t
                    .unescape()
                    .map_err(|e| ExtractError::Decode(format!("malformed document XML: {e}")))?;
                out.push_str(&text);
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(ExtractError::Decode(format!("malformed document XML: {e}")));
            }
        }
    }

    Ok(out.trim().to_string())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use zip::write::FileOptions;

    use super::*;

    const DOCUMENT_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>Ada Lovelace</w:t></w:r></w:p>
    <w:p><w:r><w:t>Analyst &amp; Engineer</w:t><w:t xml:space="preserve"> at Babbage Ltd</w:t></w:r></w:p>
  </w:body>
</w:document>"#;

    fn docx_fixture(document_xml: &str) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut buf);
            writer
                .start_file("word/document.xml", FileOptions::default())
                .unwrap();
            writer.write_all(document_xml.as_bytes()).unwrap();
            writer.finish().unwrap();
        }
        buf.into_inner()
    }

    #[test]
    fn test_document_xml_text_joins_runs_and_paragraphs() {
        let text = document_xml_text(DOCUMENT_XML).unwrap();
        assert_eq!(text, "Ada Lovelace\nAnalyst & Engineer at Babbage Ltd");
    }

    #[test]
    fn test_docx_extraction_from_container() {
        let data = docx_fixture(DOCUMENT_XML);
        let text = extract_text(MediaType::Docx, &data).unwrap();
        assert!(text.contains("Ada Lovelace"));
        assert!(text.contains("Babbage Ltd"));
    }

    #[test]
    fn test_docx_without_text_layer_is_empty_not_error() {
        let data = docx_fixture(
            r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body/></w:document>"#,
        );
        let text = extract_text(MediaType::Docx, &data).unwrap();
        assert!(text.is_empty());
    }

    #[test]
    fn test_garbage_bytes_fail_decode() {
        let err = extract_text(MediaType::Docx, b"definitely not a zip").unwrap_err();
        assert!(matches!(err, ExtractError::Decode(_)));
    }
}
