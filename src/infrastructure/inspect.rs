use async_trait::async_trait;

use crate::application::ports::{InspectError, PageCounter};
use crate::domain::value_objects::FileKind;

/// How far into the payload the PDF header may sit. The format permits
/// leading junk before `%PDF-`; readers conventionally scan the first 1KB.
const PDF_HEADER_WINDOW: usize = 1024;

/// Byte-level structural probe for PDF and JPEG payloads.
///
/// Counts pages without rendering anything: a JPEG is always one page, a PDF
/// contributes one page per page object in its page tree. Payloads that do
/// not carry the declared format's signature are rejected as corrupt.
pub struct DocumentProbe;

impl DocumentProbe {
    fn probe_jpeg(payload: &[u8]) -> Result<u32, InspectError> {
        // SOI marker
        if payload.len() < 4 || payload[0] != 0xFF || payload[1] != 0xD8 {
            return Err(InspectError::Corrupt(
                "missing JPEG start-of-image marker".to_string(),
            ));
        }

        Ok(1)
    }

    fn probe_pdf(payload: &[u8]) -> Result<u32, InspectError> {
        let window = &payload[..payload.len().min(PDF_HEADER_WINDOW)];
        if find(window, b"%PDF-").is_none() {
            return Err(InspectError::Corrupt("missing %PDF- header".to_string()));
        }

        let pages = count_page_objects(payload);
        if pages == 0 {
            return Err(InspectError::Corrupt(
                "no page objects in document".to_string(),
            ));
        }

        Ok(pages)
    }
}

#[async_trait]
impl PageCounter for DocumentProbe {
    async fn count_pages(&self, kind: FileKind, payload: &[u8]) -> Result<u32, InspectError> {
        match kind {
            FileKind::Jpeg => Self::probe_jpeg(payload),
            FileKind::Pdf => Self::probe_pdf(payload),
        }
    }
}

/// Count `/Type /Page` dictionary entries, excluding the `/Pages` tree nodes
fn count_page_objects(data: &[u8]) -> u32 {
    let mut count = 0u32;
    let mut offset = 0;

    while let Some(pos) = find(&data[offset..], b"/Type") {
        let abs = offset + pos;
        let mut cursor = abs + b"/Type".len();

        while cursor < data.len() && data[cursor].is_ascii_whitespace() {
            cursor += 1;
        }

        if data[cursor..].starts_with(b"/Page") && data.get(cursor + 5) != Some(&b's') {
            count += 1;
        }

        offset = abs + b"/Type".len();
    }

    count
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
