//! Loading input text from a user-selected file.
//!
//! Only plain text and markdown are read. PDF and Word documents are
//! recognised and rejected; nothing is ever partially extracted.

use std::path::Path;
use tokio::io::AsyncReadExt;
use tracing::{info, warn};

use crate::error::{SpeechError, UnsupportedFormat};

const SNIFF_LEN: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    PlainText,
    Markdown,
    Pdf,
    Word,
    Unknown,
}

impl DocumentKind {
    pub fn is_readable(self) -> bool {
        matches!(self, Self::PlainText | Self::Markdown)
    }
}

/// Classify by extension alone. `None` only when the path has no extension;
/// an extension outside the known list is [`DocumentKind::Unknown`].
pub fn classify_extension(path: &Path) -> Option<DocumentKind> {
    let ext = path.extension()?.to_string_lossy().to_ascii_lowercase();
    let kind = match ext.as_str() {
        "txt" | "text" => DocumentKind::PlainText,
        "md" | "markdown" => DocumentKind::Markdown,
        "pdf" => DocumentKind::Pdf,
        "doc" | "docx" | "rtf" => DocumentKind::Word,
        _ => DocumentKind::Unknown,
    };
    Some(kind)
}

/// Classify by leading bytes.
pub fn sniff(head: &[u8]) -> DocumentKind {
    const OLE_MAGIC: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

    if head.starts_with(b"%PDF-") {
        DocumentKind::Pdf
    } else if head.starts_with(b"{\\rtf") || head.starts_with(&OLE_MAGIC) {
        DocumentKind::Word
    } else if looks_like_text(head) {
        DocumentKind::PlainText
    } else {
        DocumentKind::Unknown
    }
}

fn looks_like_text(head: &[u8]) -> bool {
    if head.contains(&0) {
        return false;
    }
    match std::str::from_utf8(head) {
        Ok(_) => true,
        // a multi-byte character may be cut at the sniff boundary
        Err(e) => e.error_len().is_none(),
    }
}

fn rejection(kind: DocumentKind, path: &Path) -> UnsupportedFormat {
    match kind {
        DocumentKind::Pdf => UnsupportedFormat::Pdf,
        DocumentKind::Word => UnsupportedFormat::Word,
        _ => UnsupportedFormat::Other {
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        },
    }
}

/// Read a text or markdown file. Other formats fail with
/// [`SpeechError::UnsupportedFormat`]. An extension decides the format
/// without touching the file; extensionless files have their leading bytes
/// sniffed first.
pub async fn load_text(path: &Path) -> Result<String, SpeechError> {
    let io_error = |source: std::io::Error| SpeechError::UploadIo {
        path: path.to_path_buf(),
        source,
    };

    let kind = match classify_extension(path) {
        Some(kind) => kind,
        None => sniff(&read_head(path).await.map_err(io_error)?),
    };

    if !kind.is_readable() {
        warn!(path = %path.display(), ?kind, "rejected upload");
        return Err(rejection(kind, path).into());
    }

    let bytes = tokio::fs::read(path).await.map_err(io_error)?;
    let text = String::from_utf8(bytes).map_err(|e| {
        io_error(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    })?;

    info!(path = %path.display(), chars = text.chars().count(), ?kind, "loaded text");
    Ok(text)
}

async fn read_head(path: &Path) -> std::io::Result<Vec<u8>> {
    let file = tokio::fs::File::open(path).await?;
    let mut head = Vec::with_capacity(SNIFF_LEN);
    file.take(SNIFF_LEN as u64).read_to_end(&mut head).await?;
    Ok(head)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    #[rstest]
    #[case("notes.txt", Some(DocumentKind::PlainText))]
    #[case("README.MD", Some(DocumentKind::Markdown))]
    #[case("doc.pdf", Some(DocumentKind::Pdf))]
    #[case("letter.docx", Some(DocumentKind::Word))]
    #[case("old.doc", Some(DocumentKind::Word))]
    #[case("fancy.rtf", Some(DocumentKind::Word))]
    #[case("image.png", Some(DocumentKind::Unknown))]
    #[case("page.html", Some(DocumentKind::Unknown))]
    #[case("Makefile", None)]
    fn classifies_by_extension(#[case] name: &str, #[case] expected: Option<DocumentKind>) {
        assert_eq!(classify_extension(Path::new(name)), expected);
    }

    #[test]
    fn sniffs_magic_bytes() {
        assert_eq!(sniff(b"%PDF-1.7\n..."), DocumentKind::Pdf);
        assert_eq!(sniff(b"{\\rtf1\\ansi"), DocumentKind::Word);
        assert_eq!(
            sniff(&[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1, 0x00]),
            DocumentKind::Word
        );
        assert_eq!(sniff("plain words".as_bytes()), DocumentKind::PlainText);
        assert_eq!(sniff(&[0x89, b'P', b'N', b'G', 0x00]), DocumentKind::Unknown);
    }

    #[test]
    fn sniff_tolerates_truncated_utf8() {
        let text = "héllo".as_bytes();
        assert_eq!(sniff(&text[..2]), DocumentKind::PlainText);
    }

    #[tokio::test]
    async fn pdf_is_rejected_without_reading() {
        // the file does not even exist, so any read would surface as UploadIo
        let err = load_text(Path::new("/nonexistent/doc.pdf"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SpeechError::UnsupportedFormat(UnsupportedFormat::Pdf)
        ));
    }

    #[tokio::test]
    async fn word_documents_are_rejected() {
        let err = load_text(Path::new("report.docx")).await.unwrap_err();
        assert!(matches!(
            err,
            SpeechError::UnsupportedFormat(UnsupportedFormat::Word)
        ));
    }

    #[tokio::test]
    async fn reads_text_and_markdown() {
        let temp_dir = TempDir::new().unwrap();
        let txt = temp_dir.path().join("a.txt");
        let md = temp_dir.path().join("b.md");
        std::fs::write(&txt, "hello world").unwrap();
        std::fs::write(&md, "# Title\n\nbody").unwrap();

        assert_eq!(load_text(&txt).await.unwrap(), "hello world");
        assert_eq!(load_text(&md).await.unwrap(), "# Title\n\nbody");
    }

    #[tokio::test]
    async fn extensionless_files_are_sniffed() {
        let temp_dir = TempDir::new().unwrap();
        let text = temp_dir.path().join("NOTES");
        let pdf = temp_dir.path().join("scan");
        let binary = temp_dir.path().join("blob");
        std::fs::write(&text, "just text").unwrap();
        std::fs::write(&pdf, b"%PDF-1.4 rest").unwrap();
        std::fs::write(&binary, [0u8, 1, 2, 3]).unwrap();

        assert_eq!(load_text(&text).await.unwrap(), "just text");
        assert!(matches!(
            load_text(&pdf).await.unwrap_err(),
            SpeechError::UnsupportedFormat(UnsupportedFormat::Pdf)
        ));
        assert!(matches!(
            load_text(&binary).await.unwrap_err(),
            SpeechError::UnsupportedFormat(UnsupportedFormat::Other { name }) if name == "blob"
        ));
    }

    #[rstest]
    #[case("page.html", "<html><body>hi</body></html>")]
    #[case("data.json", "{\"a\": 1}")]
    #[case("sheet.csv", "a,b\n1,2")]
    #[case("blob.bin", "readable but not text/plain")]
    #[tokio::test]
    async fn unknown_extensions_are_rejected_even_when_readable(
        #[case] name: &str,
        #[case] contents: &str,
    ) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(name);
        std::fs::write(&path, contents).unwrap();

        assert!(matches!(
            load_text(&path).await.unwrap_err(),
            SpeechError::UnsupportedFormat(UnsupportedFormat::Other { name: rejected }) if rejected == name
        ));
    }

    #[tokio::test]
    async fn long_extensionless_text_is_read_in_full() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("CHAPTER");
        let body = "word ".repeat(SNIFF_LEN);
        std::fs::write(&path, &body).unwrap();

        let text = load_text(&path).await.unwrap();
        assert_eq!(text.len(), body.len());
        assert!(text.len() > SNIFF_LEN);
    }

    #[tokio::test]
    async fn missing_text_file_is_an_io_error() {
        let err = load_text(Path::new("/nonexistent/notes.txt"))
            .await
            .unwrap_err();
        assert!(matches!(err, SpeechError::UploadIo { .. }));
    }

    #[tokio::test]
    async fn invalid_utf8_is_an_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.txt");
        std::fs::write(&path, [0xffu8, 0xfe, 0xfd]).unwrap();

        assert!(matches!(
            load_text(&path).await.unwrap_err(),
            SpeechError::UploadIo { .. }
        ));
    }
}
