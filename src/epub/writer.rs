//! Minimal EPUB 3 container writer.
//!
//! An EPUB is a zip archive whose first entry must be an uncompressed
//! `mimetype` file; everything else (container pointer, package document,
//! nav document, chapter XHTML, cover image) is deflated. Chapter bodies
//! arrive pre-assembled; only titles and metadata are escaped here.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::{slugify, ContainerError, ContainerWriter};
use crate::pipeline::assembly::Chapter;

pub struct EpubWriter;

impl ContainerWriter for EpubWriter {
    fn write_book(
        &self,
        title: &str,
        author: &str,
        cover: &Path,
        chapters: &[Chapter],
        out_dir: &Path,
    ) -> Result<PathBuf, ContainerError> {
        let cover_bytes = std::fs::read(cover).map_err(|e| ContainerError::CoverRead {
            path: cover.display().to_string(),
            reason: e.to_string(),
        })?;

        let out_path = out_dir.join(format!("{}.epub", slugify(title)));
        let write_err = |e: &dyn std::fmt::Display| ContainerError::Write {
            path: out_path.display().to_string(),
            reason: e.to_string(),
        };

        let file = File::create(&out_path).map_err(|e| write_err(&e))?;
        let mut zip = ZipWriter::new(file);
        let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        let deflated =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        // The mimetype entry must come first and uncompressed.
        zip.start_file("mimetype", stored).map_err(|e| write_err(&e))?;
        zip.write_all(b"application/epub+zip")
            .map_err(|e| write_err(&e))?;

        zip.start_file("META-INF/container.xml", deflated)
            .map_err(|e| write_err(&e))?;
        zip.write_all(container_xml().as_bytes())
            .map_err(|e| write_err(&e))?;

        zip.start_file("OEBPS/package.opf", deflated)
            .map_err(|e| write_err(&e))?;
        zip.write_all(package_opf(title, author, chapters).as_bytes())
            .map_err(|e| write_err(&e))?;

        zip.start_file("OEBPS/nav.xhtml", deflated)
            .map_err(|e| write_err(&e))?;
        zip.write_all(nav_xhtml(chapters).as_bytes())
            .map_err(|e| write_err(&e))?;

        zip.start_file("OEBPS/cover.png", deflated)
            .map_err(|e| write_err(&e))?;
        zip.write_all(&cover_bytes).map_err(|e| write_err(&e))?;

        for (i, chapter) in chapters.iter().enumerate() {
            zip.start_file(format!("OEBPS/chapter_{}.xhtml", i + 1), deflated)
                .map_err(|e| write_err(&e))?;
            zip.write_all(chapter_xhtml(chapter).as_bytes())
                .map_err(|e| write_err(&e))?;
        }

        zip.finish().map_err(|e| write_err(&e))?;

        tracing::info!(
            path = %out_path.display(),
            chapters = chapters.len(),
            "Container written"
        );
        Ok(out_path)
    }
}

fn container_xml() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/package.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>
"#
}

fn package_opf(title: &str, author: &str, chapters: &[Chapter]) -> String {
    let modified = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
    let mut manifest = String::new();
    let mut spine = String::new();
    for i in 1..=chapters.len() {
        manifest.push_str(&format!(
            "    <item id=\"chapter_{i}\" href=\"chapter_{i}.xhtml\" media-type=\"application/xhtml+xml\"/>\n"
        ));
        spine.push_str(&format!("    <itemref idref=\"chapter_{i}\"/>\n"));
    }

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="3.0" unique-identifier="pub-id">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
    <dc:identifier id="pub-id">urn:folio:{slug}</dc:identifier>
    <dc:title>{title}</dc:title>
    <dc:creator>{author}</dc:creator>
    <dc:language>en</dc:language>
    <meta property="dcterms:modified">{modified}</meta>
  </metadata>
  <manifest>
    <item id="nav" href="nav.xhtml" media-type="application/xhtml+xml" properties="nav"/>
    <item id="cover-image" href="cover.png" media-type="image/png" properties="cover-image"/>
{manifest}  </manifest>
  <spine>
{spine}  </spine>
</package>
"#,
        slug = escape_xml(&slugify(title)),
        title = escape_xml(title),
        author = escape_xml(author),
    )
}

fn nav_xhtml(chapters: &[Chapter]) -> String {
    let mut items = String::new();
    for (i, chapter) in chapters.iter().enumerate() {
        items.push_str(&format!(
            "      <li><a href=\"chapter_{}.xhtml\">{}</a></li>\n",
            i + 1,
            escape_xml(&chapter.title)
        ));
    }

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<html xmlns="http://www.w3.org/1999/xhtml" xmlns:epub="http://www.idpf.org/2007/ops">
<head><title>Contents</title></head>
<body>
  <nav epub:type="toc">
    <ol>
{items}    </ol>
  </nav>
</body>
</html>
"#
    )
}

fn chapter_xhtml(chapter: &Chapter) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<html xmlns="http://www.w3.org/1999/xhtml">
<head><title>{title}</title></head>
<body>
<h1>{title}</h1>
{body}</body>
</html>
"#,
        title = escape_xml(&chapter.title),
        body = chapter.body_html,
    )
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
