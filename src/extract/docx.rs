//! DOCX paragraph extraction.
//!
//! A DOCX file is a ZIP archive; the body lives in `word/document.xml` as
//! WordprocessingML. Each `<w:p>` element is a paragraph whose text is the
//! concatenation of its `<w:t>` runs, with `<w:tab/>` as a tab and
//! `<w:br/>`/`<w:cr/>` as a line break. Paragraph properties are dropped
//! first so tab stop definitions are not mistaken for tabs.
//!
//! Text boxes are anchored inside a run of their host paragraph and carry
//! paragraphs of their own, usually twice (`mc:Choice` plus a VML
//! `mc:Fallback`). They are removed before paragraphs are matched, so the
//! host paragraph keeps only its own runs.

use std::io::{Cursor, Read};
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::extract::error::{ExtractError, ExtractResult};

const DOCUMENT_PART: &str = "word/document.xml";

static RE_EMBEDDED_CONTENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?s)<w:txbxContent(?:\s[^>]*)?>.*?</w:txbxContent>|<mc:Fallback(?:\s[^>]*)?>.*?</mc:Fallback>",
    )
    .unwrap()
});

static RE_PARAGRAPH_PROPS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<w:pPr(?:\s[^>]*)?/>|<w:pPr(?:\s[^>]*)?>.*?</w:pPr>").unwrap()
});

static RE_PARAGRAPH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<w:p(?:\s[^>]*)?/>|<w:p(?:\s[^>]*)?>(.*?)</w:p>").unwrap()
});

static RE_RUN_CONTENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<w:t(?:\s[^>]*)?>([^<]*)</w:t>|(<w:tab(?:\s[^>]*)?/>)|<w:(?:br|cr)(?:\s[^>]*)?/>")
        .unwrap()
});

static RE_ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(lt|gt|quot|apos|amp|#[0-9]+|#x[0-9a-fA-F]+);").unwrap());

/// Extract the text of every body paragraph, in document order.
///
/// Empty paragraphs are kept as empty strings so that joining with `\n`
/// preserves the document's blank lines.
pub fn extract_paragraphs(data: &[u8]) -> ExtractResult<Vec<String>> {
    let xml = read_document_part(data)?;
    let xml = RE_EMBEDDED_CONTENT.replace_all(&xml, "");
    let xml = RE_PARAGRAPH_PROPS.replace_all(&xml, "");

    Ok(RE_PARAGRAPH
        .captures_iter(&xml)
        .map(|caps| caps.get(1).map(|m| paragraph_text(m.as_str())).unwrap_or_default())
        .collect())
}

fn read_document_part(data: &[u8]) -> ExtractResult<String> {
    let parse_error = |message: String| ExtractError::ParseError {
        format: "docx".into(),
        message,
    };

    let mut archive = zip::ZipArchive::new(Cursor::new(data))
        .map_err(|e| parse_error(format!("not a ZIP container: {e}")))?;
    let mut part = archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| parse_error(format!("{DOCUMENT_PART}: {e}")))?;

    let mut xml = String::new();
    part.read_to_string(&mut xml)
        .map_err(|e| parse_error(format!("read {DOCUMENT_PART}: {e}")))?;
    Ok(xml)
}

fn paragraph_text(inner: &str) -> String {
    let mut text = String::new();
    for caps in RE_RUN_CONTENT.captures_iter(inner) {
        if let Some(t) = caps.get(1) {
            text.push_str(&decode_entities(t.as_str()));
        } else if caps.get(2).is_some() {
            text.push('\t');
        } else {
            text.push('\n');
        }
    }
    text
}

fn decode_entities(s: &str) -> String {
    RE_ENTITY
        .replace_all(s, |caps: &Captures| match &caps[1] {
            "lt" => "<".to_string(),
            "gt" => ">".to_string(),
            "quot" => "\"".to_string(),
            "apos" => "'".to_string(),
            "amp" => "&".to_string(),
            num => {
                let code = match num.strip_prefix("#x") {
                    Some(hex) => u32::from_str_radix(hex, 16).ok(),
                    None => num[1..].parse().ok(),
                };
                code.and_then(char::from_u32)
                    .map(String::from)
                    .unwrap_or_else(|| caps[0].to_string())
            }
        })
        .into_owned()
}
