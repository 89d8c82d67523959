//! HTML link extraction
//!
//! Finds the `href` of every anchor start tag in a document and resolves it
//! against the document's own URL. Extraction works on the token stream and
//! never builds a tree, so every link maps to exactly one `<a>` tag in the
//! source.

use crate::url::resolve_href;
use crate::UrlResult;
use html5ever::tendril::StrTendril;
use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, Tag, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};
use url::Url;

/// Collects the `href` of each `<a>` start tag in token order
#[derive(Default)]
struct AnchorSink {
    hrefs: Vec<String>,
}

impl AnchorSink {
    fn start_tag(&mut self, tag: &Tag) -> TokenSinkResult<()> {
        match &*tag.name {
            "a" => {
                if let Some(href) = tag.attrs.iter().find(|attr| &*attr.name.local == "href") {
                    self.hrefs.push(href.value.to_string());
                }
                TokenSinkResult::Continue
            }
            // Text inside these elements is not markup.
            "script" => TokenSinkResult::RawData(RawKind::ScriptData),
            "style" | "xmp" | "iframe" | "noembed" | "noframes" | "noscript" => {
                TokenSinkResult::RawData(RawKind::Rawtext)
            }
            "title" | "textarea" => TokenSinkResult::RawData(RawKind::Rcdata),
            "plaintext" => TokenSinkResult::Plaintext,
            _ => TokenSinkResult::Continue,
        }
    }
}

impl TokenSink for AnchorSink {
    type Handle = ();

    fn process_token(&mut self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        match token {
            Token::TagToken(tag) if tag.kind == TagKind::StartTag => self.start_tag(&tag),
            _ => TokenSinkResult::Continue,
        }
    }
}

/// Runs the tokenizer over `html` and returns the raw anchor hrefs
fn anchor_hrefs(html: &str) -> Vec<String> {
    let mut tokenizer = Tokenizer::new(AnchorSink::default(), TokenizerOpts::default());

    let mut input = BufferQueue::new();
    input.push_back(StrTendril::from_slice(html));
    let _ = tokenizer.feed(&mut input);
    tokenizer.end();

    tokenizer.sink.hrefs
}

/// Extracts all anchor links from an HTML document
///
/// # Extraction Rules
///
/// - Every `<a href="...">` start tag contributes one URL, in document order
/// - Hrefs starting with `#` (same-page fragments) are skipped
/// - Everything else is resolved against `base`, whatever its scheme
///   (`mailto:`, `javascript:` and friends are returned as resolved)
/// - Duplicates are kept; deduplication belongs to the coordinator
/// - Tags inside `<script>`, `<style>` and other raw-text elements are text,
///   not anchors
///
/// The markup need not be well-formed and the bytes need not be valid
/// UTF-8; the tokenizer recovers from both and whatever anchors it finds
/// are returned. Unclosed anchors are not repaired or duplicated.
///
/// # Arguments
///
/// * `body` - The raw response body
/// * `base` - The URL the document was fetched from
///
/// # Returns
///
/// * `Ok(Vec<Url>)` - The resolved links
/// * `Err(UrlError)` - An href could not be resolved; extraction stops at
///   the first such href and nothing collected so far is returned
///
/// # Example
///
/// ```
/// use linkwalk::crawler::extract_links;
/// use url::Url;
///
/// let html = br##"<a href="#top">Top</a><a href="/docs">Docs</a>"##;
/// let base = Url::parse("https://example.com/index.html").unwrap();
/// let links = extract_links(html, &base).unwrap();
/// assert_eq!(links.len(), 1);
/// assert_eq!(links[0].as_str(), "https://example.com/docs");
/// ```
pub fn extract_links(body: &[u8], base: &Url) -> UrlResult<Vec<Url>> {
    let html = String::from_utf8_lossy(body);

    let mut links = Vec::new();
    for href in anchor_hrefs(&html) {
        if href.starts_with('#') {
            continue;
        }
        links.push(resolve_href(base, &href)?);
    }

    Ok(links)
}
