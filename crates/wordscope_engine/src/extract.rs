use ego_tree::NodeRef;
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    pub title: Option<String>,
    pub text: String,
}

pub trait TextExtractor: Send + Sync {
    fn extract(&self, html: &str) -> ExtractedText;
}

/// Whole-page visible text, the way a reader would copy it out of the browser:
/// - `<title>` is reported separately and also kept in the text
/// - `script`, `style`, `noscript`, `template` and `iframe` contents are dropped
/// - block elements start on a new line, runs of whitespace collapse to one space.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlTextExtractor;

impl TextExtractor for HtmlTextExtractor {
    fn extract(&self, html: &str) -> ExtractedText {
        let document = Html::parse_document(html);
        let title = Selector::parse("title")
            .ok()
            .and_then(|sel| {
                document
                    .select(&sel)
                    .next()
                    .map(|t| t.text().collect::<String>())
            })
            .map(|t| collapse_whitespace(&t))
            .filter(|t| !t.is_empty());

        let mut builder = TextBuilder::default();
        for child in document.root_element().children() {
            visit_node(child, &mut builder);
        }

        ExtractedText {
            title,
            text: builder.finish(),
        }
    }
}

/// Plain-text bodies pass through with whitespace normalised.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, text: &str) -> ExtractedText {
        let mut builder = TextBuilder::default();
        for line in text.lines() {
            builder.append_text(line);
            builder.ensure_newline();
        }
        ExtractedText {
            title: None,
            text: builder.finish(),
        }
    }
}

fn visit_node(node: NodeRef<'_, Node>, builder: &mut TextBuilder) {
    match node.value() {
        Node::Text(text) => builder.append_text(text),
        Node::Element(_) => {
            if let Some(element) = ElementRef::wrap(node) {
                visit_element(element, builder);
            }
        }
        _ => {
            for child in node.children() {
                visit_node(child, builder);
            }
        }
    }
}

fn visit_element(element: ElementRef<'_>, builder: &mut TextBuilder) {
    let tag = element.value().name().to_ascii_lowercase();
    match tag.as_str() {
        "script" | "style" | "noscript" | "iframe" | "template" => {}
        "br" | "hr" => builder.ensure_newline(),
        "p" | "div" | "section" | "article" | "header" | "footer" | "nav" | "aside" | "main"
        | "figure" | "figcaption" | "table" | "tr" | "td" | "th" | "blockquote" | "address"
        | "ul" | "ol" | "li" | "dl" | "dt" | "dd" | "pre" | "title" | "h1" | "h2" | "h3"
        | "h4" | "h5" | "h6" => {
            builder.ensure_newline();
            visit_children(element, builder);
            builder.ensure_newline();
        }
        _ => visit_children(element, builder),
    }
}

fn visit_children(element: ElementRef<'_>, builder: &mut TextBuilder) {
    for child in element.children() {
        visit_node(child, builder);
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[derive(Default)]
struct TextBuilder {
    out: String,
    last_char: Option<char>,
}

impl TextBuilder {
    fn append_text(&mut self, text: &str) {
        for ch in text.chars() {
            if ch.is_whitespace() {
                if matches!(self.last_char, None | Some(' ') | Some('\n')) {
                    continue;
                }
                self.push_char(' ');
            } else {
                self.push_char(ch);
            }
        }
    }

    fn ensure_newline(&mut self) {
        match self.last_char {
            None | Some('\n') => {}
            Some(' ') => {
                self.out.pop();
                self.push_char('\n');
            }
            Some(_) => self.push_char('\n'),
        }
    }

    fn push_char(&mut self, ch: char) {
        self.out.push(ch);
        self.last_char = Some(ch);
    }

    fn finish(self) -> String {
        self.out.trim().to_string()
    }
}
