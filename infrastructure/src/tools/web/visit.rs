//! visit_webpage tool: fetch a URL and return its content as Markdown

use async_trait::async_trait;
use regex::Regex;
use scraper::{ElementRef, Html, Node};
use std::sync::LazyLock;
use std::time::Duration;
use toolloop_domain::tool::{
    entities::{ToolArguments, ToolDefinition, ToolParameter},
    handler::{ToolHandler, ToolHandlerError},
};
use tracing::info;

/// Tool name constant
pub const VISIT_WEBPAGE: &str = "visit_webpage";

/// Maximum response body size (5 MB)
pub const MAX_BODY_SIZE: usize = 5 * 1024 * 1024;

/// Tags whose entire subtree is dropped
const SKIP_TAGS: [&str; 6] = ["script", "style", "noscript", "svg", "head", "template"];

static BLANK_LINE_RUNS: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"\n{3,}"));

/// Get the tool definition for visit_webpage
pub fn visit_webpage_definition() -> ToolDefinition {
    ToolDefinition::new(
        VISIT_WEBPAGE,
        "Visits a webpage at the given URL and returns its content as a markdown string.",
    )
    .with_parameter(ToolParameter::new("url", "The URL of the webpage to visit.", true))
}

/// Handler for visit_webpage
pub struct VisitWebpage {
    http: reqwest::Client,
    user_agent: String,
    max_body_size: usize,
}

impl VisitWebpage {
    pub fn new(timeout: Duration, user_agent: impl Into<String>) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            user_agent: user_agent.into(),
            max_body_size: MAX_BODY_SIZE,
        })
    }

    pub fn with_max_body_size(mut self, max_body_size: usize) -> Self {
        self.max_body_size = max_body_size;
        self
    }

    /// Stream the body, failing as soon as it exceeds the size cap.
    ///
    /// Content-Length is checked up front, but chunked responses carry none.
    async fn read_body(&self, mut response: reqwest::Response) -> Result<String, ToolHandlerError> {
        if response.content_length().unwrap_or(0) > self.max_body_size as u64 {
            return Err(self.too_large());
        }

        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| ToolHandlerError::failed(format!("Failed to read response body: {}", e)))?
        {
            if body.len() + chunk.len() > self.max_body_size {
                return Err(self.too_large());
            }
            body.extend_from_slice(&chunk);
        }

        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    fn too_large(&self) -> ToolHandlerError {
        ToolHandlerError::failed(format!(
            "Response too large (max: {} bytes)",
            self.max_body_size
        ))
    }
}

#[async_trait]
impl ToolHandler for VisitWebpage {
    async fn invoke(
        &self,
        arguments: &ToolArguments,
    ) -> Result<serde_json::Value, ToolHandlerError> {
        let url = arguments
            .get("url")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ToolHandlerError::failed("Missing url"))?;

        info!(url, "Visiting webpage");
        let response = self
            .http
            .get(url)
            .header("User-Agent", &self.user_agent)
            .send()
            .await
            .map_err(|e| ToolHandlerError::failed(format!("Error fetching the webpage: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ToolHandlerError::Upstream {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body = self.read_body(response).await?;

        let markdown = html_to_markdown(&body);
        info!(lines = markdown.lines().count(), "Converted webpage to markdown");
        Ok(serde_json::Value::String(markdown))
    }
}

/// Convert an HTML document to Markdown.
///
/// Headings, paragraphs, lists, links, emphasis and code blocks are kept;
/// scripts, styles and the document head are dropped. Runs of three or more
/// newlines collapse to a single blank line.
pub fn html_to_markdown(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut out = String::new();
    render_children(document.root_element(), &mut out);

    let trimmed_lines = out.lines().map(str::trim_end).collect::<Vec<_>>().join("\n");
    collapse_blank_lines(trimmed_lines.trim())
}

/// Replace runs of three or more newlines with exactly two
pub fn collapse_blank_lines(text: &str) -> String {
    match BLANK_LINE_RUNS.as_ref() {
        Ok(re) => re.replace_all(text, "\n\n").into_owned(),
        Err(_) => text.to_string(),
    }
}

fn render_children(element: ElementRef, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => push_text(out, text),
            Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    render_element(child_el, out);
                }
            }
            _ => {}
        }
    }
}

fn render_element(element: ElementRef, out: &mut String) {
    let tag = element.value().name();
    if SKIP_TAGS.contains(&tag) {
        return;
    }

    match tag {
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
            let level = tag[1..].parse::<usize>().unwrap_or(1);
            let text = inline_markdown(element);
            out.push_str("\n\n");
            out.push_str(&"#".repeat(level));
            out.push(' ');
            out.push_str(&text);
            out.push_str("\n\n");
        }
        "p" | "div" | "section" | "article" | "header" | "footer" | "main" | "nav" | "aside"
        | "blockquote" | "table" | "tr" | "ul" | "ol" | "dl" => {
            out.push_str("\n\n");
            render_children(element, out);
            out.push_str("\n\n");
        }
        "li" => {
            out.push('\n');
            out.push_str(&list_marker(element));
            render_children(element, out);
        }
        "br" => out.push('\n'),
        "hr" => out.push_str("\n\n---\n\n"),
        "pre" => {
            let code: String = element.text().collect();
            out.push_str("\n\n```\n");
            out.push_str(code.trim_matches('\n'));
            out.push_str("\n```\n\n");
        }
        "a" => {
            let text = inline_markdown(element);
            match element.value().attr("href") {
                Some(href) if !href.is_empty() && !text.is_empty() => {
                    push_inline(out, &format!("[{}]({})", text, href));
                }
                _ => push_inline(out, &text),
            }
        }
        "strong" | "b" => wrap_inline(element, out, "**"),
        "em" | "i" => wrap_inline(element, out, "*"),
        "code" => wrap_inline(element, out, "`"),
        "td" | "th" => {
            render_children(element, out);
            out.push(' ');
        }
        _ => render_children(element, out),
    }
}

fn list_marker(item: ElementRef) -> String {
    let ordered = item
        .parent()
        .and_then(ElementRef::wrap)
        .is_some_and(|parent| parent.value().name() == "ol");

    if ordered {
        let position = item
            .prev_siblings()
            .filter_map(ElementRef::wrap)
            .filter(|sibling| sibling.value().name() == "li")
            .count()
            + 1;
        format!("{}. ", position)
    } else {
        "- ".to_string()
    }
}

fn inline_markdown(element: ElementRef) -> String {
    let mut inner = String::new();
    render_children(element, &mut inner);
    inner.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn wrap_inline(element: ElementRef, out: &mut String, marker: &str) {
    let text = inline_markdown(element);
    if !text.is_empty() {
        push_inline(out, &format!("{marker}{text}{marker}"));
    }
}

fn push_inline(out: &mut String, text: &str) {
    if text.is_empty() {
        return;
    }
    if !out.is_empty() && !out.ends_with(char::is_whitespace) && !text.starts_with([',', '.', ';', ':', ')']) {
        out.push(' ');
    }
    out.push_str(text);
}

/// Append a text node, collapsing its internal whitespace
fn push_text(out: &mut String, text: &str) {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let leading = text.starts_with(char::is_whitespace);
    let trailing = text.ends_with(char::is_whitespace);

    if collapsed.is_empty() {
        if leading && !out.is_empty() && !out.ends_with(char::is_whitespace) {
            out.push(' ');
        }
        return;
    }

    if leading && !out.is_empty() && !out.ends_with(char::is_whitespace) {
        out.push(' ');
    }
    out.push_str(&collapsed);
    if trailing {
        out.push(' ');
    }
}
