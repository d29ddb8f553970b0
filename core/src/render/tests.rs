use super::*;
use crate::config::{ElementIds, HtmlPolicy, DEFAULT_ERROR_HTML};
use crate::error::{Error, FetchError};
use crate::source::StaticSource;
use crate::surface::MemoryDocument;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::io;
use std::sync::{Arc, Mutex};

struct FailingSource;

#[async_trait]
impl PreviewSource for FailingSource {
    async fn fetch(&self) -> Result<Value> {
        Err(Error::Fetch(FetchError::Network {
            url: "https://example.com/preview.json".to_string(),
            message: "connection reset by peer".to_string(),
        }))
    }

    fn describe(&self) -> String {
        "failing source".to_string()
    }
}

#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).to_string()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn record() -> Value {
    json!({
        "format_1": "csv",
        "format_2": "json",
        "content": "<h2>Convert CSV to JSON</h2><p>Fast.</p>",
        "comparison_table": { "headers": ["A", "B"], "rows": [["1", "2"], ["3", "4"]] },
        "faq": [
            { "question": "Is it free?", "answer": "Yes, <em>always</em>." },
            { "question": "Is it safe?", "answer": "Files are deleted." }
        ],
        "blog_ideas": [
            { "title": "Why JSON", "meta": "A primer" },
            { "title": "CSV pitfalls", "meta": "Quoting rules" },
            { "title": "Streaming", "meta": "Large files" }
        ],
        "use_cases": [
            { "name": "Analytics", "description": "Feed dashboards" }
        ]
    })
}

fn renderer() -> PageRenderer {
    PageRenderer::new(RenderConfig::default())
}

fn page() -> MemoryDocument {
    MemoryDocument::landing_page(&ElementIds::default()).unwrap()
}

async fn render_payload(payload: Value) -> (MemoryDocument, RenderOutcome) {
    let mut doc = page();
    let outcome = renderer().run(&StaticSource::new(payload), &mut doc).await;
    (doc, outcome)
}

fn by_id(doc: &MemoryDocument, id: &str) -> NodeId {
    doc.element_by_id(id).unwrap()
}

#[tokio::test]
async fn test_title_is_uppercased_with_arrow() {
    let mut payload = record();
    payload["format_1"] = json!("Csv");
    payload["format_2"] = json!("jSoN");
    let (doc, outcome) = render_payload(json!([payload])).await;

    assert!(outcome.is_rendered());
    assert_eq!(doc.text_content(by_id(&doc, "page-title")), "CSV → JSON converter");
}

#[tokio::test]
async fn test_empty_payload_replaces_body() {
    let (doc, outcome) = render_payload(json!([])).await;

    assert_eq!(outcome, RenderOutcome::Failed(FailureKind::Schema));
    assert_eq!(doc.body_html(), DEFAULT_ERROR_HTML);
    assert!(doc.element_by_id("page-title").is_none());
    assert!(doc.find_by_tag("table").is_empty());
    assert!(doc.find_by_class("accordion-item").is_empty());
    assert!(doc.find_by_class("card-link").is_empty());
}

#[tokio::test]
async fn test_comparison_table_shape() {
    let (doc, _) = render_payload(json!([record()])).await;

    let tables = doc.find_by_tag("table");
    assert_eq!(tables.len(), 1);
    let table = tables[0];
    assert!(doc.has_class(table, "comp-table"));

    let sections = doc.child_elements(table);
    assert_eq!(sections.len(), 2);
    assert_eq!(doc.tag(sections[0]), Some("thead"));
    assert_eq!(doc.tag(sections[1]), Some("tbody"));

    let head_rows = doc.child_elements(sections[0]);
    assert_eq!(head_rows.len(), 1);
    let headers: Vec<String> = doc
        .child_elements(head_rows[0])
        .into_iter()
        .map(|th| doc.text_content(th))
        .collect();
    assert_eq!(headers, vec!["A", "B"]);

    let body_rows: Vec<Vec<String>> = doc
        .child_elements(sections[1])
        .into_iter()
        .map(|tr| {
            doc.child_elements(tr)
                .into_iter()
                .map(|td| doc.text_content(td))
                .collect()
        })
        .collect();
    assert_eq!(body_rows, vec![vec!["1", "2"], vec!["3", "4"]]);
}

#[tokio::test]
async fn test_table_is_appended_after_content() {
    let (doc, _) = render_payload(json!([record()])).await;
    let content = by_id(&doc, "landing-content");

    let html = doc.inner_html(content);
    assert!(html.starts_with("<h2>Convert CSV to JSON</h2><p>Fast.</p>"));
    assert!(html.ends_with("</table>"));
}

#[tokio::test]
async fn test_table_cells_are_text() {
    let mut payload = record();
    payload["comparison_table"] = json!({ "headers": ["<b>A</b>"], "rows": [["<i>1</i>"]] });
    let (doc, _) = render_payload(json!([payload])).await;

    let html = doc.outer_html(doc.find_by_tag("table")[0]);
    assert!(html.contains("<th>&lt;b&gt;A&lt;/b&gt;</th>"));
    assert!(html.contains("<td>&lt;i&gt;1&lt;/i&gt;</td>"));
}

#[tokio::test]
async fn test_missing_or_null_table_renders_nothing() {
    let mut absent = record();
    absent.as_object_mut().unwrap().remove("comparison_table");
    let (doc, outcome) = render_payload(json!([absent])).await;
    assert!(outcome.is_rendered());
    assert!(doc.find_by_tag("table").is_empty());

    let mut null = record();
    null["comparison_table"] = Value::Null;
    let (doc, outcome) = render_payload(json!([null])).await;
    assert!(outcome.is_rendered());
    assert!(doc.find_by_tag("table").is_empty());
}

#[tokio::test]
async fn test_faq_items_toggle_independently() {
    let (mut doc, _) = render_payload(json!([record()])).await;

    let items = doc.find_by_class("accordion-item");
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|item| !doc.has_class(*item, "open")));

    let trigger = doc.find_by_class("accordion-button")[0];
    doc.click(trigger).unwrap();
    assert!(doc.has_class(items[0], "open"));
    assert!(!doc.has_class(items[1], "open"));

    let second = doc.find_by_class("accordion-button")[1];
    doc.click(second).unwrap();
    assert!(doc.has_class(items[0], "open"));
    assert!(doc.has_class(items[1], "open"));

    doc.click(trigger).unwrap();
    assert!(!doc.has_class(items[0], "open"));
    assert!(doc.has_class(items[1], "open"));
}

#[tokio::test]
async fn test_faq_item_structure() {
    let (doc, _) = render_payload(json!([record()])).await;

    let item = doc.find_by_class("accordion-item")[0];
    let children = doc.child_elements(item);
    assert_eq!(children.len(), 2);
    assert_eq!(doc.tag(children[0]), Some("button"));
    assert_eq!(doc.text_content(children[0]), "Is it free?");
    assert!(doc.has_class(children[1], "accordion-content"));
    assert_eq!(doc.inner_html(children[1]), "<p>Yes, <em>always</em>.</p>");
    assert_eq!(doc.element_by_id("faq").map(|f| doc.child_elements(f).len()), Some(2));
}

#[tokio::test]
async fn test_blog_cards_link_in_order() {
    let (doc, _) = render_payload(json!([record()])).await;

    let blogs = by_id(&doc, "blogs");
    let links = doc.child_elements(blogs);
    let hrefs: Vec<&str> = links
        .iter()
        .map(|link| doc.attribute(*link, "href").unwrap())
        .collect();
    assert_eq!(hrefs, vec!["blog_1.html", "blog_2.html", "blog_3.html"]);

    let card = doc.child_elements(links[1])[0];
    assert!(doc.has_class(card, "card"));
    assert_eq!(doc.inner_html(card), "<h3>CSV pitfalls</h3><p>Quoting rules</p>");
}

#[tokio::test]
async fn test_use_case_cards() {
    let (doc, _) = render_payload(json!([record()])).await;

    let links = doc.child_elements(by_id(&doc, "uses"));
    assert_eq!(links.len(), 1);
    assert_eq!(doc.attribute(links[0], "href"), Some("use_1.html"));
    assert!(doc.has_class(links[0], "card-link"));
    assert_eq!(doc.text_content(links[0]), "AnalyticsFeed dashboards");
}

#[tokio::test]
async fn test_card_text_decodes_entities() {
    let mut payload = record();
    payload["use_cases"] = json!([{ "name": "Q&A", "description": "a <b title=\"x>y\">b</b>" }]);
    let (doc, outcome) = render_payload(json!([payload])).await;

    assert!(outcome.is_rendered());
    let link = doc.child_elements(by_id(&doc, "uses"))[0];
    assert_eq!(doc.text_content(link), "Q&Aa b");
}

#[tokio::test]
async fn test_content_ids_cannot_capture_accordion_toggle() {
    let (doc, _) = render_payload(json!([record()])).await;
    let item = doc.find_by_class("accordion-item")[0];
    let anchor = doc.attribute(item, "id").unwrap().to_string();

    let mut payload = record();
    payload["content"] = json!(format!(r#"<div id="{}" class="x">evil</div>"#, anchor));
    let (mut doc, outcome) = render_payload(json!([payload])).await;
    assert!(outcome.is_rendered());

    let html = doc.body_html();
    assert_eq!(html.matches(&format!(r#"id="{}""#, anchor)).count(), 1);

    let item = doc.find_by_class("accordion-item")[0];
    assert_eq!(doc.attribute(item, "id"), Some(anchor.as_str()));
    let trigger = doc.find_by_class("accordion-button")[0];
    doc.click(trigger).unwrap();
    assert!(doc.has_class(item, "open"));
}

#[tokio::test]
async fn test_only_first_record_is_used() {
    let mut second = record();
    second["format_1"] = json!("xml");
    let (doc, _) = render_payload(json!([record(), second])).await;

    assert_eq!(doc.text_content(by_id(&doc, "page-title")), "CSV → JSON converter");
}

#[tokio::test]
async fn test_fetch_failure_is_logged_not_shown() {
    let logs = LogBuffer::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let mut doc = page();
    let outcome = renderer().run(&FailingSource, &mut doc).await;

    assert_eq!(outcome, RenderOutcome::Failed(FailureKind::Network));
    assert_eq!(doc.body_html(), DEFAULT_ERROR_HTML);
    assert!(!doc.body_html().contains("connection reset"));

    let logged = logs.contents();
    assert!(logged.contains("connection reset by peer"));
    assert!(logged.contains("kind=network"));
}

#[tokio::test]
async fn test_missing_host_element_fails_whole_page() {
    let mut doc = MemoryDocument::new();
    let title = doc.create_element("h1");
    doc.set_attribute(title, "id", "page-title").unwrap();
    doc.append_child(doc.body(), title).unwrap();
    let content = doc.create_element("div");
    doc.set_attribute(content, "id", "landing-content").unwrap();
    doc.append_child(doc.body(), content).unwrap();

    let outcome = renderer()
        .run(&StaticSource::new(json!([record()])), &mut doc)
        .await;

    assert_eq!(outcome, RenderOutcome::Failed(FailureKind::Render));
    assert_eq!(doc.body_html(), DEFAULT_ERROR_HTML);
}

#[tokio::test]
async fn test_malformed_record_fails_with_schema_kind() {
    let mut payload = record();
    payload.as_object_mut().unwrap().remove("faq");
    let (doc, outcome) = render_payload(json!([payload])).await;

    assert_eq!(outcome, RenderOutcome::Failed(FailureKind::Schema));
    assert_eq!(doc.body_html(), DEFAULT_ERROR_HTML);
}

#[tokio::test]
async fn test_content_policy_applies() {
    let mut payload = record();
    payload["content"] = json!("<p>hi</p><script>steal()</script>");

    let (doc, _) = render_payload(json!([payload.clone()])).await;
    let html = doc.inner_html(by_id(&doc, "landing-content"));
    assert!(html.starts_with("<p>hi</p>"));
    assert!(!html.contains("script"));

    let trusting = PageRenderer::new(RenderConfig::default().with_html_policy(HtmlPolicy::Trust));
    let mut doc = page();
    trusting
        .run(&StaticSource::new(json!([payload.clone()])), &mut doc)
        .await;
    assert!(doc
        .inner_html(by_id(&doc, "landing-content"))
        .contains("<script>steal()</script>"));

    let escaping = PageRenderer::new(RenderConfig::default().with_html_policy(HtmlPolicy::Escape));
    let mut doc = page();
    escaping
        .run(&StaticSource::new(json!([payload])), &mut doc)
        .await;
    assert!(doc
        .inner_html(by_id(&doc, "landing-content"))
        .starts_with("&lt;p&gt;hi&lt;/p&gt;"));
}

#[tokio::test]
async fn test_custom_ids_and_link_patterns() {
    let mut config = RenderConfig::default();
    config.elements.blogs = "articles".to_string();
    config.links.blog = "csv-to-json_blog_{n}.html".to_string();

    let mut doc = MemoryDocument::landing_page(&config.elements).unwrap();
    let outcome = PageRenderer::new(config)
        .run(&StaticSource::new(json!([record()])), &mut doc)
        .await;

    assert!(outcome.is_rendered());
    let first = doc.child_elements(by_id(&doc, "articles"))[0];
    assert_eq!(doc.attribute(first, "href"), Some("csv-to-json_blog_1.html"));
}
