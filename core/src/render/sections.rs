//! Node builders for the repeated page sections

use crate::error::Result;
use crate::preview::{ComparisonTable, FaqEntry};
use crate::sanitize::HtmlSanitizer;
use crate::surface::{NodeId, Surface};

/// Class toggled on an accordion item when its trigger is clicked
pub(crate) const OPEN_CLASS: &str = "open";

/// `table.comp-table` with a single header row and one body row per data row;
/// every cell is text
pub(crate) fn comparison_table<S: Surface + ?Sized>(
    surface: &mut S,
    table: &ComparisonTable,
) -> Result<NodeId> {
    let tbl = surface.create_element("table");
    surface.add_class(tbl, "comp-table")?;

    let thead = surface.create_element("thead");
    let head_row = surface.create_element("tr");
    for header in &table.headers {
        let th = surface.create_element("th");
        surface.set_text(th, header)?;
        surface.append_child(head_row, th)?;
    }
    surface.append_child(thead, head_row)?;
    surface.append_child(tbl, thead)?;

    let tbody = surface.create_element("tbody");
    for row in &table.rows {
        let tr = surface.create_element("tr");
        for cell in row {
            let td = surface.create_element("td");
            surface.set_text(td, cell)?;
            surface.append_child(tr, td)?;
        }
        surface.append_child(tbody, tr)?;
    }
    surface.append_child(tbl, tbody)?;

    Ok(tbl)
}

/// Collapsible question/answer item, initially closed
pub(crate) fn accordion_item<S: Surface + ?Sized>(
    surface: &mut S,
    sanitizer: &HtmlSanitizer,
    entry: &FaqEntry,
) -> Result<NodeId> {
    let item = surface.create_element("div");
    surface.add_class(item, "accordion-item")?;

    let button = surface.create_element("button");
    surface.add_class(button, "accordion-button")?;
    surface.set_attribute(button, "type", "button")?;
    surface.set_text(button, &entry.question)?;
    surface.on_click_toggle_class(button, item, OPEN_CLASS)?;

    let body = surface.create_element("div");
    surface.add_class(body, "accordion-content")?;
    surface.set_inner_html(body, &format!("<p>{}</p>", sanitizer.prepare(&entry.answer)))?;

    surface.append_child(item, button)?;
    surface.append_child(item, body)?;
    Ok(item)
}

/// `a.card-link` wrapping a `div.card` with a heading and a paragraph
pub(crate) fn card_link<S: Surface + ?Sized>(
    surface: &mut S,
    sanitizer: &HtmlSanitizer,
    href: &str,
    heading: &str,
    text: &str,
) -> Result<NodeId> {
    let link = surface.create_element("a");
    surface.add_class(link, "card-link")?;
    surface.set_attribute(link, "href", href)?;

    let card = surface.create_element("div");
    surface.add_class(card, "card")?;
    surface.set_inner_html(
        card,
        &format!(
            "<h3>{}</h3><p>{}</p>",
            sanitizer.prepare(heading),
            sanitizer.prepare(text)
        ),
    )?;

    surface.append_child(link, card)?;
    Ok(link)
}
