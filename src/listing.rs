use crate::docs::DocRef;
use scraper::{Html, Selector};
use url::Url;

/// Extracts the `(value, text)` option pairs of a select element.
///
/// Placeholder options with an empty value are skipped.
pub fn dropdown_options(html: &str, select_id: &str) -> Vec<(String, String)> {
    let doc = Html::parse_document(html);

    let selector = match Selector::parse(&format!("select[id=\"{}\"] option", select_id)) {
        Ok(s) => s,
        Err(_) => {
            ::log::warn!("select id produced an invalid selector: {}", select_id);
            return Vec::new();
        }
    };

    doc.select(&selector)
        .filter_map(|option| {
            let value = option.value().attr("value")?.trim().to_string();
            if value.is_empty() {
                return None;
            }
            let text = option.text().collect::<String>().trim().to_string();
            Some((value, text))
        })
        .collect()
}

/// Collects downloadable document references from a results page.
///
/// First looks for plain anchors pointing at `.pdf` files; if none are
/// found, falls back to the archive's result table, where each row holds a
/// description cell, a download anchor with an `?fp=` parameter, and
/// (sometimes) a hidden `fileid` input naming the real file.
pub fn document_links(html: &str, base: &Url) -> Vec<DocRef> {
    let doc = Html::parse_document(html);

    let mut refs = direct_pdf_links(&doc, base);
    if refs.is_empty() {
        refs = table_links(&doc, base);
    }

    ::log::debug!("listing parser found {} document link(s)", refs.len());
    refs
}

fn direct_pdf_links(doc: &Html, base: &Url) -> Vec<DocRef> {
    let anchors = Selector::parse("a").unwrap();

    doc.select(&anchors)
        .filter_map(|a| {
            let href = a.value().attr("href")?;
            if !href.to_lowercase().ends_with(".pdf") {
                return None;
            }
            let url = base.join(href).ok()?;
            let text = a.text().collect::<String>().trim().to_string();
            Some(DocRef::new(url.to_string(), text, None))
        })
        .collect()
}

fn table_links(doc: &Html, base: &Url) -> Vec<DocRef> {
    let rows = Selector::parse("tr").unwrap();
    let cells = Selector::parse("td").unwrap();
    let anchors = Selector::parse("a").unwrap();
    let hidden = Selector::parse("input[type=\"hidden\"][name=\"fileid\"]").unwrap();

    let mut refs = Vec::new();
    for row in doc.select(&rows) {
        let tds: Vec<_> = row.select(&cells).collect();
        if tds.len() < 2 {
            continue;
        }

        let desc = tds[0].text().collect::<String>().trim().to_string();
        let Some(link) = tds[1].select(&anchors).next() else {
            continue;
        };
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        if desc.is_empty() || !href.contains("?fp=") {
            continue;
        }
        let Ok(url) = base.join(href) else {
            continue;
        };

        let hint = row
            .select(&hidden)
            .next()
            .and_then(|input| input.value().attr("value"))
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        refs.push(DocRef::new(url.to_string(), desc, hint));
    }
    refs
}
