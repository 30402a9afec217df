//! Result page parser
//!
//! Extracts company cards from a results page. Every field is best-effort
//! on its own: a card only has to yield a name and a corp id to count, and
//! a page with no usable cards is an empty list, never an error.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;

/// Marker the portal embeds when the session tokens have gone stale
pub(crate) const SESSION_EXPIRED_MARKER: &str = "認証の有効期限が切れています";

/// Markers for a malformed or rejected request
pub(crate) const BAD_REQUEST_MARKERS: [&str; 2] = ["Bad Request", "不正なリクエスト"];

/// Caution text shown when a search matches nothing
const NO_RESULTS_TEXT: &str = "該当する企業が見つかりませんでした";

/// One company summary extracted from a result card
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CompanyRecord {
    pub name: String,
    pub description: String,
    pub link: String,
    pub corp_id: String,
}

/// Why a results page produced zero cards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyReason {
    /// The portal explicitly reported no matching companies
    NoMatches,
    /// The session-expired marker is present in the body
    SessionExpired,
    /// A bad-request marker is present in the body
    BadRequest,
    /// No cards and no recognizable explanation
    Unknown,
}

/// Parses all company cards from a results page, in document order
///
/// # Arguments
///
/// * `html` - Raw HTML body of the results page
/// * `base_url` - Origin used to absolutize relative card links
pub fn parse_results(html: &str, base_url: &str) -> Vec<CompanyRecord> {
    let document = Html::parse_document(html);

    let card_sel = match Selector::parse(".boxSearchresultEach.corp") {
        Ok(sel) => sel,
        Err(_) => return Vec::new(),
    };

    let cards: Vec<ElementRef> = document.select(&card_sel).collect();
    tracing::debug!("Found {} result cards", cards.len());

    if cards.is_empty() {
        match classify_empty(html, &document) {
            EmptyReason::NoMatches => tracing::info!("Portal reported no matching companies"),
            EmptyReason::SessionExpired => {
                tracing::error!("Results page carries the session-expired marker")
            }
            EmptyReason::BadRequest => {
                tracing::error!("Results page carries a bad-request marker")
            }
            EmptyReason::Unknown => tracing::warn!("No result cards found on page"),
        }
        return Vec::new();
    }

    let mut companies = Vec::new();
    for (index, card) in cards.iter().enumerate() {
        let (name, link) = extract_name_and_link(card, base_url);
        let description = extract_description(card);
        let corp_id = extract_corp_id(card, &link);

        match (name, corp_id) {
            (Some(name), Some(corp_id)) => companies.push(CompanyRecord {
                name,
                description,
                link: link.unwrap_or_default(),
                corp_id,
            }),
            (None, _) => tracing::debug!("Dropping card {}: no name resolved", index),
            (_, None) => tracing::debug!("Dropping card {}: no corp id resolved", index),
        }
    }

    tracing::debug!("Parsed {} companies from page", companies.len());
    companies
}

/// Classifies why a page yielded no cards (diagnostic only)
pub fn classify_empty(html: &str, document: &Html) -> EmptyReason {
    if let Ok(caution_sel) = Selector::parse(".searchResultCaution, .caution") {
        let caution_text: String = document
            .select(&caution_sel)
            .flat_map(|el| el.text())
            .collect();
        if caution_text.contains(NO_RESULTS_TEXT) {
            return EmptyReason::NoMatches;
        }
    }

    if html.contains(SESSION_EXPIRED_MARKER) {
        return EmptyReason::SessionExpired;
    }

    if BAD_REQUEST_MARKERS.iter().any(|m| html.contains(m)) {
        return EmptyReason::BadRequest;
    }

    EmptyReason::Unknown
}

/// Name and link via the primary selector, then the legacy layout
fn extract_name_and_link(card: &ElementRef, base_url: &str) -> (Option<String>, Option<String>) {
    let primary = Selector::parse("h3.withCheck a.js-add-examination-list-text").ok();
    let fallback = Selector::parse(".boxSearchresultEach_head h3 a").ok();

    let anchor = primary
        .and_then(|sel| card.select(&sel).next())
        .or_else(|| fallback.and_then(|sel| card.select(&sel).next()));

    let Some(anchor) = anchor else {
        return (None, None);
    };

    let name = anchor.text().collect::<String>().trim().to_string();
    let name = if name.is_empty() { None } else { Some(name) };

    let link = anchor
        .value()
        .attr("href")
        .filter(|href| !href.is_empty())
        .map(|href| absolutize(href, base_url));

    (name, link)
}

/// Absolutizes a relative card link against the portal origin
fn absolutize(href: &str, base_url: &str) -> String {
    if href.starts_with("http") {
        href.to_string()
    } else {
        format!("{}{}", base_url, href)
    }
}

/// Catch-copy description, whitespace collapsed to single spaces
fn extract_description(card: &ElementRef) -> String {
    let Some(desc_sel) = Selector::parse("p.catchTxt").ok() else {
        return String::new();
    };

    card.select(&desc_sel)
        .next()
        .map(|el| {
            el.text()
                .collect::<String>()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
        })
        .unwrap_or_default()
}

/// Resolves the corp id through a three-tier fallback, first hit wins:
/// the card's own `div<digits>` element id, a `corp<digits>` segment in
/// the link, then the data attribute on the add-to-list control.
fn extract_corp_id(card: &ElementRef, link: &Option<String>) -> Option<String> {
    if let Some(id_attr) = card.value().attr("id") {
        if let Some(suffix) = id_attr.strip_prefix("div") {
            if !suffix.is_empty() && suffix.chars().all(|c| c.is_ascii_digit()) {
                return Some(suffix.to_string());
            }
        }
    }

    if let Some(link) = link {
        if let Ok(re) = Regex::new(r"corp(\d+)") {
            if let Some(caps) = re.captures(link) {
                return Some(caps[1].to_string());
            }
        }
    }

    let button_sel = Selector::parse(".js-add-examination-list-button").ok()?;
    card.select(&button_sel)
        .next()
        .and_then(|el| el.value().attr("data-examination-list-corp-id"))
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://job.mynavi.jp";

    fn card(id_attr: &str, inner: &str) -> String {
        format!(
            r#"<div class="boxSearchresultEach corp" {}>{}</div>"#,
            id_attr, inner
        )
    }

    fn page(cards: &str) -> String {
        format!("<html><body><div class=\"results\">{}</div></body></html>", cards)
    }

    fn full_card(corp_id: &str, name: &str) -> String {
        card(
            &format!(r#"id="div{}""#, corp_id),
            &format!(
                r#"<h3 class="withCheck">
                     <a class="js-add-examination-list-text" href="/26/pc/search/corp{}/outline.html">{}</a>
                   </h3>
                   <p class="catchTxt">  A   great
                   place to work  </p>"#,
                corp_id, name
            ),
        )
    }

    #[test]
    fn test_parses_full_card() {
        let html = page(&full_card("123456", "Example Corp"));
        let companies = parse_results(&html, BASE);

        assert_eq!(companies.len(), 1);
        let c = &companies[0];
        assert_eq!(c.name, "Example Corp");
        assert_eq!(c.corp_id, "123456");
        assert_eq!(
            c.link,
            "https://job.mynavi.jp/26/pc/search/corp123456/outline.html"
        );
        assert_eq!(c.description, "A great place to work");
    }

    #[test]
    fn test_preserves_document_order() {
        let html = page(&format!(
            "{}{}{}",
            full_card("1", "First"),
            full_card("2", "Second"),
            full_card("3", "Third")
        ));
        let companies = parse_results(&html, BASE);
        let names: Vec<_> = companies.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn test_fallback_name_selector() {
        let html = page(&card(
            r#"id="div777""#,
            r#"<div class="boxSearchresultEach_head">
                 <h3><a href="/26/pc/search/corp777/outline.html">Legacy Corp</a></h3>
               </div>"#,
        ));
        let companies = parse_results(&html, BASE);
        assert_eq!(companies.len(), 1);
        assert_eq!(companies[0].name, "Legacy Corp");
    }

    #[test]
    fn test_absolute_link_untouched() {
        let html = page(&card(
            r#"id="div888""#,
            r#"<h3 class="withCheck">
                 <a class="js-add-examination-list-text" href="https://example.com/corp888">Abs Corp</a>
               </h3>"#,
        ));
        let companies = parse_results(&html, BASE);
        assert_eq!(companies[0].link, "https://example.com/corp888");
    }

    #[test]
    fn test_corp_id_from_element_id_wins() {
        // Element id and link disagree; tier one takes precedence
        let html = page(&card(
            r#"id="div111""#,
            r#"<h3 class="withCheck">
                 <a class="js-add-examination-list-text" href="/26/pc/search/corp222/outline.html">X</a>
               </h3>"#,
        ));
        let companies = parse_results(&html, BASE);
        assert_eq!(companies[0].corp_id, "111");
    }

    #[test]
    fn test_corp_id_falls_back_to_link() {
        // Non-numeric id suffix disqualifies tier one
        let html = page(&card(
            r#"id="divabc""#,
            r#"<h3 class="withCheck">
                 <a class="js-add-examination-list-text" href="/26/pc/search/corp333/outline.html">X</a>
               </h3>"#,
        ));
        let companies = parse_results(&html, BASE);
        assert_eq!(companies[0].corp_id, "333");
    }

    #[test]
    fn test_corp_id_falls_back_to_data_attribute() {
        let html = page(&card(
            "",
            r#"<h3 class="withCheck">
                 <a class="js-add-examination-list-text" href="/somewhere/else.html">X</a>
               </h3>
               <button class="js-add-examination-list-button" data-examination-list-corp-id="444">add</button>"#,
        ));
        let companies = parse_results(&html, BASE);
        assert_eq!(companies[0].corp_id, "444");
    }

    #[test]
    fn test_corp_id_resolution_is_idempotent() {
        let html = page(&card(
            r#"id="divabc""#,
            r#"<h3 class="withCheck">
                 <a class="js-add-examination-list-text" href="/26/pc/search/corp555/outline.html">X</a>
               </h3>"#,
        ));
        let first = parse_results(&html, BASE);
        let second = parse_results(&html, BASE);
        assert_eq!(first, second);
        assert_eq!(first[0].corp_id, "555");
    }

    #[test]
    fn test_card_without_name_is_dropped() {
        let html = page(&card(r#"id="div999""#, "<p>no heading at all</p>"));
        assert!(parse_results(&html, BASE).is_empty());
    }

    #[test]
    fn test_card_without_id_is_dropped() {
        let html = page(&card(
            "",
            r#"<h3 class="withCheck">
                 <a class="js-add-examination-list-text" href="/no/numeric/segment.html">Named</a>
               </h3>"#,
        ));
        assert!(parse_results(&html, BASE).is_empty());
    }

    #[test]
    fn test_empty_page_returns_empty() {
        assert!(parse_results("<html><body></body></html>", BASE).is_empty());
    }

    #[test]
    fn test_classify_no_results_caution() {
        let html = format!(
            r#"<html><body><div class="searchResultCaution">{}</div></body></html>"#,
            NO_RESULTS_TEXT
        );
        let doc = Html::parse_document(&html);
        assert_eq!(classify_empty(&html, &doc), EmptyReason::NoMatches);
    }

    #[test]
    fn test_classify_session_expired() {
        let html = format!("<html><body><p>{}</p></body></html>", SESSION_EXPIRED_MARKER);
        let doc = Html::parse_document(&html);
        assert_eq!(classify_empty(&html, &doc), EmptyReason::SessionExpired);
    }

    #[test]
    fn test_classify_bad_request() {
        let html = "<html><body><h1>Bad Request</h1></body></html>";
        let doc = Html::parse_document(html);
        assert_eq!(classify_empty(html, &doc), EmptyReason::BadRequest);
    }

    #[test]
    fn test_classify_unknown() {
        let html = "<html><body><p>nothing here</p></body></html>";
        let doc = Html::parse_document(html);
        assert_eq!(classify_empty(html, &doc), EmptyReason::Unknown);
    }

    #[test]
    fn test_malformed_html_does_not_panic() {
        let html = "<div class=\"boxSearchresultEach corp\"><h3 class=withCheck><a";
        let _ = parse_results(html, BASE);
    }
}
