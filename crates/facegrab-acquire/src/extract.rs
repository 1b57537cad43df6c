use facegrab_model::Identifier;
use scraper::{Html, Selector};
use url::Url;

/// Substring that marks a face thumbnail in an `<img src>`.
pub const FACE_MARKER: &str = "iconface";

/// Class carried by the team links on the listing page.
pub const TEAM_LINK_CLASS: &str = "item-title";

/// Face identifiers from a team page, in document order.
///
/// Every `<img>` whose `src` contains [`FACE_MARKER`] contributes the stem
/// of its file name (`.../iconface/2000123.png` → `2000123`).
pub fn face_ids(html: &str) -> Vec<Identifier> {
    let document = Html::parse_document(html);
    let img_sel = Selector::parse("img[src]").expect("valid selector");

    document
        .select(&img_sel)
        .filter_map(|img| img.value().attr("src"))
        .filter(|src| src.contains(FACE_MARKER))
        .filter_map(|src| match Identifier::from_image_src(src) {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::debug!(src = %src, "Skipping image: {e}");
                None
            }
        })
        .collect()
}

/// Absolute team page URLs from the listing page, in document order.
///
/// Each `<a class="item-title" href=...>` is resolved against `base`.
pub fn team_links(html: &str, base: &Url) -> Vec<Url> {
    let document = Html::parse_document(html);
    let selector = format!("a.{TEAM_LINK_CLASS}[href]");
    let link_sel = Selector::parse(&selector).expect("valid selector");

    document
        .select(&link_sel)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(|href| match base.join(href.trim()) {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::warn!(href = %href, "Could not resolve team link: {e}");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_ids_only_marked_images() {
        let html = r#"
        <html><body>
            <img src="https://cdn.example.net/uploads/iconface/2000276779.png">
            <img src="/img/logo.svg">
            <div class="squad">
                <img src="/uploads/iconface/2000111.png" alt="A">
                <img src="/uploads/other/2000222.png">
                <img alt="no source">
                <img src="/uploads/iconface/2000333.jpg">
            </div>
        </body></html>
        "#;

        let ids: Vec<String> = face_ids(html).iter().map(|id| id.to_string()).collect();
        assert_eq!(ids, ["2000276779", "2000111", "2000333"]);
    }

    #[test]
    fn test_face_ids_keeps_duplicates() {
        let html = r#"
            <img src="/uploads/iconface/5.png">
            <img src="/uploads/iconface/5.png">
        "#;
        assert_eq!(face_ids(html).len(), 2);
    }

    #[test]
    fn test_face_ids_empty_page() {
        assert!(face_ids("").is_empty());
        assert!(face_ids("<html><body><p>nothing</p></body></html>").is_empty());
    }

    #[test]
    fn test_team_links_resolves_against_base() {
        let base = Url::parse("https://example.com/en/teams/index?page=2").unwrap();
        let html = r#"
        <ul>
            <li><a class="item-title" href="/en/teams/100">Alpha</a></li>
            <li><a class="item-title big" href="200">Beta</a></li>
            <li><a class="item-title" href="https://other.example.org/t/300">Gamma</a></li>
            <li><a class="item-subtitle" href="/en/teams/400">Not a team</a></li>
            <li><a href="/en/teams/500">Plain link</a></li>
            <li><a class="item-title">No href</a></li>
        </ul>
        "#;

        let links: Vec<String> = team_links(html, &base).iter().map(|u| u.to_string()).collect();
        assert_eq!(
            links,
            [
                "https://example.com/en/teams/100",
                "https://example.com/en/teams/200",
                "https://other.example.org/t/300",
            ]
        );
    }

    #[test]
    fn test_team_links_none_on_page() {
        let base = Url::parse("https://example.com/").unwrap();
        assert!(team_links("<a href='/x'>x</a>", &base).is_empty());
    }
}
