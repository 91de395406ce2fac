use super::engine::ContentRule;
use crate::config::{TitleSuffixConfig, TITLE_SUFFIX_RULE};
use crate::document::Document;
use tracing::debug;

/// Removes the template marker from the page title and the first title
/// heading.
///
/// The title is matched on its concatenated text, so a marker split by a
/// comment still fires and the title collapses to a single text node. The
/// heading is matched one text node at a time: a marker there that spans
/// inline markup or a comment is left in place.
pub struct TitleSuffixRule<'a> {
    config: &'a TitleSuffixConfig,
}

impl<'a> TitleSuffixRule<'a> {
    pub fn new(config: &'a TitleSuffixConfig) -> Self {
        Self { config }
    }
}

impl ContentRule for TitleSuffixRule<'_> {
    fn apply(&self, document: &mut Document) -> bool {
        let marker = self.config.marker.as_str();
        let Some(title) = document.title() else {
            return false;
        };
        if !title.contains(marker) {
            return false;
        }
        document.set_title(&title.replace(marker, ""));

        // Only the first heading; later ones keep their text
        let heading = document
            .headings(&self.config.heading_tag, &self.config.heading_class)
            .next();
        if let Some(heading) = heading {
            let stripped = document.replace_text(heading, marker, "");
            debug!(heading_stripped = stripped, "title marker removed");
        }
        true
    }

    fn name(&self) -> &str {
        TITLE_SUFFIX_RULE
    }

    fn label(&self) -> &str {
        "Removed QML type suffix"
    }
}

#[cfg(all(test, feature = "xhtml-backend"))]
mod tests {
    use super::*;
    use crate::loader::{MarkupBackend, XhtmlBackend};

    fn doc(body: &str) -> Document {
        let page = format!("<html><head><title>{}</title></head><body>{}</body></html>", "Foo QML Type", body);
        let tree = XhtmlBackend::new().parse(&page).unwrap();
        Document::new("foo.html", page, tree)
    }

    fn heading_texts(document: &Document) -> Vec<String> {
        document
            .headings("h1", "title")
            .map(|h| document.text(h))
            .collect()
    }

    #[test]
    fn strips_title_and_first_heading() {
        let config = TitleSuffixConfig::default();
        let mut document = doc(r#"<h1 class="title">Foo QML Type</h1>"#);

        assert!(TitleSuffixRule::new(&config).apply(&mut document));
        assert_eq!(document.title().as_deref(), Some("Foo"));
        assert_eq!(heading_texts(&document), vec!["Foo"]);
    }

    #[test]
    fn leaves_later_headings_alone() {
        let config = TitleSuffixConfig::default();
        let mut document =
            doc(r#"<h1 class="title">Foo QML Type</h1><h1 class="title">Bar QML Type</h1>"#);

        assert!(TitleSuffixRule::new(&config).apply(&mut document));
        assert_eq!(heading_texts(&document), vec!["Foo", "Bar QML Type"]);
    }

    #[test]
    fn ignores_headings_without_title_class() {
        let config = TitleSuffixConfig::default();
        let mut document =
            doc(r#"<h1 class="subtitle">Foo QML Type</h1><h1 class="title">Foo QML Type</h1>"#);

        assert!(TitleSuffixRule::new(&config).apply(&mut document));
        assert!(document.serialize().contains(r#"<h1 class="subtitle">Foo QML Type</h1>"#));
        assert_eq!(heading_texts(&document), vec!["Foo"]);
    }

    #[test]
    fn does_not_fire_without_marker_in_title() {
        let config = TitleSuffixConfig::default();
        let page = r#"<html><head><title>Foo</title></head><body><h1 class="title">Foo QML Type</h1></body></html>"#;
        let tree = XhtmlBackend::new().parse(page).unwrap();
        let mut document = Document::new("foo.html", page.to_string(), tree);

        assert!(!TitleSuffixRule::new(&config).apply(&mut document));
        assert_eq!(document.serialize(), page);
    }

    #[test]
    fn does_not_fire_without_title() {
        let config = TitleSuffixConfig::default();
        let page = r#"<html><body><h1 class="title">Foo QML Type</h1></body></html>"#;
        let tree = XhtmlBackend::new().parse(page).unwrap();
        let mut document = Document::new("foo.html", page.to_string(), tree);

        assert!(!TitleSuffixRule::new(&config).apply(&mut document));
    }

    #[test]
    fn title_marker_split_by_comment_still_fires() {
        let config = TitleSuffixConfig::default();
        let page = "<html><head><title>Foo QML<!-- x --> Type</title></head>\
                    <body><h1 class=\"title\">Foo QML<!-- x --> Type</h1></body></html>";
        let tree = XhtmlBackend::new().parse(page).unwrap();
        let mut document = Document::new("foo.html", page.to_string(), tree);

        assert!(TitleSuffixRule::new(&config).apply(&mut document));
        assert!(document.serialize().contains("<title>Foo</title>"));
        assert_eq!(heading_texts(&document), vec!["Foo QML Type"]);
    }

    #[test]
    fn removes_every_occurrence() {
        let config = TitleSuffixConfig::default();
        let page = "<html><head><title>A QML Type and B QML Type</title></head></html>";
        let tree = XhtmlBackend::new().parse(page).unwrap();
        let mut document = Document::new("ab.html", page.to_string(), tree);

        assert!(TitleSuffixRule::new(&config).apply(&mut document));
        assert_eq!(document.title().as_deref(), Some("A and B"));
    }
}
