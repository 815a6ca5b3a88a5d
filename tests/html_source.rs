use mdash_search::html::{HtmlPage, MarkupOptions};
use mdash_search_core::index::{IndexOptions, SearchIndex};
use mdash_search_core::panel::SearchPanel;
use mdash_search_core::search::QueryOptions;

fn index_of(html: &str) -> (HtmlPage, SearchIndex<mdash_search::html::ElementRef>) {
    let page = HtmlPage::parse(html, MarkupOptions::default()).unwrap();
    let mut index = SearchIndex::new(IndexOptions::default());
    index.reindex(&page);
    (page, index)
}

#[test]
fn fifteen_config_sections_are_capped_in_page_order() {
    let sections: String = (0..15)
        .map(|i| {
            format!(
                r#"<div class="doc-section" id="s{i}"><h3>Part {i}</h3><p>config option {i}</p></div>"#
            )
        })
        .collect();
    let (_page, index) = index_of(&format!("<body>{}</body>", sections));

    let hits = index.query("config", &QueryOptions::default());
    let ids: Vec<&str> = hits.iter().map(|h| h.record.id.as_str()).collect();
    assert_eq!(
        ids,
        vec!["s0", "s1", "s2", "s3", "s4", "s5", "s6", "s7", "s8", "s9"]
    );
}

#[test]
fn selection_resolves_to_section_element() {
    let (page, index) = index_of(
        r#"<body>
          <section class="doc-section" id="intro"><h2>Intro</h2><p>Getting going</p></section>
          <section class="doc-section" id="install"><h2>Install</h2><p>Going further</p></section>
        </body>"#,
    );

    let mut panel = SearchPanel::new();
    panel.set_results("going", index.query("going", &QueryOptions::default()));
    panel.select_next();
    panel.select_next();

    let target = panel.resolve_selected().unwrap();
    assert_eq!(target.fragment, "#install");
    assert_eq!(page.describe(target.target), "<section#install>");
    assert_eq!(page.anchor(target.target), Some("install"));
}

#[test]
fn custom_markup_classes() {
    let markup = MarkupOptions {
        section_class: "chapter".to_string(),
        callout_class: "note".to_string(),
        ..MarkupOptions::default()
    };
    let page = HtmlPage::parse(
        r#"<article class="chapter wide" id="a"><h2>Alpha</h2><div class="note">Watch out</div></article>
           <article class="doc-section" id="b"><h2>Beta</h2></article>"#,
        markup,
    )
    .unwrap();
    let mut index = SearchIndex::new(IndexOptions::default());
    let stats = index.reindex(&page);

    assert_eq!(stats.sections, 1);
    assert_eq!(index.records()[0].id, "a");
    assert_eq!(index.records()[0].content, "Watch out");
}

#[test]
fn reindex_after_reparse_keeps_fingerprint() {
    let html = r#"<div class="doc-section" id="x"><h2>X</h2><p>same</p></div>"#;
    let (_page, mut index) = index_of(html);
    let before = index.fingerprint();

    let again = HtmlPage::parse(html, MarkupOptions::default()).unwrap();
    index.reindex(&again);
    assert_eq!(index.fingerprint(), before);
}

#[test]
fn malformed_markup_is_an_error() {
    let err = HtmlPage::parse("<div><!-- never closed", MarkupOptions::default());
    assert!(err.is_err());
}
