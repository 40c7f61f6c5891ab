use crate::parsers::html::normalize_image_url;
use crate::results::SENTINEL;
use url::Url;

#[test]
fn test_relative_path_resolves_against_page() {
    let page = Url::parse("https://shop.example/cat").unwrap();
    assert_eq!(
        normalize_image_url("/img/1.jpg", &page),
        "https://shop.example/img/1.jpg"
    );

    // Pagination may have moved us to a deeper path
    let page = Url::parse("https://shop.example/cat/page/2/").unwrap();
    assert_eq!(
        normalize_image_url("thumbs/1.jpg", &page),
        "https://shop.example/cat/page/2/thumbs/1.jpg"
    );
}

#[test]
fn test_protocol_relative_keeps_page_scheme() {
    let page = Url::parse("https://shop.example/cat").unwrap();
    assert_eq!(
        normalize_image_url("//cdn.example/a.png", &page),
        "https://cdn.example/a.png"
    );
}

#[test]
fn test_absolute_urls_are_kept() {
    let page = Url::parse("https://shop.example/cat").unwrap();
    assert_eq!(
        normalize_image_url("http://img.example/x.jpg", &page),
        "http://img.example/x.jpg"
    );
}

#[test]
fn test_data_urls_and_non_http_schemes_are_dropped() {
    let page = Url::parse("https://shop.example/cat").unwrap();

    assert_eq!(
        normalize_image_url("data:image/png;base64,iVBORw0KGgo=", &page),
        SENTINEL
    );
    assert_eq!(normalize_image_url("DATA:image/gif;base64,R0lG", &page), SENTINEL);
    assert_eq!(normalize_image_url("javascript:void(0)", &page), SENTINEL);
    assert_eq!(normalize_image_url(SENTINEL, &page), SENTINEL);
    assert_eq!(normalize_image_url("   ", &page), SENTINEL);
}

#[test]
fn test_every_kept_url_has_http_scheme() {
    let page = Url::parse("https://shop.example/cat?page=2").unwrap();
    let inputs = [
        "/a.jpg",
        "b.jpg",
        "../c.jpg",
        "https://x.example/d.jpg",
        "data:image/png;base64,AA==",
        "ftp://files.example/e.jpg",
        "N/A",
    ];

    for input in inputs {
        let normalized = normalize_image_url(input, &page);
        assert!(
            normalized == SENTINEL || normalized.starts_with("http://") || normalized.starts_with("https://"),
            "'{}' normalized to '{}'",
            input,
            normalized
        );
    }
}
