use notesdesk::utils::favicon::FaviconResolver;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn html_page(head: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "text/html; charset=utf-8")
        .set_body_string(format!("<!doctype html><html><head>{}</head><body></body></html>", head))
}

#[tokio::test]
async fn resolves_relative_icon_against_origin() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tools/planner"))
        .respond_with(html_page(
            r#"<link rel="icon" sizes="32x32" href="/small.png">
               <link rel="apple-touch-icon" href="/static/apple-touch-icon.png">"#,
        ))
        .mount(&server)
        .await;

    let resolver = FaviconResolver::new().unwrap();
    let icon = resolver
        .resolve(&format!("{}/tools/planner", server.uri()))
        .await;

    assert_eq!(
        icon,
        Some(format!("{}/static/apple-touch-icon.png", server.uri()))
    );
}

#[tokio::test]
async fn page_without_icons_falls_back_to_favicon_ico() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(html_page("<title>Bare</title>"))
        .mount(&server)
        .await;

    let resolver = FaviconResolver::new().unwrap();
    let icon = resolver.resolve(&server.uri()).await;

    assert_eq!(icon, Some(format!("{}/favicon.ico", server.uri())));
}

#[tokio::test]
async fn error_status_yields_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let resolver = FaviconResolver::new().unwrap();
    assert_eq!(resolver.resolve(&server.uri()).await, None);
}

#[tokio::test]
async fn invalid_url_yields_none() {
    let resolver = FaviconResolver::new().unwrap();
    assert_eq!(resolver.resolve("not a url").await, None);
    assert_eq!(resolver.resolve("").await, None);
}
