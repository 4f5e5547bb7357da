//! End-to-end tests for the stateless fetch/parse pipeline.
//!
//! Each test mounts its own wiremock upstream; nothing is shared between
//! tests, mirroring the pipeline's own no-shared-state contract.

use std::time::Duration;

use feedlens::error::ErrorKind;
use feedlens::feed::{parse_feed, FeedResponse};
use feedlens::fetch::{build_client, fetch_and_parse, DEFAULT_USER_AGENT};
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

const TIMEOUT: Duration = Duration::from_secs(10);

const THREE_ITEM_RSS: &str = r#"<?xml version="1.0"?>
<rss version="2.0" xmlns:media="http://search.yahoo.com/mrss/" xmlns:dc="http://purl.org/dc/elements/1.1/">
  <channel>
    <title>Example News</title>
    <item>
      <title>Structured media</title>
      <link>https://example.com/1</link>
      <pubDate>Mon, 06 Sep 2021 12:00:00 GMT</pubDate>
      <dc:creator>Alex</dc:creator>
      <media:content url="https://cdn.example.com/one.jpg" medium="image" width="640" height="400"/>
      <enclosure url="https://cdn.example.com/ignored.jpg" type="image/jpeg"/>
    </item>
    <item>
      <title>Inline only</title>
      <link>https://example.com/2</link>
      <description><![CDATA[Text with <img src="https://cdn.example.com/two.png"> inside]]></description>
    </item>
    <item>
      <title>No image at all</title>
      <link>https://example.com/3</link>
    </item>
  </channel>
</rss>"#;

async fn mock_feed(body: &str, status: u16) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(&server)
        .await;
    server
}

fn client() -> reqwest::Client {
    build_client(DEFAULT_USER_AGENT).unwrap()
}

#[tokio::test]
async fn test_success_yields_one_article_per_entry() {
    let server = mock_feed(THREE_ITEM_RSS, 200).await;

    let articles = fetch_and_parse(&client(), &server.uri(), TIMEOUT)
        .await
        .unwrap();

    assert_eq!(articles.len(), 3);
    assert_eq!(articles[0].title, "Structured media");
    assert_eq!(articles[0].author.as_deref(), Some("Alex"));
    assert_eq!(articles[2].id, 2);
}

#[tokio::test]
async fn test_media_metadata_beats_enclosure() {
    let server = mock_feed(THREE_ITEM_RSS, 200).await;

    let articles = fetch_and_parse(&client(), &server.uri(), TIMEOUT)
        .await
        .unwrap();

    // Both a media:content image and an image enclosure are present; the
    // structured media element wins
    assert_eq!(
        articles[0].image.as_deref(),
        Some("https://cdn.example.com/one.jpg")
    );
}

#[tokio::test]
async fn test_content_mining_and_absence() {
    let server = mock_feed(THREE_ITEM_RSS, 200).await;

    let articles = fetch_and_parse(&client(), &server.uri(), TIMEOUT)
        .await
        .unwrap();

    assert_eq!(
        articles[1].image.as_deref(),
        Some("https://cdn.example.com/two.png")
    );
    assert_eq!(articles[2].image, None);
}

#[tokio::test]
async fn test_upstream_404_maps_to_upstream_error() {
    let server = mock_feed("", 404).await;

    let err = fetch_and_parse(&client(), &server.uri(), TIMEOUT)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::UpstreamError);
    assert_eq!(err.upstream_status(), Some(404));
}

#[tokio::test]
async fn test_empty_body_maps_to_empty_feed() {
    let server = mock_feed("", 200).await;

    let err = fetch_and_parse(&client(), &server.uri(), TIMEOUT)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmptyFeed);
}

#[tokio::test]
async fn test_broken_xml_maps_to_malformed_feed() {
    let server = mock_feed("<rss><channel><item><title>oops", 200).await;

    let err = fetch_and_parse(&client(), &server.uri(), TIMEOUT)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedFeed);
}

#[tokio::test]
async fn test_entryless_feed_maps_to_no_articles() {
    let server = mock_feed(
        r#"<rss version="2.0"><channel><title>Quiet</title></channel></rss>"#,
        200,
    )
    .await;

    let err = fetch_and_parse(&client(), &server.uri(), TIMEOUT)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoArticles);
}

#[tokio::test]
async fn test_unreachable_host_maps_to_unreachable() {
    let err = fetch_and_parse(&client(), "http://127.0.0.1:1/feed", TIMEOUT)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unreachable);
}

#[tokio::test]
async fn test_response_contract_success_shape() {
    let server = mock_feed(THREE_ITEM_RSS, 200).await;

    let result = fetch_and_parse(&client(), &server.uri(), TIMEOUT).await;
    let response = FeedResponse::from(result);

    assert!(!response.error);
    assert_eq!(response.items.len(), 3);
    assert_eq!(response.message, "Successfully loaded 3 articles");

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["items"][0]["pubDate"], "Mon, 06 Sep 2021 12:00:00 GMT");
}

#[tokio::test]
async fn test_response_contract_failure_shape() {
    let server = mock_feed("", 403).await;

    let result = fetch_and_parse(&client(), &server.uri(), TIMEOUT).await;
    let response = FeedResponse::from(result);

    assert!(response.error);
    assert!(response.items.is_empty());
    assert_eq!(response.status, Some(403));
    assert_eq!(response.message, "Access to RSS feed denied");
}

#[tokio::test]
async fn test_pipeline_matches_direct_parse() {
    let server = mock_feed(THREE_ITEM_RSS, 200).await;

    let fetched = fetch_and_parse(&client(), &server.uri(), TIMEOUT)
        .await
        .unwrap();
    let direct = parse_feed(THREE_ITEM_RSS).unwrap();

    assert_eq!(fetched, direct);
}
