use chrono::{TimeZone, Utc};
use climbwire::crawler;
use common::{Config, CrawlConfig, SourceConfig};

fn source(name: &str, url: String) -> SourceConfig {
    SourceConfig {
        name: name.to_string(),
        url,
        lang: "en".to_string(),
    }
}

fn config_with(sources: Vec<SourceConfig>) -> Config {
    Config {
        crawl: CrawlConfig::default(),
        sources,
        enrichment: None,
    }
}

fn rss_item(title: &str, link: &str, pub_date: &str) -> String {
    format!(
        "<item><title>{title}</title><link>{link}</link>\
         <description>desc</description><pubDate>{pub_date}</pubDate></item>"
    )
}

fn rss_doc(items: &str) -> String {
    format!("<?xml version=\"1.0\"?><rss><channel>{items}</channel></rss>")
}

#[tokio::test]
async fn one_broken_source_does_not_affect_the_others() {
    let mut server = mockito::Server::new_async().await;

    // Feed A: one valid item, one item without a link.
    let feed_a = server
        .mock("GET", "/feed-a")
        .match_header("user-agent", "ClimbWire News Bot/1.0")
        .with_status(200)
        .with_body(rss_doc(&format!(
            "{}<item><title>No link</title></item>",
            rss_item("V10 sent", "https://x/1", "Mon, 01 Jan 2024 00:00:00 GMT"),
        )))
        .create_async()
        .await;

    // Feed B: unreachable.
    let feed_b = server
        .mock("GET", "/feed-b")
        .with_status(500)
        .create_async()
        .await;

    let config = config_with(vec![
        source("Feed A", format!("{}/feed-a", server.url())),
        source("Feed B", format!("{}/feed-b", server.url())),
    ]);
    let client = crawler::http_client(&config).expect("build client");

    let articles = crawler::crawl_news(&client, &config).await;

    assert_eq!(articles.len(), 1);
    assert_eq!(articles[0].title, "V10 sent");
    assert_eq!(articles[0].url, "https://x/1");
    assert_eq!(articles[0].source_name, "Feed A");

    feed_a.assert_async().await;
    feed_b.assert_async().await;
}

#[tokio::test]
async fn all_sources_failing_yields_empty_list() {
    let mut server = mockito::Server::new_async().await;

    let _down = server
        .mock("GET", "/feed-down")
        .with_status(503)
        .create_async()
        .await;

    let config = config_with(vec![
        source("Down", format!("{}/feed-down", server.url())),
        // No mock registered at all for this one
        source("Gone", format!("{}/feed-gone", server.url())),
    ]);
    let client = crawler::http_client(&config).expect("build client");

    let articles = crawler::crawl_news(&client, &config).await;
    assert!(articles.is_empty());
}

#[tokio::test]
async fn shared_urls_collapse_across_sources() {
    let mut server = mockito::Server::new_async().await;

    let _feed_a = server
        .mock("GET", "/feed-a")
        .with_status(200)
        .with_body(rss_doc(&rss_item(
            "Original coverage",
            "https://x/same-story",
            "Mon, 01 Jan 2024 00:00:00 GMT",
        )))
        .create_async()
        .await;

    let _feed_b = server
        .mock("GET", "/feed-b")
        .with_status(200)
        .with_body(rss_doc(&rss_item(
            "Syndicated coverage",
            "https://x/same-story",
            "Mon, 01 Jan 2024 00:00:00 GMT",
        )))
        .create_async()
        .await;

    let config = config_with(vec![
        source("Feed A", format!("{}/feed-a", server.url())),
        source("Feed B", format!("{}/feed-b", server.url())),
    ]);
    let client = crawler::http_client(&config).expect("build client");

    let articles = crawler::crawl_news(&client, &config).await;

    assert_eq!(articles.len(), 1);
    // Later source wins the collapse
    assert_eq!(articles[0].source_name, "Feed B");
}

#[tokio::test]
async fn output_is_ranked_and_truncated_to_top_n() {
    let mut server = mockito::Server::new_async().await;

    // Three feeds of ten unique items each, every item one minute apart.
    let mut mocks = Vec::new();
    for feed_idx in 0..3i64 {
        let items: String = (0..10i64)
            .map(|item_idx| {
                let minutes = feed_idx * 10 + item_idx;
                let date = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
                    + chrono::Duration::minutes(minutes);
                rss_item(
                    &format!("Story {feed_idx}-{item_idx}"),
                    &format!("https://x/{feed_idx}/{item_idx}"),
                    &date.to_rfc2822(),
                )
            })
            .collect();

        let mock = server
            .mock("GET", format!("/feed-{feed_idx}").as_str())
            .with_status(200)
            .with_body(rss_doc(&items))
            .create_async()
            .await;
        mocks.push(mock);
    }

    let config = config_with(
        (0..3)
            .map(|i| source(&format!("Feed {i}"), format!("{}/feed-{i}", server.url())))
            .collect(),
    );
    let client = crawler::http_client(&config).expect("build client");

    let articles = crawler::crawl_news(&client, &config).await;

    assert_eq!(articles.len(), 20);
    // Newest overall item leads the ranking
    assert_eq!(articles[0].url, "https://x/2/9");
    // And the list is monotonically non-increasing by date
    for pair in articles.windows(2) {
        assert!(pair[0].published_date >= pair[1].published_date);
    }
}
