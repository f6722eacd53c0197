use reqwest::Url;
use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use ytscrape::{
    Client, ClientConfig, Error, PlaylistOptions, SearchOptions, TransportError,
};

const ID: &str = "PLpas7-jjCh0Z7-t9yqhg3ibXTgeZhtH-G";

fn client_for(server: &MockServer) -> eyre::Result<Client> {
    let base = Url::parse(&format!("{}/", server.uri()))?;
    let config = ClientConfig::default()
        .with_base_url(base)
        .with_attempts(2)
        .with_dump_dir(None);
    Ok(Client::new(config)?)
}

fn video(id: &str) -> Value {
    json!({"playlistVideoRenderer": {
        "videoId": id,
        "title": {"runs": [{"text": format!("Video {id}")}]},
        "lengthText": {"simpleText": "1:00"}
    }})
}

fn marker(token: &str) -> Value {
    json!({"continuationItemRenderer": {
        "continuationEndpoint": {"continuationCommand": {"token": token}}
    }})
}

fn playlist_data(videos: Vec<Value>) -> Value {
    json!({
        "contents": {"twoColumnBrowseResultsRenderer": {"tabs": [{"tabRenderer": {"content": {
            "sectionListRenderer": {"contents": [{"itemSectionRenderer": {"contents": [
                {"playlistVideoListRenderer": {"contents": videos}}
            ]}}]}
        }}}]}},
        "sidebar": {"playlistSidebarRenderer": {"items": [
            {"playlistSidebarPrimaryInfoRenderer": {
                "title": {"simpleText": "Over the wire"},
                "stats": [{"runs": [{"text": "3"}, {"text": " videos"}]}]
            }}
        ]}}
    })
}

fn html(data: Option<&Value>) -> String {
    let mut page = String::from(
        r#"<html><script>ytcfg.set({"INNERTUBE_API_KEY":"AIzaTest","INNERTUBE_CONTEXT_CLIENT_VERSION":"2.20250101.00.00"});</script>"#,
    );
    if let Some(data) = data {
        page.push_str(&format!("<script>var ytInitialData = {data};</script>"));
    }
    page.push_str("</html>");
    page
}

#[tokio::test]
async fn playlist_pages_are_walked() -> eyre::Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/playlist"))
        .and(query_param("list", ID))
        .and(header("cookie", "SOCS=CAI"))
        .and(header_exists("user-agent"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html(Some(&playlist_data(vec![video("a"), marker("t1")])))),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/youtubei/v1/browse"))
        .and(query_param("key", "AIzaTest"))
        .and(body_partial_json(json!({"continuation": "t1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "onResponseReceivedActions": [{"appendContinuationItemsAction": {
                "continuationItems": [video("b"), video("c")]
            }}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let playlist = client_for(&server)?
        .get_playlist(ID, &PlaylistOptions::default())
        .await?;

    assert_eq!(playlist.title, "Over the wire");
    assert_eq!(playlist.total_items, 3);
    let ids: Vec<_> = playlist.items.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
    assert_eq!(playlist.items[1].url, "https://www.youtube.com/watch?v=b");
    Ok(())
}

#[tokio::test]
async fn playlist_falls_back_to_browse() -> eyre::Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/playlist"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html(None)))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/youtubei/v1/browse"))
        .and(body_partial_json(json!({
            "browseId": format!("VL{ID}"),
            "context": {"client": {"clientName": "WEB", "clientVersion": "2.20250101.00.00"}}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(playlist_data(vec![video("a")])))
        .expect(1)
        .mount(&server)
        .await;

    let playlist = client_for(&server)?
        .get_playlist(ID, &PlaylistOptions::default())
        .await?;
    assert_eq!(playlist.items.len(), 1);
    Ok(())
}

#[tokio::test]
async fn search_reads_results_page() -> eyre::Result<()> {
    let server = MockServer::start().await;

    let data = json!({
        "estimatedResults": "42",
        "contents": {"twoColumnSearchResultsRenderer": {"primaryContents": {
            "sectionListRenderer": {"contents": [{"itemSectionRenderer": {"contents": [
                {"videoRenderer": {"videoId": "v1", "title": {"runs": [{"text": "First"}]}}},
                {"channelRenderer": {"channelId": "UCskip"}},
                {"videoRenderer": {"videoId": "v2", "title": {"runs": [{"text": "Second"}]}}}
            ]}}]}
        }}}
    });
    Mock::given(method("GET"))
        .and(path("/results"))
        .and(query_param("search_query", "lofi beats"))
        .and(query_param("gl", "US"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html(Some(&data))))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server)?
        .search("lofi beats", &SearchOptions::default())
        .await?;
    assert_eq!(result.estimated_results, 42);
    let titles: Vec<_> = result.items.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(titles, vec!["First", "Second"]);
    Ok(())
}

#[tokio::test]
async fn http_errors_surface_as_transport_errors() -> eyre::Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/results"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client_for(&server)?
        .search("anything", &SearchOptions::default())
        .await
        .unwrap_err();
    match &err {
        Error::Transport {
            source: TransportError::Status { status },
            ..
        } => assert_eq!(status.as_u16(), 503),
        other => panic!("unexpected error {other:?}"),
    }
    assert!(err.is_retryable());
    Ok(())
}
