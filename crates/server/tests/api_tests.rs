//! API tests against the in-process router.

mod common;

use axum::http::{header, StatusCode};

use common::TestFixture;

#[tokio::test]
async fn test_health_endpoint() {
    let fixture = TestFixture::new();
    let response = fixture.get("/api/v1/health").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
}

#[tokio::test]
async fn test_config_hides_api_key() {
    let fixture = TestFixture::new();
    let response = fixture.get("/api/v1/config").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["tmdb"]["api_key_configured"], true);
    assert!(!response.text.contains("secret-key"));
    assert_eq!(response.body["server"]["port"], 1818);
}

#[tokio::test]
async fn test_list_movies_in_insertion_order() {
    let fixture = TestFixture::new();
    let response = fixture.get("/api/v1/movies").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["total"], 3);
    let names: Vec<&str> = response.body["movies"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["base_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["ep1.mkv", "ep2.mkv", "Film.2020.1080p.WEB.mkv"]);
}

#[tokio::test]
async fn test_group_filter() {
    let fixture = TestFixture::new();

    let grouped = fixture.get("/api/v1/movies?group=true").await;
    assert_eq!(grouped.body["total"], 2);
    for movie in grouped.body["movies"].as_array().unwrap() {
        assert_eq!(movie["clean_dir_name"], "Show");
        assert_eq!(movie["is_group_dir"], true);
    }

    let single = fixture.get("/api/v1/movies?group=false").await;
    assert_eq!(single.body["total"], 1);
    assert_eq!(single.body["movies"][0]["clean_dir_name"], "Film");
}

#[tokio::test]
async fn test_get_movie_and_not_found() {
    let fixture = TestFixture::new();

    let found = fixture.get("/api/v1/movies/3").await;
    assert_eq!(found.status, StatusCode::OK);
    assert_eq!(found.body["clean_base_name"], "Film");

    let missing = fixture.get("/api/v1/movies/999").await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert!(missing.body["error"].as_str().unwrap().contains("999"));
}

#[tokio::test]
async fn test_movie_subtitles_share_directory() {
    let fixture = TestFixture::new();

    let film = fixture.get("/api/v1/movies/3/subtitles").await;
    assert_eq!(film.status, StatusCode::OK);
    assert_eq!(film.body["total"], 1);
    assert_eq!(film.body["subtitles"][0]["base_name"], "Film.2020.1080p.WEB.srt");

    let episode = fixture.get("/api/v1/movies/1/subtitles").await;
    assert_eq!(episode.body["total"], 0);
}

#[tokio::test]
async fn test_catalog_stats() {
    let fixture = TestFixture::new();
    let response = fixture.get("/api/v1/catalog/stats").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["total_movies"], 3);
    assert_eq!(response.body["total_subtitles"], 1);
    assert_eq!(response.body["grouped_movies"], 2);
    assert_eq!(response.body["group_directories"], 1);
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let fixture = TestFixture::new();
    fixture.get("/api/v1/health").await;
    let response = fixture.get("/api/v1/metrics").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.text.contains("voodio_http_requests_total"));
    assert!(response.text.contains("voodio_catalog_movies"));
}

#[tokio::test]
async fn test_connection_close_after_keep_alives_disabled() {
    let fixture = TestFixture::new();

    let before = fixture.get("/api/v1/health").await;
    assert!(before.headers.get(header::CONNECTION).is_none());

    fixture.keep_alive.disable();
    let after = fixture.get("/api/v1/health").await;
    assert_eq!(after.headers.get(header::CONNECTION).unwrap(), "close");
}

#[tokio::test]
async fn test_unknown_route() {
    let fixture = TestFixture::new();
    let response = fixture.get("/api/v1/nope").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
