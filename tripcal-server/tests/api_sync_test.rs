//! Integration tests for the sync endpoint

mod test_utils;

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use mockito::{Matcher, ServerGuard};
    use serde_json::json;
    use tower::util::ServiceExt;

    use crate::test_utils::{TRIP_FEED, body_to_json, encode, test_app};

    fn sync_request(server: &ServerGuard, token: Option<&str>) -> Request<Body> {
        let uri = format!(
            "/api/sync?url={}&timeout=5",
            encode(&format!("{}/cal.ics", server.url()))
        );
        let mut builder = Request::builder().uri(uri).method("POST");
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn mock_feed(server: &mut ServerGuard) -> mockito::Mock {
        server
            .mock("GET", "/cal.ics")
            .with_status(200)
            .with_body(TRIP_FEED)
            .create_async()
            .await
    }

    /// Tests a missing credential is rejected before the feed is fetched
    #[tokio::test]
    async fn it_requires_a_bearer_token() {
        let mut server = mockito::Server::new_async().await;
        let feed = server
            .mock("GET", "/cal.ics")
            .with_status(200)
            .with_body(TRIP_FEED)
            .expect(0)
            .create_async()
            .await;

        let app = test_app(&server.url());
        let response = app.oneshot(sync_request(&server, None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        feed.assert_async().await;
    }

    /// Tests out of range and non-numeric timeouts are rejected before the
    /// feed or the tables are touched
    #[tokio::test]
    async fn it_rejects_bad_timeouts_without_fetching() {
        let mut server = mockito::Server::new_async().await;
        let feed = server
            .mock("GET", "/cal.ics")
            .with_status(200)
            .with_body(TRIP_FEED)
            .expect(0)
            .create_async()
            .await;
        let tables = server
            .mock("GET", Matcher::Regex(r"^/(trips|events)/rows$".to_string()))
            .with_status(200)
            .with_body(r#"{"data": []}"#)
            .expect(0)
            .create_async()
            .await;
        let feed_url = encode(&format!("{}/cal.ics", server.url()));

        for (timeout, message) in [
            ("0", "Timeout must be between 1 and 60 seconds"),
            ("61", "Timeout must be between 1 and 60 seconds"),
            ("abc", "Timeout must be a valid integer"),
        ] {
            let app = test_app(&server.url());
            let request = Request::builder()
                .uri(format!("/api/sync?url={feed_url}&timeout={timeout}"))
                .method("POST")
                .header("authorization", "Bearer s3cret")
                .body(Body::empty())
                .unwrap();
            let response = app.oneshot(request).await.unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "timeout={timeout}");
            assert_eq!(body_to_json(response.into_body()).await["error"], message);
        }

        feed.assert_async().await;
        tables.assert_async().await;
    }

    /// Tests trips and events are merged into their tables
    #[tokio::test]
    async fn it_syncs_trips_and_events() {
        let mut server = mockito::Server::new_async().await;
        let _feed = mock_feed(&mut server).await;

        let trips_rows = server
            .mock("GET", "/trips/rows")
            .match_header("authorization", "Bearer s3cret")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_header("etag", "W/\"t1\"")
            .with_body(r#"{"data": [{"uid": "lisbon", "name": "Old name", "budget": 900}]}"#)
            .create_async()
            .await;
        let trips_put = server
            .mock("PUT", "/trips")
            .match_header("if-match", "\"t1\"")
            .match_body(Matcher::PartialJson(json!({
                "rows": [
                    {"uid": "lisbon", "name": "Lisbon trip", "budget": 900},
                    {"uid": "dentist", "name": "Dentist"}
                ]
            })))
            .with_status(200)
            .create_async()
            .await;
        let events_rows = server
            .mock("GET", "/events/rows")
            .with_status(200)
            .with_header("etag", "\"e1\"")
            .with_body(r#"{"data": []}"#)
            .create_async()
            .await;
        let events_put = server
            .mock("PUT", "/events")
            .match_header("if-match", "\"e1\"")
            .match_body(Matcher::PartialJson(json!({
                "rows": [{"uid": "flight-out", "trip_uid": "lisbon", "type": "flight"}]
            })))
            .with_status(200)
            .create_async()
            .await;

        let app = test_app(&server.url());
        let response = app
            .oneshot(sync_request(&server, Some("s3cret")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        trips_rows.assert_async().await;
        trips_put.assert_async().await;
        events_rows.assert_async().await;
        events_put.assert_async().await;

        let body = body_to_json(response.into_body()).await;
        assert_eq!(body["success"], true);
        assert_eq!(
            body["trips"],
            json!({"success": true, "message": "Synced 2 rows to trips", "synced_count": 2})
        );
        assert_eq!(body["events"]["synced_count"], 1);
    }

    /// Tests a table that keeps moving exhausts the retries and fails the sync
    #[tokio::test]
    async fn it_reports_exhausted_retries() {
        let mut server = mockito::Server::new_async().await;
        let _feed = mock_feed(&mut server).await;

        let _trips_rows = server
            .mock("GET", "/trips/rows")
            .with_status(200)
            .with_header("etag", "\"t1\"")
            .with_body(r#"{"data": []}"#)
            .create_async()
            .await;
        let trips_put = server
            .mock("PUT", "/trips")
            .with_status(412)
            .expect(3)
            .create_async()
            .await;
        let _events_rows = server
            .mock("GET", "/events/rows")
            .with_status(200)
            .with_header("etag", "\"e1\"")
            .with_body(r#"{"data": []}"#)
            .create_async()
            .await;
        let _events_put = server
            .mock("PUT", "/events")
            .with_status(200)
            .create_async()
            .await;

        let app = test_app(&server.url());
        let response = app
            .oneshot(sync_request(&server, Some("s3cret")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        trips_put.assert_async().await;

        let body = body_to_json(response.into_body()).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["trips"]["message"], "Maximum retries exceeded");
        assert_eq!(body["events"]["success"], true);
    }

    /// Tests a rejected write is reported with the table's error body
    #[tokio::test]
    async fn it_reports_rejected_writes() {
        let mut server = mockito::Server::new_async().await;
        let _feed = mock_feed(&mut server).await;

        let mut _table_rows = Vec::new();
        for table in ["trips", "events"] {
            let mock = server
                .mock("GET", format!("/{table}/rows").as_str())
                .with_status(200)
                .with_header("etag", "\"v\"")
                .with_body(r#"{"data": []}"#)
                .create_async()
                .await;
            _table_rows.push(mock);
        }
        let events_put = server
            .mock("PUT", "/events")
            .with_status(422)
            .with_body(r#"{"error": "unknown column: type"}"#)
            .expect(1)
            .create_async()
            .await;
        let _trips_put = server
            .mock("PUT", "/trips")
            .with_status(200)
            .create_async()
            .await;

        let app = test_app(&server.url());
        let response = app
            .oneshot(sync_request(&server, Some("s3cret")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        events_put.assert_async().await;

        let body = body_to_json(response.into_body()).await;
        assert_eq!(body["trips"]["success"], true);
        assert_eq!(body["events"]["success"], false);
        assert_eq!(body["events"]["error"], json!({"error": "unknown column: type"}));
    }
}
