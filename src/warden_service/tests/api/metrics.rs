use crate::helpers::TestApp;

fn series<'a>(body: &'a str, name: &str) -> Vec<&'a str> {
    body.lines()
        .filter(|line| line.starts_with(&format!("{name}{{")))
        .collect()
}

#[tokio::test]
async fn metrics_endpoint_exposes_request_counter_and_duration() {
    let app = TestApp::new().await;
    app.register("Metric Example", "metric@example.com", "password123")
        .await;

    let response = app.get_metrics().await;

    assert_eq!(response.status().as_u16(), 200);
    let body = response.text().await.unwrap();
    let register = series(&body, "http_requests_total")
        .into_iter()
        .find(|line| line.contains(r#"path="/register""#))
        .expect("register requests should be counted");
    assert!(register.contains(r#"method="POST""#));
    assert!(register.contains(r#"status="201""#));
    assert!(register.contains(r#"app_name="warden""#));
    assert!(
        series(&body, "api_request_duration_seconds_count")
            .iter()
            .any(|line| line.contains(r#"path="/register""#))
    );
}

#[tokio::test]
async fn user_routes_are_labelled_by_template_not_id() {
    let app = TestApp::new().await;
    let (id, token) = app
        .register("Template Example", "template@example.com", "password123")
        .await;
    app.get_user(&id, Some(&token)).await;

    let body = app.get_metrics().await.text().await.unwrap();

    assert!(
        series(&body, "http_requests_total")
            .iter()
            .any(|line| line.contains(r#"path="/users/{id}""#) && line.contains(r#"method="GET""#))
    );
    assert!(!body.contains(&id));
}
