mod common;

use admin_portal::services::location::FlattenedOption;
use common::TestApp;

#[tokio::test]
async fn options_feed_returns_the_flattened_forest() {
    let app = TestApp::spawn().await;
    app.login().await;

    let response = app
        .client
        .get(format!("{}/api/locations/options", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());
    let options: Vec<FlattenedOption> = response.json().await.unwrap();

    let values: Vec<(&str, u8)> = options
        .iter()
        .map(|o| (o.value.as_str(), o.level))
        .collect();
    assert_eq!(
        values,
        vec![
            ("HQ", 0),
            ("HQ > Texas", 1),
            ("HQ > Texas > Austin", 2),
            ("HQ > Texas > Austin > Downtown", 3),
            ("HQ > Texas > Austin > Downtown > Tower 1", 4),
            ("HQ > Texas > Austin > Downtown > Tower 1 > Lobby", 5),
            ("HQ > Texas > Dallas", 2),
            ("Campus A", 0),
            ("Campus A > North Wing", 1),
            ("Campus A > North Wing > Floor 1", 2),
        ]
    );
}

#[tokio::test]
async fn suggest_matches_case_insensitively() {
    let app = TestApp::spawn().await;
    app.login().await;

    let response = app
        .client
        .get(format!("{}/api/locations/suggest?q=floor", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());
    let suggestions: Vec<String> = response.json().await.unwrap();
    assert_eq!(suggestions, vec!["Campus A > North Wing > Floor 1"]);
}

#[tokio::test]
async fn suggest_with_empty_query_returns_nothing() {
    let app = TestApp::spawn().await;
    app.login().await;

    let response = app
        .client
        .get(format!("{}/api/locations/suggest?q=", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());
    let suggestions: Vec<String> = response.json().await.unwrap();
    assert!(suggestions.is_empty());
}

#[tokio::test]
async fn suggest_scope_restricts_to_one_subtree() {
    let app = TestApp::spawn().await;
    app.login().await;

    // Both HQ and Campus A contain city-level entries; scoping to HQ must
    // hide Campus A's
    let response = app
        .client
        .get(format!(
            "{}/api/locations/suggest?q=a&scope=HQ",
            app.address
        ))
        .send()
        .await
        .expect("Failed to execute request");

    let suggestions: Vec<String> = response.json().await.unwrap();
    assert!(suggestions.contains(&"HQ > Texas > Austin".to_string()));
    assert!(suggestions.contains(&"HQ > Texas > Dallas".to_string()));
    assert!(!suggestions.iter().any(|s| s.starts_with("Campus A")));
}

#[tokio::test]
async fn api_surfaces_backend_failure_as_bad_gateway() {
    let app = TestApp::spawn().await;
    app.login().await;

    *app.directory.fail.lock().unwrap() = true;

    let response = app
        .client
        .get(format!("{}/api/locations/options", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 502);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Failed to load locations");
}
