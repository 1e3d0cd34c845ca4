mod common;

use anyhow::Result;
use reqwest::StatusCode;

use common::{BROKEN_TOKEN, VALID_TOKEN};

#[tokio::test]
async fn session_check_returns_identity() -> Result<()> {
    let server = common::spawn_portal_with_backend().await?;

    let res = common::client()
        .get(server.url("/clinic-a/api/session"))
        .bearer_auth(VALID_TOKEN)
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["tenant"], "clinic-a");
    assert_eq!(body["data"]["user"]["profile"]["name"], "Ana");
    Ok(())
}

#[tokio::test]
async fn session_check_answers_401_without_reason() -> Result<()> {
    let server = common::spawn_portal_with_backend().await?;
    let client = common::client();

    for token in [None, Some("expired-token"), Some(BROKEN_TOKEN)] {
        let mut req = client.get(server.url("/clinic-a/api/session"));
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        let res = req.send().await?;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert!(common::location(&res).is_none());
        let body = res.json::<serde_json::Value>().await?;
        assert_eq!(body["message"], "Not authenticated");
    }
    Ok(())
}
