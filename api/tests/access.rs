use academy_client::ListQuery;
use academy_models::{academy::Academy, team::Team};
use reqwest::StatusCode;

use crate::common::run_app_test;

#[tokio::test]
async fn requests_without_a_key_are_rejected() {
    run_app_test(|app| async move {
        let response = app.client.get("teams").send().await?;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body: serde_json::Value = response.json().await?;
        assert_eq!(body["error"]["kind"], "authn");
        Ok(())
    })
    .await
}

#[tokio::test]
async fn unknown_keys_are_rejected() {
    run_app_test(|app| async move {
        let forged = app
            .client
            .clone_with_api_key(format!("ak1.{}.{}", "A".repeat(22), "B".repeat(22)));
        let err = forged
            .resource::<Team>()
            .list(&ListQuery::new())
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));

        let malformed = app.client.clone_with_api_key("not-a-key");
        let err = malformed
            .resource::<Team>()
            .list(&ListQuery::new())
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
        Ok(())
    })
    .await
}

#[tokio::test]
async fn viewer_can_read_but_not_write() {
    run_app_test(|app| async move {
        let academy = app.add_academy("Read only").await?;

        let academies = app.viewer.resource::<Academy>();
        let fetched = academies.get(academy.id.unwrap()).await?;
        assert_eq!(fetched.name, "Read only");

        let err = academies
            .create(&Academy::new("Not allowed", "owner-3"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::FORBIDDEN));
        assert_eq!(err.kind(), "missing_permission");

        let err = academies.delete(academy.id.unwrap()).await.unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::FORBIDDEN));
        Ok(())
    })
    .await
}
