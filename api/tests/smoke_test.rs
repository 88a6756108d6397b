use academy_test::wait_for;

use crate::common::run_app_test;

#[tokio::test]
async fn smoke_test() {
    run_app_test(|app| async move {
        let status = wait_for(|| {
            let client = app.client.clone();
            async move {
                let response = client.get("health").send().await.ok()?;
                Some(response.status())
            }
        })
        .await
        .expect("server responds");

        assert_eq!(status.as_u16(), 200, "response status code should be 200");
        Ok(())
    })
    .await
}
