use super::*;
use tokio::sync::oneshot;

#[tokio::test]
async fn latest_load_wins() {
    let view: ViewHandle<u32> = ViewHandle::new();
    let first = view.begin().await;
    let second = view.begin().await;

    assert!(view.finish(second, Ok(2)).await);
    assert!(!view.finish(first, Ok(1)).await);
    assert_eq!(view.phase().await, Phase::Ready(2));
}

#[tokio::test]
async fn teardown_discards_in_flight_result() {
    let view: ViewHandle<Vec<u32>> = ViewHandle::new();
    let (tx, rx) = oneshot::channel::<Vec<u32>>();

    let loader = view.clone();
    let pending = tokio::spawn(async move {
        loader
            .run(async move { rx.await.map_err(|e| ClientError::Network(e.to_string())) })
            .await
    });

    tokio::task::yield_now().await;
    while !view.is_loading().await {
        tokio::task::yield_now().await;
    }
    view.teardown().await;
    tx.send(vec![1, 2, 3]).expect("send");

    let result = pending.await.expect("join");
    assert_eq!(result, Ok(vec![1, 2, 3]));
    assert_eq!(view.phase().await, Phase::Idle);
    assert_eq!(view.data().await, None);
}

#[tokio::test]
async fn failures_are_kept_until_next_load() {
    let view: ViewHandle<u32> = ViewHandle::new();
    let result = view.run(async { Err(ClientError::Unauthorized) }).await;
    assert_eq!(result, Err(ClientError::Unauthorized));
    assert_eq!(view.phase().await, Phase::Failed(ClientError::Unauthorized));

    view.run(async { Ok(5) }).await.expect("reload");
    assert_eq!(view.data().await, Some(5));
}

#[tokio::test]
async fn update_only_touches_ready_data() {
    let view: ViewHandle<Vec<u32>> = ViewHandle::new();
    view.update(|items| items.push(1)).await;
    assert_eq!(view.phase().await, Phase::Idle);

    view.run(async { Ok(vec![1]) }).await.expect("load");
    view.update(|items| items.push(2)).await;
    assert_eq!(view.data().await, Some(vec![1, 2]));
}

#[test]
fn upload_rejects_bad_mime_type() {
    let upload = Upload {
        filename: "logo.png".to_string(),
        mime_type: Some("not a mime".to_string()),
        bytes: vec![1, 2, 3],
    };
    assert!(matches!(upload.into_part(), Err(ClientError::InvalidInput(_))));

    let upload = Upload {
        filename: "logo.png".to_string(),
        mime_type: Some("image/png".to_string()),
        bytes: vec![1, 2, 3],
    };
    assert!(upload.into_part().is_ok());
}
