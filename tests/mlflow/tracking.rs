//! Experiment ensure/activate over the REST client.

use mlflow_glue::{
    ensure_experiment, Error, ExperimentNames, MlflowClient, TrackingConfig, TrackingContext,
};

use crate::mock_server::{MockExperiment, MockServer, MockState};

#[tokio::test]
async fn test_ensure_creates_then_reuses() {
    let server = MockServer::start(MockState::default()).await;
    let client = server.client();
    let mut context = TrackingContext::new();

    let first = ensure_experiment(&client, &mut context, "model_registration-alice")
        .await
        .expect("first ensure failed");
    let second = ensure_experiment(&client, &mut context, "model_registration-alice")
        .await
        .expect("second ensure failed");

    assert_eq!(first, second);
    assert_eq!(server.count("create "), 1);
    assert_eq!(server.experiment_count(), 1);
    assert_eq!(context.active_experiment_id(), Some(first.as_str()));
}

#[tokio::test]
async fn test_ensure_existing_experiment() {
    let server = MockServer::start(MockState {
        experiments: vec![MockExperiment {
            id: "17".into(),
            name: "cv-comparison-alice".into(),
            deleted: false,
        }],
        ..Default::default()
    })
    .await;
    let mut context = TrackingContext::new();

    let id = ensure_experiment(&server.client(), &mut context, "cv-comparison-alice")
        .await
        .unwrap();

    assert_eq!(id, "17");
    assert_eq!(server.count("create "), 0);
    let active = context.active_experiment().unwrap();
    assert_eq!(active.artifact_location.as_deref(), Some("mlflow-artifacts:/17"));
}

#[tokio::test]
async fn test_deleted_experiment_is_not_activated() {
    let server = MockServer::start(MockState {
        experiments: vec![MockExperiment {
            id: "3".into(),
            name: "old".into(),
            deleted: true,
        }],
        ..Default::default()
    })
    .await;
    let mut context = TrackingContext::new();

    let err = ensure_experiment(&server.client(), &mut context, "old")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Experiment { .. }));
    assert!(context.active_experiment().is_none());
    assert_eq!(server.count("create "), 0);
}

#[tokio::test]
async fn test_server_failure_is_wrapped() {
    let server = MockServer::start(MockState {
        fail_create: true,
        ..Default::default()
    })
    .await;
    let mut context = TrackingContext::new();

    let err = ensure_experiment(&server.client(), &mut context, "exp")
        .await
        .unwrap_err();

    let message = err.to_string();
    assert!(message.starts_with("Failed to ensure experiment exp: "), "{}", message);
    assert!(message.contains("database is locked"), "{}", message);
}

#[tokio::test]
async fn test_bearer_token_is_sent() {
    let server = MockServer::start(MockState::default()).await;
    let client = MlflowClient::new(&TrackingConfig::new(&server.url).with_token("secret")).unwrap();
    let mut context = TrackingContext::new();

    ensure_experiment(&client, &mut context, "exp").await.unwrap();

    assert_eq!(server.authorization().as_deref(), Some("Bearer secret"));
}

#[tokio::test]
async fn test_per_user_experiment_names() {
    let server = MockServer::start(MockState::default()).await;
    let client = server.client();
    let names = ExperimentNames::for_user("alice");
    let mut context = TrackingContext::new();

    let registration = ensure_experiment(&client, &mut context, &names.model_registration)
        .await
        .unwrap();
    let comparison = ensure_experiment(&client, &mut context, &names.cv_comparison)
        .await
        .unwrap();

    assert_ne!(registration, comparison);
    assert_eq!(
        server.requests(),
        vec![
            "get-by-name model_registration-alice",
            "create model_registration-alice",
            "get-by-name cv-comparison-alice",
            "create cv-comparison-alice",
        ]
    );
    assert_eq!(context.active_experiment().unwrap().name, "cv-comparison-alice");
}
