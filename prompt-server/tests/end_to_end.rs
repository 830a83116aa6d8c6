//! Drives the REST backend over a real socket with the HTTP gateway.

use std::sync::Arc;

use prompt_config::ClientConfig;
use prompt_engine::Tab;
use prompt_gateway::{GatewayError, HttpGateway, HttpGatewayConfig, ImageUpload, PromptGateway};
use prompt_kernel::{AlwaysConfirm, ImageChange, ImagePhase, ManagerSession};
use prompt_primitives::{NewPrompt, PromptIndex};
use prompt_store::{PromptStore, StoreConfig};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use uuid::Uuid;

struct Backend {
    gateway: Arc<HttpGateway>,
    shutdown: Option<oneshot::Sender<()>>,
}

impl Drop for Backend {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

async fn spawn_backend() -> Backend {
    let dir = std::env::temp_dir().join(format!("prompt-server-{}", Uuid::new_v4()));
    let store = PromptStore::open(
        StoreConfig::new(dir)
            .without_sample_prompts()
            .with_default_categories(["poses", "lighting"]),
    )
    .await
    .expect("store opens");

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let (tx, rx) = oneshot::channel::<()>();
    tokio::spawn(prompt_server::serve(listener, Arc::new(store), async move {
        let _ = rx.await;
    }));

    let client = ClientConfig {
        base_url: format!("http://{addr}"),
        timeout_secs: 5,
    };
    let config = HttpGatewayConfig::from_client_config(&client).expect("valid client config");
    Backend {
        gateway: Arc::new(HttpGateway::new(config)),
        shutdown: Some(tx),
    }
}

#[tokio::test]
async fn session_round_trip_over_http() {
    let backend = spawn_backend().await;
    let mut session = ManagerSession::new(Arc::clone(&backend.gateway));

    let view = session.open().await.unwrap();
    assert!(view.is_empty());

    let hero = session
        .add_prompt(
            NewPrompt::new("Hero", "standing tall, cape | wind").with_categories(["Poses"]),
            Some(ImageUpload::new("hero.PNG", vec![137_u8, 80, 78, 71])),
        )
        .await
        .unwrap();
    assert_eq!(hero.index, PromptIndex::new(1));
    assert_eq!(hero.phase, ImagePhase::ImageAttached);

    let glow = session
        .add_prompt(
            NewPrompt::new("Glow", "rim light").with_categories(["lighting"]),
            None,
        )
        .await
        .unwrap();
    assert_eq!(glow.phase, ImagePhase::Created);

    let image = backend.gateway.fetch_image("prompt_1.png").await.unwrap();
    assert_eq!(image.as_ref(), &[137, 80, 78, 71]);

    session.set_tab(Tab::category("poses")).unwrap();
    session.select_all().unwrap();
    session.toggle(glow.index).unwrap();
    let output = session.apply().unwrap();
    assert_eq!(output, "standing tall, cape | wind\nrim light");
    assert_eq!(session.badge().as_deref(), Some("✓ 2"));

    session.open().await.unwrap();
    session
        .edit_prompt(hero.index, NewPrompt::new("Hero", "standing tall"), ImageChange::Remove)
        .await
        .unwrap();
    let err = backend.gateway.fetch_image("prompt_1.png").await.unwrap_err();
    assert!(err.is_not_found());

    let view = session.delete_prompt(glow.index, &AlwaysConfirm).await.unwrap();
    assert_eq!(view.items.len(), 1);
    assert_eq!(view.selected_count, 1);
    assert_eq!(session.apply().unwrap(), "standing tall");
}

#[tokio::test]
async fn backend_errors_map_to_statuses() {
    let backend = spawn_backend().await;
    let gateway = &backend.gateway;

    let err = gateway
        .add_prompt(&NewPrompt::new("   ", "body"))
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::Response { status: 400, .. }));

    let err = gateway.delete_prompt(PromptIndex::new(7)).await.unwrap_err();
    assert!(err.is_not_found());

    let err = gateway
        .upload_image(PromptIndex::new(1), &ImageUpload::new("notes.txt", vec![1_u8]))
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::Response { status: 400, .. }));

    let err = gateway.delete_image("../prompts.txt").await.unwrap_err();
    assert!(matches!(err, GatewayError::Response { status: 400, .. }));

    // Deleting an image that never existed still succeeds.
    gateway.delete_image("prompt_9.jpg").await.unwrap();
}

#[tokio::test]
async fn categories_and_bulk_save() {
    let backend = spawn_backend().await;
    let gateway = &backend.gateway;

    gateway.add_category("  Moods ").await.unwrap();
    let labels: Vec<String> = gateway
        .list_categories()
        .await
        .unwrap()
        .into_iter()
        .map(String::from)
        .collect();
    assert_eq!(labels, ["lighting", "moods", "poses"]);

    gateway.delete_category("unknown").await.unwrap();

    for title in ["a", "b", "c"] {
        gateway
            .add_prompt(&NewPrompt::new(title, format!("{title} body")))
            .await
            .unwrap();
    }
    gateway.delete_prompt(PromptIndex::new(2)).await.unwrap();
    let remaining = gateway.list_prompts().await.unwrap();
    let indices: Vec<u64> = remaining.iter().map(|p| p.index.get()).collect();
    assert_eq!(indices, [1, 3]);

    let saved = gateway.save_all(&remaining).await.unwrap();
    assert_eq!(saved, 2);
    let indices: Vec<u64> = gateway
        .list_prompts()
        .await
        .unwrap()
        .iter()
        .map(|p| p.index.get())
        .collect();
    assert_eq!(indices, [1, 2]);
}
