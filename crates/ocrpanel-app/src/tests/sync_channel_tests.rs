use std::time::Duration;

use ocrpanel_types::{AppEvent, ControlAction, UiCommand};
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use crate::io::{feed_commands, tick_io};

#[tokio::test]
async fn test_sync_sender_reaches_async_receiver() {
    let (tx, rx) = kanal::bounded_async::<AppEvent>(8);
    let sync_tx = tx.clone_sync();

    // stdin reader runs on a plain thread
    std::thread::spawn(move || {
        sync_tx
            .send(AppEvent::Command(UiCommand::Control(ControlAction::Start)))
            .expect("send failed");
    });

    let result = timeout(Duration::from_secs(2), rx.recv()).await;

    match result {
        Ok(Ok(AppEvent::Command(UiCommand::Control(action)))) => {
            assert_eq!(action, ControlAction::Start);
        }
        Ok(Ok(_)) => panic!("Wrong event type"),
        Ok(Err(e)) => panic!("Channel error: {}", e),
        Err(_) => panic!("Timeout - event never arrived!"),
    }
}

#[tokio::test]
async fn test_feed_commands_ends_with_quit() {
    let (tx, rx) = kanal::unbounded_async::<AppEvent>();

    feed_commands(vec![UiCommand::Show, UiCommand::LoadOcrSettings], tx)
        .await
        .expect("feed failed");

    let mut received = Vec::new();
    while let Ok(Some(event)) = rx.try_recv() {
        received.push(event);
    }

    assert_eq!(
        received,
        vec![
            AppEvent::Command(UiCommand::Show),
            AppEvent::Command(UiCommand::LoadOcrSettings),
            AppEvent::Command(UiCommand::Quit),
        ]
    );
}

#[tokio::test]
async fn test_tick_io_stops_on_cancel() {
    let (tx, rx) = kanal::unbounded_async::<AppEvent>();
    let cancel = CancellationToken::new();

    let handle = tokio::spawn(tick_io(Duration::from_millis(10), cancel.clone(), tx));

    let first = timeout(Duration::from_secs(2), rx.recv()).await;
    assert!(matches!(first, Ok(Ok(AppEvent::Tick))));

    cancel.cancel();
    let result = timeout(Duration::from_secs(2), handle).await;
    assert!(result.is_ok(), "tick task ignored cancellation");
}

#[tokio::test]
async fn test_tick_io_stops_when_receiver_dropped() {
    let (tx, rx) = kanal::unbounded_async::<AppEvent>();
    drop(rx);

    let result = timeout(
        Duration::from_secs(2),
        tick_io(Duration::from_millis(10), CancellationToken::new(), tx),
    )
    .await;
    assert!(matches!(result, Ok(Ok(()))));
}
