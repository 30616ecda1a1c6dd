//! End-to-end relay tests over real WebSocket connections.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use ai_relay_core::{Relay, Role};
use ai_relay_transport::create_relay_router;
use futures::{SinkExt, StreamExt};
use tokio_tungstenite::{connect_async, tungstenite::Message};

async fn spawn_server(relay: Arc<Relay>) -> SocketAddr {
    let app = create_relay_router(relay);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn wait_for_peers(relay: &Relay, role: Role, expected: usize) {
    for _ in 0..100 {
        if relay.registry().peer_count(role).await == expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!(
        "expected {expected} {role} peer(s), found {}",
        relay.registry().peer_count(role).await
    );
}

async fn next_text<S>(stream: &mut S) -> String
where
    S: futures::Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    let msg = tokio::time::timeout(Duration::from_secs(2), stream.next())
        .await
        .expect("timed out waiting for frame")
        .expect("stream ended")
        .expect("websocket error");
    msg.into_text().expect("expected text frame").to_string()
}

#[tokio::test]
async fn ai_frames_fan_out_and_disconnects_shrink_the_peer_set() {
    let relay = Arc::new(Relay::default());
    let addr = spawn_server(Arc::clone(&relay)).await;

    let (ui1, _) = connect_async(format!("ws://{addr}/ws/front?client_id=ui1"))
        .await
        .unwrap();
    let (ui2, _) = connect_async(format!("ws://{addr}/ws/front?client_id=ui2"))
        .await
        .unwrap();
    let (mut ui1_tx, mut ui1_rx) = ui1.split();
    let (mut ui2_tx, mut ui2_rx) = ui2.split();
    wait_for_peers(&relay, Role::Front, 2).await;

    let (bot, _) = connect_async(format!("ws://{addr}/ws/ai_server?client_id=bot1"))
        .await
        .unwrap();
    let (mut bot_tx, _bot_rx) = bot.split();
    wait_for_peers(&relay, Role::AiServer, 1).await;

    bot_tx.send(Message::text("alert")).await.unwrap();
    assert_eq!(next_text(&mut ui1_rx).await, "Message from AI Server (bot1): alert");
    assert_eq!(next_text(&mut ui2_rx).await, "Message from AI Server (bot1): alert");

    // ui2 goes away; the next broadcast reaches ui1 only.
    ui2_tx.send(Message::Close(None)).await.unwrap();
    wait_for_peers(&relay, Role::Front, 1).await;

    bot_tx.send(Message::text("alert2")).await.unwrap();
    assert_eq!(next_text(&mut ui1_rx).await, "Message from AI Server (bot1): alert2");
}

#[tokio::test]
async fn front_frames_are_received_but_not_relayed() {
    let relay = Arc::new(Relay::default());
    let addr = spawn_server(Arc::clone(&relay)).await;

    let (front, _) = connect_async(format!("ws://{addr}/ws/front?client_id=ui1"))
        .await
        .unwrap();
    let (mut front_tx, mut front_rx) = front.split();
    wait_for_peers(&relay, Role::Front, 1).await;

    let (bot, _) = connect_async(format!("ws://{addr}/ws/ai_server?client_id=bot1"))
        .await
        .unwrap();
    let (mut bot_tx, mut bot_rx) = bot.split();
    wait_for_peers(&relay, Role::AiServer, 1).await;

    front_tx.send(Message::text("status?")).await.unwrap();

    // The front frame goes nowhere, and both connections stay usable.
    assert!(
        tokio::time::timeout(Duration::from_millis(200), bot_rx.next())
            .await
            .is_err()
    );
    bot_tx.send(Message::text("still here")).await.unwrap();
    assert_eq!(
        next_text(&mut front_rx).await,
        "Message from AI Server (bot1): still here"
    );
}

#[tokio::test]
async fn unidentified_peers_of_a_role_share_one_registry_slot() {
    let relay = Arc::new(Relay::default());
    let addr = spawn_server(Arc::clone(&relay)).await;

    let (_first, _) = connect_async(format!("ws://{addr}/ws/front")).await.unwrap();
    wait_for_peers(&relay, Role::Front, 1).await;
    let first_conn = relay.registry().snapshot(Role::Front).await[0].1.conn_id();

    let (second, _) = connect_async(format!("ws://{addr}/ws/front")).await.unwrap();
    let (_second_tx, mut second_rx) = second.split();

    // Both connections register under "front"; the second takes the slot.
    for _ in 0..100 {
        if relay.registry().snapshot(Role::Front).await[0].1.conn_id() != first_conn {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(relay.registry().peer_count(Role::Front).await, 1);
    assert_ne!(
        relay.registry().snapshot(Role::Front).await[0].1.conn_id(),
        first_conn
    );

    let (bot, _) = connect_async(format!("ws://{addr}/ws/ai_server")).await.unwrap();
    let (mut bot_tx, _) = bot.split();
    wait_for_peers(&relay, Role::AiServer, 1).await;

    bot_tx.send(Message::text("hello")).await.unwrap();
    assert_eq!(
        next_text(&mut second_rx).await,
        "Message from AI Server (ai_server): hello"
    );
}
