//! End-to-end scenario: a blueprint created over HTTP picks up points
//! drawn over the realtime channel, and room peers see them live.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use actix::prelude::*;
use actix_web::{test, web, App};
use blueprints_server::api::handlers::{create_blueprint, get_blueprint};
use blueprints_server::relay::{Connect, Draw, DrawPayload, Join, ServerEvent};
use blueprints_server::{AppState, Settings};
use serde_json::json;
use tokio::time::sleep;
use uuid::Uuid;

struct Recorder {
    received: Arc<Mutex<Vec<ServerEvent>>>,
}

impl Actor for Recorder {
    type Context = Context<Self>;
}

impl Handler<ServerEvent> for Recorder {
    type Result = ();

    fn handle(&mut self, msg: ServerEvent, _: &mut Context<Self>) {
        self.received.lock().unwrap().push(msg);
    }
}

#[actix_web::test]
async fn test_create_draw_and_observe() {
    let mut config = Settings::new().expect("Failed to load test config");
    // Pin the policies the assertions depend on, so ambient APP_* overrides
    // cannot invert them
    config.api.compat_not_found = true;
    config.relay.strict_events = false;
    let state = web::Data::new(AppState::new(config));
    let app = test::init_service(
        App::new().app_data(state.clone()).service(
            web::scope("/api/v1/blueprints")
                .route("", web::post().to(create_blueprint))
                .route("/{author}/{name}", web::get().to(get_blueprint)),
        ),
    )
    .await;

    // create(author="alice", name="house", points=[]) -> 201
    let create_response = test::TestRequest::post()
        .uri("/api/v1/blueprints")
        .set_json(json!({"author": "alice", "name": "house", "points": []}))
        .send_request(&app)
        .await;
    assert_eq!(create_response.status(), 201);

    // Two peers in room "r1": A draws, B watches
    let a_events = Arc::new(Mutex::new(Vec::new()));
    let b_events = Arc::new(Mutex::new(Vec::new()));
    let a_addr = Recorder { received: a_events.clone() }.start();
    let b_addr = Recorder { received: b_events.clone() }.start();
    let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

    let relay = state.relay.clone();
    relay.send(Connect { id: a, addr: a_addr.recipient() }).await.unwrap();
    relay.send(Connect { id: b, addr: b_addr.recipient() }).await.unwrap();
    relay.send(Join { id: a, room: "r1".to_string() }).await.unwrap();
    relay.send(Join { id: b, room: "r1".to_string() }).await.unwrap();

    let point = json!({"x": 1, "y": 2});
    relay
        .send(Draw {
            id: a,
            event: DrawPayload {
                author: "alice".to_string(),
                name: "house".to_string(),
                room: "r1".to_string(),
                point: point.clone(),
            },
        })
        .await
        .unwrap();
    sleep(Duration::from_millis(50)).await;

    // B receives {points: [{x:1, y:2}]}, A gets no echo
    assert_eq!(
        *b_events.lock().unwrap(),
        vec![ServerEvent::BlueprintUpdate {
            points: vec![point.clone()]
        }]
    );
    assert!(a_events.lock().unwrap().is_empty());

    // Subsequent get shows the appended point
    let get_response = test::TestRequest::get()
        .uri("/api/v1/blueprints/alice/house")
        .send_request(&app)
        .await;
    let body: serde_json::Value = test::read_body_json(get_response).await;
    assert_eq!(body["data"]["points"], json!([{"x": 1, "y": 2}]));
}
