use std::collections::HashMap;

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
    Extension,
};
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::middleware::TraceId;
use crate::application::services::ShowcaseFilter;
use crate::carousel::{CarouselCommand, CarouselHandle, CarouselSession, CarouselSettings, CarouselState};
use crate::domain::Category;
use crate::events::Event;
use crate::state::AppContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CarouselKind {
    Featured,
    Testimonials,
    /// The projects grid, optionally filtered by category.
    Projects,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ClientMessage {
    Mount {
        carousel: CarouselKind,
        category: Option<String>,
    },
    Next {
        carousel: Option<CarouselKind>,
    },
    Previous {
        carousel: Option<CarouselKind>,
    },
    GoTo {
        carousel: Option<CarouselKind>,
        index: usize,
    },
    Hover {
        carousel: Option<CarouselKind>,
        active: bool,
    },
    Unmount {
        carousel: Option<CarouselKind>,
    },
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ServerMessage<'a> {
    Frame {
        carousel: CarouselKind,
        #[serde(flatten)]
        state: CarouselState,
        item: Option<&'a Value>,
    },
    Event {
        #[serde(flatten)]
        event: &'a Event,
    },
    Error {
        message: String,
    },
}

impl ServerMessage<'_> {
    fn to_text(&self) -> Option<String> {
        serde_json::to_string(self)
            .map_err(|e| warn!("Failed to serialize WebSocket message: {}", e))
            .ok()
    }
}

/// Frame forwarding task, aborted on drop.
struct Forwarder(JoinHandle<()>);

impl Drop for Forwarder {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// A carousel mounted by one connection. Dropping it stops the session and
/// the task forwarding its frames.
struct MountedCarousel {
    handle: CarouselHandle,
    _forwarder: Forwarder,
    category: Option<Category>,
    items: Vec<Value>,
    /// Session list generation that `items` belongs to.
    generation: u64,
}

/// Per-connection carousel registry.
struct Carousels {
    mounted: HashMap<CarouselKind, MountedCarousel>,
    /// Target for commands that don't name a carousel.
    last_mounted: Option<CarouselKind>,
    settings: CarouselSettings,
    outbound: mpsc::UnboundedSender<String>,
}

impl Carousels {
    fn new(settings: CarouselSettings, outbound: mpsc::UnboundedSender<String>) -> Self {
        Self {
            mounted: HashMap::new(),
            last_mounted: None,
            settings,
            outbound,
        }
    }

    fn resolve(&self, kind: Option<CarouselKind>) -> Result<CarouselKind, String> {
        kind.or(self.last_mounted)
            .filter(|kind| self.mounted.contains_key(kind))
            .ok_or_else(|| "No carousel mounted".to_string())
    }

    fn send(&self, kind: Option<CarouselKind>, command: CarouselCommand) -> Result<(), String> {
        let kind = self.resolve(kind)?;
        if let Some(mounted) = self.mounted.get(&kind) {
            mounted.handle.send(command);
        }
        Ok(())
    }

    fn is_current(&self, kind: CarouselKind, category: Option<Category>, items: &[Value]) -> bool {
        self.mounted
            .get(&kind)
            .is_some_and(|m| m.category == category && m.items == items)
    }

    /// Mount a carousel. The client always gets a frame back, even when the
    /// carousel was already mounted with the same items.
    fn mount(&mut self, kind: CarouselKind, category: Option<Category>, items: Vec<Value>) {
        self.last_mounted = Some(kind);

        if self.is_current(kind, category, &items) {
            self.push_current_frame(kind);
            return;
        }
        self.install(kind, category, items);
    }

    /// Swap the list behind a mounted carousel. No-op when nothing changed.
    fn replace(&mut self, kind: CarouselKind, category: Option<Category>, items: Vec<Value>) {
        if !self.mounted.contains_key(&kind) || self.is_current(kind, category, &items) {
            return;
        }
        self.install(kind, category, items);
    }

    fn install(&mut self, kind: CarouselKind, category: Option<Category>, items: Vec<Value>) {
        let (handle, generation) = match self.mounted.remove(&kind) {
            // Keep the running session; the old forwarder goes away first.
            Some(MountedCarousel {
                handle,
                _forwarder: forwarder,
                generation,
                ..
            }) => {
                drop(forwarder);
                handle.send(CarouselCommand::ReplaceItems(items.len()));
                (handle, generation + 1)
            }
            None => (CarouselSession::spawn(items.len(), self.settings), 0),
        };

        let forwarder = spawn_forwarder(kind, &handle, generation, items.clone(), self.outbound.clone());
        self.mounted.insert(
            kind,
            MountedCarousel {
                handle,
                _forwarder: forwarder,
                category,
                items,
                generation,
            },
        );
    }

    fn push_current_frame(&self, kind: CarouselKind) {
        let Some(mounted) = self.mounted.get(&kind) else {
            return;
        };
        let state = mounted.handle.state();
        // A pending reset will reach the client through the forwarder.
        if state.generation != mounted.generation {
            return;
        }
        if let Some(text) = frame_text(kind, state, &mounted.items) {
            let _ = self.outbound.send(text);
        }
    }

    fn unmount(&mut self, kind: CarouselKind) {
        if let Some(MountedCarousel { handle, .. }) = self.mounted.remove(&kind) {
            handle.shutdown();
            debug!("Carousel unmounted: {:?}", kind);
        }
        if self.last_mounted == Some(kind) {
            self.last_mounted = None;
        }
    }
}

fn frame_text(kind: CarouselKind, state: CarouselState, items: &[Value]) -> Option<String> {
    let item = state.index.and_then(|i| items.get(i));
    ServerMessage::Frame {
        carousel: kind,
        state,
        item,
    }
    .to_text()
}

/// Forwards frames of one list generation. States from an older generation
/// are skipped; a newer one means this forwarder has been replaced.
fn spawn_forwarder(
    kind: CarouselKind,
    handle: &CarouselHandle,
    generation: u64,
    items: Vec<Value>,
    outbound: mpsc::UnboundedSender<String>,
) -> Forwarder {
    let mut frames = handle.subscribe();

    Forwarder(tokio::spawn(async move {
        loop {
            let state = *frames.borrow_and_update();
            if state.generation > generation {
                break;
            }
            if state.generation == generation {
                if let Some(text) = frame_text(kind, state, &items) {
                    if outbound.send(text).is_err() {
                        break;
                    }
                }
            }
            if frames.changed().await.is_err() {
                break;
            }
        }
    }))
}

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(ctx): State<AppContext>,
    Extension(TraceId(trace_id)): Extension<TraceId>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, ctx, trace_id))
}

async fn handle_socket(socket: WebSocket, ctx: AppContext, trace_id: String) {
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    info!("[{}] WebSocket client connected", trace_id);

    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    });

    let mut events = ctx.subscribe_events();
    let mut carousels = Carousels::new(ctx.carousel_settings, tx.clone());

    loop {
        tokio::select! {
            msg = receiver.next() => {
                let text = match msg {
                    Some(Ok(Message::Text(text))) => text,
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => {
                        warn!("[{}] WebSocket receive error: {}", trace_id, e);
                        break;
                    }
                };
                if let Err(e) = handle_client_message(text.as_str(), &ctx, &trace_id, &mut carousels).await {
                    warn!("[{}] Error handling client message: {}", trace_id, e);
                    if let Some(text) = (ServerMessage::Error { message: e }).to_text() {
                        let _ = tx.send(text);
                    }
                }
            }
            event = events.recv() => {
                match event {
                    Ok(event) => {
                        if matches!(event, Event::RepositoriesRefreshed { .. }) {
                            refresh_projects_carousel(&ctx, &trace_id, &mut carousels).await;
                        }
                        if let Some(text) = (ServerMessage::Event { event: &event }).to_text() {
                            let _ = tx.send(text);
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!("[{}] WebSocket client lagged, skipped {} events", trace_id, skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            _ = &mut send_task => break,
        }
    }

    drop(carousels);
    send_task.abort();

    info!("[{}] WebSocket client disconnected", trace_id);
}

async fn handle_client_message(
    text: &str,
    ctx: &AppContext,
    trace_id: &str,
    carousels: &mut Carousels,
) -> Result<(), String> {
    let msg: ClientMessage =
        serde_json::from_str(text).map_err(|e| format!("Failed to parse message: {}", e))?;

    match msg {
        ClientMessage::Mount { carousel, category } => {
            let category = match category.as_deref().map(str::trim) {
                None | Some("") => None,
                Some(raw) if raw.eq_ignore_ascii_case("all") => None,
                Some(raw) => Some(raw.parse::<Category>()?),
            };
            let items = carousel_items(ctx, trace_id, carousel, category).await;
            info!("[{}] Mounting {:?} carousel with {} items", trace_id, carousel, items.len());
            carousels.mount(carousel, category, items);
        }
        ClientMessage::Next { carousel } => carousels.send(carousel, CarouselCommand::Next)?,
        ClientMessage::Previous { carousel } => {
            carousels.send(carousel, CarouselCommand::Previous)?
        }
        ClientMessage::GoTo { carousel, index } => {
            carousels.send(carousel, CarouselCommand::GoTo(index))?
        }
        ClientMessage::Hover { carousel, active } => {
            carousels.send(carousel, CarouselCommand::Hover(active))?
        }
        ClientMessage::Unmount { carousel } => {
            let kind = carousels.resolve(carousel)?;
            carousels.unmount(kind);
        }
    }

    Ok(())
}

/// Re-derive the projects carousel after the repository snapshot changed.
async fn refresh_projects_carousel(ctx: &AppContext, trace_id: &str, carousels: &mut Carousels) {
    let Some(category) = carousels
        .mounted
        .get(&CarouselKind::Projects)
        .map(|mounted| mounted.category)
    else {
        return;
    };

    let items = carousel_items(ctx, trace_id, CarouselKind::Projects, category).await;
    carousels.replace(CarouselKind::Projects, category, items);
}

async fn carousel_items(
    ctx: &AppContext,
    trace_id: &str,
    kind: CarouselKind,
    category: Option<Category>,
) -> Vec<Value> {
    match kind {
        CarouselKind::Featured => ctx
            .showcase_service
            .featured_projects()
            .iter()
            .filter_map(|project| serde_json::to_value(project).ok())
            .collect(),
        CarouselKind::Testimonials => ctx
            .content
            .recommendations
            .iter()
            .filter_map(|recommendation| {
                let mut value = serde_json::to_value(recommendation).ok()?;
                if let Value::Object(fields) = &mut value {
                    fields.insert(
                        "display_date".to_string(),
                        Value::String(recommendation.display_date()),
                    );
                }
                Some(value)
            })
            .collect(),
        CarouselKind::Projects => ctx
            .showcase_service
            .showcase(
                trace_id,
                &ShowcaseFilter {
                    category,
                    ..ShowcaseFilter::default()
                },
            )
            .await
            .showcase
            .grid
            .iter()
            .filter_map(|item| serde_json::to_value(item).ok())
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carousel::Direction;

    #[test]
    fn test_parse_client_messages() {
        let mount: ClientMessage =
            serde_json::from_str(r#"{"type":"mount","carousel":"featured"}"#).unwrap();
        assert!(matches!(
            mount,
            ClientMessage::Mount {
                carousel: CarouselKind::Featured,
                category: None
            }
        ));

        let go_to: ClientMessage = serde_json::from_str(r#"{"type":"go_to","index":2}"#).unwrap();
        assert!(matches!(go_to, ClientMessage::GoTo { carousel: None, index: 2 }));

        let hover: ClientMessage =
            serde_json::from_str(r#"{"type":"hover","carousel":"testimonials","active":true}"#)
                .unwrap();
        assert!(matches!(
            hover,
            ClientMessage::Hover {
                carousel: Some(CarouselKind::Testimonials),
                active: true
            }
        ));

        assert!(serde_json::from_str::<ClientMessage>(r#"{"type":"spin"}"#).is_err());
    }

    #[test]
    fn test_frame_shape() {
        let item = serde_json::json!({ "title": "Habit Tracker" });
        let frame = ServerMessage::Frame {
            carousel: CarouselKind::Featured,
            state: CarouselState {
                index: Some(1),
                direction: Direction::Backward,
                autoplay: false,
                len: 3,
                generation: 0,
            },
            item: Some(&item),
        };

        let value: Value = serde_json::from_str(&frame.to_text().unwrap()).unwrap();
        assert_eq!(value["type"], "frame");
        assert_eq!(value["carousel"], "featured");
        assert_eq!(value["index"], 1);
        assert_eq!(value["direction"], "backward");
        assert_eq!(value["autoplay"], false);
        assert_eq!(value["len"], 3);
        assert_eq!(value["item"]["title"], "Habit Tracker");
    }

    #[test]
    fn test_event_shape() {
        let event = Event::repositories_refreshed(4, None);
        let value: Value =
            serde_json::from_str(&(ServerMessage::Event { event: &event }).to_text().unwrap())
                .unwrap();
        assert_eq!(value["type"], "event");
        assert_eq!(value["event"], "repositories_refreshed");
        assert_eq!(value["count"], 4);
    }

    fn cards(prefix: &str, n: usize) -> Vec<Value> {
        (0..n)
            .map(|i| serde_json::json!({ "title": format!("{}-{}", prefix, i) }))
            .collect()
    }

    async fn next_frame(rx: &mut mpsc::UnboundedReceiver<String>) -> Value {
        let text = tokio::time::timeout(std::time::Duration::from_secs(2), rx.recv())
            .await
            .expect("no frame within 2s")
            .expect("outbound channel closed");
        serde_json::from_str(&text).unwrap()
    }

    fn registry() -> (Carousels, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Carousels::new(CarouselSettings::default(), tx), rx)
    }

    #[tokio::test]
    async fn test_mount_sends_initial_frame() {
        let (mut carousels, mut rx) = registry();

        carousels.mount(CarouselKind::Featured, None, cards("a", 3));

        let frame = next_frame(&mut rx).await;
        assert_eq!(frame["type"], "frame");
        assert_eq!(frame["carousel"], "featured");
        assert_eq!(frame["index"], 0);
        assert_eq!(frame["len"], 3);
        assert_eq!(frame["item"]["title"], "a-0");
        assert!(frame.get("generation").is_none());
    }

    #[tokio::test]
    async fn test_remount_with_same_items_resends_frame() {
        let (mut carousels, mut rx) = registry();

        carousels.mount(CarouselKind::Featured, None, cards("a", 3));
        next_frame(&mut rx).await;

        carousels.mount(CarouselKind::Featured, None, cards("a", 3));
        let frame = next_frame(&mut rx).await;
        assert_eq!(frame["carousel"], "featured");
        assert_eq!(frame["index"], 0);
        assert_eq!(frame["item"]["title"], "a-0");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_new_items_reset_to_first_without_stale_frames() {
        for _ in 0..50 {
            let (mut carousels, mut rx) = registry();

            carousels.mount(CarouselKind::Projects, None, cards("old", 5));
            next_frame(&mut rx).await;
            carousels.send(None, CarouselCommand::GoTo(3)).unwrap();
            assert_eq!(next_frame(&mut rx).await["index"], 3);

            carousels.mount(CarouselKind::Projects, Some(Category::DataScience), cards("new", 10));

            let frame = next_frame(&mut rx).await;
            assert_eq!(frame["index"], 0, "stale frame after remount: {}", frame);
            assert_eq!(frame["len"], 10);
            assert_eq!(frame["item"]["title"], "new-0");
        }
    }

    #[tokio::test]
    async fn test_shorter_list_never_reports_out_of_range_index() {
        let (mut carousels, mut rx) = registry();

        carousels.mount(CarouselKind::Projects, None, cards("old", 5));
        next_frame(&mut rx).await;
        carousels.send(None, CarouselCommand::GoTo(4)).unwrap();
        next_frame(&mut rx).await;

        carousels.mount(CarouselKind::Projects, Some(Category::GameDevelopment), cards("new", 2));

        let frame = next_frame(&mut rx).await;
        assert_eq!(frame["index"], 0);
        assert_eq!(frame["len"], 2);
        assert_eq!(frame["item"]["title"], "new-0");
    }

    #[tokio::test]
    async fn test_untargeted_commands_go_to_last_mounted() {
        let (mut carousels, mut rx) = registry();

        carousels.mount(CarouselKind::Featured, None, cards("f", 3));
        next_frame(&mut rx).await;
        carousels.mount(CarouselKind::Testimonials, None, cards("t", 2));
        next_frame(&mut rx).await;

        carousels.send(None, CarouselCommand::Next).unwrap();
        let frame = next_frame(&mut rx).await;
        assert_eq!(frame["carousel"], "testimonials");
        assert_eq!(frame["index"], 1);
        assert_eq!(frame["direction"], "forward");

        carousels.send(Some(CarouselKind::Featured), CarouselCommand::Previous).unwrap();
        let frame = next_frame(&mut rx).await;
        assert_eq!(frame["carousel"], "featured");
        assert_eq!(frame["index"], 2);
        assert_eq!(frame["direction"], "backward");
    }

    #[tokio::test]
    async fn test_unmount_stops_routing() {
        let (mut carousels, mut rx) = registry();

        carousels.mount(CarouselKind::Featured, None, cards("f", 3));
        next_frame(&mut rx).await;

        carousels.unmount(CarouselKind::Featured);

        assert!(carousels.send(None, CarouselCommand::Next).is_err());
        assert!(carousels.resolve(Some(CarouselKind::Featured)).is_err());
        assert!(carousels.mounted.is_empty());
    }

    #[tokio::test]
    async fn test_repository_refresh_rederives_projects_carousel() {
        use crate::config::AppConfig;
        use crate::content::ContentLoader;
        use crate::github::GitHubClient;
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/someone/repos"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
                "id": 1,
                "name": "notebooks",
                "html_url": "https://github.com/someone/notebooks",
                "stargazers_count": 0,
                "fork": false,
                "language": "Python",
                "updated_at": "2024-02-01T00:00:00Z"
            }])))
            .mount(&mock_server)
            .await;

        let config = AppConfig {
            github_username: Some("someone".to_string()),
            ..AppConfig::default()
        };
        let ctx = AppContext::with_client(
            &config,
            ContentLoader::bundled().unwrap(),
            GitHubClient::with_base_url(mock_server.uri(), None),
        );
        let (mut carousels, mut rx) = registry();

        let items = carousel_items(&ctx, "t", CarouselKind::Projects, None).await;
        let before = items.len();
        carousels.mount(CarouselKind::Projects, None, items);
        next_frame(&mut rx).await;
        carousels.mount(CarouselKind::Featured, None, cards("f", 3));
        next_frame(&mut rx).await;

        // Nothing changed yet, so nothing is sent
        refresh_projects_carousel(&ctx, "t", &mut carousels).await;
        assert!(rx.try_recv().is_err());

        ctx.showcase_service.refresh("t").await;
        refresh_projects_carousel(&ctx, "t", &mut carousels).await;

        let frame = next_frame(&mut rx).await;
        assert_eq!(frame["carousel"], "projects");
        assert_eq!(frame["index"], 0);
        assert_eq!(frame["len"], before + 1);
        assert_eq!(carousels.last_mounted, Some(CarouselKind::Featured));
    }
}
