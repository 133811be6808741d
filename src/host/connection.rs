//! WebSocket session with the Stream Deck application.

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use futures_util::{Sink, SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, trace, warn};

use super::image;
use super::protocol::{InboundEvent, OutboundMessage, Registration};
use crate::config::PluginConfig;
use crate::display::{Display, DisplayError};
use crate::fetch::MetricFetcher;
use crate::registry::MonitorRegistry;
use crate::render::Bitmap;

/// Outbound frames buffered before display calls start waiting.
const OUTBOUND_CAPACITY: usize = 64;

/// What the host passes on the command line when it launches the plugin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationParams {
    pub port: u16,
    pub plugin_uuid: String,
    pub register_event: String,
    /// Raw JSON describing the application and attached devices.
    pub info: Option<String>,
}

impl RegistrationParams {
    pub fn url(&self) -> String {
        format!("ws://127.0.0.1:{}", self.port)
    }

    /// Version of the host application, from `info`.
    pub fn host_version(&self) -> Option<String> {
        let info: serde_json::Value = serde_json::from_str(self.info.as_deref()?).ok()?;
        info.pointer("/application/version")?
            .as_str()
            .map(str::to_string)
    }

    fn registration(&self) -> Registration {
        Registration {
            event: self.register_event.clone(),
            uuid: self.plugin_uuid.clone(),
        }
    }
}

/// [`Display`] that queues frames for the connection's writer task.
#[derive(Debug, Clone)]
pub struct HostDisplay {
    tx: mpsc::Sender<OutboundMessage>,
}

impl HostDisplay {
    pub fn new(tx: mpsc::Sender<OutboundMessage>) -> Self {
        Self { tx }
    }

    async fn send(&self, message: OutboundMessage) -> Result<(), DisplayError> {
        self.tx.send(message).await.map_err(|_| DisplayError::Closed)
    }
}

#[async_trait]
impl Display for HostDisplay {
    async fn set_image(&self, context: &str, image: &Bitmap) -> Result<(), DisplayError> {
        self.send(OutboundMessage::set_image(context, image::data_url(image)))
            .await
    }

    async fn set_title(&self, context: &str, title: &str) -> Result<(), DisplayError> {
        self.send(OutboundMessage::set_title(context, title)).await
    }
}

/// Routes host events for one action to the monitor registry.
#[derive(Debug)]
pub struct Router {
    action: String,
    registry: MonitorRegistry,
}

impl Router {
    pub fn new(action: impl Into<String>, registry: MonitorRegistry) -> Self {
        Self {
            action: action.into(),
            registry,
        }
    }

    pub fn registry(&self) -> &MonitorRegistry {
        &self.registry
    }

    /// Decode and route one text frame. Malformed frames are logged and
    /// dropped.
    pub fn dispatch_text(&self, text: &str) {
        match serde_json::from_str::<InboundEvent>(text) {
            Ok(event) => self.dispatch(event),
            Err(err) => warn!(error = %err, "Ignoring malformed host frame"),
        }
    }

    pub fn dispatch(&self, event: InboundEvent) {
        let id = match event.action_event() {
            Some(action) if action.action == self.action => action.button_id(),
            Some(action) => {
                trace!(action = %action.action, event = event.name(), "Ignoring foreign action");
                return;
            }
            None => return,
        };

        match event {
            InboundEvent::WillAppear(action) => {
                let generation =
                    self.registry
                        .on_appear(id.clone(), action.context, action.payload.settings);
                info!(button = %id, generation, "Button appeared");
            }
            InboundEvent::DidReceiveSettings(action) => {
                let delivery = self.registry.on_settings_changed(&id, action.payload.settings);
                debug!(button = %id, ?delivery, "Settings received");
            }
            InboundEvent::WillDisappear(_) => {
                let stopped = self.registry.on_disappear(&id);
                info!(button = %id, stopped, "Button disappeared");
            }
            InboundEvent::Unknown => {}
        }
    }
}

/// Register with the host and serve events until the socket closes.
///
/// Every monitor is stopped before this returns.
pub async fn run(
    params: &RegistrationParams,
    config: &PluginConfig,
    fetcher: Arc<dyn MetricFetcher>,
) -> anyhow::Result<()> {
    let url = params.url();
    let (socket, _) = tokio_tungstenite::connect_async(url.as_str())
        .await
        .with_context(|| format!("Failed to connect to host at {url}"))?;
    info!(%url, host_version = params.host_version().as_deref(), "Connected to host");

    let (mut sink, mut stream) = socket.split();
    let registration = serde_json::to_string(&params.registration())?;
    sink.send(Message::Text(registration))
        .await
        .context("Failed to register with host")?;
    debug!(uuid = %params.plugin_uuid, event = %params.register_event, "Registered");

    let (tx, rx) = mpsc::channel(OUTBOUND_CAPACITY);
    let writer = tokio::spawn(write_frames(sink, rx));

    let registry = MonitorRegistry::new(
        fetcher,
        Arc::new(HostDisplay::new(tx)),
        config.monitor_options(),
    );
    let router = Router::new(config.action.clone(), registry);

    while let Some(frame) = stream.next().await {
        match frame {
            Ok(Message::Text(text)) => router.dispatch_text(&text),
            Ok(Message::Close(reason)) => {
                debug!(?reason, "Host sent close");
                break;
            }
            Ok(_) => {}
            Err(err) => {
                warn!(error = %err, "Host connection failed");
                break;
            }
        }
    }

    let stopped = router.registry().shutdown();
    info!(stopped, "Host connection closed");
    writer.abort();
    Ok(())
}

/// Drain queued frames onto the socket.
async fn write_frames<S>(mut sink: S, mut rx: mpsc::Receiver<OutboundMessage>)
where
    S: Sink<Message> + Unpin,
    S::Error: std::fmt::Display,
{
    while let Some(message) = rx.recv().await {
        let text = match serde_json::to_string(&message) {
            Ok(text) => text,
            Err(err) => {
                warn!(error = %err, "Failed to encode frame");
                continue;
            }
        };
        if let Err(err) = sink.send(Message::Text(text)).await {
            warn!(error = %err, "Failed to write to host");
            break;
        }
    }
}
