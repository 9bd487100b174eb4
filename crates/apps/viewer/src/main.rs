//! Native WebSocket viewer client.
//!
//! Connects to a remote render server, reassembles the binary frame stream
//! through a bounded decoder channel (channel-full is the back-pressure
//! signal), and drives the session lifecycle: `video_resize` on connect,
//! `disconnect` on shutdown. Camera input comes from the embedding surface;
//! headless runs exercise the stream path and report timing diagnostics.

use std::time::Instant;

use clap::Parser;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use foundation::time::Timestamp;
use protocol::config::ViewerConfig;
use protocol::events::CameraEvent;
use session::{CommandSink, HostNotifier, TransportError, ViewerModel, ViewerSession};
use streaming::{StreamAssembler, StreamSink};

#[derive(Parser, Debug)]
#[command(name = "viewer", about = "Remote-rendering viewer client")]
struct Args {
    /// WebSocket URL of the render server.
    #[arg(long, default_value = "ws://localhost:9002")]
    url: String,

    /// Initial render-surface width in pixels.
    #[arg(long, default_value_t = 512)]
    width: u32,

    /// Initial render-surface height in pixels.
    #[arg(long, default_value_t = 512)]
    height: u32,
}

/// Outbound commands go through an unbounded channel to the socket writer
/// task; a closed channel means the transport is gone.
struct ChannelSink(mpsc::UnboundedSender<String>);

impl CommandSink for ChannelSink {
    fn send(&mut self, payload: &str) -> Result<(), TransportError> {
        self.0
            .send(payload.to_string())
            .map_err(|_| TransportError::Closed)
    }
}

/// Headless stand-in for the notebook host: camera intent is only logged.
struct LogHost;

impl HostNotifier for LogHost {
    fn send_event(&mut self, event: &CameraEvent) {
        debug!(event = ?event, "camera event");
    }
}

/// Feeds reassembled segments to the decoder task over a bounded channel.
/// While the channel is full the sink reports mid-update and the assembler
/// keeps buffering.
struct DecoderSink {
    tx: mpsc::Sender<Vec<u8>>,
    playing: bool,
}

impl StreamSink for DecoderSink {
    fn is_consuming(&self) -> bool {
        self.tx.capacity() == 0
    }

    fn consume(&mut self, data: Vec<u8>) {
        if self.tx.try_send(data).is_err() {
            warn!("decoder went away; dropping segment");
        }
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn play(&mut self) {
        self.playing = true;
        info!("playback started");
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    info!(url = %args.url, "connecting");
    let (socket, _) = connect_async(args.url.as_str()).await?;
    let (mut ws_tx, mut ws_rx) = socket.split();
    info!("connected");

    // Socket writer task; the session sees only the channel.
    let (cmd_tx, mut cmd_rx) = mpsc::unbounded_channel::<String>();
    let writer = tokio::spawn(async move {
        while let Some(text) = cmd_rx.recv().await {
            if ws_tx.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
        let _ = ws_tx.close().await;
    });

    let model = ViewerModel {
        resolution: (args.width, args.height),
        ..ViewerModel::default()
    };
    let mut session = ViewerSession::new(ChannelSink(cmd_tx), LogHost, model, ViewerConfig::default());
    session.on_connected();

    // Decoder drain task; stands in for the platform video element.
    let (frame_tx, mut frame_rx) = mpsc::channel::<Vec<u8>>(4);
    let decoder = tokio::spawn(async move {
        let mut total = 0usize;
        while let Some(segment) = frame_rx.recv().await {
            total += segment.len();
            debug!(bytes = segment.len(), total, "segment handed to decoder");
        }
    });

    let mut sink = DecoderSink {
        tx: frame_tx,
        playing: false,
    };
    let mut assembler = StreamAssembler::new();
    let started = Instant::now();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("shutting down");
                session.disconnect();
                break;
            }
            incoming = ws_rx.next() => {
                let now = Timestamp(started.elapsed().as_secs_f64() * 1000.0);
                match incoming {
                    Some(Ok(Message::Binary(chunk))) => {
                        assembler.on_chunk(&mut sink, chunk, now);
                        if assembler.is_stalled(now) {
                            warn!(pending_bytes = assembler.pending_bytes(), "stream stalled");
                        }
                    }
                    Some(Ok(Message::Text(text))) => info!(%text, "server message"),
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!(error = %e, "transport error");
                        session.on_transport_closed();
                        break;
                    }
                    None => {
                        session.on_transport_closed();
                        break;
                    }
                }
            }
        }
    }

    info!(
        frames = assembler.flushes(),
        mean_fps = ?assembler.interval_stats().mean_fps(),
        "session ended"
    );

    drop(session);
    drop(sink);
    let _ = writer.await;
    let _ = decoder.await;
    Ok(())
}
