//! Map-layer bridge
//!
//! Outbound: the filtered view as a flat JSON object (`{"2000": 6, ...}`) the map layer
//! reads whenever it likes. Inbound: postcodes the map layer reports on hover or click,
//! turned into [`Event::ExternalHover`].
//!
//! The runtime only sees the [`MapBridge`] trait, so the transport can be swapped freely.

use {
    crate::{aggregator::FilteredView, state::Event},
    std::path::{Path, PathBuf},
    tokio::{
        io::{AsyncBufRead, AsyncBufReadExt},
        sync::{mpsc, watch},
    },
};

#[derive(Debug)]
pub enum BridgeError {
    Serialize(serde_json::Error),
    Io(std::io::Error),
    /// Nobody is listening any more
    Closed,
}

impl std::fmt::Display for BridgeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BridgeError::Serialize(e) => write!(f, "failed to serialize view: {}", e),
            BridgeError::Io(e) => write!(f, "failed to export view: {}", e),
            BridgeError::Closed => write!(f, "map bridge closed"),
        }
    }
}

impl std::error::Error for BridgeError {}

impl From<serde_json::Error> for BridgeError {
    fn from(e: serde_json::Error) -> Self {
        BridgeError::Serialize(e)
    }
}

impl From<std::io::Error> for BridgeError {
    fn from(e: std::io::Error) -> Self {
        BridgeError::Io(e)
    }
}

/// Serialize a view into the flat postcode → count object
pub fn view_json(view: &FilteredView) -> Result<String, BridgeError> {
    Ok(serde_json::to_string(view)?)
}

/// Outbound half of the map channel
pub trait MapBridge: Send {
    /// Expose the latest view; called after every event that may have changed it
    fn emit(&mut self, view: &FilteredView) -> Result<(), BridgeError>;
}

/// Publishes the view JSON on a `watch` channel; readers always see the latest value
pub struct WatchBridge {
    tx: watch::Sender<String>,
}

impl WatchBridge {
    pub fn new() -> (Self, watch::Receiver<String>) {
        let (tx, rx) = watch::channel("{}".to_string());
        (Self { tx }, rx)
    }
}

impl MapBridge for WatchBridge {
    fn emit(&mut self, view: &FilteredView) -> Result<(), BridgeError> {
        let json = view_json(view)?;
        // Skip no-op updates so readers are not woken for nothing
        let changed = self.tx.send_if_modified(|current| {
            if *current == json {
                false
            } else {
                *current = json;
                true
            }
        });
        if changed && self.tx.is_closed() {
            return Err(BridgeError::Closed);
        }
        Ok(())
    }
}

/// Writes the view JSON to a file the map layer polls
///
/// Writes go to a sibling temp file first and are renamed into place, so a reader never
/// sees a half-written document. Unchanged views are not rewritten.
pub struct FileBridge {
    path: PathBuf,
    last_written: Option<String>,
}

impl FileBridge {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            last_written: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MapBridge for FileBridge {
    fn emit(&mut self, view: &FilteredView) -> Result<(), BridgeError> {
        let json = view_json(view)?;
        if self.last_written.as_deref() == Some(json.as_str()) {
            return Ok(());
        }

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, &self.path)?;

        log::debug!("Exported view ({} bytes) to {}", json.len(), self.path.display());
        self.last_written = Some(json);
        Ok(())
    }
}

/// Inbound half of the map channel: hands hovered postcodes to the runtime
#[derive(Clone)]
pub struct HoverHandle {
    tx: mpsc::Sender<Event>,
}

impl HoverHandle {
    pub fn new(tx: mpsc::Sender<Event>) -> Self {
        Self { tx }
    }

    /// Report a hovered or clicked postcode
    pub async fn hover(&self, postcode: impl Into<String>) -> Result<(), BridgeError> {
        self.tx
            .send(Event::ExternalHover(postcode.into()))
            .await
            .map_err(|_| BridgeError::Closed)
    }
}

/// Forward one postcode per line from `reader` until EOF
///
/// Blank lines are skipped. Returns how many hover events were delivered.
pub async fn forward_hover_lines<R>(reader: R, handle: HoverHandle) -> Result<usize, BridgeError>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut delivered = 0;

    while let Some(line) = lines.next_line().await? {
        let postcode = line.trim();
        if postcode.is_empty() {
            continue;
        }
        handle.hover(postcode).await?;
        delivered += 1;
    }

    log::debug!("Hover feed ended after {} postcodes", delivered);
    Ok(delivered)
}
