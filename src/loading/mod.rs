//! Asynchronous asset loading.
//!
//! Each asset is read by its own tokio task, which streams byte-level
//! progress and finally the parsed payload over a channel. The event-loop
//! thread drains that channel once per frame, so all scene mutation stays
//! single-threaded and loads may complete in any order.
//!
//! Failures are terminal for the affected asset: they are logged and nothing
//! further is emitted, which leaves the overall progress short of 100% when
//! the character itself is lost.

pub mod progress;

use std::path::{Path, PathBuf};

use tokio::io::AsyncReadExt;

use crate::animation::AnimationClip;
use crate::assets::{self, CharacterAsset};
use crate::errors::Result;
use crate::scene::ImageData;

pub use progress::LoadProgress;

/// Asset id of the character mesh.
pub const CHARACTER_ID: &str = "alien";

/// The fixed, ordered set of animation identifiers. The "next animation"
/// control cycles through this list and wraps around.
pub const CLIP_IDS: [&str; 11] = [
    "agreeing",
    "clapping",
    "disappointed",
    "dismissing",
    "fistPump",
    "formalBow",
    "idle",
    "shakeFist",
    "surprised",
    "talking",
    "walking",
];

/// The clip that starts playing as soon as it arrives.
pub const IDLE_ID: &str = "idle";

/// Denominator of the overall progress: all clips plus the mesh.
pub const TOTAL_ASSETS: usize = CLIP_IDS.len() + 1;

const READ_CHUNK: usize = 64 * 1024;

/// Message from a loader task to the event-loop thread.
pub enum LoadEvent {
    Progress { id: &'static str, percent: f32 },
    Character(Box<CharacterAsset>),
    Clip { id: &'static str, clip: AnimationClip },
    Photo(ImageData),
}

/// Owns the loader runtime and the event channel.
pub struct AssetLoader {
    runtime: tokio::runtime::Runtime,
    tx: flume::Sender<LoadEvent>,
    rx: flume::Receiver<LoadEvent>,
    root: PathBuf,
}

impl AssetLoader {
    pub fn new() -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("vitrine-loader")
            .build()?;
        let (tx, rx) = flume::unbounded();
        let root = std::env::var_os("VITRINE_ASSETS")
            .map_or_else(|| PathBuf::from("assets"), PathBuf::from);

        Ok(Self {
            runtime,
            tx,
            rx,
            root,
        })
    }

    /// Drains every event the loader tasks have produced so far.
    pub fn poll(&self) -> Vec<LoadEvent> {
        self.rx.try_iter().collect()
    }

    /// Starts the character read. Clip loads are kicked off by the viewer
    /// once the character has been bound into the scene.
    pub fn begin_character_load(&self) {
        let tx = self.tx.clone();
        let path = self.root.join("models").join("alien.glb");

        self.runtime.spawn(async move {
            let bytes = match read_with_progress(&path, CHARACTER_ID, &tx).await {
                Ok(bytes) => bytes,
                Err(err) => {
                    log::error!("Failed to read {}: {err}", path.display());
                    return;
                }
            };
            match assets::parse_character(&bytes) {
                Ok(asset) => {
                    log::debug!("Character parsed: {} nodes", asset.nodes.len());
                    let _ = tx.send(LoadEvent::Character(Box::new(asset)));
                }
                Err(err) => log::error!("Failed to parse {}: {err}", path.display()),
            }
        });
    }

    /// Starts one read per animation identifier. A failed clip is logged and
    /// skipped; the others keep loading.
    pub fn begin_clip_loads(&self) {
        for id in CLIP_IDS {
            let tx = self.tx.clone();
            let path = self.root.join("models").join(format!("{id}.glb"));

            self.runtime.spawn(async move {
                let bytes = match read_with_progress(&path, id, &tx).await {
                    Ok(bytes) => bytes,
                    Err(err) => {
                        log::error!("Failed to read {}: {err}", path.display());
                        return;
                    }
                };
                match assets::parse_clip(id, &bytes) {
                    Ok(clip) => {
                        log::debug!("Clip '{id}' parsed ({:.2}s)", clip.duration);
                        let _ = tx.send(LoadEvent::Clip { id, clip });
                    }
                    Err(err) => log::error!("Failed to parse {}: {err}", path.display()),
                }
            });
        }
    }

    /// Reads and decodes a user-chosen photo. Independent of the 3D assets;
    /// no progress accounting.
    pub fn begin_photo_load(&self, path: PathBuf) {
        let tx = self.tx.clone();

        self.runtime.spawn(async move {
            let bytes = match tokio::fs::read(&path).await {
                Ok(bytes) => bytes,
                Err(err) => {
                    log::error!("Failed to read photo {}: {err}", path.display());
                    return;
                }
            };
            match image::load_from_memory(&bytes) {
                Ok(decoded) => {
                    let rgba = decoded.to_rgba8();
                    let (width, height) = rgba.dimensions();
                    let _ = tx.send(LoadEvent::Photo(ImageData {
                        width,
                        height,
                        rgba8: rgba.into_raw(),
                    }));
                }
                Err(err) => log::error!("Failed to decode photo {}: {err}", path.display()),
            }
        });
    }
}

/// Reads a file in chunks, reporting byte progress as a percentage under the
/// given asset id. A zero or unknown length is guarded so the division stays
/// finite.
async fn read_with_progress(
    path: &Path,
    id: &'static str,
    tx: &flume::Sender<LoadEvent>,
) -> std::io::Result<Vec<u8>> {
    let mut file = tokio::fs::File::open(path).await?;
    let total = file.metadata().await.map(|m| m.len()).unwrap_or(0);

    let mut bytes = Vec::with_capacity(total as usize);
    let mut chunk = vec![0_u8; READ_CHUNK];
    loop {
        let n = file.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        bytes.extend_from_slice(&chunk[..n]);

        let percent = (bytes.len() as f32 / total.max(1) as f32) * 100.0;
        let _ = tx.send(LoadEvent::Progress { id, percent });
    }

    Ok(bytes)
}
