//! Background texture loading with explicit readiness.
//!
//! Decoding happens on a plain thread; nothing touches the GPU until the
//! caller polls. Until then the program keeps sampling its one-texel white
//! placeholder, so a frame drawn too early is pale rather than wrong.

use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use image::RgbaImage;

use crate::context::Context;
use crate::program::Program;

/// Where a pending texture is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// The decode thread has not reported back yet.
    Loading,
    /// The image was applied to its binding.
    Ready,
    /// Decoding failed; the binding keeps its placeholder.
    Failed,
}

type Decoded = std::result::Result<RgbaImage, String>;

/// A texture on its way to a program, addressed by binding name.
pub struct PendingTexture {
    binding: String,
    rx: mpsc::Receiver<Decoded>,
    state: LoadState,
}

impl PendingTexture {
    /// Start decoding `path` on a background thread. Poll the returned
    /// handle each frame to apply the image once it arrives.
    pub fn fetch(path: impl Into<PathBuf>, binding: impl Into<String>) -> Self {
        let path = path.into();
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let result = image::open(&path)
                .map(|img| img.to_rgba8())
                .map_err(|e| format!("{}: {e}", path.display()));
            let _ = tx.send(result);
        });
        Self {
            binding: binding.into(),
            rx,
            state: LoadState::Loading,
        }
    }

    /// Wrap an image that is already in memory. It rides the same poll and
    /// apply path as a file, arriving on the first poll.
    pub fn from_image(image: RgbaImage, binding: impl Into<String>) -> Self {
        let (tx, rx) = mpsc::channel();
        let _ = tx.send(Ok(image));
        Self {
            binding: binding.into(),
            rx,
            state: LoadState::Loading,
        }
    }

    #[must_use]
    pub fn state(&self) -> LoadState {
        self.state
    }

    /// The texture binding this load will fill.
    #[must_use]
    pub fn binding(&self) -> &str {
        &self.binding
    }

    /// Apply the image to `program` if it has arrived. Cheap to call every
    /// frame; after the first `Ready` or `Failed` it does nothing.
    pub fn poll(&mut self, ctx: &Context, program: &Program) -> LoadState {
        if let Some(result) = self.try_take() {
            self.apply(ctx, program, result);
        }
        self.state
    }

    /// Block until the decode finishes, then apply. Headless rendering uses
    /// this so a saved frame never shows the placeholder.
    pub fn wait(&mut self, ctx: &Context, program: &Program) -> LoadState {
        if self.state == LoadState::Loading {
            let result = self
                .rx
                .recv()
                .unwrap_or_else(|_| Err("decode thread exited without a result".into()));
            self.state = if result.is_ok() {
                LoadState::Ready
            } else {
                LoadState::Failed
            };
            self.apply(ctx, program, result);
        }
        self.state
    }

    /// Take the decoded image without applying it anywhere, for callers
    /// that manage uploads themselves. `None` while still loading.
    pub fn try_take(&mut self) -> Option<Decoded> {
        if self.state != LoadState::Loading {
            return None;
        }
        match self.rx.try_recv() {
            Ok(result) => {
                self.state = if result.is_ok() {
                    LoadState::Ready
                } else {
                    LoadState::Failed
                };
                Some(result)
            }
            Err(mpsc::TryRecvError::Empty) => None,
            Err(mpsc::TryRecvError::Disconnected) => {
                self.state = LoadState::Failed;
                Some(Err("decode thread exited without a result".into()))
            }
        }
    }

    fn apply(&self, ctx: &Context, program: &Program, result: Decoded) {
        match result {
            Ok(image) => program.set_texture(ctx, &self.binding, &image),
            Err(message) => tracing::warn!(
                binding = %self.binding,
                %message,
                "texture failed to load, keeping the placeholder"
            ),
        }
    }
}
