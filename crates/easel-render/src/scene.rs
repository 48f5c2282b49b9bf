//! The interface a demo implements to be driven by a window or an
//! offscreen target.

use crate::context::Context;
use crate::frame::{ClearOptions, Frame};

/// Keys forwarded to scenes, already mapped away from keyboard layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneKey {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    /// A printable key, lowercased.
    Character(char),
}

/// Something that can draw itself, frame after frame.
///
/// Scenes are built once the GPU is up (see [`SceneBuilder`]), so their
/// constructors create programs and buffers directly. `frame` then runs per
/// frame with a cleared target and `time` in seconds since the scene
/// started. The input hooks are optional.
pub trait Scene {
    fn frame(&mut self, ctx: &mut Context, frame: &mut Frame<'_>, time: f32)
    -> anyhow::Result<()>;

    /// What each frame is cleared to before `frame` runs.
    fn clear(&self) -> ClearOptions {
        ClearOptions::default()
    }

    fn on_key(&mut self, _key: SceneKey) {}

    /// A left click at clip-space coordinates, x right and y up in [-1, 1].
    fn on_click(&mut self, _x: f32, _y: f32) {}
}

/// Deferred scene construction, run once a context exists.
pub type SceneBuilder = Box<dyn FnOnce(&mut Context) -> anyhow::Result<Box<dyn Scene>>>;
