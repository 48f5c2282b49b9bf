//! The smallest possible scene: no program, no buffers, just a clear.

use anyhow::Result;
use easel_render::{ClearOptions, Context, Frame, Scene};

pub struct Clear;

pub fn build(_ctx: &mut Context) -> Result<Box<dyn Scene>> {
    Ok(Box::new(Clear))
}

impl Scene for Clear {
    fn frame(&mut self, _ctx: &mut Context, _frame: &mut Frame<'_>, _time: f32) -> Result<()> {
        Ok(())
    }

    fn clear(&self) -> ClearOptions {
        ClearOptions::color(0.0, 0.35, 0.55, 1.0)
    }
}
