//! The scene catalog, in roughly the order they teach: clearing, points,
//! buffers, uniforms, textures, then matrices, depth and fog.

mod clear;
mod click_points;
mod cube;
mod depth_fight;
mod fog;
mod fragcoord;
mod interleaved;
mod lit_cube;
mod look_at;
mod mvp;
mod ortho;
mod points;
mod sphere;
mod spin;
mod texture;

use anyhow::Result;
use easel_render::{Context, Scene};

/// Name, summary and constructor for one demo.
pub struct SceneEntry {
    pub name: &'static str,
    pub summary: &'static str,
    /// Extra keys the scene reacts to, empty when there are none.
    pub controls: &'static str,
    pub build: fn(&mut Context) -> Result<Box<dyn Scene>>,
}

/// Every demo scene.
pub const SCENES: &[SceneEntry] = &[
    SceneEntry {
        name: "clear",
        summary: "Clear the canvas to a fixed color",
        controls: "",
        build: clear::build,
    },
    SceneEntry {
        name: "points",
        summary: "Three corners drawn as single-pixel points",
        controls: "",
        build: points::build,
    },
    SceneEntry {
        name: "click_points",
        summary: "Click to drop points, colored by their position",
        controls: "left click drops a point",
        build: click_points::build,
    },
    SceneEntry {
        name: "spin",
        summary: "A triangle rotated and translated from a uniform block",
        controls: "",
        build: spin::build,
    },
    SceneEntry {
        name: "interleaved",
        summary: "Position and color interleaved in one buffer",
        controls: "",
        build: interleaved::build,
    },
    SceneEntry {
        name: "fragcoord",
        summary: "Fragments colored by their framebuffer coordinate",
        controls: "",
        build: fragcoord::build,
    },
    SceneEntry {
        name: "texture",
        summary: "Two procedural textures sampled in one draw",
        controls: "F toggles the sampling filter, C swaps clouds for a checkerboard",
        build: texture::build,
    },
    SceneEntry {
        name: "look_at",
        summary: "A view matrix looking at staggered triangles",
        controls: "Left/Right move the eye",
        build: look_at::build,
    },
    SceneEntry {
        name: "ortho",
        summary: "An orthographic volume with adjustable near and far",
        controls: "Left/Right move near, Up/Down move far",
        build: ortho::build,
    },
    SceneEntry {
        name: "mvp",
        summary: "Model, view and projection composed per draw",
        controls: "",
        build: mvp::build,
    },
    SceneEntry {
        name: "depth_fight",
        summary: "Two coplanar triangles, polygon offset breaking the tie",
        controls: "",
        build: depth_fight::build,
    },
    SceneEntry {
        name: "cube",
        summary: "An indexed cube with interpolated corner colors",
        controls: "",
        build: cube::build,
    },
    SceneEntry {
        name: "lit_cube",
        summary: "Per-fragment point lighting on a spinning cube",
        controls: "",
        build: lit_cube::build,
    },
    SceneEntry {
        name: "sphere",
        summary: "A uv sphere whose positions double as normals",
        controls: "",
        build: sphere::build,
    },
    SceneEntry {
        name: "fog",
        summary: "Linear fog by eye distance",
        controls: "Up/Down move the eye",
        build: fog::build,
    },
];

pub fn find(name: &str) -> Option<&'static SceneEntry> {
    SCENES.iter().find(|s| s.name == name)
}
