//! Render a saved diagram to PNG, SVG, and TikZ files.
//!
//! Usage: `cargo run --example export -- diagram.json`
//!
//! Reads a backup record (the same JSON the editor autosaves) and writes
//! `diagram.png`, `diagram.svg`, and `diagram.tex` next to it.

use std::error::Error;
use std::path::PathBuf;

use fsmdraw_core::scene::Scene;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .ok_or("usage: export <diagram.json>")?;

    let json = std::fs::read_to_string(&path)?;
    let mut scene = Scene::new();
    scene.restore_from_json(&json)?;
    log::info!(
        "loaded {} nodes and {} links from {}",
        scene.nodes.len(),
        scene.links.len(),
        path.display()
    );

    std::fs::write(path.with_extension("png"), fsmdraw_render::export_png(&scene)?)?;
    std::fs::write(path.with_extension("svg"), fsmdraw_render::export_svg(&scene)?)?;
    std::fs::write(path.with_extension("tex"), fsmdraw_render::export_latex(&scene)?)?;
    println!("wrote {}", path.with_extension("png").display());
    println!("wrote {}", path.with_extension("svg").display());
    println!("wrote {}", path.with_extension("tex").display());
    Ok(())
}
