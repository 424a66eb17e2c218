//! Page Overlay CLI (for testing purposes only)
//! The main interface is through WASM bindings.

use page_overlay::render::build_overlay;
use page_overlay::{Document, PaginationConfig};

fn main() {
    println!("Page Overlay Pagination Engine");
    println!("==============================");
    println!();
    println!("This is a library crate. To use it:");
    println!();
    println!("  1. Build WASM: wasm-pack build --target web");
    println!("  2. Post render snapshots to onExternalReflow and apply the returned patches");
    println!();

    let config = PaginationConfig::default();
    let geometry = &config.geometry;
    println!("Default geometry:");
    println!("  page:         {} x {}px", geometry.page_width, geometry.page_height);
    println!("  content area: {}px", geometry.content_area_height());
    println!("  page pitch:   {}px", geometry.page_pitch());
    println!();

    let overlay = build_overlay(&Document::new(), &config, 1);
    println!("Single-page overlay markup:");
    println!("{}", overlay.to_html());
    println!();
    println!("For testing the core library:");
    println!("  cargo test");
}
