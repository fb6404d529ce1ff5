//! Route every wire of a snapshot and write the result as an SVG file.
//! Run with: cargo run --example route_diagram [snapshot.json] [out.svg]

use std::fmt::Write as _;
use std::path::Path;

use wirecheck::instance_rect;
use wirecheck::prelude::*;

fn main() -> Result<(), WireCheckError> {
    let mut args = std::env::args().skip(1);
    let input = args
        .next()
        .unwrap_or_else(|| "tests/fixtures/clean_page.json".to_string());
    let output = args.next().unwrap_or_else(|| "diagram.svg".to_string());

    let snapshot = DiagramSnapshot::from_json_file(Path::new(&input))?;
    let library = snapshot.library();
    let wires = WireCheckCore::default().render(&snapshot);

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="-100 -100 900 600">"#
    );
    for instance in &snapshot.instances {
        let rect = instance_rect(instance, &library);
        let _ = writeln!(
            svg,
            r#"  <rect x="{}" y="{}" width="{}" height="{}" fill="none" stroke="black"/>"#,
            rect.x, rect.y, rect.width, rect.height
        );
    }
    for wire in &wires {
        let _ = writeln!(
            svg,
            r#"  <path id="{}" d="{}" fill="none" stroke="steelblue"/>"#,
            wire.connection_id, wire.path_data
        );
    }
    svg.push_str("</svg>\n");

    std::fs::write(&output, svg)?;
    println!("Routed {} wires into {}", wires.len(), output);
    Ok(())
}
