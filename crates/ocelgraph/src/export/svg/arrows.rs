use svg::node::element::{Definitions, Marker, Path};

use ocelgraph_core::{color::Color, geometry::Point};

/// Creates closed arrowhead marker definitions for the colors in use
pub fn create_marker_definitions<'a, I>(colors: I) -> Definitions
where
    I: Iterator<Item = &'a Color>,
{
    let mut defs = Definitions::new();

    for color in colors {
        let arrow_closed = Marker::new()
            .set("id", marker_id(color))
            .set("viewBox", "0 0 10 10")
            .set("refX", 9)
            .set("refY", 5)
            .set("markerWidth", 8)
            .set("markerHeight", 8)
            .set("orient", "auto")
            .add(
                Path::new()
                    .set("d", "M 0 0 L 10 5 L 0 10 z")
                    .set("fill", color),
            );

        defs = defs.add(arrow_closed);
    }

    defs
}

fn marker_id(color: &Color) -> String {
    format!("arrow-closed-{}", color.to_id_safe_string())
}

/// Get the marker reference for an edge end of the given color
pub fn marker_end_url(color: &Color) -> String {
    format!("url(#{})", marker_id(color))
}

/// Create an orthogonal path data string from two points
/// Creates a path with only horizontal and vertical line segments
pub fn create_orthogonal_path_data(start: Point, end: Point, horizontal: bool) -> String {
    let mid = start.midpoint(end);
    if horizontal {
        format!(
            "M {} {} L {} {} L {} {} L {} {}",
            start.x(),
            start.y(),
            mid.x(),
            start.y(),
            mid.x(),
            end.y(),
            end.x(),
            end.y()
        )
    } else {
        format!(
            "M {} {} L {} {} L {} {} L {} {}",
            start.x(),
            start.y(),
            start.x(),
            mid.y(),
            end.x(),
            mid.y(),
            end.x(),
            end.y()
        )
    }
}

/// Create a loop path leaving and re-entering a node on the same side
pub fn create_loop_path_data(start: Point, end: Point, reach: Point) -> String {
    format!(
        "M {} {} C {} {}, {} {}, {} {}",
        start.x(),
        start.y(),
        start.x() + reach.x(),
        start.y() + reach.y(),
        end.x() + reach.x(),
        end.y() + reach.y(),
        end.x(),
        end.y()
    )
}
