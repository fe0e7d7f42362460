//! Layer-file and SVG preview export.
//!
//! The layer file is a simplified ASCII interchange format read by
//! downstream build-preparation tools. Its tags, field order and number
//! formatting are fixed:
//!
//! ```text
//! $$HEADERSTART
//! $$ASCII
//! $$UNITS/1.0
//! $$LAYER_THICKNESS/0.0300
//! $$HEADEREND
//!
//! ;; Part: bracket
//! $$LAYER/0.0000
//! $$POLYLINE/1,1,5,0.0000,0.0000,10.0000,0.0000,...
//! $$END
//! ```

use std::fmt::Write as _;
use std::io::{self, Write};

use plate_mesh::{Point2, Polyline};

use crate::layer::Part;

/// Margin around the preview contents, in mm.
const PREVIEW_MARGIN_MM: f64 = 2.0;

/// Pixels per mm of the preview's nominal size.
const PREVIEW_SCALE: f64 = 3.0;

const PREVIEW_BACKGROUND: &str = "#f8f8f8";
const PREVIEW_STROKE: &str = "#196EF0";
const PREVIEW_STROKE_WIDTH: f64 = 0.15;

/// Write the layer file for `parts` to `writer`.
///
/// Every layer gets a `$$LAYER` record, including empty ones. Contours with
/// no points are skipped.
///
/// Returns the number of `$$LAYER` records written.
///
/// # Errors
///
/// Returns any error from the writer.
///
/// # Example
///
/// ```
/// use plate_slice::write_plan;
///
/// let mut out = Vec::new();
/// let layers = write_plan(&mut out, &[], 0.03).unwrap();
/// assert_eq!(layers, 0);
///
/// let text = String::from_utf8(out).unwrap();
/// assert!(text.starts_with("$$HEADERSTART\n"));
/// assert!(text.contains("$$LAYER_THICKNESS/0.0300\n"));
/// assert!(text.ends_with("$$END\n"));
/// ```
pub fn write_plan<W: Write>(
    writer: &mut W,
    parts: &[Part],
    layer_thickness_mm: f64,
) -> io::Result<usize> {
    writeln!(writer, "$$HEADERSTART")?;
    writeln!(writer, "$$ASCII")?;
    writeln!(writer, "$$UNITS/1.0")?;
    writeln!(writer, "$$LAYER_THICKNESS/{layer_thickness_mm:.4}")?;
    writeln!(writer, "$$HEADEREND")?;
    writeln!(writer)?;

    let mut layers_written = 0;
    for part in parts {
        writeln!(writer, ";; Part: {}", part.name)?;
        for layer in &part.layers {
            writeln!(writer, "$$LAYER/{:.4}", layer.z_height)?;
            for contour in layer.contours.iter().filter(|c| !c.is_empty()) {
                writeln!(
                    writer,
                    "$$POLYLINE/1,1,{},{}",
                    contour.len(),
                    flatten_coords(contour)
                )?;
            }
            layers_written += 1;
        }
    }

    writeln!(writer, "$$END")?;
    writer.flush()?;

    Ok(layers_written)
}

/// Render the contours of every part at `layer_index` as one SVG document.
///
/// The view box is the bounding box of all drawn contours plus a 2 mm
/// margin. Parts with fewer layers than `layer_index + 1` contribute
/// nothing. Returns `None` if there is nothing to draw.
///
/// # Example
///
/// ```
/// use plate_mesh::{IndexedMesh, MeshItem, Point3};
/// use plate_slice::{BuildStyle, CancelToken, NullProgress, PlanarSlicer, SliceBackend, preview_svg};
///
/// let block = IndexedMesh::cuboid(Point3::origin(), Point3::new(10.0, 10.0, 1.0));
/// let run = PlanarSlicer::new()
///     .slice(
///         &[MeshItem::new("1", "block", block)],
///         &BuildStyle::default().with_layer_thickness(0.5),
///         &mut NullProgress,
///         &CancelToken::new(),
///     )
///     .unwrap();
///
/// let svg = preview_svg(&run.parts, 1).unwrap();
/// assert!(svg.contains("<polyline"));
/// assert!(preview_svg(&run.parts, 2).is_none());
/// ```
#[must_use]
pub fn preview_svg(parts: &[Part], layer_index: usize) -> Option<String> {
    let contours: Vec<&Polyline> = parts
        .iter()
        .filter_map(|part| part.layers.get(layer_index))
        .flat_map(|layer| layer.contours.iter())
        .filter(|contour| contour.len() >= 2)
        .collect();

    let (min, max) = combined_bounds(&contours)?;

    let x0 = min.x - PREVIEW_MARGIN_MM;
    let y0 = min.y - PREVIEW_MARGIN_MM;
    let width = 2.0f64.mul_add(PREVIEW_MARGIN_MM, max.x - min.x);
    let height = 2.0f64.mul_add(PREVIEW_MARGIN_MM, max.y - min.y);

    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{x0:.3} {y0:.3} {width:.3} {height:.3}" width="{:.0}" height="{:.0}">
  <rect x="{x0:.3}" y="{y0:.3}" width="{width:.3}" height="{height:.3}" fill="{PREVIEW_BACKGROUND}"/>
"#,
        width * PREVIEW_SCALE,
        height * PREVIEW_SCALE,
    );

    for contour in contours {
        let mut points = String::new();
        for (i, p) in contour.points().iter().enumerate() {
            if i > 0 {
                points.push(' ');
            }
            let _ = write!(points, "{:.3},{:.3}", p.x, p.y);
        }

        let _ = writeln!(
            svg,
            r#"  <polyline points="{points}" fill="none" stroke="{PREVIEW_STROKE}" stroke-width="{PREVIEW_STROKE_WIDTH}"/>"#
        );
    }

    svg.push_str("</svg>\n");
    Some(svg)
}

// ============================================================================
// Internal helper functions
// ============================================================================

/// `x0,y0,x1,y1,...` at four decimals.
fn flatten_coords(contour: &Polyline) -> String {
    let mut out = String::with_capacity(contour.len() * 20);
    for (i, p) in contour.points().iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        let _ = write!(out, "{:.4},{:.4}", p.x, p.y);
    }
    out
}

fn combined_bounds(contours: &[&Polyline]) -> Option<(Point2<f64>, Point2<f64>)> {
    contours
        .iter()
        .filter_map(|c| c.bounds())
        .reduce(|(amin, amax), (bmin, bmax)| {
            (
                Point2::new(amin.x.min(bmin.x), amin.y.min(bmin.y)),
                Point2::new(amax.x.max(bmax.x), amax.y.max(bmax.y)),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::Layer;
    use plate_mesh::{IndexedMesh, Point3};
    use std::sync::Arc;

    fn square(x: f64, y: f64, size: f64) -> Polyline {
        Polyline::new(vec![
            Point2::new(x, y),
            Point2::new(x + size, y),
            Point2::new(x + size, y + size),
            Point2::new(x, y + size),
            Point2::new(x, y),
        ])
    }

    fn part(name: &str, layers: Vec<Layer>) -> Part {
        Part {
            id: name.to_string(),
            name: name.to_string(),
            mesh: Arc::new(IndexedMesh::cuboid(
                Point3::origin(),
                Point3::new(1.0, 1.0, 1.0),
            )),
            layers,
        }
    }

    fn plan_text(parts: &[Part], thickness: f64) -> (usize, String) {
        let mut out = Vec::new();
        let n = write_plan(&mut out, parts, thickness).unwrap();
        (n, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_plan_layout() {
        let parts = [part(
            "bracket",
            vec![
                Layer::new(0, 0.0, vec![square(0.0, 0.0, 10.0)]),
                Layer::new(1, 0.03, Vec::new()),
            ],
        )];
        let (n, text) = plan_text(&parts, 0.03);
        assert_eq!(n, 2);

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            &lines[..6],
            &[
                "$$HEADERSTART",
                "$$ASCII",
                "$$UNITS/1.0",
                "$$LAYER_THICKNESS/0.0300",
                "$$HEADEREND",
                ""
            ]
        );
        assert_eq!(lines[6], ";; Part: bracket");
        assert_eq!(lines[7], "$$LAYER/0.0000");
        assert_eq!(
            lines[8],
            "$$POLYLINE/1,1,5,0.0000,0.0000,10.0000,0.0000,10.0000,10.0000,0.0000,10.0000,0.0000,0.0000"
        );
        assert_eq!(lines[9], "$$LAYER/0.0300");
        assert_eq!(lines[10], "$$END");
        assert_eq!(lines.len(), 11);
    }

    #[test]
    fn test_plan_counts_layers_across_parts() {
        let parts = [
            part("a", (0..3).map(|i| Layer::new(i, 0.0, Vec::new())).collect()),
            part("b", (0..4).map(|i| Layer::new(i, 0.0, Vec::new())).collect()),
        ];
        let (n, text) = plan_text(&parts, 0.05);
        assert_eq!(n, 7);
        assert_eq!(text.lines().filter(|l| l.starts_with("$$LAYER/")).count(), 7);
        assert_eq!(text.matches(";; Part: ").count(), 2);
    }

    #[test]
    fn test_plan_skips_empty_contours() {
        let parts = [part(
            "a",
            vec![Layer::new(0, 1.5, vec![Polyline::new(Vec::new()), square(1.0, 1.0, 1.0)])],
        )];
        let (_, text) = plan_text(&parts, 0.03);
        assert_eq!(text.matches("$$POLYLINE").count(), 1);
        assert!(text.contains("$$LAYER/1.5000\n"));
    }

    #[test]
    fn test_preview_view_box() {
        let parts = [
            part("a", vec![Layer::new(0, 0.0, vec![square(0.0, 0.0, 10.0)])]),
            part("b", vec![Layer::new(0, 0.0, vec![square(20.0, 5.0, 4.0)])]),
        ];
        let svg = preview_svg(&parts, 0).unwrap();

        assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\""));
        assert!(svg.contains(r#"viewBox="-2.000 -2.000 28.000 14.000""#));
        assert!(svg.contains(r#"width="84" height="42""#));
        assert_eq!(svg.matches("<polyline").count(), 2);
        assert!(svg.contains(r#"points="20.000,5.000 24.000,5.000"#));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_preview_missing_or_empty_layer() {
        let parts = [part(
            "a",
            vec![
                Layer::new(0, 0.0, Vec::new()),
                Layer::new(1, 0.1, vec![Polyline::new(vec![Point2::new(1.0, 1.0)])]),
            ],
        )];
        assert!(preview_svg(&parts, 0).is_none());
        assert!(preview_svg(&parts, 1).is_none());
        assert!(preview_svg(&parts, 9).is_none());
        assert!(preview_svg(&[], 0).is_none());
    }
}
