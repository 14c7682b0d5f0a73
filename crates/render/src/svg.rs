//! SVG serialization of a draw list.

use std::fmt::{self, Write};

use layers::clip::ProjectedPath;
use layers::symbology::PathStyle;

use crate::draw::{DrawCommand, DrawList};

/// Writes `list` as a standalone SVG document.
pub fn write_svg<W: Write>(list: &DrawList, out: &mut W) -> fmt::Result {
    writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = num(list.width),
        h = num(list.height)
    )?;
    for command in &list.commands {
        match command {
            DrawCommand::Sphere {
                center,
                radius,
                style,
            } => {
                writeln!(
                    out,
                    r#"  <circle class="sphere" cx="{}" cy="{}" r="{}" {}/>"#,
                    num(center.x),
                    num(center.y),
                    num(*radius),
                    path_attrs(style)
                )?;
            }
            DrawCommand::Graticule { path, style } => {
                writeln!(
                    out,
                    r#"  <path class="graticule" d="{}" {}/>"#,
                    path_data(path),
                    path_attrs(style)
                )?;
            }
            DrawCommand::Country { id, path, style } => {
                let id_attr = id
                    .as_deref()
                    .map(|id| format!(r#" data-id="{}""#, escape(id)))
                    .unwrap_or_default();
                writeln!(
                    out,
                    r#"  <path class="country"{id_attr} d="{}" fill-rule="evenodd" {}/>"#,
                    path_data(path),
                    path_attrs(style)
                )?;
            }
            DrawCommand::Marker(marker) => {
                let class = if marker.active { "station active" } else { "station" };
                writeln!(
                    out,
                    r#"  <circle class="{class}" data-id="{}" cx="{}" cy="{}" r="{}" fill="{}" stroke="{}" stroke-width="{}"/>"#,
                    escape(marker.id.as_str()),
                    num(marker.position.x),
                    num(marker.position.y),
                    num(marker.style.radius),
                    marker.style.fill,
                    marker.style.stroke,
                    num(marker.style.stroke_width)
                )?;
            }
        }
    }
    writeln!(out, "</svg>")
}

pub fn to_svg(list: &DrawList) -> String {
    let mut out = String::new();
    // Writing into a String does not fail.
    let _ = write_svg(list, &mut out);
    out
}

fn path_attrs(style: &PathStyle) -> String {
    let fill = style
        .fill
        .map(|c| c.to_string())
        .unwrap_or_else(|| "none".to_string());
    let mut attrs = format!(
        r#"fill="{fill}" stroke="{}" stroke-width="{}""#,
        style.stroke,
        num(style.stroke_width)
    );
    if style.opacity < 1.0 {
        attrs.push_str(&format!(r#" opacity="{}""#, num(style.opacity)));
    }
    attrs
}

fn path_data(path: &ProjectedPath) -> String {
    let mut d = String::new();
    for sub in &path.subpaths {
        for (i, p) in sub.points.iter().enumerate() {
            let op = if i == 0 { 'M' } else { 'L' };
            if !d.is_empty() {
                d.push(' ');
            }
            d.push_str(&format!("{op}{},{}", num(p.x), num(p.y)));
        }
        if sub.closed && !sub.points.is_empty() {
            d.push_str(" Z");
        }
    }
    d
}

/// Two decimals, without trailing zeros.
fn num(v: f64) -> String {
    let s = format!("{v:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
