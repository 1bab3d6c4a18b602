// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimal SVG dump of a retained scene fed by mark diffs.

use std::collections::HashMap;
use std::fmt::Write as _;

use kurbo::Rect;
use peniko::Brush;
use strata_scene::{MarkDiff, MarkId, MarkPayload, TextAnchor, TextBaseline};

#[derive(Debug)]
struct Entry {
    z_index: i32,
    visible: bool,
    payload: MarkPayload,
}

/// Mirrors every axis scene it is fed, so diffs from several axes can be combined.
#[derive(Debug, Default)]
pub(crate) struct SvgScene {
    marks: HashMap<MarkId, Entry>,
}

impl SvgScene {
    pub(crate) fn apply_diffs(&mut self, diffs: &[MarkDiff]) {
        for diff in diffs {
            match diff {
                MarkDiff::Enter {
                    id,
                    z_index,
                    visible,
                    new,
                } => {
                    self.marks.insert(
                        *id,
                        Entry {
                            z_index: *z_index,
                            visible: *visible,
                            payload: (**new).clone(),
                        },
                    );
                }
                MarkDiff::Update {
                    id,
                    new_z_index,
                    visible,
                    new,
                    ..
                } => {
                    self.marks.insert(
                        *id,
                        Entry {
                            z_index: *new_z_index,
                            visible: *visible,
                            payload: (**new).clone(),
                        },
                    );
                }
                MarkDiff::Exit { id, .. } => {
                    self.marks.remove(id);
                }
            }
        }
    }

    pub(crate) fn visible_len(&self) -> usize {
        self.marks.values().filter(|e| e.visible).count()
    }

    pub(crate) fn to_svg_string(&self, view: Rect) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{} {} {} {}" width="{}" height="{}">"#,
            view.x0,
            view.y0,
            view.width(),
            view.height(),
            view.width(),
            view.height()
        );

        let mut entries: Vec<_> = self.marks.iter().filter(|(_, e)| e.visible).collect();
        entries.sort_by_key(|(id, e)| (e.z_index, id.0));

        for (_, entry) in entries {
            match &entry.payload {
                MarkPayload::Line(l) => {
                    let _ = write!(
                        out,
                        r#"<line x1="{}" y1="{}" x2="{}" y2="{}""#,
                        l.line.p0.x, l.line.p0.y, l.line.p1.x, l.line.p1.y
                    );
                    write_paint_attr(&mut out, "stroke", &l.stroke);
                    let _ = writeln!(out, r#" stroke-width="{}"/>"#, l.stroke_width);
                }
                MarkPayload::Rect(r) => {
                    let _ = write!(
                        out,
                        r#"<rect x="{}" y="{}" width="{}" height="{}""#,
                        r.rect.x0,
                        r.rect.y0,
                        r.rect.width(),
                        r.rect.height()
                    );
                    write_paint_attr(&mut out, "fill", &r.fill);
                    if r.stroke_width > 0.0 {
                        write_paint_attr(&mut out, "stroke", &r.stroke);
                        let _ = write!(out, r#" stroke-width="{}""#, r.stroke_width);
                    }
                    out.push_str("/>\n");
                }
                MarkPayload::Circle(c) => {
                    let _ = write!(
                        out,
                        r#"<circle cx="{}" cy="{}" r="{}""#,
                        c.circle.center.x, c.circle.center.y, c.circle.radius
                    );
                    write_paint_attr(&mut out, "fill", &c.fill);
                    out.push_str("/>\n");
                }
                MarkPayload::Text(t) => {
                    let baseline = match t.baseline {
                        TextBaseline::Alphabetic => "alphabetic",
                        TextBaseline::Middle => "middle",
                        TextBaseline::Hanging => "hanging",
                    };
                    let anchor = match t.anchor {
                        TextAnchor::Start => "start",
                        TextAnchor::Middle => "middle",
                        TextAnchor::End => "end",
                    };
                    let _ = write!(
                        out,
                        r#"<text x="{}" y="{}" font-size="{}" dominant-baseline="{baseline}" text-anchor="{anchor}""#,
                        t.pos.x, t.pos.y, t.font_size
                    );
                    if t.angle != 0.0 {
                        let _ = write!(
                            out,
                            r#" transform="rotate({} {} {})""#,
                            t.angle, t.pos.x, t.pos.y
                        );
                    }
                    write_paint_attr(&mut out, "fill", &t.fill);
                    out.push('>');
                    out.push_str(&escape_xml(&t.text));
                    out.push_str("</text>\n");
                }
            }
        }

        out.push_str("</svg>\n");
        out
    }
}

fn svg_paint(brush: &Brush) -> (String, Option<f64>) {
    match brush {
        Brush::Solid(color) => {
            let rgba = color.to_rgba8();
            let paint = format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b);
            let opacity = (rgba.a != 255).then(|| f64::from(rgba.a) / 255.0);
            (paint, opacity)
        }
        _ => ("none".to_string(), None),
    }
}

fn write_paint_attr(out: &mut String, name: &str, brush: &Brush) {
    let (value, opacity) = svg_paint(brush);
    let _ = write!(out, r#" {name}="{value}""#);
    if let Some(o) = opacity {
        let _ = write!(out, r#" {name}-opacity="{o}""#);
    }
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
