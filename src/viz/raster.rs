//! Replays a recorded [`Scene`] onto plotters backends and persists it.
//!
//! - `.svg` paths go through `SVGBackend`.
//! - `.png` paths are drawn into an in-memory `BitMapBackend` buffer and
//!   encoded with `image`. Other extensions are refused before any file is
//!   touched, so a failing save never leaves a partial file.
//! - Scenes without a background fill are rendered twice (white and black
//!   base) and the difference becomes the alpha channel.

use super::canvas::{Canvas, DrawOp, HAlign, Scene, VAlign};
use super::fonts::ensure_font_registered;
use crate::color::Rgb8;
use crate::error::RenderError;
use image::{ImageFormat, RgbaImage};
use log::debug;
use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontFamily, FontTransform, IntoFont};
use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;
use std::io::Cursor;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Svg,
    Png,
}

impl OutputFormat {
    fn from_path(path: &Path) -> Result<Self, RenderError> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if ext.eq_ignore_ascii_case("svg") {
            Ok(Self::Svg)
        } else if ext.eq_ignore_ascii_case("png") {
            Ok(Self::Png)
        } else {
            Err(RenderError::UnsupportedFormat(path.display().to_string()))
        }
    }
}

fn backend_err<E: std::fmt::Debug>(e: E) -> RenderError {
    RenderError::Backend(format!("{e:?}"))
}

pub(crate) fn rgb_color(c: Rgb8) -> RGBColor {
    RGBColor(c.r, c.g, c.b)
}

/// Integer affine map from a scene's recorded coordinates to the backend's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Placement {
    a: i32,
    b: i32,
    c: i32,
    d: i32,
    e: i32,
    f: i32,
    /// Counter-clockwise quarter turns accumulated so far.
    turns: u8,
}

impl Placement {
    pub(crate) const IDENTITY: Placement = Placement {
        a: 1,
        b: 0,
        c: 0,
        d: 0,
        e: 1,
        f: 0,
        turns: 0,
    };

    pub(crate) fn translate(dx: i32, dy: i32) -> Self {
        Self {
            c: dx,
            f: dy,
            ..Self::IDENTITY
        }
    }

    /// `turns` counter-clockwise quarter turns of a `(w, h)` image, keeping it in positive space.
    pub(crate) fn rotation(turns: u8, size: (u32, u32)) -> Self {
        let (mut w, mut h) = (size.0 as i32, size.1 as i32);
        let mut p = Self::IDENTITY;
        for _ in 0..turns % 4 {
            let step = Placement {
                a: 0,
                b: 1,
                c: 0,
                d: -1,
                e: 0,
                f: w,
                turns: 1,
            };
            p = p.then(step);
            std::mem::swap(&mut w, &mut h);
        }
        p
    }

    pub(crate) fn apply(&self, (x, y): (i32, i32)) -> (i32, i32) {
        (
            self.a * x + self.b * y + self.c,
            self.d * x + self.e * y + self.f,
        )
    }

    /// `outer` applied after `self`.
    pub(crate) fn then(self, outer: Placement) -> Placement {
        Placement {
            a: outer.a * self.a + outer.b * self.d,
            b: outer.a * self.b + outer.b * self.e,
            c: outer.a * self.c + outer.b * self.f + outer.c,
            d: outer.d * self.a + outer.e * self.d,
            e: outer.d * self.b + outer.e * self.e,
            f: outer.d * self.c + outer.e * self.f + outer.f,
            turns: (self.turns + outer.turns) % 4,
        }
    }

    /// Map a rectangle given by origin and size; returns normalized corners.
    fn rect(&self, origin: (i32, i32), size: (u32, u32)) -> [(i32, i32); 2] {
        let p0 = self.apply(origin);
        let p1 = self.apply((origin.0 + size.0 as i32, origin.1 + size.1 as i32));
        [
            (p0.0.min(p1.0), p0.1.min(p1.1)),
            (p0.0.max(p1.0), p0.1.max(p1.1)),
        ]
    }
}

fn font_transform(turns: u8) -> FontTransform {
    match turns % 4 {
        1 => FontTransform::Rotate270,
        2 => FontTransform::Rotate180,
        3 => FontTransform::Rotate90,
        _ => FontTransform::None,
    }
}

fn text_pos(align: HAlign, valign: VAlign) -> Pos {
    let h = match align {
        HAlign::Left => HPos::Left,
        HAlign::Center => HPos::Center,
        HAlign::Right => HPos::Right,
    };
    let v = match valign {
        VAlign::Top => VPos::Top,
        VAlign::Middle => VPos::Center,
        VAlign::Bottom => VPos::Bottom,
    };
    Pos::new(h, v)
}

/// Draw every op of `scene` (and nested scenes) onto `area`.
fn replay<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    scene: &Scene,
    outer: Placement,
) -> Result<(), RenderError> {
    let recorded = scene.unrotated_size();
    let placement = Placement::rotation(scene.quarter_turns(), recorded).then(outer);

    for tagged in scene.ops() {
        match &tagged.op {
            DrawOp::Fill(color) => {
                let corners = placement.rect((0, 0), recorded);
                area.draw(&Rectangle::new(corners, rgb_color(*color).filled()))
                    .map_err(backend_err)?;
            }
            DrawOp::Line {
                from,
                to,
                width,
                color,
            } => {
                let Some(color) = color else { continue };
                let path = vec![placement.apply(*from), placement.apply(*to)];
                area.draw(&PathElement::new(path, rgb_color(*color).stroke_width(*width)))
                    .map_err(backend_err)?;
            }
            DrawOp::Rectangle {
                origin,
                size,
                background,
                border,
                border_width,
            } => {
                let corners = placement.rect(*origin, *size);
                if let Some(bg) = background {
                    area.draw(&Rectangle::new(corners, rgb_color(*bg).filled()))
                        .map_err(backend_err)?;
                }
                if let Some(border) = border
                    && *border_width > 0
                {
                    area.draw(&Rectangle::new(
                        corners,
                        rgb_color(*border).stroke_width(*border_width),
                    ))
                    .map_err(backend_err)?;
                }
            }
            DrawOp::Text {
                text,
                pos,
                font,
                align,
                valign,
                quarter_turns,
            } => {
                let Some(color) = font.color else { continue };
                ensure_font_registered(&font.path)?;
                let style = (FontFamily::Name(font.path.as_str()), font.size as f64)
                    .into_font()
                    .transform(font_transform(quarter_turns + placement.turns))
                    .color(&rgb_color(color))
                    .pos(text_pos(*align, *valign));
                area.draw(&Text::new(text.clone(), placement.apply(*pos), style))
                    .map_err(backend_err)?;
            }
            DrawOp::Place {
                scene: child,
                anchor,
                offset,
            } => {
                let (ox, oy) = anchor.origin(recorded, child.size());
                let child_outer =
                    Placement::translate(ox + offset.0, oy + offset.1).then(placement);
                replay(area, child, child_outer)?;
            }
        }
    }
    Ok(())
}

impl Scene {
    /// Write the scene to `path`: SVG for `.svg`, PNG for `.png`. The file is
    /// only created once the whole image is encoded in memory.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), RenderError> {
        let path = path.as_ref();
        let bytes = match OutputFormat::from_path(path)? {
            OutputFormat::Svg => self.to_svg()?.into_bytes(),
            OutputFormat::Png => self.to_png()?,
        };
        std::fs::write(path, bytes)?;
        debug!("wrote {} ops to {}", self.ops().len(), path.display());
        Ok(())
    }

    /// PNG-encoded [`Self::rasterize`] output.
    pub fn to_png(&self) -> Result<Vec<u8>, RenderError> {
        let mut bytes = Vec::new();
        self.rasterize()?
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }

    pub fn to_svg(&self) -> Result<String, RenderError> {
        let mut out = String::new();
        {
            let root = SVGBackend::with_string(&mut out, self.size()).into_drawing_area();
            replay(&root, self, Placement::IDENTITY)?;
            root.present().map_err(backend_err)?;
        }
        Ok(out)
    }

    /// Rasterize to RGBA. Pixels not covered by any op are fully transparent
    /// when the scene has no background fill.
    pub fn rasterize(&self) -> Result<RgbaImage, RenderError> {
        let (w, h) = self.size();
        let data = if self.background().is_some() {
            let rgb = self.render_rgb(None)?;
            rgb.chunks_exact(3)
                .flat_map(|px| [px[0], px[1], px[2], 255])
                .collect()
        } else {
            let on_white = self.render_rgb(Some(Rgb8::WHITE))?;
            let on_black = self.render_rgb(Some(Rgb8::BLACK))?;
            matte(&on_white, &on_black)
        };
        RgbaImage::from_raw(w, h, data)
            .ok_or_else(|| RenderError::Backend("raster buffer size mismatch".into()))
    }

    fn render_rgb(&self, base: Option<Rgb8>) -> Result<Vec<u8>, RenderError> {
        let (w, h) = self.size();
        let mut buf = vec![0u8; w as usize * h as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buf, (w, h)).into_drawing_area();
            if let Some(base) = base {
                root.fill(&rgb_color(base)).map_err(backend_err)?;
            }
            replay(&root, self, Placement::IDENTITY)?;
            root.present().map_err(backend_err)?;
        }
        Ok(buf)
    }
}

/// Recover RGBA from the same scene drawn over white and over black.
fn matte(on_white: &[u8], on_black: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(on_white.len() / 3 * 4);
    for (w, b) in on_white.chunks_exact(3).zip(on_black.chunks_exact(3)) {
        let diff: u32 = (0..3)
            .map(|i| w[i].saturating_sub(b[i]) as u32)
            .sum::<u32>()
            / 3;
        let alpha = 255 - diff.min(255);
        for &channel in b {
            let c = if alpha == 0 {
                0
            } else {
                (channel as u32 * 255 / alpha).min(255)
            };
            out.push(c as u8);
        }
        out.push(alpha as u8);
    }
    out
}
