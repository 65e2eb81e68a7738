//! Drawing surface abstraction and the recording [`Scene`] canvas.
//!
//! The draw pipeline only talks to [`Canvas`]. A `Scene` records every call
//! as a [`DrawOp`] tagged with the [`Layer`] that emitted it; rasterizing and
//! saving happen afterwards in one step (see `raster.rs`).

use crate::color::Rgb8;

/// Pipeline layer that emitted a draw call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Layer {
    Background,
    Grid,
    GridValues,
    Bars,
    Axis,
    FrequencyPolygon,
    CrfPolygon,
    ClassLabels,
    FrequencyValues,
    LabelX,
    LabelY,
    Caption,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VAlign {
    Top,
    Middle,
    Bottom,
}

/// Where a sub-canvas lands on its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Flush with the left edge, centered vertically.
    Left,
}

impl Anchor {
    /// Top-left corner for a `(w, h)` child on a `(pw, ph)` parent.
    pub fn origin(self, parent: (u32, u32), child: (u32, u32)) -> (i32, i32) {
        match self {
            Anchor::Left => (0, (parent.1 as i32 - child.1 as i32) / 2),
        }
    }
}

/// Font selection for a text call.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub path: String,
    pub size: u32,
    pub color: Option<Rgb8>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Fill(Rgb8),
    Line {
        from: (i32, i32),
        to: (i32, i32),
        width: u32,
        color: Option<Rgb8>,
    },
    Rectangle {
        origin: (i32, i32),
        size: (u32, u32),
        background: Option<Rgb8>,
        border: Option<Rgb8>,
        border_width: u32,
    },
    Text {
        text: String,
        pos: (i32, i32),
        font: FontSpec,
        align: HAlign,
        valign: VAlign,
        /// Counter-clockwise quarter turns.
        quarter_turns: u8,
    },
    Place {
        scene: Box<Scene>,
        anchor: Anchor,
        offset: (i32, i32),
    },
}

/// Sink for the draw pipeline.
pub trait Canvas: Sized {
    fn create(width: u32, height: u32) -> Self;

    fn size(&self) -> (u32, u32);

    /// Subsequent calls belong to `layer`. Sinks that do not track layers ignore it.
    fn set_layer(&mut self, _layer: Layer) {}

    fn fill(&mut self, color: Rgb8);

    fn draw_line(&mut self, from: (i32, i32), to: (i32, i32), width: u32, color: Option<Rgb8>);

    fn draw_rectangle(
        &mut self,
        origin: (i32, i32),
        size: (u32, u32),
        background: Option<Rgb8>,
        border: Option<Rgb8>,
        border_width: u32,
    );

    fn draw_text(
        &mut self,
        text: &str,
        pos: (i32, i32),
        font: &FontSpec,
        align: HAlign,
        valign: VAlign,
        quarter_turns: u8,
    );

    /// Turn the whole canvas 90 degrees counter-clockwise; width and height swap.
    fn rotate_ccw(&mut self);

    fn place(&mut self, child: Self, anchor: Anchor, offset: (i32, i32));
}

/// Recorded draw call plus its layer.
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedOp {
    pub layer: Layer,
    pub op: DrawOp,
}

/// Display-list canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    width: u32,
    height: u32,
    quarter_turns: u8,
    layer: Layer,
    ops: Vec<TaggedOp>,
}

impl Scene {
    pub fn ops(&self) -> &[TaggedOp] {
        &self.ops
    }

    /// Counter-clockwise quarter turns applied through [`Canvas::rotate_ccw`].
    pub fn quarter_turns(&self) -> u8 {
        self.quarter_turns
    }

    /// Size before rotation; the coordinate space the ops were recorded in.
    pub fn unrotated_size(&self) -> (u32, u32) {
        if self.quarter_turns % 2 == 1 {
            (self.height, self.width)
        } else {
            (self.width, self.height)
        }
    }

    /// Ops emitted by `layer`, in order.
    pub fn layer_ops(&self, layer: Layer) -> impl Iterator<Item = &DrawOp> + '_ {
        self.ops
            .iter()
            .filter(move |t| t.layer == layer)
            .map(|t| &t.op)
    }

    pub fn background(&self) -> Option<Rgb8> {
        self.ops.iter().find_map(|t| match t.op {
            DrawOp::Fill(c) => Some(c),
            _ => None,
        })
    }

    fn push(&mut self, op: DrawOp) {
        self.ops.push(TaggedOp {
            layer: self.layer,
            op,
        });
    }
}

impl Canvas for Scene {
    fn create(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            quarter_turns: 0,
            layer: Layer::Background,
            ops: Vec::new(),
        }
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn set_layer(&mut self, layer: Layer) {
        self.layer = layer;
    }

    fn fill(&mut self, color: Rgb8) {
        self.push(DrawOp::Fill(color));
    }

    fn draw_line(&mut self, from: (i32, i32), to: (i32, i32), width: u32, color: Option<Rgb8>) {
        self.push(DrawOp::Line {
            from,
            to,
            width,
            color,
        });
    }

    fn draw_rectangle(
        &mut self,
        origin: (i32, i32),
        size: (u32, u32),
        background: Option<Rgb8>,
        border: Option<Rgb8>,
        border_width: u32,
    ) {
        self.push(DrawOp::Rectangle {
            origin,
            size,
            background,
            border,
            border_width,
        });
    }

    fn draw_text(
        &mut self,
        text: &str,
        pos: (i32, i32),
        font: &FontSpec,
        align: HAlign,
        valign: VAlign,
        quarter_turns: u8,
    ) {
        self.push(DrawOp::Text {
            text: text.to_string(),
            pos,
            font: font.clone(),
            align,
            valign,
            quarter_turns: quarter_turns % 4,
        });
    }

    fn rotate_ccw(&mut self) {
        self.quarter_turns = (self.quarter_turns + 1) % 4;
        std::mem::swap(&mut self.width, &mut self.height);
    }

    fn place(&mut self, child: Self, anchor: Anchor, offset: (i32, i32)) {
        self.push(DrawOp::Place {
            scene: Box::new(child),
            anchor,
            offset,
        });
    }
}
