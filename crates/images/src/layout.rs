//! Declarative layout tree, serialized to SVG for the rasterizer.
//!
//! All geometry is resolved up front: nodes carry absolute canvas coordinates
//! and the tree is never modified after it is built.

use std::fmt;

use maud::{Markup, PreEscaped, Render, html};
use palette::Srgba;

use crate::theme::{Gradient, html_color};

#[derive(Debug, Clone)]
pub struct Document {
    pub width: u32,
    pub height: u32,
    pub defs: Vec<Def>,
    pub children: Vec<Node>,
}

/// Paint servers, filters and clip paths referenced by id.
#[derive(Debug, Clone)]
pub enum Def {
    /// Diagonal (135°) gradient in object bounding box units.
    LinearGradient { id: &'static str, gradient: Gradient },
    ClipPath { id: &'static str, rect: Rect },
    DropShadow { id: &'static str, dx: f32, dy: f32, blur: f32, color: Srgba<u8> },
    Blur { id: &'static str, std_dev: f32 },
}

#[derive(Debug, Clone)]
pub enum Node {
    Group(Group),
    Rect(Rect),
    Text(Text),
    Path(Path),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transform {
    Translate(f32, f32),
    /// Rotation in degrees around a point.
    Rotate { angle: f32, cx: f32, cy: f32 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    None,
    Color(Srgba<u8>),
    Ref(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Srgba<u8>,
    pub width: f32,
}

#[derive(Debug, Clone, Default)]
pub struct Group {
    pub transform: Option<Transform>,
    pub clip_path: Option<&'static str>,
    pub filter: Option<&'static str>,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub radius: f32,
    pub fill: Paint,
    pub stroke: Option<Stroke>,
    pub filter: Option<&'static str>,
}

/// A block of pre-wrapped lines. `y` is the baseline of the first line.
#[derive(Debug, Clone)]
pub struct Text {
    pub x: f32,
    pub y: f32,
    pub lines: Vec<String>,
    pub line_height: f32,
    pub font_size: f32,
    pub font_weight: u16,
    pub letter_spacing: f32,
    pub fill: Srgba<u8>,
    pub filter: Option<&'static str>,
}

#[derive(Debug, Clone)]
pub struct Path {
    pub d: &'static str,
    pub stroke: Stroke,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height, radius: 0.0, fill: Paint::None, stroke: None, filter: None }
    }

    pub fn radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    pub fn fill(mut self, fill: Paint) -> Self {
        self.fill = fill;
        self
    }

    pub fn stroke(mut self, color: Srgba<u8>, width: f32) -> Self {
        self.stroke = Some(Stroke { color, width });
        self
    }

    pub fn filter(mut self, id: &'static str) -> Self {
        self.filter = Some(id);
        self
    }

    pub fn center(&self) -> (f32, f32) { (self.x + self.width / 2.0, self.y + self.height / 2.0) }
}

impl From<Rect> for Node {
    fn from(value: Rect) -> Self { Self::Rect(value) }
}

impl From<Text> for Node {
    fn from(value: Text) -> Self { Self::Text(value) }
}

impl From<Group> for Node {
    fn from(value: Group) -> Self { Self::Group(value) }
}

impl From<Path> for Node {
    fn from(value: Path) -> Self { Self::Path(value) }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Translate(x, y) => write!(f, "translate({x} {y})"),
            Self::Rotate { angle, cx, cy } => write!(f, "rotate({angle} {cx} {cy})"),
        }
    }
}

fn url(id: &str) -> String { format!("url(#{id})") }

/// Opacity attribute value, omitted when fully opaque.
fn opacity(c: Srgba<u8>) -> Option<String> {
    (c.alpha != u8::MAX).then(|| format!("{:.3}", c.alpha as f32 / 255.0))
}

impl Paint {
    fn value(&self) -> String {
        match self {
            Self::None => "none".to_string(),
            Self::Color(c) => html_color(c.color),
            Self::Ref(id) => url(id),
        }
    }

    fn opacity(&self) -> Option<String> {
        match self {
            Self::Color(c) => opacity(*c),
            _ => None,
        }
    }
}

impl Render for Def {
    fn render(&self) -> Markup {
        match self {
            Self::LinearGradient { id, gradient } => html! {
                linearGradient id=(id) x1="0" y1="0" x2="1" y2="1" {
                    @for stop in &gradient.stops {
                        stop offset=(stop.offset)
                            stop-color=(html_color(stop.color.color))
                            stop-opacity=[opacity(stop.color)] {}
                    }
                }
            },
            Self::ClipPath { id, rect } => html! {
                clipPath id=(id) {
                    rect x=(rect.x) y=(rect.y) width=(rect.width) height=(rect.height) rx=(rect.radius) {}
                }
            },
            Self::DropShadow { id, dx, dy, blur, color } => html! {
                filter id=(id) x="-50%" y="-50%" width="200%" height="200%" {
                    feDropShadow dx=(dx) dy=(dy) stdDeviation=(blur)
                        flood-color=(html_color(color.color))
                        flood-opacity=(color.alpha as f32 / 255.0) {}
                }
            },
            Self::Blur { id, std_dev } => html! {
                filter id=(id) x="0" y="0" width="100%" height="100%" {
                    feGaussianBlur stdDeviation=(std_dev) edgeMode="duplicate" {}
                }
            },
        }
    }
}

impl Render for Node {
    fn render(&self) -> Markup {
        match self {
            Self::Group(group) => html! {
                g transform=[group.transform.map(|t| t.to_string())]
                    clip-path=[group.clip_path.map(url)]
                    filter=[group.filter.map(url)] {
                    @for child in &group.children {
                        (child)
                    }
                }
            },
            Self::Rect(rect) => html! {
                rect x=(rect.x) y=(rect.y) width=(rect.width) height=(rect.height)
                    rx=[(rect.radius > 0.0).then_some(rect.radius)]
                    fill=(rect.fill.value())
                    fill-opacity=[rect.fill.opacity()]
                    stroke=[rect.stroke.map(|s| html_color(s.color.color))]
                    stroke-opacity=[rect.stroke.and_then(|s| opacity(s.color))]
                    stroke-width=[rect.stroke.map(|s| s.width)]
                    filter=[rect.filter.map(url)] {}
            },
            Self::Text(text) => html! {
                text x=(text.x) y=(text.y)
                    font-size=(text.font_size)
                    font-weight=(text.font_weight)
                    letter-spacing=[(text.letter_spacing != 0.0).then_some(text.letter_spacing)]
                    fill=(html_color(text.fill.color))
                    fill-opacity=[opacity(text.fill)]
                    filter=[text.filter.map(url)] {
                    @for (i, line) in text.lines.iter().enumerate() {
                        tspan x=(text.x) y=(text.y + i as f32 * text.line_height) { (line) }
                    }
                }
            },
            Self::Path(path) => html! {
                path d=(path.d) fill="none"
                    stroke=(html_color(path.stroke.color.color))
                    stroke-opacity=[opacity(path.stroke.color)]
                    stroke-width=(path.stroke.width)
                    stroke-linecap="round" stroke-linejoin="round" {}
            },
        }
    }
}

impl Document {
    /// Serializes the tree. Text content is XML-escaped, nothing else is altered.
    pub fn to_svg(&self, font_family: &str) -> String {
        let (w, h) = (self.width, self.height);
        html! {
            (PreEscaped("<?xml version=\"1.0\" encoding=\"utf-8\"?>"))
            svg xmlns="http://www.w3.org/2000/svg" version="1.1" viewBox=(format!("0 0 {w} {h}"))
                width=(w) height=(h) font-family=(font_family) {
                defs {
                    @for def in &self.defs {
                        (def)
                    }
                }
                @for node in &self.children {
                    (node)
                }
            }
        }
        .into_string()
    }
}
