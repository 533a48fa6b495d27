//! The study announcement card: a fixed 1200×630 layout filled in from a [`RenderModel`].

use palette::{Srgb, Srgba, WithAlpha};

use crate::{
    layout::{Def, Document, Group, Node, Paint, Path, Rect, Stroke, Text, Transform},
    text::{text_width, wrap},
    theme::{Gradient, Palette, rgb},
};

pub const CANVAS_WIDTH: u32 = 1200;
pub const CANVAS_HEIGHT: u32 = 630;

pub const BADGE_TEXT: &str = "새 스터디 공지가 올라왔어요!";
const BADGE_GLYPH: &str = "📢";

/// Resolved values for a single card.
#[derive(Debug, Clone)]
pub struct RenderModel<'a> {
    pub title: &'a str,
    pub study: &'a str,
    pub display_date: String,
    pub palette: Palette,
}

const CONTAINER_WIDTH: f32 = 1150.0;
const HEADER_GAP: f32 = 28.0;

const BADGE_FONT_SIZE: f32 = 30.0;
const BADGE_PADDING: (f32, f32) = (10.0, 20.0);
const BADGE_GAP: f32 = 12.0;

const DATE_FONT_SIZE: f32 = 22.0;
const DATE_ICON_SIZE: f32 = 24.0;
const DATE_ICON_GAP: f32 = 10.0;

const CARD_RADIUS: f32 = 28.0;
const BAR_WIDTH: f32 = 18.0;
const CARD_PADDING: f32 = 55.0;

const TITLE_FONT_SIZE: f32 = 62.0;
const TITLE_LINE_HEIGHT: f32 = TITLE_FONT_SIZE * 1.3;
const TITLE_LETTER_SPACING: f32 = TITLE_FONT_SIZE * -0.03;
const TITLE_MARGIN: f32 = 22.0;
/// Share of the content width available to the title.
const TITLE_MAX_WIDTH: f32 = 0.8;

const RULE_SIZE: (f32, f32) = (70.0, 5.0);
const RULE_MARGIN: f32 = 24.0;

const STUDY_FONT_SIZE: f32 = 32.0;
const STUDY_LINE_HEIGHT: f32 = STUDY_FONT_SIZE * 1.3;

const CALENDAR_OUTLINE: &str = "M8 2V5M16 2V5M3.5 9.09H20.5M21 8.5V17C21 20 19.5 22 16 22H8C4.5 22 3 20 3 17V8.5C3 5.5 4.5 3.5 8 3.5H16C19.5 3.5 21 5.5 21 8.5Z";
const CALENDAR_DOTS: &str = "M11.995 13.7H12.005M8.294 13.7H8.304M8.294 16.7H8.304";

const BACKGROUND: &str = "background";
const DECORATION_LARGE: &str = "decoration-large";
const DECORATION_SMALL: &str = "decoration-small";
const ACCENT_GRADIENT: &str = "accent-gradient";
const CARD_CLIP: &str = "card-clip";
const CARD_SHADOW: &str = "card-shadow";
const BACKDROP_BLUR: &str = "backdrop-blur";
const BAR_GLOW: &str = "bar-glow";
const RULE_SHADOW: &str = "rule-shadow";
const TITLE_SHADOW: &str = "title-shadow";

fn rgba(hex: u32, alpha: u8) -> Srgba<u8> { rgb(hex).with_alpha(alpha) }

fn opaque(c: Srgb<u8>) -> Srgba<u8> { c.with_alpha(u8::MAX) }

/// Vertical position of the baseline for a line box starting at `top`.
fn baseline(top: f32, line_height: f32, font_size: f32) -> f32 {
    top + line_height / 2.0 + font_size * 0.35
}

/// Builds the layout tree for `model`.
pub fn build(model: &RenderModel) -> Document {
    let palette = &model.palette;
    let canvas_w = CANVAS_WIDTH as f32;
    let canvas_h = CANVAS_HEIGHT as f32;

    // Header row
    let badge_text_spacing = BADGE_FONT_SIZE * -0.02;
    let badge_line = BADGE_FONT_SIZE * 1.2;
    let badge_w = BADGE_PADDING.1 * 2.0
        + BADGE_FONT_SIZE
        + BADGE_GAP
        + text_width(BADGE_TEXT, BADGE_FONT_SIZE, badge_text_spacing)
        + 2.0;
    let badge_h = badge_line + BADGE_PADDING.0 * 2.0 + 2.0;
    let date_line = DATE_FONT_SIZE * 1.2;
    let date_w = BADGE_PADDING.1 * 2.0
        + DATE_ICON_SIZE
        + DATE_ICON_GAP
        + text_width(&model.display_date, DATE_FONT_SIZE, 0.0);
    let date_h = date_line.max(DATE_ICON_SIZE) + BADGE_PADDING.0 * 2.0;
    let header_h = badge_h.max(date_h);

    // Card content
    let container_w = (canvas_w * 0.94).min(CONTAINER_WIDTH);
    let content_w = container_w - BAR_WIDTH - CARD_PADDING * 2.0;
    let title_lines =
        wrap(model.title, TITLE_FONT_SIZE, TITLE_LETTER_SPACING, content_w * TITLE_MAX_WIDTH);
    let study_lines = wrap(model.study, STUDY_FONT_SIZE, 0.0, content_w);
    let title_h = title_lines.len().max(1) as f32 * TITLE_LINE_HEIGHT;
    let study_h = study_lines.len().max(1) as f32 * STUDY_LINE_HEIGHT;
    let card_h =
        CARD_PADDING * 2.0 + title_h + TITLE_MARGIN + RULE_SIZE.1 + RULE_MARGIN + study_h;

    // Center the whole container; tall content overflows evenly at both edges.
    let container_x = (canvas_w - container_w) / 2.0;
    let container_y = (canvas_h - (header_h + HEADER_GAP + card_h)) / 2.0;
    let card = Rect::new(container_x, container_y + header_h + HEADER_GAP, container_w, card_h)
        .radius(CARD_RADIUS);

    let defs = vec![
        Def::LinearGradient {
            id: BACKGROUND,
            gradient: Gradient::even(&[rgb(0x0f172a), rgb(0x1e1b4b)]),
        },
        Def::LinearGradient {
            id: DECORATION_LARGE,
            gradient: Gradient::two(palette.accent, rgba(0xa855f7, 51)),
        },
        Def::LinearGradient {
            id: DECORATION_SMALL,
            gradient: Gradient::two(palette.accent, rgba(0xa855f7, 26)),
        },
        Def::LinearGradient { id: ACCENT_GRADIENT, gradient: palette.gradient.clone() },
        Def::ClipPath { id: CARD_CLIP, rect: card.clone() },
        Def::DropShadow { id: CARD_SHADOW, dx: 0.0, dy: 25.0, blur: 25.0, color: rgba(0, 89) },
        Def::Blur { id: BACKDROP_BLUR, std_dev: 16.0 },
        Def::DropShadow {
            id: BAR_GLOW,
            dx: 0.0,
            dy: 0.0,
            blur: 15.0,
            color: palette.primary.with_alpha(0x50),
        },
        Def::DropShadow {
            id: RULE_SHADOW,
            dx: 0.0,
            dy: 2.0,
            blur: 3.0,
            color: palette.primary.with_alpha(0x40),
        },
        Def::DropShadow { id: TITLE_SHADOW, dx: 0.0, dy: 2.0, blur: 2.0, color: rgba(0, 51) },
    ];

    let mut children = backdrop();

    // Badge
    let header_mid = container_y + header_h / 2.0;
    let badge = Rect::new(container_x, header_mid - badge_h / 2.0, badge_w, badge_h)
        .radius(22.0)
        .fill(Paint::Color(palette.accent))
        .stroke(palette.primary.with_alpha(0x40), 1.0);
    let badge_baseline = baseline(badge.y + 1.0 + BADGE_PADDING.0, badge_line, BADGE_FONT_SIZE);
    let glyph_x = badge.x + 1.0 + BADGE_PADDING.1;
    children.push(badge.into());
    children.push(
        Text {
            x: glyph_x,
            y: badge_baseline,
            lines: vec![BADGE_GLYPH.to_string()],
            line_height: badge_line,
            font_size: BADGE_FONT_SIZE,
            font_weight: 400,
            letter_spacing: 0.0,
            fill: opaque(rgb(0xf8fafc)),
            filter: None,
        }
        .into(),
    );
    children.push(
        Text {
            x: glyph_x + BADGE_FONT_SIZE + BADGE_GAP,
            y: badge_baseline,
            lines: vec![BADGE_TEXT.to_string()],
            line_height: badge_line,
            font_size: BADGE_FONT_SIZE,
            font_weight: 700,
            letter_spacing: badge_text_spacing,
            fill: opaque(rgb(0xf8fafc)),
            filter: None,
        }
        .into(),
    );

    // Date pill, right aligned
    let pill_x = container_x + container_w - date_w;
    let pill = Rect::new(pill_x, header_mid - date_h / 2.0, date_w, date_h)
        .radius(28.0)
        .fill(Paint::Color(rgba(0xffffff, 20)));
    let icon_x = pill.x + BADGE_PADDING.1;
    let icon_y = header_mid - DATE_ICON_SIZE / 2.0;
    let date_x = icon_x + DATE_ICON_SIZE + DATE_ICON_GAP;
    let icon_color = opaque(palette.text_accent);
    children.push(pill.into());
    children.push(
        Group {
            transform: Some(Transform::Translate(icon_x, icon_y)),
            children: vec![
                Path { d: CALENDAR_OUTLINE, stroke: Stroke { color: icon_color, width: 1.5 } }
                    .into(),
                Path { d: CALENDAR_DOTS, stroke: Stroke { color: icon_color, width: 2.0 } }
                    .into(),
            ],
            ..Default::default()
        }
        .into(),
    );
    children.push(
        Text {
            x: date_x,
            y: baseline(header_mid - date_line / 2.0, date_line, DATE_FONT_SIZE),
            lines: vec![model.display_date.clone()],
            line_height: date_line,
            font_size: DATE_FONT_SIZE,
            font_weight: 500,
            letter_spacing: 0.0,
            fill: opaque(rgb(0xcbd5e1)),
            filter: None,
        }
        .into(),
    );

    // Card panel: shadow, blurred copy of the backdrop, then the translucent panel on top
    let shadow = card.clone().fill(Paint::Color(rgba(0x0f172a, u8::MAX))).filter(CARD_SHADOW);
    children.push(shadow.into());
    children.push(
        Group {
            clip_path: Some(CARD_CLIP),
            filter: Some(BACKDROP_BLUR),
            children: backdrop(),
            ..Default::default()
        }
        .into(),
    );
    children.push(
        card.clone()
            .fill(Paint::Color(rgba(0x0f172a, 217)))
            .stroke(palette.primary.with_alpha(0x30), 1.0)
            .into(),
    );
    children.push(
        Group {
            clip_path: Some(CARD_CLIP),
            children: vec![
                Rect::new(card.x, card.y, BAR_WIDTH, card.height)
                    .fill(Paint::Ref(ACCENT_GRADIENT))
                    .filter(BAR_GLOW)
                    .into(),
            ],
            ..Default::default()
        }
        .into(),
    );

    // Card content
    let content_x = card.x + BAR_WIDTH + CARD_PADDING;
    let title_y = card.y + CARD_PADDING;
    children.push(
        Text {
            x: content_x,
            y: baseline(title_y, TITLE_LINE_HEIGHT, TITLE_FONT_SIZE),
            lines: title_lines,
            line_height: TITLE_LINE_HEIGHT,
            font_size: TITLE_FONT_SIZE,
            font_weight: 800,
            letter_spacing: TITLE_LETTER_SPACING,
            fill: opaque(rgb(0xffffff)),
            filter: Some(TITLE_SHADOW),
        }
        .into(),
    );
    let rule_y = title_y + title_h + TITLE_MARGIN;
    children.push(
        Rect::new(content_x, rule_y, RULE_SIZE.0, RULE_SIZE.1)
            .radius(4.0)
            .fill(Paint::Ref(ACCENT_GRADIENT))
            .filter(RULE_SHADOW)
            .into(),
    );
    let study_y = rule_y + RULE_SIZE.1 + RULE_MARGIN;
    children.push(
        Text {
            x: content_x,
            y: baseline(study_y, STUDY_LINE_HEIGHT, STUDY_FONT_SIZE),
            lines: study_lines,
            line_height: STUDY_LINE_HEIGHT,
            font_size: STUDY_FONT_SIZE,
            font_weight: 600,
            letter_spacing: 0.0,
            fill: palette.secondary.with_alpha(242),
            filter: None,
        }
        .into(),
    );

    Document { width: CANVAS_WIDTH, height: CANVAS_HEIGHT, defs, children }
}

/// Full-bleed background and the two rotated decorative blocks.
fn backdrop() -> Vec<Node> {
    let canvas_w = CANVAS_WIDTH as f32;
    let canvas_h = CANVAS_HEIGHT as f32;
    // top: -20%, right: -10%
    let large = Rect::new(canvas_w * 1.1 - 600.0, canvas_h * -0.2, 600.0, 600.0)
        .radius(100.0)
        .fill(Paint::Ref(DECORATION_LARGE));
    // bottom: -30%, left: -5%
    let small = Rect::new(canvas_w * -0.05, canvas_h * 1.3 - 400.0, 400.0, 400.0)
        .radius(80.0)
        .fill(Paint::Ref(DECORATION_SMALL));
    let rotated = |rect: Rect, angle: f32| -> Node {
        let (cx, cy) = rect.center();
        Group {
            transform: Some(Transform::Rotate { angle, cx, cy }),
            children: vec![rect.into()],
            ..Default::default()
        }
        .into()
    };
    vec![
        Rect::new(0.0, 0.0, canvas_w, canvas_h).fill(Paint::Ref(BACKGROUND)).into(),
        rotated(large, 15.0),
        rotated(small, -20.0),
    ]
}

/// Builds and serializes the card.
pub fn render_svg(model: &RenderModel, font_family: &str) -> String {
    build(model).to_svg(font_family)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::Theme;

    fn model<'a>(title: &'a str, study: &'a str, theme: Theme) -> RenderModel<'a> {
        RenderModel {
            title,
            study,
            display_date: "2024년 3월 15일 오전 09:30".to_string(),
            palette: theme.palette(),
        }
    }

    fn texts(doc: &Document) -> Vec<&Text> {
        fn walk<'a>(nodes: &'a [Node], out: &mut Vec<&'a Text>) {
            for node in nodes {
                match node {
                    Node::Text(text) => out.push(text),
                    Node::Group(group) => walk(&group.children, out),
                    _ => {}
                }
            }
        }
        let mut out = Vec::new();
        walk(&doc.children, &mut out);
        out
    }

    #[test]
    fn test_canvas_and_text() {
        let doc = build(&model("스터디킥오프", "알고리즘반", Theme::Rose));
        assert_eq!((doc.width, doc.height), (1200, 630));
        let lines: Vec<&str> =
            texts(&doc).iter().flat_map(|t| t.lines.iter().map(String::as_str)).collect();
        assert_eq!(lines, vec![
            BADGE_GLYPH,
            BADGE_TEXT,
            "2024년 3월 15일 오전 09:30",
            "스터디킥오프",
            "알고리즘반"
        ]);
    }

    #[test]
    fn test_structure_is_fixed() {
        let short = build(&model("짧은 제목", "스터디", Theme::Indigo));
        let long_title = "아주 긴 제목 ".repeat(20);
        let long = build(&model(&long_title, "스터디", Theme::Ai));
        assert_eq!(short.children.len(), long.children.len());
        assert_eq!(short.defs.len(), long.defs.len());
        let title = |doc: &Document| texts(doc)[3].lines.len();
        assert_eq!(title(&short), 1);
        assert!(title(&long) > 3);
    }

    #[test]
    fn test_title_is_not_truncated() {
        let long_title = "가".repeat(100);
        let doc = build(&model(&long_title, "스터디", Theme::Indigo));
        assert_eq!(texts(&doc)[3].lines.concat(), long_title);
    }

    #[test]
    fn test_svg_uses_palette() {
        let svg = render_svg(&model("제목", "스터디", Theme::React), "sans-serif");
        assert!(svg.contains("#61dafb"));
        assert!(svg.contains("#4299e1"));
        assert!(svg.contains("#3182ce"));
        assert!(svg.contains("#0f172a"));
        assert!(!svg.contains("#6366f1"));
    }

    #[test]
    fn test_text_is_escaped() {
        let svg = render_svg(&model("<script>&", "a\"b", Theme::Indigo), "sans-serif");
        assert!(svg.contains("&lt;script&gt;&amp;"));
        assert!(!svg.contains("<script>"));
    }

    #[test]
    fn test_svg_has_only_xml_chars() {
        let control = model("킥\u{1}오프", "a\u{ffff}b\u{1f}", Theme::Indigo);
        let svg = render_svg(&control, "sans-serif");
        assert!(svg.chars().all(crate::text::is_xml_char));
        assert!(svg.contains("킥오프"));
        assert!(svg.contains(">ab<"));
    }
}
