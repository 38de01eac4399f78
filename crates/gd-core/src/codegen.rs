//! Code generator: SceneTree → Luau script.
//!
//! Walks the forest depth-first, pre-order, and writes one `Instance.new`
//! block per element that rebuilds the same hierarchy under a fresh
//! `ScreenGui` at runtime. The output is a one-way transformation; nothing
//! parses it back.

use crate::id::ElementId;
use crate::model::*;
use crate::tree::SceneTree;
use std::collections::HashSet;
use std::fmt::Write;

/// Options for [`generate`].
#[derive(Debug, Clone, PartialEq)]
pub struct CodegenConfig {
    /// Variable holding the generated `ScreenGui`.
    pub root_identifier: String,
    /// Expression the `ScreenGui` is parented to.
    pub player_gui_parent: String,
    /// Suffix repeated identifiers with `_2`, `_3`, ... instead of
    /// shadowing the earlier local.
    pub unique_identifiers: bool,
    /// Round offsets to whole pixels.
    pub round_offsets: bool,
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            root_identifier: "screenGui".to_string(),
            player_gui_parent: "game.Players.LocalPlayer:WaitForChild(\"PlayerGui\")".to_string(),
            unique_identifiers: false,
            round_offsets: true,
        }
    }
}

/// Emit the whole tree as a Luau script.
#[must_use]
pub fn generate(tree: &SceneTree, config: &CodegenConfig) -> String {
    let mut out = String::with_capacity(256 + tree.len() * 320);
    let root = config.root_identifier.as_str();

    let _ = writeln!(out, "local {root} = Instance.new(\"ScreenGui\")");
    let _ = writeln!(out, "{root}.Parent = {}", config.player_gui_parent);
    out.push('\n');

    let mut idents = Identifiers::new(config.unique_identifiers, root);
    for &id in tree.roots() {
        emit_element(&mut out, tree, id, root, &mut idents, config);
    }

    log::info!("generated code for {} elements ({} bytes)", tree.len(), out.len());
    out
}

/// Identifier base for an element name: the name with all whitespace
/// removed.
pub fn identifier_for(name: &str) -> String {
    name.chars().filter(|c| !c.is_whitespace()).collect()
}

struct Identifiers {
    unique: bool,
    used: HashSet<String>,
}

impl Identifiers {
    fn new(unique: bool, root: &str) -> Self {
        let mut used = HashSet::new();
        used.insert(root.to_string());
        Self { unique, used }
    }

    fn claim(&mut self, base: String) -> String {
        if !self.unique || !self.used.contains(&base) {
            self.used.insert(base.clone());
            return base;
        }
        let mut n = 2;
        loop {
            let candidate = format!("{base}_{n}");
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}

fn emit_element(
    out: &mut String,
    tree: &SceneTree,
    id: ElementId,
    parent: &str,
    idents: &mut Identifiers,
    config: &CodegenConfig,
) {
    let Some(el) = tree.find_by_id(id) else {
        return;
    };
    let props = &el.properties;
    let kind = el.kind();

    let mut base = identifier_for(el.name());
    if base.is_empty() {
        base = format!("{}{}", kind.class_name(), id);
    }
    let ident = idents.claim(base);

    let _ = writeln!(out, "local {ident} = Instance.new(\"{}\")", kind.class_name());
    let _ = writeln!(out, "{ident}.Name = {}", quote(el.name()));
    let _ = writeln!(out, "{ident}.Parent = {parent}");

    let mut w = Assign {
        out: &mut *out,
        ident: &ident,
        round: config.round_offsets,
    };
    if kind.is_decorator() {
        emit_decorator_fields(&mut w, props);
    } else {
        emit_common_fields(&mut w, &props.common);
        emit_kind_fields(&mut w, &props.kind);
    }
    out.push('\n');

    for &child in tree.children(id) {
        emit_element(out, tree, child, &ident, idents, config);
    }
}

/// Writes `<ident>.<Field> = <value>` lines.
struct Assign<'a> {
    out: &'a mut String,
    ident: &'a str,
    round: bool,
}

impl Assign<'_> {
    fn set(&mut self, field: &str, value: impl std::fmt::Display) {
        let _ = writeln!(self.out, "{}.{field} = {value}", self.ident);
    }

    fn offset(&self, n: f32) -> String {
        if self.round { format_num(n.round()) } else { format_num(n) }
    }

    fn udim(&self, d: UDim) -> String {
        format!("UDim.new({}, {})", format_num(d.scale), self.offset(d.offset))
    }

    fn udim2(&self, d: UDim2) -> String {
        format!(
            "UDim2.new({}, {}, {}, {})",
            format_num(d.x.scale),
            self.offset(d.x.offset),
            format_num(d.y.scale),
            self.offset(d.y.offset)
        )
    }
}

fn color3(c: Color3) -> String {
    format!("Color3.fromRGB({}, {}, {})", c.r, c.g, c.b)
}

fn emit_common_fields(w: &mut Assign<'_>, c: &CommonProps) {
    w.set(
        "AnchorPoint",
        format!("Vector2.new({}, {})", format_num(c.anchor_point.x), format_num(c.anchor_point.y)),
    );
    let position = w.udim2(c.position);
    w.set("Position", position);
    let size = w.udim2(c.size);
    w.set("Size", size);
    w.set("Rotation", format_num(c.rotation));
    w.set("BackgroundColor3", color3(c.background_color));
    w.set("BackgroundTransparency", format_num(c.background_transparency));
    w.set("ZIndex", c.z_index);
    w.set("Visible", c.visible);
}

fn emit_text_fields(w: &mut Assign<'_>, t: &TextProps) {
    w.set("Text", quote(&t.text));
    w.set("TextColor3", color3(t.text_color));
    w.set("TextSize", format_num(t.text_size));
    w.set("Font", t.font.qualified());
    w.set("TextWrapped", t.text_wrapped);
    w.set("TextXAlignment", t.text_x_alignment.qualified());
    w.set("TextYAlignment", t.text_y_alignment.qualified());
}

fn emit_kind_fields(w: &mut Assign<'_>, kind: &KindProps) {
    match kind {
        KindProps::TextLabel(t) | KindProps::TextButton(t) => emit_text_fields(w, t),
        KindProps::TextBox(b) => {
            emit_text_fields(w, &b.text);
            w.set("PlaceholderText", quote(&b.placeholder_text));
            w.set("ClearTextOnFocus", b.clear_text_on_focus);
        }
        KindProps::ImageLabel(img) => {
            w.set("Image", quote(&img.image));
            w.set("ImageColor3", color3(img.image_color));
            w.set("ImageTransparency", format_num(img.image_transparency));
            w.set("ScaleType", img.scale_type.qualified());
        }
        KindProps::ScrollingFrame(s) => {
            let canvas = w.udim2(s.canvas_size);
            w.set("CanvasSize", canvas);
            w.set("ScrollBarThickness", format_num(s.scroll_bar_thickness));
        }
        _ => {}
    }
}

/// Decorators only get the fields their class accepts.
fn emit_decorator_fields(w: &mut Assign<'_>, props: &Properties) {
    match &props.kind {
        KindProps::UICorner { corner_radius } => {
            let radius = w.udim(*corner_radius);
            w.set("CornerRadius", radius);
        }
        KindProps::UIGradient { color } => {
            let mut stops: Vec<&GradientStop> = color.iter().collect();
            stops.sort_by(|a, b| a.time.total_cmp(&b.time));
            let keypoints: Vec<String> = stops
                .iter()
                .map(|s| format!("ColorSequenceKeypoint.new({}, {})", format_num(s.time), color3(s.color)))
                .collect();
            w.set("Color", format!("ColorSequence.new({{{}}})", keypoints.join(", ")));
            w.set("Rotation", format_num(props.common.rotation));
        }
        KindProps::UIListLayout(list) => {
            let padding = w.udim(list.padding);
            w.set("Padding", padding);
            w.set("FillDirection", list.fill_direction.qualified());
            w.set("HorizontalAlignment", list.horizontal_alignment.qualified());
            w.set("VerticalAlignment", list.vertical_alignment.qualified());
            w.set("SortOrder", list.sort_order.qualified());
        }
        _ => {}
    }
}

/// Double-quoted Luau string literal.
fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Shortest text that parses back to exactly `n`: integers without a
/// decimal point, fractions with as many digits as `f32` needs.
pub fn format_num(n: f32) -> String {
    if n == 0.0 {
        // Also folds -0
        return "0".to_string();
    }
    format!("{n}")
}
