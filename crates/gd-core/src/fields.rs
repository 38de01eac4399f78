//! Property field table: dotted edit paths ↔ typed accessors.
//!
//! The property panel addresses values by path (`Position.Offset.X`,
//! `Color.1.Time`, ...). [`FieldKey`] is the closed set of those paths;
//! [`Properties::set`] coerces the raw text a field holds into the typed
//! slot, and [`Properties::get`] reads it back for display.

use crate::codegen::format_num;
use crate::model::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// ─── Keys ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

/// Which half of a scale + offset value a field addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitPart {
    Scale,
    Offset,
}

/// An editable property slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKey {
    Name,
    Position(UnitPart, Axis),
    Size(UnitPart, Axis),
    AnchorPoint(Axis),
    Rotation,
    BackgroundColor3,
    BackgroundTransparency,
    ZIndex,
    Visible,
    Text,
    TextColor3,
    TextSize,
    Font,
    TextWrapped,
    TextXAlignment,
    TextYAlignment,
    PlaceholderText,
    ClearTextOnFocus,
    Image,
    ImageColor3,
    ImageTransparency,
    ScaleType,
    CornerRadius(UnitPart),
    /// `Color.<i>.Time` of a gradient stop.
    GradientTime(usize),
    /// `Color.<i>.Value` of a gradient stop.
    GradientColor(usize),
    Padding(UnitPart),
    FillDirection,
    HorizontalAlignment,
    VerticalAlignment,
    SortOrder,
    CanvasSize(UnitPart, Axis),
    ScrollBarThickness,
}

/// Panel section a field is shown under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldGroup {
    Identity,
    Layout,
    Appearance,
    Text,
    Image,
    Corner,
    Gradient,
    List,
    Scrolling,
}

/// What kind of input widget a field needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueType {
    Text,
    Number,
    Integer,
    Bool,
    Color,
    Enum { options: Vec<String> },
}

fn options_of<T: fmt::Display>(all: &[T]) -> ValueType {
    ValueType::Enum {
        options: all.iter().map(ToString::to_string).collect(),
    }
}

fn unit_part(s: &str) -> Option<UnitPart> {
    match s {
        "Scale" => Some(UnitPart::Scale),
        "Offset" => Some(UnitPart::Offset),
        _ => None,
    }
}

fn axis(s: &str) -> Option<Axis> {
    match s {
        "X" => Some(Axis::X),
        "Y" => Some(Axis::Y),
        _ => None,
    }
}

impl FieldKey {
    /// Parse a dotted edit path. Returns `None` for unknown paths.
    pub fn parse(path: &str) -> Option<Self> {
        let parts: Vec<&str> = path.trim().split('.').collect();
        let key = match parts.as_slice() {
            ["Name"] => Self::Name,
            ["Position", u, a] => Self::Position(unit_part(u)?, axis(a)?),
            ["Size", u, a] => Self::Size(unit_part(u)?, axis(a)?),
            ["AnchorPoint", a] => Self::AnchorPoint(axis(a)?),
            ["Rotation"] => Self::Rotation,
            ["BackgroundColor3"] => Self::BackgroundColor3,
            ["BackgroundTransparency"] => Self::BackgroundTransparency,
            ["ZIndex"] => Self::ZIndex,
            ["Visible"] => Self::Visible,
            ["Text"] => Self::Text,
            ["TextColor3"] => Self::TextColor3,
            ["TextSize"] => Self::TextSize,
            ["Font"] => Self::Font,
            ["TextWrapped"] => Self::TextWrapped,
            ["TextXAlignment"] => Self::TextXAlignment,
            ["TextYAlignment"] => Self::TextYAlignment,
            ["PlaceholderText"] => Self::PlaceholderText,
            ["ClearTextOnFocus"] => Self::ClearTextOnFocus,
            ["Image"] => Self::Image,
            ["ImageColor3"] => Self::ImageColor3,
            ["ImageTransparency"] => Self::ImageTransparency,
            ["ScaleType"] => Self::ScaleType,
            ["CornerRadius", u] => Self::CornerRadius(unit_part(u)?),
            ["Color", i, "Time"] => Self::GradientTime(i.parse().ok()?),
            ["Color", i, "Value"] => Self::GradientColor(i.parse().ok()?),
            ["Padding", u] => Self::Padding(unit_part(u)?),
            ["FillDirection"] => Self::FillDirection,
            ["HorizontalAlignment"] => Self::HorizontalAlignment,
            ["VerticalAlignment"] => Self::VerticalAlignment,
            ["SortOrder"] => Self::SortOrder,
            ["CanvasSize", u, a] => Self::CanvasSize(unit_part(u)?, axis(a)?),
            ["ScrollBarThickness"] => Self::ScrollBarThickness,
            _ => return None,
        };
        Some(key)
    }

    /// The dotted path this key parses from.
    pub fn path(&self) -> String {
        let udim2 = |root: &str, u: &UnitPart, a: &Axis| format!("{root}.{u:?}.{a:?}");
        match self {
            Self::Position(u, a) => udim2("Position", u, a),
            Self::Size(u, a) => udim2("Size", u, a),
            Self::CanvasSize(u, a) => udim2("CanvasSize", u, a),
            Self::AnchorPoint(a) => format!("AnchorPoint.{a:?}"),
            Self::CornerRadius(u) => format!("CornerRadius.{u:?}"),
            Self::Padding(u) => format!("Padding.{u:?}"),
            Self::GradientTime(i) => format!("Color.{i}.Time"),
            Self::GradientColor(i) => format!("Color.{i}.Value"),
            // Remaining variants are single-segment and spelled like their path
            other => format!("{other:?}"),
        }
    }

    /// Human-readable label for the property panel.
    pub fn label(&self) -> String {
        let unit = |u: &UnitPart| match u {
            UnitPart::Scale => "Scale",
            UnitPart::Offset => "Offset",
        };
        match self {
            Self::Name => "Name".into(),
            Self::Position(u, a) => format!("{a:?} ({})", unit(u)),
            Self::Size(u, Axis::X) => format!("Width ({})", unit(u)),
            Self::Size(u, Axis::Y) => format!("Height ({})", unit(u)),
            Self::AnchorPoint(a) => format!("Anchor {a:?}"),
            Self::BackgroundColor3 => "Background".into(),
            Self::BackgroundTransparency => "Transparency".into(),
            Self::TextColor3 => "Text Color".into(),
            Self::TextSize => "Text Size".into(),
            Self::TextWrapped => "Wrapped".into(),
            Self::TextXAlignment => "Align X".into(),
            Self::TextYAlignment => "Align Y".into(),
            Self::PlaceholderText => "Placeholder".into(),
            Self::ClearTextOnFocus => "Clear On Focus".into(),
            Self::ImageColor3 => "Image Color".into(),
            Self::ImageTransparency => "Image Transparency".into(),
            Self::ScaleType => "Scale Type".into(),
            Self::CornerRadius(u) => format!("Radius ({})", unit(u)),
            Self::GradientTime(i) => format!("Stop {} Time", i + 1),
            Self::GradientColor(i) => format!("Stop {} Color", i + 1),
            Self::Padding(u) => format!("Padding ({})", unit(u)),
            Self::FillDirection => "Direction".into(),
            Self::HorizontalAlignment => "Horizontal".into(),
            Self::VerticalAlignment => "Vertical".into(),
            Self::SortOrder => "Sort Order".into(),
            Self::CanvasSize(u, Axis::X) => format!("Canvas Width ({})", unit(u)),
            Self::CanvasSize(u, Axis::Y) => format!("Canvas Height ({})", unit(u)),
            Self::ScrollBarThickness => "Scroll Bar".into(),
            other => other.path(),
        }
    }

    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Name | Self::Text | Self::PlaceholderText | Self::Image => ValueType::Text,
            Self::ZIndex => ValueType::Integer,
            Self::Visible | Self::TextWrapped | Self::ClearTextOnFocus => ValueType::Bool,
            Self::BackgroundColor3
            | Self::TextColor3
            | Self::ImageColor3
            | Self::GradientColor(_) => ValueType::Color,
            Self::Font => options_of(crate::model::Font::ALL),
            Self::TextXAlignment => options_of(crate::model::TextXAlignment::ALL),
            Self::TextYAlignment => options_of(crate::model::TextYAlignment::ALL),
            Self::ScaleType => options_of(crate::model::ScaleType::ALL),
            Self::FillDirection => options_of(crate::model::FillDirection::ALL),
            Self::HorizontalAlignment => options_of(crate::model::HorizontalAlignment::ALL),
            Self::VerticalAlignment => options_of(crate::model::VerticalAlignment::ALL),
            Self::SortOrder => options_of(crate::model::SortOrder::ALL),
            _ => ValueType::Number,
        }
    }

    pub fn group(&self) -> FieldGroup {
        match self {
            Self::Name => FieldGroup::Identity,
            Self::Position(..) | Self::Size(..) | Self::AnchorPoint(_) | Self::Rotation => {
                FieldGroup::Layout
            }
            Self::BackgroundColor3
            | Self::BackgroundTransparency
            | Self::ZIndex
            | Self::Visible => FieldGroup::Appearance,
            Self::Text
            | Self::TextColor3
            | Self::TextSize
            | Self::Font
            | Self::TextWrapped
            | Self::TextXAlignment
            | Self::TextYAlignment
            | Self::PlaceholderText
            | Self::ClearTextOnFocus => FieldGroup::Text,
            Self::Image | Self::ImageColor3 | Self::ImageTransparency | Self::ScaleType => {
                FieldGroup::Image
            }
            Self::CornerRadius(_) => FieldGroup::Corner,
            Self::GradientTime(_) | Self::GradientColor(_) => FieldGroup::Gradient,
            Self::Padding(_)
            | Self::FillDirection
            | Self::HorizontalAlignment
            | Self::VerticalAlignment
            | Self::SortOrder => FieldGroup::List,
            Self::CanvasSize(..) | Self::ScrollBarThickness => FieldGroup::Scrolling,
        }
    }

    /// Whether an element of `kind` stores this slot at all.
    ///
    /// Gradient stop keys apply to every gradient; whether index `i` exists
    /// is checked when the value is read or written.
    pub fn applies_to(&self, kind: ElementKind) -> bool {
        match self.group() {
            FieldGroup::Identity | FieldGroup::Layout | FieldGroup::Appearance => true,
            FieldGroup::Text => match self {
                Self::PlaceholderText | Self::ClearTextOnFocus => kind == ElementKind::TextBox,
                _ => kind.has_text(),
            },
            FieldGroup::Image => kind == ElementKind::ImageLabel,
            FieldGroup::Corner => kind == ElementKind::UICorner,
            FieldGroup::Gradient => kind == ElementKind::UIGradient,
            FieldGroup::List => kind == ElementKind::UIListLayout,
            FieldGroup::Scrolling => kind == ElementKind::ScrollingFrame,
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

const LAYOUT_FIELDS: &[FieldKey] = &[
    FieldKey::Position(UnitPart::Scale, Axis::X),
    FieldKey::Position(UnitPart::Offset, Axis::X),
    FieldKey::Position(UnitPart::Scale, Axis::Y),
    FieldKey::Position(UnitPart::Offset, Axis::Y),
    FieldKey::Size(UnitPart::Scale, Axis::X),
    FieldKey::Size(UnitPart::Offset, Axis::X),
    FieldKey::Size(UnitPart::Scale, Axis::Y),
    FieldKey::Size(UnitPart::Offset, Axis::Y),
    FieldKey::AnchorPoint(Axis::X),
    FieldKey::AnchorPoint(Axis::Y),
    FieldKey::Rotation,
];

const APPEARANCE_FIELDS: &[FieldKey] = &[
    FieldKey::BackgroundColor3,
    FieldKey::BackgroundTransparency,
    FieldKey::ZIndex,
    FieldKey::Visible,
];

const TEXT_FIELDS: &[FieldKey] = &[
    FieldKey::Text,
    FieldKey::TextColor3,
    FieldKey::TextSize,
    FieldKey::Font,
    FieldKey::TextWrapped,
    FieldKey::TextXAlignment,
    FieldKey::TextYAlignment,
];

/// Panel fields for `kind` in display order: name, layout, appearance,
/// then the kind's own group. Decorators show only their name and the
/// fields their class accepts.
///
/// Gradient stops depend on the element; see [`Properties::fields`].
pub fn fields_for(kind: ElementKind) -> Vec<FieldKey> {
    let mut out = vec![FieldKey::Name];

    if !kind.is_decorator() {
        out.extend_from_slice(LAYOUT_FIELDS);
        out.extend_from_slice(APPEARANCE_FIELDS);
    }

    match kind {
        ElementKind::Frame => {}
        ElementKind::ScrollingFrame => out.extend_from_slice(&[
            FieldKey::CanvasSize(UnitPart::Scale, Axis::X),
            FieldKey::CanvasSize(UnitPart::Offset, Axis::X),
            FieldKey::CanvasSize(UnitPart::Scale, Axis::Y),
            FieldKey::CanvasSize(UnitPart::Offset, Axis::Y),
            FieldKey::ScrollBarThickness,
        ]),
        ElementKind::TextLabel | ElementKind::TextButton => out.extend_from_slice(TEXT_FIELDS),
        ElementKind::TextBox => {
            out.extend_from_slice(TEXT_FIELDS);
            out.push(FieldKey::PlaceholderText);
            out.push(FieldKey::ClearTextOnFocus);
        }
        ElementKind::ImageLabel => out.extend_from_slice(&[
            FieldKey::Image,
            FieldKey::ImageColor3,
            FieldKey::ImageTransparency,
            FieldKey::ScaleType,
        ]),
        ElementKind::UICorner => out.extend_from_slice(&[
            FieldKey::CornerRadius(UnitPart::Scale),
            FieldKey::CornerRadius(UnitPart::Offset),
        ]),
        ElementKind::UIGradient => out.push(FieldKey::Rotation),
        ElementKind::UIListLayout => out.extend_from_slice(&[
            FieldKey::Padding(UnitPart::Scale),
            FieldKey::Padding(UnitPart::Offset),
            FieldKey::FillDirection,
            FieldKey::HorizontalAlignment,
            FieldKey::VerticalAlignment,
            FieldKey::SortOrder,
        ]),
    }

    out
}

// ─── Values ──────────────────────────────────────────────────────────────

/// A typed property value as read back for the panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
    Text(String),
    Number(f32),
    Integer(i32),
    Bool(bool),
    Color(Color3),
    Enum(String),
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) | Self::Enum(s) => f.write_str(s),
            Self::Number(n) => f.write_str(&format_num(*n)),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Color(c) => f.write_str(&c.to_hex()),
        }
    }
}

/// Why a property edit was rejected. The element is left untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditError {
    #[error("unknown property path `{0}`")]
    UnknownField(String),

    #[error("`{field}` does not apply to {kind}")]
    NotApplicable { field: FieldKey, kind: ElementKind },

    #[error("invalid value `{value}` for `{field}`: expected {expected}")]
    InvalidValue {
        field: FieldKey,
        value: String,
        expected: &'static str,
    },
}

fn invalid(field: FieldKey, raw: &str, expected: &'static str) -> EditError {
    EditError::InvalidValue {
        field,
        value: raw.to_string(),
        expected,
    }
}

fn parse_number(field: FieldKey, raw: &str) -> Result<f32, EditError> {
    match raw.trim().parse::<f32>() {
        Ok(n) if n.is_finite() => Ok(n),
        _ => Err(invalid(field, raw, "a number")),
    }
}

fn parse_integer(field: FieldKey, raw: &str) -> Result<i32, EditError> {
    let trimmed = raw.trim();
    if let Ok(i) = trimmed.parse::<i32>() {
        return Ok(i);
    }
    // Number inputs may hand over "3.0"
    match trimmed.parse::<f32>() {
        Ok(n) if n.is_finite() && n.fract() == 0.0 => Ok(n as i32),
        _ => Err(invalid(field, raw, "an integer")),
    }
}

fn parse_bool(field: FieldKey, raw: &str) -> Result<bool, EditError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(invalid(field, raw, "true or false")),
    }
}

fn parse_color(field: FieldKey, raw: &str) -> Result<Color3, EditError> {
    Color3::from_hex(raw).ok_or_else(|| invalid(field, raw, "a #RRGGBB color"))
}

fn parse_enum<T>(field: FieldKey, raw: &str, parse: fn(&str) -> Option<T>) -> Result<T, EditError> {
    parse(raw).ok_or_else(|| invalid(field, raw, "one of the listed options"))
}

fn udim_part(d: &mut UDim, u: UnitPart) -> &mut f32 {
    match u {
        UnitPart::Scale => &mut d.scale,
        UnitPart::Offset => &mut d.offset,
    }
}

fn udim2_part(d: &mut UDim2, u: UnitPart, a: Axis) -> &mut f32 {
    let axis = match a {
        Axis::X => &mut d.x,
        Axis::Y => &mut d.y,
    };
    udim_part(axis, u)
}

fn read_udim(d: UDim, u: UnitPart) -> f32 {
    match u {
        UnitPart::Scale => d.scale,
        UnitPart::Offset => d.offset,
    }
}

fn read_udim2(d: UDim2, u: UnitPart, a: Axis) -> f32 {
    match a {
        Axis::X => read_udim(d.x, u),
        Axis::Y => read_udim(d.y, u),
    }
}

impl Properties {
    /// Panel fields for this element, including one pair per gradient stop.
    pub fn fields(&self) -> Vec<FieldKey> {
        let mut out = fields_for(self.kind());
        if let KindProps::UIGradient { color } = &self.kind {
            for i in 0..color.len() {
                out.push(FieldKey::GradientTime(i));
                out.push(FieldKey::GradientColor(i));
            }
        }
        out
    }

    /// Parse `path` and apply `raw` to it.
    pub fn set_path(&mut self, path: &str, raw: &str) -> Result<(), EditError> {
        let key = FieldKey::parse(path).ok_or_else(|| EditError::UnknownField(path.to_string()))?;
        self.set(key, raw)
    }

    /// Coerce `raw` into the slot named by `key`.
    ///
    /// On error nothing is written.
    pub fn set(&mut self, key: FieldKey, raw: &str) -> Result<(), EditError> {
        let kind = self.kind();
        if !key.applies_to(kind) {
            return Err(EditError::NotApplicable { field: key, kind });
        }
        let not_applicable = EditError::NotApplicable { field: key, kind };

        let common = &mut self.common;
        match key {
            FieldKey::Name => common.name = raw.to_string(),
            FieldKey::Position(u, a) => *udim2_part(&mut common.position, u, a) = parse_number(key, raw)?,
            FieldKey::Size(u, a) => *udim2_part(&mut common.size, u, a) = parse_number(key, raw)?,
            FieldKey::AnchorPoint(Axis::X) => common.anchor_point.x = parse_number(key, raw)?,
            FieldKey::AnchorPoint(Axis::Y) => common.anchor_point.y = parse_number(key, raw)?,
            FieldKey::Rotation => common.rotation = parse_number(key, raw)?,
            FieldKey::BackgroundColor3 => common.background_color = parse_color(key, raw)?,
            FieldKey::BackgroundTransparency => {
                common.background_transparency = parse_number(key, raw)?.clamp(0.0, 1.0);
            }
            FieldKey::ZIndex => common.z_index = parse_integer(key, raw)?,
            FieldKey::Visible => common.visible = parse_bool(key, raw)?,

            FieldKey::Text
            | FieldKey::TextColor3
            | FieldKey::TextSize
            | FieldKey::Font
            | FieldKey::TextWrapped
            | FieldKey::TextXAlignment
            | FieldKey::TextYAlignment => {
                let text = self.text_mut().ok_or(not_applicable)?;
                match key {
                    FieldKey::Text => text.text = raw.to_string(),
                    FieldKey::TextColor3 => text.text_color = parse_color(key, raw)?,
                    FieldKey::TextSize => text.text_size = parse_number(key, raw)?.max(0.0),
                    FieldKey::Font => text.font = parse_enum(key, raw, Font::parse)?,
                    FieldKey::TextWrapped => text.text_wrapped = parse_bool(key, raw)?,
                    FieldKey::TextXAlignment => {
                        text.text_x_alignment = parse_enum(key, raw, TextXAlignment::parse)?;
                    }
                    _ => text.text_y_alignment = parse_enum(key, raw, TextYAlignment::parse)?,
                }
            }

            FieldKey::PlaceholderText | FieldKey::ClearTextOnFocus => {
                let KindProps::TextBox(b) = &mut self.kind else {
                    return Err(not_applicable);
                };
                if key == FieldKey::PlaceholderText {
                    b.placeholder_text = raw.to_string();
                } else {
                    b.clear_text_on_focus = parse_bool(key, raw)?;
                }
            }

            FieldKey::Image | FieldKey::ImageColor3 | FieldKey::ImageTransparency | FieldKey::ScaleType => {
                let KindProps::ImageLabel(img) = &mut self.kind else {
                    return Err(not_applicable);
                };
                match key {
                    FieldKey::Image => img.image = raw.trim().to_string(),
                    FieldKey::ImageColor3 => img.image_color = parse_color(key, raw)?,
                    FieldKey::ImageTransparency => {
                        img.image_transparency = parse_number(key, raw)?.clamp(0.0, 1.0);
                    }
                    _ => img.scale_type = parse_enum(key, raw, ScaleType::parse)?,
                }
            }

            FieldKey::CornerRadius(u) => {
                let value = parse_number(key, raw)?;
                let radius = self.corner_radius_mut().ok_or(not_applicable)?;
                *udim_part(radius, u) = value;
            }

            FieldKey::GradientTime(i) | FieldKey::GradientColor(i) => {
                let KindProps::UIGradient { color } = &mut self.kind else {
                    return Err(not_applicable);
                };
                let stop = color.get_mut(i).ok_or(not_applicable)?;
                if matches!(key, FieldKey::GradientTime(_)) {
                    stop.time = parse_number(key, raw)?.clamp(0.0, 1.0);
                } else {
                    stop.color = parse_color(key, raw)?;
                }
            }

            FieldKey::Padding(_)
            | FieldKey::FillDirection
            | FieldKey::HorizontalAlignment
            | FieldKey::VerticalAlignment
            | FieldKey::SortOrder => {
                let KindProps::UIListLayout(list) = &mut self.kind else {
                    return Err(not_applicable);
                };
                match key {
                    FieldKey::Padding(u) => *udim_part(&mut list.padding, u) = parse_number(key, raw)?,
                    FieldKey::FillDirection => {
                        list.fill_direction = parse_enum(key, raw, FillDirection::parse)?;
                    }
                    FieldKey::HorizontalAlignment => {
                        list.horizontal_alignment = parse_enum(key, raw, HorizontalAlignment::parse)?;
                    }
                    FieldKey::VerticalAlignment => {
                        list.vertical_alignment = parse_enum(key, raw, VerticalAlignment::parse)?;
                    }
                    _ => list.sort_order = parse_enum(key, raw, SortOrder::parse)?,
                }
            }

            FieldKey::CanvasSize(..) | FieldKey::ScrollBarThickness => {
                let KindProps::ScrollingFrame(scroll) = &mut self.kind else {
                    return Err(not_applicable);
                };
                match key {
                    FieldKey::CanvasSize(u, a) => {
                        *udim2_part(&mut scroll.canvas_size, u, a) = parse_number(key, raw)?;
                    }
                    _ => scroll.scroll_bar_thickness = parse_number(key, raw)?.max(0.0),
                }
            }
        }

        Ok(())
    }

    /// Current value of `key`, or `None` when the slot does not exist on
    /// this element.
    pub fn get(&self, key: FieldKey) -> Option<PropertyValue> {
        if !key.applies_to(self.kind()) {
            return None;
        }
        let c = &self.common;
        let num = PropertyValue::Number;
        let color = PropertyValue::Color;
        let enumeration = |s: &str| PropertyValue::Enum(s.to_string());

        let value = match key {
            FieldKey::Name => PropertyValue::Text(c.name.clone()),
            FieldKey::Position(u, a) => num(read_udim2(c.position, u, a)),
            FieldKey::Size(u, a) => num(read_udim2(c.size, u, a)),
            FieldKey::AnchorPoint(Axis::X) => num(c.anchor_point.x),
            FieldKey::AnchorPoint(Axis::Y) => num(c.anchor_point.y),
            FieldKey::Rotation => num(c.rotation),
            FieldKey::BackgroundColor3 => color(c.background_color),
            FieldKey::BackgroundTransparency => num(c.background_transparency),
            FieldKey::ZIndex => PropertyValue::Integer(c.z_index),
            FieldKey::Visible => PropertyValue::Bool(c.visible),
            FieldKey::Text => PropertyValue::Text(self.text()?.text.clone()),
            FieldKey::TextColor3 => color(self.text()?.text_color),
            FieldKey::TextSize => num(self.text()?.text_size),
            FieldKey::Font => enumeration(self.text()?.font.as_str()),
            FieldKey::TextWrapped => PropertyValue::Bool(self.text()?.text_wrapped),
            FieldKey::TextXAlignment => enumeration(self.text()?.text_x_alignment.as_str()),
            FieldKey::TextYAlignment => enumeration(self.text()?.text_y_alignment.as_str()),
            FieldKey::PlaceholderText | FieldKey::ClearTextOnFocus => {
                let KindProps::TextBox(b) = &self.kind else {
                    return None;
                };
                if key == FieldKey::PlaceholderText {
                    PropertyValue::Text(b.placeholder_text.clone())
                } else {
                    PropertyValue::Bool(b.clear_text_on_focus)
                }
            }
            FieldKey::Image | FieldKey::ImageColor3 | FieldKey::ImageTransparency | FieldKey::ScaleType => {
                let KindProps::ImageLabel(img) = &self.kind else {
                    return None;
                };
                match key {
                    FieldKey::Image => PropertyValue::Text(img.image.clone()),
                    FieldKey::ImageColor3 => color(img.image_color),
                    FieldKey::ImageTransparency => num(img.image_transparency),
                    _ => enumeration(img.scale_type.as_str()),
                }
            }
            FieldKey::CornerRadius(u) => num(read_udim(self.corner_radius()?, u)),
            FieldKey::GradientTime(i) | FieldKey::GradientColor(i) => {
                let KindProps::UIGradient { color: stops } = &self.kind else {
                    return None;
                };
                let stop = stops.get(i)?;
                if matches!(key, FieldKey::GradientTime(_)) {
                    num(stop.time)
                } else {
                    color(stop.color)
                }
            }
            FieldKey::Padding(_)
            | FieldKey::FillDirection
            | FieldKey::HorizontalAlignment
            | FieldKey::VerticalAlignment
            | FieldKey::SortOrder => {
                let KindProps::UIListLayout(list) = &self.kind else {
                    return None;
                };
                match key {
                    FieldKey::Padding(u) => num(read_udim(list.padding, u)),
                    FieldKey::FillDirection => enumeration(list.fill_direction.as_str()),
                    FieldKey::HorizontalAlignment => enumeration(list.horizontal_alignment.as_str()),
                    FieldKey::VerticalAlignment => enumeration(list.vertical_alignment.as_str()),
                    _ => enumeration(list.sort_order.as_str()),
                }
            }
            FieldKey::CanvasSize(..) | FieldKey::ScrollBarThickness => {
                let KindProps::ScrollingFrame(scroll) = &self.kind else {
                    return None;
                };
                match key {
                    FieldKey::CanvasSize(u, a) => num(read_udim2(scroll.canvas_size, u, a)),
                    _ => num(scroll.scroll_bar_thickness),
                }
            }
        };
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_and_path_agree() {
        for path in [
            "Name",
            "Position.Offset.X",
            "Size.Scale.Y",
            "AnchorPoint.Y",
            "CornerRadius.Offset",
            "Color.1.Time",
            "Color.0.Value",
            "CanvasSize.Scale.Y",
            "ScrollBarThickness",
            "TextXAlignment",
        ] {
            let key = FieldKey::parse(path).unwrap_or_else(|| panic!("failed to parse {path}"));
            assert_eq!(key.path(), path);
        }
        assert_eq!(FieldKey::parse("Position.X"), None);
        assert_eq!(FieldKey::parse("Position.Offset.Z"), None);
        assert_eq!(FieldKey::parse("Color.x.Time"), None);
        assert_eq!(FieldKey::parse("Bogus"), None);
    }

    #[test]
    fn set_coerces_raw_text() {
        let mut p = Properties::defaults_for(ElementKind::TextLabel, "TextLabel1");
        p.set_path("Position.Offset.X", "120.5").unwrap();
        p.set_path("Size.Scale.Y", "0.25").unwrap();
        p.set_path("BackgroundColor3", "#ff0000").unwrap();
        p.set_path("ZIndex", "3").unwrap();
        p.set_path("Visible", "0").unwrap();
        p.set_path("Font", "GothamBold").unwrap();
        p.set_path("Text", "Hello").unwrap();

        assert_eq!(p.common.position.x.offset, 120.5);
        assert_eq!(p.common.size.y.scale, 0.25);
        assert_eq!(p.common.background_color, Color3::rgb(255, 0, 0));
        assert_eq!(p.common.z_index, 3);
        assert!(!p.common.visible);
        let text = p.text().unwrap();
        assert_eq!(text.font, Font::GothamBold);
        assert_eq!(text.text, "Hello");
    }

    #[test]
    fn transparency_and_stop_time_clamp() {
        let mut p = Properties::defaults_for(ElementKind::Frame, "Frame1");
        p.set(FieldKey::BackgroundTransparency, "1.7").unwrap();
        assert_eq!(p.common.background_transparency, 1.0);
        p.set(FieldKey::BackgroundTransparency, "-3").unwrap();
        assert_eq!(p.common.background_transparency, 0.0);

        let mut g = Properties::defaults_for(ElementKind::UIGradient, "UIGradient2");
        g.set_path("Color.1.Time", "4").unwrap();
        assert_eq!(g.get(FieldKey::GradientTime(1)), Some(PropertyValue::Number(1.0)));
    }

    #[test]
    fn rejected_edits_leave_properties_unchanged() {
        let mut p = Properties::defaults_for(ElementKind::Frame, "Frame1");
        let before = p.clone();

        assert_eq!(
            p.set_path("Position.Offset.Q", "1"),
            Err(EditError::UnknownField("Position.Offset.Q".into()))
        );
        assert!(matches!(
            p.set(FieldKey::Position(UnitPart::Offset, Axis::X), "abc"),
            Err(EditError::InvalidValue { .. })
        ));
        assert!(matches!(
            p.set(FieldKey::BackgroundColor3, "#12"),
            Err(EditError::InvalidValue { .. })
        ));
        assert!(matches!(
            p.set(FieldKey::Text, "hi"),
            Err(EditError::NotApplicable { .. })
        ));
        assert!(matches!(
            p.set(FieldKey::Rotation, "NaN"),
            Err(EditError::InvalidValue { .. })
        ));

        assert_eq!(p, before);
    }

    #[test]
    fn gradient_stop_out_of_range_is_not_applicable() {
        let mut g = Properties::defaults_for(ElementKind::UIGradient, "g");
        assert!(matches!(
            g.set(FieldKey::GradientColor(5), "#FFFFFF"),
            Err(EditError::NotApplicable { .. })
        ));
        assert_eq!(g.get(FieldKey::GradientColor(5)), None);
    }

    #[test]
    fn get_displays_panel_text() {
        let p = Properties::defaults_for(ElementKind::TextBox, "TextBox4");
        let shown = |path: &str| p.get(FieldKey::parse(path).unwrap()).unwrap().to_string();

        assert_eq!(shown("Name"), "TextBox4");
        assert_eq!(shown("Size.Offset.X"), "250");
        assert_eq!(shown("BackgroundColor3"), "#FFFFFF");
        assert_eq!(shown("TextSize"), "14");
        assert_eq!(shown("ClearTextOnFocus"), "false");
        assert_eq!(shown("TextXAlignment"), "Center");
        assert_eq!(p.get(FieldKey::Image), None);
    }

    #[test]
    fn panel_text_writes_back_unchanged() {
        let mut p = Properties::defaults_for(ElementKind::Frame, "Frame1");
        p.set_path("AnchorPoint.X", "0.125").unwrap();
        p.set_path("Position.Scale.X", "0.333").unwrap();
        p.set_path("Size.Offset.X", "3000000000").unwrap();
        let before = p.clone();

        for path in ["AnchorPoint.X", "Position.Scale.X", "Size.Offset.X"] {
            let key = FieldKey::parse(path).unwrap();
            let shown = p.get(key).unwrap().to_string();
            p.set(key, &shown).unwrap();
        }
        assert_eq!(p, before);
        assert_eq!(
            p.get(FieldKey::Position(UnitPart::Scale, Axis::X)).unwrap().to_string(),
            "0.333"
        );
        assert_eq!(
            p.get(FieldKey::Size(UnitPart::Offset, Axis::X)).unwrap().to_string(),
            "3000000000"
        );
    }

    #[test]
    fn fields_follow_kind() {
        let frame = fields_for(ElementKind::Frame);
        assert_eq!(frame[0], FieldKey::Name);
        assert!(frame.contains(&FieldKey::Size(UnitPart::Offset, Axis::X)));
        assert!(!frame.contains(&FieldKey::Text));

        let corner = fields_for(ElementKind::UICorner);
        assert_eq!(
            corner,
            vec![
                FieldKey::Name,
                FieldKey::CornerRadius(UnitPart::Scale),
                FieldKey::CornerRadius(UnitPart::Offset),
            ]
        );

        let gradient = Properties::defaults_for(ElementKind::UIGradient, "g").fields();
        assert!(gradient.contains(&FieldKey::GradientColor(1)));
        assert!(!gradient.contains(&FieldKey::GradientColor(2)));

        for &kind in ElementKind::ALL {
            let props = Properties::defaults_for(kind, "x");
            for key in props.fields() {
                assert!(key.applies_to(kind), "{key} listed for {kind}");
                assert!(props.get(key).is_some(), "{key} unreadable on {kind}");
            }
        }
    }

    #[test]
    fn enum_fields_list_their_options() {
        match FieldKey::Font.value_type() {
            ValueType::Enum { options } => {
                assert_eq!(options.first().map(String::as_str), Some("SourceSans"));
                assert!(options.iter().any(|o| o == "Code"));
            }
            other => panic!("expected enum, got {other:?}"),
        }
        assert_eq!(FieldKey::ZIndex.value_type(), ValueType::Integer);
        assert_eq!(FieldKey::GradientColor(0).value_type(), ValueType::Color);
    }
}
