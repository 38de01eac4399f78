//! Property model for GUI elements.
//!
//! Every element carries a [`CommonProps`] block (name, dual-unit geometry,
//! background, stacking) plus a [`KindProps`] block tagged by its
//! [`ElementKind`]. Geometry uses the scale + offset unit: a fraction of the
//! container's size plus a fixed pixel amount, summed at resolve time.

use serde::{Deserialize, Serialize};
use std::fmt;

// ─── Units ───────────────────────────────────────────────────────────────

/// One axis of a scale + offset value.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct UDim {
    pub scale: f32,
    pub offset: f32,
}

impl UDim {
    pub const fn new(scale: f32, offset: f32) -> Self {
        Self { scale, offset }
    }

    pub const fn from_offset(offset: f32) -> Self {
        Self { scale: 0.0, offset }
    }

    /// Resolve against a container extent in pixels.
    pub fn resolve(&self, extent: f32) -> f32 {
        extent * self.scale + self.offset
    }
}

/// Two-axis scale + offset value used for `Position` and `Size`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct UDim2 {
    pub x: UDim,
    pub y: UDim,
}

impl UDim2 {
    pub const fn new(x_scale: f32, x_offset: f32, y_scale: f32, y_offset: f32) -> Self {
        Self {
            x: UDim::new(x_scale, x_offset),
            y: UDim::new(y_scale, y_offset),
        }
    }

    pub const fn from_offset(x: f32, y: f32) -> Self {
        Self::new(0.0, x, 0.0, y)
    }
}

/// Plain two-component vector (anchor points).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

// ─── Colors ──────────────────────────────────────────────────────────────

/// 8-bit RGB color. Edited and displayed as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color3 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Helper to parse a single hex digit.
pub fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Color3 {
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RGB` or `#RRGGBB`. The leading `#` is optional.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let bytes = hex.as_bytes();

        match bytes.len() {
            3 => {
                let r = hex_val(bytes[0])?;
                let g = hex_val(bytes[1])?;
                let b = hex_val(bytes[2])?;
                Some(Self::rgb(r * 17, g * 17, b * 17))
            }
            6 => {
                let r = hex_val(bytes[0])? << 4 | hex_val(bytes[1])?;
                let g = hex_val(bytes[2])? << 4 | hex_val(bytes[3])?;
                let b = hex_val(bytes[4])? << 4 | hex_val(bytes[5])?;
                Some(Self::rgb(r, g, b))
            }
            _ => None,
        }
    }

    /// Uppercase `#RRGGBB`.
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Color3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// A keypoint of a gradient decorator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    /// Position along the gradient, 0.0 .. 1.0.
    pub time: f32,
    pub color: Color3,
}

// ─── Enumerations ────────────────────────────────────────────────────────

/// Declares a closed enumeration that maps 1:1 onto a `Enum.<Type>.<Item>`
/// of the target dialect.
macro_rules! dialect_enum {
    ($(#[$meta:meta])* $name:ident : $enum_name:literal { $default:ident $(, $item:ident)* $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
        pub enum $name {
            #[default]
            $default,
            $($item,)*
        }

        impl $name {
            /// Enumeration type name in the target dialect.
            pub const ENUM_NAME: &'static str = $enum_name;

            pub const ALL: &'static [Self] = &[Self::$default $(, Self::$item)*];

            pub fn as_str(&self) -> &'static str {
                match self {
                    Self::$default => stringify!($default),
                    $(Self::$item => stringify!($item),)*
                }
            }

            pub fn parse(s: &str) -> Option<Self> {
                let s = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|item| item.as_str().eq_ignore_ascii_case(s))
            }

            /// Qualified item path, e.g. `Enum.Font.SourceSans`.
            pub fn qualified(&self) -> String {
                format!("Enum.{}.{}", Self::ENUM_NAME, self.as_str())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

dialect_enum!(
    /// Text font face.
    Font: "Font" { SourceSans, SourceSansBold, Gotham, GothamBold, Arial, ArialBold, Roboto, Code, Legacy }
);

dialect_enum!(
    /// Horizontal text alignment.
    TextXAlignment: "TextXAlignment" { Center, Left, Right }
);

dialect_enum!(
    /// Vertical text alignment.
    TextYAlignment: "TextYAlignment" { Center, Top, Bottom }
);

dialect_enum!(
    /// How an image fills its box.
    ScaleType: "ScaleType" { Stretch, Slice, Tile, Fit, Crop }
);

dialect_enum!(
    /// Stacking axis of a list layout.
    FillDirection: "FillDirection" { Vertical, Horizontal }
);

dialect_enum!(HorizontalAlignment: "HorizontalAlignment" { Left, Center, Right });

dialect_enum!(VerticalAlignment: "VerticalAlignment" { Top, Center, Bottom });

dialect_enum!(
    /// Ordering of siblings inside a list layout.
    SortOrder: "SortOrder" { LayoutOrder, Name }
);

// ─── Element kinds ───────────────────────────────────────────────────────

/// The closed set of element kinds the editor can create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    Frame,
    ScrollingFrame,
    TextLabel,
    TextButton,
    TextBox,
    ImageLabel,
    /// Rounds the corners of its parent.
    UICorner,
    /// Paints its parent's background with a color sequence.
    UIGradient,
    /// Stacks its siblings along one axis.
    UIListLayout,
}

impl ElementKind {
    pub const ALL: &'static [Self] = &[
        Self::Frame,
        Self::TextLabel,
        Self::TextButton,
        Self::ImageLabel,
        Self::UICorner,
        Self::UIGradient,
        Self::TextBox,
        Self::ScrollingFrame,
        Self::UIListLayout,
    ];

    /// Class name used by `Instance.new` in generated code.
    pub fn class_name(&self) -> &'static str {
        match self {
            Self::Frame => "Frame",
            Self::ScrollingFrame => "ScrollingFrame",
            Self::TextLabel => "TextLabel",
            Self::TextButton => "TextButton",
            Self::TextBox => "TextBox",
            Self::ImageLabel => "ImageLabel",
            Self::UICorner => "UICorner",
            Self::UIGradient => "UIGradient",
            Self::UIListLayout => "UIListLayout",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL.iter().copied().find(|k| k.class_name() == s)
    }

    /// Decorators modify how their parent renders instead of drawing a box.
    pub fn is_decorator(&self) -> bool {
        matches!(self, Self::UICorner | Self::UIGradient | Self::UIListLayout)
    }

    pub fn has_text(&self) -> bool {
        matches!(self, Self::TextLabel | Self::TextButton | Self::TextBox)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.class_name())
    }
}

// ─── Properties ──────────────────────────────────────────────────────────

/// Attributes every element carries, regardless of kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommonProps {
    /// Display name; also the base of the generated identifier.
    pub name: String,
    pub position: UDim2,
    pub size: UDim2,
    /// Fractional pivot inside the element's own box.
    pub anchor_point: Vec2,
    /// Degrees, clockwise.
    pub rotation: f32,
    pub background_color: Color3,
    /// 0 = opaque, 1 = invisible.
    pub background_transparency: f32,
    pub z_index: i32,
    pub visible: bool,
}

/// Text attributes shared by labels, buttons and text boxes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextProps {
    pub text: String,
    pub text_color: Color3,
    pub text_size: f32,
    pub font: Font,
    pub text_wrapped: bool,
    pub text_x_alignment: TextXAlignment,
    pub text_y_alignment: TextYAlignment,
}

impl TextProps {
    fn with_text(text: &str) -> Self {
        Self {
            text: text.to_string(),
            text_color: Color3::WHITE,
            text_size: 18.0,
            font: Font::SourceSans,
            text_wrapped: false,
            text_x_alignment: TextXAlignment::Center,
            text_y_alignment: TextYAlignment::Center,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBoxProps {
    pub text: TextProps,
    pub placeholder_text: String,
    pub clear_text_on_focus: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageProps {
    /// Asset reference, e.g. `rbxassetid://123`.
    pub image: String,
    pub image_color: Color3,
    pub image_transparency: f32,
    pub scale_type: ScaleType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrollProps {
    pub canvas_size: UDim2,
    pub scroll_bar_thickness: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListLayoutProps {
    pub padding: UDim,
    pub fill_direction: FillDirection,
    pub horizontal_alignment: HorizontalAlignment,
    pub vertical_alignment: VerticalAlignment,
    pub sort_order: SortOrder,
}

/// Kind-specific attribute block. The variant always matches the element's
/// kind; setters mutate fields inside a variant but never swap it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum KindProps {
    Frame,
    ScrollingFrame(ScrollProps),
    TextLabel(TextProps),
    TextButton(TextProps),
    TextBox(TextBoxProps),
    ImageLabel(ImageProps),
    UICorner { corner_radius: UDim },
    UIGradient { color: Vec<GradientStop> },
    UIListLayout(ListLayoutProps),
}

/// Full attribute set of one element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Properties {
    pub common: CommonProps,
    pub kind: KindProps,
}

impl Properties {
    /// Fully populated defaults for a new element of `kind` named `name`.
    ///
    /// Pure: the same `(kind, name)` always yields the same set.
    #[must_use]
    pub fn defaults_for(kind: ElementKind, name: &str) -> Self {
        let mut common = CommonProps {
            name: name.to_string(),
            position: UDim2::from_offset(50.0, 50.0),
            size: UDim2::from_offset(200.0, 100.0),
            anchor_point: Vec2::default(),
            rotation: 0.0,
            background_color: Color3::rgb(0x80, 0x80, 0x80),
            background_transparency: 0.0,
            z_index: 1,
            visible: true,
        };

        let kind = match kind {
            ElementKind::Frame => KindProps::Frame,
            ElementKind::ScrollingFrame => KindProps::ScrollingFrame(ScrollProps {
                canvas_size: UDim2::new(0.0, 0.0, 2.0, 0.0),
                scroll_bar_thickness: 12.0,
            }),
            ElementKind::TextLabel => KindProps::TextLabel(TextProps {
                text_wrapped: true,
                ..TextProps::with_text("TextLabel")
            }),
            ElementKind::TextButton => {
                common.size = UDim2::from_offset(120.0, 50.0);
                KindProps::TextButton(TextProps::with_text("Button"))
            }
            ElementKind::TextBox => {
                common.size = UDim2::from_offset(250.0, 40.0);
                common.background_color = Color3::WHITE;
                KindProps::TextBox(TextBoxProps {
                    text: TextProps {
                        text_color: Color3::BLACK,
                        text_size: 14.0,
                        ..TextProps::with_text("")
                    },
                    placeholder_text: "Type here...".to_string(),
                    clear_text_on_focus: false,
                })
            }
            ElementKind::ImageLabel => KindProps::ImageLabel(ImageProps {
                image: String::new(),
                image_color: Color3::WHITE,
                image_transparency: 0.0,
                scale_type: ScaleType::Stretch,
            }),
            ElementKind::UICorner => {
                common.name = "UICorner".to_string();
                common.size = UDim2::default();
                KindProps::UICorner {
                    corner_radius: UDim::from_offset(8.0),
                }
            }
            ElementKind::UIGradient => {
                common.name = "UIGradient".to_string();
                common.size = UDim2::default();
                common.rotation = 90.0;
                KindProps::UIGradient {
                    color: vec![
                        GradientStop {
                            time: 0.0,
                            color: Color3::rgb(0x3B, 0x82, 0xF6),
                        },
                        GradientStop {
                            time: 1.0,
                            color: Color3::rgb(0x8B, 0x5C, 0xF6),
                        },
                    ],
                }
            }
            ElementKind::UIListLayout => {
                common.name = "UIListLayout".to_string();
                common.size = UDim2::default();
                KindProps::UIListLayout(ListLayoutProps {
                    padding: UDim::from_offset(5.0),
                    fill_direction: FillDirection::Vertical,
                    horizontal_alignment: HorizontalAlignment::Left,
                    vertical_alignment: VerticalAlignment::Top,
                    sort_order: SortOrder::LayoutOrder,
                })
            }
        };

        Self { common, kind }
    }

    pub fn kind(&self) -> ElementKind {
        match &self.kind {
            KindProps::Frame => ElementKind::Frame,
            KindProps::ScrollingFrame(_) => ElementKind::ScrollingFrame,
            KindProps::TextLabel(_) => ElementKind::TextLabel,
            KindProps::TextButton(_) => ElementKind::TextButton,
            KindProps::TextBox(_) => ElementKind::TextBox,
            KindProps::ImageLabel(_) => ElementKind::ImageLabel,
            KindProps::UICorner { .. } => ElementKind::UICorner,
            KindProps::UIGradient { .. } => ElementKind::UIGradient,
            KindProps::UIListLayout(_) => ElementKind::UIListLayout,
        }
    }

    pub fn text(&self) -> Option<&TextProps> {
        match &self.kind {
            KindProps::TextLabel(t) | KindProps::TextButton(t) => Some(t),
            KindProps::TextBox(b) => Some(&b.text),
            _ => None,
        }
    }

    pub fn text_mut(&mut self) -> Option<&mut TextProps> {
        match &mut self.kind {
            KindProps::TextLabel(t) | KindProps::TextButton(t) => Some(t),
            KindProps::TextBox(b) => Some(&mut b.text),
            _ => None,
        }
    }

    pub fn corner_radius(&self) -> Option<UDim> {
        match &self.kind {
            KindProps::UICorner { corner_radius } => Some(*corner_radius),
            _ => None,
        }
    }

    pub fn corner_radius_mut(&mut self) -> Option<&mut UDim> {
        match &mut self.kind {
            KindProps::UICorner { corner_radius } => Some(corner_radius),
            _ => None,
        }
    }
}
