//! # Resize Gestures
//!
//! Pointer-driven resizing of a single node as an explicit state machine:
//!
//! ```text
//! Idle ──pointer down on a handle──▶ Resizing ──pointer up──▶ Idle
//!                                       │  ▲
//!                                       └──┘ pointer move (live geometry only)
//! ```
//!
//! Intermediate geometry is feedback for the canvas and is never committed.
//! Only the `Resizing → Idle` transition produces a patched node, and only if
//! the pointer travelled at least [`CLICK_THRESHOLD`] on some axis.

use crate::node::Node;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Width of the border band that starts a resize
pub const BORDER_ZONE: f64 = 8.0;
pub const MIN_WIDTH: f64 = 100.0;
pub const MIN_HEIGHT: f64 = 50.0;
/// Movement below this on both axes is a click, not a resize
pub const CLICK_THRESHOLD: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// On-screen bounds of a node, as measured by the canvas
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    fn right(&self) -> f64 {
        self.x + self.width
    }

    fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResizeHandle {
    Top,
    Bottom,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl ResizeHandle {
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::Top,
        ResizeHandle::Bottom,
        ResizeHandle::Left,
        ResizeHandle::Right,
        ResizeHandle::TopLeft,
        ResizeHandle::TopRight,
        ResizeHandle::BottomLeft,
        ResizeHandle::BottomRight,
    ];

    pub fn affects_width(self) -> bool {
        !matches!(self, ResizeHandle::Top | ResizeHandle::Bottom)
    }

    pub fn affects_height(self) -> bool {
        !matches!(self, ResizeHandle::Left | ResizeHandle::Right)
    }

    /// The left edge follows the pointer; the right edge stays put
    pub fn moves_left(self) -> bool {
        matches!(
            self,
            ResizeHandle::Left | ResizeHandle::TopLeft | ResizeHandle::BottomLeft
        )
    }

    /// The top edge follows the pointer; the bottom edge stays put
    pub fn moves_top(self) -> bool {
        matches!(
            self,
            ResizeHandle::Top | ResizeHandle::TopLeft | ResizeHandle::TopRight
        )
    }

    /// Which handle, if any, sits under `point` for a node drawn at `bounds`
    pub fn hit_test(bounds: Rect, point: Point) -> Option<ResizeHandle> {
        let inside_x = point.x >= bounds.x - BORDER_ZONE && point.x <= bounds.right() + BORDER_ZONE;
        let inside_y =
            point.y >= bounds.y - BORDER_ZONE && point.y <= bounds.bottom() + BORDER_ZONE;
        if !inside_x || !inside_y {
            return None;
        }

        let left = (point.x - bounds.x).abs() <= BORDER_ZONE;
        let right = (point.x - bounds.right()).abs() <= BORDER_ZONE;
        let top = (point.y - bounds.y).abs() <= BORDER_ZONE;
        let bottom = (point.y - bounds.bottom()).abs() <= BORDER_ZONE;

        match (top, bottom, left, right) {
            (true, _, true, _) => Some(ResizeHandle::TopLeft),
            (true, _, _, true) => Some(ResizeHandle::TopRight),
            (_, true, true, _) => Some(ResizeHandle::BottomLeft),
            (_, true, _, true) => Some(ResizeHandle::BottomRight),
            (true, _, _, _) => Some(ResizeHandle::Top),
            (_, true, _, _) => Some(ResizeHandle::Bottom),
            (_, _, true, _) => Some(ResizeHandle::Left),
            (_, _, _, true) => Some(ResizeHandle::Right),
            _ => None,
        }
    }
}

/// Box size plus the relative offset used to pin the opposite edge
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoxGeometry {
    pub width: f64,
    pub height: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

/// An in-flight resize
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeGesture {
    pub node_id: String,
    pub handle: ResizeHandle,
    /// Pointer position at pointer-down
    pub origin: Point,
    pub initial: BoxGeometry,
    /// Live geometry for visual feedback
    pub current: BoxGeometry,
}

impl ResizeGesture {
    fn geometry_at(&self, pointer: Point) -> BoxGeometry {
        compute_geometry(
            self.handle,
            self.initial,
            pointer.x - self.origin.x,
            pointer.y - self.origin.y,
        )
    }

    fn is_click(&self, pointer: Point) -> bool {
        (pointer.x - self.origin.x).abs() < CLICK_THRESHOLD
            && (pointer.y - self.origin.y).abs() < CLICK_THRESHOLD
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ResizeState {
    #[default]
    Idle,
    Resizing(ResizeGesture),
}

impl ResizeState {
    pub fn is_resizing(&self) -> bool {
        matches!(self, ResizeState::Resizing(_))
    }

    pub fn gesture(&self) -> Option<&ResizeGesture> {
        match self {
            ResizeState::Resizing(gesture) => Some(gesture),
            ResizeState::Idle => None,
        }
    }

    /// `Idle → Resizing`
    ///
    /// Width/height come from the node's pixel style when present, otherwise
    /// from the measured bounds. Handles that drag the left/top edge also
    /// record the node's current `left`/`top` offset.
    pub fn begin(&mut self, node: &Node, handle: ResizeHandle, pointer: Point, measured: Rect) {
        let offset_x = if handle.moves_left() {
            node.style_px("left").unwrap_or(0.0)
        } else {
            0.0
        };
        let offset_y = if handle.moves_top() {
            node.style_px("top").unwrap_or(0.0)
        } else {
            0.0
        };

        let initial = BoxGeometry {
            width: node.style_px("width").unwrap_or(measured.width),
            height: node.style_px("height").unwrap_or(measured.height),
            offset_x,
            offset_y,
        };

        tracing::debug!(node_id = %node.id, ?handle, "resize started");
        *self = ResizeState::Resizing(ResizeGesture {
            node_id: node.id.clone(),
            handle,
            origin: pointer,
            initial,
            current: initial,
        });
    }

    /// Pointer moved while resizing; returns the live geometry
    pub fn update(&mut self, pointer: Point) -> Option<BoxGeometry> {
        match self {
            ResizeState::Resizing(gesture) => {
                gesture.current = gesture.geometry_at(pointer);
                Some(gesture.current)
            }
            ResizeState::Idle => None,
        }
    }

    /// `Resizing → Idle`
    ///
    /// Returns `node` with the final geometry written into its style, or
    /// `None` if there was no gesture, the gesture belongs to another node, or
    /// the pointer never crossed the click threshold.
    pub fn finish(&mut self, pointer: Point, node: &Node) -> Option<Node> {
        let ResizeState::Resizing(gesture) = std::mem::take(self) else {
            return None;
        };
        if gesture.node_id != node.id || gesture.is_click(pointer) {
            return None;
        }

        let geometry = gesture.geometry_at(pointer);
        let handle = gesture.handle;
        let mut patched = node.clone();

        if handle.affects_width() {
            patched.style.insert("width".into(), px(geometry.width));
        }
        if handle.affects_height() {
            patched.style.insert("height".into(), px(geometry.height));
        }

        let shifted = (handle.moves_left() && geometry.offset_x != gesture.initial.offset_x)
            || (handle.moves_top() && geometry.offset_y != gesture.initial.offset_y);
        if shifted {
            let left = if handle.moves_left() {
                geometry.offset_x
            } else {
                node.style_px("left").unwrap_or(0.0)
            };
            let top = if handle.moves_top() {
                geometry.offset_y
            } else {
                node.style_px("top").unwrap_or(0.0)
            };
            patched.style.insert("position".into(), Value::from("relative"));
            patched.style.insert("left".into(), px(left));
            patched.style.insert("top".into(), px(top));
        }

        patched
            .style
            .insert("box-sizing".into(), Value::from("border-box"));

        tracing::debug!(
            node_id = %node.id,
            width = geometry.width,
            height = geometry.height,
            "resize finished"
        );
        Some(patched)
    }

    /// Abandon the gesture without producing a patch
    pub fn cancel(&mut self) -> bool {
        let was_resizing = self.is_resizing();
        *self = ResizeState::Idle;
        was_resizing
    }
}

/// Geometry for a handle dragged by `(dx, dy)`, clamped to the minimum size
pub fn compute_geometry(handle: ResizeHandle, initial: BoxGeometry, dx: f64, dy: f64) -> BoxGeometry {
    let mut next = initial;

    if handle.moves_left() {
        next.width = (initial.width - dx).max(MIN_WIDTH);
        next.offset_x = initial.offset_x + (initial.width - next.width);
    } else if handle.affects_width() {
        next.width = (initial.width + dx).max(MIN_WIDTH);
    }

    if handle.moves_top() {
        next.height = (initial.height - dy).max(MIN_HEIGHT);
        next.offset_y = initial.offset_y + (initial.height - next.height);
    } else if handle.affects_height() {
        next.height = (initial.height + dy).max(MIN_HEIGHT);
    }

    next
}

fn px(value: f64) -> Value {
    let rounded = (value * 100.0).round() / 100.0;
    Value::from(format!("{rounded}px"))
}
