//! Scroll collaborator
//!
//! After a search the first marker is brought into view. The engine only
//! states the request; the host decides what scrolling means.

use crate::dom::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollBehavior {
    #[default]
    Auto,
    Smooth,
}

/// Vertical alignment of the target inside the visible area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollBlock {
    #[default]
    Start,
    Center,
    End,
    Nearest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollIntoView {
    pub behavior: ScrollBehavior,
    pub block: ScrollBlock,
}

impl ScrollIntoView {
    /// Smooth scroll that centres the target
    pub const fn smooth_center() -> Self {
        ScrollIntoView {
            behavior: ScrollBehavior::Smooth,
            block: ScrollBlock::Center,
        }
    }
}

pub trait Viewport {
    fn scroll_into_view(&mut self, node: NodeId, options: ScrollIntoView);
}

/// Viewport for headless use; ignores every request
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopViewport;

impl Viewport for NoopViewport {
    fn scroll_into_view(&mut self, _node: NodeId, _options: ScrollIntoView) {}
}

impl<V: Viewport + ?Sized> Viewport for &mut V {
    fn scroll_into_view(&mut self, node: NodeId, options: ScrollIntoView) {
        (**self).scroll_into_view(node, options);
    }
}
