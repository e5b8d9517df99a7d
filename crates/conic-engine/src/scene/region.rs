use std::fmt;
use std::rc::Rc;

use crate::coords::Vec3;
use crate::input::PointerEvent;

use super::Dispatcher;

/// Callback invoked with the raw pointer event and the application relay.
pub type PointerHandler = Rc<dyn Fn(&PointerEvent, &mut Dispatcher<'_>)>;

/// Optional callback slots of an interaction region.
#[derive(Clone, Default)]
pub struct PointerHandlers {
    /// Click on the region.
    pub on_hit: Option<PointerHandler>,
    /// Press on the region; also starts holding it.
    pub on_press: Option<PointerHandler>,
    /// Pointer moved while the region is held.
    pub on_move: Option<PointerHandler>,
    /// Pointer released while the region is held.
    pub on_release: Option<PointerHandler>,
}

impl PointerHandlers {
    pub fn on_hit(mut self, f: impl Fn(&PointerEvent, &mut Dispatcher<'_>) + 'static) -> Self {
        self.on_hit = Some(Rc::new(f));
        self
    }

    pub fn on_press(mut self, f: impl Fn(&PointerEvent, &mut Dispatcher<'_>) + 'static) -> Self {
        self.on_press = Some(Rc::new(f));
        self
    }

    pub fn on_move(mut self, f: impl Fn(&PointerEvent, &mut Dispatcher<'_>) + 'static) -> Self {
        self.on_move = Some(Rc::new(f));
        self
    }

    pub fn on_release(mut self, f: impl Fn(&PointerEvent, &mut Dispatcher<'_>) + 'static) -> Self {
        self.on_release = Some(Rc::new(f));
        self
    }
}

impl fmt::Debug for PointerHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PointerHandlers")
            .field("on_hit", &self.on_hit.is_some())
            .field("on_press", &self.on_press.is_some())
            .field("on_move", &self.on_move.is_some())
            .field("on_release", &self.on_release.is_some())
            .finish()
    }
}

/// Sphere in world space that receives pointer events for its drawable.
#[derive(Debug, Clone)]
pub struct InteractionRegion {
    pub center: Vec3,
    pub radius: f32,
    pub handlers: PointerHandlers,
}

impl InteractionRegion {
    #[inline]
    pub fn new(center: impl Into<Vec3>, radius: f32) -> Self {
        Self {
            center: center.into(),
            radius,
            handlers: PointerHandlers::default(),
        }
    }

    #[inline]
    pub fn with_handlers(mut self, handlers: PointerHandlers) -> Self {
        self.handlers = handlers;
        self
    }
}
