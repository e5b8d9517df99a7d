//! Per-surface rendering state.
//!
//! Everything a frame reads or mutates lives here and is passed explicitly
//! to the painter and the hit engine. One `RenderContext` belongs to one
//! rendering thread; last write wins.

use std::any::Any;

use crate::buffer::pack_uniforms;
use crate::compile::RenderObject;
use crate::coords::Viewport;
use crate::hit::{HitConfig, HitEngine};
use crate::input::PointerEvent;
use crate::paint::{FramePlan, FrameState};
use crate::perspective::Camera;
use crate::scene::SceneNode;

#[derive(Debug)]
pub struct RenderContext<O = RenderObject> {
    pub camera: Camera,
    viewport: Viewport,
    frame: FrameState,
    scene: Option<SceneNode<O>>,
    hits: HitEngine,
}

impl<O> Default for RenderContext<O> {
    fn default() -> Self {
        Self::new(Viewport::default(), Camera::default(), HitConfig::default())
    }
}

impl<O> RenderContext<O> {
    pub fn new(viewport: Viewport, camera: Camera, hit: HitConfig) -> Self {
        Self {
            camera,
            viewport,
            frame: FrameState::new(),
            scene: None,
            hits: HitEngine::new(hit),
        }
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Updates the surface size. Compiled drawables are not touched; callers
    /// that size resources to the surface must rebuild them.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    #[inline]
    pub fn frame(&self) -> &FrameState {
        &self.frame
    }

    #[inline]
    pub fn scene(&self) -> Option<&SceneNode<O>> {
        self.scene.as_ref()
    }

    /// Replaces the scene painted and hit-tested from now on.
    pub fn set_scene(&mut self, scene: SceneNode<O>) {
        self.scene = Some(scene);
    }

    pub fn clear_scene(&mut self) {
        self.scene = None;
    }

    #[inline]
    pub fn hits(&self) -> &HitEngine {
        &self.hits
    }

    #[inline]
    pub fn hits_mut(&mut self) -> &mut HitEngine {
        &mut self.hits
    }

    /// Routes one pointer event through the current scene.
    pub fn dispatch_pointer(
        &mut self,
        event: &PointerEvent,
        sink: &mut dyn FnMut(&str, Box<dyn Any>),
    ) -> bool {
        self.hits
            .handle(self.scene.as_ref(), &self.camera, self.viewport, event, sink)
    }

    /// Drops every held path. Hosts call this when the pointer can no longer
    /// deliver a release, such as on focus loss.
    pub fn release_pointers(&mut self) {
        self.hits.release_all();
    }
}

impl<O: crate::paint::Paintable> RenderContext<O> {
    /// Plans the next frame from the current scene and camera, advancing
    /// the frame state.
    pub fn plan_frame(&mut self) -> FramePlan<'_, O> {
        let camera = pack_uniforms(&self.camera.uniform_values(self.viewport));
        FramePlan::build(self.scene.as_ref(), &mut self.frame, camera)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::buffer::UniformValue;
    use crate::coords::Vec3;
    use crate::input::PointerPhase;
    use crate::paint::{DrawCall, LoadMode, PassCmd, Paintable};
    use crate::scene::{InteractionRegion, PointerHandlers};

    #[derive(Debug)]
    struct Tri;

    impl Paintable for Tri {
        fn label(&self) -> &str {
            "tri"
        }

        fn draw_call(&self) -> DrawCall {
            DrawCall::Vertices { count: 3, instances: 1 }
        }

        fn particle_count(&self) -> Option<u32> {
            None
        }

        fn params(&self) -> Vec<UniformValue> {
            vec![UniformValue::Scalar(0.0)]
        }
    }

    #[test]
    fn plan_carries_camera_block() {
        let mut ctx = RenderContext::<Tri>::new(
            Viewport::new(800.0, 400.0),
            Camera::default(),
            HitConfig::default(),
        );
        let plan = ctx.plan_frame();
        assert_eq!(plan.camera().len(), 20);
        assert_eq!(plan.camera()[0], Camera::CONE_BACK_SCALE);
        assert_eq!(plan.camera()[1], 2.0);
        assert!(matches!(plan.passes(), [PassCmd::Clear]));
        assert_eq!(ctx.frame().counter(), 1);
    }

    #[test]
    fn scene_swaps_between_frames() {
        let mut ctx = RenderContext::<Tri>::default();
        let tri = Rc::new(Tri);
        ctx.set_scene(SceneNode::group([
            Some(SceneNode::drawable(tri.clone())),
            Some(SceneNode::drawable(tri.clone())),
        ]));
        let loads: Vec<LoadMode> = ctx
            .plan_frame()
            .passes()
            .iter()
            .filter_map(|p| match p {
                PassCmd::Render { load, .. } => Some(*load),
                _ => None,
            })
            .collect();
        assert_eq!(loads, vec![LoadMode::Clear, LoadMode::Load]);

        ctx.clear_scene();
        assert!(matches!(ctx.plan_frame().passes(), [PassCmd::Clear]));
    }

    #[test]
    fn pointer_events_reach_the_current_scene() {
        let mut ctx = RenderContext::<Tri>::new(
            Viewport::new(200.0, 200.0),
            Camera::default(),
            HitConfig::default(),
        );
        ctx.set_scene(SceneNode::drawable(Rc::new(Tri)).with_region(
            InteractionRegion::new(Vec3::zero(), 20.0).with_handlers(
                PointerHandlers::default().on_hit(|ev, d| d.dispatch("clicked", (ev.x, ev.y))),
            ),
        ));

        let seen = RefCell::new(Vec::new());
        let mut sink = |op: &str, payload: Box<dyn Any>| {
            let at = payload.downcast_ref::<(f32, f32)>().copied();
            seen.borrow_mut().push((op.to_string(), at));
        };
        let click = PointerEvent::new(PointerPhase::Click, 105.0, 95.0);
        assert!(ctx.dispatch_pointer(&click, &mut sink));
        assert_eq!(
            seen.into_inner(),
            vec![("clicked".to_string(), Some((105.0, 95.0)))]
        );
    }

    #[test]
    fn released_pointers_stop_receiving_moves() {
        let mut ctx = RenderContext::<Tri>::new(
            Viewport::new(200.0, 200.0),
            Camera::default(),
            HitConfig::default(),
        );
        ctx.set_scene(SceneNode::drawable(Rc::new(Tri)).with_region(
            InteractionRegion::new(Vec3::zero(), 20.0).with_handlers(
                PointerHandlers::default().on_move(|_, d| d.dispatch("moved", ())),
            ),
        ));

        let mut moves = 0;
        let mut sink = |_: &str, _: Box<dyn Any>| moves += 1;
        let down = PointerEvent::new(PointerPhase::Down, 100.0, 100.0);
        let drag = PointerEvent::new(PointerPhase::Move, 120.0, 100.0);

        ctx.dispatch_pointer(&down, &mut sink);
        ctx.dispatch_pointer(&down, &mut sink);
        assert!(ctx.dispatch_pointer(&drag, &mut sink));

        ctx.release_pointers();
        assert!(ctx.hits().held().is_empty());
        assert!(!ctx.dispatch_pointer(&drag, &mut sink));
        assert_eq!(moves, 1);
    }
}
