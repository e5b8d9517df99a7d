use crate::buffer::{pack_uniforms, UniformValue};
use crate::scene::SceneNode;

use super::FrameState;

/// Threads per compute workgroup. Compute shaders must declare
/// `@workgroup_size(64)`.
pub const WORKGROUP_SIZE: u32 = 64;

/// What the painter needs to know about a drawable to schedule it.
pub trait Paintable {
    fn label(&self) -> &str;

    fn draw_call(&self) -> DrawCall;

    /// Particle count when the drawable carries compute state.
    fn particle_count(&self) -> Option<u32>;

    /// Custom uniform values for this frame.
    fn params(&self) -> Vec<UniformValue>;
}

/// Draw issued by one render pass.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DrawCall {
    Vertices { count: u32, instances: u32 },
    Indexed { count: u32, instances: u32 },
}

/// Load operation for the color and depth attachments of a pass.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LoadMode {
    Clear,
    Load,
}

/// One encoded pass, in submission order.
#[derive(Debug)]
pub enum PassCmd<'a, O> {
    /// Advances a particle system: reads `buffers[read]`, writes `buffers[write]`.
    Compute {
        object: &'a O,
        read: usize,
        write: usize,
        workgroups: u32,
        params: Vec<f32>,
    },
    /// Draws one drawable. `particles` names the buffer the preceding compute
    /// pass wrote, bound as instance data.
    Render {
        object: &'a O,
        load: LoadMode,
        draw: DrawCall,
        particles: Option<usize>,
        params: Vec<f32>,
    },
    /// Single off-screen point drawn with clear load ops so an empty frame
    /// still wipes the surface.
    Clear,
}

/// Ordered pass stream for one frame.
#[derive(Debug)]
pub struct FramePlan<'a, O> {
    parity: usize,
    camera: Vec<f32>,
    passes: Vec<PassCmd<'a, O>>,
}

impl<'a, O: Paintable> FramePlan<'a, O> {
    /// Plans one frame and advances `frame`.
    ///
    /// `camera` is the packed camera block shared by every pass. The frame
    /// counter advances once per call regardless of how many drawables carry
    /// compute state.
    pub fn build(
        scene: Option<&'a SceneNode<O>>,
        frame: &mut FrameState,
        camera: Vec<f32>,
    ) -> Self {
        frame.needs_clear = true;
        let parity = frame.parity();
        frame.counter = frame.counter.wrapping_add(1);

        let mut passes = Vec::new();

        if let Some(scene) = scene {
            scene.for_each_drawable(|_, drawable| {
                let object: &'a O = &drawable.object;
                let params = pack_params(&object.params());

                let particles = object.particle_count().map(|count| {
                    let write = (parity + 1) % 2;
                    passes.push(PassCmd::Compute {
                        object,
                        read: parity,
                        write,
                        workgroups: count.div_ceil(WORKGROUP_SIZE),
                        params: params.clone(),
                    });
                    write
                });

                let load = if frame.needs_clear {
                    frame.needs_clear = false;
                    LoadMode::Clear
                } else {
                    LoadMode::Load
                };

                passes.push(PassCmd::Render {
                    object,
                    load,
                    draw: object.draw_call(),
                    particles,
                    params,
                });
            });
        }

        if frame.needs_clear {
            passes.push(PassCmd::Clear);
            frame.needs_clear = false;
        }

        Self {
            parity,
            camera,
            passes,
        }
    }
}

impl<'a, O> FramePlan<'a, O> {
    /// Compute read index for this frame.
    #[inline]
    pub fn parity(&self) -> usize {
        self.parity
    }

    #[inline]
    pub fn camera(&self) -> &[f32] {
        &self.camera
    }

    #[inline]
    pub fn passes(&self) -> &[PassCmd<'a, O>] {
        &self.passes
    }

    pub fn render_count(&self) -> usize {
        self.passes
            .iter()
            .filter(|p| matches!(p, PassCmd::Render { .. }))
            .count()
    }
}

/// Packs custom params. An empty parameter list still binds one zeroed vec4
/// since uniform bindings cannot be empty.
fn pack_params(values: &[UniformValue]) -> Vec<f32> {
    let mut packed = pack_uniforms(values);
    if packed.is_empty() {
        packed.resize(4, 0.0);
    }
    packed
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    #[derive(Debug, Default)]
    struct Fake {
        vertices: u32,
        indices: Option<u32>,
        particles: Option<u32>,
        params: Vec<UniformValue>,
        params_calls: Cell<u32>,
    }

    impl Fake {
        fn triangle() -> Self {
            Self {
                vertices: 3,
                params: vec![UniformValue::Scalar(0.0)],
                ..Self::default()
            }
        }
    }

    impl Paintable for Fake {
        fn label(&self) -> &str {
            "fake"
        }

        fn draw_call(&self) -> DrawCall {
            let instances = self.particles.unwrap_or(1);
            match self.indices {
                Some(count) => DrawCall::Indexed { count, instances },
                None => DrawCall::Vertices {
                    count: self.vertices,
                    instances,
                },
            }
        }

        fn particle_count(&self) -> Option<u32> {
            self.particles
        }

        fn params(&self) -> Vec<UniformValue> {
            self.params_calls.set(self.params_calls.get() + 1);
            self.params.clone()
        }
    }

    fn leaf(fake: Fake) -> Option<SceneNode<Fake>> {
        Some(SceneNode::drawable(Rc::new(fake)))
    }

    fn loads<O>(plan: &FramePlan<'_, O>) -> Vec<LoadMode> {
        plan.passes()
            .iter()
            .filter_map(|p| match p {
                PassCmd::Render { load, .. } => Some(*load),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn two_triangles_clear_then_load() {
        let scene = SceneNode::group([leaf(Fake::triangle()), leaf(Fake::triangle())]);
        let mut frame = FrameState::new();
        let plan = FramePlan::build(Some(&scene), &mut frame, vec![0.0; 20]);

        assert_eq!(plan.passes().len(), 2);
        assert_eq!(loads(&plan), vec![LoadMode::Clear, LoadMode::Load]);
        for pass in plan.passes() {
            let PassCmd::Render { draw, particles, .. } = pass else {
                panic!("unexpected pass {pass:?}");
            };
            assert_eq!(*draw, DrawCall::Vertices { count: 3, instances: 1 });
            assert_eq!(*particles, None);
        }
        assert!(!frame.needs_clear());
    }

    #[test]
    fn every_frame_clears_again() {
        let scene = SceneNode::group([leaf(Fake::triangle())]);
        let mut frame = FrameState::new();
        for _ in 0..3 {
            let plan = FramePlan::build(Some(&scene), &mut frame, Vec::new());
            assert_eq!(loads(&plan), vec![LoadMode::Clear]);
        }
        assert_eq!(frame.counter(), 3);
    }

    #[test]
    fn empty_scene_gets_degenerate_clear() {
        let mut frame = FrameState::new();
        let plan = FramePlan::<Fake>::build(None, &mut frame, Vec::new());
        assert!(matches!(plan.passes(), [PassCmd::Clear]));

        let scene = SceneNode::<Fake>::group([None, Some(SceneNode::group([None]))]);
        let plan = FramePlan::build(Some(&scene), &mut frame, Vec::new());
        assert!(matches!(plan.passes(), [PassCmd::Clear]));
        assert_eq!(plan.render_count(), 0);
    }

    #[test]
    fn compute_precedes_render_and_shares_parity() {
        let particles = || Fake {
            vertices: 3,
            particles: Some(1500),
            ..Fake::default()
        };
        let scene = SceneNode::group([leaf(particles()), leaf(particles())]);
        let mut frame = FrameState::new();

        for expected_read in [0usize, 1, 0] {
            let plan = FramePlan::build(Some(&scene), &mut frame, Vec::new());
            assert_eq!(plan.parity(), expected_read);
            assert_eq!(plan.passes().len(), 4);

            for pair in plan.passes().chunks(2) {
                let PassCmd::Compute { read, write, workgroups, .. } = &pair[0] else {
                    panic!("expected compute first");
                };
                assert_eq!(*read, expected_read);
                assert_eq!(*write, (expected_read + 1) % 2);
                assert_eq!(*workgroups, 24);

                let PassCmd::Render { draw, particles, .. } = &pair[1] else {
                    panic!("expected render second");
                };
                assert_eq!(*particles, Some(*write));
                assert_eq!(*draw, DrawCall::Vertices { count: 3, instances: 1500 });
            }
        }
    }

    #[test]
    fn workgroups_round_up() {
        let scene = SceneNode::drawable(Rc::new(Fake {
            particles: Some(64),
            ..Fake::default()
        }));
        let plan = FramePlan::build(Some(&scene), &mut FrameState::new(), Vec::new());
        assert!(matches!(plan.passes()[0], PassCmd::Compute { workgroups: 1, .. }));

        let scene = SceneNode::drawable(Rc::new(Fake {
            particles: Some(65),
            ..Fake::default()
        }));
        let plan = FramePlan::build(Some(&scene), &mut FrameState::new(), Vec::new());
        assert!(matches!(plan.passes()[0], PassCmd::Compute { workgroups: 2, .. }));
    }

    #[test]
    fn indexed_drawables_issue_indexed_draws() {
        let scene = SceneNode::drawable(Rc::new(Fake {
            vertices: 4,
            indices: Some(6),
            ..Fake::default()
        }));
        let plan = FramePlan::build(Some(&scene), &mut FrameState::new(), Vec::new());
        assert!(matches!(
            plan.passes()[0],
            PassCmd::Render {
                draw: DrawCall::Indexed { count: 6, instances: 1 },
                ..
            }
        ));
    }

    #[test]
    fn params_are_read_once_per_frame_and_packed() {
        let scene = SceneNode::drawable(Rc::new(Fake {
            vertices: 3,
            params: vec![UniformValue::Scalar(2.0), UniformValue::Vec3([1.0, 2.0, 3.0])],
            ..Fake::default()
        }));
        let plan = FramePlan::build(Some(&scene), &mut FrameState::new(), Vec::new());
        let PassCmd::Render { params, .. } = &plan.passes()[0] else {
            panic!("expected render");
        };
        assert_eq!(params, &vec![2.0, 0.0, 0.0, 0.0, 1.0, 2.0, 3.0, 0.0]);

        let SceneNode::Drawable(d) = &scene else { unreachable!() };
        assert_eq!(d.object.params_calls.get(), 1);
    }

    #[test]
    fn empty_params_bind_a_zero_block() {
        assert_eq!(pack_params(&[]), vec![0.0; 4]);
    }
}
