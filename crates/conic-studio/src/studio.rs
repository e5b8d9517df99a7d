use std::any::Any;
use std::cell::Cell;
use std::rc::Rc;

use anyhow::{Context, Result};

use conic_engine::buffer::UniformValue;
use conic_engine::compile::{
    compile, AttributeFormat, ComputeConfig, RenderObject, RenderObjectDesc, VertexRow,
};
use conic_engine::coords::{ColorRgba, Vec3};
use conic_engine::core::{App, AppControl, FrameCtx, WindowCtx};
use conic_engine::device::Gpu;
use conic_engine::hit::HitConfig;
use conic_engine::input::{InputEvent, PointerEvent, PointerPhase};
use conic_engine::paint::Painter;
use conic_engine::perspective::{Camera, FileStore};
use conic_engine::scene::{InteractionRegion, PointerHandlers, SceneNode};
use conic_engine::RenderContext;

use crate::shaders;

const STORE_PREFIX: &str = "conic-studio";
const PARTICLE_COUNT: u32 = 2048;
const ORBIT_SPEED: f32 = 0.05;
const ZOOM_STEP: f32 = 0.1;

/// Values every params getter reads: half surface size and elapsed time.
#[derive(Debug, Default, Clone, Copy)]
struct Screen {
    half_width: f32,
    half_height: f32,
    time: f32,
}

struct Shape {
    object: Rc<RenderObject>,
    offset: Rc<Cell<Vec3>>,
    radius: f32,
}

/// Operations relayed from region handlers.
enum Op {
    Select(usize),
    Grab { index: usize, x: f32, y: f32 },
    Drag { index: usize, x: f32, y: f32 },
    Drop,
}

pub struct Studio {
    painter: Painter,
    ctx: RenderContext,
    store: FileStore,
    screen: Rc<Cell<Screen>>,
    selected: Rc<Cell<Option<usize>>>,
    shapes: Vec<Shape>,
    particles: Option<Rc<RenderObject>>,
    grab: Option<(usize, f32, f32)>,
    orbit: Option<(f32, f32)>,
}

impl Studio {
    pub fn new(store: FileStore) -> Self {
        let camera = Camera::load(&store, STORE_PREFIX);
        let mut painter = Painter::new();
        painter.set_clear_color(ColorRgba::new(0.02, 0.02, 0.05, 1.0));

        Self {
            painter,
            ctx: RenderContext::new(Default::default(), camera, HitConfig::default()),
            store,
            screen: Rc::new(Cell::new(Screen::default())),
            selected: Rc::new(Cell::new(None)),
            shapes: Vec::new(),
            particles: None,
            grab: None,
            orbit: None,
        }
    }

    fn compile_shape(
        &self,
        gpu: &Gpu<'_>,
        index: usize,
        center: Vec3,
        color: [f32; 4],
    ) -> Result<Shape> {
        let offset = Rc::new(Cell::new(center));
        let (screen, selected, at) = (self.screen.clone(), self.selected.clone(), offset.clone());

        let corners: [[f32; 2]; 3] = [[0.0, 70.0], [-60.0, -40.0], [60.0, -40.0]];
        let desc = RenderObjectDesc::new(shaders::triangle())
            .label(format!("triangle {index}"))
            .attribute("position", AttributeFormat::Float32x4)
            .attribute("color", AttributeFormat::Float32x4)
            .rows(corners.iter().map(|[x, y]| {
                VertexRow::new()
                    .with("position", [*x, *y, 0.0, 1.0])
                    .with("color", color)
            }))
            .params(move || {
                let s = screen.get();
                let glow = if selected.get() == Some(index) { 1.0 } else { 0.0 };
                vec![
                    UniformValue::Vec4([s.half_width, s.half_height, s.time, glow]),
                    UniformValue::Vec3(at.get().to_array()),
                ]
            });

        let object = compile(&gpu.render_ctx(), desc)
            .with_context(|| format!("failed to compile triangle {index}"))?;

        Ok(Shape {
            object: Rc::new(object),
            offset,
            radius: 50.0,
        })
    }

    fn compile_particles(&self, gpu: &Gpu<'_>) -> Result<RenderObject> {
        let screen = self.screen.clone();

        let corners: [[f32; 2]; 6] = [
            [-1.0, -1.0],
            [1.0, -1.0],
            [1.0, 1.0],
            [-1.0, -1.0],
            [1.0, 1.0],
            [-1.0, 1.0],
        ];
        let desc = RenderObjectDesc::new(shaders::particles())
            .label("particles")
            .attribute("corner", AttributeFormat::Float32x2)
            .rows(corners.iter().map(|c| VertexRow::new().with("corner", *c)))
            .params(move || {
                let s = screen.get();
                vec![UniformValue::Vec4([s.half_width, s.half_height, s.time, 0.0])]
            })
            .compute(
                ComputeConfig::new(PARTICLE_COUNT, seed_particles(PARTICLE_COUNT))
                    .attribute("pos", AttributeFormat::Float32x4)
                    .attribute("vel", AttributeFormat::Float32x4),
            );

        compile(&gpu.render_ctx(), desc).context("failed to compile particles")
    }

    /// Fresh frame description; regions follow the shapes' current offsets.
    fn build_scene(&self) -> SceneNode {
        let mut children: Vec<Option<SceneNode>> = self
            .shapes
            .iter()
            .enumerate()
            .map(|(i, shape)| {
                let region = InteractionRegion::new(shape.offset.get(), shape.radius)
                    .with_handlers(shape_handlers(i));
                Some(SceneNode::drawable(shape.object.clone()).with_region(region))
            })
            .collect();
        children.push(self.particles.clone().map(SceneNode::drawable));
        SceneNode::group(children)
    }

    fn pointer(&mut self, event: &PointerEvent) {
        let mut ops = Vec::new();
        let handled = self.ctx.dispatch_pointer(event, &mut |op: &str, payload: Box<dyn Any>| {
            match payload.downcast::<Op>() {
                Ok(op) => ops.push(*op),
                Err(_) => log::warn!("dropping `{op}` with unexpected payload"),
            }
        });
        for op in ops {
            self.apply(op);
        }

        match event.phase {
            PointerPhase::Down if !handled => self.orbit = Some((event.x, event.y)),
            PointerPhase::Move => {
                if let Some((x0, y0)) = self.orbit {
                    let yaw = (event.x - x0) * ORBIT_SPEED;
                    let pitch = (event.y - y0) * ORBIT_SPEED;
                    self.ctx.camera.rotate_by(yaw, pitch);
                    self.orbit = Some((event.x, event.y));
                }
            }
            PointerPhase::Up => self.orbit = None,
            _ => {}
        }
    }

    fn apply(&mut self, op: Op) {
        match op {
            Op::Select(index) => {
                let next = (self.selected.get() != Some(index)).then_some(index);
                self.selected.set(next);
                log::info!("selection: {next:?}");
            }
            Op::Grab { index, x, y } => self.grab = Some((index, x, y)),
            Op::Drag { index, x, y } => {
                let Some((held, x0, y0)) = self.grab else { return };
                let Some(shape) = self.shapes.get(index).filter(|_| held == index) else {
                    return;
                };
                let center = shape.offset.get();
                let depth = self.ctx.camera.transform(center).depth;
                // Pointer +Y is down; screen space is +Y up.
                let delta = self.ctx.camera.screen_delta_to_world(x - x0, y0 - y, depth);
                shape.offset.set(center + delta);
                self.grab = Some((index, x, y));
            }
            Op::Drop => self.grab = None,
        }
    }
}

fn shape_handlers(index: usize) -> PointerHandlers {
    PointerHandlers::default()
        .on_hit(move |_, d| d.dispatch("select", Op::Select(index)))
        .on_press(move |ev, d| {
            d.dispatch(
                "grab",
                Op::Grab {
                    index,
                    x: ev.x,
                    y: ev.y,
                },
            )
        })
        .on_move(move |ev, d| {
            d.dispatch(
                "drag",
                Op::Drag {
                    index,
                    x: ev.x,
                    y: ev.y,
                },
            )
        })
        .on_release(|_, d| d.dispatch("drop", Op::Drop))
}

/// Particles on a ring: xyz position + point size, then angular speed in w.
fn seed_particles(count: u32) -> Vec<f32> {
    let mut state: u32 = 0x9e37_79b9;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        state as f32 / u32::MAX as f32
    };

    let mut out = Vec::with_capacity(count as usize * 8);
    for _ in 0..count {
        let angle = next() * std::f32::consts::TAU;
        let radius = 220.0 + next() * 140.0;
        let height = (next() - 0.5) * 80.0;
        let size = 1.5 + next() * 2.5;
        let speed = 0.2 + next() * 0.8;
        out.extend_from_slice(&[
            radius * angle.cos(),
            height,
            radius * angle.sin(),
            size,
            0.0,
            0.0,
            0.0,
            speed,
        ]);
    }
    out
}

impl App for Studio {
    fn on_start(&mut self, window: &WindowCtx<'_>, gpu: &Gpu<'_>) -> Result<()> {
        self.ctx.set_viewport(window.viewport());

        let adapter = gpu.adapter().get_info().name;
        gpu.set_device_lost_handler(move |e| {
            log::error!("{adapter} went away, compiled drawables are gone: {e}");
        });

        self.ctx.hits_mut().set_config(HitConfig {
            pixel_scale: 1.0,
            ..HitConfig::default()
        });

        let a = self.compile_shape(gpu, 0, Vec3::new(-150.0, 0.0, 0.0), [0.95, 0.35, 0.3, 0.9])?;
        let b = self.compile_shape(gpu, 1, Vec3::new(150.0, 0.0, 0.0), [0.3, 0.8, 0.45, 0.9])?;
        self.shapes = vec![a, b];
        self.particles = Some(Rc::new(self.compile_particles(gpu)?));

        log::info!(
            "studio ready: {} drawables",
            self.build_scene().drawable_count()
        );
        Ok(())
    }

    fn on_input(&mut self, event: &InputEvent) -> AppControl {
        match event {
            InputEvent::Pointer(p) => self.pointer(p),
            InputEvent::MouseWheel(delta) => {
                self.ctx.camera.change_scale_by(delta.lines_y() * ZOOM_STEP);
            }
            InputEvent::PointerLeft => self.orbit = None,
            InputEvent::Focused(false) => {
                self.orbit = None;
                self.grab = None;
                self.ctx.release_pointers();
            }
            InputEvent::Focused(true) => {}
        }
        AppControl::Continue
    }

    fn on_frame(&mut self, frame: &mut FrameCtx<'_, '_>) -> AppControl {
        let viewport = frame.window.viewport();
        self.screen.set(Screen {
            half_width: viewport.width * 0.5,
            half_height: viewport.height * 0.5,
            time: frame.time.elapsed,
        });

        self.ctx.set_scene(self.build_scene());
        frame.paint(&mut self.painter, &mut self.ctx)
    }

    fn on_exit(&mut self) {
        self.ctx.camera.save(&mut self.store, STORE_PREFIX);
        if let Err(e) = self.store.flush() {
            log::warn!("camera not saved: {e:#}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_eight_floats_per_particle() {
        let seed = seed_particles(16);
        assert_eq!(seed.len(), 16 * 8);
        assert!(seed.chunks(8).all(|p| p[3] >= 1.5 && p[7] > 0.0));
    }
}
