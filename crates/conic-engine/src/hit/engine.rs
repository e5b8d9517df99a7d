use std::any::Any;

use crate::coords::{Vec2, Viewport};
use crate::input::{PointerEvent, PointerPhase};
use crate::perspective::Camera;
use crate::scene::{Dispatcher, HeldPath, PointerHandler, PointerHandlers, SceneNode};

use super::HitConfig;

/// Region accepted for a pointer position.
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    pub path: HeldPath,
    /// Projected depth of the region center.
    pub depth: f32,
}

/// Finds the region under `pointer` (centered pixels, +Y up).
///
/// A region is a candidate when the pointer is within its projected radius
/// plus `tolerance` and its center lies in front of the culling boundary.
/// The candidate with the largest projected depth wins; on equal depth the
/// first one in tree order is kept.
pub fn find_hit<O>(
    scene: &SceneNode<O>,
    camera: &Camera,
    config: &HitConfig,
    pointer: Vec2,
    tolerance: f32,
) -> Option<Hit> {
    let s = Camera::CONE_BACK_SCALE;
    let mut best: Option<Hit> = None;

    scene.for_each_drawable(|path, drawable| {
        let Some(region) = &drawable.region else { return };

        let p = camera.transform(region.center);
        if p.depth.is_nan() || p.depth <= -0.8 * s {
            return;
        }

        let center = Vec2::new(p.x * config.pixel_scale, p.y * config.pixel_scale);
        let pixel_radius = region.radius * config.pixel_scale * Camera::screen_scale(p.depth);
        if pointer.distance(center) > tolerance + pixel_radius {
            return;
        }

        if best.as_ref().is_none_or(|b| p.depth > b.depth) {
            best = Some(Hit {
                path: path.clone(),
                depth: p.depth,
            });
        }
    });

    best
}

/// Routes pointer events to region handlers and tracks held drawables.
#[derive(Debug, Default)]
pub struct HitEngine {
    config: HitConfig,
    held: Vec<HeldPath>,
}

impl HitEngine {
    pub fn new(config: HitConfig) -> Self {
        Self {
            config,
            held: Vec::new(),
        }
    }

    #[inline]
    pub fn config(&self) -> &HitConfig {
        &self.config
    }

    #[inline]
    pub fn set_config(&mut self, config: HitConfig) {
        self.config = config;
    }

    /// Paths pinned by presses that have not been released yet.
    #[inline]
    pub fn held(&self) -> &[HeldPath] {
        &self.held
    }

    /// Delivers one pointer event. Returns whether any handler ran.
    ///
    /// Click and press are resolved by position. Move and release go to the
    /// held paths, re-resolved against `scene`; release then drops every
    /// held path. Paths that no longer lead to a drawable are skipped.
    pub fn handle<O>(
        &mut self,
        scene: Option<&SceneNode<O>>,
        camera: &Camera,
        viewport: Viewport,
        event: &PointerEvent,
        sink: &mut dyn FnMut(&str, Box<dyn Any>),
    ) -> bool {
        match event.phase {
            PointerPhase::Click | PointerPhase::Down => {
                let Some(scene) = scene else { return false };
                let pointer = viewport.to_centered(event.x, event.y);
                let tolerance = self.config.tolerance(event.kind);
                let Some(hit) = find_hit(scene, camera, &self.config, pointer, tolerance) else {
                    return false;
                };

                let handlers = scene
                    .resolve(&hit.path)
                    .and_then(|d| d.region.as_ref())
                    .map(|r| &r.handlers);

                if event.phase == PointerPhase::Down {
                    if !self.held.contains(&hit.path) {
                        log::trace!("pointer press holds {:?}", hit.path.indices());
                        self.held.push(hit.path);
                    }
                    invoke(handlers.and_then(|h| h.on_press.as_ref()), event, sink)
                } else {
                    invoke(handlers.and_then(|h| h.on_hit.as_ref()), event, sink)
                }
            }

            PointerPhase::Move => {
                let Some(scene) = scene else { return false };
                self.replay(scene, event, sink, |h| h.on_move.as_ref())
            }

            PointerPhase::Up => {
                let handled = match scene {
                    Some(scene) => self.replay(scene, event, sink, |h| h.on_release.as_ref()),
                    None => false,
                };
                self.held.clear();
                handled
            }
        }
    }

    fn replay<O>(
        &self,
        scene: &SceneNode<O>,
        event: &PointerEvent,
        sink: &mut dyn FnMut(&str, Box<dyn Any>),
        select: impl Fn(&PointerHandlers) -> Option<&PointerHandler>,
    ) -> bool {
        let mut handled = false;
        for path in &self.held {
            let handler = scene
                .resolve(path)
                .and_then(|d| d.region.as_ref())
                .and_then(|r| select(&r.handlers));
            handled |= invoke(handler, event, sink);
        }
        handled
    }

    /// Drops all held paths without delivering anything.
    pub fn release_all(&mut self) {
        self.held.clear();
    }
}

fn invoke(
    handler: Option<&PointerHandler>,
    event: &PointerEvent,
    sink: &mut dyn FnMut(&str, Box<dyn Any>),
) -> bool {
    match handler {
        Some(f) => {
            f(event, &mut Dispatcher::new(sink));
            true
        }
        None => false,
    }
}
