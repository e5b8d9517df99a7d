use std::rc::Rc;

use crate::compile::RenderObject;

use super::{HeldPath, InteractionRegion};

/// A drawable leaf: a compiled object plus its optional interaction region.
///
/// The compiled object is shared so one compilation can be reused by the
/// fresh trees built on later frames.
#[derive(Debug)]
pub struct Drawable<O = RenderObject> {
    pub object: Rc<O>,
    pub region: Option<InteractionRegion>,
}

impl<O> Clone for Drawable<O> {
    fn clone(&self) -> Self {
        Self {
            object: Rc::clone(&self.object),
            region: self.region.clone(),
        }
    }
}

/// One node of a frame description.
#[derive(Debug)]
pub enum SceneNode<O = RenderObject> {
    /// Ordered children. `None` entries are skipped but still occupy an index.
    Group { children: Vec<Option<SceneNode<O>>> },
    Drawable(Drawable<O>),
}

impl<O> SceneNode<O> {
    #[inline]
    pub fn group(children: impl IntoIterator<Item = Option<SceneNode<O>>>) -> Self {
        SceneNode::Group {
            children: children.into_iter().collect(),
        }
    }

    #[inline]
    pub fn drawable(object: Rc<O>) -> Self {
        SceneNode::Drawable(Drawable { object, region: None })
    }

    /// Attaches an interaction region. No-op on groups.
    pub fn with_region(mut self, region: InteractionRegion) -> Self {
        if let SceneNode::Drawable(d) = &mut self {
            d.region = Some(region);
        }
        self
    }

    /// Visits every drawable depth-first in tree order.
    pub fn for_each_drawable<'a, F>(&'a self, mut f: F)
    where
        F: FnMut(&HeldPath, &'a Drawable<O>),
    {
        let mut path = HeldPath::root();
        self.walk(&mut path, &mut f);
    }

    fn walk<'a, F>(&'a self, path: &mut HeldPath, f: &mut F)
    where
        F: FnMut(&HeldPath, &'a Drawable<O>),
    {
        match self {
            SceneNode::Group { children } => {
                for (i, child) in children.iter().enumerate() {
                    let Some(child) = child else { continue };
                    path.push(i);
                    child.walk(path, f);
                    path.pop();
                }
            }
            SceneNode::Drawable(d) => f(path, d),
        }
    }

    /// Follows `path` from this node. Returns `None` when the path runs into a
    /// null child, a missing index, a group, or continues past a drawable.
    pub fn resolve(&self, path: &HeldPath) -> Option<&Drawable<O>> {
        let mut node = self;
        for &i in path.indices() {
            match node {
                SceneNode::Group { children } => {
                    node = children.get(i)?.as_ref()?;
                }
                SceneNode::Drawable(_) => return None,
            }
        }
        match node {
            SceneNode::Drawable(d) => Some(d),
            SceneNode::Group { .. } => None,
        }
    }

    /// Number of drawables reachable from this node.
    pub fn drawable_count(&self) -> usize {
        let mut n = 0;
        self.for_each_drawable(|_, _| n += 1);
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(id: u32) -> SceneNode<u32> {
        SceneNode::drawable(Rc::new(id))
    }

    fn sample() -> SceneNode<u32> {
        SceneNode::group([
            Some(leaf(1)),
            None,
            Some(SceneNode::group([Some(leaf(2)), Some(leaf(3))])),
        ])
    }

    #[test]
    fn visits_in_tree_order_with_paths() {
        let tree = sample();
        let mut seen = Vec::new();
        tree.for_each_drawable(|path, d| seen.push((path.indices().to_vec(), *d.object)));
        assert_eq!(seen, vec![(vec![0], 1), (vec![2, 0], 2), (vec![2, 1], 3)]);
    }

    #[test]
    fn resolve_follows_indices() {
        let tree = sample();
        let d = tree.resolve(&HeldPath::from_indices(vec![2, 1])).unwrap();
        assert_eq!(*d.object, 3);
    }

    #[test]
    fn resolve_misses_after_shape_change() {
        let tree = sample();
        assert!(tree.resolve(&HeldPath::from_indices(vec![1])).is_none());
        assert!(tree.resolve(&HeldPath::from_indices(vec![5])).is_none());
        assert!(tree.resolve(&HeldPath::from_indices(vec![0, 0])).is_none());
        assert!(tree.resolve(&HeldPath::from_indices(vec![2])).is_none());
    }

    #[test]
    fn root_drawable_resolves_with_empty_path() {
        let tree = leaf(7);
        assert_eq!(*tree.resolve(&HeldPath::root()).unwrap().object, 7);
    }

    #[test]
    fn empty_group_has_no_drawables() {
        let tree: SceneNode<u32> = SceneNode::group([None, None]);
        assert_eq!(tree.drawable_count(), 0);
    }
}
