/// Child-index path from the scene root to a drawable.
///
/// Captured on press and resolved against whatever tree is current when the
/// following move/release events arrive. Indices count null children too.
/// If the tree changed shape in between, the path can resolve to a different
/// drawable or to nothing; callers get best-effort delivery only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct HeldPath(Vec<usize>);

impl HeldPath {
    #[inline]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    #[inline]
    pub fn from_indices(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    #[inline]
    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    #[inline]
    pub(crate) fn push(&mut self, index: usize) {
        self.0.push(index);
    }

    #[inline]
    pub(crate) fn pop(&mut self) {
        self.0.pop();
    }
}
