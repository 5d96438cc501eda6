/// A cursor into a `Node` slot or `Bucket` entry, returned by [`super::Afli::find`].
///
/// Borrows from the index and is invalidated by any subsequent mutation,
/// enforced here by the borrow checker rather than by a runtime check.
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a, V> {
    found: Option<&'a V>,
}

impl<'a, V> Cursor<'a, V> {
    pub(crate) fn found(value: &'a V) -> Self {
        Self { found: Some(value) }
    }

    pub(crate) fn end() -> Self {
        Self { found: None }
    }

    /// True iff the cursor does not point at a matching entry.
    #[inline]
    pub fn is_end(&self) -> bool {
        self.found.is_none()
    }

    /// The value at this cursor, or `None` at the end position.
    #[inline]
    pub fn value(&self) -> Option<&'a V> {
        self.found
    }
}
