use crate::geometry::Size;
use derive_more::{AsRef, Deref, Display, From, Into};

/// An image a data source can hand to the pipeline for drawing inside a circle.
pub trait IconImage {
    /// Natural size in surface units; the icon is centered on its circle.
    fn size(&self) -> Size;
}

/// Pull interface the view queries for everything it draws.
///
/// Accessors are called on the UI thread during layout and render passes and
/// must answer consistently for a given reload generation. [`count`] is
/// cached by the view until the next reload; every other accessor is asked
/// again on every render pass.
///
/// [`count`]: StateSource::count
pub trait StateSource {
    type Icon: IconImage + Clone;

    fn count(&self) -> usize;

    fn is_active(&self, index: usize) -> bool;

    fn title(&self, index: usize) -> Option<String>;

    fn icon(&self, index: usize, active: bool) -> Option<Self::Icon>;
}

/// A missing source behaves like a source with zero states.
impl<S: StateSource> StateSource for Option<S> {
    type Icon = S::Icon;

    fn count(&self) -> usize {
        self.as_ref().map_or(0, |s| s.count())
    }

    fn is_active(&self, index: usize) -> bool {
        self.as_ref().is_some_and(|s| s.is_active(index))
    }

    fn title(&self, index: usize) -> Option<String> {
        self.as_ref().and_then(|s| s.title(index))
    }

    fn icon(&self, index: usize, active: bool) -> Option<Self::Icon> {
        self.as_ref().and_then(|s| s.icon(index, active))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Deref, From, Into, AsRef)]
pub struct Title(String);

crate::impl_string_newtype!(Title);

/// One state's render-relevant facts, read fresh for a single pass.
#[derive(Debug, Clone)]
pub struct StateDescriptor<I> {
    pub index: usize,
    pub active: bool,
    pub title: Option<Title>,
    pub icon: Option<I>,
}

impl<I> StateDescriptor<I> {
    pub fn query<S>(source: &S, index: usize) -> Self
    where
        S: StateSource<Icon = I>,
    {
        let active = source.is_active(index);
        Self {
            index,
            active,
            title: source
                .title(index)
                .filter(|t| !t.is_empty())
                .map(Title::new),
            icon: source.icon(index, active),
        }
    }
}

/// Cached state count, valid for one reload generation.
#[derive(Debug, Default)]
pub struct StateSequence {
    count: Option<usize>,
    generation: u64,
}

impl StateSequence {
    /// Returns the cached count, asking `source` only once per generation.
    pub fn count<S: StateSource>(&mut self, source: &S) -> usize {
        *self.count.get_or_insert_with(|| source.count())
    }

    pub fn cached(&self) -> Option<usize> {
        self.count
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Drops the cached count and starts a new generation.
    pub fn invalidate(&mut self) {
        self.count = None;
        self.generation += 1;
    }
}

/// First index whose state is active while the next one is not.
///
/// Assumes a contiguous active prefix; for scattered patterns the earliest
/// active-to-inactive pair wins.
pub fn find_boundary<S: StateSource>(source: &S, count: usize) -> Option<usize> {
    (0..count.saturating_sub(1)).find(|&i| source.is_active(i) && !source.is_active(i + 1))
}
