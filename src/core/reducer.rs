//! Reducers: pure transition functions `(state, action) -> state`.
//!
//! A reducer must be total. For every input pair it returns a value, and
//! an action it does not recognize returns the input unchanged. Reducers
//! never mutate their input and never dispatch.

use crate::builder::BuildError;
use crate::core::Snapshot;
use crate::error::ReduceError;

/// Pure mapping from a state value and an action to the next state value.
///
/// Any `Fn(&S, &A) -> S` closure or function is a reducer. Reducers that
/// can fail are wrapped with [`fallible`].
///
/// # Example
///
/// ```rust
/// use unistore::core::Reducer;
///
/// fn add(total: &i64, amount: &i64) -> i64 {
///     total + amount
/// }
///
/// assert_eq!(add.reduce(&1, &2).unwrap(), 3);
/// ```
pub trait Reducer<S, A>: Send + Sync {
    fn reduce(&self, state: &S, action: &A) -> Result<S, ReduceError>;
}

impl<S, A, F> Reducer<S, A> for F
where
    F: Fn(&S, &A) -> S + Send + Sync,
{
    fn reduce(&self, state: &S, action: &A) -> Result<S, ReduceError> {
        Ok(self(state, action))
    }
}

/// Adapter for reducers returning `Result`.
pub struct Fallible<F>(F);

/// Wrap a reducer that may fail.
///
/// When it fails the store propagates the error to the caller of
/// `dispatch` and keeps its snapshot.
pub fn fallible<S, A, F>(f: F) -> Fallible<F>
where
    F: Fn(&S, &A) -> Result<S, ReduceError> + Send + Sync,
{
    Fallible(f)
}

impl<S, A, F> Reducer<S, A> for Fallible<F>
where
    F: Fn(&S, &A) -> Result<S, ReduceError> + Send + Sync,
{
    fn reduce(&self, state: &S, action: &A) -> Result<S, ReduceError> {
        (self.0)(state, action)
    }
}

/// One named region of a composite state, with its reducer.
///
/// - `get` reads the region out of the composite state
/// - `set` returns a new composite with the region replaced
/// - `route` selects the sub-action this region handles, if any
pub struct Slice<S, A, R, B, Red> {
    key: String,
    get: fn(&S) -> &R,
    set: fn(&S, R) -> S,
    route: fn(&A) -> Option<&B>,
    reducer: Red,
}

impl<S, A, R, B, Red> Slice<S, A, R, B, Red>
where
    Red: Reducer<R, B>,
{
    pub fn new(
        key: impl Into<String>,
        get: fn(&S) -> &R,
        set: fn(&S, R) -> S,
        route: fn(&A) -> Option<&B>,
        reducer: Red,
    ) -> Self {
        Self {
            key: key.into(),
            get,
            set,
            route,
            reducer,
        }
    }
}

trait SliceReducer<S, A>: Send + Sync {
    fn key(&self) -> &str;

    /// `Ok(None)` when the region was not targeted or did not change.
    fn reduce_slice(&self, state: &S, action: &A) -> Result<Option<S>, ReduceError>;
}

impl<S, A, R, B, Red> SliceReducer<S, A> for Slice<S, A, R, B, Red>
where
    R: PartialEq,
    Red: Reducer<R, B>,
{
    fn key(&self) -> &str {
        &self.key
    }

    fn reduce_slice(&self, state: &S, action: &A) -> Result<Option<S>, ReduceError> {
        let Some(sub_action) = (self.route)(action) else {
            return Ok(None);
        };

        let region = (self.get)(state);
        let next = self.reducer.reduce(region, sub_action)?;
        if next == *region {
            return Ok(None);
        }

        Ok(Some((self.set)(state, next)))
    }
}

/// Top-level reducer threading each keyed region independently.
///
/// Regions whose router ignores an action are left untouched, and when no
/// region changes the input state is returned as is.
pub struct CombinedReducer<S, A> {
    slices: Vec<Box<dyn SliceReducer<S, A>>>,
}

impl<S: Snapshot, A: 'static> CombinedReducer<S, A> {
    pub fn new() -> Self {
        Self { slices: Vec::new() }
    }

    /// Add a region. Keys must be unique.
    pub fn slice<R, B, Red>(mut self, slice: Slice<S, A, R, B, Red>) -> Result<Self, BuildError>
    where
        R: PartialEq + 'static,
        B: 'static,
        Red: Reducer<R, B> + 'static,
    {
        if self.slices.iter().any(|s| s.key() == slice.key) {
            return Err(BuildError::DuplicateSlice { key: slice.key });
        }
        self.slices.push(Box::new(slice));
        Ok(self)
    }

    /// Region keys in composition order.
    pub fn keys(&self) -> Vec<&str> {
        self.slices.iter().map(|s| s.key()).collect()
    }
}

impl<S: Snapshot, A: 'static> Default for CombinedReducer<S, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Snapshot, A: 'static> Reducer<S, A> for CombinedReducer<S, A> {
    fn reduce(&self, state: &S, action: &A) -> Result<S, ReduceError> {
        let mut next: Option<S> = None;
        for slice in &self.slices {
            let base = next.as_ref().unwrap_or(state);
            if let Some(updated) = slice.reduce_slice(base, action)? {
                next = Some(updated);
            }
        }
        Ok(next.unwrap_or_else(|| state.clone()))
    }
}
