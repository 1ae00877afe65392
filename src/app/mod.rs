//! State logic of the sample application: a counter list and a post list
//! fetched from an external source.
//!
//! # Example
//!
//! ```rust
//! use unistore::app::{app_store, AppAction};
//! use unistore::regions::{Counter, CounterAction};
//!
//! let store = app_store().unwrap();
//! store.dispatch(AppAction::from(CounterAction::Increment { id: 1 })).unwrap();
//!
//! assert_eq!(store.get_state().counters.get(1), Some(&Counter::new(1, 1)));
//! ```

mod source;

pub use source::{PostSource, SourceError, StaticSource};

use crate::builder::{BuildError, StoreBuilder};
use crate::core::{fallible, Action, ActionRecord, CombinedReducer, Slice};
use crate::effects::AsyncOperation;
use crate::error::{ActionError, StoreError};
use crate::regions::{
    counter_reducer, AsyncAction, Counter, CounterAction, Counters, ResourceReducer,
    ResourceRegion, Violations,
};
use crate::store::Store;
use serde::{Deserialize, Serialize};
use stillwater::validation::Validation;

/// Operation name for loading posts.
pub const FETCH_POSTS: &str = "fetchPosts";

/// A fetched post. Only `id` and `title` are required.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: u64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl Post {
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            body: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    pub counters: Counters,
    pub posts: ResourceRegion<Post>,
}

impl AppState {
    /// Two counters, ids 1 and 2, at zero; posts never loaded.
    pub fn initial() -> Self {
        Self {
            counters: Counters::new(vec![Counter::new(1, 0), Counter::new(2, 0)]),
            posts: ResourceRegion::idle(),
        }
    }

    /// Check every region, reporting all violations together.
    pub fn validate(&self) -> Violations {
        Validation::all_vec(vec![self.counters.validate(), self.posts.validate("posts")])
            .map(|_| ())
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::initial()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum AppAction {
    Counter(CounterAction),
    Posts(AsyncAction<Vec<Post>>),
    /// Kind no region handles; every reducer treats it as identity.
    Unrecognized(ActionRecord),
}

impl Action for AppAction {
    fn kind(&self) -> String {
        match self {
            Self::Counter(action) => action.kind(),
            Self::Posts(action) => action.kind(),
            Self::Unrecognized(record) => record.kind(),
        }
    }
}

impl From<CounterAction> for AppAction {
    fn from(action: CounterAction) -> Self {
        Self::Counter(action)
    }
}

impl From<AsyncAction<Vec<Post>>> for AppAction {
    fn from(action: AsyncAction<Vec<Post>>) -> Self {
        Self::Posts(action)
    }
}

impl TryFrom<ActionRecord> for AppAction {
    type Error = ActionError;

    fn try_from(record: ActionRecord) -> Result<Self, Self::Error> {
        if let Some(action) = CounterAction::from_record(&record)? {
            return Ok(Self::Counter(action));
        }
        if let Some(action) = AsyncAction::from_record(&record, FETCH_POSTS)? {
            return Ok(Self::Posts(action));
        }
        Ok(Self::Unrecognized(record))
    }
}

fn route_counters(action: &AppAction) -> Option<&CounterAction> {
    match action {
        AppAction::Counter(action) => Some(action),
        _ => None,
    }
}

fn route_posts(action: &AppAction) -> Option<&AsyncAction<Vec<Post>>> {
    match action {
        AppAction::Posts(action) => Some(action),
        _ => None,
    }
}

/// Top-level reducer with a `counters` and a `posts` region.
pub fn app_reducer() -> Result<CombinedReducer<AppState, AppAction>, BuildError> {
    CombinedReducer::new()
        .slice(Slice::new(
            "counters",
            |s: &AppState| &s.counters,
            |s: &AppState, counters| AppState {
                counters,
                ..s.clone()
            },
            route_counters,
            fallible(counter_reducer),
        ))?
        .slice(Slice::new(
            "posts",
            |s: &AppState| &s.posts,
            |s: &AppState, posts| AppState {
                posts,
                ..s.clone()
            },
            route_posts,
            ResourceReducer::new(FETCH_POSTS),
        ))
}

/// Store holding [`AppState::initial`].
pub fn app_store() -> Result<Store<AppState, AppAction>, BuildError> {
    app_store_with(AppState::initial())
}

pub fn app_store_with(initial: AppState) -> Result<Store<AppState, AppAction>, BuildError> {
    StoreBuilder::new()
        .initial(initial)
        .reducer(app_reducer()?)
        .require(AppState::validate)
        .build()
}

/// Load posts from `source` into the `posts` region.
pub async fn fetch_posts<P: PostSource>(
    store: &Store<AppState, AppAction>,
    source: &P,
) -> Result<(), StoreError> {
    AsyncOperation::new(FETCH_POSTS)
        .run(store, source.fetch())
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regions::{Status, ViolationError};
    use serde_json::json;

    #[test]
    fn initial_state_has_two_zeroed_counters() {
        let state = AppState::initial();
        assert_eq!(
            state.counters.as_slice(),
            &[Counter::new(1, 0), Counter::new(2, 0)]
        );
        assert_eq!(state.posts.status(), Status::Idle);
    }

    #[test]
    fn counter_actions_leave_posts_untouched() {
        let store = app_store().unwrap();
        let posts_before = store.get_state().posts.clone();

        store
            .dispatch(CounterAction::Decrement { id: 2 }.into())
            .unwrap();

        let state = store.get_state();
        assert_eq!(state.counters.get(2), Some(&Counter::new(2, -1)));
        assert_eq!(state.posts, posts_before);
    }

    #[test]
    fn post_actions_for_other_operations_are_ignored() {
        let store = app_store().unwrap();
        let other = AsyncOperation::new("fetchUsers");

        store.dispatch(other.pending::<Vec<Post>>().into()).unwrap();
        assert_eq!(*store.get_state(), AppState::initial());
    }

    #[test]
    fn records_are_normalized() {
        let action =
            AppAction::try_from(ActionRecord::with_payload("counter/increment", json!({ "id": 1 })))
                .unwrap();
        assert_eq!(action, AppAction::Counter(CounterAction::Increment { id: 1 }));

        let action = AppAction::try_from(ActionRecord::with_payload(
            "fetchPosts/fulfilled",
            json!([{ "id": 1, "title": "a" }]),
        ))
        .unwrap();
        assert_eq!(
            action,
            AppAction::Posts(AsyncAction::Fulfilled {
                op: FETCH_POSTS.to_string(),
                payload: vec![Post::new(1, "a")],
            })
        );

        let action = AppAction::try_from(ActionRecord::new("ui/mounted")).unwrap();
        assert_eq!(action.kind(), "ui/mounted");
    }

    #[test]
    fn unrecognized_record_is_identity() {
        let store = app_store().unwrap();
        store
            .dispatch_record(ActionRecord::with_payload("ui/scrolled", json!(42)))
            .unwrap();

        assert_eq!(*store.get_state(), AppState::initial());
        assert_eq!(store.history().changes(), 0);
    }

    #[test]
    fn lifecycle_records_of_other_operations_are_identity() {
        let store = app_store().unwrap();
        let records = vec![
            ActionRecord::new("fetchUsers/rejected"),
            ActionRecord::new("fetchUsers/pending"),
            ActionRecord::with_payload("modal/fulfilled", json!({ "open": true })),
            ActionRecord::with_payload("fetchPostsArchive/rejected", json!(7)),
        ];

        for record in records {
            let kind = record.kind.clone();
            assert!(store.dispatch_record(record).is_ok(), "{kind} should dispatch");
        }

        assert_eq!(*store.get_state(), AppState::initial());
        assert_eq!(store.history().len(), 4);
        assert_eq!(store.history().changes(), 0);
    }

    #[test]
    fn malformed_fetch_posts_record_is_rejected() {
        let store = app_store().unwrap();

        let missing = store.dispatch_record(ActionRecord::new("fetchPosts/rejected"));
        assert!(matches!(
            missing,
            Err(StoreError::Action(ActionError::MissingPayload { .. }))
        ));

        let malformed = store.dispatch_record(ActionRecord::with_payload(
            "fetchPosts/fulfilled",
            json!({ "open": true }),
        ));
        assert!(matches!(
            malformed,
            Err(StoreError::Action(ActionError::MalformedPayload { .. }))
        ));
        assert!(store.history().is_empty());
    }

    #[test]
    fn counter_overflow_keeps_snapshot() {
        let initial = AppState {
            counters: Counters::new(vec![Counter::new(1, i64::MAX)]),
            ..AppState::initial()
        };
        let store = app_store_with(initial.clone()).unwrap();

        let result = store.dispatch(CounterAction::Increment { id: 1 }.into());

        assert!(matches!(result, Err(StoreError::Reducer(_))));
        assert_eq!(*store.get_state(), initial);
    }

    #[test]
    fn malformed_record_is_rejected_before_dispatch() {
        let store = app_store().unwrap();
        let result = store.dispatch_record(ActionRecord::new("counter/increment"));

        assert!(matches!(result, Err(StoreError::Action(_))));
        assert!(store.history().is_empty());
    }

    #[test]
    fn duplicate_counter_ids_fail_to_build() {
        let initial = AppState {
            counters: Counters::new(vec![Counter::new(3, 0), Counter::new(3, 1)]),
            ..AppState::initial()
        };

        match app_store_with(initial) {
            Err(BuildError::InvalidInitialState(violations)) => {
                assert_eq!(violations, vec![ViolationError::DuplicateCounterId { id: 3 }]);
            }
            _ => panic!("Expected InvalidInitialState"),
        }
    }

    #[test]
    fn inconsistent_posts_region_fails_to_build() {
        let posts: ResourceRegion<Post> =
            serde_json::from_value(json!({ "items": [], "status": "failed", "error_message": null }))
                .unwrap();
        let initial = AppState {
            posts,
            ..AppState::initial()
        };

        match app_store_with(initial) {
            Err(BuildError::InvalidInitialState(violations)) => {
                assert_eq!(violations.len(), 1);
                assert!(matches!(
                    &violations[0],
                    ViolationError::InconsistentRegion { region, .. } if region == "posts"
                ));
            }
            _ => panic!("Expected InvalidInitialState"),
        }
    }

    #[test]
    fn all_region_violations_are_reported_together() {
        let state: AppState = serde_json::from_value(json!({
            "counters": [{ "id": 1, "value": 0 }, { "id": 1, "value": 2 }],
            "posts": { "items": [], "status": "idle", "error_message": "left over" }
        }))
        .unwrap();

        let violations = crate::regions::into_violations(state.validate());
        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0], ViolationError::DuplicateCounterId { id: 1 });
    }

    #[tokio::test]
    async fn fetch_posts_loads_region() {
        let store = app_store().unwrap();
        let source = StaticSource::json(r#"[{"id":1,"title":"a"}]"#);

        fetch_posts(&store, &source).await.unwrap();

        let state = store.get_state();
        assert_eq!(state.posts.status(), Status::Succeeded);
        assert_eq!(state.posts.items(), &[Post::new(1, "a")]);
    }

    #[tokio::test]
    async fn fetch_posts_records_failure() {
        let store = app_store().unwrap();

        fetch_posts(&store, &StaticSource::unavailable("network down"))
            .await
            .unwrap();

        let state = store.get_state();
        assert_eq!(state.posts.status(), Status::Failed);
        assert_eq!(state.posts.error_message(), Some("network down"));
    }
}
