//! # Async Readiness
//!
//! A build pass is synchronous, but the images and SVGs it references load
//! later. The host wants one notification once the whole scene is drawable.
//!
//! Before building, the number of asynchronous leaves that will actually be
//! rendered is counted with the same visibility rules the builder applies.
//! Every such leaf then carries a [`ReadySignal`]. Signals report into a
//! shared [`ReadinessTracker`], which fires `on_all_ready` once when the
//! count is reached, or `on_error` once on the first failure.
//!
//! Callbacks never run inside the build call itself: a scene with nothing to
//! load has its completion queued on the context's [`MicrotaskQueue`].

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use crate::data::DataContext;
use crate::error::ResourceError;
use crate::layout::{grid, is_rendered, SceneContext};
use crate::model::{CharacterArt, ElementConfig, ElementKind};

type Task = Box<dyn FnOnce()>;

/// Deferred callbacks, drained by the host after a build pass returns.
#[derive(Clone, Default)]
pub struct MicrotaskQueue {
    tasks: Rc<RefCell<VecDeque<Task>>>,
}

impl MicrotaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&self, task: impl FnOnce() + 'static) {
        self.tasks.borrow_mut().push_back(Box::new(task));
    }

    /// Run queued tasks, including ones queued while running, until the queue
    /// is empty. Returns how many ran.
    pub fn run_until_idle(&self) -> usize {
        let mut ran = 0;
        loop {
            let next = self.tasks.borrow_mut().pop_front();
            match next {
                Some(task) => {
                    task();
                    ran += 1;
                }
                None => return ran,
            }
        }
    }

    pub fn len(&self) -> usize {
        self.tasks.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.borrow().is_empty()
    }
}

impl fmt::Debug for MicrotaskQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MicrotaskQueue")
            .field("pending", &self.len())
            .finish()
    }
}

pub type AllReadyCallback = Box<dyn FnOnce()>;
pub type ErrorCallback = Box<dyn FnOnce(ResourceError)>;

struct TrackerState {
    expected: usize,
    ready: usize,
    created: usize,
    built: bool,
    errored: bool,
    on_all_ready: Option<AllReadyCallback>,
    on_error: Option<ErrorCallback>,
}

impl TrackerState {
    /// Take the completion callback if the pass just became complete.
    fn take_completion(&mut self) -> Option<AllReadyCallback> {
        if self.built && !self.errored && self.ready >= self.expected {
            self.on_all_ready.take()
        } else {
            None
        }
    }
}

/// Counts ready signals for one build pass.
#[derive(Clone)]
pub struct ReadinessTracker {
    state: Rc<RefCell<TrackerState>>,
}

impl ReadinessTracker {
    pub fn new(
        expected: usize,
        on_all_ready: Option<AllReadyCallback>,
        on_error: Option<ErrorCallback>,
    ) -> Self {
        Self {
            state: Rc::new(RefCell::new(TrackerState {
                expected,
                ready: 0,
                created: 0,
                built: false,
                errored: false,
                on_all_ready,
                on_error,
            })),
        }
    }

    /// Hand out the signal for one asynchronous leaf.
    pub fn signal(&self, source: &str) -> ReadySignal {
        self.state.borrow_mut().created += 1;
        ReadySignal {
            state: Rc::clone(&self.state),
            settled: Rc::new(Cell::new(false)),
            source: source.into(),
        }
    }

    /// Close the build pass. Reconciles the precount with the signals
    /// actually handed out and, if everything is already ready, queues the
    /// completion callback.
    pub fn finish_build(&self, microtasks: &MicrotaskQueue) {
        let completion = {
            let mut state = self.state.borrow_mut();
            if state.created != state.expected {
                log::warn!(
                    "expected {} async leaves but built {}",
                    state.expected,
                    state.created
                );
                state.expected = state.created;
            }
            state.built = true;
            state.take_completion()
        };
        if let Some(callback) = completion {
            microtasks.enqueue(callback);
        }
    }

    pub fn expected(&self) -> usize {
        self.state.borrow().expected
    }

    pub fn ready_count(&self) -> usize {
        self.state.borrow().ready
    }

    pub fn is_errored(&self) -> bool {
        self.state.borrow().errored
    }

    /// True once every expected leaf reported ready without an error.
    pub fn is_complete(&self) -> bool {
        let state = self.state.borrow();
        state.built && !state.errored && state.ready >= state.expected
    }
}

impl fmt::Debug for ReadinessTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("ReadinessTracker")
            .field("expected", &state.expected)
            .field("ready", &state.ready)
            .field("errored", &state.errored)
            .finish()
    }
}

/// Carried by an asynchronous leaf; reports its load outcome exactly once.
///
/// Clones share the settled flag, so a leaf copied into several render trees
/// still counts once.
#[derive(Clone)]
pub struct ReadySignal {
    state: Rc<RefCell<TrackerState>>,
    settled: Rc<Cell<bool>>,
    source: Rc<str>,
}

impl ReadySignal {
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_settled(&self) -> bool {
        self.settled.get()
    }

    pub fn ready(&self) {
        if self.settled.replace(true) {
            return;
        }
        let completion = {
            let mut state = self.state.borrow_mut();
            state.ready += 1;
            state.take_completion()
        };
        if let Some(callback) = completion {
            callback();
        }
    }

    pub fn error(&self, error: ResourceError) {
        if self.settled.replace(true) {
            return;
        }
        let callback = {
            let mut state = self.state.borrow_mut();
            if state.errored {
                return;
            }
            state.errored = true;
            state.on_error.take()
        };
        log::warn!("failed to load {}: {}", self.source, error);
        if let Some(callback) = callback {
            callback(error);
        }
    }
}

impl fmt::Debug for ReadySignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadySignal")
            .field("source", &self.source)
            .field("settled", &self.settled.get())
            .finish()
    }
}

/// Number of asynchronous leaves building `elements` will produce.
pub fn count_async_leaves(elements: &[ElementConfig], ctx: &SceneContext) -> usize {
    elements
        .iter()
        .filter(|el| is_rendered(el, &ctx.data))
        .map(|el| count_element(el, ctx))
        .sum()
}

fn count_element(el: &ElementConfig, ctx: &SceneContext) -> usize {
    let data = &ctx.data;
    let present = |src: Option<&str>| usize::from(non_empty(src).is_some());
    match &el.kind {
        ElementKind::Image(c) => present(Some(c.src.as_str())),
        ElementKind::CustomImage(c) => present(Some(c.src.as_str())),
        ElementKind::Svg(c) => present(Some(c.src.as_str())),
        ElementKind::CharacterImage(c) => present(character_source(data, c.index, c.art)),
        ElementKind::AltCharacterImage(_) => data.characters().len().saturating_sub(1),
        ElementKind::UserFlag => present(data.player.and_then(|p| p.country_flag.as_deref())),
        ElementKind::PlayerFlag => present(data.player.and_then(|p| p.custom_flag.as_deref())),
        ElementKind::TournamentIcon => present(data.tournament.and_then(|t| t.icon.as_deref())),
        ElementKind::BackgroundImage => present(data.background_image),
        ElementKind::Group(g) => count_async_leaves(&g.elements, ctx),
        ElementKind::FlexGroup(g) => count_async_leaves(&g.elements, ctx),
        ElementKind::FlexGrid(g) => {
            let visible: Vec<&ElementConfig> = g
                .elements
                .iter()
                .filter(|child| is_rendered(child, data))
                .collect();
            let capacity = grid::capacity(g, visible.len());
            visible
                .into_iter()
                .take(capacity)
                .map(|child| count_element(child, ctx))
                .sum()
        }
        ElementKind::Text(_) | ElementKind::SmartText(_) | ElementKind::Rect(_) => 0,
    }
}

pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

/// Image URL of the character at `index`. Icons fall back to the full art.
pub(crate) fn character_source<'a>(
    data: &DataContext<'a>,
    index: usize,
    art: CharacterArt,
) -> Option<&'a str> {
    let character = data.characters().get(index)?;
    let src = match art {
        CharacterArt::Image => character.image.as_str(),
        CharacterArt::Icon => character.icon.as_deref().unwrap_or(&character.image),
    };
    non_empty(Some(src))
}
