/*
 * traversals.rs
 *
 * Copyright (c) 2025 Posit, PBC
 *
 * Minimal-move depth-first traversal over any `Cursor`.
 *
 * The walk is a lazy event stream: every node produces one ENTER event
 * (as a first child or as a later sibling) and one EXIT event after all of
 * its descendants. Each structural edge is crossed exactly once in each
 * direction, and the only state kept besides the cursor is a handful of
 * scalars.
 */

use std::convert::Infallible;
use std::iter::FusedIterator;
use std::marker::PhantomData;

use serde::Serialize;

use crate::cursor::Cursor;
use crate::predicates::always;

/// Phase of tree traversal - whether we're entering or exiting a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Serialize)]
pub enum TraversePhase {
    Enter,
    Exit,
}

/// How a traversal reached or left a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EventKind {
    /// Entered as the first (emitted) child of its parent, or as the root.
    EnterFirst,
    /// Entered from its previous (emitted) sibling.
    EnterSibling,
    /// The node and all its descendants have been visited.
    Exit,
}

impl EventKind {
    pub fn phase(self) -> TraversePhase {
        match self {
            EventKind::EnterFirst | EventKind::EnterSibling => TraversePhase::Enter,
            EventKind::Exit => TraversePhase::Exit,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Event<N> {
    pub node: N,
    pub kind: EventKind,
}

impl<N> Event<N> {
    pub fn is_enter(&self) -> bool {
        self.kind.phase() == TraversePhase::Enter
    }

    pub fn is_exit(&self) -> bool {
        self.kind == EventKind::Exit
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    /// The current node was entered and a first-child attempt is still owed.
    Descend,
    /// The current node is finished. Pruned nodes leave silently.
    Leave { emit: bool },
    /// Move off the finished node: to its next sibling, or up to its parent.
    Move,
    Done,
}

/// The traversal state machine. Owns its cursor position exclusively.
#[derive(Debug, Clone)]
pub(crate) struct Walker<C> {
    cursor: C,
    state: State,
    /// Depth below the start node; the walk never advances or ascends at 0.
    depth: usize,
    /// Whether a sibling at the current level has already been emitted.
    sibling_emitted: bool,
}

impl<C: Cursor> Walker<C> {
    pub(crate) fn new(cursor: C) -> Self {
        Walker {
            cursor,
            state: State::Start,
            depth: 0,
            sibling_emitted: false,
        }
    }

    pub(crate) fn into_cursor(self) -> C {
        self.cursor
    }

    pub(crate) fn cursor(&self) -> &C {
        &self.cursor
    }

    /// Produce the next event, consulting `keep` on every node reached.
    ///
    /// An error from `keep` ends the walk: it is returned once and every
    /// later call yields `Ok(None)`.
    pub(crate) fn try_next_with<E, F>(&mut self, keep: &mut F) -> Result<Option<Event<C::Node>>, E>
    where
        F: FnMut(&C::Node) -> Result<bool, E>,
    {
        let result = self.step(keep);
        if result.is_err() {
            self.state = State::Done;
        }
        result
    }

    fn step<E, F>(&mut self, keep: &mut F) -> Result<Option<Event<C::Node>>, E>
    where
        F: FnMut(&C::Node) -> Result<bool, E>,
    {
        loop {
            match self.state {
                State::Start => {
                    let event = self.arrive(keep)?;
                    if event.is_none() {
                        self.state = State::Done;
                    }
                    return Ok(event);
                }
                State::Descend => {
                    if self.cursor.descend() {
                        self.depth += 1;
                        self.sibling_emitted = false;
                        if let Some(event) = self.arrive(keep)? {
                            return Ok(Some(event));
                        }
                    } else {
                        self.state = State::Leave { emit: true };
                    }
                }
                State::Leave { emit } => {
                    self.state = State::Move;
                    if emit {
                        return Ok(Some(Event {
                            node: self.cursor.current(),
                            kind: EventKind::Exit,
                        }));
                    }
                }
                State::Move => {
                    if self.depth == 0 {
                        tracing::trace!("traversal returned to its start node");
                        self.state = State::Done;
                        return Ok(None);
                    }
                    if self.cursor.advance() {
                        if let Some(event) = self.arrive(keep)? {
                            return Ok(Some(event));
                        }
                    } else if self.cursor.ascend() {
                        self.depth -= 1;
                        // only kept nodes are ever descended into
                        self.sibling_emitted = true;
                        self.state = State::Leave { emit: true };
                    } else {
                        self.state = State::Done;
                        return Ok(None);
                    }
                }
                State::Done => return Ok(None),
            }
        }
    }

    /// Entry into the node the cursor was just moved onto.
    fn arrive<E, F>(&mut self, keep: &mut F) -> Result<Option<Event<C::Node>>, E>
    where
        F: FnMut(&C::Node) -> Result<bool, E>,
    {
        let node = self.cursor.current();
        if !keep(&node)? {
            self.state = State::Leave { emit: false };
            return Ok(None);
        }
        let kind = if self.sibling_emitted {
            EventKind::EnterSibling
        } else {
            EventKind::EnterFirst
        };
        self.sibling_emitted = true;
        self.state = State::Descend;
        Ok(Some(Event { node, kind }))
    }
}

/// Lazy event stream over the subtree rooted at a cursor's position.
///
/// Created by [`walk_tree`] and [`walk_tree_filtered`]. Dropping it early is
/// always safe; a borrowed cursor is then left wherever the walk stopped.
pub struct WalkTree<C, F> {
    walker: Walker<C>,
    keep: F,
}

impl<C: Cursor, F> WalkTree<C, F> {
    /// Give back the cursor. After a fully consumed walk it is positioned
    /// at the node the walk started from.
    pub fn into_cursor(self) -> C {
        self.walker.into_cursor()
    }

    /// The cursor, positioned at the node of the event last yielded.
    pub(crate) fn cursor(&self) -> &C {
        self.walker.cursor()
    }

    /// Annotate each event with the depth of its node.
    pub fn with_depth(self) -> WithDepth<Self>
    where
        F: FnMut(&C::Node) -> bool,
    {
        with_depth(self)
    }
}

impl<C, F> Iterator for WalkTree<C, F>
where
    C: Cursor,
    F: FnMut(&C::Node) -> bool,
{
    type Item = Event<C::Node>;

    fn next(&mut self) -> Option<Self::Item> {
        let keep = &mut self.keep;
        match self
            .walker
            .try_next_with(&mut |node: &C::Node| Ok::<bool, Infallible>(keep(node)))
        {
            Ok(event) => event,
            Err(never) => match never {},
        }
    }
}

impl<C, F> FusedIterator for WalkTree<C, F>
where
    C: Cursor,
    F: FnMut(&C::Node) -> bool,
{
}

/// Walk the subtree rooted at the cursor's current position.
///
/// # Example
/// ```
/// use ts_utils::{walk_tree, EventKind, OwnedTree};
///
/// let tree = OwnedTree::from_sexp("(1 2)").unwrap();
/// let events: Vec<_> = walk_tree(tree.walk())
///     .map(|e| (e.node.label(), e.kind))
///     .collect();
/// assert_eq!(
///     events,
///     vec![
///         ("1", EventKind::EnterFirst),
///         ("2", EventKind::EnterFirst),
///         ("2", EventKind::Exit),
///         ("1", EventKind::Exit),
///     ]
/// );
/// ```
pub fn walk_tree<C: Cursor>(cursor: C) -> WalkTree<C, fn(&C::Node) -> bool> {
    walk_tree_filtered(cursor, always as fn(&C::Node) -> bool)
}

/// Walk the subtree rooted at the cursor's current position, pruning every
/// node for which `keep` returns false.
///
/// A pruned node produces no events and is never descended into, so none of
/// its descendants are reached either. A kept node is reported as
/// [`EventKind::EnterFirst`] when no earlier sibling of it was kept.
///
/// `keep` is assumed pure: walks from the same position with the same
/// predicate produce the same sequence.
pub fn walk_tree_filtered<C, F>(cursor: C, keep: F) -> WalkTree<C, F>
where
    C: Cursor,
    F: FnMut(&C::Node) -> bool,
{
    WalkTree {
        walker: Walker::new(cursor),
        keep,
    }
}

/// Event stream with a fallible pruning predicate. Created by [`try_walk_tree`].
pub struct TryWalkTree<C, F, E> {
    walker: Walker<C>,
    keep: F,
    _error: PhantomData<fn() -> E>,
}

impl<C, F, E> Iterator for TryWalkTree<C, F, E>
where
    C: Cursor,
    F: FnMut(&C::Node) -> Result<bool, E>,
{
    type Item = Result<Event<C::Node>, E>;

    fn next(&mut self) -> Option<Self::Item> {
        self.walker.try_next_with(&mut self.keep).transpose()
    }
}

impl<C, F, E> FusedIterator for TryWalkTree<C, F, E>
where
    C: Cursor,
    F: FnMut(&C::Node) -> Result<bool, E>,
{
}

/// Like [`walk_tree_filtered`], but the predicate may fail. The first error
/// is yielded in place of the next event and ends the stream.
pub fn try_walk_tree<C, F, E>(cursor: C, keep: F) -> TryWalkTree<C, F, E>
where
    C: Cursor,
    F: FnMut(&C::Node) -> Result<bool, E>,
{
    TryWalkTree {
        walker: Walker::new(cursor),
        keep,
        _error: PhantomData,
    }
}

/// Event stream annotated with node depth. The traversal root has depth 0.
#[derive(Debug, Clone)]
pub struct WithDepth<I> {
    events: I,
    depth: usize,
}

impl<I, N> Iterator for WithDepth<I>
where
    I: Iterator<Item = Event<N>>,
{
    type Item = (usize, Event<N>);

    fn next(&mut self) -> Option<Self::Item> {
        let event = self.events.next()?;
        match event.kind.phase() {
            TraversePhase::Enter => {
                let depth = self.depth;
                self.depth += 1;
                Some((depth, event))
            }
            TraversePhase::Exit => {
                self.depth = self.depth.saturating_sub(1);
                Some((self.depth, event))
            }
        }
    }
}

pub fn with_depth<I, N>(events: I) -> WithDepth<I::IntoIter>
where
    I: IntoIterator<Item = Event<N>>,
{
    WithDepth {
        events: events.into_iter(),
        depth: 0,
    }
}

/// Bottom-up fold of the subtree rooted at the cursor's position.
///
/// Processes children before parents: `visitor` receives each kept node
/// together with the results of its kept children, in sibling order.
///
/// # Returns
/// The root's result, or `None` if the root itself is pruned.
///
/// # Example
/// ```
/// use ts_utils::{fold_bottom_up, predicates::always, OwnedTree};
///
/// let tree = OwnedTree::from_sexp("(1 (2 3) (4 (5 6)))").unwrap();
/// let height = fold_bottom_up(tree.walk(), always, &mut |_, children: Vec<usize>| {
///     children.into_iter().max().map_or(0, |h| h + 1)
/// });
/// assert_eq!(height, Some(3));
/// ```
pub fn fold_bottom_up<C, F, V, T>(cursor: C, keep: F, visitor: &mut V) -> Option<T>
where
    C: Cursor,
    F: FnMut(&C::Node) -> bool,
    V: FnMut(&C::Node, Vec<T>) -> T,
{
    let mut stack: Vec<Vec<T>> = Vec::new();
    for event in walk_tree_filtered(cursor, keep) {
        match event.kind.phase() {
            TraversePhase::Enter => stack.push(Vec::new()),
            TraversePhase::Exit => {
                let children = stack.pop()?;
                let result = visitor(&event.node, children);
                match stack.last_mut() {
                    None => return Some(result),
                    Some(siblings) => siblings.push(result),
                }
            }
        }
    }
    None
}
