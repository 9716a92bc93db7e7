// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-container registration state.

use crate::ScreenIndex;
use crate::config::ElementOptions;
use crate::registry::{AncestorRegistry, ElementRegistry};

/// Owns the element and ancestor registries of one container.
///
/// Screens register into the context while they render; the orchestrator reads
/// it when the active index moves. Each container owns its own context, so
/// several containers can run side by side.
#[derive(Clone, Debug)]
pub struct TransitionContext<E, A> {
    elements: ElementRegistry<E>,
    ancestors: AncestorRegistry<A>,
}

impl<E, A> Default for TransitionContext<E, A> {
    fn default() -> Self {
        Self {
            elements: ElementRegistry::new(),
            ancestors: AncestorRegistry::new(),
        }
    }
}

impl<E, A> TransitionContext<E, A> {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// See [`ElementRegistry::register`].
    pub fn register_element(
        &mut self,
        handle: Option<E>,
        screen: ScreenIndex,
        id: &str,
        options: Option<&ElementOptions>,
    ) {
        self.elements.register(handle, screen, id, options);
    }

    /// See [`AncestorRegistry::register`].
    pub fn register_ancestor(&mut self, handle: Option<A>, screen: ScreenIndex) {
        self.ancestors.register(handle, screen);
    }

    /// Registration hooks bound to one screen.
    pub fn screen(&mut self, index: ScreenIndex) -> ScreenScope<'_, E, A> {
        ScreenScope {
            context: self,
            index,
        }
    }

    /// Registered elements.
    pub fn elements(&self) -> &ElementRegistry<E> {
        &self.elements
    }

    /// Registered ancestors.
    pub fn ancestors(&self) -> &AncestorRegistry<A> {
        &self.ancestors
    }
}

/// Lifecycle hooks for one screen of a container.
///
/// A host calls [`mount`](Self::mount) when the screen's root container is
/// created, [`element`](Self::element) for every shared element each time the
/// screen renders, and [`unmount`](Self::unmount) /
/// [`element_unmounted`](Self::element_unmounted) when nodes go away.
/// Unmount hooks never erase stored handles.
///
/// ```rust
/// use understory_shared_element::TransitionContext;
///
/// let mut context: TransitionContext<u32, u32> = TransitionContext::new();
/// {
///     let mut screen = context.screen(1);
///     screen.mount(100);
///     screen.element(Some(7), "image", None);
/// }
/// assert_eq!(context.ancestors().get(1), Some(&100));
/// assert_eq!(context.elements().handle("image", 1), Some(&7));
/// ```
#[derive(Debug)]
pub struct ScreenScope<'a, E, A> {
    context: &'a mut TransitionContext<E, A>,
    index: ScreenIndex,
}

impl<E, A> ScreenScope<'_, E, A> {
    /// Screen index these hooks register under.
    pub fn index(&self) -> ScreenIndex {
        self.index
    }

    /// The screen's root container was created.
    pub fn mount(&mut self, ancestor: A) {
        self.context.register_ancestor(Some(ancestor), self.index);
    }

    /// The screen re-rendered; its root may have been replaced.
    pub fn update(&mut self, ancestor: Option<A>) {
        self.context.register_ancestor(ancestor, self.index);
    }

    /// The screen's root container went away.
    pub fn unmount(&mut self) {
        self.context.register_ancestor(None, self.index);
    }

    /// A shared element rendered on this screen.
    pub fn element(&mut self, handle: Option<E>, id: &str, options: Option<&ElementOptions>) {
        self.context.register_element(handle, self.index, id, options);
    }

    /// A shared element on this screen went away.
    pub fn element_unmounted(&mut self, id: &str, options: Option<&ElementOptions>) {
        self.context.register_element(None, self.index, id, options);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmount_hooks_keep_handles() {
        let mut context: TransitionContext<u32, u32> = TransitionContext::new();
        let mut screen = context.screen(0);
        screen.mount(50);
        screen.element(Some(1), "image", None);
        screen.element_unmounted("image", None);
        screen.unmount();
        screen.update(None);
        assert_eq!(screen.index(), 0);

        assert_eq!(context.ancestors().get(0), Some(&50));
        assert_eq!(context.elements().handle("image", 0), Some(&1));
    }

    #[test]
    fn update_replaces_ancestor() {
        let mut context: TransitionContext<u32, u32> = TransitionContext::new();
        context.screen(2).mount(1);
        context.screen(2).update(Some(2));
        assert_eq!(context.ancestors().get(2), Some(&2));
    }

    #[test]
    fn contexts_are_independent() {
        let mut a: TransitionContext<u32, u32> = TransitionContext::new();
        let b: TransitionContext<u32, u32> = TransitionContext::new();
        a.register_element(Some(1), 0, "image", None);
        assert!(a.elements().contains("image"));
        assert!(b.elements().is_empty());
    }
}
