// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Element and ancestor registries.
//!
//! Both registries are upsert-only. Entries are overwritten on every
//! registration and never removed; a slot belonging to a screen that is no
//! longer mounted is simply never queried again. A `None` handle is treated as
//! an unmount signal and never clears a stored handle, so the last geometry
//! anchor stays available to a transition that is already running.

use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::ScreenIndex;
use crate::config::{ElementConfig, ElementOptions};

/// Registration state for one logical id on one screen.
#[derive(Clone, Debug)]
struct ElementSlot<E> {
    screen: ScreenIndex,
    handle: Option<E>,
    config: ElementConfig,
}

/// Every registration made under one logical id.
#[derive(Clone, Debug)]
pub struct ElementEntry<E> {
    id: String,
    // Most ids appear on exactly two screens.
    slots: SmallVec<[ElementSlot<E>; 2]>,
}

impl<E> ElementEntry<E> {
    /// The logical id shared by these registrations.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Latest non-null handle registered for `screen`.
    pub fn handle(&self, screen: ScreenIndex) -> Option<&E> {
        self.slot(screen).and_then(|s| s.handle.as_ref())
    }

    /// Config resolved by the latest registration for `screen`.
    pub fn config(&self, screen: ScreenIndex) -> Option<&ElementConfig> {
        self.slot(screen).map(|s| &s.config)
    }

    /// Screens that currently hold a handle for this id, in registration order.
    pub fn screens(&self) -> impl Iterator<Item = ScreenIndex> + '_ {
        self.slots
            .iter()
            .filter(|s| s.handle.is_some())
            .map(|s| s.screen)
    }

    fn slot(&self, screen: ScreenIndex) -> Option<&ElementSlot<E>> {
        self.slots.iter().find(|s| s.screen == screen)
    }
}

/// Mapping `id → (screen → handle, config)`.
///
/// Ids are iterated in the order they were first registered, which keeps
/// descriptor order stable from one diff to the next.
///
/// ```rust
/// use understory_shared_element::ElementRegistry;
///
/// let mut registry = ElementRegistry::new();
/// registry.register(Some(7_u32), 0, "image", None);
/// registry.register(None, 0, "image", None);
/// assert_eq!(registry.handle("image", 0), Some(&7));
/// ```
#[derive(Clone, Debug)]
pub struct ElementRegistry<E> {
    lookup: HashMap<String, usize>,
    entries: Vec<ElementEntry<E>>,
}

impl<E> Default for ElementRegistry<E> {
    fn default() -> Self {
        Self {
            lookup: HashMap::new(),
            entries: Vec::new(),
        }
    }
}

impl<E> ElementRegistry<E> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the element rendered for `id` on `screen`.
    ///
    /// The config is re-resolved from `options` on every call. A `None`
    /// handle keeps the previously stored one.
    pub fn register(
        &mut self,
        handle: Option<E>,
        screen: ScreenIndex,
        id: &str,
        options: Option<&ElementOptions>,
    ) {
        let config = ElementConfig::merged(options);
        let idx = match self.lookup.get(id) {
            Some(&idx) => idx,
            None => {
                self.entries.push(ElementEntry {
                    id: id.into(),
                    slots: SmallVec::new(),
                });
                let idx = self.entries.len() - 1;
                self.lookup.insert(id.into(), idx);
                idx
            }
        };
        let entry = &mut self.entries[idx];
        match entry.slots.iter_mut().find(|s| s.screen == screen) {
            Some(slot) => {
                if handle.is_some() {
                    slot.handle = handle;
                }
                slot.config = config;
            }
            None => entry.slots.push(ElementSlot {
                screen,
                handle,
                config,
            }),
        }
    }

    /// All registrations for `id`.
    pub fn entry(&self, id: &str) -> Option<&ElementEntry<E>> {
        self.lookup.get(id).map(|&idx| &self.entries[idx])
    }

    /// Latest non-null handle for `id` on `screen`.
    pub fn handle(&self, id: &str, screen: ScreenIndex) -> Option<&E> {
        self.entry(id)?.handle(screen)
    }

    /// Resolved config for `id` on `screen`.
    pub fn config(&self, id: &str, screen: ScreenIndex) -> Option<&ElementConfig> {
        self.entry(id)?.config(screen)
    }

    /// Screens holding a handle for `id`.
    pub fn screens(&self, id: &str) -> impl Iterator<Item = ScreenIndex> + '_ {
        self.entry(id).into_iter().flat_map(|entry| entry.screens())
    }

    /// Iterate entries in first-registration order.
    pub fn entries(&self) -> impl Iterator<Item = &ElementEntry<E>> + '_ {
        self.entries.iter()
    }

    /// Returns `true` if `id` was ever registered.
    pub fn contains(&self, id: &str) -> bool {
        self.lookup.contains_key(id)
    }

    /// Number of distinct ids.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing was registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Mapping `screen → ancestor handle`.
#[derive(Clone, Debug)]
pub struct AncestorRegistry<A> {
    slots: HashMap<ScreenIndex, A>,
}

impl<A> Default for AncestorRegistry<A> {
    fn default() -> Self {
        Self {
            slots: HashMap::new(),
        }
    }
}

impl<A> AncestorRegistry<A> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the coordinate-space anchor for `screen`; `None` is ignored.
    pub fn register(&mut self, handle: Option<A>, screen: ScreenIndex) {
        if let Some(handle) = handle {
            self.slots.insert(screen, handle);
        }
    }

    /// Anchor registered for `screen`.
    pub fn get(&self, screen: ScreenIndex) -> Option<&A> {
        self.slots.get(&screen)
    }

    /// Number of screens with an anchor.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if no anchor was registered.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AnimationStyle, Resize};
    use alloc::vec;

    #[test]
    fn register_is_idempotent() {
        let options = ElementOptions {
            resize: Some(Resize::Clip),
            ..ElementOptions::default()
        };
        let mut registry = ElementRegistry::new();
        registry.register(Some(1_u32), 0, "image", Some(&options));
        let before = (
            registry.len(),
            registry.handle("image", 0).copied(),
            registry.config("image", 0).copied(),
        );
        registry.register(Some(1_u32), 0, "image", Some(&options));
        let after = (
            registry.len(),
            registry.handle("image", 0).copied(),
            registry.config("image", 0).copied(),
        );
        assert_eq!(before, after);
        assert_eq!(registry.entry("image").unwrap().screens().count(), 1);
    }

    #[test]
    fn null_handle_keeps_previous_but_refreshes_config() {
        let mut registry = ElementRegistry::new();
        registry.register(Some(10_u32), 0, "image", None);
        let fade = ElementOptions {
            animation: Some(AnimationStyle::Fade),
            ..ElementOptions::default()
        };
        registry.register(None, 0, "image", Some(&fade));
        assert_eq!(registry.handle("image", 0), Some(&10));
        assert_eq!(
            registry.config("image", 0).map(|c| c.animation),
            Some(AnimationStyle::Fade)
        );
    }

    #[test]
    fn null_first_registration_creates_slot_without_handle() {
        let mut registry: ElementRegistry<u32> = ElementRegistry::new();
        registry.register(None, 2, "title", None);
        assert!(registry.contains("title"));
        assert_eq!(registry.handle("title", 2), None);
        assert!(registry.config("title", 2).is_some());
        assert_eq!(registry.entry("title").unwrap().screens().count(), 0);
    }

    #[test]
    fn latest_handle_wins() {
        let mut registry = ElementRegistry::new();
        registry.register(Some(1_u32), 0, "image", None);
        registry.register(Some(2_u32), 0, "image", None);
        assert_eq!(registry.handle("image", 0), Some(&2));
    }

    #[test]
    fn entries_keep_first_registration_order() {
        let mut registry = ElementRegistry::new();
        for id in ["c", "a", "b", "a"] {
            registry.register(Some(0_u32), 0, id, None);
        }
        let ids: Vec<&str> = registry.entries().map(ElementEntry::id).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn screens_lists_only_live_slots() {
        let mut registry = ElementRegistry::new();
        registry.register(Some(5_u32), 1, "image", None);
        registry.register(None, 0, "image", None);
        registry.register(Some(6_u32), 3, "image", None);
        let screens: Vec<_> = registry.entry("image").unwrap().screens().collect();
        assert_eq!(screens, vec![1, 3]);
        assert_eq!(registry.screens("image").collect::<Vec<_>>(), screens);
        assert_eq!(registry.screens("missing").count(), 0);
    }

    #[test]
    fn ancestor_null_is_ignored() {
        let mut ancestors = AncestorRegistry::new();
        ancestors.register(Some("root-0"), 0);
        ancestors.register(None, 0);
        ancestors.register(None, 1);
        assert_eq!(ancestors.get(0), Some(&"root-0"));
        assert_eq!(ancestors.get(1), None);
        assert_eq!(ancestors.len(), 1);

        ancestors.register(Some("root-0b"), 0);
        assert_eq!(ancestors.get(0), Some(&"root-0b"));
    }
}
