#![forbid(unsafe_code)]

//! Avatar dropdown: trigger toggles, outside click and Escape dismiss.

use crate::config::Anchors;
use crate::dom::{CLASS_OPEN, Document};
use crate::event::Key;

/// Open/closed profile menu bound to a trigger and a menu element.
#[derive(Debug, Clone)]
pub struct ProfileMenu<E> {
    trigger: E,
    menu: E,
    open: bool,
}

impl<E> ProfileMenu<E>
where
    E: Clone + PartialEq + std::fmt::Debug,
{
    /// Bind when both the trigger and the menu exist. The menu starts closed
    /// and its ARIA attributes are normalized to match.
    pub fn bind<D>(doc: &D, anchors: &Anchors) -> Option<Self>
    where
        D: Document<Element = E>,
    {
        let trigger = doc.element_by_id(&anchors.profile_trigger_id)?;
        let menu = doc.element_by_id(&anchors.profile_menu_id)?;
        let menu = Self {
            trigger,
            menu,
            open: false,
        };
        menu.render(doc);
        tracing::debug!("profile menu bound");
        Some(menu)
    }

    /// Route a click anywhere in the document.
    ///
    /// A click on the trigger toggles. A click outside both the trigger and
    /// the menu closes; it never opens.
    pub fn handle_click<D>(&mut self, doc: &D, target: Option<&E>)
    where
        D: Document<Element = E>,
    {
        if doc.target_within(&self.trigger, target) {
            if self.open {
                self.close(doc);
            } else {
                self.open(doc);
            }
        } else if !doc.target_within(&self.menu, target) {
            self.close(doc);
        }
    }

    pub fn handle_key<D>(&mut self, doc: &D, key: &Key)
    where
        D: Document<Element = E>,
    {
        if *key == Key::Escape {
            self.close(doc);
        }
    }

    pub fn open<D>(&mut self, doc: &D)
    where
        D: Document<Element = E>,
    {
        if self.open {
            return;
        }
        self.open = true;
        self.render(doc);
    }

    /// Close the menu. Closing a closed menu is a no-op.
    pub fn close<D>(&mut self, doc: &D)
    where
        D: Document<Element = E>,
    {
        if !self.open {
            return;
        }
        self.open = false;
        self.render(doc);
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    fn render<D>(&self, doc: &D)
    where
        D: Document<Element = E>,
    {
        doc.set_class(&self.menu, CLASS_OPEN, self.open);
        doc.set_attribute(&self.menu, "aria-hidden", if self.open { "false" } else { "true" });
        doc.set_attribute(
            &self.trigger,
            "aria-expanded",
            if self.open { "true" } else { "false" },
        );
    }
}
