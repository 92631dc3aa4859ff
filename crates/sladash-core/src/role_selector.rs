#![forbid(unsafe_code)]

//! Login role tabs.

use std::fmt;

use crate::config::Anchors;
use crate::dom::{CLASS_ACTIVE, Document};

/// Account role chosen on the login form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Role {
    #[default]
    Client,
    Engineer,
    Admin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Client, Role::Engineer, Role::Admin];

    /// Identifier submitted with the form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Engineer => "engineer",
            Self::Admin => "admin",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(value.trim()))
    }

    /// Description shown under the tabs. The wording depends on which
    /// page's markup the tab came from.
    #[must_use]
    pub const fn hint(self, markup: TabMarkup) -> &'static str {
        match (markup, self) {
            (TabMarkup::Landing, Self::Client) => "Client can create tickets and track SLA status.",
            (TabMarkup::Landing, Self::Engineer) => {
                "Engineer can view assigned tickets and update ticket status."
            }
            (TabMarkup::Landing, Self::Admin) => {
                "Admin can access governance dashboards and system insights."
            }
            (TabMarkup::Dashboard, Self::Client) => "Client can create tickets and track status.",
            (TabMarkup::Dashboard, Self::Engineer) => {
                "Engineer can view assigned tickets and update status."
            }
            (TabMarkup::Dashboard, Self::Admin) => "Admin can view Governance dashboards.",
        }
    }
}

/// Which markup a role tab was found through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TabMarkup {
    /// `[data-role-tab]` on the dashboard login form.
    Dashboard,
    /// `.role-tab[data-role]` on the landing page.
    Landing,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
struct RoleTab<E> {
    element: E,
    role: Role,
    markup: TabMarkup,
}

/// Exactly one tab is marked active once bound.
#[derive(Debug, Clone)]
pub struct RoleSelector<E> {
    tabs: Vec<RoleTab<E>>,
    input: Option<E>,
    hint: Option<E>,
    active: usize,
}

impl<E> RoleSelector<E>
where
    E: Clone + PartialEq + std::fmt::Debug,
{
    /// Collect role tabs and select the initial role.
    ///
    /// The initial role is the hidden input's value when it names a role,
    /// otherwise [`Role::Client`]. Tabs naming an unknown role are skipped.
    pub fn bind<D>(doc: &D, anchors: &Anchors) -> Option<Self>
    where
        D: Document<Element = E>,
    {
        let mut tabs: Vec<RoleTab<E>> = Vec::new();
        let sources = [
            (
                format!("[{}]", anchors.role_tab_attr),
                anchors.role_tab_attr.as_str(),
                TabMarkup::Dashboard,
            ),
            (
                format!(".{}[{}]", anchors.role_tab_class, anchors.role_attr),
                anchors.role_attr.as_str(),
                TabMarkup::Landing,
            ),
        ];
        for (selector, attr, markup) in &sources {
            for element in doc.query_selector_all(selector) {
                if tabs.iter().any(|t| t.element == element) {
                    continue;
                }
                let raw = doc.attribute(&element, attr).unwrap_or_default();
                match Role::parse(&raw) {
                    Some(role) => tabs.push(RoleTab {
                        element,
                        role,
                        markup: *markup,
                    }),
                    None => tracing::debug!(value = %raw, "skipping tab with unknown role"),
                }
            }
        }
        if tabs.is_empty() {
            return None;
        }

        let input = doc.element_by_id(&anchors.role_input_id);
        let hint = doc.element_by_id(&anchors.role_hint_id);
        let initial = input
            .as_ref()
            .and_then(|i| Role::parse(&doc.value(i)))
            .unwrap_or_default();
        let active = tabs.iter().position(|t| t.role == initial).unwrap_or(0);

        let mut selector = Self {
            tabs,
            input,
            hint,
            active,
        };
        selector.activate(doc, active);
        tracing::debug!(tabs = selector.tabs.len(), role = %selector.active_role(), "role selector bound");
        Some(selector)
    }

    /// Handle a click. Returns `true` when it landed on a tab.
    pub fn handle_click<D>(&mut self, doc: &D, target: Option<&E>) -> bool
    where
        D: Document<Element = E>,
    {
        let Some(index) = self
            .tabs
            .iter()
            .position(|t| doc.target_within(&t.element, target))
        else {
            return false;
        };
        self.activate(doc, index);
        true
    }

    /// Activate the first tab for `role`. Returns `false` if no tab has it.
    pub fn select<D>(&mut self, doc: &D, role: Role) -> bool
    where
        D: Document<Element = E>,
    {
        match self.tabs.iter().position(|t| t.role == role) {
            Some(index) => {
                self.activate(doc, index);
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn active_role(&self) -> Role {
        self.tabs[self.active].role
    }

    fn activate<D>(&mut self, doc: &D, index: usize)
    where
        D: Document<Element = E>,
    {
        self.active = index;
        for (i, tab) in self.tabs.iter().enumerate() {
            doc.set_class(&tab.element, CLASS_ACTIVE, i == index);
        }
        let tab = &self.tabs[index];
        if let Some(input) = &self.input {
            doc.set_value(input, tab.role.as_str());
        }
        if let Some(hint) = &self.hint {
            doc.set_text(hint, tab.role.hint(tab.markup));
        }
    }
}
