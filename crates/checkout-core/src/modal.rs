//! Modal Visibility
//!
//! Modals are shown and hidden by toggling a single CSS class on the element
//! with the given id. Both operations are idempotent and a missing element is
//! ignored.

/// Class that hides an element
pub const HIDDEN_CLASS: &str = "hidden";

pub const GUEST_CHECKOUT_MODAL: &str = "guestCheckoutModal";
pub const PAYMENT_MODAL: &str = "paymentModal";

/// Class list access by element id
pub trait ElementClasses {
    /// Add (`present = true`) or remove a class. Returns `false` when no
    /// element has that id.
    fn set_class(&self, id: &str, class: &str, present: bool) -> bool;
}

/// Show/hide helper over an [`ElementClasses`] implementation
#[derive(Clone, Debug, Default)]
pub struct Modals<E> {
    elements: E,
}

impl<E: ElementClasses> Modals<E> {
    pub const fn new(elements: E) -> Self {
        Self { elements }
    }

    /// Show the element with `id`
    pub fn show(&self, id: &str) -> bool {
        let found = self.elements.set_class(id, HIDDEN_CLASS, false);
        if !found {
            tracing::debug!(id, "Modal not found");
        }
        found
    }

    /// Hide the element with `id`
    pub fn hide(&self, id: &str) -> bool {
        let found = self.elements.set_class(id, HIDDEN_CLASS, true);
        if !found {
            tracing::debug!(id, "Modal not found");
        }
        found
    }

    pub const fn elements(&self) -> &E {
        &self.elements
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MemoryClasses;

    #[test]
    fn test_show_and_hide_are_idempotent() {
        let modals = Modals::new(MemoryClasses::with_hidden(&["loginModal"]));

        assert!(modals.show("loginModal"));
        assert!(modals.show("loginModal"));
        assert!(!modals.elements().is_hidden("loginModal"));

        assert!(modals.hide("loginModal"));
        assert!(modals.hide("loginModal"));
        assert!(modals.elements().is_hidden("loginModal"));
        assert_eq!(modals.elements().class_count("loginModal", HIDDEN_CLASS), 1);
    }

    #[test]
    fn test_missing_element_is_noop() {
        let modals = Modals::new(MemoryClasses::default());
        assert!(!modals.show("nope"));
        assert!(!modals.hide("nope"));
    }
}
