//! Path-level access policy.
//!
//! Evaluation is a pure function of (role, user id, path): no clock, no
//! store, no hidden state. Identical inputs always produce identical
//! decisions, which keeps redirect loops impossible and tests table-driven.

use crate::claims::Role;

pub const PIC_DASHBOARD_PREFIX: &str = "/pic-dashboard";
pub const TASK_LISTS_PREFIX: &str = "/task-lists/";
pub const EDIT_PROFILE_PREFIX: &str = "/edit-profile/";
pub const TASK_DETAILS_PREFIX: &str = "/task/details/";

/// Safe landing page for a PIC denied a path.
pub const PIC_FALLBACK: &str = "/dashboard";
/// Root/login; fallback for unknown roles.
pub const ROOT_PATH: &str = "/";

/// Outcome of policy evaluation. `Denied` carries the role-appropriate
/// redirect destination; nothing else is ever attached or persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Granted,
    Denied { fallback: String },
}

impl Access {
    fn denied(fallback: impl Into<String>) -> Self {
        Access::Denied {
            fallback: fallback.into(),
        }
    }

    #[must_use]
    pub fn is_granted(&self) -> bool {
        matches!(self, Access::Granted)
    }
}

/// Decide whether `role` may view `path`.
///
/// - Manager: granted everywhere.
/// - PIC: granted everywhere except `/pic-dashboard*`, which falls back to
///   `/dashboard`.
/// - Employee: granted their own `/task-lists/<id>` and
///   `/edit-profile/<id>` (final segment must equal `user_id`), and any
///   `/task/details/*` page. The details grant is deliberately not scoped
///   to the employee's own tasks; that matches the shipped behavior.
/// - Anything else: denied to root.
#[must_use]
pub fn evaluate(role: Role, user_id: &str, path: &str) -> Access {
    match role {
        Role::Manager => Access::Granted,
        Role::Pic => {
            if path.starts_with(PIC_DASHBOARD_PREFIX) {
                Access::denied(PIC_FALLBACK)
            } else {
                Access::Granted
            }
        }
        Role::Employee => {
            if path.starts_with(TASK_LISTS_PREFIX) || path.starts_with(EDIT_PROFILE_PREFIX) {
                if final_segment(path) == user_id {
                    return Access::Granted;
                }
            } else if path.starts_with(TASK_DETAILS_PREFIX) {
                return Access::Granted;
            }
            Access::denied(employee_fallback(user_id))
        }
        Role::Unknown => Access::denied(ROOT_PATH),
    }
}

/// An employee's own task list, the safe default for that role.
#[must_use]
pub fn employee_fallback(user_id: &str) -> String {
    format!("{TASK_LISTS_PREFIX}{user_id}")
}

/// Substring after the last `/`. Paths are opaque route strings here,
/// never parsed as full URLs.
fn final_segment(path: &str) -> &str {
    match path.rsplit('/').next() {
        Some(seg) => seg,
        None => path,
    }
}
