//! Action-level gating for ride operations.
//!
//! Page guards decide who may *see* a page; this module decides who may *act*
//! on it. A driver may browse fares but may not submit a booking. This is a
//! client-side shortcut only; the booking API enforces its own check.
use crate::{Identity, Role};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RideAction {
    SubmitBooking,
    EstimateFare,
}

impl RideAction {
    pub const ALL: [RideAction; 2] = [RideAction::SubmitBooking, RideAction::EstimateFare];

    /// Look an action up by its wire name.
    pub fn from_name(name: &str) -> Option<RideAction> {
        RideAction::ALL
            .into_iter()
            .find(|action| action.as_str() == name)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RideAction::SubmitBooking => "submit_booking",
            RideAction::EstimateFare => "estimate_fare",
        }
    }

    fn requires_session(self) -> bool {
        match self {
            RideAction::SubmitBooking => true,
            RideAction::EstimateFare => false,
        }
    }

    fn permits(self, role: Role) -> bool {
        match (self, role) {
            (RideAction::SubmitBooking, Role::Rider) => true,
            (RideAction::SubmitBooking, Role::Driver | Role::Admin | Role::SuperAdmin) => false,
            (RideAction::EstimateFare, _) => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum ActionVerdict {
    Permitted,
    /// Identity still loading; the control should stay disabled.
    Deferred,
    RequiresAuthentication,
    ForbiddenByRole { role: Role, message: String },
}

impl ActionVerdict {
    pub fn is_permitted(&self) -> bool {
        matches!(self, ActionVerdict::Permitted)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ActionVerdict::Permitted => "permitted",
            ActionVerdict::Deferred => "deferred",
            ActionVerdict::RequiresAuthentication => "requires_authentication",
            ActionVerdict::ForbiddenByRole { .. } => "forbidden_by_role",
        }
    }
}

/// Check whether the current identity may perform `action`.
pub fn check_action(identity: &Identity, action: RideAction) -> ActionVerdict {
    let verdict = match identity {
        Identity::Pending if action.requires_session() => ActionVerdict::Deferred,
        Identity::Absent if action.requires_session() => ActionVerdict::RequiresAuthentication,
        Identity::Pending | Identity::Absent => ActionVerdict::Permitted,
        Identity::Resolved(profile) => {
            if action.permits(profile.role) {
                ActionVerdict::Permitted
            } else {
                ActionVerdict::ForbiddenByRole {
                    role: profile.role,
                    message: forbidden_message(profile.role, action),
                }
            }
        }
    };
    if let ActionVerdict::ForbiddenByRole { role, .. } = &verdict {
        tracing::info!(action = action.as_str(), %role, "action rejected for role");
    }
    verdict
}

fn forbidden_message(role: Role, action: RideAction) -> String {
    let what = match action {
        RideAction::SubmitBooking => "request rides",
        RideAction::EstimateFare => "estimate fares",
    };
    match role {
        Role::Driver => format!("Drivers cannot {what}. Switch to a rider account to book."),
        Role::Rider | Role::Admin | Role::SuperAdmin => {
            format!("{} accounts cannot {what}.", role.label())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AccessDecision, AuthPaths, evaluate_chain};

    #[test]
    fn excluded_roles_cannot_submit_bookings() {
        for role in [Role::Driver, Role::Admin, Role::SuperAdmin] {
            let identity = Identity::resolved(role, true, "x@example.com");
            let verdict = check_action(&identity, RideAction::SubmitBooking);
            match verdict {
                ActionVerdict::ForbiddenByRole { role: got, message } => {
                    assert_eq!(got, role);
                    assert!(message.contains("cannot request rides"));
                }
                other => panic!("unexpected verdict: {other:?}"),
            }
        }
    }

    #[test]
    fn actions_are_found_by_wire_name() {
        for action in RideAction::ALL {
            assert_eq!(RideAction::from_name(action.as_str()), Some(action));
        }
        assert_eq!(RideAction::from_name("cancel_ride"), None);
    }

    #[test]
    fn driver_may_view_fares_but_not_book() {
        let driver = Identity::resolved(Role::Driver, true, "d@example.com");
        assert!(matches!(
            check_action(&driver, RideAction::SubmitBooking),
            ActionVerdict::ForbiddenByRole { .. }
        ));
        assert!(check_action(&driver, RideAction::EstimateFare).is_permitted());
        // The fares page carries no guards at all.
        assert_eq!(
            evaluate_chain(&[], &AuthPaths::default(), &driver, "/fares"),
            AccessDecision::Allow
        );
    }

    #[test]
    fn riders_may_submit() {
        let rider = Identity::resolved(Role::Rider, true, "r@example.com");
        assert!(check_action(&rider, RideAction::SubmitBooking).is_permitted());
    }

    #[test]
    fn session_state_gates_submission() {
        assert_eq!(
            check_action(&Identity::Pending, RideAction::SubmitBooking),
            ActionVerdict::Deferred
        );
        assert_eq!(
            check_action(&Identity::Absent, RideAction::SubmitBooking),
            ActionVerdict::RequiresAuthentication
        );
        assert!(check_action(&Identity::Absent, RideAction::EstimateFare).is_permitted());
    }
}
