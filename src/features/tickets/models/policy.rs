use crate::features::tickets::models::{TicketCategory, TicketType};
use crate::features::users::models::UserRole;

/// Assignment rules attached to a ticket type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TicketPolicy {
    pub category: TicketCategory,
    /// Role asked for first when looking for an assignee.
    pub required_role: UserRole,
    /// Role asked for when nobody holds `required_role`.
    pub fallback_role: Option<UserRole>,
    /// When false, more than one candidate in the effective role is rejected.
    pub allows_multiple_assignees: bool,
    /// At most one open ticket of this type per company.
    pub unique_while_open: bool,
    /// Creating this ticket resolves every other open ticket of the company.
    pub resolves_company_tickets: bool,
}

impl TicketType {
    pub fn policy(self) -> TicketPolicy {
        match self {
            TicketType::ManagementReport => TicketPolicy {
                category: TicketCategory::Accounting,
                required_role: UserRole::Accountant,
                fallback_role: None,
                allows_multiple_assignees: true,
                unique_while_open: false,
                resolves_company_tickets: false,
            },
            TicketType::RegistrationAddressChange => TicketPolicy {
                category: TicketCategory::Corporate,
                required_role: UserRole::CorporateSecretary,
                fallback_role: Some(UserRole::Director),
                allows_multiple_assignees: false,
                unique_while_open: true,
                resolves_company_tickets: false,
            },
            TicketType::StrikeOff => TicketPolicy {
                category: TicketCategory::Management,
                required_role: UserRole::Director,
                fallback_role: None,
                allows_multiple_assignees: false,
                unique_while_open: false,
                resolves_company_tickets: true,
            },
        }
    }

    /// Category and first-choice owner role for this type.
    pub fn mapping(self) -> (TicketCategory, UserRole) {
        let policy = self.policy();
        (policy.category, policy.required_role)
    }
}
