mod policy;
mod ticket;

pub use policy::TicketPolicy;
pub use ticket::{NewTicket, Ticket, TicketCategory, TicketDetail, TicketStatus, TicketType};
