pub mod ticket_handler;

pub use ticket_handler::{__path_create_ticket, __path_list_tickets, create_ticket, list_tickets};
