//! # Helpdesk Core - Domain Module
//! 
//! Wire DTOs and client-side records.

pub mod auth;
pub mod notification;
pub mod realtime;
pub mod ticket;

pub use auth::{AuthResponse, Credentials, RefreshRequest, RegisterData};
pub use notification::{Notification, Severity};
pub use realtime::RealtimeEvent;
pub use ticket::{
    DashboardSummary, Ticket, TicketAttachment, TicketFilter, TicketPage, TicketPriority, TicketStatus,
};
