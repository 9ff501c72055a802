//! Invoice handlers.

mod issue_invoice;
mod list_invoices;
mod void_invoice;

pub use issue_invoice::{IssueInvoiceCommand, IssueInvoiceHandler};
pub use list_invoices::{ListInvoicesHandler, ListInvoicesQuery};
pub use void_invoice::{VoidInvoiceCommand, VoidInvoiceHandler};
