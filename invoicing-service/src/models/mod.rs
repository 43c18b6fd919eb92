//! Domain models for invoicing-service.

mod invoice;
mod invoice_item;

pub use invoice::{Invoice, InvoiceChanges, InvoiceFilter, InvoiceStats, NewInvoice};
pub use invoice_item::{InvoiceItem, ItemChanges, ItemDraft, ItemRecord};
