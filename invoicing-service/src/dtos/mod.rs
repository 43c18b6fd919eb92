pub mod invoice_items;
pub mod invoices;

pub use invoice_items::{
    CreateInvoiceItemRequest, InvoiceItemListResponse, UpdateInvoiceItemRequest,
};
pub use invoices::{
    CreateInvoiceRequest, CreateInvoiceWithItemsRequest, GetInvoiceParams, InvoiceFields,
    InvoiceListParams, InvoiceListResponse, InvoiceResponse, UpdateInvoiceRequest,
};
