//! The instruction sent alongside every receipt.
//!
//! Callers can override it via [`crate::config::ExtractionConfig::system_prompt`];
//! the constant here is used only when no override is provided.

/// Column order of the CSV the model is asked to produce.
pub const CSV_COLUMNS: [&str; 16] = [
    "ReceiptID",
    "Seller",
    "Venue",
    "DateTime",
    "CustomerName",
    "PaymentMethod",
    "DeliveryAddress",
    "ItemName",
    "Quantity",
    "UnitPrice",
    "LineTotal",
    "Subtotal",
    "Tax",
    "DeliveryFee",
    "Tip",
    "GrandTotal",
];

/// Default system prompt for turning a food-delivery receipt PDF into CSV.
pub const DEFAULT_SYSTEM_PROMPT: &str = r#"You are a data-extraction assistant. I will supply you with one or more PDF files, each containing a Wolt food-delivery check (receipt). Your job is to:

1. Read the PDF content and identify these fields:
   - Receipt ID or Order Number
   - Seller
   - Venue
   - Date and time
   - Order type (if present)
   - Payment method (if present)
   - Customer name (if present)
   - Delivery address (if present)
   - For each line-item:
     • Item name/description
     • Quantity
     • Unit price
     • Line-item total
   - Subtotal
   - Tax amount(s) (if any)
   - Delivery fee
   - Tip (if any)
   - Grand total

2. Produce a single CSV table where:
   - Each line-item gets its own row
   - The columns are:
     ReceiptID, Seller, Venue, DateTime, CustomerName, PaymentMethod, DeliveryAddress, ItemName, Quantity, UnitPrice, LineTotal, Subtotal, Tax, DeliveryFee, Tip, GrandTotal

3. If a field is missing on a particular receipt, leave its CSV cell blank.
4. Do not include any extra commentary or markdown—output only valid CSV, with a header row."#;
